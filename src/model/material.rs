//! Materials and their property records
//!
//! Each property variant owns its serialization rule (fixed arity, values
//! per line); wrong arity is rejected at construction time, never at write
//! time.

use serde::{Deserialize, Serialize};

use crate::error::{CalxError, CalxResult};

/// A single material property block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum MaterialProperty {
    /// Isotropic elasticity: E, nu.
    Elastic { values: [f64; 2] },
    /// Orthotropic engineering constants (9 values).
    EngineeringConstants { values: [f64; 9] },
    /// Arbitrary user-material constant vector (wrapped 8 per line).
    UserDefined { values: Vec<f64> },
    /// Mass density.
    Density { value: f64 },
    /// Thermal expansion, one coefficient per axis (1 = ISO, >1 = ORTHO).
    Expansion { values: Vec<f64> },
}

impl MaterialProperty {
    /// Isotropic elasticity; requires exactly 2 values.
    pub fn elastic(values: &[f64]) -> CalxResult<Self> {
        let values: [f64; 2] = values.try_into().map_err(|_| CalxError::PropertyArity {
            property: "Elastic",
            expected: 2,
            got: values.len(),
        })?;
        Ok(MaterialProperty::Elastic { values })
    }

    /// Orthotropic engineering constants; requires exactly 9 values.
    pub fn engineering_constants(values: &[f64]) -> CalxResult<Self> {
        let values: [f64; 9] = values.try_into().map_err(|_| CalxError::PropertyArity {
            property: "Engineering Constants",
            expected: 9,
            got: values.len(),
        })?;
        Ok(MaterialProperty::EngineeringConstants { values })
    }

    pub fn user_defined(values: Vec<f64>) -> Self {
        MaterialProperty::UserDefined { values }
    }

    pub fn density(value: f64) -> Self {
        MaterialProperty::Density { value }
    }

    pub fn expansion(values: Vec<f64>) -> Self {
        MaterialProperty::Expansion { values }
    }
}

/// A named material: ordered list of property blocks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Material {
    pub name: String,
    pub properties: Vec<MaterialProperty>,
}

impl Material {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: Vec::new(),
        }
    }

    pub fn with_property(mut self, property: MaterialProperty) -> Self {
        self.properties.push(property);
        self
    }
}
