//! Sections: material + geometric-property assignment over an element set

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Solid section: element set + material, optional local-frame orientation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolidSection {
    pub elset: String,
    pub material: String,
    pub orientation: Option<String>,
}

impl SolidSection {
    pub fn new(material: impl Into<String>, elset: impl Into<String>) -> Self {
        Self {
            elset: elset.into(),
            material: material.into(),
            orientation: None,
        }
    }

    pub fn with_orientation(mut self, orientation: impl Into<String>) -> Self {
        self.orientation = Some(orientation.into());
        self
    }
}

/// Beam section: rectangular profile by default, local 1-direction vector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BeamSection {
    pub elset: String,
    pub material: String,
    pub width: f64,
    pub height: f64,
    /// CalculiX profile shape tag; "RECT" is the only one the workflows use.
    pub profile: String,
    /// Local 1-direction of the cross-section.
    pub direction: Vector3<f64>,
    pub orientation: Option<String>,
}

impl BeamSection {
    pub fn new(
        material: impl Into<String>,
        elset: impl Into<String>,
        width: f64,
        height: f64,
    ) -> Self {
        Self {
            elset: elset.into(),
            material: material.into(),
            width,
            height,
            profile: "RECT".to_string(),
            direction: Vector3::z(),
            orientation: None,
        }
    }

    pub fn with_direction(mut self, direction: Vector3<f64>) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_orientation(mut self, orientation: impl Into<String>) -> Self {
        self.orientation = Some(orientation.into());
        self
    }
}

/// Shell section: thickness and optional mid-surface offset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShellSection {
    pub elset: String,
    pub material: String,
    pub thickness: f64,
    pub offset: f64,
    pub orientation: Option<String>,
}

impl ShellSection {
    pub fn new(material: impl Into<String>, elset: impl Into<String>, thickness: f64) -> Self {
        Self {
            elset: elset.into(),
            material: material.into(),
            thickness,
            offset: 0.0,
            orientation: None,
        }
    }

    pub fn with_offset(mut self, offset: f64) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_orientation(mut self, orientation: impl Into<String>) -> Self {
        self.orientation = Some(orientation.into());
        self
    }
}

/// Any section variant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Section {
    Solid(SolidSection),
    Beam(BeamSection),
    Shell(ShellSection),
}

impl Section {
    /// Name of the element set this section applies to.
    pub fn elset(&self) -> &str {
        match self {
            Section::Solid(s) => &s.elset,
            Section::Beam(s) => &s.elset,
            Section::Shell(s) => &s.elset,
        }
    }

    /// Name of the referenced orientation, if any.
    pub fn orientation(&self) -> Option<&str> {
        match self {
            Section::Solid(s) => s.orientation.as_deref(),
            Section::Beam(s) => s.orientation.as_deref(),
            Section::Shell(s) => s.orientation.as_deref(),
        }
    }
}
