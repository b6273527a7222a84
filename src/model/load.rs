//! Loads and boundary conditions

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// A load applied within a step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Load {
    /// Concentrated force on a node set; only non-zero components are
    /// written to the deck.
    Concentrated { nset: String, force: Vector3<f64> },
    /// Gravity-type distributed load on an element set.
    Gravity {
        elset: String,
        direction: Vector3<f64>,
        magnitude: f64,
    },
}

impl Load {
    pub fn concentrated(nset: impl Into<String>, force: Vector3<f64>) -> Self {
        Load::Concentrated {
            nset: nset.into(),
            force,
        }
    }

    /// Gravity load from a force vector; magnitude is the vector's length
    /// and the stored direction is unitized.
    pub fn gravity(elset: impl Into<String>, force: Vector3<f64>) -> Self {
        let magnitude = force.norm();
        let direction = if magnitude > 0.0 {
            force / magnitude
        } else {
            -Vector3::z()
        };
        Load::Gravity {
            elset: elset.into(),
            direction,
            magnitude,
        }
    }

    /// Name of the set this load targets.
    pub fn set_name(&self) -> &str {
        match self {
            Load::Concentrated { nset, .. } => nset,
            Load::Gravity { elset, .. } => elset,
        }
    }
}

/// Prescribed value over a degree-of-freedom range of a node set.
///
/// DOFs 1-3 are translations and 11 is temperature, by solver convention.
/// A zero value is a pure constraint; non-zero prescribes a displacement
/// or temperature.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoundaryCondition {
    pub nset: String,
    pub dof_start: u32,
    pub dof_end: u32,
    pub value: f64,
}

impl BoundaryCondition {
    pub fn new(nset: impl Into<String>, dof_start: u32, dof_end: u32, value: f64) -> Self {
        Self {
            nset: nset.into(),
            dof_start,
            dof_end,
            value,
        }
    }

    /// Fix translations 1..3 of a node set.
    pub fn fixed(nset: impl Into<String>) -> Self {
        Self::new(nset, 1, 3, 0.0)
    }

    /// Prescribe a temperature (DOF 11).
    pub fn temperature(nset: impl Into<String>, value: f64) -> Self {
        Self::new(nset, 11, 11, value)
    }
}
