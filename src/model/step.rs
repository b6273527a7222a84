//! Solution steps

use serde::{Deserialize, Serialize};

use super::load::{BoundaryCondition, Load};

/// Analysis procedure for a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepType {
    Static,
    /// Steady-state coupled temperature-displacement (hygrothermal
    /// analyses drive moisture through the temperature DOF).
    CoupledThermal,
}

impl StepType {
    pub(crate) fn keyword(&self) -> &'static str {
        match self {
            StepType::Static => "Static",
            StepType::CoupledThermal => "Coupled temperature-displacement, Steady state",
        }
    }
}

/// One solution step: loads, boundary conditions and output requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Step {
    pub step_type: StepType,
    /// Requested node output fields (e.g. "U", "NT").
    pub node_output: Vec<String>,
    /// Requested element output fields (e.g. "S", "E").
    pub element_output: Vec<String>,
    /// Binary (.frd `*Node output`) vs ASCII (`*Node file`) output mode.
    pub binary_output: bool,
    pub loads: Vec<Load>,
    pub boundary_conditions: Vec<BoundaryCondition>,
}

impl Step {
    pub fn new(step_type: StepType) -> Self {
        Self {
            step_type,
            node_output: vec!["U".to_string()],
            element_output: vec!["S".to_string(), "E".to_string()],
            binary_output: true,
            loads: Vec::new(),
            boundary_conditions: Vec::new(),
        }
    }

    pub fn add_load(&mut self, load: Load) -> &mut Self {
        self.loads.push(load);
        self
    }

    pub fn add_boundary_condition(&mut self, bc: BoundaryCondition) -> &mut Self {
        self.boundary_conditions.push(bc);
        self
    }
}

impl Default for Step {
    fn default() -> Self {
        Self::new(StepType::Static)
    }
}
