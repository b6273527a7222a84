//! Reference points, constraints, springs, surfaces and initial conditions

use nalgebra::Point3;
use serde::{Deserialize, Serialize};

/// A synthetic point tied to a node set, used by rigid-body constraints.
///
/// The solver-side reference and rotation node tags are unknown until the
/// deck is written: the writer appends one node for each after all real
/// geometry nodes and reports the allocation via
/// [`ResolvedReferencePoint`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferencePoint {
    pub name: String,
    pub location: Point3<f64>,
    pub nset: String,
}

impl ReferencePoint {
    pub fn new(name: impl Into<String>, location: Point3<f64>, nset: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            location,
            nset: nset.into(),
        }
    }
}

/// A reference point with its write-time node tags filled in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedReferencePoint {
    pub name: String,
    pub location: Point3<f64>,
    pub nset: String,
    pub ref_node: usize,
    pub rot_node: usize,
}

/// Kinematic constraints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Constraint {
    /// Rigid body over the reference point's node set.
    RigidBody {
        name: String,
        reference_point: String,
    },
}

impl Constraint {
    pub fn rigid_body(name: impl Into<String>, reference_point: impl Into<String>) -> Self {
        Constraint::RigidBody {
            name: name.into(),
            reference_point: reference_point.into(),
        }
    }
}

/// Spring stiffness assigned to a SPRING2 element set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spring {
    pub elset: String,
    pub elasticity: f64,
}

impl Spring {
    pub fn new(elset: impl Into<String>, elasticity: f64) -> Self {
        Self {
            elset: elset.into(),
            elasticity,
        }
    }
}

/// Element-face surface: face number -> element tags exposing that face.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Surface {
    pub name: String,
    pub faces: Vec<(u8, Vec<usize>)>,
}

impl Surface {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            faces: Vec::new(),
        }
    }

    pub fn add_face(&mut self, face: u8, elements: Vec<usize>) -> &mut Self {
        self.faces.push((face, elements));
        self
    }
}

/// Tied surface behaviour with friction, named for contact pairs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurfaceInteraction {
    pub name: String,
}

impl SurfaceInteraction {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Surface-to-surface contact pair referencing an interaction by name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactPair {
    pub name: String,
    pub interaction: String,
    pub master: String,
    pub slave: String,
}

impl ContactPair {
    pub fn new(
        name: impl Into<String>,
        interaction: impl Into<String>,
        master: impl Into<String>,
        slave: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            interaction: interaction.into(),
            master: master.into(),
            slave: slave.into(),
        }
    }
}

/// Initial field values applied before the first step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum InitialCondition {
    Temperature { nset: String, value: f64 },
}

impl InitialCondition {
    pub fn temperature(nset: impl Into<String>, value: f64) -> Self {
        InitialCondition::Temperature {
            nset: nset.into(),
            value,
        }
    }
}
