//! FE model data structures
//!
//! A [`Model`] exclusively owns its nodes, elements, sets, materials,
//! sections, loads and steps for a single export; there is no incremental
//! mutation API beyond collection appends. Insertion order is preserved
//! everywhere so the written deck is deterministic.

pub mod constraint;
pub mod load;
pub mod material;
pub mod section;
pub mod set;
pub mod step;

use std::collections::HashMap;

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

use crate::element::{Element, ElementKind};
use crate::error::{CalxError, CalxResult};

pub use constraint::{
    Constraint, ContactPair, InitialCondition, ReferencePoint, ResolvedReferencePoint, Spring,
    Surface, SurfaceInteraction,
};
pub use load::{BoundaryCondition, Load};
pub use material::{Material, MaterialProperty};
pub use section::{BeamSection, Section, ShellSection, SolidSection};
pub use set::{SetCollection, TagSet};
pub use step::{Step, StepType};

/// Reserved set name conventionally holding every node or element tag.
pub const ALL_SET: &str = "all";

/// A per-element local coordinate frame (origin, local X, local Y).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Frame {
    pub origin: Point3<f64>,
    pub x_axis: Vector3<f64>,
    pub y_axis: Vector3<f64>,
}

impl Frame {
    /// Build an orthonormal frame from an origin and two axes.
    ///
    /// X is normalized and Y is re-orthogonalized against it; a Y nearly
    /// parallel to X falls back to a perpendicular picked from the global
    /// axes.
    pub fn new(origin: Point3<f64>, x_axis: Vector3<f64>, y_axis: Vector3<f64>) -> Self {
        let x = x_axis.try_normalize(1e-12).unwrap_or_else(Vector3::x);
        let y_raw = y_axis - x * y_axis.dot(&x);
        let y = y_raw.try_normalize(1e-9).unwrap_or_else(|| {
            let fallback = if x.dot(&Vector3::z()).abs() < 1.0 - 1e-6 {
                Vector3::z()
            } else {
                Vector3::y()
            };
            let p = fallback - x * fallback.dot(&x);
            p.normalize()
        });
        Self {
            origin,
            x_axis: x,
            y_axis: y,
        }
    }
}

/// A named per-element local frame table, referenced by orientations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Distribution {
    pub name: String,
    pub frames: Vec<(usize, Frame)>,
}

impl Distribution {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            frames: Vec::new(),
        }
    }

    pub fn add(&mut self, element_tag: usize, frame: Frame) -> &mut Self {
        self.frames.push((element_tag, frame));
        self
    }
}

/// The complete FE model: everything the deck writer needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Model {
    pub name: String,

    nodes: Vec<(usize, Point3<f64>)>,
    node_index: HashMap<usize, usize>,
    elements: Vec<Element>,
    element_index: HashMap<usize, usize>,

    /// Explicit element normals: (element tag, node tag, normal).
    pub normals: Vec<(usize, usize, Vector3<f64>)>,

    pub distributions: Vec<Distribution>,
    /// Orientation name -> distribution name.
    pub orientations: Vec<(String, String)>,

    pub node_sets: SetCollection,
    pub element_sets: SetCollection,

    pub materials: Vec<Material>,
    pub springs: Vec<Spring>,
    pub surfaces: Vec<Surface>,
    pub surface_interactions: Vec<SurfaceInteraction>,
    pub contact_pairs: Vec<ContactPair>,
    /// Named sections, written in insertion order.
    pub sections: Vec<(String, Section)>,
    pub initial_conditions: Vec<InitialCondition>,
    pub reference_points: Vec<ReferencePoint>,
    pub constraints: Vec<Constraint>,
    pub steps: Vec<Step>,
}

impl Model {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nodes: Vec::new(),
            node_index: HashMap::new(),
            elements: Vec::new(),
            element_index: HashMap::new(),
            normals: Vec::new(),
            distributions: Vec::new(),
            orientations: Vec::new(),
            node_sets: SetCollection::new(),
            element_sets: SetCollection::new(),
            materials: Vec::new(),
            springs: Vec::new(),
            surfaces: Vec::new(),
            surface_interactions: Vec::new(),
            contact_pairs: Vec::new(),
            sections: Vec::new(),
            initial_conditions: Vec::new(),
            reference_points: Vec::new(),
            constraints: Vec::new(),
            steps: Vec::new(),
        }
    }

    /// Add a node; tags must be unique but need not be contiguous.
    pub fn add_node(&mut self, tag: usize, position: Point3<f64>) -> CalxResult<&mut Self> {
        if self.node_index.contains_key(&tag) {
            return Err(CalxError::DuplicateNode(tag));
        }
        self.node_index.insert(tag, self.nodes.len());
        self.nodes.push((tag, position));
        Ok(self)
    }

    pub fn node(&self, tag: usize) -> Option<&Point3<f64>> {
        self.node_index.get(&tag).map(|&i| &self.nodes[i].1)
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> &[(usize, Point3<f64>)] {
        &self.nodes
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn add_element(&mut self, element: Element) -> CalxResult<&mut Self> {
        if self.element_index.contains_key(&element.tag) {
            return Err(CalxError::DuplicateElement(element.tag));
        }
        self.element_index.insert(element.tag, self.elements.len());
        self.elements.push(element);
        Ok(self)
    }

    pub fn element(&self, tag: usize) -> Option<&Element> {
        self.element_index.get(&tag).map(|&i| &self.elements[i])
    }

    /// Elements in insertion order.
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Populate the reserved "all" node and element sets from the current
    /// contents of the model.
    pub fn populate_all_sets(&mut self) {
        let node_tags: Vec<usize> = self.nodes.iter().map(|(t, _)| *t).collect();
        let element_tags: Vec<usize> = self.elements.iter().map(|e| e.tag).collect();
        self.node_sets.replace(ALL_SET, node_tags);
        self.element_sets.replace(ALL_SET, element_tags);
    }

    pub fn add_material(&mut self, material: Material) -> &mut Self {
        self.materials.push(material);
        self
    }

    pub fn add_section(&mut self, name: impl Into<String>, section: Section) -> &mut Self {
        self.sections.push((name.into(), section));
        self
    }

    pub fn add_distribution(&mut self, distribution: Distribution) -> &mut Self {
        self.distributions.push(distribution);
        self
    }

    /// Register an orientation referencing a named distribution.
    pub fn add_orientation(
        &mut self,
        name: impl Into<String>,
        distribution: impl Into<String>,
    ) -> &mut Self {
        self.orientations.push((name.into(), distribution.into()));
        self
    }

    pub fn add_reference_point(&mut self, point: ReferencePoint) -> &mut Self {
        self.reference_points.push(point);
        self
    }

    pub fn add_constraint(&mut self, constraint: Constraint) -> &mut Self {
        self.constraints.push(constraint);
        self
    }

    pub fn add_step(&mut self, step: Step) -> &mut Self {
        self.steps.push(step);
        self
    }

    /// Local frame for a 1D element, following the beam-orientation rule:
    /// X along the element axis, Y as requested unless (near) parallel to
    /// the axis, in which case global Z or Y is substituted.
    pub fn orientation_for_line_element(
        &self,
        element_tag: usize,
        y_axis: Vector3<f64>,
    ) -> CalxResult<Frame> {
        let element = self
            .element(element_tag)
            .ok_or(CalxError::ElementNotFound(element_tag))?;

        let end_index = match element.kind {
            ElementKind::B31 => 1,
            // B32 midpoint is the last node; the axis runs to node 2.
            ElementKind::B32 => 2,
            _ => {
                return Err(CalxError::UnknownElementType(format!(
                    "{} is not a 1D member",
                    element.kind.keyword()
                )))
            }
        };

        let p0 = *self
            .node(element.nodes[0])
            .ok_or(CalxError::NodeNotFound(element.nodes[0]))?;
        let p1 = *self
            .node(element.nodes[end_index])
            .ok_or(CalxError::NodeNotFound(element.nodes[end_index]))?;

        let x_axis = (p1 - p0).try_normalize(1e-12).unwrap_or_else(Vector3::x);

        let mut y = if y_axis.norm() == 0.0 {
            Vector3::y()
        } else {
            y_axis
        };
        if y.normalize().dot(&x_axis).abs() > 1.0 - 1e-6 {
            y = if x_axis.dot(&Vector3::z()).abs() < 1.0 - 1e-9 {
                Vector3::z()
            } else {
                Vector3::y()
            };
        }

        Ok(Frame::new(p0, x_axis, y))
    }

    /// Serialize the whole model as pretty JSON, for snapshots and
    /// debugging alongside the deck.
    pub fn to_json(&self) -> CalxResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> CalxResult<Model> {
        Ok(serde_json::from_str(json)?)
    }

    /// Allocate deck node tags for every reference point.
    ///
    /// Called during the finalize phase of an export: reference and
    /// rotation nodes get fresh tags past the largest real node tag, in
    /// reference-point insertion order, so they never collide with
    /// geometry nodes.
    pub fn resolve_reference_points(&self) -> Vec<ResolvedReferencePoint> {
        let mut next = self.nodes.iter().map(|(t, _)| *t).max().unwrap_or(0) + 1;
        self.reference_points
            .iter()
            .map(|rp| {
                let resolved = ResolvedReferencePoint {
                    name: rp.name.clone(),
                    location: rp.location,
                    nset: rp.nset.clone(),
                    ref_node: next,
                    rot_node: next + 1,
                };
                next += 2;
                resolved
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_duplicate_tags_rejected() {
        let mut model = Model::new("m");
        model.add_node(1, Point3::origin()).unwrap();
        assert!(matches!(
            model.add_node(1, Point3::new(1.0, 0.0, 0.0)),
            Err(CalxError::DuplicateNode(1))
        ));
    }

    #[test]
    fn test_all_sets() {
        let mut model = Model::new("m");
        model.add_node(4, Point3::origin()).unwrap();
        model.add_node(2, Point3::new(1.0, 0.0, 0.0)).unwrap();
        model
            .add_element(Element::new(7, ElementKind::B31, vec![4, 2]).unwrap())
            .unwrap();
        model.populate_all_sets();

        assert_eq!(model.node_sets.get(ALL_SET).unwrap().tags, vec![4, 2]);
        assert_eq!(model.element_sets.get(ALL_SET).unwrap().tags, vec![7]);
    }

    #[test]
    fn test_line_orientation_parallel_fallback() {
        let mut model = Model::new("m");
        model.add_node(1, Point3::origin()).unwrap();
        model.add_node(2, Point3::new(0.0, 0.0, 2.0)).unwrap();
        model
            .add_element(Element::new(1, ElementKind::B31, vec![1, 2]).unwrap())
            .unwrap();

        // Requested Y is parallel to the vertical member axis; the frame
        // must fall back rather than collapse.
        let frame = model
            .orientation_for_line_element(1, Vector3::z())
            .unwrap();
        assert_relative_eq!(frame.x_axis.z, 1.0, epsilon = 1e-12);
        assert_relative_eq!(frame.x_axis.dot(&frame.y_axis), 0.0, epsilon = 1e-9);
        assert_relative_eq!(frame.y_axis.norm(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_json_snapshot_round_trip() {
        let mut model = Model::new("snapshot");
        model.add_node(1, Point3::new(0.5, 0.0, -2.0)).unwrap();
        model
            .add_element(Element::new(1, ElementKind::Spring2, vec![1, 1]).unwrap())
            .unwrap();
        model.springs.push(Spring::new("all", 1e6));

        let json = model.to_json().unwrap();
        let restored = Model::from_json(&json).unwrap();
        assert_eq!(restored.name, "snapshot");
        assert_eq!(restored.node(1), Some(&Point3::new(0.5, 0.0, -2.0)));
        assert_eq!(restored.element(1).unwrap().kind, ElementKind::Spring2);
        assert_eq!(restored.springs[0].elset, "all");
    }

    #[test]
    fn test_reference_point_resolution_avoids_collisions() {
        let mut model = Model::new("m");
        model.add_node(10, Point3::origin()).unwrap();
        model.add_node(500, Point3::new(1.0, 0.0, 0.0)).unwrap();
        model.add_reference_point(ReferencePoint::new("rp1", Point3::origin(), "grip"));
        model.add_reference_point(ReferencePoint::new("rp2", Point3::origin(), "base"));

        let resolved = model.resolve_reference_points();
        assert_eq!(resolved[0].ref_node, 501);
        assert_eq!(resolved[0].rot_node, 502);
        assert_eq!(resolved[1].ref_node, 503);
        assert_eq!(resolved[1].rot_node, 504);
    }
}
