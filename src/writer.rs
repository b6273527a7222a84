//! CalculiX input deck writer
//!
//! Serializes a [`Model`] to `.inp` text in a fixed block order: heading,
//! nodes, elements (grouped by type), normals, distributions, orientations,
//! node sets, element sets, springs, materials, sections, surface
//! interactions, contact pairs, initial conditions, constraints, steps.
//! Unresolvable references never abort an export: the offending block is
//! skipped and reported through [`ExportWarning`].

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use chrono::Utc;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::element::ElementKind;
use crate::error::CalxResult;
use crate::model::{
    Constraint, InitialCondition, Load, MaterialProperty, Model, ResolvedReferencePoint, Section,
    TagSet,
};

/// Non-fatal issues found while writing a deck.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExportWarning {
    #[error("{context}: node set '{name}' does not exist, block skipped")]
    MissingNodeSet { context: String, name: String },

    #[error("{context}: element set '{name}' does not exist, block skipped")]
    MissingElementSet { context: String, name: String },

    #[error("section on '{elset}': material '{name}' does not exist, block skipped")]
    MissingMaterial { elset: String, name: String },

    #[error("{context}: orientation '{name}' does not exist, reference dropped")]
    MissingOrientation { context: String, name: String },

    #[error("constraint '{constraint}': reference point '{name}' does not exist, block skipped")]
    MissingReferencePoint { constraint: String, name: String },
}

/// A rendered deck plus everything decided while rendering it.
#[derive(Debug, Clone)]
pub struct Deck {
    pub text: String,
    pub warnings: Vec<ExportWarning>,
    /// Reference points with their allocated node tags.
    pub reference_points: Vec<ResolvedReferencePoint>,
}

pub struct DeckWriter;

impl DeckWriter {
    pub fn new() -> Self {
        Self
    }

    /// Render the full deck to a string.
    pub fn write(&self, model: &Model) -> Deck {
        let mut out = String::new();
        let mut warnings = Vec::new();
        let resolved = model.resolve_reference_points();

        self.write_heading(&mut out, model);
        self.write_nodes(&mut out, model, &resolved);
        self.write_elements(&mut out, model);
        self.write_normals(&mut out, model);
        self.write_distributions(&mut out, model);
        self.write_orientations(&mut out, model);
        self.write_sets(&mut out, model);
        self.write_springs(&mut out, model, &mut warnings);
        self.write_materials(&mut out, model);
        self.write_sections(&mut out, model, &mut warnings);
        self.write_surface_interactions(&mut out, model);
        self.write_contact_pairs(&mut out, model);
        self.write_initial_conditions(&mut out, model, &mut warnings);
        self.write_constraints(&mut out, model, &resolved, &mut warnings);
        self.write_steps(&mut out, model, &mut warnings);

        for warning in &warnings {
            warn!("export: {}", warning);
        }

        Deck {
            text: out,
            warnings,
            reference_points: resolved,
        }
    }

    /// Render and write the deck to `path`.
    pub fn export(&self, model: &Model, path: impl AsRef<Path>) -> CalxResult<Deck> {
        let deck = self.write(model);
        fs::write(path.as_ref(), &deck.text)?;
        info!(
            path = %path.as_ref().display(),
            nodes = model.node_count(),
            elements = model.element_count(),
            warnings = deck.warnings.len(),
            "wrote input deck"
        );
        Ok(deck)
    }

    fn comment_header(&self, out: &mut String, title: &str) {
        out.push_str("**\n");
        let _ = writeln!(out, "** {title} {:+<width$}", "", width = 58 - title.len());
        out.push_str("**\n");
    }

    fn write_heading(&self, out: &mut String, model: &Model) {
        out.push_str("**\n*Heading\n");
        let _ = writeln!(
            out,
            "Model: {}, Date: {}, Unit system: M_KG_S_C",
            model.name,
            Utc::now().format("%Y-%m-%d %H:%M:%S")
        );
    }

    fn write_nodes(&self, out: &mut String, model: &Model, resolved: &[ResolvedReferencePoint]) {
        self.comment_header(out, "Nodes");
        out.push_str("*Node\n");
        for (tag, p) in model.nodes() {
            let _ = writeln!(out, "{}, {:.6}, {:.6}, {:.6}", tag, p.x, p.y, p.z);
        }
        // Reference and rotation nodes share the reference point's location.
        for rp in resolved {
            let p = rp.location;
            let _ = writeln!(out, "{}, {:.6}, {:.6}, {:.6}", rp.ref_node, p.x, p.y, p.z);
            let _ = writeln!(out, "{}, {:.6}, {:.6}, {:.6}", rp.rot_node, p.x, p.y, p.z);
        }
    }

    fn write_elements(&self, out: &mut String, model: &Model) {
        self.comment_header(out, "Elements");

        // Group by kind, preserving first-occurrence order of each kind.
        let mut kinds: Vec<ElementKind> = Vec::new();
        for element in model.elements() {
            if !kinds.contains(&element.kind) {
                kinds.push(element.kind);
            }
        }

        for kind in kinds {
            let _ = writeln!(out, "*Element, Type={}", kind.keyword());
            for element in model.elements().iter().filter(|e| e.kind == kind) {
                let nodes: Vec<String> = element.nodes.iter().map(|n| n.to_string()).collect();
                let _ = writeln!(out, "{}, {}", element.tag, nodes.join(", "));
            }
        }
    }

    fn write_normals(&self, out: &mut String, model: &Model) {
        self.comment_header(out, "Normals");
        if model.normals.is_empty() {
            return;
        }
        out.push_str("*Normal\n");
        for (element, node, n) in &model.normals {
            let _ = writeln!(out, "{}, {}, {}, {}, {}", element, node, n.x, n.y, n.z);
        }
    }

    fn write_distributions(&self, out: &mut String, model: &Model) {
        self.comment_header(out, "Distributions");
        for dist in &model.distributions {
            let _ = writeln!(out, "*Distribution, Name={}", dist.name);
            // Unnamed default frame required before the per-element rows.
            out.push_str(", 1, 0, 0, 0, 1, 0\n");
            for (tag, frame) in &dist.frames {
                let x = frame.x_axis;
                let y = frame.y_axis;
                let _ = writeln!(
                    out,
                    "{}, {}, {}, {}, {}, {}, {}",
                    tag, x.x, x.y, x.z, y.x, y.y, y.z
                );
            }
        }
    }

    fn write_orientations(&self, out: &mut String, model: &Model) {
        self.comment_header(out, "Orientations");
        for (name, distribution) in &model.orientations {
            let _ = writeln!(out, "*Orientation, Name={}", name);
            let _ = writeln!(out, "{}", distribution);
        }
    }

    fn write_tag_block(&self, out: &mut String, set: &TagSet) {
        let mut line = String::new();
        for (i, tag) in set.tags.iter().enumerate() {
            let _ = write!(line, "{}", tag);
            if i < set.tags.len() - 1 {
                line.push_str(", ");
                if (i + 1) % 16 == 0 {
                    line.push('\n');
                }
            }
        }
        out.push_str(&line);
        out.push_str("\n\n");
    }

    fn write_sets(&self, out: &mut String, model: &Model) {
        self.comment_header(out, "Node sets");
        for set in model.node_sets.iter() {
            let _ = writeln!(out, "*NSet, Nset={}", set.name);
            self.write_tag_block(out, set);
        }

        self.comment_header(out, "Element sets");
        for set in model.element_sets.iter() {
            let _ = writeln!(out, "*Elset, Elset={}", set.name);
            self.write_tag_block(out, set);
        }

        // Each surface face list doubles as an element set named after the
        // surface and face number, which the surface block then references.
        for surface in &model.surfaces {
            for (face, elements) in &surface.faces {
                let name = format!("{}_S{}", surface.name, face);
                let _ = writeln!(out, "*Elset, Elset={}", name);
                self.write_tag_block(out, &TagSet::with_tags(name.clone(), elements.clone()));
            }
        }

        for surface in &model.surfaces {
            let _ = writeln!(out, "*Surface, Name={}, Type=Element", surface.name);
            for (face, _) in &surface.faces {
                let _ = writeln!(out, "{}_S{}, S{}", surface.name, face, face);
            }
        }
    }

    fn write_springs(&self, out: &mut String, model: &Model, warnings: &mut Vec<ExportWarning>) {
        if model.springs.is_empty() {
            return;
        }
        self.comment_header(out, "Springs");
        for spring in &model.springs {
            if !model.element_sets.contains(&spring.elset) {
                warnings.push(ExportWarning::MissingElementSet {
                    context: "spring".to_string(),
                    name: spring.elset.clone(),
                });
                continue;
            }
            let _ = writeln!(out, "*Spring, Elset={}", spring.elset);
            out.push('\n');
            let _ = writeln!(out, "{}", spring.elasticity);
        }
    }

    fn write_materials(&self, out: &mut String, model: &Model) {
        self.comment_header(out, "Materials");
        for material in &model.materials {
            let _ = writeln!(out, "*Material, Name={}", material.name);
            for property in &material.properties {
                self.write_material_property(out, property);
            }
        }
    }

    fn write_material_property(&self, out: &mut String, property: &MaterialProperty) {
        match property {
            MaterialProperty::Elastic { values } => {
                out.push_str("*Elastic\n");
                let _ = writeln!(out, "{}, {}", values[0], values[1]);
            }
            MaterialProperty::EngineeringConstants { values } => {
                out.push_str("*Elastic, Type=Engineering Constants\n");
                // 8 values on the first card, ninth wraps.
                let first: Vec<String> = values[..8].iter().map(|v| v.to_string()).collect();
                let _ = writeln!(out, "{},", first.join(", "));
                let _ = writeln!(out, "{}", values[8]);
            }
            MaterialProperty::UserDefined { values } => {
                let _ = writeln!(out, "*User material, Constants={}", values.len());
                for (i, v) in values.iter().enumerate() {
                    if i == values.len() - 1 {
                        let _ = writeln!(out, "{}", v);
                    } else {
                        let _ = write!(out, "{}, ", v);
                        if (i + 1) % 8 == 0 {
                            out.push('\n');
                        }
                    }
                }
            }
            MaterialProperty::Density { value } => {
                out.push_str("*Density\n");
                let _ = writeln!(out, "{}", value);
            }
            MaterialProperty::Expansion { values } => {
                let kind = if values.len() > 1 { "ORTHO" } else { "ISO" };
                let _ = writeln!(out, "*Expansion, Zero=20, Type={}", kind);
                let joined: Vec<String> = values.iter().map(|v| v.to_string()).collect();
                let _ = writeln!(out, "{}, 20", joined.join(", "));
            }
        }
    }

    fn check_section(
        &self,
        model: &Model,
        section: &Section,
        material: &str,
        warnings: &mut Vec<ExportWarning>,
    ) -> bool {
        if !model.element_sets.contains(section.elset()) {
            warnings.push(ExportWarning::MissingElementSet {
                context: "section".to_string(),
                name: section.elset().to_string(),
            });
            return false;
        }
        if !model.materials.iter().any(|m| m.name == material) {
            warnings.push(ExportWarning::MissingMaterial {
                elset: section.elset().to_string(),
                name: material.to_string(),
            });
            return false;
        }
        true
    }

    /// Orientation suffix for a section card, dropped with a warning when
    /// the orientation is not registered.
    fn orientation_suffix(
        &self,
        model: &Model,
        section: &Section,
        warnings: &mut Vec<ExportWarning>,
    ) -> String {
        match section.orientation() {
            None => String::new(),
            Some(name) => {
                if model.orientations.iter().any(|(n, _)| n == name) {
                    format!(", Orientation={}", name)
                } else {
                    warnings.push(ExportWarning::MissingOrientation {
                        context: format!("section on '{}'", section.elset()),
                        name: name.to_string(),
                    });
                    String::new()
                }
            }
        }
    }

    fn write_sections(&self, out: &mut String, model: &Model, warnings: &mut Vec<ExportWarning>) {
        self.comment_header(out, "Sections");
        for (name, section) in &model.sections {
            debug!(section = %name, elset = %section.elset(), "writing section");
            match section {
                Section::Solid(s) => {
                    if !self.check_section(model, section, &s.material, warnings) {
                        continue;
                    }
                    let orientation = self.orientation_suffix(model, section, warnings);
                    let _ = writeln!(
                        out,
                        "*Solid Section, Elset={}, Material={}{}",
                        s.elset, s.material, orientation
                    );
                }
                Section::Beam(s) => {
                    if !self.check_section(model, section, &s.material, warnings) {
                        continue;
                    }
                    let orientation = self.orientation_suffix(model, section, warnings);
                    let _ = writeln!(
                        out,
                        "*Beam Section, Elset={}, Material={}, Section={}{}",
                        s.elset, s.material, s.profile, orientation
                    );
                    let _ = writeln!(out, "{}, {}", s.height, s.width);
                    let d = s.direction;
                    let _ = writeln!(out, "{}, {}, {}", d.x, d.y, d.z);
                }
                Section::Shell(s) => {
                    if !self.check_section(model, section, &s.material, warnings) {
                        continue;
                    }
                    let orientation = self.orientation_suffix(model, section, warnings);
                    let offset = if s.offset != 0.0 {
                        format!(", Offset={}", s.offset)
                    } else {
                        String::new()
                    };
                    let _ = writeln!(
                        out,
                        "*Shell Section, Elset={}, Material={}{}{}",
                        s.elset, s.material, orientation, offset
                    );
                    let _ = writeln!(out, "{}", s.thickness);
                }
            }
        }
    }

    fn write_surface_interactions(&self, out: &mut String, model: &Model) {
        if model.surface_interactions.is_empty() {
            return;
        }
        self.comment_header(out, "Surface interactions");
        for si in &model.surface_interactions {
            let _ = writeln!(out, "*Surface interaction, Name={}", si.name);
            out.push_str("*Surface behaviour, Pressure-overclosure=Tied\n");
            out.push_str("10000000000\n");
            out.push_str("*Friction\n");
            out.push_str("0.1\n");
        }
    }

    fn write_contact_pairs(&self, out: &mut String, model: &Model) {
        if model.contact_pairs.is_empty() {
            return;
        }
        self.comment_header(out, "Contact pairs");
        for cp in &model.contact_pairs {
            let _ = writeln!(
                out,
                "*Contact pair, Interaction={}, Type=Surface to surface",
                cp.interaction
            );
            let _ = writeln!(out, "{}, {}", cp.master, cp.slave);
        }
    }

    fn write_initial_conditions(
        &self,
        out: &mut String,
        model: &Model,
        warnings: &mut Vec<ExportWarning>,
    ) {
        if model.initial_conditions.is_empty() {
            return;
        }
        self.comment_header(out, "Initial conditions");
        for condition in &model.initial_conditions {
            match condition {
                InitialCondition::Temperature { nset, value } => {
                    if !model.node_sets.contains(nset) {
                        warnings.push(ExportWarning::MissingNodeSet {
                            context: "initial condition".to_string(),
                            name: nset.clone(),
                        });
                        continue;
                    }
                    out.push_str("*Initial conditions, Type=Temperature\n");
                    let _ = writeln!(out, "{}, {}", nset, value);
                }
            }
        }
    }

    fn write_constraints(
        &self,
        out: &mut String,
        model: &Model,
        resolved: &[ResolvedReferencePoint],
        warnings: &mut Vec<ExportWarning>,
    ) {
        if model.constraints.is_empty() {
            return;
        }
        self.comment_header(out, "Constraints");
        for constraint in &model.constraints {
            match constraint {
                Constraint::RigidBody {
                    name,
                    reference_point,
                } => {
                    let Some(rp) = resolved.iter().find(|r| &r.name == reference_point) else {
                        warnings.push(ExportWarning::MissingReferencePoint {
                            constraint: name.clone(),
                            name: reference_point.clone(),
                        });
                        continue;
                    };
                    if !model.node_sets.contains(&rp.nset) {
                        warnings.push(ExportWarning::MissingNodeSet {
                            context: format!("rigid body '{}'", name),
                            name: rp.nset.clone(),
                        });
                        continue;
                    }
                    let _ = writeln!(
                        out,
                        "*Rigid body, Nset={}, Ref node={}, Rot node={}",
                        rp.nset, rp.ref_node, rp.rot_node
                    );
                }
            }
        }
    }

    fn write_steps(&self, out: &mut String, model: &Model, warnings: &mut Vec<ExportWarning>) {
        self.comment_header(out, "Steps");
        for step in &model.steps {
            out.push_str("*Step\n");
            let _ = writeln!(out, "*{}", step.step_type.keyword());
            out.push_str("*Output, Frequency=1\n");

            out.push_str("*Boundary\n");
            for bc in &step.boundary_conditions {
                if !model.node_sets.contains(&bc.nset) {
                    warnings.push(ExportWarning::MissingNodeSet {
                        context: "boundary condition".to_string(),
                        name: bc.nset.clone(),
                    });
                    continue;
                }
                let _ = writeln!(
                    out,
                    "{}, {}, {}, {}",
                    bc.nset, bc.dof_start, bc.dof_end, bc.value
                );
            }

            for load in &step.loads {
                self.write_load(out, model, load, warnings);
            }

            if step.binary_output {
                out.push_str("*Node output\n");
            } else {
                out.push_str("*Node file\n");
            }
            let _ = writeln!(out, "{}", step.node_output.join(", "));

            if step.binary_output {
                out.push_str("*Element output\n");
            } else {
                out.push_str("*El file\n");
            }
            let _ = writeln!(out, "{}", step.element_output.join(", "));

            out.push_str("*End step\n");
        }
    }

    fn write_load(
        &self,
        out: &mut String,
        model: &Model,
        load: &Load,
        warnings: &mut Vec<ExportWarning>,
    ) {
        match load {
            Load::Concentrated { nset, force } => {
                if !model.node_sets.contains(nset) {
                    warnings.push(ExportWarning::MissingNodeSet {
                        context: "concentrated load".to_string(),
                        name: nset.clone(),
                    });
                    return;
                }
                out.push_str("*Cload\n");
                // Zero components are omitted rather than written as 0.
                for (dof, component) in [(1, force.x), (2, force.y), (3, force.z)] {
                    if component != 0.0 {
                        let _ = writeln!(out, "{}, {}, {}", nset, dof, component);
                    }
                }
            }
            Load::Gravity {
                elset,
                direction,
                magnitude,
            } => {
                if !model.element_sets.contains(elset) {
                    warnings.push(ExportWarning::MissingElementSet {
                        context: "gravity load".to_string(),
                        name: elset.clone(),
                    });
                    return;
                }
                out.push_str("*Dload\n");
                let _ = writeln!(
                    out,
                    "{}, GRAV, {}, {}, {}, {}",
                    elset, magnitude, direction.x, direction.y, direction.z
                );
            }
        }
    }
}

impl Default for DeckWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{Element, ElementKind};
    use crate::model::{
        BoundaryCondition, Material, MaterialProperty, ReferencePoint, Section, SolidSection, Step,
    };
    use nalgebra::{Point3, Vector3};

    fn tet_model() -> Model {
        let mut model = Model::new("test");
        model.add_node(1, Point3::new(0.0, 0.0, 0.0)).unwrap();
        model.add_node(2, Point3::new(1.0, 0.0, 0.0)).unwrap();
        model.add_node(3, Point3::new(0.0, 1.0, 0.0)).unwrap();
        model.add_node(4, Point3::new(0.0, 0.0, 1.0)).unwrap();
        model
            .add_element(Element::new(1, ElementKind::C3D4, vec![1, 2, 3, 4]).unwrap())
            .unwrap();
        model.populate_all_sets();
        model
    }

    #[test]
    fn test_node_coordinates_six_decimals() {
        let mut model = Model::new("m");
        model
            .add_node(1, Point3::new(0.123456789, -2.0, 1e-8))
            .unwrap();
        let deck = DeckWriter::new().write(&model);
        assert!(deck.text.contains("1, 0.123457, -2.000000, 0.000000"));
    }

    #[test]
    fn test_elements_grouped_by_type() {
        let mut model = tet_model();
        model.add_node(5, Point3::new(2.0, 0.0, 0.0)).unwrap();
        model
            .add_element(Element::new(2, ElementKind::B31, vec![1, 5]).unwrap())
            .unwrap();
        model
            .add_element(Element::new(3, ElementKind::C3D4, vec![1, 2, 3, 4]).unwrap())
            .unwrap();

        let deck = DeckWriter::new().write(&model);
        let c3d4 = deck.text.find("*Element, Type=C3D4").unwrap();
        let b31 = deck.text.find("*Element, Type=B31").unwrap();
        assert!(c3d4 < b31);
        // Both C3D4 elements land under the single C3D4 header.
        let c3d4_block = &deck.text[c3d4..b31];
        assert!(c3d4_block.contains("\n1, 1, 2, 3, 4"));
        assert!(c3d4_block.contains("\n3, 1, 2, 3, 4"));
    }

    #[test]
    fn test_set_wrap_at_sixteen_entries() {
        let mut model = Model::new("m");
        for tag in 1..=20 {
            model
                .add_node(tag, Point3::new(tag as f64, 0.0, 0.0))
                .unwrap();
        }
        model.node_sets.append("big", 1..=20usize);

        let deck = DeckWriter::new().write(&model);
        let start = deck.text.find("*NSet, Nset=big").unwrap();
        let block: Vec<&str> = deck.text[start..].lines().take(3).collect();
        assert_eq!(block[1].matches(", ").count(), 16);
        assert!(block[1].ends_with("16, "));
        assert_eq!(block[2], "17, 18, 19, 20");
    }

    #[test]
    fn test_missing_set_skips_block_with_warning() {
        let mut model = tet_model();
        let mut step = Step::default();
        step.add_boundary_condition(BoundaryCondition::fixed("no_such_set"));
        model.add_step(step);

        let deck = DeckWriter::new().write(&model);
        assert_eq!(
            deck.warnings,
            vec![ExportWarning::MissingNodeSet {
                context: "boundary condition".to_string(),
                name: "no_such_set".to_string(),
            }]
        );
        assert!(!deck.text.contains("no_such_set"));
    }

    #[test]
    fn test_reference_point_nodes_appended() {
        let mut model = tet_model();
        model.node_sets.append("grip", [1, 2]);
        model.add_reference_point(ReferencePoint::new(
            "rp",
            Point3::new(0.5, 0.5, 0.0),
            "grip",
        ));
        model.add_constraint(Constraint::rigid_body("hold", "rp"));

        let deck = DeckWriter::new().write(&model);
        assert!(deck.text.contains("5, 0.500000, 0.500000, 0.000000"));
        assert!(deck.text.contains("6, 0.500000, 0.500000, 0.000000"));
        assert!(deck
            .text
            .contains("*Rigid body, Nset=grip, Ref node=5, Rot node=6"));
        assert!(deck.warnings.is_empty());
    }

    #[test]
    fn test_engineering_constants_wrap() {
        let mut model = tet_model();
        model.add_material(
            Material::new("spruce").with_property(
                MaterialProperty::engineering_constants(&[
                    9700e6, 400e6, 220e6, 0.35, 0.6, 0.55, 400e6, 250e6, 25e6,
                ])
                .unwrap(),
            ),
        );
        model.add_section(
            "s",
            Section::Solid(SolidSection::new("spruce", crate::model::ALL_SET)),
        );

        let deck = DeckWriter::new().write(&model);
        assert!(deck.text.contains("*Elastic, Type=Engineering Constants\n"));
        assert!(deck
            .text
            .contains("9700000000, 400000000, 220000000, 0.35, 0.6, 0.55, 400000000, 250000000,\n25000000\n"));
        assert!(deck
            .text
            .contains("*Solid Section, Elset=all, Material=spruce\n"));
    }

    #[test]
    fn test_step_block_structure() {
        let mut model = tet_model();
        model.node_sets.append("tip", [4]);
        let mut step = Step::default();
        step.add_load(Load::concentrated(
            "tip",
            Vector3::new(0.0, 0.0, -1000.0),
        ));
        step.add_boundary_condition(BoundaryCondition::fixed("all"));
        model.add_step(step);

        let deck = DeckWriter::new().write(&model);
        assert!(deck.text.contains("*Step\n*Static\n*Output, Frequency=1\n"));
        assert!(deck.text.contains("*Boundary\nall, 1, 3, 0\n"));
        assert!(deck.text.contains("*Cload\ntip, 3, -1000\n"));
        assert!(!deck.text.contains("tip, 1, 0\n"));
        assert!(deck.text.contains("*Node output\nU\n"));
        assert!(deck.text.contains("*Element output\nS, E\n*End step\n"));
    }
}
