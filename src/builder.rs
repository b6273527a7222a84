//! Model assembly workflows
//!
//! One builder per modeling workflow, each following the same fixed
//! sequence: nodes, node sets, elements, element sets, derived sets,
//! orientations, material, sections, then a single solution step. The
//! builders consume plain coordinate/topology arrays so callers can feed
//! them from any mesher.

use nalgebra::{Point3, Vector3};
use tracing::{debug, warn};

use crate::element::{Element, ElementKind};
use crate::error::CalxResult;
use crate::model::{
    BeamSection, BoundaryCondition, Constraint, Distribution, Frame, InitialCondition, Load,
    Material, MaterialProperty, Model, ReferencePoint, Section, SolidSection, Step, StepType,
    TagSet,
};
use crate::propmap::PropertyMap;

const DISTRIBUTION_NAME: &str = "distro";
const ORIENTATION_NAME: &str = "ori";

/// Default softwood material for 1D members.
fn default_beam_material() -> Material {
    Material::new("WOODISO")
        .with_property(MaterialProperty::Elastic {
            values: [9700e6, 0.4],
        })
        .with_property(MaterialProperty::density(480.0))
}

/// Default orthotropic spruce with hygric expansion for solid models.
fn default_solid_material() -> Material {
    Material::new("spruce")
        .with_property(MaterialProperty::EngineeringConstants {
            values: [9700e6, 400e6, 220e6, 0.35, 0.6, 0.55, 400e6, 250e6, 25e6],
        })
        .with_property(MaterialProperty::density(450.0))
        .with_property(MaterialProperty::expansion(vec![0.0, 0.003, 0.007]))
}

/// Inputs for a 1D member model.
#[derive(Debug, Clone, Default)]
pub struct BeamModelInput {
    pub name: String,
    pub nodes: Vec<(usize, Point3<f64>)>,
    /// Element tag -> node tags; 2 nodes make a B31, 3 a B32, anything
    /// else is skipped.
    pub elements: Vec<(usize, Vec<usize>)>,
    pub node_sets: Vec<TagSet>,
    pub element_sets: Vec<TagSet>,
    /// Explicit sections consuming their element sets; remaining members
    /// fall back to the default rectangle.
    pub sections: Vec<(String, BeamSection)>,
    pub default_width: f64,
    pub default_height: f64,
    pub material: Option<Material>,
    pub loads: Vec<Load>,
    pub boundary_conditions: Vec<BoundaryCondition>,
}

impl BeamModelInput {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default_width: 0.05,
            default_height: 0.15,
            ..Self::default()
        }
    }
}

/// A built 1D model plus its orientation sidecar records.
#[derive(Debug, Clone)]
pub struct BeamModel {
    pub model: Model,
    /// Per-element local frames, written next to the deck as
    /// `orientations.prop`.
    pub orientations: PropertyMap,
}

/// Assemble a 1D member model.
///
/// Members are partitioned into `beamElements` and `columnElements` by
/// the verticality of their axis; explicit sections consume their element
/// sets and the default rectangular sections cover whatever remains.
pub fn build_beam_model(input: BeamModelInput) -> CalxResult<BeamModel> {
    let mut model = Model::new(input.name);

    for (tag, position) in input.nodes {
        model.add_node(tag, position)?;
    }
    for set in input.node_sets {
        model.node_sets.append(&set.name, set.tags);
    }

    for (tag, nodes) in input.elements {
        let kind = match nodes.len() {
            2 => ElementKind::B31,
            3 => ElementKind::B32,
            n => {
                debug!(tag, nodes = n, "skipping non-member element");
                continue;
            }
        };
        model.add_element(Element::new(tag, kind, nodes)?)?;
    }
    for set in input.element_sets {
        model.element_sets.append(&set.name, set.tags);
    }

    // Partition members by the verticality of their axis.
    let mut beams = Vec::new();
    let mut columns = Vec::new();
    for element in model.elements() {
        let p0 = model
            .node(element.nodes[0])
            .copied()
            .unwrap_or_else(Point3::origin);
        let p1 = model
            .node(*element.nodes.last().unwrap())
            .copied()
            .unwrap_or_else(Point3::origin);
        let axis = (p0 - p1).try_normalize(1e-12).unwrap_or_else(Vector3::x);
        if axis.dot(&Vector3::z()).abs() > 0.9999 {
            columns.push(element.tag);
        } else {
            beams.push(element.tag);
        }
    }

    model.populate_all_sets();

    let mut distro = Distribution::new(DISTRIBUTION_NAME);
    let tags: Vec<usize> = model.elements().iter().map(|e| e.tag).collect();
    for tag in tags {
        let frame = model.orientation_for_line_element(tag, Vector3::z())?;
        distro.add(tag, frame);
    }

    let mut orientations = PropertyMap::new();
    for (tag, frame) in &distro.frames {
        orientations.add_frame(*tag as i32, frame);
    }

    model.add_distribution(distro);
    model.add_orientation(ORIENTATION_NAME, DISTRIBUTION_NAME);

    let material = input.material.unwrap_or_else(default_beam_material);
    let material_name = material.name.clone();
    model.add_material(material);

    // Explicit sections claim their members first.
    for (name, mut section) in input.sections {
        if section.elset.is_empty() {
            continue;
        }
        let Some(set) = model.element_sets.get(&section.elset) else {
            warn!(section = %name, elset = %section.elset, "section element set not found, skipped");
            continue;
        };
        let claimed: std::collections::HashSet<usize> = set.tags.iter().copied().collect();
        beams.retain(|tag| !claimed.contains(tag));
        columns.retain(|tag| !claimed.contains(tag));

        section.material = material_name.clone();
        section.orientation = Some(ORIENTATION_NAME.to_string());
        model.add_section(name, Section::Beam(section));
    }

    model.element_sets.replace("beamElements", beams);
    model.element_sets.replace("columnElements", columns);

    model.add_section(
        "beamSection",
        Section::Beam(
            BeamSection::new(
                &material_name,
                "beamElements",
                input.default_width,
                input.default_height,
            )
            .with_direction(Vector3::z())
            .with_orientation(ORIENTATION_NAME),
        ),
    );
    model.add_section(
        "columnSection",
        Section::Beam(
            BeamSection::new(
                &material_name,
                "columnElements",
                input.default_width,
                input.default_height,
            )
            .with_direction(Vector3::x())
            .with_orientation(ORIENTATION_NAME),
        ),
    );

    let mut step = Step::new(StepType::Static);
    for load in input.loads {
        step.add_load(load);
    }
    for bc in input.boundary_conditions {
        step.add_boundary_condition(bc);
    }
    model.add_step(step);

    Ok(BeamModel {
        model,
        orientations,
    })
}

/// Inputs for a solid (tetrahedral) model.
#[derive(Debug, Clone, Default)]
pub struct SolidModelInput {
    pub name: String,
    pub nodes: Vec<(usize, Point3<f64>)>,
    /// Element tag -> node tags in Gmsh order; 4 nodes make a C3D4, 10 a
    /// C3D10 (with the mesher's node permutation corrected), anything
    /// else is skipped.
    pub elements: Vec<(usize, Vec<usize>)>,
    pub node_sets: Vec<TagSet>,
    pub element_sets: Vec<TagSet>,
    /// Per-element material frames (e.g. grain directions).
    pub frames: Vec<(usize, Frame)>,
    pub material: Option<Material>,
    pub reference_points: Vec<ReferencePoint>,
    pub constraints: Vec<Constraint>,
    pub initial_temperature: Option<f64>,
    pub step_type: Option<StepType>,
    pub loads: Vec<Load>,
    pub boundary_conditions: Vec<BoundaryCondition>,
}

impl SolidModelInput {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Assemble a solid model with an orientation distribution and a single
/// solid section over every element.
pub fn build_solid_model(input: SolidModelInput) -> CalxResult<Model> {
    let mut model = Model::new(input.name);

    for (tag, position) in input.nodes {
        model.add_node(tag, position)?;
    }
    for set in input.node_sets {
        model.node_sets.append(&set.name, set.tags);
    }
    for point in input.reference_points {
        model.add_reference_point(point);
    }

    for (tag, nodes) in input.elements {
        let element = match nodes.len() {
            4 => Element::new(tag, ElementKind::C3D4, nodes)?,
            10 => Element::c3d10_from_gmsh(tag, nodes)?,
            n => {
                debug!(tag, nodes = n, "skipping non-tetrahedral element");
                continue;
            }
        };
        model.add_element(element)?;
    }
    for set in input.element_sets {
        model.element_sets.append(&set.name, set.tags);
    }

    model.populate_all_sets();

    let mut distro = Distribution::new(DISTRIBUTION_NAME);
    for (tag, frame) in input.frames {
        distro.add(tag, frame);
    }
    model.add_distribution(distro);
    model.add_orientation(ORIENTATION_NAME, DISTRIBUTION_NAME);

    let material = input.material.unwrap_or_else(default_solid_material);
    let material_name = material.name.clone();
    model.add_material(material);

    model.add_section(
        "section",
        Section::Solid(
            SolidSection::new(material_name, crate::model::ALL_SET)
                .with_orientation(ORIENTATION_NAME),
        ),
    );

    if let Some(value) = input.initial_temperature {
        model
            .initial_conditions
            .push(InitialCondition::temperature(crate::model::ALL_SET, value));
    }
    for constraint in input.constraints {
        model.add_constraint(constraint);
    }

    let mut step = Step::new(input.step_type.unwrap_or(StepType::Static));
    for load in input.loads {
        step.add_load(load);
    }
    for bc in input.boundary_conditions {
        step.add_boundary_condition(bc);
    }
    model.add_step(step);

    Ok(model)
}
