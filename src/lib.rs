//! calx - CalculiX model assembly and result post-processing
//!
//! A library for building finite-element models from plain coordinate and
//! topology arrays, writing them as CalculiX `.inp` input decks, reading
//! the mesh subset of that format back, and post-processing solver result
//! fields for visualization:
//! - FE data model (nodes, elements, sets, materials, sections, loads,
//!   boundary conditions, constraints, steps)
//! - Deterministic `.inp` serialization with a companion mesh reader
//! - Boundary skin extraction via face deduplication
//! - Von Mises and signed principal invariants of tensor fields
//! - Color gradients and per-element orientation sidecars
//!
//! ## Example
//! ```rust
//! use calx::prelude::*;
//! use nalgebra::{Point3, Vector3};
//!
//! let mut model = Model::new("cantilever");
//!
//! // A single tetrahedron
//! model.add_node(1, Point3::new(0.0, 0.0, 0.0)).unwrap();
//! model.add_node(2, Point3::new(1.0, 0.0, 0.0)).unwrap();
//! model.add_node(3, Point3::new(0.0, 1.0, 0.0)).unwrap();
//! model.add_node(4, Point3::new(0.0, 0.0, 1.0)).unwrap();
//! model
//!     .add_element(Element::new(1, ElementKind::C3D4, vec![1, 2, 3, 4]).unwrap())
//!     .unwrap();
//! model.populate_all_sets();
//!
//! model.add_material(
//!     Material::new("steel")
//!         .with_property(MaterialProperty::elastic(&[210e9, 0.3]).unwrap())
//!         .with_property(MaterialProperty::density(7850.0)),
//! );
//! model.add_section("s", Section::Solid(SolidSection::new("steel", "all")));
//!
//! let mut step = Step::default();
//! step.add_boundary_condition(BoundaryCondition::fixed("all"));
//! step.add_load(Load::concentrated("all", Vector3::new(0.0, 0.0, -1000.0)));
//! model.add_step(step);
//!
//! let deck = DeckWriter::new().write(&model);
//! assert!(deck.warnings.is_empty());
//! assert!(deck.text.contains("*Element, Type=C3D4"));
//!
//! // Boundary skin of the mesh
//! let skin = extract_skin(model.elements()).unwrap();
//! assert_eq!(skin.len(), 4);
//! ```

pub mod builder;
pub mod element;
pub mod error;
pub mod gradient;
pub mod invariants;
pub mod model;
pub mod propmap;
pub mod reader;
pub mod results;
pub mod skin;
pub mod writer;

// Re-export common types
pub mod prelude {
    pub use crate::builder::{
        build_beam_model, build_solid_model, BeamModel, BeamModelInput, SolidModelInput,
    };
    pub use crate::element::{frd_visualization_faces, Element, ElementKind};
    pub use crate::error::{CalxError, CalxResult};
    pub use crate::gradient::{Color, Gradient};
    pub use crate::invariants::{principal_field, von_mises, von_mises_field, PrincipalField};
    pub use crate::model::{
        BeamSection, BoundaryCondition, Constraint, ContactPair, Distribution, Frame,
        InitialCondition, Load, Material, MaterialProperty, Model, ReferencePoint, Section,
        SetCollection, ShellSection, SolidSection, Spring, Step, StepType, Surface,
        SurfaceInteraction, TagSet, ALL_SET,
    };
    pub use crate::propmap::PropertyMap;
    pub use crate::results::{ResultElement, ResultField, Results};
    pub use crate::skin::{extract_skin, FaceBag, SkinFace, VisualMesh};
    pub use crate::writer::{Deck, DeckWriter, ExportWarning};
}
