//! End-to-end modeling workflows: build, export, post-process.

use calx::prelude::*;
use nalgebra::{Point3, Vector3};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[test]
fn beam_workflow_exports_deck_and_sidecar() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let deck_path = dir.path().join("frame.inp");
    let prop_path = dir.path().join("orientations.prop");

    let mut input = BeamModelInput::new("frame");
    input.nodes = vec![
        (1, Point3::new(0.0, 0.0, 0.0)),
        (2, Point3::new(0.0, 0.0, 3.0)),
        (3, Point3::new(4.0, 0.0, 3.0)),
        (4, Point3::new(4.0, 0.0, 0.0)),
    ];
    input.elements = vec![(1, vec![1, 2]), (2, vec![2, 3]), (3, vec![3, 4])];
    input.node_sets = vec![TagSet::with_tags("supports", vec![1, 4])];
    input.loads = vec![Load::gravity(ALL_SET, Vector3::new(0.0, 0.0, -9.81))];
    input.boundary_conditions = vec![BoundaryCondition::fixed("supports")];

    let built = build_beam_model(input).unwrap();
    let deck = DeckWriter::new().export(&built.model, &deck_path).unwrap();
    built.orientations.save(&prop_path).unwrap();

    assert!(deck.warnings.is_empty());
    let text = std::fs::read_to_string(&deck_path).unwrap();
    assert!(text.contains("*Element, Type=B31"));
    assert!(text.contains("*Distribution, Name=distro"));
    assert!(text.contains("*Orientation, Name=ori"));
    assert!(text.contains("*Beam Section, Elset=beamElements, Material=WOODISO, Section=RECT, Orientation=ori"));
    assert!(text.contains("*Dload\nall, GRAV, 9.81, 0, 0, -1"));
    assert!(text.contains("supports, 1, 3, 0"));

    // Sidecar: count + three (tag + 6 doubles) records.
    let sidecar = std::fs::read(&prop_path).unwrap();
    assert_eq!(sidecar.len(), 4 + 3 * (4 + 48));
    assert_eq!(&sidecar[0..4], &3i32.to_le_bytes());
}

#[test]
fn solid_workflow_with_contact_and_constraints() {
    let mut input = SolidModelInput::new("joint");
    input.nodes = vec![
        (1, Point3::new(0.0, 0.0, 0.0)),
        (2, Point3::new(1.0, 0.0, 0.0)),
        (3, Point3::new(0.0, 1.0, 0.0)),
        (4, Point3::new(0.0, 0.0, 1.0)),
    ];
    input.elements = vec![(1, vec![1, 2, 3, 4])];
    input.node_sets = vec![TagSet::with_tags("grip", vec![1, 2, 3])];
    input.reference_points = vec![ReferencePoint::new(
        "handle",
        Point3::new(0.3, 0.3, 0.0),
        "grip",
    )];
    input.constraints = vec![Constraint::rigid_body("hold", "handle")];
    input.initial_temperature = Some(20.0);
    input.step_type = Some(StepType::CoupledThermal);
    input.boundary_conditions = vec![
        BoundaryCondition::fixed("grip"),
        BoundaryCondition::temperature(ALL_SET, 12.0),
    ];

    let mut model = build_solid_model(input).unwrap();

    let mut surface = Surface::new("contact_a");
    surface.add_face(1, vec![1]);
    model.surfaces.push(surface);
    model
        .surface_interactions
        .push(SurfaceInteraction::new("tied"));
    model.contact_pairs.push(ContactPair::new(
        "pair",
        "tied",
        "contact_a",
        "contact_a",
    ));

    let deck = DeckWriter::new().write(&model);
    assert!(deck.warnings.is_empty(), "warnings: {:?}", deck.warnings);

    assert!(deck.text.contains("*Elset, Elset=contact_a_S1"));
    assert!(deck
        .text
        .contains("*Surface, Name=contact_a, Type=Element\ncontact_a_S1, S1"));
    assert!(deck.text.contains("*Surface interaction, Name=tied"));
    assert!(deck
        .text
        .contains("*Contact pair, Interaction=tied, Type=Surface to surface"));
    assert!(deck
        .text
        .contains("*Elastic, Type=Engineering Constants"));
    assert!(deck.text.contains("*Expansion, Zero=20, Type=ORTHO\n0, 0.003, 0.007, 20"));
    assert!(deck
        .text
        .contains("*Solid Section, Elset=all, Material=spruce, Orientation=ori"));
    assert!(deck
        .text
        .contains("*Initial conditions, Type=Temperature\nall, 20"));
    assert!(deck
        .text
        .contains("*Step\n*Coupled temperature-displacement, Steady state\n"));
    assert!(deck.text.contains("all, 11, 11, 12"));
}

#[test]
fn result_pipeline_restricts_fields_to_skin() {
    // Two glued tets: node 1 is interior to nothing here, but dropping a
    // node from the surface exercises the row restriction.
    let mut results = Results::new();
    results.nodes = vec![
        (1, Point3::new(0.0, 0.0, 0.0)),
        (2, Point3::new(1.0, 0.0, 0.0)),
        (3, Point3::new(0.0, 1.0, 0.0)),
        (4, Point3::new(0.0, 0.0, 1.0)),
    ];
    results.elements.push(ResultElement {
        id: 1,
        type_code: 3,
        nodes: vec![1, 2, 3, 4],
    });

    let mut stress = ResultField::new("STRESS");
    for (name, values) in [
        ("SXX", vec![100.0, 0.0, 0.0, 0.0]),
        ("SYY", vec![0.0; 4]),
        ("SZZ", vec![0.0; 4]),
        ("SXY", vec![0.0; 4]),
        ("SYZ", vec![0.0; 4]),
        ("SZX", vec![0.0; 4]),
    ] {
        stress.add(name, values);
    }
    results.add_field(stress);
    results.derive_components().unwrap();

    let mesh = results.visual_mesh().unwrap();
    assert_eq!(mesh.vertex_count(), 4);
    assert_eq!(mesh.face_count(), 4);

    let restricted = results.restrict(&mesh.node_rows).unwrap();
    let stress = restricted.iter().find(|f| f.name == "STRESS").unwrap();
    let vm = stress.component("VONMISES").unwrap();
    assert_eq!(vm.len(), mesh.vertex_count());
    assert!((vm[0] - 100.0).abs() < 1e-3);

    // Color every vertex from the derived channel.
    let max = vm.iter().cloned().fold(0.0f32, f32::max);
    let colors = Gradient::unsigned(max as f64).colors(vm);
    assert_eq!(colors.len(), mesh.vertex_count());
    assert_eq!(colors[0], Color::RED);
}
