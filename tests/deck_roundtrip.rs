//! Write a deck to disk and read its mesh back.

use calx::prelude::*;
use nalgebra::Point3;

fn two_tet_model() -> Model {
    let mut model = Model::new("twotets");
    let coords = [
        (1, [0.0, 0.0, 0.0]),
        (2, [1.0, 0.0, 0.0]),
        (3, [0.0, 1.0, 0.0]),
        (4, [0.0, 0.0, 1.0]),
        (5, [1.0, 1.0, 1.0]),
    ];
    for (tag, [x, y, z]) in coords {
        model.add_node(tag, Point3::new(x, y, z)).unwrap();
    }
    model
        .add_element(Element::new(1, ElementKind::C3D4, vec![1, 2, 3, 4]).unwrap())
        .unwrap();
    model
        .add_element(Element::new(2, ElementKind::C3D4, vec![2, 3, 4, 5]).unwrap())
        .unwrap();
    model.populate_all_sets();
    model
}

#[test]
fn roundtrip_preserves_mesh() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("twotets.inp");

    let model = two_tet_model();
    let deck = DeckWriter::new().export(&model, &path).unwrap();
    assert!(deck.warnings.is_empty());

    let reloaded = calx::reader::read(&path).unwrap();
    assert_eq!(reloaded.name, "twotets");
    assert_eq!(reloaded.node_count(), model.node_count());
    assert_eq!(reloaded.element_count(), model.element_count());

    for (tag, original) in model.nodes() {
        let read_back = reloaded.node(*tag).unwrap();
        for (a, b) in original.coords.iter().zip(read_back.coords.iter()) {
            assert!((a - b).abs() < 5e-7, "coordinate drift beyond 6 decimals");
        }
    }

    for element in model.elements() {
        let read_back = reloaded.element(element.tag).unwrap();
        assert_eq!(read_back.kind, element.kind);
        assert_eq!(read_back.nodes, element.nodes);
    }

    assert_eq!(
        reloaded.node_sets.get("all").unwrap().tags,
        vec![1, 2, 3, 4, 5]
    );
    assert_eq!(reloaded.element_sets.get("all").unwrap().tags, vec![1, 2]);
}

#[test]
fn roundtrip_preserves_six_decimal_coordinates() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("precise.inp");

    let mut model = Model::new("precise");
    model
        .add_node(1, Point3::new(0.1234567, -9.8765432, 1234.0000004))
        .unwrap();
    DeckWriter::new().export(&model, &path).unwrap();

    let reloaded = calx::reader::read(&path).unwrap();
    let p = reloaded.node(1).unwrap();
    // Exactly what the writer printed, not the pre-rounding values.
    assert_eq!(p.x, 0.123457);
    assert_eq!(p.y, -9.876543);
    assert_eq!(p.z, 1234.0);
}

#[test]
fn roundtrip_wrapped_set_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wrapped.inp");

    let mut model = Model::new("wrapped");
    for tag in 1..=40 {
        model
            .add_node(tag, Point3::new(tag as f64, 0.0, 0.0))
            .unwrap();
    }
    model.node_sets.append("everything", 1..=40usize);
    DeckWriter::new().export(&model, &path).unwrap();

    let reloaded = calx::reader::read(&path).unwrap();
    let tags = &reloaded.node_sets.get("everything").unwrap().tags;
    assert_eq!(tags.len(), 40);
    assert_eq!(tags.first(), Some(&1));
    assert_eq!(tags.last(), Some(&40));
}

#[test]
fn block_order_is_fixed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("order.inp");

    let mut model = two_tet_model();
    model.add_material(
        Material::new("spruce")
            .with_property(MaterialProperty::elastic(&[9700e6, 0.4]).unwrap())
            .with_property(MaterialProperty::density(450.0)),
    );
    model.add_section("s", Section::Solid(SolidSection::new("spruce", ALL_SET)));
    model
        .initial_conditions
        .push(InitialCondition::temperature(ALL_SET, 20.0));
    model.add_reference_point(ReferencePoint::new(
        "rp",
        Point3::new(0.5, 0.5, 0.5),
        ALL_SET,
    ));
    model.add_constraint(Constraint::rigid_body("hold", "rp"));
    let mut step = Step::default();
    step.add_boundary_condition(BoundaryCondition::fixed(ALL_SET));
    model.add_step(step);

    let deck = DeckWriter::new().export(&model, &path).unwrap();
    assert!(deck.warnings.is_empty());

    let text = std::fs::read_to_string(&path).unwrap();
    let positions: Vec<usize> = [
        "*Heading",
        "*Node\n",
        "*Element, Type=C3D4",
        "*NSet, Nset=all",
        "*Elset, Elset=all",
        "*Material, Name=spruce",
        "*Solid Section",
        "*Initial conditions",
        "*Rigid body",
        "*Step",
        "*End step",
    ]
    .iter()
    .map(|needle| text.find(needle).unwrap_or_else(|| panic!("missing {needle}")))
    .collect();

    for pair in positions.windows(2) {
        assert!(pair[0] < pair[1], "deck blocks out of order");
    }
}

#[test]
fn reference_point_tags_do_not_collide() {
    let mut model = two_tet_model();
    model.add_reference_point(ReferencePoint::new("rp", Point3::origin(), ALL_SET));
    model.add_constraint(Constraint::rigid_body("hold", "rp"));

    let deck = DeckWriter::new().write(&model);
    let rp = &deck.reference_points[0];
    assert_eq!(rp.ref_node, 6);
    assert_eq!(rp.rot_node, 7);
    assert!(deck
        .text
        .contains("*Rigid body, Nset=all, Ref node=6, Rot node=7"));
}
