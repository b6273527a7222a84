//! Solver result fields and surface extraction
//!
//! Holds the node/element/field arrays an external result reader parsed
//! out of a solver run, derives the invariant components used for
//! plotting, and reduces the volume mesh to its visible skin with field
//! arrays restricted to the surviving vertex rows.

use nalgebra::Point3;
use tracing::debug;

use crate::element::frd_visualization_faces;
use crate::error::{CalxError, CalxResult};
use crate::invariants::{principal_field, von_mises_field};
use crate::skin::{FaceBag, VisualMesh};

/// An element as a result file describes it: numeric type code plus node
/// tags.
#[derive(Debug, Clone)]
pub struct ResultElement {
    pub id: usize,
    pub type_code: i32,
    pub nodes: Vec<usize>,
}

/// One named field: ordered component name -> per-node array.
#[derive(Debug, Clone, Default)]
pub struct ResultField {
    pub name: String,
    components: Vec<(String, Vec<f32>)>,
}

impl ResultField {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            components: Vec::new(),
        }
    }

    pub fn add(&mut self, component: impl Into<String>, values: Vec<f32>) -> &mut Self {
        self.components.push((component.into(), values));
        self
    }

    pub fn component(&self, name: &str) -> Option<&[f32]> {
        self.components
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_slice())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.component(name).is_some()
    }

    pub fn components(&self) -> impl Iterator<Item = (&str, &[f32])> {
        self.components
            .iter()
            .map(|(n, v)| (n.as_str(), v.as_slice()))
    }

    fn six(&self, names: [&str; 6]) -> Option<[&[f32]; 6]> {
        Some([
            self.component(names[0])?,
            self.component(names[1])?,
            self.component(names[2])?,
            self.component(names[3])?,
            self.component(names[4])?,
            self.component(names[5])?,
        ])
    }
}

/// Parsed results for one solution step.
#[derive(Debug, Clone, Default)]
pub struct Results {
    /// Nodes in result-file order; field arrays align with this order.
    pub nodes: Vec<(usize, Point3<f64>)>,
    pub elements: Vec<ResultElement>,
    fields: Vec<ResultField>,
}

impl Results {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_field(&mut self, field: ResultField) -> &mut Self {
        self.fields.push(field);
        self
    }

    pub fn field(&self, name: &str) -> Option<&ResultField> {
        self.fields.iter().find(|f| f.name == name)
    }

    fn field_mut(&mut self, name: &str) -> Option<&mut ResultField> {
        self.fields.iter_mut().find(|f| f.name == name)
    }

    pub fn fields(&self) -> impl Iterator<Item = &ResultField> {
        self.fields.iter()
    }

    /// Append the derived plotting components to the raw fields:
    /// VONMISES and SIGNED for the stress and strain tensors, ALL
    /// (magnitude) for the displacement vector. Fields or components that
    /// are absent are left alone; already-derived components are not
    /// recomputed.
    pub fn derive_components(&mut self) -> CalxResult<()> {
        for (field_name, names) in [
            ("STRESS", ["SXX", "SYY", "SZZ", "SXY", "SYZ", "SZX"]),
            ("TOSTRAIN", ["EXX", "EYY", "EZZ", "EXY", "EYZ", "EZX"]),
        ] {
            let Some(field) = self.field(field_name) else {
                continue;
            };
            if field.contains("VONMISES") {
                continue;
            }
            let Some([xx, yy, zz, xy, yz, zx]) = field.six(names) else {
                debug!(field = field_name, "tensor components incomplete, skipping derivation");
                continue;
            };

            let vm = von_mises_field(xx, yy, zz, xy, yz, zx)?;
            let principal = principal_field(xx, yy, zz, xy, yz, zx)?;

            let field = self.field_mut(field_name).unwrap();
            field.add("VONMISES", vm);
            field.add("SIGNED", principal.signed);
        }

        if let Some(disp) = self.field("DISP") {
            if !disp.contains("ALL") {
                if let (Some(d1), Some(d2), Some(d3)) = (
                    disp.component("D1"),
                    disp.component("D2"),
                    disp.component("D3"),
                ) {
                    let all: Vec<f32> = d1
                        .iter()
                        .zip(d2)
                        .zip(d3)
                        .map(|((&x, &y), &z)| {
                            ((x as f64).powi(2) + (y as f64).powi(2) + (z as f64).powi(2)).sqrt()
                                as f32
                        })
                        .collect();
                    self.field_mut("DISP").unwrap().add("ALL", all);
                }
            }
        }

        Ok(())
    }

    /// Rebuild the visible surface: deduplicate every element's
    /// visualization faces and remap the survivors onto a dense mesh.
    pub fn visual_mesh(&self) -> CalxResult<VisualMesh> {
        let mut bag = FaceBag::new();
        for element in &self.elements {
            for face in frd_visualization_faces(element.type_code, &element.nodes) {
                if !face.is_empty() {
                    bag.insert(element.id, face);
                }
            }
        }
        let skin = bag.unique()?;
        let faces: Vec<Vec<usize>> = skin.into_iter().map(|f| f.nodes).collect();
        debug!(faces = faces.len(), "rebuilt visualization skin");
        VisualMesh::build(&self.nodes, &faces)
    }

    /// Restrict every field to the given node rows, in row order. Used
    /// with [`VisualMesh::node_rows`] so per-vertex arrays line up with
    /// the skin mesh.
    pub fn restrict(&self, rows: &[usize]) -> CalxResult<Vec<ResultField>> {
        self.fields
            .iter()
            .map(|field| {
                let mut restricted = ResultField::new(field.name.clone());
                for (name, values) in field.components() {
                    let picked = rows
                        .iter()
                        .map(|&row| {
                            values.get(row).copied().ok_or(CalxError::FieldIndex {
                                index: row,
                                len: values.len(),
                            })
                        })
                        .collect::<CalxResult<Vec<f32>>>()?;
                    restricted.add(name, picked);
                }
                Ok(restricted)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn stress_results() -> Results {
        let mut results = Results::new();
        results.nodes = vec![
            (1, Point3::new(0.0, 0.0, 0.0)),
            (2, Point3::new(1.0, 0.0, 0.0)),
        ];
        let mut stress = ResultField::new("STRESS");
        stress.add("SXX", vec![100.0, 0.0]);
        stress.add("SYY", vec![0.0, 0.0]);
        stress.add("SZZ", vec![0.0, 0.0]);
        stress.add("SXY", vec![0.0, 10.0]);
        stress.add("SYZ", vec![0.0, 0.0]);
        stress.add("SZX", vec![0.0, 0.0]);
        results.add_field(stress);
        results
    }

    #[test]
    fn test_derive_stress_components() {
        let mut results = stress_results();
        results.derive_components().unwrap();

        let stress = results.field("STRESS").unwrap();
        let vm = stress.component("VONMISES").unwrap();
        assert_relative_eq!(vm[0], 100.0, epsilon = 1e-3);
        assert_relative_eq!(vm[1], 10.0 * 3f32.sqrt(), epsilon = 1e-3);

        let signed = stress.component("SIGNED").unwrap();
        assert_relative_eq!(signed[0], 100.0, epsilon = 1e-3);
        // Pure shear: +tau and -tau tie, max wins.
        assert_relative_eq!(signed[1], 10.0, epsilon = 1e-3);
    }

    #[test]
    fn test_derive_is_idempotent() {
        let mut results = stress_results();
        results.derive_components().unwrap();
        results.derive_components().unwrap();
        let stress = results.field("STRESS").unwrap();
        assert_eq!(
            stress.components().filter(|(n, _)| *n == "VONMISES").count(),
            1
        );
    }

    #[test]
    fn test_displacement_magnitude() {
        let mut results = Results::new();
        results.nodes = vec![(1, Point3::origin())];
        let mut disp = ResultField::new("DISP");
        disp.add("D1", vec![3.0]);
        disp.add("D2", vec![4.0]);
        disp.add("D3", vec![0.0]);
        results.add_field(disp);
        results.derive_components().unwrap();

        let all = results.field("DISP").unwrap().component("ALL").unwrap();
        assert_relative_eq!(all[0], 5.0, epsilon = 1e-6);
    }

    #[test]
    fn test_visual_mesh_from_tet_code() {
        let mut results = Results::new();
        results.nodes = vec![
            (1, Point3::new(0.0, 0.0, 0.0)),
            (2, Point3::new(1.0, 0.0, 0.0)),
            (3, Point3::new(0.0, 1.0, 0.0)),
            (4, Point3::new(0.0, 0.0, 1.0)),
        ];
        // frd code 3 is the linear tetrahedron.
        results.elements.push(ResultElement {
            id: 1,
            type_code: 3,
            nodes: vec![1, 2, 3, 4],
        });

        let mesh = results.visual_mesh().unwrap();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.face_count(), 4);
    }

    #[test]
    fn test_unknown_type_code_renders_nothing() {
        let mut results = Results::new();
        results.nodes = vec![(1, Point3::origin())];
        results.elements.push(ResultElement {
            id: 1,
            type_code: 99,
            nodes: vec![1],
        });
        let mesh = results.visual_mesh().unwrap();
        assert_eq!(mesh.face_count(), 0);
    }

    #[test]
    fn test_restrict_fields_to_rows() {
        let results = stress_results();
        let restricted = results.restrict(&[1]).unwrap();
        let stress = restricted.iter().find(|f| f.name == "STRESS").unwrap();
        assert_eq!(stress.component("SXX").unwrap(), &[0.0]);
        assert_eq!(stress.component("SXY").unwrap(), &[10.0]);
    }

    #[test]
    fn test_restrict_out_of_range() {
        let results = stress_results();
        assert!(matches!(
            results.restrict(&[5]),
            Err(CalxError::FieldIndex { index: 5, len: 2 })
        ));
    }
}
