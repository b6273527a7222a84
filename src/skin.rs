//! Boundary skin extraction
//!
//! Every element face is dropped into a multiset keyed by an
//! order-insensitive canonical form of its node tags; faces seen exactly
//! once are the boundary skin. The canonical key is a sorted copy made
//! once at insertion, while the stored face keeps the first observed
//! winding so downstream meshes stay consistently oriented.

use std::collections::{HashMap, HashSet};

use nalgebra::Point3;
use tracing::debug;

use crate::element::Element;
use crate::error::{CalxError, CalxResult};

/// A face on the extracted skin, in original winding order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkinFace {
    /// Tag of the element the face was first seen on.
    pub element: usize,
    /// Node tags in winding order; quadratic faces include mid-side nodes.
    pub nodes: Vec<usize>,
}

struct FaceRecord {
    element: usize,
    winding: Vec<usize>,
    count: usize,
    /// Position of the first occurrence, so output order is stable.
    order: usize,
}

/// Multiset of faces keyed by sorted node tags.
#[derive(Default)]
pub struct FaceBag {
    records: HashMap<Vec<usize>, FaceRecord>,
    inserted: usize,
}

impl FaceBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one face occurrence. The winding of the first occurrence is
    /// kept as the representative; empty faces are ignored.
    pub fn insert(&mut self, element: usize, nodes: Vec<usize>) {
        if nodes.is_empty() {
            return;
        }
        let mut key = nodes.clone();
        key.sort_unstable();
        let order = self.inserted;
        self.inserted += 1;
        self.records
            .entry(key)
            .and_modify(|r| r.count += 1)
            .or_insert(FaceRecord {
                element,
                winding: nodes,
                count: 1,
                order,
            });
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Largest number of occurrences recorded for any single face.
    pub fn max_multiplicity(&self) -> usize {
        self.records.values().map(|r| r.count).max().unwrap_or(0)
    }

    /// Faces seen exactly once, in first-seen order, or the non-manifold
    /// count if any face was shared by three or more elements.
    pub fn unique(self) -> CalxResult<Vec<SkinFace>> {
        let over_shared = self.records.values().filter(|r| r.count > 2).count();
        if over_shared > 0 {
            return Err(CalxError::NonManifold { count: over_shared });
        }
        let mut boundary: Vec<FaceRecord> = self
            .records
            .into_values()
            .filter(|r| r.count == 1)
            .collect();
        boundary.sort_unstable_by_key(|r| r.order);
        Ok(boundary
            .into_iter()
            .map(|r| SkinFace {
                element: r.element,
                nodes: r.winding,
            })
            .collect())
    }
}

/// Extract the boundary skin of a set of elements.
///
/// Elements without faces (beams, springs) are skipped. Faces come back
/// in the order they were first seen, so repeated runs over the same
/// elements produce the same mesh.
pub fn extract_skin(elements: &[Element]) -> CalxResult<Vec<SkinFace>> {
    let mut bag = FaceBag::new();
    for element in elements {
        match element.face_indices() {
            Ok(faces) => {
                for face in faces {
                    bag.insert(element.tag, face);
                }
            }
            Err(CalxError::NoFaces(_)) => continue,
            Err(e) => return Err(e),
        }
    }
    debug!(
        candidate_faces = bag.len(),
        elements = elements.len(),
        "collected faces for skin extraction"
    );
    bag.unique()
}

/// A surface mesh rebuilt from skin faces with dense 0-based vertices.
#[derive(Debug, Clone)]
pub struct VisualMesh {
    pub vertices: Vec<Point3<f64>>,
    /// Faces as indices into `vertices`.
    pub faces: Vec<Vec<usize>>,
    /// Original node tag of each vertex row.
    pub node_tags: Vec<usize>,
    /// Row in the source node array each vertex came from, for
    /// restricting nodal result fields to the visible surface.
    pub node_rows: Vec<usize>,
}

impl VisualMesh {
    /// Build a mesh from tag-addressed faces over a node array.
    ///
    /// Only nodes referenced by a face become vertices; vertex order
    /// follows the source node array so restricted fields stay aligned.
    pub fn build(
        nodes: &[(usize, Point3<f64>)],
        faces: &[Vec<usize>],
    ) -> CalxResult<VisualMesh> {
        let mut used: HashSet<usize> = HashSet::new();
        for face in faces {
            used.extend(face.iter().copied());
        }

        let mut remap: HashMap<usize, usize> = HashMap::with_capacity(used.len());
        let mut vertices = Vec::with_capacity(used.len());
        let mut node_tags = Vec::with_capacity(used.len());
        let mut node_rows = Vec::with_capacity(used.len());
        for (row, (tag, position)) in nodes.iter().enumerate() {
            if used.contains(tag) {
                remap.insert(*tag, vertices.len());
                vertices.push(*position);
                node_tags.push(*tag);
                node_rows.push(row);
            }
        }

        let remapped = faces
            .iter()
            .map(|face| {
                face.iter()
                    .map(|tag| remap.get(tag).copied().ok_or(CalxError::NodeNotFound(*tag)))
                    .collect::<CalxResult<Vec<usize>>>()
            })
            .collect::<CalxResult<Vec<_>>>()?;

        Ok(VisualMesh {
            vertices,
            faces: remapped,
            node_tags,
            node_rows,
        })
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }
}
