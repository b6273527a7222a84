//! Element types and boundary-face topology
//!
//! Every supported CalculiX element kind carries a fixed node count and a
//! fixed table mapping its nodes to boundary faces (triangles/quads, with
//! mid-edge nodes for the quadratic kinds). The tables follow the CalculiX
//! node-ordering convention, not any mesher's geometric order; callers
//! importing foreign connectivity must pre-permute (see
//! [`Element::c3d10_from_gmsh`]).

use serde::{Deserialize, Serialize};

use crate::error::{CalxError, CalxResult};

/// Supported element kinds, named by their CalculiX type keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementKind {
    /// 2-node linear beam
    B31,
    /// 3-node quadratic beam
    B32,
    /// 3-node shell triangle
    S3,
    /// 6-node shell triangle
    S6,
    /// 4-node shell quad
    S4,
    /// 8-node shell quad
    S8,
    /// 4-node linear tetrahedron
    C3D4,
    /// 10-node quadratic tetrahedron
    C3D10,
    /// 6-node linear wedge
    C3D6,
    /// 15-node quadratic wedge
    C3D15,
    /// 8-node trilinear hexahedron
    C3D8,
    /// 20-node triquadratic hexahedron
    C3D20,
    /// 2-node spring
    Spring2,
}

impl ElementKind {
    /// CalculiX type keyword as written in `*Element, Type=...` blocks.
    pub fn keyword(&self) -> &'static str {
        match self {
            ElementKind::B31 => "B31",
            ElementKind::B32 => "B32",
            ElementKind::S3 => "S3",
            ElementKind::S6 => "S6",
            ElementKind::S4 => "S4",
            ElementKind::S8 => "S8",
            ElementKind::C3D4 => "C3D4",
            ElementKind::C3D10 => "C3D10",
            ElementKind::C3D6 => "C3D6",
            ElementKind::C3D15 => "C3D15",
            ElementKind::C3D8 => "C3D8",
            ElementKind::C3D20 => "C3D20",
            ElementKind::Spring2 => "SPRING2",
        }
    }

    /// Parse a CalculiX type keyword (case-insensitive).
    pub fn from_keyword(keyword: &str) -> Option<ElementKind> {
        let kw = keyword.trim();
        let all = [
            ElementKind::B31,
            ElementKind::B32,
            ElementKind::S3,
            ElementKind::S6,
            ElementKind::S4,
            ElementKind::S8,
            ElementKind::C3D4,
            ElementKind::C3D10,
            ElementKind::C3D6,
            ElementKind::C3D15,
            ElementKind::C3D8,
            ElementKind::C3D20,
            ElementKind::Spring2,
        ];
        all.into_iter()
            .find(|k| k.keyword().eq_ignore_ascii_case(kw))
    }

    /// Exact number of nodes this kind requires.
    pub fn node_count(&self) -> usize {
        match self {
            ElementKind::B31 | ElementKind::Spring2 => 2,
            ElementKind::B32 | ElementKind::S3 => 3,
            ElementKind::S4 | ElementKind::C3D4 => 4,
            ElementKind::S6 | ElementKind::C3D6 => 6,
            ElementKind::S8 | ElementKind::C3D8 => 8,
            ElementKind::C3D10 => 10,
            ElementKind::C3D15 => 15,
            ElementKind::C3D20 => 20,
        }
    }

    /// Gmsh element-type code for mesher interop.
    pub fn gmsh_code(&self) -> u8 {
        match self {
            ElementKind::B31 | ElementKind::Spring2 => 1,
            ElementKind::S3 => 2,
            ElementKind::S4 => 3,
            ElementKind::C3D4 => 4,
            ElementKind::C3D8 => 5,
            ElementKind::C3D6 => 6,
            ElementKind::B32 => 8,
            ElementKind::S6 => 9,
            ElementKind::C3D10 => 11,
            ElementKind::C3D15 => 13,
            ElementKind::S8 => 16,
            ElementKind::C3D20 => 17,
        }
    }

    /// Local node indices of each boundary face, outward winding.
    ///
    /// Line and spring kinds have no faces and report that explicitly.
    fn face_table(&self) -> CalxResult<&'static [&'static [usize]]> {
        const S3: &[&[usize]] = &[&[0, 1, 2]];
        // Corner nodes only; the S6 mid-edge nodes do not appear in the
        // rendered face.
        const S6: &[&[usize]] = &[&[0, 1, 2]];
        const S4: &[&[usize]] = &[&[0, 1, 2, 3]];
        const S8: &[&[usize]] = &[&[0, 1, 2, 3, 4, 5, 6, 7]];
        const C3D4: &[&[usize]] = &[&[0, 2, 1], &[0, 1, 3], &[1, 2, 3], &[2, 0, 3]];
        const C3D10: &[&[usize]] = &[
            &[0, 2, 1, 6, 5, 4],
            &[0, 1, 3, 4, 8, 7],
            &[1, 2, 3, 5, 9, 8],
            &[2, 0, 3, 6, 7, 9],
        ];
        const C3D6: &[&[usize]] = &[
            &[0, 2, 1],
            &[3, 4, 5],
            &[1, 4, 3, 0],
            &[2, 5, 4, 1],
            &[0, 3, 5, 2],
        ];
        const C3D15: &[&[usize]] = &[
            &[0, 2, 1, 8, 7, 6],
            &[3, 4, 5, 9, 10, 11],
            &[0, 1, 4, 3, 6, 13, 9, 12],
            &[1, 2, 5, 4, 7, 14, 10, 13],
            &[2, 0, 3, 5, 8, 12, 11, 14],
        ];
        const C3D8: &[&[usize]] = &[
            &[0, 3, 2, 1],
            &[4, 5, 6, 7],
            &[0, 1, 5, 4],
            &[1, 2, 6, 5],
            &[2, 3, 7, 6],
            &[3, 0, 4, 7],
        ];
        const C3D20: &[&[usize]] = &[
            &[0, 3, 2, 1, 11, 10, 9, 8],
            &[4, 5, 6, 7, 12, 13, 14, 15],
            &[0, 1, 5, 4, 8, 17, 12, 16],
            &[1, 2, 6, 5, 9, 18, 13, 17],
            &[2, 3, 7, 6, 10, 19, 14, 18],
            &[3, 0, 4, 7, 11, 16, 15, 19],
        ];

        match self {
            ElementKind::S3 => Ok(S3),
            ElementKind::S6 => Ok(S6),
            ElementKind::S4 => Ok(S4),
            ElementKind::S8 => Ok(S8),
            ElementKind::C3D4 => Ok(C3D4),
            ElementKind::C3D10 => Ok(C3D10),
            ElementKind::C3D6 => Ok(C3D6),
            ElementKind::C3D15 => Ok(C3D15),
            ElementKind::C3D8 => Ok(C3D8),
            ElementKind::C3D20 => Ok(C3D20),
            ElementKind::B31 | ElementKind::B32 | ElementKind::Spring2 => {
                Err(CalxError::NoFaces(self.keyword()))
            }
        }
    }
}

/// A finite element: tag, kind and ordered node-tag references.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Element {
    pub tag: usize,
    pub kind: ElementKind,
    pub nodes: Vec<usize>,
}

impl Element {
    /// Create an element, validating the node count for the kind.
    pub fn new(tag: usize, kind: ElementKind, nodes: Vec<usize>) -> CalxResult<Element> {
        if nodes.len() != kind.node_count() {
            return Err(CalxError::NodeCount {
                kind: kind.keyword(),
                expected: kind.node_count(),
                got: nodes.len(),
            });
        }
        Ok(Element { tag, kind, nodes })
    }

    /// Create a quadratic tetrahedron from Gmsh node ordering.
    ///
    /// Gmsh and CalculiX disagree on the last two mid-edge nodes of the
    /// 10-node tet; this swaps nodes 8 and 9 before construction.
    pub fn c3d10_from_gmsh(tag: usize, mut nodes: Vec<usize>) -> CalxResult<Element> {
        if nodes.len() == 10 {
            nodes.swap(8, 9);
        }
        Element::new(tag, ElementKind::C3D10, nodes)
    }

    /// Boundary faces as node-tag tuples, outward winding.
    ///
    /// Quadratic faces include their mid-edge nodes (6/8-node polygons);
    /// the caller decides how to render those. Line and spring elements
    /// return [`CalxError::NoFaces`].
    pub fn face_indices(&self) -> CalxResult<Vec<Vec<usize>>> {
        let table = self.kind.face_table()?;
        Ok(table
            .iter()
            .map(|face| face.iter().map(|&i| self.nodes[i]).collect())
            .collect())
    }
}

/// Visualization face tables keyed by frd result-file element codes.
///
/// CalculiX expands 1D beam elements into solid proxies when writing
/// results, so code 1 covers both real bricks and expanded B31 beams, and
/// code 4 covers expanded B32 beams, rendered as a fixed triangle fan
/// over the 20 proxy nodes.
/// Unknown codes yield no renderable faces rather than an error.
pub fn frd_visualization_faces(frd_code: i32, nodes: &[usize]) -> Vec<Vec<usize>> {
    let table: &[&[usize]] = match frd_code {
        // 8-node brick (and expanded B31 visualization prism)
        1 => &[
            &[0, 1, 2, 3],
            &[4, 5, 6, 7],
            &[0, 4, 5, 1],
            &[6, 2, 3, 7],
            &[0, 3, 7, 4],
            &[1, 5, 6, 2],
        ],
        // 4-node tetrahedron
        3 => &[&[0, 1, 2], &[1, 2, 3], &[2, 3, 0], &[3, 0, 1]],
        // 20-node brick (expanded B32), triangle fan per proxy face
        4 => &[
            &[11, 0, 8],
            &[8, 1, 9],
            &[9, 2, 10],
            &[10, 3, 11],
            &[9, 10, 8],
            &[11, 8, 10],
            &[16, 4, 19],
            &[19, 7, 18],
            &[18, 6, 17],
            &[17, 5, 16],
            &[18, 16, 19],
            &[16, 18, 17],
            &[12, 0, 8],
            &[8, 1, 13],
            &[13, 5, 16],
            &[16, 4, 12],
            &[16, 8, 13],
            &[8, 16, 12],
            &[13, 1, 9],
            &[9, 2, 14],
            &[14, 6, 17],
            &[17, 5, 13],
            &[17, 9, 14],
            &[9, 17, 13],
            &[14, 2, 10],
            &[10, 3, 15],
            &[15, 7, 18],
            &[18, 6, 14],
            &[18, 10, 15],
            &[10, 18, 14],
            &[15, 3, 11],
            &[11, 0, 12],
            &[12, 4, 19],
            &[19, 7, 15],
            &[19, 11, 12],
            &[11, 19, 15],
        ],
        // 10-node tetrahedron, each curved face split into four triangles
        6 => &[
            &[0, 4, 7],
            &[4, 1, 8],
            &[8, 3, 7],
            &[7, 4, 8],
            &[1, 5, 8],
            &[5, 2, 9],
            &[9, 3, 8],
            &[8, 5, 9],
            &[2, 6, 9],
            &[6, 0, 7],
            &[7, 3, 9],
            &[9, 6, 7],
            &[4, 0, 6],
            &[6, 2, 5],
            &[5, 1, 4],
            &[4, 6, 5],
        ],
        // 27-node brick, each face split into four quads around its centre
        12 => &[
            &[0, 8, 20, 9],
            &[8, 1, 11, 20],
            &[11, 2, 13, 20],
            &[13, 3, 9, 20],
            &[0, 10, 21, 8],
            &[10, 4, 16, 21],
            &[16, 5, 12, 21],
            &[12, 1, 8, 21],
            &[4, 17, 25, 16],
            &[17, 7, 19, 25],
            &[19, 6, 18, 25],
            &[18, 5, 16, 25],
            &[7, 15, 24, 19],
            &[15, 3, 13, 24],
            &[13, 2, 14, 24],
            &[14, 6, 19, 24],
            &[0, 9, 22, 10],
            &[9, 3, 15, 22],
            &[15, 7, 17, 22],
            &[17, 4, 10, 22],
            &[12, 5, 18, 23],
            &[18, 6, 14, 23],
            &[14, 2, 11, 23],
            &[11, 1, 12, 23],
        ],
        _ => return Vec::new(),
    };

    let required = table.iter().flat_map(|f| f.iter()).max().map_or(0, |m| m + 1);
    if nodes.len() < required {
        return Vec::new();
    }

    table
        .iter()
        .map(|face| face.iter().map(|&i| nodes[i]).collect())
        .collect()
}
