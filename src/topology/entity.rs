//! Entity records stored in the dense arrays of a [`VolMesh`](crate::mesh::VolMesh),
//! and the local numbering masks of a tetrahedron.
//!
//! # Local numbering
//! A cell keeps its four node handles in input order. Its faces and edges are
//! laid out by a mask chosen from the sign of the cell's determinant
//! `(v1 - v0) · ((v2 - v0) × (v3 - v0))`:
//!
//! | local | positive mask | negative mask |
//! |-------|---------------|---------------|
//! | face 0 | `1 2 3` | `3 2 1` |
//! | face 1 | `2 0 3` | `3 0 2` |
//! | face 2 | `3 0 1` | `1 0 3` |
//! | face 3 | `1 0 2` | `2 0 1` |
//!
//! Local face `f` is the face opposite local node `f`, and walking a face in
//! mask order gives a normal pointing out of the cell for either sign.

use crate::topology::handle::{EdgeHandle, FaceHandle, NodeHandle};

pub const COUNT_FACE_EDGES: usize = 3;
pub const COUNT_CELL_NODES: usize = 4;
pub const COUNT_CELL_FACES: usize = 4;
pub const COUNT_CELL_EDGES: usize = 6;

/// Face node mask for cells with non-negative determinant.
pub const FACE_MASK_POS: [[usize; 3]; 4] = [[1, 2, 3], [2, 0, 3], [3, 0, 1], [1, 0, 2]];
/// Face node mask for cells with negative determinant.
pub const FACE_MASK_NEG: [[usize; 3]; 4] = [[3, 2, 1], [3, 0, 2], [1, 0, 3], [2, 0, 1]];
/// Edge node mask for cells with non-negative determinant.
pub const EDGE_MASK_POS: [[usize; 2]; 6] = [[1, 2], [2, 3], [3, 1], [2, 0], [0, 3], [0, 1]];
/// Edge node mask for cells with negative determinant.
pub const EDGE_MASK_NEG: [[usize; 2]; 6] = [[3, 2], [2, 1], [1, 3], [3, 0], [0, 2], [1, 0]];

/// Face mask for an orientation.
#[inline]
pub fn face_mask(positive: bool) -> &'static [[usize; 3]; 4] {
    if positive { &FACE_MASK_POS } else { &FACE_MASK_NEG }
}

/// Edge mask for an orientation.
#[inline]
pub fn edge_mask(positive: bool) -> &'static [[usize; 2]; 6] {
    if positive { &EDGE_MASK_POS } else { &EDGE_MASK_NEG }
}

/// A mesh vertex: deformed and rest positions.
#[derive(Copy, Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Node {
    pub pos: [f64; 3],
    pub rest_pos: [f64; 3],
}

impl Node {
    /// A node at rest: both positions equal `pos`.
    pub fn at(pos: [f64; 3]) -> Self {
        Self { pos, rest_pos: pos }
    }
}

/// A directed edge. `from != to` for every stored edge.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Edge {
    pub from: NodeHandle,
    pub to: NodeHandle,
}

impl Edge {
    pub fn new(from: NodeHandle, to: NodeHandle) -> Self {
        Self { from, to }
    }

    #[inline]
    pub fn has_node(&self, n: NodeHandle) -> bool {
        self.from == n || self.to == n
    }

    /// The endpoint across from `n`, if `n` is an endpoint.
    #[inline]
    pub fn opposite(&self, n: NodeHandle) -> Option<NodeHandle> {
        if self.from == n {
            Some(self.to)
        } else if self.to == n {
            Some(self.from)
        } else {
            None
        }
    }
}

/// A triangle given by three edges in traversal order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Face {
    pub edges: [EdgeHandle; COUNT_FACE_EDGES],
}

impl Face {
    pub fn new(edges: [EdgeHandle; COUNT_FACE_EDGES]) -> Self {
        Self { edges }
    }
}

/// A tetrahedron with its resolved faces and edges in mask order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Cell {
    pub nodes: [NodeHandle; COUNT_CELL_NODES],
    pub faces: [FaceHandle; COUNT_CELL_FACES],
    pub edges: [EdgeHandle; COUNT_CELL_EDGES],
    /// Orientation picked at insertion (`true` = non-negative determinant).
    pub positive: bool,
}

impl Cell {
    /// A cell with nodes set and every face/edge slot at the sentinel.
    pub fn unresolved(nodes: [NodeHandle; COUNT_CELL_NODES], positive: bool) -> Self {
        Self {
            nodes,
            faces: [FaceHandle::INVALID; COUNT_CELL_FACES],
            edges: [EdgeHandle::INVALID; COUNT_CELL_EDGES],
            positive,
        }
    }

    /// The node triple of local face `f` in mask order.
    pub fn local_face_nodes(&self, f: usize) -> [NodeHandle; 3] {
        let m = face_mask(self.positive)[f];
        [self.nodes[m[0]], self.nodes[m[1]], self.nodes[m[2]]]
    }

    /// The node pair of local edge `e` in mask order.
    pub fn local_edge_nodes(&self, e: usize) -> [NodeHandle; 2] {
        let m = edge_mask(self.positive)[e];
        [self.nodes[m[0]], self.nodes[m[1]]]
    }
}
