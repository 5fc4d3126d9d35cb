//! Order-independent identity keys used to deduplicate shared sub-elements.
//!
//! An edge is stored directed (`from -> to`) and a face keeps its edges in
//! traversal order, but two cells that share an edge or a face must resolve
//! it to the same handle whatever direction they walk it in. The keys below
//! normalize that away and are only ever used as map keys.

use crate::topology::handle::{EdgeHandle, NodeHandle};

/// Unordered pair of node handles: `EdgeKey::new(a, b) == EdgeKey::new(b, a)`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeKey {
    lo: NodeHandle,
    hi: NodeHandle,
}

impl EdgeKey {
    #[inline]
    pub fn new(a: NodeHandle, b: NodeHandle) -> Self {
        if a <= b {
            Self { lo: a, hi: b }
        } else {
            Self { lo: b, hi: a }
        }
    }

    #[inline]
    pub fn nodes(self) -> (NodeHandle, NodeHandle) {
        (self.lo, self.hi)
    }
}

/// Sorted triple of edge handles identifying a triangular face.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FaceKey([EdgeHandle; 3]);

impl FaceKey {
    #[inline]
    pub fn new(edges: [EdgeHandle; 3]) -> Self {
        let mut sorted = edges;
        sorted.sort_unstable();
        Self(sorted)
    }

    #[inline]
    pub fn edges(&self) -> [EdgeHandle; 3] {
        self.0
    }

    /// A key built from two equal edges cannot name a triangle.
    #[inline]
    pub fn has_repeated_edge(&self) -> bool {
        self.0[0] == self.0[1] || self.0[1] == self.0[2]
    }
}
