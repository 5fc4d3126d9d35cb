//! # volmesh
//!
//! volmesh is an editable tetrahedral mesh topology for cutting simulations.
//! It stores nodes, edges, triangular faces and tetrahedral cells in dense
//! arrays addressed by typed handles, and keeps the bottom-up incidence
//! (node→edges, edge→faces, face→cells) exactly in step with every edit.
//!
//! ## Features
//! - Construction from flat vertex/element buffers with per-cell orientation
//!   and deduplication of shared edges and faces
//! - In-place editing of edge endpoints, face edges and cell faces
//! - Cascading removal of cells, faces, edges and nodes with handle
//!   renumbering, so the arrays never contain holes
//! - Edge cutting into two disconnected duplicate nodes, and edge splitting
//! - Garbage collection of orphaned faces, edges and nodes
//! - Bounding box, volume and quality measures
//!
//! ## Invariant checking
//! Every public mutator re-validates the whole mesh on exit in debug builds.
//! Enable the `strict-invariants` or `check-invariants` feature to keep the
//! checks in release builds.
//!
//! ## Logging
//! The crate logs through the [`log`] facade and installs no logger.

pub mod debug_invariants;
pub mod geometry;
pub mod mesh;
pub mod mesh_error;
pub mod mesh_generation;
pub mod topology;

pub use debug_invariants::DebugInvariants;
pub use mesh::VolMesh;
pub use mesh_error::VolMeshError;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::debug_invariants::DebugInvariants;
    pub use crate::geometry::{Aabb, MeshStats};
    pub use crate::mesh::{BuildOptions, CutParam, GcPolicy, GcReport, VolMesh};
    pub use crate::mesh_error::VolMeshError;
    pub use crate::topology::{
        Cell, CellHandle, Edge, EdgeHandle, EdgeKey, EntityKind, Face, FaceHandle, FaceKey,
        InvalidateCache, MeshEvents, Node, NodeHandle, TopologyEvent, ValidationOptions,
        ViolationHandling, validate_mesh,
    };
}
