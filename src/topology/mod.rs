//! Building blocks of the tetrahedral mesh topology.
//!
//! This module provides the types the [`VolMesh`](crate::mesh::VolMesh)
//! aggregate is made of:
//! - typed handles and the [`EntityKind`] tag
//! - canonical [`EdgeKey`]/[`FaceKey`] identities used for deduplication
//! - entity records and the local numbering masks of a tetrahedron
//! - the bottom-up [`IncidenceStore`]
//! - change notification hooks and cache invalidation
//! - a full-mesh validator

pub mod cache;
pub mod entity;
pub mod events;
pub mod handle;
pub mod incidence;
pub mod keys;
pub mod validation;

pub use cache::InvalidateCache;
pub use entity::{Cell, Edge, Face, Node};
pub use events::{MeshEvents, TopologyEvent};
pub use handle::{CellHandle, EdgeHandle, EntityKind, FaceHandle, NodeHandle};
pub use incidence::IncidenceStore;
pub use keys::{EdgeKey, FaceKey};
pub use validation::{ValidationOptions, ViolationHandling, validate_mesh};
