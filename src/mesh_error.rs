//! VolMeshError: Unified error type for volmesh public APIs
//!
//! Every mutator validates its handles and parameters before touching the
//! mesh, so an `Err` always means "nothing was changed".

use crate::topology::handle::EntityKind;
use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, VolMeshError>;

/// Unified error type for volmesh operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VolMeshError {
    /// A handle is the sentinel or lies outside `[0, count)` for its kind.
    #[error("invalid {kind} handle {handle} (count = {count})")]
    InvalidHandle {
        kind: EntityKind,
        handle: u32,
        count: usize,
    },
    /// An expected edge/face/cell-local relationship could not be resolved.
    #[error("structural inconsistency: {0}")]
    StructuralInconsistency(String),
    /// Rejected input: zero-length edges, out-of-range cut offsets, bad array shapes.
    #[error("degenerate input: {0}")]
    DegenerateInput(String),
    /// An edit would give a second entity the canonical key of `handle`.
    #[error("{kind} {handle} already owns this canonical key")]
    DuplicateEntity { kind: EntityKind, handle: u32 },
    /// Reported by the validator when a stored relation breaks an invariant.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),
}

impl VolMeshError {
    pub(crate) fn structural(message: impl Into<String>) -> Self {
        VolMeshError::StructuralInconsistency(message.into())
    }

    pub(crate) fn degenerate(message: impl Into<String>) -> Self {
        VolMeshError::DegenerateInput(message.into())
    }

    pub(crate) fn invariant(message: impl Into<String>) -> Self {
        VolMeshError::InvariantViolation(message.into())
    }
}
