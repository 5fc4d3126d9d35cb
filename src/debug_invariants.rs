//! Post-condition checks for mesh mutators.
//!
//! Every public mutator of [`VolMesh`](crate::mesh::VolMesh) ends with a
//! [`debug_invariants!`](crate::debug_invariants) call. The check walks the
//! whole mesh, so it only runs in debug builds or when one of the
//! `strict-invariants` / `check-invariants` features is enabled.

use crate::mesh_error::VolMeshError;

/// Trait for structures that can verify their own invariants.
pub trait DebugInvariants {
    /// Validate invariants and return the first error encountered.
    fn validate_invariants(&self) -> Result<(), VolMeshError>;

    /// Panic on the first broken invariant when invariant checking is enabled.
    fn debug_assert_invariants(&self) {
        crate::debug_invariants!(self.validate_invariants(), "debug_assert_invariants");
    }
}

/// Run a fallible check and panic with the operation name on error when
/// invariant checking is enabled. Compiles to nothing otherwise.
#[macro_export]
macro_rules! debug_invariants {
    ($expr:expr, $($ctx:tt)*) => {
        #[cfg(any(debug_assertions, feature = "strict-invariants", feature = "check-invariants"))]
        if let Err(e) = $expr {
            panic!(concat!("[invariants] after ", $($ctx)*, ": {}"), e);
        }
    };
}
