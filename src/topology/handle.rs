//! Typed handles for the four mesh entity kinds.
//!
//! A handle is a dense array index wrapped in a newtype so that a face handle
//! can never be passed where an edge handle is expected. All four kinds share
//! the same representation:
//!
//! - a `u32` index into the entity array of its kind,
//! - `u32::MAX` reserved as the [`INVALID`](NodeHandle::INVALID) sentinel,
//! - `repr(transparent)`, so a handle has the size and ABI of a `u32`.
//!
//! Handles are positions, not identities: removing entity `i` shifts every
//! handle above `i` down by one (see [`crate::mesh::removal`]).

use std::fmt;

/// The entity families of a tetrahedral mesh.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub enum EntityKind {
    Node,
    Edge,
    Face,
    Cell,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Node => "node",
            EntityKind::Edge => "edge",
            EntityKind::Face => "face",
            EntityKind::Cell => "cell",
        };
        f.write_str(name)
    }
}

macro_rules! define_handle {
    ($(#[$meta:meta])* $name:ident, $kind:expr) => {
        $(#[$meta])*
        #[derive(
            Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
        )]
        #[repr(transparent)]
        pub struct $name(u32);

        impl $name {
            /// Reserved "no such entity" value.
            pub const INVALID: Self = Self(u32::MAX);

            /// The entity family this handle addresses.
            pub const KIND: EntityKind = $kind;

            #[inline]
            pub const fn new(raw: u32) -> Self {
                Self(raw)
            }

            /// Converts an array position into a handle.
            ///
            /// Positions that do not fit below the sentinel map to [`Self::INVALID`].
            #[inline]
            pub fn from_usize(index: usize) -> Self {
                match u32::try_from(index) {
                    Ok(raw) if raw != u32::MAX => Self(raw),
                    _ => Self::INVALID,
                }
            }

            #[inline]
            pub const fn get(self) -> u32 {
                self.0
            }

            #[inline]
            pub const fn index(self) -> usize {
                self.0 as usize
            }

            /// `false` only for the sentinel; range validity needs the mesh.
            #[inline]
            pub const fn is_valid(self) -> bool {
                self.0 != u32::MAX
            }

            /// The value this handle takes after the entity at `removed`
            /// is erased from a dense array.
            #[inline]
            pub(crate) fn renumbered_after(self, removed: Self) -> Self {
                if self.is_valid() && self.0 > removed.0 {
                    Self(self.0 - 1)
                } else {
                    self
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.is_valid() {
                    f.debug_tuple(stringify!($name)).field(&self.0).finish()
                } else {
                    write!(f, "{}(INVALID)", stringify!($name))
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<$name> for usize {
            fn from(h: $name) -> usize {
                h.index()
            }
        }
    };
}

define_handle!(
    /// Index into the node array.
    NodeHandle,
    EntityKind::Node
);
define_handle!(
    /// Index into the edge array.
    EdgeHandle,
    EntityKind::Edge
);
define_handle!(
    /// Index into the face array.
    FaceHandle,
    EntityKind::Face
);
define_handle!(
    /// Index into the cell (tetrahedron) array.
    CellHandle,
    EntityKind::Cell
);

#[cfg(test)]
mod layout_tests {
    use super::*;
    use static_assertions::assert_eq_size;

    assert_eq_size!(NodeHandle, u32);
    assert_eq_size!(EdgeHandle, u32);
    assert_eq_size!(FaceHandle, u32);
    assert_eq_size!(CellHandle, u32);
}
