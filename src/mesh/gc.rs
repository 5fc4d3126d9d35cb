//! Sweeping of entities left without incidence.
//!
//! Sweeps run in a fixed order: faces, then edges, then nodes. An edge only
//! becomes collectable once the faces using it are gone, and a node once its
//! edges are gone, so each sweep sees the result of the previous one.
//!
//! By default only faces are swept. Edge and node sweeps also drop entities
//! that were never part of a face (free-standing edges, nodes created by a
//! cut whose edges were removed), which callers have to opt into.

use super::VolMesh;
use crate::debug_invariants::DebugInvariants;
use crate::topology::handle::{EdgeHandle, FaceHandle, NodeHandle};
use std::collections::BTreeSet;

/// Which entity kinds [`VolMesh::garbage_collect_with`] sweeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GcPolicy {
    /// Faces bounding no cell.
    pub faces: bool,
    /// Edges on no face and listed by no cell.
    pub edges: bool,
    /// Nodes on no edge and listed by no cell.
    pub nodes: bool,
}

impl Default for GcPolicy {
    fn default() -> Self {
        Self::faces_only()
    }
}

impl GcPolicy {
    pub fn faces_only() -> Self {
        Self {
            faces: true,
            edges: false,
            nodes: false,
        }
    }

    /// Sweep faces, edges and nodes.
    pub fn full() -> Self {
        Self {
            faces: true,
            edges: true,
            nodes: true,
        }
    }
}

/// Number of entities removed per kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GcReport {
    pub faces: usize,
    pub edges: usize,
    pub nodes: usize,
}

impl GcReport {
    pub fn total(&self) -> usize {
        self.faces + self.edges + self.nodes
    }
}

impl VolMesh {
    /// Sweeps orphaned faces.
    pub fn garbage_collect(&mut self) -> GcReport {
        self.garbage_collect_with(&GcPolicy::default())
    }

    pub fn garbage_collect_with(&mut self, policy: &GcPolicy) -> GcReport {
        let mut report = GcReport::default();

        if policy.faces {
            let orphans: BTreeSet<FaceHandle> = (0..self.faces.len())
                .map(FaceHandle::from_usize)
                .filter(|f| self.incidence.cells_of_face(*f).is_empty())
                .collect();
            report.faces = orphans.len();
            self.remove_faces_descending(&orphans);
        }

        if policy.edges {
            let held: BTreeSet<EdgeHandle> = self.cells.iter().flat_map(|c| c.edges).collect();
            let orphans: Vec<EdgeHandle> = (0..self.edges.len())
                .map(EdgeHandle::from_usize)
                .filter(|e| self.incidence.faces_of_edge(*e).is_empty() && !held.contains(e))
                .collect();
            report.edges = orphans.len();
            for e in orphans.into_iter().rev() {
                self.remove_edge_core(e);
            }
        }

        if policy.nodes {
            let held: BTreeSet<NodeHandle> = self.cells.iter().flat_map(|c| c.nodes).collect();
            let orphans: Vec<NodeHandle> = (0..self.nodes.len())
                .map(NodeHandle::from_usize)
                .filter(|n| self.incidence.edges_of_node(*n).is_empty() && !held.contains(n))
                .collect();
            report.nodes = orphans.len();
            for n in orphans.into_iter().rev() {
                self.remove_node_core(n);
            }
        }

        log::info!(
            "garbage collection removed {} face(s), {} edge(s), {} node(s)",
            report.faces,
            report.edges,
            report.nodes
        );
        crate::debug_invariants!(self.validate_invariants(), "garbage_collect");
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh_generation::one_tet;
    use crate::topology::entity::Node;
    use crate::topology::handle::CellHandle;

    #[test]
    fn default_policy_sweeps_faces_only() {
        let mut mesh = one_tet().unwrap();
        mesh.remove_cell(CellHandle::new(0)).unwrap();
        let report = mesh.garbage_collect();
        assert_eq!(
            report,
            GcReport {
                faces: 4,
                edges: 0,
                nodes: 0
            }
        );
        assert_eq!((mesh.count_faces(), mesh.count_cells()), (0, 0));
        assert_eq!((mesh.count_edges(), mesh.count_nodes()), (6, 4));
    }

    #[test]
    fn full_policy_empties_a_cell_free_mesh() {
        let mut mesh = one_tet().unwrap();
        mesh.remove_cell(CellHandle::new(0)).unwrap();
        let report = mesh.garbage_collect_with(&GcPolicy::full());
        assert_eq!(report.total(), 14);
        assert!(mesh.is_empty());
        assert_eq!(mesh.incidence().edge_key_count(), 0);
    }

    #[test]
    fn intact_mesh_is_untouched() {
        let mut mesh = one_tet().unwrap();
        let report = mesh.garbage_collect_with(&GcPolicy::full());
        assert_eq!(report.total(), 0);
        assert_eq!(mesh.count_faces(), 4);
    }

    #[test]
    fn node_sweep_keeps_connected_nodes() {
        let mut mesh = one_tet().unwrap();
        let lonely = mesh.insert_node(Node::at([9.0, 9.0, 9.0]));
        let policy = GcPolicy {
            faces: false,
            edges: false,
            nodes: true,
        };
        let report = mesh.garbage_collect_with(&policy);
        assert_eq!(report.nodes, 1);
        assert!(!mesh.is_node_index(lonely));
        assert_eq!(mesh.count_nodes(), 4);
    }
}
