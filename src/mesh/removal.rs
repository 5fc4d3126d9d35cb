//! Cascading removal with handle renumbering.
//!
//! Handles are array positions, so erasing entity `i` shifts every handle
//! above `i` down by one. Each `remove_*` call:
//!
//! 1. validates its input,
//! 2. collects the full dependent set (cells, then faces, then edges) while
//!    the mesh is untouched,
//! 3. erases dependents in descending handle order, lowest kind first,
//! 4. erases the entity itself and renumbers every reference above it.
//!
//! The `*_core` functions do one erase plus renumbering and require that
//! nothing still depends on the entity.
//!
//! Key maps whose keys embed renumbered handles (edge keys hold nodes, face
//! keys hold edges) are re-keyed in two phases: every stale key is detached
//! before any new key is attached, so no intermediate key can collide.

use super::VolMesh;
use crate::debug_invariants::DebugInvariants;
use crate::mesh_error::Result;
use crate::topology::cache::InvalidateCache;
use crate::topology::events::TopologyEvent;
use crate::topology::handle::{CellHandle, EdgeHandle, FaceHandle, NodeHandle};
use crate::topology::keys::{EdgeKey, FaceKey};
use itertools::Itertools;
use std::collections::BTreeSet;

impl VolMesh {
    // ---------- public single removals ----------

    pub fn remove_cell(&mut self, c: CellHandle) -> Result<()> {
        self.check_cell(c)?;
        self.remove_cell_core(c);
        crate::debug_invariants!(self.validate_invariants(), "remove_cell");
        Ok(())
    }

    /// Removes face `f` and every cell bounded by it.
    pub fn remove_face(&mut self, f: FaceHandle) -> Result<()> {
        self.check_face(f)?;
        let cells: BTreeSet<CellHandle> = self.incidence.cells_of_face(f).iter().copied().collect();
        self.remove_cells_descending(&cells);
        self.remove_face_core(f);
        crate::debug_invariants!(self.validate_invariants(), "remove_face");
        Ok(())
    }

    /// Removes edge `e`, every face using it and every cell touching those
    /// faces or listing `e` among its edges.
    pub fn remove_edge(&mut self, e: EdgeHandle) -> Result<()> {
        self.check_edge(e)?;
        let faces: BTreeSet<FaceHandle> = self.incidence.faces_of_edge(e).iter().copied().collect();
        let mut cells = self.cells_of_faces(&faces);
        cells.extend(self.cells_where(|cell| cell.edges.contains(&e)));

        self.remove_cells_descending(&cells);
        self.remove_faces_descending(&faces);
        self.remove_edge_core(e);
        crate::debug_invariants!(self.validate_invariants(), "remove_edge");
        Ok(())
    }

    /// Removes node `n` with every edge, face and cell that depends on it.
    pub fn remove_node(&mut self, n: NodeHandle) -> Result<()> {
        self.check_node(n)?;
        let edges: BTreeSet<EdgeHandle> = self.incidence.edges_of_node(n).iter().copied().collect();
        let faces: BTreeSet<FaceHandle> = edges
            .iter()
            .flat_map(|e| self.incidence.faces_of_edge(*e).iter().copied())
            .collect();
        let mut cells = self.cells_of_faces(&faces);
        cells.extend(self.cells_where(|cell| {
            cell.nodes.contains(&n) || cell.edges.iter().any(|e| edges.contains(e))
        }));

        self.remove_cells_descending(&cells);
        self.remove_faces_descending(&faces);
        for e in edges.iter().rev() {
            self.remove_edge_core(*e);
        }
        self.remove_node_core(n);
        crate::debug_invariants!(self.validate_invariants(), "remove_node");
        Ok(())
    }

    // ---------- batch removals ----------
    //
    // All handles are validated first. Processing in strictly descending
    // order keeps every not-yet-processed handle stable: renumbering only
    // touches handles above the one just erased, and a cascade never erases
    // an entity of the batch's own kind.

    pub fn remove_cells(&mut self, cells: &[CellHandle]) -> Result<()> {
        for c in cells {
            self.check_cell(*c)?;
        }
        for c in descending(cells) {
            self.remove_cell_core(c);
        }
        crate::debug_invariants!(self.validate_invariants(), "remove_cells");
        Ok(())
    }

    pub fn remove_faces(&mut self, faces: &[FaceHandle]) -> Result<()> {
        for f in faces {
            self.check_face(*f)?;
        }
        for f in descending(faces) {
            self.remove_face(f)?;
        }
        Ok(())
    }

    pub fn remove_edges(&mut self, edges: &[EdgeHandle]) -> Result<()> {
        for e in edges {
            self.check_edge(*e)?;
        }
        for e in descending(edges) {
            self.remove_edge(e)?;
        }
        Ok(())
    }

    pub fn remove_nodes(&mut self, nodes: &[NodeHandle]) -> Result<()> {
        for n in nodes {
            self.check_node(*n)?;
        }
        for n in descending(nodes) {
            self.remove_node(n)?;
        }
        Ok(())
    }

    // ---------- dependent collection ----------

    fn cells_of_faces(&self, faces: &BTreeSet<FaceHandle>) -> BTreeSet<CellHandle> {
        faces
            .iter()
            .flat_map(|f| self.incidence.cells_of_face(*f).iter().copied())
            .collect()
    }

    fn cells_where<P>(&self, pred: P) -> Vec<CellHandle>
    where
        P: Fn(&crate::topology::entity::Cell) -> bool,
    {
        self.cells
            .iter()
            .positions(|cell| pred(cell))
            .map(CellHandle::from_usize)
            .collect()
    }

    pub(crate) fn remove_cells_descending(&mut self, cells: &BTreeSet<CellHandle>) {
        for c in cells.iter().rev() {
            self.remove_cell_core(*c);
        }
    }

    pub(crate) fn remove_faces_descending(&mut self, faces: &BTreeSet<FaceHandle>) {
        for f in faces.iter().rev() {
            self.remove_face_core(*f);
        }
    }

    // ---------- single erase + renumbering ----------

    pub(crate) fn remove_cell_core(&mut self, c: CellHandle) {
        log::trace!("removing cell {c}");
        self.events.cell(&self.cells[c.index()], c, TopologyEvent::Removed);
        let cell = self.cells.remove(c.index());
        for f in cell.faces {
            self.incidence.unlink_face_cell(f, c);
        }
        self.incidence.cell_removed(c);
    }

    /// Requires that no cell lists `f`.
    pub(crate) fn remove_face_core(&mut self, f: FaceHandle) {
        log::trace!("removing face {f}");
        debug_assert!(self.incidence.cells_of_face(f).is_empty());
        self.events.face(&self.faces[f.index()], f, TopologyEvent::Removed);
        let face = self.faces.remove(f.index());
        self.incidence.unregister_face(FaceKey::new(face.edges), f);
        for e in face.edges {
            self.incidence.unlink_edge_face(e, f);
        }
        self.incidence.face_removed(f);

        for i in 0..self.cells.len() {
            let cell = &mut self.cells[i];
            if cell.faces.iter().any(|h| *h > f) {
                cell.faces = cell.faces.map(|h| h.renumbered_after(f));
                let c = CellHandle::from_usize(i);
                self.events.cell(&self.cells[i], c, TopologyEvent::Updated);
            }
        }
    }

    /// Requires that no face or cell lists `e`.
    pub(crate) fn remove_edge_core(&mut self, e: EdgeHandle) {
        log::trace!("removing edge {e}");
        debug_assert!(self.incidence.faces_of_edge(e).is_empty());
        self.events.edge(&self.edges[e.index()], e, TopologyEvent::Removed);
        let edge = self.edges.remove(e.index());
        self.incidence.unregister_edge(EdgeKey::new(edge.from, edge.to), e);
        self.incidence.unlink_node_edge(edge.from, e);
        self.incidence.unlink_node_edge(edge.to, e);
        self.incidence.edge_removed(e);

        // face keys hold edge handles: detach all stale keys, then re-attach
        let shifted: Vec<FaceHandle> = self
            .faces
            .iter()
            .positions(|face| face.edges.iter().any(|h| *h > e))
            .map(FaceHandle::from_usize)
            .collect();
        for &f in &shifted {
            let key = FaceKey::new(self.faces[f.index()].edges);
            self.incidence.unregister_face(key, f);
        }
        for &f in &shifted {
            let face = &mut self.faces[f.index()];
            face.edges = face.edges.map(|h| h.renumbered_after(e));
            let key = FaceKey::new(face.edges);
            let previous = self.incidence.register_face(key, f);
            debug_assert!(previous.is_none(), "face key collision while renumbering");
            self.events.face(&self.faces[f.index()], f, TopologyEvent::Updated);
        }

        for i in 0..self.cells.len() {
            let cell = &mut self.cells[i];
            if cell.edges.iter().any(|h| *h > e) {
                cell.edges = cell.edges.map(|h| h.renumbered_after(e));
                let c = CellHandle::from_usize(i);
                self.events.cell(&self.cells[i], c, TopologyEvent::Updated);
            }
        }
    }

    /// Requires that no edge or cell lists `n`.
    pub(crate) fn remove_node_core(&mut self, n: NodeHandle) {
        log::trace!("removing node {n}");
        debug_assert!(self.incidence.edges_of_node(n).is_empty());
        self.events.node(&self.nodes[n.index()], n, TopologyEvent::Removed);
        self.nodes.remove(n.index());
        self.incidence.node_removed(n);
        self.invalidate_cache();

        // edge keys hold node handles: same two-phase re-key as faces
        let shifted: Vec<EdgeHandle> = self
            .edges
            .iter()
            .positions(|edge| edge.from > n || edge.to > n)
            .map(EdgeHandle::from_usize)
            .collect();
        for &e in &shifted {
            let edge = self.edges[e.index()];
            self.incidence.unregister_edge(EdgeKey::new(edge.from, edge.to), e);
        }
        for &e in &shifted {
            let edge = &mut self.edges[e.index()];
            edge.from = edge.from.renumbered_after(n);
            edge.to = edge.to.renumbered_after(n);
            let key = EdgeKey::new(edge.from, edge.to);
            let previous = self.incidence.register_edge(key, e);
            debug_assert!(previous.is_none(), "edge key collision while renumbering");
            self.events.edge(&self.edges[e.index()], e, TopologyEvent::Updated);
        }

        for i in 0..self.cells.len() {
            let cell = &mut self.cells[i];
            if cell.nodes.iter().any(|h| *h > n) {
                cell.nodes = cell.nodes.map(|h| h.renumbered_after(n));
                let c = CellHandle::from_usize(i);
                self.events.cell(&self.cells[i], c, TopologyEvent::Updated);
            }
        }
    }
}

/// Distinct handles, highest first.
fn descending<H: Ord + Copy>(handles: &[H]) -> Vec<H> {
    let order: Vec<H> = handles.iter().copied().sorted_unstable_by(|a, b| b.cmp(a)).dedup().collect();
    log::trace!("batch removal of {} handle(s) in descending order", order.len());
    order
}
