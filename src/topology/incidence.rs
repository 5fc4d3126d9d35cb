//! Bottom-up incidence tables and canonical-key lookup maps.
//!
//! The primary entity arrays only store top-down relations (a face knows its
//! edges, a cell knows its faces). [`IncidenceStore`] mirrors them bottom-up:
//!
//! - `edges_per_node[n]`: every edge with `from == n || to == n`,
//! - `faces_per_edge[e]`: every face listing `e` among its edges,
//! - `cells_per_face[f]`: every cell listing `f` among its faces,
//!
//! plus the [`EdgeKey`] → edge and [`FaceKey`] → face maps used for
//! deduplication. Rows are order-irrelevant and never hold duplicates.
//!
//! The store does not know about the entity arrays; the mesh mutators call
//! `link_*`/`unlink_*` for every relation they add or drop, and the
//! `*_removed` hooks when an entity leaves its dense array.

use crate::topology::handle::{CellHandle, EdgeHandle, FaceHandle, NodeHandle};
use crate::topology::keys::{EdgeKey, FaceKey};
use hashbrown::HashMap;

#[derive(Clone, Debug, Default)]
pub struct IncidenceStore {
    edges_per_node: Vec<Vec<EdgeHandle>>,
    faces_per_edge: Vec<Vec<FaceHandle>>,
    cells_per_face: Vec<Vec<CellHandle>>,
    edge_index: HashMap<EdgeKey, EdgeHandle>,
    face_index: HashMap<FaceKey, FaceHandle>,
}

#[inline]
fn push_unique<H: PartialEq>(row: &mut Vec<H>, h: H) {
    if !row.contains(&h) {
        row.push(h);
    }
}

#[inline]
fn remove_value<H: PartialEq>(row: &mut Vec<H>, h: H) -> bool {
    let before = row.len();
    row.retain(|x| *x != h);
    row.len() != before
}

impl IncidenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ---------- row growth (one empty row per inserted entity) ----------

    pub(crate) fn push_node_row(&mut self) {
        self.edges_per_node.push(Vec::new());
    }

    pub(crate) fn push_edge_row(&mut self) {
        self.faces_per_edge.push(Vec::new());
    }

    pub(crate) fn push_face_row(&mut self) {
        self.cells_per_face.push(Vec::new());
    }

    // ---------- link / unlink ----------

    pub(crate) fn link_node_edge(&mut self, n: NodeHandle, e: EdgeHandle) {
        push_unique(&mut self.edges_per_node[n.index()], e);
    }

    pub(crate) fn unlink_node_edge(&mut self, n: NodeHandle, e: EdgeHandle) -> bool {
        self.edges_per_node
            .get_mut(n.index())
            .is_some_and(|row| remove_value(row, e))
    }

    pub(crate) fn link_edge_face(&mut self, e: EdgeHandle, f: FaceHandle) {
        push_unique(&mut self.faces_per_edge[e.index()], f);
    }

    pub(crate) fn unlink_edge_face(&mut self, e: EdgeHandle, f: FaceHandle) -> bool {
        self.faces_per_edge
            .get_mut(e.index())
            .is_some_and(|row| remove_value(row, f))
    }

    pub(crate) fn link_face_cell(&mut self, f: FaceHandle, c: CellHandle) {
        push_unique(&mut self.cells_per_face[f.index()], c);
    }

    pub(crate) fn unlink_face_cell(&mut self, f: FaceHandle, c: CellHandle) -> bool {
        self.cells_per_face
            .get_mut(f.index())
            .is_some_and(|row| remove_value(row, c))
    }

    // ---------- queries ----------

    pub fn edges_of_node(&self, n: NodeHandle) -> &[EdgeHandle] {
        self.edges_per_node.get(n.index()).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn faces_of_edge(&self, e: EdgeHandle) -> &[FaceHandle] {
        self.faces_per_edge.get(e.index()).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn cells_of_face(&self, f: FaceHandle) -> &[CellHandle] {
        self.cells_per_face.get(f.index()).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn node_rows(&self) -> usize {
        self.edges_per_node.len()
    }

    pub fn edge_rows(&self) -> usize {
        self.faces_per_edge.len()
    }

    pub fn face_rows(&self) -> usize {
        self.cells_per_face.len()
    }

    // ---------- canonical key maps ----------

    pub fn lookup_edge(&self, key: EdgeKey) -> Option<EdgeHandle> {
        self.edge_index.get(&key).copied()
    }

    pub fn lookup_face(&self, key: FaceKey) -> Option<FaceHandle> {
        self.face_index.get(&key).copied()
    }

    /// Maps `key` to `e`. Returns the previous owner if the key was taken.
    pub(crate) fn register_edge(&mut self, key: EdgeKey, e: EdgeHandle) -> Option<EdgeHandle> {
        self.edge_index.insert(key, e)
    }

    /// Drops `key` only if it currently maps to `e`.
    pub(crate) fn unregister_edge(&mut self, key: EdgeKey, e: EdgeHandle) -> bool {
        if self.edge_index.get(&key) == Some(&e) {
            self.edge_index.remove(&key);
            true
        } else {
            false
        }
    }

    pub(crate) fn register_face(&mut self, key: FaceKey, f: FaceHandle) -> Option<FaceHandle> {
        self.face_index.insert(key, f)
    }

    pub(crate) fn unregister_face(&mut self, key: FaceKey, f: FaceHandle) -> bool {
        if self.face_index.get(&key) == Some(&f) {
            self.face_index.remove(&key);
            true
        } else {
            false
        }
    }

    pub fn edge_keys(&self) -> impl Iterator<Item = (&EdgeKey, &EdgeHandle)> {
        self.edge_index.iter()
    }

    pub fn face_keys(&self) -> impl Iterator<Item = (&FaceKey, &FaceHandle)> {
        self.face_index.iter()
    }

    pub fn edge_key_count(&self) -> usize {
        self.edge_index.len()
    }

    pub fn face_key_count(&self) -> usize {
        self.face_index.len()
    }

    // ---------- renumbering after an erase ----------
    //
    // Each hook drops the (already emptied) row of the removed entity and
    // shifts every stored handle of the same kind above it down by one.
    // Key maps whose *keys* embed the removed kind (edge keys hold nodes,
    // face keys hold edges) are re-keyed by the mesh, which knows the
    // entity records.

    pub(crate) fn cell_removed(&mut self, removed: CellHandle) {
        for row in &mut self.cells_per_face {
            for c in row.iter_mut() {
                *c = c.renumbered_after(removed);
            }
        }
    }

    pub(crate) fn face_removed(&mut self, removed: FaceHandle) {
        if removed.index() < self.cells_per_face.len() {
            self.cells_per_face.remove(removed.index());
        }
        for row in &mut self.faces_per_edge {
            for f in row.iter_mut() {
                *f = f.renumbered_after(removed);
            }
        }
        for f in self.face_index.values_mut() {
            *f = f.renumbered_after(removed);
        }
    }

    pub(crate) fn edge_removed(&mut self, removed: EdgeHandle) {
        if removed.index() < self.faces_per_edge.len() {
            self.faces_per_edge.remove(removed.index());
        }
        for row in &mut self.edges_per_node {
            for e in row.iter_mut() {
                *e = e.renumbered_after(removed);
            }
        }
        for e in self.edge_index.values_mut() {
            *e = e.renumbered_after(removed);
        }
    }

    pub(crate) fn node_removed(&mut self, removed: NodeHandle) {
        if removed.index() < self.edges_per_node.len() {
            self.edges_per_node.remove(removed.index());
        }
    }
}
