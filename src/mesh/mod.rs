//! The [`VolMesh`] aggregate: dense entity arrays plus their incidence.
//!
//! Nodes, edges, faces and cells live in one `Vec` per kind and are addressed
//! by typed handles. The arrays only hold top-down relations; the
//! [`IncidenceStore`] mirrors them bottom-up and owns the canonical-key maps.
//! Every public mutator keeps both sides in step and leaves the arrays dense.
//!
//! The mutators are split by concern:
//! - [`builder`]: construction from vertex/element buffers and `insert_cell`
//! - [`editor`]: in-place replacement of edge, face and cell relations
//! - [`removal`]: cascading removal with handle renumbering
//! - [`cut`]: edge cutting and splitting
//! - [`gc`]: sweeping of orphaned faces, edges and nodes
//! - [`measure`]: positions, bounding box and quality measures

pub mod builder;
pub mod cut;
pub mod editor;
pub mod gc;
pub mod measure;
pub mod removal;

pub use builder::BuildOptions;
pub use cut::CutParam;
pub use gc::{GcPolicy, GcReport};

use crate::debug_invariants::DebugInvariants;
use crate::geometry::Aabb;
use crate::mesh_error::{Result, VolMeshError};
use crate::topology::cache::InvalidateCache;
use crate::topology::entity::{COUNT_CELL_FACES, Cell, Edge, Face, Node};
use crate::topology::events::{MeshEvents, TopologyEvent};
use crate::topology::handle::{CellHandle, EdgeHandle, EntityKind, FaceHandle, NodeHandle};
use crate::topology::incidence::IncidenceStore;
use crate::topology::keys::{EdgeKey, FaceKey};
use crate::topology::validation::{ValidationOptions, validate_mesh};
use once_cell::sync::OnceCell;
use std::collections::BTreeSet;
use std::fmt;

/// A dynamically editable tetrahedral mesh.
#[derive(Debug, Default)]
pub struct VolMesh {
    pub(crate) nodes: Vec<Node>,
    pub(crate) edges: Vec<Edge>,
    pub(crate) faces: Vec<Face>,
    pub(crate) cells: Vec<Cell>,
    pub(crate) incidence: IncidenceStore,
    /// Bounding box of the current node positions, computed on demand.
    pub(crate) aabb: OnceCell<Option<Aabb>>,
    pub(crate) events: MeshEvents,
}

#[inline]
fn check_index(kind: EntityKind, raw: u32, count: usize) -> Result<()> {
    if raw != u32::MAX && (raw as usize) < count {
        Ok(())
    } else {
        Err(VolMeshError::InvalidHandle {
            kind,
            handle: raw,
            count,
        })
    }
}

/// The node shared by two edges, if any.
#[inline]
fn shared_node(x: &Edge, y: &Edge) -> Option<NodeHandle> {
    if y.has_node(x.from) {
        Some(x.from)
    } else if y.has_node(x.to) {
        Some(x.to)
    } else {
        None
    }
}

impl VolMesh {
    pub fn new() -> Self {
        Self::default()
    }

    // ---------- counts and handle checks ----------

    pub fn count_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn count_edges(&self) -> usize {
        self.edges.len()
    }

    pub fn count_faces(&self) -> usize {
        self.faces.len()
    }

    pub fn count_cells(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn is_node_index(&self, n: NodeHandle) -> bool {
        n.is_valid() && n.index() < self.nodes.len()
    }

    pub fn is_edge_index(&self, e: EdgeHandle) -> bool {
        e.is_valid() && e.index() < self.edges.len()
    }

    pub fn is_face_index(&self, f: FaceHandle) -> bool {
        f.is_valid() && f.index() < self.faces.len()
    }

    pub fn is_cell_index(&self, c: CellHandle) -> bool {
        c.is_valid() && c.index() < self.cells.len()
    }

    pub(crate) fn check_node(&self, n: NodeHandle) -> Result<()> {
        check_index(EntityKind::Node, n.get(), self.nodes.len())
    }

    pub(crate) fn check_edge(&self, e: EdgeHandle) -> Result<()> {
        check_index(EntityKind::Edge, e.get(), self.edges.len())
    }

    pub(crate) fn check_face(&self, f: FaceHandle) -> Result<()> {
        check_index(EntityKind::Face, f.get(), self.faces.len())
    }

    pub(crate) fn check_cell(&self, c: CellHandle) -> Result<()> {
        check_index(EntityKind::Cell, c.get(), self.cells.len())
    }

    // ---------- validated access ----------

    pub fn node(&self, n: NodeHandle) -> Result<&Node> {
        self.check_node(n)?;
        Ok(&self.nodes[n.index()])
    }

    pub fn edge(&self, e: EdgeHandle) -> Result<&Edge> {
        self.check_edge(e)?;
        Ok(&self.edges[e.index()])
    }

    pub fn face(&self, f: FaceHandle) -> Result<&Face> {
        self.check_face(f)?;
        Ok(&self.faces[f.index()])
    }

    pub fn cell(&self, c: CellHandle) -> Result<&Cell> {
        self.check_cell(c)?;
        Ok(&self.cells[c.index()])
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Read-only view of the bottom-up incidence tables and key maps.
    pub fn incidence(&self) -> &IncidenceStore {
        &self.incidence
    }

    // ---------- incidence queries ----------

    pub fn node_incident_edges(&self, n: NodeHandle) -> Result<&[EdgeHandle]> {
        self.check_node(n)?;
        Ok(self.incidence.edges_of_node(n))
    }

    pub fn edge_incident_faces(&self, e: EdgeHandle) -> Result<&[FaceHandle]> {
        self.check_edge(e)?;
        Ok(self.incidence.faces_of_edge(e))
    }

    pub fn face_incident_cells(&self, f: FaceHandle) -> Result<&[CellHandle]> {
        self.check_face(f)?;
        Ok(self.incidence.cells_of_face(f))
    }

    /// Union of the edges incident to any of `nodes`.
    pub fn incident_edges<I>(&self, nodes: I) -> Result<BTreeSet<EdgeHandle>>
    where
        I: IntoIterator<Item = NodeHandle>,
    {
        let mut out = BTreeSet::new();
        for n in nodes {
            out.extend(self.node_incident_edges(n)?.iter().copied());
        }
        Ok(out)
    }

    /// Union of the faces incident to any of `edges`.
    pub fn incident_faces<I>(&self, edges: I) -> Result<BTreeSet<FaceHandle>>
    where
        I: IntoIterator<Item = EdgeHandle>,
    {
        let mut out = BTreeSet::new();
        for e in edges {
            out.extend(self.edge_incident_faces(e)?.iter().copied());
        }
        Ok(out)
    }

    /// Union of the cells incident to any of `faces`.
    pub fn incident_cells<I>(&self, faces: I) -> Result<BTreeSet<CellHandle>>
    where
        I: IntoIterator<Item = FaceHandle>,
    {
        let mut out = BTreeSet::new();
        for f in faces {
            out.extend(self.face_incident_cells(f)?.iter().copied());
        }
        Ok(out)
    }

    // ---------- key lookups ----------

    /// The edge joining `a` and `b` in either direction.
    pub fn edge_handle(&self, a: NodeHandle, b: NodeHandle) -> Option<EdgeHandle> {
        self.incidence.lookup_edge(EdgeKey::new(a, b))
    }

    pub fn edge_exists(&self, a: NodeHandle, b: NodeHandle) -> bool {
        self.edge_handle(a, b).is_some()
    }

    /// The face made of `edges`, in any order.
    pub fn face_handle_by_edges(&self, edges: [EdgeHandle; 3]) -> Option<FaceHandle> {
        self.incidence.lookup_face(FaceKey::new(edges))
    }

    /// The face spanned by `nodes`, in any order.
    pub fn face_handle_by_nodes(&self, nodes: [NodeHandle; 3]) -> Option<FaceHandle> {
        let [a, b, c] = nodes;
        let edges = [
            self.edge_handle(a, b)?,
            self.edge_handle(b, c)?,
            self.edge_handle(c, a)?,
        ];
        self.face_handle_by_edges(edges)
    }

    pub fn face_exists_by_nodes(&self, nodes: [NodeHandle; 3]) -> bool {
        self.face_handle_by_nodes(nodes).is_some()
    }

    // ---------- face traversal ----------

    /// Walks three edges as a triangle `[a, b, c]` where edge 0 joins `a-b`,
    /// edge 1 joins `b-c` and edge 2 joins `c-a`.
    pub(crate) fn triangle_nodes(&self, edges: [EdgeHandle; 3]) -> Option<[NodeHandle; 3]> {
        let [e0, e1, e2] = edges.map(|e| self.edges.get(e.index()));
        let (e0, e1, e2) = (e0?, e1?, e2?);
        let a = shared_node(e2, e0)?;
        let b = shared_node(e0, e1)?;
        let c = shared_node(e1, e2)?;
        (a != b && b != c && a != c).then_some([a, b, c])
    }

    /// The three nodes of `f` in the traversal order of its edges.
    ///
    /// For a face created by the builder this is the outward-facing winding
    /// of the cell that created it.
    pub fn face_nodes_ordered(&self, f: FaceHandle) -> Result<[NodeHandle; 3]> {
        let face = self.face(f)?;
        self.triangle_nodes(face.edges).ok_or_else(|| {
            VolMeshError::structural(format!("edges of face {f} do not close a triangle"))
        })
    }

    /// The three nodes of `f` in ascending handle order.
    pub fn face_nodes(&self, f: FaceHandle) -> Result<[NodeHandle; 3]> {
        let mut nodes = self.face_nodes_ordered(f)?;
        nodes.sort_unstable();
        Ok(nodes)
    }

    // ---------- re-resolution from nodes ----------

    /// Re-resolves the faces of `c` from its nodes and orientation.
    ///
    /// Scans the key maps instead of trusting `cell.faces`; slots whose
    /// triangle no longer exists come back as [`FaceHandle::INVALID`].
    pub fn cell_faces_from_nodes(&self, c: CellHandle) -> Result<[FaceHandle; COUNT_CELL_FACES]> {
        let cell = self.cell(c)?;
        Ok(std::array::from_fn(|f| {
            self.face_handle_by_nodes(cell.local_face_nodes(f))
                .unwrap_or(FaceHandle::INVALID)
        }))
    }

    /// Re-resolves the six edges of `c` from its nodes and orientation.
    pub fn cell_edges_from_nodes(&self, c: CellHandle) -> Result<[EdgeHandle; 6]> {
        let cell = self.cell(c)?;
        Ok(std::array::from_fn(|e| {
            let [a, b] = cell.local_edge_nodes(e);
            self.edge_handle(a, b).unwrap_or(EdgeHandle::INVALID)
        }))
    }

    // ---------- raw commits (inputs already validated) ----------

    pub(crate) fn push_node(&mut self, node: Node) -> NodeHandle {
        let h = NodeHandle::from_usize(self.nodes.len());
        self.nodes.push(node);
        self.incidence.push_node_row();
        self.invalidate_cache();
        self.events.node(&self.nodes[h.index()], h, TopologyEvent::Added);
        h
    }

    /// Appends an edge whose key is known to be free.
    pub(crate) fn push_edge(&mut self, edge: Edge) -> EdgeHandle {
        let h = EdgeHandle::from_usize(self.edges.len());
        self.edges.push(edge);
        self.incidence.push_edge_row();
        self.incidence.register_edge(EdgeKey::new(edge.from, edge.to), h);
        self.incidence.link_node_edge(edge.from, h);
        self.incidence.link_node_edge(edge.to, h);
        self.events.edge(&self.edges[h.index()], h, TopologyEvent::Added);
        h
    }

    /// Appends a face whose key is known to be free.
    pub(crate) fn push_face(&mut self, face: Face) -> FaceHandle {
        let h = FaceHandle::from_usize(self.faces.len());
        self.faces.push(face);
        self.incidence.push_face_row();
        self.incidence.register_face(FaceKey::new(face.edges), h);
        for e in face.edges {
            self.incidence.link_edge_face(e, h);
        }
        self.events.face(&self.faces[h.index()], h, TopologyEvent::Added);
        h
    }

    pub(crate) fn push_cell(&mut self, cell: Cell) -> CellHandle {
        let h = CellHandle::from_usize(self.cells.len());
        self.cells.push(cell);
        for f in cell.faces {
            self.incidence.link_face_cell(f, h);
        }
        self.events.cell(&self.cells[h.index()], h, TopologyEvent::Added);
        h
    }

    // ---------- insertion ----------

    /// Appends a free-standing node.
    pub fn insert_node(&mut self, node: Node) -> NodeHandle {
        let h = self.push_node(node);
        crate::debug_invariants!(self.validate_invariants(), "insert_node");
        h
    }

    /// Returns the edge joining `from` and `to`, creating it if needed.
    pub fn insert_edge(&mut self, from: NodeHandle, to: NodeHandle) -> Result<EdgeHandle> {
        self.check_node(from)?;
        self.check_node(to)?;
        if from == to {
            return Err(VolMeshError::degenerate(format!("edge from node {from} to itself")));
        }
        if let Some(existing) = self.edge_handle(from, to) {
            return Ok(existing);
        }
        let h = self.push_edge(Edge::new(from, to));
        crate::debug_invariants!(self.validate_invariants(), "insert_edge");
        Ok(h)
    }

    /// Returns the face made of `edges`, creating it if needed. The edges
    /// must be distinct and close a triangle.
    pub fn insert_face_edges(&mut self, edges: [EdgeHandle; 3]) -> Result<FaceHandle> {
        self.check_triangle(&edges)?;
        if let Some(existing) = self.face_handle_by_edges(edges) {
            return Ok(existing);
        }
        let h = self.push_face(Face::new(edges));
        crate::debug_invariants!(self.validate_invariants(), "insert_face_edges");
        Ok(h)
    }

    /// Returns the face spanned by `nodes`, creating it if needed. The three
    /// edges must already exist.
    pub fn insert_face(&mut self, nodes: [NodeHandle; 3]) -> Result<FaceHandle> {
        for n in nodes {
            self.check_node(n)?;
        }
        let [a, b, c] = nodes;
        let mut edges = [EdgeHandle::INVALID; 3];
        for (slot, (x, y)) in [(a, b), (b, c), (c, a)].into_iter().enumerate() {
            if x == y {
                return Err(VolMeshError::degenerate(format!("face repeats node {x}")));
            }
            edges[slot] = self.edge_handle(x, y).ok_or_else(|| {
                VolMeshError::structural(format!("edge ({x}, {y}) of face not found"))
            })?;
        }
        self.insert_face_edges(edges)
    }

    /// Appends a cell whose faces and edges are already resolved.
    ///
    /// Unlike [`insert_cell`](Self::insert_cell) nothing is deduplicated or
    /// re-derived; only handle ranges and distinctness are checked.
    pub fn insert_cell_record(&mut self, cell: Cell) -> Result<CellHandle> {
        for n in cell.nodes {
            self.check_node(n)?;
        }
        for f in cell.faces {
            self.check_face(f)?;
        }
        for e in cell.edges {
            self.check_edge(e)?;
        }
        let distinct = BTreeSet::from(cell.nodes).len() == cell.nodes.len()
            && BTreeSet::from(cell.faces).len() == cell.faces.len()
            && BTreeSet::from(cell.edges).len() == cell.edges.len();
        if !distinct {
            return Err(VolMeshError::degenerate("cell record repeats a handle"));
        }
        let h = self.push_cell(cell);
        crate::debug_invariants!(self.validate_invariants(), "insert_cell_record");
        Ok(h)
    }

    /// Rejects edge triples that are out of range, repeated or open.
    pub(crate) fn check_triangle(&self, edges: &[EdgeHandle; 3]) -> Result<()> {
        for e in edges {
            self.check_edge(*e)?;
        }
        if FaceKey::new(*edges).has_repeated_edge() {
            return Err(VolMeshError::degenerate("face repeats an edge"));
        }
        if self.triangle_nodes(*edges).is_none() {
            return Err(VolMeshError::degenerate(format!(
                "edges {:?} do not close a triangle",
                edges
            )));
        }
        Ok(())
    }

    // ---------- extraction ----------

    /// Flat `(vertices, elements)` buffers in the shape [`build`](Self::build)
    /// accepts: current positions and cell node order.
    pub fn to_arrays(&self) -> (Vec<f64>, Vec<u32>) {
        let vertices = self.nodes.iter().flat_map(|n| n.pos).collect();
        let elements = self
            .cells
            .iter()
            .flat_map(|c| c.nodes.map(NodeHandle::get))
            .collect();
        (vertices, elements)
    }

    // ---------- events ----------

    pub fn events_mut(&mut self) -> &mut MeshEvents {
        &mut self.events
    }

    /// Replaces every handler at once and returns the old set.
    pub fn set_events(&mut self, events: MeshEvents) -> MeshEvents {
        std::mem::replace(&mut self.events, events)
    }
}

impl Clone for VolMesh {
    /// Copies the topology and positions. Event handlers are not cloned.
    fn clone(&self) -> Self {
        Self {
            nodes: self.nodes.clone(),
            edges: self.edges.clone(),
            faces: self.faces.clone(),
            cells: self.cells.clone(),
            incidence: self.incidence.clone(),
            aabb: self.aabb.clone(),
            events: MeshEvents::default(),
        }
    }
}

impl InvalidateCache for VolMesh {
    fn invalidate_cache(&mut self) {
        self.aabb.take();
    }
}

impl DebugInvariants for VolMesh {
    fn validate_invariants(&self) -> Result<()> {
        validate_mesh(self, &ValidationOptions::default())
    }
}

impl fmt::Display for VolMesh {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "VolMesh {{ nodes: {}, edges: {}, faces: {}, cells: {} }}",
            self.nodes.len(),
            self.edges.len(),
            self.faces.len(),
            self.cells.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh_generation::one_tet;

    #[test]
    fn invalid_handles_are_reported_not_dereferenced() {
        let mesh = one_tet().unwrap();
        assert!(mesh.is_node_index(NodeHandle::new(3)));
        assert!(!mesh.is_node_index(NodeHandle::new(4)));
        assert!(!mesh.is_edge_index(EdgeHandle::INVALID));
        assert_eq!(
            mesh.face(FaceHandle::new(4)).unwrap_err(),
            VolMeshError::InvalidHandle {
                kind: EntityKind::Face,
                handle: 4,
                count: 4
            }
        );
        assert!(mesh.cell(CellHandle::INVALID).is_err());
    }

    #[test]
    fn face_nodes_sorted_and_ordered_agree_as_sets() {
        let mesh = one_tet().unwrap();
        for i in 0..mesh.count_faces() {
            let f = FaceHandle::from_usize(i);
            let mut ordered = mesh.face_nodes_ordered(f).unwrap();
            let sorted = mesh.face_nodes(f).unwrap();
            assert!(sorted.windows(2).all(|w| w[0] < w[1]));
            ordered.sort_unstable();
            assert_eq!(ordered, sorted);
        }
    }

    #[test]
    fn lookups_ignore_order() {
        let mesh = one_tet().unwrap();
        let (a, b, c) = (NodeHandle::new(0), NodeHandle::new(1), NodeHandle::new(2));
        assert_eq!(mesh.edge_handle(a, b), mesh.edge_handle(b, a));
        assert!(mesh.edge_exists(a, c));
        let f = mesh.face_handle_by_nodes([a, b, c]).unwrap();
        assert_eq!(mesh.face_handle_by_nodes([c, a, b]), Some(f));
        assert_eq!(mesh.face_nodes(f).unwrap(), [a, b, c]);
        assert!(!mesh.face_exists_by_nodes([a, a, c]));
    }

    #[test]
    fn re_resolution_matches_stored_relations() {
        let mesh = one_tet().unwrap();
        let c = CellHandle::new(0);
        let cell = *mesh.cell(c).unwrap();
        assert_eq!(mesh.cell_faces_from_nodes(c).unwrap(), cell.faces);
        assert_eq!(mesh.cell_edges_from_nodes(c).unwrap(), cell.edges);
    }

    #[test]
    fn insert_edge_deduplicates_and_rejects_loops() {
        let mut mesh = one_tet().unwrap();
        let (a, b) = (NodeHandle::new(0), NodeHandle::new(1));
        let existing = mesh.edge_handle(a, b).unwrap();
        assert_eq!(mesh.insert_edge(b, a).unwrap(), existing);
        assert_eq!(mesh.count_edges(), 6);
        assert!(matches!(
            mesh.insert_edge(a, a),
            Err(VolMeshError::DegenerateInput(_))
        ));
        let n = mesh.insert_node(Node::at([5.0, 5.0, 5.0]));
        let e = mesh.insert_edge(a, n).unwrap();
        assert_eq!(e, EdgeHandle::new(6));
        assert_eq!(mesh.node_incident_edges(n).unwrap(), &[e]);
    }

    #[test]
    fn insert_face_needs_existing_closed_edges() {
        let mut mesh = one_tet().unwrap();
        let n = mesh.insert_node(Node::at([0.0, -1.0, 0.0]));
        let (a, b) = (NodeHandle::new(0), NodeHandle::new(2));
        assert!(matches!(
            mesh.insert_face([a, b, n]),
            Err(VolMeshError::StructuralInconsistency(_))
        ));
        mesh.insert_edge(a, n).unwrap();
        mesh.insert_edge(b, n).unwrap();
        let f = mesh.insert_face([a, b, n]).unwrap();
        assert_eq!(f, FaceHandle::new(4));
        assert_eq!(mesh.insert_face([n, b, a]).unwrap(), f);
        assert!(mesh.face_incident_cells(f).unwrap().is_empty());
        assert!(mesh.validate_invariants().is_ok());
    }

    #[test]
    fn to_arrays_reproduces_build_input() {
        let mesh = one_tet().unwrap();
        let (vertices, elements) = mesh.to_arrays();
        assert_eq!(
            vertices,
            vec![-1.0, 0.0, 0.0, 0.0, 0.0, -2.0, 1.0, 0.0, 0.0, 0.0, 2.0, -1.0]
        );
        assert_eq!(elements, vec![0, 1, 2, 3]);
    }

    #[test]
    fn clone_is_independent_and_drops_handlers() {
        let mut mesh = one_tet().unwrap();
        mesh.events_mut()
            .set_on_node(Some(Box::new(|_: &Node, _: NodeHandle, _: TopologyEvent| {})));
        let mut copy = mesh.clone();
        assert!(copy.events_mut().is_empty());
        copy.remove_cell(CellHandle::new(0)).unwrap();
        assert_eq!(mesh.count_cells(), 1);
        assert_eq!(copy.count_cells(), 0);
        assert_eq!(
            mesh.to_string(),
            "VolMesh { nodes: 4, edges: 6, faces: 4, cells: 1 }"
        );
    }
}
