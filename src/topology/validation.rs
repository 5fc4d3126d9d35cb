//! Full consistency check of a [`VolMesh`].
//!
//! [`validate_mesh`] walks every entity and every incidence row and reports
//! the first relation that breaks one of the mesh invariants:
//!
//! - every stored handle lies in `[0, count)` of its kind,
//! - incidence rows exist for every node, edge and face (dense arrays),
//! - the key maps are a bijection onto the edge and face arrays,
//! - the node→edge, edge→face and face→cell rows are the exact inverse of
//!   `edge.{from,to}`, `face.edges` and `cell.faces`,
//! - no row holds a handle twice and no edge has `from == to`.
//!
//! Face closure and cell/edge node agreement are optional: a cut leaves the
//! faces around the severed edge open on purpose.

use crate::mesh::VolMesh;
use crate::mesh_error::VolMeshError;
use crate::topology::handle::{CellHandle, EdgeHandle, FaceHandle, NodeHandle};
use crate::topology::keys::{EdgeKey, FaceKey};
use std::collections::HashSet;
use std::hash::Hash;

/// What to do with a broken invariant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViolationHandling {
    /// Skip it.
    Ignore,
    /// Log it with `log::warn!` and keep going.
    Warn,
    /// Return it as [`VolMeshError::InvariantViolation`].
    #[default]
    Error,
}

/// Optional validation toggles.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidationOptions {
    /// Require each face's three edges to close a triangle.
    pub check_face_closure: bool,
    /// Require each cell's edges and faces to be the ones its nodes and
    /// orientation masks name.
    pub check_cell_nodes: bool,
    pub on_violation: ViolationHandling,
}

impl ValidationOptions {
    /// Every check enabled, failing on the first violation. Holds for a
    /// freshly built mesh; cuts relax the optional checks.
    pub fn strict() -> Self {
        Self {
            check_face_closure: true,
            check_cell_nodes: true,
            on_violation: ViolationHandling::Error,
        }
    }
}

struct Reporter {
    handling: ViolationHandling,
    warnings: usize,
}

impl Reporter {
    fn report(&mut self, message: String) -> Result<(), VolMeshError> {
        match self.handling {
            ViolationHandling::Error => Err(VolMeshError::invariant(message)),
            ViolationHandling::Warn => {
                log::warn!("mesh invariant violated: {message}");
                self.warnings += 1;
                Ok(())
            }
            ViolationHandling::Ignore => Ok(()),
        }
    }

    fn check(&mut self, ok: bool, message: impl FnOnce() -> String) -> Result<(), VolMeshError> {
        if ok { Ok(()) } else { self.report(message()) }
    }
}

fn has_duplicates<H: Eq + Hash + Copy>(row: &[H]) -> bool {
    let mut seen = HashSet::with_capacity(row.len());
    row.iter().any(|h| !seen.insert(*h))
}

/// Validate `mesh` and return the first violation (in `Error` mode).
pub fn validate_mesh(mesh: &VolMesh, options: &ValidationOptions) -> Result<(), VolMeshError> {
    let mut r = Reporter {
        handling: options.on_violation,
        warnings: 0,
    };
    let inc = mesh.incidence();
    let (n_nodes, n_edges, n_faces) = (mesh.count_nodes(), mesh.count_edges(), mesh.count_faces());

    r.check(inc.node_rows() == n_nodes, || {
        format!("{} node incidence rows for {n_nodes} nodes", inc.node_rows())
    })?;
    r.check(inc.edge_rows() == n_edges, || {
        format!("{} edge incidence rows for {n_edges} edges", inc.edge_rows())
    })?;
    r.check(inc.face_rows() == n_faces, || {
        format!("{} face incidence rows for {n_faces} faces", inc.face_rows())
    })?;
    r.check(inc.edge_key_count() == n_edges, || {
        format!("{} edge keys for {n_edges} edges", inc.edge_key_count())
    })?;
    r.check(inc.face_key_count() == n_faces, || {
        format!("{} face keys for {n_faces} faces", inc.face_key_count())
    })?;

    // edges: endpoints, key, node rows
    for (i, edge) in mesh.edges().iter().enumerate() {
        let e = EdgeHandle::from_usize(i);
        let ends_ok = mesh.is_node_index(edge.from) && mesh.is_node_index(edge.to);
        r.check(ends_ok, || format!("edge {e} has out-of-range endpoint"))?;
        if !ends_ok {
            continue;
        }
        r.check(edge.from != edge.to, || format!("edge {e} is a loop on node {}", edge.from))?;
        let key = EdgeKey::new(edge.from, edge.to);
        r.check(inc.lookup_edge(key) == Some(e), || {
            format!("edge key of edge {e} maps to {:?}", inc.lookup_edge(key))
        })?;
        for n in [edge.from, edge.to] {
            r.check(inc.edges_of_node(n).contains(&e), || {
                format!("node {n} does not list its edge {e}")
            })?;
        }
    }
    for i in 0..inc.node_rows() {
        let n = NodeHandle::from_usize(i);
        let row = inc.edges_of_node(n);
        r.check(!has_duplicates(row), || format!("node {n} lists an edge twice"))?;
        for e in row {
            let ok = mesh.edge(*e).is_ok_and(|edge| edge.has_node(n));
            r.check(ok, || format!("node {n} lists edge {e} which does not touch it"))?;
        }
    }

    // faces: edges, key, edge rows, closure
    for (i, face) in mesh.faces().iter().enumerate() {
        let f = FaceHandle::from_usize(i);
        let edges_ok = face.edges.iter().all(|e| mesh.is_edge_index(*e));
        r.check(edges_ok, || format!("face {f} has out-of-range edge"))?;
        if !edges_ok {
            continue;
        }
        let key = FaceKey::new(face.edges);
        r.check(!key.has_repeated_edge(), || format!("face {f} repeats an edge"))?;
        r.check(inc.lookup_face(key) == Some(f), || {
            format!("face key of face {f} maps to {:?}", inc.lookup_face(key))
        })?;
        for e in face.edges {
            r.check(inc.faces_of_edge(e).contains(&f), || {
                format!("edge {e} does not list its face {f}")
            })?;
        }
        if options.check_face_closure {
            r.check(mesh.face_nodes_ordered(f).is_ok(), || {
                format!("edges of face {f} do not close a triangle")
            })?;
        }
    }
    for i in 0..inc.edge_rows() {
        let e = EdgeHandle::from_usize(i);
        let row = inc.faces_of_edge(e);
        r.check(!has_duplicates(row), || format!("edge {e} lists a face twice"))?;
        for f in row {
            let ok = mesh.face(*f).is_ok_and(|face| face.edges.contains(&e));
            r.check(ok, || format!("edge {e} lists face {f} which does not use it"))?;
        }
    }

    // cells: ranges, distinctness, face rows, mask agreement
    for (i, cell) in mesh.cells().iter().enumerate() {
        let c = CellHandle::from_usize(i);
        let ranges_ok = cell.nodes.iter().all(|n| mesh.is_node_index(*n))
            && cell.faces.iter().all(|f| mesh.is_face_index(*f))
            && cell.edges.iter().all(|e| mesh.is_edge_index(*e));
        r.check(ranges_ok, || format!("cell {c} has out-of-range handle"))?;
        if !ranges_ok {
            continue;
        }
        r.check(!has_duplicates(&cell.nodes), || format!("cell {c} repeats a node"))?;
        r.check(!has_duplicates(&cell.faces), || format!("cell {c} repeats a face"))?;
        r.check(!has_duplicates(&cell.edges), || format!("cell {c} repeats an edge"))?;
        for f in cell.faces {
            r.check(inc.cells_of_face(f).contains(&c), || {
                format!("face {f} does not list its cell {c}")
            })?;
        }
        if options.check_cell_nodes {
            for (local, e) in cell.edges.iter().enumerate() {
                let [a, b] = cell.local_edge_nodes(local);
                r.check(mesh.edge_handle(a, b) == Some(*e), || {
                    format!("local edge {local} of cell {c} is not edge ({a}, {b})")
                })?;
            }
            for (local, f) in cell.faces.iter().enumerate() {
                let nodes = cell.local_face_nodes(local);
                r.check(mesh.face_handle_by_nodes(nodes) == Some(*f), || {
                    format!("local face {local} of cell {c} is not face {nodes:?}")
                })?;
            }
        }
    }
    for i in 0..inc.face_rows() {
        let f = FaceHandle::from_usize(i);
        let row = inc.cells_of_face(f);
        r.check(!has_duplicates(row), || format!("face {f} lists a cell twice"))?;
        for c in row {
            let ok = mesh.cell(*c).is_ok_and(|cell| cell.faces.contains(&f));
            r.check(ok, || format!("face {f} lists cell {c} which does not use it"))?;
        }
    }

    if r.warnings > 0 {
        log::warn!("mesh validation finished with {} violation(s)", r.warnings);
    }
    Ok(())
}
