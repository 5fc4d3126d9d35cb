#![allow(dead_code)]

use std::collections::BTreeSet;
use volmesh::prelude::*;

pub use volmesh::mesh_generation::{kuhn_box, one_tet, two_tets};

pub fn nh(i: u32) -> NodeHandle {
    NodeHandle::new(i)
}

/// Checks incidence symmetry directly from the public queries, independent
/// of the crate's own validator, then runs the validator too.
pub fn assert_consistent(mesh: &VolMesh) {
    for (i, edge) in mesh.edges().iter().enumerate() {
        let e = EdgeHandle::from_usize(i);
        assert_ne!(edge.from, edge.to, "edge {e} is a loop");
        for n in [edge.from, edge.to] {
            assert!(
                mesh.node_incident_edges(n).unwrap().contains(&e),
                "node {n} misses edge {e}"
            );
        }
        assert_eq!(mesh.edge_handle(edge.from, edge.to), Some(e));
    }
    for i in 0..mesh.count_nodes() {
        let n = NodeHandle::from_usize(i);
        for e in mesh.node_incident_edges(n).unwrap() {
            assert!(mesh.edge(*e).unwrap().has_node(n), "node {n} lists foreign edge {e}");
        }
    }
    for (i, face) in mesh.faces().iter().enumerate() {
        let f = FaceHandle::from_usize(i);
        for e in face.edges {
            assert!(mesh.edge_incident_faces(e).unwrap().contains(&f));
        }
        assert_eq!(mesh.face_handle_by_edges(face.edges), Some(f));
    }
    for i in 0..mesh.count_edges() {
        let e = EdgeHandle::from_usize(i);
        for f in mesh.edge_incident_faces(e).unwrap() {
            assert!(mesh.face(*f).unwrap().edges.contains(&e));
        }
    }
    for (i, cell) in mesh.cells().iter().enumerate() {
        let c = CellHandle::from_usize(i);
        for f in cell.faces {
            assert!(mesh.face_incident_cells(f).unwrap().contains(&c));
        }
        assert!(cell.nodes.iter().all(|n| mesh.is_node_index(*n)));
        assert!(cell.edges.iter().all(|e| mesh.is_edge_index(*e)));
    }
    for i in 0..mesh.count_faces() {
        let f = FaceHandle::from_usize(i);
        for c in mesh.face_incident_cells(f).unwrap() {
            assert!(mesh.cell(*c).unwrap().faces.contains(&f));
        }
    }
    assert_eq!(mesh.incidence().edge_key_count(), mesh.count_edges());
    assert_eq!(mesh.incidence().face_key_count(), mesh.count_faces());
    mesh.validate_invariants().unwrap();
}

/// Node position sets of every cell, for comparisons that ignore handles.
pub fn cell_shapes(mesh: &VolMesh) -> BTreeSet<Vec<[u64; 3]>> {
    mesh.cells()
        .iter()
        .map(|cell| {
            let mut pts: Vec<[u64; 3]> = cell
                .nodes
                .iter()
                .map(|n| mesh.node(*n).unwrap().pos.map(f64::to_bits))
                .collect();
            pts.sort_unstable();
            pts
        })
        .collect()
}
