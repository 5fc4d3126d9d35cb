mod common;

use common::*;
use volmesh::mesh_generation::{ONE_TET_ELEMENTS, ONE_TET_VERTICES};
use volmesh::prelude::*;

fn outward(mesh: &VolMesh, c: CellHandle, tri: [NodeHandle; 3]) -> bool {
    let p = |n: NodeHandle| mesh.node(n).unwrap().pos;
    let cell = mesh.cell(c).unwrap();
    let centroid = |pts: &[[f64; 3]]| {
        let k = pts.len() as f64;
        let mut s = [0.0; 3];
        for q in pts {
            for i in 0..3 {
                s[i] += q[i] / k;
            }
        }
        s
    };
    let g = centroid(&cell.nodes.map(p)[..]);
    let [a, b, d] = tri.map(p);
    let fc = centroid(&[a, b, d][..]);
    let u = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
    let v = [d[0] - a[0], d[1] - a[1], d[2] - a[2]];
    let n = [
        u[1] * v[2] - u[2] * v[1],
        u[2] * v[0] - u[0] * v[2],
        u[0] * v[1] - u[1] * v[0],
    ];
    n[0] * (fc[0] - g[0]) + n[1] * (fc[1] - g[1]) + n[2] * (fc[2] - g[2]) > 0.0
}

#[test]
fn one_tetrahedron_fixture() {
    let mesh = VolMesh::build(&ONE_TET_VERTICES, &ONE_TET_ELEMENTS).unwrap();
    assert_eq!(mesh.count_nodes(), 4);
    assert_eq!(mesh.count_edges(), 6);
    assert_eq!(mesh.count_faces(), 4);
    assert_eq!(mesh.count_cells(), 1);
    assert_consistent(&mesh);
}

#[test]
fn two_tets_share_one_face_and_three_edges() {
    let mesh = two_tets().unwrap();
    assert_eq!(mesh.count_faces(), 4 + 4 - 1);
    assert_eq!(mesh.count_edges(), 6 + 6 - 3);
    let shared = mesh.face_handle_by_nodes([nh(0), nh(1), nh(2)]).unwrap();
    assert_eq!(
        mesh.face_incident_cells(shared).unwrap(),
        &[CellHandle::new(0), CellHandle::new(1)]
    );
    let c0 = mesh.cell(CellHandle::new(0)).unwrap();
    let c1 = mesh.cell(CellHandle::new(1)).unwrap();
    assert!(!c0.positive);
    assert!(c1.positive);
    assert!(c0.faces.contains(&shared) && c1.faces.contains(&shared));
    let common_edges = c0.edges.iter().filter(|e| c1.edges.contains(e)).count();
    assert_eq!(common_edges, 3);
    assert_consistent(&mesh);
}

#[test]
fn local_faces_point_outward_for_both_windings() {
    for mesh in [two_tets().unwrap(), kuhn_box(2, 1, 1, 1.0).unwrap()] {
        for i in 0..mesh.count_cells() {
            let c = CellHandle::from_usize(i);
            let cell = *mesh.cell(c).unwrap();
            for f in 0..4 {
                assert!(outward(&mesh, c, cell.local_face_nodes(f)), "cell {c} face {f}");
            }
        }
    }
}

#[test]
fn faces_walk_outward_from_their_creating_cell() {
    let mesh = one_tet().unwrap();
    let c = CellHandle::new(0);
    for f in mesh.cell(c).unwrap().faces {
        assert!(outward(&mesh, c, mesh.face_nodes_ordered(f).unwrap()));
    }
}

#[test]
fn kuhn_cube_topology() {
    let mesh = kuhn_box(1, 1, 1, 1.0).unwrap();
    assert_eq!(
        (mesh.count_nodes(), mesh.count_edges(), mesh.count_faces(), mesh.count_cells()),
        (8, 19, 18, 6)
    );
    let boundary = (0..mesh.count_faces())
        .filter(|i| mesh.face_incident_cells(FaceHandle::from_usize(*i)).unwrap().len() == 1)
        .count();
    assert_eq!(boundary, 12);
    // the body diagonal is shared by all six tetrahedra
    let diag = mesh.edge_handle(nh(0), nh(7)).unwrap();
    assert_eq!(mesh.cells().iter().filter(|c| c.edges.contains(&diag)).count(), 6);
    assert_consistent(&mesh);
}

#[test]
fn round_trip_through_arrays() {
    let mesh = one_tet().unwrap();
    let (vertices, elements) = mesh.to_arrays();
    let rebuilt = VolMesh::build(&vertices, &elements).unwrap();
    assert_eq!(rebuilt.count_nodes(), 4);
    assert_eq!(rebuilt.count_cells(), 1);
    assert_eq!(cell_shapes(&rebuilt), cell_shapes(&mesh));

    let block = kuhn_box(2, 2, 2, 0.5).unwrap();
    let (vertices, elements) = block.to_arrays();
    let rebuilt = VolMesh::build(&vertices, &elements).unwrap();
    assert_eq!(rebuilt.count_edges(), block.count_edges());
    assert_eq!(rebuilt.count_faces(), block.count_faces());
    assert_eq!(cell_shapes(&rebuilt), cell_shapes(&block));
}

#[test]
fn insert_cell_reuses_existing_face() {
    let mut mesh = one_tet().unwrap();
    let apex = mesh.insert_node(Node::at([0.0, -2.0, -1.0]));
    let c = mesh.insert_cell([nh(0), nh(1), nh(2), apex]).unwrap();
    assert_eq!(c, CellHandle::new(1));
    assert_eq!((mesh.count_edges(), mesh.count_faces()), (9, 7));
    let shared = mesh.face_handle_by_nodes([nh(2), nh(0), nh(1)]).unwrap();
    assert_eq!(mesh.face_incident_cells(shared).unwrap().len(), 2);
    assert_consistent(&mesh);
}
