mod common;

use common::*;
use proptest::prelude::*;
use volmesh::prelude::*;

#[derive(Clone, Debug)]
enum Op {
    RemoveCell(usize),
    RemoveFace(usize),
    RemoveEdge(usize),
    RemoveNode(usize),
    Cut(usize, f64),
    Split(usize, f64),
    Collect(bool),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        any::<usize>().prop_map(Op::RemoveCell),
        any::<usize>().prop_map(Op::RemoveFace),
        any::<usize>().prop_map(Op::RemoveEdge),
        any::<usize>().prop_map(Op::RemoveNode),
        (any::<usize>(), 0.0f64..=1.0).prop_map(|(e, t)| Op::Cut(e, t)),
        (any::<usize>(), 0.0f64..=1.0).prop_map(|(e, t)| Op::Split(e, t)),
        any::<bool>().prop_map(Op::Collect),
    ]
}

/// Picks an index below `count`, or `None` for an empty array.
fn pick(raw: usize, count: usize) -> Option<usize> {
    (count > 0).then(|| raw % count)
}

fn apply(mesh: &mut VolMesh, op: &Op) {
    let before = (
        mesh.count_nodes(),
        mesh.count_edges(),
        mesh.count_faces(),
        mesh.count_cells(),
    );
    match *op {
        Op::RemoveCell(raw) => {
            if let Some(i) = pick(raw, before.3) {
                mesh.remove_cell(CellHandle::from_usize(i)).unwrap();
                assert_eq!(mesh.count_cells(), before.3 - 1);
            }
        }
        Op::RemoveFace(raw) => {
            if let Some(i) = pick(raw, before.2) {
                mesh.remove_face(FaceHandle::from_usize(i)).unwrap();
                assert_eq!(mesh.count_faces(), before.2 - 1);
            }
        }
        Op::RemoveEdge(raw) => {
            if let Some(i) = pick(raw, before.1) {
                mesh.remove_edge(EdgeHandle::from_usize(i)).unwrap();
                assert_eq!(mesh.count_edges(), before.1 - 1);
            }
        }
        Op::RemoveNode(raw) => {
            if let Some(i) = pick(raw, before.0) {
                mesh.remove_node(NodeHandle::from_usize(i)).unwrap();
                assert_eq!(mesh.count_nodes(), before.0 - 1);
            }
        }
        Op::Cut(raw, t) => {
            if let Some(i) = pick(raw, before.1) {
                let (np0, np1) = mesh
                    .cut_edge(EdgeHandle::from_usize(i), CutParam::Fraction(t))
                    .unwrap();
                assert_eq!(mesh.edge_handle(np0, np1), None);
                assert_eq!(mesh.count_nodes(), before.0 + 2);
            }
        }
        Op::Split(raw, t) => {
            if let Some(i) = pick(raw, before.1) {
                mesh.split_edge(EdgeHandle::from_usize(i), t).unwrap();
                assert_eq!(mesh.count_edges(), before.1 + 1);
            }
        }
        Op::Collect(full) => {
            let policy = if full { GcPolicy::full() } else { GcPolicy::default() };
            let report = mesh.garbage_collect_with(&policy);
            assert_eq!(mesh.count_faces(), before.2 - report.faces);
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn random_edits_keep_incidence_exact(ops in prop::collection::vec(op(), 1..24)) {
        let mut mesh = kuhn_box(2, 1, 1, 1.0).unwrap();
        for op in &ops {
            apply(&mut mesh, op);
            assert_consistent(&mesh);
        }
    }

    #[test]
    fn batch_node_removal_is_order_independent(
        picks in prop::collection::vec(0usize..12, 1..6),
    ) {
        let base = kuhn_box(2, 1, 1, 1.0).unwrap();
        let handles: Vec<NodeHandle> = picks.iter().map(|i| NodeHandle::from_usize(*i)).collect();
        let mut reversed = handles.clone();
        reversed.reverse();

        let mut a = base.clone();
        a.remove_nodes(&handles).unwrap();
        let mut b = base.clone();
        b.remove_nodes(&reversed).unwrap();

        let distinct = picks.iter().collect::<std::collections::BTreeSet<_>>().len();
        prop_assert_eq!(a.count_nodes(), base.count_nodes() - distinct);
        prop_assert_eq!(a.cells(), b.cells());
        prop_assert_eq!(a.edges(), b.edges());
        assert_consistent(&a);
    }
}
