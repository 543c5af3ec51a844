use std::collections::BTreeSet;
use std::io::Cursor;
use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use fvs_greedy::{compute_feedback_vertex_set, count_simple_cycles, Graph, GraphError};
use fvs_greedy::random::random_digraph;

fn set<V: Ord>(items: Vec<V>) -> BTreeSet<V> {
    items.into_iter().collect()
}

#[test]
fn single_triangle() {
    let g = Graph::new(vec![1, 2, 3], vec![(1, 2), (2, 3), (3, 1)]).unwrap();
    let fvs = compute_feedback_vertex_set(&g);
    assert_eq!(fvs.len(), 1);
    assert!(fvs.iter().all(|v| [1, 2, 3].contains(v)));
    assert_eq!(count_simple_cycles(&g.remove_vertices(&fvs).unwrap()), 0);
}

#[test]
fn two_cycle_stays() {
    let g = Graph::new(vec!["A", "B"], vec![("A", "B"), ("B", "A")]).unwrap();
    assert!(compute_feedback_vertex_set(&g).is_empty());
}

#[test]
fn disjoint_triangles() {
    let g = Graph::from_edges(vec![("a", "b"), ("b", "c"), ("c", "a"), ("x", "y"), ("y", "z"), ("z", "x")]).unwrap();
    let fvs = compute_feedback_vertex_set(&g);
    assert_eq!(fvs.len(), 2);
    assert_eq!(fvs.iter().filter(|v| ["a", "b", "c"].contains(v)).count(), 1);
    assert_eq!(fvs.iter().filter(|v| ["x", "y", "z"].contains(v)).count(), 1);
}

#[test]
fn scc_idempotence() {
    let isolated = Graph::<u32>::new(0..6, vec![]).unwrap();
    let sccs = isolated.decompose();
    assert_eq!(sccs.len(), 6);
    assert!(sccs.iter().all(|scc| scc.len() == 1));
    let strongly = Graph::new(0..5, (0..5).map(|i| (i, (i + 2) % 5))).unwrap();
    assert_eq!(strongly.decompose(), vec![vec![0, 1, 2, 3, 4]]);
    assert!(Graph::<u32>::new(vec![], vec![]).unwrap().decompose().is_empty());
}

#[test]
fn metis_and_edge_list_agree() {
    let metis = Graph::read_graph(Cursor::new("4 5 0\n2\n3\n1 4\n2\n")).unwrap();
    let list = Graph::read_edge_list(Cursor::new("1 2\n2 3\n3 -> 1\n3,4\n4 2\n")).unwrap();
    assert_eq!(metis.num_edges(), list.num_edges());
    let fvs_metis: Vec<String> = compute_feedback_vertex_set(&metis).iter().map(|v| v.to_string()).collect();
    let fvs_list: Vec<String> = compute_feedback_vertex_set(&list).into_iter().collect();
    assert_eq!(fvs_metis, fvs_list);
    assert_eq!(count_simple_cycles(&metis), count_simple_cycles(&list));
}

#[test]
fn errors_name_the_vertex() {
    let g = Graph::new(vec![1, 2], vec![(1, 2)]).unwrap();
    assert_eq!(g.remove_vertex(&5), Err(GraphError::NotFound { vertex: "5".to_owned() }));
    assert_eq!(g.induced_subgraph(&[1, 7]), Err(GraphError::InvalidSubset { vertex: "7".to_owned() }));
    let err = Graph::new(vec![1, 2], vec![(2, 2)]).unwrap_err();
    assert!(err.to_string().contains("self-loop"));
}

#[test]
fn random_graph_from_driver() {
    let g = random_digraph(100, 200, &mut StdRng::seed_from_u64(2022));
    let fvs = compute_feedback_vertex_set(&g);
    let residual = g.remove_vertices(&fvs).unwrap();
    assert!(residual.decompose().iter().all(|scc| scc.len() <= 2));
    assert_eq!(set(residual.vertices().copied().collect()).len(), 100 - fvs.len());
}

fn arb_graph() -> impl Strategy<Value = Graph<usize>> {
    (0usize..8, 0usize..20, any::<u64>())
        .prop_map(|(n, m, seed)| random_digraph(n, m, &mut StdRng::seed_from_u64(seed)))
}

proptest! {
    #[test]
    fn prop_fvs_is_subset(g in arb_graph()) {
        let fvs = compute_feedback_vertex_set(&g);
        prop_assert!(fvs.iter().all(|v| g.contains_vertex(v)));
    }

    #[test]
    fn prop_cycles_never_increase(g in arb_graph()) {
        let fvs = compute_feedback_vertex_set(&g);
        let residual = g.remove_vertices(&fvs).unwrap();
        prop_assert!(count_simple_cycles(&residual) <= count_simple_cycles(&g));
        // Only 2-cycles can survive.
        prop_assert!(residual.simple_cycles().all(|cycle| cycle.len() == 2));
    }

    #[test]
    fn prop_deterministic(g in arb_graph()) {
        let again = g.clone();
        prop_assert_eq!(compute_feedback_vertex_set(&g), compute_feedback_vertex_set(&again));
    }

    #[test]
    fn prop_components_partition_vertices(g in arb_graph()) {
        let mut all: Vec<usize> = g.decompose().into_iter().flatten().collect();
        all.sort_unstable();
        prop_assert_eq!(all, g.vertices().copied().collect::<Vec<_>>());
    }
}
