//! Random simple digraphs for experiments and tests.

use fxhash::FxHashSet;
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::debug;
use crate::graph::Graph;

/// Returns a graph on the vertices `0..num_nodes` with `min(num_edges, num_nodes * (num_nodes - 1))`
/// distinct edges drawn uniformly at random. The graph has no self-loops.
pub fn random_digraph<R: Rng + ?Sized>(num_nodes: usize, num_edges: usize, rng: &mut R) -> Graph<usize> {
    let max_edges = num_nodes * num_nodes.saturating_sub(1);
    let num_edges = num_edges.min(max_edges);
    let edges: Vec<(usize, usize)> = if num_edges * 2 > max_edges {
        // Dense: pick from the list of all possible edges.
        let mut all: Vec<(usize, usize)> = (0..num_nodes)
            .flat_map(|s| (0..num_nodes).filter(move |t| *t != s).map(move |t| (s, t)))
            .collect();
        all.shuffle(rng);
        all.truncate(num_edges);
        all
    } else {
        let mut seen = FxHashSet::default();
        let mut edges = Vec::with_capacity(num_edges);
        while edges.len() < num_edges {
            let s = rng.gen_range(0..num_nodes);
            let t = rng.gen_range(0..num_nodes);
            if s != t && seen.insert((s, t)) {
                edges.push((s, t));
            }
        }
        edges
    };
    debug!(num_nodes, num_edges, "generated random digraph");
    Graph::new(0..num_nodes, edges).expect("edges are distinct, loop free and within `0..num_nodes`")
}
