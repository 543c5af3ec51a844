//! Greedy feedback vertex set heuristic.
//!
//! Every strongly connected component with at least three nodes is reduced by the node whose
//! removal splits it into the most strongly connected components. The parts are processed the
//! same way until all remaining components have less than three nodes. Components of one or two
//! nodes are left as they are, so a 2-cycle is never broken.

use std::collections::BTreeSet;
use fxhash::FxHashSet;
use tracing::{debug, info, trace};
use crate::digraph::Digraph;
use crate::graph::{Graph, Vertex};

/// Components with fewer nodes are not reduced any further.
pub const MIN_COMPONENT_SIZE: usize = 3;

impl Digraph {

    /// Returns the node whose removal maximizes the number of strongly connected components of
    /// `self`, together with that number. Nodes are tried in ascending order and only a strictly
    /// larger count replaces the current best, so the first node reaching the maximum wins.
    ///
    /// Returns `None` if `self` has less than `MIN_COMPONENT_SIZE` nodes.
    pub fn best_split_node(&self) -> Option<(usize, usize)> {
        if self.num_nodes() < MIN_COMPONENT_SIZE {
            return None
        }
        let mut best: Option<(usize, usize)> = None;
        let mut best_count = 0;
        for node in self.nodes() {
            let reduced = self.without_node(node).expect("`node` is a node of `self`");
            let count = reduced.num_strongly_connected_components();
            trace!(node, count, "split candidate");
            if count > best_count {
                best_count = count;
                best = Some((node, count));
            }
        }
        best
    }

    /// Computes a feedback vertex set of `self` with the greedy splitting heuristic. Every
    /// component on the work list keeps its own best count.
    ///
    /// Components are compact subgraphs paired with the ids their nodes have in `self`, so the
    /// work per component only depends on its own size.
    pub fn greedy_fvs(&self) -> FxHashSet<usize> {
        let mut fvs = FxHashSet::default();
        let mut work_list = self.split_into_compact_components(MIN_COMPONENT_SIZE);
        debug!(components = work_list.len(), "initial components to reduce");
        while let Some((component, ids)) = work_list.pop() {
            if let Some((node, count)) = component.best_split_node() {
                debug!(node = ids[node], count, size = ids.len(), "removing split node");
                fvs.insert(ids[node]);
                let mut reduced = component;
                reduced.remove_node(node);
                let parts = reduced.split_into_compact_components(MIN_COMPONENT_SIZE)
                    .into_iter()
                    .map(|(part, local)| (part, local.into_iter().map(|n| ids[n]).collect::<Vec<usize>>()));
                work_list.extend(parts);
            }
        }
        fvs
    }
}

/// Computes a feedback vertex set of `graph` with the greedy splitting heuristic.
///
/// The result depends on the enumeration order of `graph` but is the same for every call on
/// the same graph. Components with at most two vertices stay untouched, so the result is not
/// guaranteed to leave `graph` acyclic.
pub fn compute_feedback_vertex_set<V: Vertex>(graph: &Graph<V>) -> BTreeSet<V> {
    let fvs = graph.digraph().greedy_fvs();
    info!(size = fvs.len(), "computed feedback vertex set");
    graph.label_set(fvs)
}

impl<V: Vertex> Graph<V> {

    /// See [`compute_feedback_vertex_set`].
    pub fn feedback_vertex_set(&self) -> BTreeSet<V> {
        compute_feedback_vertex_set(self)
    }
}
