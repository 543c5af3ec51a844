//! Greedy approximation of a minimum directed feedback vertex set.
//!
//! The heuristic repeatedly removes the vertex that splits a strongly connected component into the
//! most strongly connected components. Simple cycle enumeration is provided to check how many
//! cycles survive the removal.

pub mod other_ds;
pub mod cust_errors;
pub mod digraph;
pub mod graph;
pub mod scc;
pub mod cycles;
pub mod greedy;
pub mod random;

pub use cust_errors::{GraphError, ImportError, ProcessingError};
pub use graph::{Graph, Vertex};
pub use greedy::compute_feedback_vertex_set;

/// Returns the number of simple cycles of `graph`.
pub fn count_simple_cycles<V: Vertex>(graph: &Graph<V>) -> usize {
    graph.count_simple_cycles()
}
