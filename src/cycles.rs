//! Enumeration of simple cycles (elementary circuits) with Johnson's algorithm.
//!
//! The enumeration works on one strongly connected component at a time. The smallest node of the
//! component is the start node; every circuit through it is reported, then it is removed and the
//! remaining components are processed the same way. A circuit is therefore reported exactly once,
//! beginning with its smallest node.
//!
//! The number of cycles can grow exponentially with the size of the graph. The counts are meant
//! for diagnostics, see [`Graph::count_simple_cycles_interruptible`] to bound the running time.

use std::sync::mpsc::{Receiver, TryRecvError};
use fxhash::{FxHashMap, FxHashSet};
use tracing::debug;
use crate::cust_errors::ProcessingError;
use crate::digraph::Digraph;
use crate::graph::{Graph, Vertex};
use crate::other_ds::NodeSet;

/// Search for all circuits through the smallest node of one strongly connected component.
/// `scc` is compact, `ids[i]` is the id of its node `i` in the enumerated graph.
#[derive(Debug, Clone)]
struct CircuitSearch {
    scc: Digraph,
    ids: Vec<usize>,
    start: usize,
    path: Vec<usize>,
    blocked: NodeSet,
    closed: NodeSet,
    /// For a blocked node `n`, the nodes to unblock once `n` gets unblocked.
    b_lists: FxHashMap<usize, FxHashSet<usize>>,
    /// Nodes on `path` together with their not yet explored out neighbors.
    stack: Vec<(usize, Vec<usize>)>,
}

impl CircuitSearch {

    /// Returns `None` if `scc` is empty.
    fn new(scc: Digraph, ids: Vec<usize>) -> Option<Self> {
        let start = scc.nodes().next()?;
        let mut blocked = NodeSet::with_capacity(scc.num_reserved_nodes());
        blocked.insert(start);
        let neighs = Self::exploration_order(&scc, start);
        Some(CircuitSearch {
            start,
            path: vec![start],
            blocked,
            closed: NodeSet::new(),
            b_lists: FxHashMap::default(),
            stack: vec![(start, neighs)],
            scc,
            ids,
        })
    }

    /// Out neighbors of `node`, arranged such that popping explores them in ascending order.
    fn exploration_order(scc: &Digraph, node: usize) -> Vec<usize> {
        let mut neighs = scc.sorted_out_neighbors(node);
        neighs.reverse();
        neighs
    }

    /// Continues the search until the next circuit is found. Returns `None` once all circuits
    /// through `self.start` were reported.
    fn next_circuit(&mut self) -> Option<Vec<usize>> {
        loop {
            let (this_node, next_node) = match self.stack.last_mut() {
                Some((node, neighs)) => (*node, neighs.pop()),
                None => return None,
            };
            match next_node {
                Some(next_node) if next_node == self.start => {
                    self.closed.extend(self.path.iter().copied());
                    return Some(self.path.iter().map(|node| self.ids[*node]).collect());
                },
                Some(next_node) => {
                    if self.blocked.insert(next_node) {
                        self.path.push(next_node);
                        self.closed.remove(&next_node);
                        let neighs = Self::exploration_order(&self.scc, next_node);
                        self.stack.push((next_node, neighs));
                    }
                },
                None => {
                    if self.closed.contains(&this_node) {
                        self.unblock(this_node);
                    } else {
                        for neigh in self.scc.out_neighbors(this_node).iter().flatten() {
                            self.b_lists.entry(*neigh).or_default().insert(this_node);
                        }
                    }
                    self.stack.pop();
                    self.path.pop();
                },
            }
        }
    }

    fn unblock(&mut self, node: usize) {
        let mut stack = vec![node];
        while let Some(node) = stack.pop() {
            if self.blocked.remove(&node) {
                if let Some(waiting) = self.b_lists.remove(&node) {
                    stack.extend(waiting);
                }
            }
        }
    }

    /// Removes the start node and returns the remaining components that still contain cycles.
    fn into_remaining_components(self) -> Vec<(Digraph, Vec<usize>)> {
        let ids = self.ids;
        let mut scc = self.scc;
        scc.remove_node(self.start);
        scc.split_into_compact_components(2)
            .into_iter()
            .map(|(part, local)| (part, local.into_iter().map(|node| ids[node]).collect::<Vec<usize>>()))
            .collect()
    }
}

/// Lazy iterator over the simple cycles of a [`Digraph`], yielding node ids.
#[derive(Debug, Clone)]
pub struct Circuits {
    pending: Vec<(Digraph, Vec<usize>)>,
    search: Option<CircuitSearch>,
}

impl Circuits {

    fn new(graph: &Digraph) -> Self {
        // A component needs two nodes to hold a cycle, the graph has no loops.
        let mut pending = graph.split_into_compact_components(2);
        pending.reverse();
        Circuits {
            pending,
            search: None,
        }
    }
}

impl Iterator for Circuits {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Vec<usize>> {
        loop {
            if let Some(search) = self.search.as_mut() {
                if let Some(circuit) = search.next_circuit() {
                    return Some(circuit);
                }
                if let Some(done) = self.search.take() {
                    let mut remaining = done.into_remaining_components();
                    remaining.reverse();
                    self.pending.extend(remaining);
                }
            }
            let (scc, ids) = self.pending.pop()?;
            self.search = CircuitSearch::new(scc, ids);
        }
    }
}

impl Digraph {

    /// Returns a lazy iterator over all simple cycles of `self`. Every cycle is reported once,
    /// starting with its smallest node.
    pub fn simple_cycles(&self) -> Circuits {
        Circuits::new(self)
    }
}

/// Lazy iterator over the simple cycles of a [`Graph`], yielding vertex labels.
#[derive(Debug, Clone)]
pub struct SimpleCycles<'a, V> {
    graph: &'a Graph<V>,
    circuits: Circuits,
}

impl<'a, V: Vertex> Iterator for SimpleCycles<'a, V> {
    type Item = Vec<V>;

    fn next(&mut self) -> Option<Vec<V>> {
        self.circuits.next().map(|circuit| self.graph.labels_of(circuit))
    }
}

impl<V: Vertex> Graph<V> {

    /// Returns a lazy iterator over all simple cycles. Every cycle is reported once, starting
    /// with the vertex that comes first in enumeration order.
    pub fn simple_cycles(&self) -> SimpleCycles<'_, V> {
        SimpleCycles {
            graph: self,
            circuits: self.digraph().simple_cycles(),
        }
    }

    /// Returns the number of simple cycles.
    pub fn count_simple_cycles(&self) -> usize {
        let count = self.digraph().simple_cycles().count();
        debug!(count, "counted simple cycles");
        count
    }

    /// Counts the simple cycles until a message arrives on `rec` or its sender disconnects.
    /// The receiver is polled before the enumeration starts and after every cycle.
    ///
    /// Returns `ProcessingError::OutOfTime` holding the cycles counted so far when interrupted.
    pub fn count_simple_cycles_interruptible(&self, rec: &Receiver<u8>) -> Result<usize, ProcessingError> {
        let interrupted = |counted| {
            match rec.try_recv() {
                Err(TryRecvError::Empty) => Ok(()),
                Err(TryRecvError::Disconnected) => {
                    debug!(counted, "cycle count interrupted since disco");
                    Err(ProcessingError::OutOfTime { counted })
                },
                Ok(_) => {
                    debug!(counted, "cycle count interrupted since interrupt send");
                    Err(ProcessingError::OutOfTime { counted })
                },
            }
        };
        let mut counted = 0;
        interrupted(counted)?;
        for _ in self.digraph().simple_cycles() {
            counted += 1;
            interrupted(counted)?;
        }
        debug!(count = counted, "counted simple cycles");
        Ok(counted)
    }
}
