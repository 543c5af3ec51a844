//! Directed graph datastructure over dense node ids.
//! The main fields are the two adjacency lists `in_list` and `out_list` which respectively hold
//! all incoming and outgoing neighbors of a node in a `FxHashSet`. A removed node keeps its slot
//! (set to `None`), so subgraphs share the id space of the graph they were built from.

use std::io::prelude::*;
use std::io;
use fxhash::{FxHashMap, FxHashSet};
use itertools::Itertools;
use crate::cust_errors::{GraphError, ImportError};
use crate::other_ds::NodeSet;

/// The graph datastructure
#[derive(Debug, Default, Clone, Eq, PartialEq)]
pub struct Digraph {
    in_list: Vec<Option<FxHashSet<usize>>>,
    out_list: Vec<Option<FxHashSet<usize>>>,
}

impl Digraph {

    /// Returns a graph with the nodes `0..num_nodes` and no edges.
    pub fn new(num_nodes: usize) -> Self {
        Digraph {
            in_list: vec![Some(FxHashSet::default()); num_nodes],
            out_list: vec![Some(FxHashSet::default()); num_nodes],
        }
    }

    /// Returns a hashset of the neighborhood of outgoing nodes of `node` if `node` was not already deleted.
    pub fn out_neighbors(&self, node: usize) -> &Option<FxHashSet<usize>> {
        &self.out_list[node]
    }

    /// Returns a hashset of the neighborhood of incoming nodes of `node` if `node` was not already deleted.
    pub fn in_neighbors(&self, node: usize) -> &Option<FxHashSet<usize>> {
        &self.in_list[node]
    }

    /// Returns the outgoing neighbors of `node` in ascending order, or an empty `Vec` if `node`
    /// was deleted.
    pub fn sorted_out_neighbors(&self, node: usize) -> Vec<usize> {
        self.out_list[node].iter().flatten().copied().sorted_unstable().collect()
    }

    /// Returns the amount of Nodes including the removed once.
    pub fn num_reserved_nodes(&self) -> usize {
        self.out_list.len()
    }

    /// Returns an iterator over all undeleted nodes in ascending order.
    pub fn nodes(&self) -> impl DoubleEndedIterator<Item=usize> + '_ {
       self.out_list.iter()
           .enumerate()
           .filter_map(|(index, node)| {
               if node.is_some() {
                   Some(index)
               } else {
                   None
               }
           })
    }

    /// Returns the number of nodes in the graph.
    pub fn num_nodes(&self) -> usize {
        self.nodes().count()
    }

    /// Checks if `node` exists.
    pub fn has_node(&self, node: usize) -> bool {
        self.out_list.len() > node && self.out_list[node].is_some() && self.in_list[node].is_some()
    }

    /// Returns the number of edges in the graph.
    pub fn num_edges(&self) -> usize {
        self.out_list.iter().flatten().map(|outs| outs.len()).sum()
    }

    /// Checks if `edge` exists.
    pub fn has_edge(&self, edge: (usize, usize)) -> bool {
        self.out_list.len() > edge.0 && self.out_list[edge.0].as_ref().filter(|outs| outs.contains(&edge.1)).is_some()
    }

    /// Returns an iterator over all edges, ordered by source and then by target.
    pub fn edges(&self) -> impl Iterator<Item=(usize, usize)> + '_ {
       self.out_list.iter()
           .enumerate()
           .filter(|(_,neighs)| neighs.is_some())
           .flat_map(|(index, neighs)| {
               neighs.as_ref()
                   .expect("Due to filter")
                   .iter()
                   .copied()
                   .sorted_unstable()
                   .map(move |nn| (index, nn))
           })
    }

    /// Returns the out degree of `node` or None if `node` was deleted.
    ///
    /// # Panics
    /// Panics if node id is out of bounds.
    pub fn out_degree(&self, node: usize) -> Option<usize> {
        self.out_list[node].as_ref().map(|outs| outs.len())
    }

    /// Returns the in degree of `node` or None if `node` was deleted.
    ///
    /// # Panics
    /// Panics if node id is out of bounds.
    pub fn in_degree(&self, node: usize) -> Option<usize> {
        self.in_list[node].as_ref().map(|ins| ins.len())
    }
}

// Dynamic operations.
impl Digraph {

    /// Adds the directed edge `(src, trg)` to the graph if not already present.
    /// Returns true if the edge was added.
    ///
    /// # Panics
    /// Panics if a node index is invalid
    pub fn add_edge_checked(&mut self, (src, trg): (usize, usize)) -> bool {
        if let Some(out_list) = self.out_list[src].as_mut() {
            if let Some(in_list) = self.in_list[trg].as_mut() {
                if !out_list.contains(&trg) {
                    out_list.insert(trg);
                    in_list.insert(src);
                    return true
                }
            }
        }
        false
    }

    /// Removes the node `node` and all adjacent edges from the graph.
    /// Returns the a tuple of incoming and outgoing neighbors if the node was removed
    /// successfully. Returns None if the node did not exist.
    ///
    /// # Panics
    /// Panics if the node index is out of bounds.
    pub fn remove_node(&mut self, node: usize) -> Option<(FxHashSet<usize>, FxHashSet<usize>)> {
        let in_neighbors = self.in_list[node].take()?;
        let out_neighbors = self.out_list[node].take().expect("`in_list` and `out_list` are removed together");
        for in_neighbor in &in_neighbors {
            if let Some(outs) = self.out_list[*in_neighbor].as_mut() {
                outs.remove(&node);
            }
        }
        for out_neighbor in &out_neighbors {
            if let Some(ins) = self.in_list[*out_neighbor].as_mut() {
                ins.remove(&node);
            }
        }
        Some((in_neighbors, out_neighbors))
    }

    /// Removes `nodes` from the graph
    ///
    /// # Panics
    /// Panics if a node index is invalid.
    pub fn remove_nodes<I: IntoIterator<Item=usize>>(&mut self, nodes: I) {
        for node in nodes {
            self.remove_node(node);
        }
    }

    /// Returns a copy of `self` without `node`, or `None` if `node` does not exist.
    pub fn without_node(&self, node: usize) -> Option<Self> {
        if !self.has_node(node) {
            return None
        }
        let mut clone = self.clone();
        clone.remove_node(node);
        Some(clone)
    }

    /// Build a subgraph given the set `node_set` of nodes the subgraph will contain.
    /// Nodes of `node_set` that do not exist in `self` are ignored.
    pub fn build_subgraph(&self, node_set: &NodeSet) -> Self {
        let restrict = |list: &Vec<Option<FxHashSet<usize>>>| {
            list.iter()
                .enumerate()
                .map(|(i, opt_list)| {
                    if node_set.contains(&i) {
                        opt_list.as_ref().map(|list| list.iter().copied().filter(|n| node_set.contains(n)).collect::<FxHashSet<usize>>())
                    }
                    else {
                        None
                    }
                }).collect::<Vec<Option<FxHashSet<usize>>>>()
        };
        Digraph{
            in_list: restrict(&self.in_list),
            out_list: restrict(&self.out_list),
        }
    }

    /// Builds the subgraph induced by `nodes` with the nodes renamed to `0..nodes.len()`: the
    /// node `nodes[i]` of `self` becomes node `i`. Its size only depends on `nodes` and their edges.
    ///
    /// # Panics
    /// Panics if a node of `nodes` is out of bounds.
    pub fn compact_subgraph(&self, nodes: &[usize]) -> Self {
        let local: FxHashMap<usize, usize> = nodes.iter()
            .enumerate()
            .map(|(i, node)| (*node, i))
            .collect();
        let mut sub = Digraph::new(nodes.len());
        for (i, node) in nodes.iter().enumerate() {
            for neigh in self.out_list[*node].iter().flatten() {
                if let Some(j) = local.get(neigh) {
                    sub.add_edge_checked((i, *j));
                }
            }
        }
        sub
    }
}

// Reading and writing graphs
impl Digraph {

    /// Reads a graph in metis format: a header line `n m [0]` followed by `n` lines, the `i`-th
    /// of which holds the 1-based ids of the outgoing neighbors of node `i`. Lines starting with
    /// `% ` are comments.
    ///
    /// Self-loops and repeated neighbors are rejected, the graph has to be simple.
    pub fn read_graph<R: BufRead>(gr: R) -> Result<Self, ImportError> {
        let mut lines = gr.lines()
            .enumerate()
            .map(|(i, line)| (i + 1, line))
            .filter(|(_, line)| {
                if let Ok(line) = line {
                    !line.starts_with('%')
                } else {
                    true
                }
            });
        let (n, mut last_line) = {
            let (line_nr, line) = lines.next().ok_or(ImportError::InputMalformed { line: 1 })?;
            let line = line?;
            let mut s = line.split_whitespace();
            let n: usize = s.next().ok_or(ImportError::InputMalformed { line: line_nr })?.parse()?;
            let _: usize = s.next().ok_or(ImportError::InputMalformed { line: line_nr })?.parse()?;
            match s.next() {
                None | Some("0") => (),
                Some(_) => return Err(ImportError::InputMalformed { line: line_nr }),
            }
            if s.next().is_some() { return Err(ImportError::InputMalformed { line: line_nr }); }
            (n, line_nr)
        };
        let mut graph = Digraph::new(n);
        let mut num_nodes = 0;
        for (line_nr, line) in lines {
            let line = line?;
            last_line = line_nr;
            if num_nodes == n {
                if line.trim().is_empty() {
                    continue
                }
                return Err(ImportError::InputMalformed { line: line_nr });
            }
            for unparsed_n in line.split_whitespace() {
                let neighbor = unparsed_n.parse::<usize>()?;
                if neighbor == 0 || neighbor > n {
                    return Err(ImportError::InputMalformed { line: line_nr });
                }
                let neighbor = neighbor - 1;
                if neighbor == num_nodes {
                    return Err(GraphError::self_loop(&(num_nodes + 1)).into());
                }
                if !graph.add_edge_checked((num_nodes, neighbor)) {
                    return Err(GraphError::parallel_edge(&(num_nodes + 1), &(neighbor + 1)).into());
                }
            }
            num_nodes += 1;
        }
        if num_nodes != n { return Err(ImportError::InputMalformed { line: last_line + 1 }); }
        Ok(graph)
    }

    /// Write graph as metis file to a writer. Remaining nodes are renamed to `1..=num_nodes`
    /// keeping their relative order.
    pub fn write_graph<W: Write>(&self, mut out: W) -> Result<(), io::Error> {
        let mut i = 0;
        let node_name: Vec<_> = self.out_list.iter()
            .map(|n| {
                if n.is_some() {
                    i += 1;
                    Some(i)
                } else {
                    None
                }
            })
            .collect();
        writeln!(out, "{} {} 0", self.num_nodes(), self.num_edges())?;
        for node in self.nodes() {
            let line = self.sorted_out_neighbors(node)
                .into_iter()
                .filter_map(|nei| node_name[nei])
                .join(" ");
            writeln!(out, "{}", line)?;
        }
        Ok(())
    }
}
