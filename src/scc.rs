//! Strongly connected components.
//!
//! Both passes run on explicit stacks, so the depth of a graph never reaches the call stack.

use tracing::trace;
use crate::digraph::Digraph;
use crate::graph::{Graph, Vertex};
use crate::other_ds::NodeSet;

/// Helper marker for the iterative approach to find all strongly connected components.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
enum Im {
    Itm(usize),
    Marker(usize),
}

impl Digraph {

    /// Finds the strongly connected components of `self`.
    ///
    /// First pass: a dfs over outgoing edges, started from every node in ascending order, puts
    /// the nodes on `stack` in the order their dfs finishes. Second pass: nodes are popped from
    /// `stack` and a dfs over incoming edges collects every node not yet assigned into the
    /// component of the popped node.
    ///
    /// The nodes of each component are sorted ascending; components are listed in the order they
    /// are found.
    pub fn find_strongly_connected_components_iter(&self) -> Vec<Vec<usize>> {
        let reserved = self.num_reserved_nodes();
        let mut marked = NodeSet::with_capacity(reserved);
        let mut stack: Vec<usize> = Vec::with_capacity(reserved);
        let mut queue: Vec<Im> = self.nodes().rev().map(Im::Itm).collect();
        while let Some(item) = queue.pop() {
            match item {
                Im::Itm(node) => {
                    if marked.insert(node) {
                        queue.push(Im::Marker(node));
                        let neighs = self.out_neighbors(node).as_ref().expect("current is either a node in the graph or a neighbor of an existing node (which makes it a node of the graph)");
                        queue.extend(neighs.iter().copied().filter(|n| !marked.contains(n)).map(Im::Itm));
                    }
                },
                Im::Marker(node) => stack.push(node),
            }
        }
        let mut marked = NodeSet::with_capacity(reserved);
        let mut sccs: Vec<Vec<usize>> = Vec::new();
        let mut collect: Vec<usize> = Vec::new();
        while let Some(root) = stack.pop() {
            if !marked.insert(root) {
                continue
            }
            let mut scc = vec![root];
            collect.push(root);
            while let Some(node) = collect.pop() {
                let neighs = self.in_neighbors(node).as_ref().expect("current is either a node in the graph or a neighbor of an existing node (which makes it a node of the graph)");
                for neigh in neighs {
                    if marked.insert(*neigh) {
                        scc.push(*neigh);
                        collect.push(*neigh);
                    }
                }
            }
            scc.sort_unstable();
            sccs.push(scc);
        }
        sccs
    }

    /// Returns the number of strongly connected components of `self`.
    pub fn num_strongly_connected_components(&self) -> usize {
        self.find_strongly_connected_components_iter().len()
    }

    /// Splits `self` into one subgraph per strongly connected component with at least
    /// `min_size` nodes. The subgraphs keep the node ids of `self`.
    pub fn split_into_strongly_connected_components(&self, min_size: usize) -> Vec<Self> {
        self.find_strongly_connected_components_iter()
            .into_iter()
            .filter(|scc| scc.len() >= min_size)
            .map(|scc| {
                trace!(size = scc.len(), "split off strongly connected component");
                self.build_subgraph(&scc.into_iter().collect())
            })
            .collect()
    }

    /// Like [`Digraph::split_into_strongly_connected_components`], but every component is built
    /// with [`Digraph::compact_subgraph`]. Each subgraph comes with `ids`, where `ids[i]` is the
    /// id of its node `i` in `self`. The ids are ascending, so the compact nodes keep the order
    /// they have in `self`.
    pub fn split_into_compact_components(&self, min_size: usize) -> Vec<(Self, Vec<usize>)> {
        self.find_strongly_connected_components_iter()
            .into_iter()
            .filter(|scc| scc.len() >= min_size)
            .map(|scc| {
                trace!(size = scc.len(), "split off compact component");
                (self.compact_subgraph(&scc), scc)
            })
            .collect()
    }
}

impl<V: Vertex> Graph<V> {

    /// Partitions the vertices into strongly connected components. Each component lists its
    /// vertices in enumeration order.
    pub fn decompose(&self) -> Vec<Vec<V>> {
        self.digraph()
            .find_strongly_connected_components_iter()
            .into_iter()
            .map(|scc| self.labels_of(scc))
            .collect()
    }

    /// Returns the number of strongly connected components.
    pub fn component_count(&self) -> usize {
        self.digraph().num_strongly_connected_components()
    }

    /// Returns every strongly connected component as induced subgraph, in the order of
    /// [`Graph::decompose`].
    pub fn component_subgraphs(&self) -> Vec<Self> {
        self.digraph()
            .split_into_strongly_connected_components(1)
            .into_iter()
            .map(|digraph| self.with_digraph(digraph))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn find_scc_iter_test() {
        let gr = Cursor::new("11 19 0\n2\n3\n4 5\n2 6 7\n4 6 7\n\
                             7 8 9\n8 9\n9\n11\n8\n10\n");
        let g = Digraph::read_graph(gr);
        assert!(g.is_ok());
        let g = g.unwrap();
        let scc = g.find_strongly_connected_components_iter();
        assert_eq!(scc.len(), 5);
        assert_eq!(scc[0], vec![0]);
        assert_eq!(scc[1], vec![1usize, 2, 3, 4]);
        assert!(scc.contains(&vec![5]));
        assert!(scc.contains(&vec![6]));
        assert!(scc.contains(&vec![7usize, 8, 9, 10]));
        let mut all: Vec<usize> = scc.into_iter().flatten().collect();
        all.sort_unstable();
        assert_eq!(all, (0..11).collect::<Vec<_>>());
    }

    #[test]
    fn scc_after_removal_test() {
        let gr = Cursor::new("11 19 0\n2\n3\n4 5\n2 6 7\n4 6 7\n\
                             7 8 9\n8 9\n9\n11\n8\n10\n");
        let mut g = Digraph::read_graph(gr).unwrap();
        g.remove_node(3);
        // Every cycle through 1, 2 and 4 passes 3.
        assert_eq!(g.num_strongly_connected_components(), 7);
        assert!(g.find_strongly_connected_components_iter().iter().all(|scc| !scc.contains(&3)));
    }

    #[test]
    fn scc_edge_cases_test() {
        assert!(Digraph::new(0).find_strongly_connected_components_iter().is_empty());
        let no_edges = Digraph::new(4);
        let singletons = no_edges.find_strongly_connected_components_iter();
        assert_eq!(singletons.len(), 4);
        assert!(singletons.iter().all(|scc| scc.len() == 1));
        let g = Graph::new(vec!['a', 'b', 'c', 'd'], vec![('a', 'b'), ('b', 'c'), ('c', 'd'), ('d', 'a')]).unwrap();
        assert_eq!(g.component_count(), 1);
        assert_eq!(g.decompose(), vec![vec!['a', 'b', 'c', 'd']]);
    }

    #[test]
    fn long_path_test() {
        // Deep enough to overflow a recursive dfs.
        let n = 100_000;
        let cycle = Graph::new(0..n, (0..n).map(|i| (i, (i + 1) % n))).unwrap();
        assert_eq!(cycle.component_count(), 1);
        let path = cycle.remove_vertex(&0).unwrap();
        assert_eq!(path.component_count(), n - 1);
    }

    #[test]
    fn compact_components_test() {
        let gr = Cursor::new("11 19 0\n2\n3\n4 5\n2 6 7\n4 6 7\n\
                             7 8 9\n8 9\n9\n11\n8\n10\n");
        let g = Digraph::read_graph(gr).unwrap();
        let mut parts = g.split_into_compact_components(2);
        parts.sort_by_key(|(_, ids)| ids[0]);
        assert_eq!(parts.len(), 2);
        let (first, ids) = &parts[0];
        assert_eq!(ids, &vec![1, 2, 3, 4]);
        assert_eq!(first.num_reserved_nodes(), 4);
        assert_eq!(first.num_edges(), 5);
        let (second, ids) = &parts[1];
        assert_eq!(ids, &vec![7, 8, 9, 10]);
        assert_eq!(second.num_reserved_nodes(), 4);
        assert_eq!(second.num_strongly_connected_components(), 1);
        for (sub, ids) in &parts {
            for (s, t) in sub.edges() {
                assert!(g.has_edge((ids[s], ids[t])));
            }
        }
    }

    #[test]
    fn component_subgraphs_test() {
        let g = Graph::new(1..=6, vec![(1, 2), (2, 3), (3, 1), (3, 4), (4, 5), (5, 4)]).unwrap();
        let subs = g.component_subgraphs();
        assert_eq!(subs.len(), 3);
        let mut sizes: Vec<(usize, usize)> = subs.iter().map(|s| (s.num_vertices(), s.num_edges())).collect();
        sizes.sort_unstable();
        assert_eq!(sizes, vec![(1, 0), (2, 2), (3, 3)]);
        for (sub, members) in subs.iter().zip(g.decompose()) {
            assert_eq!(sub.vertices().copied().collect::<Vec<_>>(), members);
            assert_eq!(sub, &g.induced_subgraph(&members).unwrap());
        }
    }
}
