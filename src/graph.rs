//! Labeled directed graph.
//!
//! `Graph<V>` pairs a [`Digraph`] with a table mapping the dense node ids to caller supplied
//! vertex identifiers. Every operation returns a new graph; the label table is immutable and
//! shared between a graph and all graphs derived from it, the adjacency lists never are.

use std::collections::BTreeSet;
use std::fmt::Debug;
use std::hash::Hash;
use std::io::prelude::*;
use std::io;
use std::sync::Arc;
use fxhash::{FxHashMap, FxHashSet};
use regex::Regex;
use crate::cust_errors::{GraphError, ImportError};
use crate::digraph::Digraph;
use crate::other_ds::NodeSet;

/// Requirements on vertex identifiers.
pub trait Vertex: Clone + Eq + Hash + Ord + Debug {}

impl<T: Clone + Eq + Hash + Ord + Debug> Vertex for T {}

#[derive(Debug, Clone)]
pub struct Graph<V> {
    labels: Arc<Vec<V>>,
    index: Arc<FxHashMap<V, usize>>,
    digraph: Digraph,
}

impl<V: Vertex> PartialEq for Graph<V> {
    fn eq(&self, other: &Self) -> bool {
        self.labels == other.labels && self.digraph == other.digraph
    }
}

impl<V: Vertex> Eq for Graph<V> {}

impl<V: Vertex> Graph<V> {

    /// Builds a graph from `vertices` and `edges`. The order of `vertices` fixes the enumeration
    /// order used by all algorithms.
    ///
    /// Fails with `GraphError::InvalidGraph` on a duplicate vertex, a self-loop, a parallel edge
    /// or an edge with an endpoint that is not in `vertices`.
    pub fn new<I, E>(vertices: I, edges: E) -> Result<Self, GraphError>
    where
        I: IntoIterator<Item=V>,
        E: IntoIterator<Item=(V, V)>,
    {
        let mut labels = Vec::new();
        let mut index = FxHashMap::default();
        for vertex in vertices {
            if index.contains_key(&vertex) {
                return Err(GraphError::duplicate_vertex(&vertex));
            }
            index.insert(vertex.clone(), labels.len());
            labels.push(vertex);
        }
        let mut digraph = Digraph::new(labels.len());
        for (src, trg) in edges {
            let s = *index.get(&src).ok_or_else(|| GraphError::unknown_endpoint(&src, &trg, &src))?;
            let t = *index.get(&trg).ok_or_else(|| GraphError::unknown_endpoint(&src, &trg, &trg))?;
            if s == t {
                return Err(GraphError::self_loop(&src));
            }
            if !digraph.add_edge_checked((s, t)) {
                return Err(GraphError::parallel_edge(&src, &trg));
            }
        }
        Ok(Graph {
            labels: Arc::new(labels),
            index: Arc::new(index),
            digraph,
        })
    }

    /// Builds a graph from `edges` alone. The vertices are the endpoints in the order they are
    /// first seen.
    pub fn from_edges<E: IntoIterator<Item=(V, V)>>(edges: E) -> Result<Self, GraphError> {
        let edges: Vec<(V, V)> = edges.into_iter().collect();
        let vertices: Vec<V> = {
            let mut seen = FxHashSet::default();
            edges.iter()
                .flat_map(|(src, trg)| vec![src, trg])
                .filter(|vertex| seen.insert(*vertex))
                .cloned()
                .collect()
        };
        Self::new(vertices, edges)
    }

    /// Returns a graph with the labels of `self` and the adjacency of `digraph`.
    pub(crate) fn with_digraph(&self, digraph: Digraph) -> Self {
        Graph {
            labels: Arc::clone(&self.labels),
            index: Arc::clone(&self.index),
            digraph,
        }
    }

    pub fn digraph(&self) -> &Digraph {
        &self.digraph
    }

    /// Returns the label of the node id `node`.
    ///
    /// # Panics
    /// Panics if `node` is out of bounds.
    pub fn label(&self, node: usize) -> &V {
        &self.labels[node]
    }

    /// Returns the labels of `nodes`.
    pub fn labels_of<I: IntoIterator<Item=usize>>(&self, nodes: I) -> Vec<V> {
        nodes.into_iter().map(|node| self.labels[node].clone()).collect()
    }

    /// Returns the node id of `vertex` if it is a member of `self`.
    pub fn node_of(&self, vertex: &V) -> Option<usize> {
        self.index.get(vertex).copied().filter(|node| self.digraph.has_node(*node))
    }

    /// Returns an iterator over the vertices in enumeration order.
    pub fn vertices(&self) -> impl Iterator<Item=&V> + '_ {
        self.digraph.nodes().map(move |node| &self.labels[node])
    }

    pub fn num_vertices(&self) -> usize {
        self.digraph.num_nodes()
    }

    pub fn num_edges(&self) -> usize {
        self.digraph.num_edges()
    }

    pub fn contains_vertex(&self, vertex: &V) -> bool {
        self.node_of(vertex).is_some()
    }

    /// Checks if the edge `src -> trg` exists. Unknown vertices have no edges.
    pub fn has_edge(&self, src: &V, trg: &V) -> bool {
        match (self.node_of(src), self.node_of(trg)) {
            (Some(s), Some(t)) => self.digraph.has_edge((s, t)),
            _ => false,
        }
    }

    /// Returns an iterator over all edges, ordered by source and then by target.
    pub fn edges(&self) -> impl Iterator<Item=(&V, &V)> + '_ {
        self.digraph.edges().map(move |(s, t)| (&self.labels[s], &self.labels[t]))
    }

    /// Returns the successors of `vertex` in enumeration order.
    pub fn successors(&self, vertex: &V) -> Result<Vec<&V>, GraphError> {
        let node = self.node_of(vertex).ok_or_else(|| GraphError::not_found(vertex))?;
        Ok(self.digraph.sorted_out_neighbors(node).into_iter().map(|n| &self.labels[n]).collect())
    }

    /// Returns a new graph without `vertex` and all edges touching it.
    pub fn remove_vertex(&self, vertex: &V) -> Result<Self, GraphError> {
        let node = self.node_of(vertex).ok_or_else(|| GraphError::not_found(vertex))?;
        let digraph = self.digraph.without_node(node).ok_or_else(|| GraphError::not_found(vertex))?;
        Ok(self.with_digraph(digraph))
    }

    /// Returns a new graph without all of `vertices`. Fails on the first vertex that is not a
    /// member of `self`; repeated vertices are removed once.
    pub fn remove_vertices<'a, I>(&self, vertices: I) -> Result<Self, GraphError>
    where
        I: IntoIterator<Item=&'a V>,
        V: 'a,
    {
        let mut digraph = self.digraph.clone();
        for vertex in vertices {
            let node = self.node_of(vertex).ok_or_else(|| GraphError::not_found(vertex))?;
            digraph.remove_node(node);
        }
        Ok(self.with_digraph(digraph))
    }

    /// Returns the subgraph induced by `subset`: exactly these vertices and every edge of
    /// `self` between them.
    pub fn induced_subgraph<'a, I>(&self, subset: I) -> Result<Self, GraphError>
    where
        I: IntoIterator<Item=&'a V>,
        V: 'a,
    {
        let mut node_set = NodeSet::with_capacity(self.digraph.num_reserved_nodes());
        for vertex in subset {
            let node = self.node_of(vertex).ok_or_else(|| GraphError::invalid_subset(vertex))?;
            node_set.insert(node);
        }
        Ok(self.with_digraph(self.digraph.build_subgraph(&node_set)))
    }

    /// Converts node ids of `self` into a sorted set of labels.
    pub(crate) fn label_set<I: IntoIterator<Item=usize>>(&self, nodes: I) -> BTreeSet<V> {
        nodes.into_iter().map(|node| self.labels[node].clone()).collect()
    }

    /// Writes `self` as metis file. Vertices are renamed to `1..=num_vertices` in enumeration
    /// order, the labels are not written.
    pub fn write_graph<W: Write>(&self, out: W) -> Result<(), io::Error> {
        self.digraph.write_graph(out)
    }
}

impl Graph<usize> {

    /// Reads a metis file (see [`Digraph::read_graph`]). Vertices are labeled with their 1-based
    /// metis ids.
    pub fn read_graph<R: BufRead>(gr: R) -> Result<Self, ImportError> {
        let digraph = Digraph::read_graph(gr)?;
        let labels: Vec<usize> = (1..=digraph.num_reserved_nodes()).collect();
        let index = labels.iter().enumerate().map(|(node, label)| (*label, node)).collect();
        Ok(Graph {
            labels: Arc::new(labels),
            index: Arc::new(index),
            digraph,
        })
    }
}

impl Graph<String> {

    /// Reads an edge list: one edge per line written as `u v`, `u -> v` or `u,v`. A line with a
    /// single label declares an isolated vertex. Empty lines and lines starting with `#` or `%`
    /// are skipped. Labels consist of word characters and dots.
    pub fn read_edge_list<R: BufRead>(input: R) -> Result<Self, ImportError> {
        let line_re = Regex::new(r"^\s*([\w.]+)\s*(?:(?:->|,|\s)\s*([\w.]+)\s*)?$")
            .expect("The pattern is valid");
        let mut vertices = Vec::new();
        let mut seen = FxHashSet::default();
        let mut edges = Vec::new();
        for (i, line) in input.lines().enumerate() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('%') {
                continue
            }
            let caps = line_re.captures(trimmed).ok_or(ImportError::InputMalformed { line: i + 1 })?;
            let src = caps[1].to_owned();
            if seen.insert(src.clone()) {
                vertices.push(src.clone());
            }
            if let Some(trg) = caps.get(2) {
                let trg = trg.as_str().to_owned();
                if seen.insert(trg.clone()) {
                    vertices.push(trg.clone());
                }
                edges.push((src, trg));
            }
        }
        Ok(Graph::new(vertices, edges)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn triangle() -> Graph<u32> {
        Graph::new(vec![1, 2, 3], vec![(1, 2), (2, 3), (3, 1)]).unwrap()
    }

    #[test]
    fn new_graph_test() {
        let g = triangle();
        assert_eq!(g.num_vertices(), 3);
        assert_eq!(g.num_edges(), 3);
        assert_eq!(g.vertices().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
        assert!(g.has_edge(&1, &2));
        assert!(!g.has_edge(&2, &1));
        assert!(!g.has_edge(&1, &9));
        assert_eq!(g.successors(&3).unwrap(), vec![&1]);
        assert!(matches!(g.successors(&9), Err(GraphError::NotFound { .. })));
    }

    #[test]
    fn new_graph_rejects_test() {
        let self_loop = Graph::new(vec![1, 2], vec![(1, 2), (2, 2)]);
        assert!(matches!(self_loop, Err(GraphError::InvalidGraph { .. })));
        let parallel = Graph::new(vec![1, 2], vec![(1, 2), (1, 2)]);
        assert!(matches!(parallel, Err(GraphError::InvalidGraph { .. })));
        let unknown = Graph::new(vec![1, 2], vec![(1, 3)]);
        assert!(matches!(unknown, Err(GraphError::InvalidGraph { .. })));
        let duplicate = Graph::<u32>::new(vec![1, 1], vec![]);
        assert!(matches!(duplicate, Err(GraphError::InvalidGraph { .. })));
        // Opposite edges are two distinct edges.
        assert!(Graph::new(vec![1, 2], vec![(1, 2), (2, 1)]).is_ok());
    }

    #[test]
    fn from_edges_test() {
        let g = Graph::from_edges(vec![("c", "a"), ("a", "b"), ("b", "c")]).unwrap();
        assert_eq!(g.vertices().copied().collect::<Vec<_>>(), vec!["c", "a", "b"]);
        assert_eq!(g.edges().map(|(s, t)| (*s, *t)).collect::<Vec<_>>(), vec![("c", "a"), ("a", "b"), ("b", "c")]);
    }

    #[test]
    fn remove_vertex_test() {
        let g = triangle();
        let h = g.remove_vertex(&2).unwrap();
        assert_eq!(h.vertices().copied().collect::<Vec<_>>(), vec![1, 3]);
        assert_eq!(h.num_edges(), 1);
        assert!(h.has_edge(&3, &1));
        // The receiver is untouched.
        assert_eq!(g.num_vertices(), 3);
        assert!(g.has_edge(&1, &2));
        assert_eq!(h.remove_vertex(&2), Err(GraphError::NotFound { vertex: "2".to_owned() }));
        assert!(matches!(g.remove_vertex(&7), Err(GraphError::NotFound { .. })));
    }

    #[test]
    fn remove_vertices_test() {
        let g = triangle();
        let h = g.remove_vertices(&[1, 3, 1]).unwrap();
        assert_eq!(h.vertices().copied().collect::<Vec<_>>(), vec![2]);
        assert_eq!(h.num_edges(), 0);
        assert!(matches!(g.remove_vertices(&[1, 4]), Err(GraphError::NotFound { .. })));
    }

    #[test]
    fn induced_subgraph_test() {
        let g = Graph::new(vec![1, 2, 3, 4], vec![(1, 2), (2, 1), (2, 3), (3, 4), (4, 2)]).unwrap();
        let sub = g.induced_subgraph(&[2, 3, 4]).unwrap();
        assert_eq!(sub.vertices().copied().collect::<Vec<_>>(), vec![2, 3, 4]);
        assert_eq!(sub.edges().map(|(s, t)| (*s, *t)).collect::<Vec<_>>(), vec![(2, 3), (3, 4), (4, 2)]);
        assert_eq!(sub, g.remove_vertex(&1).unwrap());
        assert!(matches!(g.induced_subgraph(&[2, 5]), Err(GraphError::InvalidSubset { .. })));
        // Vertices of the original graph that were removed are no longer members.
        assert!(matches!(sub.induced_subgraph(&[1]), Err(GraphError::InvalidSubset { .. })));
        assert_eq!(g.induced_subgraph(&[]).unwrap().num_vertices(), 0);
    }

    #[test]
    fn read_metis_test() {
        let gr = Cursor::new("3 3 0\n2\n3\n1\n");
        let g = Graph::read_graph(gr).unwrap();
        assert_eq!(g.vertices().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
        assert!(g.has_edge(&3, &1));
        let mut out = Vec::new();
        g.remove_vertex(&1).unwrap().write_graph(&mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "2 1 0\n2\n\n");
    }

    #[test]
    fn read_edge_list_test() {
        let input = Cursor::new("# comment\na -> b\nb c\n\nc,a\nd\n");
        let g = Graph::read_edge_list(input).unwrap();
        assert_eq!(g.vertices().cloned().collect::<Vec<_>>(), vec!["a", "b", "c", "d"]);
        assert_eq!(g.num_edges(), 3);
        assert!(g.has_edge(&"c".to_owned(), &"a".to_owned()));
        let malformed = Graph::read_edge_list(Cursor::new("a b\na -> -> b\n"));
        assert!(matches!(malformed, Err(ImportError::InputMalformed { line: 2 })));
        let looped = Graph::read_edge_list(Cursor::new("a a\n"));
        assert!(matches!(looped, Err(ImportError::Graph(GraphError::InvalidGraph { .. }))));
    }
}
