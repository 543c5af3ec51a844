//! Error types of the crate.
//!
//! All graph errors are programmer-error class: they are reported with the offending vertex or
//! edge and are not meant to be retried.

use std::io;
use std::num::ParseIntError;
use thiserror::Error;

/// Errors raised by graph construction and graph operations.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum GraphError {
    /// The supplied vertices or edges do not form a simple directed graph.
    #[error("invalid graph: {reason}")]
    InvalidGraph { reason: String },
    /// `vertex` is not a member of the graph.
    #[error("vertex {vertex} not found")]
    NotFound { vertex: String },
    /// A requested subgraph contains `vertex`, which is not a member of the graph.
    #[error("vertex {vertex} is not part of the graph, the subset is invalid")]
    InvalidSubset { vertex: String },
}

impl GraphError {

    pub(crate) fn self_loop<V: std::fmt::Debug>(vertex: &V) -> Self {
        GraphError::InvalidGraph { reason: format!("self-loop at {:?}", vertex) }
    }

    pub(crate) fn parallel_edge<V: std::fmt::Debug>(src: &V, trg: &V) -> Self {
        GraphError::InvalidGraph { reason: format!("parallel edge {:?} -> {:?}", src, trg) }
    }

    pub(crate) fn unknown_endpoint<V: std::fmt::Debug>(src: &V, trg: &V, endpoint: &V) -> Self {
        GraphError::InvalidGraph {
            reason: format!("edge {:?} -> {:?} has endpoint {:?} outside the vertex set", src, trg, endpoint),
        }
    }

    pub(crate) fn duplicate_vertex<V: std::fmt::Debug>(vertex: &V) -> Self {
        GraphError::InvalidGraph { reason: format!("duplicate vertex {:?}", vertex) }
    }

    pub(crate) fn not_found<V: std::fmt::Debug>(vertex: &V) -> Self {
        GraphError::NotFound { vertex: format!("{:?}", vertex) }
    }

    pub(crate) fn invalid_subset<V: std::fmt::Debug>(vertex: &V) -> Self {
        GraphError::InvalidSubset { vertex: format!("{:?}", vertex) }
    }
}

/// Errors raised while reading a graph from text.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("could not parse node id: {0}")]
    ParseInt(#[from] ParseIntError),
    #[error("input malformed in line {line}")]
    InputMalformed { line: usize },
    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// Errors raised by long running computations that can be interrupted.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Error)]
pub enum ProcessingError {
    /// The computation was interrupted after `counted` results.
    #[error("interrupted after {counted} results")]
    OutOfTime { counted: usize },
}
