use crate::graph::{EdgeId, Vertex};
use crate::tree_decomposition::NodeId;
use thiserror::Error;

/// Precondition violations raised by graph and decomposition operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("unknown vertex: {0}")]
    UnknownVertex(Vertex),
    #[error("unknown edge: {0}")]
    UnknownEdge(EdgeId),
    #[error("unknown node: {0}")]
    UnknownNode(NodeId),
    #[error("hyperedges must contain at least one vertex")]
    EmptyHyperedge,
    #[error("node {node} cannot be moved below {target}, which lies in its own subtree")]
    NodeInOwnSubtree { node: NodeId, target: NodeId },
    #[error("invalid elimination ordering: {0}")]
    InvalidOrdering(String),
    #[error("invalid parameter: {0}")]
    InvalidParameter(&'static str),
}

pub type Result<T> = std::result::Result<T, Error>;
