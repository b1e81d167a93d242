//! Graph-subsystem error type.

use thiserror::Error;

use campus_core::NodeId;

/// Errors produced by `campus-graph`.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("node {0} not found in graph")]
    NodeNotFound(NodeId),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type GraphResult<T> = Result<T, GraphError>;
