use campus_core::NodeId;
use campus_graph::GraphError;
use campus_state::StateError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("driver configuration error: {0}")]
    Config(String),

    #[error("graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("state error: {0}")]
    State(#[from] StateError),

    /// The walk graph offers no route between two bound location nodes.
    ///
    /// A map that cannot connect two configured locations is broken;
    /// the run aborts rather than retrying the draw.
    #[error("no walkable route from node {from} to node {to}")]
    Unreachable { from: NodeId, to: NodeId },

    #[error("trace output error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SimResult<T> = Result<T, SimError>;
