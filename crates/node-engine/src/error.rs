//! Error types for the node engine

use thiserror::Error;

/// Result type alias using NodeEngineError
pub type Result<T> = std::result::Result<T, NodeEngineError>;

/// Errors raised while a node reads its inputs or resolves a branch
#[derive(Debug, Error)]
pub enum NodeEngineError {
    /// Missing required input
    #[error("Missing required input: {0}")]
    MissingInput(String),

    /// A deferred branch failed while being evaluated
    #[error("Branch '{branch}' failed: {message}")]
    BranchFailed { branch: String, message: String },
}

impl NodeEngineError {
    /// Convert into the graph-flow error reported back to the host
    pub fn into_graph_error(self) -> graph_flow::GraphError {
        graph_flow::GraphError::TaskExecutionFailed(self.to_string())
    }
}
