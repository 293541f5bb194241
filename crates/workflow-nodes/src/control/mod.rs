//! Control nodes
//!
//! Gated routing and quality gates.

mod conditional_router;
mod conditional_stop;

pub use conditional_router::{ConditionalRouterDualTask, ConditionalRouterTask};
pub use conditional_stop::{ConditionalStopTask, DEFAULT_STOP_MESSAGE};

use graph_flow::Context;
use node_engine::{ContextKeys, NodeEngineError};

/// Boolean gate input; an unconnected gate passes
async fn read_condition(context: &Context, task_id: &str, port: &str) -> bool {
    context
        .get(&ContextKeys::input(task_id, port))
        .await
        .unwrap_or(true)
}

/// Read a lazy input; only called for the branch that was selected
async fn read_lazy_input(
    context: &Context,
    task_id: &str,
    port: &str,
) -> node_engine::Result<serde_json::Value> {
    let key = ContextKeys::input(task_id, port);
    context
        .get(&key)
        .await
        .ok_or(NodeEngineError::MissingInput(key))
}
