//! Conditional Stop Task
//!
//! Quality gate: passes its input through when the condition holds and fails
//! the run with a user-supplied message when it does not.

use async_trait::async_trait;
use graph_flow::{Context, GraphError, NextAction, Task, TaskResult};
use node_engine::{
    ContextKeys, ExecutionMode, NodeCategory, PortDataType, PortMetadata, TaskDescriptor,
    TaskMetadata,
};

use super::read_condition;

/// Message used when no stop message is connected
pub const DEFAULT_STOP_MESSAGE: &str = "Quality check failed - stopping workflow";

const PASSED_STATUS: &str = "Condition passed - continuing workflow";

/// Conditional Stop Task
///
/// # Inputs (from context)
/// - `{task_id}.input.input` (required) - Value to pass through
/// - `{task_id}.input.condition` (optional, default `true`) - Continue when true
/// - `{task_id}.input.stop_message` (optional) - Error message when stopping
///
/// # Outputs (to context)
/// - `{task_id}.output.output` - The input, unchanged
/// - `{task_id}.output.status` - Status message
#[derive(Clone)]
pub struct ConditionalStopTask {
    task_id: String,
}

impl ConditionalStopTask {
    pub const PORT_INPUT: &'static str = "input";
    pub const PORT_CONDITION: &'static str = "condition";
    pub const PORT_STOP_MESSAGE: &'static str = "stop_message";
    pub const PORT_OUTPUT: &'static str = "output";
    pub const PORT_STATUS: &'static str = "status";

    pub fn new(task_id: impl Into<String>) -> Self {
        Self {
            task_id: task_id.into(),
        }
    }

    pub fn task_id(&self) -> &str {
        &self.task_id
    }
}

impl TaskDescriptor for ConditionalStopTask {
    fn descriptor() -> TaskMetadata {
        TaskMetadata {
            node_type: "conditional-stop".to_string(),
            category: NodeCategory::Control,
            label: "Conditional Stop".to_string(),
            description: "Stops workflow execution when the condition is false".to_string(),
            inputs: vec![
                PortMetadata::required(Self::PORT_INPUT, "Input", PortDataType::Any),
                PortMetadata::optional(Self::PORT_CONDITION, "Condition", PortDataType::Boolean)
                    .with_default(serde_json::json!(true)),
                PortMetadata::optional(Self::PORT_STOP_MESSAGE, "Stop Message", PortDataType::String)
                    .with_default(serde_json::json!(DEFAULT_STOP_MESSAGE)),
            ],
            outputs: vec![
                PortMetadata::optional(Self::PORT_OUTPUT, "Output", PortDataType::Any),
                PortMetadata::optional(Self::PORT_STATUS, "Status", PortDataType::String),
            ],
            execution_mode: ExecutionMode::Reactive,
        }
    }
}

inventory::submit!(node_engine::DescriptorFn(ConditionalStopTask::descriptor));

#[async_trait]
impl Task for ConditionalStopTask {
    fn id(&self) -> &str {
        &self.task_id
    }

    async fn run(&self, context: Context) -> graph_flow::Result<TaskResult> {
        let input_key = ContextKeys::input(&self.task_id, Self::PORT_INPUT);
        let input: serde_json::Value = context.get(&input_key).await.ok_or_else(|| {
            GraphError::TaskExecutionFailed(format!(
                "Missing required input 'input' at key '{}'",
                input_key
            ))
        })?;

        let condition = read_condition(&context, &self.task_id, Self::PORT_CONDITION).await;
        if !condition {
            let message_key = ContextKeys::input(&self.task_id, Self::PORT_STOP_MESSAGE);
            let message: String = context
                .get(&message_key)
                .await
                .unwrap_or_else(|| DEFAULT_STOP_MESSAGE.to_string());
            log::info!("ConditionalStopTask {}: {}", self.task_id, message);
            return Err(GraphError::TaskExecutionFailed(format!(
                "ConditionalStop: {}",
                message
            )));
        }

        context
            .set(&ContextKeys::output(&self.task_id, Self::PORT_OUTPUT), input)
            .await;
        context
            .set(
                &ContextKeys::output(&self.task_id, Self::PORT_STATUS),
                PASSED_STATUS.to_string(),
            )
            .await;

        log::debug!("ConditionalStopTask {}: {}", self.task_id, PASSED_STATUS);
        Ok(TaskResult::new(
            Some(PASSED_STATUS.to_string()),
            NextAction::Continue,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_passes_through_when_true() {
        let task = ConditionalStopTask::new("gate");
        let context = Context::new();
        context
            .set(&ContextKeys::input("gate", "input"), json!({"score": 0.9}))
            .await;
        context.set(&ContextKeys::input("gate", "condition"), true).await;

        task.run(context.clone()).await.unwrap();

        let output: Option<serde_json::Value> =
            context.get(&ContextKeys::output("gate", "output")).await;
        assert_eq!(output, Some(json!({"score": 0.9})));
        let status: Option<String> = context.get(&ContextKeys::output("gate", "status")).await;
        assert_eq!(status.as_deref(), Some(PASSED_STATUS));
    }

    #[tokio::test]
    async fn test_stops_with_message_when_false() {
        let task = ConditionalStopTask::new("gate");
        let context = Context::new();
        context.set(&ContextKeys::input("gate", "input"), json!(1)).await;
        context.set(&ContextKeys::input("gate", "condition"), false).await;
        context
            .set(
                &ContextKeys::input("gate", "stop_message"),
                "Score too low".to_string(),
            )
            .await;

        let err = task.run(context.clone()).await.unwrap_err();
        assert!(err.to_string().contains("ConditionalStop: Score too low"));

        let output: Option<serde_json::Value> =
            context.get(&ContextKeys::output("gate", "output")).await;
        assert!(output.is_none());
    }

    #[tokio::test]
    async fn test_default_stop_message() {
        let task = ConditionalStopTask::new("gate");
        let context = Context::new();
        context.set(&ContextKeys::input("gate", "input"), json!(1)).await;
        context.set(&ContextKeys::input("gate", "condition"), false).await;

        let err = task.run(context).await.unwrap_err();
        assert!(err.to_string().contains(DEFAULT_STOP_MESSAGE));
    }

    #[tokio::test]
    async fn test_missing_input_error() {
        let task = ConditionalStopTask::new("gate");
        let context = Context::new();
        context.set(&ContextKeys::input("gate", "condition"), true).await;

        assert!(task.run(context).await.is_err());
    }
}
