//! Conditional Router Tasks
//!
//! Pick one of two upstream chains by a boolean condition. Both chains are
//! wired to lazy inputs; the host asks [`ConditionalRouterTask::inputs_needed`]
//! which ones to evaluate once the condition is known, and the task itself
//! only ever reads the selected side.

use async_trait::async_trait;
use graph_flow::{Context, NextAction, Task, TaskResult};
use node_engine::{
    Branch, ContextKeys, ExecutionMode, NodeCategory, NodeEngineError, PendingBranches,
    PortDataType, PortMetadata, TaskDescriptor, TaskMetadata,
};

use super::{read_condition, read_lazy_input};

/// Conditional Router Task
///
/// # Inputs (from context)
/// - `{task_id}.input.condition` (optional, default `true`) - Gate value
/// - `{task_id}.input.pass_input` (lazy) - Used when the condition is true
/// - `{task_id}.input.fail_input` (lazy) - Used when the condition is false
///
/// # Outputs (to context)
/// - `{task_id}.output.output` - The selected input
/// - `{task_id}.output.info` - Which path was taken
#[derive(Clone)]
pub struct ConditionalRouterTask {
    task_id: String,
}

impl ConditionalRouterTask {
    pub const PORT_CONDITION: &'static str = "condition";
    pub const PORT_PASS_INPUT: &'static str = "pass_input";
    pub const PORT_FAIL_INPUT: &'static str = "fail_input";
    pub const PORT_OUTPUT: &'static str = "output";
    pub const PORT_INFO: &'static str = "info";

    const PASS_PORTS: [&'static str; 1] = [Self::PORT_PASS_INPUT];
    const FAIL_PORTS: [&'static str; 1] = [Self::PORT_FAIL_INPUT];

    pub fn new(task_id: impl Into<String>) -> Self {
        Self {
            task_id: task_id.into(),
        }
    }

    pub fn task_id(&self) -> &str {
        &self.task_id
    }

    /// Lazy inputs the host must evaluate for a given condition
    pub fn inputs_needed(condition: bool) -> &'static [&'static str] {
        Branch::from_gate(condition).select(&Self::PASS_PORTS, &Self::FAIL_PORTS)
    }

    fn info(branch: Branch) -> &'static str {
        match branch {
            Branch::Pass => "Using pass_input",
            Branch::Fail => "Using fail_input",
        }
    }
}

impl TaskDescriptor for ConditionalRouterTask {
    fn descriptor() -> TaskMetadata {
        TaskMetadata {
            node_type: "conditional-router".to_string(),
            category: NodeCategory::Control,
            label: "Conditional Router".to_string(),
            description: "Selects between two inputs based on a boolean condition, evaluating only the selected one"
                .to_string(),
            inputs: vec![
                PortMetadata::optional(Self::PORT_CONDITION, "Condition", PortDataType::Boolean)
                    .with_default(serde_json::json!(true)),
                PortMetadata::required(Self::PORT_PASS_INPUT, "Pass Input", PortDataType::Any)
                    .lazy(),
                PortMetadata::required(Self::PORT_FAIL_INPUT, "Fail Input", PortDataType::Any)
                    .lazy(),
            ],
            outputs: vec![
                PortMetadata::optional(Self::PORT_OUTPUT, "Output", PortDataType::Any),
                PortMetadata::optional(Self::PORT_INFO, "Info", PortDataType::String),
            ],
            execution_mode: ExecutionMode::Reactive,
        }
    }
}

inventory::submit!(node_engine::DescriptorFn(ConditionalRouterTask::descriptor));

#[async_trait]
impl Task for ConditionalRouterTask {
    fn id(&self) -> &str {
        &self.task_id
    }

    async fn run(&self, context: Context) -> graph_flow::Result<TaskResult> {
        let condition = read_condition(&context, &self.task_id, Self::PORT_CONDITION).await;

        let pending = PendingBranches::new(
            read_lazy_input(&context, &self.task_id, Self::PORT_PASS_INPUT),
            read_lazy_input(&context, &self.task_id, Self::PORT_FAIL_INPUT),
        );
        let (branch, value) = pending
            .resolve(condition)
            .await
            .map_err(NodeEngineError::into_graph_error)?;

        let info = Self::info(branch);
        log::debug!("ConditionalRouterTask {}: {}", self.task_id, info);

        context
            .set(&ContextKeys::output(&self.task_id, Self::PORT_OUTPUT), value)
            .await;
        context
            .set(&ContextKeys::output(&self.task_id, Self::PORT_INFO), info.to_string())
            .await;

        Ok(TaskResult::new(Some(info.to_string()), NextAction::Continue))
    }
}

/// Conditional Router Task for input pairs
///
/// Same gate as [`ConditionalRouterTask`], routing two values at once (for
/// example an image together with its metadata).
#[derive(Clone)]
pub struct ConditionalRouterDualTask {
    task_id: String,
}

impl ConditionalRouterDualTask {
    pub const PORT_CONDITION: &'static str = "condition";
    pub const PORT_PASS_INPUT1: &'static str = "pass_input1";
    pub const PORT_PASS_INPUT2: &'static str = "pass_input2";
    pub const PORT_FAIL_INPUT1: &'static str = "fail_input1";
    pub const PORT_FAIL_INPUT2: &'static str = "fail_input2";
    pub const PORT_OUTPUT1: &'static str = "output1";
    pub const PORT_OUTPUT2: &'static str = "output2";
    pub const PORT_INFO: &'static str = "info";

    const PASS_PORTS: [&'static str; 2] = [Self::PORT_PASS_INPUT1, Self::PORT_PASS_INPUT2];
    const FAIL_PORTS: [&'static str; 2] = [Self::PORT_FAIL_INPUT1, Self::PORT_FAIL_INPUT2];

    pub fn new(task_id: impl Into<String>) -> Self {
        Self {
            task_id: task_id.into(),
        }
    }

    pub fn task_id(&self) -> &str {
        &self.task_id
    }

    /// Lazy inputs the host must evaluate for a given condition
    pub fn inputs_needed(condition: bool) -> &'static [&'static str] {
        Branch::from_gate(condition).select(&Self::PASS_PORTS, &Self::FAIL_PORTS)
    }

    fn info(branch: Branch) -> &'static str {
        match branch {
            Branch::Pass => "Using pass inputs",
            Branch::Fail => "Using fail inputs",
        }
    }
}

impl TaskDescriptor for ConditionalRouterDualTask {
    fn descriptor() -> TaskMetadata {
        let lazy_any =
            |id: &str, label: &str| PortMetadata::required(id, label, PortDataType::Any).lazy();

        TaskMetadata {
            node_type: "conditional-router-dual".to_string(),
            category: NodeCategory::Control,
            label: "Conditional Router Dual".to_string(),
            description: "Selects between two input pairs based on a boolean condition, evaluating only the selected pair"
                .to_string(),
            inputs: vec![
                PortMetadata::optional(Self::PORT_CONDITION, "Condition", PortDataType::Boolean)
                    .with_default(serde_json::json!(true)),
                lazy_any(Self::PORT_PASS_INPUT1, "Pass Input 1"),
                lazy_any(Self::PORT_PASS_INPUT2, "Pass Input 2"),
                lazy_any(Self::PORT_FAIL_INPUT1, "Fail Input 1"),
                lazy_any(Self::PORT_FAIL_INPUT2, "Fail Input 2"),
            ],
            outputs: vec![
                PortMetadata::optional(Self::PORT_OUTPUT1, "Output 1", PortDataType::Any),
                PortMetadata::optional(Self::PORT_OUTPUT2, "Output 2", PortDataType::Any),
                PortMetadata::optional(Self::PORT_INFO, "Info", PortDataType::String),
            ],
            execution_mode: ExecutionMode::Reactive,
        }
    }
}

inventory::submit!(node_engine::DescriptorFn(ConditionalRouterDualTask::descriptor));

#[async_trait]
impl Task for ConditionalRouterDualTask {
    fn id(&self) -> &str {
        &self.task_id
    }

    async fn run(&self, context: Context) -> graph_flow::Result<TaskResult> {
        let condition = read_condition(&context, &self.task_id, Self::PORT_CONDITION).await;

        let (ctx, task_id) = (&context, self.task_id.as_str());
        let pair = move |first: &'static str, second: &'static str| async move {
            let first = read_lazy_input(ctx, task_id, first).await?;
            let second = read_lazy_input(ctx, task_id, second).await?;
            Ok::<_, NodeEngineError>((first, second))
        };
        let pending = PendingBranches::new(
            pair(Self::PORT_PASS_INPUT1, Self::PORT_PASS_INPUT2),
            pair(Self::PORT_FAIL_INPUT1, Self::PORT_FAIL_INPUT2),
        );
        let (branch, (first, second)) = pending
            .resolve(condition)
            .await
            .map_err(NodeEngineError::into_graph_error)?;

        let info = Self::info(branch);
        log::debug!("ConditionalRouterDualTask {}: {}", self.task_id, info);

        context
            .set(&ContextKeys::output(&self.task_id, Self::PORT_OUTPUT1), first)
            .await;
        context
            .set(&ContextKeys::output(&self.task_id, Self::PORT_OUTPUT2), second)
            .await;
        context
            .set(&ContextKeys::output(&self.task_id, Self::PORT_INFO), info.to_string())
            .await;

        Ok(TaskResult::new(Some(info.to_string()), NextAction::Continue))
    }
}
