//! Image Browser Task
//!
//! Execution side of the image browser node. The browser front-end persists
//! the chosen file in the node's `selected_image` field; at run time this
//! task resolves it inside the browsed folder with the same checks the image
//! server applies, and emits the resulting path.

use std::sync::Arc;

use async_trait::async_trait;
use graph_flow::{Context, GraphError, NextAction, Task, TaskResult};
use image_browser::{fields, resolve_image_path, FolderPolicy};
use node_engine::{
    ContextKeys, ExecutionMode, NodeCategory, PortDataType, PortMetadata, TaskDescriptor,
    TaskMetadata,
};

/// Image Browser Task
///
/// # Inputs (from context)
/// - `{task_id}.input.folder_path` (required) - Browsed folder
/// - `{task_id}.input.selected_image` (required) - Filename chosen in the browser
///
/// # Outputs (to context)
/// - `{task_id}.output.image_path` - Absolute path of the selected image
/// - `{task_id}.output.filename` - The selected filename
#[derive(Clone)]
pub struct LoadImageFromBrowserTask {
    task_id: String,
    policy: Arc<FolderPolicy>,
}

impl LoadImageFromBrowserTask {
    pub const PORT_FOLDER_PATH: &'static str = fields::FOLDER_PATH;
    pub const PORT_SELECTED_IMAGE: &'static str = fields::SELECTED_IMAGE;
    pub const PORT_IMAGE_PATH: &'static str = "image_path";
    pub const PORT_FILENAME: &'static str = "filename";

    /// Create a task that may read from any folder
    pub fn new(task_id: impl Into<String>) -> Self {
        Self::with_policy(task_id, Arc::new(FolderPolicy::unrestricted()))
    }

    /// Create a task restricted by `policy`, usually shared with the image server
    pub fn with_policy(task_id: impl Into<String>, policy: Arc<FolderPolicy>) -> Self {
        Self {
            task_id: task_id.into(),
            policy,
        }
    }

    pub fn task_id(&self) -> &str {
        &self.task_id
    }

    async fn required_string(&self, context: &Context, port: &str) -> graph_flow::Result<String> {
        let key = ContextKeys::input(&self.task_id, port);
        context
            .get::<String>(&key)
            .await
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| {
                GraphError::TaskExecutionFailed(format!(
                    "Missing required input '{}' at key '{}'",
                    port, key
                ))
            })
    }
}

impl TaskDescriptor for LoadImageFromBrowserTask {
    fn descriptor() -> TaskMetadata {
        TaskMetadata {
            node_type: "image-browser".to_string(),
            category: NodeCategory::Input,
            label: "Image Browser".to_string(),
            description: "Loads the image selected in the folder browser".to_string(),
            inputs: vec![
                PortMetadata::required(Self::PORT_FOLDER_PATH, "Folder", PortDataType::String),
                PortMetadata::required(
                    Self::PORT_SELECTED_IMAGE,
                    "Selected Image",
                    PortDataType::String,
                ),
            ],
            outputs: vec![
                PortMetadata::optional(Self::PORT_IMAGE_PATH, "Image", PortDataType::Image),
                PortMetadata::optional(Self::PORT_FILENAME, "Filename", PortDataType::String),
            ],
            execution_mode: ExecutionMode::Reactive,
        }
    }
}

inventory::submit!(node_engine::DescriptorFn(LoadImageFromBrowserTask::descriptor));

#[async_trait]
impl Task for LoadImageFromBrowserTask {
    fn id(&self) -> &str {
        &self.task_id
    }

    async fn run(&self, context: Context) -> graph_flow::Result<TaskResult> {
        let folder_path = self
            .required_string(&context, Self::PORT_FOLDER_PATH)
            .await?;
        let filename = self
            .required_string(&context, Self::PORT_SELECTED_IMAGE)
            .await
            .map_err(|_| {
                GraphError::TaskExecutionFailed(
                    "No image selected; pick one in the image browser".to_string(),
                )
            })?;

        let path = resolve_image_path(&self.policy, &folder_path, &filename)
            .await
            .map_err(|_| {
                GraphError::TaskExecutionFailed(format!(
                    "Image '{}' not found in '{}'",
                    filename, folder_path
                ))
            })?;
        let image_path = path.to_string_lossy().to_string();

        log::debug!("LoadImageFromBrowserTask {}: {}", self.task_id, image_path);

        context
            .set(
                &ContextKeys::output(&self.task_id, Self::PORT_IMAGE_PATH),
                image_path.clone(),
            )
            .await;
        context
            .set(
                &ContextKeys::output(&self.task_id, Self::PORT_FILENAME),
                filename,
            )
            .await;

        Ok(TaskResult::new(Some(image_path), NextAction::Continue))
    }
}
