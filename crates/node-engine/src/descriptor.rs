//! Task descriptor trait and metadata types
//!
//! Every node type describes itself through `TaskDescriptor`. The host uses
//! the resulting `TaskMetadata` to draw the node, validate connections and
//! decide which inputs may be left unevaluated.

use serde::{Deserialize, Serialize};

use crate::types::{ExecutionMode, NodeCategory, PortDataType};

/// Static self-description of a node type
///
/// ```ignore
/// impl TaskDescriptor for GateTask {
///     fn descriptor() -> TaskMetadata {
///         TaskMetadata {
///             node_type: "gate".to_string(),
///             category: NodeCategory::Control,
///             label: "Gate".to_string(),
///             description: "Forwards the chain picked by a condition".to_string(),
///             inputs: vec![
///                 PortMetadata::optional("condition", "Condition", PortDataType::Boolean),
///                 PortMetadata::required("pass_input", "Pass", PortDataType::Any).lazy(),
///                 PortMetadata::required("fail_input", "Fail", PortDataType::Any).lazy(),
///             ],
///             outputs: vec![PortMetadata::optional("output", "Output", PortDataType::Any)],
///             execution_mode: ExecutionMode::Reactive,
///         }
///     }
/// }
/// ```
pub trait TaskDescriptor {
    fn descriptor() -> TaskMetadata
    where
        Self: Sized;
}

/// Complete metadata for a task type
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskMetadata {
    /// Unique type identifier (e.g., "image-browser")
    pub node_type: String,
    /// Category for UI grouping
    pub category: NodeCategory,
    /// Human-readable label
    pub label: String,
    /// Description of what the task does
    pub description: String,
    /// Input port definitions
    pub inputs: Vec<PortMetadata>,
    /// Output port definitions
    pub outputs: Vec<PortMetadata>,
    /// Execution mode
    pub execution_mode: ExecutionMode,
}

impl TaskMetadata {
    /// Input ports the host must not evaluate eagerly
    pub fn lazy_inputs(&self) -> impl Iterator<Item = &PortMetadata> {
        self.inputs.iter().filter(|p| p.lazy)
    }

    /// Find an input port by id
    pub fn input(&self, id: &str) -> Option<&PortMetadata> {
        self.inputs.iter().find(|p| p.id == id)
    }
}

/// Metadata for a port (input or output)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortMetadata {
    /// Port identifier (used in context keys)
    pub id: String,
    /// Human-readable label
    pub label: String,
    /// Data type
    pub data_type: PortDataType,
    /// Whether this input is required
    pub required: bool,
    /// Whether the upstream chain is only evaluated on demand
    #[serde(default)]
    pub lazy: bool,
    /// Default value shown by the host widget
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<serde_json::Value>,
}

impl PortMetadata {
    /// Create a new port metadata
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        data_type: PortDataType,
        required: bool,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            data_type,
            required,
            lazy: false,
            default_value: None,
        }
    }

    /// Create a required port
    pub fn required(
        id: impl Into<String>,
        label: impl Into<String>,
        data_type: PortDataType,
    ) -> Self {
        Self::new(id, label, data_type, true)
    }

    /// Create an optional port
    pub fn optional(
        id: impl Into<String>,
        label: impl Into<String>,
        data_type: PortDataType,
    ) -> Self {
        Self::new(id, label, data_type, false)
    }

    /// Mark this input as lazily evaluated
    pub fn lazy(mut self) -> Self {
        self.lazy = true;
        self
    }

    /// Set a default value for this port
    pub fn with_default(mut self, value: serde_json::Value) -> Self {
        self.default_value = Some(value);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_metadata_required() {
        let port = PortMetadata::required("folder_path", "Folder", PortDataType::String);
        assert_eq!(port.id, "folder_path");
        assert_eq!(port.label, "Folder");
        assert!(port.required);
        assert!(!port.lazy);
    }

    #[test]
    fn test_port_metadata_lazy_with_default() {
        let port = PortMetadata::required("pass_input", "Pass", PortDataType::Any)
            .lazy()
            .with_default(serde_json::json!(null));
        assert!(port.lazy);
        assert_eq!(port.default_value, Some(serde_json::Value::Null));
    }

    #[test]
    fn test_lazy_inputs_filter() {
        let metadata = TaskMetadata {
            node_type: "router".to_string(),
            category: NodeCategory::Control,
            label: "Router".to_string(),
            description: "Routes".to_string(),
            inputs: vec![
                PortMetadata::required("condition", "Condition", PortDataType::Boolean),
                PortMetadata::required("pass_input", "Pass", PortDataType::Any).lazy(),
                PortMetadata::required("fail_input", "Fail", PortDataType::Any).lazy(),
            ],
            outputs: vec![],
            execution_mode: ExecutionMode::Reactive,
        };

        let lazy: Vec<&str> = metadata.lazy_inputs().map(|p| p.id.as_str()).collect();
        assert_eq!(lazy, vec!["pass_input", "fail_input"]);
        assert!(metadata.input("condition").is_some());
        assert!(metadata.input("missing").is_none());
    }

    #[test]
    fn test_task_metadata_serialization() {
        let metadata = TaskMetadata {
            node_type: "image-browser".to_string(),
            category: NodeCategory::Input,
            label: "Image Browser".to_string(),
            description: "Pick an image".to_string(),
            inputs: vec![PortMetadata::required("folder_path", "Folder", PortDataType::String)],
            outputs: vec![PortMetadata::optional("image_path", "Image", PortDataType::Image)],
            execution_mode: ExecutionMode::Reactive,
        };

        let json = serde_json::to_string(&metadata).unwrap();
        assert!(json.contains("image-browser"));
        assert!(json.contains("nodeType")); // camelCase
        assert!(json.contains("dataType"));
        assert!(!json.contains("defaultValue"));
    }
}
