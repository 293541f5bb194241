//! Node type registry
//!
//! Node crates submit their descriptors at link time:
//!
//! ```ignore
//! inventory::submit!(node_engine::DescriptorFn(MyTask::descriptor));
//! ```
//!
//! `NodeRegistry::with_builtins()` collects every submitted descriptor so the
//! host can list the palette without a hand-maintained table.

use std::collections::HashMap;

use crate::descriptor::TaskMetadata;
use crate::types::NodeCategory;

/// Function pointer producing a node's metadata, collected via `inventory`
pub struct DescriptorFn(pub fn() -> TaskMetadata);

inventory::collect!(DescriptorFn);

/// Registry of node types keyed by `node_type`
pub struct NodeRegistry {
    entries: HashMap<String, TaskMetadata>,
}

impl NodeRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Create a registry holding every descriptor submitted with `inventory`
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for descriptor in inventory::iter::<DescriptorFn> {
            registry.register(descriptor.0());
        }
        log::debug!("NodeRegistry: collected {} built-in nodes", registry.len());
        registry
    }

    /// Register (or replace) a node type
    pub fn register(&mut self, metadata: TaskMetadata) {
        if self.entries.contains_key(&metadata.node_type) {
            log::warn!("NodeRegistry: replacing node type '{}'", metadata.node_type);
        }
        self.entries.insert(metadata.node_type.clone(), metadata);
    }

    /// Get metadata for a node type
    pub fn get_metadata(&self, node_type: &str) -> Option<&TaskMetadata> {
        self.entries.get(node_type)
    }

    /// All registered metadata, sorted by node type for stable listings
    pub fn all_metadata(&self) -> Vec<&TaskMetadata> {
        let mut all: Vec<&TaskMetadata> = self.entries.values().collect();
        all.sort_by(|a, b| a.node_type.cmp(&b.node_type));
        all
    }

    /// Metadata of a single category, sorted by node type
    pub fn by_category(&self, category: NodeCategory) -> Vec<&TaskMetadata> {
        self.all_metadata()
            .into_iter()
            .filter(|m| m.category == category)
            .collect()
    }

    /// Number of registered node types
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for NodeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::PortMetadata;
    use crate::types::{ExecutionMode, PortDataType};

    fn test_metadata(node_type: &str) -> TaskMetadata {
        TaskMetadata {
            node_type: node_type.to_string(),
            category: NodeCategory::Input,
            label: format!("Test {}", node_type),
            description: "Test node".to_string(),
            inputs: vec![PortMetadata::optional("input", "Input", PortDataType::String)],
            outputs: vec![PortMetadata::optional("output", "Output", PortDataType::String)],
            execution_mode: ExecutionMode::Reactive,
        }
    }

    #[test]
    fn test_register_and_lookup_metadata() {
        let mut registry = NodeRegistry::new();
        registry.register(test_metadata("test-node"));

        assert!(registry.get_metadata("unknown").is_none());

        let meta = registry.get_metadata("test-node").unwrap();
        assert_eq!(meta.label, "Test test-node");
    }

    #[test]
    fn test_all_metadata_sorted() {
        let mut registry = NodeRegistry::new();
        registry.register(test_metadata("node-b"));
        registry.register(test_metadata("node-a"));

        let types: Vec<&str> = registry
            .all_metadata()
            .into_iter()
            .map(|m| m.node_type.as_str())
            .collect();
        assert_eq!(types, vec!["node-a", "node-b"]);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_register_replaces_same_type() {
        let mut registry = NodeRegistry::new();
        registry.register(test_metadata("node-a"));

        let mut replacement = test_metadata("node-a");
        replacement.label = "Replacement".to_string();
        registry.register(replacement);

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get_metadata("node-a").unwrap().label, "Replacement");
    }

    #[test]
    fn test_by_category() {
        let mut registry = NodeRegistry::new();

        registry.register(test_metadata("image-browser"));
        registry.register(test_metadata("load-image-series"));

        let mut meta_control = test_metadata("conditional-router");
        meta_control.category = NodeCategory::Control;
        registry.register(meta_control);

        assert_eq!(registry.by_category(NodeCategory::Control).len(), 1);

        let inputs: Vec<&str> = registry
            .by_category(NodeCategory::Input)
            .into_iter()
            .map(|m| m.node_type.as_str())
            .collect();
        assert_eq!(inputs, vec!["image-browser", "load-image-series"]);
    }
}
