//! Workflow Nodes
//!
//! Executable nodes for the image browser plugin pack. Each node is a
//! graph-flow `Task` with a `TaskDescriptor`; descriptors are collected at
//! link time so a host can list every node without constructing one.
//!
//! # Categories
//!
//! - **Input**: image browser loader, image series loader
//! - **Control**: lazy conditional routing and the conditional stop gate

pub mod control;
pub mod input;

pub use control::*;
pub use input::*;

use node_engine::NodeRegistry;

/// Registry holding the metadata of every node in this crate
///
/// Calling this from a binary also keeps the crate linked, so its
/// descriptors are visible to `NodeRegistry::with_builtins`.
pub fn builtin_registry() -> NodeRegistry {
    NodeRegistry::with_builtins()
}

#[cfg(test)]
mod tests {
    use super::*;
    use node_engine::NodeCategory;

    #[test]
    fn test_inventory_collects_all_builtins() {
        let registry = builtin_registry();
        assert_eq!(registry.len(), 5, "Expected 5 built-in nodes");

        for node_type in [
            "image-browser",
            "load-image-series",
            "conditional-router",
            "conditional-router-dual",
            "conditional-stop",
        ] {
            assert!(registry.get_metadata(node_type).is_some(), "missing {}", node_type);
        }

        assert_eq!(registry.by_category(NodeCategory::Input).len(), 2);
        assert_eq!(registry.by_category(NodeCategory::Control).len(), 3);
    }
}
