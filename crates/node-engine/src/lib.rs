//! Node Engine - host-facing contracts for plugin nodes
//!
//! The host application owns scheduling, execution order and persistence of
//! node graphs. This crate describes the seam between that host and the nodes
//! in this workspace:
//!
//! - `TaskDescriptor` / `TaskMetadata`: self-described node types (ports, category)
//! - `NodeRegistry`: catalog of every node type submitted through `inventory`
//! - `ContextKeys`: key conventions for graph-flow `Context` values
//! - `NodeInstance` / `NodeEvent`: one placed node, its fields and host callbacks
//! - `PendingBranches`: deferred evaluation of gated branches
//!
//! # Example
//!
//! ```ignore
//! use node_engine::{NodeRegistry, NodeCategory};
//!
//! let registry = NodeRegistry::with_builtins();
//! for meta in registry.by_category(NodeCategory::Control) {
//!     println!("{}: {}", meta.node_type, meta.description);
//! }
//! ```

pub mod descriptor;
pub mod error;
pub mod events;
pub mod instance;
pub mod keys;
pub mod lazy;
pub mod registry;
pub mod types;

// Re-export key types
pub use descriptor::{PortMetadata, TaskDescriptor, TaskMetadata};
pub use error::{NodeEngineError, Result};
pub use events::{NodeEvent, NodeEventHandler};
pub use instance::{MemoryNodeInstance, NodeInstance};
pub use keys::ContextKeys;
pub use lazy::{Branch, PendingBranches};
pub use registry::{DescriptorFn, NodeRegistry};
pub use types::{ExecutionMode, NodeCategory, PortDataType};

// Re-export graph-flow types that node implementations need
pub use graph_flow::{Context, GraphError, NextAction, Task, TaskResult};
