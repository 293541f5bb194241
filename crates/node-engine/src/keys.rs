//! Context key conventions
//!
//! Nodes communicate through the shared graph-flow `Context`, storing inputs
//! and outputs under well-defined keys.
//!
//! - Inputs: `{task_id}.input.{port_name}`
//! - Outputs: `{task_id}.output.{port_name}`
//!
//! ```ignore
//! context.set(&ContextKeys::input("browser_1", "folder_path"), "/images").await;
//! let path: Option<String> = context.get(&ContextKeys::output("browser_1", "image_path")).await;
//! ```

/// Helper for building context keys
pub struct ContextKeys;

impl ContextKeys {
    /// Build an input key: `{task_id}.input.{port}`
    pub fn input(task_id: &str, port: &str) -> String {
        format!("{}.input.{}", task_id, port)
    }

    /// Build an output key: `{task_id}.output.{port}`
    pub fn output(task_id: &str, port: &str) -> String {
        format!("{}.output.{}", task_id, port)
    }
}
