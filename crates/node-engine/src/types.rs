//! Core types shared by node descriptors
//!
//! Port data types, node categories and execution modes as the host's node
//! palette understands them.

use serde::{Deserialize, Serialize};

/// The data type of a port
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PortDataType {
    /// Accepts any type
    Any,
    /// Text string
    String,
    /// Filesystem path to an image
    Image,
    /// Boolean value
    Boolean,
    /// Numeric value
    Number,
}

/// Category of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeCategory {
    /// Nodes that bring images or values into the graph
    Input,
    /// Control flow nodes (routers, gates, stops)
    Control,
}

/// Execution mode for a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    /// Execute reactively when inputs change
    Reactive,
    /// Re-execute on every graph run (counters, series loaders)
    EveryRun,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_data_type_wire_names() {
        let json = serde_json::to_string(&PortDataType::Image).unwrap();
        assert_eq!(json, "\"image\"");
        let parsed: PortDataType = serde_json::from_str("\"boolean\"").unwrap();
        assert_eq!(parsed, PortDataType::Boolean);
    }

    #[test]
    fn test_category_serializes_snake_case() {
        let json = serde_json::to_string(&NodeCategory::Control).unwrap();
        assert_eq!(json, "\"control\"");
        let mode = serde_json::to_string(&ExecutionMode::EveryRun).unwrap();
        assert_eq!(mode, "\"every_run\"");
    }
}
