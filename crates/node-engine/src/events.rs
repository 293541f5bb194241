//! Host callbacks delivered to a node instance
//!
//! The host calls back into a node when it is resized, when one of its
//! widget values changes and when it is removed from the graph. Those
//! callbacks arrive here as `NodeEvent`s so node logic never depends on a
//! particular host object model.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A host-driven lifecycle event for one node instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum NodeEvent {
    /// The node was resized on the canvas
    Resized { width: f64, height: f64 },

    /// A widget value was changed by the user (or restored by the host)
    #[serde(rename_all = "camelCase")]
    FieldChanged {
        name: String,
        value: serde_json::Value,
    },

    /// The node was removed from the graph
    Removed,
}

impl NodeEvent {
    /// Create a field change event
    pub fn field_changed(name: &str, value: impl Into<serde_json::Value>) -> Self {
        Self::FieldChanged {
            name: name.to_string(),
            value: value.into(),
        }
    }

    /// Create a resize event
    pub fn resized(width: f64, height: f64) -> Self {
        Self::Resized { width, height }
    }
}

/// Receiver of host events for one node instance
#[async_trait]
pub trait NodeEventHandler: Send + Sync {
    /// Handle a single event
    ///
    /// Handlers must not fail the host: problems are logged and absorbed.
    async fn handle_event(&self, event: NodeEvent);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serialization() {
        let event = NodeEvent::field_changed("folder_path", "/tmp/images");
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "fieldChanged");
        assert_eq!(json["name"], "folder_path");
        assert_eq!(json["value"], "/tmp/images");

        let removed = serde_json::to_value(NodeEvent::Removed).unwrap();
        assert_eq!(removed["type"], "removed");
    }

    #[test]
    fn test_resized_roundtrip() {
        let json = r#"{"type":"resized","width":320.0,"height":80.0}"#;
        let event: NodeEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event, NodeEvent::resized(320.0, 80.0));
    }
}
