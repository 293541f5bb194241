//! Abstract node instance
//!
//! A node instance is one placed node in the host graph. It owns widget
//! values that the host persists with the graph; nodes read them and write
//! back through this trait.

use std::collections::HashMap;

use parking_lot::Mutex;

/// One placed node in the host graph
pub trait NodeInstance: Send + Sync {
    /// Host identifier of the node
    fn node_id(&self) -> &str;

    /// Current value of a widget field
    fn field_value(&self, name: &str) -> Option<serde_json::Value>;

    /// Set a widget field so the host persists it and can read it at execution
    fn set_field_value(&self, name: &str, value: serde_json::Value);

    /// Convenience accessor for string fields
    fn field_str(&self, name: &str) -> Option<String> {
        self.field_value(name)
            .and_then(|v| v.as_str().map(str::to_string))
    }
}

/// In-memory node instance for headless hosts and tests
///
/// Records every write so callers can assert on the sequence of updates.
pub struct MemoryNodeInstance {
    node_id: String,
    fields: Mutex<HashMap<String, serde_json::Value>>,
    writes: Mutex<Vec<(String, serde_json::Value)>>,
}

impl MemoryNodeInstance {
    pub fn new(node_id: impl Into<String>) -> Self {
        Self {
            node_id: node_id.into(),
            fields: Mutex::new(HashMap::new()),
            writes: Mutex::new(Vec::new()),
        }
    }

    /// Seed a field as if it had been restored from a saved graph
    pub fn with_field(self, name: &str, value: impl Into<serde_json::Value>) -> Self {
        self.fields.lock().insert(name.to_string(), value.into());
        self
    }

    /// Every write made through `set_field_value`, in order
    pub fn writes(&self) -> Vec<(String, serde_json::Value)> {
        self.writes.lock().clone()
    }

    /// Writes to a single field, in order
    pub fn writes_to(&self, name: &str) -> Vec<serde_json::Value> {
        self.writes
            .lock()
            .iter()
            .filter(|(field, _)| field == name)
            .map(|(_, value)| value.clone())
            .collect()
    }
}

impl NodeInstance for MemoryNodeInstance {
    fn node_id(&self) -> &str {
        &self.node_id
    }

    fn field_value(&self, name: &str) -> Option<serde_json::Value> {
        self.fields.lock().get(name).cloned()
    }

    fn set_field_value(&self, name: &str, value: serde_json::Value) {
        self.fields.lock().insert(name.to_string(), value.clone());
        self.writes.lock().push((name.to_string(), value));
    }
}
