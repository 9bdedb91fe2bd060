//! Dialect-independent tool definitions

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// What both target dialects share: a name, a description, and a JSON-schema
/// object for the parameters. The emitter wraps this into the dialect shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSpec {
    /// Sanitized tool name
    pub name: String,
    /// Human-readable description, before any dialect truncation
    pub description: String,
    /// JSON-schema object with `properties` and, when non-empty, `required`
    pub parameters: Value,
}

impl ToolSpec {
    /// Create a new tool spec
    pub fn new(name: impl Into<String>, description: impl Into<String>, parameters: Value) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
        }
    }
}
