//! Hook event payloads delivered on stdin.
//!
//! Only `tool_input.file_path` drives any decision; everything else the
//! orchestrator sends is accepted and ignored.

use serde::Deserialize;

use crate::error::{Result, TeamError};

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ToolInput {
    #[serde(default)]
    pub file_path: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct HookEvent {
    #[serde(default)]
    pub tool_input: ToolInput,
}

impl HookEvent {
    /// Strict parse. Blank input is an empty event; anything that isn't a
    /// JSON object is an error.
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(Self::default());
        }
        let value: serde_json::Value = serde_json::from_str(raw)?;
        if !value.is_object() {
            return Err(TeamError::InvalidInput(format!(
                "expected a JSON object, got {}",
                json_kind(&value)
            )));
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Parse, falling back to an empty event on malformed input.
    pub fn parse_lenient(raw: &str) -> Self {
        match Self::parse(raw) {
            Ok(event) => event,
            Err(e) => {
                tracing::warn!("ignoring malformed hook input: {e}");
                Self::default()
            }
        }
    }

    /// The target file, if the event names a non-empty one.
    pub fn file_path(&self) -> Option<&str> {
        self.tool_input
            .file_path
            .as_deref()
            .filter(|p| !p.trim().is_empty())
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
