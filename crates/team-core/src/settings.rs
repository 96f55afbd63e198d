//! The `.claude/settings.json` hook wiring written by `claude-team init`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::{DEFAULT_DIRECTORY, DEFAULT_EXTENSION};
use crate::error::TeamError;

/// Tools whose calls the post-tool-use gates react to.
const FILE_TOOLS_MATCHER: &str = "Write|Edit|MultiEdit";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HookCommand {
    #[serde(rename = "type")]
    pub kind: String,
    pub command: String,
}

impl HookCommand {
    fn command(binary: &str, args: &str) -> Self {
        Self {
            kind: "command".to_string(),
            command: format!("{binary} {args}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HookMatcher {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matcher: Option<String>,
    pub hooks: Vec<HookCommand>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HookSettings {
    pub hooks: BTreeMap<String, Vec<HookMatcher>>,
}

impl HookSettings {
    /// Wire the gates to `binary`. `validate-contains` is left out: its
    /// required sections belong to whichever command produces the document.
    pub fn for_binary(binary: &str) -> Self {
        let post_tool_use = vec![
            HookMatcher {
                matcher: Some(FILE_TOOLS_MATCHER.to_string()),
                hooks: ["ruff", "eslint", "tsc", "markdownlint"]
                    .iter()
                    .map(|gate| HookCommand::command(binary, gate))
                    .collect(),
            },
            HookMatcher {
                matcher: Some("Write".to_string()),
                hooks: vec![HookCommand::command(
                    binary,
                    &format!("ensure-gitignore --directory {DEFAULT_DIRECTORY}"),
                )],
            },
        ];
        let stop = vec![HookMatcher {
            matcher: None,
            hooks: vec![HookCommand::command(
                binary,
                &format!(
                    "validate-new-file --directory {DEFAULT_DIRECTORY} --extension {DEFAULT_EXTENSION}"
                ),
            )],
        }];

        let mut hooks = BTreeMap::new();
        hooks.insert("PostToolUse".to_string(), post_tool_use);
        hooks.insert("Stop".to_string(), stop);
        Self { hooks }
    }

    pub fn to_pretty_json(&self) -> crate::Result<String> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }

    /// Replace the `hooks` key of an existing settings document, keeping every
    /// other key as it was.
    pub fn merge_into(&self, existing: &str) -> crate::Result<String> {
        let mut doc: serde_json::Value = if existing.trim().is_empty() {
            serde_json::Value::Object(Default::default())
        } else {
            serde_json::from_str(existing)?
        };
        let Some(obj) = doc.as_object_mut() else {
            return Err(TeamError::InvalidInput(
                "settings file is not a JSON object".to_string(),
            ));
        };
        obj.insert("hooks".to_string(), serde_json::to_value(&self.hooks)?);
        let mut json = serde_json::to_string_pretty(&doc)?;
        json.push('\n');
        Ok(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wires_every_gate_but_validate_contains() {
        let settings = HookSettings::for_binary("claude-team");
        let json = settings.to_pretty_json().unwrap();
        for gate in [
            "claude-team ruff",
            "claude-team eslint",
            "claude-team tsc",
            "claude-team markdownlint",
            "claude-team ensure-gitignore --directory specs",
            "claude-team validate-new-file --directory specs --extension .md",
        ] {
            assert!(json.contains(gate), "missing {gate}");
        }
        assert!(!json.contains("validate-contains"));
    }

    #[test]
    fn stop_hooks_have_no_matcher() {
        let settings = HookSettings::for_binary("claude-team");
        let value: serde_json::Value =
            serde_json::from_str(&settings.to_pretty_json().unwrap()).unwrap();
        assert!(value["hooks"]["Stop"][0].get("matcher").is_none());
        assert_eq!(value["hooks"]["Stop"][0]["hooks"][0]["type"], "command");
        assert_eq!(
            value["hooks"]["PostToolUse"][0]["matcher"],
            "Write|Edit|MultiEdit"
        );
    }

    #[test]
    fn merge_keeps_other_keys() {
        let existing = r#"{"permissions": {"allow": ["Bash(ls)"]}, "hooks": {"Old": []}}"#;
        let merged = HookSettings::for_binary("claude-team")
            .merge_into(existing)
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&merged).unwrap();
        assert_eq!(value["permissions"]["allow"][0], "Bash(ls)");
        assert!(value["hooks"].get("Old").is_none());
        assert!(value["hooks"].get("Stop").is_some());
    }

    #[test]
    fn merge_rejects_non_objects() {
        let err = HookSettings::for_binary("claude-team")
            .merge_into("[]")
            .unwrap_err();
        assert!(matches!(err, TeamError::InvalidInput(_)));
    }

    #[test]
    fn json_roundtrip() {
        let settings = HookSettings::for_binary("/usr/local/bin/claude-team");
        let json = settings.to_pretty_json().unwrap();
        let parsed: HookSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, settings);
    }
}
