use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// HookKind
// ---------------------------------------------------------------------------

/// The lifecycle point a gate runs at. Decides the verdict's JSON shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookKind {
    /// After a file-modifying tool call.
    PostToolUse,
    /// When the agent tries to end its turn.
    Stop,
}

// ---------------------------------------------------------------------------
// Decision
// ---------------------------------------------------------------------------

/// What a gate concluded, independent of how the verdict is rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow { message: Option<String> },
    Block { reason: String },
}

/// Message used for a `continue` verdict when the gate had nothing to say.
const DEFAULT_CONTINUE_MESSAGE: &str = "No issues found.";

impl Decision {
    pub fn allow() -> Self {
        Decision::Allow { message: None }
    }

    pub fn allow_with(message: impl Into<String>) -> Self {
        Decision::Allow {
            message: Some(message.into()),
        }
    }

    pub fn block(reason: impl Into<String>) -> Self {
        Decision::Block {
            reason: reason.into(),
        }
    }

    pub fn is_block(&self) -> bool {
        matches!(self, Decision::Block { .. })
    }

    /// Render into the verdict shape the orchestrator expects for `kind`.
    ///
    /// Post-tool-use allows drop their message: that shape is the empty object.
    pub fn render(self, kind: HookKind) -> Verdict {
        match (kind, self) {
            (HookKind::PostToolUse, Decision::Allow { .. }) => {
                Verdict::PostToolUse(PostToolUseVerdict::allow())
            }
            (HookKind::PostToolUse, Decision::Block { reason }) => {
                Verdict::PostToolUse(PostToolUseVerdict::block(reason))
            }
            (HookKind::Stop, Decision::Allow { message }) => Verdict::Stop(StopVerdict::Continue {
                message: message.unwrap_or_else(|| DEFAULT_CONTINUE_MESSAGE.to_string()),
            }),
            (HookKind::Stop, Decision::Block { reason }) => {
                Verdict::Stop(StopVerdict::Block { reason })
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Verdict shapes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostToolUseDecision {
    Block,
}

/// `{}` to allow, `{"decision":"block","reason":...}` to block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PostToolUseVerdict {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decision: Option<PostToolUseDecision>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl PostToolUseVerdict {
    pub fn allow() -> Self {
        Self::default()
    }

    pub fn block(reason: String) -> Self {
        Self {
            decision: Some(PostToolUseDecision::Block),
            reason: Some(reason),
        }
    }
}

/// `{"result":"continue","message":...}` or `{"result":"block","reason":...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "lowercase")]
pub enum StopVerdict {
    Continue { message: String },
    Block { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Verdict {
    Stop(StopVerdict),
    PostToolUse(PostToolUseVerdict),
}

impl Verdict {
    /// The verdict as a single line of JSON.
    pub fn to_line(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// The neutral verdict for `kind`, used whenever a gate fails open.
    pub fn neutral(kind: HookKind) -> Self {
        Decision::allow().render(kind)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
