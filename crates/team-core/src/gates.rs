//! The seven gates, each mapping its input to a [`Decision`].
//!
//! Nothing here writes to stdout; rendering happens in the CLI. Every gate is
//! fail-open: errors collapse to an allow, except where the missing thing is
//! exactly what the gate checks for.

use chrono::{DateTime, Utc};

use crate::applicability::{self, ExtensionSet};
use crate::chain;
use crate::config::GateConfig;
use crate::contains;
use crate::event::HookEvent;
use crate::freshness::{self, FreshnessQuery};
use crate::gitignore::{self, GitignoreUpdate};
use crate::markdown;
use crate::runner::CommandRunner;
use crate::verdict::{Decision, HookKind};

// ---------------------------------------------------------------------------
// Gate
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    Ruff,
    Eslint,
    Tsc,
    Markdownlint,
    EnsureGitignore,
    ValidateNewFile,
    ValidateContains,
}

impl Gate {
    pub const ALL: [Gate; 7] = [
        Gate::Ruff,
        Gate::Eslint,
        Gate::Tsc,
        Gate::Markdownlint,
        Gate::EnsureGitignore,
        Gate::ValidateNewFile,
        Gate::ValidateContains,
    ];

    /// Look a gate up by its subcommand name.
    pub fn from_name(name: &str) -> Option<Gate> {
        Gate::ALL.into_iter().find(|gate| gate.name() == name)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Gate::Ruff => "ruff",
            Gate::Eslint => "eslint",
            Gate::Tsc => "tsc",
            Gate::Markdownlint => "markdownlint",
            Gate::EnsureGitignore => "ensure-gitignore",
            Gate::ValidateNewFile => "validate-new-file",
            Gate::ValidateContains => "validate-contains",
        }
    }

    pub fn hook_kind(&self) -> HookKind {
        match self {
            Gate::ValidateNewFile | Gate::ValidateContains => HookKind::Stop,
            _ => HookKind::PostToolUse,
        }
    }

    /// Extensions a file-checking gate applies to.
    pub fn extensions(&self) -> Option<ExtensionSet> {
        match self {
            Gate::Ruff => Some(applicability::PYTHON),
            Gate::Eslint => Some(applicability::JAVASCRIPT),
            Gate::Tsc => Some(applicability::TYPESCRIPT),
            Gate::Markdownlint => Some(applicability::MARKDOWN),
            _ => None,
        }
    }
}

pub struct GateContext<'a> {
    pub config: &'a GateConfig,
    pub runner: &'a dyn CommandRunner,
}

// ---------------------------------------------------------------------------
// Post-tool-use gates
// ---------------------------------------------------------------------------

/// Run one of the file-checking gates against the event's target file.
pub fn check_file(gate: Gate, ctx: &GateContext<'_>, event: &HookEvent) -> Decision {
    let Some(set) = gate.extensions() else {
        tracing::warn!(gate = gate.name(), "not a file-checking gate");
        return Decision::allow();
    };
    let Some(target) = applicability::target_file(event, set, &ctx.config.root) else {
        return Decision::allow();
    };
    let subject = target.display().to_string();

    match gate {
        Gate::Ruff => chain::ruff(&subject).run(ctx.runner, ctx.config.timeout, &subject),
        Gate::Eslint => chain::eslint(&subject).run(ctx.runner, ctx.config.timeout, &subject),
        Gate::Tsc => chain::tsc().run(ctx.runner, ctx.config.timeout, &subject),
        Gate::Markdownlint => match markdown::check_markdown_file(&target) {
            Ok(issues) => markdown::issues_decision(&subject, &issues),
            Err(e) => {
                tracing::warn!(path = %target.display(), "cannot read markdown, allowing: {e}");
                Decision::allow()
            }
        },
        _ => Decision::allow(),
    }
}

/// Add the directories to the project `.gitignore`. Never blocks.
pub fn ensure_gitignore(ctx: &GateContext<'_>, directories: &[String]) -> Decision {
    match gitignore::ensure_directories(&ctx.config.root, directories) {
        Ok(GitignoreUpdate::Unchanged) => Decision::allow(),
        Ok(GitignoreUpdate::Created(entries)) | Ok(GitignoreUpdate::Appended(entries)) => {
            Decision::allow_with(format!("Added to .gitignore: {}", entries.join(", ")))
        }
        Err(e) => {
            tracing::warn!("gitignore update failed, allowing: {e}");
            Decision::allow()
        }
    }
}

// ---------------------------------------------------------------------------
// Stop gates
// ---------------------------------------------------------------------------

pub fn validate_new_file(
    ctx: &GateContext<'_>,
    query: &FreshnessQuery,
    now: DateTime<Utc>,
) -> Decision {
    let found = freshness::detect_fresh_files(ctx.runner, ctx.config.timeout, query, now);
    freshness::fresh_files_decision(found, query)
}

pub fn validate_contains(
    query: &FreshnessQuery,
    required: &[String],
    now: DateTime<Utc>,
) -> Decision {
    contains::validate_contains(query, required, now)
}
