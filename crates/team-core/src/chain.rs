//! Ordered fallback across interchangeable external checkers.
//!
//! A chain lists candidates for one check category in priority order, e.g.
//! biome before eslint. The first candidate whose executable resolves decides
//! the outcome, pass or fail; later candidates never run. If nothing resolves
//! the chain allows, since a missing linter must not block the agent.
//!
//! # Candidates
//! - `ruff`:   `uvx ruff check <file>`
//! - `eslint`: `bunx biome check --no-errors-on-unmatched <file>`, then `npx eslint <file>`
//! - `tsc`:    `npx tsc --noEmit` (whole project, output filtered to the file)

use std::time::Duration;

use crate::config::OUTPUT_EXCERPT_CHARS;
use crate::runner::{CommandRunner, CommandSpec, ProcessOutput};
use crate::verdict::Decision;

/// Max diagnostic lines kept from a type-checker run.
const MAX_DIAGNOSTIC_LINES: usize = 10;

/// How a failing candidate's output becomes a block reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interpretation {
    /// First 500 characters of stdout, or stderr if stdout is empty.
    Excerpt,
    /// Lines naming the file or a `TS` error code, at most ten; falls back to
    /// [`Interpretation::Excerpt`] when none match.
    TypeScriptDiagnostics,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub command: CommandSpec,
    /// Prefix for the block reason, completed with ` <file>:`.
    pub failure_heading: &'static str,
    pub interpretation: Interpretation,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackChain {
    pub category: &'static str,
    pub candidates: Vec<Candidate>,
}

impl FallbackChain {
    /// Run the chain for `subject`, the file named in the reason.
    pub fn run(&self, runner: &dyn CommandRunner, timeout: Duration, subject: &str) -> Decision {
        for candidate in &self.candidates {
            let output = runner.run(&candidate.command, timeout);
            if !output.is_found() {
                tracing::debug!(
                    category = self.category,
                    command = %candidate.command.display(),
                    "candidate not found, trying next"
                );
                continue;
            }
            if output.success() {
                tracing::debug!(
                    category = self.category,
                    command = %candidate.command.display(),
                    "passed"
                );
                return Decision::allow();
            }
            let detail = match candidate.interpretation {
                Interpretation::Excerpt => excerpt(&output),
                Interpretation::TypeScriptDiagnostics => typescript_diagnostics(&output, subject),
            };
            let heading = candidate.failure_heading;
            return Decision::block(format!("{heading} {subject}:\n{detail}"));
        }
        tracing::debug!(category = self.category, "no checker available, allowing");
        Decision::allow()
    }
}

/// The first [`OUTPUT_EXCERPT_CHARS`] characters of trimmed stdout, falling back to stderr.
pub fn excerpt(output: &ProcessOutput) -> String {
    primary_text(output)
        .chars()
        .take(OUTPUT_EXCERPT_CHARS)
        .collect()
}

pub fn typescript_diagnostics(output: &ProcessOutput, subject: &str) -> String {
    let relevant: Vec<&str> = primary_text(output)
        .lines()
        .filter(|l| l.contains(subject) || l.contains("error TS"))
        .take(MAX_DIAGNOSTIC_LINES)
        .collect();
    if relevant.is_empty() {
        excerpt(output)
    } else {
        relevant.join("\n")
    }
}

fn primary_text(output: &ProcessOutput) -> &str {
    let stdout = output.stdout.trim();
    if stdout.is_empty() {
        output.stderr.trim()
    } else {
        stdout
    }
}

// ---------------------------------------------------------------------------
// Built-in chains
// ---------------------------------------------------------------------------

pub fn ruff(file: &str) -> FallbackChain {
    FallbackChain {
        category: "python-lint",
        candidates: vec![Candidate {
            command: CommandSpec::new("uvx", ["ruff", "check", file]),
            failure_heading: "Ruff lint errors in",
            interpretation: Interpretation::Excerpt,
        }],
    }
}

pub fn eslint(file: &str) -> FallbackChain {
    FallbackChain {
        category: "js-lint",
        candidates: vec![
            Candidate {
                command: CommandSpec::new(
                    "bunx",
                    ["biome", "check", "--no-errors-on-unmatched", file],
                ),
                failure_heading: "Biome lint errors in",
                interpretation: Interpretation::Excerpt,
            },
            Candidate {
                command: CommandSpec::new("npx", ["eslint", file]),
                failure_heading: "ESLint errors in",
                interpretation: Interpretation::Excerpt,
            },
        ],
    }
}

pub fn tsc() -> FallbackChain {
    FallbackChain {
        category: "typecheck",
        candidates: vec![Candidate {
            command: CommandSpec::new("npx", ["tsc", "--noEmit"]),
            failure_heading: "TypeScript errors affecting",
            interpretation: Interpretation::TypeScriptDiagnostics,
        }],
    }
}
