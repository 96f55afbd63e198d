use std::io::{IsTerminal, Read};
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use anyhow::Context;
use chrono::Utc;
use clap::Args;
use team_core::config::{GateConfig, DEFAULT_DIRECTORY, DEFAULT_EXTENSION, DEFAULT_MAX_AGE_MINUTES};
use team_core::event::HookEvent;
use team_core::freshness::FreshnessQuery;
use team_core::gates::{self, Gate, GateContext};
use team_core::runner::SystemRunner;
use team_core::{Decision, HookKind};

use crate::output;

/// Flags shared by the end-of-turn gates. Repeating a flag keeps the last value.
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct FreshnessArgs {
    /// Directory to inspect, relative to the project root
    #[arg(long, default_value = DEFAULT_DIRECTORY, overrides_with = "directory")]
    pub directory: String,

    /// File extension to look for
    #[arg(long, default_value = DEFAULT_EXTENSION, overrides_with = "extension")]
    pub extension: String,

    /// Minutes within which a modification counts as fresh
    #[arg(long = "max-age", default_value_t = DEFAULT_MAX_AGE_MINUTES, overrides_with = "max_age")]
    pub max_age: u64,
}

impl FreshnessArgs {
    fn query(&self, config: &GateConfig) -> FreshnessQuery {
        FreshnessQuery::new(
            config.resolve(Path::new(&self.directory)),
            &self.directory,
            &self.extension,
            self.max_age,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateCommand {
    CheckFile(Gate),
    EnsureGitignore {
        directories: Vec<String>,
    },
    ValidateNewFile(FreshnessArgs),
    ValidateContains {
        target: FreshnessArgs,
        contains: Vec<String>,
    },
}

impl GateCommand {
    fn gate(&self) -> Gate {
        match self {
            GateCommand::CheckFile(gate) => *gate,
            GateCommand::EnsureGitignore { .. } => Gate::EnsureGitignore,
            GateCommand::ValidateNewFile(_) => Gate::ValidateNewFile,
            GateCommand::ValidateContains { .. } => Gate::ValidateContains,
        }
    }
}

/// Run one gate and print its verdict. Errors and panics become the neutral
/// verdict, so a gate always answers and the process always exits 0.
pub fn run(command: GateCommand, config: &GateConfig) {
    let gate = command.gate();
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| decide(command, config)));
    let decision = match outcome {
        Ok(Ok(decision)) => decision,
        Ok(Err(e)) => {
            tracing::warn!(gate = gate.name(), "gate failed, allowing: {e:#}");
            Decision::allow()
        }
        Err(_) => {
            tracing::warn!(gate = gate.name(), "gate panicked, allowing");
            Decision::allow()
        }
    };
    tracing::debug!(gate = gate.name(), blocked = decision.is_block(), "decided");

    if let Err(e) = output::print_verdict(&decision.render(gate.hook_kind())) {
        eprintln!("error: {e:#}");
    }
}

fn decide(command: GateCommand, config: &GateConfig) -> anyhow::Result<Decision> {
    let runner = SystemRunner::in_dir(&config.root);
    let ctx = GateContext {
        config,
        runner: &runner,
    };
    let input = read_stdin();

    let decision = match command {
        GateCommand::CheckFile(gate) => {
            let event = HookEvent::parse_lenient(&input?);
            gates::check_file(gate, &ctx, &event)
        }
        GateCommand::EnsureGitignore { directories } => {
            discard(input);
            gates::ensure_gitignore(&ctx, &directories)
        }
        GateCommand::ValidateNewFile(target) => {
            discard(input);
            gates::validate_new_file(&ctx, &target.query(config), Utc::now())
        }
        GateCommand::ValidateContains { target, contains } => {
            discard(input);
            gates::validate_contains(&target.query(config), &contains, Utc::now())
        }
    };
    Ok(decision)
}

/// Drain stdin so the orchestrator never blocks writing the event. A terminal
/// means nobody is sending one.
fn read_stdin() -> anyhow::Result<String> {
    let stdin = std::io::stdin();
    if stdin.is_terminal() {
        return Ok(String::new());
    }
    let mut raw = Vec::new();
    stdin
        .lock()
        .read_to_end(&mut raw)
        .context("failed to read hook input from stdin")?;
    Ok(String::from_utf8_lossy(&raw).into_owned())
}

fn discard(input: anyhow::Result<String>) {
    if let Err(e) = input {
        tracing::debug!("ignoring unreadable stdin: {e:#}");
    }
}

/// The lifecycle of the gate named in a raw argument list, if any.
pub fn kind_from_args(args: &[String]) -> Option<HookKind> {
    args.iter()
        .find_map(|arg| Gate::from_name(arg))
        .map(|gate| gate.hook_kind())
}
