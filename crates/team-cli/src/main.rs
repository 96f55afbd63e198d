mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::gate::{FreshnessArgs, GateCommand};
use std::path::PathBuf;
use team_core::config::{GateConfig, DEFAULT_DIRECTORY, DEFAULT_TIMEOUT_MS};
use team_core::gates::Gate;
use team_core::Verdict;

#[derive(Parser)]
#[command(
    name = "claude-team",
    about = "Agent hook gates: lint, structure, freshness and required-content checks",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: current directory)
    #[arg(long, global = true, env = "CLAUDE_PROJECT_DIR")]
    root: Option<PathBuf>,

    /// Timeout for each external checker, in milliseconds
    #[arg(
        long,
        global = true,
        env = "CLAUDE_TEAM_TIMEOUT_MS",
        default_value_t = DEFAULT_TIMEOUT_MS
    )]
    timeout_ms: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create specs/ and wire the gates into .claude/settings.json
    Init {
        /// Target directory (default: the project root)
        dir: Option<PathBuf>,
    },

    /// Rewrite the hooks in an existing .claude/settings.json
    Update {
        /// Target directory (default: the project root)
        dir: Option<PathBuf>,
    },

    /// Lint the edited Python file with ruff
    Ruff,

    /// Lint the edited JavaScript/TypeScript file with biome or eslint
    Eslint,

    /// Type-check the project after a TypeScript edit
    Tsc,

    /// Check the edited Markdown file's structure
    Markdownlint,

    /// Make sure output directories are listed in .gitignore
    EnsureGitignore {
        /// Directory to ignore (repeatable)
        #[arg(long = "directory", default_value = DEFAULT_DIRECTORY)]
        directories: Vec<String>,
    },

    /// Block the end of a turn unless a file was created or modified in a directory
    ValidateNewFile {
        #[command(flatten)]
        target: FreshnessArgs,
    },

    /// Block the end of a turn unless the newest file contains every required string
    ValidateContains {
        #[command(flatten)]
        target: FreshnessArgs,

        /// Literal text the file must contain (repeatable)
        #[arg(long = "contains", allow_hyphen_values = true)]
        contains: Vec<String>,
    },
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => handle_parse_error(e),
    };

    init_tracing();

    let root = root::resolve_root(cli.root.as_deref());
    let config = GateConfig::new(root).with_timeout_ms(cli.timeout_ms);
    let target_dir = |dir: Option<PathBuf>| match dir {
        Some(dir) => config.resolve(&dir),
        None => config.root.clone(),
    };

    let gate = match cli.command {
        Commands::Init { dir } => exit_on_error(cmd::init::run(&target_dir(dir))),
        Commands::Update { dir } => exit_on_error(cmd::update::run(&target_dir(dir))),
        Commands::Ruff => GateCommand::CheckFile(Gate::Ruff),
        Commands::Eslint => GateCommand::CheckFile(Gate::Eslint),
        Commands::Tsc => GateCommand::CheckFile(Gate::Tsc),
        Commands::Markdownlint => GateCommand::CheckFile(Gate::Markdownlint),
        Commands::EnsureGitignore { directories } => GateCommand::EnsureGitignore { directories },
        Commands::ValidateNewFile { target } => GateCommand::ValidateNewFile(target),
        Commands::ValidateContains { target, contains } => {
            GateCommand::ValidateContains { target, contains }
        }
    };

    cmd::gate::run(gate, &config);
}

/// Diagnostics go to stderr so stdout carries nothing but the verdict.
fn init_tracing() {
    let filter = std::env::var("CLAUDE_TEAM_LOG")
        .ok()
        .and_then(|spec| tracing_subscriber::EnvFilter::try_new(spec).ok())
        .unwrap_or_else(|| {
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into())
        });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn exit_on_error(result: anyhow::Result<()>) -> ! {
    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            // Print the full error chain (anyhow's alternate Display)
            eprintln!("error: {e:#}");
            std::process::exit(1);
        }
    }
}

/// A gate invoked with bad arguments still answers with its neutral verdict
/// and exit 0. Help, version and non-gate errors behave as clap normally does.
fn handle_parse_error(e: clap::Error) -> ! {
    use clap::error::ErrorKind;

    if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
        e.exit();
    }
    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(kind) = cmd::gate::kind_from_args(&args) else {
        e.exit();
    };

    eprint!("{e}");
    if let Err(err) = output::print_verdict(&Verdict::neutral(kind)) {
        eprintln!("error: {err:#}");
    }
    std::process::exit(0);
}
