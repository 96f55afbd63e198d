//! Subprocess invocation with a wall-clock budget.
//!
//! Every external checker goes through [`CommandRunner::run`]. The runner never
//! fails: a program that cannot be resolved on `PATH` comes back as
//! [`Completion::NotFound`], a program that outlives its budget is killed and
//! comes back as [`Completion::TimedOut`]. Output is returned untrimmed; callers
//! decide how much of it to show.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

/// Conventional exit code reported for a program that could not be found.
pub const NOT_FOUND_EXIT_CODE: i32 = -1;
/// Exit code reported for a program killed at its timeout (matches coreutils `timeout`).
pub const TIMEOUT_EXIT_CODE: i32 = 124;
/// How often a running child is checked for exit.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

// ---------------------------------------------------------------------------
// CommandSpec
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandSpec {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Shell-ish rendering for log lines.
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

// ---------------------------------------------------------------------------
// ProcessOutput
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// The process ran to completion with this exit code.
    Exited(i32),
    /// The process was still running at the deadline and was killed.
    TimedOut,
    /// The executable could not be resolved or spawned.
    NotFound,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    pub completion: Completion,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    pub fn not_found(program: &str) -> Self {
        Self {
            completion: Completion::NotFound,
            stdout: String::new(),
            stderr: format!("command not found: {program}"),
        }
    }

    pub fn timed_out(timeout: Duration) -> Self {
        Self {
            completion: Completion::TimedOut,
            stdout: String::new(),
            stderr: format!("timed out after {}ms", timeout.as_millis()),
        }
    }

    pub fn exited(code: i32, stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            completion: Completion::Exited(code),
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self.completion {
            Completion::Exited(code) => code,
            Completion::TimedOut => TIMEOUT_EXIT_CODE,
            Completion::NotFound => NOT_FOUND_EXIT_CODE,
        }
    }

    /// Whether the executable existed. Timeouts count as found.
    pub fn is_found(&self) -> bool {
        self.completion != Completion::NotFound
    }

    pub fn success(&self) -> bool {
        self.completion == Completion::Exited(0)
    }
}

// ---------------------------------------------------------------------------
// CommandRunner
// ---------------------------------------------------------------------------

pub trait CommandRunner {
    fn run(&self, command: &CommandSpec, timeout: Duration) -> ProcessOutput;
}

/// Runs real subprocesses.
#[derive(Debug, Clone, Default)]
pub struct SystemRunner {
    cwd: Option<PathBuf>,
}

impl SystemRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run every command with `cwd` as its working directory.
    pub fn in_dir(cwd: &Path) -> Self {
        Self {
            cwd: Some(cwd.to_path_buf()),
        }
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, command: &CommandSpec, timeout: Duration) -> ProcessOutput {
        let Ok(program) = which::which(&command.program) else {
            tracing::debug!(program = %command.program, "executable not on PATH");
            return ProcessOutput::not_found(&command.program);
        };
        execute(&program, command, self.cwd.as_deref(), timeout)
    }
}

/// Spawn `program`, wait at most `timeout`, and capture both streams.
///
/// Stdout and stderr are drained on dedicated threads so a chatty child can't
/// fill a pipe buffer and stall. The child is polled with `try_wait` until the
/// deadline, then killed and reaped directly.
fn execute(
    program: &Path,
    command: &CommandSpec,
    cwd: Option<&Path>,
    timeout: Duration,
) -> ProcessOutput {
    let mut cmd = Command::new(program);
    cmd.args(&command.args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }

    let mut child = match cmd.spawn() {
        Ok(c) => c,
        Err(e) => {
            tracing::debug!(command = %command.display(), "failed to spawn: {e}");
            return ProcessOutput::not_found(&command.program);
        }
    };

    let stdout_handle = child.stdout.take();
    let stderr_handle = child.stderr.take();

    let stdout_thread = std::thread::spawn(move || -> String {
        let mut buf = Vec::new();
        if let Some(mut r) = stdout_handle {
            let _ = r.read_to_end(&mut buf);
        }
        String::from_utf8_lossy(&buf).into_owned()
    });
    let stderr_thread = std::thread::spawn(move || -> String {
        let mut buf = Vec::new();
        if let Some(mut r) = stderr_handle {
            let _ = r.read_to_end(&mut buf);
        }
        String::from_utf8_lossy(&buf).into_owned()
    });

    // An unrepresentable deadline means no deadline.
    let deadline = Instant::now().checked_add(timeout);
    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) if deadline.is_some_and(|d| Instant::now() >= d) => {
                // The reader threads are left to finish on their own: grandchildren
                // may still hold the pipes open after the direct child dies.
                if let Err(e) = child.kill() {
                    tracing::debug!(command = %command.display(), "kill failed: {e}");
                }
                let _ = child.wait();
                tracing::debug!(command = %command.display(), "killed after timeout");
                return ProcessOutput::timed_out(timeout);
            }
            Ok(None) => std::thread::sleep(POLL_INTERVAL),
            Err(e) => {
                return ProcessOutput::exited(1, String::new(), format!("wait failed: {e}"));
            }
        }
    };

    let stdout = stdout_thread.join().unwrap_or_default();
    let stderr = stderr_thread.join().unwrap_or_default();

    // No exit code means the child died to a signal; report it as a plain failure.
    ProcessOutput::exited(status.code().unwrap_or(1), stdout, stderr)
}
