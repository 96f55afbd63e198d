use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::paths;

/// Default wall-clock budget for one external checker invocation.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;
/// Directory end-of-turn gates and the gitignore maintainer look at.
pub const DEFAULT_DIRECTORY: &str = paths::SPECS_DIR;
pub const DEFAULT_EXTENSION: &str = ".md";
/// Files modified more recently than this count as fresh.
pub const DEFAULT_MAX_AGE_MINUTES: u64 = 5;
/// How much checker output a block reason carries.
pub const OUTPUT_EXCERPT_CHARS: usize = 500;

// ---------------------------------------------------------------------------
// GateConfig
// ---------------------------------------------------------------------------

/// Settings shared by every gate invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateConfig {
    /// Project root. Relative paths resolve against it and subprocesses run in it.
    pub root: PathBuf,
    /// Per-command timeout for the process runner.
    pub timeout: Duration,
}

fn default_root() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

fn default_timeout() -> Duration {
    Duration::from_millis(DEFAULT_TIMEOUT_MS)
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            timeout: default_timeout(),
        }
    }
}

impl GateConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            timeout: default_timeout(),
        }
    }

    pub fn with_timeout_ms(mut self, ms: u64) -> Self {
        self.timeout = Duration::from_millis(ms);
        self
    }

    /// Resolve a path relative to the project root.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        paths::resolve(&self.root, path)
    }
}
