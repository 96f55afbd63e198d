use anyhow::Context;
use std::path::Path;
use team_core::{io, paths, settings::HookSettings};

use super::init::{BINARY_NAME, BINARY_VERSION};

/// `claude-team update`: rewrite the `hooks` key of `.claude/settings.json`.
///
/// Requires a `.claude/` directory. Every other settings key is kept.
pub fn run(root: &Path) -> anyhow::Result<()> {
    if !paths::claude_dir(root).is_dir() {
        anyhow::bail!(
            "not initialized: run '{BINARY_NAME} init' first (no {} found in {})",
            paths::CLAUDE_DIR,
            root.display()
        );
    }

    println!("Updating claude-team v{BINARY_VERSION} hooks in: {}", root.display());

    let settings_path = paths::settings_path(root);
    let existed = settings_path.exists();
    let existing = io::read_or_empty(&settings_path)
        .with_context(|| format!("failed to read {}", settings_path.display()))?;
    let merged = HookSettings::for_binary(BINARY_NAME)
        .merge_into(&existing)
        .with_context(|| format!("failed to update {}", settings_path.display()))?;
    io::atomic_write(&settings_path, merged.as_bytes())
        .with_context(|| format!("failed to write {}", settings_path.display()))?;

    if existed {
        println!("  updated: {}", paths::CLAUDE_SETTINGS_FILE);
    } else {
        println!("  created: {}", paths::CLAUDE_SETTINGS_FILE);
    }
    Ok(())
}
