use anyhow::Context;
use std::path::Path;
use team_core::{io, paths, settings::HookSettings};

/// Binary name the generated hook commands invoke.
pub const BINARY_NAME: &str = "claude-team";
pub const BINARY_VERSION: &str = env!("CARGO_PKG_VERSION");

/// `claude-team init`: create the output directory and wire the gates into
/// `.claude/settings.json`. Existing files are left alone.
pub fn run(root: &Path) -> anyhow::Result<()> {
    println!("Initializing claude-team v{BINARY_VERSION} in: {}", root.display());

    let specs = paths::specs_dir(root);
    let specs_existed = specs.is_dir();
    io::ensure_dir(&specs).with_context(|| format!("failed to create {}", specs.display()))?;
    if specs_existed {
        println!("  exists:  {}/", paths::SPECS_DIR);
    } else {
        println!("  created: {}/", paths::SPECS_DIR);
    }

    let settings_path = paths::settings_path(root);
    let settings = HookSettings::for_binary(BINARY_NAME).to_pretty_json()?;
    let created = io::write_if_missing(&settings_path, settings.as_bytes())
        .with_context(|| format!("failed to write {}", settings_path.display()))?;
    if created {
        println!("  created: {}", paths::CLAUDE_SETTINGS_FILE);
    } else {
        println!(
            "  exists:  {} (run '{BINARY_NAME} update' to rewrite its hooks)",
            paths::CLAUDE_SETTINGS_FILE
        );
    }

    println!("\nclaude-team initialized successfully.");
    Ok(())
}
