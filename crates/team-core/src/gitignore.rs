use std::collections::HashSet;
use std::path::Path;

use crate::error::Result;
use crate::{io, paths};

/// Comment line introducing entries this tool appended.
pub const GENERATED_MARKER: &str = "# Generated output";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitignoreUpdate {
    /// Every directory was already covered.
    Unchanged,
    /// The file did not exist and was created with these entries.
    Created(Vec<String>),
    /// These entries were appended to an existing file.
    Appended(Vec<String>),
}

/// `specs`, `specs/` and ` specs/ ` all become `specs/`. Blank input yields `None`.
pub fn normalize_entry(directory: &str) -> Option<String> {
    let bare = directory.trim().trim_end_matches('/');
    if bare.is_empty() {
        None
    } else {
        Some(format!("{bare}/"))
    }
}

/// Entries from `directories` not yet covered by `existing`, deduplicated, in
/// input order. A directory is covered if its bare or trailing-slash form is
/// already a line (ignoring surrounding whitespace).
pub fn uncovered_entries(existing: &str, directories: &[String]) -> Vec<String> {
    let lines: HashSet<&str> = existing.split('\n').map(str::trim).collect();
    let mut seen = HashSet::new();
    let mut entries = Vec::new();
    for dir in directories {
        let Some(entry) = normalize_entry(dir) else {
            continue;
        };
        let bare = entry.trim_end_matches('/');
        if lines.contains(entry.as_str()) || lines.contains(bare) {
            continue;
        }
        if seen.insert(entry.clone()) {
            entries.push(entry);
        }
    }
    entries
}

/// The text to append to `existing` so that `entries` are covered.
pub fn render_block(existing: &str, entries: &[String]) -> String {
    let mut block = String::new();
    if !existing.is_empty() && !existing.ends_with('\n') {
        block.push('\n');
    }
    if !existing.contains(GENERATED_MARKER) {
        block.push('\n');
        block.push_str(GENERATED_MARKER);
        block.push('\n');
    }
    for entry in entries {
        block.push_str(entry);
        block.push('\n');
    }
    block
}

/// Make sure every directory has an entry in `<root>/.gitignore`.
/// Running it twice with the same input leaves the file unchanged the second time.
pub fn ensure_directories(root: &Path, directories: &[String]) -> Result<GitignoreUpdate> {
    let path = paths::gitignore_path(root);
    let existed = path.exists();
    let existing = io::read_or_empty(&path)?;

    let entries = uncovered_entries(&existing, directories);
    if entries.is_empty() {
        return Ok(GitignoreUpdate::Unchanged);
    }

    let block = render_block(&existing, &entries);
    if existed {
        io::append_text(&path, &block)?;
        tracing::debug!(path = %path.display(), ?entries, "appended gitignore entries");
        Ok(GitignoreUpdate::Appended(entries))
    } else {
        io::atomic_write(&path, block.as_bytes())?;
        tracing::debug!(path = %path.display(), ?entries, "created gitignore");
        Ok(GitignoreUpdate::Created(entries))
    }
}
