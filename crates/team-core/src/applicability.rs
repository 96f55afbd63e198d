use std::path::{Path, PathBuf};

use crate::event::HookEvent;

/// The file extensions a post-tool-use gate cares about, compared case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtensionSet {
    pub extensions: &'static [&'static str],
}

pub const PYTHON: ExtensionSet = ExtensionSet {
    extensions: &[".py", ".pyi"],
};

pub const JAVASCRIPT: ExtensionSet = ExtensionSet {
    extensions: &[".js", ".jsx", ".ts", ".tsx", ".mjs", ".mts"],
};

pub const TYPESCRIPT: ExtensionSet = ExtensionSet {
    extensions: &[".ts", ".tsx", ".mts"],
};

pub const MARKDOWN: ExtensionSet = ExtensionSet {
    extensions: &[".md", ".mdx", ".markdown"],
};

impl ExtensionSet {
    pub fn matches(&self, path: &Path) -> bool {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return false;
        };
        let dotted = format!(".{}", ext.to_lowercase());
        self.extensions.iter().any(|e| *e == dotted)
    }
}

/// Pick the file a post-tool-use gate should check, or `None` if the gate has
/// nothing to do: no path in the event, an extension outside `set`, or a file
/// that no longer exists. Decided before anything is spawned.
pub fn target_file(event: &HookEvent, set: ExtensionSet, root: &Path) -> Option<PathBuf> {
    let Some(raw) = event.file_path() else {
        tracing::debug!("no file_path in hook input");
        return None;
    };
    let path = crate::paths::resolve(root, Path::new(raw));
    if !set.matches(&path) {
        tracing::debug!(path = %path.display(), "extension not handled by this gate");
        return None;
    }
    if !path.is_file() {
        tracing::debug!(path = %path.display(), "target file does not exist");
        return None;
    }
    Some(path)
}
