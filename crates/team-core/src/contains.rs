use std::path::Path;

use chrono::{DateTime, Utc};

use crate::freshness::{display_dir, newest_fresh_file, FreshnessQuery};
use crate::verdict::Decision;

/// Required strings absent from `content`, in the order given. Matching is
/// literal and case-sensitive.
pub fn missing_substrings<'a>(content: &str, required: &'a [String]) -> Vec<&'a str> {
    required
        .iter()
        .filter(|r| !content.contains(r.as_str()))
        .map(String::as_str)
        .collect()
}

/// Check that the newest fresh file in the query directory contains every
/// required string.
pub fn validate_contains(
    query: &FreshnessQuery,
    required: &[String],
    now: DateTime<Utc>,
) -> Decision {
    if required.is_empty() {
        return Decision::allow_with("No --contains checks specified, passing.");
    }

    let Some(newest) = newest_fresh_file(query, now) else {
        return Decision::block(format!(
            "BLOCKED: No recent {} file found in {}/. Create the file first.",
            query.extension,
            display_dir(&query.label)
        ));
    };

    content_decision(&newest, std::fs::read(&newest), required)
}

/// Judge the newest file's content, or block naming the read error.
/// Invalid UTF-8 is decoded lossily rather than treated as unreadable.
fn content_decision(
    newest: &Path,
    read: std::io::Result<Vec<u8>>,
    required: &[String],
) -> Decision {
    let bytes = match read {
        Ok(bytes) => bytes,
        Err(e) => {
            return Decision::block(format!("BLOCKED: Cannot read {}: {e}", newest.display()));
        }
    };
    let content = String::from_utf8_lossy(&bytes);

    let missing = missing_substrings(&content, required);
    if missing.is_empty() {
        return Decision::allow_with(format!(
            "All {} required sections found in {}.",
            required.len(),
            newest.display()
        ));
    }

    let list: Vec<String> = missing.iter().map(|m| format!("  - \"{m}\"")).collect();
    Decision::block(format!(
        "BLOCKED: {} is missing required sections:\n{}\n\nAdd these sections to the file before completing.",
        newest.display(),
        list.join("\n")
    ))
}
