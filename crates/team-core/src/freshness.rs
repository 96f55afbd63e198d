//! Which files in a directory were created or changed during this turn.
//!
//! Two tiers, first hit wins:
//! 1. `git status --porcelain` for the directory: untracked, added or modified
//!    entries with the right extension.
//! 2. Modification time: entries with the right extension modified within the
//!    age window.
//!
//! A failing or absent `git` is not an error; it just means tier 2 decides.

use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use chrono::{DateTime, TimeDelta, Utc};

use crate::error::Result;
use crate::runner::{CommandRunner, CommandSpec};
use crate::verdict::Decision;

// ---------------------------------------------------------------------------
// FreshnessQuery
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FreshnessQuery {
    /// Directory to inspect, already resolved against the project root.
    pub directory: PathBuf,
    /// Directory as the user wrote it, for messages.
    pub label: String,
    /// Suffix to match, usually with its dot (`.md`).
    pub extension: String,
    pub max_age_minutes: u64,
}

impl FreshnessQuery {
    pub fn new(
        directory: impl Into<PathBuf>,
        label: impl Into<String>,
        extension: impl Into<String>,
        max_age_minutes: u64,
    ) -> Self {
        Self {
            directory: directory.into(),
            label: label.into(),
            extension: extension.into(),
            max_age_minutes,
        }
    }

    fn window(&self) -> TimeDelta {
        let minutes = i64::try_from(self.max_age_minutes).unwrap_or(i64::MAX);
        TimeDelta::try_minutes(minutes).unwrap_or(TimeDelta::MAX)
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// One candidate file and whether it counts as fresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FreshnessRecord {
    pub path: PathBuf,
    pub fresh: bool,
    /// Present for modification-time records only.
    pub modified: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FreshnessSource {
    VersionControl,
    ModificationTime,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FreshFiles {
    pub source: FreshnessSource,
    pub files: Vec<PathBuf>,
}

// ---------------------------------------------------------------------------
// Tier 1: version control
// ---------------------------------------------------------------------------

/// Parse `git status --porcelain` output into records for files ending in
/// `extension`. A record is fresh when its status shows untracked, added or
/// modified.
pub fn parse_porcelain(stdout: &str, extension: &str) -> Vec<FreshnessRecord> {
    stdout
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| {
            let status = line.get(..2)?;
            let path = line.get(3..)?.trim();
            if !path.ends_with(extension) {
                return None;
            }
            let fresh = status.contains(|c| matches!(c, '?' | 'A' | 'M'));
            Some(FreshnessRecord {
                path: PathBuf::from(path),
                fresh,
                modified: None,
            })
        })
        .collect()
}

/// Ask git which matching files under the directory are new or changed.
/// Any failure of the query itself yields an empty list.
pub fn version_control_records(
    runner: &dyn CommandRunner,
    timeout: Duration,
    query: &FreshnessQuery,
) -> Vec<FreshnessRecord> {
    let command = CommandSpec::new(
        "git",
        [
            "status".to_string(),
            "--porcelain".to_string(),
            "--untracked-files=all".to_string(),
            "--".to_string(),
            query.directory.to_string_lossy().into_owned(),
        ],
    );
    let output = runner.run(&command, timeout);
    if !output.success() {
        tracing::debug!(
            exit_code = output.exit_code(),
            "git status unavailable, falling back to modification times"
        );
        return Vec::new();
    }
    parse_porcelain(&output.stdout, &query.extension)
}

// ---------------------------------------------------------------------------
// Tier 2: modification time
// ---------------------------------------------------------------------------

/// Every regular file in the directory ending in the extension, in
/// enumeration order, flagged fresh when modified less than the window ago.
/// Files stamped in the future count as fresh.
pub fn modification_time_records(
    query: &FreshnessQuery,
    now: DateTime<Utc>,
) -> Result<Vec<FreshnessRecord>> {
    let window = query.window();
    let mut records = Vec::new();
    for entry in std::fs::read_dir(&query.directory)? {
        let entry = entry?;
        let name = entry.file_name();
        if !name.to_string_lossy().ends_with(&query.extension) {
            continue;
        }
        let meta = entry.metadata()?;
        if !meta.is_file() {
            continue;
        }
        let modified: DateTime<Utc> = meta.modified().unwrap_or(SystemTime::UNIX_EPOCH).into();
        records.push(FreshnessRecord {
            path: entry.path(),
            fresh: now.signed_duration_since(modified) < window,
            modified: Some(modified),
        });
    }
    Ok(records)
}

fn recent_records(query: &FreshnessQuery, now: DateTime<Utc>) -> Vec<FreshnessRecord> {
    match modification_time_records(query, now) {
        Ok(records) => records.into_iter().filter(|r| r.fresh).collect(),
        Err(e) => {
            tracing::debug!(directory = %query.directory.display(), "cannot list directory: {e}");
            Vec::new()
        }
    }
}

// ---------------------------------------------------------------------------
// Detection
// ---------------------------------------------------------------------------

/// Files judged new this turn, or `None` if neither tier found any.
pub fn detect_fresh_files(
    runner: &dyn CommandRunner,
    timeout: Duration,
    query: &FreshnessQuery,
    now: DateTime<Utc>,
) -> Option<FreshFiles> {
    let from_vcs: Vec<PathBuf> = version_control_records(runner, timeout, query)
        .into_iter()
        .filter(|r| r.fresh)
        .map(|r| r.path)
        .collect();
    if !from_vcs.is_empty() {
        return Some(FreshFiles {
            source: FreshnessSource::VersionControl,
            files: from_vcs,
        });
    }

    let recent: Vec<PathBuf> = recent_records(query, now)
        .into_iter()
        .map(|r| r.path)
        .collect();
    if recent.is_empty() {
        None
    } else {
        Some(FreshFiles {
            source: FreshnessSource::ModificationTime,
            files: recent,
        })
    }
}

/// The most recently modified fresh file, by modification time only.
/// Ties keep the first file enumerated.
pub fn newest_fresh_file(query: &FreshnessQuery, now: DateTime<Utc>) -> Option<PathBuf> {
    let mut newest: Option<FreshnessRecord> = None;
    for record in recent_records(query, now) {
        let is_newer = match &newest {
            None => true,
            Some(best) => record.modified > best.modified,
        };
        if is_newer {
            newest = Some(record);
        }
    }
    newest.map(|r| r.path)
}

/// Continue when fresh files exist, otherwise block asking for one.
pub fn fresh_files_decision(found: Option<FreshFiles>, query: &FreshnessQuery) -> Decision {
    match found {
        Some(FreshFiles { source, files }) => {
            let list = join_paths(&files);
            match source {
                FreshnessSource::VersionControl => {
                    Decision::allow_with(format!("New file(s) found: {list}"))
                }
                FreshnessSource::ModificationTime => {
                    Decision::allow_with(format!("Recent file(s) found: {list}"))
                }
            }
        }
        None => Decision::block(format!(
            "BLOCKED: No new {ext} file found in {dir}/. You must create a file in {dir}/ before completing.",
            ext = query.extension,
            dir = display_dir(&query.label),
        )),
    }
}

pub(crate) fn display_dir(label: &str) -> &str {
    label.trim_end_matches('/')
}

fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
