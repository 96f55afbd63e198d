//! Built-in markdown structure checks.
//!
//! No external linter is involved. Four independent checks run over the
//! content: emptiness, heading hierarchy, runs of blank lines, and the trailing
//! newline. An empty file reports only the emptiness issue.

use std::fmt;
use std::path::Path;

use crate::error::Result;
use crate::verdict::Decision;

/// Deepest heading level markdown recognises.
const MAX_HEADING_LEVEL: usize = 6;
/// A run of this many blank lines is one too many.
const MAX_BLANK_RUN: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkdownIssue {
    Empty,
    /// A heading jumped more than one level deeper than the previous heading.
    HeadingSkip { line: usize, from: usize, to: usize },
    ExcessBlankLines { line: usize },
    MissingTrailingNewline,
}

impl fmt::Display for MarkdownIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarkdownIssue::Empty => write!(f, "File is empty"),
            MarkdownIssue::HeadingSkip { line, from, to } => {
                write!(f, "Line {line}: Heading level skipped (h{from} -> h{to})")
            }
            MarkdownIssue::ExcessBlankLines { line } => {
                write!(f, "Line {line}: Multiple consecutive blank lines")
            }
            MarkdownIssue::MissingTrailingNewline => write!(f, "File does not end with a newline"),
        }
    }
}

pub fn check_markdown(content: &str) -> Vec<MarkdownIssue> {
    if content.trim().is_empty() {
        return vec![MarkdownIssue::Empty];
    }

    let lines: Vec<&str> = content.split('\n').collect();
    let mut issues = heading_issues(&lines);

    if let Some(line) = first_excess_blank_run(&lines) {
        issues.push(MarkdownIssue::ExcessBlankLines { line });
    }

    if !content.ends_with('\n') {
        issues.push(MarkdownIssue::MissingTrailingNewline);
    }

    issues
}

/// Check a file on disk. Invalid UTF-8 is decoded lossily; only a failed
/// read is an error.
pub fn check_markdown_file(path: &Path) -> Result<Vec<MarkdownIssue>> {
    let bytes = std::fs::read(path)?;
    Ok(check_markdown(&String::from_utf8_lossy(&bytes)))
}

/// Block listing every issue as a bullet, or allow when there are none.
pub fn issues_decision(subject: &str, issues: &[MarkdownIssue]) -> Decision {
    if issues.is_empty() {
        return Decision::allow();
    }
    let bullets: Vec<String> = issues.iter().map(|i| format!("- {i}")).collect();
    Decision::block(format!(
        "Markdown issues found in {subject}:\n{}",
        bullets.join("\n")
    ))
}

/// Level of an ATX heading: 1-6 `#` then a space. Shebang-style `#!` lines and
/// bare runs of `#` are not headings.
fn heading_level(line: &str) -> Option<usize> {
    let line = line.trim_start();
    if !line.starts_with('#') || line.starts_with("#!") {
        return None;
    }
    let level = line.chars().take_while(|c| *c == '#').count();
    if level <= MAX_HEADING_LEVEL && line[level..].starts_with(' ') {
        Some(level)
    } else {
        None
    }
}

fn heading_issues(lines: &[&str]) -> Vec<MarkdownIssue> {
    let mut issues = Vec::new();
    let mut prev = 0;
    for (idx, line) in lines.iter().enumerate() {
        let Some(level) = heading_level(line) else {
            continue;
        };
        if prev > 0 && level > prev + 1 {
            issues.push(MarkdownIssue::HeadingSkip {
                line: idx + 1,
                from: prev,
                to: level,
            });
        }
        prev = level;
    }
    issues
}

fn first_excess_blank_run(lines: &[&str]) -> Option<usize> {
    let mut run = 0;
    for (idx, line) in lines.iter().enumerate() {
        if line.trim().is_empty() {
            run += 1;
            if run > MAX_BLANK_RUN {
                return Some(idx + 1);
            }
        } else {
            run = 0;
        }
    }
    None
}
