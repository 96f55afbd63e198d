#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

/// The binary rooted at `dir`, with an empty `PATH` so no external checker or
/// git is ever found.
fn team(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("claude-team").unwrap();
    cmd.current_dir(dir.path())
        .env("CLAUDE_PROJECT_DIR", dir.path())
        .env("PATH", "")
        .env_remove("CLAUDE_TEAM_LOG")
        .env_remove("CLAUDE_TEAM_TIMEOUT_MS");
    cmd
}

/// Run a gate and return its single-line verdict.
fn verdict(cmd: &mut Command) -> Value {
    let output = cmd.assert().success().get_output().stdout.clone();
    let stdout = String::from_utf8(output).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 1, "expected one verdict line, got {stdout:?}");
    serde_json::from_str(lines[0]).unwrap()
}

fn event_for(path: &std::path::Path) -> String {
    serde_json::json!({
        "hook_event_name": "PostToolUse",
        "tool_name": "Write",
        "tool_input": { "file_path": path }
    })
    .to_string()
}

// ---------------------------------------------------------------------------
// post-tool-use gates
// ---------------------------------------------------------------------------

#[test]
fn markdownlint_blocks_on_heading_skip() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("plan.md");
    std::fs::write(&file, "# A\n\n### B\n").unwrap();

    let v = verdict(team(&dir).arg("markdownlint").write_stdin(event_for(&file)));
    assert_eq!(v["decision"], "block");
    let reason = v["reason"].as_str().unwrap();
    assert!(reason.starts_with("Markdown issues found in"));
    assert!(reason.contains("Line 3: Heading level skipped (h1 -> h3)"));
}

#[test]
fn markdownlint_allows_clean_file() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("plan.md");
    std::fs::write(&file, "# A\n## B\n").unwrap();

    let v = verdict(team(&dir).arg("markdownlint").write_stdin(event_for(&file)));
    assert_eq!(v, serde_json::json!({}));
}

#[test]
fn markdownlint_checks_non_utf8_file() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("plan.md");
    std::fs::write(&file, b"# Caf\xe9\n## Menu\n").unwrap();

    let v = verdict(team(&dir).arg("markdownlint").write_stdin(event_for(&file)));
    assert_eq!(v, serde_json::json!({}));
}

#[test]
fn relative_file_path_resolves_against_root() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("notes.md"), "").unwrap();

    let event = r#"{"tool_input":{"file_path":"notes.md"}}"#;
    let v = verdict(team(&dir).arg("markdownlint").write_stdin(event));
    assert!(v["reason"].as_str().unwrap().contains("- File is empty"));
}

#[test]
fn inapplicable_extension_allows() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("notes.txt");
    std::fs::write(&file, "# A\n\n### B\n").unwrap();

    for gate in ["ruff", "eslint", "tsc", "markdownlint"] {
        let v = verdict(team(&dir).arg(gate).write_stdin(event_for(&file)));
        assert_eq!(v, serde_json::json!({}), "gate {gate}");
    }
}

#[test]
fn missing_checker_fails_open() {
    let dir = TempDir::new().unwrap();
    let py = dir.path().join("app.py");
    let ts = dir.path().join("app.ts");
    std::fs::write(&py, "import os\n").unwrap();
    std::fs::write(&ts, "const x: number = 'a';\n").unwrap();

    let v = verdict(team(&dir).arg("ruff").write_stdin(event_for(&py)));
    assert_eq!(v, serde_json::json!({}));
    for gate in ["eslint", "tsc"] {
        let v = verdict(team(&dir).arg(gate).write_stdin(event_for(&ts)));
        assert_eq!(v, serde_json::json!({}), "gate {gate}");
    }
}

#[test]
fn malformed_or_missing_input_allows() {
    let dir = TempDir::new().unwrap();
    for input in ["not json", "[1, 2]", "", "{}"] {
        let v = verdict(team(&dir).arg("markdownlint").write_stdin(input));
        assert_eq!(v, serde_json::json!({}), "input {input:?}");
    }
    let v = verdict(team(&dir).arg("markdownlint"));
    assert_eq!(v, serde_json::json!({}));
}

#[test]
fn ensure_gitignore_is_idempotent() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join(".gitignore"), "target\n").unwrap();

    team(&dir)
        .args(["ensure-gitignore", "--directory", "specs", "--directory", "out/"])
        .write_stdin("{}")
        .assert()
        .success()
        .stdout("{}\n");
    let first = std::fs::read_to_string(dir.path().join(".gitignore")).unwrap();
    assert_eq!(first, "target\n\n# Generated output\nspecs/\nout/\n");

    team(&dir)
        .args(["ensure-gitignore", "--directory", "specs", "--directory", "out/"])
        .write_stdin("not json")
        .assert()
        .success()
        .stdout("{}\n");
    let second = std::fs::read_to_string(dir.path().join(".gitignore")).unwrap();
    assert_eq!(first, second);
}

#[test]
fn ensure_gitignore_defaults_to_specs() {
    let dir = TempDir::new().unwrap();
    team(&dir).arg("ensure-gitignore").assert().success();
    let content = std::fs::read_to_string(dir.path().join(".gitignore")).unwrap();
    assert_eq!(content, "\n# Generated output\nspecs/\n");
}

// ---------------------------------------------------------------------------
// stop gates
// ---------------------------------------------------------------------------

#[test]
fn validate_new_file_blocks_on_empty_directory() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir(dir.path().join("specs")).unwrap();

    let v = verdict(team(&dir).arg("validate-new-file"));
    assert_eq!(v["result"], "block");
    assert!(v["reason"].as_str().unwrap().starts_with("BLOCKED:"));
}

#[test]
fn validate_new_file_blocks_on_missing_directory() {
    let dir = TempDir::new().unwrap();
    let v = verdict(team(&dir).args(["validate-new-file", "--directory", "plans"]));
    assert_eq!(v["result"], "block");
    assert!(v["reason"].as_str().unwrap().contains("plans/"));
}

#[test]
fn validate_new_file_continues_on_fresh_file() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir(dir.path().join("specs")).unwrap();
    std::fs::write(dir.path().join("specs/plan.md"), "# Plan\n").unwrap();

    let v = verdict(
        team(&dir)
            .args(["validate-new-file", "--directory", "specs", "--extension", ".md"])
            .write_stdin(r#"{"hook_event_name":"Stop"}"#),
    );
    assert_eq!(v["result"], "continue");
    let message = v["message"].as_str().unwrap();
    assert!(message.starts_with("Recent file(s) found:"));
    assert!(message.contains("plan.md"));
}

#[test]
fn validate_contains_names_missing_section() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir(dir.path().join("specs")).unwrap();
    std::fs::write(dir.path().join("specs/plan-1.md"), "## Objective\nDo X").unwrap();

    let v = verdict(team(&dir).args([
        "validate-contains",
        "--directory",
        "specs",
        "--contains",
        "## Objective",
        "--contains",
        "## Risks",
    ]));
    assert_eq!(v["result"], "block");
    let reason = v["reason"].as_str().unwrap();
    assert!(reason.contains("  - \"## Risks\""));
    assert!(!reason.contains("\"## Objective\""));
}

#[test]
fn validate_contains_continues_when_complete() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir(dir.path().join("specs")).unwrap();
    std::fs::write(
        dir.path().join("specs/plan-1.md"),
        "## Objective\n\n- [ ] step\n\n## Risks\n",
    )
    .unwrap();

    let v = verdict(team(&dir).args([
        "validate-contains",
        "--contains",
        "## Objective",
        "--contains",
        "- [ ]",
        "--contains",
        "## Risks",
    ]));
    assert_eq!(v["result"], "continue");
    assert!(v["message"]
        .as_str()
        .unwrap()
        .starts_with("All 3 required sections found in"));
}

#[test]
fn validate_contains_accepts_non_utf8_plan() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir(dir.path().join("specs")).unwrap();
    std::fs::write(
        dir.path().join("specs/plan-1.md"),
        b"## Objective\ncaf\xe9\n## Risks\n",
    )
    .unwrap();

    let v = verdict(team(&dir).args([
        "validate-contains",
        "--contains",
        "## Objective",
        "--contains",
        "## Risks",
    ]));
    assert_eq!(v["result"], "continue");
}

#[test]
fn validate_contains_without_requirements_passes() {
    let dir = TempDir::new().unwrap();
    let v = verdict(team(&dir).arg("validate-contains"));
    assert_eq!(
        v,
        serde_json::json!({
            "result": "continue",
            "message": "No --contains checks specified, passing."
        })
    );
}

#[test]
fn bad_gate_arguments_still_answer_neutrally() {
    let dir = TempDir::new().unwrap();
    let v = verdict(team(&dir).args(["validate-new-file", "--max-age", "soon"]));
    assert_eq!(v["result"], "continue");

    team(&dir)
        .args(["ruff", "--bogus"])
        .assert()
        .success()
        .stdout("{}\n")
        .stderr(predicate::str::contains("--bogus"));
}

#[test]
fn logs_never_reach_stdout() {
    let dir = TempDir::new().unwrap();
    team(&dir)
        .env("CLAUDE_TEAM_LOG", "debug")
        .arg("markdownlint")
        .write_stdin("not json")
        .assert()
        .success()
        .stdout("{}\n");
}

// ---------------------------------------------------------------------------
// init / update
// ---------------------------------------------------------------------------

#[test]
fn init_creates_specs_and_settings() {
    let dir = TempDir::new().unwrap();
    team(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("created: .claude/settings.json"));

    assert!(dir.path().join("specs").is_dir());
    let raw = std::fs::read_to_string(dir.path().join(".claude/settings.json")).unwrap();
    let settings: Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(
        settings["hooks"]["PostToolUse"][0]["matcher"],
        "Write|Edit|MultiEdit"
    );
}

#[test]
fn init_is_idempotent() {
    let dir = TempDir::new().unwrap();
    team(&dir).arg("init").assert().success();
    team(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("exists:  .claude/settings.json"));
}

#[test]
fn init_into_explicit_directory() {
    let dir = TempDir::new().unwrap();
    team(&dir).args(["init", "app"]).assert().success();
    assert!(dir.path().join("app/.claude/settings.json").exists());
    assert!(dir.path().join("app/specs").is_dir());
}

#[test]
fn update_requires_init() {
    let dir = TempDir::new().unwrap();
    team(&dir)
        .arg("update")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not initialized"));
}

#[test]
fn update_rewrites_hooks_only() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir(dir.path().join(".claude")).unwrap();
    std::fs::write(
        dir.path().join(".claude/settings.json"),
        r#"{"permissions":{"allow":["Bash(ls)"]}}"#,
    )
    .unwrap();

    team(&dir).arg("update").assert().success();
    let raw = std::fs::read_to_string(dir.path().join(".claude/settings.json")).unwrap();
    let settings: Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(settings["permissions"]["allow"][0], "Bash(ls)");
    assert!(settings["hooks"]["Stop"].is_array());
}
