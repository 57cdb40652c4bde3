//! CLI end-to-end tests that invoke the compiled `confsync` binary.
//!
//! Every test points HOME, XDG_CONFIG_HOME and the CONFSYNC_* variables into
//! a [`TestHome`] sandbox so the real home directory is never touched.

use assert_cmd::Command;
use confsync_test_utils::TestHome;
use predicates::prelude::*;

const TOOL_CATALOG: &str = r#"
[application]
name = "Tool"

[configuration_files]
".rc" = true
".toolcfg" = true
"#;

/// Sandbox with a config selecting only the `tool` catalog.
fn sandbox() -> TestHome {
    let sandbox = TestHome::new();
    sandbox.write_catalog("tool.toml", TOOL_CATALOG);
    sandbox.write_config(&format!(
        "[storage]\ndirectory = {:?}\nlogs = {:?}\n\n[applications_to_sync]\ntool = true\n",
        sandbox.store().display().to_string(),
        sandbox.logs().display().to_string(),
    ));
    sandbox
}

/// Get a Command for the confsync binary bound to the sandbox.
fn confsync(sandbox: &TestHome) -> Command {
    let mut cmd = Command::cargo_bin("confsync").expect("Failed to find confsync binary");
    cmd.env("HOME", sandbox.home())
        .env("XDG_CONFIG_HOME", sandbox.xdg())
        .env("CONFSYNC_CONFIG_FILE", sandbox.root().join("config.toml"))
        .env("CONFSYNC_APPS_DIR", sandbox.apps())
        .env_remove("CONFSYNC_UPSTREAM_HOME")
        .env_remove("CONFSYNC_RESTORE_OVERWRITE")
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1")
        .env("CLICOLOR", "0");
    cmd
}

#[test]
fn test_help_exits_zero() {
    let sandbox = sandbox();
    confsync(&sandbox)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("backup"))
        .stdout(predicate::str::contains("restore"))
        .stdout(predicate::str::contains("prune"));
}

#[test]
fn test_list_marks_selected_apps() {
    let sandbox = sandbox();
    confsync(&sandbox)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("* tool"))
        .stdout(predicate::str::contains("- git"));
}

#[test]
fn test_backup_then_prune_scenario() {
    let sandbox = sandbox();
    sandbox.write_home(".rc", "rc");
    sandbox.write_home(".toolcfg/settings", "s");

    confsync(&sandbox).arg("backup").assert().success();

    sandbox.assert_store_exists(".rc");
    sandbox.assert_store_exists(".toolcfg/settings");
    let logs = sandbox.log_files();
    assert_eq!(logs.len(), 1);
    let log = std::fs::read_to_string(&logs[0]).unwrap();
    assert_eq!(log.lines().count(), 2);
    assert!(log.lines().all(|line| line.contains(r#""status":"success""#)));

    sandbox.remove_home(".rc");
    confsync(&sandbox).arg("prune").assert().success();

    sandbox.assert_store_not_exists(".rc");
    sandbox.assert_store_exists(".toolcfg/settings");
    let prune_log = sandbox
        .log_files()
        .into_iter()
        .find(|p| p.to_string_lossy().ends_with("-prune.jsonl"))
        .expect("prune log written");
    let content = std::fs::read_to_string(prune_log).unwrap();
    assert!(content.contains(r#""status":"pruned""#));
    assert!(content.contains(r#""source":"ORPHAN""#));
}

#[test]
fn test_non_interactive_overwrite_exits_with_distinct_code() {
    let sandbox = sandbox();
    sandbox.write_home(".rc", "new");
    sandbox.write_store(".rc", "old");

    confsync(&sandbox)
        .arg("backup")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Cannot confirm overwrite"));

    assert_eq!(sandbox.read_store(".rc"), "old");
}

#[test]
fn test_backup_force_overwrites() {
    let sandbox = sandbox();
    sandbox.write_home(".rc", "new");
    sandbox.write_store(".rc", "old");

    confsync(&sandbox).args(["backup", "--force"]).assert().success();

    assert_eq!(sandbox.read_store(".rc"), "new");
}

#[test]
fn test_restore_force_needs_authorization() {
    let sandbox = sandbox();
    sandbox.write_store(".rc", "backup");
    sandbox.write_home(".rc", "live");

    confsync(&sandbox)
        .args(["restore", "--force"])
        .assert()
        .code(3);
    assert_eq!(sandbox.read_home(".rc"), "live");

    confsync(&sandbox)
        .args(["restore", "--force", "--i-understand-restore-overwrites"])
        .assert()
        .success();
    assert_eq!(sandbox.read_home(".rc"), "backup");
}

#[test]
fn test_restore_authorization_from_env() {
    let sandbox = sandbox();
    sandbox.write_store(".rc", "backup");
    sandbox.write_home(".rc", "live");

    confsync(&sandbox)
        .args(["restore", "-f"])
        .env("CONFSYNC_RESTORE_OVERWRITE", "true")
        .assert()
        .success();
    assert_eq!(sandbox.read_home(".rc"), "backup");
}

#[test]
fn test_restore_without_store_fails() {
    let sandbox = sandbox();
    confsync(&sandbox)
        .arg("restore")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Storage directory not found"));
}

#[test]
fn test_config_json_reports_paths() {
    let sandbox = sandbox();
    let output = confsync(&sandbox).args(["config", "--json"]).output().unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["config_file_exists"], true);
    assert_eq!(
        json["store_root"].as_str().unwrap(),
        sandbox.store().display().to_string()
    );
}

#[test]
fn test_prune_refuses_store_at_home() {
    let sandbox = sandbox();
    sandbox.write_config("[storage]\ndirectory = \"\"\n\n[applications_to_sync]\ntool = true\n");
    sandbox.write_home(".rc", "rc");
    sandbox.write_home("Documents/thesis.tex", "chapter one");

    confsync(&sandbox)
        .arg("prune")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Refusing to prune"));

    assert_eq!(sandbox.read_home("Documents/thesis.tex"), "chapter one");
}
