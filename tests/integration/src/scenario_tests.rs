//! Scenario tests for the backup -> prune lifecycle and its laws

use confsync_core::oplog::{EntryKind, LogRecord, OperationLog, RunKind, Status, read_log};
use confsync_core::{AppConfig, Answer, FixedAnswer, Pruner, SyncEngine, SyncOptions};
use confsync_test_utils::TestHome;
use pretty_assertions::assert_eq;

fn tool_app() -> AppConfig {
    AppConfig::new("tool")
        .with_file(".rc", true)
        .with_file(".toolcfg", true)
}

fn backup(sandbox: &TestHome, app: &AppConfig) -> OperationLog {
    let engine = SyncEngine::new(sandbox.dirs(), sandbox.store_root(), SyncOptions::backup());
    let mut log = OperationLog::create(&sandbox.logs_dir(), &sandbox.store_root(), RunKind::Backup);
    engine
        .sync_app(app, &mut FixedAnswer(Answer::Unavailable), &mut log)
        .unwrap();
    log
}

fn prune(sandbox: &TestHome, app: &AppConfig) -> OperationLog {
    let pruner = Pruner::new(sandbox.dirs(), sandbox.store_root()).excluding(sandbox.logs_dir());
    let mut log = OperationLog::create(&sandbox.logs_dir(), &sandbox.store_root(), RunKind::Prune);
    pruner.prune(&[app], &mut log).unwrap();
    log
}

#[test]
fn test_backup_scenario_logs_two_successes() {
    let sandbox = TestHome::new();
    sandbox.write_home(".rc", "rc");
    sandbox.write_home(".toolcfg/a", "a");
    sandbox.write_home(".toolcfg/sub/b", "b");

    let log = backup(&sandbox, &tool_app());

    assert!(sandbox.store().join(".rc").is_file());
    assert!(sandbox.store().join(".toolcfg/sub/b").is_file());

    let records = read_log(log.path()).unwrap();
    let summary: Vec<_> = records.iter().map(|r| (r.kind, r.status)).collect();
    assert_eq!(
        summary,
        vec![
            (EntryKind::File, Status::Success),
            (EntryKind::Directory, Status::Success),
        ]
    );
}

#[test]
fn test_prune_scenario_after_local_delete() {
    let sandbox = TestHome::new();
    sandbox.write_home(".rc", "rc");
    sandbox.write_home(".toolcfg/a", "a");
    backup(&sandbox, &tool_app());

    sandbox.remove_home(".rc");
    let log = prune(&sandbox, &tool_app());

    sandbox.assert_store_not_exists(".rc");
    sandbox.assert_store_exists(".toolcfg/a");

    let records = read_log(log.path()).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].target, ".rc");
    assert_eq!(records[0].status, Status::Pruned);
}

#[test]
fn test_second_prune_is_a_noop() {
    let sandbox = TestHome::new();
    sandbox.write_home(".toolcfg/a", "a");
    sandbox.write_store("old/leftover", "x");
    backup(&sandbox, &tool_app());

    let first = prune(&sandbox, &tool_app());
    assert_eq!(read_log(first.path()).unwrap().len(), 1);

    let mut records: Vec<LogRecord> = Vec::new();
    let report = Pruner::new(sandbox.dirs(), sandbox.store_root())
        .prune(&[&tool_app()], &mut records)
        .unwrap();

    assert_eq!(report.pruned, 0);
    assert_eq!(report.directories_removed, 0);
    assert!(records.is_empty());
    sandbox.assert_store_exists(".toolcfg/a");
}

#[test]
fn test_missing_sources_leave_no_trace() {
    let sandbox = TestHome::new();
    sandbox.init_store();

    let log = backup(&sandbox, &tool_app());

    assert!(!log.path().exists());
    assert_eq!(std::fs::read_dir(sandbox.store()).unwrap().count(), 0);
}
