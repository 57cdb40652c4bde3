//! End-to-end integration test for the library stack
//!
//! This test exercises the complete flow: config loading -> catalog loading ->
//! backup -> restore on a "different machine" -> operation log inspection.

use confsync_core::oplog::{OperationLog, RunKind, Status, read_log};
use confsync_core::{
    Answer, CatalogLoader, ConfigResolver, FixedAnswer, SyncEngine, SyncOptions, SyncReport,
};
use confsync_fs::{HomeDirs, NormalizedPath, io};
use confsync_test_utils::TestHome;
use pretty_assertions::assert_eq;

const EDITOR_CATALOG: &str = r#"
[application]
name = "Editor"

[configuration_files]
".editorrc" = true
".editor" = true
".editor_history" = false

[xdg_configuration_files]
"editor/init.lua" = true
"#;

fn write_config(sandbox: &TestHome) -> NormalizedPath {
    let path = sandbox.write_config(&format!(
        "[storage]\ndirectory = {:?}\npath = \"laptop\"\nlogs = {:?}\n\n[applications_to_sync]\neditor = true\n",
        sandbox.store().display().to_string(),
        sandbox.logs().display().to_string(),
    ));
    NormalizedPath::new(path)
}

fn backup_all(sandbox: &TestHome) -> (SyncReport, NormalizedPath) {
    let dirs = sandbox.dirs();
    let config = ConfigResolver::new(dirs.clone())
        .with_config_file(write_config(sandbox))
        .resolve()
        .unwrap();
    let catalog = CatalogLoader::new(&dirs)
        .with_catalog_dir(sandbox.apps())
        .load()
        .unwrap();

    let store_root = config.store_root(&dirs);
    let engine = SyncEngine::new(dirs, store_root.clone(), SyncOptions::backup());
    let mut log = OperationLog::create(&sandbox.logs_dir(), &store_root, RunKind::Backup);

    let mut total = SyncReport::new("all");
    for app in catalog.selected(&config) {
        let report = engine
            .sync_app(app, &mut FixedAnswer(Answer::Unavailable), &mut log)
            .unwrap();
        total.absorb(&report);
    }
    (total, log.path().clone())
}

#[test]
fn test_full_backup_flow() {
    let sandbox = TestHome::new();
    sandbox.write_catalog("editor.toml", EDITOR_CATALOG);
    sandbox.write_home(".editorrc", "theme=dark");
    sandbox.write_home(".editor/plugins/a.lua", "return {}");
    sandbox.write_home(".editor_history", "secret");
    sandbox.write_xdg("editor/init.lua", "require('a')");

    let (report, log_path) = backup_all(&sandbox);

    assert_eq!(report.copied, 3);
    assert!(report.is_clean());

    let store = sandbox.store().join("laptop");
    assert!(store.join(".editorrc").is_file());
    assert!(store.join(".editor/plugins/a.lua").is_file());
    assert!(!store.join(".editor_history").exists());

    let xdg_rel = sandbox.xdg().join("editor/init.lua");
    let xdg_stored = NormalizedPath::new(&store).join(NormalizedPath::new(&xdg_rel).as_str());
    assert!(xdg_stored.is_file());

    let records = read_log(&log_path).unwrap();
    assert_eq!(records.len(), 3);
    assert!(records.iter().all(|r| r.status == Status::Success));
    assert!(records.iter().all(|r| !r.target.starts_with('/')));
}

#[test]
fn test_restore_on_another_machine() {
    // capture on machine A
    let machine_a = TestHome::new();
    machine_a.write_catalog("editor.toml", EDITOR_CATALOG);
    machine_a.write_home(".editorrc", "theme=dark");
    machine_a.write_xdg("editor/init.lua", "require('a')");
    backup_all(&machine_a);

    // machine B gets a copy of A's store but has a different home
    let machine_b = TestHome::new();
    io::copy_tree(
        &NormalizedPath::new(machine_a.store()),
        &NormalizedPath::new(machine_b.store()),
    )
    .unwrap();

    let dirs = HomeDirs::new(machine_b.home(), machine_b.xdg());
    let store_root = NormalizedPath::new(machine_b.store()).join("laptop");
    let options = SyncOptions::restore().with_upstream_home(Some(NormalizedPath::new(machine_a.home())));
    let engine = SyncEngine::new(dirs.clone(), store_root.clone(), options);

    let catalog = CatalogLoader::new(&dirs)
        .with_catalog_dir(machine_a.apps())
        .without_builtin()
        .load()
        .unwrap();

    let mut log = OperationLog::create(&machine_b.logs_dir(), &store_root, RunKind::Restore);
    let report = engine
        .sync_app(catalog.get("editor").unwrap(), &mut FixedAnswer(Answer::No), &mut log)
        .unwrap();

    assert_eq!(report.copied, 2);
    assert_eq!(machine_b.read_home(".editorrc"), "theme=dark");
    assert_eq!(
        std::fs::read_to_string(machine_b.xdg().join("editor/init.lua")).unwrap(),
        "require('a')"
    );

    let records = read_log(log.path()).unwrap();
    assert!(records.iter().all(|r| !r.source.starts_with('/')));
}
