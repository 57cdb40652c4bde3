//! Backup and restore command implementations

use std::path::Path;

use colored::Colorize;
use confsync_core::{Confirm, OperationLog, SyncEngine, SyncMode, SyncOptions, SyncReport};
use confsync_fs::{NormalizedPath, io};

use crate::context::RunContext;
use crate::error::{CliError, Result};

/// Run the backup command
///
/// Creates the store when it does not exist yet.
pub fn run_backup(ctx: &RunContext, force: bool, confirm: &mut dyn Confirm) -> Result<()> {
    let store_root = ctx.store_root();
    if !store_root.exists() {
        tracing::warn!(store = %store_root, "Storage directory not found");
        io::ensure_dir(&store_root)?;
        tracing::info!(store = %store_root, "Created storage directory");
    }

    run_sync(ctx, SyncOptions::backup().with_force(force), confirm)
}

/// Run the restore command
pub fn run_restore(
    ctx: &RunContext,
    force: bool,
    upstream_home: Option<&Path>,
    restore_overwrite: bool,
    confirm: &mut dyn Confirm,
) -> Result<()> {
    let store_root = ctx.store_root();
    if !store_root.is_dir() {
        return Err(CliError::user(format!(
            "Storage directory not found: {store_root}"
        )));
    }

    let options = SyncOptions::restore()
        .with_force(force)
        .authorize_restore_overwrite(restore_overwrite)
        .with_upstream_home(upstream_home.map(NormalizedPath::new));

    run_sync(ctx, options, confirm)
}

fn run_sync(ctx: &RunContext, options: SyncOptions, confirm: &mut dyn Confirm) -> Result<()> {
    let mode = options.mode;
    let apps = ctx.selected_apps();
    if apps.is_empty() {
        tracing::warn!("No apps to {}", mode.as_str());
        println!("{} No applications selected.", "!".yellow().bold());
        return Ok(());
    }

    println!(
        "{} Running {} for {} application(s)...",
        "=>".blue().bold(),
        mode.as_str(),
        apps.len()
    );

    let store_root = ctx.store_root();
    let engine = SyncEngine::new(ctx.dirs.clone(), store_root.clone(), options);
    let mut log = OperationLog::create(&ctx.logs_dir(), &store_root, mode.run_kind());
    let mut total = SyncReport::new(mode.as_str());

    for app in apps {
        let report = engine.sync_app(app, confirm, &mut log)?;
        print_app_report(app.name(), &report);
        total.absorb(&report);
    }

    println!();
    print_summary(mode, &total);
    if log.path().exists() {
        println!("   Log: {}", log.path().as_str().dimmed());
    }

    Ok(())
}

fn print_app_report(name: &str, report: &SyncReport) {
    if report.copied + report.skipped + report.failed == 0 {
        tracing::debug!(app = name, "Nothing to do");
        return;
    }

    let marker = if report.is_clean() {
        "+".green()
    } else {
        "!".red()
    };
    println!(
        "   {} {:<16} {} copied, {} skipped, {} failed",
        marker,
        name.bold(),
        report.copied,
        report.skipped,
        report.failed
    );
    for error in &report.errors {
        println!("       {} {}", "-".red(), error);
    }
}

fn print_summary(mode: SyncMode, total: &SyncReport) {
    let label = match mode {
        SyncMode::Backup => "Backup",
        SyncMode::Restore => "Restore",
    };

    if total.is_clean() {
        println!(
            "{} {} finished: {} copied, {} skipped.",
            "OK".green().bold(),
            label,
            total.copied,
            total.skipped
        );
    } else {
        println!(
            "{} {} finished with {} failed entr{}: {} copied, {} skipped.",
            "WARN".yellow().bold(),
            label,
            total.failed,
            if total.failed == 1 { "y" } else { "ies" },
            total.copied,
            total.skipped
        );
    }
}
