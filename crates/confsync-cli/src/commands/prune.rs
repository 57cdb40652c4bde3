//! Prune command implementation

use colored::Colorize;
use confsync_core::{OperationLog, Pruner, RunKind};

use crate::context::RunContext;
use crate::error::Result;

/// Run the prune command
///
/// Marks against the selected catalogs only. With nothing selected the
/// command does nothing rather than treating the whole store as orphaned.
pub fn run_prune(ctx: &RunContext) -> Result<()> {
    let apps = ctx.selected_apps();
    if apps.is_empty() {
        tracing::warn!("No apps selected, refusing to prune");
        println!("{} No applications selected.", "!".yellow().bold());
        return Ok(());
    }

    println!("{} Analyzing backup files...", "=>".blue().bold());

    let pruner = Pruner::from_config(ctx.dirs.clone(), &ctx.config);
    let mut log = OperationLog::create(&ctx.logs_dir(), pruner.store_root(), RunKind::Prune);
    let report = pruner.prune(&apps, &mut log)?;

    if report.pruned == 0 && report.failed == 0 {
        println!("{} Nothing to prune.", "OK".green().bold());
    } else {
        println!(
            "{} Pruned {} file(s), removed {} empty director{}.",
            "OK".green().bold(),
            report.pruned,
            report.directories_removed,
            if report.directories_removed == 1 { "y" } else { "ies" }
        );
    }
    if report.failed > 0 {
        println!(
            "{} {} file(s) could not be removed.",
            "WARN".yellow().bold(),
            report.failed
        );
    }
    if log.path().exists() {
        println!("   Log: {}", log.path().as_str().dimmed());
    }

    Ok(())
}
