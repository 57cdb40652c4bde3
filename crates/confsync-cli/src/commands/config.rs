//! Configuration display command

use colored::Colorize;

use crate::context::RunContext;
use crate::error::Result;

/// Show where confsync reads and writes, and the app filters in effect
pub fn run_config(ctx: &RunContext, json: bool) -> Result<()> {
    if json {
        let output = serde_json::json!({
            "config_file": ctx.config_path.as_str(),
            "config_file_exists": ctx.config_path.is_file(),
            "home": ctx.dirs.home().as_str(),
            "xdg_config": ctx.dirs.xdg_config().as_str(),
            "store_root": ctx.store_root().as_str(),
            "logs_dir": ctx.logs_dir().as_str(),
            "catalog_dir": ctx.catalog_dir.as_str(),
            "config": &ctx.config,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("{}", "confsync Configuration".bold());
    println!();

    let config_file = if ctx.config_path.is_file() {
        ctx.config_path.to_string()
    } else {
        format!("{} {}", ctx.config_path, "(not found, using defaults)".dimmed())
    };
    println!("  {:<14} {}", "Config file:".dimmed(), config_file);
    println!("  {:<14} {}", "Home:".dimmed(), ctx.dirs.home());
    println!("  {:<14} {}", "XDG config:".dimmed(), ctx.dirs.xdg_config());
    println!("  {:<14} {}", "Store:".dimmed(), ctx.store_root());
    println!("  {:<14} {}", "Logs:".dimmed(), ctx.logs_dir());
    println!("  {:<14} {}", "Catalogs:".dimmed(), ctx.catalog_dir);
    println!();

    match &ctx.config.applications_to_sync {
        Some(allowed) => {
            println!("  {}:", "Sync only".dimmed());
            for (app, _) in allowed.iter().filter(|(_, on)| **on) {
                println!("    {} {}", "+".green(), app);
            }
        }
        None => println!("  {:<14} {}", "Sync only:".dimmed(), "(all)".dimmed()),
    }

    let ignored: Vec<_> = ctx
        .config
        .applications_to_ignore
        .iter()
        .filter(|(_, on)| **on)
        .map(|(app, _)| app.as_str())
        .collect();
    if ignored.is_empty() {
        println!("  {:<14} {}", "Ignored:".dimmed(), "(none)".dimmed());
    } else {
        println!("  {}:", "Ignored".dimmed());
        for app in ignored {
            println!("    {} {}", "-".red(), app);
        }
    }

    Ok(())
}
