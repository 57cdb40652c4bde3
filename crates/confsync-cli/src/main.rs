//! confsync CLI
//!
//! Backs up, restores and prunes application configuration files declared
//! in catalogs.

mod cli;
mod commands;
mod context;
mod error;
mod interactive;

use clap::Parser;
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use cli::{Cli, Commands};
use context::RunContext;
use error::Result;
use interactive::TerminalConfirm;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(e.exit_code());
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    let Some(command) = cli.command else {
        println!("{} Application configuration backup", "confsync".green().bold());
        println!();
        println!("Run {} for available commands.", "confsync --help".cyan());
        return Ok(());
    };

    let ctx = RunContext::load(cli.config.as_deref(), cli.apps_dir.as_deref())?;
    execute_command(command, &ctx)
}

/// Diagnostics go to stderr at info level; `--verbose` adds debug output.
/// `RUST_LOG` overrides both.
fn init_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(verbose)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("{}: failed to set tracing subscriber: {}", "warning".yellow().bold(), e);
    }
    tracing::debug!("Verbose mode enabled");
}

fn execute_command(cmd: Commands, ctx: &RunContext) -> Result<()> {
    match cmd {
        Commands::Backup { force } => commands::run_backup(ctx, force, &mut TerminalConfirm::new()),
        Commands::Restore {
            force,
            upstream_home,
            restore_overwrite,
        } => commands::run_restore(
            ctx,
            force,
            upstream_home.as_deref(),
            restore_overwrite,
            &mut TerminalConfirm::new(),
        ),
        Commands::Prune => commands::run_prune(ctx),
        Commands::List => commands::run_list(ctx),
        Commands::Config { json } => commands::run_config(ctx, json),
    }
}
