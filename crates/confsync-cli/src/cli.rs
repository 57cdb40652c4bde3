//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// confsync - Back up, restore and prune application configuration files
#[derive(Parser, Debug)]
#[command(name = "confsync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, visible_short_alias = 'd', global = true)]
    pub verbose: bool,

    /// Configuration file to use instead of ~/.confsync/config.toml
    #[arg(long, global = true, env = "CONFSYNC_CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Directory holding user application catalogs
    #[arg(long, global = true, env = "CONFSYNC_APPS_DIR")]
    pub apps_dir: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Copy every selected application's files from home into the store
    Backup {
        /// Overwrite existing files in the store without asking
        #[arg(short, long)]
        force: bool,
    },

    /// Copy every selected application's files from the store back into home
    ///
    /// Forced overwrites of live files additionally require
    /// --i-understand-restore-overwrites.
    ///
    /// Examples:
    ///   confsync restore
    ///   confsync restore --upstream-home /Users/alice
    ///   confsync restore -f --i-understand-restore-overwrites
    Restore {
        /// Overwrite existing files without asking (needs authorization)
        #[arg(short, long)]
        force: bool,

        /// Home directory the store was captured under on another machine
        #[arg(long, env = "CONFSYNC_UPSTREAM_HOME")]
        upstream_home: Option<PathBuf>,

        /// Authorize --force to overwrite live files during restore
        #[arg(long = "i-understand-restore-overwrites", env = "CONFSYNC_RESTORE_OVERWRITE")]
        restore_overwrite: bool,
    },

    /// Remove store files that no catalog references any more
    Prune,

    /// List known applications; `*` marks those selected by the config
    List,

    /// Show resolved paths and settings
    Config {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_backup_force() {
        let cli = Cli::try_parse_from(["confsync", "backup", "--force"]).unwrap();
        assert_eq!(cli.command, Some(Commands::Backup { force: true }));
    }

    #[test]
    fn parse_restore_flags() {
        let cli = Cli::try_parse_from([
            "confsync",
            "restore",
            "-f",
            "--upstream-home",
            "/Users/alice",
            "--i-understand-restore-overwrites",
        ])
        .unwrap();

        assert_eq!(
            cli.command,
            Some(Commands::Restore {
                force: true,
                upstream_home: Some(PathBuf::from("/Users/alice")),
                restore_overwrite: true,
            })
        );
    }

    #[test]
    fn debug_alias_enables_verbose() {
        let cli = Cli::try_parse_from(["confsync", "-d", "list"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.command, Some(Commands::List));
    }
}
