//! Livraria CLI
//!
//! Book catalog with automatic backups. Without a subcommand it runs the
//! interactive menu.

use clap::{Args, Parser, Subcommand, ValueEnum};
use livraria_core::config::CatalogConfig;
use livraria_core::logging_facility::{self, Profile};
use livraria_core::policy::SnapshotFailureMode;
use livraria_core::retention::DEFAULT_RETENTION_LIMIT;
use livraria_engine::CatalogSession;
use std::io;
use std::path::PathBuf;

mod commands;
mod menu;
mod output;

#[derive(Debug, Parser)]
#[command(name = "livraria")]
#[command(about = "Livraria - book catalog with automatic backups", long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Args)]
struct GlobalArgs {
    /// Directory holding the live database
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Directory holding the snapshots
    #[arg(long, global = true)]
    backup_dir: Option<PathBuf>,

    /// Directory receiving CSV exports
    #[arg(long, global = true)]
    export_dir: Option<PathBuf>,

    /// Number of snapshots to keep (at least 1)
    #[arg(long, global = true, default_value_t = DEFAULT_RETENTION_LIMIT)]
    retention: usize,

    /// Apply mutations even when the snapshot before them fails
    #[arg(long, global = true)]
    fail_open: bool,

    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    fn profile(self) -> Profile {
        match self {
            LogFormat::Pretty => Profile::Development,
            LogFormat::Json => Profile::Production,
        }
    }
}

impl GlobalArgs {
    fn to_config(&self) -> CatalogConfig {
        let defaults = CatalogConfig::default();
        let failure_mode = if self.fail_open {
            SnapshotFailureMode::FailOpen
        } else {
            SnapshotFailureMode::FailClosed
        };

        CatalogConfig {
            data_dir: self.data_dir.clone().unwrap_or(defaults.data_dir),
            backup_dir: self.backup_dir.clone().unwrap_or(defaults.backup_dir),
            export_dir: self.export_dir.clone().unwrap_or(defaults.export_dir),
            retention_limit: self.retention,
            failure_mode,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Add a book
    Add(commands::catalog::AddArgs),
    /// List every book
    List(commands::catalog::ListArgs),
    /// Set the price of every book with a title
    UpdatePrice(commands::catalog::UpdatePriceArgs),
    /// Remove every book with a title
    Remove(commands::catalog::RemoveArgs),
    /// Find books by author
    Search(commands::catalog::SearchArgs),
    /// Export the catalog to CSV
    Export,
    /// Import books from a CSV file
    Import(commands::catalog::ImportArgs),
    /// Take a backup now
    Backup,
    /// List retained backups
    Backups,
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = CatalogSession::open(cli.global.to_config())?;
    let mut out = io::stdout().lock();

    match cli.command {
        None => menu::run(&mut session, io::stdin().lock(), &mut out)?,
        Some(Commands::Add(args)) => commands::catalog::execute_add(&mut session, args, &mut out)?,
        Some(Commands::List(args)) => commands::catalog::execute_list(&mut session, args, &mut out)?,
        Some(Commands::UpdatePrice(args)) => {
            commands::catalog::execute_update_price(&mut session, args, &mut out)?
        }
        Some(Commands::Remove(args)) => {
            commands::catalog::execute_remove(&mut session, args, &mut out)?
        }
        Some(Commands::Search(args)) => {
            commands::catalog::execute_search(&mut session, args, &mut out)?
        }
        Some(Commands::Export) => commands::catalog::execute_export(&mut session, &mut out)?,
        Some(Commands::Import(args)) => {
            commands::catalog::execute_import(&mut session, args, &mut out)?
        }
        Some(Commands::Backup) => commands::backup::execute_backup(&mut session, &mut out)?,
        Some(Commands::Backups) => commands::backup::execute_backups(&mut session, &mut out)?,
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    logging_facility::init(cli.global.log_format.profile());

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
