//! firewall-sync CLI
//!
//! The command-line interface for keeping a remote firewall rule store
//! consistent with a locally authoritative block ledger.

mod cli;
mod commands;
mod error;

use clap::Parser;
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use cli::{Cli, Commands};
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(cli.verbose)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");

    match cli.command {
        Some(cmd) => execute_command(cmd, &cli.config),
        None => {
            println!("{} firewall-sync CLI", "fwsync".green().bold());
            println!();
            println!("Run {} for available commands.", "fwsync --help".cyan());
            Ok(())
        }
    }
}

fn execute_command(cmd: Commands, config: &std::path::Path) -> Result<()> {
    match cmd {
        Commands::Init { force } => commands::run_init(config, force),
        Commands::Validate => commands::run_validate(config),
        Commands::Sync { json } => commands::run_sync(config, json),
        Commands::Cleanup { json } => commands::run_cleanup(config, json),
        Commands::Reconcile { json } => commands::run_reconcile(config, json),
        Commands::Status => commands::run_status(config),
        Commands::Log { limit, offset } => commands::run_log(config, limit, offset),
        Commands::Block { ip } => commands::run_block(config, &ip),
        Commands::Unblock { ip } => commands::run_unblock(config, &ip),
        Commands::Run => commands::run_scheduler(config),
    }
}
