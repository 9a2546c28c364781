//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// firewall-sync - keep a remote firewall rule store consistent with a
/// local block ledger
#[derive(Parser, Debug)]
#[command(name = "fwsync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, global = true, env = "FWSYNC_CONFIG", default_value = "fwsync.toml")]
    pub config: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Write an annotated configuration template
    Init {
        /// Overwrite an existing configuration file
        #[arg(long)]
        force: bool,
    },

    /// Confirm the configured credential/zone pair against the remote
    Validate,

    /// Run one sync pass now
    Sync {
        /// Output the pass outcome as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run one cleanup sweep now
    Cleanup {
        /// Output the sweep outcome as JSON
        #[arg(long)]
        json: bool,
    },

    /// Compare the ledger against the remote store and report drift
    Reconcile {
        /// Output the drift report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show ledger size and last sync time
    Status,

    /// Show the block log, newest first
    Log {
        /// Rows to show
        #[arg(long, default_value_t = 20)]
        limit: u32,

        /// Rows to skip
        #[arg(long, default_value_t = 0)]
        offset: u32,
    },

    /// Block a single IP remotely and record it in the ledger
    Block {
        /// IPv4 or IPv6 address
        ip: String,
    },

    /// Remove a single IP from the remote store and the ledger
    Unblock {
        /// IPv4 or IPv6 address
        ip: String,
    },

    /// Run the periodic sync and cleanup jobs in the foreground
    Run,
}
