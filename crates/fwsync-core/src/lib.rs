//! Sync, cleanup, and reconciliation engines for firewall-sync
//!
//! This crate keeps a remote firewall rule store consistent with a
//! locally authoritative set of block entries:
//!
//! - **SyncEngine**: one scheduler-driven pass creating remote rules for
//!   newly detected blocks and recording them in the ledger
//! - **CleanupEngine**: batched sweep deleting expired blocks remotely
//!   and draining their ledger rows
//! - **Reconciliation**: read-only ledger-vs-remote diff for operator
//!   drift inspection
//!
//! # Architecture
//!
//! `fwsync-core` sits between the leaf crates and the CLI:
//!
//! ```text
//!           fwsync-cli
//!               |
//!          fwsync-core
//!           |        |
//!   fwsync-client  fwsync-ledger
//! ```
//!
//! Engines never return remote failures as errors: remote outcomes
//! surface as booleans and failed sets; `Result::Err` is reserved for
//! local faults (configuration, ledger I/O, lock file I/O).

pub mod addr;
pub mod cleanup;
pub mod config;
pub mod error;
pub mod lock;
pub mod reconcile;
pub mod scheduler;
pub mod service;
pub mod source;
pub mod sync;

pub use addr::canonical_ip;
pub use cleanup::{CLEANUP_BATCH_SIZE, CleanupEngine, CleanupOutcome};
pub use config::{SyncConfig, SyncInterval};
pub use error::{Error, Result};
pub use lock::{RunGuard, RunLock};
pub use reconcile::{ReconciliationReport, reconcile};
pub use scheduler::Scheduler;
pub use service::SyncService;
pub use source::{BlockSource, JsonFileSource, SourceBlock};
pub use sync::{SyncEngine, SyncOutcome};
