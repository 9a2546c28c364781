//! CleanupEngine implementation
//!
//! Sweeps the ledger for expired entries in fixed-size batches: select
//! expired rows, delete each one remotely, and remove the ledger row only
//! after the remote confirms. A failed remote delete leaves the row in
//! place for the next sweep.

use chrono::Utc;
use fwsync_client::FirewallApi;
use fwsync_ledger::BlockLedger;
use serde::Serialize;
use tracing::{info, warn};

use crate::error::Result;

/// Rows selected per sweep round
pub const CLEANUP_BATCH_SIZE: u32 = 100;

/// Outcome of one cleanup sweep
#[derive(Debug, Clone, Default, Serialize)]
pub struct CleanupOutcome {
    /// IPs removed remotely and from the ledger
    pub deleted: Vec<String>,
    /// IPs whose remote delete failed; retained for the next sweep
    pub failed: Vec<String>,
    /// Selection rounds the sweep took
    pub rounds: u32,
}

/// Expiry-driven cleanup sweeper
pub struct CleanupEngine<'a> {
    client: &'a dyn FirewallApi,
    ledger: &'a BlockLedger,
    batch_size: u32,
}

impl<'a> CleanupEngine<'a> {
    pub fn new(client: &'a dyn FirewallApi, ledger: &'a BlockLedger) -> Self {
        Self {
            client,
            ledger,
            batch_size: CLEANUP_BATCH_SIZE,
        }
    }

    pub fn with_batch_size(mut self, batch_size: u32) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Run one cleanup sweep to drain
    ///
    /// Terminates when a round selects fewer rows than the batch size, or
    /// when a round makes no progress (every selected row failed its
    /// remote delete and was retained).
    ///
    /// # Errors
    ///
    /// Returns an error only for ledger faults; remote failures are
    /// per-row and non-fatal.
    pub fn run(&self) -> Result<CleanupOutcome> {
        let mut outcome = CleanupOutcome::default();

        loop {
            let batch = self.ledger.expired_batch(Utc::now(), self.batch_size)?;
            outcome.rounds += 1;

            let mut removed_this_round = 0usize;
            for record in &batch {
                if self.client.delete_block(&record.ip) {
                    self.ledger.remove(&record.ip)?;
                    removed_this_round += 1;
                    outcome.deleted.push(record.ip.clone());
                } else {
                    // Retained; retried on a subsequent sweep
                    warn!(ip = %record.ip, "remote delete failed, keeping ledger row");
                    outcome.failed.push(record.ip.clone());
                }
            }

            if batch.len() < self.batch_size as usize || removed_this_round == 0 {
                break;
            }
        }

        info!(
            deleted = outcome.deleted.len(),
            failed = outcome.failed.len(),
            rounds = outcome.rounds,
            "cleanup sweep complete"
        );
        Ok(outcome)
    }
}
