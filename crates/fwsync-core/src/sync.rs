//! SyncEngine implementation
//!
//! One sync pass: pull the candidate blocks from the detection source,
//! filter out everything already synced, stale, or excluded by policy,
//! push the remainder in batches, and record each confirmed create in the
//! ledger. The pass is bracketed by the run-exclusivity lock; a pass that
//! finds the lock held declines without touching the remote or the ledger.

use std::collections::BTreeSet;

use chrono::{DateTime, TimeZone, Utc};
use fwsync_client::{BlockEntry, FirewallApi};
use fwsync_ledger::BlockLedger;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::addr::canonical_ip;
use crate::error::Result;
use crate::lock::RunLock;
use crate::source::BlockSource;

/// Outcome of one sync pass
#[derive(Debug, Clone, Default, Serialize)]
pub struct SyncOutcome {
    /// False when the pass never started (lock held, source unavailable)
    pub started: bool,
    /// IPs newly recorded in the ledger this pass
    pub synced: Vec<String>,
    /// IPs submitted but rejected by the remote; not recorded, retried
    /// on the next pass
    pub failed: BTreeSet<String>,
    /// Candidates excluded before submission
    pub skipped: usize,
}

impl SyncOutcome {
    fn declined() -> Self {
        Self::default()
    }
}

/// Orchestrates sync passes
pub struct SyncEngine<'a> {
    client: &'a dyn FirewallApi,
    ledger: &'a BlockLedger,
    source: &'a dyn BlockSource,
    lock: RunLock,
    blacklist: BTreeSet<String>,
}

impl<'a> SyncEngine<'a> {
    pub fn new(
        client: &'a dyn FirewallApi,
        ledger: &'a BlockLedger,
        source: &'a dyn BlockSource,
        lock: RunLock,
    ) -> Self {
        Self {
            client,
            ledger,
            source,
            lock,
            blacklist: BTreeSet::new(),
        }
    }

    /// IPs never synced to the remote store; non-address entries are
    /// dropped with a warning
    pub fn with_blacklist<I, S>(mut self, ips: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.blacklist = ips
            .into_iter()
            .filter_map(|ip| {
                let canonical = canonical_ip(ip.as_ref());
                if canonical.is_none() {
                    warn!(ip = ip.as_ref(), "ignoring non-address blacklist entry");
                }
                canonical
            })
            .collect();
        self
    }

    /// Run one sync pass
    ///
    /// Completes with `started = true` even when individual IPs fail;
    /// declines (`started = false`) only when the pass could not start at
    /// all: the run lock is held or the source is unavailable.
    ///
    /// # Errors
    ///
    /// Returns an error only for local faults (ledger I/O, lock file I/O).
    pub fn run(&self) -> Result<SyncOutcome> {
        // Guard is held for the whole pass and released on every exit path
        let Some(_guard) = self.lock.try_acquire()? else {
            info!("sync pass already running, declining");
            return Ok(SyncOutcome::declined());
        };

        let blocks = match self.source.fetch_blocks() {
            Ok(blocks) => blocks,
            Err(e) => {
                warn!(error = %e, "block source unavailable, declining");
                return Ok(SyncOutcome::declined());
            }
        };

        let now = Utc::now();
        let mut skipped = 0usize;
        let mut candidates: Vec<(BlockEntry, Option<DateTime<Utc>>)> = Vec::new();

        for block in blocks {
            let Some(ip) = canonical_ip(&block.ip) else {
                warn!(ip = %block.ip, "skipping candidate with invalid address");
                skipped += 1;
                continue;
            };

            // Stale before it could be synced
            if !block.permanent && block.expiration_unix < now.timestamp() {
                debug!(%ip, "skipping already-expired candidate");
                skipped += 1;
                continue;
            }

            // Policy exclusion
            if self.blacklist.contains(&ip) {
                debug!(%ip, "skipping blacklisted candidate");
                skipped += 1;
                continue;
            }

            // Already synced
            if self.ledger.contains(&ip)? {
                skipped += 1;
                continue;
            }

            let expires_at = if block.permanent {
                None
            } else {
                Utc.timestamp_opt(block.expiration_unix, 0).single()
            };

            candidates.push((BlockEntry::new(ip, block.reason), expires_at));
        }

        let entries: Vec<BlockEntry> = candidates.iter().map(|(e, _)| e.clone()).collect();
        let failed = self.client.batch_create(&entries);

        let mut synced = Vec::new();
        for (entry, expires_at) in candidates {
            if failed.contains(&entry.ip) {
                // Failure marker for diagnostics; no ledger row, so the
                // next pass picks this IP up again
                warn!(ip = %entry.ip, "remote create failed, not recorded");
                continue;
            }
            let reason = format!("sync: {}", entry.reason);
            if self.ledger.insert(&entry.ip, &reason, expires_at)? {
                synced.push(entry.ip);
            }
        }

        self.ledger.set_last_sync(Utc::now())?;
        info!(
            synced = synced.len(),
            failed = failed.len(),
            skipped,
            "sync pass complete"
        );

        Ok(SyncOutcome {
            started: true,
            synced,
            failed,
            skipped,
        })
    }
}
