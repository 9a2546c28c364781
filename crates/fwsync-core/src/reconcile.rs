//! Drift reconciliation
//!
//! Read-only comparison of the ledger's view against the remote store's
//! actual state. Reconciliation reports drift; it never heals it.

use std::collections::BTreeSet;

use fwsync_client::FirewallApi;
use fwsync_ledger::BlockLedger;
use serde::Serialize;
use tracing::info;

use crate::error::Result;

/// Set difference between ledger and remote state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconciliationReport {
    /// Ledger believes these are synced, but the remote has no matching rule
    pub missing_in_remote: BTreeSet<String>,
    /// The remote blocks these, but the ledger has no record of them
    pub orphaned_in_remote: BTreeSet<String>,
}

impl ReconciliationReport {
    /// True when both stores agree
    pub fn is_clean(&self) -> bool {
        self.missing_in_remote.is_empty() && self.orphaned_in_remote.is_empty()
    }
}

/// Compute the drift report for the given client and ledger
///
/// # Errors
///
/// Returns an error if the ledger cannot be read. A remote listing
/// failure is not distinguishable from a short listing (the client
/// returns the partial union), so the report is only as complete as the
/// listing it was computed from.
pub fn reconcile(client: &dyn FirewallApi, ledger: &BlockLedger) -> Result<ReconciliationReport> {
    let remote_ips = client.list_blocked_ips();
    let ledger_ips = ledger.all_ips()?;

    let report = ReconciliationReport {
        missing_in_remote: ledger_ips.difference(&remote_ips).cloned().collect(),
        orphaned_in_remote: remote_ips.difference(&ledger_ips).cloned().collect(),
    };

    info!(
        missing = report.missing_in_remote.len(),
        orphaned = report.orphaned_in_remote.len(),
        "reconciliation complete"
    );
    Ok(report)
}
