//! Ledger row type

use chrono::{DateTime, Utc};

/// One synced block: "this IP is currently believed to be blocked both
/// locally and remotely"
///
/// At most one live record exists per `ip`; the ledger enforces this with
/// a unique index, which doubles as the guard against duplicate inserts
/// from concurrent passes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockRecord {
    /// Canonical textual IPv4/IPv6 address, unique key
    pub ip: String,
    /// Free-text source of the block
    pub reason: String,
    pub created_at: DateTime<Utc>,
    pub synced_at: DateTime<Utc>,
    /// `None` means the block is permanent
    pub expires_at: Option<DateTime<Utc>>,
}
