//! Domain types shared across the client seam

use serde::{Deserialize, Serialize};

/// One candidate entry for a batch create call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockEntry {
    /// Canonical textual IPv4/IPv6 address
    pub ip: String,
    /// Free-text origin of the block, stored as the rule note
    pub reason: String,
}

impl BlockEntry {
    pub fn new(ip: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            ip: ip.into(),
            reason: reason.into(),
        }
    }
}

/// A firewall access rule as reported by the remote store
///
/// The `id` is an opaque remote identifier. It is only ever held for the
/// duration of a single delete operation and never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteRule {
    pub id: String,
    pub ip: String,
    pub mode: String,
    pub notes: Option<String>,
}
