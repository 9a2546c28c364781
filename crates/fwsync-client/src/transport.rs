//! Wire-level transport seam
//!
//! [`RulesTransport`] maps one method to one remote endpoint and nothing
//! more. Chunking, pagination, and the lookup-then-delete dance all live
//! above this seam in [`crate::FirewallClient`], so they can be exercised
//! against an in-memory transport in tests.

use crate::error::Result;
use crate::types::{BlockEntry, RemoteRule};

/// One page of a mode=block rules listing
#[derive(Debug, Clone)]
pub struct RulesPage {
    pub rules: Vec<RemoteRule>,
    /// Total page count reported by the remote for this query
    pub total_pages: u32,
}

/// Per-rule outcome of a batch create call, in submission order
#[derive(Debug, Clone)]
pub struct RuleOutcome {
    /// `None` means the rule was created; `Some` carries the remote's
    /// error message for that rule
    pub error: Option<String>,
}

impl RuleOutcome {
    pub fn ok() -> Self {
        Self { error: None }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
        }
    }
}

/// Raw endpoint operations against the remote firewall API
pub trait RulesTransport {
    /// `GET /zones/{zone}` — succeeds only on HTTP 200
    fn fetch_zone(&self) -> Result<()>;

    /// `POST .../rules` — create a single block rule
    fn create_rule(&self, ip: &str, notes: &str) -> Result<()>;

    /// `POST .../rules` with `{rules: [...]}` — create up to one chunk of
    /// rules; returns one outcome per submitted entry, in submission order
    fn create_rules(&self, entries: &[BlockEntry]) -> Result<Vec<RuleOutcome>>;

    /// `GET .../rules?mode=block&configuration.value={ip}` — exact-match
    /// lookup used by delete
    fn find_block_rules(&self, ip: &str) -> Result<Vec<RemoteRule>>;

    /// `GET .../rules?mode=block&page=N&per_page=M` — one listing page
    fn list_rules(&self, page: u32, per_page: u32) -> Result<RulesPage>;

    /// `DELETE .../rules/{id}` — delete by remote identifier
    fn delete_rule(&self, id: &str) -> Result<()>;
}
