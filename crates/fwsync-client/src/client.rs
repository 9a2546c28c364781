//! High-level firewall operations
//!
//! [`FirewallClient`] wraps a [`RulesTransport`] and implements the
//! operations the engines consume: validate, single create, two-phase
//! delete, chunked batch create, and bounded pagination. Per the engine
//! contract, remote failures surface as `false` / failed sets and are
//! logged with context; they never propagate as errors.

use std::collections::BTreeSet;

use tracing::{debug, warn};

use crate::transport::RulesTransport;
use crate::types::BlockEntry;

/// Note attached to rules created through single-rule calls
pub const RULE_NOTE: &str = "firewall-sync block";

/// Maximum number of rules submitted in one batch create call
pub const MAX_BATCH_RULES: usize = 1000;

/// Page size used when listing blocked IPs
pub const LIST_PAGE_SIZE: u32 = 50;

/// Operations the sync, cleanup, and reconciliation engines need from the
/// remote firewall store
pub trait FirewallApi {
    /// Confirm the credential/zone pair is usable
    fn validate(&self) -> bool;

    /// Create a single block rule; true only on confirmed success
    fn create_block(&self, ip: &str) -> bool;

    /// Delete the block rule for `ip`, looking up its identifier
    /// just-in-time; false when no matching rule exists or a call fails
    fn delete_block(&self, ip: &str) -> bool;

    /// Create many block rules; returns the set of IPs that failed
    fn batch_create(&self, entries: &[BlockEntry]) -> BTreeSet<String>;

    /// The de-duplicated union of every blocked IP the remote reports
    fn list_blocked_ips(&self) -> BTreeSet<String>;
}

/// Stateless adapter over a wire transport
pub struct FirewallClient<T: RulesTransport> {
    transport: T,
}

impl<T: RulesTransport> FirewallClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }
}

impl<T: RulesTransport> FirewallApi for FirewallClient<T> {
    fn validate(&self) -> bool {
        match self.transport.fetch_zone() {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "credential validation failed");
                false
            }
        }
    }

    fn create_block(&self, ip: &str) -> bool {
        match self.transport.create_rule(ip, RULE_NOTE) {
            Ok(()) => true,
            Err(e) => {
                warn!(ip, error = %e, "block create failed");
                false
            }
        }
    }

    fn delete_block(&self, ip: &str) -> bool {
        let rules = match self.transport.find_block_rules(ip) {
            Ok(rules) => rules,
            Err(e) => {
                warn!(ip, error = %e, "rule lookup failed");
                return false;
            }
        };

        // Cannot delete what does not exist
        let Some(rule) = rules.into_iter().find(|rule| rule.ip == ip) else {
            debug!(ip, "no matching remote rule to delete");
            return false;
        };

        match self.transport.delete_rule(&rule.id) {
            Ok(()) => true,
            Err(e) => {
                warn!(ip, error = %e, "rule delete failed");
                false
            }
        }
    }

    fn batch_create(&self, entries: &[BlockEntry]) -> BTreeSet<String> {
        let mut failed = BTreeSet::new();

        for chunk in entries.chunks(MAX_BATCH_RULES) {
            match self.transport.create_rules(chunk) {
                Ok(outcomes) if outcomes.len() == chunk.len() => {
                    for (entry, outcome) in chunk.iter().zip(outcomes) {
                        if let Some(message) = outcome.error {
                            warn!(ip = %entry.ip, message, "rule rejected in batch");
                            failed.insert(entry.ip.clone());
                        }
                    }
                }
                Ok(outcomes) => {
                    // Result count no longer maps to submissions; treat the
                    // whole chunk as failed rather than guess alignment
                    warn!(
                        submitted = chunk.len(),
                        returned = outcomes.len(),
                        "batch result count mismatch"
                    );
                    failed.extend(chunk.iter().map(|entry| entry.ip.clone()));
                }
                Err(e) => {
                    warn!(size = chunk.len(), error = %e, "batch chunk failed");
                    failed.extend(chunk.iter().map(|entry| entry.ip.clone()));
                }
            }
        }

        failed
    }

    fn list_blocked_ips(&self) -> BTreeSet<String> {
        let mut ips = BTreeSet::new();
        let mut page = 1;

        loop {
            let listing = match self.transport.list_rules(page, LIST_PAGE_SIZE) {
                Ok(listing) => listing,
                Err(e) => {
                    // Partial result: return what was collected so far
                    warn!(page, error = %e, "listing page failed, stopping pagination");
                    break;
                }
            };

            ips.extend(listing.rules.into_iter().map(|rule| rule.ip));

            if page >= listing.total_pages {
                break;
            }
            page += 1;
        }

        ips
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::transport::{RuleOutcome, RulesPage};
    use crate::types::RemoteRule;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;

    /// Scripted in-memory transport that records every call
    #[derive(Default)]
    struct FakeTransport {
        batch_sizes: RefCell<Vec<usize>>,
        // IPs the batch endpoint rejects per-rule
        reject: BTreeSet<String>,
        // 1-based chunk indices that fail wholesale
        failing_chunks: BTreeSet<usize>,
        pages: Vec<RulesPage>,
        pages_requested: RefCell<Vec<u32>>,
        find_result: Vec<RemoteRule>,
        deleted_ids: RefCell<Vec<String>>,
    }

    fn rule(id: &str, ip: &str) -> RemoteRule {
        RemoteRule {
            id: id.to_string(),
            ip: ip.to_string(),
            mode: "block".to_string(),
            notes: None,
        }
    }

    impl RulesTransport for FakeTransport {
        fn fetch_zone(&self) -> crate::Result<()> {
            Ok(())
        }

        fn create_rule(&self, _ip: &str, _notes: &str) -> crate::Result<()> {
            Ok(())
        }

        fn create_rules(&self, entries: &[BlockEntry]) -> crate::Result<Vec<RuleOutcome>> {
            self.batch_sizes.borrow_mut().push(entries.len());
            let chunk_index = self.batch_sizes.borrow().len();
            if self.failing_chunks.contains(&chunk_index) {
                return Err(Error::Status { status: 502 });
            }
            Ok(entries
                .iter()
                .map(|entry| {
                    if self.reject.contains(&entry.ip) {
                        RuleOutcome::failed("firewallaccessrules.api.duplicate_of_existing")
                    } else {
                        RuleOutcome::ok()
                    }
                })
                .collect())
        }

        fn find_block_rules(&self, _ip: &str) -> crate::Result<Vec<RemoteRule>> {
            Ok(self.find_result.clone())
        }

        fn list_rules(&self, page: u32, _per_page: u32) -> crate::Result<RulesPage> {
            self.pages_requested.borrow_mut().push(page);
            self.pages
                .get((page - 1) as usize)
                .cloned()
                .ok_or(Error::Status { status: 500 })
        }

        fn delete_rule(&self, id: &str) -> crate::Result<()> {
            self.deleted_ids.borrow_mut().push(id.to_string());
            Ok(())
        }
    }

    fn entries(n: usize) -> Vec<BlockEntry> {
        (0..n)
            .map(|i| BlockEntry::new(format!("10.0.{}.{}", i / 256, i % 256), "test"))
            .collect()
    }

    #[test]
    fn batch_create_chunks_at_one_thousand() {
        let client = FirewallClient::new(FakeTransport::default());

        let failed = client.batch_create(&entries(2500));

        assert_eq!(failed.len(), 0);
        assert_eq!(*client.transport.batch_sizes.borrow(), vec![1000, 1000, 500]);
    }

    #[test]
    fn batch_create_marks_rejected_rules_failed() {
        let transport = FakeTransport {
            reject: BTreeSet::from(["10.0.0.7".to_string()]),
            ..Default::default()
        };
        let client = FirewallClient::new(transport);

        let failed = client.batch_create(&entries(10));

        assert_eq!(failed, BTreeSet::from(["10.0.0.7".to_string()]));
    }

    #[test]
    fn batch_create_continues_past_a_failed_chunk() {
        let transport = FakeTransport {
            failing_chunks: BTreeSet::from([1]),
            ..Default::default()
        };
        let client = FirewallClient::new(transport);

        let failed = client.batch_create(&entries(1500));

        // First chunk of 1000 failed wholesale, second chunk went through
        assert_eq!(failed.len(), 1000);
        assert_eq!(*client.transport.batch_sizes.borrow(), vec![1000, 500]);
    }

    #[test]
    fn list_blocked_ips_requests_exactly_total_pages() {
        let page = |ips: &[&str]| RulesPage {
            rules: ips
                .iter()
                .enumerate()
                .map(|(i, ip)| rule(&format!("r{i}"), ip))
                .collect(),
            total_pages: 4,
        };
        let transport = FakeTransport {
            pages: vec![
                page(&["1.1.1.1", "2.2.2.2"]),
                page(&["3.3.3.3"]),
                page(&["2.2.2.2"]),
                page(&["4.4.4.4"]),
            ],
            ..Default::default()
        };
        let client = FirewallClient::new(transport);

        let ips = client.list_blocked_ips();

        assert_eq!(*client.transport.pages_requested.borrow(), vec![1, 2, 3, 4]);
        assert_eq!(
            ips,
            BTreeSet::from([
                "1.1.1.1".to_string(),
                "2.2.2.2".to_string(),
                "3.3.3.3".to_string(),
                "4.4.4.4".to_string(),
            ])
        );
    }

    #[test]
    fn list_blocked_ips_returns_partial_union_on_page_failure() {
        // total_pages says 3 but only one page is servable
        let transport = FakeTransport {
            pages: vec![RulesPage {
                rules: vec![rule("r1", "1.1.1.1")],
                total_pages: 3,
            }],
            ..Default::default()
        };
        let client = FirewallClient::new(transport);

        let ips = client.list_blocked_ips();

        assert_eq!(*client.transport.pages_requested.borrow(), vec![1, 2]);
        assert_eq!(ips, BTreeSet::from(["1.1.1.1".to_string()]));
    }

    #[test]
    fn delete_block_deletes_by_looked_up_id() {
        let transport = FakeTransport {
            find_result: vec![rule("abc123", "9.9.9.9")],
            ..Default::default()
        };
        let client = FirewallClient::new(transport);

        assert!(client.delete_block("9.9.9.9"));
        assert_eq!(*client.transport.deleted_ids.borrow(), vec!["abc123"]);
    }

    #[test]
    fn delete_block_is_false_when_no_rule_matches() {
        let client = FirewallClient::new(FakeTransport::default());

        assert!(!client.delete_block("9.9.9.9"));
        assert!(client.transport.deleted_ids.borrow().is_empty());
    }
}
