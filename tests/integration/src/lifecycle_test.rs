//! End-to-end lifecycle test
//!
//! Exercises the complete flow against a scripted remote: source export ->
//! sync pass -> expiry -> cleanup sweep -> reconciliation.

use std::collections::BTreeSet;

use chrono::{Duration, Utc};
use fwsync_client::FirewallApi;
use fwsync_core::{
    CleanupEngine, JsonFileSource, RunLock, SyncEngine, reconcile,
};
use fwsync_ledger::BlockLedger;
use fwsync_test_utils::MockFirewall;
use tempfile::TempDir;

struct Fixture {
    dir: TempDir,
    firewall: MockFirewall,
}

impl Fixture {
    fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
            firewall: MockFirewall::new(),
        }
    }

    fn ledger(&self) -> BlockLedger {
        BlockLedger::open(&self.dir.path().join("ledger.db")).unwrap()
    }

    fn lock(&self) -> RunLock {
        RunLock::new(self.dir.path().join("sync.lock"))
    }

    fn write_source(&self, json: &str) -> JsonFileSource {
        let path = self.dir.path().join("blocks.json");
        std::fs::write(&path, json).unwrap();
        JsonFileSource::new(path)
    }
}

#[test]
fn sync_then_cleanup_then_reconcile() {
    let fixture = Fixture::new();
    let ledger = fixture.ledger();
    let soon = (Utc::now() + Duration::hours(1)).timestamp();
    let source = fixture.write_source(&format!(
        r#"[
            {{"ip": "198.51.100.1", "reason": "brute force", "permanent": true}},
            {{"ip": "198.51.100.2", "reason": "rate limit", "expirationUnix": {soon}, "permanent": false}}
        ]"#
    ));

    // First pass syncs both candidates
    let engine = SyncEngine::new(&fixture.firewall, &ledger, &source, fixture.lock());
    let outcome = engine.run().unwrap();
    assert!(outcome.started);
    assert_eq!(outcome.synced.len(), 2);
    assert_eq!(
        fixture.firewall.remote_ips(),
        BTreeSet::from(["198.51.100.1".to_string(), "198.51.100.2".to_string()])
    );

    // Unchanged source: second pass is a no-op
    let again = engine.run().unwrap();
    assert!(again.started);
    assert!(again.synced.is_empty());
    assert_eq!(ledger.count().unwrap(), 2);

    // Both stores agree
    assert!(reconcile(&fixture.firewall, &ledger).unwrap().is_clean());

    // Force the temporary block's expiry into the past and sweep
    ledger.remove("198.51.100.2").unwrap();
    ledger
        .insert(
            "198.51.100.2",
            "sync: rate limit",
            Some(Utc::now() - Duration::seconds(1)),
        )
        .unwrap();
    let cleanup = CleanupEngine::new(&fixture.firewall, &ledger).run().unwrap();
    assert_eq!(cleanup.deleted, vec!["198.51.100.2"]);

    // Only the permanent block remains, everywhere
    assert_eq!(ledger.count().unwrap(), 1);
    assert_eq!(
        fixture.firewall.remote_ips(),
        BTreeSet::from(["198.51.100.1".to_string()])
    );
    assert!(reconcile(&fixture.firewall, &ledger).unwrap().is_clean());
}

#[test]
fn drift_is_reported_but_never_healed() {
    let fixture = Fixture::new();
    let ledger = fixture.ledger();
    let source = fixture.write_source(
        r#"[{"ip": "198.51.100.1", "reason": "probe", "permanent": true}]"#,
    );

    SyncEngine::new(&fixture.firewall, &ledger, &source, fixture.lock())
        .run()
        .unwrap();

    // Simulate an operator deleting the rule out-of-band and adding one
    // the ledger knows nothing about
    fixture.firewall.delete_block("198.51.100.1");
    fixture.firewall.create_block("203.0.113.9");

    let report = reconcile(&fixture.firewall, &ledger).unwrap();
    assert_eq!(
        report.missing_in_remote,
        BTreeSet::from(["198.51.100.1".to_string()])
    );
    assert_eq!(
        report.orphaned_in_remote,
        BTreeSet::from(["203.0.113.9".to_string()])
    );

    // Reconciliation changed nothing; a later pass still will not re-sync
    // the missing IP because its ledger row survives
    assert!(ledger.contains("198.51.100.1").unwrap());
    assert_eq!(
        fixture.firewall.remote_ips(),
        BTreeSet::from(["203.0.113.9".to_string()])
    );
}

#[test]
fn concurrent_jobs_share_the_ledger_through_separate_handles() {
    let fixture = Fixture::new();
    let sync_ledger = fixture.ledger();
    let cleanup_ledger = fixture.ledger();
    let source = fixture.write_source(
        r#"[{"ip": "198.51.100.1", "reason": "probe", "permanent": true}]"#,
    );

    SyncEngine::new(&fixture.firewall, &sync_ledger, &source, fixture.lock())
        .run()
        .unwrap();

    // The cleanup handle sees the row the sync handle wrote; nothing is
    // expired, so the sweep is a no-op
    let cleanup = CleanupEngine::new(&fixture.firewall, &cleanup_ledger)
        .run()
        .unwrap();
    assert!(cleanup.deleted.is_empty());
    assert!(cleanup_ledger.contains("198.51.100.1").unwrap());
}
