//! Ledger fixtures

use fwsync_ledger::BlockLedger;
use tempfile::TempDir;

/// A file-backed ledger in a fresh temp directory
///
/// File-backed rather than in-memory so tests can open a second handle on
/// the same database, the way concurrent jobs do in production. Keep the
/// returned `TempDir` alive for the duration of the test.
pub fn temp_ledger() -> (TempDir, BlockLedger) {
    let dir = TempDir::new().expect("create temp dir");
    let ledger = BlockLedger::open(&dir.path().join("ledger.db")).expect("open ledger");
    (dir, ledger)
}
