//! Schema migrations
//!
//! Tracked through the SQLite `user_version` pragma, so no migration
//! bookkeeping table is needed.

use rusqlite_migration::{M, Migrations};

pub fn migrations() -> Migrations<'static> {
    Migrations::new(vec![M::up(
        "-- Migration 1: block ledger and sync metadata

CREATE TABLE sync_blocks (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    ip TEXT NOT NULL UNIQUE,
    reason TEXT NOT NULL DEFAULT 'sync',
    created_at TEXT NOT NULL,
    synced_at TEXT NOT NULL,
    expires_at TEXT
);

CREATE INDEX idx_sync_blocks_expires_at ON sync_blocks(expires_at);
CREATE INDEX idx_sync_blocks_created_at ON sync_blocks(created_at);

CREATE TABLE sync_meta (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);",
    )])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_are_valid() {
        assert!(migrations().validate().is_ok());
    }
}
