//! Persistent synced-block ledger for firewall-sync
//!
//! The ledger is the local source of truth for which IPs are currently
//! believed synced to the remote firewall store. It is a single SQLite
//! table with a unique index on `ip` plus a small key/value table for
//! sync metadata (last completed pass).
//!
//! rusqlite is synchronous; every job opens its own [`BlockLedger`] on
//! the same database file and WAL mode handles cross-job access. The
//! unique index on `ip` is the sole guard against duplicate inserts from
//! passes running concurrently.

mod error;
mod migrations;
mod record;

pub use error::{Error, Result};
pub use record::BlockRecord;

use std::collections::BTreeSet;
use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use tracing::debug;

const LAST_SYNC_KEY: &str = "last_sync_at";

/// Handle on the ledger database
pub struct BlockLedger {
    conn: Connection,
}

impl BlockLedger {
    /// Open (or create) the ledger at `path`, enable WAL mode, and bring
    /// the schema up to date
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory cannot be created, the
    /// database cannot be opened, or a migration fails.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|source| Error::Directory {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let mut conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        migrations::migrations().to_latest(&mut conn)?;

        debug!(path = %path.display(), "ledger opened");
        Ok(Self { conn })
    }

    /// Open an in-memory ledger (tests)
    pub fn open_in_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        migrations::migrations().to_latest(&mut conn)?;
        Ok(Self { conn })
    }

    /// Record a synced block
    ///
    /// Returns `true` if a row was written, `false` if a live record for
    /// this IP already existed (another pass won the insert).
    pub fn insert(
        &self,
        ip: &str,
        reason: &str,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<bool> {
        let now = Utc::now();
        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO sync_blocks (ip, reason, created_at, synced_at, expires_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![ip, reason, now, now, expires_at],
        )?;
        Ok(inserted > 0)
    }

    /// Whether a live record exists for `ip`
    pub fn contains(&self, ip: &str) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM sync_blocks WHERE ip = ?1",
            params![ip],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Delete the record for `ip`; returns `true` if a row was removed
    pub fn remove(&self, ip: &str) -> Result<bool> {
        let removed = self
            .conn
            .execute("DELETE FROM sync_blocks WHERE ip = ?1", params![ip])?;
        Ok(removed > 0)
    }

    /// Number of live records
    pub fn count(&self) -> Result<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM sync_blocks", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    /// Every ledger IP, de-duplicated
    pub fn all_ips(&self) -> Result<BTreeSet<String>> {
        let mut stmt = self.conn.prepare("SELECT ip FROM sync_blocks")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        rows.collect::<rusqlite::Result<BTreeSet<_>>>()
            .map_err(Error::from)
    }

    /// Paged listing, newest first
    pub fn recent(&self, limit: u32, offset: u32) -> Result<Vec<BlockRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT ip, reason, created_at, synced_at, expires_at FROM sync_blocks
             ORDER BY created_at DESC, id DESC LIMIT ?1 OFFSET ?2",
        )?;
        let rows = stmt.query_map(params![limit, offset], row_to_record)?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Error::from)
    }

    /// Records whose expiry has passed as of `now` (inclusive boundary:
    /// a record expiring exactly at `now` is returned), oldest expiry
    /// first, at most `limit` rows
    pub fn expired_batch(&self, now: DateTime<Utc>, limit: u32) -> Result<Vec<BlockRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT ip, reason, created_at, synced_at, expires_at FROM sync_blocks
             WHERE expires_at IS NOT NULL AND expires_at <= ?1
             ORDER BY expires_at ASC, id ASC LIMIT ?2",
        )?;
        let rows = stmt.query_map(params![now, limit], row_to_record)?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Error::from)
    }

    /// Store the completion time of the latest sync pass
    pub fn set_last_sync(&self, at: DateTime<Utc>) -> Result<()> {
        self.conn.execute(
            "INSERT INTO sync_meta (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![LAST_SYNC_KEY, at],
        )?;
        Ok(())
    }

    /// Completion time of the latest sync pass, if any has run
    pub fn last_sync(&self) -> Result<Option<DateTime<Utc>>> {
        self.conn
            .query_row(
                "SELECT value FROM sync_meta WHERE key = ?1",
                params![LAST_SYNC_KEY],
                |row| row.get(0),
            )
            .optional()
            .map_err(Error::from)
    }
}

fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<BlockRecord> {
    Ok(BlockRecord {
        ip: row.get(0)?,
        reason: row.get(1)?,
        created_at: row.get(2)?,
        synced_at: row.get(3)?,
        expires_at: row.get(4)?,
    })
}
