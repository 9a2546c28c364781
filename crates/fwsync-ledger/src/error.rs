//! Error types for fwsync-ledger

use std::path::PathBuf;

/// Result type for fwsync-ledger operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in ledger operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The database directory could not be created
    #[error("Cannot create ledger directory {path}")]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Underlying SQLite error
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    /// Schema migration failure
    #[error(transparent)]
    Migration(#[from] rusqlite_migration::Error),
}
