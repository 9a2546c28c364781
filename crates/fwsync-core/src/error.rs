//! Error types for fwsync-core

use std::path::PathBuf;

/// Result type for fwsync-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in fwsync-core operations
///
/// Remote failures are not represented here: per the engine contract they
/// surface as booleans and failed sets. These variants cover local faults
/// only (configuration, ledger I/O, lock file I/O).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Credential token or zone identifier missing from configuration
    #[error("Remote firewall credentials are not configured")]
    MissingCredentials,

    /// Configuration file not found at expected path
    #[error("Configuration not found at {path}")]
    ConfigNotFound { path: PathBuf },

    /// The block source could not be read
    #[error("Block source unavailable: {0}")]
    Source(String),

    // Transparent wrappers for underlying crate errors
    /// Remote client construction error
    #[error(transparent)]
    Client(#[from] fwsync_client::Error),

    /// Ledger error
    #[error(transparent)]
    Ledger(#[from] fwsync_ledger::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON deserialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// TOML deserialization error
    #[error(transparent)]
    TomlDe(#[from] toml::de::Error),

    /// TOML serialization error
    #[error(transparent)]
    TomlSer(#[from] toml::ser::Error),
}
