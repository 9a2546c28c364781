//! Error types for fwsync-client

/// Result type for fwsync-client operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when talking to the remote firewall API
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Transport-level failure (connection, TLS, timeout)
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// The remote answered with a non-success HTTP status
    #[error("Remote API returned status {status}")]
    Status { status: u16 },

    /// The remote answered 2xx but the payload did not match the
    /// documented shape
    #[error("Malformed remote response: {0}")]
    Malformed(String),
}
