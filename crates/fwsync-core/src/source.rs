//! Detection-source input
//!
//! The upstream detection source is an external collaborator; only its
//! output contract is consumed here: a full, unpaginated list of block
//! objects. [`JsonFileSource`] reads that contract from the JSON export
//! the source writes.

use std::path::PathBuf;

use serde::Deserialize;

use crate::error::{Error, Result};

/// One block as reported by the detection source
#[derive(Debug, Clone, Deserialize)]
pub struct SourceBlock {
    pub ip: String,
    #[serde(default)]
    pub reason: String,
    /// Epoch seconds; meaningful only when `permanent` is false
    #[serde(rename = "expirationUnix", default)]
    pub expiration_unix: i64,
    #[serde(default)]
    pub permanent: bool,
}

/// Provider of the current full block set
pub trait BlockSource {
    /// Fetch every currently active block
    ///
    /// # Errors
    ///
    /// Returns [`Error::Source`] when the source cannot be read; the sync
    /// pass then declines to start.
    fn fetch_blocks(&self) -> Result<Vec<SourceBlock>>;
}

/// Block source backed by a JSON file (an array of block objects)
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl BlockSource for JsonFileSource {
    fn fetch_blocks(&self) -> Result<Vec<SourceBlock>> {
        let content = std::fs::read_to_string(&self.path)
            .map_err(|e| Error::Source(format!("{}: {e}", self.path.display())))?;
        serde_json::from_str(&content)
            .map_err(|e| Error::Source(format!("{}: {e}", self.path.display())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn reads_the_source_contract() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blocks.json");
        std::fs::write(
            &path,
            r#"[
                {"ip": "1.2.3.4", "reason": "brute force", "expirationUnix": 1767225600, "permanent": false},
                {"ip": "5.6.7.8", "reason": "manual", "permanent": true}
            ]"#,
        )
        .unwrap();

        let blocks = JsonFileSource::new(&path).fetch_blocks().unwrap();

        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].ip, "1.2.3.4");
        assert_eq!(blocks[0].expiration_unix, 1_767_225_600);
        assert!(!blocks[0].permanent);
        assert!(blocks[1].permanent);
        assert_eq!(blocks[1].expiration_unix, 0);
    }

    #[test]
    fn missing_file_is_a_source_error() {
        let source = JsonFileSource::new("/nonexistent/blocks.json");
        assert!(matches!(source.fetch_blocks(), Err(Error::Source(_))));
    }
}
