//! Configuration surface
//!
//! One TOML file holds everything a deployment needs: the remote
//! credential/zone pair, the sync cadence, the block source, and storage
//! paths. The sync interval is constrained to an enumerated set; values
//! outside the set fall back to hourly rather than failing the load.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Error, Result};

/// Sync cadence, restricted to the supported set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncInterval {
    Five,
    Fifteen,
    #[default]
    Sixty,
}

impl SyncInterval {
    pub fn minutes(self) -> u64 {
        match self {
            SyncInterval::Five => 5,
            SyncInterval::Fifteen => 15,
            SyncInterval::Sixty => 60,
        }
    }

    pub fn as_duration(self) -> Duration {
        Duration::from_secs(self.minutes() * 60)
    }

    /// Map a raw minute count onto the supported set; anything else
    /// falls back to hourly
    pub fn from_minutes(minutes: u64) -> Self {
        match minutes {
            5 => SyncInterval::Five,
            15 => SyncInterval::Fifteen,
            _ => SyncInterval::Sixty,
        }
    }
}

impl<'de> Deserialize<'de> for SyncInterval {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let minutes = u64::deserialize(deserializer)?;
        Ok(SyncInterval::from_minutes(minutes))
    }
}

impl Serialize for SyncInterval {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_u64(self.minutes())
    }
}

/// `[cloudflare]` section: remote credential and zone
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CloudflareSection {
    #[serde(default)]
    pub api_token: String,
    #[serde(default)]
    pub zone_id: String,
}

/// `[sync]` section: cadence, source, and policy exclusions
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncSection {
    #[serde(default)]
    pub interval_minutes: SyncInterval,
    /// Path to the detection source's exported block list (JSON)
    #[serde(default)]
    pub source: Option<PathBuf>,
    /// IPs never synced to the remote store
    #[serde(default)]
    pub blacklist: Vec<String>,
}

fn default_database() -> PathBuf {
    PathBuf::from("fwsync.db")
}

/// `[storage]` section: ledger database and run lock
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSection {
    #[serde(default = "default_database")]
    pub database: PathBuf,
    /// Defaults to the database path with a `.lock` extension
    #[serde(default)]
    pub lock_file: Option<PathBuf>,
}

impl Default for StorageSection {
    fn default() -> Self {
        Self {
            database: default_database(),
            lock_file: None,
        }
    }
}

/// Deployment configuration parsed from config.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncConfig {
    #[serde(default)]
    pub cloudflare: CloudflareSection,
    #[serde(default)]
    pub sync: SyncSection,
    #[serde(default)]
    pub storage: StorageSection,
}

impl SyncConfig {
    /// Parse a configuration from TOML content
    pub fn parse(content: &str) -> Result<Self> {
        let config: SyncConfig = toml::from_str(content)?;
        Ok(config)
    }

    /// Load a configuration file from disk
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigNotFound`] if the file does not exist, or a
    /// parse error if it is not valid TOML.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }
        Self::parse(&std::fs::read_to_string(path)?)
    }

    /// The credential/zone pair, or [`Error::MissingCredentials`] if
    /// either is empty
    pub fn credentials(&self) -> Result<(&str, &str)> {
        let token = self.cloudflare.api_token.trim();
        let zone = self.cloudflare.zone_id.trim();
        if token.is_empty() || zone.is_empty() {
            return Err(Error::MissingCredentials);
        }
        Ok((token, zone))
    }

    /// The run lock path, derived from the database path unless set
    pub fn lock_path(&self) -> PathBuf {
        self.storage
            .lock_file
            .clone()
            .unwrap_or_else(|| self.storage.database.with_extension("lock"))
    }

    /// An annotated configuration template for `fwsync init`
    pub fn template() -> String {
        r#"# firewall-sync configuration

[cloudflare]
# API token with firewall access rules edit permission
api_token = ""
# Zone identifier the block rules belong to
zone_id = ""

[sync]
# Minutes between sync passes: 5, 15, or 60 (anything else means 60)
interval_minutes = 60
# JSON export of the detection source's current block list
source = "blocks.json"
# IPs never synced to the remote store
blacklist = []

[storage]
database = "fwsync.db"
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn parse_full_config() {
        let config = SyncConfig::parse(
            r#"
[cloudflare]
api_token = "tok"
zone_id = "zone"

[sync]
interval_minutes = 15
source = "blocks.json"
blacklist = ["10.0.0.1"]

[storage]
database = "/var/lib/fwsync/ledger.db"
"#,
        )
        .unwrap();

        assert_eq!(config.credentials().unwrap(), ("tok", "zone"));
        assert_eq!(config.sync.interval_minutes, SyncInterval::Fifteen);
        assert_eq!(config.sync.blacklist, vec!["10.0.0.1"]);
        assert_eq!(
            config.lock_path(),
            PathBuf::from("/var/lib/fwsync/ledger.lock")
        );
    }

    #[rstest]
    #[case(5, SyncInterval::Five)]
    #[case(15, SyncInterval::Fifteen)]
    #[case(60, SyncInterval::Sixty)]
    #[case(0, SyncInterval::Sixty)]
    #[case(30, SyncInterval::Sixty)]
    #[case(1440, SyncInterval::Sixty)]
    fn interval_outside_the_set_falls_back_to_hourly(
        #[case] minutes: u64,
        #[case] expected: SyncInterval,
    ) {
        let config =
            SyncConfig::parse(&format!("[sync]\ninterval_minutes = {minutes}\n")).unwrap();
        assert_eq!(config.sync.interval_minutes, expected);
    }

    #[test]
    fn missing_credentials_are_an_error() {
        let config = SyncConfig::parse("[cloudflare]\napi_token = \"tok\"\n").unwrap();
        assert!(matches!(
            config.credentials(),
            Err(Error::MissingCredentials)
        ));
    }

    #[test]
    fn template_parses_back() {
        let config = SyncConfig::parse(&SyncConfig::template()).unwrap();
        assert_eq!(config.sync.interval_minutes, SyncInterval::Sixty);
        assert!(config.credentials().is_err());
    }
}
