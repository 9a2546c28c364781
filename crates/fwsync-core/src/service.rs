//! Config-to-engines assembly
//!
//! [`SyncService`] is the one place a deployment configuration is turned
//! into wired engines, and the one place the missing-credential check
//! happens: constructing a service without a token/zone pair fails before
//! any side effect.

use fwsync_client::{FirewallApi, FirewallClient, HttpTransport};
use fwsync_ledger::BlockLedger;
use tracing::warn;

use crate::cleanup::{CleanupEngine, CleanupOutcome};
use crate::config::SyncConfig;
use crate::error::Result;
use crate::lock::RunLock;
use crate::reconcile::{ReconciliationReport, reconcile};
use crate::source::JsonFileSource;
use crate::sync::{SyncEngine, SyncOutcome};

/// Wired engines for one credential/zone pairing
pub struct SyncService {
    config: SyncConfig,
    client: FirewallClient<HttpTransport>,
}

impl SyncService {
    /// Build a service from a deployment configuration
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::MissingCredentials`] when the token or
    /// zone is absent, before any remote or ledger access.
    pub fn from_config(config: SyncConfig) -> Result<Self> {
        let (token, zone) = config.credentials()?;
        let client = FirewallClient::new(HttpTransport::new(token, zone)?);
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn client(&self) -> &dyn FirewallApi {
        &self.client
    }

    /// Open a fresh handle on the ledger database
    pub fn open_ledger(&self) -> Result<BlockLedger> {
        Ok(BlockLedger::open(&self.config.storage.database)?)
    }

    /// Confirm the configured credential/zone pair against the remote
    pub fn validate(&self) -> bool {
        self.client.validate()
    }

    /// Run one sync pass
    pub fn run_sync(&self) -> Result<SyncOutcome> {
        let Some(source_path) = &self.config.sync.source else {
            warn!("no block source configured, declining sync pass");
            return Ok(SyncOutcome::default());
        };

        let ledger = self.open_ledger()?;
        let source = JsonFileSource::new(source_path);
        SyncEngine::new(
            &self.client,
            &ledger,
            &source,
            RunLock::new(self.config.lock_path()),
        )
        .with_blacklist(&self.config.sync.blacklist)
        .run()
    }

    /// Run one cleanup sweep
    pub fn run_cleanup(&self) -> Result<CleanupOutcome> {
        let ledger = self.open_ledger()?;
        CleanupEngine::new(&self.client, &ledger).run()
    }

    /// Compute the current drift report
    pub fn reconcile(&self) -> Result<ReconciliationReport> {
        let ledger = self.open_ledger()?;
        reconcile(&self.client, &ledger)
    }
}
