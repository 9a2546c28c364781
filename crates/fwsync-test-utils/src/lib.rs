//! Shared test utilities for the firewall-sync workspace.
//!
//! This crate provides standardised test fixtures to eliminate duplication
//! across crate test suites. It is a dev-dependency only — never published.
//!
//! # Modules
//!
//! - [`firewall`] — scripted in-memory [`firewall::MockFirewall`]
//! - [`ledger`] — temp-file ledger fixtures

pub mod firewall;
pub mod ledger;

pub use firewall::MockFirewall;
pub use ledger::temp_ledger;
