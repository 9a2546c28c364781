//! Remote firewall API client for firewall-sync
//!
//! This crate is the stateless adapter between the sync engines and the
//! remote firewall rule store. It is split at a wire seam:
//!
//! - [`RulesTransport`] — one method per remote endpoint, implemented over
//!   HTTPS by [`HttpTransport`]
//! - [`FirewallClient`] — chunking, bounded pagination, and the two-phase
//!   delete, implemented on top of any transport and exposed to the
//!   engines through the [`FirewallApi`] trait
//!
//! Remote failures never escape as errors from [`FirewallApi`]: every
//! operation resolves to a boolean or a failed-set, logged with context.

mod client;
mod error;
mod http;
mod transport;
mod types;

pub use client::{FirewallApi, FirewallClient, LIST_PAGE_SIZE, MAX_BATCH_RULES, RULE_NOTE};
pub use error::{Error, Result};
pub use http::HttpTransport;
pub use transport::{RuleOutcome, RulesPage, RulesTransport};
pub use types::{BlockEntry, RemoteRule};
