//! In-memory remote firewall double
//!
//! Implements [`FirewallApi`] over a mutable IP set, with per-IP failure
//! injection and call recording, so engine tests can assert both outcomes
//! and the exact remote traffic a pass produced.

use std::collections::BTreeSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use fwsync_client::{BlockEntry, FirewallApi, MAX_BATCH_RULES};

/// Scripted stand-in for the remote firewall store
#[derive(Default)]
pub struct MockFirewall {
    remote: Mutex<BTreeSet<String>>,
    fail_creates: Mutex<BTreeSet<String>>,
    fail_deletes: Mutex<BTreeSet<String>>,
    invalid: AtomicBool,
    create_calls: AtomicUsize,
    delete_calls: AtomicUsize,
    batch_sizes: Mutex<Vec<usize>>,
}

impl MockFirewall {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with the given IPs already blocked remotely
    pub fn with_remote_ips<I, S>(ips: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mock = Self::default();
        mock.remote
            .lock()
            .unwrap()
            .extend(ips.into_iter().map(Into::into));
        mock
    }

    /// Make `validate` report an unusable credential/zone pair
    pub fn set_invalid(&self) {
        self.invalid.store(true, Ordering::SeqCst);
    }

    /// Reject this IP in every create (single and batched)
    pub fn fail_create(&self, ip: &str) {
        self.fail_creates.lock().unwrap().insert(ip.to_string());
    }

    /// Fail every delete attempt for this IP
    pub fn fail_delete(&self, ip: &str) {
        self.fail_deletes.lock().unwrap().insert(ip.to_string());
    }

    /// IPs currently blocked on the fake remote
    pub fn remote_ips(&self) -> BTreeSet<String> {
        self.remote.lock().unwrap().clone()
    }

    /// Sizes of every batch create call, in order
    pub fn batch_sizes(&self) -> Vec<usize> {
        self.batch_sizes.lock().unwrap().clone()
    }

    /// Single-rule create calls issued so far
    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    /// Delete attempts issued so far
    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }

    /// Total IPs submitted across all batch create calls
    pub fn batched_total(&self) -> usize {
        self.batch_sizes.lock().unwrap().iter().sum()
    }
}

impl FirewallApi for MockFirewall {
    fn validate(&self) -> bool {
        !self.invalid.load(Ordering::SeqCst)
    }

    fn create_block(&self, ip: &str) -> bool {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_creates.lock().unwrap().contains(ip) {
            return false;
        }
        self.remote.lock().unwrap().insert(ip.to_string());
        true
    }

    fn delete_block(&self, ip: &str) -> bool {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_deletes.lock().unwrap().contains(ip) {
            return false;
        }
        // Cannot delete what does not exist
        self.remote.lock().unwrap().remove(ip)
    }

    fn batch_create(&self, entries: &[BlockEntry]) -> BTreeSet<String> {
        let mut failed = BTreeSet::new();
        for chunk in entries.chunks(MAX_BATCH_RULES) {
            self.batch_sizes.lock().unwrap().push(chunk.len());
            for entry in chunk {
                if self.fail_creates.lock().unwrap().contains(&entry.ip) {
                    failed.insert(entry.ip.clone());
                } else {
                    self.remote.lock().unwrap().insert(entry.ip.clone());
                }
            }
        }
        failed
    }

    fn list_blocked_ips(&self) -> BTreeSet<String> {
        self.remote_ips()
    }
}
