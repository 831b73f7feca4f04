//! In-memory DNS adapter for tests and offline runs.

use std::collections::{HashMap, HashSet};
use std::net::{Ipv4Addr, Ipv6Addr};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::{canonical_name, DnsResolver};
use crate::error_handling::DnsError;

#[derive(Default)]
struct Zone {
    txt: HashMap<String, Vec<String>>,
    mx: HashMap<String, Vec<(u16, String)>>,
    a: HashMap<String, Vec<Ipv4Addr>>,
    aaaa: HashMap<String, Vec<Ipv6Addr>>,
    failures: HashMap<String, DnsError>,
    panics: HashSet<String>,
}

/// Mock DNS resolver backed by a shared in-memory zone.
///
/// Unknown names resolve to an empty answer, like NXDOMAIN through the real
/// adapter. Clones share the same zone.
#[derive(Clone, Default)]
pub struct MockResolver {
    zone: Arc<Mutex<Zone>>,
}

impl MockResolver {
    pub fn new() -> Self {
        Self::default()
    }

    fn zone(&self) -> MutexGuard<'_, Zone> {
        self.zone.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn add_txt(&self, name: &str, records: &[&str]) {
        self.zone().txt.insert(
            canonical_name(name),
            records.iter().map(|r| r.to_string()).collect(),
        );
    }

    pub fn add_mx(&self, name: &str, records: &[(u16, &str)]) {
        self.zone().mx.insert(
            canonical_name(name),
            records
                .iter()
                .map(|(priority, exchange)| (*priority, exchange.to_string()))
                .collect(),
        );
    }

    pub fn add_a(&self, name: &str, addrs: &[Ipv4Addr]) {
        self.zone().a.insert(canonical_name(name), addrs.to_vec());
    }

    pub fn add_aaaa(&self, name: &str, addrs: &[Ipv6Addr]) {
        self.zone().aaaa.insert(canonical_name(name), addrs.to_vec());
    }

    /// Every lookup of `name` (any record type) fails with `error`.
    pub fn fail(&self, name: &str, error: DnsError) {
        self.zone().failures.insert(canonical_name(name), error);
    }

    /// Every lookup of `name` panics, simulating a crashed analysis task.
    pub fn panic_on(&self, name: &str) {
        self.zone().panics.insert(canonical_name(name));
    }

    fn answer<T: Clone>(
        &self,
        name: &str,
        table: fn(&Zone) -> &HashMap<String, Vec<T>>,
    ) -> Result<Vec<T>, DnsError> {
        let key = canonical_name(name);
        let zone = self.zone();
        if zone.panics.contains(&key) {
            drop(zone);
            panic!("mock resolver asked to panic on {key}");
        }
        if let Some(error) = zone.failures.get(&key) {
            return Err(error.clone());
        }
        Ok(table(&*zone).get(&key).cloned().unwrap_or_default())
    }
}

impl DnsResolver for MockResolver {
    async fn lookup_txt(&self, name: &str) -> Result<Vec<String>, DnsError> {
        self.answer(name, |zone| &zone.txt)
    }

    async fn lookup_mx(&self, name: &str) -> Result<Vec<(u16, String)>, DnsError> {
        self.answer(name, |zone| &zone.mx)
    }

    async fn lookup_a(&self, name: &str) -> Result<Vec<Ipv4Addr>, DnsError> {
        self.answer(name, |zone| &zone.a)
    }

    async fn lookup_aaaa(&self, name: &str) -> Result<Vec<Ipv6Addr>, DnsError> {
        self.answer(name, |zone| &zone.aaaa)
    }
}
