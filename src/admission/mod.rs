//! Per-address request admission.
//!
//! A fixed-window counter keyed by caller address: each address may make
//! `max_requests` requests per window, after which it is denied until the
//! window resets. The ledger is a plain object behind a mutex so it can be
//! shared across tasks and tested in isolation; a background sweep evicts
//! entries whose window has passed.

use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::config::{ADMISSION_MAX_REQUESTS, ADMISSION_WINDOW};

/// How many requests an address may make per window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdmissionPolicy {
    pub max_requests: u32,
    pub window: Duration,
}

impl Default for AdmissionPolicy {
    fn default() -> Self {
        Self {
            max_requests: ADMISSION_MAX_REQUESTS,
            window: ADMISSION_WINDOW,
        }
    }
}

/// Decision for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Allowed {
        /// Requests left in the current window.
        remaining: u32,
        reset_time: DateTime<Utc>,
    },
    Denied {
        /// When the address will be admitted again.
        reset_time: DateTime<Utc>,
    },
}

impl Admission {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Admission::Allowed { .. })
    }

    pub fn reset_time(&self) -> DateTime<Utc> {
        match self {
            Admission::Allowed { reset_time, .. } | Admission::Denied { reset_time } => *reset_time,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct WindowEntry {
    count: u32,
    reset_time: DateTime<Utc>,
}

/// Shared admission state for all callers.
pub struct AdmissionLedger {
    policy: AdmissionPolicy,
    window: TimeDelta,
    entries: Mutex<HashMap<IpAddr, WindowEntry>>,
}

impl AdmissionLedger {
    pub fn new(policy: AdmissionPolicy) -> Self {
        Self {
            policy,
            window: TimeDelta::from_std(policy.window).unwrap_or(TimeDelta::MAX),
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn policy(&self) -> AdmissionPolicy {
        self.policy
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<IpAddr, WindowEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Admits or denies one request from `addr` at the current time.
    pub fn check(&self, addr: IpAddr) -> Admission {
        self.check_at(addr, Utc::now())
    }

    /// Admits or denies one request from `addr` at `now`.
    ///
    /// The read and the update happen under a single lock acquisition.
    pub fn check_at(&self, addr: IpAddr, now: DateTime<Utc>) -> Admission {
        let max = self.policy.max_requests;
        let mut entries = self.entries();

        if let Some(entry) = entries.get_mut(&addr) {
            if now < entry.reset_time {
                if entry.count >= max {
                    log::debug!("Denied request from {addr} until {}", entry.reset_time);
                    return Admission::Denied {
                        reset_time: entry.reset_time,
                    };
                }
                entry.count += 1;
                return Admission::Allowed {
                    remaining: max - entry.count,
                    reset_time: entry.reset_time,
                };
            }
        }

        let reset_time = now
            .checked_add_signed(self.window)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        if max == 0 {
            return Admission::Denied { reset_time };
        }
        entries.insert(
            addr,
            WindowEntry {
                count: 1,
                reset_time,
            },
        );
        Admission::Allowed {
            remaining: max - 1,
            reset_time,
        }
    }

    /// Evicts entries whose window ended at or before `now`; returns how many.
    pub fn sweep_at(&self, now: DateTime<Utc>) -> usize {
        let mut entries = self.entries();
        let before = entries.len();
        entries.retain(|_, entry| entry.reset_time > now);
        before - entries.len()
    }

    pub fn sweep(&self) -> usize {
        self.sweep_at(Utc::now())
    }

    /// Number of tracked addresses.
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Spawns the background task that sweeps `ledger` every `every`.
///
/// The task runs until `shutdown` is cancelled.
pub fn spawn_sweeper(
    ledger: Arc<AdmissionLedger>,
    every: Duration,
    shutdown: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + every, every);
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let evicted = ledger.sweep();
                    if evicted > 0 {
                        log::debug!("Admission sweep evicted {evicted} expired entries");
                    }
                }
                _ = shutdown.cancelled() => {
                    log::debug!("Admission sweep shutting down");
                    break;
                }
            }
        }
    })
}
