//! Application initialization and resource setup.
//!
//! This module provides functions to initialize the shared resources:
//! - Logger
//! - DNS resolver
//! - Admission ledger (with its background sweep)

mod logger;
mod resolver;

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::admission::{spawn_sweeper, AdmissionLedger, AdmissionPolicy};
use crate::config::ADMISSION_SWEEP_INTERVAL;

// Re-export public API
pub use logger::init_logger_with;
pub use resolver::init_resolver;

/// Initializes a shared admission ledger and starts its background sweep.
///
/// Must be called from within a Tokio runtime. Cancel the returned token to
/// stop the sweep; the ledger itself keeps working without it.
pub fn init_admission_ledger(policy: AdmissionPolicy) -> (Arc<AdmissionLedger>, CancellationToken) {
    let ledger = Arc::new(AdmissionLedger::new(policy));
    let shutdown = CancellationToken::new();
    spawn_sweeper(Arc::clone(&ledger), ADMISSION_SWEEP_INTERVAL, shutdown.clone());
    (ledger, shutdown)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::IpAddr;

    #[tokio::test]
    async fn test_init_admission_ledger_admits_and_shuts_down() {
        let (ledger, shutdown) = init_admission_ledger(AdmissionPolicy::default());
        let addr: IpAddr = "192.0.2.1".parse().unwrap();
        assert!(ledger.check(addr).is_allowed());
        shutdown.cancel();
        // Still usable after the sweep stops
        assert!(ledger.check(addr).is_allowed());
    }
}
