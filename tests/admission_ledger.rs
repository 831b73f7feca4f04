//! Tests for the per-address admission ledger through the public API.

use email_posture::{init_admission_ledger, Admission, AdmissionLedger, AdmissionPolicy};
use std::net::IpAddr;
use std::sync::Arc;

#[test]
fn test_ten_requests_then_denial_with_reset_time() {
    let ledger = AdmissionLedger::new(AdmissionPolicy::default());
    let caller: IpAddr = "203.0.113.77".parse().unwrap();
    let now = chrono::Utc::now();

    for _ in 0..10 {
        assert!(ledger.check_at(caller, now).is_allowed());
    }
    match ledger.check_at(caller, now) {
        Admission::Denied { reset_time } => {
            assert_eq!(reset_time, now + chrono::TimeDelta::minutes(15));
        }
        other => panic!("expected denial, got {other:?}"),
    }
    assert!(ledger
        .check_at(caller, now + chrono::TimeDelta::minutes(15))
        .is_allowed());
}

#[tokio::test]
async fn test_shared_ledger_across_tasks() {
    let (ledger, shutdown) = init_admission_ledger(AdmissionPolicy::default());
    let caller: IpAddr = "2001:db8::77".parse().unwrap();

    let tasks: Vec<_> = (0..20)
        .map(|_| {
            let ledger = Arc::clone(&ledger);
            tokio::spawn(async move { ledger.check(caller).is_allowed() })
        })
        .collect();

    let mut admitted = 0;
    for task in tasks {
        if task.await.unwrap() {
            admitted += 1;
        }
    }
    assert_eq!(admitted, 10);
    shutdown.cancel();
}
