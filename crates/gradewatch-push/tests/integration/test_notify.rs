//! Integration tests for the notifier driving the real push client
//!
//! Verifies that NotifyChangesUseCase turns endpoint answers into the
//! expected DispatchOutcome without propagating errors.

use std::sync::Arc;

use gradewatch_core::domain::{compare, Observation};
use gradewatch_core::usecases::{DispatchOutcome, NotifyChangesUseCase, SkipReason};
use wiremock::ResponseTemplate;

use crate::common;

fn grade_added_report() -> gradewatch_core::domain::ChangeReport {
    let before = Observation::new("3.5", "10").with_grade("Math", "A");
    let after = before.clone().with_grade("Physics", "B");
    compare(&after, Some(&before))
}

#[tokio::test]
async fn test_changed_report_is_delivered() {
    let (server, client) = common::setup_accepting_mock().await;
    let notifier = NotifyChangesUseCase::new(Arc::new(client));

    let outcome = notifier.notify(&grade_added_report(), Some("test-token")).await;
    assert_eq!(outcome, DispatchOutcome::Sent);

    let received = server.received_requests().await.expect("request recording enabled");
    assert_eq!(received.len(), 1);
    let body: serde_json::Value = serde_json::from_slice(&received[0].body).unwrap();
    assert_eq!(body["content"], "New grade: Physics B<br><br>GPA: 3.5 | Rank: 10");
}

#[tokio::test]
async fn test_first_run_makes_no_request() {
    let (server, client) = common::setup_accepting_mock().await;
    let notifier = NotifyChangesUseCase::new(Arc::new(client));

    let report = compare(&Observation::new("3.5", "10"), None);
    let outcome = notifier.notify(&report, Some("test-token")).await;

    assert_eq!(outcome, DispatchOutcome::Skipped(SkipReason::FirstRun));
    let received = server.received_requests().await.expect("request recording enabled");
    assert!(received.is_empty());
}

#[tokio::test]
async fn test_rejection_becomes_failed_outcome() {
    let (_server, client) = common::setup_push_mock(
        ResponseTemplate::new(200).set_body_json(serde_json::json!({ "code": 999, "msg": "limit" })),
    )
    .await;
    let notifier = NotifyChangesUseCase::new(Arc::new(client));

    let outcome = notifier.notify(&grade_added_report(), Some("test-token")).await;
    assert!(!outcome.is_success());
    match outcome {
        DispatchOutcome::Failed(msg) => assert!(msg.contains("limit")),
        other => panic!("expected Failed, got {other:?}"),
    }
}
