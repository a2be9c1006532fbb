//! Integration tests for PushPlusClient::send()
//!
//! Verifies the JSON body sent to the endpoint and how HTTP statuses and
//! service-level result codes map to errors.

use gradewatch_core::ports::{IPushService, MarkupDialect};
use gradewatch_push::PushError;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common;

#[tokio::test]
async fn test_send_posts_expected_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(common::SEND_PATH))
        .and(body_json(serde_json::json!({
            "token": "test-token",
            "title": "Grade report updated",
            "content": "New grade: Physics B<br><br>GPA: 3.6 | Rank: 10",
            "template": "html"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "code": 200,
            "msg": "ok"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = common::client_for(&server);
    client
        .send(&common::sample_request())
        .await
        .expect("send should succeed");
}

#[tokio::test]
async fn test_send_markdown_template() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(common::SEND_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "code": 200 })))
        .mount(&server)
        .await;

    let client = common::client_for(&server);
    let mut request = common::sample_request();
    request.dialect = MarkupDialect::Markdown;
    client.send(&request).await.expect("send should succeed");

    let received = server.received_requests().await.expect("request recording enabled");
    assert_eq!(received.len(), 1);
    let body: serde_json::Value = serde_json::from_slice(&received[0].body).unwrap();
    assert_eq!(body["template"], "markdown");
}

#[tokio::test]
async fn test_accepted_message_via_port() {
    let (_server, client) = common::setup_accepting_mock().await;

    let result = client.push(&common::sample_request()).await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_rejected_code_is_error() {
    let (_server, client) = common::setup_push_mock(
        ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "code": 903,
            "msg": "无效的用户token",
            "data": null
        })),
    )
    .await;

    let err = client.send(&common::sample_request()).await.unwrap_err();
    match err {
        PushError::Rejected { code, message } => {
            assert_eq!(code, 903);
            assert_eq!(message, "无效的用户token");
        }
        other => panic!("expected Rejected, got {other:?}"),
    }
}

#[tokio::test]
async fn test_server_error_status_is_error() {
    let (_server, client) =
        common::setup_push_mock(ResponseTemplate::new(503).set_body_string("maintenance")).await;

    let err = client.send(&common::sample_request()).await.unwrap_err();
    match &err {
        PushError::Status { status, body } => {
            assert_eq!(*status, 503);
            assert_eq!(body, "maintenance");
        }
        other => panic!("expected Status, got {other:?}"),
    }
}

#[tokio::test]
async fn test_non_json_success_body_is_accepted() {
    let (_server, client) =
        common::setup_push_mock(ResponseTemplate::new(200).set_body_string("OK")).await;

    assert!(client.send(&common::sample_request()).await.is_ok());
}

#[tokio::test]
async fn test_unreachable_endpoint_is_http_error() {
    // Nothing listens on port 1
    let client = gradewatch_push::PushPlusClient::with_endpoint(
        "http://127.0.0.1:1/send",
        std::time::Duration::from_secs(2),
    )
    .unwrap();

    let err = client.send(&common::sample_request()).await.unwrap_err();
    assert!(matches!(err, PushError::Http(_)));
}

#[tokio::test]
async fn test_port_error_carries_message() {
    let (_server, client) =
        common::setup_push_mock(ResponseTemplate::new(400).set_body_string("bad request")).await;

    let err = client.push(&common::sample_request()).await.unwrap_err();
    assert!(err.to_string().contains("HTTP 400"));
}
