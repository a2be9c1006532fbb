//! Shared test helpers for push integration tests
//!
//! Provides wiremock-based mock server setup for the PushPlus send
//! endpoint. Each helper mounts the mock and returns a client pointing at
//! the mock server.

use std::time::Duration;

use gradewatch_core::ports::{MarkupDialect, PushRequest};
use gradewatch_push::PushPlusClient;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Path the mock endpoint is mounted at
pub const SEND_PATH: &str = "/send";

/// Starts a mock server answering `POST /send` with `response` and returns
/// a (MockServer, PushPlusClient) tuple.
pub async fn setup_push_mock(response: ResponseTemplate) -> (MockServer, PushPlusClient) {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(SEND_PATH))
        .respond_with(response)
        .mount(&server)
        .await;

    let client = client_for(&server);
    (server, client)
}

/// A mock answering like PushPlus does for an accepted message.
pub async fn setup_accepting_mock() -> (MockServer, PushPlusClient) {
    setup_push_mock(ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "code": 200,
        "msg": "请求成功",
        "data": "a1b2c3d4"
    })))
    .await
}

/// Builds a client posting to the mock server's send path.
pub fn client_for(server: &MockServer) -> PushPlusClient {
    PushPlusClient::with_endpoint(format!("{}{}", server.uri(), SEND_PATH), Duration::from_secs(5))
        .expect("build push client")
}

/// A typical HTML push request.
pub fn sample_request() -> PushRequest {
    PushRequest {
        token: "test-token".to_string(),
        title: "Grade report updated".to_string(),
        content: "New grade: Physics B<br><br>GPA: 3.6 | Rank: 10".to_string(),
        dialect: MarkupDialect::Html,
    }
}
