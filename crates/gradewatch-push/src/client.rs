//! PushPlus HTTP client
//!
//! Posts a [`PushRequest`] as JSON to a PushPlus-compatible endpoint and
//! interprets the answer. A delivery counts as successful only when the
//! HTTP status is 2xx and the service-level `code` (when present) is 200.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use gradewatch_core::ports::{MarkupDialect, PushRequest};
//! use gradewatch_push::client::PushPlusClient;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = PushPlusClient::new()?;
//! client
//!     .send(&PushRequest {
//!         token: "your-token".into(),
//!         title: "Grade report updated".into(),
//!         content: "New grade: Physics B".into(),
//!         dialect: MarkupDialect::Html,
//!     })
//!     .await?;
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use gradewatch_core::{
    config::PushConfig,
    ports::{IPushService, PushRequest},
};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::PushError;

/// Default PushPlus send endpoint
pub const DEFAULT_ENDPOINT: &str = "http://www.pushplus.plus/send";

/// Default HTTP timeout for one push request
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Service-level result code for an accepted message
const CODE_OK: i64 = 200;

/// Maximum number of body characters kept in a [`PushError::Status`]
const MAX_ERROR_BODY: usize = 512;

/// Body returned by the PushPlus send endpoint
#[derive(Debug, Deserialize)]
struct SendResponse {
    code: i64,
    #[serde(default)]
    msg: Option<String>,
}

/// HTTP client for the push endpoint
#[derive(Debug, Clone)]
pub struct PushPlusClient {
    /// The underlying HTTP client
    client: Client,
    /// Full URL messages are posted to
    endpoint: String,
}

impl PushPlusClient {
    /// Creates a client for the public PushPlus endpoint
    pub fn new() -> Result<Self, PushError> {
        Self::with_endpoint(DEFAULT_ENDPOINT, DEFAULT_TIMEOUT)
    }

    /// Creates a client with a custom endpoint (useful for testing)
    ///
    /// # Arguments
    /// * `endpoint` - Full URL to POST messages to
    /// * `timeout` - Per-request timeout
    pub fn with_endpoint(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, PushError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    /// Creates a client from the `push` configuration section
    pub fn from_config(config: &PushConfig) -> Result<Self, PushError> {
        Self::with_endpoint(
            config.endpoint.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    /// Returns the endpoint this client posts to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Delivers one message
    ///
    /// # Errors
    /// * [`PushError::Http`] - the request could not be sent
    /// * [`PushError::Status`] - non-2xx HTTP status
    /// * [`PushError::Rejected`] - the service answered with a code other than 200
    #[instrument(skip(self, request), fields(endpoint = %self.endpoint, title = %request.title))]
    pub async fn send(&self, request: &PushRequest) -> Result<(), PushError> {
        let response = self.client.post(&self.endpoint).json(request).send().await?;

        let status = response.status();
        let body = response.text().await?;
        debug!(status = status.as_u16(), "Push endpoint responded");

        if !status.is_success() {
            return Err(PushError::Status {
                status: status.as_u16(),
                body: body.chars().take(MAX_ERROR_BODY).collect(),
            });
        }

        // A body without a result code is taken as accepted.
        match serde_json::from_str::<SendResponse>(&body) {
            Ok(parsed) if parsed.code != CODE_OK => Err(PushError::Rejected {
                code: parsed.code,
                message: parsed.msg.unwrap_or_default(),
            }),
            Ok(_) => Ok(()),
            Err(e) => {
                debug!(error = %e, "Push response carried no result code");
                Ok(())
            }
        }
    }
}

#[async_trait::async_trait]
impl IPushService for PushPlusClient {
    async fn push(&self, request: &PushRequest) -> anyhow::Result<()> {
        self.send(request).await?;
        Ok(())
    }
}
