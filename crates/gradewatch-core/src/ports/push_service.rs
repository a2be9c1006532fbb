//! Push service port (driven/secondary port)
//!
//! The external push notification boundary. A request carries the
//! destination token, a title, the rendered content and the markup dialect
//! the content is written in.
//!
//! ## Design Notes
//!
//! - Uses `anyhow::Result` because delivery failures are adapter-specific.
//! - Callers treat delivery as fire-and-forget; an error is logged and never
//!   aborts the polling loop.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Markup dialect of a push message body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkupDialect {
    /// Lines joined with `<br>`
    #[default]
    Html,
    /// Lines joined with Markdown hard breaks
    Markdown,
    /// Plain text, one line per entry
    Txt,
}

impl MarkupDialect {
    /// Name understood by the push endpoint's `template` field
    pub fn as_str(&self) -> &'static str {
        match self {
            MarkupDialect::Html => "html",
            MarkupDialect::Markdown => "markdown",
            MarkupDialect::Txt => "txt",
        }
    }

    /// Separator placed between rendered lines
    pub fn line_break(&self) -> &'static str {
        match self {
            MarkupDialect::Html => "<br>",
            MarkupDialect::Markdown => "  \n",
            MarkupDialect::Txt => "\n",
        }
    }
}

impl std::fmt::Display for MarkupDialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MarkupDialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "html" => Ok(MarkupDialect::Html),
            "markdown" => Ok(MarkupDialect::Markdown),
            "txt" | "text" => Ok(MarkupDialect::Txt),
            other => Err(format!(
                "unknown markup dialect '{other}'; valid options: html, markdown, txt"
            )),
        }
    }
}

/// A message ready to hand to the push endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushRequest {
    /// Destination token identifying the recipient
    pub token: String,
    pub title: String,
    pub content: String,
    /// Serialized as `template`, the field name the endpoint expects
    #[serde(rename = "template")]
    pub dialect: MarkupDialect,
}

/// Port trait for delivering push notifications
#[async_trait::async_trait]
pub trait IPushService: Send + Sync {
    /// Delivers one message
    ///
    /// Returns an error for transport failures and for responses the
    /// endpoint marks as unsuccessful.
    async fn push(&self, request: &PushRequest) -> anyhow::Result<()>;
}
