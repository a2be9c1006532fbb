//! Change notification use case
//!
//! Renders a [`ChangeReport`] into a push message and hands it to the
//! [`IPushService`]. Delivery never fails the caller: the outcome is
//! reported as a [`DispatchOutcome`] and failures are logged.

use std::sync::Arc;

use tracing::{info, warn};

use crate::{
    domain::{ChangeEntry, ChangeKind, ChangeReport},
    ports::{IPushService, MarkupDialect, PushRequest},
};

/// Default push message title
pub const DEFAULT_TITLE: &str = "Grade report updated";

/// Why a dispatch did not reach the push endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The round only established the baseline
    FirstRun,
    /// Nothing changed since the last snapshot
    NoChanges,
    /// No destination token is configured
    NoToken,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SkipReason::FirstRun => "baseline established on first run",
            SkipReason::NoChanges => "no changes",
            SkipReason::NoToken => "no push token configured",
        };
        f.write_str(s)
    }
}

/// Result of a dispatch attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The endpoint accepted the message
    Sent,
    /// Dispatch was intentionally not attempted
    Skipped(SkipReason),
    /// The endpoint could not be reached or rejected the message
    Failed(String),
}

impl DispatchOutcome {
    /// Sent and Skipped both count as success; only Failed does not
    pub fn is_success(&self) -> bool {
        !matches!(self, DispatchOutcome::Failed(_))
    }
}

/// Renders a single change entry as one line
pub fn format_entry(entry: &ChangeEntry) -> String {
    let old = entry.old_value().unwrap_or("-");
    let course = entry.course().unwrap_or_default();
    match entry.kind() {
        ChangeKind::GpaChanged => format!("GPA changed: {} -> {}", old, entry.new_value()),
        ChangeKind::RankChanged => format!("Rank changed: {} -> {}", old, entry.new_value()),
        ChangeKind::CourseAdded => format!("New grade: {} {}", course, entry.new_value()),
        ChangeKind::CourseGradeChanged => {
            format!("Grade changed: {} {} -> {}", course, old, entry.new_value())
        }
    }
}

/// Renders a report: one line per entry, a blank line, then a summary
/// line with the current GPA and rank
pub fn format_report(report: &ChangeReport, dialect: MarkupDialect) -> String {
    let br = dialect.line_break();
    let summary = format!("GPA: {} | Rank: {}", report.gpa(), report.rank());

    let lines: Vec<String> = report.entries().iter().map(format_entry).collect();
    if lines.is_empty() {
        return summary;
    }

    format!("{}{br}{br}{}", lines.join(br), summary)
}

/// Use case for notifying the student about grade changes
pub struct NotifyChangesUseCase {
    push_service: Arc<dyn IPushService>,
    title: String,
    dialect: MarkupDialect,
}

impl NotifyChangesUseCase {
    /// Creates a notifier using the default title and HTML markup
    pub fn new(push_service: Arc<dyn IPushService>) -> Self {
        Self {
            push_service,
            title: DEFAULT_TITLE.to_string(),
            dialect: MarkupDialect::Html,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_dialect(mut self, dialect: MarkupDialect) -> Self {
        self.dialect = dialect;
        self
    }

    /// Renders the report in this notifier's markup dialect
    pub fn format(&self, report: &ChangeReport) -> String {
        format_report(report, self.dialect)
    }

    /// Notifies about a report
    ///
    /// First-run and unchanged reports are never pushed, whether or not a
    /// token is configured.
    pub async fn notify(&self, report: &ChangeReport, token: Option<&str>) -> DispatchOutcome {
        if report.is_first_run() {
            info!("Baseline established, skipping push notification");
            return DispatchOutcome::Skipped(SkipReason::FirstRun);
        }
        if !report.changed() {
            return DispatchOutcome::Skipped(SkipReason::NoChanges);
        }

        let message = self.format(report);
        self.dispatch(&message, token).await
    }

    /// Sends a rendered message to the push endpoint
    ///
    /// A missing or blank token skips delivery. Delivery errors are logged
    /// and returned as [`DispatchOutcome::Failed`].
    pub async fn dispatch(&self, message: &str, token: Option<&str>) -> DispatchOutcome {
        let Some(token) = token.map(str::trim).filter(|t| !t.is_empty()) else {
            info!("No push token configured, skipping push notification");
            return DispatchOutcome::Skipped(SkipReason::NoToken);
        };

        let request = PushRequest {
            token: token.to_string(),
            title: self.title.clone(),
            content: message.to_string(),
            dialect: self.dialect,
        };

        match self.push_service.push(&request).await {
            Ok(()) => {
                info!(title = %self.title, "Push notification sent");
                DispatchOutcome::Sent
            }
            Err(e) => {
                let err_msg = format!("{e:#}");
                warn!(error = %err_msg, "Push notification failed");
                DispatchOutcome::Failed(err_msg)
            }
        }
    }

    /// Sends a fixed test message to verify the token and endpoint
    pub async fn send_test(&self, token: Option<&str>) -> DispatchOutcome {
        let br = self.dialect.line_break();
        let message = format!(
            "This is a test notification from GradeWatch.{br}{br}Grade changes will be delivered here."
        );
        self.dispatch(&message, token).await
    }
}
