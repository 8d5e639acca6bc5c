//! Report delivery.
//!
//! Delivery problems are logged and swallowed: by the time the report goes
//! out every unit has already been processed.

use async_trait::async_trait;
use itemsync_shared::{EmailError, EmailService};
use tracing::{error, info};

use super::render::ReportDocument;

/// Outbound channel for the rendered report.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReportSender: Send + Sync {
    /// Sends one HTML message to the configured recipients.
    async fn send_report(&self, subject: &str, html_body: &str) -> Result<(), EmailError>;
}

#[async_trait]
impl ReportSender for EmailService {
    async fn send_report(&self, subject: &str, html_body: &str) -> Result<(), EmailError> {
        self.send_html(subject, html_body).await
    }
}

/// Renders a [`ReportDocument`] and hands it to a [`ReportSender`].
pub struct ReportNotifier<'a> {
    sender: &'a dyn ReportSender,
    subject: String,
}

impl<'a> ReportNotifier<'a> {
    /// Creates a notifier sending with the given subject line.
    #[must_use]
    pub fn new(sender: &'a dyn ReportSender, subject: impl Into<String>) -> Self {
        Self {
            sender,
            subject: subject.into(),
        }
    }

    /// Sends the report. Returns whether delivery succeeded.
    pub async fn notify(&self, report: &ReportDocument) -> bool {
        let body = report.render_html();
        match self.sender.send_report(&self.subject, &body).await {
            Ok(()) => {
                info!(status = %report.status, failures = report.rows.len(), "Report sent");
                true
            }
            Err(e) => {
                error!(error = %e, status = %report.status, "Failed to send run report");
                false
            }
        }
    }
}
