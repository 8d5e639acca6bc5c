//! Email service for delivering the run report.
//!
//! Uses `lettre` for SMTP transport.

use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, header::ContentType},
    transport::smtp::authentication::Credentials,
};
use thiserror::Error;
use tracing::debug;

use crate::config::{EmailConfig, SmtpSecurity};

/// Email service errors.
#[derive(Debug, Error)]
pub enum EmailError {
    /// Failed to build email message.
    #[error("Failed to build email: {0}")]
    BuildError(String),
    /// Failed to send email.
    #[error("Failed to send email: {0}")]
    SendError(String),
    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),
    /// No recipient configured.
    #[error("No recipients configured")]
    NoRecipients,
}

/// Email service for sending HTML reports to the configured recipients.
#[derive(Clone)]
pub struct EmailService {
    config: EmailConfig,
}

impl EmailService {
    /// Creates a new email service.
    #[must_use]
    pub const fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    /// Creates an SMTP transport for the configured security mode.
    fn create_transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>, EmailError> {
        let builder = match self.config.security {
            SmtpSecurity::Starttls => {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.smtp_host)
                    .map_err(|e| EmailError::SendError(e.to_string()))?
            }
            SmtpSecurity::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(&self.config.smtp_host)
                .map_err(|e| EmailError::SendError(e.to_string()))?,
            SmtpSecurity::None => {
                AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&self.config.smtp_host)
            }
        };

        let builder = builder.port(self.config.smtp_port);
        let builder = if self.config.smtp_password.is_empty() {
            builder
        } else {
            builder.credentials(Credentials::new(
                self.config.login().to_string(),
                self.config.smtp_password.clone(),
            ))
        };

        Ok(builder.build())
    }

    /// Builds the HTML message addressed to every configured recipient.
    fn build_message(&self, subject: &str, html_body: &str) -> Result<Message, EmailError> {
        let recipients = self.config.recipient_list();
        if recipients.is_empty() {
            return Err(EmailError::NoRecipients);
        }

        let from: Mailbox = format!("{} <{}>", self.config.from_name, self.config.from_email)
            .parse()
            .map_err(|e| EmailError::InvalidAddress(format!("{e}")))?;

        let mut builder = Message::builder().from(from).subject(subject);
        for recipient in recipients {
            let to: Mailbox = recipient
                .parse()
                .map_err(|e| EmailError::InvalidAddress(format!("{recipient}: {e}")))?;
            builder = builder.to(to);
        }

        builder
            .header(ContentType::TEXT_HTML)
            .body(html_body.to_string())
            .map_err(|e| EmailError::BuildError(e.to_string()))
    }

    /// Sends an HTML email to all configured recipients.
    ///
    /// # Errors
    ///
    /// Returns an error if the message cannot be built or delivered.
    pub async fn send_html(&self, subject: &str, html_body: &str) -> Result<(), EmailError> {
        let email = self.build_message(subject, html_body)?;

        let transport = self.create_transport()?;
        transport
            .send(email)
            .await
            .map_err(|e| EmailError::SendError(e.to_string()))?;

        debug!(
            smtp_host = %self.config.smtp_host,
            recipients = %self.config.recipients,
            "Report email delivered"
        );
        Ok(())
    }
}

#[cfg(test)]
#[path = "email_tests.rs"]
mod tests;
