//! Email sending for Teamspace Core
//!
//! Callers never send inline: they build an [`EmailMessage`] and submit it
//! to the background queue, which drives a [`Mailer`] implementation.

pub mod smtp;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use smtp::SmtpMailer;

/// A queued email job: `{from, to, subject, html}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailMessage {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// Mailer errors
#[derive(Debug, Error)]
pub enum MailerError {
    #[error("Invalid mailer configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Failed to send email: {0}")]
    SendFailed(String),
}

/// Transport seam for email delivery
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> Result<(), MailerError>;
}

/// Build the invitation email for an organization invite
pub fn invitation_email(
    from: &str,
    to: &str,
    organization_name: &str,
    invite_link: &str,
    expires_in_days: i64,
) -> EmailMessage {
    let subject = "Invitation to Join Organization".to_string();
    let html = format!(
        "<p>You have been invited to join the {} organization. \
         Use the following link to accept the invitation:</p>\
         <p><a href=\"{}\">Accept invitation</a></p>\
         <p>This invitation expires in {} days.</p>",
        organization_name, invite_link, expires_in_days
    );

    EmailMessage {
        from: from.to_string(),
        to: to.to_string(),
        subject,
        html,
    }
}
