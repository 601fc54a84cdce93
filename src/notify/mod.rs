//! Notification dispatcher for the contact form.
//!
//! Each accepted inquiry produces two emails: a notification to the operator
//! and a confirmation to the visitor. Both are always attempted and reported
//! separately.

pub mod mail;
pub mod relay;

use std::sync::Arc;

use log::{error, info, warn};
use serde::{Serialize, Serializer};
use uuid::Uuid;

use crate::error::{ApiError, RelayError, ValidationError};
use mail::{MailComposer, RelayRoute};
use relay::{OutgoingEmail, Relay};

pub const SENT_DETAIL: &str = "Message sent successfully";
pub const PENDING_DETAIL: &str = "Message received (email delivery pending SMTP configuration)";

/// A validated contact form submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inquiry {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl Inquiry {
    /// Accepts the raw form fields; every one must be present and non-blank.
    ///
    /// Whitespace-only values count as missing. The email address is not
    /// checked for syntax here.
    pub fn new(
        name: Option<String>,
        email: Option<String>,
        subject: Option<String>,
        message: Option<String>,
    ) -> Result<Self, ValidationError> {
        fn required(value: Option<String>) -> Result<String, ValidationError> {
            value
                .filter(|v| !v.trim().is_empty())
                .ok_or(ValidationError::MissingFields)
        }

        Ok(Self {
            name: required(name)?,
            email: required(email)?,
            subject: required(subject)?,
            message: required(message)?,
        })
    }
}

/// Result of one send through the relay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    Sent,
    Failed(String),
}

impl SendOutcome {
    pub fn is_sent(&self) -> bool {
        matches!(self, SendOutcome::Sent)
    }

    pub fn label(&self) -> &'static str {
        match self {
            SendOutcome::Sent => "sent",
            SendOutcome::Failed(_) => "failed",
        }
    }
}

// Failure reasons stay in the log; callers only see the label.
impl Serialize for SendOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeliveryReport {
    pub notification: SendOutcome,
    pub confirmation: SendOutcome,
}

impl DeliveryReport {
    pub fn all_sent(&self) -> bool {
        self.notification.is_sent() && self.confirmation.is_sent()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationResult {
    pub reference: Uuid,
    pub delivered: bool,
    pub detail: &'static str,
    /// `None` when the relay isn't configured and nothing was sent.
    pub report: Option<DeliveryReport>,
}

pub struct Dispatcher {
    relay: Option<(Arc<dyn Relay>, RelayRoute)>,
    composer: MailComposer,
}

impl Dispatcher {
    pub fn new(relay: Option<(Arc<dyn Relay>, RelayRoute)>, composer: MailComposer) -> Self {
        Self { relay, composer }
    }

    pub fn is_configured(&self) -> bool {
        self.relay.is_some()
    }

    /// Deliver both emails for `inquiry`.
    ///
    /// Without a relay the inquiry is only logged and a pending result is
    /// returned. If either send fails the whole dispatch fails, carrying the
    /// per-send report.
    pub async fn dispatch(&self, inquiry: Inquiry) -> Result<NotificationResult, ApiError> {
        let reference = Uuid::new_v4();

        let Some((relay, route)) = &self.relay else {
            warn!(
                "Contact form submission {} (SMTP not configured): name={:?} email={:?} subject={:?} message={:?}",
                reference, inquiry.name, inquiry.email, inquiry.subject, inquiry.message
            );
            return Ok(NotificationResult {
                reference,
                delivered: false,
                detail: PENDING_DETAIL,
                report: None,
            });
        };

        info!(
            "Contact form submission {} from {} about {:?}",
            reference, inquiry.email, inquiry.subject
        );

        let notification = self.composer.notification(&inquiry, route);
        let confirmation = self.composer.confirmation(&inquiry, route);
        let report = DeliveryReport {
            notification: deliver(relay, notification, "notification", reference).await,
            confirmation: deliver(relay, confirmation, "confirmation", reference).await,
        };

        if !report.all_sent() {
            return Err(ApiError::Delivery(report));
        }

        info!("Contact form submission {} delivered", reference);
        Ok(NotificationResult {
            reference,
            delivered: true,
            detail: SENT_DETAIL,
            report: Some(report),
        })
    }
}

async fn deliver(
    relay: &Arc<dyn Relay>,
    email: Result<OutgoingEmail, RelayError>,
    kind: &str,
    reference: Uuid,
) -> SendOutcome {
    let outcome = match email {
        Ok(email) => {
            let relay = Arc::clone(relay);
            match tokio::task::spawn_blocking(move || relay.send(&email)).await {
                Ok(result) => result,
                Err(e) => Err(RelayError::Transport(format!("send task failed: {e}"))),
            }
        }
        Err(e) => Err(e),
    };

    match outcome {
        Ok(()) => SendOutcome::Sent,
        Err(e) => {
            error!("Contact form {} {} email failed: {}", reference, kind, e);
            SendOutcome::Failed(e.to_string())
        }
    }
}
