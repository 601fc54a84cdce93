//! Outbound email over SMTP.

use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, Message, SmtpTransport, Transport};
use log::info;
use secrecy::ExposeSecret;

use crate::config::RelayConfig;
use crate::error::RelayError;

/// Port on which the relay expects implicit TLS instead of STARTTLS.
const IMPLICIT_TLS_PORT: u16 = 465;

/// A fully composed HTML email, independent of the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub from_name: String,
    pub from_address: String,
    pub to: String,
    /// Left off when there's no usable address to answer to.
    pub reply_to: Option<String>,
    pub subject: String,
    pub html: String,
}

/// Something that can deliver an [`OutgoingEmail`]. Calls may block.
pub trait Relay: Send + Sync {
    fn send(&self, email: &OutgoingEmail) -> Result<(), RelayError>;
}

pub struct SmtpRelay {
    transport: SmtpTransport,
}

impl SmtpRelay {
    pub fn new(config: &RelayConfig) -> Result<Self, RelayError> {
        let creds = Credentials::new(
            config.username.clone(),
            config.password.expose_secret().to_string(),
        );

        let builder = if config.port == IMPLICIT_TLS_PORT {
            SmtpTransport::relay(&config.host)
        } else {
            SmtpTransport::starttls_relay(&config.host)
        }
        .map_err(|e| RelayError::Transport(format!("SMTP relay error: {e}")))?;

        let transport = builder.port(config.port).credentials(creds).build();

        info!("SMTP relay {}:{} ready", config.host, config.port);
        Ok(Self { transport })
    }
}

impl Relay for SmtpRelay {
    fn send(&self, email: &OutgoingEmail) -> Result<(), RelayError> {
        let message = build_message(email)?;
        self.transport
            .send(&message)
            .map_err(|e| RelayError::Transport(format!("SMTP send failed: {e}")))?;

        info!("Email sent to {}", email.to);
        Ok(())
    }
}

pub fn parse_address(address: &str) -> Result<Address, RelayError> {
    address.trim().parse().map_err(|e| RelayError::Address {
        address: address.to_string(),
        reason: format!("{e}"),
    })
}

pub fn build_message(email: &OutgoingEmail) -> Result<Message, RelayError> {
    let from = Mailbox::new(
        Some(email.from_name.clone()),
        parse_address(&email.from_address)?,
    );

    let mut builder = Message::builder().from(from);
    if let Some(reply_to) = &email.reply_to {
        builder = builder.reply_to(Mailbox::new(None, parse_address(reply_to)?));
    }

    builder
        .to(Mailbox::new(None, parse_address(&email.to)?))
        .subject(email.subject.as_str())
        .header(ContentType::TEXT_HTML)
        .body(email.html.clone())
        .map_err(|e| RelayError::Build(e.to_string()))
}
