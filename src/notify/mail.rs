//! Email bodies for contact form submissions.
//!
//! Templates are compiled into the binary and rendered with autoescaping, so
//! visitor-supplied text can't inject markup into either email.

use log::warn;
use tera::{Context, Tera};

use super::relay::{parse_address, OutgoingEmail};
use super::Inquiry;
use crate::config::SiteConfig;
use crate::error::RelayError;

const NOTIFICATION_TEMPLATE: &str = "notification.html";
const CONFIRMATION_TEMPLATE: &str = "confirmation.html";
const CONFIRMATION_SENDER: &str = "Mida @ workwithmida";
const CONFIRMATION_SUBJECT: &str = "Thank you for reaching out!";

/// Addresses on the relay side of a submission.
#[derive(Debug, Clone)]
pub struct RelayRoute {
    /// Authenticated relay account; every email is sent from it.
    pub sender: String,
    pub operator: String,
}

pub struct MailComposer {
    tera: Tera,
    site: SiteConfig,
}

impl MailComposer {
    pub fn new(site: SiteConfig) -> Result<Self, tera::Error> {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            (
                NOTIFICATION_TEMPLATE,
                include_str!("../../templates/email/notification.html"),
            ),
            (
                CONFIRMATION_TEMPLATE,
                include_str!("../../templates/email/confirmation.html"),
            ),
        ])?;
        tera.autoescape_on(vec![".html"]);
        Ok(Self { tera, site })
    }

    /// Message to the operator, answerable straight back to the visitor.
    ///
    /// The visitor's address isn't validated on input. If it doesn't parse,
    /// the notification still goes out without a Reply-To and the raw address
    /// stays in the body.
    pub fn notification(
        &self,
        inquiry: &Inquiry,
        route: &RelayRoute,
    ) -> Result<OutgoingEmail, RelayError> {
        let html = self.render(NOTIFICATION_TEMPLATE, inquiry)?;
        let reply_to = match parse_address(&inquiry.email) {
            Ok(_) => Some(inquiry.email.clone()),
            Err(e) => {
                warn!("Sending notification without Reply-To: {}", e);
                None
            }
        };
        Ok(OutgoingEmail {
            from_name: inquiry.name.clone(),
            from_address: route.sender.clone(),
            to: route.operator.clone(),
            reply_to,
            subject: format!("[Website] {}", inquiry.subject),
            html,
        })
    }

    /// Acknowledgement to the visitor, echoing what they sent.
    pub fn confirmation(
        &self,
        inquiry: &Inquiry,
        route: &RelayRoute,
    ) -> Result<OutgoingEmail, RelayError> {
        let html = self.render(CONFIRMATION_TEMPLATE, inquiry)?;
        Ok(OutgoingEmail {
            from_name: CONFIRMATION_SENDER.to_string(),
            from_address: route.sender.clone(),
            to: inquiry.email.clone(),
            reply_to: Some(self.site.public_email.clone()),
            subject: CONFIRMATION_SUBJECT.to_string(),
            html,
        })
    }

    fn render(&self, template: &str, inquiry: &Inquiry) -> Result<String, RelayError> {
        let mut context = Context::new();
        context.insert("name", &inquiry.name);
        context.insert("email", &inquiry.email);
        context.insert("subject", &inquiry.subject);
        context.insert("message", &inquiry.message);
        context.insert("site_host", site_host(&self.site.site_url));
        context.insert("portfolio_url", &format!("{}#portfolio", self.site.site_url));
        context.insert("services_url", &format!("{}#services", self.site.site_url));
        context.insert("public_email", &self.site.public_email);

        self.tera
            .render(template, &context)
            .map_err(|e| RelayError::Build(format!("template {template}: {e}")))
    }
}

fn site_host(url: &str) -> &str {
    url.split_once("://").map_or(url, |(_, rest)| rest)
}
