//! Error types for the site backend.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;

use crate::notify::DeliveryReport;

/// Startup configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Malformed or missing request input. Messages are shown to the visitor as-is.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("All fields are required")]
    MissingFields,

    #[error("Messages are required")]
    MissingMessages,

    #[error("Invalid message format")]
    MalformedMessage,
}

/// Failures talking to the hosted language model.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("model request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("model api error: {status} {body}")]
    Api { status: u16, body: String },

    #[error("malformed model response: {0}")]
    MalformedResponse(String),
}

/// Failures handing a message to the email relay.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("invalid address {address:?}: {reason}")]
    Address { address: String, reason: String },

    #[error("failed to build email: {0}")]
    Build(String),

    #[error("SMTP transport error: {0}")]
    Transport(String),
}

/// Errors surfaced by the HTTP handlers.
///
/// The response body only ever carries a short friendly message; the detail
/// goes to the log where the error is raised.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Failed to generate response")]
    Model(#[from] ModelError),

    #[error("Failed to send message")]
    Delivery(DeliveryReport),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Model(_) | ApiError::Delivery(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            ApiError::Delivery(report) => json!({
                "error": self.to_string(),
                "delivery": report,
            }),
            _ => json!({ "error": self.to_string() }),
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::SendOutcome;

    #[test]
    fn validation_errors_map_to_bad_request() {
        let err = ApiError::from(ValidationError::MissingFields);
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "All fields are required");
    }

    #[test]
    fn model_errors_hide_detail() {
        let err = ApiError::from(ModelError::Api {
            status: 429,
            body: "quota exceeded for project 1234".into(),
        });
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Failed to generate response");
    }

    #[test]
    fn delivery_error_reports_each_send() {
        let err = ApiError::Delivery(DeliveryReport {
            notification: SendOutcome::Sent,
            confirmation: SendOutcome::Failed("mailbox unavailable".into()),
        });
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Failed to send message");
    }
}
