use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::conversation::ConversationMessage;
use crate::error::ValidationError;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// Kept loose so a missing or non-array value maps to our own error.
    pub messages: Option<Value>,
}

impl ChatRequest {
    pub fn into_history(self) -> Result<Vec<ConversationMessage>, ValidationError> {
        match self.messages {
            Some(value @ Value::Array(_)) => {
                serde_json::from_value(value).map_err(|_| ValidationError::MalformedMessage)
            }
            _ => Err(ValidationError::MissingMessages),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Model text, untouched.
    pub reply: String,
    /// `reply` with in-page links rendered as anchors.
    pub html: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ContactRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub subject: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ContactResponse {
    pub success: bool,
    pub message: String,
}
