//! Conversation responder: turns the visitor's chat history into a single
//! grounded model call.
//!
//! The server keeps no session state. Every request carries the whole
//! transcript, and the newest message is always the last entry.

pub mod reply;

use std::sync::Arc;

use log::{error, info, warn};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ValidationError};
use crate::model::prompt::{GROUNDING_DOCUMENT, REDIRECT_REPLY};
use crate::model::ChatModel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    /// Anything else the client sends (`system`, typos, ...). Never forwarded.
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub role: Role,
    pub content: String,
}

/// Role tokens as the model API expects them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelRole {
    User,
    Model,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelTurn {
    pub role: ModelRole,
    pub text: String,
}

/// What gets sent to the model: earlier turns plus the one being answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextWindow {
    pub prior: Vec<ModelTurn>,
    pub live: String,
}

/// Split a full transcript into prior turns and the live turn.
///
/// Returns `None` for an empty transcript. Prior turns are only kept once the
/// visitor has asked more than one question; they never open on an assistant
/// turn and never include the live message.
pub fn window_context(history: &[ConversationMessage]) -> Option<ContextWindow> {
    let (live, earlier) = history.split_last()?;

    let user_turns = history.iter().filter(|m| m.role == Role::User).count();
    let prior = if user_turns > 1 {
        earlier
            .iter()
            .filter_map(|m| {
                let role = match m.role {
                    Role::User => ModelRole::User,
                    Role::Assistant => ModelRole::Model,
                    Role::Other => return None,
                };
                Some(ModelTurn {
                    role,
                    text: m.content.clone(),
                })
            })
            .skip_while(|t| t.role != ModelRole::User)
            .collect()
    } else {
        Vec::new()
    };

    Some(ContextWindow {
        prior,
        live: live.content.clone(),
    })
}

/// Where a reply came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Generated(String),
    /// No model credential: canned message pointing at the contact form.
    Redirect,
}

impl Reply {
    pub fn text(&self) -> &str {
        match self {
            Reply::Generated(text) => text.as_str(),
            Reply::Redirect => REDIRECT_REPLY,
        }
    }
}

pub struct Responder {
    model: Option<Arc<dyn ChatModel>>,
}

impl Responder {
    pub fn new(model: Option<Arc<dyn ChatModel>>) -> Self {
        Self { model }
    }

    pub fn is_configured(&self) -> bool {
        self.model.is_some()
    }

    /// Answer the last message of `history`.
    pub async fn respond(&self, history: &[ConversationMessage]) -> Result<Reply, ApiError> {
        let Some(model) = &self.model else {
            warn!("Chat request received but no model API key is configured");
            return Ok(Reply::Redirect);
        };

        let window = window_context(history).ok_or(ValidationError::MissingMessages)?;
        info!(
            "Chat request: {} prior turns sent to {}",
            window.prior.len(),
            model.name()
        );

        let text = model
            .generate(GROUNDING_DOCUMENT, &window)
            .await
            .map_err(|e| {
                error!("Chat API error: {}", e);
                e
            })?;
        Ok(Reply::Generated(text))
    }
}
