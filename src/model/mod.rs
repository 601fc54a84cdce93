pub mod prompt;

use async_trait::async_trait;
use log::{debug, info};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{json, Value};

use crate::config::ModelConfig;
use crate::conversation::{ContextWindow, ModelRole};
use crate::error::ModelError;

/// A hosted chat model that answers one live turn given a system instruction
/// and earlier turns.
#[async_trait]
pub trait ChatModel: Send + Sync {
    fn name(&self) -> &str;

    async fn generate(&self, system: &str, window: &ContextWindow) -> Result<String, ModelError>;
}

// Wrapper for the Gemini generateContent API
pub struct GeminiModel {
    api_base: String,
    model: String,
    api_key: SecretString,
    client: Client,
}

impl GeminiModel {
    pub fn new(config: ModelConfig) -> Self {
        info!("Using Gemini model {} at {}", config.model, config.api_base);

        Self {
            api_base: config.api_base,
            model: config.model,
            api_key: config.api_key,
            client: Client::new(),
        }
    }
}

#[async_trait]
impl ChatModel for GeminiModel {
    fn name(&self) -> &str {
        &self.model
    }

    async fn generate(&self, system: &str, window: &ContextWindow) -> Result<String, ModelError> {
        let url = format!("{}/models/{}:generateContent", self.api_base, self.model);
        let payload = build_payload(system, window);
        debug!("Payload: {}", payload);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ModelError::Api { status, body });
        }

        let response_json: Value = response.json().await?;
        debug!("Response JSON: {}", response_json);

        let reply = extract_reply(&response_json)?;
        info!("Response length: {} characters", reply.len());
        Ok(reply)
    }
}

/// Request body: system instruction, prior turns, then the live user turn.
pub fn build_payload(system: &str, window: &ContextWindow) -> Value {
    let contents: Vec<Value> = window
        .prior
        .iter()
        .map(|turn| content(turn.role, &turn.text))
        .chain(std::iter::once(content(ModelRole::User, &window.live)))
        .collect();

    json!({
        "systemInstruction": { "parts": [{ "text": system }] },
        "contents": contents,
    })
}

fn content(role: ModelRole, text: &str) -> Value {
    json!({
        "role": role,
        "parts": [{ "text": text }],
    })
}

/// Concatenated text parts of the first candidate.
pub fn extract_reply(response: &Value) -> Result<String, ModelError> {
    if let Some(reason) = response
        .get("promptFeedback")
        .and_then(|f| f.get("blockReason"))
        .and_then(|r| r.as_str())
    {
        return Err(ModelError::MalformedResponse(format!(
            "prompt blocked: {reason}"
        )));
    }

    let parts = response
        .get("candidates")
        .and_then(|candidates| candidates.get(0))
        .and_then(|candidate| candidate.get("content"))
        .and_then(|content| content.get("parts"))
        .and_then(|parts| parts.as_array())
        .ok_or_else(|| ModelError::MalformedResponse("no candidate content".into()))?;

    let text: String = parts
        .iter()
        .filter_map(|part| part.get("text").and_then(|t| t.as_str()))
        .collect();

    if text.is_empty() {
        return Err(ModelError::MalformedResponse("empty reply".into()));
    }
    Ok(text)
}
