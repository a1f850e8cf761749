//! OpenAI chat-completions adapter.
//!
//! Text notes go out as a single user message; images go out as a
//! multimodal message carrying the picture as a base64 `data:` URL.
//! No retries: any transport or API error fails the call.

use std::fmt;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use super::{ModelClient, ModelReply};
use crate::config::ModelSettings;

/// HTTP client for an OpenAI-compatible chat-completions endpoint
pub struct OpenAiClient {
    api_key: String,
    base_url: String,
    model: String,
    max_tokens: u32,
    client: reqwest::Client,
}

impl fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

/// Chat-completions request body
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: serde_json::Value,
}

/// Response from the API (either choices or an error object)
#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

impl OpenAiClient {
    /// Create a client from model settings; fails without an API key
    pub fn from_settings(settings: &ModelSettings) -> Result<Self> {
        let api_key = settings
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .context("OPENAI_API_KEY is not set")?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            api_key,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
            max_tokens: settings.max_tokens,
            client,
        })
    }

    /// Build API URL
    fn api_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn text_request(&self, prompt: &str) -> ChatRequest<'_> {
        ChatRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            messages: vec![ChatMessage {
                role: "user",
                content: json!(prompt),
            }],
        }
    }

    fn image_request(&self, image: &[u8], mime_type: &str, instruction: &str) -> ChatRequest<'_> {
        let data_url = format!("data:{};base64,{}", mime_type, STANDARD.encode(image));

        ChatRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            messages: vec![ChatMessage {
                role: "user",
                content: json!([
                    { "type": "text", "text": instruction },
                    { "type": "image_url", "image_url": { "url": data_url } },
                ]),
            }],
        }
    }

    /// Send a request and pull out the first choice's text
    async fn send(&self, request: &ChatRequest<'_>) -> Result<String> {
        debug!(model = %self.model, "Sending chat completion request");

        let response = self
            .client
            .post(self.api_url())
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .context("Failed to reach the model service")?;

        let status = response.status();
        let body = response
            .text()
            .await
            .context("Failed to read model response")?;

        extract_content(status, &body)
    }
}

/// Turn an HTTP status and body into the reply text
fn extract_content(status: reqwest::StatusCode, body: &str) -> Result<String> {
    let parsed: Option<ChatResponse> = serde_json::from_str(body).ok();

    if let Some(err) = parsed.as_ref().and_then(|r| r.error.as_ref()) {
        anyhow::bail!("Model API error ({}): {}", status, err.message);
    }

    if !status.is_success() {
        anyhow::bail!("Model API returned {}: {}", status, body.trim());
    }

    let parsed = parsed.context("Failed to parse model response")?;

    let content = parsed
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .unwrap_or_default();

    if content.trim().is_empty() {
        anyhow::bail!("Model returned an empty response");
    }

    Ok(content)
}

#[async_trait]
impl ModelClient for OpenAiClient {
    fn name(&self) -> &str {
        "openai"
    }

    async fn complete_text(&self, prompt: &str) -> Result<ModelReply> {
        let request = self.text_request(prompt);
        Ok(ModelReply::Text(self.send(&request).await?))
    }

    async fn describe_image(
        &self,
        image: &[u8],
        mime_type: &str,
        instruction: &str,
    ) -> Result<ModelReply> {
        let request = self.image_request(image, mime_type, instruction);
        Ok(ModelReply::Text(self.send(&request).await?))
    }
}
