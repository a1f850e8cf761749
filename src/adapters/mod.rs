//! Adapter interfaces for the generative model service.
//!
//! Adapters hide the wire format of the external model behind a single
//! trait so the pipeline can run against a stub in tests.

pub mod openai;

use anyhow::Result;
use async_trait::async_trait;

use crate::domain::GeneratedContent;

// Re-export the OpenAI adapter
pub use openai::OpenAiClient;

/// What the model sent back
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelReply {
    /// Fields already split by the service
    Fields(GeneratedContent),

    /// Free-form text that still needs parsing
    Text(String),
}

/// Trait for generative model backends
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Human-readable backend name
    fn name(&self) -> &str;

    /// Text-only completion for a fully built prompt
    async fn complete_text(&self, prompt: &str) -> Result<ModelReply>;

    /// Multimodal completion over raw image bytes
    async fn describe_image(
        &self,
        image: &[u8],
        mime_type: &str,
        instruction: &str,
    ) -> Result<ModelReply>;
}
