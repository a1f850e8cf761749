//! Produces article content from an uploaded asset.
//!
//! Images go to the model's vision endpoint, text notes are embedded in a
//! prompt, and anything else is rejected before any request is made.

use std::sync::Arc;

use tokio::fs;
use tracing::{debug, info};

use super::error::{PipelineError, Step};
use super::parser::{LineParser, OutputParser};
use crate::adapters::{ModelClient, ModelReply};
use crate::domain::{AssetKind, GeneratedContent, UploadedAsset};

/// Instruction sent alongside an uploaded image
pub const IMAGE_INSTRUCTION: &str = "You are a reporter for a light-hearted local newspaper. \
Write a short news article about what is happening in this photo. \
Reply with the headline on the first line, then the article as HTML <p> paragraphs, \
one per line, and finish with a one-sentence photo caption on the last line. \
Do not add labels, quotes or Markdown.";

/// Prompt wrapped around the contents of an uploaded note
pub const TEXT_PROMPT: &str = "You are a reporter for a light-hearted local newspaper. \
Turn the following note into a short news article. \
Reply with the headline on the first line, then the article as HTML <p> paragraphs, \
one per line, and finish with a one-sentence caption for the article's picture on the last line. \
Do not add labels, quotes or Markdown.\n\nNote:\n{note}";

/// Build the prompt for a text note
pub fn text_prompt(note: &str) -> String {
    TEXT_PROMPT.replace("{note}", note.trim())
}

/// Dispatches assets to the right model request and parses the reply
pub struct ContentGenerator {
    client: Arc<dyn ModelClient>,
    parser: Box<dyn OutputParser>,
}

impl ContentGenerator {
    /// Create a generator using the line-based parser
    pub fn new(client: Arc<dyn ModelClient>) -> Self {
        Self::with_parser(client, Box::new(LineParser))
    }

    pub fn with_parser(client: Arc<dyn ModelClient>, parser: Box<dyn OutputParser>) -> Self {
        Self { client, parser }
    }

    /// Generate article content for an asset (one model call, no retry)
    pub async fn generate(&self, asset: &UploadedAsset) -> Result<GeneratedContent, PipelineError> {
        let kind = asset.kind();
        debug!(asset = %asset.path.display(), %kind, backend = self.client.name(), "Generating content");

        let reply = match kind {
            AssetKind::Image => {
                let mime_type = asset.mime_type().unwrap_or("image/png");
                let bytes = fs::read(&asset.path)
                    .await
                    .map_err(|e| PipelineError::fs(Step::Generate, &asset.path, e))?;
                self.client
                    .describe_image(&bytes, mime_type, IMAGE_INSTRUCTION)
                    .await
            }
            AssetKind::Text => {
                let note = fs::read_to_string(&asset.path)
                    .await
                    .map_err(|e| PipelineError::fs(Step::Generate, &asset.path, e))?;
                self.client.complete_text(&text_prompt(&note)).await
            }
            AssetKind::Unsupported => {
                return Err(PipelineError::UnsupportedAsset {
                    path: asset.path.clone(),
                    extension: asset.extension.clone(),
                })
            }
        }
        .map_err(PipelineError::Generation)?;

        let content = match reply {
            ModelReply::Fields(content) => content,
            ModelReply::Text(raw) => self.parser.parse(&raw),
        };

        if content.title.trim().is_empty() {
            return Err(PipelineError::generation("model returned no title"));
        }

        info!(title = %content.title, "Generated article");
        Ok(content)
    }
}
