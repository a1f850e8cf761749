//! Core pipeline logic.
//!
//! This module contains:
//! - Locator: Finds the newest upload
//! - Generator / Parser: Turns an upload into article fields
//! - Renderer / Template: Writes the article page
//! - Index: The JSON list of published articles
//! - Orchestrator: Runs the steps in order

pub mod error;
pub mod generator;
pub mod index;
pub mod locator;
pub mod orchestrator;
pub mod parser;
pub mod renderer;
pub mod template;

// Re-export commonly used types
pub use error::{PipelineError, Step};
pub use generator::ContentGenerator;
pub use index::{ArticleIndex, IndexUpdater};
pub use locator::AssetLocator;
pub use orchestrator::{Orchestrator, PublishedArticle};
pub use parser::{LineParser, OutputParser};
pub use renderer::ArticleRenderer;
pub use template::{FileTemplate, PlaceholderTemplate, Template, TemplateFields};
