//! gazette - turns an uploaded photo or note into a news article page
//!
//! Each run picks the newest file in the upload directory, asks a
//! generative model to write a short article about it, renders the article
//! into a static HTML page, and records it in a JSON index that the site
//! uses to list articles newest-first.
//!
//! # Modules
//!
//! - `adapters`: Generative model backends (OpenAI chat completions)
//! - `core`: Pipeline steps and the orchestrator
//! - `domain`: Data structures (Slug, UploadedAsset, ArticleRecord)
//! - `config`: Site paths and model settings
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Process the newest upload
//! gazette run
//!
//! # Upload a photo and process it
//! gazette publish ~/Pictures/cat.png
//!
//! # List published articles
//! gazette list
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;

// Re-export main types at crate root for convenience
pub use crate::adapters::{ModelClient, ModelReply, OpenAiClient};
pub use crate::config::{ModelSettings, SiteConfig};
pub use crate::core::{ArticleIndex, Orchestrator, PipelineError, PublishedArticle};
pub use crate::domain::{slugify, ArticleRecord, AssetKind, GeneratedContent, Slug, UploadedAsset};
