//! Domain types for the gazette pipeline.
//!
//! This module contains the core data structures:
//! - Slug: URL-safe identifier derived from a title
//! - UploadedAsset: The file driving one pipeline run
//! - GeneratedContent / ArticleRecord: Model output and index entries

pub mod article;
pub mod asset;
pub mod slug;

// Re-export commonly used types
pub use article::{ArticleRecord, GeneratedContent};
pub use asset::{AssetKind, UploadedAsset};
pub use slug::{slugify, Slug};
