//! Generated article content and published index records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::slug::Slug;

/// Article fields produced by the generative model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedContent {
    /// Headline (also the slug source)
    pub title: String,

    /// Article body, already marked up as HTML paragraphs
    pub body: String,

    /// One-line photo caption
    pub caption: String,
}

impl GeneratedContent {
    pub fn new(
        title: impl Into<String>,
        body: impl Into<String>,
        caption: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            caption: caption.into(),
        }
    }

    /// Slug derived from the title
    pub fn slug(&self) -> Slug {
        Slug::from_title(&self.title)
    }
}

/// One published article in the index
///
/// Serialized as `{title, slug, date, image}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleRecord {
    pub title: String,

    pub slug: Slug,

    /// When the article was published (ISO-8601)
    #[serde(rename = "date")]
    pub published_at: DateTime<Utc>,

    /// Relative path of the article image
    #[serde(rename = "image")]
    pub image_path: String,
}

impl ArticleRecord {
    /// Create a record stamped with the current time
    pub fn new(slug: Slug, title: impl Into<String>, image_path: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            slug,
            published_at: Utc::now(),
            image_path: image_path.into(),
        }
    }
}
