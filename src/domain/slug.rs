//! URL-safe article identifiers derived from titles.

use std::path::{Component, Path};

use serde::{Deserialize, Serialize};

/// Characters removed outright when deriving a slug
const STRIPPED: [char; 4] = ['\'', '\u{2019}', ',', '.'];

/// Article slug (lowercase, hyphenated title)
///
/// Not unique: two runs that generate the same title produce the same slug
/// and share the same article and image file names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Slug(String);

impl Slug {
    /// Derive a slug from a title
    pub fn from_title(title: &str) -> Self {
        Self(slugify(title))
    }

    /// Get the raw string value
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the slug is a single plain path component.
    ///
    /// Slugs keep `/` and other characters from the title, so an empty slug
    /// or one that names a directory or parent would escape the site folders.
    pub fn is_file_stem(&self) -> bool {
        if self.0.is_empty() || self.0.contains(['/', '\\']) {
            return false;
        }
        let mut components = Path::new(&self.0).components();
        matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        )
    }

    /// File name for this slug with the given extension (without the dot)
    pub fn file_name(&self, extension: &str) -> String {
        format!("{}.{}", self.0, extension)
    }
}

impl std::fmt::Display for Slug {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lowercase the title, turn spaces into hyphens, and drop apostrophes,
/// commas and periods. Every other character passes through unchanged.
pub fn slugify(title: &str) -> String {
    title
        .to_lowercase()
        .chars()
        .filter(|c| !STRIPPED.contains(c))
        .map(|c| if c == ' ' { '-' } else { c })
        .collect()
}
