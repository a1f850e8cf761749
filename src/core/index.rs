//! JSON index of published articles, newest first.
//!
//! The whole file is read, changed in memory, and rewritten on every run.
//! There is no locking: concurrent runs can lose each other's entries.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::warn;

use super::error::{PipelineError, Step};
use crate::domain::{ArticleRecord, Slug};

/// Ordered list of published articles
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArticleIndex {
    records: Vec<ArticleRecord>,
}

impl ArticleIndex {
    /// Create a new empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the index from disk.
    ///
    /// A missing or unreadable file yields an empty index. A file that reads
    /// but is not a valid index is an error, never silently reset.
    pub async fn load(path: &Path) -> Result<Self, PipelineError> {
        let content = match fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::new()),
            Err(e) => {
                warn!("Article index {} is unreadable, starting empty: {}", path.display(), e);
                return Ok(Self::new());
            }
        };

        serde_json::from_str(&content).map_err(|source| PipelineError::IndexCorrupt {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Save the index to disk
    pub async fn save(&self, path: &Path) -> Result<(), PipelineError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| PipelineError::fs(Step::Index, parent, e))?;
        }

        let content = serde_json::to_string_pretty(self).map_err(|source| {
            PipelineError::IndexCorrupt {
                path: path.to_path_buf(),
                source,
            }
        })?;

        fs::write(path, content)
            .await
            .map_err(|e| PipelineError::fs(Step::Index, path, e))
    }

    /// Insert a record at the front. Duplicates are kept.
    pub fn prepend(&mut self, record: ArticleRecord) {
        self.records.insert(0, record);
    }

    /// Records, newest first
    pub fn records(&self) -> &[ArticleRecord] {
        &self.records
    }

    /// First `limit` records (all when `None`)
    pub fn list(&self, limit: Option<usize>) -> &[ArticleRecord] {
        let end = limit.map_or(self.records.len(), |l| l.min(self.records.len()));
        &self.records[..end]
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Prepends a record for each published article
#[derive(Debug, Clone)]
pub struct IndexUpdater {
    index_path: PathBuf,
}

impl IndexUpdater {
    pub fn new(index_path: impl Into<PathBuf>) -> Self {
        Self {
            index_path: index_path.into(),
        }
    }

    pub fn index_path(&self) -> &Path {
        &self.index_path
    }

    /// Read the index, put a new record first, and rewrite the file
    pub async fn update(
        &self,
        slug: &Slug,
        title: &str,
        image_path: &str,
    ) -> Result<ArticleRecord, PipelineError> {
        let mut index = ArticleIndex::load(&self.index_path).await?;

        let record = ArticleRecord::new(slug.clone(), title, image_path);
        index.prepend(record.clone());
        index.save(&self.index_path).await?;

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn record(title: &str) -> ArticleRecord {
        let slug = Slug::from_title(title);
        let image = format!("static/images/article-images/{}.png", slug);
        ArticleRecord::new(slug, title, image)
    }

    #[test]
    fn test_prepend_keeps_newest_first() {
        let mut index = ArticleIndex::new();
        index.prepend(record("First"));
        index.prepend(record("Second"));
        index.prepend(record("First"));

        let titles: Vec<&str> = index.records().iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["First", "Second", "First"]);
        assert_eq!(index.len(), 3);
    }

    #[test]
    fn test_list_limit() {
        let mut index = ArticleIndex::new();
        for title in ["A", "B", "C"] {
            index.prepend(record(title));
        }

        assert_eq!(index.list(Some(2)).len(), 2);
        assert_eq!(index.list(Some(10)).len(), 3);
        assert_eq!(index.list(None)[0].title, "C");
    }

    #[tokio::test]
    async fn test_missing_file_loads_empty() {
        let temp = TempDir::new().unwrap();
        let index = ArticleIndex::load(&temp.path().join("article_index.json"))
            .await
            .unwrap();
        assert!(index.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_file_is_corrupt() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("article_index.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = ArticleIndex::load(&path).await.unwrap_err();
        assert!(matches!(err, PipelineError::IndexCorrupt { .. }));
    }

    #[tokio::test]
    async fn test_save_writes_plain_array() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("data").join("article_index.json");

        let mut index = ArticleIndex::new();
        index.prepend(record("Title A"));
        index.save(&path).await.unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert!(value.is_array());
        assert_eq!(value[0]["slug"], "title-a");
        assert!(raw.contains("\n  "));

        let loaded = ArticleIndex::load(&path).await.unwrap();
        assert_eq!(loaded, index);
    }

    #[tokio::test]
    async fn test_updater_prepends() {
        let temp = TempDir::new().unwrap();
        let updater = IndexUpdater::new(temp.path().join("article_index.json"));

        updater
            .update(&Slug::from_title("Old News"), "Old News", "img/old-news.png")
            .await
            .unwrap();
        let newest = updater
            .update(&Slug::from_title("New News"), "New News", "img/new-news.png")
            .await
            .unwrap();

        let index = ArticleIndex::load(updater.index_path()).await.unwrap();
        assert_eq!(index.records()[0], newest);
        assert_eq!(index.records()[1].title, "Old News");
    }
}
