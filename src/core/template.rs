//! Article HTML templates.
//!
//! Templates use `{{ field }}` placeholders for the five article fields.
//! Values are inserted verbatim since the body already carries markup.

use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use async_trait::async_trait;
use regex::{Captures, Regex};
use tokio::fs;

use super::error::PipelineError;

/// Values bound into an article template
#[derive(Debug, Clone, Copy)]
pub struct TemplateFields<'a> {
    pub title: &'a str,
    pub date: &'a str,
    pub body: &'a str,
    pub image_filename: &'a str,
    pub caption: &'a str,
}

impl<'a> TemplateFields<'a> {
    fn get(&self, name: &str) -> Option<&'a str> {
        match name {
            "title" => Some(self.title),
            "date" => Some(self.date),
            "body" => Some(self.body),
            "image_filename" => Some(self.image_filename),
            "caption" => Some(self.caption),
            _ => None,
        }
    }
}

/// Rendering function from fields to markup.
///
/// Async because a template may have to load its source before rendering.
#[async_trait]
pub trait Template: Send + Sync {
    async fn render(&self, fields: &TemplateFields<'_>) -> Result<String, PipelineError>;
}

fn placeholder_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}\}").unwrap())
}

/// Template with `{{ name }}` substitution
#[derive(Debug, Clone)]
pub struct PlaceholderTemplate {
    source: String,
}

impl PlaceholderTemplate {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    /// Read a template from disk
    pub async fn load(path: &Path) -> Result<Self, PipelineError> {
        let source = fs::read_to_string(path).await.map_err(|e| {
            PipelineError::Template(format!("failed to load {}: {}", path.display(), e))
        })?;
        Ok(Self::new(source))
    }

    /// Substitute the fields into the template source
    pub fn fill(&self, fields: &TemplateFields<'_>) -> String {
        placeholder_regex()
            .replace_all(&self.source, |caps: &Captures<'_>| match fields.get(&caps[1]) {
                Some(value) => Cow::Borrowed(value),
                // Unknown placeholders pass through untouched
                None => Cow::Owned(caps[0].to_string()),
            })
            .into_owned()
    }
}

#[async_trait]
impl Template for PlaceholderTemplate {
    async fn render(&self, fields: &TemplateFields<'_>) -> Result<String, PipelineError> {
        Ok(self.fill(fields))
    }
}

/// Template read from a file each time it renders
#[derive(Debug, Clone)]
pub struct FileTemplate {
    path: PathBuf,
}

impl FileTemplate {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl Template for FileTemplate {
    async fn render(&self, fields: &TemplateFields<'_>) -> Result<String, PipelineError> {
        Ok(PlaceholderTemplate::load(&self.path).await?.fill(fields))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn fields() -> TemplateFields<'static> {
        TemplateFields {
            title: "Title A",
            date: "October 18, 2026 09:05 AM",
            body: "<p>body</p>",
            image_filename: "title-a.png",
            caption: "caption",
        }
    }

    #[test]
    fn test_substitutes_all_fields() {
        let template = PlaceholderTemplate::new(
            "<h1>{{ title }}</h1><time>{{date}}</time>{{ body }}<img src=\"{{  image_filename }}\"><p>{{ caption }}</p>",
        );
        let html = template.fill(&fields());
        assert_eq!(
            html,
            "<h1>Title A</h1><time>October 18, 2026 09:05 AM</time><p>body</p><img src=\"title-a.png\"><p>caption</p>"
        );
    }

    #[test]
    fn test_unknown_placeholders_untouched() {
        let template = PlaceholderTemplate::new("{{ author }} / {{ title }}");
        assert_eq!(template.fill(&fields()), "{{ author }} / Title A");
    }

    #[test]
    fn test_values_are_not_reexpanded() {
        let mut f = fields();
        f.title = "{{ caption }}";
        let template = PlaceholderTemplate::new("{{ title }}");
        assert_eq!(template.fill(&f), "{{ caption }}");
    }

    #[tokio::test]
    async fn test_missing_template_file() {
        let temp = TempDir::new().unwrap();
        let template = FileTemplate::new(temp.path().join("missing.html"));
        let err = template.render(&fields()).await.unwrap_err();
        assert!(matches!(err, PipelineError::Template(_)));
    }

    #[tokio::test]
    async fn test_file_template_renders() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("article.html");
        std::fs::write(&path, "<title>{{ title }}</title>").unwrap();

        let html = FileTemplate::new(&path).render(&fields()).await.unwrap();
        assert_eq!(html, "<title>Title A</title>");
    }

    #[test]
    fn test_default_template_keeps_caption_out_of_attributes() {
        let template =
            PlaceholderTemplate::new(include_str!("../../templates/article_template.html"));
        let mut f = fields();
        f.caption = "Mayor says \"cheese\"";

        let html = template.fill(&f);
        assert!(html.contains("<figcaption>Mayor says \"cheese\"</figcaption>"));
        assert!(html.contains("alt=\"Photo for this article\""));
        assert!(!html.contains("=\"Mayor says"));
    }
}
