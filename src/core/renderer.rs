//! Writes article pages.

use std::path::PathBuf;

use chrono::{DateTime, Local};
use tokio::fs;

use super::error::{PipelineError, Step};
use super::template::{Template, TemplateFields};
use crate::domain::{GeneratedContent, Slug};

/// Human-readable publish date shown on the page
pub const DATE_FORMAT: &str = "%B %d, %Y %I:%M %p";

/// Renders generated content into `<slug>.html`
pub struct ArticleRenderer {
    articles_dir: PathBuf,
    template: Box<dyn Template>,
}

impl ArticleRenderer {
    pub fn new(articles_dir: impl Into<PathBuf>, template: Box<dyn Template>) -> Self {
        Self {
            articles_dir: articles_dir.into(),
            template,
        }
    }

    /// Path of the page for a slug
    pub fn article_path(&self, slug: &Slug) -> PathBuf {
        self.articles_dir.join(slug.file_name("html"))
    }

    /// Render and write the article, replacing any page with the same slug
    pub async fn render(
        &self,
        content: &GeneratedContent,
        slug: &Slug,
        image_filename: &str,
    ) -> Result<PathBuf, PipelineError> {
        self.render_at(content, slug, image_filename, Local::now()).await
    }

    pub async fn render_at(
        &self,
        content: &GeneratedContent,
        slug: &Slug,
        image_filename: &str,
        published: DateTime<Local>,
    ) -> Result<PathBuf, PipelineError> {
        let date = published.format(DATE_FORMAT).to_string();

        let html = self.template.render(&TemplateFields {
            title: &content.title,
            date: &date,
            body: &content.body,
            image_filename,
            caption: &content.caption,
        })
        .await?;

        fs::create_dir_all(&self.articles_dir)
            .await
            .map_err(|e| PipelineError::fs(Step::Render, &self.articles_dir, e))?;

        let path = self.article_path(slug);
        fs::write(&path, html)
            .await
            .map_err(|e| PipelineError::fs(Step::Render, &path, e))?;

        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::template::PlaceholderTemplate;
    use std::path::Path;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn renderer(dir: &Path) -> ArticleRenderer {
        ArticleRenderer::new(
            dir.join("articles"),
            Box::new(PlaceholderTemplate::new(
                "<h1>{{ title }}</h1>\n<small>{{ date }}</small>\n{{ body }}\n<img src=\"../img/{{ image_filename }}\">\n<figcaption>{{ caption }}</figcaption>",
            )),
        )
    }

    #[tokio::test]
    async fn test_render_writes_slug_file() {
        let temp = TempDir::new().unwrap();
        let renderer = renderer(temp.path());
        let content = GeneratedContent::new("Title A", "<p>body</p>", "caption");
        let published = Local.with_ymd_and_hms(2026, 10, 18, 9, 5, 0).unwrap();

        let path = renderer
            .render_at(&content, &content.slug(), "title-a.png", published)
            .await
            .unwrap();

        assert_eq!(path, temp.path().join("articles").join("title-a.html"));
        let html = std::fs::read_to_string(&path).unwrap();
        assert!(html.contains("<h1>Title A</h1>"));
        assert!(html.contains("October 18, 2026 09:05 AM"));
        assert!(html.contains("<p>body</p>"));
        assert!(html.contains("../img/title-a.png"));
        assert!(html.contains("<figcaption>caption</figcaption>"));
    }

    #[tokio::test]
    async fn test_render_overwrites_existing_page() {
        let temp = TempDir::new().unwrap();
        let renderer = renderer(temp.path());

        let first = GeneratedContent::new("Same Title", "<p>first</p>", "one");
        let second = GeneratedContent::new("Same Title", "<p>second</p>", "two");

        renderer.render(&first, &first.slug(), "same-title.png").await.unwrap();
        let path = renderer
            .render(&second, &second.slug(), "same-title.png")
            .await
            .unwrap();

        let html = std::fs::read_to_string(path).unwrap();
        assert!(html.contains("<p>second</p>"));
        assert!(!html.contains("<p>first</p>"));
    }
}
