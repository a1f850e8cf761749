//! Pipeline orchestrator.
//!
//! One run processes the single newest upload:
//! locate -> generate -> slug -> relocate -> render -> index.
//!
//! Any failure aborts the rest of the run. Earlier side effects stay in
//! place: if rendering fails after the image was moved, the image remains
//! in the images directory and the index is left untouched.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::fs;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use super::error::{PipelineError, Step};
use super::generator::ContentGenerator;
use super::index::IndexUpdater;
use super::locator::AssetLocator;
use super::renderer::ArticleRenderer;
use super::template::{FileTemplate, Template};
use crate::adapters::ModelClient;
use crate::config::SiteConfig;
use crate::domain::{ArticleRecord, GeneratedContent, Slug, UploadedAsset};

/// Result of a successful run
#[derive(Debug, Clone)]
pub struct PublishedArticle {
    pub slug: Slug,
    pub content: GeneratedContent,
    /// Written `<slug>.html`
    pub article_path: PathBuf,
    /// Relocated upload
    pub image_path: PathBuf,
    /// Entry placed at the front of the index
    pub record: ArticleRecord,
}

/// Sequences the pipeline components for one site
pub struct Orchestrator {
    locator: AssetLocator,
    generator: ContentGenerator,
    renderer: ArticleRenderer,
    index: IndexUpdater,
    images_dir: PathBuf,
    config: SiteConfig,
}

impl Orchestrator {
    /// Wire up the pipeline for a site, reading the template from disk
    pub fn new(config: SiteConfig, client: Arc<dyn ModelClient>) -> Self {
        let template = Box::new(FileTemplate::new(&config.template_path));
        Self::with_parts(config, ContentGenerator::new(client), template)
    }

    /// Wire up the pipeline with a specific generator and template
    pub fn with_parts(
        config: SiteConfig,
        generator: ContentGenerator,
        template: Box<dyn Template>,
    ) -> Self {
        Self {
            locator: AssetLocator::new(&config.upload_dir),
            generator,
            renderer: ArticleRenderer::new(&config.articles_dir, template),
            index: IndexUpdater::new(&config.index_path),
            images_dir: config.images_dir.clone(),
            config,
        }
    }

    /// Process the newest upload
    pub async fn run(&self) -> Result<PublishedArticle, PipelineError> {
        let run_id = Uuid::new_v4();
        let span = info_span!("run", %run_id);
        self.run_steps().instrument(span).await
    }

    /// Copy a local file into the upload directory, then process it
    pub async fn publish(&self, source: &Path) -> Result<PublishedArticle, PipelineError> {
        let staged = self.stage_upload(source).await?;
        info!(upload = %staged.display(), "Staged upload");
        self.run().await
    }

    /// Copy a file into the upload directory under its own name
    pub async fn stage_upload(&self, source: &Path) -> Result<PathBuf, PipelineError> {
        let file_name = source.file_name().ok_or_else(|| {
            PipelineError::fs(
                Step::Upload,
                source,
                std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a file path"),
            )
        })?;

        let upload_dir = self.locator.upload_dir();
        fs::create_dir_all(upload_dir)
            .await
            .map_err(|e| PipelineError::fs(Step::Upload, upload_dir, e))?;

        let target = upload_dir.join(file_name);
        fs::copy(source, &target)
            .await
            .map_err(|e| PipelineError::fs(Step::Upload, source, e))?;

        Ok(target)
    }

    async fn run_steps(&self) -> Result<PublishedArticle, PipelineError> {
        // 1. Locate
        let asset = self
            .locator
            .newest()
            .ok_or_else(|| PipelineError::NoUpload(self.locator.upload_dir().to_path_buf()))?;
        info!(file = %asset.file_name(), kind = %asset.kind(), "Found upload");

        // 2. Generate
        let content = self.generator.generate(&asset).await?;

        // 3. Derive slug
        let slug = content.slug();
        if !slug.is_file_stem() {
            return Err(PipelineError::generation(format!(
                "title '{}' gives slug '{}', which is not a plain file name",
                content.title, slug
            )));
        }
        info!(%slug, "Derived slug");

        // 4. Relocate
        let image_path = self.relocate(&asset, &slug).await?;
        let image_filename = slug.file_name(&asset.extension);
        info!(image = %image_path.display(), "Moved upload");

        // 5. Render
        let article_path = self.renderer.render(&content, &slug, &image_filename).await?;
        info!(article = %article_path.display(), "Article written");

        // 6. Index
        let record = self
            .index
            .update(&slug, &content.title, &self.config.image_url(&image_filename))
            .await?;
        info!(index = %self.index.index_path().display(), "Index updated");

        Ok(PublishedArticle {
            slug,
            content,
            article_path,
            image_path,
            record,
        })
    }

    /// Move the upload to `<slug>.<ext>` in the images directory
    async fn relocate(&self, asset: &UploadedAsset, slug: &Slug) -> Result<PathBuf, PipelineError> {
        fs::create_dir_all(&self.images_dir)
            .await
            .map_err(|e| PipelineError::fs(Step::Relocate, &self.images_dir, e))?;

        let target = self.images_dir.join(slug.file_name(&asset.extension));
        fs::rename(&asset.path, &target)
            .await
            .map_err(|e| PipelineError::fs(Step::Relocate, &asset.path, e))?;

        Ok(target)
    }
}
