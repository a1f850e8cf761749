//! Command-line interface for gazette.
//!
//! Provides commands for processing the newest upload, publishing a local
//! file, listing the article index, and inspecting configuration.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{error, info, warn};

use crate::adapters::OpenAiClient;
use crate::config::SiteConfig;
use crate::core::{ArticleIndex, AssetLocator, Orchestrator, PipelineError, PublishedArticle};
use crate::domain::slugify;

/// gazette - turn uploads into generated news articles
#[derive(Parser, Debug)]
#[command(name = "gazette")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Site root (overrides GAZETTE_ROOT and the config file)
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate an article from the newest upload
    Run,

    /// Copy a file into the upload directory and generate an article from it
    Publish {
        /// Image (.png, .jpg, .jpeg) or note (.txt) to publish
        file: PathBuf,
    },

    /// List published articles, newest first
    List {
        /// Maximum number of articles to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Print the slug for a title
    Slug {
        /// Article title
        title: String,
    },

    /// Show resolved configuration (debug)
    Config,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Run => {
                report(run_newest(self.root).await);
                Ok(())
            }
            Commands::Publish { file } => {
                report(publish_file(self.root, &file).await);
                Ok(())
            }
            Commands::List { limit } => list_articles(self.root, limit).await,
            Commands::Slug { title } => {
                println!("{}", slugify(&title));
                Ok(())
            }
            Commands::Config => show_config(self.root),
        }
    }
}

/// Process the newest upload, if there is one
async fn run_newest(root: Option<PathBuf>) -> Result<PublishedArticle> {
    let config = SiteConfig::load(root)?;

    // No upload means no model call, so the model client is not needed
    if AssetLocator::new(&config.upload_dir).newest().is_none() {
        return Err(PipelineError::NoUpload(config.upload_dir).into());
    }

    Ok(build_orchestrator(config)?.run().await?)
}

/// Stage a local file and process it
async fn publish_file(root: Option<PathBuf>, file: &Path) -> Result<PublishedArticle> {
    let config = SiteConfig::load(root)?;
    Ok(build_orchestrator(config)?.publish(file).await?)
}

/// Build the pipeline with the OpenAI backend
fn build_orchestrator(config: SiteConfig) -> Result<Orchestrator> {
    let client = OpenAiClient::from_settings(&config.model)
        .context("Failed to set up the model client")?;
    Ok(Orchestrator::new(config, Arc::new(client)))
}

/// Log the outcome of a run; failures end here
fn report(outcome: Result<PublishedArticle>) {
    match outcome {
        Ok(article) => {
            info!(
                slug = %article.slug,
                article = %article.article_path.display(),
                "Article published"
            );
            println!("{}", article.slug);
        }
        Err(e) => match e.downcast_ref::<PipelineError>() {
            Some(pipeline_error) if pipeline_error.is_noop() => {
                warn!("{}", pipeline_error);
            }
            _ => {
                error!("Article generation failed: {:#}", e);
            }
        },
    }
}

/// Print the article index
async fn list_articles(root: Option<PathBuf>, limit: usize) -> Result<()> {
    let config = SiteConfig::load(root)?;
    let index = ArticleIndex::load(&config.index_path).await?;

    if index.is_empty() {
        println!("No articles yet. Use 'gazette publish <file>' to add one.");
        return Ok(());
    }

    println!("{:<26} {:<32} {:<40}", "DATE", "SLUG", "TITLE");
    println!("{}", "-".repeat(100));

    for record in index.list(Some(limit)) {
        let title_truncated = if record.title.chars().count() > 37 {
            format!("{}...", record.title.chars().take(37).collect::<String>())
        } else {
            record.title.clone()
        };
        println!(
            "{:<26} {:<32} {:<40}",
            record.published_at.format("%Y-%m-%d %H:%M:%S UTC"),
            record.slug.as_str(),
            title_truncated
        );
    }

    println!("\nTotal: {} articles", index.len());

    Ok(())
}

/// Show the resolved configuration (for debugging)
fn show_config(root: Option<PathBuf>) -> Result<()> {
    let cfg = SiteConfig::load(root)?;

    let config_file = cfg
        .config_file
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "(none - using defaults)".to_string());

    println!("Config file: {}", config_file);
    println!();
    println!("Paths:");
    println!("  Root:      {}", cfg.root.display());
    println!("  Uploads:   {}", cfg.upload_dir.display());
    println!("  Articles:  {}", cfg.articles_dir.display());
    println!("  Images:    {}", cfg.images_dir.display());
    println!("  Template:  {}", cfg.template_path.display());
    println!("  Index:     {}", cfg.index_path.display());
    println!("  Image URL: {}", cfg.image_url("<slug>.png"));
    println!();
    println!("Model:");
    println!("  Name:       {}", cfg.model.model);
    println!("  Base URL:   {}", cfg.model.base_url);
    println!(
        "  API key:    {}",
        if cfg.model.api_key.is_some() { "set" } else { "(not set)" }
    );
    println!("  Max tokens: {}", cfg.model.max_tokens);
    println!("  Timeout:    {}s", cfg.model.timeout_seconds);

    Ok(())
}
