//! Site configuration.
//!
//! Configuration sources (highest priority first):
//! 1. Command-line flags (`--root`)
//! 2. Environment variables (GAZETTE_ROOT, GAZETTE_MODEL, OPENAI_API_KEY, OPENAI_BASE_URL)
//! 3. Config file (.gazette/config.yaml)
//! 4. Defaults (site root = current directory)
//!
//! Config file discovery:
//! - Searches current directory and parents for .gazette/config.yaml
//! - `paths.root` is relative to the project directory (the parent of .gazette/)
//! - Every other path is relative to the site root
//!
//! The resolved [`SiteConfig`] is passed explicitly to each component;
//! nothing here is cached process-wide.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub model: Option<ModelConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathsConfig {
    /// Site root (relative to the project directory)
    pub root: Option<String>,
    /// Directory scanned for new uploads
    pub uploads: Option<String>,
    /// Directory receiving `<slug>.html`
    pub articles: Option<String>,
    /// Directory receiving relocated images
    pub images: Option<String>,
    /// Article HTML template
    pub template: Option<String>,
    /// JSON article index
    pub index: Option<String>,
    /// Prefix written before image file names in index records
    pub image_url_prefix: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    pub name: Option<String>,
    pub base_url: Option<String>,
    pub max_tokens: Option<u32>,
    pub timeout_seconds: Option<u64>,
}

/// Settings for the generative model client
#[derive(Clone)]
pub struct ModelSettings {
    pub model: String,
    pub base_url: String,
    pub api_key: Option<String>,
    pub max_tokens: u32,
    pub timeout_seconds: u64,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4o".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: None,
            max_tokens: 1000,
            timeout_seconds: 120,
        }
    }
}

impl std::fmt::Debug for ModelSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelSettings")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_deref().map(|_| "<redacted>"))
            .field("max_tokens", &self.max_tokens)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

/// Resolved configuration with absolute paths
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// Site root all default paths hang off
    pub root: PathBuf,
    pub upload_dir: PathBuf,
    pub articles_dir: PathBuf,
    pub images_dir: PathBuf,
    pub template_path: PathBuf,
    pub index_path: PathBuf,
    /// Prefix for the `image` field of index records
    pub image_url_prefix: String,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
    pub model: ModelSettings,
}

const DEFAULT_UPLOADS: &str = "uploads";
const DEFAULT_ARTICLES: &str = "articles";
const DEFAULT_IMAGES: &str = "static/images/article-images";
const DEFAULT_TEMPLATE: &str = "templates/article_template.html";
const DEFAULT_INDEX: &str = "article_index.json";

impl SiteConfig {
    /// Default layout under a site root
    pub fn for_root(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            upload_dir: root.join(DEFAULT_UPLOADS),
            articles_dir: root.join(DEFAULT_ARTICLES),
            images_dir: root.join(DEFAULT_IMAGES),
            template_path: root.join(DEFAULT_TEMPLATE),
            index_path: root.join(DEFAULT_INDEX),
            image_url_prefix: DEFAULT_IMAGES.to_string(),
            config_file: None,
            model: ModelSettings::default(),
            root,
        }
    }

    /// Load configuration from all sources
    pub fn load(root_override: Option<PathBuf>) -> Result<Self> {
        let config_file = find_config_file();
        let parsed = match config_file {
            Some(ref path) => Some(load_config_file(path)?),
            None => None,
        };

        let cwd = std::env::current_dir().context("Failed to determine current directory")?;

        Ok(resolve(
            &cwd,
            root_override,
            config_file.zip(parsed),
            |key| std::env::var(key).ok(),
        ))
    }

    /// Relative path stored in the index for an image file name
    pub fn image_url(&self, image_filename: &str) -> String {
        let prefix = self.image_url_prefix.trim_end_matches('/');
        if prefix.is_empty() {
            image_filename.to_string()
        } else {
            format!("{}/{}", prefix, image_filename)
        }
    }
}

/// Merge defaults, config file, environment and overrides
fn resolve(
    cwd: &Path,
    root_override: Option<PathBuf>,
    file: Option<(PathBuf, ConfigFile)>,
    env: impl Fn(&str) -> Option<String>,
) -> SiteConfig {
    let (config_path, config) = match file {
        Some((path, config)) => (Some(path), config),
        None => (None, ConfigFile::default()),
    };

    // Project directory is the parent of .gazette/
    let project_dir = config_path
        .as_deref()
        .and_then(|p| p.parent())
        .and_then(|p| p.parent())
        .unwrap_or(cwd);

    let root = if let Some(root) = root_override {
        root
    } else if let Some(root) = env("GAZETTE_ROOT") {
        expand_home(&root)
    } else if let Some(ref root) = config.paths.root {
        resolve_path(project_dir, root)
    } else {
        project_dir.to_path_buf()
    };

    let mut site = SiteConfig::for_root(&root);
    site.config_file = config_path;

    let paths = &config.paths;
    if let Some(ref p) = paths.uploads {
        site.upload_dir = resolve_path(&root, p);
    }
    if let Some(ref p) = paths.articles {
        site.articles_dir = resolve_path(&root, p);
    }
    if let Some(ref p) = paths.images {
        site.images_dir = resolve_path(&root, p);
        site.image_url_prefix = p.trim_start_matches("./").to_string();
    }
    if let Some(ref p) = paths.template {
        site.template_path = resolve_path(&root, p);
    }
    if let Some(ref p) = paths.index {
        site.index_path = resolve_path(&root, p);
    }
    if let Some(ref prefix) = paths.image_url_prefix {
        site.image_url_prefix = prefix.clone();
    }

    if let Some(model) = config.model {
        if let Some(name) = model.name {
            site.model.model = name;
        }
        if let Some(base_url) = model.base_url {
            site.model.base_url = base_url;
        }
        if let Some(max_tokens) = model.max_tokens {
            site.model.max_tokens = max_tokens;
        }
        if let Some(timeout) = model.timeout_seconds {
            site.model.timeout_seconds = timeout;
        }
    }

    if let Some(name) = env("GAZETTE_MODEL") {
        site.model.model = name;
    }
    if let Some(base_url) = env("OPENAI_BASE_URL") {
        site.model.base_url = base_url;
    }
    site.model.api_key = env("OPENAI_API_KEY");

    site
}

/// Find config file by searching current directory and parents
fn find_config_file() -> Option<PathBuf> {
    let mut current = std::env::current_dir().ok()?;

    loop {
        let config_path = current.join(".gazette").join("config.yaml");
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Expand a leading `~/` to the home directory
fn expand_home(path_str: &str) -> PathBuf {
    match path_str.strip_prefix("~/") {
        Some(rest) => dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| PathBuf::from(path_str)),
        None => PathBuf::from(path_str),
    }
}

/// Resolve a path that may be relative to a base directory
fn resolve_path(base: &Path, path_str: &str) -> PathBuf {
    let path = expand_home(path_str);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::TempDir;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_defaults_without_file() {
        let config = resolve(Path::new("/srv/site"), None, None, no_env);

        assert_eq!(config.root, PathBuf::from("/srv/site"));
        assert_eq!(config.upload_dir, PathBuf::from("/srv/site/uploads"));
        assert_eq!(config.articles_dir, PathBuf::from("/srv/site/articles"));
        assert_eq!(
            config.images_dir,
            PathBuf::from("/srv/site/static/images/article-images")
        );
        assert_eq!(config.index_path, PathBuf::from("/srv/site/article_index.json"));
        assert_eq!(config.model.model, "gpt-4o");
        assert!(config.model.api_key.is_none());
        assert!(config.config_file.is_none());
    }

    #[test]
    fn test_config_file_parsing() {
        let temp = TempDir::new().unwrap();
        let gazette_dir = temp.path().join(".gazette");
        std::fs::create_dir_all(&gazette_dir).unwrap();

        let config_path = gazette_dir.join("config.yaml");
        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(
            file,
            r#"
version: "1.0"
paths:
  root: ./site
  uploads: incoming
  images: media/photos
model:
  name: gpt-4o-mini
  max_tokens: 600
"#
        )
        .unwrap();

        let parsed = load_config_file(&config_path).unwrap();
        assert_eq!(parsed.version.as_deref(), Some("1.0"));
        assert_eq!(parsed.paths.uploads.as_deref(), Some("incoming"));

        let config = resolve(
            Path::new("/elsewhere"),
            None,
            Some((config_path.clone(), parsed)),
            no_env,
        );

        let root = temp.path().join("./site");
        assert_eq!(config.root, root);
        assert_eq!(config.upload_dir, root.join("incoming"));
        assert_eq!(config.images_dir, root.join("media/photos"));
        assert_eq!(config.image_url_prefix, "media/photos");
        assert_eq!(config.articles_dir, root.join("articles"));
        assert_eq!(config.model.model, "gpt-4o-mini");
        assert_eq!(config.model.max_tokens, 600);
        assert_eq!(config.model.timeout_seconds, 120);
        assert_eq!(config.config_file, Some(config_path));
    }

    #[test]
    fn test_env_and_override_priority() {
        let env: HashMap<&str, &str> = [
            ("GAZETTE_ROOT", "/from/env"),
            ("GAZETTE_MODEL", "gpt-test"),
            ("OPENAI_API_KEY", "sk-123"),
        ]
        .into_iter()
        .collect();
        let lookup = |key: &str| env.get(key).map(|v| v.to_string());

        let config = resolve(Path::new("/cwd"), None, None, lookup);
        assert_eq!(config.root, PathBuf::from("/from/env"));
        assert_eq!(config.model.model, "gpt-test");
        assert_eq!(config.model.api_key.as_deref(), Some("sk-123"));

        let config = resolve(Path::new("/cwd"), Some(PathBuf::from("/flag")), None, lookup);
        assert_eq!(config.root, PathBuf::from("/flag"));
    }

    #[test]
    fn test_image_url() {
        let mut config = SiteConfig::for_root("/site");
        assert_eq!(
            config.image_url("title-a.png"),
            "static/images/article-images/title-a.png"
        );

        config.image_url_prefix = "/img/".to_string();
        assert_eq!(config.image_url("a.png"), "/img/a.png");

        config.image_url_prefix = String::new();
        assert_eq!(config.image_url("a.png"), "a.png");
    }

    #[test]
    fn test_model_settings_debug_redacts_key() {
        let settings = ModelSettings {
            api_key: Some("sk-secret".to_string()),
            ..ModelSettings::default()
        };
        let debug = format!("{:?}", settings);
        assert!(!debug.contains("sk-secret"));
    }

    #[test]
    fn test_resolve_relative_path() {
        let base = PathBuf::from("/home/user/site");

        assert_eq!(
            resolve_path(&base, "uploads"),
            PathBuf::from("/home/user/site/uploads")
        );
        assert_eq!(
            resolve_path(&base, "/absolute/path"),
            PathBuf::from("/absolute/path")
        );
    }
}
