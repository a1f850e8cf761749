//! Finds the newest upload waiting to be processed.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use glob::{glob_with, MatchOptions, Pattern};
use tracing::{debug, warn};

use crate::domain::UploadedAsset;

/// Scans an upload directory for the most recently created file
#[derive(Debug, Clone)]
pub struct AssetLocator {
    upload_dir: PathBuf,
}

impl AssetLocator {
    pub fn new(upload_dir: impl Into<PathBuf>) -> Self {
        Self {
            upload_dir: upload_dir.into(),
        }
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    /// Return the newest file, or `None` if the directory is empty or missing.
    ///
    /// Hidden files and subdirectories are ignored. When two files share a
    /// timestamp, whichever sorts last in the scan wins.
    pub fn newest(&self) -> Option<UploadedAsset> {
        newest_of(self.candidates())
    }

    /// All files in the upload directory with their creation times
    pub fn candidates(&self) -> Vec<UploadedAsset> {
        let pattern = format!(
            "{}/*",
            Pattern::escape(&self.upload_dir.to_string_lossy())
        );
        let options = MatchOptions {
            require_literal_leading_dot: true,
            ..MatchOptions::new()
        };

        let paths = match glob_with(&pattern, options) {
            Ok(paths) => paths,
            Err(e) => {
                warn!("Invalid upload pattern {}: {}", pattern, e);
                return Vec::new();
            }
        };

        let mut assets = Vec::new();
        for entry in paths {
            let path = match entry {
                Ok(path) => path,
                Err(e) => {
                    warn!("Skipping unreadable upload entry: {}", e);
                    continue;
                }
            };

            let metadata = match std::fs::metadata(&path) {
                Ok(m) => m,
                Err(_) => continue,
            };

            if !metadata.is_file() {
                continue;
            }

            let created_at = metadata
                .created()
                .or_else(|_| metadata.modified())
                .unwrap_or(SystemTime::UNIX_EPOCH);

            debug!(path = %path.display(), "Upload candidate");
            assets.push(UploadedAsset::new(path, created_at));
        }

        assets
    }
}

/// Pick the asset with the latest creation time
pub fn newest_of(assets: Vec<UploadedAsset>) -> Option<UploadedAsset> {
    assets.into_iter().max_by_key(|a| a.created_at)
}
