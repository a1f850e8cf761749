//! Uploaded assets awaiting processing.

use std::path::PathBuf;
use std::time::SystemTime;

/// Kind of upload, decided by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    /// Photo sent to the model's vision endpoint
    Image,

    /// Plain-text note embedded in a prompt
    Text,

    /// Anything else; produces no article
    Unsupported,
}

impl AssetKind {
    /// Classify an extension (case-insensitive, without the dot)
    pub fn from_extension(extension: &str) -> Self {
        match extension.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" | "png" => Self::Image,
            "txt" => Self::Text,
            _ => Self::Unsupported,
        }
    }
}

impl std::fmt::Display for AssetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssetKind::Image => write!(f, "image"),
            AssetKind::Text => write!(f, "text"),
            AssetKind::Unsupported => write!(f, "unsupported"),
        }
    }
}

/// A file found in the upload directory
#[derive(Debug, Clone)]
pub struct UploadedAsset {
    /// Full path to the upload
    pub path: PathBuf,

    /// Creation time (falls back to modification time where unsupported)
    pub created_at: SystemTime,

    /// Lower-cased extension, empty when the file has none
    pub extension: String,
}

impl UploadedAsset {
    pub fn new(path: PathBuf, created_at: SystemTime) -> Self {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .unwrap_or_default();

        Self {
            path,
            created_at,
            extension,
        }
    }

    pub fn kind(&self) -> AssetKind {
        AssetKind::from_extension(&self.extension)
    }

    /// File name of the upload, for log messages
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string()
    }

    /// Mime type for image uploads
    pub fn mime_type(&self) -> Option<&'static str> {
        mime_for_extension(&self.extension)
    }
}

/// Mime type sent with image requests
pub fn mime_for_extension(extension: &str) -> Option<&'static str> {
    match extension {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_dispatch() {
        assert_eq!(AssetKind::from_extension("png"), AssetKind::Image);
        assert_eq!(AssetKind::from_extension("JPEG"), AssetKind::Image);
        assert_eq!(AssetKind::from_extension("jpg"), AssetKind::Image);
        assert_eq!(AssetKind::from_extension("txt"), AssetKind::Text);
        assert_eq!(AssetKind::from_extension("gif"), AssetKind::Unsupported);
        assert_eq!(AssetKind::from_extension(""), AssetKind::Unsupported);
    }

    #[test]
    fn test_asset_extension_is_lowercased() {
        let asset = UploadedAsset::new(PathBuf::from("/up/Photo.JPG"), SystemTime::now());
        assert_eq!(asset.extension, "jpg");
        assert_eq!(asset.kind(), AssetKind::Image);
        assert_eq!(asset.mime_type(), Some("image/jpeg"));
        assert_eq!(asset.file_name(), "Photo.JPG");
    }

    #[test]
    fn test_asset_without_extension() {
        let asset = UploadedAsset::new(PathBuf::from("/up/README"), SystemTime::now());
        assert_eq!(asset.extension, "");
        assert_eq!(asset.kind(), AssetKind::Unsupported);
        assert_eq!(asset.mime_type(), None);
    }
}
