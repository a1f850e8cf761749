//! Pipeline error taxonomy.

use std::path::PathBuf;

use thiserror::Error;

/// Step of the pipeline that touched the filesystem
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Upload,
    Generate,
    Relocate,
    Render,
    Index,
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Step::Upload => write!(f, "upload"),
            Step::Generate => write!(f, "generate"),
            Step::Relocate => write!(f, "relocate"),
            Step::Render => write!(f, "render"),
            Step::Index => write!(f, "index"),
        }
    }
}

/// Errors that abort a pipeline run
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("No upload found in {0}")]
    NoUpload(PathBuf),

    #[error("Unsupported asset type '.{extension}': {}", path.display())]
    UnsupportedAsset { path: PathBuf, extension: String },

    #[error("Generation failed: {0:#}")]
    Generation(anyhow::Error),

    #[error("Failed to {step} {}: {source}", path.display())]
    Filesystem {
        step: Step,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Template error: {0}")]
    Template(String),

    #[error("Article index is corrupt ({}): {source}", path.display())]
    IndexCorrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl PipelineError {
    /// Build a filesystem error for a step
    pub fn fs(step: Step, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Filesystem {
            step,
            path: path.into(),
            source,
        }
    }

    /// Build a generation error from a message
    pub fn generation(message: impl std::fmt::Display) -> Self {
        Self::Generation(anyhow::anyhow!("{}", message))
    }

    /// True for outcomes that end the run without doing anything
    pub fn is_noop(&self) -> bool {
        matches!(self, Self::NoUpload(_) | Self::UnsupportedAsset { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noop_classification() {
        assert!(PipelineError::NoUpload(PathBuf::from("uploads")).is_noop());
        assert!(PipelineError::UnsupportedAsset {
            path: PathBuf::from("uploads/a.gif"),
            extension: "gif".to_string(),
        }
        .is_noop());
        assert!(!PipelineError::generation("empty response").is_noop());
    }

    #[test]
    fn test_filesystem_message_names_step_and_path() {
        let err = PipelineError::fs(
            Step::Render,
            "articles/a.html",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        let msg = err.to_string();
        assert!(msg.contains("render"));
        assert!(msg.contains("articles/a.html"));
        assert!(msg.contains("denied"));
    }
}
