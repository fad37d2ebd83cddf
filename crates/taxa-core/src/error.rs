use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TaxaError {
    #[error("Validation failed: {message}")]
    Validation { message: String },

    #[error("Slug already in use: {slug}")]
    SlugConflict { slug: String },

    #[error("Category has {children} child(ren) and cannot be deleted: {id}")]
    HasChildren { id: String, children: usize },

    #[error("Category not found: {id}")]
    NotFound { id: String },

    #[error("Parent category not found: {id}")]
    ParentNotFound { id: String },

    #[error("No category matches slug path: {path}")]
    PathNotFound { path: String },

    #[error("Category store unavailable: {message}")]
    StoreUnavailable { message: String },

    #[error("Cascade aborted on {} node(s), first failure: {}", .failed.len(), first_failed(.failed))]
    PartialCascade {
        /// Ids whose ancestor caches were rewritten before/around the failure
        updated: Vec<String>,
        /// Ids whose branch aborted (children not visited)
        failed: Vec<String>,
    },

    #[error("Failed to parse config {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    #[error("Unknown config key: {key}")]
    ConfigKeyNotFound { key: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn first_failed(failed: &[String]) -> &str {
    failed.first().map(String::as_str).unwrap_or("<none>")
}

pub type Result<T> = std::result::Result<T, TaxaError>;

impl TaxaError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Validation { .. } => 2,
            Self::SlugConflict { .. } | Self::HasChildren { .. } => 3,
            Self::NotFound { .. } | Self::ParentNotFound { .. } | Self::PathNotFound { .. } => 4,
            Self::PartialCascade { .. } => 5,
            Self::ConfigKeyNotFound { .. } | Self::ConfigParse { .. } => 6,
            _ => 1,
        }
    }

    /// Shorthand for a validation failure
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}
