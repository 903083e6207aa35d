//! Error types for gradebook fetching, analytics input and report export.

use std::path::PathBuf;

/// Errors produced by the gradebook library.
#[derive(thiserror::Error, Debug)]
pub enum GradebookError {
    /// Transport-level failure talking to the course/grade service.
    #[error("Request to {url} failed: {source}")]
    Http {
        /// Requested URL
        url: String,
        /// Underlying client error
        #[source]
        source: reqwest::Error,
    },

    /// The service answered with a non-success status.
    #[error("Failed to fetch course {resource}: {status}")]
    Status {
        /// Which resource was requested (`activities` or `gradebook`)
        resource: &'static str,
        /// Status line, e.g. `404 Not Found`
        status: String,
    },

    /// Gradebook JSON could not be decoded.
    #[error("Invalid gradebook data: {0}")]
    Json(#[from] serde_json::Error),

    /// File system failure.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// Path being read or written
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// CSV writer failure.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Chart rasterisation failure.
    #[error("Chart rendering failed: {0}")]
    Chart(String),

    /// Report rendering or conversion failure.
    #[error("Report rendering failed: {0}")]
    Render(String),

    /// Invalid configuration value.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Unknown report format name.
    #[error("Unknown report format: {0}")]
    InvalidFormat(String),
}

impl GradebookError {
    /// Wrap an I/O error with the path it occurred on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, GradebookError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_message_matches_service_wording() {
        let err = GradebookError::Status {
            resource: "gradebook",
            status: "404 Not Found".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to fetch course gradebook: 404 Not Found"
        );
    }

    #[test]
    fn test_io_helper_keeps_path() {
        let err = GradebookError::io(
            "/tmp/missing.json",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(err.to_string().contains("/tmp/missing.json"));
    }
}
