//! Error types for the faculty directory pipeline.
//!
//! Library crates use [`FacultyDirError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.
//!
//! Two kinds matter to callers: [`FacultyDirError::FatalLoad`] aborts a run,
//! [`FacultyDirError::Extraction`] is recorded against a single faculty
//! record and the batch carries on. Use [`FacultyDirError::is_fatal`] rather
//! than inspecting messages.

use std::path::PathBuf;

/// Top-level error type for all faculty directory operations.
#[derive(Debug, thiserror::Error)]
pub enum FacultyDirError {
    /// A required input (HR set, inventory, scraped batch, roster) could not be
    /// located or parsed. Unrecoverable for the run.
    #[error("fatal load error at {path:?}: {message}")]
    FatalLoad { path: PathBuf, message: String },

    /// Website extraction failed for one faculty record.
    #[error("extraction failed: {0}")]
    Extraction(#[from] ExtractionFailure),

    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Network/HTTP error outside the per-record boundary (e.g. client setup).
    #[error("network error: {0}")]
    Network(String),

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Data validation error (bad shape, serialization failure, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },
}

/// Why extraction failed for a single faculty member.
///
/// The [`reason`](ExtractionFailure::reason) string is what lands in
/// `website_data.reason` of the enriched roster.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractionFailure {
    /// The record has no (or a blank) `website` field.
    #[error("no_website_url")]
    NoWebsiteUrl,

    /// The `website` field is not a usable URL.
    #[error("invalid website url: {0}")]
    InvalidUrl(String),

    /// Fetching the page failed (transport error, HTTP status, blocked host).
    #[error("{0}")]
    Fetch(String),
}

impl ExtractionFailure {
    /// Structured reason recorded in the roster.
    pub fn reason(&self) -> String {
        self.to_string()
    }
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, FacultyDirError>;

impl FacultyDirError {
    /// Create a fatal load error for an input file.
    pub fn fatal_load(path: impl Into<PathBuf>, msg: impl Into<String>) -> Self {
        Self::FatalLoad {
            path: path.into(),
            message: msg.into(),
        }
    }

    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error must abort the whole run.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::Extraction(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = FacultyDirError::config("bad pacing value");
        assert_eq!(err.to_string(), "config error: bad pacing value");

        let err = FacultyDirError::fatal_load("data/faculty_from_fis.json", "not found");
        assert!(err.to_string().contains("faculty_from_fis.json"));
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn fatal_and_per_record_are_distinguishable() {
        let fatal = FacultyDirError::fatal_load("hr.json", "missing");
        let per_record = FacultyDirError::from(ExtractionFailure::NoWebsiteUrl);
        assert!(fatal.is_fatal());
        assert!(!per_record.is_fatal());
    }

    #[test]
    fn extraction_reasons() {
        assert_eq!(ExtractionFailure::NoWebsiteUrl.reason(), "no_website_url");
        assert_eq!(
            ExtractionFailure::Fetch("https://x.edu/: HTTP 404 Not Found".into()).reason(),
            "https://x.edu/: HTTP 404 Not Found"
        );
        assert!(
            ExtractionFailure::InvalidUrl("not a url".into())
                .reason()
                .starts_with("invalid website url")
        );
    }
}
