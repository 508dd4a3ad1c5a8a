//! Error types for LessonForge.
//!
//! Library crates use [`LessonForgeError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all LessonForge operations.
#[derive(Debug, thiserror::Error)]
pub enum LessonForgeError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// A referenced content file is absent from the repository.
    #[error("not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// A content file exists but cannot be decoded into its expected shape.
    #[error("parse error in {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    /// Data validation error (bad identifier, path escaping a root, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Exercise resolution aborted by a lower-level fault.
    #[error("failed to resolve {exercise}: {source}")]
    Resolution {
        exercise: String,
        #[source]
        source: Box<LessonForgeError>,
    },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, LessonForgeError>;

impl LessonForgeError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a not-found error for a content path.
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::NotFound { path: path.into() }
    }

    /// Create a parse error for a content path.
    pub fn parse(path: impl Into<PathBuf>, msg: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
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

    /// Wrap a lower-level fault that aborted the resolution of `exercise`.
    pub fn resolution(exercise: impl Into<String>, source: LessonForgeError) -> Self {
        Self::Resolution {
            exercise: exercise.into(),
            source: Box::new(source),
        }
    }
}
