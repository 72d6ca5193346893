use std::path::{Path, PathBuf};

/// Convenience result type used across the crate.
pub type RasterResult<T> = Result<T, RasterError>;

/// Top-level error taxonomy.
///
/// `Parse` is the only per-record, non-fatal kind: batch conversion skips the record and keeps
/// going. `Io` is fatal for the source it happened in.
#[derive(thiserror::Error, Debug)]
pub enum RasterError {
    /// Invalid configuration or corpus layout.
    #[error("validation error: {0}")]
    Validation(String),

    /// A sketch record could not be decoded.
    #[error("parse error: {0}")]
    Parse(String),

    /// Reading a source or writing an output failed.
    #[error("io error at '{}': {}", .path.display(), .source)]
    Io {
        /// File or directory the operation touched.
        path: PathBuf,
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
    },

    /// An image could not be encoded.
    #[error("encode error: {0}")]
    Encode(String),

    /// Wrapped lower-level error from dependencies.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RasterError {
    /// Build a [`RasterError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`RasterError::Parse`] value.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Build a [`RasterError::Io`] value for `path`.
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Build a [`RasterError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Return `true` for errors that only invalidate a single record.
    pub fn is_skippable(&self) -> bool {
        matches!(self, Self::Parse(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
