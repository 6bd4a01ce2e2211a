//! Error types for layout decoding

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while decoding a layout description
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Layout bytes are not valid UTF-8
    #[error("layout is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// Malformed TOML or a field outside the layout schema
    #[error("invalid layout: {0}")]
    Toml(#[from] toml::de::Error),

    /// Layout file could not be read
    #[error("failed to read layout file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A required field was present but empty
    #[error("empty '{field}' at {path}")]
    EmptyField { field: &'static str, path: String },
}

impl DecodeError {
    /// Create an empty field error
    pub fn empty(field: &'static str, path: impl Into<String>) -> Self {
        Self::EmptyField {
            field,
            path: path.into(),
        }
    }
}
