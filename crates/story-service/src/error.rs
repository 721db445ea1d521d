//! Service errors

use crate::remote::RemoteError;
use std::path::PathBuf;
use story_codec::{ParseError, SerializeError};
use story_llm::GenerationError;

/// Errors from story file operations
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Story file could not be read or written
    #[error("I/O error on {path}: {source}")]
    Io {
        /// File involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Story file is malformed
    #[error("could not parse story file: {0}")]
    Parse(#[from] ParseError),

    /// Document could not be encoded
    #[error("could not serialize story file: {0}")]
    Serialize(#[from] SerializeError),

    /// Text generation failed
    #[error("text generation failed: {0}")]
    Generation(#[from] GenerationError),

    /// Structured response did not match its schema
    #[error("unexpected {schema} response: {message}")]
    Decode {
        /// Schema name
        schema: &'static str,
        /// Decoder message
        message: String,
    },

    /// Story description is empty
    #[error("story description cannot be empty")]
    EmptyStory,

    /// Project has neither identifier nor name
    #[error("project name cannot be empty")]
    MissingProjectName,

    /// Remote project server call failed
    #[error(transparent)]
    Remote(#[from] RemoteError),
}

impl ServiceError {
    /// Create I/O error
    #[inline]
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// True if the text-generation collaborator caused the failure
    #[must_use]
    pub fn is_generation(&self) -> bool {
        matches!(self, Self::Generation(_) | Self::Decode { .. })
    }
}
