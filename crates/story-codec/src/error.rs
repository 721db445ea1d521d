//! Codec errors
//!
//! Story lines never fail to parse; only the metadata block can.

/// Errors while reading a story document
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// Metadata block content is not a YAML mapping
    #[error("metadata syntax error in block opened at line {line}: {message}")]
    MetadataSyntax {
        /// Line of the opening delimiter (1-based)
        line: usize,
        /// Decoder message
        message: String,
    },

    /// Metadata block opened but never closed
    #[error("metadata block opened at line {line} is never closed")]
    UnclosedMetadata {
        /// Line of the opening delimiter (1-based)
        line: usize,
    },
}

impl ParseError {
    /// Create metadata syntax error
    pub fn metadata_syntax(line: usize, message: impl Into<String>) -> Self {
        Self::MetadataSyntax {
            line,
            message: message.into(),
        }
    }
}

/// Errors while writing a story document
#[derive(Debug, thiserror::Error)]
pub enum SerializeError {
    /// Metadata could not be encoded as YAML
    #[error("metadata encoding failed: {0}")]
    Metadata(#[from] serde_yaml::Error),

    /// Writing into the output buffer failed
    #[error("format error: {0}")]
    Format(#[from] std::fmt::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_display() {
        let err = ParseError::UnclosedMetadata { line: 2 };
        assert_eq!(err.to_string(), "metadata block opened at line 2 is never closed");
    }

    #[test]
    fn metadata_syntax_display() {
        let err = ParseError::metadata_syntax(1, "expected a mapping");
        assert!(err.to_string().contains("line 1"));
        assert!(err.to_string().contains("expected a mapping"));
    }
}
