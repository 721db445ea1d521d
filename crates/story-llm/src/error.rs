//! Generation errors

/// Errors from the text-generation collaborator
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// No API key configured
    #[error("API key not configured (set OPENAI_API_KEY)")]
    NoApiKey,

    /// Transport failure
    #[error("network error: {0}")]
    Network(String),

    /// Non-success HTTP status
    #[error("API error (status {status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body
        message: String,
    },

    /// Response body could not be decoded
    #[error("failed to parse response: {0}")]
    Parse(String),

    /// Response contained no generated text
    #[error("response contained no choices")]
    EmptyResponse,

    /// Invalid request or schema
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_display() {
        let err = GenerationError::Api {
            status: 429,
            message: "slow down".to_string(),
        };
        assert_eq!(err.to_string(), "API error (status 429): slow down");
    }
}
