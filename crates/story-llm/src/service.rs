//! Completion service trait

use crate::error::GenerationError;
use crate::request::{CompletionRequest, StructuredRequest};
use async_trait::async_trait;

/// Text-generation collaborator
///
/// Implementations are shared across tasks behind an `Arc<dyn CompletionService>`.
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Free-form completion
    ///
    /// # Errors
    /// Transport, status and decoding failures
    async fn complete(&self, request: CompletionRequest) -> Result<String, GenerationError>;

    /// Completion constrained to the request schema
    ///
    /// Returns the raw JSON text; callers decode it into their own type.
    ///
    /// # Errors
    /// Transport, status and decoding failures
    async fn complete_structured(
        &self,
        request: StructuredRequest,
    ) -> Result<String, GenerationError>;
}
