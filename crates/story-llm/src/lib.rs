//! Text-generation collaborator
//!
//! Story classification, summarization and generation go through the
//! [`CompletionService`] trait:
//!
//! - [`CompletionService::complete`]: system instruction + user text → text
//! - [`CompletionService::complete_structured`]: same, constrained to a named
//!   JSON schema ([`OutputSchema`])
//!
//! [`OpenAiClient`] implements it against an OpenAI-compatible chat
//! completions endpoint. Failures surface as [`GenerationError`]; nothing here
//! retries.

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod error;
pub mod openai;
pub mod request;
pub mod service;

pub use error::GenerationError;
pub use openai::{LlmConfig, OpenAiClient};
pub use request::{CompletionRequest, ModelTier, OutputSchema, StructuredRequest};
pub use service::CompletionService;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
