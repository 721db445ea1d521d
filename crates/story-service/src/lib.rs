//! Story file operations
//!
//! [`StoryService`] reads one markdown story file, asks a
//! [`CompletionService`](story_llm::CompletionService) to classify,
//! summarize or propose stories, and writes the file back. Every operation
//! parses the file fresh and serializes the whole document on write.
//!
//! [`RemoteProjects`] talks to the project server over HTTP.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use story_llm::OpenAiClient;
//! use story_service::StoryService;
//!
//! let llm = Arc::new(OpenAiClient::from_env()?);
//! let service = StoryService::new("userstories.md", llm);
//!
//! let story = service.add_story("As a user I can export my data").await?;
//! println!("{} [Category: {}]", story.description, story.category);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod error;
mod file;
mod prompts;
pub mod remote;
pub mod service;

pub use error::ServiceError;
pub use remote::{RemoteConfig, RemoteError, RemoteProjects};
pub use service::{
    CategorizeReport, GenerateReport, ListReport, StoryService, DEFAULT_STORY_FILE, PROJECT_ID_KEY,
    PROJECT_NAME_KEY,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
