//! Testing utilities for the Storyline workspace
//!
//! Shared fixtures and a scripted completion service.

#![allow(missing_docs)]

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use story_llm::{CompletionRequest, CompletionService, GenerationError, StructuredRequest};
use story_model::{Project, ProjectId, Story};

/// Story file with metadata, summary and two groups
pub const SAMPLE_MARKDOWN: &str = "\
---
project_name: Portal
---
# Summary
A customer portal.

**Auth**
- As a user I log in [Category: Auth]
- As a user I reset my password [Category: Auth]

**Billing**
- As a user I download invoices [Category: Billing]

";

pub fn story(description: &str, category: &str) -> Story {
    Story::new(description, category)
}

pub fn sample_stories() -> Vec<Story> {
    vec![
        story("As a user I log in", "Auth"),
        story("As a user I reset my password", "Auth"),
        story("As a user I download invoices", "Billing"),
    ]
}

pub fn sample_project(id: &str) -> Project {
    Project::new(ProjectId::from(id), format!("Project {id}"))
        .with_summary("A sample project")
        .with_records(sample_stories())
}

/// Request seen by [`ScriptedCompletion`]
#[derive(Debug, Clone, PartialEq)]
pub enum Recorded {
    Plain(CompletionRequest),
    Structured(StructuredRequest),
}

impl Recorded {
    pub fn completion(&self) -> &CompletionRequest {
        match self {
            Self::Plain(request) => request,
            Self::Structured(request) => &request.completion,
        }
    }
}

/// Completion service replaying queued responses in order
///
/// Plain and structured calls draw from the same queue. An exhausted queue
/// answers with `GenerationError::EmptyResponse`.
#[derive(Debug, Default)]
pub struct ScriptedCompletion {
    responses: Mutex<VecDeque<Result<String, GenerationError>>>,
    requests: Mutex<Vec<Recorded>>,
}

impl ScriptedCompletion {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, text: impl Into<String>) -> Self {
        self.responses.lock().push_back(Ok(text.into()));
        self
    }

    pub fn fail(self, error: GenerationError) -> Self {
        self.responses.lock().push_back(Err(error));
        self
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().clone()
    }

    pub fn remaining(&self) -> usize {
        self.responses.lock().len()
    }

    fn next(&self) -> Result<String, GenerationError> {
        self.responses
            .lock()
            .pop_front()
            .unwrap_or(Err(GenerationError::EmptyResponse))
    }
}

#[async_trait]
impl CompletionService for ScriptedCompletion {
    async fn complete(&self, request: CompletionRequest) -> Result<String, GenerationError> {
        self.requests.lock().push(Recorded::Plain(request));
        self.next()
    }

    async fn complete_structured(
        &self,
        request: StructuredRequest,
    ) -> Result<String, GenerationError> {
        self.requests.lock().push(Recorded::Structured(request));
        self.next()
    }
}
