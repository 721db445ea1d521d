//! Story file operations

use crate::error::ServiceError;
use crate::file;
use crate::prompts;
use crate::remote::RemoteProjects;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use story_codec::Document;
use story_llm::{CompletionRequest, CompletionService, ModelTier, OutputSchema};
use story_model::{normalize_category, Project, ProjectId, Story, DEFAULT_CATEGORY};
use tracing::{debug, info, instrument, warn};

/// Default story file
pub const DEFAULT_STORY_FILE: &str = "userstories.md";

/// Metadata key holding the remote project identifier
pub const PROJECT_ID_KEY: &str = "project_id";

/// Metadata key holding the remote project name
pub const PROJECT_NAME_KEY: &str = "project_name";

/// Candidate labels for bulk classification
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
struct CategoryHints {
    /// List of possible categories for the user stories
    categories: Vec<String>,
}

/// Freshly proposed stories
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
struct GeneratedStories {
    /// A list of new user story descriptions
    new_user_stories: Vec<String>,
}

/// Outcome of [`StoryService::categorize_all`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategorizeReport {
    /// Labels suggested before classification (empty if that step failed)
    pub hints: Vec<String>,
    /// Stories in their new order
    pub stories: Vec<Story>,
    /// Stories that fell back to the default category after a failure
    pub failures: usize,
}

/// Outcome of [`StoryService::list`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListReport {
    /// Stories by category, labels ascending
    pub groups: BTreeMap<String, Vec<Story>>,
    /// Whether the file carries a summary
    pub has_summary: bool,
}

/// Outcome of [`StoryService::generate_stories`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateReport {
    /// Non-blank proposals offered for review
    pub proposed: usize,
    /// Accepted stories, as appended to the file
    pub added: Vec<Story>,
}

/// Operations on one story file
#[derive(Clone)]
pub struct StoryService {
    path: PathBuf,
    llm: Arc<dyn CompletionService>,
}

impl std::fmt::Debug for StoryService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoryService")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl StoryService {
    /// Create service for a story file
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, llm: Arc<dyn CompletionService>) -> Self {
        Self {
            path: path.into(),
            llm,
        }
    }

    /// Story file path
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the current document
    ///
    /// # Errors
    /// I/O and parse failures; a missing file is an empty document
    pub async fn document(&self) -> Result<Document, ServiceError> {
        file::load(&self.path).await
    }

    /// Classify and append one story
    ///
    /// # Errors
    /// - `ServiceError::EmptyStory` for a blank description
    /// - generation failures abort without touching the file
    #[instrument(skip(self, description))]
    pub async fn add_story(&self, description: &str) -> Result<Story, ServiceError> {
        let description = description.trim();
        if description.is_empty() {
            return Err(ServiceError::EmptyStory);
        }

        let mut doc = self.document().await?;
        let label = self.classify(prompts::CATEGORIZE, description).await?;
        let story = Story::new(description, &label);

        doc.records.push(story.clone());
        file::save(&self.path, &doc).await?;
        info!(category = %story.category, "story added");
        Ok(story)
    }

    /// Re-classify every story and sort by category
    ///
    /// Per-story failures fall back to the default category; the file is
    /// written regardless.
    ///
    /// # Errors
    /// I/O, parse and serialize failures
    #[instrument(skip(self))]
    pub async fn categorize_all(&self) -> Result<CategorizeReport, ServiceError> {
        let mut doc = self.document().await?;
        if doc.records.is_empty() {
            return Ok(CategorizeReport::default());
        }

        let hints = self.category_hints(&doc.records).await;
        let instruction = prompts::categorize_with_hints(&hints);

        let mut failures = 0;
        for story in &mut doc.records {
            match self.classify(&instruction, &story.description).await {
                Ok(label) => story.recategorize(&label),
                Err(e) => {
                    warn!(id = %story.id, error = %e, "classification failed, using default");
                    story.recategorize(DEFAULT_CATEGORY);
                    failures += 1;
                }
            }
        }
        doc.records.sort_by(|a, b| a.category.cmp(&b.category));

        file::save(&self.path, &doc).await?;
        info!(stories = doc.records.len(), failures, "stories categorized");
        Ok(CategorizeReport {
            hints,
            stories: doc.records,
            failures,
        })
    }

    /// Generate and store a project summary
    ///
    /// Returns `None` without calling the generator when there are no stories.
    ///
    /// # Errors
    /// Generation failures abort without touching the file
    #[instrument(skip(self))]
    pub async fn summarize(&self) -> Result<Option<String>, ServiceError> {
        let mut doc = self.document().await?;
        if doc.records.is_empty() {
            return Ok(None);
        }

        let descriptions = doc
            .records
            .iter()
            .map(|s| s.description.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");
        let summary = self
            .llm
            .complete(CompletionRequest::new(prompts::SUMMARIZE, descriptions))
            .await?
            .trim()
            .to_string();
        if summary.is_empty() {
            warn!("generated summary is empty");
        }

        doc.summary.clone_from(&summary);
        file::save(&self.path, &doc).await?;
        Ok(Some(summary))
    }

    /// Stories grouped by category, read in one pass over the file
    ///
    /// # Errors
    /// I/O and parse failures
    pub async fn list(&self) -> Result<ListReport, ServiceError> {
        let doc = self.document().await?;
        let groups = doc
            .grouped()
            .into_iter()
            .map(|(label, stories)| (label, stories.into_iter().cloned().collect()))
            .collect();
        Ok(ListReport {
            groups,
            has_summary: !doc.summary.is_empty(),
        })
    }

    /// Propose `count` new stories and append the accepted ones
    ///
    /// `review` sees each non-blank proposal and returns whether to keep it.
    /// The file is written only when at least one story was kept.
    ///
    /// # Errors
    /// Generation and decode failures of the proposal request abort
    #[instrument(skip(self, review))]
    pub async fn generate_stories<F>(
        &self,
        count: usize,
        mut review: F,
    ) -> Result<GenerateReport, ServiceError>
    where
        F: FnMut(&str) -> bool + Send,
    {
        let mut doc = self.document().await?;

        let context = if doc.records.is_empty() {
            prompts::NO_EXISTING_STORIES.to_string()
        } else {
            let mut context = String::from("Existing user stories for context:\n");
            for story in &doc.records {
                let _ = writeln!(context, "- {}", story.description);
            }
            context
        };

        let request = CompletionRequest::new(prompts::generate(count), context)
            .with_tier(ModelTier::ReasoningSimple);
        let generated: GeneratedStories = self
            .structured(
                request,
                "GenerateNewUserStories",
                "A list of newly generated user story descriptions.",
            )
            .await?;

        let mut report = GenerateReport::default();
        for proposal in generated.new_user_stories {
            let description = proposal.trim();
            if description.is_empty() {
                debug!("skipping blank proposal");
                continue;
            }
            report.proposed += 1;
            if !review(description) {
                continue;
            }

            let label = match self.classify(prompts::CATEGORIZE, description).await {
                Ok(label) => label,
                Err(e) => {
                    warn!(error = %e, "classification failed, using default");
                    DEFAULT_CATEGORY.to_string()
                }
            };
            let story = Story::new(description, &label);
            doc.records.push(story.clone());
            report.added.push(story);
        }

        if !report.added.is_empty() {
            file::save(&self.path, &doc).await?;
        }
        info!(proposed = report.proposed, added = report.added.len(), "stories generated");
        Ok(report)
    }

    /// Upload the file as a project and record its identity in metadata
    ///
    /// The identifier comes from the `project_id` metadata key. Without one a
    /// fresh identifier is generated and a name is required, taken from `name`
    /// or the `project_name` key. A given `name` always wins.
    ///
    /// # Errors
    /// - `ServiceError::MissingProjectName` when a new project has no name
    /// - remote failures leave the file untouched
    #[instrument(skip(self, remote))]
    pub async fn push_project(
        &self,
        remote: &RemoteProjects,
        name: Option<&str>,
    ) -> Result<Project, ServiceError> {
        let mut doc = self.document().await?;

        let name = name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .or_else(|| doc.metadata_str(PROJECT_NAME_KEY).map(str::trim))
            .unwrap_or_default()
            .to_string();
        let id = match doc.metadata_str(PROJECT_ID_KEY).map(str::trim) {
            Some(id) if !id.is_empty() => ProjectId::from(id),
            _ if name.is_empty() => return Err(ServiceError::MissingProjectName),
            _ => ProjectId::generate(),
        };

        let project = Project::new(id, name)
            .with_summary(doc.summary.clone())
            .with_records(doc.records.clone());
        remote.push(&project).await?;

        doc.set_metadata_str(PROJECT_ID_KEY, project.id.as_str());
        doc.set_metadata_str(PROJECT_NAME_KEY, project.name.as_str());
        file::save(&self.path, &doc).await?;
        info!(id = %project.id, "project pushed");
        Ok(project)
    }

    async fn classify(&self, instruction: &str, description: &str) -> Result<String, ServiceError> {
        let label = self
            .llm
            .complete(CompletionRequest::new(instruction, description))
            .await?;
        Ok(normalize_category(&label))
    }

    async fn category_hints(&self, stories: &[Story]) -> Vec<String> {
        let mut descriptions = String::new();
        for story in stories {
            descriptions.push_str(&story.description);
            descriptions.push('\n');
        }

        let request = CompletionRequest::new(prompts::CATEGORY_HINTS, descriptions);
        let hints: Result<CategoryHints, _> = self
            .structured(
                request,
                "GeneratePossibleCategories",
                "List of possible categories for the user stories",
            )
            .await;
        match hints {
            Ok(hints) => hints
                .categories
                .into_iter()
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty())
                .collect(),
            Err(e) => {
                warn!(error = %e, "could not generate category hints");
                Vec::new()
            }
        }
    }

    async fn structured<T>(
        &self,
        request: CompletionRequest,
        schema_name: &'static str,
        description: &str,
    ) -> Result<T, ServiceError>
    where
        T: DeserializeOwned + JsonSchema,
    {
        let schema = OutputSchema::for_type::<T>(schema_name, description)?;
        let raw = self.llm.complete_structured(request.structured(schema)).await?;
        serde_json::from_str(&raw).map_err(|e| ServiceError::Decode {
            schema: schema_name,
            message: e.to_string(),
        })
    }
}
