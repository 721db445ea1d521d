//! Project server client

use serde::de::DeserializeOwned;
use std::time::Duration;
use story_model::{Project, ProjectId};
use tracing::{debug, instrument};

/// Default project server address
pub const DEFAULT_API_HOST: &str = "http://localhost:3000";

const PROJECTS_PATH: &str = "/api/projects";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors from the project server client
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    /// Transport failure
    #[error("network error: {0}")]
    Network(String),

    /// Project does not exist on the server
    #[error("project not found: {0}")]
    NotFound(ProjectId),

    /// Non-success HTTP status
    #[error("server error (status {status}): {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body
        message: String,
    },

    /// Response body could not be decoded
    #[error("failed to parse response: {0}")]
    Parse(String),
}

impl RemoteError {
    /// True for a missing project
    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Project server client configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteConfig {
    /// Scheme, host and port of the server
    pub api_host: String,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            api_host: DEFAULT_API_HOST.to_string(),
        }
    }
}

impl RemoteConfig {
    /// Config for a host
    #[inline]
    #[must_use]
    pub fn new(api_host: impl Into<String>) -> Self {
        Self {
            api_host: api_host.into(),
        }
    }

    /// Read `API_HOST`
    #[must_use]
    pub fn from_env() -> Self {
        std::env::var("API_HOST")
            .ok()
            .filter(|h| !h.trim().is_empty())
            .map_or_else(Self::default, Self::new)
    }

    fn projects_url(&self) -> String {
        format!("{}{PROJECTS_PATH}", self.api_host.trim_end_matches('/'))
    }
}

/// HTTP client for `/api/projects`
#[derive(Debug, Clone)]
pub struct RemoteProjects {
    client: reqwest::Client,
    projects_url: String,
}

impl RemoteProjects {
    /// Create client
    ///
    /// # Errors
    /// - `RemoteError::Network` if the HTTP client cannot be built
    pub fn new(config: &RemoteConfig) -> Result<Self, RemoteError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| RemoteError::Network(e.to_string()))?;
        Ok(Self {
            client,
            projects_url: config.projects_url(),
        })
    }

    /// Upload a project, replacing any with the same identifier
    ///
    /// # Errors
    /// Transport failures and non-2xx statuses
    #[instrument(skip(self, project), fields(id = %project.id))]
    pub async fn push(&self, project: &Project) -> Result<(), RemoteError> {
        let response = self
            .client
            .post(&self.projects_url)
            .json(project)
            .send()
            .await
            .map_err(|e| RemoteError::Network(e.to_string()))?;
        check_status(response).await?;
        debug!("project pushed");
        Ok(())
    }

    /// All projects on the server
    ///
    /// # Errors
    /// Transport failures, non-2xx statuses and undecodable bodies
    pub async fn list(&self) -> Result<Vec<Project>, RemoteError> {
        self.fetch(&self.projects_url).await
    }

    /// One project by identifier
    ///
    /// The identifier is sent as a single percent-encoded path segment.
    ///
    /// # Errors
    /// - `RemoteError::NotFound` on 404
    /// - `RemoteError::Network` if the server address is not a usable base URL
    /// - transport failures, other non-2xx statuses and undecodable bodies
    pub async fn get(&self, id: &ProjectId) -> Result<Project, RemoteError> {
        let url = self.project_url(id)?;
        self.fetch(url).await.map_err(|e| match e {
            RemoteError::Status { status: 404, .. } => RemoteError::NotFound(id.clone()),
            other => other,
        })
    }

    fn project_url(&self, id: &ProjectId) -> Result<reqwest::Url, RemoteError> {
        let mut url = reqwest::Url::parse(&self.projects_url)
            .map_err(|e| RemoteError::Network(format!("invalid server address: {e}")))?;
        url.path_segments_mut()
            .map_err(|()| RemoteError::Network(format!("cannot extend {}", self.projects_url)))?
            .push(id.as_str());
        Ok(url)
    }

    async fn fetch<T, U>(&self, url: U) -> Result<T, RemoteError>
    where
        T: DeserializeOwned,
        U: reqwest::IntoUrl,
    {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| RemoteError::Network(e.to_string()))?;
        check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| RemoteError::Parse(e.to_string()))
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, RemoteError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    Err(RemoteError::Status {
        status: status.as_u16(),
        message: if message.is_empty() {
            status.canonical_reason().unwrap_or("unknown status").to_string()
        } else {
            message
        },
    })
}
