//! Route filters and handlers

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::sync::Arc;
use story_model::{Project, ProjectId};
use story_store::{ProjectRepository, StoreError};
use tracing::{debug, error};
use warp::http::StatusCode;
use warp::reply::Response;
use warp::{Filter, Rejection, Reply};

/// Largest accepted request body
const MAX_BODY_BYTES: u64 = 4 * 1024 * 1024;

/// JSON failure body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Short description
    pub error: String,
    /// Underlying cause
    pub details: String,
}

impl ErrorBody {
    fn reply(status: StatusCode, error: &str, details: impl ToString) -> Response {
        let body = Self {
            error: error.to_string(),
            details: details.to_string(),
        };
        warp::reply::with_status(warp::reply::json(&body), status).into_response()
    }
}

/// All project routes, with rejections turned into JSON errors
pub fn routes(
    repo: Arc<dyn ProjectRepository>,
) -> impl Filter<Extract = (impl Reply,), Error = Infallible> + Clone {
    let create = warp::post()
        .and(warp::path!("api" / "projects"))
        .and(warp::body::content_length_limit(MAX_BODY_BYTES))
        .and(warp::body::bytes())
        .and(with_repo(repo.clone()))
        .map(|body: warp::hyper::body::Bytes, repo: Arc<dyn ProjectRepository>| {
            create_project(&body, &*repo)
        });

    let list = warp::get()
        .and(warp::path!("api" / "projects"))
        .and(with_repo(repo.clone()))
        .map(|repo: Arc<dyn ProjectRepository>| list_projects(&*repo));

    let get = warp::get()
        .and(warp::path!("api" / "projects" / String))
        .and(with_repo(repo))
        .map(|id: String, repo: Arc<dyn ProjectRepository>| get_project(&id, &*repo));

    create
        .or(list)
        .unify()
        .or(get)
        .unify()
        .recover(handle_rejection)
        .with(warp::trace::request())
}

fn with_repo(
    repo: Arc<dyn ProjectRepository>,
) -> impl Filter<Extract = (Arc<dyn ProjectRepository>,), Error = Infallible> + Clone {
    warp::any().map(move || repo.clone())
}

fn create_project(body: &[u8], repo: &dyn ProjectRepository) -> Response {
    let project: Project = match serde_json::from_slice(body) {
        Ok(project) => project,
        Err(e) => return ErrorBody::reply(StatusCode::BAD_REQUEST, "cannot parse JSON", e),
    };

    match repo.upsert(project.clone()) {
        Ok(()) => {
            debug!(id = %project.id, records = project.records.len(), "project stored");
            warp::reply::with_status(warp::reply::json(&project), StatusCode::CREATED)
                .into_response()
        }
        Err(e @ StoreError::InvalidProject) => {
            ErrorBody::reply(StatusCode::BAD_REQUEST, "invalid project", e)
        }
        Err(e) => {
            error!(error = %e, "failed to store project");
            ErrorBody::reply(StatusCode::INTERNAL_SERVER_ERROR, "failed to store project", e)
        }
    }
}

fn list_projects(repo: &dyn ProjectRepository) -> Response {
    match repo.list() {
        Ok(projects) => warp::reply::json(&projects).into_response(),
        Err(e) => {
            error!(error = %e, "failed to list projects");
            ErrorBody::reply(StatusCode::INTERNAL_SERVER_ERROR, "failed to get projects", e)
        }
    }
}

fn get_project(id: &str, repo: &dyn ProjectRepository) -> Response {
    match repo.get(&ProjectId::from(id)) {
        Ok(project) => warp::reply::json(&project).into_response(),
        Err(e) if e.is_not_found() => ErrorBody::reply(StatusCode::NOT_FOUND, "project not found", e),
        Err(e) => {
            error!(error = %e, id, "failed to get project");
            ErrorBody::reply(
                StatusCode::INTERNAL_SERVER_ERROR,
                "failed to get project by ID",
                e,
            )
        }
    }
}

async fn handle_rejection(rejection: Rejection) -> Result<Response, Infallible> {
    let response = if rejection.is_not_found() {
        ErrorBody::reply(StatusCode::NOT_FOUND, "not found", "no such route")
    } else if let Some(e) = rejection.find::<warp::reject::PayloadTooLarge>() {
        ErrorBody::reply(StatusCode::PAYLOAD_TOO_LARGE, "payload too large", e)
    } else if let Some(e) = rejection.find::<warp::reject::MethodNotAllowed>() {
        ErrorBody::reply(StatusCode::METHOD_NOT_ALLOWED, "method not allowed", e)
    } else {
        error!(?rejection, "unhandled rejection");
        ErrorBody::reply(
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal error",
            format!("{rejection:?}"),
        )
    };
    Ok(response)
}
