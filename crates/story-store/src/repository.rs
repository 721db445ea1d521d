//! Repository seam consumed by request layers

use crate::error::StoreError;
use crate::store::ProjectStore;
use story_model::{Project, ProjectId};

/// Project persistence operations
///
/// Implemented by [`ProjectStore`]; request handlers depend on this trait so
/// they can be exercised against any backing.
pub trait ProjectRepository: Send + Sync + 'static {
    /// Insert or replace a project
    fn upsert(&self, project: Project) -> Result<(), StoreError>;

    /// All projects, in no particular order
    fn list(&self) -> Result<Vec<Project>, StoreError>;

    /// One project by identifier
    fn get(&self, id: &ProjectId) -> Result<Project, StoreError>;
}

impl ProjectRepository for ProjectStore {
    fn upsert(&self, project: Project) -> Result<(), StoreError> {
        ProjectStore::upsert(self, project)
    }

    fn list(&self) -> Result<Vec<Project>, StoreError> {
        ProjectStore::list(self)
    }

    fn get(&self, id: &ProjectId) -> Result<Project, StoreError> {
        ProjectStore::get(self, id)
    }
}
