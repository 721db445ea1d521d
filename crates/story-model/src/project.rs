//! Projects (named story collections)

use crate::story::Story;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Project identifier, the store's primary key
///
/// Supplied by callers; the store rejects empty identifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(String);

impl ProjectId {
    /// Generate new random identifier
    #[inline]
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Borrow as string slice
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the identifier is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for ProjectId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for ProjectId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl std::fmt::Display for ProjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A named collection of stories as kept server-side
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Primary key
    #[serde(rename = "identifier")]
    pub id: ProjectId,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Free-text project summary
    #[serde(default)]
    pub summary: String,
    /// Stories, in submission order
    #[serde(default)]
    pub records: Vec<Story>,
}

impl Project {
    /// Create empty project
    #[inline]
    #[must_use]
    pub fn new(id: ProjectId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            summary: String::new(),
            records: Vec::new(),
        }
    }

    /// With summary
    #[inline]
    #[must_use]
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    /// With stories
    #[inline]
    #[must_use]
    pub fn with_records(mut self, records: Vec<Story>) -> Self {
        self.records = records;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_field_names() {
        let project = Project::new(ProjectId::from("p-1"), "Portal")
            .with_summary("A portal")
            .with_records(vec![Story::new("log in", "Auth")]);

        let json = serde_json::to_value(&project).unwrap();
        assert_eq!(json["identifier"], "p-1");
        assert_eq!(json["name"], "Portal");
        assert_eq!(json["summary"], "A portal");
        assert_eq!(json["records"][0]["category"], "Auth");
    }

    #[test]
    fn missing_optional_fields_default() {
        let project: Project = serde_json::from_str(r#"{"identifier":"p-2"}"#).unwrap();
        assert_eq!(project.id.as_str(), "p-2");
        assert!(project.name.is_empty());
        assert!(project.records.is_empty());
    }

    #[test]
    fn generated_ids_are_not_empty() {
        assert!(!ProjectId::generate().is_empty());
        assert!(ProjectId::default().is_empty());
    }
}
