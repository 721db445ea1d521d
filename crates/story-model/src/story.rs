//! User stories

use crate::category::normalize_category;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque story identifier
///
/// Assigned once when a story is created and never reassigned. The markdown
/// format does not carry identifiers, so every parse mints fresh ones.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoryId(String);

impl StoryId {
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
}

impl Default for StoryId {
    fn default() -> Self {
        Self::generate()
    }
}

impl From<String> for StoryId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for StoryId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl std::fmt::Display for StoryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single user story
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Story {
    /// Unique identifier
    #[serde(rename = "identifier")]
    pub id: StoryId,
    /// Free text, the semantic payload
    pub description: String,
    /// Category label (never empty once constructed through [`Story::new`])
    pub category: String,
}

impl Story {
    /// Create story with a fresh identifier
    ///
    /// The category is normalized, so an empty label becomes the default.
    #[must_use]
    pub fn new(description: impl Into<String>, category: &str) -> Self {
        Self::with_id(StoryId::generate(), description, category)
    }

    /// Create story with a known identifier
    #[must_use]
    pub fn with_id(id: StoryId, description: impl Into<String>, category: &str) -> Self {
        Self {
            id,
            description: description.into(),
            category: normalize_category(category),
        }
    }

    /// Overwrite the category after re-classification
    pub fn recategorize(&mut self, label: &str) {
        self.category = normalize_category(label);
    }

    /// Category as it is grouped on output
    ///
    /// Stories deserialized from outside may carry an empty category.
    #[must_use]
    pub fn effective_category(&self) -> String {
        normalize_category(&self.category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DEFAULT_CATEGORY;

    #[test]
    fn new_story_gets_unique_ids() {
        let a = Story::new("one", "Feature");
        let b = Story::new("one", "Feature");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn recategorize_normalizes() {
        let mut story = Story::new("log in", "Auth");
        story.recategorize("  ");
        assert_eq!(story.category, DEFAULT_CATEGORY);
        story.recategorize(" Security ");
        assert_eq!(story.category, "Security");
    }

    #[test]
    fn serializes_with_identifier_field() {
        let story = Story::with_id(StoryId::from("s-1"), "log in", "Auth");
        let json = serde_json::to_value(&story).unwrap();
        assert_eq!(json["identifier"], "s-1");
        assert_eq!(json["description"], "log in");
        assert_eq!(json["category"], "Auth");
    }

    #[test]
    fn effective_category_of_raw_story() {
        let story: Story =
            serde_json::from_str(r#"{"identifier":"x","description":"d","category":""}"#).unwrap();
        assert_eq!(story.category, "");
        assert_eq!(story.effective_category(), DEFAULT_CATEGORY);
    }
}
