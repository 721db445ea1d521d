//! In-memory form of a story file

use serde_yaml::Value;
use std::collections::BTreeMap;
use story_model::Story;

/// Front matter mapping
///
/// Ordered so that encoding is deterministic.
pub type Metadata = BTreeMap<String, Value>;

/// Parsed story document
///
/// Built fresh by every [`parse`](crate::parse) call and handed back to
/// [`serialize`](crate::serialize) after the caller is done with it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    /// Front matter (empty when the file has none)
    pub metadata: Metadata,
    /// Free-text summary (may be empty)
    pub summary: String,
    /// Stories; order is kept within a category on output
    pub records: Vec<Story>,
}

impl Document {
    /// Create empty document
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With stories
    #[inline]
    #[must_use]
    pub fn with_records(mut self, records: Vec<Story>) -> Self {
        self.records = records;
        self
    }

    /// With summary
    #[inline]
    #[must_use]
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    /// String value of a metadata key, if present and a string
    #[must_use]
    pub fn metadata_str(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).and_then(Value::as_str)
    }

    /// Set a string metadata value
    pub fn set_metadata_str(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.metadata.insert(key.into(), Value::String(value.into()));
    }

    /// Stories grouped by category, labels sorted ascending
    ///
    /// Order within a group follows `records`.
    #[must_use]
    pub fn grouped(&self) -> BTreeMap<String, Vec<&Story>> {
        let mut groups: BTreeMap<String, Vec<&Story>> = BTreeMap::new();
        for story in &self.records {
            groups.entry(story.effective_category()).or_default().push(story);
        }
        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_accessors() {
        let mut doc = Document::new();
        assert_eq!(doc.metadata_str("project_id"), None);

        doc.set_metadata_str("project_id", "p-1");
        assert_eq!(doc.metadata_str("project_id"), Some("p-1"));

        doc.metadata.insert("version".into(), Value::from(2));
        assert_eq!(doc.metadata_str("version"), None);
    }

    #[test]
    fn grouping_is_sorted_and_stable() {
        let doc = Document::new().with_records(vec![
            Story::new("b1", "Beta"),
            Story::new("a1", "Alpha"),
            Story::new("b2", "Beta"),
        ]);

        let groups = doc.grouped();
        let labels: Vec<_> = groups.keys().cloned().collect();
        assert_eq!(labels, vec!["Alpha", "Beta"]);

        let beta: Vec<_> = groups["Beta"].iter().map(|s| s.description.as_str()).collect();
        assert_eq!(beta, vec!["b1", "b2"]);
    }
}
