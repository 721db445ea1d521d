//! Deterministic document writer

use crate::document::Document;
use crate::error::SerializeError;
use crate::{BOLD_MARKER, CATEGORY_TAG_OPEN, METADATA_DELIMITER, SUMMARY_HEADER};
use std::fmt::Write;

/// Serialize a story document
///
/// Stories are grouped by category, groups are ordered by label and stories
/// keep their relative order inside a group.
///
/// # Errors
/// - [`SerializeError::Metadata`] if the front matter cannot be encoded
pub fn serialize(doc: &Document) -> Result<String, SerializeError> {
    let mut out = String::new();

    if !doc.metadata.is_empty() {
        let yaml = serde_yaml::to_string(&doc.metadata)?;
        writeln!(out, "{METADATA_DELIMITER}")?;
        out.push_str(&yaml);
        if !yaml.ends_with('\n') {
            out.push('\n');
        }
        writeln!(out, "{METADATA_DELIMITER}")?;
        writeln!(out)?;
    }

    let summary = doc.summary.trim();
    if !summary.is_empty() {
        writeln!(out, "{SUMMARY_HEADER}")?;
        writeln!(out, "{summary}")?;
        writeln!(out)?;
    }

    for (label, stories) in doc.grouped() {
        writeln!(out, "{BOLD_MARKER}{label}{BOLD_MARKER}")?;
        for story in stories {
            writeln!(out, "- {} {CATEGORY_TAG_OPEN}{label}]", story.description)?;
        }
        writeln!(out)?;
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use story_model::Story;

    #[test]
    fn empty_document_is_empty_text() {
        assert_eq!(serialize(&Document::new()).unwrap(), "");
    }

    #[test]
    fn groups_sorted_regardless_of_input_order() {
        let doc = Document::new().with_records(vec![
            Story::new("write docs", "Docs"),
            Story::new("fix crash", "Bug"),
            Story::new("add login", ""),
            Story::new("fix typo", "Bug"),
        ]);

        let expected = "\
**Bug**
- fix crash [Category: Bug]
- fix typo [Category: Bug]

**Docs**
- write docs [Category: Docs]

**Uncategorized**
- add login [Category: Uncategorized]

";
        assert_eq!(serialize(&doc).unwrap(), expected);
    }

    #[test]
    fn raw_empty_category_groups_as_default() {
        let mut story = Story::new("add login", "Auth");
        story.category.clear();
        let doc = Document::new().with_records(vec![story]);
        assert_eq!(
            serialize(&doc).unwrap(),
            "**Uncategorized**\n- add login [Category: Uncategorized]\n\n"
        );
    }

    #[test]
    fn metadata_and_summary_sections() {
        let mut doc = Document::new()
            .with_summary("  A portal.\n")
            .with_records(vec![Story::new("log in", "Auth")]);
        doc.set_metadata_str("project_name", "Portal");
        doc.set_metadata_str("project_id", "p1");

        let expected = "\
---
project_id: p1
project_name: Portal
---

# Summary
A portal.

**Auth**
- log in [Category: Auth]

";
        assert_eq!(serialize(&doc).unwrap(), expected);
    }

    #[test]
    fn summary_without_stories() {
        let doc = Document::new().with_summary("Only a summary");
        assert_eq!(serialize(&doc).unwrap(), "# Summary\nOnly a summary\n\n");
    }
}
