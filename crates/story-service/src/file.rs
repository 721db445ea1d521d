//! Story file I/O

use crate::error::ServiceError;
use std::io::ErrorKind;
use std::path::Path;
use story_codec::Document;
use tracing::debug;

/// Read and parse the story file; a missing file is an empty document
pub(crate) async fn load(path: &Path) -> Result<Document, ServiceError> {
    let text = match tokio::fs::read_to_string(path).await {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "story file missing, starting empty");
            return Ok(Document::new());
        }
        Err(e) => return Err(ServiceError::io_error(path, e)),
    };
    Ok(story_codec::parse(&text)?)
}

/// Serialize and write the whole document
pub(crate) async fn save(path: &Path, doc: &Document) -> Result<(), ServiceError> {
    let text = story_codec::serialize(doc)?;
    tokio::fs::write(path, text)
        .await
        .map_err(|e| ServiceError::io_error(path, e))?;
    debug!(path = %path.display(), records = doc.records.len(), "story file written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use story_model::Story;

    #[tokio::test]
    async fn missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let doc = load(&dir.path().join("none.md")).await.unwrap();
        assert_eq!(doc, Document::new());
    }

    #[tokio::test]
    async fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stories.md");
        let doc = Document::new().with_records(vec![Story::new("Log in", "Auth")]);

        save(&path, &doc).await.unwrap();
        let loaded = load(&path).await.unwrap();
        assert_eq!(loaded.records.len(), 1);
        assert_eq!(loaded.records[0].description, "Log in");
        assert_eq!(loaded.records[0].category, "Auth");
    }

    #[tokio::test]
    async fn malformed_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.md");
        tokio::fs::write(&path, "---\nproject_name: x\n").await.unwrap();

        let err = load(&path).await.unwrap_err();
        assert!(matches!(err, ServiceError::Parse(_)));
    }
}
