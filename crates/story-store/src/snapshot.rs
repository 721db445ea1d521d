//! Snapshot file reading and writing

use crate::error::StoreError;
use std::collections::HashMap;
use std::io::Write;
use std::path::Path;
use story_model::{Project, ProjectId};
use tempfile::NamedTempFile;

/// Load a snapshot into a project map
///
/// A missing file and a blank file both yield an empty map.
pub(crate) fn load(path: &Path) -> Result<HashMap<ProjectId, Project>, StoreError> {
    let data = match std::fs::read(path) {
        Ok(data) => data,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no snapshot, starting empty");
            return Ok(HashMap::new());
        }
        Err(e) => return Err(StoreError::io_error(path, e)),
    };

    if data.iter().all(u8::is_ascii_whitespace) {
        tracing::debug!(path = %path.display(), "blank snapshot, starting empty");
        return Ok(HashMap::new());
    }

    let projects: Vec<Project> =
        serde_json::from_slice(&data).map_err(|source| StoreError::CorruptSnapshot {
            path: path.to_path_buf(),
            source,
        })?;

    let mut map = HashMap::with_capacity(projects.len());
    for project in projects {
        if project.id.is_empty() {
            tracing::warn!(path = %path.display(), name = %project.name, "skipping snapshot entry without identifier");
            continue;
        }
        map.insert(project.id.clone(), project);
    }

    tracing::info!(path = %path.display(), projects = map.len(), "snapshot loaded");
    Ok(map)
}

/// Encode projects ordered by identifier
pub(crate) fn encode(projects: &HashMap<ProjectId, Project>) -> Result<Vec<u8>, StoreError> {
    let mut list: Vec<&Project> = projects.values().collect();
    list.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(serde_json::to_vec_pretty(&list)?)
}

/// Replace the file at `path` with `bytes`
///
/// Writes a temporary file next to the target and renames it into place, so
/// readers see either the old or the new snapshot.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| StoreError::io_error(path, e))?;
    tmp.write_all(bytes).map_err(|e| StoreError::io_error(path, e))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| StoreError::io_error(path, e))?;
    tmp.persist(path)
        .map_err(|e| StoreError::io_error(path, e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let map = load(&dir.path().join("none.json")).unwrap();
        assert!(map.is_empty());
    }

    #[test]
    fn blank_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blank.json");
        std::fs::write(&path, "").unwrap();
        assert!(load(&path).unwrap().is_empty());
        std::fs::write(&path, "  \n").unwrap();
        assert!(load(&path).unwrap().is_empty());
    }

    #[test]
    fn corrupt_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{not json").unwrap();
        let err = load(&path).unwrap_err();
        assert!(matches!(err, StoreError::CorruptSnapshot { .. }));
    }

    #[test]
    fn entries_without_identifier_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mixed.json");
        std::fs::write(
            &path,
            r#"[{"identifier":"","name":"ghost"},{"identifier":"p-1","name":"real"}]"#,
        )
        .unwrap();
        let map = load(&path).unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map[&ProjectId::from("p-1")].name, "real");
    }

    #[test]
    fn write_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snap.json");

        let mut map = HashMap::new();
        for id in ["b", "a"] {
            map.insert(ProjectId::from(id), Project::new(ProjectId::from(id), id));
        }
        write_atomic(&path, &encode(&map).unwrap()).unwrap();

        let raw: Vec<Project> = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        let ids: Vec<_> = raw.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(load(&path).unwrap(), map);
    }
}
