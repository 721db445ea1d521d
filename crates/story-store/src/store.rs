//! Lock-guarded project map with background snapshots

use crate::config::StoreConfig;
use crate::error::StoreError;
use crate::snapshot;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use story_model::{Project, ProjectId};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// Store lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreState {
    /// Loading the snapshot
    Initializing,
    /// Serving operations, background snapshots running
    Ready,
    /// Stop requested, final flush pending
    Draining,
    /// Final flush done; operations are rejected
    Stopped,
}

#[derive(Debug)]
struct Inner {
    projects: HashMap<ProjectId, Project>,
    state: StoreState,
}

/// State shared between the store handle and its snapshot task
#[derive(Debug)]
struct Shared {
    path: PathBuf,
    inner: Mutex<Inner>,
}

impl Shared {
    fn write(&self, inner: &Inner) -> Result<usize, StoreError> {
        let bytes = snapshot::encode(&inner.projects)?;
        snapshot::write_atomic(&self.path, &bytes)?;
        Ok(inner.projects.len())
    }

    /// Write the whole map while holding the lock
    fn flush(&self) -> Result<usize, StoreError> {
        let inner = self.inner.lock();
        ensure_open(inner.state)?;
        self.write(&inner)
    }

    /// Final flush; the store is stopped afterwards whatever the outcome
    fn flush_and_stop(&self) -> Result<usize, StoreError> {
        let mut inner = self.inner.lock();
        inner.state = StoreState::Stopped;
        self.write(&inner)
    }
}

/// Concurrent project store
///
/// Every operation, including the periodic snapshot, takes the same mutex for
/// its full duration. Share it between tasks with `Arc<ProjectStore>`.
///
/// Must be opened inside a tokio runtime.
#[derive(Debug)]
pub struct ProjectStore {
    shared: Arc<Shared>,
    stop_tx: Mutex<Option<oneshot::Sender<()>>>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl ProjectStore {
    /// Load the snapshot and start the background snapshot task
    ///
    /// # Errors
    /// - `StoreError::CorruptSnapshot` if the file exists but cannot be decoded
    /// - `StoreError::Io` if the file exists but cannot be read
    pub fn open(config: StoreConfig) -> Result<Self, StoreError> {
        let shared = Arc::new(Shared {
            path: config.snapshot_path,
            inner: Mutex::new(Inner {
                projects: HashMap::new(),
                state: StoreState::Initializing,
            }),
        });

        {
            let mut inner = shared.inner.lock();
            inner.projects = snapshot::load(&shared.path)?;
            inner.state = StoreState::Ready;
        }

        let (stop_tx, stop_rx) = oneshot::channel();
        let task = tokio::spawn(snapshot_loop(
            Arc::clone(&shared),
            config.flush_interval,
            stop_rx,
        ));

        tracing::info!(
            path = %shared.path.display(),
            interval_secs = config.flush_interval.as_secs(),
            "project store ready"
        );

        Ok(Self {
            shared,
            stop_tx: Mutex::new(Some(stop_tx)),
            task: Mutex::new(Some(task)),
        })
    }

    /// Insert or wholesale-replace a project
    ///
    /// # Errors
    /// - `StoreError::InvalidProject` if the identifier is empty
    /// - `StoreError::Stopped` after [`stop`](Self::stop)
    pub fn upsert(&self, project: Project) -> Result<(), StoreError> {
        let mut inner = self.shared.inner.lock();
        ensure_open(inner.state)?;
        if project.id.is_empty() {
            return Err(StoreError::InvalidProject);
        }
        tracing::debug!(id = %project.id, stories = project.records.len(), "upsert project");
        inner.projects.insert(project.id.clone(), project);
        Ok(())
    }

    /// Copy of every project, in no particular order
    ///
    /// # Errors
    /// - `StoreError::Stopped` after [`stop`](Self::stop)
    pub fn list(&self) -> Result<Vec<Project>, StoreError> {
        let inner = self.shared.inner.lock();
        ensure_open(inner.state)?;
        Ok(inner.projects.values().cloned().collect())
    }

    /// Copy of one project
    ///
    /// # Errors
    /// - `StoreError::NotFound` if no project has this identifier
    /// - `StoreError::Stopped` after [`stop`](Self::stop)
    pub fn get(&self, id: &ProjectId) -> Result<Project, StoreError> {
        let inner = self.shared.inner.lock();
        ensure_open(inner.state)?;
        inner
            .projects
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    /// Write the snapshot now
    ///
    /// Returns the number of projects written.
    ///
    /// # Errors
    /// - `StoreError::Io` if the file cannot be written
    /// - `StoreError::Stopped` after [`stop`](Self::stop)
    pub fn flush(&self) -> Result<usize, StoreError> {
        self.shared.flush()
    }

    /// Cancel the snapshot task and write a final snapshot
    ///
    /// Call once before the process exits.
    ///
    /// # Errors
    /// - `StoreError::AlreadyStopped` on a second call
    /// - `StoreError::Io` / `StoreError::Encode` if the final write fails;
    ///   the store is stopped regardless
    pub async fn stop(&self) -> Result<(), StoreError> {
        let stop_tx = self.stop_tx.lock().take();
        let Some(stop_tx) = stop_tx else {
            return Err(StoreError::AlreadyStopped);
        };
        self.shared.inner.lock().state = StoreState::Draining;

        // The task may already be gone; nothing to cancel then.
        let _ = stop_tx.send(());

        let task = self.task.lock().take();
        if let Some(task) = task {
            if let Err(e) = task.await {
                tracing::warn!(error = %e, "snapshot task ended abnormally");
            }
        }

        let written = self.shared.flush_and_stop()?;
        tracing::info!(path = %self.shared.path.display(), projects = written, "project store stopped");
        Ok(())
    }

    /// Current lifecycle state
    #[must_use]
    pub fn state(&self) -> StoreState {
        self.shared.inner.lock().state
    }

    /// Backing snapshot path
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.shared.path
    }
}

fn ensure_open(state: StoreState) -> Result<(), StoreError> {
    if state == StoreState::Stopped {
        Err(StoreError::Stopped)
    } else {
        Ok(())
    }
}

/// Background snapshot task
///
/// The first snapshot is written one full period after start. Failures are
/// logged and the loop keeps going.
async fn snapshot_loop(shared: Arc<Shared>, period: Duration, mut stop: oneshot::Receiver<()>) {
    let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = &mut stop => break,
            _ = ticker.tick() => {
                // File write and sync run off the async workers.
                let shared = Arc::clone(&shared);
                match tokio::task::spawn_blocking(move || shared.flush()).await {
                    Ok(Ok(written)) => tracing::debug!(projects = written, "snapshot written"),
                    Ok(Err(e)) => tracing::warn!(error = %e, "periodic snapshot failed"),
                    Err(e) => tracing::warn!(error = %e, "snapshot task panicked"),
                }
            }
        }
    }

    tracing::debug!("snapshot task exited");
}

#[cfg(test)]
mod tests {
    use super::*;
    use story_model::Story;

    const LONG: Duration = Duration::from_secs(3600);

    fn project(id: &str, name: &str) -> Project {
        Project::new(ProjectId::from(id), name)
    }

    fn open_in(dir: &tempfile::TempDir) -> ProjectStore {
        ProjectStore::open(StoreConfig::new(dir.path().join("projects.json")).with_flush_interval(LONG))
            .unwrap()
    }

    fn read_snapshot(path: &Path) -> Vec<Project> {
        serde_json::from_slice(&std::fs::read(path).unwrap()).unwrap()
    }

    #[tokio::test]
    async fn open_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_in(&dir);
        assert_eq!(store.state(), StoreState::Ready);
        assert!(store.list().unwrap().is_empty());
        store.stop().await.unwrap();
    }

    #[tokio::test]
    async fn open_corrupt_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("projects.json");
        std::fs::write(&path, "[{\"identifier\":").unwrap();
        let err = ProjectStore::open(StoreConfig::new(&path)).unwrap_err();
        assert!(matches!(err, StoreError::CorruptSnapshot { .. }));
    }

    #[tokio::test]
    async fn empty_identifier_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_in(&dir);
        store.upsert(project("p-1", "Portal")).unwrap();

        let err = store.upsert(project("", "Nameless")).unwrap_err();
        assert!(matches!(err, StoreError::InvalidProject));

        let all = store.list().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].name, "Portal");
        store.stop().await.unwrap();
    }

    #[tokio::test]
    async fn upsert_replaces_wholesale() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_in(&dir);

        let first = project("p-1", "First")
            .with_summary("old")
            .with_records(vec![Story::new("a", "A"), Story::new("b", "B")]);
        store.upsert(first).unwrap();
        store.upsert(project("p-1", "Second")).unwrap();

        let got = store.get(&ProjectId::from("p-1")).unwrap();
        assert_eq!(got.name, "Second");
        assert!(got.summary.is_empty());
        assert!(got.records.is_empty());
        assert_eq!(store.list().unwrap().len(), 1);
        store.stop().await.unwrap();
    }

    #[tokio::test]
    async fn get_unknown_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_in(&dir);
        let err = store.get(&ProjectId::from("missing")).unwrap_err();
        assert!(err.is_not_found());
        store.stop().await.unwrap();
    }

    #[tokio::test]
    async fn list_is_a_copy() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_in(&dir);
        store.upsert(project("p-1", "Portal")).unwrap();

        let mut copy = store.list().unwrap();
        copy[0].name = "Changed".to_string();
        copy.clear();

        assert_eq!(store.get(&ProjectId::from("p-1")).unwrap().name, "Portal");
        store.stop().await.unwrap();
    }

    #[tokio::test]
    async fn stop_flushes_without_tick() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_in(&dir);
        let path = store.path().to_path_buf();

        store.upsert(project("p-2", "Two")).unwrap();
        store.upsert(project("p-1", "One")).unwrap();
        assert!(!path.exists());

        store.stop().await.unwrap();
        assert_eq!(store.state(), StoreState::Stopped);

        let saved = read_snapshot(&path);
        let names: Vec<_> = saved.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["One", "Two"]);
    }

    #[tokio::test]
    async fn reopen_restores_projects() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_in(&dir);
        store
            .upsert(project("p-1", "Portal").with_records(vec![Story::new("log in", "Auth")]))
            .unwrap();
        store.stop().await.unwrap();

        let reopened = open_in(&dir);
        let got = reopened.get(&ProjectId::from("p-1")).unwrap();
        assert_eq!(got.records[0].description, "log in");
        reopened.stop().await.unwrap();
    }

    #[tokio::test]
    async fn operations_after_stop_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_in(&dir);
        store.stop().await.unwrap();

        assert!(matches!(store.list(), Err(StoreError::Stopped)));
        assert!(matches!(store.upsert(project("p", "x")), Err(StoreError::Stopped)));
        assert!(matches!(store.stop().await, Err(StoreError::AlreadyStopped)));
    }

    #[tokio::test(start_paused = true)]
    async fn periodic_snapshot_runs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("projects.json");
        let store =
            ProjectStore::open(StoreConfig::new(&path).with_flush_interval(Duration::from_secs(20)))
                .unwrap();

        store.upsert(project("p-1", "Portal")).unwrap();
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(!path.exists());

        tokio::time::sleep(Duration::from_secs(20)).await;
        assert_eq!(read_snapshot(&path).len(), 1);

        store.stop().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn periodic_snapshot_recovers_after_failed_tick() {
        let dir = tempfile::tempdir().unwrap();
        let parent = dir.path().join("created-later");
        let path = parent.join("projects.json");
        let period = Duration::from_secs(20);
        let store = ProjectStore::open(StoreConfig::new(&path).with_flush_interval(period)).unwrap();
        store.upsert(project("p-1", "Portal")).unwrap();

        tokio::time::sleep(period + Duration::from_secs(5)).await;
        assert!(!path.exists());
        assert_eq!(store.state(), StoreState::Ready);

        std::fs::create_dir(&parent).unwrap();
        tokio::time::sleep(period).await;
        assert_eq!(read_snapshot(&path).len(), 1);

        store.upsert(project("p-2", "Billing")).unwrap();
        tokio::time::sleep(period).await;
        assert_eq!(read_snapshot(&path).len(), 2);

        store.stop().await.unwrap();
    }

    #[tokio::test]
    async fn failed_flush_does_not_block_operations() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing-dir").join("projects.json");
        let store = ProjectStore::open(StoreConfig::new(&path).with_flush_interval(LONG)).unwrap();

        store.upsert(project("p-1", "Portal")).unwrap();
        assert!(store.flush().is_err());
        assert_eq!(store.list().unwrap().len(), 1);

        let err = store.stop().await.unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
        assert_eq!(store.state(), StoreState::Stopped);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_upserts() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(open_in(&dir));

        let mut handles = Vec::new();
        for worker in 0..8 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                for n in 0..25 {
                    let id = format!("w{worker}-{n}");
                    store.upsert(project(&id, &id)).unwrap();
                    let _ = store.list().unwrap();
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(store.list().unwrap().len(), 200);
        store.stop().await.unwrap();
        assert_eq!(read_snapshot(store.path()).len(), 200);
    }
}
