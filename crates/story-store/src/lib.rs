//! Storyline project store
//!
//! An in-memory map of [`Project`]s behind one lock, snapshotted to a JSON
//! file by a background task and flushed once more on [`ProjectStore::stop`].
//!
//! # Lifecycle
//!
//! ```text
//! open() ──► Initializing ──► Ready ──stop()──► Draining ──► Stopped
//!               │               │
//!          load snapshot   tick every flush_interval: write snapshot
//! ```
//!
//! Writes between ticks live only in memory. `stop()` must be awaited before
//! the process exits, otherwise those writes are lost.
//!
//! # Example
//!
//! ```rust,ignore
//! use story_store::{ProjectStore, StoreConfig};
//! use story_model::{Project, ProjectId};
//!
//! # async fn example() -> Result<(), story_store::StoreError> {
//! let store = ProjectStore::open(StoreConfig::new("projects.json"))?;
//! store.upsert(Project::new(ProjectId::from("p-1"), "Portal"))?;
//! assert_eq!(store.list()?.len(), 1);
//! store.stop().await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod config;
pub mod error;
pub mod repository;
mod snapshot;
pub mod store;

pub use config::StoreConfig;
pub use error::StoreError;
pub use repository::ProjectRepository;
pub use store::{ProjectStore, StoreState};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
