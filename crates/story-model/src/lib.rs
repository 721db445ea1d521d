//! Storyline domain model
//!
//! The two entities every other crate exchanges:
//!
//! - [`Story`]: one user story (identifier, description, category)
//! - [`Project`]: a named collection of stories, the unit the store keeps
//!
//! Category defaulting lives in [`normalize_category`] and nowhere else.
//!
//! # Example
//!
//! ```rust
//! use story_model::{Project, ProjectId, Story, DEFAULT_CATEGORY};
//!
//! let story = Story::new("As a user, I want to log in", "");
//! assert_eq!(story.category, DEFAULT_CATEGORY);
//!
//! let project = Project::new(ProjectId::from("p-1"), "Portal").with_records(vec![story]);
//! assert_eq!(project.records.len(), 1);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod category;
pub mod project;
pub mod story;

pub use category::{normalize_category, DEFAULT_CATEGORY};
pub use project::{Project, ProjectId};
pub use story::{Story, StoryId};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

