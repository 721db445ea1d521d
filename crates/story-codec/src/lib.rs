//! Story document codec
//!
//! Converts between the markdown story file and a structured [`Document`].
//!
//! # Format
//!
//! ```text
//! ---
//! project_id: 7f3c…
//! project_name: Portal
//! ---
//!
//! # Summary
//! A customer portal.
//!
//! **Auth**
//! - As a user, I want to log in [Category: Auth]
//!
//! **Uncategorized**
//! - As a user, I want dark mode [Category: Uncategorized]
//! ```
//!
//! - Front matter between `---` lines is YAML, decoded into [`Metadata`]
//! - `# Summary` opens a free-text summary that ends at the first record line
//! - `- <description> [Category: <label>]` lines are stories; `**Label**`
//!   headers are regenerated on output and ignored on input
//!
//! Parsing is lenient about stories (a bad tag falls back to the default
//! category) and strict about metadata. Serialization groups stories by
//! category with labels sorted, so output does not depend on input order.
//!
//! The codec does no I/O.
//!
//! # Example
//!
//! ```rust
//! use story_codec::{parse, serialize};
//!
//! let doc = parse("- Fix the login bug [Category: Bug]\n")?;
//! assert_eq!(doc.records[0].category, "Bug");
//!
//! let text = serialize(&doc)?;
//! assert_eq!(text, "**Bug**\n- Fix the login bug [Category: Bug]\n\n");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod document;
pub mod error;
mod parse;
mod serialize;

pub use document::{Document, Metadata};
pub use error::{ParseError, SerializeError};
pub use parse::parse;
pub use serialize::serialize;

/// Line delimiting the metadata block
pub const METADATA_DELIMITER: &str = "---";
/// Line opening the summary section
pub const SUMMARY_HEADER: &str = "# Summary";
/// Prefix of a story line
pub const BULLET_PREFIX: &str = "- ";
/// Marker wrapping a category header
pub const BOLD_MARKER: &str = "**";
/// Opening of the trailing category tag
pub const CATEGORY_TAG_OPEN: &str = "[Category: ";
/// Closing of the trailing category tag
pub const CATEGORY_TAG_CLOSE: char = ']';

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
