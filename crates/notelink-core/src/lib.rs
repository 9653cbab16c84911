//! # notelink-core
//!
//! Core types, traits, and the link-graph synchronization engine for notelink.
//!
//! This crate provides the foundational data structures and repository trait
//! definitions that the database and API crates depend on, plus the pure
//! pieces of the engine:
//!
//! - [`wikilinks`]: `[[Note Title]]` reference extraction
//! - [`link_diff`]: declarative set diff between current and desired edges
//! - [`reconcile`]: the [`LinkReconciler`] that resolves titles and applies the diff

pub mod defaults;
pub mod error;
pub mod link_diff;
pub mod logging;
pub mod models;
pub mod reconcile;
pub mod traits;
pub mod uuid_utils;
pub mod wikilinks;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use link_diff::{desired_targets, diff_links, LinkDiff};
pub use models::*;
pub use reconcile::LinkReconciler;
pub use traits::*;
pub use uuid_utils::{new_v7, parse_id};
pub use wikilinks::extract_wiki_links;
