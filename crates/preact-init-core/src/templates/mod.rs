//! Template fetching, validation and manifest rewriting
//!
//! This module provides:
//! - Template source locators (`owner/repo`, `gitlab:owner/repo`, URLs)
//! - Template fetching by git clone or zip archive download
//! - Directory-tree snapshots and structural superset matching
//! - Template validation and package manifest updates

pub mod fetcher;
pub mod manifest;
pub mod matcher;
pub mod source;
pub mod tree;
pub mod validator;

pub use fetcher::{Fetcher, GitFetcher};
pub use manifest::{merge_manifest, update_manifest};
pub use matcher::is_superset;
pub use source::{Host, TemplateSource};
pub use tree::{DirectoryTree, EntryKind};
pub use validator::validate_template;
