//! Preact Init Core - project initialization from template repositories
//!
//! This library turns a project name and a template locator into a ready
//! project directory. It is used by the `preact-init` binary, which supplies
//! its product configuration through [`ProductConfig`].
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! - **Layer 1: Stages** - directory creation, template fetching, validation,
//!   manifest rewriting and dependency installation
//! - **Layer 2: Pipeline** - [`Pipeline`] runs the stages in order against
//!   pluggable collaborators ([`Prompter`], [`Fetcher`], [`Installer`], [`Reporter`])
//! - **Layer 3: CLI/TUI Interface** - Optional cliclack-based prompts (feature-gated)
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based TUI prompts module
//!
//! # Example Usage (without TUI)
//!
//! ```ignore
//! use preact_init_core::{config::Settings, GitFetcher, PackageManager, Pipeline};
//!
//! let settings = Settings::from_product(&MyConfig)?;
//! let mut pipeline = Pipeline::new(
//!     &settings,
//!     my_prompter,
//!     GitFetcher::new("my-tool"),
//!     PackageManager::npm(),
//!     Vec::new(),
//! )
//! .assume_yes(true);
//! let project = pipeline.run(partial_config).await?;
//! ```

pub mod config;
pub mod error;
pub mod pipeline;
pub mod product;
pub mod project;
pub mod runtime;
pub mod templates;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export main types for convenience
pub use config::{
    PartialConfig, PartialOptions, ProjectConfig, ProjectOptions, Prompter, Settings, TemplateSchema,
};
pub use error::{InitError, ValidationError};
pub use pipeline::{Initialized, Pipeline, ProgressEvent, Reporter, Stage};
pub use product::ProductConfig;
pub use runtime::{Installer, PackageManager};
pub use templates::{Fetcher, GitFetcher};

#[cfg(feature = "tui")]
pub use tui::run;
