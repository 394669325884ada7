//! Error types for the initialization pipeline
//!
//! Every stage fails with an [`InitError`]. Template validation failures carry
//! a [`ValidationError`] describing which check rejected the template.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can terminate a pipeline run.
#[derive(Debug, Error)]
pub enum InitError {
    /// The user declined a prompt or confirmation. Not a failure.
    #[error("Aborted.")]
    Aborted,

    /// Embedded configuration could not be loaded, or a prompt failed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The project directory could not be created.
    #[error("The directory {} wasn't created: {source}", path.display())]
    Directory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The target directory already holds files outside the allow-list.
    #[error("The directory {name} contains files that could conflict ({entry}). Try a different name.")]
    UnsafeDirectory { name: String, entry: String },

    /// The template could not be fetched.
    #[error("Failed to download template from {template}: {reason}")]
    Fetch { template: String, reason: String },

    /// The fetched directory could not be scanned.
    #[error("Failed to read template directory {}: {source}", path.display())]
    Snapshot {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The fetched template failed validation and was removed.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The package manifest could not be read or rewritten.
    #[error("Failed to update {}: {reason}", path.display())]
    Manifest { path: PathBuf, reason: String },

    /// The package manager could not be started.
    #[error("Failed to run {program}: {source}")]
    InstallSpawn {
        program: String,
        #[source]
        source: io::Error,
    },

    /// The package manager exited unsuccessfully.
    #[error("Installation process failed ({}).", describe_exit(*code))]
    Install { code: Option<i32> },
}

/// Reasons a fetched template is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Directory structure does not match template's tree requirements.")]
    TreeShape,

    #[error("Template does not contain a {file} at its root.")]
    ManifestMissing { file: String },

    #[error("Template's {file} could not be parsed: {reason}")]
    InvalidManifest { file: String, reason: String },

    #[error("Template's package does not meet the minimum requirements.")]
    ManifestShape,

    #[error("Template does not have valid dependencies: '{name}' is missing from {field}.")]
    MissingDependency { field: String, name: String },
}

impl InitError {
    /// True when the run ended because the user cancelled it.
    pub fn is_abort(&self) -> bool {
        matches!(self, InitError::Aborted)
    }
}

fn describe_exit(code: Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "terminated by signal".to_string(),
    }
}

/// Convenience alias for results with [`InitError`].
pub type Result<T, E = InitError> = std::result::Result<T, E>;
