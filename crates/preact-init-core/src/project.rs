//! Project directory creation

use crate::config::TemplateSchema;
use crate::error::{InitError, Result};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Create the project directory `base/name` and check it is safe to use.
///
/// A pre-existing directory is accepted as long as every entry in it is
/// listed in the schema's `validFiles`. An unsafe directory is left untouched.
pub async fn create_project_directory(
    base: &Path,
    name: &str,
    schema: &TemplateSchema,
) -> Result<PathBuf> {
    let directory = base.join(name);
    let directory_error = |source: std::io::Error| InitError::Directory {
        path: directory.clone(),
        source,
    };

    fs::create_dir_all(&directory)
        .await
        .map_err(directory_error)?;

    let mut entries = fs::read_dir(&directory).await.map_err(directory_error)?;
    while let Some(entry) = entries.next_entry().await.map_err(directory_error)? {
        let entry_name = entry.file_name().to_string_lossy().into_owned();
        if !schema.is_valid_file(&entry_name) {
            tracing::debug!(directory = %directory.display(), entry = %entry_name, "conflicting entry");
            return Err(InitError::UnsafeDirectory {
                name: name.to_string(),
                entry: entry_name,
            });
        }
    }

    Ok(directory)
}
