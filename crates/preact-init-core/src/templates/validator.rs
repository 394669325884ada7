//! Validation of fetched templates against the template schema

use super::matcher::is_superset;
use super::tree::{key_children_by_name, DirectoryTree};
use crate::config::TemplateSchema;
use crate::error::{InitError, Result, ValidationError};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Validate a fetched template.
///
/// Checks run in order and the first failure wins: tree shape, manifest
/// existence, manifest shape, dependency presence. A rejected template
/// directory is removed before the error is returned. Failing to scan the
/// directory returns an error without removing anything.
pub fn validate_template(directory: &Path, schema: &TemplateSchema) -> Result<PathBuf> {
    let tree = DirectoryTree::scan(directory).map_err(|source| InitError::Snapshot {
        path: directory.to_path_buf(),
        source,
    })?;

    if let Err(reason) = check_template(directory, &tree, schema) {
        tracing::warn!(directory = %directory.display(), %reason, "template rejected, removing");
        if let Err(e) = std::fs::remove_dir_all(directory) {
            tracing::warn!(directory = %directory.display(), error = %e, "failed to remove rejected template");
        }
        return Err(reason.into());
    }

    Ok(directory.to_path_buf())
}

fn check_template(
    directory: &Path,
    tree: &DirectoryTree,
    schema: &TemplateSchema,
) -> std::result::Result<(), ValidationError> {
    let required_tree = key_children_by_name(&schema.required_tree);
    if !is_superset(&tree.to_value(), &required_tree) {
        return Err(ValidationError::TreeShape);
    }

    let manifest = read_manifest(directory, &schema.manifest_file)?;

    if !is_superset(&manifest, &schema.valid_package) {
        return Err(ValidationError::ManifestShape);
    }

    for (field, name) in schema.required_dependencies() {
        let present = manifest
            .get(field)
            .and_then(Value::as_object)
            .is_some_and(|deps| deps.contains_key(name));
        if !present {
            return Err(ValidationError::MissingDependency {
                field: field.to_string(),
                name: name.to_string(),
            });
        }
    }

    Ok(())
}

fn read_manifest(directory: &Path, file: &str) -> std::result::Result<Value, ValidationError> {
    let path = directory.join(file);
    if !path.is_file() {
        return Err(ValidationError::ManifestMissing {
            file: file.to_string(),
        });
    }

    let invalid = |reason: String| ValidationError::InvalidManifest {
        file: file.to_string(),
        reason,
    };
    let content = std::fs::read_to_string(&path).map_err(|e| invalid(e.to_string()))?;
    serde_json::from_str(&content).map_err(|e| invalid(e.to_string()))
}
