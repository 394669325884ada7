//! Package manifest rewriting

use crate::config::{ProjectConfig, TemplateSchema};
use crate::error::{InitError, Result};
use serde_json::{Map, Value};
use std::path::Path;
use tokio::fs;

/// Rewrite the template's manifest for the new project.
///
/// Fields are merged (later wins) as `initialPackage` <- fetched manifest <-
/// `{ name }`, top-level keys are sorted, and the result is written back
/// pretty-printed.
pub async fn update_manifest(
    directory: &Path,
    config: &ProjectConfig,
    schema: &TemplateSchema,
) -> Result<()> {
    let path = directory.join(&schema.manifest_file);
    let manifest_error = |reason: String| InitError::Manifest {
        path: path.clone(),
        reason,
    };

    if !fs::try_exists(&path).await.unwrap_or(false) {
        return Err(manifest_error("file does not exist".to_string()));
    }

    let content = fs::read_to_string(&path)
        .await
        .map_err(|e| manifest_error(e.to_string()))?;
    let fetched: Map<String, Value> =
        serde_json::from_str(&content).map_err(|e| manifest_error(e.to_string()))?;

    let merged = merge_manifest(&schema.initial_package, fetched, &config.name);
    let mut output =
        serde_json::to_string_pretty(&merged).map_err(|e| manifest_error(e.to_string()))?;
    output.push('\n');

    fs::write(&path, output)
        .await
        .map_err(|e| manifest_error(e.to_string()))?;

    tracing::debug!(path = %path.display(), name = %config.name, "manifest updated");
    Ok(())
}

/// Merge baseline fields, the fetched manifest and the project name, then
/// sort the top-level keys
pub fn merge_manifest(
    initial: &Map<String, Value>,
    fetched: Map<String, Value>,
    name: &str,
) -> Map<String, Value> {
    let mut merged = initial.clone();
    merged.extend(fetched);
    merged.insert("name".to_string(), Value::String(name.to_string()));
    sort_keys(merged)
}

/// Order top-level keys lexicographically; nested values keep their order
fn sort_keys(map: Map<String, Value>) -> Map<String, Value> {
    let mut entries: Vec<(String, Value)> = map.into_iter().collect();
    entries.sort_by(|(a, _), (b, _)| a.cmp(b));
    entries.into_iter().collect()
}
