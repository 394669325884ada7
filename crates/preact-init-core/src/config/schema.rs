//! Template schema (`config/templates.json`)

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeSet;

/// Requirements a fetched template must satisfy
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateSchema {
    /// Entries allowed to preexist in the target directory
    #[serde(default)]
    pub valid_files: BTreeSet<String>,

    /// Required subset of the directory-tree snapshot
    #[serde(default = "empty_object")]
    pub required_tree: Value,

    /// Required key/value subset of the package manifest
    #[serde(default = "empty_object")]
    pub valid_package: Value,

    /// Names that must be keys of the manifest's `dependencies`
    #[serde(default)]
    pub dependencies: Vec<String>,

    /// Names that must be keys of the manifest's `devDependencies`
    #[serde(default)]
    pub dev_dependencies: Vec<String>,

    /// Baseline fields merged under the fetched manifest
    #[serde(default)]
    pub initial_package: Map<String, Value>,

    /// Manifest file name at the template root
    #[serde(default = "default_manifest_file")]
    pub manifest_file: String,
}

impl TemplateSchema {
    /// Check if an entry may preexist in the project directory
    pub fn is_valid_file(&self, name: &str) -> bool {
        self.valid_files.contains(name)
    }

    /// Required dependency names, paired with the manifest field holding them
    pub fn required_dependencies(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.dependencies
            .iter()
            .map(|d| ("dependencies", d.as_str()))
            .chain(
                self.dev_dependencies
                    .iter()
                    .map(|d| ("devDependencies", d.as_str())),
            )
    }
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}

fn default_manifest_file() -> String {
    "package.json".to_string()
}
