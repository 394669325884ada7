//! Directory-tree snapshots of fetched templates

use serde_json::{json, Map, Value};
use std::cmp::Ordering;
use std::io;
use std::path::Path;
use walkdir::{DirEntry, WalkDir};

/// Entries left out of snapshots (VCS metadata, installed packages)
const SKIPPED_ENTRIES: &[&str] = &[".git", "node_modules"];

/// Kind of a snapshot entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::File => "file",
            EntryKind::Directory => "directory",
        }
    }
}

/// Read-only snapshot of a directory tree.
///
/// Children are ordered directories first, then files, each by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryTree {
    pub name: String,
    pub kind: EntryKind,
    pub children: Vec<DirectoryTree>,
}

impl DirectoryTree {
    /// Scan `path` recursively
    pub fn scan(path: &Path) -> io::Result<Self> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        if !std::fs::metadata(path)?.is_dir() {
            return Ok(Self::file(name));
        }

        let mut children = Vec::new();
        let entries = WalkDir::new(path)
            .min_depth(1)
            .max_depth(1)
            .sort_by(directories_first);

        for entry in entries {
            let entry = entry.map_err(io::Error::from)?;
            let entry_name = entry.file_name().to_string_lossy();
            if SKIPPED_ENTRIES.iter().any(|skipped| *skipped == entry_name) {
                continue;
            }

            if entry.file_type().is_dir() {
                children.push(Self::scan(entry.path())?);
            } else {
                children.push(Self::file(entry_name.into_owned()));
            }
        }

        Ok(Self {
            name,
            kind: EntryKind::Directory,
            children,
        })
    }

    fn file(name: String) -> Self {
        Self {
            name,
            kind: EntryKind::File,
            children: Vec::new(),
        }
    }

    /// Find a direct child by name
    pub fn child(&self, name: &str) -> Option<&DirectoryTree> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Tagged value used for superset matching.
    ///
    /// Directory children are keyed by entry name so a required entry matches
    /// by path regardless of its siblings. Files carry no `children` key.
    pub fn to_value(&self) -> Value {
        match self.kind {
            EntryKind::File => json!({
                "name": self.name,
                "type": self.kind.as_str(),
            }),
            EntryKind::Directory => {
                let children: Map<String, Value> = self
                    .children
                    .iter()
                    .map(|child| (child.name.clone(), child.to_value()))
                    .collect();
                json!({
                    "name": self.name,
                    "type": self.kind.as_str(),
                    "children": children,
                })
            }
        }
    }
}

/// Rewrite a required tree so `children` lists become maps keyed by `name`,
/// the shape produced by [`DirectoryTree::to_value`].
///
/// A `children` list with an unnamed entry is kept as a list and can never
/// match a snapshot.
pub fn key_children_by_name(required: &Value) -> Value {
    let Value::Object(fields) = required else {
        return required.clone();
    };

    fields
        .iter()
        .map(|(key, value)| {
            let value = match value {
                Value::Array(entries) if key == "children" => keyed_entries(entries)
                    .map(Value::Object)
                    .unwrap_or_else(|| value.clone()),
                _ => value.clone(),
            };
            (key.clone(), value)
        })
        .collect::<Map<_, _>>()
        .into()
}

fn keyed_entries(entries: &[Value]) -> Option<Map<String, Value>> {
    entries
        .iter()
        .map(|entry| {
            let name = entry.get("name")?.as_str()?;
            Some((name.to_string(), key_children_by_name(entry)))
        })
        .collect()
}

fn directories_first(a: &DirEntry, b: &DirEntry) -> Ordering {
    b.file_type()
        .is_dir()
        .cmp(&a.file_type().is_dir())
        .then_with(|| a.file_name().cmp(b.file_name()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_scan_orders_directories_first() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("demo");
        fs::create_dir_all(root.join("src/components")).unwrap();
        fs::create_dir_all(root.join("assets")).unwrap();
        fs::write(root.join("package.json"), "{}").unwrap();
        fs::write(root.join(".babelrc"), "{}").unwrap();
        fs::write(root.join("src/index.js"), "").unwrap();

        let tree = DirectoryTree::scan(&root).unwrap();
        assert_eq!(tree.name, "demo");
        assert_eq!(tree.kind, EntryKind::Directory);

        let names: Vec<_> = tree.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["assets", "src", ".babelrc", "package.json"]);

        let src = tree.child("src").unwrap();
        let src_names: Vec<_> = src.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(src_names, vec!["components", "index.js"]);
    }

    #[test]
    fn test_scan_skips_git_and_node_modules() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir_all(tmp.path().join(".git/objects")).unwrap();
        fs::create_dir_all(tmp.path().join("node_modules/preact")).unwrap();
        fs::create_dir_all(tmp.path().join("src")).unwrap();

        let tree = DirectoryTree::scan(tmp.path()).unwrap();
        assert_eq!(tree.children.len(), 1);
        assert!(tree.child("src").is_some());
    }

    #[test]
    fn test_to_value_shape() {
        let tree = DirectoryTree {
            name: "root".to_string(),
            kind: EntryKind::Directory,
            children: vec![DirectoryTree::file("index.js".to_string())],
        };
        assert_eq!(
            tree.to_value(),
            json!({
                "name": "root",
                "type": "directory",
                "children": {"index.js": {"name": "index.js", "type": "file"}},
            })
        );
    }

    #[test]
    fn test_key_children_by_name() {
        let required = json!({
            "type": "directory",
            "children": [
                {"name": "src", "type": "directory", "children": [{"name": "index.js"}]},
                {"name": "package.json"}
            ]
        });
        assert_eq!(
            key_children_by_name(&required),
            json!({
                "type": "directory",
                "children": {
                    "src": {
                        "name": "src",
                        "type": "directory",
                        "children": {"index.js": {"name": "index.js"}}
                    },
                    "package.json": {"name": "package.json"}
                }
            })
        );

        let unnamed = json!({"children": [{"type": "file"}]});
        assert_eq!(key_children_by_name(&unnamed), unnamed);
    }

    #[test]
    fn test_scan_missing_path_fails() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(DirectoryTree::scan(&tmp.path().join("absent")).is_err());
    }
}
