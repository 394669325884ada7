//! End-to-end pipeline runs against fake collaborators

use preact_init_core::config::Defaults;
use preact_init_core::{
    Fetcher, InitError, Installer, PartialConfig, PartialOptions, Pipeline, ProgressEvent,
    ProjectConfig, Prompter, Settings, Stage, ValidationError,
};
use serde_json::{json, Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

const DEFAULTS: &str = r#"{"name": "my-project", "template": "churris/preact-simple-template", "options": {"ssh": false}}"#;

fn settings() -> Settings {
    let schema = json!({
        "validFiles": [".git", ".gitignore", "README.md", "LICENSE", ".DS_Store"],
        "requiredTree": {
            "type": "directory",
            "children": [{"name": "src", "type": "directory"}]
        },
        "validPackage": {"scripts": {}},
        "dependencies": ["preact"],
        "devDependencies": ["webpack"],
        "initialPackage": {"version": "0.0.0", "private": true}
    });
    Settings::from_json(DEFAULTS, &schema.to_string()).unwrap()
}

/// Prompter that answers with fixed values and a fixed confirmation
struct Scripted {
    answers: PartialConfig,
    confirm: bool,
}

impl Scripted {
    fn confirming() -> Self {
        Self {
            answers: PartialConfig::default(),
            confirm: true,
        }
    }
}

impl Prompter for Scripted {
    fn assist(
        &self,
        _initial: &PartialConfig,
        _defaults: &Defaults,
    ) -> Result<PartialConfig, InitError> {
        Ok(self.answers.clone())
    }

    fn confirm(&self, _config: &ProjectConfig) -> Result<bool, InitError> {
        Ok(self.confirm)
    }
}

/// Fetcher that writes a fixed template tree
#[derive(Clone, Default)]
struct TreeFetcher {
    with_src: bool,
    calls: Arc<AtomicUsize>,
    seen: Arc<Mutex<Vec<(String, bool)>>>,
}

impl TreeFetcher {
    fn new(with_src: bool) -> Self {
        Self {
            with_src,
            ..Default::default()
        }
    }
}

impl Fetcher for TreeFetcher {
    async fn fetch(
        &self,
        template: &str,
        destination: &Path,
        use_ssh: bool,
    ) -> Result<(), InitError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen
            .lock()
            .unwrap()
            .push((template.to_string(), use_ssh));

        fs::create_dir_all(destination.join("public")).unwrap();
        fs::write(destination.join("public/index.html"), "<div id=\"app\"></div>").unwrap();
        if self.with_src {
            fs::create_dir_all(destination.join("src")).unwrap();
            fs::write(destination.join("src/index.js"), "import { h } from 'preact';").unwrap();
        }
        let manifest = json!({
            "name": "preact-simple-template",
            "version": "1.0.0",
            "scripts": {"start": "webpack-dev-server", "build": "webpack"},
            "dependencies": {"preact": "^8.2.5"},
            "devDependencies": {"webpack": "^3.8.1"}
        });
        fs::write(
            destination.join("package.json"),
            serde_json::to_string_pretty(&manifest).unwrap(),
        )
        .unwrap();
        Ok(())
    }
}

/// Installer that records its working directories and exits with `code`
#[derive(Clone, Default)]
struct RecordingInstaller {
    code: Option<i32>,
    calls: Arc<Mutex<Vec<PathBuf>>>,
}

impl Installer for RecordingInstaller {
    async fn install(&self, directory: &Path) -> Result<(), InitError> {
        self.calls.lock().unwrap().push(directory.to_path_buf());
        match self.code {
            Some(code) => Err(InitError::Install { code: Some(code) }),
            None => Ok(()),
        }
    }
}

fn demo() -> PartialConfig {
    PartialConfig {
        name: Some("demo".to_string()),
        template: Some("org/repo".to_string()),
        options: PartialOptions { ssh: Some(false) },
    }
}

fn read_manifest(dir: &Path) -> Map<String, Value> {
    serde_json::from_str(&fs::read_to_string(dir.join("package.json")).unwrap()).unwrap()
}

#[tokio::test]
async fn scenario_a_creates_project() {
    let tmp = tempfile::tempdir().unwrap();
    let settings = settings();
    let fetcher = TreeFetcher::new(true);
    let installer = RecordingInstaller::default();

    let mut pipeline = Pipeline::new(
        &settings,
        Scripted::confirming(),
        fetcher.clone(),
        installer.clone(),
        Vec::<ProgressEvent>::new(),
    )
    .base_dir(tmp.path().to_path_buf());

    let project = pipeline.run(demo()).await.unwrap();
    let expected_dir = tmp.path().join("demo");
    assert_eq!(project.directory, expected_dir);
    assert_eq!(project.config.name, "demo");

    assert!(expected_dir.join("public/index.html").is_file());
    assert!(expected_dir.join("src/index.js").is_file());

    let manifest = read_manifest(&expected_dir);
    assert_eq!(manifest["name"], "demo");
    assert_eq!(manifest["version"], "1.0.0");
    assert_eq!(manifest["private"], true);
    let keys: Vec<_> = manifest.keys().cloned().collect();
    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(keys, sorted);

    assert_eq!(
        *fetcher.seen.lock().unwrap(),
        vec![("org/repo".to_string(), false)]
    );
    assert_eq!(*installer.calls.lock().unwrap(), vec![expected_dir]);

    let events = pipeline.into_reporter();
    let expected: Vec<ProgressEvent> = Stage::ALL
        .iter()
        .flat_map(|s| [ProgressEvent::Started(*s), ProgressEvent::Succeeded(*s)])
        .collect();
    assert_eq!(events, expected);
}

#[tokio::test]
async fn scenario_b_tree_mismatch_removes_directory() {
    let tmp = tempfile::tempdir().unwrap();
    let settings = settings();
    let installer = RecordingInstaller::default();

    let mut pipeline = Pipeline::new(
        &settings,
        Scripted::confirming(),
        TreeFetcher::new(false),
        installer.clone(),
        Vec::<ProgressEvent>::new(),
    )
    .base_dir(tmp.path().to_path_buf());

    let err = pipeline.run(demo()).await.unwrap_err();
    assert!(matches!(
        err,
        InitError::Validation(ValidationError::TreeShape)
    ));
    assert!(!tmp.path().join("demo").exists());
    assert!(installer.calls.lock().unwrap().is_empty());

    let events = pipeline.into_reporter();
    assert!(matches!(
        events.last(),
        Some(ProgressEvent::Failed(Stage::ValidateTemplate, _))
    ));
}

#[tokio::test]
async fn scenario_c_unsafe_directory_skips_fetch() {
    let tmp = tempfile::tempdir().unwrap();
    let existing = tmp.path().join("demo");
    fs::create_dir_all(&existing).unwrap();
    fs::write(existing.join("notes.txt"), "draft").unwrap();

    let settings = settings();
    let fetcher = TreeFetcher::new(true);

    let mut pipeline = Pipeline::new(
        &settings,
        Scripted::confirming(),
        fetcher.clone(),
        RecordingInstaller::default(),
        Vec::<ProgressEvent>::new(),
    )
    .base_dir(tmp.path().to_path_buf());

    let err = pipeline.run(demo()).await.unwrap_err();
    assert!(matches!(
        err,
        InitError::UnsafeDirectory { ref entry, .. } if entry == "notes.txt"
    ));
    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
    assert_eq!(fs::read_to_string(existing.join("notes.txt")).unwrap(), "draft");
}

#[tokio::test]
async fn scenario_d_install_failure_keeps_project() {
    let tmp = tempfile::tempdir().unwrap();
    let settings = settings();
    let installer = RecordingInstaller {
        code: Some(2),
        ..Default::default()
    };

    let mut pipeline = Pipeline::new(
        &settings,
        Scripted::confirming(),
        TreeFetcher::new(true),
        installer.clone(),
        Vec::<ProgressEvent>::new(),
    )
    .base_dir(tmp.path().to_path_buf());

    let err = pipeline.run(demo()).await.unwrap_err();
    assert!(matches!(err, InitError::Install { code: Some(2) }));

    let dir = tmp.path().join("demo");
    assert!(dir.join("src/index.js").is_file());
    assert_eq!(read_manifest(&dir)["name"], "demo");
    assert_eq!(installer.calls.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn declined_confirmation_aborts_before_filesystem_changes() {
    let tmp = tempfile::tempdir().unwrap();
    let settings = settings();
    let fetcher = TreeFetcher::new(true);

    let mut pipeline = Pipeline::new(
        &settings,
        Scripted {
            answers: PartialConfig::default(),
            confirm: false,
        },
        fetcher.clone(),
        RecordingInstaller::default(),
        Vec::<ProgressEvent>::new(),
    )
    .base_dir(tmp.path().to_path_buf());

    let err = pipeline.run(demo()).await.unwrap_err();
    assert!(err.is_abort());
    assert!(!tmp.path().join("demo").exists());
    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
    assert!(pipeline.into_reporter().is_empty());
}

#[tokio::test]
async fn blank_config_uses_prompt_answers_and_defaults() {
    let tmp = tempfile::tempdir().unwrap();
    let settings = settings();
    let fetcher = TreeFetcher::new(true);

    let prompter = Scripted {
        answers: PartialConfig {
            name: Some("answered".to_string()),
            template: None,
            options: PartialOptions { ssh: Some(true) },
        },
        confirm: true,
    };

    let mut pipeline = Pipeline::new(
        &settings,
        prompter,
        fetcher.clone(),
        RecordingInstaller::default(),
        Vec::<ProgressEvent>::new(),
    )
    .base_dir(tmp.path().to_path_buf())
    .assume_yes(true);

    let project = pipeline.run(PartialConfig::default()).await.unwrap();
    assert_eq!(project.directory, tmp.path().join("answered"));
    assert_eq!(
        *fetcher.seen.lock().unwrap(),
        vec![("churris/preact-simple-template".to_string(), true)]
    );
}
