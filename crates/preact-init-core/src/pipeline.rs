//! The project-initialization pipeline
//!
//! Stages run strictly in order and the first failure ends the run:
//!
//! 1. Create the project directory (must be empty apart from `validFiles`)
//! 2. Fetch the template
//! 3. Validate the template (removed on failure)
//! 4. Rewrite the package manifest
//! 5. Install dependencies
//!
//! Config resolution happens before stage 1. Progress is reported as
//! [`ProgressEvent`]s; rendering them is up to the [`Reporter`].

use crate::config::{resolve, PartialConfig, ProjectConfig, Prompter, Settings};
use crate::error::{InitError, Result};
use crate::project::create_project_directory;
use crate::runtime::Installer;
use crate::templates::{update_manifest, validate_template, Fetcher};
use std::fmt;
use std::future::Future;
use std::path::PathBuf;

/// A pipeline stage
///
/// Config resolution runs before these and reports nothing: its prompts and
/// confirmation render themselves, and a declined run must leave no trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    CreateDirectory,
    FetchTemplate,
    ValidateTemplate,
    UpdateManifest,
    InstallDependencies,
}

impl Stage {
    pub const ALL: [Stage; 5] = [
        Stage::CreateDirectory,
        Stage::FetchTemplate,
        Stage::ValidateTemplate,
        Stage::UpdateManifest,
        Stage::InstallDependencies,
    ];

    /// 1-based position in the pipeline
    pub fn position(&self) -> usize {
        match self {
            Stage::CreateDirectory => 1,
            Stage::FetchTemplate => 2,
            Stage::ValidateTemplate => 3,
            Stage::UpdateManifest => 4,
            Stage::InstallDependencies => 5,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Stage::CreateDirectory => "Create project's directory",
            Stage::FetchTemplate => "Fetch template",
            Stage::ValidateTemplate => "Validate downloaded template",
            Stage::UpdateManifest => "Update package.json",
            Stage::InstallDependencies => "Install dependencies",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}/{}] {}",
            self.position(),
            Stage::ALL.len(),
            self.description()
        )
    }
}

/// Progress notifications emitted by the pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    Started(Stage),
    Succeeded(Stage),
    Failed(Stage, String),
}

/// Consumer of progress events (spinners, logs, test recorders)
pub trait Reporter {
    fn report(&mut self, event: ProgressEvent);
}

impl Reporter for Vec<ProgressEvent> {
    fn report(&mut self, event: ProgressEvent) {
        self.push(event);
    }
}

impl<R: Reporter + ?Sized> Reporter for &mut R {
    fn report(&mut self, event: ProgressEvent) {
        (**self).report(event);
    }
}

/// Result of a successful run
#[derive(Debug, Clone)]
pub struct Initialized {
    pub config: ProjectConfig,
    pub directory: PathBuf,
}

/// Pipeline driver owning the collaborators for one run
pub struct Pipeline<'a, P, F, I, R> {
    settings: &'a Settings,
    base_dir: PathBuf,
    assume_yes: bool,
    prompter: P,
    fetcher: F,
    installer: I,
    reporter: R,
}

impl<'a, P, F, I, R> Pipeline<'a, P, F, I, R>
where
    P: Prompter,
    F: Fetcher,
    I: Installer,
    R: Reporter,
{
    /// Create a pipeline rooted at the current working directory
    pub fn new(settings: &'a Settings, prompter: P, fetcher: F, installer: I, reporter: R) -> Self {
        Self {
            settings,
            base_dir: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            assume_yes: false,
            prompter,
            fetcher,
            installer,
            reporter,
        }
    }

    /// Create projects under `base_dir` instead of the working directory
    pub fn base_dir(mut self, base_dir: PathBuf) -> Self {
        self.base_dir = base_dir;
        self
    }

    /// Skip the confirmation prompt
    pub fn assume_yes(mut self, assume_yes: bool) -> Self {
        self.assume_yes = assume_yes;
        self
    }

    /// Resolve, merge with defaults and confirm the configuration
    pub fn resolve_config(&self, initial: PartialConfig) -> Result<ProjectConfig> {
        let partial = resolve(initial, &self.prompter, &self.settings.defaults)?;
        let config = partial.finalize(&self.settings.defaults);

        if !self.assume_yes && !self.prompter.confirm(&config)? {
            return Err(InitError::Aborted);
        }

        Ok(config)
    }

    /// Run the whole pipeline
    pub async fn run(&mut self, initial: PartialConfig) -> Result<Initialized> {
        let config = self.resolve_config(initial)?;
        let directory = self.initialize(&config).await?;
        Ok(Initialized { config, directory })
    }

    /// Run stages 1-5 for an already resolved configuration
    pub async fn initialize(&mut self, config: &ProjectConfig) -> Result<PathBuf> {
        let settings = self.settings;
        let schema = &settings.schema;
        tracing::info!(name = %config.name, template = %config.template, ssh = config.options.ssh, "initializing project");

        let directory = run_stage(
            &mut self.reporter,
            Stage::CreateDirectory,
            create_project_directory(&self.base_dir, &config.name, schema),
        )
        .await?;

        run_stage(
            &mut self.reporter,
            Stage::FetchTemplate,
            self.fetcher
                .fetch(&config.template, &directory, config.options.ssh),
        )
        .await?;

        // Scanning and cleanup use blocking fs calls
        let scanned = directory.clone();
        let owned_schema = schema.clone();
        run_stage(&mut self.reporter, Stage::ValidateTemplate, async move {
            let path = scanned.clone();
            tokio::task::spawn_blocking(move || validate_template(&scanned, &owned_schema))
                .await
                .map_err(|e| InitError::Snapshot {
                    path,
                    source: std::io::Error::other(e.to_string()),
                })?
        })
        .await?;

        run_stage(
            &mut self.reporter,
            Stage::UpdateManifest,
            update_manifest(&directory, config, schema),
        )
        .await?;

        run_stage(
            &mut self.reporter,
            Stage::InstallDependencies,
            self.installer.install(&directory),
        )
        .await?;

        Ok(directory)
    }

    /// Give back the reporter, e.g. to inspect recorded events
    pub fn into_reporter(self) -> R {
        self.reporter
    }
}

async fn run_stage<R, T>(
    reporter: &mut R,
    stage: Stage,
    work: impl Future<Output = Result<T>>,
) -> Result<T>
where
    R: Reporter,
{
    reporter.report(ProgressEvent::Started(stage));
    match work.await {
        Ok(value) => {
            reporter.report(ProgressEvent::Succeeded(stage));
            Ok(value)
        }
        Err(e) => {
            tracing::debug!(%stage, error = %e, "stage failed");
            reporter.report(ProgressEvent::Failed(stage, e.to_string()));
            Err(e)
        }
    }
}
