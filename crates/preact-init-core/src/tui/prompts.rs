//! Charm-style CLI prompts using cliclack

use crate::config::{validate_package_name, Defaults, PartialConfig, PartialOptions, Settings};
use crate::config::{ProjectConfig, Prompter};
use crate::error::{InitError, Result};
use crate::pipeline::{Pipeline, ProgressEvent, Reporter};
use crate::product::ProductConfig;
use crate::runtime::PackageManager;
use crate::templates::GitFetcher;
use colored::Colorize;
use std::io;
use std::path::{Path, PathBuf};

/// CLI arguments for the create command
#[derive(Debug, Clone, Default)]
pub struct CreateArgs {
    /// Project name (directory to create)
    pub name: Option<String>,

    /// Template source locator
    pub template: Option<String>,

    /// Clone the template over SSH
    pub ssh: bool,

    /// Skip the confirmation prompt
    pub yes: bool,
}

impl From<CreateArgs> for PartialConfig {
    fn from(args: CreateArgs) -> Self {
        PartialConfig {
            name: args.name,
            template: args.template,
            // An absent flag leaves the choice to prompts and defaults
            options: PartialOptions {
                ssh: args.ssh.then_some(true),
            },
        }
    }
}

/// Run the CLI with interactive prompts, returning the project directory
pub async fn run<C: ProductConfig>(
    config: &C,
    args: CreateArgs,
    cli_version: &str,
) -> Result<PathBuf> {
    let settings = Settings::from_product(config)?;

    cliclack::intro(format!("{} v{}", config.display_name(), cli_version)).map_err(prompt_error)?;

    let (program, program_args) = config.install_command();
    let assume_yes = args.yes;
    let mut pipeline = Pipeline::new(
        &settings,
        ClackPrompter,
        GitFetcher::new(config.user_agent()),
        PackageManager::new(program, program_args),
        SpinnerReporter::default(),
    )
    .assume_yes(assume_yes);

    let initialized = pipeline.run(args.into()).await?;

    print_next_steps(config, &initialized.directory).map_err(prompt_error)?;

    Ok(initialized.directory)
}

/// Prompter backed by cliclack inputs
#[derive(Debug, Clone, Copy, Default)]
pub struct ClackPrompter;

impl Prompter for ClackPrompter {
    fn assist(&self, initial: &PartialConfig, defaults: &Defaults) -> Result<PartialConfig> {
        cliclack::log::info(
            "This utility will walk you through creating the initial files of your project.\n\
             The name of the project must follow npm's naming pattern.",
        )
        .map_err(prompt_error)?;

        let name: String = cliclack::input("Project's name")
            .placeholder(&defaults.name)
            .default_input(&defaults.name)
            .validate(|input: &String| {
                validate_package_name(input)
                    .map_err(|errors| format!("Sorry, {}.", errors.join(" and ")))
            })
            .interact()
            .map_err(prompt_error)?;

        let template: String = cliclack::input("Template's repo")
            .placeholder(&defaults.template)
            .default_input(&defaults.template)
            .interact()
            .map_err(prompt_error)?;

        let ssh: bool = cliclack::confirm("Clone with SSH?")
            .initial_value(initial.options.ssh.unwrap_or(defaults.options.ssh))
            .interact()
            .map_err(prompt_error)?;

        Ok(PartialConfig {
            name: Some(name),
            template: Some(template),
            options: PartialOptions { ssh: Some(ssh) },
        })
    }

    fn confirm(&self, config: &ProjectConfig) -> Result<bool> {
        let rendered = serde_json::to_string_pretty(config)
            .map_err(|e| InitError::Config(e.to_string()))?;
        cliclack::note("Project configuration", rendered).map_err(prompt_error)?;

        cliclack::confirm("Is this ok?")
            .initial_value(true)
            .interact()
            .map_err(prompt_error)
    }
}

/// Renders pipeline progress as one spinner per stage
#[derive(Default)]
pub struct SpinnerReporter {
    spinner: Option<cliclack::ProgressBar>,
}

impl Reporter for SpinnerReporter {
    fn report(&mut self, event: ProgressEvent) {
        match event {
            ProgressEvent::Started(stage) => {
                let spinner = cliclack::spinner();
                spinner.start(format!("{}...", stage));
                self.spinner = Some(spinner);
            }
            ProgressEvent::Succeeded(stage) => {
                if let Some(spinner) = self.spinner.take() {
                    spinner.stop(stage.to_string());
                }
            }
            ProgressEvent::Failed(stage, _) => {
                if let Some(spinner) = self.spinner.take() {
                    spinner.error(stage.to_string());
                }
            }
        }
    }
}

/// Interrupted prompts (Esc / Ctrl+C) are user aborts
fn prompt_error(e: io::Error) -> InitError {
    if e.kind() == io::ErrorKind::Interrupted {
        InitError::Aborted
    } else {
        InitError::Config(format!("prompt failed: {}", e))
    }
}

fn print_next_steps<C: ProductConfig>(config: &C, project_dir: &Path) -> io::Result<()> {
    let steps = config.next_steps(project_dir);

    println!();
    println!("  You can run the following commands from {}", project_dir.display().to_string().yellow());
    println!();

    for (i, step) in steps.iter().enumerate() {
        println!("  {}.  {}", i + 1, step.cyan());
    }

    cliclack::outro("Success!")?;

    Ok(())
}
