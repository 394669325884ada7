//! preact-init - Project initialization for Preact templates

use anyhow::{Context, Result};
use clap::{ArgAction, CommandFactory, Parser};
use colored::Colorize;
use preact_init_core::tui::CreateArgs;
use preact_init_core::ProductConfig;
use std::path::Path;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// CLI version
pub const CLI_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable holding a tracing filter (e.g. `debug`)
const LOG_ENV: &str = "PREACT_INIT_LOG";

/// Preact product configuration
#[derive(Clone)]
pub struct PreactConfig;

impl ProductConfig for PreactConfig {
    fn name(&self) -> &'static str {
        "preact-init"
    }

    fn display_name(&self) -> &'static str {
        "preact-init"
    }

    fn defaults_json(&self) -> &'static str {
        include_str!("../config/defaults.json")
    }

    fn schema_json(&self) -> &'static str {
        include_str!("../config/templates.json")
    }

    fn template_env(&self) -> &'static str {
        "PREACT_INIT_TEMPLATE"
    }

    fn install_command(&self) -> (&'static str, &'static [&'static str]) {
        ("npm", &["install"])
    }

    fn next_steps(&self, dir: &Path) -> Vec<String> {
        let mut steps = Vec::new();
        let current = std::env::current_dir().ok();

        if current.as_deref() != Some(dir) {
            steps.push(format!("cd {}", dir.display()));
        }

        steps.push("npm start       Runs the dev server with hot reload".to_string());
        steps.push("npm run build   Bundles your project into static files".to_string());

        steps
    }
}

#[derive(Parser, Debug)]
#[command(name = "preact-init")]
#[command(about = "Initialize a Preact project from a template repository")]
#[command(version)]
#[command(disable_version_flag = true)]
pub struct Args {
    /// Project name (also the directory to create)
    #[arg(value_name = "PROJECT_NAME")]
    pub name: Option<String>,

    /// Template source (owner/repo, gitlab:owner/repo or a URL)
    #[arg(value_name = "TEMPLATE_SOURCE")]
    pub template: Option<String>,

    #[arg(hide = true)]
    pub extra: Vec<String>,

    /// Clone the template over SSH
    #[arg(short, long)]
    pub ssh: bool,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,

    /// Print version
    #[arg(short = 'v', long = "version", action = ArgAction::Version)]
    pub version: Option<bool>,
}

impl Args {
    /// More than a name and a template shows usage instead of running
    fn wants_help(&self) -> bool {
        !self.extra.is_empty()
    }
}

impl From<Args> for CreateArgs {
    fn from(args: Args) -> Self {
        CreateArgs {
            name: args.name,
            template: args.template,
            ssh: args.ssh,
            yes: args.yes,
        }
    }
}

fn init_tracing() -> Result<()> {
    let Ok(directives) = std::env::var(LOG_ENV) else {
        return Ok(());
    };

    let filter = EnvFilter::try_new(&directives)
        .with_context(|| format!("Invalid {} filter: {}", LOG_ENV, directives))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))
}

async fn try_main() -> Result<ExitCode> {
    init_tracing()?;

    let args = Args::parse();
    if args.wants_help() {
        Args::command()
            .print_help()
            .context("Failed to print help")?;
        return Ok(ExitCode::SUCCESS);
    }

    let config = PreactConfig;
    let result = preact_init_core::run(&config, args.into(), CLI_VERSION).await;

    // Ensure cursor is visible on normal exit
    let _ = console::Term::stderr().show_cursor();

    match result {
        Ok(_) => Ok(ExitCode::SUCCESS),
        Err(e) if e.is_abort() => {
            eprintln!();
            eprintln!("{}", e.to_string().yellow());
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => Err(e.into()),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    match try_main().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!();
            eprintln!("{} {}", ">>".red(), e);
            ExitCode::FAILURE
        }
    }
}
