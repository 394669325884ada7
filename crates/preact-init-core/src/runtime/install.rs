//! Dependency installation through an external package manager

use crate::error::{InitError, Result};
use std::future::Future;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command as TokioCommand;

/// Collaborator that installs dependencies inside a project directory
pub trait Installer {
    fn install(&self, directory: &Path) -> impl Future<Output = Result<()>> + Send;
}

/// Runs a package manager command (e.g. `npm install`) in the project directory
#[derive(Debug, Clone)]
pub struct PackageManager {
    program: String,
    args: Vec<String>,
}

impl PackageManager {
    /// Create a package manager runner for `program args...`
    pub fn new(program: &str, args: &[&str]) -> Self {
        Self {
            program: platform_program(program),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    /// `npm install`
    pub fn npm() -> Self {
        Self::new("npm", &["install"])
    }

    /// Command line shown to the user
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Installer for PackageManager {
    async fn install(&self, directory: &Path) -> Result<()> {
        tracing::info!(command = %self.command_line(), directory = %directory.display(), "installing dependencies");

        let status = TokioCommand::new(&self.program)
            .args(&self.args)
            .current_dir(directory)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map_err(|source| InitError::InstallSpawn {
                program: self.program.clone(),
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(InitError::Install {
                code: status.code(),
            })
        }
    }
}

/// npm and friends are batch scripts on Windows
fn platform_program(program: &str) -> String {
    if cfg!(windows) && matches!(program, "npm" | "npx" | "yarn" | "pnpm") {
        format!("{}.cmd", program)
    } else {
        program.to_string()
    }
}
