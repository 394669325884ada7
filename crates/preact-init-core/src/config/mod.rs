//! Project configuration, defaults and the static template schema
//!
//! This module provides:
//! - `ProjectConfig` / `PartialConfig` and their merge rules
//! - `TemplateSchema`, the validation requirements for fetched templates
//! - `Settings`, both JSON documents parsed once at startup
//! - The config resolver and npm package-name validation

pub mod name;
pub mod resolver;
pub mod schema;

use crate::error::{InitError, Result};
use crate::product::ProductConfig;
use serde::{Deserialize, Serialize};

pub use name::validate_package_name;
pub use resolver::{resolve, Prompter};
pub use schema::TemplateSchema;

/// Options that change how the template is fetched
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectOptions {
    /// Clone over SSH instead of downloading an archive
    #[serde(default)]
    pub ssh: bool,
}

/// Fully resolved configuration for one pipeline run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Project name, also the directory name and the manifest `name`
    pub name: String,

    /// Template source locator (`owner/repo`, `github:owner/repo`, a URL...)
    pub template: String,

    #[serde(default)]
    pub options: ProjectOptions,
}

/// `config/defaults.json` has the same shape as a resolved config
pub type Defaults = ProjectConfig;

/// Partially specified options from the CLI or prompts
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialOptions {
    pub ssh: Option<bool>,
}

/// Configuration as supplied by the user, before defaults are applied
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialConfig {
    pub name: Option<String>,
    pub template: Option<String>,
    pub options: PartialOptions,
}

impl PartialConfig {
    /// True when neither a name nor a template was supplied
    pub fn is_blank(&self) -> bool {
        self.name.is_none() && self.template.is_none()
    }

    /// Merge `answers` over `self`; fields set in `answers` win
    pub fn merge(self, answers: PartialConfig) -> PartialConfig {
        PartialConfig {
            name: answers.name.or(self.name),
            template: answers.template.or(self.template),
            options: PartialOptions {
                ssh: answers.options.ssh.or(self.options.ssh),
            },
        }
    }

    /// Fill every missing field from `defaults`
    pub fn finalize(self, defaults: &Defaults) -> ProjectConfig {
        ProjectConfig {
            name: self.name.unwrap_or_else(|| defaults.name.clone()),
            template: self.template.unwrap_or_else(|| defaults.template.clone()),
            options: ProjectOptions {
                ssh: self.options.ssh.unwrap_or(defaults.options.ssh),
            },
        }
    }
}

/// Static configuration loaded once at process start
#[derive(Debug, Clone)]
pub struct Settings {
    pub defaults: Defaults,
    pub schema: TemplateSchema,
}

impl Settings {
    /// Parse the `defaults.json` and `templates.json` documents
    pub fn from_json(defaults: &str, schema: &str) -> Result<Self> {
        let defaults: Defaults = serde_json::from_str(defaults)
            .map_err(|e| InitError::Config(format!("invalid defaults.json: {}", e)))?;
        let schema: TemplateSchema = serde_json::from_str(schema)
            .map_err(|e| InitError::Config(format!("invalid templates.json: {}", e)))?;
        Ok(Self { defaults, schema })
    }

    /// Load settings for a product, honouring its template override variable
    pub fn from_product<C: ProductConfig>(config: &C) -> Result<Self> {
        let mut settings = Self::from_json(config.defaults_json(), config.schema_json())?;
        if let Ok(template) = std::env::var(config.template_env()) {
            let template = template.trim();
            if !template.is_empty() {
                tracing::debug!(template, "default template overridden from environment");
                settings.defaults.template = template.to_string();
            }
        }
        Ok(settings)
    }
}
