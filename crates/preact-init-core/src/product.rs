//! Product configuration trait for CLI binaries
//!
//! A binary implements this trait to supply its identity, the embedded
//! defaults and template schema, and the package manager it drives.

use std::path::Path;

/// Configuration trait for initializer products
///
/// Each product defines:
/// - Product identity (name, display name)
/// - Embedded `defaults.json` and `templates.json` documents
/// - The install command run inside the new project
/// - Post-setup instructions
pub trait ProductConfig: Clone + Send + Sync + 'static {
    /// Internal product name (used for CLI command, user agent)
    fn name(&self) -> &'static str;

    /// Human-readable display name
    fn display_name(&self) -> &'static str;

    /// Contents of `config/defaults.json`
    fn defaults_json(&self) -> &'static str;

    /// Contents of `config/templates.json`
    fn schema_json(&self) -> &'static str;

    /// Environment variable name for overriding the default template
    fn template_env(&self) -> &'static str;

    /// Package manager program and arguments for the install stage
    fn install_command(&self) -> (&'static str, &'static [&'static str]);

    /// Generate the "next steps" instructions after project creation
    fn next_steps(&self, dir: &Path) -> Vec<String>;

    /// User agent string for HTTP requests
    fn user_agent(&self) -> &'static str {
        self.name()
    }
}
