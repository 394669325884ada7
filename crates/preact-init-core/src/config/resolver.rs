//! Config resolution: fills in name/template through the prompter

use super::{Defaults, PartialConfig, ProjectConfig};
use crate::error::Result;

/// Interactive collaborator used by the config resolver
pub trait Prompter {
    /// Ask the user for every answer, offering `defaults` as initial values.
    /// Returns `InitError::Aborted` if the user cancels.
    fn assist(&self, initial: &PartialConfig, defaults: &Defaults) -> Result<PartialConfig>;

    /// Show the merged configuration and ask for confirmation
    fn confirm(&self, config: &ProjectConfig) -> Result<bool>;
}

/// Resolve the user's configuration.
///
/// Prompts only when neither a name nor a template was supplied; otherwise
/// the initial config passes through and defaults are applied later.
pub fn resolve<P: Prompter>(
    initial: PartialConfig,
    prompter: &P,
    defaults: &Defaults,
) -> Result<PartialConfig> {
    if !initial.is_blank() {
        return Ok(initial);
    }

    let answers = prompter.assist(&initial, defaults)?;
    Ok(initial.merge(answers))
}
