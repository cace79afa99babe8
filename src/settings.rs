//! Runtime settings for the resolver.
//!
//! The CLI fills these from flags, falling back to environment variables.

use crate::executor::ToolVersion;
use crate::steps::UnknownStepPolicy;

/// Tool version assumed when nothing more specific is configured.
pub const DEFAULT_TOOL_VERSION: &str = "0.11.10";

/// Environment variable overriding the default tool version.
pub const TOOL_VERSION_ENV: &str = "REPO_STAGES_TOOL_VERSION";

/// Environment variable selecting the unknown step policy.
pub const UNKNOWN_STEPS_ENV: &str = "REPO_STAGES_UNKNOWN_STEPS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverSettings {
    /// Version attached to every resolved step.
    pub default_tool_version: ToolVersion,

    /// Handling of declared steps with no registered constructor.
    pub unknown_steps: UnknownStepPolicy,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            default_tool_version: ToolVersion::new(0, 11, 10),
            unknown_steps: UnknownStepPolicy::default(),
        }
    }
}
