//! Repository configuration for repo-stages.
//!
//! This module defines the schema of the optional `atlantis.yaml` file at a
//! repository root. Parsing is strict (unknown fields are errors) and the
//! parsed value is validated before it is handed out. Nothing is cached;
//! every load reads the file again.

mod model;
mod operations;


// Re-export public API
pub use model::{ProjectConfig, RepoConfig, StageConfig, StepConfig, StepType, WorkflowConfig};
pub use operations::{CONFIG_FILENAME, SUPPORTED_VERSION};
