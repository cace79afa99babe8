//! Schema for `atlantis.yaml`.
//!
//! Every struct rejects unknown fields, so a typo in the file is a hard
//! error rather than a silently ignored key.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Root of a validated `atlantis.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RepoConfig {
    /// Schema version. Only `2` is accepted.
    #[serde(default)]
    pub version: i64,

    /// Declared project bindings, in file order.
    #[serde(default)]
    pub projects: Vec<ProjectConfig>,

    /// Named workflows referenced by projects.
    #[serde(default)]
    pub workflows: BTreeMap<String, WorkflowConfig>,
}

/// One `(dir, workspace, workflow)` binding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    /// Project path relative to the repository root.
    #[serde(default)]
    pub dir: String,

    /// Workspace this binding applies to.
    #[serde(default)]
    pub workspace: String,

    /// Workflow name, or empty to use the built-in pipelines.
    #[serde(default)]
    pub workflow: String,
}

/// A named pair of stage definitions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorkflowConfig {
    #[serde(default)]
    pub plan: StageConfig,

    #[serde(default)]
    pub apply: StageConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StageConfig {
    #[serde(default)]
    pub steps: Vec<StepConfig>,
}

/// One declared step inside a stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StepConfig {
    pub step_type: StepType,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra_args: Vec<String>,
}

/// Step kinds a config may name.
///
/// `custom` is accepted by the schema but has no built-in constructor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepType {
    Init,
    Plan,
    Apply,
    Custom,
}

impl StepType {
    pub fn as_str(&self) -> &'static str {
        match self {
            StepType::Init => "init",
            StepType::Plan => "plan",
            StepType::Apply => "apply",
            StepType::Custom => "custom",
        }
    }
}

impl fmt::Display for StepType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
