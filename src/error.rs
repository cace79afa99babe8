//! Error types for repo-stages.
//!
//! Uses thiserror for derive macros. Every variant carries a message fit for
//! showing to the person who wrote the atlantis.yaml file.

use crate::exit_codes;
use thiserror::Error;

/// Main error type for stage resolution.
#[derive(Error, Debug)]
pub enum StageError {
    /// The config file exists but could not be read.
    #[error("unable to read {filename} file: {source}")]
    ReadConfig {
        filename: &'static str,
        #[source]
        source: std::io::Error,
    },

    /// The config file is malformed or fails validation.
    #[error("parsing {filename}: {message}")]
    InvalidConfig {
        filename: &'static str,
        message: String,
    },

    /// No project entry matches the requested dir and workspace.
    #[error("no project with dir {dir:?} and workspace {workspace:?} defined")]
    ProjectNotFound { dir: String, workspace: String },

    /// A project references a workflow the config does not declare.
    #[error("no workflow with key {0:?} defined")]
    WorkflowNotFound(String),

    /// A step type has no registered constructor and the policy is to fail.
    #[error("step at index {index} has unsupported step_type {step_type:?}")]
    UnsupportedStep { step_type: String, index: usize },

    /// A tool version string could not be parsed.
    #[error("invalid tool version {0:?}: expected MAJOR.MINOR.PATCH")]
    InvalidToolVersion(String),

    /// The tool executor reported a failure while running a step.
    #[error("running {step} step: {message}")]
    StepFailed { step: &'static str, message: String },

    /// User provided invalid arguments.
    #[error("{0}")]
    UserError(String),
}

impl StageError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            StageError::ReadConfig { .. } => exit_codes::IO_FAILURE,
            StageError::InvalidConfig { .. } => exit_codes::CONFIG_FAILURE,
            StageError::ProjectNotFound { .. } => exit_codes::USER_ERROR,
            StageError::WorkflowNotFound(_) => exit_codes::USER_ERROR,
            StageError::UnsupportedStep { .. } => exit_codes::CONFIG_FAILURE,
            StageError::InvalidToolVersion(_) => exit_codes::USER_ERROR,
            StageError::StepFailed { .. } => exit_codes::STEP_FAILURE,
            StageError::UserError(_) => exit_codes::USER_ERROR,
        }
    }
}

/// Result type alias for repo-stages operations.
pub type Result<T> = std::result::Result<T, StageError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn read_error_has_io_exit_code() {
        let err = StageError::ReadConfig {
            filename: "atlantis.yaml",
            source: io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"),
        };
        assert_eq!(err.exit_code(), exit_codes::IO_FAILURE);
        assert_eq!(
            err.to_string(),
            "unable to read atlantis.yaml file: permission denied"
        );
    }

    #[test]
    fn invalid_config_has_config_exit_code() {
        let err = StageError::InvalidConfig {
            filename: "atlantis.yaml",
            message: "unknown version: must have \"version: 2\" set".to_string(),
        };
        assert_eq!(err.exit_code(), exit_codes::CONFIG_FAILURE);
        assert_eq!(
            err.to_string(),
            "parsing atlantis.yaml: unknown version: must have \"version: 2\" set"
        );
    }

    #[test]
    fn lookup_errors_quote_the_missing_key() {
        let err = StageError::ProjectNotFound {
            dir: "proj".to_string(),
            workspace: "staging".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "no project with dir \"proj\" and workspace \"staging\" defined"
        );
        assert_eq!(err.exit_code(), exit_codes::USER_ERROR);

        let err = StageError::WorkflowNotFound("missing".to_string());
        assert_eq!(err.to_string(), "no workflow with key \"missing\" defined");
    }

    #[test]
    fn step_failure_has_step_exit_code() {
        let err = StageError::StepFailed {
            step: "plan",
            message: "exit status 1".to_string(),
        };
        assert_eq!(err.exit_code(), exit_codes::STEP_FAILURE);
        assert_eq!(err.to_string(), "running plan step: exit status 1");
    }
}
