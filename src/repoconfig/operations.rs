//! Config loading, strict parsing, and validation.

use super::model::{ProjectConfig, RepoConfig, WorkflowConfig};
use crate::error::{Result, StageError};
use regex::Regex;
use std::io::ErrorKind;
use std::path::Path;
use std::sync::LazyLock;

/// Name of the config file at the repository root.
pub const CONFIG_FILENAME: &str = "atlantis.yaml";

/// The only schema version this crate understands.
pub const SUPPORTED_VERSION: i64 = 2;

static STRUCT_NAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bstruct [A-Z][A-Za-z0-9_]*").expect("Invalid struct regex"));

static ENUM_NAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\benum [A-Z][A-Za-z0-9_]*").expect("Invalid enum regex"));

static INT_TYPE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bexpected [iu](?:8|16|32|64|128|size)\b").expect("Invalid integer regex")
});

impl RepoConfig {
    /// Load `atlantis.yaml` from a repository checkout.
    ///
    /// # Returns
    ///
    /// * `Ok(None)` - The file does not exist; callers fall back to defaults
    /// * `Ok(Some(config))` - The file parsed and validated
    /// * `Err(StageError::ReadConfig)` - The file exists but could not be read
    /// * `Err(StageError::InvalidConfig)` - Schema or validation failure
    pub fn load<P: AsRef<Path>>(repo_dir: P) -> Result<Option<Self>> {
        let path = repo_dir.as_ref().join(CONFIG_FILENAME);

        let content = match std::fs::read(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(StageError::ReadConfig {
                    filename: CONFIG_FILENAME,
                    source: e,
                });
            }
        };

        Self::from_bytes(&content).map(Some)
    }

    /// Parse and validate config from a YAML string.
    ///
    /// Unknown fields anywhere in the document are rejected.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Self::from_bytes(yaml.as_bytes())
    }

    /// Parse and validate config from raw file contents.
    ///
    /// Bytes that are not valid UTF-8 are a parse failure, not a read failure.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let config: RepoConfig = serde_yaml::from_slice(bytes)
            .map_err(|e| invalid(sanitize_schema_error(&e.to_string())))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate structural invariants, stopping at the first violation.
    ///
    /// Validation rules, in order:
    /// - `version` must equal 2
    /// - `projects` must contain at least one entry
    /// - every project must have a non-empty `dir`
    pub fn validate(&self) -> Result<()> {
        if self.version != SUPPORTED_VERSION {
            return Err(invalid(format!(
                "unknown version: must have \"version: {}\" set",
                SUPPORTED_VERSION
            )));
        }

        if self.projects.is_empty() {
            return Err(invalid(
                "'projects' key must exist and contain at least one element".to_string(),
            ));
        }

        for (i, project) in self.projects.iter().enumerate() {
            if project.dir.is_empty() {
                return Err(invalid(format!(
                    "project at index {} invalid: dir key must be set and non-empty",
                    i
                )));
            }
        }

        Ok(())
    }

    /// First project whose `(dir, workspace)` equals the given pair.
    pub fn find_project(&self, dir: &str, workspace: &str) -> Option<&ProjectConfig> {
        self.projects
            .iter()
            .find(|p| p.dir == dir && p.workspace == workspace)
    }

    pub fn workflow(&self, name: &str) -> Option<&WorkflowConfig> {
        self.workflows.get(name)
    }
}

fn invalid(message: String) -> StageError {
    StageError::InvalidConfig {
        filename: CONFIG_FILENAME,
        message,
    }
}

/// Replace Rust type names in deserializer messages with schema wording.
pub(crate) fn sanitize_schema_error(message: &str) -> String {
    let message = STRUCT_NAME_REGEX.replace_all(message, "a mapping");
    let message = ENUM_NAME_REGEX.replace_all(&message, "a known value");
    INT_TYPE_REGEX
        .replace_all(&message, "expected an integer")
        .into_owned()
}
