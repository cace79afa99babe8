//! Tool version and tool executor capability.
//!
//! Resolution never runs the infrastructure tool. It only attaches the
//! executor and the resolved version to every step so the caller can run
//! them later.

use crate::error::{Result, StageError};
use regex::Regex;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::LazyLock;

static VERSION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^v?(\d+)\.(\d+)\.(\d+)(?:-([0-9A-Za-z.-]+))?$").expect("Invalid version regex")
});

/// A resolved tool version such as `0.11.10` or `1.5.0-beta1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ToolVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub pre: Option<String>,
}

impl ToolVersion {
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
            pre: None,
        }
    }
}

impl FromStr for ToolVersion {
    type Err = StageError;

    fn from_str(s: &str) -> Result<Self> {
        let caps = VERSION_REGEX
            .captures(s.trim())
            .ok_or_else(|| StageError::InvalidToolVersion(s.to_string()))?;

        let part = |i: usize| -> Result<u64> {
            caps[i]
                .parse()
                .map_err(|_| StageError::InvalidToolVersion(s.to_string()))
        };

        Ok(Self {
            major: part(1)?,
            minor: part(2)?,
            patch: part(3)?,
            pre: caps.get(4).map(|m| m.as_str().to_string()),
        })
    }
}

impl fmt::Display for ToolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(pre) = &self.pre {
            write!(f, "-{}", pre)?;
        }
        Ok(())
    }
}

/// Capability that runs the infrastructure tool for a step.
///
/// Implementations receive the full argument vector; the returned string is
/// the tool's captured output. An `Err` carries a human-readable reason.
pub trait ToolExecutor: Send + Sync + fmt::Debug {
    fn run(
        &self,
        dir: &Path,
        args: &[String],
        version: &ToolVersion,
        workspace: &str,
    ) -> std::result::Result<String, String>;
}

/// Executor that runs nothing and echoes the command it was given.
///
/// Used by the CLI, which only displays resolved pipelines.
#[derive(Debug, Default, Clone, Copy)]
pub struct DryRunExecutor;

impl ToolExecutor for DryRunExecutor {
    fn run(
        &self,
        dir: &Path,
        args: &[String],
        version: &ToolVersion,
        workspace: &str,
    ) -> std::result::Result<String, String> {
        Ok(format!(
            "[dry-run {} workspace={}] {}: {}",
            version,
            workspace,
            dir.display(),
            shell_words::join(args)
        ))
    }
}
