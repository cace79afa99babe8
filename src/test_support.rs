use crate::executor::{ToolExecutor, ToolVersion};
use crate::repoconfig::CONFIG_FILENAME;
use crate::steps::StepMeta;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// A throwaway repository checkout, optionally holding an `atlantis.yaml`.
pub(crate) fn create_checkout(config: Option<&str>) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    if let Some(yaml) = config {
        std::fs::write(temp_dir.path().join(CONFIG_FILENAME), yaml).unwrap();
    }
    temp_dir
}

/// One call observed by [`RecordingExecutor`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RecordedRun {
    pub dir: PathBuf,
    pub args: Vec<String>,
    pub version: String,
    pub workspace: String,
}

/// Executor that records every call and optionally fails.
#[derive(Debug, Default)]
pub(crate) struct RecordingExecutor {
    pub runs: Mutex<Vec<RecordedRun>>,
    pub fail_with: Option<String>,
}

impl RecordingExecutor {
    pub(crate) fn failing(message: &str) -> Self {
        Self {
            runs: Mutex::new(Vec::new()),
            fail_with: Some(message.to_string()),
        }
    }

    pub(crate) fn runs(&self) -> Vec<RecordedRun> {
        self.runs
            .lock()
            .unwrap_or_else(|poison| poison.into_inner())
            .clone()
    }
}

impl ToolExecutor for RecordingExecutor {
    fn run(
        &self,
        dir: &Path,
        args: &[String],
        version: &ToolVersion,
        workspace: &str,
    ) -> Result<String, String> {
        self.runs
            .lock()
            .unwrap_or_else(|poison| poison.into_inner())
            .push(RecordedRun {
                dir: dir.to_path_buf(),
                args: args.to_vec(),
                version: version.to_string(),
                workspace: workspace.to_string(),
            });
        match &self.fail_with {
            Some(message) => Err(message.clone()),
            None => Ok(format!("ran {}", args.join(" "))),
        }
    }
}

/// Meta for `/repo/proj` in workspace `default`, run by `alice`.
pub(crate) fn test_meta(executor: Arc<dyn ToolExecutor>, comment_args: &[&str]) -> Arc<StepMeta> {
    Arc::new(StepMeta {
        span: tracing::Span::none(),
        workspace: "default".to_string(),
        absolute_path: PathBuf::from("/repo/proj"),
        repo_relative_dir: "proj".to_string(),
        tool_version: ToolVersion::new(0, 11, 10),
        executor,
        extra_comment_args: comment_args.iter().map(|s| s.to_string()).collect(),
        username: "alice".to_string(),
    })
}
