//! Stage resolution.
//!
//! Turns a `(stage, project dir, workspace)` request into the ordered steps to
//! run. Resolution order:
//!
//! 1. No `atlantis.yaml` in the checkout: built-in pipeline
//! 2. Config present, no project matches `(dir, workspace)`: error
//! 3. Matching project without a workflow: built-in pipeline
//! 4. Matching project naming an undeclared workflow: error
//! 5. Otherwise: the workflow's steps for the stage, in declared order
//!
//! Built-in pipelines are `[init, plan]` for plan and `[apply]` for apply.


use crate::error::{Result, StageError};
use crate::executor::{ToolExecutor, ToolVersion};
use crate::repoconfig::{CONFIG_FILENAME, RepoConfig, StageConfig, WorkflowConfig};
use crate::settings::ResolverSettings;
use crate::steps::{Step, StepMeta, StepRegistry};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// The two phases a pipeline can be resolved for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Plan,
    Apply,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Plan => "plan",
            Stage::Apply => "apply",
        }
    }

    /// Built-in pipeline used when the config does not override the stage.
    pub fn default_steps(&self, meta: &Arc<StepMeta>) -> Vec<Step> {
        match self {
            Stage::Plan => vec![
                Step::init(Vec::new(), Arc::clone(meta)),
                Step::plan(Vec::new(), Arc::clone(meta)),
            ],
            Stage::Apply => vec![Step::apply(Vec::new(), Arc::clone(meta))],
        }
    }

    fn select<'a>(&self, workflow: &'a WorkflowConfig) -> &'a StageConfig {
        match self {
            Stage::Plan => &workflow.plan,
            Stage::Apply => &workflow.apply,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inputs of one resolution call.
#[derive(Debug, Clone, Default)]
pub struct StageRequest {
    /// Repository checkout on disk.
    pub repo_dir: PathBuf,
    pub workspace: String,
    /// Project dir relative to the repository root.
    pub project_dir: String,
    /// Extra tool arguments taken from the triggering comment.
    pub extra_comment_args: Vec<String>,
    pub username: String,
}

/// Resolves stages against the `atlantis.yaml` of a checkout.
///
/// Holds no per-repository state: every call reads the config file again.
#[derive(Debug, Clone)]
pub struct Resolver {
    executor: Arc<dyn ToolExecutor>,
    default_tool_version: ToolVersion,
    registry: StepRegistry,
}

impl Resolver {
    pub fn new(executor: Arc<dyn ToolExecutor>, default_tool_version: ToolVersion) -> Self {
        Self {
            executor,
            default_tool_version,
            registry: StepRegistry::builtin(),
        }
    }

    pub fn from_settings(
        settings: &ResolverSettings,
        executor: Arc<dyn ToolExecutor>,
    ) -> Self {
        Self::new(executor, settings.default_tool_version.clone())
            .with_registry(StepRegistry::builtin().with_policy(settings.unknown_steps))
    }

    pub fn with_registry(mut self, registry: StepRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn registry(&self) -> &StepRegistry {
        &self.registry
    }

    pub fn build_plan_stage(&self, request: &StageRequest) -> Result<Vec<Step>> {
        self.build_stage(Stage::Plan, request)
    }

    pub fn build_apply_stage(&self, request: &StageRequest) -> Result<Vec<Step>> {
        self.build_stage(Stage::Apply, request)
    }

    /// Resolve the ordered steps for `stage`.
    ///
    /// # Errors
    ///
    /// - `ReadConfig` / `InvalidConfig` from loading `atlantis.yaml`
    /// - `ProjectNotFound` when the config has no entry for `(dir, workspace)`
    /// - `WorkflowNotFound` when the matching entry names an undeclared workflow
    /// - `UnsupportedStep` when the registry policy is `Fail`
    pub fn build_stage(&self, stage: Stage, request: &StageRequest) -> Result<Vec<Step>> {
        let meta = self.build_meta(request);
        let defaults = stage.default_steps(&meta);

        let Some(config) = RepoConfig::load(&request.repo_dir)? else {
            tracing::info!(
                parent: &meta.span,
                "no {} file found, continuing with defaults",
                CONFIG_FILENAME
            );
            return Ok(defaults);
        };

        let project = config
            .find_project(&request.project_dir, &request.workspace)
            .ok_or_else(|| StageError::ProjectNotFound {
                dir: request.project_dir.clone(),
                workspace: request.workspace.clone(),
            })?;

        if project.workflow.is_empty() {
            tracing::info!(
                parent: &meta.span,
                "no {} workflow set, continuing with defaults",
                CONFIG_FILENAME
            );
            return Ok(defaults);
        }

        let workflow = config
            .workflow(&project.workflow)
            .ok_or_else(|| StageError::WorkflowNotFound(project.workflow.clone()))?;

        let mut steps = Vec::new();
        for (index, step_config) in stage.select(workflow).steps.iter().enumerate() {
            if let Some(step) = self.registry.build(index, step_config, &meta)? {
                steps.push(step);
            }
        }

        tracing::debug!(
            parent: &meta.span,
            workflow = %project.workflow,
            stage = stage.as_str(),
            steps = steps.len(),
            "resolved workflow stage"
        );
        Ok(steps)
    }

    fn build_meta(&self, request: &StageRequest) -> Arc<StepMeta> {
        Arc::new(StepMeta {
            span: tracing::info_span!(
                "stage",
                workspace = %request.workspace,
                dir = %request.project_dir,
                user = %request.username
            ),
            workspace: request.workspace.clone(),
            absolute_path: request.repo_dir.join(&request.project_dir),
            repo_relative_dir: request.project_dir.clone(),
            // The schema has no per-project override, so the default always applies.
            tool_version: self.default_tool_version.clone(),
            executor: Arc::clone(&self.executor),
            extra_comment_args: request.extra_comment_args.clone(),
            username: request.username.clone(),
        })
    }
}
