//! Resolved steps.
//!
//! A resolved pipeline is a `Vec<Step>`. Every step in one pipeline points at
//! the same [`StepMeta`], built once per resolution call and never mutated.

mod registry;


pub use registry::{StepConstructor, StepRegistry, UnknownStepPolicy};

use crate::error::{Result, StageError};
use crate::executor::{ToolExecutor, ToolVersion};
use crate::repoconfig::StepType;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::Span;

/// Execution context shared by every step of one resolved pipeline.
#[derive(Debug)]
pub struct StepMeta {
    /// Span carrying workspace and dir; step logs are emitted inside it.
    pub span: Span,
    pub workspace: String,
    /// Repository root joined with the project dir.
    pub absolute_path: PathBuf,
    pub repo_relative_dir: String,
    pub tool_version: ToolVersion,
    pub executor: Arc<dyn ToolExecutor>,
    /// Extra arguments the user supplied in their comment.
    pub extra_comment_args: Vec<String>,
    pub username: String,
}

impl StepMeta {
    /// Path of the plan file written by plan and consumed by apply.
    pub fn plan_file(&self) -> PathBuf {
        self.absolute_path.join(format!("{}.tfplan", self.workspace))
    }
}

#[derive(Debug, Clone)]
pub struct InitStep {
    pub extra_args: Vec<String>,
    pub meta: Arc<StepMeta>,
}

#[derive(Debug, Clone)]
pub struct PlanStep {
    pub extra_args: Vec<String>,
    pub meta: Arc<StepMeta>,
}

#[derive(Debug, Clone)]
pub struct ApplyStep {
    pub extra_args: Vec<String>,
    pub meta: Arc<StepMeta>,
}

/// One executable unit of a stage.
#[derive(Debug, Clone)]
pub enum Step {
    Init(InitStep),
    Plan(PlanStep),
    Apply(ApplyStep),
}

/// Serializable view of a step for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepSummary {
    pub step_type: StepType,
    pub extra_args: Vec<String>,
    pub command: Vec<String>,
}

impl Step {
    pub fn init(extra_args: Vec<String>, meta: Arc<StepMeta>) -> Self {
        Step::Init(InitStep { extra_args, meta })
    }

    pub fn plan(extra_args: Vec<String>, meta: Arc<StepMeta>) -> Self {
        Step::Plan(PlanStep { extra_args, meta })
    }

    pub fn apply(extra_args: Vec<String>, meta: Arc<StepMeta>) -> Self {
        Step::Apply(ApplyStep { extra_args, meta })
    }

    pub fn kind(&self) -> StepType {
        match self {
            Step::Init(_) => StepType::Init,
            Step::Plan(_) => StepType::Plan,
            Step::Apply(_) => StepType::Apply,
        }
    }

    pub fn extra_args(&self) -> &[String] {
        match self {
            Step::Init(s) => &s.extra_args,
            Step::Plan(s) => &s.extra_args,
            Step::Apply(s) => &s.extra_args,
        }
    }

    pub fn meta(&self) -> &Arc<StepMeta> {
        match self {
            Step::Init(s) => &s.meta,
            Step::Plan(s) => &s.meta,
            Step::Apply(s) => &s.meta,
        }
    }

    /// Argument vector handed to the tool executor.
    pub fn command_args(&self) -> Vec<String> {
        let meta = self.meta();
        let mut args: Vec<String> = Vec::new();
        match self {
            Step::Init(step) => {
                args.extend(["init", "-no-color"].map(String::from));
                args.extend(step.extra_args.iter().cloned());
            }
            Step::Plan(step) => {
                args.extend(["plan", "-refresh", "-no-color", "-out"].map(String::from));
                args.push(meta.plan_file().display().to_string());
                args.push("-var".to_string());
                args.push(format!("atlantis_user={}", meta.username));
                args.extend(step.extra_args.iter().cloned());
                args.extend(meta.extra_comment_args.iter().cloned());
            }
            Step::Apply(step) => {
                args.extend(["apply", "-no-color"].map(String::from));
                args.extend(step.extra_args.iter().cloned());
                args.extend(meta.extra_comment_args.iter().cloned());
                args.push(meta.plan_file().display().to_string());
            }
        }
        args
    }

    /// Run the step through the attached executor.
    pub fn run(&self) -> Result<String> {
        let meta = self.meta();
        let kind = self.kind();
        let args = self.command_args();

        let _entered = meta.span.enter();
        tracing::info!(step = kind.as_str(), version = %meta.tool_version, "running step");

        meta.executor
            .run(&meta.absolute_path, &args, &meta.tool_version, &meta.workspace)
            .map_err(|message| StageError::StepFailed {
                step: kind.as_str(),
                message,
            })
    }

    pub fn summary(&self) -> StepSummary {
        StepSummary {
            step_type: self.kind(),
            extra_args: self.extra_args().to_vec(),
            command: self.command_args(),
        }
    }
}
