//! Command implementations for repo-stages.
//!
//! This module routes CLI commands to their implementations. Rendering is
//! kept separate from printing so output can be tested directly.

use crate::cli::{Command, OutputFormat, StageArgs, ValidateArgs};
use repo_stages::error::{Result, StageError};
use repo_stages::executor::{DryRunExecutor, ToolVersion};
use repo_stages::repoconfig::{CONFIG_FILENAME, RepoConfig};
use repo_stages::settings::ResolverSettings;
use repo_stages::stage::{Resolver, Stage, StageRequest};
use repo_stages::steps::{Step, StepSummary};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;

/// Dispatch a command to its implementation.
pub fn dispatch(command: Command) -> Result<()> {
    let output = match command {
        Command::Plan(args) => cmd_stage(Stage::Plan, &args)?,
        Command::Apply(args) => cmd_stage(Stage::Apply, &args)?,
        Command::Validate(args) => cmd_validate(&args)?,
    };
    println!("{}", output);
    Ok(())
}

/// JSON shape of a resolved stage.
#[derive(Debug, Serialize)]
struct StageReport<'a> {
    stage: Stage,
    project: &'a str,
    workspace: &'a str,
    steps: Vec<StepSummary>,
}

fn cmd_stage(stage: Stage, args: &StageArgs) -> Result<String> {
    let settings = ResolverSettings {
        default_tool_version: args.tool_version.parse::<ToolVersion>()?,
        unknown_steps: args.unknown_steps,
    };

    let extra_comment_args = shell_words::split(&args.comment_args).map_err(|e| {
        StageError::UserError(format!(
            "failed to parse --comment-args '{}': {}",
            args.comment_args, e
        ))
    })?;

    let request = StageRequest {
        repo_dir: args.repo.clone(),
        workspace: args.workspace.clone(),
        project_dir: args.project.clone(),
        extra_comment_args,
        username: args.user.clone(),
    };

    let resolver = Resolver::from_settings(&settings, Arc::new(DryRunExecutor));
    let steps = resolver.build_stage(stage, &request)?;

    match args.format {
        OutputFormat::Text => Ok(render_text(stage, &request, &steps)),
        OutputFormat::Json => render_json(stage, &request, &steps),
    }
}

fn render_text(stage: Stage, request: &StageRequest, steps: &[Step]) -> String {
    let mut out = format!(
        "{} stage for {} (workspace {}): {} step(s)",
        stage,
        request.project_dir,
        request.workspace,
        steps.len()
    );
    for (i, step) in steps.iter().enumerate() {
        out.push_str(&format!(
            "\n  {}. {}: {}",
            i + 1,
            step.kind(),
            shell_words::join(step.command_args())
        ));
    }
    out
}

fn render_json(stage: Stage, request: &StageRequest, steps: &[Step]) -> Result<String> {
    let report = StageReport {
        stage,
        project: &request.project_dir,
        workspace: &request.workspace,
        steps: steps.iter().map(Step::summary).collect(),
    };
    serde_json::to_string_pretty(&report)
        .map_err(|e| StageError::UserError(format!("failed to serialize stage report: {}", e)))
}

fn cmd_validate(args: &ValidateArgs) -> Result<String> {
    Ok(describe_config(&args.repo, RepoConfig::load(&args.repo)?))
}

fn describe_config(repo: &Path, config: Option<RepoConfig>) -> String {
    match config {
        None => format!(
            "no {} found in {}; built-in pipelines apply",
            CONFIG_FILENAME,
            repo.display()
        ),
        Some(config) => format!(
            "{} is valid: {} project(s), {} workflow(s)",
            CONFIG_FILENAME,
            config.projects.len(),
            config.workflows.len()
        ),
    }
}
