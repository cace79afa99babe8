//! CLI argument parsing for repo-stages.
//!
//! Uses clap derive macros for declarative argument definitions.
//! Implementations live in the `commands` module.

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use repo_stages::settings::{DEFAULT_TOOL_VERSION, TOOL_VERSION_ENV, UNKNOWN_STEPS_ENV};
use repo_stages::steps::UnknownStepPolicy;
use std::path::PathBuf;

/// Resolve the plan and apply pipelines of a repository checkout.
///
/// Reads the optional `atlantis.yaml` at the repository root and prints the
/// steps that would run for a project dir and workspace.
#[derive(Parser, Debug)]
#[command(name = "repo-stages")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the steps of the plan stage.
    Plan(StageArgs),

    /// Show the steps of the apply stage.
    Apply(StageArgs),

    /// Check that atlantis.yaml parses and validates.
    Validate(ValidateArgs),
}

#[derive(Args, Debug)]
pub struct StageArgs {
    /// Repository checkout containing atlantis.yaml.
    #[arg(long, default_value = ".")]
    pub repo: PathBuf,

    /// Project dir relative to the repository root.
    #[arg(long, short)]
    pub project: String,

    /// Workspace to resolve for.
    #[arg(long, short, default_value = "default")]
    pub workspace: String,

    /// User the pipeline runs on behalf of.
    #[arg(long, default_value = "")]
    pub user: String,

    /// Extra tool arguments from the triggering comment (shell words).
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    pub comment_args: String,

    /// Tool version attached to every step.
    #[arg(long, env = TOOL_VERSION_ENV, default_value = DEFAULT_TOOL_VERSION)]
    pub tool_version: String,

    /// What to do with declared steps that have no implementation.
    #[arg(long, env = UNKNOWN_STEPS_ENV, value_enum, default_value_t = UnknownStepPolicy::Skip)]
    pub unknown_steps: UnknownStepPolicy,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Repository checkout containing atlantis.yaml.
    #[arg(long, default_value = ".")]
    pub repo: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plan_with_defaults() {
        let cli = Cli::try_parse_from(["repo-stages", "plan", "--project", "proj"]).unwrap();
        let Command::Plan(args) = cli.command else {
            panic!("expected plan command");
        };
        assert_eq!(args.project, "proj");
        assert_eq!(args.workspace, "default");
        assert_eq!(args.repo, PathBuf::from("."));
        assert_eq!(args.format, OutputFormat::Text);
        assert_eq!(args.unknown_steps, UnknownStepPolicy::Skip);
    }

    #[test]
    fn parses_apply_with_options() {
        let cli = Cli::try_parse_from([
            "repo-stages",
            "-vv",
            "apply",
            "--repo",
            "/tmp/repo",
            "-p",
            "infra",
            "-w",
            "staging",
            "--comment-args",
            "-target=foo",
            "--unknown-steps",
            "fail",
            "--format",
            "json",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        let Command::Apply(args) = cli.command else {
            panic!("expected apply command");
        };
        assert_eq!(args.workspace, "staging");
        assert_eq!(args.comment_args, "-target=foo");
        assert_eq!(args.unknown_steps, UnknownStepPolicy::Fail);
        assert_eq!(args.format, OutputFormat::Json);
    }

    #[test]
    fn plan_requires_project() {
        assert!(Cli::try_parse_from(["repo-stages", "plan"]).is_err());
    }
}
