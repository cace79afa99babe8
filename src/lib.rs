//! repo-stages: resolve plan and apply step pipelines for a repository.
//!
//! Given a checkout, a project dir and a workspace, [`stage::Resolver`] reads
//! the optional `atlantis.yaml` and returns the ordered steps to run, falling
//! back to built-in pipelines where the file is absent or silent.

pub mod error;
pub mod executor;
pub mod exit_codes;
pub mod repoconfig;
pub mod settings;
pub mod stage;
pub mod steps;
pub mod telemetry;

#[cfg(test)]
pub(crate) mod test_support;
