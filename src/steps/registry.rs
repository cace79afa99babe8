//! Step-type registry.
//!
//! Maps each config `step_type` to a constructor. Resolution asks the
//! registry for every declared step, so new step kinds only need a
//! `register` call.

use super::{Step, StepMeta};
use crate::error::{Result, StageError};
use crate::repoconfig::{StepConfig, StepType};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Builds a step from its declared extra args and the shared meta.
pub type StepConstructor = fn(Vec<String>, Arc<StepMeta>) -> Step;

/// What to do with a declared step that has no registered constructor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum UnknownStepPolicy {
    /// Leave the step out of the pipeline (logged at warn).
    #[default]
    Skip,
    /// Fail the whole resolution.
    Fail,
}

#[derive(Debug, Clone)]
pub struct StepRegistry {
    constructors: BTreeMap<StepType, StepConstructor>,
    unknown: UnknownStepPolicy,
}

impl Default for StepRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl StepRegistry {
    /// Registry with `init`, `plan` and `apply` registered and `Skip` policy.
    pub fn builtin() -> Self {
        let mut registry = Self::empty(UnknownStepPolicy::default());
        registry.register(StepType::Init, Step::init);
        registry.register(StepType::Plan, Step::plan);
        registry.register(StepType::Apply, Step::apply);
        registry
    }

    pub fn empty(unknown: UnknownStepPolicy) -> Self {
        Self {
            constructors: BTreeMap::new(),
            unknown,
        }
    }

    pub fn with_policy(mut self, unknown: UnknownStepPolicy) -> Self {
        self.unknown = unknown;
        self
    }

    /// Register or replace the constructor for a step type.
    pub fn register(&mut self, step_type: StepType, constructor: StepConstructor) {
        self.constructors.insert(step_type, constructor);
    }

    pub fn policy(&self) -> UnknownStepPolicy {
        self.unknown
    }

    pub fn is_registered(&self, step_type: StepType) -> bool {
        self.constructors.contains_key(&step_type)
    }

    /// Build the step declared at `index`.
    ///
    /// Returns `Ok(None)` when the type is unregistered and the policy is `Skip`.
    pub fn build(
        &self,
        index: usize,
        config: &StepConfig,
        meta: &Arc<StepMeta>,
    ) -> Result<Option<Step>> {
        match self.constructors.get(&config.step_type) {
            Some(constructor) => Ok(Some(constructor(
                config.extra_args.clone(),
                Arc::clone(meta),
            ))),
            None => match self.unknown {
                UnknownStepPolicy::Skip => {
                    tracing::warn!(
                        step_type = config.step_type.as_str(),
                        index,
                        "no constructor for step type, skipping"
                    );
                    Ok(None)
                }
                UnknownStepPolicy::Fail => Err(StageError::UnsupportedStep {
                    step_type: config.step_type.to_string(),
                    index,
                }),
            },
        }
    }
}
