// crates/storecheck-core/src/plan.rs
// ============================================================================
// Module: Storecheck Step Plan
// Description: Dependency-ordered execution plan for suite steps.
// Purpose: Run steps topologically and skip dependents of failed steps.
// Dependencies: crate::{checks, context, decode}, thiserror
// ============================================================================

//! ## Overview
//! A plan is an explicit directed graph of named test steps with numeric
//! priorities and declared dependencies. Steps execute sequentially in
//! topological order, priority breaking ties within a rank. A step whose
//! declared predecessor did not pass is skipped with a diagnostic naming
//! that predecessor; failures never cross step boundaries any other way.
//!
//! Dependencies must name previously registered steps, which keeps the
//! graph acyclic by construction.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use thiserror::Error;

use crate::checks::CheckFailure;
use crate::context::MissingArtifactError;
use crate::context::RunContext;
use crate::decode::DecodeError;

// ============================================================================
// SECTION: Step States
// ============================================================================

/// Lifecycle state of one step.
///
/// Transitions are `NotRun -> Running -> {Passed, Failed}` or
/// `NotRun -> Skipped`; terminal states are `Passed`, `Failed`, and
/// `Skipped`. There are no retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepState {
    /// The step has not been scheduled yet.
    NotRun,
    /// The step body is executing.
    Running,
    /// The step completed without error.
    Passed,
    /// The step body returned an error.
    Failed,
    /// A declared predecessor did not pass.
    Skipped,
}

impl StepState {
    /// Returns the stable label used in reports.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotRun => "not_run",
            Self::Running => "running",
            Self::Passed => "passed",
            Self::Failed => "failed",
            Self::Skipped => "skipped",
        }
    }
}

impl fmt::Display for StepState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Error returned by a step body.
#[derive(Debug, Error)]
pub enum StepError {
    /// A declarative check failed.
    #[error(transparent)]
    Check(#[from] CheckFailure),
    /// The response body did not decode under the expected schema.
    #[error(transparent)]
    Decode(#[from] DecodeError),
    /// A required upstream artifact was never produced.
    #[error(transparent)]
    MissingArtifact(#[from] MissingArtifactError),
    /// The HTTP round-trip failed at the transport level.
    #[error("transport failure: {0}")]
    Transport(String),
    /// Any other step-specific failure.
    #[error("{0}")]
    Other(String),
}

/// Error raised while assembling a plan.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    /// A step name was registered twice.
    #[error("duplicate step `{0}` in plan")]
    DuplicateStep(String),
    /// A dependency names a step that is not registered yet.
    #[error("step `{step}` depends on unknown step `{dependency}`")]
    UnknownDependency {
        /// The step declaring the dependency.
        step: String,
        /// The unresolved predecessor name.
        dependency: String,
    },
}

// ============================================================================
// SECTION: Plan Assembly
// ============================================================================

/// Step body signature: steps receive the suite run context.
type StepFn<'a> = Box<dyn FnMut(&mut RunContext) -> Result<(), StepError> + 'a>;

/// One registered step.
struct StepNode<'a> {
    /// Unique step name within the plan.
    name: String,
    /// Numeric priority; lower runs earlier within a dependency rank.
    priority: u32,
    /// Indices of declared predecessors.
    deps: Vec<usize>,
    /// The step body.
    body: StepFn<'a>,
}

/// Dependency-ordered plan of suite steps.
///
/// # Invariants
/// - Step names are unique.
/// - Dependencies reference previously registered steps (acyclic).
pub struct TestPlan<'a> {
    /// Registered steps in declaration order.
    steps: Vec<StepNode<'a>>,
}

impl fmt::Debug for TestPlan<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.steps.iter().map(|step| step.name.as_str()).collect();
        f.debug_struct("TestPlan").field("steps", &names).finish()
    }
}

impl Default for TestPlan<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> TestPlan<'a> {
    /// Creates an empty plan.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            steps: Vec::new(),
        }
    }

    /// Registers a step with its priority and declared predecessors.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError`] when the name is already taken or a
    /// dependency does not name a previously registered step.
    pub fn step(
        &mut self,
        name: &str,
        priority: u32,
        deps: &[&str],
        body: impl FnMut(&mut RunContext) -> Result<(), StepError> + 'a,
    ) -> Result<(), PlanError> {
        if self.steps.iter().any(|step| step.name == name) {
            return Err(PlanError::DuplicateStep(name.to_string()));
        }
        let mut indices = Vec::with_capacity(deps.len());
        for dep in deps {
            let Some(index) = self.steps.iter().position(|step| step.name == *dep) else {
                return Err(PlanError::UnknownDependency {
                    step: name.to_string(),
                    dependency: (*dep).to_string(),
                });
            };
            indices.push(index);
        }
        self.steps.push(StepNode {
            name: name.to_string(),
            priority,
            deps: indices,
            body: Box::new(body),
        });
        Ok(())
    }

    /// Runs all steps in topological order, threading the run context.
    ///
    /// A step is skipped when any declared predecessor is not passed; the
    /// skip diagnostic names that predecessor and its terminal state.
    #[must_use]
    pub fn run(mut self, ctx: &mut RunContext) -> PlanReport {
        let order = self.execution_order();
        let mut states = vec![StepState::NotRun; self.steps.len()];
        let mut details: Vec<Option<String>> = vec![None; self.steps.len()];

        for index in order {
            let blocked = self.steps[index]
                .deps
                .iter()
                .copied()
                .find(|dep| states[*dep] != StepState::Passed);
            if let Some(dep) = blocked {
                states[index] = StepState::Skipped;
                details[index] = Some(format!(
                    "skipped: predecessor `{}` was {}",
                    self.steps[dep].name, states[dep]
                ));
                continue;
            }
            states[index] = StepState::Running;
            match (self.steps[index].body)(ctx) {
                Ok(()) => states[index] = StepState::Passed,
                Err(err) => {
                    states[index] = StepState::Failed;
                    details[index] = Some(err.to_string());
                }
            }
        }

        let outcomes = self
            .steps
            .iter()
            .zip(states)
            .zip(details)
            .map(|((step, state), detail)| StepOutcome {
                name: step.name.clone(),
                state,
                detail,
            })
            .collect();
        PlanReport {
            outcomes,
        }
    }

    /// Computes the execution order: topological, priority as tie-break.
    ///
    /// Registration order is the final tie-break, keeping runs
    /// deterministic for equal priorities.
    fn execution_order(&self) -> Vec<usize> {
        let mut scheduled = vec![false; self.steps.len()];
        let mut order = Vec::with_capacity(self.steps.len());
        while order.len() < self.steps.len() {
            let next = self
                .steps
                .iter()
                .enumerate()
                .filter(|(index, step)| {
                    !scheduled[*index] && step.deps.iter().all(|dep| scheduled[*dep])
                })
                .min_by_key(|(index, step)| (step.priority, *index))
                .map(|(index, _)| index);
            // Dependencies always reference earlier steps, so a ready step
            // exists until every step is scheduled.
            let Some(index) = next else {
                break;
            };
            scheduled[index] = true;
            order.push(index);
        }
        order
    }
}

// ============================================================================
// SECTION: Reports
// ============================================================================

/// Terminal outcome of one step.
#[derive(Debug, Clone)]
pub struct StepOutcome {
    /// Step name.
    pub name: String,
    /// Terminal state.
    pub state: StepState,
    /// Failure or skip diagnostic, when the step did not pass.
    pub detail: Option<String>,
}

/// Summary of a plan run.
#[derive(Debug, Clone)]
pub struct PlanReport {
    /// Per-step outcomes in registration order.
    outcomes: Vec<StepOutcome>,
}

impl PlanReport {
    /// Returns the per-step outcomes in registration order.
    #[must_use]
    pub fn outcomes(&self) -> &[StepOutcome] {
        &self.outcomes
    }

    /// Returns the terminal state of the named step.
    #[must_use]
    pub fn state_of(&self, name: &str) -> Option<StepState> {
        self.outcomes.iter().find(|outcome| outcome.name == name).map(|outcome| outcome.state)
    }

    /// Returns the diagnostic of the named step, when it did not pass.
    #[must_use]
    pub fn detail_of(&self, name: &str) -> Option<&str> {
        self.outcomes
            .iter()
            .find(|outcome| outcome.name == name)
            .and_then(|outcome| outcome.detail.as_deref())
    }

    /// Returns true when every step passed.
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.outcomes.iter().all(|outcome| outcome.state == StepState::Passed)
    }
}
