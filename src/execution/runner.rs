//! Sequential pipeline runner
//!
//! Executes a fixed, ordered sequence of steps against the management
//! collaborators. The chain is strictly dependent: step *i+1* is never
//! dispatched before step *i*'s success event has been emitted. The first
//! failure aborts the run; there are no retries and no rollback of remote
//! side effects already applied (a created resource group stays behind if
//! a later step fails).

use crate::arm::{ApiError, AuthError};
use crate::core::{RunContext, RunState, Step};
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};
use uuid::Uuid;

/// Aggregate error surfaced to the caller; wraps exactly one cause
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Credential exchange failed before any step ran
    #[error("authentication failed: {0}")]
    Auth(#[from] AuthError),

    /// A step's remote call failed; no later step was attempted
    #[error("step '{label}' failed: {source}")]
    Step {
        label: String,
        #[source]
        source: ApiError,
    },

    /// The runner was handed an empty step sequence
    #[error("pipeline has no steps")]
    Empty,
}

/// Observations emitted during a run
///
/// Events are for visibility only; they never affect control flow.
#[derive(Debug, Clone)]
pub enum RunEvent {
    RunStarted {
        run_id: Uuid,
        total_steps: usize,
    },
    StepStarted {
        index: usize,
        label: String,
    },
    /// A step's progress observation, carrying its result payload
    StepCompleted {
        index: usize,
        label: String,
        payload: Value,
    },
    StepFailed {
        index: usize,
        label: String,
        error: String,
    },
    /// Distinguished completion observation, emitted after the last step
    RunCompleted {
        run_id: Uuid,
        completed_steps: usize,
    },
}

/// Type for event handlers
pub type EventHandler = Arc<dyn Fn(&RunEvent) + Send + Sync>;

/// Runs one pipeline of steps to completion or first failure
#[derive(Default)]
pub struct PipelineRunner {
    handlers: Vec<EventHandler>,
}

impl PipelineRunner {
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    /// Register an event handler
    pub fn add_event_handler<F>(&mut self, handler: F)
    where
        F: Fn(&RunEvent) + Send + Sync + 'static,
    {
        self.handlers.push(Arc::new(handler));
    }

    fn emit(&self, event: RunEvent) {
        for handler in &self.handlers {
            handler(&event);
        }
    }

    /// Execute the steps strictly in order against the shared context
    ///
    /// On success the handlers have seen one `StepCompleted` per step, in
    /// step order, followed by one `RunCompleted`. On failure they have
    /// seen exactly one `StepFailed` and the error names the aborting
    /// step; steps after it are never invoked.
    pub async fn run(
        &self,
        steps: Vec<Step>,
        ctx: &mut RunContext,
    ) -> Result<(), PipelineError> {
        if steps.is_empty() {
            return Err(PipelineError::Empty);
        }

        let mut state = RunState::new(ctx.run_id, steps.len());
        state.start();

        info!(run_id = %ctx.run_id, total_steps = steps.len(), "starting pipeline run");
        self.emit(RunEvent::RunStarted {
            run_id: ctx.run_id,
            total_steps: state.total_steps,
        });

        for (index, step) in steps.into_iter().enumerate() {
            let label = step.label().to_string();
            info!(index, %label, "executing step");
            self.emit(RunEvent::StepStarted {
                index,
                label: label.clone(),
            });

            match step.execute(ctx).await {
                Ok(payload) => {
                    ctx.record(payload.clone());
                    state.step_completed();
                    self.emit(RunEvent::StepCompleted {
                        index,
                        label,
                        payload,
                    });
                }
                Err(source) => {
                    error!(index, %label, %source, "step failed; aborting run");
                    state.fail();
                    self.emit(RunEvent::StepFailed {
                        index,
                        label: label.clone(),
                        error: source.to_string(),
                    });
                    return Err(PipelineError::Step { label, source });
                }
            }
        }

        state.complete();
        info!(run_id = %ctx.run_id, "pipeline run completed");
        self.emit(RunEvent::RunCompleted {
            run_id: ctx.run_id,
            completed_steps: state.completed_steps,
        });

        Ok(())
    }
}
