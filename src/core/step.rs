//! Step domain model

use crate::arm::ApiError;
use crate::core::context::RunContext;
use async_trait::async_trait;
use serde_json::Value;

/// A single unit of pipeline work performing one remote call
///
/// Actions receive read/write access to the shared [`RunContext`] and
/// return the remote call's result as an opaque JSON payload.
#[async_trait]
pub trait StepAction: Send + Sync {
    async fn run(&self, ctx: &mut RunContext) -> Result<Value, ApiError>;
}

/// A named step in the pipeline
///
/// Steps have no identity beyond their label and position; they are
/// constructed before the run starts and consumed by it.
pub struct Step {
    label: String,
    action: Box<dyn StepAction>,
}

impl Step {
    pub fn new(label: impl Into<String>, action: impl StepAction + 'static) -> Self {
        Self {
            label: label.into(),
            action: Box::new(action),
        }
    }

    /// Human-readable step label
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Execute the step's remote call
    pub async fn execute(&self, ctx: &mut RunContext) -> Result<Value, ApiError> {
        self.action.run(ctx).await
    }
}

impl std::fmt::Debug for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Step").field("label", &self.label).finish()
    }
}
