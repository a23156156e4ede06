//! Core domain models
//!
//! This module defines the data structures shared across the crate:
//! resolved settings, the per-run context, steps, and run state.

pub mod config;
pub mod context;
pub mod state;
pub mod step;

pub use config::{ConfigError, Profile, Settings};
pub use context::{generate_name, RunContext};
pub use state::{RunState, RunStatus};
pub use step::{Step, StepAction};
