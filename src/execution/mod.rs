//! Pipeline execution

pub mod runner;

pub use runner::{EventHandler, PipelineError, PipelineRunner, RunEvent};
