//! armstor - a storage account management walkthrough driven by a
//! sequential pipeline runner

pub mod arm;
pub mod cli;
pub mod core;
pub mod execution;
pub mod scenario;

// Re-export commonly used types
pub use arm::{ApiError, ArmClient, AuthError, Clients, Credentials, TokenClient};
pub use core::{ConfigError, Profile, RunContext, RunState, RunStatus, Settings, Step, StepAction};
pub use execution::{EventHandler, PipelineError, PipelineRunner, RunEvent};
pub use scenario::{storage_walkthrough, STEP_COUNT};
