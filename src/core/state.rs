//! Run state models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Status of one pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunStatus {
    /// Run has not started
    Pending,
    /// Run is executing its steps
    Running,
    /// All steps succeeded
    Completed,
    /// A step failed; no further steps were attempted
    Failed,
}

impl RunStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunStatus::Completed | RunStatus::Failed)
    }
}

/// Progress of one pipeline run
///
/// Terminal states are absorbing: once completed or failed, the run cannot
/// be resumed or retried through this state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunState {
    /// Run this state belongs to
    pub run_id: Uuid,

    pub status: RunStatus,

    /// When execution started
    pub started_at: Option<DateTime<Utc>>,

    /// When execution reached a terminal state
    pub finished_at: Option<DateTime<Utc>>,

    /// Total number of steps in the run
    pub total_steps: usize,

    /// Number of steps that produced a success payload
    pub completed_steps: usize,
}

impl RunState {
    pub fn new(run_id: Uuid, total_steps: usize) -> Self {
        Self {
            run_id,
            status: RunStatus::Pending,
            started_at: None,
            finished_at: None,
            total_steps,
            completed_steps: 0,
        }
    }

    /// Mark the run as started
    pub fn start(&mut self) {
        if self.status == RunStatus::Pending {
            self.status = RunStatus::Running;
            self.started_at = Some(Utc::now());
        }
    }

    /// Record one step's success
    pub fn step_completed(&mut self) {
        if self.status == RunStatus::Running {
            self.completed_steps += 1;
        }
    }

    /// Mark the run as completed; no-op if already terminal
    pub fn complete(&mut self) {
        if !self.status.is_terminal() {
            self.status = RunStatus::Completed;
            self.finished_at = Some(Utc::now());
        }
    }

    /// Mark the run as failed; no-op if already terminal
    pub fn fail(&mut self) {
        if !self.status.is_terminal() {
            self.status = RunStatus::Failed;
            self.finished_at = Some(Utc::now());
        }
    }

    /// Fraction of steps completed (0.0 to 1.0)
    pub fn progress(&self) -> f64 {
        if self.total_steps == 0 {
            return 0.0;
        }
        self.completed_steps as f64 / self.total_steps as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle() {
        let mut state = RunState::new(Uuid::new_v4(), 10);
        assert_eq!(state.status, RunStatus::Pending);
        assert!(state.started_at.is_none());

        state.start();
        assert_eq!(state.status, RunStatus::Running);
        assert!(state.started_at.is_some());

        state.step_completed();
        state.step_completed();
        assert_eq!(state.completed_steps, 2);
        assert_eq!(state.progress(), 0.2);

        state.complete();
        assert_eq!(state.status, RunStatus::Completed);
        assert!(state.finished_at.is_some());
    }

    #[test]
    fn test_terminal_states_are_absorbing() {
        let mut state = RunState::new(Uuid::new_v4(), 3);
        state.start();
        state.fail();
        let failed_at = state.finished_at;

        // Neither completion nor further progress moves a failed run.
        state.complete();
        state.step_completed();
        assert_eq!(state.status, RunStatus::Failed);
        assert_eq!(state.finished_at, failed_at);
        assert_eq!(state.completed_steps, 0);

        let mut done = RunState::new(Uuid::new_v4(), 1);
        done.start();
        done.complete();
        done.fail();
        assert_eq!(done.status, RunStatus::Completed);
    }

    #[test]
    fn test_progress_with_no_steps() {
        let state = RunState::new(Uuid::new_v4(), 0);
        assert_eq!(state.progress(), 0.0);
    }
}
