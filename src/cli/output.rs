//! CLI output formatting

use crate::execution::RunEvent;
use console::Emoji;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

// Re-export style
pub use console::style;

// Emojis for output
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "✓ ");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "✗ ");
pub static SPINNER: Emoji<'_, '_> = Emoji("⏳ ", "~ ");
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "i ");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "! ");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", "> ");

/// Create a progress bar over the walkthrough steps
pub fn create_progress_bar(total: usize) -> ProgressBar {
    let progress = ProgressBar::new(total as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );
    progress.enable_steady_tick(Duration::from_millis(100));
    progress
}

/// Format a run event for display
pub fn format_run_event(event: &RunEvent) -> String {
    match event {
        RunEvent::RunStarted {
            run_id,
            total_steps,
        } => format!(
            "{} Starting walkthrough with {} steps ({})",
            ROCKET,
            style(total_steps).cyan(),
            style(&run_id.to_string()[..8]).dim()
        ),
        RunEvent::StepStarted { index, label } => {
            format!("{} {}. {}", SPINNER, index + 1, style(label).cyan())
        }
        RunEvent::StepCompleted {
            index,
            label,
            payload,
        } => format!(
            "{} {}. {}\n{}",
            CHECK,
            index + 1,
            style(label).green(),
            format_payload(payload, 12)
        ),
        RunEvent::StepFailed {
            index,
            label,
            error,
        } => format!(
            "{} {}. {}: {}",
            CROSS,
            index + 1,
            style(label).red(),
            style(error).dim()
        ),
        RunEvent::RunCompleted {
            run_id,
            completed_steps,
        } => format!(
            "{} Walkthrough ({}) {} after {} steps",
            INFO,
            style(&run_id.to_string()[..8]).dim(),
            style("completed successfully").green(),
            completed_steps
        ),
    }
}

/// Pretty-print a step's result payload with truncation
pub fn format_payload(payload: &serde_json::Value, max_lines: usize) -> String {
    let rendered =
        serde_json::to_string_pretty(payload).unwrap_or_else(|_| payload.to_string());
    let lines: Vec<&str> = rendered.lines().collect();

    if lines.len() <= max_lines {
        rendered
    } else {
        let truncated = lines[..max_lines].join("\n");
        format!(
            "{}\n{} ... ({} more lines)",
            truncated,
            style("[truncated]").dim(),
            lines.len() - max_lines
        )
    }
}
