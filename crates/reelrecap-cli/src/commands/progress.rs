use indicatif::{ProgressBar, ProgressStyle};
use std::io::IsTerminal;
use std::time::Duration;

/// Spinner shown while the pipeline runs. Off the terminal (or with JSON
/// output) it stays hidden and the structured log carries progress instead.
pub struct AnalysisSpinner {
    spinner: ProgressBar,
    interactive: bool,
}

impl AnalysisSpinner {
    pub fn new(enabled: bool) -> Self {
        let interactive = enabled && is_interactive();

        let spinner = if interactive {
            let spinner = ProgressBar::new_spinner();
            spinner.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.green} [{elapsed_precise}] {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner())
                    .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ "),
            );
            spinner.enable_steady_tick(Duration::from_millis(100));
            spinner
        } else {
            tracing::debug!(
                operation = "ui_init",
                mode = "non_interactive",
                "Running in non-interactive mode - spinner disabled"
            );
            ProgressBar::hidden()
        };

        Self { spinner, interactive }
    }

    pub fn set_message(&self, msg: impl Into<String>) {
        let msg = msg.into();
        if self.interactive {
            self.spinner.set_message(msg);
        } else {
            tracing::debug!(operation = "progress", message = %msg, "Progress update");
        }
    }

    /// Clear the line so the report prints cleanly
    pub fn finish(&self) {
        if self.interactive {
            self.spinner.finish_and_clear();
        }
    }
}

pub fn is_interactive() -> bool {
    std::io::stdout().is_terminal() && std::io::stderr().is_terminal()
}
