// src/progress.rs
//! Spinner shown on stderr while a lookup is in flight

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Progress indicator wrapper
pub struct ProgressIndicator {
    spinner: Option<ProgressBar>,
    enabled: bool,
}

impl ProgressIndicator {
    /// Create a new progress indicator
    ///
    /// indicatif hides the spinner by itself when stderr is not a terminal.
    pub fn new(enabled: bool) -> Self {
        Self {
            spinner: None,
            enabled,
        }
    }

    /// Show a spinner with `msg`, replacing any running one
    pub fn start(&mut self, msg: impl Into<String>) {
        if !self.enabled {
            return;
        }
        self.stop();

        let style = ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏");

        let spinner = ProgressBar::new_spinner();
        spinner.set_style(style);
        spinner.set_message(msg.into());
        spinner.enable_steady_tick(Duration::from_millis(100));

        self.spinner = Some(spinner);
    }

    /// Clear the spinner so regular output can follow
    pub fn stop(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }

    /// Check if progress indicator is enabled
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Check if a spinner is currently shown
    pub fn is_active(&self) -> bool {
        self.spinner.is_some()
    }
}

impl Drop for ProgressIndicator {
    fn drop(&mut self) {
        self.stop();
    }
}
