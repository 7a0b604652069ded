// Progress indicators for batch runs

use imagelens_pipeline::BatchProgress;
use indicatif::{ProgressBar, ProgressStyle};

/// Create a progress bar
pub fn create_progress_bar(total: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg} [{bar:40.cyan/blue}] {pos}/{len}")
            .unwrap_or_else(|e| {
                eprintln!("Failed to set progress bar template: {}", e);
                ProgressStyle::default_bar()
            })
            .progress_chars("=>-"),
    );
    pb.set_message(message.to_string());
    pb
}

/// Batch progress rendered as a terminal bar on stderr
pub struct ProgressReporter {
    bar: ProgressBar,
}

impl ProgressReporter {
    pub fn new(total: usize) -> Self {
        Self {
            bar: create_progress_bar(total as u64, "Analyzing"),
        }
    }

    /// Reporter that draws nothing, for `--quiet`
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    pub fn position(&self) -> u64 {
        self.bar.position()
    }
}

impl BatchProgress for ProgressReporter {
    fn on_item(&self, completed: usize, total: usize, _success: bool) {
        self.bar.set_length(total as u64);
        self.bar.set_position(completed as u64);
    }

    fn on_finish(&self, successful: usize, failed: usize) {
        self.bar
            .finish_with_message(format!("{} succeeded, {} failed", successful, failed));
    }
}
