//! Progress reporting for the slide loop

use indicatif::{ProgressBar, ProgressStyle};

/// Progress bar over the slides of an extraction run
pub struct ProgressTracker {
    bar: ProgressBar,
}

impl ProgressTracker {
    /// Create a tracker for a known number of slides
    pub fn new(total: u64, description: &str) -> Self {
        let bar = ProgressBar::new(total);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap()
                .progress_chars("#>-"),
        );
        bar.set_message(description.to_string());

        ProgressTracker { bar }
    }

    /// Advance the bar by the given number of slides
    pub fn increment(&self, amount: u64) {
        self.bar.inc(amount);
    }

    /// Finish the bar with a completion message
    pub fn finish(&self) {
        self.bar.finish_with_message("Extraction complete");
    }

    /// Show the slide currently being processed
    pub fn set_message(&self, msg: &str) {
        self.bar.set_message(msg.to_string());
    }
}
