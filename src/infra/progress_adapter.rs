use std::io::{self, Write};

use crate::app::ports::{AttemptProgress, ProgressPort};

/// Rewrites a single progress line on stdout.
pub struct StdoutProgress;

impl ProgressPort for StdoutProgress {
    fn attempt(&self, progress: &AttemptProgress) {
        let mut stdout = io::stdout().lock();
        // Progress output is best effort
        let _ = write!(stdout, "\r{}", format_attempt(progress));
        let _ = stdout.flush();
    }

    fn finish(&self) {
        println!();
    }
}

/// Discards progress, for tests and quiet runs.
pub struct SilentProgress;

impl ProgressPort for SilentProgress {
    fn attempt(&self, _progress: &AttemptProgress) {}
}

pub fn format_attempt(progress: &AttemptProgress) -> String {
    format!(
        "Processing row {} out of total {} rows. Attempt {} out of {}",
        progress.row, progress.total_rows, progress.attempt, progress.total_attempts
    )
}
