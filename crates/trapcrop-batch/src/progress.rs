// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Per-task progress notifications.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::debug;
use trapcrop_core::error::TrapcropError;
use trapcrop_core::types::Task;

/// Receives one notification per finished task. Called from worker threads.
pub trait ProgressSink: Sync {
    fn processed(&self, task: &Task);

    /// Failures are already logged by the driver; sinks may ignore them.
    fn failed(&self, _task: &Task, _error: &TrapcropError) {}
}

/// The line printed for a successfully written image.
pub fn progress_line(task: &Task) -> String {
    format!("Processed {}", task.file_name())
}

/// Prints [`progress_line`] to stdout for every written image.
#[derive(Debug, Default)]
pub struct ConsoleProgress {
    write_failed: AtomicBool,
}

impl ConsoleProgress {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProgressSink for ConsoleProgress {
    fn processed(&self, task: &Task) {
        // One locked write per line so parallel workers never interleave.
        let mut stdout = std::io::stdout().lock();
        if let Err(err) = writeln!(stdout, "{}", progress_line(task)) {
            // A closed pipe fails every later write too.
            if !self.write_failed.swap(true, Ordering::Relaxed) {
                debug!(error = %err, "Progress output unavailable");
            }
        }
    }
}

/// Discards every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentProgress;

impl ProgressSink for SilentProgress {
    fn processed(&self, _task: &Task) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn progress_line_names_the_input_file() {
        let task = Task::mirrored("/cards/sd1/IMG_0042.JPG", Path::new("/out")).unwrap();
        assert_eq!(progress_line(&task), "Processed IMG_0042.JPG");
    }

    #[test]
    fn console_progress_starts_without_write_failure() {
        let sink = ConsoleProgress::new();
        assert!(!sink.write_failed.load(Ordering::Relaxed));
    }
}
