// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Batch driver: discover photos in the input directory, transform each one
// on the worker pool, and write the results to the output directory.
//
// Per-image failures (undecodable file, image shorter than the crop margin,
// unwritable output) are isolated to their own task. Only setup failures
// abort a run, plus the first task failure under `FailurePolicy::FailFast`.

use std::fs;
use std::time::Instant;

use tracing::{error, info, instrument, warn};
use trapcrop_core::config::{BatchConfig, FailurePolicy};
use trapcrop_core::error::Result;
use trapcrop_core::types::{BatchReport, FailedTask, Task};
use trapcrop_image::{Transform, process_file};

use crate::discovery::{discover, plan_tasks};
use crate::pool::WorkerPool;
use crate::progress::ProgressSink;

/// Applies the photo transform to every eligible file in a directory.
pub struct BatchDriver {
    config: BatchConfig,
    transform: Transform,
}

impl BatchDriver {
    /// Validate `config` and prepare the transform.
    pub fn new(config: BatchConfig) -> Result<Self> {
        config.validate()?;
        let transform = Transform::new(config.pipeline.clone());
        Ok(Self { config, transform })
    }

    /// Process the whole input directory.
    ///
    /// Returns `DirectoryMissing` before touching the output directory when
    /// the input directory does not exist.
    #[instrument(skip_all, fields(
        input = %self.config.input_dir.display(),
        output = %self.config.output_dir.display()
    ))]
    pub fn run(&self, progress: &dyn ProgressSink) -> Result<BatchReport> {
        let started = Instant::now();

        let found = discover(&self.config.input_dir, &self.config.extensions)?;
        fs::create_dir_all(&self.config.output_dir)?;
        let tasks = plan_tasks(found.eligible, &self.config.output_dir);

        let pool = WorkerPool::new(self.config.effective_workers())?;
        let fail_fast = self.config.failure_policy == FailurePolicy::FailFast;
        info!(
            tasks = tasks.len(),
            skipped = found.skipped,
            workers = pool.workers(),
            fail_fast,
            "Starting batch"
        );

        let outcomes = pool.run(
            &tasks,
            |task| self.run_task(task, progress),
            |err| fail_fast || !err.is_task_local(),
        );

        let mut report = tally(&tasks, outcomes, fail_fast)?;
        report.skipped = found.skipped;
        report.elapsed = started.elapsed();

        info!(
            total = report.total(),
            processed = report.processed.len(),
            failed = report.failed.len(),
            skipped = report.skipped,
            elapsed_ms = report.elapsed.as_millis() as u64,
            "Batch complete"
        );
        Ok(report)
    }

    /// Load, transform, and save one image, then notify `progress`.
    fn run_task(&self, task: &Task, progress: &dyn ProgressSink) -> Result<()> {
        match process_file(&task.input, &task.output, &self.transform) {
            Ok(_) => {
                progress.processed(task);
                Ok(())
            }
            Err(err) => {
                warn!(file = %task.file_name(), error = %err, "Image failed");
                progress.failed(task, &err);
                Err(err)
            }
        }
    }
}

/// Fold per-task outcomes into a report.
///
/// An error that is not task-local aborts the run under either policy;
/// under `fail_fast` so does the first task-local one.
fn tally(tasks: &[Task], outcomes: Vec<Result<()>>, fail_fast: bool) -> Result<BatchReport> {
    let mut report = BatchReport::default();
    let mut first_failure = None;
    for (task, outcome) in tasks.iter().zip(outcomes) {
        match outcome {
            Ok(()) => report.processed.push(task.input.clone()),
            Err(err) if !err.is_task_local() => {
                error!(file = %task.file_name(), error = %err, "Batch aborted");
                return Err(err);
            }
            Err(err) => {
                report.failed.push(FailedTask {
                    input: task.input.clone(),
                    reason: err.to_string(),
                });
                first_failure.get_or_insert(err);
            }
        }
    }

    if fail_fast {
        if let Some(err) = first_failure {
            error!(error = %err, "Batch aborted");
            return Err(err);
        }
    }
    Ok(report)
}
