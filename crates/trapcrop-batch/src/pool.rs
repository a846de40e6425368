// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Fixed-size worker pool. A single worker runs tasks inline, in order; more
// than one builds a dedicated rayon thread pool.

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::debug;
use trapcrop_core::error::{Result, TrapcropError};

/// Executes a per-task handler over a task list.
pub enum WorkerPool {
    /// Run tasks one at a time on the calling thread.
    Sequential,
    /// Spread tasks over a private rayon pool.
    Threaded(ThreadPool),
}

impl WorkerPool {
    /// Build a pool with `workers` threads; `0` and `1` both mean sequential.
    pub fn new(workers: usize) -> Result<Self> {
        if workers <= 1 {
            debug!("Using sequential worker");
            return Ok(Self::Sequential);
        }

        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|index| format!("trapcrop-worker-{index}"))
            .build()
            .map_err(|err| TrapcropError::WorkerPool(err.to_string()))?;
        debug!(workers, "Thread pool built");
        Ok(Self::Threaded(pool))
    }

    pub fn workers(&self) -> usize {
        match self {
            Self::Sequential => 1,
            Self::Threaded(pool) => pool.current_num_threads(),
        }
    }

    /// Run `handler` on every task and return the outcomes in task order.
    ///
    /// The sequential worker stops after the first failure for which
    /// `stop_on` returns true, so the returned list can be shorter than
    /// `tasks`. The threaded pool always runs every task.
    pub fn run<T, R, F, S>(&self, tasks: &[T], handler: F, stop_on: S) -> Vec<Result<R>>
    where
        T: Sync,
        R: Send,
        F: Fn(&T) -> Result<R> + Sync + Send,
        S: Fn(&TrapcropError) -> bool,
    {
        match self {
            Self::Sequential => {
                let mut outcomes = Vec::with_capacity(tasks.len());
                for task in tasks {
                    let outcome = handler(task);
                    let stop = outcome.as_ref().err().is_some_and(&stop_on);
                    outcomes.push(outcome);
                    if stop {
                        break;
                    }
                }
                outcomes
            }
            Self::Threaded(pool) => pool.install(|| tasks.par_iter().map(&handler).collect()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn halve(n: &u32) -> Result<u32> {
        if n % 2 == 0 {
            Ok(n / 2)
        } else {
            Err(TrapcropError::InvalidGeometry { height: *n, margin: 0 })
        }
    }

    #[test]
    fn zero_and_one_are_sequential() {
        assert!(matches!(WorkerPool::new(0).unwrap(), WorkerPool::Sequential));
        assert!(matches!(WorkerPool::new(1).unwrap(), WorkerPool::Sequential));
        assert_eq!(WorkerPool::new(1).unwrap().workers(), 1);
    }

    #[test]
    fn threaded_keeps_task_order() {
        let pool = WorkerPool::new(4).unwrap();
        assert_eq!(pool.workers(), 4);

        let tasks: Vec<u32> = (0..64).map(|n| n * 2).collect();
        let outcomes = pool.run(&tasks, halve, |_| false);
        let values: Vec<u32> = outcomes.into_iter().map(|r| r.unwrap()).collect();
        assert_eq!(values, (0..64).collect::<Vec<_>>());
    }

    #[test]
    fn sequential_stops_on_first_error() {
        let calls = AtomicUsize::new(0);
        let outcomes = WorkerPool::Sequential.run(
            &[2, 4, 5, 6, 8],
            |n| {
                calls.fetch_add(1, Ordering::SeqCst);
                halve(n)
            },
            |_| true,
        );
        assert_eq!(outcomes.len(), 3);
        assert!(outcomes[2].is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn sequential_stop_predicate_sees_each_error() {
        let outcomes = WorkerPool::Sequential.run(&[2, 3, 4, 7, 8], halve, |err| {
            matches!(err, TrapcropError::InvalidGeometry { height: 7, .. })
        });
        assert_eq!(outcomes.len(), 4);
        assert!(outcomes[1].is_err());
        assert!(outcomes[3].is_err());
    }

    #[test]
    fn threaded_isolates_failures() {
        let pool = WorkerPool::new(3).unwrap();
        let outcomes = pool.run(&[2, 3, 4, 5, 6], halve, |_| true);
        assert_eq!(outcomes.len(), 5);
        let failures = outcomes.iter().filter(|r| r.is_err()).count();
        assert_eq!(failures, 2);
        assert_eq!(*outcomes[4].as_ref().unwrap(), 3);
    }
}
