// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// trapcrop-batch: Directory-level processing. Discovers photos in an input
// directory, pairs each with an output path, and runs the `trapcrop-image`
// transform over them sequentially or on a fixed-size worker pool.

pub mod discovery;
pub mod driver;
pub mod pool;
pub mod progress;

pub use discovery::{Discovery, discover, plan_tasks};
pub use driver::BatchDriver;
pub use pool::WorkerPool;
pub use progress::{ConsoleProgress, ProgressSink, SilentProgress, progress_line};
