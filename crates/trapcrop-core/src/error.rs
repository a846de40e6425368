// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for trapcrop.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for all trapcrop operations.
#[derive(Debug, Error)]
pub enum TrapcropError {
    // -- Per-image errors --
    #[error("cannot decode image {path}: {reason}")]
    UnreadableImage { path: PathBuf, reason: String },

    #[error("image height {height}px does not exceed the {margin}px crop margin")]
    InvalidGeometry { height: u32, margin: u32 },

    #[error("cannot write image {path}: {reason}")]
    WriteFailure { path: PathBuf, reason: String },

    // -- Batch setup --
    #[error("input directory not found: {}", .0.display())]
    DirectoryMissing(PathBuf),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("worker pool error: {0}")]
    WorkerPool(String),

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl TrapcropError {
    /// Whether the error belongs to a single image task rather than the run.
    ///
    /// Task-local errors are isolated by the batch driver; everything else
    /// aborts the run.
    pub fn is_task_local(&self) -> bool {
        matches!(
            self,
            Self::UnreadableImage { .. } | Self::InvalidGeometry { .. } | Self::WriteFailure { .. }
        )
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, TrapcropError>;
