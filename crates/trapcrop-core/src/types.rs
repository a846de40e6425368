// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types: crop/mask geometry, tasks, and batch reports.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TrapcropError};

/// Region of the source image kept after the info bar is removed.
///
/// Edges follow the usual `(left, top, right, bottom)` box convention with
/// `right` and `bottom` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropRect {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl CropRect {
    /// Full-width box that drops `margin` rows from the bottom.
    ///
    /// Fails with [`TrapcropError::InvalidGeometry`] unless at least one row
    /// survives.
    pub fn bottom_strip(width: u32, height: u32, margin: u32) -> Result<Self> {
        if height <= margin {
            return Err(TrapcropError::InvalidGeometry { height, margin });
        }
        Ok(Self {
            left: 0,
            top: 0,
            right: width,
            bottom: height - margin,
        })
    }

    pub fn width(&self) -> u32 {
        self.right - self.left
    }

    pub fn height(&self) -> u32 {
        self.bottom - self.top
    }
}

/// Solid rectangle painted over the vendor logo.
///
/// `y` is signed: on images shorter than the mask the rectangle starts above
/// the origin and drawing clips it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaskRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl MaskRect {
    /// Anchor a `(width, height)` mask to the bottom-left corner of an image
    /// that is `image_height` rows tall. Pass the *cropped* height.
    pub fn bottom_left(image_height: u32, (width, height): (u32, u32)) -> Self {
        let y = i64::from(image_height) - i64::from(height);
        Self {
            x: 0,
            y: y.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32,
            width,
            height,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// One image's unit of work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub input: PathBuf,
    pub output: PathBuf,
}

impl Task {
    /// Pair `input` with a same-named file under `output_dir`.
    ///
    /// Returns `None` for paths without a file name (e.g. `..`).
    pub fn mirrored(input: impl Into<PathBuf>, output_dir: &Path) -> Option<Self> {
        let input = input.into();
        let output = output_dir.join(input.file_name()?);
        Some(Self { input, output })
    }

    /// File name used in progress lines.
    pub fn file_name(&self) -> String {
        self.input
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.input.display().to_string())
    }
}

/// A task that did not produce an output file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedTask {
    pub input: PathBuf,
    pub reason: String,
}

/// Summary of one batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport {
    /// Inputs written successfully, in task order.
    pub processed: Vec<PathBuf>,
    /// Inputs that failed, in task order.
    pub failed: Vec<FailedTask>,
    /// Directory entries ignored by the extension filter.
    pub skipped: usize,
    pub elapsed: Duration,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.processed.len() + self.failed.len()
    }

    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}
