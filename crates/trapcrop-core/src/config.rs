// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pipeline and batch configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, TrapcropError};

/// Height of the vendor info bar on the bottom of each photo.
pub const DEFAULT_CROP_MARGIN_PX: u32 = 100;

/// Size of the vendor logo in the bottom-left corner of the cropped photo.
pub const DEFAULT_MASK_SIZE: (u32, u32) = (200, 100);

/// JPEG quality used when re-encoding (the usual library default).
pub const DEFAULT_JPEG_QUALITY: u8 = 75;

/// Settings for the per-image transform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Pixels removed from the bottom of every image.
    pub crop_margin_px: u32,
    /// Run per-channel histogram equalization after cropping.
    pub equalize: bool,
    /// Paint the bottom-left logo area black after cropping.
    pub mask_logo: bool,
    /// Logo mask `(width, height)` in pixels.
    pub mask_size: (u32, u32),
    /// Quality (1-100) for JPEG outputs.
    pub jpeg_quality: u8,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            crop_margin_px: DEFAULT_CROP_MARGIN_PX,
            equalize: false,
            mask_logo: false,
            mask_size: DEFAULT_MASK_SIZE,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

impl PipelineConfig {
    /// Load a pipeline preset from a JSON file. Missing keys take defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(TrapcropError::Config(format!(
                "jpeg_quality must be within 1..=100, got {}",
                self.jpeg_quality
            )));
        }
        Ok(())
    }
}

/// Which input files the batch driver picks up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "extensions", rename_all = "snake_case")]
pub enum ExtensionMatcher {
    /// Compare lowercased extensions, e.g. `jpg` matches `a.JPG` and `b.jpg`.
    CaseInsensitive(Vec<String>),
    /// Compare extensions byte-for-byte, e.g. `JPG` matches `a.JPG` only.
    CaseSensitive(Vec<String>),
}

impl Default for ExtensionMatcher {
    fn default() -> Self {
        Self::CaseInsensitive(vec!["jpg".into(), "png".into()])
    }
}

impl ExtensionMatcher {
    /// Returns `true` when the path's extension is in the configured set.
    ///
    /// Configured extensions may be written with or without a leading dot.
    pub fn matches(&self, path: &Path) -> bool {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return false;
        };
        match self {
            Self::CaseInsensitive(exts) => exts
                .iter()
                .any(|candidate| candidate.trim_start_matches('.').eq_ignore_ascii_case(ext)),
            Self::CaseSensitive(exts) => exts
                .iter()
                .any(|candidate| candidate.trim_start_matches('.') == ext),
        }
    }
}

/// What the batch driver does when a single image fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Log the failure, count it, and keep going.
    #[default]
    SkipAndContinue,
    /// Stop at the first failure and return it.
    FailFast,
}

/// Everything the batch driver needs for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Directory holding the source photos (not walked recursively).
    pub input_dir: PathBuf,
    /// Directory receiving the transformed photos. Created if absent.
    pub output_dir: PathBuf,
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub extensions: ExtensionMatcher,
    /// Worker threads. `None` uses the available parallelism; `Some(1)`
    /// processes files one at a time in directory order.
    #[serde(default)]
    pub worker_count: Option<usize>,
    #[serde(default)]
    pub failure_policy: FailurePolicy,
}

impl BatchConfig {
    /// Build a config with default pipeline settings.
    pub fn new(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            pipeline: PipelineConfig::default(),
            extensions: ExtensionMatcher::default(),
            worker_count: None,
            failure_policy: FailurePolicy::default(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.worker_count == Some(0) {
            return Err(TrapcropError::Config(
                "worker_count must be at least 1".into(),
            ));
        }
        self.pipeline.validate()
    }

    /// Resolve `worker_count`, falling back to the machine's parallelism.
    pub fn effective_workers(&self) -> usize {
        self.worker_count.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
    }
}
