// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command-line arguments and their mapping onto `BatchConfig`.

use std::path::PathBuf;

use clap::Parser;
use trapcrop_core::config::{BatchConfig, ExtensionMatcher, FailurePolicy, PipelineConfig};
use trapcrop_core::error::Result;

/// Crop the vendor info bar off camera-trap photos, optionally equalizing
/// them and blacking out the corner logo.
#[derive(Debug, Parser)]
#[command(name = "trapcrop", version, about, long_about = None)]
pub struct Cli {
    /// Directory holding the source photos (not searched recursively).
    pub input_dir: PathBuf,

    /// Directory for the processed photos; created if missing.
    pub output_dir: PathBuf,

    /// JSON pipeline preset; the flags below override its values.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Rows removed from the bottom of each photo [default: 100].
    #[arg(long, value_name = "PX")]
    pub margin: Option<u32>,

    /// Histogram-equalize each colour channel after cropping.
    #[arg(long)]
    pub equalize: bool,

    /// Paint the bottom-left logo area black after cropping.
    #[arg(long)]
    pub mask_logo: bool,

    /// Logo mask width [default: 200].
    #[arg(long, value_name = "PX")]
    pub mask_width: Option<u32>,

    /// Logo mask height [default: 100].
    #[arg(long, value_name = "PX")]
    pub mask_height: Option<u32>,

    /// JPEG output quality [default: 75].
    #[arg(long, value_name = "1-100", value_parser = clap::value_parser!(u8).range(1..=100))]
    pub jpeg_quality: Option<u8>,

    /// Worker threads; 1 processes files one at a time [default: all cores].
    #[arg(short, long, value_name = "N")]
    pub workers: Option<usize>,

    /// File extension to pick up; repeat for several [default: jpg, png].
    #[arg(long = "ext", value_name = "EXT")]
    pub extensions: Vec<String>,

    /// Match extensions exactly instead of ignoring case.
    #[arg(long)]
    pub case_sensitive: bool,

    /// Stop at the first photo that fails instead of skipping it.
    #[arg(long)]
    pub fail_fast: bool,

    /// Do not print a line per processed photo.
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Merge the optional preset file with the flags.
    pub fn to_batch_config(&self) -> Result<BatchConfig> {
        let mut pipeline = match &self.config {
            Some(path) => PipelineConfig::from_json_file(path)?,
            None => PipelineConfig::default(),
        };
        if let Some(margin) = self.margin {
            pipeline.crop_margin_px = margin;
        }
        if let Some(width) = self.mask_width {
            pipeline.mask_size.0 = width;
        }
        if let Some(height) = self.mask_height {
            pipeline.mask_size.1 = height;
        }
        if let Some(quality) = self.jpeg_quality {
            pipeline.jpeg_quality = quality;
        }
        pipeline.equalize |= self.equalize;
        pipeline.mask_logo |= self.mask_logo;

        let extensions = match (self.extensions.is_empty(), self.case_sensitive) {
            (true, false) => ExtensionMatcher::default(),
            (true, true) => ExtensionMatcher::CaseSensitive(vec!["jpg".into(), "png".into()]),
            (false, false) => ExtensionMatcher::CaseInsensitive(self.extensions.clone()),
            (false, true) => ExtensionMatcher::CaseSensitive(self.extensions.clone()),
        };

        let config = BatchConfig {
            input_dir: self.input_dir.clone(),
            output_dir: self.output_dir.clone(),
            pipeline,
            extensions,
            worker_count: self.workers,
            failure_policy: if self.fail_fast {
                FailurePolicy::FailFast
            } else {
                FailurePolicy::SkipAndContinue
            },
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use trapcrop_core::error::TrapcropError;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_crop_jpg_and_png() {
        let cli = Cli::try_parse_from(["trapcrop", "raw", "cropped"]).unwrap();
        let config = cli.to_batch_config().unwrap();

        assert_eq!(config.input_dir, PathBuf::from("raw"));
        assert_eq!(config.output_dir, PathBuf::from("cropped"));
        assert_eq!(config.pipeline, PipelineConfig::default());
        assert_eq!(config.extensions, ExtensionMatcher::default());
        assert_eq!(config.worker_count, None);
        assert_eq!(config.failure_policy, FailurePolicy::SkipAndContinue);
        assert!(!cli.quiet);
    }

    #[test]
    fn quiet_flag_short_and_long() {
        for flag in ["-q", "--quiet"] {
            let cli = Cli::try_parse_from(["trapcrop", "in", "out", flag]).unwrap();
            assert!(cli.quiet);
        }
    }

    #[test]
    fn logo_variant_flags() {
        let cli = Cli::try_parse_from([
            "trapcrop",
            "in",
            "out",
            "--mask-logo",
            "--ext",
            "JPG",
            "--case-sensitive",
            "--workers",
            "1",
            "--fail-fast",
        ])
        .unwrap();
        let config = cli.to_batch_config().unwrap();

        assert!(config.pipeline.mask_logo);
        assert_eq!(config.extensions, ExtensionMatcher::CaseSensitive(vec!["JPG".into()]));
        assert_eq!(config.worker_count, Some(1));
        assert_eq!(config.failure_policy, FailurePolicy::FailFast);
    }

    #[test]
    fn flags_override_preset_file() {
        let dir = tempfile::tempdir().unwrap();
        let preset = dir.path().join("preset.json");
        std::fs::write(
            &preset,
            r#"{ "crop_margin_px": 120, "equalize": true, "mask_size": [180, 90] }"#,
        )
        .unwrap();

        let cli = Cli::try_parse_from([
            "trapcrop",
            "in",
            "out",
            "--config",
            preset.to_str().unwrap(),
            "--margin",
            "80",
            "--mask-height",
            "60",
        ])
        .unwrap();
        let pipeline = cli.to_batch_config().unwrap().pipeline;

        assert_eq!(pipeline.crop_margin_px, 80);
        assert!(pipeline.equalize);
        assert_eq!(pipeline.mask_size, (180, 60));
    }

    #[test]
    fn out_of_range_quality_is_a_parse_error() {
        assert!(Cli::try_parse_from(["trapcrop", "in", "out", "--jpeg-quality", "0"]).is_err());
        assert!(Cli::try_parse_from(["trapcrop", "in", "out", "--jpeg-quality", "101"]).is_err());
    }

    #[test]
    fn zero_workers_is_a_config_error() {
        let cli = Cli::try_parse_from(["trapcrop", "in", "out", "-w", "0"]).unwrap();
        assert!(matches!(cli.to_batch_config(), Err(TrapcropError::Config(_))));
    }
}
