// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Camera-trap photo transform: strip the vendor info bar, optionally
// equalize, optionally black out the corner logo.

use std::path::Path;

use tracing::{debug, info, instrument};
use trapcrop_core::config::PipelineConfig;
use trapcrop_core::error::Result;
use trapcrop_core::types::{CropRect, MaskRect};

use crate::image::processor::ImageProcessor;

/// The raster operations the transform needs from an image type.
///
/// Decoding and encoding stay with the concrete type; the transform itself
/// never touches the filesystem.
pub trait Raster: Sized {
    /// `(width, height)` in pixels.
    fn dimensions(&self) -> (u32, u32);
    fn crop(self, rect: CropRect) -> Self;
    fn equalize(self) -> Self;
    fn fill_rect(self, mask: MaskRect) -> Self;
}

impl Raster for ImageProcessor {
    fn dimensions(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    fn crop(self, rect: CropRect) -> Self {
        ImageProcessor::crop(self, rect)
    }

    fn equalize(self) -> Self {
        ImageProcessor::equalize(self)
    }

    fn fill_rect(self, mask: MaskRect) -> Self {
        ImageProcessor::fill_rect(self, mask)
    }
}

/// Per-image pipeline: crop, then equalize, then mask.
#[derive(Debug, Clone, Default)]
pub struct Transform {
    config: PipelineConfig,
}

impl Transform {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run the pipeline on one image.
    ///
    /// Fails with `InvalidGeometry` when the image is not taller than the
    /// crop margin. The logo mask is anchored to the *cropped* image.
    #[instrument(
        skip_all,
        fields(margin = self.config.crop_margin_px, equalize = self.config.equalize)
    )]
    pub fn apply<R: Raster>(&self, image: R) -> Result<R> {
        let (width, height) = image.dimensions();
        let rect = CropRect::bottom_strip(width, height, self.config.crop_margin_px)?;
        let mut image = image.crop(rect);

        if self.config.equalize {
            image = image.equalize();
        }

        if self.config.mask_logo {
            let (_, cropped_height) = image.dimensions();
            let mask = MaskRect::bottom_left(cropped_height, self.config.mask_size);
            debug!(?mask, "Masking logo");
            image = image.fill_rect(mask);
        }

        Ok(image)
    }
}

/// Load `input`, transform it, and write the result to `output`.
///
/// Returns the output dimensions.
#[instrument(skip_all, fields(input = %input.display(), output = %output.display()))]
pub fn process_file(input: &Path, output: &Path, transform: &Transform) -> Result<(u32, u32)> {
    let image = ImageProcessor::open(input)?;
    let (src_w, src_h) = (image.width(), image.height());

    let result = transform.apply(image)?;
    result.save(output, transform.config().jpeg_quality)?;

    let dims = (result.width(), result.height());
    info!(src_w, src_h, out_w = dims.0, out_h = dims.1, "Image transformed");
    Ok(dims)
}
