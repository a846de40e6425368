// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// trapcrop-image: Single-photo processing for trapcrop.
//
// Provides image decode/encode and raster operations (crop, per-channel
// histogram equalization, filled-rectangle masking) plus the `Transform`
// pipeline that strips the vendor info bar from camera-trap photos.

pub mod image;
pub mod transform;

// Re-export the primary structs so callers can use `trapcrop_image::Transform` etc.
pub use image::processor::ImageProcessor;
pub use transform::{Raster, Transform, process_file};
