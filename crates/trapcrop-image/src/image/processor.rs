// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image processor: decode, crop, histogram equalization, filled-rectangle
// masking, and encode. Operates on in-memory images using the `image` and
// `imageproc` crates.

use std::fs;
use std::io::Cursor;
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::{
    ColorType, DynamicImage, GrayImage, ImageBuffer, ImageFormat, ImageReader, ImageResult,
    Luma, LumaA, Pixel, Rgb, Rgba,
};
use imageproc::contrast::equalize_histogram_mut;
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;
use tracing::{debug, info, instrument};
use trapcrop_core::error::{Result, TrapcropError};
use trapcrop_core::types::{CropRect, MaskRect};

/// Image processing pipeline operating on a single in-memory image.
///
/// Each operation consumes `self` and returns a new `ImageProcessor` wrapping
/// the transformed image, enabling method chaining.
///
/// ```ignore
/// let rect = CropRect::bottom_strip(800, 600, 100)?;
/// ImageProcessor::open("0101.JPG")?
///     .crop(rect)
///     .equalize()
///     .fill_rect(MaskRect::bottom_left(rect.height(), (200, 100)))
///     .save("out/0101.JPG", 75)?;
/// ```
pub struct ImageProcessor {
    /// The current working image.
    image: DynamicImage,
}

impl ImageProcessor {
    // -- Construction ---------------------------------------------------------

    /// Load an image from a file path.
    ///
    /// The format is sniffed from the file contents, so a PNG saved with a
    /// `.jpg` name still decodes.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let unreadable = |reason: String| TrapcropError::UnreadableImage {
            path: path.to_path_buf(),
            reason,
        };

        let img = ImageReader::open(path)
            .map_err(|err| unreadable(err.to_string()))?
            .with_guessed_format()
            .map_err(|err| unreadable(err.to_string()))?
            .decode()
            .map_err(|err| unreadable(err.to_string()))?;

        debug!(
            width = img.width(),
            height = img.height(),
            color = ?img.color(),
            "Image loaded"
        );
        Ok(Self { image: img })
    }

    /// Wrap an already-decoded `DynamicImage`.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self { image }
    }

    // -- Accessors ------------------------------------------------------------

    /// Current image width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Current image height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Borrow the underlying `DynamicImage`.
    pub fn as_dynamic(&self) -> &DynamicImage {
        &self.image
    }

    /// Consume the processor and return the underlying `DynamicImage`.
    pub fn into_dynamic(self) -> DynamicImage {
        self.image
    }

    // -- Transformations (consume self, return new Self) -----------------------

    /// Keep only the pixels inside `rect`. Values are clamped to image bounds.
    #[instrument(skip(self))]
    pub fn crop(self, rect: CropRect) -> Self {
        let img_w = self.image.width();
        let img_h = self.image.height();

        let left = rect.left.min(img_w);
        let top = rect.top.min(img_h);
        let width = rect.right.min(img_w).saturating_sub(left);
        let height = rect.bottom.min(img_h).saturating_sub(top);

        debug!(left, top, width, height, "Cropping image");
        Self {
            image: self.image.crop_imm(left, top, width, height),
        }
    }

    /// Histogram-equalize every colour channel independently.
    ///
    /// Alpha is carried through untouched. Dimensions and channel count are
    /// preserved; 16-bit and float images come back as 8-bit.
    #[instrument(skip(self), fields(color = ?self.image.color()))]
    pub fn equalize(self) -> Self {
        let color = self.image.color();
        let image = match self.image {
            DynamicImage::ImageLuma8(mut gray) => {
                equalize_histogram_mut(&mut gray);
                DynamicImage::ImageLuma8(gray)
            }
            img if color.channel_count() == 1 => {
                let mut gray = img.to_luma8();
                equalize_histogram_mut(&mut gray);
                DynamicImage::ImageLuma8(gray)
            }
            img if color.channel_count() == 2 => {
                DynamicImage::ImageLumaA8(equalize_channels(img.to_luma_alpha8(), 1))
            }
            img if color.has_alpha() => {
                DynamicImage::ImageRgba8(equalize_channels(img.to_rgba8(), 3))
            }
            img => DynamicImage::ImageRgb8(equalize_channels(img.to_rgb8(), 3)),
        };
        info!("Histogram equalized");
        Self { image }
    }

    /// Paint `mask` solid black (opaque where the image has alpha).
    ///
    /// The rectangle is clipped to the image; parts outside it are ignored.
    #[instrument(skip(self))]
    pub fn fill_rect(self, mask: MaskRect) -> Self {
        if mask.is_empty() {
            debug!("Empty mask; nothing to draw");
            return self;
        }
        let rect = Rect::at(mask.x, mask.y).of_size(mask.width, mask.height);

        let image = match self.image {
            DynamicImage::ImageLuma8(mut buf) => {
                draw_filled_rect_mut(&mut buf, rect, Luma([0u8]));
                DynamicImage::ImageLuma8(buf)
            }
            DynamicImage::ImageLumaA8(mut buf) => {
                draw_filled_rect_mut(&mut buf, rect, LumaA([0u8, u8::MAX]));
                DynamicImage::ImageLumaA8(buf)
            }
            DynamicImage::ImageRgb8(mut buf) => {
                draw_filled_rect_mut(&mut buf, rect, Rgb([0u8, 0, 0]));
                DynamicImage::ImageRgb8(buf)
            }
            DynamicImage::ImageRgba8(mut buf) => {
                draw_filled_rect_mut(&mut buf, rect, Rgba([0u8, 0, 0, u8::MAX]));
                DynamicImage::ImageRgba8(buf)
            }
            // Wider formats are narrowed once and drawn on as 8-bit.
            img if img.color().has_alpha() => {
                let mut buf = img.to_rgba8();
                draw_filled_rect_mut(&mut buf, rect, Rgba([0u8, 0, 0, u8::MAX]));
                DynamicImage::ImageRgba8(buf)
            }
            img => {
                let mut buf = img.to_rgb8();
                draw_filled_rect_mut(&mut buf, rect, Rgb([0u8, 0, 0]));
                DynamicImage::ImageRgb8(buf)
            }
        };
        debug!("Logo mask drawn");
        Self { image }
    }

    // -- Output ---------------------------------------------------------------

    /// Write the image to a file. The format is inferred from the file
    /// extension; JPEG output uses `jpeg_quality` (1-100).
    ///
    /// The image is encoded in memory first, so a failed encode leaves any
    /// existing file at `path` untouched.
    #[instrument(skip_all, fields(path = %path.as_ref().display(), quality = jpeg_quality))]
    pub fn save(&self, path: impl AsRef<Path>, jpeg_quality: u8) -> Result<()> {
        let path = path.as_ref();
        let write_failure = |reason: String| TrapcropError::WriteFailure {
            path: path.to_path_buf(),
            reason,
        };

        let format = ImageFormat::from_path(path).map_err(|err| write_failure(err.to_string()))?;
        let bytes = self
            .encode(format, jpeg_quality)
            .map_err(|err| write_failure(err.to_string()))?;
        fs::write(path, &bytes).map_err(|err| write_failure(err.to_string()))?;

        debug!(?format, bytes = bytes.len(), "Image saved");
        Ok(())
    }

    /// Encode the image into an in-memory buffer.
    fn encode(&self, format: ImageFormat, jpeg_quality: u8) -> ImageResult<Vec<u8>> {
        let mut buf = Vec::new();
        match format {
            ImageFormat::Jpeg => {
                let encoder = JpegEncoder::new_with_quality(&mut buf, jpeg_quality);
                // JPEG has no alpha channel and only 8-bit samples.
                match self.image.color() {
                    ColorType::L8 | ColorType::Rgb8 => self.image.write_with_encoder(encoder)?,
                    ColorType::La8 | ColorType::L16 | ColorType::La16 => {
                        DynamicImage::ImageLuma8(self.image.to_luma8()).write_with_encoder(encoder)?
                    }
                    _ => DynamicImage::ImageRgb8(self.image.to_rgb8()).write_with_encoder(encoder)?,
                }
            }
            other => self.image.write_to(&mut Cursor::new(&mut buf), other)?,
        }
        Ok(buf)
    }
}

/// Equalize the first `colour_channels` channels of every pixel, leaving any
/// trailing channels (alpha) untouched.
fn equalize_channels<P>(
    mut buffer: ImageBuffer<P, Vec<u8>>,
    colour_channels: usize,
) -> ImageBuffer<P, Vec<u8>>
where
    P: Pixel<Subpixel = u8>,
{
    let (width, height) = buffer.dimensions();
    for channel in 0..colour_channels {
        let mut plane = GrayImage::from_fn(width, height, |x, y| {
            Luma([buffer.get_pixel(x, y).channels()[channel]])
        });
        equalize_histogram_mut(&mut plane);
        for (x, y, value) in plane.enumerate_pixels() {
            buffer.get_pixel_mut(x, y).channels_mut()[channel] = value.0[0];
        }
    }
    buffer
}

// -- Tests --------------------------------------------------------------------
