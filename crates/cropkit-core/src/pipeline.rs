//! Off-screen pixel pipeline: crop, blur, grayscale, scale, encode.
//!
//! The pipeline operates on an isolated raster copy, never the live editing
//! surface. Every step consumes the pipeline and returns a new one over a
//! freshly owned buffer, so a handle returned earlier can never observe a
//! later mutation; a failed step simply ends the chain.

use std::io::Cursor;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::{Area, Size};

/// Errors surfaced by pipeline steps.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A crop or scale was requested with a non-positive span.
    #[error("Invalid geometry: width ({width}) and height ({height}) must be positive")]
    InvalidGeometry { width: i32, height: i32 },

    /// Pixel data length doesn't match the declared dimensions.
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 4), got {actual}")]
    BufferMismatch { expected: usize, actual: usize },

    /// The encoder rejected the raster.
    #[error("Encoding failed: {0}")]
    EncodingFailed(String),
}

/// Output format for the terminal encode step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputFormat {
    #[default]
    Jpeg,
    Png,
}

impl OutputFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "image/jpeg",
            OutputFormat::Png => "image/png",
        }
    }
}

/// An encoded image payload plus its format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub format: OutputFormat,
    pub bytes: Vec<u8>,
}

impl EncodedImage {
    /// Format the payload as a `data:` URL for direct host consumption.
    pub fn to_data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.format.mime_type(),
            STANDARD.encode(&self.bytes)
        )
    }
}

/// An RGBA raster with its dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    pub width: u32,
    pub height: u32,
    /// RGBA pixel data in row-major order (4 bytes per pixel).
    pub pixels: Vec<u8>,
}

impl Raster {
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(
            pixels.len(),
            (width * height * 4) as usize,
            "Pixel buffer size mismatch"
        );
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        ((y * self.width + x) * 4) as usize
    }
}

/// A chainable pixel pipeline over an internally owned raster.
#[derive(Debug, Clone)]
pub struct Pipeline {
    raster: Raster,
    /// Set once `grayscale()` has run; later blurs re-collapse their output
    /// to the channel average instead of regenerating per-channel noise.
    grayscaled: bool,
}

impl Pipeline {
    /// Start a chain from raw RGBA data.
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, PipelineError> {
        let expected = (width as usize) * (height as usize) * 4;
        if pixels.len() != expected {
            return Err(PipelineError::BufferMismatch {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            raster: Raster::new(width, height, pixels),
            grayscaled: false,
        })
    }

    pub fn from_raster(raster: Raster) -> Result<Self, PipelineError> {
        let (width, height, pixels) = (raster.width, raster.height, raster.pixels);
        Self::from_rgba(width, height, pixels)
    }

    /// The current raster, for inspection between steps.
    pub fn raster(&self) -> &Raster {
        &self.raster
    }

    pub fn into_raster(self) -> Raster {
        self.raster
    }

    /// Extract the sub-rectangle described by `area`.
    ///
    /// The area is intersected with the raster bounds; the remaining span
    /// must be positive on both axes.
    pub fn crop(self, area: Area) -> Result<Self, PipelineError> {
        let left = area.left.max(0);
        let top = area.top.max(0);
        let right = area.right.min(self.raster.width as i32);
        let bottom = area.bottom.min(self.raster.height as i32);

        let width = right - left;
        let height = bottom - top;
        if width <= 0 || height <= 0 {
            return Err(PipelineError::InvalidGeometry { width, height });
        }

        let (out_width, out_height) = (width as u32, height as u32);
        let mut output = vec![0u8; (out_width * out_height * 4) as usize];

        for y in 0..out_height {
            let src_start = self.raster.offset(left as u32, top as u32 + y);
            let src_end = src_start + (out_width * 4) as usize;
            let dst_start = (y * out_width * 4) as usize;
            let dst_end = dst_start + (out_width * 4) as usize;
            output[dst_start..dst_end].copy_from_slice(&self.raster.pixels[src_start..src_end]);
        }

        Ok(Self {
            raster: Raster::new(out_width, out_height, output),
            grayscaled: self.grayscaled,
        })
    }

    /// 3x3 box blur, nine taps of 1/9 each, per channel.
    ///
    /// Border pixels pass through unfiltered, and every tap reads the
    /// pre-filter snapshot rather than progressively updated values.
    pub fn blur(self) -> Self {
        let width = self.raster.width as i64;
        let height = self.raster.height as i64;

        if width < 3 || height < 3 {
            // Nothing but border pixels.
            return self;
        }

        let source = &self.raster.pixels;
        let mut output = source.clone();

        for y in 1..height - 1 {
            for x in 1..width - 1 {
                let mut sums = [0.0f64; 4];
                for tap_y in -1..=1 {
                    for tap_x in -1..=1 {
                        let offset = (((y + tap_y) * width + (x + tap_x)) * 4) as usize;
                        for (channel, sum) in sums.iter_mut().enumerate() {
                            *sum += source[offset + channel] as f64 / 9.0;
                        }
                    }
                }

                let offset = ((y * width + x) * 4) as usize;
                if self.grayscaled {
                    let mean = ((sums[0] + sums[1] + sums[2]) / 3.0).round() as u8;
                    output[offset] = mean;
                    output[offset + 1] = mean;
                    output[offset + 2] = mean;
                } else {
                    output[offset] = sums[0].round() as u8;
                    output[offset + 1] = sums[1].round() as u8;
                    output[offset + 2] = sums[2].round() as u8;
                }
                output[offset + 3] = sums[3].round() as u8;
            }
        }

        Self {
            raster: Raster::new(self.raster.width, self.raster.height, output),
            grayscaled: self.grayscaled,
        }
    }

    /// Replace R, G and B with their unweighted average, preserving alpha.
    ///
    /// Integer division makes a second application a no-op.
    pub fn grayscale(self) -> Self {
        let mut output = self.raster.pixels.clone();

        for pixel in output.chunks_exact_mut(4) {
            let mean =
                ((pixel[0] as u32 + pixel[1] as u32 + pixel[2] as u32) / 3) as u8;
            pixel[0] = mean;
            pixel[1] = mean;
            pixel[2] = mean;
        }

        Self {
            raster: Raster::new(self.raster.width, self.raster.height, output),
            grayscaled: true,
        }
    }

    /// Resample the raster to exactly `size` in a single bilinear pass.
    pub fn scale(self, size: Size) -> Result<Self, PipelineError> {
        if size.is_empty() {
            return Err(PipelineError::InvalidGeometry {
                width: size.width as i32,
                height: size.height as i32,
            });
        }

        if size == self.raster.size() {
            return Ok(self);
        }

        let source = image::RgbaImage::from_raw(
            self.raster.width,
            self.raster.height,
            self.raster.pixels,
        )
        .ok_or(PipelineError::BufferMismatch {
            expected: (self.raster.width * self.raster.height * 4) as usize,
            actual: 0,
        })?;

        let resized = image::imageops::resize(
            &source,
            size.width,
            size.height,
            image::imageops::FilterType::Triangle,
        );

        Ok(Self {
            raster: Raster::new(size.width, size.height, resized.into_raw()),
            grayscaled: self.grayscaled,
        })
    }

    /// Serialize the raster to a compressed payload.
    ///
    /// `quality` (1-100) applies to JPEG only; PNG is lossless and ignores
    /// it. JPEG drops the alpha channel.
    pub fn encode(
        &self,
        format: OutputFormat,
        quality: Option<u8>,
    ) -> Result<EncodedImage, PipelineError> {
        let mut buffer = Cursor::new(Vec::new());

        match format {
            OutputFormat::Jpeg => {
                let rgb: Vec<u8> = self
                    .raster
                    .pixels
                    .chunks_exact(4)
                    .flat_map(|pixel| [pixel[0], pixel[1], pixel[2]])
                    .collect();
                let quality = quality.unwrap_or(90).clamp(1, 100);
                let encoder = JpegEncoder::new_with_quality(&mut buffer, quality);
                encoder
                    .write_image(
                        &rgb,
                        self.raster.width,
                        self.raster.height,
                        ExtendedColorType::Rgb8,
                    )
                    .map_err(|e| PipelineError::EncodingFailed(e.to_string()))?;
            }
            OutputFormat::Png => {
                let encoder = PngEncoder::new(&mut buffer);
                encoder
                    .write_image(
                        &self.raster.pixels,
                        self.raster.width,
                        self.raster.height,
                        ExtendedColorType::Rgba8,
                    )
                    .map_err(|e| PipelineError::EncodingFailed(e.to_string()))?;
            }
        }

        Ok(EncodedImage {
            format,
            bytes: buffer.into_inner(),
        })
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
