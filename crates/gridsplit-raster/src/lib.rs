#![warn(missing_docs)]
//! # gridsplit-raster
//!
//! ## Purpose
//! Rasterizes one tile of a source image into a reusable capture buffer and
//! encodes it as JPEG.
//!
//! ## Responsibilities
//! - Allocate the capture buffer once per render.
//! - Clear it to opaque white before every tile.
//! - Sample a fractional source sub-rectangle into the full buffer.
//! - Encode the buffer at a fixed JPEG quality.
//!
//! ## Data flow
//! [`gridsplit_layout::RenderPlan`] -> [`CaptureBuffer::new`] -> per tile
//! [`CaptureBuffer::rasterize`] -> [`EncodedTile`] handed to page assembly.
//!
//! ## Ownership and lifetimes
//! The capture buffer is mutated in place for every tile, so tiles must be
//! processed strictly one after another. Encoded tiles own their bytes.
//!
//! ## Error model
//! Allocation limits, out-of-image regions and encoder failures surface as
//! [`RasterError`].

use gridsplit_core::SourceImage;
use gridsplit_layout::{CaptureSize, TileRect};
use image::{Rgb, RgbImage};
use thiserror::Error;

/// Tolerance for float drift at the image boundary.
const EDGE_EPSILON: f64 = 1e-6;

/// One JPEG-encoded tile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedTile {
    /// Encoded width in pixels.
    pub width: u32,
    /// Encoded height in pixels.
    pub height: u32,
    /// Baseline JPEG bytes (RGB).
    pub jpeg: Vec<u8>,
}

/// Opaque RGB drawing surface reused for every tile of one render.
#[derive(Debug, Clone)]
pub struct CaptureBuffer {
    surface: RgbImage,
}

impl CaptureBuffer {
    /// Allocates a white buffer of the given size.
    ///
    /// # Errors
    /// Returns [`RasterError::SurfaceUnavailable`] when the size is zero or
    /// its byte length overflows.
    pub fn new(size: CaptureSize) -> Result<Self, RasterError> {
        let unavailable = RasterError::SurfaceUnavailable {
            width: size.width,
            height: size.height,
        };
        if size.width == 0 || size.height == 0 {
            return Err(unavailable);
        }
        (size.width as usize)
            .checked_mul(size.height as usize)
            .and_then(|pixels| pixels.checked_mul(3))
            .ok_or(unavailable)?;

        Ok(Self {
            surface: RgbImage::from_pixel(size.width, size.height, Rgb([255, 255, 255])),
        })
    }

    /// Buffer width in pixels.
    pub fn width(&self) -> u32 {
        self.surface.width()
    }

    /// Buffer height in pixels.
    pub fn height(&self) -> u32 {
        self.surface.height()
    }

    /// Packed RGB bytes in row-major order.
    pub fn rgb(&self) -> &[u8] {
        self.surface.as_raw()
    }

    /// Fills the whole buffer with opaque white.
    pub fn fill_white(&mut self) {
        for pixel in self.surface.pixels_mut() {
            *pixel = Rgb([255, 255, 255]);
        }
    }

    /// Draws `region` of `source` scaled to cover the whole buffer.
    ///
    /// Each destination pixel is the area-weighted average of the source
    /// pixels it covers, so fractional region edges are honoured exactly.
    /// Source alpha is composited over the current buffer content, which is
    /// white after [`Self::fill_white`].
    ///
    /// # Errors
    /// Returns [`RasterError::RegionOutOfBounds`] when `region` is empty or
    /// extends past the image.
    pub fn draw_region(&mut self, source: &SourceImage, region: &TileRect) -> Result<(), RasterError> {
        let image_w = f64::from(source.width);
        let image_h = f64::from(source.height);
        if region.width <= 0.0
            || region.height <= 0.0
            || region.x < -EDGE_EPSILON
            || region.y < -EDGE_EPSILON
            || region.right() > image_w + EDGE_EPSILON
            || region.bottom() > image_h + EDGE_EPSILON
        {
            return Err(RasterError::RegionOutOfBounds {
                row: region.row,
                column: region.column,
            });
        }

        let columns = spans(region.x, region.width, self.width(), source.width);
        let rows = spans(region.y, region.height, self.height(), source.height);

        for (dy, row_span) in rows.iter().enumerate() {
            for (dx, column_span) in columns.iter().enumerate() {
                let mut premultiplied = [0.0_f64; 3];
                let mut coverage = 0.0_f64;
                let mut total = 0.0_f64;

                for (sy, wy) in row_span.samples() {
                    for (sx, wx) in column_span.samples() {
                        let weight = wy * wx;
                        let [r, g, b, a] = source.pixel(sx, sy);
                        let alpha = f64::from(a) / 255.0;
                        premultiplied[0] += f64::from(r) * alpha * weight;
                        premultiplied[1] += f64::from(g) * alpha * weight;
                        premultiplied[2] += f64::from(b) * alpha * weight;
                        coverage += alpha * weight;
                        total += weight;
                    }
                }

                if total <= 0.0 {
                    continue;
                }

                let pixel = self.surface.get_pixel_mut(dx as u32, dy as u32);
                let backdrop_weight = (total - coverage).max(0.0);
                for channel in 0..3 {
                    let backdrop = f64::from(pixel.0[channel]) * backdrop_weight;
                    let value = (premultiplied[channel] + backdrop) / total;
                    pixel.0[channel] = value.round().clamp(0.0, 255.0) as u8;
                }
            }
        }

        Ok(())
    }

    /// Clears to white and draws `region`: one full tile capture.
    ///
    /// # Errors
    /// See [`Self::draw_region`].
    pub fn rasterize(&mut self, source: &SourceImage, region: &TileRect) -> Result<(), RasterError> {
        self.fill_white();
        self.draw_region(source, region)
    }

    /// Encodes the current buffer content as JPEG.
    ///
    /// # Errors
    /// Returns [`RasterError::Encode`] when the encoder rejects the buffer.
    pub fn encode_jpeg(&self, quality: u8) -> Result<EncodedTile, RasterError> {
        let mut jpeg = Vec::new();
        image::codecs::jpeg::JpegEncoder::new_with_quality(&mut jpeg, quality.clamp(1, 100))
            .encode(
                self.rgb(),
                self.width(),
                self.height(),
                image::ColorType::Rgb8.into(),
            )?;

        Ok(EncodedTile {
            width: self.width(),
            height: self.height(),
            jpeg,
        })
    }
}

/// Source pixels covered by one destination pixel along one axis.
#[derive(Debug, Clone, PartialEq)]
struct Span {
    first: u32,
    weights: Vec<f64>,
}

impl Span {
    fn samples(&self) -> impl Iterator<Item = (u32, f64)> + '_ {
        self.weights
            .iter()
            .enumerate()
            .map(|(offset, weight)| (self.first + offset as u32, *weight))
    }
}

/// Splits `[origin, origin + extent)` into `count` equal destination cells and
/// records, per cell, the overlap of every source pixel it touches.
fn spans(origin: f64, extent: f64, count: u32, limit: u32) -> Vec<Span> {
    let limit_f = f64::from(limit);
    let step = extent / f64::from(count);

    (0..count)
        .map(|index| {
            let start = (origin + step * f64::from(index)).clamp(0.0, limit_f);
            let end = (origin + step * f64::from(index + 1)).clamp(0.0, limit_f);
            let first = (start.floor() as u32).min(limit - 1);
            let last = (end.ceil() as u32).clamp(first + 1, limit);

            let weights = (first..last)
                .map(|pixel| {
                    let lo = start.max(f64::from(pixel));
                    let hi = end.min(f64::from(pixel + 1));
                    (hi - lo).max(0.0)
                })
                .collect();

            Span { first, weights }
        })
        .collect()
}

/// Raster layer error type.
#[derive(Debug, Error)]
pub enum RasterError {
    /// Capture surface could not be created.
    #[error("capture surface {width}x{height} is unavailable")]
    SurfaceUnavailable {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },
    /// Tile region does not lie inside the source image.
    #[error("tile region at row {row}, column {column} is outside the source image")]
    RegionOutOfBounds {
        /// Tile row.
        row: u32,
        /// Tile column.
        column: u32,
    },
    /// JPEG encoder failure.
    #[error("tile encode failed: {0}")]
    Encode(#[from] image::ImageError),
}
