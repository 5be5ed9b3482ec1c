#![warn(missing_docs)]
//! # gridsplit-decode
//!
//! ## Purpose
//! Turns an image source into a ready-to-sample [`SourceImage`] in one
//! blocking call.
//!
//! ## Responsibilities
//! - Define a source-agnostic loader trait.
//! - Decode files and in-memory bytes (PNG, JPEG, GIF, BMP, WebP).
//! - Expose a deterministic synthetic loader for CI and unit tests.
//! - Flag inputs above the advisory upload size.
//!
//! ## Data flow
//! CLI/app picks a loader -> [`ImageLoader::load`] -> [`SourceImage`] stored in
//! the caller-owned render config.
//!
//! ## Ownership and lifetimes
//! Decoded images own their pixel buffer; nothing borrows from the decoder.
//!
//! ## Error model
//! Unreadable files, unsupported formats, and corrupt data are reported as
//! [`DecodeError`] values; the export pipeline treats them as terminal.

use std::path::{Path, PathBuf};

use gridsplit_core::{CoreError, SourceImage};
use thiserror::Error;

/// Advisory upload size communicated to users; larger inputs still decode.
pub const ADVISORY_MAX_FILE_BYTES: u64 = 20 * 1024 * 1024;

/// Trait implemented by concrete image sources.
pub trait ImageLoader {
    /// Short human-readable description of the source for logs.
    fn describe(&self) -> String;

    /// Decodes the source into an RGBA pixel buffer.
    ///
    /// # Errors
    /// Returns [`DecodeError`] when the source cannot be read or decoded.
    fn load(&self) -> Result<SourceImage, DecodeError>;
}

/// Loads an image from the filesystem, sniffing the format from content.
#[derive(Debug, Clone)]
pub struct FileImageLoader {
    path: PathBuf,
}

impl FileImageLoader {
    /// Creates a loader for `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Source path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ImageLoader for FileImageLoader {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> Result<SourceImage, DecodeError> {
        let io_error = |source| DecodeError::Io {
            path: self.path.clone(),
            source,
        };

        let file_len = std::fs::metadata(&self.path).map_err(io_error)?.len();
        if exceeds_advisory_size(file_len) {
            tracing::warn!(
                path = %self.path.display(),
                bytes = file_len,
                advisory_limit = ADVISORY_MAX_FILE_BYTES,
                "input exceeds advisory size; decoding anyway"
            );
        }

        let decoded = image::ImageReader::open(&self.path)
            .map_err(io_error)?
            .with_guessed_format()
            .map_err(io_error)?
            .decode()?;

        into_source_image(decoded)
    }
}

/// Decodes an already-read byte buffer.
#[derive(Debug, Clone)]
pub struct BytesImageLoader {
    bytes: Vec<u8>,
}

impl BytesImageLoader {
    /// Creates a loader over owned encoded bytes.
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }
}

impl ImageLoader for BytesImageLoader {
    fn describe(&self) -> String {
        format!("<memory: {} bytes>", self.bytes.len())
    }

    fn load(&self) -> Result<SourceImage, DecodeError> {
        decode_image_bytes(&self.bytes)
    }
}

/// Deterministic synthetic source for tests and benchmarks.
///
/// Pixels encode their own coordinates (`r = x mod 256`, `g = y mod 256`,
/// `b = (x + y) mod 256`) so tests can check exactly which source region was
/// sampled. The optional alpha applies to every pixel.
#[derive(Debug, Clone, Copy)]
pub struct SyntheticImageLoader {
    width: u32,
    height: u32,
    alpha: u8,
}

impl SyntheticImageLoader {
    /// Creates an opaque synthetic image.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            alpha: 255,
        }
    }

    /// Overrides the alpha of every pixel.
    pub fn with_alpha(mut self, alpha: u8) -> Self {
        self.alpha = alpha;
        self
    }
}

impl ImageLoader for SyntheticImageLoader {
    fn describe(&self) -> String {
        format!("<synthetic {}x{}>", self.width, self.height)
    }

    fn load(&self) -> Result<SourceImage, DecodeError> {
        let mut rgba = Vec::with_capacity(self.width as usize * self.height as usize * 4);
        for y in 0..self.height {
            for x in 0..self.width {
                rgba.extend_from_slice(&[
                    (x % 256) as u8,
                    (y % 256) as u8,
                    ((x + y) % 256) as u8,
                    self.alpha,
                ]);
            }
        }

        SourceImage::new(self.width, self.height, rgba).map_err(DecodeError::Image)
    }
}

/// Decodes encoded image bytes, sniffing the format from content.
///
/// # Errors
/// Returns [`DecodeError::Decode`] for unknown or corrupt data and
/// [`DecodeError::Image`] for zero-sized images.
pub fn decode_image_bytes(bytes: &[u8]) -> Result<SourceImage, DecodeError> {
    let decoded = image::load_from_memory(bytes)?;
    into_source_image(decoded)
}

/// Returns `true` when `len` is above the advisory upload size.
pub fn exceeds_advisory_size(len: u64) -> bool {
    len > ADVISORY_MAX_FILE_BYTES
}

fn into_source_image(decoded: image::DynamicImage) -> Result<SourceImage, DecodeError> {
    let rgba = decoded.into_rgba8();
    let (width, height) = rgba.dimensions();
    tracing::debug!(width, height, "image decoded");
    SourceImage::new(width, height, rgba.into_raw()).map_err(DecodeError::Image)
}

/// Decode layer error type.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Source file could not be read.
    #[error("failed to read '{}': {source}", path.display())]
    Io {
        /// Path being read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },
    /// Data is not a supported or well-formed image.
    #[error("image decode failed: {0}")]
    Decode(#[from] image::ImageError),
    /// Decoded image violates the pixel model.
    #[error("decoded image is invalid: {0}")]
    Image(CoreError),
}
