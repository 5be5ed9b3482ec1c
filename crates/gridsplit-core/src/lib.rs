#![warn(missing_docs)]
//! # gridsplit-core
//!
//! ## Purpose
//! Defines the pure data model shared across the `gridsplit` workspace.
//!
//! ## Responsibilities
//! - Represent decoded source images and the poster grid.
//! - Map paper formats and orientations to physical page geometry.
//! - Carry caller-owned layout settings and their JSON codec.
//!
//! ## Data flow
//! Decoders emit [`SourceImage`] values. Callers combine them with
//! [`LayoutSettings`] into a [`RenderConfig`], which drives both the layout
//! calculator and the tile renderer.
//!
//! ## Ownership and lifetimes
//! Images own their backing buffers (`Vec<u8>`) and are replaced wholesale on
//! a new upload; nothing in the model borrows from decoder state.
//!
//! ## Error model
//! Validation failures (shape mismatch, zero grid dimension, unknown format
//! names) return [`CoreError`] variants.
//!
//! ## Example
//! ```rust
//! use gridsplit_core::{Orientation, PageFormat};
//!
//! let page = PageFormat::A4.dimensions(Orientation::Landscape);
//! assert_eq!(page.width_mm, 297.0);
//! assert_eq!(page.height_mm, 210.0);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default number of grid columns for a fresh session.
pub const DEFAULT_COLUMNS: u32 = 2;

/// Default number of grid rows for a fresh session.
pub const DEFAULT_ROWS: u32 = 2;

/// Upper bound accepted for user-edited rows and columns.
pub const MAX_GRID_DIMENSION: u32 = 20;

/// Largest capture-buffer edge, in pixels, used when rasterizing a tile.
pub const MAX_CAPTURE_DIMENSION: f64 = 2000.0;

/// JPEG quality (1-100) used for every tile embedded in the output document.
pub const TILE_JPEG_QUALITY: u8 = 85;

/// Millimeters per PostScript point denominator (`1 in = 25.4 mm = 72 pt`).
pub const MM_PER_INCH: f64 = 25.4;

/// A decoded raster image ready for sampling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceImage {
    /// Intrinsic width in pixels.
    pub width: u32,
    /// Intrinsic height in pixels.
    pub height: u32,
    /// Straight-alpha RGBA pixel buffer (`width * height * 4` bytes).
    pub rgba: Vec<u8>,
}

impl SourceImage {
    /// Constructs a validated image.
    ///
    /// # Errors
    /// Returns [`CoreError::EmptyImage`] when either dimension is zero and
    /// [`CoreError::InvalidImageShape`] when the buffer length is not exactly
    /// `width * height * 4`.
    pub fn new(width: u32, height: u32, rgba: Vec<u8>) -> Result<Self, CoreError> {
        if width == 0 || height == 0 {
            return Err(CoreError::EmptyImage { width, height });
        }

        let expected_len = required_rgba_len(width, height)?;
        if rgba.len() != expected_len {
            return Err(CoreError::InvalidImageShape {
                expected: expected_len,
                actual: rgba.len(),
            });
        }

        Ok(Self {
            width,
            height,
            rgba,
        })
    }

    /// Returns the RGBA components of the pixel at `(x, y)`, or `None`
    /// outside the image.
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        (x < self.width && y < self.height).then(|| self.pixel(x, y))
    }

    /// Returns the RGBA components of the pixel at `(x, y)`.
    ///
    /// Unchecked form of [`Self::get_pixel`] for sampling loops.
    ///
    /// # Panics
    /// Panics when `(x, y)` lies outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let offset = (y as usize * self.width as usize + x as usize) * 4;
        [
            self.rgba[offset],
            self.rgba[offset + 1],
            self.rgba[offset + 2],
            self.rgba[offset + 3],
        ]
    }
}

/// Poster grid as rows by columns, both at least one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "GridSpecRepr", into = "GridSpecRepr")]
pub struct GridSpec {
    rows: u32,
    columns: u32,
}

impl GridSpec {
    /// Creates a validated grid.
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidGridDimension`] when either value is zero.
    pub fn new(rows: u32, columns: u32) -> Result<Self, CoreError> {
        if rows == 0 {
            return Err(CoreError::InvalidGridDimension { field: "rows" });
        }
        if columns == 0 {
            return Err(CoreError::InvalidGridDimension { field: "columns" });
        }

        Ok(Self { rows, columns })
    }

    /// Number of tile rows.
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of tile columns.
    pub fn columns(&self) -> u32 {
        self.columns
    }

    /// Returns a copy with `rows` replaced, keeping the `>= 1` invariant.
    pub fn with_rows(self, rows: u32) -> Self {
        Self {
            rows: rows.max(1),
            ..self
        }
    }

    /// Returns a copy with `columns` replaced, keeping the `>= 1` invariant.
    pub fn with_columns(self, columns: u32) -> Self {
        Self {
            columns: columns.max(1),
            ..self
        }
    }

    /// Number of output pages (`rows * columns`).
    pub fn page_count(&self) -> usize {
        self.rows as usize * self.columns as usize
    }
}

impl Default for GridSpec {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            columns: DEFAULT_COLUMNS,
        }
    }
}

impl fmt::Display for GridSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.rows, self.columns)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct GridSpecRepr {
    rows: u32,
    columns: u32,
}

impl TryFrom<GridSpecRepr> for GridSpec {
    type Error = CoreError;

    fn try_from(repr: GridSpecRepr) -> Result<Self, Self::Error> {
        GridSpec::new(repr.rows, repr.columns)
    }
}

impl From<GridSpec> for GridSpecRepr {
    fn from(grid: GridSpec) -> Self {
        Self {
            rows: grid.rows,
            columns: grid.columns,
        }
    }
}

/// Physical page size in millimeters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageDimensions {
    /// Page width in millimeters.
    pub width_mm: f64,
    /// Page height in millimeters.
    pub height_mm: f64,
}

impl PageDimensions {
    /// Page width in PDF points.
    pub fn width_pt(&self) -> f64 {
        mm_to_pt(self.width_mm)
    }

    /// Page height in PDF points.
    pub fn height_pt(&self) -> f64 {
        mm_to_pt(self.height_mm)
    }

    /// Width divided by height.
    pub fn aspect_ratio(&self) -> f64 {
        self.width_mm / self.height_mm
    }
}

/// Supported paper formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PageFormat {
    /// ISO A4, 210 x 297 mm.
    #[default]
    A4,
    /// ISO A3, 297 x 420 mm.
    A3,
    /// US Letter, 215.9 x 279.4 mm.
    Letter,
}

impl PageFormat {
    /// All supported formats in presentation order.
    pub const ALL: [Self; 3] = [Self::A4, Self::A3, Self::Letter];

    /// Portrait-base dimensions for this format.
    pub fn portrait_dimensions(self) -> PageDimensions {
        let (width_mm, height_mm) = match self {
            Self::A4 => (210.0, 297.0),
            Self::A3 => (297.0, 420.0),
            Self::Letter => (215.9, 279.4),
        };
        PageDimensions {
            width_mm,
            height_mm,
        }
    }

    /// Resolves effective dimensions, swapping the axes for landscape.
    pub fn dimensions(self, orientation: Orientation) -> PageDimensions {
        let base = self.portrait_dimensions();
        match orientation {
            Orientation::Portrait => base,
            Orientation::Landscape => PageDimensions {
                width_mm: base.height_mm,
                height_mm: base.width_mm,
            },
        }
    }

    /// Canonical display name (`A4`, `A3`, `Letter`).
    pub fn name(self) -> &'static str {
        match self {
            Self::A4 => "A4",
            Self::A3 => "A3",
            Self::Letter => "Letter",
        }
    }
}

impl fmt::Display for PageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PageFormat {
    type Err = CoreError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|format| format.name().to_ascii_lowercase() == normalized)
            .ok_or_else(|| CoreError::UnknownPageFormat(raw.to_string()))
    }
}

/// Page orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Orientation {
    /// Taller than wide.
    #[default]
    Portrait,
    /// Wider than tall.
    Landscape,
}

impl Orientation {
    /// Canonical display name (`Portrait`, `Landscape`).
    pub fn name(self) -> &'static str {
        match self {
            Self::Portrait => "Portrait",
            Self::Landscape => "Landscape",
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Orientation {
    type Err = CoreError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "portrait" | "p" => Ok(Self::Portrait),
            "landscape" | "l" => Ok(Self::Landscape),
            _ => Err(CoreError::UnknownOrientation(raw.to_string())),
        }
    }
}

/// User-adjustable layout parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LayoutSettings {
    /// Current poster grid.
    pub grid: GridSpec,
    /// Selected paper format.
    pub page_format: PageFormat,
    /// Selected page orientation.
    pub orientation: Orientation,
    /// When `true`, rows are derived from columns and page geometry.
    pub maintain_aspect_ratio: bool,
}

impl LayoutSettings {
    /// Effective page dimensions for the selected format and orientation.
    pub fn page_dimensions(&self) -> PageDimensions {
        self.page_format.dimensions(self.orientation)
    }

    /// Serializes settings to pretty JSON bytes.
    ///
    /// # Errors
    /// Returns [`CoreError::Codec`] when JSON serialization fails.
    pub fn to_json_bytes(&self) -> Result<Vec<u8>, CoreError> {
        serde_json::to_vec_pretty(self).map_err(CoreError::Codec)
    }

    /// Deserializes settings from JSON bytes.
    ///
    /// # Errors
    /// Returns [`CoreError::Codec`] when decoding fails, including grids with a
    /// zero dimension.
    pub fn from_json_bytes(raw: &[u8]) -> Result<Self, CoreError> {
        serde_json::from_slice(raw).map_err(CoreError::Codec)
    }
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            grid: GridSpec::default(),
            page_format: PageFormat::A4,
            orientation: Orientation::Portrait,
            maintain_aspect_ratio: true,
        }
    }
}

/// Single source of truth for preview and export during one session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderConfig {
    /// Loaded source image, if any.
    pub image: Option<SourceImage>,
    /// Layout parameters.
    pub settings: LayoutSettings,
}

impl RenderConfig {
    /// Creates a config with default settings and no image.
    pub fn new() -> Self {
        Self::default()
    }

    /// Intrinsic `(width, height)` of the loaded image.
    pub fn image_dimensions(&self) -> Option<(u32, u32)> {
        self.image.as_ref().map(|image| (image.width, image.height))
    }
}

/// Converts millimeters to PDF points.
pub fn mm_to_pt(mm: f64) -> f64 {
    mm * 72.0 / MM_PER_INCH
}

/// Error type for core model validation and codec failures.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Image buffer shape does not match declared geometry.
    #[error("invalid image shape: expected {expected} bytes, got {actual}")]
    InvalidImageShape {
        /// Expected RGBA byte count.
        expected: usize,
        /// Actual RGBA byte count.
        actual: usize,
    },
    /// Image has a zero dimension.
    #[error("image dimensions must be positive, got {width}x{height}")]
    EmptyImage {
        /// Declared width.
        width: u32,
        /// Declared height.
        height: u32,
    },
    /// Image dimensions overflow the addressable buffer size.
    #[error("image dimensions overflow")]
    DimensionOverflow,
    /// Grid rows and columns must be at least one.
    #[error("grid {field} must be at least 1")]
    InvalidGridDimension {
        /// Offending field name.
        field: &'static str,
    },
    /// Page format name is not recognised.
    #[error("unknown page format '{0}' (expected A4, A3 or Letter)")]
    UnknownPageFormat(String),
    /// Orientation name is not recognised.
    #[error("unknown orientation '{0}' (expected Portrait or Landscape)")]
    UnknownOrientation(String),
    /// JSON encoding/decoding error.
    #[error("settings codec failure: {0}")]
    Codec(#[from] serde_json::Error),
}

fn required_rgba_len(width: u32, height: u32) -> Result<usize, CoreError> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|pixels| pixels.checked_mul(4))
        .ok_or(CoreError::DimensionOverflow)
}
