#![warn(missing_docs)]
//! # gridsplit-layout
//!
//! ## Purpose
//! Pure grid arithmetic for poster tiling: row derivation, tile source
//! rectangles and capture-buffer sizing. No pixels are touched here.
//!
//! ## Responsibilities
//! - Derive the row count that keeps every tile at the page aspect ratio.
//! - Decide whether a derived row count should be applied (idempotent).
//! - Map a grid onto exact, gap-free source rectangles in row-major order.
//! - Bound the capture resolution of each tile.
//! - Describe the cut-guide overlay used for previews ([`preview`]).
//!
//! ## Data flow
//! [`gridsplit_core::LayoutSettings`] + image dimensions -> [`reconcile_rows`]
//! on every relevant edit; at export time [`plan_render`] -> [`RenderPlan`]
//! consumed by the rasterizer and page assembler.
//!
//! ## Error model
//! Every function here is total over its documented preconditions, so this
//! crate has no error type.

pub mod preview;

use gridsplit_core::{GridSpec, LayoutSettings, MAX_CAPTURE_DIMENSION, PageDimensions};

/// Derives the row count that keeps each tile at the page aspect ratio.
///
/// `rows = round((image_height / image_width) * columns * (page_width / page_height))`,
/// clamped to a minimum of one. There is no upper clamp.
///
/// Preconditions: all dimensions are positive and `columns >= 1`.
pub fn compute_rows(
    image_width: u32,
    image_height: u32,
    columns: u32,
    page_width: f64,
    page_height: f64,
) -> u32 {
    let raw = (f64::from(image_height) / f64::from(image_width))
        * f64::from(columns)
        * (page_width / page_height);

    // Float-to-int casts saturate and map NaN to zero, so the clamp also
    // covers degenerate inputs.
    (raw.round() as u32).max(1)
}

/// Returns the row count to apply after a relevant settings change.
///
/// `None` means "leave the grid alone": aspect lock is off, or the derived
/// value already equals the current row count.
pub fn reconcile_rows(settings: &LayoutSettings, image_width: u32, image_height: u32) -> Option<u32> {
    if !settings.maintain_aspect_ratio || image_width == 0 || image_height == 0 {
        return None;
    }

    let page = settings.page_dimensions();
    let rows = compute_rows(
        image_width,
        image_height,
        settings.grid.columns(),
        page.width_mm,
        page.height_mm,
    );

    (rows != settings.grid.rows()).then_some(rows)
}

/// Source sub-rectangle covered by one tile, in source pixel units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileRect {
    /// Zero-based grid row.
    pub row: u32,
    /// Zero-based grid column.
    pub column: u32,
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width (may be fractional).
    pub width: f64,
    /// Height (may be fractional).
    pub height: f64,
}

impl TileRect {
    /// Exclusive right edge.
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

/// Capture-buffer geometry shared by every tile of one render.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptureSize {
    /// Buffer width in pixels.
    pub width: u32,
    /// Buffer height in pixels.
    pub height: u32,
    /// Applied scale factor, never above one.
    pub scale: f64,
}

/// Computes the bounded capture resolution for a tile.
///
/// `scale = min(1, 2000 / max(tile_width, tile_height))`; each buffer edge is
/// the scaled tile edge truncated to whole pixels, with a floor of one pixel.
pub fn capture_size(tile_width: f64, tile_height: f64) -> CaptureSize {
    let largest = tile_width.max(tile_height);
    let scale = if largest > 0.0 {
        (MAX_CAPTURE_DIMENSION / largest).min(1.0)
    } else {
        1.0
    };

    CaptureSize {
        width: ((tile_width * scale).floor() as u32).max(1),
        height: ((tile_height * scale).floor() as u32).max(1),
        scale,
    }
}

/// Maps a grid onto source rectangles in row-major order.
///
/// Edges are computed as `index * extent / count` for both sides of every
/// tile, so neighbouring tiles share the exact same boundary value and the
/// union covers the image with no gaps or overlaps.
pub fn tile_rects(image_width: u32, image_height: u32, grid: GridSpec) -> Vec<TileRect> {
    let width = f64::from(image_width);
    let height = f64::from(image_height);
    let columns = grid.columns();
    let rows = grid.rows();
    let edge = |index: u32, extent: f64, count: u32| f64::from(index) * extent / f64::from(count);

    let mut tiles = Vec::with_capacity(grid.page_count());
    for row in 0..rows {
        let top = edge(row, height, rows);
        let bottom = edge(row + 1, height, rows);
        for column in 0..columns {
            let left = edge(column, width, columns);
            let right = edge(column + 1, width, columns);
            tiles.push(TileRect {
                row,
                column,
                x: left,
                y: top,
                width: right - left,
                height: bottom - top,
            });
        }
    }
    tiles
}

/// Everything the renderer needs to rasterize and place tiles.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderPlan {
    /// Grid being rendered.
    pub grid: GridSpec,
    /// Effective page size after orientation.
    pub page: PageDimensions,
    /// Nominal tile width in source pixels (`image_width / columns`).
    pub tile_width: f64,
    /// Nominal tile height in source pixels (`image_height / rows`).
    pub tile_height: f64,
    /// Capture-buffer geometry reused for every tile.
    pub capture: CaptureSize,
    /// Tile rectangles in row-major order.
    pub tiles: Vec<TileRect>,
}

impl RenderPlan {
    /// Number of output pages.
    pub fn page_count(&self) -> usize {
        self.tiles.len()
    }
}

/// Builds the render plan for an image of the given size.
pub fn plan_render(
    image_width: u32,
    image_height: u32,
    grid: GridSpec,
    page: PageDimensions,
) -> RenderPlan {
    let tile_width = f64::from(image_width) / f64::from(grid.columns());
    let tile_height = f64::from(image_height) / f64::from(grid.rows());

    RenderPlan {
        grid,
        page,
        tile_width,
        tile_height,
        capture: capture_size(tile_width, tile_height),
        tiles: tile_rects(image_width, image_height, grid),
    }
}
