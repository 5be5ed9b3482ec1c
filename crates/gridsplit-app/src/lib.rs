#![warn(missing_docs)]
//! # gridsplit-app
//!
//! ## Purpose
//! Orchestrates decode, layout, tile rendering, page assembly and saving for
//! `gridsplit`.
//!
//! ## Responsibilities
//! - Render an image and grid into a [`PosterDocument`].
//! - Run gated, all-or-nothing exports against a [`DocumentSink`].
//! - Load settings files and apply command-line overrides.
//! - Map pipeline failures onto one user-facing notification.
//!
//! ## Data flow
//! Loader -> [`load_image`] -> [`ControlState`] (rows derived) ->
//! [`export_poster`] -> [`render_document`] -> PDF bytes -> sink.
//!
//! ## Ownership and lifetimes
//! The control state is owned by the caller and borrowed for the duration of
//! one export; rendered documents are owned values handed to the sink by
//! reference.
//!
//! ## Error model
//! Subsystem failures are wrapped in [`AppError`]. Any error aborts the whole
//! export before anything is saved; [`user_facing_message`] yields the text
//! shown to users.

use std::path::{Path, PathBuf};
use std::time::Instant;

use gridsplit_core::{
    CoreError, GridSpec, LayoutSettings, Orientation, PageFormat, SourceImage, TILE_JPEG_QUALITY,
};
use gridsplit_decode::{DecodeError, ImageLoader};
use gridsplit_document::{
    DocumentError, DocumentMetadata, DocumentSink, PosterDocument, SavedDocument,
    output_file_name,
};
use gridsplit_layout::{plan_render, preview};
use gridsplit_raster::{CaptureBuffer, RasterError};
use gridsplit_ui::{ControlState, ExportBlocked, RowEdit};
use thiserror::Error;

/// Build-time application version loaded from root `VERSION` file.
pub const APP_VERSION: &str = env!("GRIDSPLIT_VERSION");

/// Environment variable holding the log filter directive.
pub const LOG_FILTER_ENV: &str = "GRIDSPLIT_LOG";

/// Log filter used when [`LOG_FILTER_ENV`] is unset or blank.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Notification shown for every failed export.
pub const EXPORT_FAILURE_MESSAGE: &str =
    "Failed to generate PDF. Try reducing the number of columns or rows.";

/// Returns the app version sourced from root `VERSION`.
pub fn app_version() -> &'static str {
    APP_VERSION
}

/// Producer string embedded in generated documents.
pub fn producer() -> String {
    format!("gridsplit {APP_VERSION}")
}

/// Returns the log filter from [`LOG_FILTER_ENV`], or the default.
pub fn log_filter_from_env() -> String {
    std::env::var(LOG_FILTER_ENV)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string())
}

/// Optional per-run overrides layered on top of saved settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SettingsOverrides {
    /// Paper format.
    pub page_format: Option<PageFormat>,
    /// Page orientation.
    pub orientation: Option<Orientation>,
    /// Column count.
    pub columns: Option<u32>,
    /// Row count; ignored while aspect lock is on.
    pub rows: Option<u32>,
    /// Aspect lock.
    pub maintain_aspect_ratio: Option<bool>,
}

/// Applies overrides in control-panel order and returns the row edit result
/// when rows were requested.
pub fn apply_overrides(state: &mut ControlState, overrides: SettingsOverrides) -> Option<RowEdit> {
    if let Some(enabled) = overrides.maintain_aspect_ratio {
        state.set_maintain_aspect_ratio(enabled);
    }
    if let Some(page_format) = overrides.page_format {
        state.set_page_format(page_format);
    }
    if let Some(orientation) = overrides.orientation {
        state.set_orientation(orientation);
    }
    if let Some(columns) = overrides.columns {
        state.set_columns(columns);
    }

    let edit = overrides.rows.map(|rows| state.set_rows(rows));
    if edit == Some(RowEdit::IgnoredAspectLocked) {
        tracing::warn!("rows are derived while aspect lock is on; requested row count ignored");
    }
    edit
}

/// Reads layout settings from a JSON file.
///
/// # Errors
/// Returns [`AppError::SettingsIo`] when the file cannot be read and
/// [`AppError::Settings`] when it is not valid settings JSON.
pub fn load_settings_file(path: &Path) -> Result<LayoutSettings, AppError> {
    let raw = std::fs::read(path).map_err(|source| AppError::SettingsIo {
        path: path.to_path_buf(),
        source,
    })?;
    LayoutSettings::from_json_bytes(&raw).map_err(AppError::Settings)
}

/// Decodes an image and loads it into the control state.
///
/// # Errors
/// Returns [`AppError::Decode`] when the loader fails; the state keeps its
/// previous image in that case.
pub fn load_image(state: &mut ControlState, loader: &dyn ImageLoader) -> Result<(), AppError> {
    tracing::info!(source = %loader.describe(), "decoding image");
    let image = loader.load()?;
    state.load_image(image);
    Ok(())
}

/// Renders the cut-guide preview for the loaded image as SVG.
pub fn preview_svg(state: &ControlState) -> Option<String> {
    let (width, height) = state.config().image_dimensions()?;
    let overlay = preview::grid_overlay(width, height, state.settings().grid);
    Some(preview::render_overlay_svg(&overlay))
}

/// Crops, rasterizes and places every tile of `image` in row-major order.
///
/// The first tile lands on the document's initial page; every later tile is
/// preceded by an explicit page append.
///
/// # Errors
/// Returns [`AppError::Raster`] when the capture surface cannot be created or
/// a tile fails to encode, and [`AppError::Document`] on placement errors.
pub fn render_document(
    image: &SourceImage,
    grid: GridSpec,
    page_format: PageFormat,
    orientation: Orientation,
) -> Result<PosterDocument, AppError> {
    let page = page_format.dimensions(orientation);
    let plan = plan_render(image.width, image.height, grid, page);
    let mut buffer = CaptureBuffer::new(plan.capture)?;
    let mut document = PosterDocument::new(page);

    tracing::debug!(
        capture_width = plan.capture.width,
        capture_height = plan.capture.height,
        scale = plan.capture.scale,
        "capture buffer allocated"
    );

    for (index, tile) in plan.tiles.iter().enumerate() {
        if index != 0 {
            document.add_page();
        }

        buffer.rasterize(image, tile)?;
        let encoded = buffer.encode_jpeg(TILE_JPEG_QUALITY)?;
        tracing::debug!(
            row = tile.row,
            column = tile.column,
            bytes = encoded.jpeg.len(),
            "tile rendered"
        );
        document.place_full_bleed(encoded)?;
    }

    Ok(document)
}

/// Summary of a completed export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    /// What the sink stored.
    pub saved: SavedDocument,
    /// Grid that was rendered.
    pub grid: GridSpec,
    /// Paper format used.
    pub page_format: PageFormat,
    /// Orientation used.
    pub orientation: Orientation,
    /// Pages in the document.
    pub page_count: usize,
}

/// Result of an export request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// Export was not started; the trigger would have been disabled.
    Skipped(ExportBlocked),
    /// Document rendered and saved.
    Saved(ExportReport),
}

/// Runs one export: render every tile, serialize, save.
///
/// The processing flag is held for the whole call and always released on
/// return. Nothing reaches the sink unless every tile rendered.
///
/// # Errors
/// Returns [`AppError`] for any render, serialization or save failure.
pub fn export_poster(
    state: &mut ControlState,
    sink: &dyn DocumentSink,
    timestamp_ms: i128,
) -> Result<ExportOutcome, AppError> {
    let session = match state.begin_export() {
        Ok(session) => session,
        Err(blocked) => {
            tracing::info!(reason = ?blocked, "export skipped");
            return Ok(ExportOutcome::Skipped(blocked));
        }
    };

    let settings = *session.settings();
    let started = Instant::now();
    tracing::info!(
        grid = %settings.grid,
        page_format = %settings.page_format,
        orientation = %settings.orientation,
        "export started"
    );

    let result = render_and_save(session.image(), &settings, sink, timestamp_ms);
    drop(session);

    match result {
        Ok(report) => {
            tracing::info!(
                file = %report.saved.file_name,
                pages = report.page_count,
                bytes = report.saved.byte_len,
                sha256 = %report.saved.sha256,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "export finished"
            );
            Ok(ExportOutcome::Saved(report))
        }
        Err(error) => {
            tracing::error!(%error, "export failed");
            Err(error)
        }
    }
}

fn render_and_save(
    image: &SourceImage,
    settings: &LayoutSettings,
    sink: &dyn DocumentSink,
    timestamp_ms: i128,
) -> Result<ExportReport, AppError> {
    let document = render_document(
        image,
        settings.grid,
        settings.page_format,
        settings.orientation,
    )?;

    let file_name = output_file_name(settings.page_format, settings.orientation, timestamp_ms);
    let metadata = DocumentMetadata {
        title: file_name.trim_end_matches(".pdf").to_string(),
        producer: producer(),
    };
    let bytes = document.to_pdf_bytes(&metadata)?;
    let saved = sink.save(&file_name, &bytes)?;

    Ok(ExportReport {
        saved,
        grid: settings.grid,
        page_format: settings.page_format,
        orientation: settings.orientation,
        page_count: document.page_count(),
    })
}

/// Text shown to the user for a failed run.
///
/// Decode, render and save failures all collapse into
/// [`EXPORT_FAILURE_MESSAGE`]; settings problems are reported verbatim since
/// reducing the grid would not fix them.
pub fn user_facing_message(error: &AppError) -> String {
    match error {
        AppError::Settings(_) | AppError::SettingsIo { .. } => error.to_string(),
        AppError::Decode(_) | AppError::Raster(_) | AppError::Document(_) => {
            EXPORT_FAILURE_MESSAGE.to_string()
        }
    }
}

/// App integration error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Image decode error.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),
    /// Tile rasterization or encode error.
    #[error("raster error: {0}")]
    Raster(#[from] RasterError),
    /// Page assembly or save error.
    #[error("document error: {0}")]
    Document(#[from] DocumentError),
    /// Settings validation or codec error.
    #[error("settings error: {0}")]
    Settings(CoreError),
    /// Settings file could not be read.
    #[error("failed to read settings '{}': {source}", path.display())]
    SettingsIo {
        /// Settings path.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },
}
