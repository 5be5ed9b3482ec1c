#![warn(missing_docs)]
//! # gridsplit-ui
//!
//! ## Purpose
//! Caller-owned control state behind the poster controls: the current
//! [`RenderConfig`] plus the export "processing" gate.
//!
//! ## Responsibilities
//! - Apply user edits, clamping grid inputs to the supported range.
//! - Reject direct row edits while aspect lock is on.
//! - Re-derive rows after every relevant edit, applying only real changes.
//! - Gate export on a loaded image and a free processing slot.
//!
//! ## Data flow
//! Front-end events call the setters on [`ControlState`]; each setter runs
//! [`ControlState::refresh_rows`]. Export code obtains an [`ExportSession`]
//! from [`ControlState::begin_export`] and reads the image and settings
//! through it.
//!
//! ## Ownership and lifetimes
//! An [`ExportSession`] mutably borrows the state for the whole export, so
//! settings cannot change mid-render; dropping it always clears the
//! processing flag, whether the export succeeded or failed.
//!
//! ## Error model
//! This crate favors explicit state over recoverable errors. Ignored edits and
//! blocked exports are reported as plain enums.

use gridsplit_core::{
    LayoutSettings, MAX_GRID_DIMENSION, Orientation, PageFormat, RenderConfig, SourceImage,
};
use gridsplit_layout::reconcile_rows;

/// Outcome of a direct row edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowEdit {
    /// Rows were set to the contained (clamped) value.
    Applied(u32),
    /// Rows are derived while aspect lock is on; the edit was ignored.
    IgnoredAspectLocked,
}

/// Reason an export could not start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportBlocked {
    /// No image has been loaded yet.
    NoImage,
    /// Another export is still running.
    AlreadyProcessing,
}

/// Current session state driving preview and export.
#[derive(Debug, Clone, Default)]
pub struct ControlState {
    config: RenderConfig,
    processing: bool,
}

impl ControlState {
    /// Creates default state: 2x2 grid, A4, portrait, aspect lock on.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates state seeded with saved settings.
    pub fn with_settings(settings: LayoutSettings) -> Self {
        Self {
            config: RenderConfig {
                image: None,
                settings,
            },
            processing: false,
        }
    }

    /// Read-only view of the render config.
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Read-only view of the layout settings.
    pub fn settings(&self) -> &LayoutSettings {
        &self.config.settings
    }

    /// Replaces the loaded image wholesale.
    pub fn load_image(&mut self, image: SourceImage) {
        tracing::info!(width = image.width, height = image.height, "image loaded");
        self.config.image = Some(image);
        self.refresh_rows();
    }

    /// Sets the column count, clamped to `1..=MAX_GRID_DIMENSION`.
    pub fn set_columns(&mut self, columns: u32) {
        let grid = self.config.settings.grid;
        self.config.settings.grid = grid.with_columns(clamp_grid_value(columns));
        self.refresh_rows();
    }

    /// Sets the row count unless rows are currently derived.
    pub fn set_rows(&mut self, rows: u32) -> RowEdit {
        if self.config.settings.maintain_aspect_ratio {
            return RowEdit::IgnoredAspectLocked;
        }

        let rows = clamp_grid_value(rows);
        let grid = self.config.settings.grid;
        self.config.settings.grid = grid.with_rows(rows);
        RowEdit::Applied(rows)
    }

    /// Selects a paper format.
    pub fn set_page_format(&mut self, page_format: PageFormat) {
        self.config.settings.page_format = page_format;
        self.refresh_rows();
    }

    /// Selects a page orientation.
    pub fn set_orientation(&mut self, orientation: Orientation) {
        self.config.settings.orientation = orientation;
        self.refresh_rows();
    }

    /// Toggles aspect lock.
    pub fn set_maintain_aspect_ratio(&mut self, enabled: bool) {
        self.config.settings.maintain_aspect_ratio = enabled;
        self.refresh_rows();
    }

    /// Re-derives rows when aspect lock is on.
    ///
    /// Returns `true` only when the row count actually changed.
    pub fn refresh_rows(&mut self) -> bool {
        let Some((width, height)) = self.config.image_dimensions() else {
            return false;
        };
        let Some(rows) = reconcile_rows(&self.config.settings, width, height) else {
            return false;
        };

        if rows > MAX_GRID_DIMENSION {
            tracing::warn!(
                rows,
                max = MAX_GRID_DIMENSION,
                "derived row count exceeds the interactive maximum"
            );
        }

        let grid = self.config.settings.grid;
        self.config.settings.grid = grid.with_rows(rows);
        true
    }

    /// Number of sheets the export will produce.
    pub fn total_sheets(&self) -> usize {
        self.config.settings.grid.page_count()
    }

    /// Whether an export is currently running.
    pub fn is_processing(&self) -> bool {
        self.processing
    }

    /// Whether the export trigger should be enabled.
    pub fn can_export(&self) -> bool {
        self.config.image.is_some() && !self.processing
    }

    /// Marks an export as running and hands out its inputs.
    ///
    /// # Errors
    /// Returns [`ExportBlocked`] when no image is loaded or an export is
    /// already running.
    pub fn begin_export(&mut self) -> Result<ExportSession<'_>, ExportBlocked> {
        if self.processing {
            return Err(ExportBlocked::AlreadyProcessing);
        }

        let Self { config, processing } = self;
        let image = config.image.as_ref().ok_or(ExportBlocked::NoImage)?;
        *processing = true;

        Ok(ExportSession {
            image,
            settings: &config.settings,
            processing,
        })
    }
}

/// Scoped export slot; dropping it clears the processing flag.
#[derive(Debug)]
pub struct ExportSession<'a> {
    image: &'a SourceImage,
    settings: &'a LayoutSettings,
    processing: &'a mut bool,
}

impl ExportSession<'_> {
    /// Image being exported.
    pub fn image(&self) -> &SourceImage {
        self.image
    }

    /// Settings being exported.
    pub fn settings(&self) -> &LayoutSettings {
        self.settings
    }

    /// Always `true` while the session is alive.
    pub fn is_processing(&self) -> bool {
        *self.processing
    }
}

impl Drop for ExportSession<'_> {
    fn drop(&mut self) {
        *self.processing = false;
    }
}

/// Clamps a user-entered grid value to `1..=MAX_GRID_DIMENSION`.
pub fn clamp_grid_value(value: u32) -> u32 {
    value.clamp(1, MAX_GRID_DIMENSION)
}

/// Parses free-form numeric input the way the grid fields do.
///
/// The leading integer is taken (`"7abc"` is 7, `"2.5"` is 2); input without
/// one, zero and negatives become 1, and large values are clamped.
pub fn parse_grid_input(raw: &str) -> u32 {
    let trimmed = raw.trim_start();
    let (negative, unsigned) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let digits_len = unsigned
        .bytes()
        .take_while(|byte| byte.is_ascii_digit())
        .count();
    if negative || digits_len == 0 {
        return 1;
    }

    unsigned[..digits_len]
        .parse::<u32>()
        .map(clamp_grid_value)
        .unwrap_or(MAX_GRID_DIMENSION)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(width: u32, height: u32) -> SourceImage {
        SourceImage::new(width, height, vec![255; (width * height * 4) as usize])
            .expect("fixture image should be valid")
    }

    #[test]
    fn export_gate_requires_image() {
        let mut state = ControlState::new();
        assert!(!state.can_export());
        assert_eq!(state.begin_export().err(), Some(ExportBlocked::NoImage));
        assert!(!state.is_processing());

        state.load_image(image(4, 4));
        assert!(state.can_export());
    }

    #[test]
    fn processing_flag_is_scoped_to_session() {
        let mut state = ControlState::new();
        state.load_image(image(8, 8));

        {
            let session = state.begin_export().expect("export should start");
            assert!(session.is_processing());
            assert_eq!(session.image().width, 8);
        }

        assert!(!state.is_processing());
        assert!(state.can_export());
    }

    #[test]
    fn parse_grid_input_mirrors_field_rules() {
        assert_eq!(parse_grid_input("7"), 7);
        assert_eq!(parse_grid_input(""), 1);
        assert_eq!(parse_grid_input("abc"), 1);
        assert_eq!(parse_grid_input("0"), 1);
        assert_eq!(parse_grid_input("-3"), 1);
        assert_eq!(parse_grid_input("99"), MAX_GRID_DIMENSION);
        assert_eq!(parse_grid_input("99999999999"), MAX_GRID_DIMENSION);
    }
}
