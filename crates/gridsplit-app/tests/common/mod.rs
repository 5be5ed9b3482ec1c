//! Shared fixtures for app integration tests.

use gridsplit_core::SourceImage;
use gridsplit_decode::{ImageLoader, SyntheticImageLoader};
use gridsplit_document::{DocumentError, DocumentSink, SavedDocument};
use gridsplit_ui::ControlState;

/// Deterministic 1600x1200 landscape photo stand-in.
#[allow(dead_code)]
pub fn fixture_image() -> SourceImage {
    SyntheticImageLoader::new(1600, 1200)
        .load()
        .expect("synthetic fixture should load")
}

/// Control state with the fixture image loaded and default settings.
#[allow(dead_code)]
pub fn loaded_state() -> ControlState {
    let mut state = ControlState::new();
    state.load_image(fixture_image());
    state
}

/// Sink that refuses every document.
#[allow(dead_code)]
#[derive(Debug, Default)]
pub struct FailingSink;

impl DocumentSink for FailingSink {
    fn save(&self, _file_name: &str, _bytes: &[u8]) -> Result<SavedDocument, DocumentError> {
        Err(DocumentError::Sink("disk full".to_string()))
    }
}
