//! Integration tests for the render-and-save export pipeline.

mod common;

use gridsplit_app::{
    AppError, ExportOutcome, EXPORT_FAILURE_MESSAGE, export_poster, render_document,
    user_facing_message,
};
use gridsplit_core::{GridSpec, Orientation, PageFormat};
use gridsplit_decode::{ImageLoader, SyntheticImageLoader};
use gridsplit_document::MemorySink;
use gridsplit_ui::{ControlState, ExportBlocked};

#[test]
fn export_pipeline_tests_two_by_two_grid_yields_four_pages() {
    let image = common::fixture_image();
    let document = render_document(
        &image,
        GridSpec::new(2, 2).unwrap(),
        PageFormat::A4,
        Orientation::Landscape,
    )
    .expect("render should succeed");

    assert_eq!(document.page_count(), 4);
    assert_eq!(document.appended_pages(), 3);
    for page in document.pages() {
        let tile = page.image.as_ref().expect("every page holds a tile");
        assert_eq!((tile.width, tile.height), (800, 600));
        assert_eq!(&tile.jpeg[..2], &[0xFF, 0xD8]);
    }
}

#[test]
fn export_pipeline_tests_saves_named_pdf_and_releases_processing() {
    let mut state = common::loaded_state();
    state.set_orientation(Orientation::Landscape);
    let sink = MemorySink::new();

    let outcome = export_poster(&mut state, &sink, 1_700_000_000_000).expect("export should work");
    let ExportOutcome::Saved(report) = outcome else {
        panic!("export should have produced a document");
    };

    assert_eq!(report.page_count, 4);
    assert_eq!(report.grid, GridSpec::new(2, 2).unwrap());
    assert_eq!(
        report.saved.file_name,
        "gridsplit-A4-Landscape-1700000000000.pdf"
    );
    assert_eq!(report.saved.sha256.len(), 64);

    let documents = sink.documents();
    assert_eq!(documents.len(), 1);
    assert!(documents[0].1.starts_with(b"%PDF-"));
    assert_eq!(documents[0].1.len(), report.saved.byte_len);

    assert!(!state.is_processing());
    assert!(state.can_export());
}

#[test]
fn export_pipeline_tests_without_image_is_a_no_op() {
    let mut state = ControlState::new();
    let sink = MemorySink::new();

    let outcome = export_poster(&mut state, &sink, 1).expect("skip is not an error");
    assert_eq!(outcome, ExportOutcome::Skipped(ExportBlocked::NoImage));
    assert!(sink.documents().is_empty());
}

#[test]
fn export_pipeline_tests_failure_clears_processing_and_saves_nothing() {
    let mut state = common::loaded_state();
    let sink = common::FailingSink;

    let error = export_poster(&mut state, &sink, 1).expect_err("sink failure should surface");
    assert!(matches!(error, AppError::Document(_)));
    assert_eq!(user_facing_message(&error), EXPORT_FAILURE_MESSAGE);
    assert!(!state.is_processing());
    assert!(state.can_export());
}

#[test]
fn export_pipeline_tests_large_tiles_are_captured_at_bounded_resolution() {
    let image = SyntheticImageLoader::new(4000, 1000)
        .load()
        .expect("synthetic image should load");
    let document = render_document(
        &image,
        GridSpec::new(1, 1).unwrap(),
        PageFormat::A3,
        Orientation::Portrait,
    )
    .expect("render should succeed");

    let tile = document.pages()[0].image.as_ref().expect("tile placed");
    assert_eq!((tile.width, tile.height), (2000, 500));
}
