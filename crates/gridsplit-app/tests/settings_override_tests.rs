//! Integration tests for settings files and command-line overrides.

mod common;

use gridsplit_app::{
    AppError, SettingsOverrides, apply_overrides, load_image, load_settings_file, preview_svg,
};
use gridsplit_core::{GridSpec, LayoutSettings, Orientation, PageFormat};
use gridsplit_decode::BytesImageLoader;
use gridsplit_ui::{ControlState, RowEdit};

#[test]
fn settings_override_tests_rows_ignored_while_locked() {
    let mut state = common::loaded_state();
    let edit = apply_overrides(
        &mut state,
        SettingsOverrides {
            rows: Some(9),
            ..SettingsOverrides::default()
        },
    );
    assert_eq!(edit, Some(RowEdit::IgnoredAspectLocked));
    assert_eq!(state.settings().grid.rows(), 1);
}

#[test]
fn settings_override_tests_unlocked_rows_and_columns_stick() {
    let mut state = common::loaded_state();
    let edit = apply_overrides(
        &mut state,
        SettingsOverrides {
            page_format: Some(PageFormat::Letter),
            orientation: Some(Orientation::Landscape),
            columns: Some(3),
            rows: Some(5),
            maintain_aspect_ratio: Some(false),
        },
    );
    assert_eq!(edit, Some(RowEdit::Applied(5)));
    assert_eq!(state.settings().grid, GridSpec::new(5, 3).unwrap());
    assert_eq!(state.total_sheets(), 15);
}

#[test]
fn settings_override_tests_loads_settings_file() {
    let dir = std::env::temp_dir().join(format!("gridsplit-settings-{}", std::process::id()));
    std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
    let path = dir.join("settings.json");
    let settings = LayoutSettings {
        grid: GridSpec::new(3, 4).unwrap(),
        page_format: PageFormat::A3,
        orientation: Orientation::Landscape,
        maintain_aspect_ratio: false,
    };
    std::fs::write(&path, settings.to_json_bytes().unwrap()).expect("settings should write");

    let loaded = load_settings_file(&path).expect("settings should load");
    assert_eq!(loaded, settings);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn settings_override_tests_missing_settings_file_is_reported() {
    let error = load_settings_file(std::path::Path::new("/nonexistent/gridsplit.json"))
        .expect_err("missing file should fail");
    assert!(matches!(error, AppError::SettingsIo { .. }));
}

#[test]
fn settings_override_tests_failed_decode_keeps_previous_state() {
    let mut state = ControlState::new();
    let error = load_image(&mut state, &BytesImageLoader::new(vec![1, 2, 3]))
        .expect_err("garbage should not decode");
    assert!(matches!(error, AppError::Decode(_)));
    assert!(state.config().image.is_none());
    assert!(preview_svg(&state).is_none());
}

#[test]
fn settings_override_tests_preview_tracks_grid() {
    let mut state = common::loaded_state();
    state.set_orientation(Orientation::Landscape);
    let svg = preview_svg(&state).expect("image is loaded");
    assert_eq!(svg.matches("<line").count(), 2);
    assert!(svg.contains(">PAGE 4</text>"));
}
