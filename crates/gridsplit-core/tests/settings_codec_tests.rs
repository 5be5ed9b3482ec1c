//! Tests layout settings defaults and JSON codec validation.

use gridsplit_core::{GridSpec, LayoutSettings, Orientation, PageFormat, RenderConfig};

#[test]
fn settings_codec_tests_defaults_match_fresh_session() {
    let settings = LayoutSettings::default();
    assert_eq!(settings.grid, GridSpec::new(2, 2).unwrap());
    assert_eq!(settings.page_format, PageFormat::A4);
    assert_eq!(settings.orientation, Orientation::Portrait);
    assert!(settings.maintain_aspect_ratio);

    let config = RenderConfig::new();
    assert!(config.image.is_none());
    assert_eq!(config.image_dimensions(), None);
}

#[test]
fn settings_codec_tests_preserve_fields_through_json() {
    let settings = LayoutSettings {
        grid: GridSpec::new(5, 3).unwrap(),
        page_format: PageFormat::Letter,
        orientation: Orientation::Landscape,
        maintain_aspect_ratio: false,
    };

    let encoded = settings.to_json_bytes().expect("encoding should succeed");
    let decoded = LayoutSettings::from_json_bytes(&encoded).expect("decoding should succeed");
    assert_eq!(decoded, settings);
}

#[test]
fn settings_codec_tests_reject_zero_grid_dimension() {
    let raw = br#"{
        "grid": { "rows": 0, "columns": 2 },
        "page_format": "A4",
        "orientation": "Portrait",
        "maintain_aspect_ratio": true
    }"#;

    assert!(LayoutSettings::from_json_bytes(raw).is_err());
}

#[test]
fn settings_codec_tests_reject_unknown_fields() {
    let raw = br#"{
        "grid": { "rows": 2, "columns": 2 },
        "page_format": "A4",
        "orientation": "Portrait",
        "maintain_aspect_ratio": true,
        "bleed_mm": 3
    }"#;

    assert!(LayoutSettings::from_json_bytes(raw).is_err());
}
