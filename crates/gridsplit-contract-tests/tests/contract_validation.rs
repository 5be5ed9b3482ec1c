//! Validates settings fixtures and the settings codec against the frozen JSON schema.

use gridsplit_core::{GridSpec, LayoutSettings, Orientation, PageFormat};
use jsonschema::JSONSchema;
use serde_json::Value;

const SCHEMA_PATH: &str = concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../../contracts/layout-settings.schema.json"
);

fn load_json(path: &str) -> Value {
    let raw = std::fs::read_to_string(path).expect("json file should be readable");
    serde_json::from_str(&raw).expect("json file should be valid")
}

fn compile_validator() -> JSONSchema {
    let schema = load_json(SCHEMA_PATH);
    JSONSchema::compile(&schema).expect("schema should compile")
}

#[test]
fn settings_fixture_matches_schema() {
    let validator = compile_validator();
    let fixture = load_json(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/../../contracts/fixtures/layout-settings.valid.json"
    ));
    assert!(
        validator.is_valid(&fixture),
        "settings fixture should validate against schema"
    );
}

#[test]
fn settings_fixture_decodes_through_codec() {
    let raw = std::fs::read(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/../../contracts/fixtures/layout-settings.valid.json"
    ))
    .expect("fixture should be readable");
    let settings = LayoutSettings::from_json_bytes(&raw).expect("fixture should decode");
    assert_eq!(settings.grid, GridSpec::new(3, 4).expect("grid should be valid"));
    assert_eq!(settings.page_format, PageFormat::A3);
    assert_eq!(settings.orientation, Orientation::Landscape);
    assert!(!settings.maintain_aspect_ratio);
}

#[test]
fn invalid_fixture_is_rejected_by_schema_and_codec() {
    let path = concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/../../contracts/fixtures/layout-settings.invalid.json"
    );
    let validator = compile_validator();
    assert!(!validator.is_valid(&load_json(path)));

    let raw = std::fs::read(path).expect("fixture should be readable");
    assert!(LayoutSettings::from_json_bytes(&raw).is_err());
}

#[test]
fn default_settings_serialize_to_schema_shape() {
    let validator = compile_validator();
    let bytes = LayoutSettings::default()
        .to_json_bytes()
        .expect("defaults should serialize");
    let value: Value = serde_json::from_slice(&bytes).expect("output should be json");
    assert!(
        validator.is_valid(&value),
        "serialized defaults should validate against schema"
    );
}
