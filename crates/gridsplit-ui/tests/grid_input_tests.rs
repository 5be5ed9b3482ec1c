//! Tests free-form grid field parsing.

use gridsplit_core::MAX_GRID_DIMENSION;
use gridsplit_ui::parse_grid_input;

#[test]
fn grid_input_tests_takes_leading_integer() {
    assert_eq!(parse_grid_input("7abc"), 7);
    assert_eq!(parse_grid_input("2.5"), 2);
    assert_eq!(parse_grid_input("  4 columns"), 4);
    assert_eq!(parse_grid_input("+3"), 3);
}

#[test]
fn grid_input_tests_falls_back_to_one() {
    assert_eq!(parse_grid_input("abc7"), 1);
    assert_eq!(parse_grid_input(".5"), 1);
    assert_eq!(parse_grid_input("-7"), 1);
    assert_eq!(parse_grid_input("0"), 1);
    assert_eq!(parse_grid_input(""), 1);
}

#[test]
fn grid_input_tests_clamps_large_values() {
    assert_eq!(parse_grid_input("21"), MAX_GRID_DIMENSION);
    assert_eq!(parse_grid_input("4294967296"), MAX_GRID_DIMENSION);
}
