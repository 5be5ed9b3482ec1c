//! Tests the page geometry table and orientation swap.

use gridsplit_core::{Orientation, PageFormat};

#[test]
fn page_geometry_tests_match_portrait_base_table() {
    let a4 = PageFormat::A4.portrait_dimensions();
    assert_eq!((a4.width_mm, a4.height_mm), (210.0, 297.0));

    let a3 = PageFormat::A3.portrait_dimensions();
    assert_eq!((a3.width_mm, a3.height_mm), (297.0, 420.0));

    let letter = PageFormat::Letter.portrait_dimensions();
    assert_eq!((letter.width_mm, letter.height_mm), (215.9, 279.4));
}

#[test]
fn page_geometry_tests_landscape_swaps_axes() {
    for format in PageFormat::ALL {
        let portrait = format.dimensions(Orientation::Portrait);
        let landscape = format.dimensions(Orientation::Landscape);
        assert_eq!(portrait.width_mm, landscape.height_mm);
        assert_eq!(portrait.height_mm, landscape.width_mm);
        assert!(landscape.aspect_ratio() > 1.0);
    }
}
