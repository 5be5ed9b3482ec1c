//! PDF serialization: one DCT image XObject drawn full-bleed per page.

use gridsplit_core::PageDimensions;
use gridsplit_raster::EncodedTile;
use pdf_writer::{Content, Filter, Name, Pdf, Rect, Ref, TextStr};

use crate::DocumentMetadata;

/// Resource name of the tile image on every page.
const TILE_XOBJECT: Name<'static> = Name(b"Tile");

/// zlib level used for page content streams.
const CONTENT_COMPRESSION_LEVEL: u8 = 6;

pub(crate) fn write_pdf(
    page: PageDimensions,
    tiles: &[&EncodedTile],
    metadata: &DocumentMetadata,
) -> Vec<u8> {
    let mut pdf = Pdf::new();
    let mut next_id = 1i32;
    let mut alloc = || {
        let id = Ref::new(next_id);
        next_id += 1;
        id
    };

    let catalog_id = alloc();
    let pages_id = alloc();
    let info_id = alloc();

    // Per page: page object, content stream, image XObject.
    let page_refs: Vec<(Ref, Ref, Ref)> = tiles
        .iter()
        .map(|_| (alloc(), alloc(), alloc()))
        .collect();

    let width = page.width_pt() as f32;
    let height = page.height_pt() as f32;

    pdf.catalog(catalog_id).pages(pages_id);
    pdf.pages(pages_id)
        .kids(page_refs.iter().map(|(page_id, _, _)| *page_id))
        .count(tiles.len() as i32);
    pdf.document_info(info_id)
        .title(TextStr(&metadata.title))
        .producer(TextStr(&metadata.producer));

    for (tile, (page_id, content_id, image_id)) in tiles.iter().zip(&page_refs) {
        {
            let mut image = pdf.image_xobject(*image_id, &tile.jpeg);
            image.filter(Filter::DctDecode);
            image.width(tile.width as i32);
            image.height(tile.height as i32);
            image.color_space().device_rgb();
            image.bits_per_component(8);
        }

        let mut content = Content::new();
        content.save_state();
        content.transform([width, 0.0, 0.0, height, 0.0, 0.0]);
        content.x_object(TILE_XOBJECT);
        content.restore_state();
        let raw = content.finish();
        let compressed =
            miniz_oxide::deflate::compress_to_vec_zlib(raw.as_slice(), CONTENT_COMPRESSION_LEVEL);
        pdf.stream(*content_id, &compressed)
            .filter(Filter::FlateDecode);

        let mut page_writer = pdf.page(*page_id);
        page_writer
            .media_box(Rect::new(0.0, 0.0, width, height))
            .parent(pages_id)
            .contents(*content_id);
        page_writer
            .resources()
            .x_objects()
            .pair(TILE_XOBJECT, *image_id);
    }

    pdf.finish()
}
