#![warn(missing_docs)]
//! # gridsplit-document
//!
//! ## Purpose
//! Assembles encoded tiles into a multi-page poster document and hands the
//! finished bytes to a save step.
//!
//! ## Responsibilities
//! - Model the output document: first page pre-created, later pages appended
//!   explicitly before each tile is drawn.
//! - Serialize pages as PDF with one full-bleed JPEG image per page.
//! - Generate unique output file names.
//! - Persist documents through an injectable [`DocumentSink`].
//!
//! ## Data flow
//! [`gridsplit_raster::EncodedTile`] -> [`PosterDocument::place_full_bleed`]
//! -> [`PosterDocument::to_pdf_bytes`] -> [`DocumentSink::save`] ->
//! [`SavedDocument`].
//!
//! ## Ownership and lifetimes
//! The document owns every encoded tile until serialization; sinks receive a
//! borrowed byte slice and report an owned summary.
//!
//! ## Error model
//! Misplaced tiles, incomplete documents and save failures surface as
//! [`DocumentError`]. The directory sink never leaves a partial file behind.

mod pdf;
mod sink;

use gridsplit_core::{Orientation, PageDimensions, PageFormat};
use gridsplit_raster::EncodedTile;
use thiserror::Error;

pub use sink::{DirectorySink, DocumentSink, MemorySink, SavedDocument, sha256_hex};

/// Prefix of every generated output file name.
pub const FILE_NAME_PREFIX: &str = "gridsplit";

/// One page of the output document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentPage {
    /// Tile drawn on this page, filling the whole page area.
    pub image: Option<EncodedTile>,
}

/// Descriptive metadata written into the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentMetadata {
    /// Document title.
    pub title: String,
    /// Producing application.
    pub producer: String,
}

/// Ordered pages of uniform size, each holding one full-bleed image.
#[derive(Debug, Clone, PartialEq)]
pub struct PosterDocument {
    page: PageDimensions,
    pages: Vec<DocumentPage>,
    appended_pages: usize,
}

impl PosterDocument {
    /// Creates a document with its first blank page already in place.
    pub fn new(page: PageDimensions) -> Self {
        Self {
            page,
            pages: vec![DocumentPage::default()],
            appended_pages: 0,
        }
    }

    /// Appends a blank page, which becomes the current page.
    pub fn add_page(&mut self) {
        self.pages.push(DocumentPage::default());
        self.appended_pages += 1;
    }

    /// Places `tile` on the current page at full bleed.
    ///
    /// # Errors
    /// Returns [`DocumentError::PageOccupied`] when the current page already
    /// holds an image.
    pub fn place_full_bleed(&mut self, tile: EncodedTile) -> Result<(), DocumentError> {
        let index = self.pages.len() - 1;
        let current = &mut self.pages[index];
        if current.image.is_some() {
            return Err(DocumentError::PageOccupied { index });
        }
        current.image = Some(tile);
        Ok(())
    }

    /// Page size shared by every page.
    pub fn page_dimensions(&self) -> PageDimensions {
        self.page
    }

    /// Total number of pages.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Pages added through [`Self::add_page`] (all but the first).
    pub fn appended_pages(&self) -> usize {
        self.appended_pages
    }

    /// Pages in output order.
    pub fn pages(&self) -> &[DocumentPage] {
        &self.pages
    }

    /// Serializes the document as PDF.
    ///
    /// # Errors
    /// Returns [`DocumentError::EmptyPage`] when any page has no image.
    pub fn to_pdf_bytes(&self, metadata: &DocumentMetadata) -> Result<Vec<u8>, DocumentError> {
        let mut tiles = Vec::with_capacity(self.pages.len());
        for (index, page) in self.pages.iter().enumerate() {
            tiles.push(
                page.image
                    .as_ref()
                    .ok_or(DocumentError::EmptyPage { index })?,
            );
        }

        Ok(pdf::write_pdf(self.page, &tiles, metadata))
    }
}

/// Builds `gridsplit-<format>-<orientation>-<timestamp_ms>.pdf`.
pub fn output_file_name(
    page_format: PageFormat,
    orientation: Orientation,
    timestamp_ms: i128,
) -> String {
    format!("{FILE_NAME_PREFIX}-{page_format}-{orientation}-{timestamp_ms}.pdf")
}

/// Current UTC time in Unix epoch milliseconds.
pub fn current_timestamp_ms() -> i128 {
    time::OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000
}

/// Error type for document assembly and persistence.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// A second image was placed on the same page.
    #[error("page {index} already holds an image")]
    PageOccupied {
        /// Zero-based page index.
        index: usize,
    },
    /// A page was left without an image.
    #[error("page {index} has no image")]
    EmptyPage {
        /// Zero-based page index.
        index: usize,
    },
    /// Filesystem failure while saving.
    #[error("failed to save '{}': {source}", path.display())]
    Io {
        /// Path being written.
        path: std::path::PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },
    /// Sink-specific failure.
    #[error("document sink failure: {0}")]
    Sink(String),
}
