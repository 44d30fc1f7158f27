//! Page rasterization
//!
//! This module turns (document, page index, scale) into a [`Raster`]:
//! - The [`PageRasterizer`] seam, implemented over PDFium when the `pdfium`
//!   feature is enabled and by fakes in tests
//! - [`RendererAdapter`], which resolves document handles and validates
//!   indices before any rasterizer runs

#[cfg(feature = "pdfium")]
mod pdfium;

#[cfg(feature = "pdfium")]
pub use pdfium::PdfiumRasterizer;

use std::collections::HashMap;

use log::trace;

use crate::raster::Raster;
use crate::types::*;

/// Renders one page of a PDF byte buffer to pixels.
///
/// `scale` is output pixels per PDF point. Implementations must be callable
/// from a blocking worker thread.
pub trait PageRasterizer: Send + Sync {
    fn rasterize(&self, pdf_bytes: &[u8], page_index: usize, scale: f32) -> Result<Raster>;
}

impl<R: PageRasterizer + ?Sized> PageRasterizer for &R {
    fn rasterize(&self, pdf_bytes: &[u8], page_index: usize, scale: f32) -> Result<Raster> {
        (**self).rasterize(pdf_bytes, page_index, scale)
    }
}

impl<R: PageRasterizer + ?Sized> PageRasterizer for Box<R> {
    fn rasterize(&self, pdf_bytes: &[u8], page_index: usize, scale: f32) -> Result<Raster> {
        (**self).rasterize(pdf_bytes, page_index, scale)
    }
}

/// Resolves document handles against a document table and renders pages
pub struct RendererAdapter<'a, R: PageRasterizer + ?Sized> {
    documents: &'a HashMap<DocumentId, SourceDocument>,
    rasterizer: &'a R,
}

impl<'a, R: PageRasterizer + ?Sized> RendererAdapter<'a, R> {
    pub fn new(documents: &'a HashMap<DocumentId, SourceDocument>, rasterizer: &'a R) -> Self {
        Self {
            documents,
            rasterizer,
        }
    }

    /// Render a page of a loaded document
    pub fn rasterize(&self, document: DocumentId, page_index: usize, scale: f32) -> Result<Raster> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(NupError::Config(format!(
                "Render scale must be positive, got {}",
                scale
            )));
        }

        let source = self
            .documents
            .get(&document)
            .ok_or(NupError::SourceUnavailable(document))?;

        if page_index >= source.page_count {
            return Err(NupError::PageIndexOutOfRange {
                document,
                page_index,
                page_count: source.page_count,
            });
        }

        trace!(
            "Rasterizing page {} of {} at scale {}",
            page_index, source.name, scale
        );
        self.rasterizer.rasterize(&source.bytes, page_index, scale)
    }

    /// Render the page a descriptor points at
    pub fn rasterize_page(&self, page: &PageDescriptor, scale: f32) -> Result<Raster> {
        self.rasterize(page.source, page.original_page_index, scale)
    }
}
