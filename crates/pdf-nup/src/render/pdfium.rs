use std::path::PathBuf;

use log::debug;
use pdfium_render::prelude::*;

use super::PageRasterizer;
use crate::raster::{PixelFormat, Raster};
use crate::types::*;

/// Rasterizer backed by the PDFium library.
///
/// The library is bound for each call, so one value can be shared freely
/// across worker threads.
#[derive(Debug, Clone, Default)]
pub struct PdfiumRasterizer {
    library_dir: Option<PathBuf>,
}

impl PdfiumRasterizer {
    /// Bind from the system library search path
    pub fn new() -> Self {
        Self::default()
    }

    /// Try `dir` first, then fall back to the system library
    pub fn with_library_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            library_dir: Some(dir.into()),
        }
    }

    fn bind(&self) -> std::result::Result<Pdfium, PdfiumError> {
        if let Some(dir) = &self.library_dir {
            match Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(dir)) {
                Ok(binding) => return Ok(Pdfium::new(binding)),
                Err(e) => debug!(
                    "No PDFium in {}: {}, trying system library",
                    dir.display(),
                    e
                ),
            }
        }

        Pdfium::bind_to_system_library().map(Pdfium::new)
    }
}

impl PageRasterizer for PdfiumRasterizer {
    fn rasterize(&self, pdf_bytes: &[u8], page_index: usize, scale: f32) -> Result<Raster> {
        let index = u16::try_from(page_index).map_err(|_| {
            NupError::RenderFailure(format!("Page index {} is too large", page_index))
        })?;

        let pdfium = self.bind().map_err(render_failure)?;
        let document = pdfium
            .load_pdf_from_byte_slice(pdf_bytes, None)
            .map_err(render_failure)?;
        let page = document.pages().get(index).map_err(render_failure)?;

        let config = PdfRenderConfig::new().scale_page_by_factor(scale);
        let bitmap = page.render_with_config(&config).map_err(render_failure)?;

        let width = bitmap.width() as u32;
        let height = bitmap.height() as u32;
        let rgba = bitmap.as_rgba_bytes().to_vec();

        Raster::new(width, height, PixelFormat::Rgba, rgba)
    }
}

fn render_failure(err: PdfiumError) -> NupError {
    NupError::RenderFailure(err.to_string())
}
