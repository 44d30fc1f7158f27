use crate::filter;
use crate::raster::Raster;
use crate::render::{PageRasterizer, RendererAdapter};
use crate::types::*;

/// Render one page as it will print: rasterized at `scale`, then filtered.
///
/// Use [`crate::PREVIEW_SCALE`] for thumbnails. Rotation and overlays are
/// not applied; they are draw-time transforms of the output sheet.
pub fn render_preview<R: PageRasterizer + ?Sized>(
    adapter: &RendererAdapter<'_, R>,
    page: &PageDescriptor,
    scale: f32,
) -> Result<Raster> {
    let raster = adapter.rasterize_page(page, scale)?;
    Ok(filter::apply(&raster, &page.filters))
}
