//! Rendering of a single output sheet

use log::debug;

use crate::constants::{
    HELVETICA_CHAR_WIDTH_RATIO, PAGE_NUMBER_FONT_SIZE, PAGE_NUMBER_OFFSET, PRODUCTION_SCALE,
};
use crate::filter;
use crate::layout::{CellAssignment, SheetGeometry, SheetPlan, place_image};
use crate::options::LayoutSettings;
use crate::render::{PageRasterizer, RendererAdapter};
use crate::types::*;
use crate::writer::{DocumentWriter, StrokeStyle};

use super::AssemblyState;

/// Everything a sheet needs besides its own plan
pub(super) struct SheetContext<'a, R: PageRasterizer + ?Sized, W: DocumentWriter + ?Sized> {
    pub adapter: RendererAdapter<'a, R>,
    pub writer: &'a mut W,
    pub layout: &'a LayoutSettings,
    pub geometry: &'a SheetGeometry,
}

impl<R: PageRasterizer + ?Sized, W: DocumentWriter + ?Sized> SheetContext<'_, R, W> {
    /// Create the output page for `plan` and draw every occupied cell.
    ///
    /// `pages` holds the descriptors of this sheet in cell order. `progress`
    /// is told about each cell before it is rendered.
    pub fn render_sheet(
        &mut self,
        plan: &SheetPlan,
        pages: &[PageDescriptor],
        progress: &mut dyn FnMut(AssemblyState),
    ) -> Result<()> {
        self.writer
            .create_page(self.geometry.width, self.geometry.height)?;

        for (cell, page) in plan.cells.iter().zip(pages) {
            progress(AssemblyState::Rendering {
                sheet: plan.index,
                cell: cell.cell_index,
            });
            self.render_cell(cell, page)
                .map_err(|e| e.for_page(page.id))?;
        }

        if self.layout.show_page_numbers {
            self.draw_sheet_number(plan.index + 1)?;
        }

        Ok(())
    }

    fn render_cell(&mut self, cell: &CellAssignment, page: &PageDescriptor) -> Result<()> {
        let raster = self.adapter.rasterize_page(page, PRODUCTION_SCALE)?;
        let filtered = filter::apply(&raster, &page.filters);

        let placement = place_image(
            &cell.bounds,
            filtered.width(),
            filtered.height(),
            page.rotation,
            self.geometry.inner_pad,
        );
        debug!(
            "Page {} -> cell {} at ({:.1}, {:.1}) {:.1}x{:.1}, {} deg",
            page.id,
            cell.cell_index,
            placement.rect.x,
            placement.rect.y,
            placement.rect.width,
            placement.rect.height,
            page.rotation.degrees()
        );

        let image = self.writer.embed_raster(&filtered)?;
        self.writer
            .draw_image(image, &placement.rect, placement.rotation)?;

        // Overlay shares the base image's footprint and is never filtered
        if let Some(overlay) = &page.overlay {
            let overlay_image = self.writer.embed_raster(overlay)?;
            self.writer
                .draw_image(overlay_image, &placement.rect, placement.rotation)?;
        }

        if self.layout.show_borders {
            self.writer
                .draw_rectangle(&cell.bounds, StrokeStyle::border())?;
        }

        Ok(())
    }

    /// Sheet number centered in the bottom margin
    fn draw_sheet_number(&mut self, number: usize) -> Result<()> {
        let text = number.to_string();
        let text_width = text.len() as f32 * PAGE_NUMBER_FONT_SIZE * HELVETICA_CHAR_WIDTH_RATIO;
        let x = self.geometry.width / 2.0 - text_width / 2.0;
        self.writer
            .draw_text(&text, x, PAGE_NUMBER_OFFSET, PAGE_NUMBER_FONT_SIZE)
    }
}
