//! Grid layout calculation
//!
//! This module maps an N-up count to a cell grid, splits the page sequence
//! into sheets and computes where each cell sits on the sheet.

use crate::options::NUp;
use crate::types::PageId;

use super::{CellAssignment, GridShape, Rect, SheetGeometry, SheetPlan};

// =============================================================================
// Grid Shapes
// =============================================================================

/// Grid used for a given number of pages per sheet.
///
/// Counts that do not fill their grid (3, 5, 7) leave the trailing cells of
/// every sheet empty.
pub fn grid_shape(n_up: NUp) -> GridShape {
    match n_up.get() {
        1 => GridShape::new(1, 1),
        2 => GridShape::new(1, 2),
        3 => GridShape::new(1, 3),
        4 => GridShape::new(2, 2),
        5 | 6 => GridShape::new(2, 3),
        _ => GridShape::new(2, 4),
    }
}

// =============================================================================
// Chunking
// =============================================================================

/// Split the page sequence into consecutive sheet-sized chunks.
///
/// Every chunk has exactly `n_up` items except possibly the last.
pub fn chunk_pages<T>(pages: &[T], n_up: NUp) -> std::slice::Chunks<'_, T> {
    pages.chunks(n_up.get())
}

/// Number of sheets needed for `page_count` pages
pub fn sheet_count(page_count: usize, n_up: NUp) -> usize {
    page_count.div_ceil(n_up.get())
}

// =============================================================================
// Cell Calculations
// =============================================================================

/// Bounds of the i-th cell on a sheet.
///
/// Row 0 is at the top of the sheet, so y is measured down from the top
/// margin.
pub fn cell_bounds(geometry: &SheetGeometry, shape: GridShape, index: usize) -> Rect {
    let pos = shape.position(index);
    let cell_width = geometry.cell_width(shape);
    let cell_height = geometry.cell_height(shape);

    let x = geometry.margin + pos.col as f32 * cell_width;
    let y = geometry.height - geometry.margin - (pos.row + 1) as f32 * cell_height;

    Rect::new(x, y, cell_width, cell_height)
}

/// Lay out the page sequence onto sheets
pub fn plan_sheets(pages: &[PageId], n_up: NUp, geometry: &SheetGeometry) -> Vec<SheetPlan> {
    let shape = grid_shape(n_up);

    chunk_pages(pages, n_up)
        .enumerate()
        .map(|(index, chunk)| SheetPlan {
            index,
            shape,
            cells: chunk
                .iter()
                .enumerate()
                .map(|(cell_index, &page)| CellAssignment {
                    page,
                    cell_index,
                    position: shape.position(cell_index),
                    bounds: cell_bounds(geometry, shape, cell_index),
                })
                .collect(),
        })
        .collect()
}
