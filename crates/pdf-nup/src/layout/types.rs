//! Layout data types for N-up composition
//!
//! These types represent the intermediate layout calculations between
//! chunking the page sequence and issuing draw commands.

use crate::constants::{CELL_INNER_PAD_PT, SHEET_HEIGHT_PT, SHEET_MARGIN_PT, SHEET_WIDTH_PT};
use crate::types::{PageId, Rotation};

/// Columns and rows of the cell grid on one sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridShape {
    pub cols: usize,
    pub rows: usize,
}

impl GridShape {
    pub fn new(cols: usize, rows: usize) -> Self {
        Self { cols, rows }
    }

    /// Total number of cells in the grid
    pub fn cell_count(&self) -> usize {
        self.cols * self.rows
    }

    /// Position of the i-th cell, filled left to right then top to bottom
    pub fn position(&self, index: usize) -> GridPosition {
        GridPosition::new(index / self.cols, index % self.cols)
    }
}

/// Position within the grid (row, column)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridPosition {
    /// Row index (0 = top row)
    pub row: usize,
    /// Column index (0 = leftmost column)
    pub col: usize,
}

impl GridPosition {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Physical sheet dimensions in points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SheetGeometry {
    pub width: f32,
    pub height: f32,
    /// Uniform outer margin
    pub margin: f32,
    /// Space reserved between an image and its cell edges
    pub inner_pad: f32,
}

impl Default for SheetGeometry {
    fn default() -> Self {
        Self::a4()
    }
}

impl SheetGeometry {
    pub fn a4() -> Self {
        Self {
            width: SHEET_WIDTH_PT,
            height: SHEET_HEIGHT_PT,
            margin: SHEET_MARGIN_PT,
            inner_pad: CELL_INNER_PAD_PT,
        }
    }

    /// Width of one cell for the given grid
    pub fn cell_width(&self, shape: GridShape) -> f32 {
        (self.width - 2.0 * self.margin) / shape.cols as f32
    }

    /// Height of one cell for the given grid
    pub fn cell_height(&self, shape: GridShape) -> f32 {
        (self.height - 2.0 * self.margin) / shape.rows as f32
    }
}

/// A rectangular area in points
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// X position (left edge)
    pub x: f32,
    /// Y position (bottom edge)
    pub y: f32,
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge x coordinate
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Top edge y coordinate
    pub fn top(&self) -> f32 {
        self.y + self.height
    }

    /// Center x coordinate
    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    /// Center y coordinate
    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }

    /// Whether `other` lies inside this rect, with a small tolerance
    pub fn contains(&self, other: &Rect) -> bool {
        const EPS: f32 = 1e-3;
        other.x >= self.x - EPS
            && other.y >= self.y - EPS
            && other.right() <= self.right() + EPS
            && other.top() <= self.top() + EPS
    }
}

/// Where an image lands inside a cell
///
/// `rect` is the visible footprint after rotation. The unrotated image is
/// drawn centered on it and turned about its center at draw time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImagePlacement {
    pub rect: Rect,
    pub rotation: Rotation,
    /// Points per raster pixel
    pub scale: f32,
}

impl ImagePlacement {
    /// Size of the image before rotation is applied
    pub fn unrotated_size(&self) -> (f32, f32) {
        if self.rotation.swaps_axes() {
            (self.rect.height, self.rect.width)
        } else {
            (self.rect.width, self.rect.height)
        }
    }
}

/// A page assigned to a cell of a sheet
#[derive(Debug, Clone, PartialEq)]
pub struct CellAssignment {
    /// Descriptor placed in this cell
    pub page: PageId,
    /// Index within the sheet (0..n_up)
    pub cell_index: usize,
    pub position: GridPosition,
    /// Full cell bounds, used for borders
    pub bounds: Rect,
}

/// One physical output sheet
#[derive(Debug, Clone, PartialEq)]
pub struct SheetPlan {
    /// 0-based sheet number
    pub index: usize,
    pub shape: GridShape,
    /// Occupied cells only, in sequence order
    pub cells: Vec<CellAssignment>,
}

impl SheetPlan {
    /// Cells of the grid left without a page
    pub fn empty_cells(&self, n_up: usize) -> usize {
        n_up.saturating_sub(self.cells.len())
    }
}
