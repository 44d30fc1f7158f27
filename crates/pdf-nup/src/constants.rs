//! Shared constants for page composition
//!
//! This module centralizes the sheet geometry, render scales and drawing
//! defaults used throughout assembly.

// =============================================================================
// Output Sheet
// =============================================================================

/// A4 width in points (210mm at 72 points per inch)
pub const SHEET_WIDTH_PT: f32 = 595.28;

/// A4 height in points (297mm)
pub const SHEET_HEIGHT_PT: f32 = 841.89;

/// Uniform outer margin around the cell grid (points)
pub const SHEET_MARGIN_PT: f32 = 20.0;

/// Space kept free between an image and its cell edge, split over both sides (points)
pub const CELL_INNER_PAD_PT: f32 = 10.0;

// =============================================================================
// Render Scales
// =============================================================================

/// Scale for interactive previews (thumbnails)
pub const PREVIEW_SCALE: f32 = 0.5;

/// Scale for the final print output
pub const PRODUCTION_SCALE: f32 = 1.5;

// =============================================================================
// Borders
// =============================================================================

/// Gray level of cell borders (0 = black, 1 = white)
pub const BORDER_GRAY: f32 = 0.8;

/// Line width for cell borders (points)
pub const BORDER_WIDTH: f32 = 1.0;

// =============================================================================
// Sheet Numbers
// =============================================================================

/// Font size for sheet numbers (points)
pub const PAGE_NUMBER_FONT_SIZE: f32 = 8.0;

/// Baseline offset of the sheet number from the bottom edge (points)
pub const PAGE_NUMBER_OFFSET: f32 = 8.0;

/// Approximate character width ratio for Helvetica
pub const HELVETICA_CHAR_WIDTH_RATIO: f32 = 0.5;

// =============================================================================
// Image Encoding
// =============================================================================

/// JPEG quality for opaque page rasters
pub const JPEG_QUALITY: u8 = 85;

/// Largest N-up count with a defined grid shape
pub const MAX_N_UP: u8 = 8;
