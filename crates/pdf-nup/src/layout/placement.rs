//! Image placement within cells
//!
//! Fits a rendered page into its cell, accounting for:
//! - The inner pad kept free around the image
//! - Quarter-turn rotation, which swaps the footprint's width and height
//! - Aspect-preserving scaling and centering

use crate::types::Rotation;

use super::{ImagePlacement, Rect};

/// Calculate where an image of `raster_width` x `raster_height` pixels lands
/// inside `cell`.
///
/// The image keeps its aspect ratio, is scaled to fit the cell minus
/// `inner_pad` on each axis, and is centered on the cell. The returned rect
/// is the footprint after rotation.
///
/// # Arguments
/// * `cell` - The cell bounds
/// * `raster_width` - Width of the rendered page in pixels
/// * `raster_height` - Height of the rendered page in pixels
/// * `rotation` - Rotation applied at draw time
/// * `inner_pad` - Total space reserved on each axis (points)
pub fn place_image(
    cell: &Rect,
    raster_width: u32,
    raster_height: u32,
    rotation: Rotation,
    inner_pad: f32,
) -> ImagePlacement {
    let (effective_width, effective_height) = if rotation.swaps_axes() {
        (raster_height as f32, raster_width as f32)
    } else {
        (raster_width as f32, raster_height as f32)
    };

    let available_width = (cell.width - inner_pad).max(0.0);
    let available_height = (cell.height - inner_pad).max(0.0);

    let scale = if effective_width > 0.0 && effective_height > 0.0 {
        (available_width / effective_width).min(available_height / effective_height)
    } else {
        0.0
    };

    let draw_width = effective_width * scale;
    let draw_height = effective_height * scale;

    ImagePlacement {
        rect: Rect::new(
            cell.center_x() - draw_width / 2.0,
            cell.center_y() - draw_height / 2.0,
            draw_width,
            draw_height,
        ),
        rotation,
        scale,
    }
}
