//! Layout calculation modules for N-up composition
//!
//! This module handles all the geometric calculations for a sheet:
//! - Grid shape per N-up count and sheet chunking
//! - Cell bounds on the sheet
//! - Image placement (scaling, rotation footprint, centering)

mod grid;
mod placement;
mod types;

pub use grid::*;
pub use placement::*;
pub use types::*;
