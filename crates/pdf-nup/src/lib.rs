pub mod assemble;
mod constants;
pub mod filter;
pub mod layout;
mod options;
mod preview;
mod raster;
pub mod render;
mod session;
mod stats;
mod types;
pub mod writer;

pub use assemble::{
    Assembler, AssemblyState, LoadedPdf, assemble, assemble_with, load_multiple_pdfs, load_pdf,
    save_pdf,
};
pub use constants::*;
pub use options::*;
pub use preview::render_preview;
pub use raster::{PixelFormat, Raster};
pub use render::{PageRasterizer, RendererAdapter};
#[cfg(feature = "pdfium")]
pub use render::PdfiumRasterizer;
pub use session::{DescriptorDefaults, PageSession};
pub use stats::calculate_statistics;
pub use types::*;
pub use writer::{DocumentWriter, ImageHandle, LopdfWriter, StrokeStyle};
