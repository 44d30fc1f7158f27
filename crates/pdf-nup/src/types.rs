use std::sync::Arc;
use thiserror::Error;

use crate::raster::Raster;

#[derive(Error, Debug)]
pub enum NupError {
    #[error("Source document {0} is not loaded")]
    SourceUnavailable(DocumentId),
    #[error("Page index {page_index} is out of range for document {document} ({page_count} pages)")]
    PageIndexOutOfRange {
        document: DocumentId,
        page_index: usize,
        page_count: usize,
    },
    #[error("Rendering failed: {0}")]
    RenderFailure(String),
    #[error("No pages selected")]
    EmptySelection,
    #[error("Page {0} is not in the session")]
    UnknownPage(PageId),
    #[error("Output writer failed: {0}")]
    WriterFailure(String),
    #[error("Page {page} failed: {source}")]
    Page {
        page: PageId,
        #[source]
        source: Box<NupError>,
    },
    #[error("Invalid raster: expected {expected} bytes, got {actual}")]
    InvalidRaster { expected: usize, actual: usize },
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

impl NupError {
    /// Attach the failing descriptor to a per-page error
    pub fn for_page(self, page: PageId) -> Self {
        match self {
            already @ NupError::Page { .. } => already,
            other => NupError::Page {
                page,
                source: Box::new(other),
            },
        }
    }

    /// The underlying error, with any page wrapper removed
    pub fn root(&self) -> &NupError {
        match self {
            NupError::Page { source, .. } => source.root(),
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, NupError>;

/// Handle to a loaded source document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DocumentId(pub u64);

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Stable identity of a page descriptor, independent of its order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PageId(pub u64);

impl std::fmt::Display for PageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Clockwise rotation applied at draw time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Rotation {
    #[default]
    None,
    Clockwise90,
    Clockwise180,
    Clockwise270,
}

impl Rotation {
    pub fn degrees(self) -> i32 {
        match self {
            Rotation::None => 0,
            Rotation::Clockwise90 => 90,
            Rotation::Clockwise180 => 180,
            Rotation::Clockwise270 => 270,
        }
    }

    /// Parse a multiple of 90 degrees (negative values turn counter-clockwise)
    pub fn from_degrees(degrees: i32) -> Result<Self> {
        match degrees.rem_euclid(360) {
            0 => Ok(Rotation::None),
            90 => Ok(Rotation::Clockwise90),
            180 => Ok(Rotation::Clockwise180),
            270 => Ok(Rotation::Clockwise270),
            _ => Err(NupError::Config(format!(
                "Rotation must be a multiple of 90 degrees, got {}",
                degrees
            ))),
        }
    }

    /// Next quarter turn clockwise (+90 mod 360)
    pub fn rotated_clockwise(self) -> Self {
        match self {
            Rotation::None => Rotation::Clockwise90,
            Rotation::Clockwise90 => Rotation::Clockwise180,
            Rotation::Clockwise180 => Rotation::Clockwise270,
            Rotation::Clockwise270 => Rotation::None,
        }
    }

    /// Whether width and height trade places once rotated
    pub fn swaps_axes(self) -> bool {
        matches!(self, Rotation::Clockwise90 | Rotation::Clockwise270)
    }

    /// Exact (cos, sin) of the clockwise angle
    pub fn cos_sin(self) -> (f32, f32) {
        match self {
            Rotation::None => (1.0, 0.0),
            Rotation::Clockwise90 => (0.0, 1.0),
            Rotation::Clockwise180 => (-1.0, 0.0),
            Rotation::Clockwise270 => (0.0, -1.0),
        }
    }
}

/// Ink-saving tone adjustments for a single page.
///
/// `whiteness` and `blackness` are percentages in `0..=100`. Constructors and
/// setters clamp; the filter pipeline clamps again in case fields were written
/// directly.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FilterParams {
    pub invert: bool,
    pub grayscale: bool,
    /// Brightness boost, 0-100
    pub whiteness: f32,
    /// Contrast boost around mid-gray, 0-100
    pub blackness: f32,
}

impl FilterParams {
    pub fn new(invert: bool, grayscale: bool, whiteness: f32, blackness: f32) -> Self {
        Self {
            invert,
            grayscale,
            whiteness: clamp_percent(whiteness),
            blackness: clamp_percent(blackness),
        }
    }

    pub fn set_whiteness(&mut self, whiteness: f32) {
        self.whiteness = clamp_percent(whiteness);
    }

    pub fn set_blackness(&mut self, blackness: f32) {
        self.blackness = clamp_percent(blackness);
    }

    /// Copy with both percentages forced into range
    pub fn clamped(self) -> Self {
        Self::new(self.invert, self.grayscale, self.whiteness, self.blackness)
    }

    /// True when applying the filters would leave every pixel unchanged
    pub fn is_neutral(&self) -> bool {
        let f = self.clamped();
        !f.invert && !f.grayscale && f.whiteness == 0.0 && f.blackness == 0.0
    }
}

pub(crate) fn clamp_percent(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 100.0)
    }
}

/// A loaded source document. Bytes are shared so snapshots stay cheap.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub id: DocumentId,
    pub name: String,
    pub bytes: Arc<[u8]>,
    pub page_count: usize,
}

impl SourceDocument {
    pub fn new(id: DocumentId, name: impl Into<String>, bytes: Vec<u8>, page_count: usize) -> Self {
        Self {
            id,
            name: name.into(),
            bytes: Arc::from(bytes),
            page_count,
        }
    }
}

/// One logical page as the user arranged it
#[derive(Debug, Clone, PartialEq)]
pub struct PageDescriptor {
    pub id: PageId,
    pub source: DocumentId,
    /// 0-based index in the source document
    pub original_page_index: usize,
    pub is_selected: bool,
    pub filters: FilterParams,
    pub rotation: Rotation,
    /// Transparent annotation layer drawn above the filtered page
    pub overlay: Option<Arc<Raster>>,
}

impl PageDescriptor {
    pub fn new(id: PageId, source: DocumentId, original_page_index: usize) -> Self {
        Self {
            id,
            source,
            original_page_index,
            is_selected: true,
            filters: FilterParams::default(),
            rotation: Rotation::None,
            overlay: None,
        }
    }
}

/// Statistics about an assembly
#[derive(Debug, Clone, PartialEq)]
pub struct AssemblyStatistics {
    /// All enumerated pages, selected or not
    pub total_pages: usize,
    /// Pages that will be printed
    pub selected_pages: usize,
    /// Physical output sheets
    pub output_sheets: usize,
    /// Unused cells on the last sheet
    pub empty_cells: usize,
    /// Paper saved compared to printing every page 1-up
    pub savings_percent: i32,
}
