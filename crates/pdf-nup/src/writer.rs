//! Output document writer
//!
//! The assembler speaks to the output through [`DocumentWriter`], a small
//! page-oriented drawing interface. [`LopdfWriter`] builds the PDF with lopdf.

use std::io::Cursor;

use image::ExtendedColorType;
use image::codecs::jpeg::JpegEncoder;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

use crate::constants::{BORDER_GRAY, BORDER_WIDTH, JPEG_QUALITY};
use crate::layout::Rect;
use crate::raster::Raster;
use crate::types::*;

/// Reference to an image embedded in the output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageHandle(pub usize);

/// Outline style for rectangles
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    /// 0 = black, 1 = white
    pub gray: f32,
    pub width: f32,
}

impl StrokeStyle {
    /// Light-gray hairline used for cell borders
    pub fn border() -> Self {
        Self {
            gray: BORDER_GRAY,
            width: BORDER_WIDTH,
        }
    }
}

/// Page-oriented drawing target.
///
/// Coordinates are points with the origin at the bottom-left of the page.
/// Drawing calls apply to the most recently created page.
pub trait DocumentWriter {
    fn create_page(&mut self, width: f32, height: f32) -> Result<()>;

    fn embed_raster(&mut self, raster: &Raster) -> Result<ImageHandle>;

    /// Draw an image so that, after turning it clockwise by `rotation` about
    /// its center, it covers `rect` exactly
    fn draw_image(&mut self, image: ImageHandle, rect: &Rect, rotation: Rotation) -> Result<()>;

    fn draw_rectangle(&mut self, rect: &Rect, stroke: StrokeStyle) -> Result<()>;

    fn draw_text(&mut self, text: &str, x: f32, y: f32, size: f32) -> Result<()>;

    /// Serialize the document. The writer cannot be used afterwards.
    fn finalize(&mut self) -> Result<Vec<u8>>;
}

// =============================================================================
// lopdf Writer
// =============================================================================

/// Page under construction
struct PageBuilder {
    width: f32,
    height: f32,
    ops: String,
    xobjects: Dictionary,
    uses_font: bool,
}

/// [`DocumentWriter`] producing a PDF 1.7 document with lopdf
pub struct LopdfWriter {
    doc: Document,
    pages_id: ObjectId,
    page_refs: Vec<Object>,
    current: Option<PageBuilder>,
    images: Vec<ObjectId>,
    font_id: Option<ObjectId>,
    finalized: bool,
}

impl Default for LopdfWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl LopdfWriter {
    pub fn new() -> Self {
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();
        Self {
            doc,
            pages_id,
            page_refs: Vec::new(),
            current: None,
            images: Vec::new(),
            font_id: None,
            finalized: false,
        }
    }

    fn ensure_open(&self) -> Result<()> {
        if self.finalized {
            Err(NupError::WriterFailure("Document already finalized".into()))
        } else {
            Ok(())
        }
    }

    fn page_mut(&mut self) -> Result<&mut PageBuilder> {
        self.ensure_open()?;
        self.current
            .as_mut()
            .ok_or_else(|| NupError::WriterFailure("No page has been created".into()))
    }

    /// Write the page under construction into the document
    fn flush_page(&mut self) {
        let Some(page) = self.current.take() else {
            return;
        };

        let mut resources = Dictionary::new();
        resources.set("XObject", Object::Dictionary(page.xobjects));
        if page.uses_font {
            if let Some(font_id) = self.font_id {
                let mut fonts = Dictionary::new();
                fonts.set("F1", Object::Reference(font_id));
                resources.set("Font", Object::Dictionary(fonts));
            }
        }

        let content_id = self
            .doc
            .add_object(Stream::new(Dictionary::new(), page.ops.into_bytes()));

        let page_dict = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(self.pages_id)),
            (
                "MediaBox",
                Object::Array(vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Real(page.width),
                    Object::Real(page.height),
                ]),
            ),
            ("Contents", Object::Reference(content_id)),
            ("Resources", Object::Dictionary(resources)),
        ]);
        let page_id = self.doc.add_object(page_dict);
        self.page_refs.push(Object::Reference(page_id));
    }

    fn font(&mut self) -> ObjectId {
        if let Some(id) = self.font_id {
            return id;
        }
        let font = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Font".to_vec())),
            ("Subtype", Object::Name(b"Type1".to_vec())),
            ("BaseFont", Object::Name(b"Helvetica".to_vec())),
        ]);
        let id = self.doc.add_object(font);
        self.font_id = Some(id);
        id
    }
}

impl DocumentWriter for LopdfWriter {
    fn create_page(&mut self, width: f32, height: f32) -> Result<()> {
        self.ensure_open()?;
        self.flush_page();
        self.current = Some(PageBuilder {
            width,
            height,
            ops: String::new(),
            xobjects: Dictionary::new(),
            uses_font: false,
        });
        Ok(())
    }

    fn embed_raster(&mut self, raster: &Raster) -> Result<ImageHandle> {
        self.ensure_open()?;
        let id = if raster.has_transparency() {
            embed_with_soft_mask(&mut self.doc, raster)
        } else {
            embed_jpeg(&mut self.doc, raster)?
        };
        self.images.push(id);
        Ok(ImageHandle(self.images.len() - 1))
    }

    fn draw_image(&mut self, image: ImageHandle, rect: &Rect, rotation: Rotation) -> Result<()> {
        let image_id = *self
            .images
            .get(image.0)
            .ok_or_else(|| NupError::WriterFailure(format!("Unknown image handle {}", image.0)))?;
        let page = self.page_mut()?;

        let name = format!("Im{}", image.0);
        page.xobjects
            .set(name.as_bytes(), Object::Reference(image_id));
        page.ops.push_str(&image_placement_ops(&name, rect, rotation));
        Ok(())
    }

    fn draw_rectangle(&mut self, rect: &Rect, stroke: StrokeStyle) -> Result<()> {
        let page = self.page_mut()?;
        page.ops.push_str(&format!(
            "q {} G {} w {} {} {} {} re S Q\n",
            stroke.gray, stroke.width, rect.x, rect.y, rect.width, rect.height
        ));
        Ok(())
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32, size: f32) -> Result<()> {
        self.page_mut()?;
        self.font();
        let page = self.page_mut()?;
        page.uses_font = true;
        page.ops.push_str(&format!(
            "BT /F1 {} Tf {} {} Td ({}) Tj ET\n",
            size,
            x,
            y,
            escape_text(text)
        ));
        Ok(())
    }

    fn finalize(&mut self) -> Result<Vec<u8>> {
        self.ensure_open()?;
        self.flush_page();
        self.finalized = true;

        let count = self.page_refs.len() as i64;
        let pages_dict = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Kids", Object::Array(std::mem::take(&mut self.page_refs))),
            ("Count", Object::Integer(count)),
        ]);
        self.doc
            .objects
            .insert(self.pages_id, Object::Dictionary(pages_dict));

        let catalog_id = self.doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Catalog".to_vec())),
            ("Pages", Object::Reference(self.pages_id)),
        ]));
        self.doc.trailer.set("Root", catalog_id);

        self.doc.compress();

        let mut bytes = Vec::new();
        self.doc
            .save_to(&mut bytes)
            .map_err(|e| NupError::WriterFailure(e.to_string()))?;
        Ok(bytes)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Content stream ops placing the unit-square image XObject `name`.
///
/// The image is drawn at its unrotated size centered on the origin, turned
/// clockwise, then moved to the center of `rect`.
fn image_placement_ops(name: &str, rect: &Rect, rotation: Rotation) -> String {
    let (width, height) = if rotation.swaps_axes() {
        (rect.height, rect.width)
    } else {
        (rect.width, rect.height)
    };
    let (cos, sin) = rotation.cos_sin();

    format!(
        "q 1 0 0 1 {} {} cm {} {} {} {} 0 0 cm {} 0 0 {} {} {} cm /{} Do Q\n",
        rect.center_x(),
        rect.center_y(),
        cos,
        -sin,
        sin,
        cos,
        width,
        height,
        -width / 2.0,
        -height / 2.0,
        name
    )
}

fn image_dict(raster: &Raster, color_space: &[u8]) -> Dictionary {
    Dictionary::from_iter(vec![
        ("Type", Object::Name(b"XObject".to_vec())),
        ("Subtype", Object::Name(b"Image".to_vec())),
        ("Width", Object::Integer(raster.width() as i64)),
        ("Height", Object::Integer(raster.height() as i64)),
        ("ColorSpace", Object::Name(color_space.to_vec())),
        ("BitsPerComponent", Object::Integer(8)),
    ])
}

/// Embed an opaque raster as a baseline JPEG
fn embed_jpeg(doc: &mut Document, raster: &Raster) -> Result<ObjectId> {
    let (rgb, _) = raster.split_alpha();

    let mut jpeg = Cursor::new(Vec::new());
    JpegEncoder::new_with_quality(&mut jpeg, JPEG_QUALITY)
        .encode(&rgb, raster.width(), raster.height(), ExtendedColorType::Rgb8)
        .map_err(|e| NupError::WriterFailure(format!("JPEG encoding failed: {}", e)))?;

    let mut dict = image_dict(raster, b"DeviceRGB");
    dict.set("Filter", Object::Name(b"DCTDecode".to_vec()));

    let stream = Stream::new(dict, jpeg.into_inner()).with_compression(false);
    Ok(doc.add_object(stream))
}

/// Embed a raster with transparency as raw RGB plus a grayscale soft mask
fn embed_with_soft_mask(doc: &mut Document, raster: &Raster) -> ObjectId {
    let (rgb, alpha) = raster.split_alpha();

    let mut dict = image_dict(raster, b"DeviceRGB");
    if let Some(alpha) = alpha {
        let mask_id = doc.add_object(Stream::new(image_dict(raster, b"DeviceGray"), alpha));
        dict.set("SMask", Object::Reference(mask_id));
    }

    doc.add_object(Stream::new(dict, rgb))
}

/// Escape a string for use inside a PDF literal
fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '(' | ')' | '\\' => {
                escaped.push('\\');
                escaped.push(c);
            }
            _ => escaped.push(c),
        }
    }
    escaped
}
