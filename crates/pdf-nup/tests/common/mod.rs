#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use lopdf::{Dictionary, Document, Object, Stream};
use pdf_nup::layout::Rect;
use pdf_nup::*;

/// Build a minimal PDF with `num_pages` empty pages and return its bytes
pub fn create_test_pdf(num_pages: usize) -> Vec<u8> {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let mut kids = Vec::new();
    for _ in 0..num_pages {
        let content_id = doc.add_object(Stream::new(Dictionary::new(), b"q Q".to_vec()));
        let page_id = doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            (
                "MediaBox",
                Object::Array(vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(842),
                    Object::Integer(595),
                ]),
            ),
            ("Resources", Object::Dictionary(Dictionary::new())),
            ("Contents", Object::Reference(content_id)),
        ]));
        kids.push(Object::Reference(page_id));
    }

    let pages_dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Kids", Object::Array(kids)),
        ("Count", Object::Integer(num_pages as i64)),
    ]);
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

// =============================================================================
// Fake Rasterizer
// =============================================================================

/// Returns a solid landscape raster for every page, optionally failing on one
pub struct SolidRasterizer {
    pub width: u32,
    pub height: u32,
    pub pixel: [u8; 3],
    pub fail_on_page: Option<usize>,
    pub calls: Mutex<Vec<(usize, f32)>>,
}

impl Default for SolidRasterizer {
    fn default() -> Self {
        Self {
            width: 40,
            height: 30,
            pixel: [200, 200, 200],
            fail_on_page: None,
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl SolidRasterizer {
    pub fn failing_on(page_index: usize) -> Self {
        Self {
            fail_on_page: Some(page_index),
            ..Self::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl PageRasterizer for SolidRasterizer {
    fn rasterize(&self, _pdf_bytes: &[u8], page_index: usize, scale: f32) -> Result<Raster> {
        self.calls.lock().unwrap().push((page_index, scale));
        if self.fail_on_page == Some(page_index) {
            return Err(NupError::RenderFailure("corrupt content stream".into()));
        }
        Raster::filled(self.width, self.height, PixelFormat::Rgb, &self.pixel)
    }
}

// =============================================================================
// Recording Writer
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    CreatePage { width: f32, height: f32 },
    Embed { handle: ImageHandle, first_pixel: Vec<u8> },
    DrawImage { handle: ImageHandle, rect: Rect, rotation: Rotation },
    Rectangle { rect: Rect, stroke: StrokeStyle },
    Text { text: String, x: f32, y: f32 },
    Finalize,
}

/// Writer that records every call instead of producing a document
#[derive(Debug, Default)]
pub struct RecordingWriter {
    pub ops: Vec<Op>,
    embedded: usize,
}

impl RecordingWriter {
    pub fn pages(&self) -> usize {
        self.count(|op| matches!(op, Op::CreatePage { .. }))
    }

    pub fn rectangles(&self) -> usize {
        self.count(|op| matches!(op, Op::Rectangle { .. }))
    }

    pub fn images(&self) -> Vec<(ImageHandle, Rect, Rotation)> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Op::DrawImage {
                    handle,
                    rect,
                    rotation,
                } => Some((*handle, *rect, *rotation)),
                _ => None,
            })
            .collect()
    }

    pub fn finalized(&self) -> bool {
        self.ops.contains(&Op::Finalize)
    }

    fn count(&self, pred: impl Fn(&Op) -> bool) -> usize {
        self.ops.iter().filter(|op| pred(op)).count()
    }
}

impl DocumentWriter for RecordingWriter {
    fn create_page(&mut self, width: f32, height: f32) -> Result<()> {
        self.ops.push(Op::CreatePage { width, height });
        Ok(())
    }

    fn embed_raster(&mut self, raster: &Raster) -> Result<ImageHandle> {
        let handle = ImageHandle(self.embedded);
        self.embedded += 1;
        self.ops.push(Op::Embed {
            handle,
            first_pixel: raster.pixel(0, 0).unwrap_or_default().to_vec(),
        });
        Ok(handle)
    }

    fn draw_image(&mut self, image: ImageHandle, rect: &Rect, rotation: Rotation) -> Result<()> {
        self.ops.push(Op::DrawImage {
            handle: image,
            rect: *rect,
            rotation,
        });
        Ok(())
    }

    fn draw_rectangle(&mut self, rect: &Rect, stroke: StrokeStyle) -> Result<()> {
        self.ops.push(Op::Rectangle {
            rect: *rect,
            stroke,
        });
        Ok(())
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32, _size: f32) -> Result<()> {
        self.ops.push(Op::Text {
            text: text.to_string(),
            x,
            y,
        });
        Ok(())
    }

    fn finalize(&mut self) -> Result<Vec<u8>> {
        self.ops.push(Op::Finalize);
        Ok(b"recorded".to_vec())
    }
}

// =============================================================================
// Failing Writer
// =============================================================================

/// Writer call that [`FailingWriter`] rejects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailAt {
    /// The `n`th `embed_raster` call (0-based)
    Embed(usize),
    Finalize,
}

/// Records like [`RecordingWriter`] but fails one chosen call
#[derive(Debug)]
pub struct FailingWriter {
    pub inner: RecordingWriter,
    fail_at: FailAt,
    embeds: usize,
}

impl FailingWriter {
    pub fn new(fail_at: FailAt) -> Self {
        Self {
            inner: RecordingWriter::default(),
            fail_at,
            embeds: 0,
        }
    }
}

impl DocumentWriter for FailingWriter {
    fn create_page(&mut self, width: f32, height: f32) -> Result<()> {
        self.inner.create_page(width, height)
    }

    fn embed_raster(&mut self, raster: &Raster) -> Result<ImageHandle> {
        let call = self.embeds;
        self.embeds += 1;
        if self.fail_at == FailAt::Embed(call) {
            return Err(NupError::WriterFailure("image stream rejected".into()));
        }
        self.inner.embed_raster(raster)
    }

    fn draw_image(&mut self, image: ImageHandle, rect: &Rect, rotation: Rotation) -> Result<()> {
        self.inner.draw_image(image, rect, rotation)
    }

    fn draw_rectangle(&mut self, rect: &Rect, stroke: StrokeStyle) -> Result<()> {
        self.inner.draw_rectangle(rect, stroke)
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32, size: f32) -> Result<()> {
        self.inner.draw_text(text, x, y, size)
    }

    fn finalize(&mut self) -> Result<Vec<u8>> {
        if self.fail_at == FailAt::Finalize {
            return Err(NupError::WriterFailure("disk full".into()));
        }
        self.inner.finalize()
    }
}

// =============================================================================
// Fixtures
// =============================================================================

/// One document with `count` pages and a descriptor per page
pub fn fixture(count: usize) -> (Vec<PageDescriptor>, HashMap<DocumentId, SourceDocument>) {
    let doc = SourceDocument::new(DocumentId(1), "lecture.pdf", vec![b'%'; 8], count);
    let pages = (0..count)
        .map(|i| PageDescriptor::new(PageId(i as u64 + 1), doc.id, i))
        .collect();
    (pages, HashMap::from([(doc.id, doc)]))
}

pub fn layout(n_up: u8, show_borders: bool) -> LayoutSettings {
    LayoutSettings::new(NUp::new(n_up).unwrap(), show_borders)
}
