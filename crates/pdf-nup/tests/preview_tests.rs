mod common;

use common::*;
use pdf_nup::*;

#[test]
fn test_preview_is_filtered_at_requested_scale() {
    let (mut pages, docs) = fixture(2);
    pages[1].filters = FilterParams::new(true, false, 0.0, 0.0);
    let rasterizer = SolidRasterizer::default();
    let adapter = RendererAdapter::new(&docs, &rasterizer);

    let preview = render_preview(&adapter, &pages[1], PREVIEW_SCALE).unwrap();

    assert_eq!(preview.pixel(0, 0), Some(&[55, 55, 55][..]));
    assert_eq!(*rasterizer.calls.lock().unwrap(), vec![(1, PREVIEW_SCALE)]);
}

#[test]
fn test_preview_converts_to_image() {
    let (pages, docs) = fixture(1);
    let rasterizer = SolidRasterizer::default();
    let adapter = RendererAdapter::new(&docs, &rasterizer);

    let preview = render_preview(&adapter, &pages[0], PREVIEW_SCALE).unwrap();
    let image = preview.to_image().unwrap();

    assert_eq!((image.width(), image.height()), (40, 30));
}

#[test]
fn test_preview_reports_missing_document() {
    let (mut pages, docs) = fixture(1);
    pages[0].source = DocumentId(7);
    let rasterizer = SolidRasterizer::default();
    let adapter = RendererAdapter::new(&docs, &rasterizer);

    assert!(matches!(
        render_preview(&adapter, &pages[0], PREVIEW_SCALE),
        Err(NupError::SourceUnavailable(DocumentId(7)))
    ));
}
