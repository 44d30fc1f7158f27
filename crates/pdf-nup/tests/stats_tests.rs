mod common;

use common::*;
use pdf_nup::*;

#[test]
fn test_statistics_five_pages_four_up() {
    let (pages, _) = fixture(5);
    let stats = calculate_statistics(&pages, &layout(4, true)).unwrap();

    assert_eq!(stats.total_pages, 5);
    assert_eq!(stats.selected_pages, 5);
    assert_eq!(stats.output_sheets, 2);
    assert_eq!(stats.empty_cells, 3);
    // (5 - 2) / 5
    assert_eq!(stats.savings_percent, 60);
}

#[test]
fn test_statistics_one_up_saves_nothing() {
    let (pages, _) = fixture(7);
    let stats = calculate_statistics(&pages, &layout(1, false)).unwrap();

    assert_eq!(stats.output_sheets, 7);
    assert_eq!(stats.empty_cells, 0);
    assert_eq!(stats.savings_percent, 0);
}

#[test]
fn test_unselected_pages_count_as_saved() {
    let (mut pages, _) = fixture(10);
    for page in pages.iter_mut().skip(4) {
        page.is_selected = false;
    }
    let stats = calculate_statistics(&pages, &layout(2, false)).unwrap();

    assert_eq!(stats.selected_pages, 4);
    assert_eq!(stats.output_sheets, 2);
    assert_eq!(stats.savings_percent, 80);
}

#[test]
fn test_savings_rounds_to_nearest() {
    // (3 - 1) / 3 = 66.67%
    let (pages, _) = fixture(3);
    let stats = calculate_statistics(&pages, &layout(3, false)).unwrap();
    assert_eq!(stats.savings_percent, 67);
}

#[test]
fn test_statistics_match_assembled_sheets() {
    for n_up in 1..=8u8 {
        for count in 1..=17 {
            let (pages, docs) = fixture(count);
            let settings = layout(n_up, true);
            let stats = calculate_statistics(&pages, &settings).unwrap();

            let rasterizer = SolidRasterizer::default();
            let mut writer = RecordingWriter::default();
            assemble_with(&pages, &docs, &settings, &rasterizer, &mut writer).unwrap();

            assert_eq!(stats.output_sheets, writer.pages(), "{} pages at {}-up", count, n_up);
            assert_eq!(writer.rectangles(), count);
        }
    }
}

#[test]
fn test_statistics_empty_selection() {
    let (mut pages, _) = fixture(2);
    pages.iter_mut().for_each(|p| p.is_selected = false);

    assert!(matches!(
        calculate_statistics(&pages, &layout(4, false)),
        Err(NupError::EmptySelection)
    ));
}
