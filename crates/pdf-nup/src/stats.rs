use crate::layout::sheet_count;
use crate::options::LayoutSettings;
use crate::types::*;

/// Calculate paper usage for the current selection and layout
pub fn calculate_statistics(
    pages: &[PageDescriptor],
    layout: &LayoutSettings,
) -> Result<AssemblyStatistics> {
    let total_pages = pages.len();
    let selected_pages = pages.iter().filter(|p| p.is_selected).count();

    if selected_pages == 0 {
        return Err(NupError::EmptySelection);
    }

    let n_up = layout.n_up.get();
    let output_sheets = sheet_count(selected_pages, layout.n_up);
    let empty_cells = output_sheets * n_up - selected_pages;

    // Compared to printing every page, selected or not, one per sheet
    let saved = (total_pages as f64 - output_sheets as f64) / total_pages as f64;
    let savings_percent = (saved * 100.0).round() as i32;

    Ok(AssemblyStatistics {
        total_pages,
        selected_pages,
        output_sheets,
        empty_cells,
        savings_percent,
    })
}
