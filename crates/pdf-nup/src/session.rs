//! Page session: loaded documents and the ordered page list
//!
//! The session holds the results of user actions (selection, order, rotation,
//! filters, overlays) that an assembly run consumes as a snapshot.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use log::{debug, info};

use crate::assemble::LoadedPdf;
use crate::options::{LayoutSettings, Preset};
use crate::raster::Raster;
use crate::types::*;

/// Initial state given to every page when a document is enumerated
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DescriptorDefaults {
    pub selected: bool,
    pub filters: FilterParams,
    pub rotation: Rotation,
}

impl Default for DescriptorDefaults {
    fn default() -> Self {
        Self {
            selected: true,
            filters: FilterParams::default(),
            rotation: Rotation::None,
        }
    }
}

impl DescriptorDefaults {
    /// Print-friendly start for landscape slide decks: inverted, high-contrast
    /// grayscale, turned to fill portrait cells
    pub fn ink_saver() -> Self {
        Self {
            selected: true,
            filters: FilterParams::new(true, true, 12.0, 50.0),
            rotation: Rotation::Clockwise90,
        }
    }

    fn descriptor(&self, id: PageId, source: DocumentId, index: usize) -> PageDescriptor {
        PageDescriptor {
            is_selected: self.selected,
            filters: self.filters.clamped(),
            rotation: self.rotation,
            ..PageDescriptor::new(id, source, index)
        }
    }
}

/// Owner of the loaded documents and the ordered page descriptors
#[derive(Debug, Default)]
pub struct PageSession {
    documents: HashMap<DocumentId, SourceDocument>,
    pages: Vec<PageDescriptor>,
    defaults: DescriptorDefaults,
    next_document: u64,
    next_page: u64,
}

impl PageSession {
    pub fn new(defaults: DescriptorDefaults) -> Self {
        Self {
            defaults,
            ..Self::default()
        }
    }

    pub fn defaults(&self) -> &DescriptorDefaults {
        &self.defaults
    }

    // =========================================================================
    // Documents
    // =========================================================================

    /// Register a document and append one descriptor per page
    pub fn add_document(&mut self, pdf: LoadedPdf) -> DocumentId {
        self.next_document += 1;
        let id = DocumentId(self.next_document);

        for index in 0..pdf.page_count {
            self.next_page += 1;
            let page = self
                .defaults
                .descriptor(PageId(self.next_page), id, index);
            self.pages.push(page);
        }

        info!("Added {} ({} pages) as {}", pdf.name, pdf.page_count, id);
        self.documents.insert(
            id,
            SourceDocument::new(id, pdf.name, pdf.bytes, pdf.page_count),
        );
        id
    }

    /// Drop a document and every page drawn from it
    pub fn remove_document(&mut self, id: DocumentId) -> Result<()> {
        self.documents
            .remove(&id)
            .ok_or(NupError::SourceUnavailable(id))?;
        self.pages.retain(|p| p.source != id);
        debug!("Removed document {}", id);
        Ok(())
    }

    pub fn documents(&self) -> &HashMap<DocumentId, SourceDocument> {
        &self.documents
    }

    pub fn document(&self, id: DocumentId) -> Option<&SourceDocument> {
        self.documents.get(&id)
    }

    // =========================================================================
    // Pages
    // =========================================================================

    /// All descriptors in their current order
    pub fn pages(&self) -> &[PageDescriptor] {
        &self.pages
    }

    pub fn page(&self, id: PageId) -> Option<&PageDescriptor> {
        self.pages.iter().find(|p| p.id == id)
    }

    fn page_mut(&mut self, id: PageId) -> Result<&mut PageDescriptor> {
        self.pages
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(NupError::UnknownPage(id))
    }

    /// Selected descriptors in their current order
    pub fn selected_pages(&self) -> impl Iterator<Item = &PageDescriptor> {
        self.pages.iter().filter(|p| p.is_selected)
    }

    /// Flip one page's selection, returning the new state
    pub fn toggle_selected(&mut self, id: PageId) -> Result<bool> {
        let page = self.page_mut(id)?;
        page.is_selected = !page.is_selected;
        Ok(page.is_selected)
    }

    /// Deselect everything when all pages are selected, otherwise select all
    pub fn toggle_all(&mut self) {
        let select = !self.pages.iter().all(|p| p.is_selected);
        for page in &mut self.pages {
            page.is_selected = select;
        }
    }

    /// Turn one page a further 90 degrees clockwise
    pub fn rotate(&mut self, id: PageId) -> Result<Rotation> {
        let page = self.page_mut(id)?;
        page.rotation = page.rotation.rotated_clockwise();
        Ok(page.rotation)
    }

    pub fn set_rotation(&mut self, id: PageId, rotation: Rotation) -> Result<()> {
        self.page_mut(id)?.rotation = rotation;
        Ok(())
    }

    pub fn set_filters(&mut self, id: PageId, filters: FilterParams) -> Result<()> {
        self.page_mut(id)?.filters = filters.clamped();
        Ok(())
    }

    /// Edit the filters of every selected page
    pub fn update_selected_filters(&mut self, mut edit: impl FnMut(&mut FilterParams)) {
        for page in self.pages.iter_mut().filter(|p| p.is_selected) {
            edit(&mut page.filters);
            page.filters = page.filters.clamped();
        }
    }

    /// Edit the filters of every page, selected or not
    pub fn update_all_filters(&mut self, mut edit: impl FnMut(&mut FilterParams)) {
        for page in &mut self.pages {
            edit(&mut page.filters);
            page.filters = page.filters.clamped();
        }
    }

    /// Neutral filters on every selected page
    pub fn reset_selected_filters(&mut self) {
        self.update_selected_filters(|f| *f = FilterParams::default());
    }

    /// Move the page at `from` so that it ends up at index `to`
    pub fn move_page(&mut self, from: usize, to: usize) -> Result<()> {
        let len = self.pages.len();
        if from >= len || to >= len {
            return Err(NupError::Config(format!(
                "Cannot move page {} to {}: session has {} pages",
                from, to, len
            )));
        }
        let page = self.pages.remove(from);
        self.pages.insert(to, page);
        Ok(())
    }

    /// Put `order` first, in that order and selected; every other page is
    /// deselected and keeps its relative position after them.
    ///
    /// On error the session is left untouched.
    pub fn arrange(&mut self, order: &[PageId]) -> Result<()> {
        let mut seen = HashSet::with_capacity(order.len());
        for &id in order {
            if !self.pages.iter().any(|p| p.id == id) {
                return Err(NupError::UnknownPage(id));
            }
            if !seen.insert(id) {
                return Err(NupError::Config(format!("Page {} listed twice", id)));
            }
        }

        let mut rest = std::mem::take(&mut self.pages);
        let mut arranged = Vec::with_capacity(rest.len());
        for &id in order {
            if let Some(pos) = rest.iter().position(|p| p.id == id) {
                let mut page = rest.remove(pos);
                page.is_selected = true;
                arranged.push(page);
            }
        }

        for mut page in rest {
            page.is_selected = false;
            arranged.push(page);
        }
        self.pages = arranged;
        Ok(())
    }

    /// Replace (or clear) a page's annotation layer
    pub fn set_overlay(&mut self, id: PageId, overlay: Option<Raster>) -> Result<()> {
        self.page_mut(id)?.overlay = overlay.map(Arc::new);
        Ok(())
    }

    /// Switch the layout and apply the preset's page edits to every page
    pub fn apply_preset(&mut self, preset: Preset, layout: &mut LayoutSettings) {
        *layout = preset.layout();
        for page in &mut self.pages {
            preset.apply_to_page(page);
        }
        info!("Applied preset {:?}", preset);
    }

    /// Forget every document and page. Identifiers are never reused.
    pub fn reset(&mut self) {
        self.documents.clear();
        self.pages.clear();
    }
}
