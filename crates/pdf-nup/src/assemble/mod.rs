//! N-up assembly
//!
//! This module orchestrates one assembly run:
//! 1. Take the selected descriptors in their current order
//! 2. Chunk them into sheets and lay out the cells
//! 3. Rasterize, filter and place each page, then overlays and borders
//! 4. Finalize the output document
//!
//! A failure on any page aborts the run; no partial document is produced.

mod io;
mod sheet;

pub use io::{LoadedPdf, load_multiple_pdfs, load_pdf, save_pdf};

use std::collections::HashMap;

use log::{debug, info, warn};
use tokio::sync::mpsc::UnboundedSender;

use crate::layout::{SheetGeometry, SheetPlan, chunk_pages, plan_sheets};
use crate::options::LayoutSettings;
use crate::render::{PageRasterizer, RendererAdapter};
use crate::types::*;
use crate::writer::{DocumentWriter, LopdfWriter};
use sheet::SheetContext;

/// Progress of one assembly run
#[derive(Debug, Clone, PartialEq)]
pub enum AssemblyState {
    Idle,
    /// About to render `cell` of `sheet` (both 0-based)
    Rendering { sheet: usize, cell: usize },
    /// Every sheet drawn, output not yet serialized
    Assembled,
    /// Output serialized to `len` bytes
    Finalized { len: usize },
    /// The run was aborted
    Failed {
        page: Option<PageId>,
        message: String,
    },
}

impl AssemblyState {
    /// Whether no further transitions can happen
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            AssemblyState::Finalized { .. } | AssemblyState::Failed { .. }
        )
    }
}

/// Drives an assembly run and reports its state transitions
#[derive(Debug)]
pub struct Assembler {
    geometry: SheetGeometry,
    progress: Option<UnboundedSender<AssemblyState>>,
    state: AssemblyState,
}

impl Default for Assembler {
    fn default() -> Self {
        Self::new()
    }
}

impl Assembler {
    pub fn new() -> Self {
        Self {
            geometry: SheetGeometry::a4(),
            progress: None,
            state: AssemblyState::Idle,
        }
    }

    pub fn with_geometry(mut self, geometry: SheetGeometry) -> Self {
        self.geometry = geometry;
        self
    }

    /// Stream every state transition to `sender`
    pub fn with_progress(mut self, sender: UnboundedSender<AssemblyState>) -> Self {
        self.progress = Some(sender);
        self
    }

    pub fn state(&self) -> &AssemblyState {
        &self.state
    }

    fn transition(&mut self, next: AssemblyState) {
        debug!("Assembly state: {:?}", next);
        if let Some(sender) = &self.progress {
            // Receiver may already be gone
            let _ = sender.send(next.clone());
        }
        self.state = next;
    }

    /// Assemble the selected pages into an output document.
    ///
    /// `pages` is the full ordered sequence; unselected descriptors are
    /// skipped. Per-page failures are returned as [`NupError::Page`].
    pub fn run<R, W>(
        &mut self,
        pages: &[PageDescriptor],
        documents: &HashMap<DocumentId, SourceDocument>,
        layout: &LayoutSettings,
        rasterizer: &R,
        writer: &mut W,
    ) -> Result<Vec<u8>>
    where
        R: PageRasterizer + ?Sized,
        W: DocumentWriter + ?Sized,
    {
        let selected: Vec<PageDescriptor> =
            pages.iter().filter(|p| p.is_selected).cloned().collect();
        if selected.is_empty() {
            return Err(NupError::EmptySelection);
        }
        layout.validate_for(&self.geometry)?;

        let ids: Vec<PageId> = selected.iter().map(|p| p.id).collect();
        let plans = plan_sheets(&ids, layout.n_up, &self.geometry);
        info!(
            "Assembling {} pages onto {} sheets ({}-up)",
            selected.len(),
            plans.len(),
            layout.n_up.get()
        );

        let result =
            self.draw_and_finalize(&selected, &plans, documents, layout, rasterizer, writer);
        if let Err(e) = &result {
            let page = match e {
                NupError::Page { page, .. } => Some(*page),
                _ => None,
            };
            warn!("Assembly failed: {}", e);
            self.transition(AssemblyState::Failed {
                page,
                message: e.root().to_string(),
            });
        }
        result
    }

    fn draw_and_finalize<R, W>(
        &mut self,
        selected: &[PageDescriptor],
        plans: &[SheetPlan],
        documents: &HashMap<DocumentId, SourceDocument>,
        layout: &LayoutSettings,
        rasterizer: &R,
        writer: &mut W,
    ) -> Result<Vec<u8>>
    where
        R: PageRasterizer + ?Sized,
        W: DocumentWriter + ?Sized,
    {
        let geometry = self.geometry;
        let mut context = SheetContext {
            adapter: RendererAdapter::new(documents, rasterizer),
            writer,
            layout,
            geometry: &geometry,
        };

        for (plan, chunk) in plans.iter().zip(chunk_pages(selected, layout.n_up)) {
            context.render_sheet(plan, chunk, &mut |state| self.transition(state))?;
        }
        self.transition(AssemblyState::Assembled);

        let bytes = context.writer.finalize()?;
        self.transition(AssemblyState::Finalized { len: bytes.len() });
        info!("Assembly finished: {} bytes", bytes.len());
        Ok(bytes)
    }

    /// Assemble on a blocking worker thread with a [`LopdfWriter`]
    pub async fn assemble<R>(
        mut self,
        pages: &[PageDescriptor],
        documents: &HashMap<DocumentId, SourceDocument>,
        layout: &LayoutSettings,
        rasterizer: R,
    ) -> Result<Vec<u8>>
    where
        R: PageRasterizer + 'static,
    {
        let pages = pages.to_vec();
        let documents = documents.clone();
        let layout = *layout;

        tokio::task::spawn_blocking(move || {
            let mut writer = LopdfWriter::new();
            self.run(&pages, &documents, &layout, &rasterizer, &mut writer)
        })
        .await?
    }
}

/// Assemble with caller-supplied rasterizer and writer
pub fn assemble_with<R, W>(
    pages: &[PageDescriptor],
    documents: &HashMap<DocumentId, SourceDocument>,
    layout: &LayoutSettings,
    rasterizer: &R,
    writer: &mut W,
) -> Result<Vec<u8>>
where
    R: PageRasterizer + ?Sized,
    W: DocumentWriter + ?Sized,
{
    Assembler::new().run(pages, documents, layout, rasterizer, writer)
}

/// Main assembly function: PDF output via lopdf, off the async runtime
pub async fn assemble<R>(
    pages: &[PageDescriptor],
    documents: &HashMap<DocumentId, SourceDocument>,
    layout: &LayoutSettings,
    rasterizer: R,
) -> Result<Vec<u8>>
where
    R: PageRasterizer + 'static,
{
    Assembler::new()
        .assemble(pages, documents, layout, rasterizer)
        .await
}
