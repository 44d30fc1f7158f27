//! Document I/O for assembly

use crate::types::*;
use lopdf::Document;
use std::path::Path;

/// A source PDF read from disk, not yet registered with a session
#[derive(Debug, Clone)]
pub struct LoadedPdf {
    pub name: String,
    pub bytes: Vec<u8>,
    pub page_count: usize,
}

impl LoadedPdf {
    /// Parse PDF bytes far enough to count the pages
    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Result<Self> {
        let page_count = Document::load_mem(&bytes)?.get_pages().len();
        Ok(Self {
            name: name.into(),
            bytes,
            page_count,
        })
    }
}

/// Load a single PDF document
pub async fn load_pdf(path: impl AsRef<Path>) -> Result<LoadedPdf> {
    let path = path.as_ref();
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let bytes = tokio::fs::read(path).await?;
    let pdf = tokio::task::spawn_blocking(move || LoadedPdf::from_bytes(name, bytes)).await??;
    Ok(pdf)
}

/// Load multiple PDF documents, in order
pub async fn load_multiple_pdfs(paths: &[impl AsRef<Path>]) -> Result<Vec<LoadedPdf>> {
    let mut documents = Vec::new();
    for path in paths {
        documents.push(load_pdf(path).await?);
    }
    Ok(documents)
}

/// Save assembled output bytes
pub async fn save_pdf(bytes: &[u8], path: impl AsRef<Path>) -> Result<()> {
    tokio::fs::write(path, bytes).await?;
    Ok(())
}
