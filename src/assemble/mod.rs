//! Document assembler seam.
//!
//! An assembler turns a planned [`DeckDocument`] into persisted bytes. The engine only relies on
//! the two-step contract below, so a presentation container writer can be dropped in without
//! touching planning or QA.

pub(crate) mod json;

use crate::deck::DeckDocument;
use crate::foundation::error::{DeckError, DeckResult};
use std::path::{Path, PathBuf};

/// An assembled document held in memory until saved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DocumentHandle {
    bytes: Vec<u8>,
    slide_count: usize,
}

impl DocumentHandle {
    /// Wrap assembled bytes.
    pub fn new(bytes: Vec<u8>, slide_count: usize) -> Self {
        Self { bytes, slide_count }
    }

    /// Encoded document.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Number of slides in the document.
    pub fn slide_count(&self) -> usize {
        self.slide_count
    }
}

/// Turns planned decks into files.
pub trait DocumentAssembler {
    /// Encode a deck. Fails with [`DeckError::Assembly`] when the deck cannot be
    /// represented.
    fn assemble(&self, deck: &DeckDocument) -> DeckResult<DocumentHandle>;

    /// Write an assembled document to `path`, creating parent directories. Returns the path
    /// written.
    fn save(&self, handle: DocumentHandle, path: &Path) -> DeckResult<PathBuf> {
        ensure_parent_dir(path)?;
        std::fs::write(path, handle.bytes()).map_err(|e| {
            DeckError::assembly(format!("failed to write '{}': {e}", path.display()))
        })?;
        tracing::info!(
            path = %path.display(),
            slides = handle.slide_count(),
            "document saved"
        );
        Ok(path.to_path_buf())
    }
}

/// Create `path`'s parent directory if needed.
pub fn ensure_parent_dir(path: &Path) -> DeckResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}
