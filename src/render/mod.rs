//! Snapshot renderer seam: assembled document in, one raster image per slide out.
//!
//! Renderer failures are never fatal to the QA loop; callers treat an error as "no metrics for
//! this pass".

pub(crate) mod gallery;
pub(crate) mod office;
pub(crate) mod preview;

use crate::foundation::error::{DeckError, DeckResult};
use std::path::{Path, PathBuf};

/// Snapshot image format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotFormat {
    /// Lossless PNG.
    #[default]
    Png,
    /// JPEG.
    Jpg,
}

impl SnapshotFormat {
    /// Parse `png`, `jpg` or `jpeg` (case-insensitive).
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpg),
            _ => None,
        }
    }

    /// File extension without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpg => "jpg",
        }
    }

    pub(crate) fn image_format(self) -> image::ImageFormat {
        match self {
            Self::Png => image::ImageFormat::Png,
            Self::Jpg => image::ImageFormat::Jpeg,
        }
    }
}

/// Which renderer to use.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotMethod {
    /// Office export for `.pptx` documents, the built-in preview otherwise.
    #[default]
    Auto,
    /// Built-in rasterizer for deck JSON files.
    Preview,
    /// LibreOffice headless export.
    Office,
}

impl SnapshotMethod {
    /// Parse `auto`, `preview` or `office` (`libreoffice` accepted).
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "auto" => Some(Self::Auto),
            "preview" => Some(Self::Preview),
            "office" | "libreoffice" => Some(Self::Office),
            _ => None,
        }
    }
}

/// Renders an assembled document to per-slide images.
pub trait SnapshotRenderer {
    /// Render `document` into `out_dir`, returning one image per slide in slide order.
    fn render(
        &self,
        document: &Path,
        out_dir: &Path,
        format: SnapshotFormat,
    ) -> DeckResult<Vec<PathBuf>>;
}

/// Renderer for `method` and the document about to be rendered.
pub fn select_renderer(method: SnapshotMethod, document: &Path) -> Box<dyn SnapshotRenderer> {
    let is_pptx = document
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pptx"));
    match method {
        SnapshotMethod::Office => Box::new(office::OfficeRenderer::default()),
        SnapshotMethod::Auto if is_pptx => Box::new(office::OfficeRenderer::default()),
        SnapshotMethod::Auto | SnapshotMethod::Preview => {
            Box::new(preview::PreviewRenderer::default())
        }
    }
}

/// Slide number embedded in an image file name (`Slide12.png` → 12).
pub fn slide_number(path: &Path) -> Option<u32> {
    let stem = path.file_stem()?.to_str()?;
    let digits: String = stem
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().ok()
}

/// Order images by embedded slide number, then by name; unnumbered images sort last.
pub fn sort_by_slide_number(images: &mut [PathBuf]) {
    images.sort_by_cached_key(|p| {
        let name = p
            .file_name()
            .map(|n| n.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        (slide_number(p).unwrap_or(u32::MAX), name)
    });
}

/// Images in `dir` with the format's extension (case-insensitive), sorted by slide number.
pub fn list_snapshots(dir: &Path, format: SnapshotFormat) -> DeckResult<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|e| {
        DeckError::render(format!("failed to list '{}': {e}", dir.display()))
    })?;
    let mut images: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|e| e.path())
        .filter(|p| has_extension(p, format))
        .collect();
    sort_by_slide_number(&mut images);
    Ok(images)
}

fn has_extension(path: &Path, format: SnapshotFormat) -> bool {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match (ext.as_deref(), format) {
        (Some("png"), SnapshotFormat::Png) => true,
        (Some("jpg" | "jpeg"), SnapshotFormat::Jpg) => true,
        _ => false,
    }
}

/// Create `out_dir` and remove snapshots and the gallery left by an earlier export.
pub fn prepare_out_dir(out_dir: &Path, format: SnapshotFormat) -> DeckResult<()> {
    std::fs::create_dir_all(out_dir).map_err(|e| {
        DeckError::render(format!(
            "failed to create snapshot directory '{}': {e}",
            out_dir.display()
        ))
    })?;
    for stale in list_snapshots(out_dir, format)? {
        let is_slide = stale
            .file_stem()
            .and_then(|s| s.to_str())
            .is_some_and(|s| s.to_ascii_lowercase().starts_with("slide"));
        if is_slide && let Err(e) = std::fs::remove_file(&stale) {
            tracing::warn!(path = %stale.display(), error = %e, "failed to remove stale snapshot");
        }
    }
    let gallery = out_dir.join(gallery::GALLERY_FILE);
    if gallery.is_file()
        && let Err(e) = std::fs::remove_file(&gallery)
    {
        tracing::warn!(path = %gallery.display(), error = %e, "failed to remove stale gallery");
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/render/mod.rs"]
mod tests;
