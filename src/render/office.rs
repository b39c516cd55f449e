use crate::foundation::error::{DeckError, DeckResult};
use crate::render::{SnapshotFormat, SnapshotRenderer, list_snapshots, prepare_out_dir};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Binaries tried, in order, when no explicit binary is configured.
const OFFICE_BINARIES: [&str; 2] = ["soffice", "libreoffice"];

/// Whether `binary` can be spawned from `PATH`.
pub fn is_on_path(binary: &str) -> bool {
    Command::new(binary)
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Exports slides through LibreOffice in headless mode.
#[derive(Clone, Debug, Default)]
pub struct OfficeRenderer {
    binary: Option<String>,
}

impl OfficeRenderer {
    /// Renderer using a specific office binary.
    pub fn with_binary(binary: impl Into<String>) -> Self {
        Self {
            binary: Some(binary.into()),
        }
    }

    fn find_binary(&self) -> Option<String> {
        match &self.binary {
            Some(b) => is_on_path(b).then(|| b.clone()),
            None => OFFICE_BINARIES
                .iter()
                .find(|b| is_on_path(b))
                .map(|b| (*b).to_owned()),
        }
    }
}

impl SnapshotRenderer for OfficeRenderer {
    #[tracing::instrument(skip(self))]
    fn render(
        &self,
        document: &Path,
        out_dir: &Path,
        format: SnapshotFormat,
    ) -> DeckResult<Vec<PathBuf>> {
        if !document.is_file() {
            return Err(DeckError::render(format!(
                "document '{}' not found",
                document.display()
            )));
        }
        let binary = self.find_binary().ok_or_else(|| {
            DeckError::render("LibreOffice not found (soffice/libreoffice) on PATH")
        })?;
        prepare_out_dir(out_dir, format)?;

        let output = Command::new(&binary)
            .args([
                "--headless",
                "--nologo",
                "--nolockcheck",
                "--norestore",
                "--convert-to",
                format.extension(),
                "--outdir",
            ])
            .arg(out_dir)
            .arg(document)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| DeckError::render(format!("failed to spawn {binary}: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DeckError::render(format!(
                "{binary} export failed ({}): {}",
                output.status,
                stderr.trim()
            )));
        }

        let images = list_snapshots(out_dir, format)?;
        if images.is_empty() {
            return Err(DeckError::render(format!(
                "no images were produced in '{}'",
                out_dir.display()
            )));
        }
        tracing::debug!(images = images.len(), "office export finished");
        Ok(images)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/office.rs"]
mod tests;
