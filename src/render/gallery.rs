use crate::foundation::error::{DeckError, DeckResult};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

/// Gallery file name inside the snapshot directory.
pub const GALLERY_FILE: &str = "index.html";

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Write an `index.html` gallery of `images` into `out_dir`.
pub fn write_gallery(out_dir: &Path, images: &[PathBuf]) -> DeckResult<PathBuf> {
    let mut rows = String::new();
    for img in images {
        let name = img
            .file_name()
            .map(|n| escape(&n.to_string_lossy()))
            .unwrap_or_default();
        let _ = writeln!(
            rows,
            r#"<div class="slide"><div class="label">{name}</div><img src="{name}" /></div>"#
        );
    }
    let html = format!(
        r#"<!doctype html>
<meta charset="utf-8" />
<title>Slide Snapshots</title>
<style>
  body {{ font-family: system-ui, Segoe UI, Roboto, Arial, sans-serif; margin: 24px; }}
  .grid {{ display: grid; grid-template-columns: repeat(auto-fit, minmax(420px, 1fr)); gap: 18px; }}
  .slide {{ border: 1px solid #ddd; border-radius: 10px; padding: 12px; background: #fff; }}
  .label {{ font-size: 12px; color: #444; margin-bottom: 8px; }}
  img {{ width: 100%; height: auto; border-radius: 6px; }}
</style>
<h1>Slide Snapshots</h1>
<div class="grid">
{rows}</div>
"#
    );
    let path = out_dir.join(GALLERY_FILE);
    std::fs::write(&path, html).map_err(|e| {
        DeckError::render(format!("failed to write gallery '{}': {e}", path.display()))
    })?;
    Ok(path)
}

#[cfg(test)]
#[path = "../../tests/unit/render/gallery.rs"]
mod tests;
