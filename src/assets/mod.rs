use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// What a slide asks for: an existing image, generation parameters, or both.
#[derive(Clone, Copy, Debug, Default)]
pub struct ImageRequest<'a> {
    /// Authored `image_path` (or a card's `icon_path`).
    pub path: Option<&'a str>,
    /// Authored `image_gen` parameters.
    pub generate: Option<&'a Map<String, Value>>,
    /// Slide title, used to name generated assets.
    pub title: Option<&'a str>,
}

/// Resolves image references to files on disk.
pub trait AssetProvider {
    /// An existing file for the request, or `None` when nothing usable exists.
    fn resolve_or_generate(&self, request: &ImageRequest<'_>) -> Option<PathBuf>;
}

/// Filesystem-backed provider.
///
/// Paths are tried as given, then relative to the config directory. Generation requests are
/// served only from previously generated files in the assets directory, named
/// `<id or slugified title>.<png|jpg>`.
#[derive(Clone, Debug, Default)]
pub struct FsAssetProvider {
    config_dir: Option<PathBuf>,
    assets_dir: Option<PathBuf>,
}

impl FsAssetProvider {
    /// Provider resolving relative paths against `config_dir`.
    pub fn new(config_dir: Option<PathBuf>) -> Self {
        Self {
            config_dir,
            assets_dir: None,
        }
    }

    /// Directory holding generated assets.
    pub fn with_assets_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.assets_dir = Some(dir.into());
        self
    }

    fn resolve_path(&self, raw: &str) -> Option<PathBuf> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        let direct = PathBuf::from(raw);
        if direct.is_file() {
            return Some(direct);
        }
        let relative = self.config_dir.as_deref()?.join(raw);
        relative.is_file().then_some(relative)
    }

    fn generated(&self, params: &Map<String, Value>, title: Option<&str>) -> Option<PathBuf> {
        let dir = self.assets_dir.as_deref().or(self.config_dir.as_deref())?;
        let fmt = match params.get("format").and_then(Value::as_str).map(str::trim) {
            Some(f) if f.eq_ignore_ascii_case("jpg") || f.eq_ignore_ascii_case("jpeg") => "jpg",
            _ => "png",
        };
        let id = params
            .get("id")
            .and_then(Value::as_str)
            .or(title)
            .unwrap_or("image");
        let path = dir.join(format!("{}.{fmt}", slugify(id)));
        if path.is_file() {
            return Some(path);
        }
        tracing::warn!(
            path = %path.display(),
            "image generation is not available; no cached asset"
        );
        None
    }
}

impl AssetProvider for FsAssetProvider {
    fn resolve_or_generate(&self, request: &ImageRequest<'_>) -> Option<PathBuf> {
        if let Some(found) = request.path.and_then(|p| self.resolve_path(p)) {
            return Some(found);
        }
        if let Some(p) = request.path {
            tracing::debug!(path = p, "image path not found");
        }
        request
            .generate
            .and_then(|params| self.generated(params, request.title))
    }
}

/// Lowercase ASCII alphanumerics joined by `-`; `image` when nothing is left.
pub fn slugify(text: &str) -> String {
    let slug = text
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
        .to_ascii_lowercase();
    if slug.is_empty() {
        "image".to_owned()
    } else {
        slug
    }
}

/// Pixel dimensions of an image file, when it can be read.
pub fn image_pixel_size(path: &Path) -> Option<(u32, u32)> {
    match image::image_dimensions(path) {
        Ok(dims) => Some(dims),
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "image dimensions unavailable");
            None
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/provider.rs"]
mod tests;
