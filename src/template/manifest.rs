use crate::foundation::core::{BoxGeometry, SlideSize};
use crate::foundation::error::{DeckError, DeckResult};
use crate::template::Template;
use crate::template::capability::{
    Placeholder, PlaceholderCapabilitySet, PlaceholderRole, TemplateLayout,
};
use crate::theme::palette::parse_rgb;
use crate::theme::scheme::{ColorRole, ThemeColors, extract_scheme};
use anyhow::Context;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// JSON description of a template, for decks whose layouts live outside a `.pptx` package.
#[derive(Clone, Debug, serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct TemplateManifest {
    #[serde(default)]
    slide_size: SlideSize,
    /// Role name to `RRGGBB` / `rgb(...)`.
    #[serde(default)]
    theme: BTreeMap<String, String>,
    /// Theme XML file, relative to the manifest; merged under `theme`.
    #[serde(default)]
    theme_xml: Option<PathBuf>,
    layouts: Vec<LayoutDef>,
}

#[derive(Clone, Debug, serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct LayoutDef {
    name: String,
    #[serde(default)]
    placeholders: Vec<PlaceholderDef>,
}

#[derive(Clone, Debug, serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct PlaceholderDef {
    role: PlaceholderRole,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

pub(crate) fn load_manifest(path: &Path) -> DeckResult<Template> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("read template manifest {}", path.display()))?;
    let manifest: TemplateManifest = serde_json::from_str(&raw).map_err(|e| {
        DeckError::template(format!("invalid template manifest {}: {e}", path.display()))
    })?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    build(manifest, base_dir, path)
}

fn build(manifest: TemplateManifest, base_dir: &Path, source: &Path) -> DeckResult<Template> {
    let size = manifest.slide_size;
    if !(size.width > 0.0 && size.height > 0.0) {
        return Err(DeckError::template("slide_size must be positive"));
    }

    let mut theme: Vec<(ColorRole, _)> = match &manifest.theme_xml {
        Some(rel) => {
            let xml_path = base_dir.join(rel);
            let xml = std::fs::read(&xml_path)
                .with_context(|| format!("read theme xml {}", xml_path.display()))?;
            extract_scheme(&xml).iter().collect()
        }
        None => Vec::new(),
    };
    for (name, value) in &manifest.theme {
        let role = ColorRole::parse(name)
            .ok_or_else(|| DeckError::template(format!("unknown theme role \"{name}\"")))?;
        let rgb = parse_rgb(value).ok_or_else(|| {
            DeckError::template(format!("theme role \"{name}\": invalid color \"{value}\""))
        })?;
        theme.push((role, rgb));
    }

    let layouts = manifest
        .layouts
        .into_iter()
        .enumerate()
        .map(|(index, def)| TemplateLayout {
            index,
            name: def.name,
            capabilities: PlaceholderCapabilitySet::new(
                def.placeholders
                    .into_iter()
                    .map(|p| {
                        Placeholder::new(
                            p.role,
                            BoxGeometry::new(p.x, p.y, p.width, p.height),
                            size,
                        )
                    })
                    .collect(),
            ),
        })
        .collect();

    Ok(Template {
        source: source.to_path_buf(),
        slide_size: size,
        layouts,
        theme: ThemeColors::from_entries(theme),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/template/manifest.rs"]
mod tests;
