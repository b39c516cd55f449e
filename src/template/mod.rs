pub(crate) mod capability;
pub(crate) mod manifest;
pub(crate) mod package;

use crate::foundation::core::SlideSize;
use crate::foundation::error::DeckResult;
use crate::template::capability::TemplateLayout;
use crate::theme::scheme::ThemeColors;
use std::path::{Path, PathBuf};

/// A loaded template: slide size, layouts described by their capabilities, and the
/// extracted theme scheme.
///
/// Read once per run and never mutated.
#[derive(Clone, Debug, PartialEq)]
pub struct Template {
    /// File the template was read from.
    pub source: PathBuf,
    /// Slide dimensions.
    pub slide_size: SlideSize,
    /// Layouts in declaration order.
    pub layouts: Vec<TemplateLayout>,
    /// Extracted color scheme; empty when the template has none.
    pub theme: ThemeColors,
}

impl Template {
    /// Load a `.pptx` package or a `.json` template manifest, chosen by extension.
    #[tracing::instrument]
    pub fn load(path: &Path) -> DeckResult<Self> {
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        let template = if is_json {
            manifest::load_manifest(path)?
        } else {
            package::load_package(path)?
        };
        tracing::debug!(
            layouts = template.layouts.len(),
            theme_roles = template.theme.len(),
            "template loaded"
        );
        Ok(template)
    }

    /// Layout at `index`, if in range.
    pub fn layout(&self, index: usize) -> Option<&TemplateLayout> {
        self.layouts.get(index)
    }
}
