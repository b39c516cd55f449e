use crate::layout::score::score_layout;
use crate::spec::model::{SlideKind, SlideSpec};
use crate::template::capability::{PlaceholderCapabilitySet, TemplateLayout};

/// Where a slide's layout came from.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum ResolvedLayout {
    /// A layout of the template.
    Template(TemplateLayout),
    /// No template, or nothing scored positively and the template has no empty layout.
    SyntheticBlank,
}

impl ResolvedLayout {
    /// Capabilities of the resolved layout; empty for the synthetic blank.
    pub fn capabilities(&self) -> Option<&PlaceholderCapabilitySet> {
        match self {
            Self::Template(l) => Some(&l.capabilities),
            Self::SyntheticBlank => None,
        }
    }

    /// Template layout index, if any.
    pub fn index(&self) -> Option<usize> {
        match self {
            Self::Template(l) => Some(l.index),
            Self::SyntheticBlank => None,
        }
    }

    /// Display name.
    pub fn name(&self) -> &str {
        match self {
            Self::Template(l) => &l.name,
            Self::SyntheticBlank => "(blank)",
        }
    }
}

/// Which resolution step produced the layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionSource {
    /// No template was supplied.
    NoTemplate,
    /// Explicit `template_layout_index`.
    IndexPin,
    /// Explicit `template_layout` name.
    NamePin,
    /// A stock name for the slide kind.
    NameCandidate,
    /// Capability rubric.
    Scored,
    /// Nothing scored positively.
    BlankFallback,
}

/// A resolved layout and how it was chosen.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutResolution {
    /// The chosen layout.
    pub layout: ResolvedLayout,
    /// The step that chose it.
    pub source: ResolutionSource,
}

/// Explicit layout pins.
#[derive(Clone, Copy, Debug, Default)]
pub struct LayoutPins<'a> {
    /// `template_layout_index`.
    pub index: Option<i64>,
    /// `template_layout`.
    pub name: Option<&'a str>,
}

/// Human-readable layout names tried for each kind, in order.
pub fn name_candidates(kind: SlideKind) -> &'static [&'static str] {
    match kind {
        SlideKind::Title => &["title slide", "title"],
        SlideKind::Bullets => &["title and content", "title and text", "content", "text"],
        SlideKind::TwoColumn => &["comparison", "two content", "two column", "two columns"],
        SlideKind::Chart => &["chart", "title and content", "title and text", "content"],
        SlideKind::Image => &["picture with caption", "picture", "image"],
        SlideKind::Workflow | SlideKind::Architecture | SlideKind::KpiCards => &[
            "title and content",
            "title only",
            "title and text",
            "content",
        ],
        SlideKind::Blank => &["blank"],
    }
}

/// Maps slide kinds onto template layouts.
///
/// Resolution is a pure function of the pins, the kind and the layout list, so it is
/// deterministic for a given template.
#[derive(Clone, Copy, Debug)]
pub struct LayoutResolver<'t> {
    layouts: &'t [TemplateLayout],
    has_template: bool,
}

impl<'t> LayoutResolver<'t> {
    /// Resolver over a template's layouts.
    pub fn new(layouts: &'t [TemplateLayout]) -> Self {
        Self {
            layouts,
            has_template: true,
        }
    }

    /// Resolver for runs without a template; always yields the synthetic blank.
    pub fn without_template() -> Self {
        Self {
            layouts: &[],
            has_template: false,
        }
    }

    /// Resolve a slide of `kind`, honoring its pins.
    pub fn resolve(&self, slide: &SlideSpec, kind: SlideKind) -> LayoutResolution {
        let pins = LayoutPins {
            index: slide.common.template_layout_index,
            name: slide.common.template_layout.as_deref(),
        };
        self.resolve_with(kind, pins, &[])
    }

    /// Resolve an agenda slide: layouts named like an agenda are preferred.
    pub fn resolve_agenda(&self, kind: SlideKind, pins: LayoutPins<'_>) -> LayoutResolution {
        self.resolve_with(kind, pins, &["agenda"])
    }

    fn resolve_with(
        &self,
        kind: SlideKind,
        pins: LayoutPins<'_>,
        preferred: &[&str],
    ) -> LayoutResolution {
        if !self.has_template {
            return LayoutResolution {
                layout: ResolvedLayout::SyntheticBlank,
                source: ResolutionSource::NoTemplate,
            };
        }

        let found = |layout: &TemplateLayout, source| LayoutResolution {
            layout: ResolvedLayout::Template(layout.clone()),
            source,
        };

        if let Some(idx) = pins.index {
            match usize::try_from(idx).ok().and_then(|i| self.layouts.get(i)) {
                Some(layout) => return found(layout, ResolutionSource::IndexPin),
                None => tracing::warn!(index = idx, "template_layout_index out of range; ignoring"),
            }
        }

        if let Some(name) = pins.name.filter(|n| !n.trim().is_empty()) {
            match self.find_by_name(&[name]) {
                Some(layout) => return found(layout, ResolutionSource::NamePin),
                None => tracing::warn!(name, "template_layout not found; ignoring"),
            }
        }

        let candidates: Vec<&str> = preferred
            .iter()
            .chain(name_candidates(kind))
            .copied()
            .collect();
        if let Some(layout) = self.find_by_name(&candidates) {
            tracing::debug!(kind = %kind, layout = %layout.name, "layout matched by name");
            return found(layout, ResolutionSource::NameCandidate);
        }

        if let Some(layout) = self.best_scoring(kind) {
            tracing::debug!(kind = %kind, layout = %layout.name, "layout matched by capabilities");
            return found(layout, ResolutionSource::Scored);
        }

        tracing::debug!(kind = %kind, "no positively scored layout; using blank");
        match self.layouts.iter().find(|l| l.capabilities.is_empty()) {
            Some(layout) => found(layout, ResolutionSource::BlankFallback),
            None => LayoutResolution {
                layout: ResolvedLayout::SyntheticBlank,
                source: ResolutionSource::BlankFallback,
            },
        }
    }

    /// Exact case-insensitive name match first, then the best fuzzy match over all candidates.
    fn find_by_name(&self, candidates: &[&str]) -> Option<&'t TemplateLayout> {
        let lowered: Vec<String> = candidates
            .iter()
            .map(|c| c.trim().to_lowercase())
            .filter(|c| !c.is_empty())
            .collect();
        if lowered.is_empty() {
            return None;
        }

        // Candidates are in priority order.
        for candidate in &lowered {
            if let Some(layout) = self
                .layouts
                .iter()
                .find(|l| l.name.trim().to_lowercase() == *candidate)
            {
                return Some(layout);
            }
        }

        let normalized: Vec<String> = lowered.iter().map(|c| normalize_name(c)).collect();
        let mut best: Option<(&TemplateLayout, usize)> = None;
        for layout in self.layouts {
            let score = name_score(&normalize_name(&layout.name), &normalized);
            if score > best.map_or(0, |(_, s)| s) {
                best = Some((layout, score));
            }
        }
        best.map(|(layout, _)| layout)
    }

    fn best_scoring(&self, kind: SlideKind) -> Option<&'t TemplateLayout> {
        let mut best: Option<(&TemplateLayout, i32)> = None;
        for layout in self.layouts {
            let s = score_layout(kind, &layout.capabilities);
            if best.is_none_or(|(_, b)| s > b) {
                best = Some((layout, s));
            }
        }
        best.filter(|(_, s)| *s > 0).map(|(l, _)| l)
    }
}

/// Lowercase, with every run of non-alphanumerics collapsed to one space.
pub(crate) fn normalize_name(name: &str) -> String {
    name.to_lowercase()
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// 200+len for an exact match, 120+len for a whole-word match, 80+len for a substring.
fn name_score(layout_name: &str, candidates: &[String]) -> usize {
    let padded = format!(" {layout_name} ");
    candidates
        .iter()
        .filter(|c| !c.is_empty())
        .map(|c| {
            if layout_name == c {
                200 + c.len()
            } else if padded.contains(&format!(" {c} ")) {
                120 + c.len()
            } else if layout_name.contains(c.as_str()) {
                80 + c.len()
            } else {
                0
            }
        })
        .max()
        .unwrap_or(0)
}

#[cfg(test)]
#[path = "../../tests/unit/layout/resolve.rs"]
mod tests;
