use crate::layout::resolve::LayoutPins;
use crate::spec::model::{AgendaSetting, PresentationSpec, SlideContent, SlideKind, SlideSpec};

/// Entries beyond this count switch the agenda to two columns.
const SINGLE_COLUMN_MAX: usize = 10;

/// A synthesized agenda slide and where it goes.
#[derive(Clone, Debug, PartialEq)]
pub struct AgendaPlan {
    /// Output position, counted before insertion.
    pub insert_at: usize,
    /// The agenda slide.
    pub slide: SlideSpec,
    /// Entry texts in deck order.
    pub entries: Vec<String>,
    /// Explicit layout pins from the agenda settings.
    pub template_layout: Option<String>,
    /// Explicit index pin from the agenda settings.
    pub template_layout_index: Option<i64>,
}

impl AgendaPlan {
    /// Pins for layout resolution.
    pub fn pins(&self) -> LayoutPins<'_> {
        LayoutPins {
            index: self.template_layout_index,
            name: self.template_layout.as_deref(),
        }
    }
}

/// Agenda entry for a slide: `agenda_title` or the title, unless the slide is a title slide or
/// excluded.
fn entry_for(slide: &SlideSpec) -> Option<String> {
    if slide.kind() == SlideKind::Title || slide.common.agenda_exclude == Some(true) {
        return None;
    }
    slide
        .common
        .agenda_title
        .as_deref()
        .filter(|t| !t.trim().is_empty())
        .or_else(|| slide.title_text())
        .map(|t| t.trim().to_owned())
}

/// Plan the agenda slide, if the deck asks for one and has something to list.
///
/// The agenda is opt-in: `"agenda": true` or an object without `"enabled": false`.
pub fn plan_agenda(spec: &PresentationSpec) -> Option<AgendaPlan> {
    let (title, layout_name, layout_index) = match spec.agenda.as_ref()? {
        AgendaSetting::Enabled(false) => return None,
        AgendaSetting::Enabled(true) => (None, None, None),
        AgendaSetting::Config(cfg) => {
            if cfg.enabled == Some(false) {
                return None;
            }
            (
                cfg.title.clone(),
                cfg.template_layout.clone(),
                cfg.template_layout_index,
            )
        }
    };
    if spec.slides.len() <= 1 {
        return None;
    }

    let entries: Vec<String> = spec.slides.iter().filter_map(entry_for).collect();
    if entries.is_empty() {
        return None;
    }

    let title = title
        .map(|t| t.trim().to_owned())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| "Agenda".to_owned());

    let slide = if entries.len() <= SINGLE_COLUMN_MAX {
        SlideSpec::bullets(title, entries.iter().cloned())
    } else {
        let half = entries.len().div_ceil(2);
        let column = |items: &[String]| {
            items
                .iter()
                .map(|t| format!("• {t}"))
                .collect::<Vec<_>>()
                .join("\n")
        };
        SlideSpec::new(SlideContent::TwoColumn {
            title: Some(title),
            left: column(&entries[..half]),
            right: column(&entries[half..]),
        })
    };

    let insert_at = usize::from(spec.slides.first().map(SlideSpec::kind) == Some(SlideKind::Title));
    tracing::debug!(entries = entries.len(), insert_at, "agenda planned");
    Some(AgendaPlan {
        insert_at,
        slide,
        entries,
        template_layout: layout_name,
        template_layout_index: layout_index,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/deck/agenda.rs"]
mod tests;
