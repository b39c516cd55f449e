use crate::assets::AssetProvider;
use crate::deck::agenda::plan_agenda;
use crate::deck::build::{SlideContext, build_shapes};
use crate::deck::footer::FooterPlan;
use crate::deck::{DeckDocument, LayoutRef, PlannedSlide};
use crate::foundation::core::SlideSize;
use crate::layout::resolve::{LayoutResolution, LayoutResolver};
use crate::spec::model::{PresentationSpec, SlideSpec};
use crate::template::Template;
use crate::theme::palette::{PaletteScopes, ThemeName, ThemeResolver};

/// Turns a validated spec into a [`DeckDocument`].
///
/// Holds only borrowed, read-only run state; planning the same spec twice yields the same
/// document.
pub struct DeckPlanner<'a> {
    template: Option<&'a Template>,
    theme: &'a ThemeResolver,
    assets: &'a dyn AssetProvider,
}

/// A slide in output order, before shapes are built.
struct Entry<'s> {
    source_index: Option<usize>,
    slide: &'s SlideSpec,
    resolution: LayoutResolution,
}

impl<'a> DeckPlanner<'a> {
    /// Planner for one run.
    pub fn new(
        template: Option<&'a Template>,
        theme: &'a ThemeResolver,
        assets: &'a dyn AssetProvider,
    ) -> Self {
        Self {
            template,
            theme,
            assets,
        }
    }

    /// Slide size of the run: the template's, or 16:9.
    pub fn slide_size(&self) -> SlideSize {
        self.template
            .map_or(SlideSize::WIDESCREEN, |t| t.slide_size)
    }

    fn template_theme(&self) -> bool {
        self.template.is_some() && self.theme.theme() == ThemeName::Template
    }

    /// Plan every slide: agenda insertion, layout resolution, shapes and footers.
    #[tracing::instrument(skip_all, fields(slides = spec.slides.len()))]
    pub fn plan(&self, spec: &PresentationSpec) -> DeckDocument {
        let resolver = self
            .template
            .map_or_else(LayoutResolver::without_template, |t| {
                LayoutResolver::new(&t.layouts)
            });

        let agenda = plan_agenda(spec);
        let mut entries: Vec<Entry<'_>> = spec
            .slides
            .iter()
            .enumerate()
            .map(|(i, slide)| Entry {
                source_index: Some(i),
                slide,
                resolution: resolver.resolve(slide, slide.kind()),
            })
            .collect();

        if let Some(agenda) = &agenda {
            let resolution = resolver.resolve_agenda(agenda.slide.kind(), agenda.pins());
            tracing::debug!(
                entries = agenda.entries.len(),
                at = agenda.insert_at,
                "agenda inserted"
            );
            entries.insert(
                agenda.insert_at.min(entries.len()),
                Entry {
                    source_index: None,
                    slide: &agenda.slide,
                    resolution,
                },
            );
        }

        let footer = FooterPlan::from_spec(spec);
        let total = footer.as_ref().map_or(0, |f| {
            entries.iter().filter(|e| f.applies_to(e.slide)).count()
        });

        let slide_size = self.slide_size();
        let template_theme = self.template_theme();
        let background = self.theme.theme().base_colors().map(|b| b.background);
        let mut page = 0;
        let mut slides = Vec::with_capacity(entries.len());

        for (pos, entry) in entries.iter().enumerate() {
            let scopes = PaletteScopes {
                slide: entry.slide.common.palette.as_ref(),
                presentation: spec.palette.as_ref(),
            };
            let ctx = SlideContext {
                slide_size,
                caps: entry.resolution.layout.capabilities(),
                template_theme,
                theme: self.theme,
                scopes,
                assets: self.assets,
            };
            let mut shapes = build_shapes(entry.slide, &ctx);

            if let Some(footer) = footer.as_ref().filter(|f| f.applies_to(entry.slide)) {
                page += 1;
                let label = footer.page_label(page, total);
                shapes.extend(footer.shapes(
                    slide_size,
                    label.as_deref(),
                    &self.theme.footer_palette(scopes),
                    template_theme,
                ));
            }

            tracing::debug!(
                slide = pos + 1,
                kind = entry.slide.kind().as_str(),
                layout = entry.resolution.layout.name(),
                source = ?entry.resolution.source,
                shapes = shapes.len(),
                "slide planned"
            );
            slides.push(PlannedSlide {
                kind: entry.slide.kind(),
                source_index: entry.source_index,
                layout: LayoutRef::from(&entry.resolution),
                background,
                shapes,
            });
        }

        DeckDocument {
            slide_size,
            theme: self.theme.theme(),
            template: self.template.map(|t| t.source.clone()),
            slides,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/deck/plan.rs"]
mod tests;
