use crate::deck::{Paragraph, Shape, ShapeKind, TextAlign};
use crate::foundation::core::{BoxGeometry, SlideSize};
use crate::spec::model::{FooterSetting, PresentationSpec, SlideKind, SlideSpec};
use crate::theme::palette::FooterPalette;

/// Footer settings with every default applied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FooterPlan {
    /// Deck title shown in the footer.
    pub title: String,
    /// Confidentiality marker.
    pub confidentiality: String,
    /// Also place the footer on title slides.
    pub include_on_title: bool,
    /// Number footer-bearing slides.
    pub show_page_number: bool,
    /// Render numbers as `n/total`.
    pub show_total: bool,
}

impl FooterPlan {
    /// Footer for a deck; `None` when disabled. Enabled unless set to `false`.
    pub fn from_spec(spec: &PresentationSpec) -> Option<Self> {
        let cfg = match &spec.footer {
            Some(FooterSetting::Enabled(false)) => return None,
            Some(FooterSetting::Config(cfg)) if cfg.enabled == Some(false) => return None,
            Some(FooterSetting::Config(cfg)) => Some(cfg),
            Some(FooterSetting::Enabled(true)) | None => None,
        };
        let pick = |a: Option<&String>, b: Option<&String>| {
            a.or(b)
                .map(|s| s.trim().to_owned())
                .filter(|s| !s.is_empty())
        };
        Some(Self {
            title: pick(cfg.and_then(|c| c.title.as_ref()), spec.title.as_ref())
                .unwrap_or_default(),
            confidentiality: pick(
                cfg.and_then(|c| c.confidentiality.as_ref()),
                spec.confidentiality.as_ref(),
            )
            .unwrap_or_else(|| "Confidential".to_owned()),
            include_on_title: cfg.and_then(|c| c.include_on_title).unwrap_or(false),
            show_page_number: cfg.and_then(|c| c.show_page_number).unwrap_or(true),
            show_total: cfg.and_then(|c| c.show_total).unwrap_or(false),
        })
    }

    /// Whether `slide` carries a footer.
    pub fn applies_to(&self, slide: &SlideSpec) -> bool {
        if slide.common.footer_exclude == Some(true) {
            return false;
        }
        slide.kind() != SlideKind::Title || self.include_on_title
    }

    /// Page label for the `page`-th footer-bearing slide.
    pub fn page_label(&self, page: usize, total: usize) -> Option<String> {
        if !self.show_page_number {
            return None;
        }
        Some(if self.show_total && total > 0 {
            format!("{page}/{total}")
        } else {
            page.to_string()
        })
    }

    fn text_parts(&self) -> Vec<&str> {
        [self.title.as_str(), self.confidentiality.as_str()]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// Footer shapes for one slide.
    ///
    /// Template themes get a single right-aligned text box kept clear of brand marks at the
    /// bottom left; built-in themes get a divider line, left text and a right page number.
    pub fn shapes(
        &self,
        slide: SlideSize,
        page_label: Option<&str>,
        palette: &FooterPalette,
        template_theme: bool,
    ) -> Vec<Shape> {
        let (w, h) = (slide.width, slide.height);
        let text = Some(palette.text);
        if template_theme {
            let mut parts = self.text_parts();
            parts.extend(page_label);
            let joined = parts.join(" • ");
            if joined.trim().is_empty() {
                return Vec::new();
            }
            let (box_w, box_h) = (4.8, 0.26);
            let bounds = BoxGeometry::new(
                (w - 0.55 - box_w).max(0.5),
                h - box_h - 0.18,
                box_w,
                box_h,
            );
            return vec![Shape::text(
                bounds,
                vec![Paragraph::new(joined, 10.0)
                    .aligned(TextAlign::Right)
                    .colored(text)],
            )];
        }

        let margin_x = 0.5;
        let footer_h = 0.28;
        let footer_y = h - footer_h - 0.06;
        let page_w = 1.0;

        let mut shapes = vec![
            Shape::new(
                ShapeKind::Rect,
                BoxGeometry::new(margin_x, footer_y - 0.03, w - 2.0 * margin_x, 0.01),
            )
            .styled(Some(palette.line), None),
        ];
        let left = self.text_parts().join(" | ");
        if !left.is_empty() {
            shapes.push(Shape::text(
                BoxGeometry::new(
                    margin_x,
                    footer_y,
                    (w - 2.0 * margin_x - page_w).max(1.0),
                    footer_h,
                ),
                vec![Paragraph::new(left, 9.0).colored(text)],
            ));
        }
        if let Some(label) = page_label {
            shapes.push(Shape::text(
                BoxGeometry::new(w - margin_x - page_w, footer_y, page_w, footer_h),
                vec![Paragraph::new(label, 9.0)
                    .aligned(TextAlign::Right)
                    .colored(text)],
            ));
        }
        shapes
    }
}

#[cfg(test)]
#[path = "../../tests/unit/deck/footer.rs"]
mod tests;
