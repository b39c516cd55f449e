use crate::assets::{AssetProvider, ImageRequest, image_pixel_size};
use crate::deck::{ChartPlan, Paragraph, Shape, ShapeKind, TextAlign, normalize_newlines};
use crate::foundation::core::{BoxGeometry, SlideSize};
use crate::geometry::ConnectorGeometry;
use crate::geometry::architecture::layout_architecture;
use crate::geometry::cards::{card_icon_slot, layout_cards};
use crate::geometry::region::{
    contain, content_region, diagram_region, split_columns, two_column_region,
};
use crate::geometry::workflow::{layout_steps, step_header};
use crate::spec::model::{
    CardNode, ChartSeries, LegendPosition, Orientation, SlideContent, SlideSpec, StepNode,
};
use crate::template::capability::{PlaceholderCapabilitySet, PlaceholderRole};
use crate::theme::palette::{DiagramPalette, PaletteScopes, ResolvedColor, ThemeResolver};

/// Everything a slide's shapes depend on besides its own content.
pub(crate) struct SlideContext<'a> {
    pub slide_size: SlideSize,
    pub caps: Option<&'a PlaceholderCapabilitySet>,
    /// A template is loaded and its theme supplies the colors.
    pub template_theme: bool,
    pub theme: &'a ThemeResolver,
    pub scopes: PaletteScopes<'a>,
    pub assets: &'a dyn AssetProvider,
}

/// Text colors of built-in themes; template themes inherit from their placeholders.
#[derive(Clone, Copy, Default)]
struct Ink {
    title: Option<ResolvedColor>,
    primary: Option<ResolvedColor>,
    secondary: Option<ResolvedColor>,
}

fn ink(theme: &ThemeResolver) -> Ink {
    match theme.theme().base_colors() {
        Some(b) => Ink {
            title: Some(ResolvedColor::literal(b.accent)),
            primary: Some(ResolvedColor::literal(b.text_primary)),
            secondary: Some(ResolvedColor::literal(b.text_secondary)),
        },
        None => Ink::default(),
    }
}

fn architecture_defaults() -> (Vec<StepNode>, Vec<StepNode>, StepNode) {
    (
        vec![
            StepNode::with_subtitle("React + Vite", "Frontend"),
            StepNode::with_subtitle("FastAPI", "Backend APIs"),
            StepNode::with_subtitle("LangGraph", "Orchestrator + Agents"),
        ],
        vec![
            StepNode::with_subtitle("Vector Store", "FAISS • Pinecone • Chroma"),
            StepNode::with_subtitle("Database", "SQLite • Postgres"),
            StepNode::with_subtitle("Exports", "DOCX • PDF • HTML • PPTX"),
        ],
        StepNode::with_subtitle("LLM Providers", "via LangChain (configurable)"),
    )
}

/// Nodes with a non-empty title.
fn present(nodes: &[StepNode]) -> Vec<&StepNode> {
    nodes.iter().filter(|n| !n.title.trim().is_empty()).collect()
}

/// Font size of a KPI value, shrinking for long values.
fn kpi_value_size(value: &str, template_theme: bool) -> f64 {
    let len = value.trim().chars().count();
    let size: f64 = if len >= 12 {
        18.0
    } else if len >= 9 {
        22.0
    } else {
        28.0
    };
    if template_theme {
        (size - 3.0).max(16.0)
    } else {
        size
    }
}

struct SlideBuilder<'c, 'a> {
    ctx: &'c SlideContext<'a>,
    ink: Ink,
    shapes: Vec<Shape>,
}

/// Shapes for one slide's content (footer excluded).
pub(crate) fn build_shapes(slide: &SlideSpec, ctx: &SlideContext<'_>) -> Vec<Shape> {
    let mut b = SlideBuilder {
        ctx,
        ink: ink(ctx.theme),
        shapes: Vec::new(),
    };
    b.build(slide);
    b.shapes
}

impl SlideBuilder<'_, '_> {
    fn slide_w(&self) -> f64 {
        self.ctx.slide_size.width
    }

    fn placeholder(&self, role: PlaceholderRole) -> Option<BoxGeometry> {
        self.ctx
            .caps
            .and_then(|c| c.largest(role))
            .map(|p| p.bounds)
    }

    /// Title into the layout's title placeholder (template themes) or a free text box at `y`.
    fn title(&mut self, title: Option<&str>, y: f64) {
        let Some(title) = title else {
            return;
        };
        if self.ctx.template_theme
            && let Some(bounds) = self.placeholder(PlaceholderRole::Title)
        {
            self.shapes.push(Shape::placeholder(
                PlaceholderRole::Title,
                bounds,
                vec![Paragraph::new(title, 32.0)],
            ));
            return;
        }
        let y = if self.ctx.template_theme { 0.25 } else { y };
        self.shapes.push(Shape::text(
            BoxGeometry::new(0.5, y, self.slide_w() - 1.0, 0.8),
            vec![Paragraph::new(title, 40.0).bold().colored(self.ink.title)],
        ));
    }

    fn region(&self, has_title: bool) -> BoxGeometry {
        content_region(
            self.ctx.caps,
            self.ctx.slide_size,
            has_title,
            self.ctx.template_theme,
        )
    }

    fn build(&mut self, slide: &SlideSpec) {
        let title = slide.title_text();
        match &slide.content {
            SlideContent::Title { title, subtitle } => self.cover(title, subtitle.as_deref()),
            SlideContent::Bullets { bullets, .. } => self.bullets(title, bullets),
            SlideContent::TwoColumn { left, right, .. } => self.two_column(title, left, right),
            SlideContent::Chart {
                chart_type,
                categories,
                series,
                legend,
                ..
            } => {
                self.title(title, 0.4);
                self.chart(
                    title.is_some(),
                    ChartPlan {
                        chart_type: chart_type.unwrap_or_default(),
                        categories: categories.clone().unwrap_or_default(),
                        series: series.clone().unwrap_or_default(),
                        legend: legend.unwrap_or(LegendPosition::Right),
                    },
                )
            }
            SlideContent::Image {
                image_path,
                image_gen,
                caption,
                ..
            } => {
                self.title(title, 0.2);
                let request = ImageRequest {
                    path: image_path.as_deref(),
                    generate: image_gen.as_ref(),
                    title,
                };
                self.image(title.is_some(), &request, caption.as_deref());
            }
            SlideContent::Workflow {
                steps,
                orientation,
                show_numbers,
                ..
            } => {
                self.title(title, 0.25);
                self.workflow(
                    title.is_some(),
                    steps,
                    orientation.unwrap_or_default(),
                    show_numbers.unwrap_or(true),
                );
            }
            SlideContent::Architecture {
                top_row,
                middle_row,
                bottom,
                ..
            } => {
                self.title(title, 0.25);
                self.architecture(
                    title.is_some(),
                    top_row.as_deref(),
                    middle_row.as_deref(),
                    bottom.as_deref(),
                );
            }
            SlideContent::KpiCards { cards, columns, .. } => {
                self.title(title, 0.25);
                self.cards(title.is_some(), cards, *columns);
            }
            SlideContent::Blank { .. } => self.title(title, 0.4),
        }
    }

    fn cover(&mut self, title: &str, subtitle: Option<&str>) {
        let subtitle = subtitle.filter(|s| !s.trim().is_empty());
        if self.ctx.template_theme
            && let Some(bounds) = self.placeholder(PlaceholderRole::Title)
        {
            self.shapes.push(Shape::placeholder(
                PlaceholderRole::Title,
                bounds,
                vec![Paragraph::new(title, 40.0)],
            ));
            if let Some(sub) = subtitle {
                match self.placeholder(PlaceholderRole::Subtitle) {
                    Some(b) => self.shapes.push(Shape::placeholder(
                        PlaceholderRole::Subtitle,
                        b,
                        vec![Paragraph::new(sub, 24.0)],
                    )),
                    None => self.cover_subtitle(sub),
                }
            }
            return;
        }

        let w = self.slide_w() - 1.0;
        self.shapes.push(Shape::text(
            BoxGeometry::new(0.5, 1.5, w, 1.5),
            vec![Paragraph::new(title, 54.0)
                .bold()
                .aligned(TextAlign::Center)
                .colored(self.ink.title)],
        ));
        if let Some(sub) = subtitle {
            self.cover_subtitle(sub);
        }
    }

    fn cover_subtitle(&mut self, subtitle: &str) {
        self.shapes.push(Shape::text(
            BoxGeometry::new(0.5, 3.2, self.slide_w() - 1.0, 1.0),
            vec![Paragraph::new(subtitle, 28.0)
                .aligned(TextAlign::Center)
                .colored(self.ink.secondary)],
        ));
    }

    fn bullets(&mut self, title: Option<&str>, bullets: &[String]) {
        let paragraphs: Vec<Paragraph> = bullets
            .iter()
            .map(|b| {
                let cleaned = b.trim_start().trim_start_matches('•').trim_start();
                Paragraph::new(cleaned, 20.0)
                    .bulleted()
                    .colored(self.ink.primary)
            })
            .collect();

        if self.ctx.template_theme
            && let Some(body) = self.placeholder(PlaceholderRole::Body)
        {
            self.title(title, 0.25);
            self.shapes
                .push(Shape::placeholder(PlaceholderRole::Body, body, paragraphs));
            return;
        }
        self.title(title, 0.4);
        let region = self.region(true);
        self.shapes.push(Shape::text(region, paragraphs));
    }

    fn two_column(&mut self, title: Option<&str>, left: &str, right: &str) {
        let (left, right) = (normalize_newlines(left), normalize_newlines(right));
        if self.ctx.template_theme
            && let Some(caps) = self.ctx.caps
        {
            let pair = caps.left_right_bodies().map(|(l, r)| (l.bounds, r.bounds)).or_else(|| {
                let mut bodies: Vec<BoxGeometry> =
                    caps.with_role(PlaceholderRole::Body).map(|p| p.bounds).take(2).collect();
                if bodies.len() < 2 {
                    return None;
                }
                bodies.sort_by(|a, b| a.x.total_cmp(&b.x));
                Some((bodies[0], bodies[1]))
            });
            if let Some((lb, rb)) = pair {
                self.title(title, 0.25);
                for (bounds, text) in [(lb, &left), (rb, &right)] {
                    let paragraphs = text
                        .split('\n')
                        .map(|l| {
                            let line = l.trim_start().trim_start_matches('•').trim_start();
                            Paragraph::new(line, 18.0)
                        })
                        .collect();
                    self.shapes
                        .push(Shape::placeholder(PlaceholderRole::Body, bounds, paragraphs));
                }
                return;
            }
        }

        self.title(title, 0.4);
        let region = if self.ctx.template_theme {
            two_column_region(self.ctx.caps, self.ctx.slide_size, true)
        } else {
            self.region(true)
        };
        let (lb, rb) = split_columns(region);
        for (bounds, text) in [(lb, &left), (rb, &right)] {
            let paragraphs = self.column_paragraphs(text);
            self.shapes.push(Shape::text(bounds, paragraphs));
        }
    }

    /// Column text: `•`, `- ` and `* ` lines become bullets; a plain first line is a bold
    /// heading.
    fn column_paragraphs(&self, text: &str) -> Vec<Paragraph> {
        let base = if self.ctx.template_theme { 14.0 } else { 16.0 };
        text.split('\n')
            .enumerate()
            .map(|(i, line)| {
                let cleaned = line.trim();
                let is_bullet = cleaned.starts_with('•')
                    || cleaned.starts_with("- ")
                    || cleaned.starts_with("* ");
                if is_bullet {
                    let body = cleaned.trim_start_matches(['•', '-', '*']).trim_start();
                    return Paragraph::new(body, base)
                        .bulleted()
                        .colored(self.ink.primary);
                }
                let p = Paragraph::new(cleaned, base).colored(self.ink.primary);
                if i == 0 && !cleaned.is_empty() {
                    Paragraph {
                        size_pt: base + 1.0,
                        ..p.bold()
                    }
                } else {
                    p
                }
            })
            .collect()
    }

    fn chart(&mut self, has_title: bool, mut plan: ChartPlan) {
        if plan.categories.is_empty()
            && let Some(first) = plan.series.first()
        {
            plan.categories = (1..=first.values.len()).map(|i| format!("Item {i}")).collect();
        }
        if plan.series.is_empty() {
            plan.series = vec![ChartSeries {
                name: Some("Series".to_owned()),
                values: vec![0.0; plan.categories.len()],
            }];
        }
        let bounds = match self.placeholder(PlaceholderRole::Chart) {
            Some(b) if self.ctx.template_theme => b,
            _ => self.region(has_title),
        };
        self.shapes
            .push(Shape::new(ShapeKind::Chart(plan), bounds));
    }

    fn image(&mut self, has_title: bool, request: &ImageRequest<'_>, caption: Option<&str>) {
        match self.ctx.assets.resolve_or_generate(request) {
            Some(path) => {
                let slot = match self.placeholder(PlaceholderRole::Picture) {
                    Some(ph) if self.ctx.template_theme => {
                        // Keep clear of footer text and master marks.
                        let max_bottom = self.ctx.slide_size.height - 0.88;
                        let height = (max_bottom - ph.y).min(ph.height).max(1.0);
                        BoxGeometry::new(ph.x, ph.y, ph.width, height)
                    }
                    _ => self.region(has_title),
                };
                let bounds = match image_pixel_size(&path) {
                    Some((w, h)) => contain(w, h, slot),
                    None => slot,
                };
                self.shapes
                    .push(Shape::new(ShapeKind::Picture { path }, bounds));
            }
            None => tracing::warn!(
                image_path = request.path.unwrap_or(""),
                "image not available; slide left without picture"
            ),
        }

        if let Some(caption) = caption.filter(|c| !c.trim().is_empty()) {
            let h = self.ctx.slide_size.height;
            let (y, cap_h) = if self.ctx.template_theme {
                (h - 1.20, 0.28)
            } else {
                (h - 0.65, 0.35)
            };
            self.shapes.push(Shape::text(
                BoxGeometry::new(0.5, y, self.slide_w() - 1.0, cap_h),
                vec![Paragraph::new(caption, 12.0)
                    .italic()
                    .aligned(TextAlign::Center)
                    .colored(self.ink.secondary)],
            ));
        }
    }

    fn node_box(
        &mut self,
        bounds: BoxGeometry,
        header: String,
        subtitle: Option<&str>,
        palette: &DiagramPalette,
    ) {
        let mut paragraphs = vec![Paragraph::new(header, 16.0)
            .bold()
            .aligned(TextAlign::Center)
            .colored(Some(palette.text_primary))];
        if let Some(sub) = subtitle.map(str::trim).filter(|s| !s.is_empty()) {
            paragraphs.push(
                Paragraph::new(sub, 12.0)
                    .aligned(TextAlign::Center)
                    .colored(Some(palette.text_secondary)),
            );
        }
        self.shapes.push(Shape {
            paragraphs,
            ..Shape::new(ShapeKind::RoundedRect, bounds)
                .styled(Some(palette.fill), Some(palette.line))
        });
    }

    fn arrow(&mut self, connector: &ConnectorGeometry, palette: &DiagramPalette) {
        self.shapes.push(
            Shape::new(
                ShapeKind::Arrow {
                    direction: connector.direction,
                },
                connector.bounds,
            )
            .styled(Some(palette.arrow), Some(palette.arrow)),
        );
    }

    fn workflow(
        &mut self,
        has_title: bool,
        steps: &[StepNode],
        orientation: Orientation,
        numbered: bool,
    ) {
        let steps = present(steps);
        if steps.is_empty() {
            return;
        }
        let palette = self.ctx.theme.diagram_palette(self.ctx.scopes);
        let layout = layout_steps(steps.len(), self.region(has_title), orientation);
        for (i, (step, bounds)) in steps.iter().zip(&layout.boxes).enumerate() {
            let header = step_header(&step.title, numbered.then_some(i + 1));
            self.node_box(*bounds, header, step.subtitle.as_deref(), &palette);
        }
        for c in &layout.connectors {
            self.arrow(c, &palette);
        }
    }

    fn architecture(
        &mut self,
        has_title: bool,
        top: Option<&[StepNode]>,
        middle: Option<&[StepNode]>,
        bottom: Option<&[StepNode]>,
    ) {
        let (default_top, default_middle, default_bottom) = architecture_defaults();
        let pick = |nodes: Option<&[StepNode]>, fallback: Vec<StepNode>| -> Vec<StepNode> {
            let given: Vec<StepNode> = nodes
                .map(|n| present(n).into_iter().cloned().collect())
                .unwrap_or_default();
            if given.is_empty() { fallback } else { given }
        };
        let top = pick(top, default_top);
        let middle = pick(middle, default_middle);
        let bottom = pick(bottom, vec![default_bottom]);

        let palette = self.ctx.theme.diagram_palette(self.ctx.scopes);
        let region = diagram_region(self.ctx.slide_size, has_title, self.ctx.template_theme);
        let layout = layout_architecture(region);

        let rows = layout
            .top
            .iter()
            .zip(0..)
            .map(|(b, i)| (*b, top.get(i)))
            .chain(layout.middle.iter().zip(0..).map(|(b, i)| (*b, middle.get(i))))
            .chain(std::iter::once((layout.bottom, bottom.first())))
            .collect::<Vec<_>>();
        for (bounds, node) in rows {
            let header = node.map(|n| n.title.trim().to_owned()).unwrap_or_default();
            let subtitle = node.and_then(|n| n.subtitle.as_deref());
            self.node_box(bounds, header, subtitle, &palette);
        }
        for c in &layout.connectors {
            self.arrow(c, &palette);
        }
    }

    fn cards(&mut self, has_title: bool, cards: &[CardNode], columns: Option<i64>) {
        let cards: Vec<&CardNode> = cards.iter().filter(|c| !c.is_empty()).collect();
        if cards.is_empty() {
            return;
        }
        let palette = self.ctx.theme.diagram_palette(self.ctx.scopes);
        let grid = layout_cards(cards.len(), self.region(has_title), columns);
        let template = self.ctx.template_theme;

        for (card, cell) in cards.iter().zip(&grid.cells) {
            let mut paragraphs = Vec::new();
            let text_of = |s: &Option<String>| {
                s.as_deref()
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_owned)
            };
            match text_of(&card.value) {
                Some(value) => {
                    let size = kpi_value_size(&value, template);
                    paragraphs.push(
                        Paragraph::new(value, size)
                            .bold()
                            .colored(Some(palette.text_primary)),
                    );
                }
                None => paragraphs.push(Paragraph::new("", 12.0)),
            }
            if let Some(label) = text_of(&card.label) {
                let size = if template { 12.0 } else { 14.0 };
                paragraphs.push(
                    Paragraph::new(label, size)
                        .bold()
                        .colored(Some(palette.text_secondary)),
                );
            }
            if let Some(note) = text_of(&card.note) {
                let size = if template { 10.0 } else { 12.0 };
                paragraphs.push(Paragraph::new(note, size).colored(Some(palette.text_secondary)));
            }
            self.shapes.push(Shape {
                paragraphs,
                ..Shape::new(ShapeKind::RoundedRect, *cell)
                    .styled(Some(palette.fill), Some(palette.line))
            });

            if let Some(icon) = card.icon_path.as_deref() {
                let request = ImageRequest {
                    path: Some(icon),
                    ..ImageRequest::default()
                };
                if let Some(path) = self.ctx.assets.resolve_or_generate(&request) {
                    self.shapes
                        .push(Shape::new(ShapeKind::Picture { path }, card_icon_slot(cell)));
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/deck/build.rs"]
mod tests;
