//! Deck planning: every slide resolved to a layout and a list of positioned, colored shapes.
//!
//! A [`DeckDocument`] is what the document assembler consumes. It carries no template
//! internals; the assembler pairs `layout.index` with the template it was planned against.

pub(crate) mod agenda;
pub(crate) mod build;
pub(crate) mod footer;
pub(crate) mod plan;

use crate::foundation::core::{ArrowDirection, BoxGeometry, Rgb, SlideSize};
use crate::layout::resolve::{LayoutResolution, ResolutionSource};
use crate::spec::model::{ChartKind, ChartSeries, LegendPosition, SlideKind};
use crate::template::capability::PlaceholderRole;
use crate::theme::palette::{ResolvedColor, ThemeName};
use std::path::PathBuf;

/// A fully planned deck.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DeckDocument {
    /// Slide dimensions in inches.
    pub slide_size: SlideSize,
    /// Color theme the deck was planned with.
    pub theme: ThemeName,
    /// Template the layouts refer to, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<PathBuf>,
    /// Slides in output order.
    pub slides: Vec<PlannedSlide>,
}

impl DeckDocument {
    /// Output slide position of each spec slide, indexed by spec position.
    pub fn source_positions(&self, spec_len: usize) -> Vec<Option<usize>> {
        let mut out = vec![None; spec_len];
        for (pos, slide) in self.slides.iter().enumerate() {
            if let Some(src) = slide.source_index
                && let Some(slot) = out.get_mut(src)
            {
                *slot = Some(pos);
            }
        }
        out
    }
}

/// Which template layout a slide uses.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LayoutRef {
    /// Template layout index; `None` for the synthetic blank.
    pub index: Option<usize>,
    /// Layout name.
    pub name: String,
    /// Resolution step that chose it.
    pub source: ResolutionSource,
}

impl From<&LayoutResolution> for LayoutRef {
    fn from(r: &LayoutResolution) -> Self {
        Self {
            index: r.layout.index(),
            name: r.layout.name().to_owned(),
            source: r.source,
        }
    }
}

/// One output slide.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PlannedSlide {
    /// Slide kind the shapes were built for.
    pub kind: SlideKind,
    /// Index into the spec's slide list; `None` for synthesized slides such as the agenda.
    pub source_index: Option<usize>,
    /// Resolved layout.
    pub layout: LayoutRef,
    /// Solid background, when the theme paints one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<Rgb>,
    /// Shapes in z-order.
    pub shapes: Vec<Shape>,
}

/// A positioned shape.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Shape {
    /// What to draw.
    pub kind: ShapeKind,
    /// Where, in slide inches.
    pub bounds: BoxGeometry,
    /// Fill color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<ResolvedColor>,
    /// Outline color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<ResolvedColor>,
    /// Text content, top to bottom.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub paragraphs: Vec<Paragraph>,
}

impl Shape {
    /// A shape with no colors or text.
    pub fn new(kind: ShapeKind, bounds: BoxGeometry) -> Self {
        Self {
            kind,
            bounds,
            fill: None,
            line: None,
            paragraphs: Vec::new(),
        }
    }

    /// A free text box.
    pub fn text(bounds: BoxGeometry, paragraphs: Vec<Paragraph>) -> Self {
        Self {
            paragraphs,
            ..Self::new(ShapeKind::Text { placeholder: None }, bounds)
        }
    }

    /// Text placed into a layout placeholder.
    pub fn placeholder(
        role: PlaceholderRole,
        bounds: BoxGeometry,
        paragraphs: Vec<Paragraph>,
    ) -> Self {
        Self {
            paragraphs,
            ..Self::new(
                ShapeKind::Text {
                    placeholder: Some(role),
                },
                bounds,
            )
        }
    }

    /// Set fill and outline.
    pub fn styled(mut self, fill: Option<ResolvedColor>, line: Option<ResolvedColor>) -> Self {
        self.fill = fill;
        self.line = line;
        self
    }

    /// Concatenated paragraph text.
    pub fn plain_text(&self) -> String {
        self.paragraphs
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Shape variants.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ShapeKind {
    /// Text frame, optionally bound to a layout placeholder.
    Text {
        /// Placeholder the text fills.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        placeholder: Option<PlaceholderRole>,
    },
    /// Rounded rectangle (diagram boxes, cards).
    RoundedRect,
    /// Plain rectangle (divider lines).
    Rect,
    /// Block arrow.
    Arrow {
        /// Pointing direction.
        direction: ArrowDirection,
    },
    /// Raster image.
    Picture {
        /// Image file.
        path: PathBuf,
    },
    /// Native chart.
    Chart(ChartPlan),
}

/// Chart content.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ChartPlan {
    /// Chart type.
    pub chart_type: ChartKind,
    /// Category labels.
    pub categories: Vec<String>,
    /// Data series, each as long as `categories` or shorter.
    pub series: Vec<ChartSeries>,
    /// Legend placement; [`LegendPosition::None`] hides it.
    pub legend: LegendPosition,
}

/// Horizontal text alignment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    /// Flush left.
    #[default]
    Left,
    /// Centered.
    Center,
    /// Flush right.
    Right,
}

/// A run of text with uniform formatting.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Paragraph {
    /// Text without bullet glyph.
    pub text: String,
    /// Font size in points.
    pub size_pt: f64,
    /// Bold weight.
    #[serde(default)]
    pub bold: bool,
    /// Italic style.
    #[serde(default)]
    pub italic: bool,
    /// Bulleted paragraph.
    #[serde(default)]
    pub bullet: bool,
    /// Alignment.
    #[serde(default)]
    pub align: TextAlign,
    /// Text color; `None` inherits from the placeholder or template.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<ResolvedColor>,
}

impl Paragraph {
    /// Plain left-aligned paragraph.
    pub fn new(text: impl Into<String>, size_pt: f64) -> Self {
        Self {
            text: text.into(),
            size_pt,
            bold: false,
            italic: false,
            bullet: false,
            align: TextAlign::Left,
            color: None,
        }
    }

    /// Bold variant.
    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Italic variant.
    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    /// Bulleted variant.
    pub fn bulleted(mut self) -> Self {
        self.bullet = true;
        self
    }

    /// Aligned variant.
    pub fn aligned(mut self, align: TextAlign) -> Self {
        self.align = align;
        self
    }

    /// Colored variant.
    pub fn colored(mut self, color: Option<ResolvedColor>) -> Self {
        self.color = color;
        self
    }
}

/// Accept `\r\n` line endings and literal `\n` escapes written into JSON strings.
pub fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n").replace("\\n", "\n")
}
