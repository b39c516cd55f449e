use crate::assemble::json::read_deck;
use crate::deck::{ChartPlan, Paragraph, PlannedSlide, Shape, ShapeKind, TextAlign};
use crate::foundation::core::{ArrowDirection, BoxGeometry, Rgb, SlideSize};
use crate::foundation::error::{DeckError, DeckResult};
use crate::render::{SnapshotFormat, SnapshotRenderer, prepare_out_dir};
use crate::spec::model::ChartKind;
use image::RgbImage;
use kurbo::{Affine, BezPath, Circle, Point, Rect, RoundedRect};
use std::path::{Path, PathBuf};

const POINTS_PER_INCH: f64 = 72.0;
/// Average glyph advance as a fraction of the font size.
const CHAR_WIDTH_EM: f64 = 0.5;
const LINE_HEIGHT_EM: f64 = 1.2;
/// Ink band height as a fraction of the font size.
const INK_EM: f64 = 0.7;
/// Inner text padding in inches.
const TEXT_PAD: f64 = 0.08;
const BULLET_INDENT: f64 = 0.25;
const WHITE: Rgb = Rgb::new(255, 255, 255);
const SERIES_COLORS: [Rgb; 4] = [
    Rgb::new(2, 132, 199),
    Rgb::new(249, 115, 22),
    Rgb::new(34, 197, 94),
    Rgb::new(168, 85, 247),
];

/// Characters that fit on one line of `width` inches at `size_pt`.
pub fn chars_per_line(width: f64, size_pt: f64) -> usize {
    let advance = (size_pt * CHAR_WIDTH_EM / POINTS_PER_INCH).max(1e-6);
    ((width / advance).floor() as usize).max(1)
}

/// Estimated wrapped line count of `text` in a box `width` inches wide.
///
/// Each `\n`-separated line wraps independently; an empty line still takes one line.
pub fn wrapped_line_count(text: &str, width: f64, size_pt: f64) -> usize {
    let cpl = chars_per_line(width, size_pt);
    text.split('\n')
        .map(|line| line.chars().count().div_ceil(cpl).max(1))
        .sum()
}

fn luminance(c: Rgb) -> f64 {
    0.299 * f64::from(c.r) + 0.587 * f64::from(c.g) + 0.114 * f64::from(c.b)
}

/// Dark ink on light surfaces, light ink on dark ones.
fn contrasting_ink(surface: Rgb) -> Rgb {
    if luminance(surface) > 128.0 {
        Rgb::new(15, 23, 42)
    } else {
        Rgb::new(241, 245, 249)
    }
}

/// Arrow outline in unit space, pointing right.
const ARROW_UNIT: [(f64, f64); 7] = [
    (0.0, 0.3),
    (0.6, 0.3),
    (0.6, 0.0),
    (1.0, 0.5),
    (0.6, 1.0),
    (0.6, 0.7),
    (0.0, 0.7),
];

fn arrow_path(b: &Rect, direction: ArrowDirection) -> BezPath {
    let (w, h) = (b.width(), b.height());
    let map = |(u, v): (f64, f64)| -> Point {
        let (fx, fy) = match direction {
            ArrowDirection::Right => (u, v),
            ArrowDirection::Left => (1.0 - u, v),
            ArrowDirection::Down => (v, u),
            ArrowDirection::Up => (v, 1.0 - u),
        };
        Point::new(b.x0 + fx * w, b.y0 + fy * h)
    };
    let mut path = BezPath::new();
    for (i, p) in ARROW_UNIT.into_iter().map(map).enumerate() {
        if i == 0 {
            path.move_to(p);
        } else {
            path.line_to(p);
        }
    }
    path.close_path();
    path
}

/// Rasterizes deck files written by [`crate::JsonAssembler`].
///
/// Shapes are filled flat; text is drawn as ink bands whose extent follows the estimated line
/// wrapping, so overfull boxes spill downward the way real text would.
#[derive(Clone, Copy, Debug)]
pub struct PreviewRenderer {
    pixels_per_inch: f64,
}

impl Default for PreviewRenderer {
    fn default() -> Self {
        Self {
            pixels_per_inch: 96.0,
        }
    }
}

impl PreviewRenderer {
    /// Renderer at a given resolution.
    pub fn with_pixels_per_inch(pixels_per_inch: f64) -> Self {
        Self {
            pixels_per_inch: pixels_per_inch.max(8.0),
        }
    }

    /// Rasterize one planned slide.
    pub fn rasterize(&self, slide_size: SlideSize, slide: &PlannedSlide) -> RgbImage {
        let s = self.pixels_per_inch;
        let w = ((slide_size.width * s).round() as u32).max(1);
        let h = ((slide_size.height * s).round() as u32).max(1);
        let background = slide.background.unwrap_or(WHITE);
        let mut canvas = Canvas {
            img: RgbImage::from_pixel(w, h, image::Rgb(background.to_array())),
            scale: s,
        };
        for shape in &slide.shapes {
            canvas.draw_shape(shape, background);
        }
        canvas.img
    }
}

impl SnapshotRenderer for PreviewRenderer {
    #[tracing::instrument(skip(self))]
    fn render(
        &self,
        document: &Path,
        out_dir: &Path,
        format: SnapshotFormat,
    ) -> DeckResult<Vec<PathBuf>> {
        let deck = read_deck(document).map_err(|e| DeckError::render(e.to_string()))?;
        prepare_out_dir(out_dir, format)?;
        let mut images = Vec::with_capacity(deck.slides.len());
        for (i, slide) in deck.slides.iter().enumerate() {
            let img = self.rasterize(deck.slide_size, slide);
            let path = out_dir.join(format!("Slide{}.{}", i + 1, format.extension()));
            img.save_with_format(&path, format.image_format())
                .map_err(|e| {
                    DeckError::render(format!("failed to write '{}': {e}", path.display()))
                })?;
            images.push(path);
        }
        tracing::debug!(images = images.len(), "preview rendered");
        Ok(images)
    }
}

struct Canvas {
    img: RgbImage,
    scale: f64,
}

impl Canvas {
    fn px_rect(&self, b: &BoxGeometry) -> Rect {
        Affine::scale(self.scale).transform_rect_bbox(b.to_rect())
    }

    fn fill(&mut self, shape: &impl kurbo::Shape, color: Rgb) {
        let bbox = shape.bounding_box();
        let (w, h) = (f64::from(self.img.width()), f64::from(self.img.height()));
        let x0 = bbox.x0.max(0.0).floor() as u32;
        let y0 = bbox.y0.max(0.0).floor() as u32;
        let x1 = bbox.x1.min(w).ceil().max(0.0) as u32;
        let y1 = bbox.y1.min(h).ceil().max(0.0) as u32;
        let px = image::Rgb(color.to_array());
        for y in y0..y1 {
            for x in x0..x1 {
                if shape.contains(Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5)) {
                    self.img.put_pixel(x, y, px);
                }
            }
        }
    }

    fn draw_shape(&mut self, shape: &Shape, background: Rgb) {
        let rect = self.px_rect(&shape.bounds);
        let fill = shape.fill.map(|c| c.rgb);
        let line = shape.line.map(|c| c.rgb);
        match &shape.kind {
            ShapeKind::RoundedRect => {
                let radius = rect.width().min(rect.height()) * 0.08;
                if let Some(line) = line {
                    self.fill(&RoundedRect::from_rect(rect, radius), line);
                }
                if let Some(fill) = fill {
                    let inner = if line.is_some() { rect.inset(-1.5) } else { rect };
                    self.fill(&RoundedRect::from_rect(inner, radius), fill);
                }
            }
            ShapeKind::Rect => {
                if let Some(c) = fill.or(line) {
                    // Hairlines still get one pixel row.
                    let r = if rect.height() < 1.0 {
                        Rect::new(rect.x0, rect.y0, rect.x1, rect.y0 + 1.0)
                    } else {
                        rect
                    };
                    self.fill(&r, c);
                }
            }
            ShapeKind::Arrow { direction } => {
                if let Some(c) = fill.or(line) {
                    self.fill(&arrow_path(&rect, *direction), c);
                }
            }
            ShapeKind::Picture { path } => self.draw_picture(path, rect),
            ShapeKind::Chart(plan) => self.draw_chart(plan, rect, background),
            ShapeKind::Text { .. } => {
                if let Some(fill) = fill {
                    self.fill(&rect, fill);
                }
            }
        }

        if !shape.paragraphs.is_empty() {
            let surface = fill.unwrap_or(background);
            let centered = !matches!(shape.kind, ShapeKind::Text { .. });
            self.draw_text(&shape.paragraphs, &shape.bounds, surface, centered);
        }
    }

    fn draw_picture(&mut self, path: &Path, rect: Rect) {
        let (w, h) = (rect.width().round() as u32, rect.height().round() as u32);
        if w == 0 || h == 0 {
            return;
        }
        match image::open(path) {
            Ok(src) => {
                let filter = image::imageops::FilterType::Triangle;
                let scaled = image::imageops::resize(&src.to_rgb8(), w, h, filter);
                image::imageops::overlay(
                    &mut self.img,
                    &scaled,
                    rect.x0.round() as i64,
                    rect.y0.round() as i64,
                );
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "picture unreadable; drawing placeholder"
                );
                self.fill(&rect, Rgb::new(148, 163, 184));
            }
        }
    }

    fn draw_chart(&mut self, plan: &ChartPlan, rect: Rect, background: Rgb) {
        let frame = contrasting_ink(background);
        let plot = rect.inset(-rect.width().min(rect.height()) * 0.08);
        if matches!(plan.chart_type, ChartKind::Pie | ChartKind::Donut) {
            let r = plot.width().min(plot.height()) / 2.0;
            self.fill(&Circle::new(plot.center(), r), SERIES_COLORS[0]);
            if plan.chart_type == ChartKind::Donut {
                self.fill(&Circle::new(plot.center(), r * 0.5), background);
            }
            return;
        }

        // Axis.
        self.fill(
            &Rect::new(plot.x0, plot.y1 - 1.0, plot.x1, plot.y1),
            frame,
        );
        let max = plan
            .series
            .iter()
            .flat_map(|s| s.values.iter().copied())
            .filter(|v| v.is_finite())
            .fold(0.0_f64, f64::max);
        let categories = plan
            .categories
            .len()
            .max(plan.series.iter().map(|s| s.values.len()).max().unwrap_or(0));
        if max <= 0.0 || categories == 0 || plan.series.is_empty() {
            return;
        }
        let slot = plot.width() / categories as f64;
        let bar = slot * 0.7 / plan.series.len() as f64;
        for (si, series) in plan.series.iter().enumerate() {
            let color = SERIES_COLORS[si % SERIES_COLORS.len()];
            for (ci, v) in series.values.iter().enumerate() {
                let frac = (v / max).clamp(0.0, 1.0);
                let x = plot.x0 + ci as f64 * slot + slot * 0.15 + si as f64 * bar;
                let top = plot.y1 - frac * plot.height();
                self.fill(&Rect::new(x, top, x + bar, plot.y1), color);
            }
        }
    }

    /// Ink bands for each wrapped line. Top-anchored for text frames, vertically centered in
    /// filled shapes. Bands are not clipped to the box.
    fn draw_text(
        &mut self,
        paragraphs: &[Paragraph],
        b: &BoxGeometry,
        surface: Rgb,
        centered: bool,
    ) {
        let inner_w = (b.width - 2.0 * TEXT_PAD).max(0.05);
        let total_h: f64 = paragraphs
            .iter()
            .map(|p| {
                let w = if p.bullet { inner_w - BULLET_INDENT } else { inner_w };
                let lines = wrapped_line_count(&p.text, w.max(0.05), p.size_pt) as f64;
                lines * p.size_pt * LINE_HEIGHT_EM / POINTS_PER_INCH
            })
            .sum();
        let mut y = if centered {
            b.y + ((b.height - total_h) / 2.0).max(TEXT_PAD)
        } else {
            b.y + TEXT_PAD
        };

        for p in paragraphs {
            let ink = p.color.map_or_else(|| contrasting_ink(surface), |c| c.rgb);
            let line_h = p.size_pt * LINE_HEIGHT_EM / POINTS_PER_INCH;
            let ink_h = p.size_pt * INK_EM / POINTS_PER_INCH;
            let advance = p.size_pt * CHAR_WIDTH_EM / POINTS_PER_INCH;
            let indent = if p.bullet { BULLET_INDENT } else { 0.0 };
            let width = (inner_w - indent).max(0.05);
            let cpl = chars_per_line(width, p.size_pt);

            for (li, line) in p.text.split('\n').enumerate() {
                let mut remaining = line.chars().count();
                let mut first = true;
                loop {
                    let band_top = y + (line_h - ink_h) / 2.0;
                    if p.bullet && li == 0 && first {
                        let dot = ink_h * 0.5;
                        let bx = b.x + TEXT_PAD + (BULLET_INDENT - dot) / 2.0;
                        let by = band_top + (ink_h - dot) / 2.0;
                        let dot_box = BoxGeometry::new(bx, by, dot, dot);
                        let r = self.px_rect(&dot_box);
                        self.fill(&r, ink);
                    }
                    let chars = remaining.min(cpl);
                    if chars > 0 {
                        let band_w = (chars as f64 * advance).min(width);
                        let x = match p.align {
                            TextAlign::Left => b.x + TEXT_PAD + indent,
                            TextAlign::Center => b.x + (b.width - band_w) / 2.0,
                            TextAlign::Right => b.right() - TEXT_PAD - band_w,
                        };
                        let band = self.px_rect(&BoxGeometry::new(x, band_top, band_w, ink_h));
                        self.fill(&band, ink);
                    }
                    y += line_h;
                    remaining -= chars;
                    first = false;
                    if remaining == 0 {
                        break;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/preview.rs"]
mod tests;
