use crate::foundation::core::{BoxGeometry, SlideSize};
use crate::template::capability::{PlaceholderCapabilitySet, PlaceholderRole};

/// Reference slide height the default region constants were tuned for.
const REFERENCE_HEIGHT: f64 = 5.625;
const MIN_REGION_HEIGHT: f64 = 0.6;

fn bottom_reserve(template_theme: bool) -> f64 {
    if template_theme { 0.75 } else { 0.45 }
}

/// Drawing area for slide content.
///
/// With a body placeholder, its largest instance minus a bottom reserve; otherwise a default
/// area under the title.
pub fn content_region(
    caps: Option<&PlaceholderCapabilitySet>,
    slide: SlideSize,
    has_title: bool,
    template_theme: bool,
) -> BoxGeometry {
    let reserve = bottom_reserve(template_theme);
    if let Some(body) = caps.and_then(|c| c.largest(PlaceholderRole::Body)) {
        let b = body.bounds;
        return BoxGeometry::new(
            b.x,
            b.y,
            b.width,
            (b.height - reserve).max(MIN_REGION_HEIGHT),
        );
    }

    let scale = slide.height / REFERENCE_HEIGHT;
    let (y, base_h) = if has_title { (1.35, 3.9) } else { (0.7, 4.5) };
    BoxGeometry::new(
        0.7,
        y * scale,
        (slide.width - 1.4).max(1.0),
        ((base_h - reserve) * scale).max(MIN_REGION_HEIGHT),
    )
}

/// Full-width drawing area for the architecture diagram.
pub fn diagram_region(slide: SlideSize, has_title: bool, template_theme: bool) -> BoxGeometry {
    let margin_x = 0.6;
    let top = if has_title { 1.35 } else { 0.75 };
    let reserve = if template_theme { 0.85 } else { 0.55 };
    BoxGeometry::new(
        margin_x,
        top,
        (slide.width - 2.0 * margin_x).max(1.0),
        (slide.height - top - reserve).max(1.0),
    )
}

/// Region for manually drawn two-column text in a template theme: the union of substantial
/// body placeholders kept clear of the title and the footer band, or a conservative default.
pub fn two_column_region(
    caps: Option<&PlaceholderCapabilitySet>,
    slide: SlideSize,
    has_title: bool,
) -> BoxGeometry {
    if let Some(caps) = caps {
        let substantial: Vec<BoxGeometry> = caps
            .with_role(PlaceholderRole::Body)
            .map(|p| p.bounds)
            .filter(|b| b.height >= 0.9)
            .collect();
        if !substantial.is_empty() {
            let left = substantial.iter().map(|b| b.x).fold(f64::INFINITY, f64::min);
            let mut top = substantial.iter().map(|b| b.y).fold(f64::INFINITY, f64::min);
            let right = substantial
                .iter()
                .map(BoxGeometry::right)
                .fold(f64::NEG_INFINITY, f64::max);
            let mut bottom = substantial
                .iter()
                .map(BoxGeometry::bottom)
                .fold(f64::NEG_INFINITY, f64::max);
            if let Some(title) = caps.first(PlaceholderRole::Title) {
                top = top.max(title.bounds.bottom() + 0.10);
            }
            bottom = bottom.min(slide.height - 0.90);
            if bottom - top >= 1.8 {
                return BoxGeometry::new(left, top, (right - left).max(1.6), bottom - top);
            }
        }
    }
    let y = if has_title { 1.50 } else { 0.85 };
    BoxGeometry::new(
        0.55,
        y,
        (slide.width - 1.1).max(1.0),
        (slide.height - y - 0.90).max(1.8),
    )
}

/// Split a region into two equal columns separated by a fixed gap.
pub fn split_columns(region: BoxGeometry) -> (BoxGeometry, BoxGeometry) {
    let gap = 0.35f64.min(region.width * 0.1);
    let col_w = ((region.width - gap) / 2.0).max(0.0);
    (
        BoxGeometry::new(region.x, region.y, col_w, region.height),
        BoxGeometry::new(region.x + col_w + gap, region.y, col_w, region.height),
    )
}

/// Fit an image of `pixel_w x pixel_h` inside `region`, keeping its aspect ratio and
/// centering it. Degenerate sizes fill the region.
pub fn contain(pixel_w: u32, pixel_h: u32, region: BoxGeometry) -> BoxGeometry {
    if pixel_w == 0 || pixel_h == 0 || region.width <= 0.0 || region.height <= 0.0 {
        return region;
    }
    let ratio = f64::from(pixel_w) / f64::from(pixel_h);
    let (w, h) = if ratio >= region.width / region.height {
        (region.width, region.width / ratio)
    } else {
        (region.height * ratio, region.height)
    };
    BoxGeometry::new(
        region.x + (region.width - w) / 2.0,
        region.y + (region.height - h) / 2.0,
        w,
        h,
    )
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/region.rs"]
mod tests;
