use image::RgbImage;
use std::path::Path;

/// Squared RGB distance above which a pixel counts as content.
const CONTENT_DISTANCE_SQ: i32 = 25 * 25;
/// Inset margin of the inner rectangle, as a fraction of each dimension.
const INNER_MARGIN: f64 = 0.08;
/// Height of the bottom band, as a fraction of the image height.
const BOTTOM_BAND: f64 = 0.06;
/// Corner patch side, as a fraction of the smaller dimension.
const CORNER_PATCH: f64 = 0.06;

/// Pixel-coverage signals of one rendered slide.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DensityMetric {
    /// Fraction of non-background pixels inside the margin-inset rectangle.
    pub inner_coverage: f64,
    /// Fraction of non-background pixels in the bottom band.
    pub bottom_band_coverage: f64,
}

/// Background estimate: a majority vote over the four corner patches.
///
/// Each corner contributes the lexicographic median of its patch. The winner is the corner
/// color most other corners agree with; ties go to the earlier corner, top corners first, so a
/// footer band spanning both bottom corners never becomes the background.
fn background(img: &RgbImage) -> Option<[u8; 3]> {
    let (w, h) = img.dimensions();
    let patch = ((f64::from(w.min(h)) * CORNER_PATCH) as u32).max(2).min(w.min(h));
    if patch == 0 {
        return None;
    }
    let corner = |flip_x: bool, flip_y: bool| -> [u8; 3] {
        let mut samples: Vec<[u8; 3]> = (0..patch)
            .flat_map(|y| (0..patch).map(move |x| (x, y)))
            .map(|(x, y)| {
                let px = if flip_x { w - 1 - x } else { x };
                let py = if flip_y { h - 1 - y } else { y };
                img.get_pixel(px, py).0
            })
            .collect();
        samples.sort_unstable();
        samples[samples.len() / 2]
    };
    let corners = [
        corner(false, false),
        corner(true, false),
        corner(false, true),
        corner(true, true),
    ];
    let votes = |c: [u8; 3]| corners.iter().filter(|&&o| !is_content(o, c)).count();
    corners
        .iter()
        .copied()
        .enumerate()
        .max_by_key(|&(i, c)| (votes(c), std::cmp::Reverse(i)))
        .map(|(_, c)| c)
}

fn is_content(px: [u8; 3], bg: [u8; 3]) -> bool {
    let d: i32 = px
        .iter()
        .zip(bg)
        .map(|(&a, b)| {
            let d = i32::from(a) - i32::from(b);
            d * d
        })
        .sum();
    d > CONTENT_DISTANCE_SQ
}

/// Measure an already loaded slide image.
///
/// The image is downsampled to at least 240×135 (a sixth of its size when larger) before
/// sampling. Returns `None` when the image is too small to carry an inner rectangle.
pub fn analyze_image(img: &RgbImage) -> Option<DensityMetric> {
    let (w0, h0) = img.dimensions();
    if w0 == 0 || h0 == 0 {
        return None;
    }
    let small = image::imageops::resize(
        img,
        (w0 / 6).max(240),
        (h0 / 6).max(135),
        image::imageops::FilterType::Triangle,
    );
    let (w, h) = small.dimensions();
    let bg = background(&small)?;

    let mx = (f64::from(w) * INNER_MARGIN) as u32;
    let my = (f64::from(h) * INNER_MARGIN) as u32;
    let (x0, x1, y0, y1) = (mx, w - mx, my, h - my);
    if x1 <= x0 || y1 <= y0 {
        return None;
    }
    let count = |ys: std::ops::Range<u32>| -> u64 {
        ys.flat_map(|y| (x0..x1).map(move |x| (x, y)))
            .filter(|&(x, y)| is_content(small.get_pixel(x, y).0, bg))
            .count() as u64
    };

    let inner_total = u64::from(x1 - x0) * u64::from(y1 - y0);
    let inner_ink = count(y0..y1);

    let band_h = ((f64::from(h) * BOTTOM_BAND) as u32).max(1);
    let bottom_total = u64::from(x1 - x0) * u64::from(band_h);
    let bottom_ink = count(h - band_h..h);

    Some(DensityMetric {
        inner_coverage: inner_ink as f64 / inner_total as f64,
        bottom_band_coverage: bottom_ink as f64 / bottom_total as f64,
    })
}

/// Load and measure a slide image; unreadable images yield `None`.
pub fn analyze_path(path: &Path) -> Option<DensityMetric> {
    match image::open(path) {
        Ok(img) => analyze_image(&img.to_rgb8()),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "snapshot unreadable; skipping");
            None
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/qa/density.rs"]
mod tests;
