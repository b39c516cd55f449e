use crate::foundation::core::{ArrowDirection, BoxGeometry};
use crate::geometry::ConnectorGeometry;

/// Placement of the fixed three-row architecture diagram.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ArchitectureLayout {
    /// Three boxes joined left to right by arrows.
    pub top: [BoxGeometry; 3],
    /// Three unconnected boxes.
    pub middle: [BoxGeometry; 3],
    /// One box spanning the full width.
    pub bottom: BoxGeometry,
    /// The two arrows of the top row.
    pub connectors: Vec<ConnectorGeometry>,
}

const FIT_EPS: f64 = 1e-9;
const ARROW_W: f64 = 0.55;
const GAP_X: f64 = 0.16;
const MID_GAP: f64 = 0.30;

fn horizontal_scale(width: f64, fixed: f64) -> f64 {
    (width.max(0.0) * 0.5 / fixed).min(1.0)
}

struct RowHeights {
    top: f64,
    middle: f64,
    bottom: f64,
    gap: f64,
}

impl RowHeights {
    fn total(&self) -> f64 {
        self.top + self.middle + self.bottom + 2.0 * self.gap
    }
}

fn row_heights(h: f64) -> RowHeights {
    let top = (h * 0.34).clamp(0.85, 1.10);
    let middle = (h * 0.26).clamp(0.75, 0.95);
    let mut gap = 0.28f64.min(h * 0.08);
    let mut rows = RowHeights {
        top,
        middle,
        bottom: (h - top - middle - 2.0 * gap).clamp(0.75, 1.20),
        gap,
    };
    if rows.total() > h + FIT_EPS {
        gap = 0.16f64.max(gap * 0.7);
        rows.gap = gap;
        rows.bottom = (h - top - middle - 2.0 * gap).clamp(0.70, 1.10);
    }
    // Small regions: scale everything down proportionally.
    let total = rows.total();
    if total > h + FIT_EPS && total > 0.0 {
        let k = (h / total).max(0.0);
        rows = RowHeights {
            top: rows.top * k,
            middle: rows.middle * k,
            bottom: rows.bottom * k,
            gap: rows.gap * k,
        };
    }
    rows
}

/// Lay out the architecture diagram inside `region`.
///
/// Row heights are fractions of the available height within fixed bounds; when the rows do
/// not fit, the inter-row gap shrinks first and then every row scales down. Horizontal gaps
/// and arrows shrink the same way on narrow regions.
pub fn layout_architecture(region: BoxGeometry) -> ArchitectureLayout {
    let (x0, w) = (region.x, region.width);
    let rows = row_heights(region.height);

    // Arrows and gaps take at most half the width so narrow regions keep every box inside.
    let spacing = horizontal_scale(w, 2.0 * ARROW_W + 4.0 * GAP_X);
    let arrow_w = ARROW_W * spacing;
    let gap_x = GAP_X * spacing;
    let box_w = ((w - 2.0 * arrow_w - 4.0 * gap_x) / 3.0).max(0.0);
    let stride = box_w + 2.0 * gap_x + arrow_w;
    let y_top = region.y;
    let top = [0.0, 1.0, 2.0].map(|i| BoxGeometry::new(x0 + i * stride, y_top, box_w, rows.top));

    let arrow_h = 0.42f64.min(rows.top * 0.35);
    let y_arrow = y_top + (rows.top - arrow_h) / 2.0;
    let connectors = top[..2]
        .iter()
        .map(|b| {
            ConnectorGeometry::new(
                BoxGeometry::new(b.right() + gap_x, y_arrow, arrow_w, arrow_h),
                ArrowDirection::Right,
            )
        })
        .collect();

    let mid_gap = MID_GAP * horizontal_scale(w, 2.0 * MID_GAP);
    let mid_w = ((w - 2.0 * mid_gap) / 3.0).max(0.0);
    let y_mid = y_top + rows.top + rows.gap;
    let middle = [0.0, 1.0, 2.0]
        .map(|i| BoxGeometry::new(x0 + i * (mid_w + mid_gap), y_mid, mid_w, rows.middle));

    let y_bottom = y_mid + rows.middle + rows.gap;
    let bottom = BoxGeometry::new(x0, y_bottom, w, rows.bottom);

    ArchitectureLayout {
        top,
        middle,
        bottom,
        connectors,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/architecture.rs"]
mod tests;
