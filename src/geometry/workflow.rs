use crate::foundation::core::{ArrowDirection, BoxGeometry};
use crate::geometry::ConnectorGeometry;
use crate::spec::model::Orientation;

/// Tunables for one flow direction.
///
/// Expressed in "flow space": steps advance along x inside a line and lines stack along y.
/// Vertical workflows are solved in the transposed region and swapped back.
#[derive(Clone, Copy, Debug)]
struct FlowParams {
    min_box_main: f64,
    arrow_main: f64,
    gap: f64,
    max_per_line: usize,
    /// Tighter arrow length and gap tried once before giving up on multi-box lines.
    relaxed: Option<(f64, f64)>,
    line_gap: f64,
    cross_min: f64,
    cross_max: f64,
    /// In-line arrow thickness: `min(max, box_cross * fraction)`.
    arrow_thickness: (f64, f64),
    /// Turn arrow length inside the line gap.
    turn_length_max: f64,
    /// Turn arrow thickness: `min(max, box_main * fraction)`.
    turn_thickness: (f64, f64),
}

const HORIZONTAL: FlowParams = FlowParams {
    min_box_main: 1.35,
    arrow_main: 0.45,
    gap: 0.10,
    max_per_line: 6,
    relaxed: Some((0.34, 0.06)),
    line_gap: 0.35,
    cross_min: 0.9,
    cross_max: 1.35,
    arrow_thickness: (0.45, 0.35),
    turn_length_max: 0.40,
    turn_thickness: (0.55, 0.35),
};

const VERTICAL: FlowParams = FlowParams {
    min_box_main: 0.75,
    arrow_main: 0.28,
    gap: 0.08,
    max_per_line: 8,
    relaxed: None,
    line_gap: 0.35,
    cross_min: 1.8,
    cross_max: 2.8,
    arrow_thickness: (0.55, 0.30),
    turn_length_max: 0.55,
    turn_thickness: (0.45, 0.35),
};

/// Placement of a workflow chain.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StepLayout {
    /// One box per step, in step order.
    pub boxes: Vec<BoxGeometry>,
    /// In-line arrows followed by the turn arrow of each line, line by line.
    pub connectors: Vec<ConnectorGeometry>,
    /// Boxes per row (per column when vertical).
    pub per_line: usize,
    /// Number of rows (columns when vertical).
    pub lines: usize,
}

impl StepLayout {
    fn transposed(self) -> Self {
        Self {
            boxes: self.boxes.iter().map(BoxGeometry::transposed).collect(),
            connectors: self
                .connectors
                .iter()
                .map(ConnectorGeometry::transposed)
                .collect(),
            per_line: self.per_line,
            lines: self.lines,
        }
    }
}

/// Lay out `count` workflow steps inside `region`.
///
/// Lines are filled in serpentine order: even lines run forward, odd lines run backward, and
/// the turn arrow sits beyond the terminal box of each line so the chain never crosses
/// itself. Every box and connector stays inside `region`.
pub fn layout_steps(count: usize, region: BoxGeometry, orientation: Orientation) -> StepLayout {
    match orientation {
        Orientation::Horizontal => flow(count, region, &HORIZONTAL),
        Orientation::Vertical => flow(count, region.transposed(), &VERTICAL).transposed(),
    }
}

/// Main-axis box size when `per_line` boxes share `extent`.
fn box_main(extent: f64, per_line: usize, arrow: f64, gap: f64) -> f64 {
    if per_line <= 1 {
        return extent;
    }
    let n = per_line as f64;
    (extent - (n - 1.0) * (arrow + 2.0 * gap)) / n
}

/// Largest per-line capacity whose boxes stay readable, with the arrow length and gap used.
fn choose_capacity(count: usize, extent: f64, p: &FlowParams) -> (usize, f64, f64) {
    let max = count.min(p.max_per_line);
    let fits = |arrow: f64, gap: f64| {
        (2..=max)
            .rev()
            .find(|&k| box_main(extent, k, arrow, gap) >= p.min_box_main)
    };
    if let Some(k) = fits(p.arrow_main, p.gap) {
        return (k, p.arrow_main, p.gap);
    }
    if let Some((arrow, gap)) = p.relaxed
        && let Some(k) = fits(arrow, gap)
    {
        return (k, arrow, gap);
    }
    (1, p.arrow_main, p.gap)
}

fn flow(count: usize, region: BoxGeometry, p: &FlowParams) -> StepLayout {
    if count == 0 {
        return StepLayout::default();
    }

    let (per_line, arrow, gap) = choose_capacity(count, region.width, p);
    let lines = count.div_ceil(per_line);
    let line_gap = if lines > 1 {
        p.line_gap
            .min(region.height * 0.5 / (lines - 1) as f64)
            .max(0.0)
    } else {
        p.line_gap
    };
    let per_cross = ((region.height - (lines - 1) as f64 * line_gap) / lines as f64).max(0.0);
    let cross = per_cross.min(p.cross_max).max(p.cross_min.min(per_cross));

    let mut boxes = Vec::with_capacity(count);
    let mut connectors = Vec::with_capacity(count.saturating_sub(1));
    let mut start = 0;
    for line in 0..lines {
        let n = per_line.min(count - start);
        let forward = line % 2 == 0;
        let main = box_main(region.width, n, arrow, gap).max(0.0);
        let stride = main + arrow + 2.0 * gap;
        let y = region.y + line as f64 * (cross + line_gap);

        let xs: Vec<f64> = (0..n)
            .map(|j| {
                let offset = j as f64 * stride;
                if forward {
                    region.x + offset
                } else {
                    region.right() - main - offset
                }
            })
            .collect();
        boxes.extend(xs.iter().map(|&x| BoxGeometry::new(x, y, main, cross)));

        let thickness = p.arrow_thickness.0.min(cross * p.arrow_thickness.1);
        let arrow_y = y + (cross - thickness) / 2.0;
        let direction = if forward {
            ArrowDirection::Right
        } else {
            ArrowDirection::Left
        };
        for j in 0..n.saturating_sub(1) {
            let leftmost = if forward { xs[j] } else { xs[j + 1] };
            connectors.push(ConnectorGeometry::new(
                BoxGeometry::new(leftmost + main + gap, arrow_y, arrow, thickness),
                direction,
            ));
        }

        start += n;
        if start < count
            && let Some(&terminal) = xs.last()
        {
            let width = p.turn_thickness.0.min(main * p.turn_thickness.1);
            let height = p.turn_length_max.min(line_gap * 0.9);
            connectors.push(ConnectorGeometry::new(
                BoxGeometry::new(
                    terminal + (main - width) / 2.0,
                    y + cross + (line_gap - height) / 2.0,
                    width,
                    height,
                ),
                ArrowDirection::Down,
            ));
        }
    }

    tracing::debug!(count, per_line, lines, "workflow laid out");
    StepLayout {
        boxes,
        connectors,
        per_line,
        lines,
    }
}

/// Header text of a step box, optionally numbered.
pub fn step_header(title: &str, number: Option<usize>) -> String {
    let title = title.trim();
    match number {
        Some(n) if title.is_empty() => format!("{n}."),
        Some(n) => format!("{n}. {title}"),
        None => title.to_owned(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/workflow.rs"]
mod tests;
