use crate::foundation::core::BoxGeometry;

const GAP_X: f64 = 0.28;
const GAP_Y: f64 = 0.24;

/// Placement of a KPI card grid.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CardGrid {
    /// One cell per card, row-major.
    pub cells: Vec<BoxGeometry>,
    /// Columns used.
    pub columns: usize,
    /// Rows used.
    pub rows: usize,
}

/// Column count when none is given: 2 for up to six cards, otherwise 3.
pub fn default_columns(count: usize) -> usize {
    if count <= 6 { 2 } else { 3 }
}

/// Lay out `count` cards in a uniform grid filling `region`.
///
/// An explicit column count is clamped to `[1, count]`.
pub fn layout_cards(count: usize, region: BoxGeometry, columns: Option<i64>) -> CardGrid {
    if count == 0 {
        return CardGrid::default();
    }
    let columns = match columns {
        Some(c) => usize::try_from(c.max(1)).unwrap_or(1).min(count),
        None => default_columns(count).min(count),
    };
    let rows = count.div_ceil(columns);

    let cell_w = ((region.width - (columns - 1) as f64 * GAP_X) / columns as f64).max(0.0);
    let cell_h = ((region.height - (rows - 1) as f64 * GAP_Y) / rows as f64).max(0.0);

    let cells = (0..count)
        .map(|i| {
            let (row, col) = (i / columns, i % columns);
            BoxGeometry::new(
                region.x + col as f64 * (cell_w + GAP_X),
                region.y + row as f64 * (cell_h + GAP_Y),
                cell_w,
                cell_h,
            )
        })
        .collect();

    CardGrid {
        cells,
        columns,
        rows,
    }
}

/// Square icon slot in a card's top-right corner.
pub fn card_icon_slot(card: &BoxGeometry) -> BoxGeometry {
    let margin = 0.12;
    let size = 0.55f64.min(card.height * 0.32);
    BoxGeometry::new(card.right() - size - margin, card.y + margin, size, size)
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/cards.rs"]
mod tests;
