use crate::spec::model::SlideKind;
use crate::template::capability::{PlaceholderCapabilitySet, PlaceholderRole};

/// Score how well a layout's capabilities fit a slide kind. Higher is better; only positive
/// scores are acceptable matches.
pub fn score_layout(kind: SlideKind, caps: &PlaceholderCapabilitySet) -> i32 {
    let title = caps.has(PlaceholderRole::Title);
    let bodies = caps.count(PlaceholderRole::Body) as i32;
    let extra_bodies = (bodies - 1).max(0);
    let bonus = |cond: bool, points: i32| if cond { points } else { 0 };

    match kind {
        SlideKind::Title => {
            bonus(title, 10) + bonus(caps.has(PlaceholderRole::Subtitle), 5) - 3 * extra_bodies
        }
        SlideKind::Bullets => bonus(title, 8) + bonus(bodies >= 1, 8) - 2 * extra_bodies,
        SlideKind::TwoColumn => {
            let columns = if bodies >= 2 {
                bonus(caps.left_right_bodies().is_some(), 10).max(4)
            } else {
                -10
            };
            bonus(title, 6) + columns
        }
        SlideKind::Image => bonus(title, 6) + bonus(caps.has(PlaceholderRole::Picture), 8),
        SlideKind::Chart => {
            bonus(title, 6) + bonus(caps.has(PlaceholderRole::Chart), 10) + bonus(bodies >= 1, 4)
        }
        // Diagrams and card grids want a title and one large drawing area.
        SlideKind::Workflow | SlideKind::Architecture | SlideKind::KpiCards => {
            bonus(title, 8) + bonus(bodies >= 1, 6) - 2 * extra_bodies
        }
        SlideKind::Blank => {
            if caps.is_empty() {
                5
            } else {
                -(caps.len() as i32)
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/score.rs"]
mod tests;
