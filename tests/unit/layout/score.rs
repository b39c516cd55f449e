use super::*;
use crate::foundation::core::{BoxGeometry, SlideSize};
use crate::template::capability::Placeholder;

fn caps(slots: &[(PlaceholderRole, f64, f64)]) -> PlaceholderCapabilitySet {
    PlaceholderCapabilitySet::new(
        slots
            .iter()
            .map(|(role, x, w)| {
                Placeholder::new(*role, BoxGeometry::new(*x, 1.0, *w, 3.0), SlideSize::WIDESCREEN)
            })
            .collect(),
    )
}

#[test]
fn title_rubric() {
    let cover = caps(&[(PlaceholderRole::Title, 0.5, 9.0), (PlaceholderRole::Subtitle, 0.5, 9.0)]);
    assert_eq!(score_layout(SlideKind::Title, &cover), 15);
    let busy = caps(&[
        (PlaceholderRole::Title, 0.5, 9.0),
        (PlaceholderRole::Body, 0.5, 4.0),
        (PlaceholderRole::Body, 5.5, 4.0),
        (PlaceholderRole::Body, 0.5, 9.0),
    ]);
    assert_eq!(score_layout(SlideKind::Title, &busy), 10 - 6);
}

#[test]
fn bullets_rubric_penalizes_extra_bodies() {
    let content = caps(&[(PlaceholderRole::Title, 0.5, 9.0), (PlaceholderRole::Body, 0.5, 9.0)]);
    assert_eq!(score_layout(SlideKind::Bullets, &content), 16);
    let two = caps(&[
        (PlaceholderRole::Title, 0.5, 9.0),
        (PlaceholderRole::Body, 0.5, 4.0),
        (PlaceholderRole::Body, 5.5, 4.0),
    ]);
    assert_eq!(score_layout(SlideKind::Bullets, &two), 14);
}

#[test]
fn two_column_rubric_needs_both_sides() {
    let split = caps(&[
        (PlaceholderRole::Title, 0.5, 9.0),
        (PlaceholderRole::Body, 0.5, 4.0),
        (PlaceholderRole::Body, 5.5, 4.0),
    ]);
    assert_eq!(score_layout(SlideKind::TwoColumn, &split), 16);
    let stacked = caps(&[
        (PlaceholderRole::Title, 0.5, 9.0),
        (PlaceholderRole::Body, 0.5, 9.0),
        (PlaceholderRole::Body, 0.5, 9.0),
    ]);
    assert_eq!(score_layout(SlideKind::TwoColumn, &stacked), 10);
    let single = caps(&[(PlaceholderRole::Title, 0.5, 9.0), (PlaceholderRole::Body, 0.5, 9.0)]);
    assert_eq!(score_layout(SlideKind::TwoColumn, &single), -4);
}

#[test]
fn media_and_blank_rubrics() {
    let picture = caps(&[(PlaceholderRole::Title, 0.5, 9.0), (PlaceholderRole::Picture, 0.5, 9.0)]);
    assert_eq!(score_layout(SlideKind::Image, &picture), 14);
    let chart = caps(&[
        (PlaceholderRole::Title, 0.5, 9.0),
        (PlaceholderRole::Chart, 0.5, 9.0),
        (PlaceholderRole::Body, 0.5, 9.0),
    ]);
    assert_eq!(score_layout(SlideKind::Chart, &chart), 20);
    assert_eq!(score_layout(SlideKind::Blank, &caps(&[])), 5);
    assert_eq!(score_layout(SlideKind::Blank, &picture), -2);
    assert_eq!(score_layout(SlideKind::Workflow, &picture), 8);
}
