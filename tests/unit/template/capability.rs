use super::*;

fn body(x: f64, w: f64) -> Placeholder {
    Placeholder::new(
        PlaceholderRole::Body,
        BoxGeometry::new(x, 1.5, w, 3.0),
        SlideSize::WIDESCREEN,
    )
}

#[test]
fn ooxml_types_map_to_roles() {
    assert_eq!(PlaceholderRole::from_ooxml(Some("ctrTitle")), Some(PlaceholderRole::Title));
    assert_eq!(PlaceholderRole::from_ooxml(Some("subTitle")), Some(PlaceholderRole::Subtitle));
    assert_eq!(PlaceholderRole::from_ooxml(None), Some(PlaceholderRole::Body));
    assert_eq!(PlaceholderRole::from_ooxml(Some("pic")), Some(PlaceholderRole::Picture));
    assert_eq!(PlaceholderRole::from_ooxml(Some("sldNum")), None);
    assert_eq!(PlaceholderRole::from_ooxml(Some("dt")), None);
}

#[test]
fn positions_classify_by_center() {
    assert_eq!(body(0.5, 4.0).position, Position::Left);
    assert_eq!(body(5.3, 4.0).position, Position::Right);
    assert_eq!(body(0.5, 9.0).position, Position::Center);
}

#[test]
fn left_right_bodies_pick_largest_per_side() {
    let set = PlaceholderCapabilitySet::new(vec![
        body(0.5, 1.0),
        body(0.5, 4.0),
        body(5.3, 4.0),
        body(0.5, 9.0),
    ]);
    let (l, r) = set.left_right_bodies().unwrap();
    assert_eq!(l.bounds.width, 4.0);
    assert_eq!(r.bounds.x, 5.3);
    assert_eq!(set.count(PlaceholderRole::Body), 4);
    assert_eq!(set.largest(PlaceholderRole::Body).unwrap().bounds.width, 9.0);

    let one_sided = PlaceholderCapabilitySet::new(vec![body(0.5, 4.0), body(0.5, 9.0)]);
    assert!(one_sided.left_right_bodies().is_none());
}
