use super::*;

const EPS: f64 = 1e-9;

fn assert_inside(region: &BoxGeometry, layout: &StepLayout) {
    for b in &layout.boxes {
        assert!(region.contains_box(b, EPS), "{b:?} escapes {region:?}");
    }
    for c in &layout.connectors {
        assert!(region.contains_box(&c.bounds, EPS), "{c:?} escapes {region:?}");
    }
}

#[test]
fn seven_steps_three_per_row_snake() {
    let region = BoxGeometry::new(0.7, 1.35, 6.0, 3.45);
    let l = layout_steps(7, region, Orientation::Horizontal);
    assert_eq!(l.per_line, 3);
    assert_eq!(l.lines, 3);
    assert_eq!(l.boxes.len(), 7);
    assert_inside(&region, &l);

    // First row runs left to right, second row right to left.
    assert!(l.boxes[0].x < l.boxes[1].x && l.boxes[1].x < l.boxes[2].x);
    assert!(l.boxes[3].x > l.boxes[4].x && l.boxes[4].x > l.boxes[5].x);
    assert!((l.boxes[3].right() - region.right()).abs() < EPS);
    assert!((l.boxes[5].x - region.x).abs() < EPS);
    assert!(l.boxes[3].y > l.boxes[0].y);
    assert!(l.boxes[6].y > l.boxes[3].y);

    // Last row holds a single box spanning the row.
    assert!((l.boxes[6].width - region.width).abs() < EPS);

    let dirs: Vec<ArrowDirection> = l.connectors.iter().map(|c| c.direction).collect();
    use ArrowDirection::*;
    assert_eq!(dirs, vec![Right, Right, Down, Left, Left, Down]);

    // Turn arrows hang under the terminal box of their row.
    let turn = l.connectors[2].bounds;
    assert!((turn.center_x() - l.boxes[2].center_x()).abs() < EPS);
    assert!(turn.y >= l.boxes[2].bottom());
    let turn = l.connectors[5].bounds;
    assert!((turn.center_x() - l.boxes[5].center_x()).abs() < EPS);
}

#[test]
fn in_row_arrows_sit_between_neighbors() {
    let region = BoxGeometry::new(0.0, 0.0, 6.0, 3.0);
    let l = layout_steps(5, region, Orientation::Horizontal);
    let first = l.connectors[0].bounds;
    assert!(first.x >= l.boxes[0].right());
    assert!(first.right() <= l.boxes[1].x + EPS);
    // Reverse row: arrow between box 4 (left) and box 3 (right).
    let back = l
        .connectors
        .iter()
        .find(|c| c.direction == ArrowDirection::Left)
        .map(|c| c.bounds);
    let back = back.unwrap();
    assert!(back.x >= l.boxes[4].right() - EPS);
    assert!(back.right() <= l.boxes[3].x + EPS);
}

#[test]
fn tight_rows_relax_arrow_spacing_before_single_column() {
    let region = BoxGeometry::new(0.0, 0.0, 3.25, 3.0);
    let l = layout_steps(2, region, Orientation::Horizontal);
    assert_eq!(l.per_line, 2);
    assert_eq!(l.connectors.len(), 1);
    assert!((l.connectors[0].bounds.width - 0.34).abs() < EPS);
    assert_inside(&region, &l);
}

#[test]
fn narrow_region_falls_back_to_one_per_row() {
    let region = BoxGeometry::new(1.0, 1.0, 2.0, 3.9);
    let l = layout_steps(3, region, Orientation::Horizontal);
    assert_eq!(l.per_line, 1);
    assert_eq!(l.lines, 3);
    assert!(l.boxes.iter().all(|b| (b.x - 1.0).abs() < EPS && (b.width - 2.0).abs() < EPS));
    assert!(l.connectors.iter().all(|c| c.direction == ArrowDirection::Down));
    assert_eq!(l.connectors.len(), 2);
    assert_inside(&region, &l);
}

#[test]
fn row_height_is_capped() {
    let region = BoxGeometry::new(0.0, 0.0, 9.0, 5.0);
    let l = layout_steps(3, region, Orientation::Horizontal);
    assert_eq!(l.lines, 1);
    assert!((l.boxes[0].height - 1.35).abs() < EPS);
}

#[test]
fn vertical_flow_mirrors_horizontal() {
    let region = BoxGeometry::new(0.7, 1.35, 8.6, 3.45);
    let l = layout_steps(5, region, Orientation::Vertical);
    assert_eq!(l.per_line, 3);
    assert_eq!(l.lines, 2);
    assert_inside(&region, &l);

    assert!(l.boxes[0].y < l.boxes[1].y && l.boxes[1].y < l.boxes[2].y);
    assert!(l.boxes[3].y > l.boxes[4].y);
    assert!((l.boxes[0].width - 2.8).abs() < EPS);
    assert!((l.boxes[3].x - (0.7 + 2.8 + 0.35)).abs() < EPS);

    use ArrowDirection::*;
    let dirs: Vec<ArrowDirection> = l.connectors.iter().map(|c| c.direction).collect();
    assert_eq!(dirs, vec![Down, Down, Right, Up]);
}

#[test]
fn connectors_always_number_steps_minus_one() {
    let region = BoxGeometry::new(0.5, 1.2, 9.0, 3.5);
    for n in 1..=14 {
        for orientation in [Orientation::Horizontal, Orientation::Vertical] {
            let l = layout_steps(n, region, orientation);
            assert_eq!(l.boxes.len(), n);
            assert_eq!(l.connectors.len(), n - 1, "n={n} {orientation:?}");
            assert_inside(&region, &l);
        }
    }
}

#[test]
fn no_steps_no_shapes() {
    let l = layout_steps(0, BoxGeometry::new(0.0, 0.0, 5.0, 5.0), Orientation::Horizontal);
    assert!(l.boxes.is_empty());
    assert!(l.connectors.is_empty());
}

#[test]
fn headers_are_numbered_on_request() {
    assert_eq!(step_header(" Ingest ", Some(1)), "1. Ingest");
    assert_eq!(step_header("", Some(4)), "4.");
    assert_eq!(step_header("Ingest", None), "Ingest");
}
