use super::*;

#[test]
fn hex_parsing_accepts_optional_hash() {
    assert_eq!(Rgb::from_hex("#0284C7"), Some(Rgb::new(2, 132, 199)));
    assert_eq!(Rgb::from_hex("0284c7"), Some(Rgb::new(2, 132, 199)));
    assert_eq!(Rgb::from_hex("0284c"), None);
    assert_eq!(Rgb::from_hex("zz84c7"), None);
    assert_eq!(Rgb::new(2, 132, 199).to_hex(), "0284C7");
}

#[test]
fn box_geometry_clamps_negative_extents() {
    let b = BoxGeometry::new(1.0, 2.0, -3.0, 4.0);
    assert_eq!(b.width, 0.0);
    assert_eq!(b.height, 4.0);

    let inner = BoxGeometry::new(0.0, 0.0, 1.0, 1.0).inset(0.8, 0.0, 0.8, 0.0);
    assert_eq!(inner.width, 0.0);
}

#[test]
fn containment_and_transpose() {
    let outer = BoxGeometry::new(0.0, 0.0, 10.0, 5.0);
    let inner = BoxGeometry::new(1.0, 1.0, 2.0, 3.0);
    assert!(outer.contains_box(&inner, 0.0));
    assert!(!inner.contains_box(&outer, 0.0));

    let t = inner.transposed();
    assert_eq!(t, BoxGeometry::new(1.0, 1.0, 3.0, 2.0));
    assert_eq!(ArrowDirection::Right.transposed(), ArrowDirection::Down);
    assert_eq!(ArrowDirection::Up.transposed(), ArrowDirection::Left);
}

#[test]
fn rect_roundtrip_and_slide_size_from_emu() {
    let b = BoxGeometry::new(0.5, 0.25, 2.0, 1.0);
    assert_eq!(BoxGeometry::from_rect(b.to_rect()), b);

    let s = SlideSize::from_emu(9_144_000, 5_143_500);
    assert!((s.width - 10.0).abs() < 1e-9);
    assert!((s.height - 5.625).abs() < 1e-9);
}
