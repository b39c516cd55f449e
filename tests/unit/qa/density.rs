use super::*;

const BG: image::Rgb<u8> = image::Rgb([15, 23, 42]);
const INK: image::Rgb<u8> = image::Rgb([241, 245, 249]);

fn slide_with(fill: impl Fn(u32, u32) -> bool) -> RgbImage {
    RgbImage::from_fn(960, 540, |x, y| if fill(x, y) { INK } else { BG })
}

#[test]
fn blank_slide_has_no_coverage() {
    let m = analyze_image(&slide_with(|_, _| false)).unwrap();
    assert_eq!(m.inner_coverage, 0.0);
    assert_eq!(m.bottom_band_coverage, 0.0);
}

#[test]
fn half_filled_inner_area_is_about_half() {
    // Left half of the slide, rows 100..440.
    let m = analyze_image(&slide_with(|x, y| x < 480 && (100..440).contains(&y))).unwrap();
    // Half the inner width, about three quarters of its height.
    assert!((0.33..0.42).contains(&m.inner_coverage), "{m:?}");
    assert_eq!(m.bottom_band_coverage, 0.0);
}

#[test]
fn content_at_the_bottom_edge_is_detected() {
    let m = analyze_image(&slide_with(|_, y| y >= 500)).unwrap();
    assert!(m.bottom_band_coverage > 0.9, "{m:?}");
    assert!(m.inner_coverage < 0.05, "{m:?}");
}

#[test]
fn background_follows_the_corners_not_the_center() {
    // Light slide with a dark block in the middle: the block is content.
    let light = image::Rgb([250, 250, 250]);
    let img = RgbImage::from_fn(960, 540, |x, y| {
        if (300..660).contains(&x) && (150..390).contains(&y) {
            BG
        } else {
            light
        }
    });
    let m = analyze_image(&img).unwrap();
    assert!(m.inner_coverage > 0.15 && m.inner_coverage < 0.35, "{m:?}");
}

#[test]
fn ink_touching_corners_does_not_become_background() {
    // A footer band across both bottom corners.
    let band = analyze_image(&slide_with(|_, y| y >= 500)).unwrap();
    assert!(band.bottom_band_coverage > 0.9, "{band:?}");
    assert!(band.inner_coverage < 0.05, "{band:?}");

    // A logo in the top-left corner is outvoted by the other three.
    let logo = analyze_image(&slide_with(|x, y| x < 80 && y < 80)).unwrap();
    assert!(logo.inner_coverage < 0.05, "{logo:?}");
    assert_eq!(logo.bottom_band_coverage, 0.0);

    // A single inked bottom corner.
    let corner = analyze_image(&slide_with(|x, y| x >= 880 && y >= 460)).unwrap();
    assert!(corner.inner_coverage < 0.05, "{corner:?}");
}

#[test]
fn faint_noise_is_not_content() {
    let mut img = slide_with(|_, _| false);
    for (x, y, p) in img.enumerate_pixels_mut() {
        if (x + y) % 3 == 0 {
            p.0[0] = p.0[0].saturating_add(10);
        }
    }
    let m = analyze_image(&img).unwrap();
    assert_eq!(m.inner_coverage, 0.0);
}

#[test]
fn unreadable_paths_yield_none() {
    let dir = tempfile::tempdir().unwrap();
    let bogus = dir.path().join("Slide1.png");
    std::fs::write(&bogus, b"not a png").unwrap();
    assert!(analyze_path(&bogus).is_none());

    let good = dir.path().join("Slide2.png");
    slide_with(|_, y| y >= 500).save(&good).unwrap();
    assert!(analyze_path(&good).unwrap().bottom_band_coverage > 0.9);
}
