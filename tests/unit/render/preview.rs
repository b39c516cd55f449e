use super::*;
use crate::assemble::DocumentAssembler;
use crate::assemble::json::JsonAssembler;
use crate::deck::{DeckDocument, LayoutRef};
use crate::layout::resolve::ResolutionSource;
use crate::spec::model::SlideKind;
use crate::theme::palette::{ResolvedColor, ThemeName};

fn slide(shapes: Vec<Shape>) -> PlannedSlide {
    PlannedSlide {
        kind: SlideKind::Bullets,
        source_index: Some(0),
        layout: LayoutRef {
            index: None,
            name: "(blank)".into(),
            source: ResolutionSource::NoTemplate,
        },
        background: Some(Rgb::new(15, 23, 42)),
        shapes,
    }
}

fn ink_pixels(img: &RgbImage, bg: Rgb) -> usize {
    img.pixels().filter(|p| p.0 != bg.to_array()).count()
}

#[test]
fn line_estimates_follow_width_and_size() {
    // 20pt glyphs advance ~0.139in, so a 2in box fits 14 characters.
    assert_eq!(chars_per_line(2.0, 20.0), 14);
    assert_eq!(wrapped_line_count("short", 2.0, 20.0), 1);
    assert_eq!(wrapped_line_count(&"x".repeat(30), 2.0, 20.0), 3);
    assert_eq!(wrapped_line_count("a\n\nb", 2.0, 20.0), 3);
    assert_eq!(chars_per_line(0.0, 20.0), 1);
}

#[test]
fn empty_slide_is_flat_background() {
    let r = PreviewRenderer::default();
    let img = r.rasterize(SlideSize::WIDESCREEN, &slide(vec![]));
    assert_eq!(img.dimensions(), (960, 540));
    assert_eq!(ink_pixels(&img, Rgb::new(15, 23, 42)), 0);
}

#[test]
fn more_text_means_more_ink_and_overflow_spills_down() {
    let r = PreviewRenderer::default();
    let bg = Rgb::new(15, 23, 42);
    let bounds = BoxGeometry::new(0.5, 0.5, 4.0, 1.0);
    let short = slide(vec![Shape::text(bounds, vec![Paragraph::new("Hi", 20.0)])]);
    let long = slide(vec![Shape::text(
        bounds,
        (0..12)
            .map(|i| {
                Paragraph::new(format!("Bullet number {i} with a fair amount of text"), 20.0)
                    .bulleted()
            })
            .collect(),
    )]);
    let short_img = r.rasterize(SlideSize::WIDESCREEN, &short);
    let long_img = r.rasterize(SlideSize::WIDESCREEN, &long);
    assert!(ink_pixels(&long_img, bg) > 10 * ink_pixels(&short_img, bg));

    // Text extends well below the 1.5in box bottom.
    let below = (200..long_img.height())
        .flat_map(|y| (0..long_img.width()).map(move |x| (x, y)))
        .filter(|&(x, y)| long_img.get_pixel(x, y).0 != bg.to_array())
        .count();
    assert!(below > 0);
}

#[test]
fn filled_shapes_and_arrows_use_their_colors() {
    let r = PreviewRenderer::default();
    let fill = ResolvedColor::literal(Rgb::new(200, 30, 30));
    let shapes = vec![
        Shape::new(ShapeKind::RoundedRect, BoxGeometry::new(1.0, 1.0, 2.0, 1.0))
            .styled(Some(fill), None),
        Shape::new(
            ShapeKind::Arrow {
                direction: ArrowDirection::Down,
            },
            BoxGeometry::new(5.0, 1.0, 0.5, 1.0),
        )
        .styled(Some(fill), Some(fill)),
    ];
    let img = r.rasterize(SlideSize::WIDESCREEN, &slide(shapes));
    assert_eq!(img.get_pixel(192, 144).0, [200, 30, 30]);
    // Arrow shaft center.
    assert_eq!(img.get_pixel(504, 110).0, [200, 30, 30]);
    // Outside the shaft near the top corners.
    assert_eq!(img.get_pixel(482, 98).0, [15, 23, 42]);
}

#[test]
fn renders_one_image_per_slide_from_a_deck_file() {
    let dir = tempfile::tempdir().unwrap();
    let deck = DeckDocument {
        slide_size: SlideSize::WIDESCREEN,
        theme: ThemeName::Dark,
        template: None,
        slides: vec![
            slide(vec![Shape::text(
                BoxGeometry::new(0.5, 0.4, 9.0, 0.8),
                vec![Paragraph::new("One", 40.0)],
            )]),
            slide(vec![]),
        ],
    };
    let assembler = JsonAssembler::default();
    let handle = assembler.assemble(&deck).unwrap();
    let doc = assembler.save(handle, &dir.path().join("deck.json")).unwrap();

    let out = dir.path().join("snaps");
    let images = PreviewRenderer::with_pixels_per_inch(48.0)
        .render(&doc, &out, SnapshotFormat::Jpg)
        .unwrap();
    assert_eq!(images, vec![out.join("Slide1.jpg"), out.join("Slide2.jpg")]);
    let img = image::open(&images[0]).unwrap();
    assert_eq!((img.width(), img.height()), (480, 270));
}
