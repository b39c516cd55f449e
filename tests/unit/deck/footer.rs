use super::*;
use crate::foundation::core::Rgb;
use crate::spec::model::FooterConfig;
use crate::theme::palette::ResolvedColor;

fn palette() -> FooterPalette {
    FooterPalette {
        text: ResolvedColor::literal(Rgb::new(71, 85, 105)),
        line: ResolvedColor::literal(Rgb::new(2, 132, 199)),
    }
}

fn deck(footer: Option<FooterSetting>) -> PresentationSpec {
    let mut spec = PresentationSpec::new(vec![
        SlideSpec::title("Deck", None),
        SlideSpec::bullets("A", ["x"]),
    ]);
    spec.title = Some("Q3 Review".into());
    spec.footer = footer;
    spec
}

#[test]
fn footer_defaults() {
    let plan = FooterPlan::from_spec(&deck(None)).unwrap();
    assert_eq!(plan.title, "Q3 Review");
    assert_eq!(plan.confidentiality, "Confidential");
    assert!(plan.show_page_number);
    assert!(!plan.show_total);
    assert!(!plan.include_on_title);

    assert!(FooterPlan::from_spec(&deck(Some(FooterSetting::Enabled(false)))).is_none());
    let off = FooterConfig {
        enabled: Some(false),
        ..FooterConfig::default()
    };
    assert!(FooterPlan::from_spec(&deck(Some(FooterSetting::Config(off)))).is_none());
}

#[test]
fn footer_config_overrides_deck_fields() {
    let cfg = FooterConfig {
        title: Some("Board pack".into()),
        confidentiality: Some("Internal".into()),
        show_total: Some(true),
        include_on_title: Some(true),
        ..FooterConfig::default()
    };
    let plan = FooterPlan::from_spec(&deck(Some(FooterSetting::Config(cfg)))).unwrap();
    assert_eq!(plan.title, "Board pack");
    assert_eq!(plan.confidentiality, "Internal");
    assert_eq!(plan.page_label(2, 5).as_deref(), Some("2/5"));
    assert!(plan.applies_to(&SlideSpec::title("Deck", None)));
}

#[test]
fn title_slides_and_exclusions_skip_footer() {
    let plan = FooterPlan::from_spec(&deck(None)).unwrap();
    assert!(!plan.applies_to(&SlideSpec::title("Deck", None)));
    let mut s = SlideSpec::bullets("A", ["x"]);
    assert!(plan.applies_to(&s));
    s.common.footer_exclude = Some(true);
    assert!(!plan.applies_to(&s));
    assert_eq!(plan.page_label(3, 9).as_deref(), Some("3"));
}

#[test]
fn builtin_footer_has_divider_text_and_page() {
    let plan = FooterPlan::from_spec(&deck(None)).unwrap();
    let shapes = plan.shapes(SlideSize::WIDESCREEN, Some("4"), &palette(), false);
    assert_eq!(shapes.len(), 3);
    assert_eq!(shapes[0].kind, ShapeKind::Rect);
    assert_eq!(shapes[1].plain_text(), "Q3 Review | Confidential");
    assert_eq!(shapes[2].plain_text(), "4");
    assert_eq!(shapes[2].paragraphs[0].align, TextAlign::Right);
    let y = 5.625 - 0.28 - 0.06;
    assert!((shapes[1].bounds.y - y).abs() < 1e-9);
}

#[test]
fn template_footer_is_one_right_aligned_box() {
    let plan = FooterPlan::from_spec(&deck(None)).unwrap();
    let shapes = plan.shapes(SlideSize::WIDESCREEN, Some("2"), &palette(), true);
    assert_eq!(shapes.len(), 1);
    assert_eq!(shapes[0].plain_text(), "Q3 Review • Confidential • 2");
    assert!((shapes[0].bounds.x - (10.0 - 0.55 - 4.8)).abs() < 1e-9);
    assert!((shapes[0].bounds.width - 4.8).abs() < 1e-9);
}
