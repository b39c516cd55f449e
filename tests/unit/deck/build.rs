use super::*;
use crate::assets::FsAssetProvider;
use crate::spec::model::{ChartKind, SlideCommon};
use crate::template::capability::Placeholder;
use crate::theme::palette::ThemeName;
use crate::theme::scheme::ThemeColors;
use std::path::PathBuf;

struct FixedAsset(Option<PathBuf>);

impl AssetProvider for FixedAsset {
    fn resolve_or_generate(&self, _request: &ImageRequest<'_>) -> Option<PathBuf> {
        self.0.clone()
    }
}

fn shapes_with(
    slide: &SlideSpec,
    theme: ThemeName,
    caps: Option<&PlaceholderCapabilitySet>,
    assets: &dyn AssetProvider,
) -> Vec<Shape> {
    let resolver = ThemeResolver::new(theme, ThemeColors::default());
    let ctx = SlideContext {
        slide_size: SlideSize::WIDESCREEN,
        caps,
        template_theme: theme == ThemeName::Template && caps.is_some(),
        theme: &resolver,
        scopes: Default::default(),
        assets,
    };
    build_shapes(slide, &ctx)
}

fn shapes(slide: &SlideSpec) -> Vec<Shape> {
    shapes_with(slide, ThemeName::Dark, None, &FsAssetProvider::default())
}

fn count(shapes: &[Shape], pred: impl Fn(&ShapeKind) -> bool) -> usize {
    shapes.iter().filter(|s| pred(&s.kind)).count()
}

fn slide(content: SlideContent) -> SlideSpec {
    SlideSpec {
        common: SlideCommon::default(),
        content,
    }
}

#[test]
fn cover_is_centered_title_and_subtitle() {
    let out = shapes(&SlideSpec::title("Launch", Some("Q3 plan")));
    assert_eq!(out.len(), 2);
    assert_eq!(out[0].plain_text(), "Launch");
    assert_eq!(out[0].paragraphs[0].size_pt, 54.0);
    assert_eq!(out[0].paragraphs[0].align, TextAlign::Center);
    assert_eq!(out[1].plain_text(), "Q3 plan");
    assert!((out[1].bounds.y - 3.2).abs() < 1e-9);
}

#[test]
fn bullets_fill_the_content_region() {
    let out = shapes(&SlideSpec::bullets("Agenda", ["• One", "Two"]));
    assert_eq!(out.len(), 2);
    let body = &out[1];
    assert_eq!(body.paragraphs.len(), 2);
    assert_eq!(body.paragraphs[0].text, "One");
    assert!(body.paragraphs.iter().all(|p| p.bullet));
    assert!((body.bounds.x - 0.7).abs() < 1e-9);
    assert!((body.bounds.y - 1.35).abs() < 1e-9);
    assert!((body.bounds.height - 3.45).abs() < 1e-9);
}

#[test]
fn two_column_first_line_is_a_heading() {
    let out = shapes(&slide(SlideContent::TwoColumn {
        title: Some("Compare".into()),
        left: "Before\n- slow\n- manual".into(),
        right: "After\\n• fast".into(),
    }));
    assert_eq!(out.len(), 3);
    let left = &out[1];
    assert!(left.paragraphs[0].bold);
    assert_eq!(left.paragraphs[0].size_pt, 17.0);
    assert_eq!(left.paragraphs[1].text, "slow");
    assert!(left.paragraphs[1].bullet);
    let right = &out[2];
    assert_eq!(right.paragraphs.len(), 2);
    assert!(right.bounds.x > left.bounds.right());
}

#[test]
fn chart_fills_missing_categories_and_series() {
    let out = shapes(&slide(SlideContent::Chart {
        title: None,
        chart_type: Some(ChartKind::Line),
        categories: None,
        series: Some(vec![ChartSeries {
            name: Some("Revenue".into()),
            values: vec![1.0, 2.0, 3.0],
        }]),
        legend: None,
    }));
    assert_eq!(out.len(), 1);
    match &out[0].kind {
        ShapeKind::Chart(plan) => {
            assert_eq!(plan.categories, vec!["Item 1", "Item 2", "Item 3"]);
            assert_eq!(plan.legend, LegendPosition::Right);
            assert_eq!(plan.chart_type, ChartKind::Line);
        }
        other => panic!("expected chart, got {other:?}"),
    }

    let empty = shapes(&slide(SlideContent::Chart {
        title: None,
        chart_type: None,
        categories: Some(vec!["A".into(), "B".into()]),
        series: None,
        legend: None,
    }));
    match &empty[0].kind {
        ShapeKind::Chart(plan) => assert_eq!(plan.series[0].values, vec![0.0, 0.0]),
        other => panic!("expected chart, got {other:?}"),
    }
}

#[test]
fn workflow_draws_boxes_and_connectors() {
    let steps = ["Plan", "Build", "", "Test", "Ship"]
        .into_iter()
        .map(StepNode::new)
        .collect();
    let out = shapes(&slide(SlideContent::Workflow {
        title: Some("Flow".into()),
        steps,
        orientation: None,
        show_numbers: None,
    }));
    assert_eq!(count(&out, |k| *k == ShapeKind::RoundedRect), 4);
    assert_eq!(count(&out, |k| matches!(k, ShapeKind::Arrow { .. })), 3);
    let first_box = out
        .iter()
        .find(|s| s.kind == ShapeKind::RoundedRect)
        .unwrap();
    assert_eq!(first_box.paragraphs[0].text, "1. Plan");
    assert!(first_box.fill.is_some());
}

#[test]
fn architecture_falls_back_to_default_rows() {
    let out = shapes(&slide(SlideContent::Architecture {
        title: None,
        top_row: Some(vec![StepNode::new("Web"), StepNode::new("API")]),
        middle_row: None,
        bottom: None,
    }));
    let boxes: Vec<&Shape> = out
        .iter()
        .filter(|s| s.kind == ShapeKind::RoundedRect)
        .collect();
    assert_eq!(boxes.len(), 7);
    assert_eq!(boxes[0].plain_text(), "Web");
    assert_eq!(boxes[2].plain_text(), "");
    assert!(boxes[3].plain_text().starts_with("Vector Store"));
    assert!(boxes[6].plain_text().starts_with("LLM Providers"));
}

#[test]
fn kpi_cards_skip_empty_entries_and_size_values() {
    let out = shapes(&slide(SlideContent::KpiCards {
        title: Some("KPIs".into()),
        cards: vec![
            CardNode::metric("Revenue", "$4.2M"),
            CardNode::default(),
            CardNode::metric("Pipeline", "$123,456,789.00"),
        ],
        cards_key: Default::default(),
        columns: None,
    }));
    let cards: Vec<&Shape> = out
        .iter()
        .filter(|s| s.kind == ShapeKind::RoundedRect)
        .collect();
    assert_eq!(cards.len(), 2);
    assert_eq!(cards[0].paragraphs[0].size_pt, 28.0);
    assert_eq!(cards[1].paragraphs[0].size_pt, 18.0);
    assert_eq!(cards[0].paragraphs[1].text, "Revenue");
}

#[test]
fn kpi_value_sizes_shrink_under_templates() {
    assert_eq!(kpi_value_size("12%", false), 28.0);
    assert_eq!(kpi_value_size("123456789", false), 22.0);
    assert_eq!(kpi_value_size("123456789", true), 19.0);
    assert_eq!(kpi_value_size("123456789012", true), 16.0);
}

#[test]
fn missing_image_keeps_caption_only() {
    let content = SlideContent::Image {
        title: Some("Photo".into()),
        image_path: Some("missing.png".into()),
        image_gen: None,
        caption: Some("A caption".into()),
    };
    let out = shapes_with(
        &slide(content),
        ThemeName::Light,
        None,
        &FixedAsset(None),
    );
    assert_eq!(count(&out, |k| matches!(k, ShapeKind::Picture { .. })), 0);
    let caption = out.last().unwrap();
    assert_eq!(caption.plain_text(), "A caption");
    assert!(caption.paragraphs[0].italic);
}

#[test]
fn resolved_image_is_contained_in_its_slot() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wide.png");
    image::RgbImage::from_pixel(400, 100, image::Rgb([1, 2, 3]))
        .save(&path)
        .unwrap();
    let content = SlideContent::Image {
        title: None,
        image_path: Some("wide.png".into()),
        image_gen: None,
        caption: None,
    };
    let out = shapes_with(
        &slide(content),
        ThemeName::Dark,
        None,
        &FixedAsset(Some(path.clone())),
    );
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].kind, ShapeKind::Picture { path });
    let b = out[0].bounds;
    assert!((b.width / b.height - 4.0).abs() < 1e-6);
}

#[test]
fn template_theme_uses_placeholders_and_inherits_color() {
    let slide_size = SlideSize::WIDESCREEN;
    let caps = PlaceholderCapabilitySet::new(vec![
        Placeholder::new(
            PlaceholderRole::Title,
            BoxGeometry::new(0.5, 0.3, 9.0, 0.9),
            slide_size,
        ),
        Placeholder::new(
            PlaceholderRole::Body,
            BoxGeometry::new(0.5, 1.4, 9.0, 3.6),
            slide_size,
        ),
    ]);
    let out = shapes_with(
        &SlideSpec::bullets("Status", ["Green"]),
        ThemeName::Template,
        Some(&caps),
        &FsAssetProvider::default(),
    );
    assert_eq!(
        out[0].kind,
        ShapeKind::Text {
            placeholder: Some(PlaceholderRole::Title)
        }
    );
    assert_eq!(
        out[1].kind,
        ShapeKind::Text {
            placeholder: Some(PlaceholderRole::Body)
        }
    );
    assert_eq!(out[1].bounds, BoxGeometry::new(0.5, 1.4, 9.0, 3.6));
    assert!(out[1].paragraphs[0].color.is_none());
}

#[test]
fn dark_theme_titles_use_accent() {
    let out = shapes(&SlideSpec::bullets("Status", ["Green"]));
    let accent = ThemeName::Dark.base_colors().unwrap().accent;
    assert_eq!(
        out[0].paragraphs[0].color,
        Some(ResolvedColor::literal(accent))
    );
    assert!((out[0].bounds.y - 0.4).abs() < 1e-9);
}
