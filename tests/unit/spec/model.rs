use super::*;
use serde_json::json;

#[test]
fn slide_kind_tags_roundtrip() {
    for kind in SlideKind::ALL {
        assert_eq!(SlideKind::from_tag(kind.as_str()), Some(kind));
    }
    assert_eq!(SlideKind::from_tag("timeline"), None);
}

#[test]
fn plain_nodes_serialize_as_strings() {
    assert_eq!(StepNode::new("Plan").to_value(), json!("Plan"));
    assert_eq!(
        StepNode::with_subtitle("Plan", "week 1").to_value(),
        json!({"title": "Plan", "subtitle": "week 1"})
    );
    assert_eq!(CardNode::label("Revenue").to_value(), json!("Revenue"));
    assert_eq!(
        CardNode::metric("Revenue", "$4M").to_value(),
        json!({"label": "Revenue", "value": "$4M"})
    );
}

#[test]
fn append_to_title_skips_untitled_slides() {
    let mut titled = SlideSpec::bullets("Risks", ["a"]);
    titled.append_to_title(" (2/3)");
    assert_eq!(titled.title_text(), Some("Risks (2/3)"));

    let mut untitled = SlideSpec::new(SlideContent::TwoColumn {
        title: None,
        left: "L".to_owned(),
        right: "R".to_owned(),
    });
    untitled.append_to_title(" (2/3)");
    assert_eq!(untitled.title_text(), None);
}

#[test]
fn to_value_keeps_extra_keys_and_pins() {
    let mut slide = SlideSpec::bullets("Agenda", ["one", "two"]);
    slide.common.template_layout = Some("Title and Content".to_owned());
    slide
        .common
        .extra
        .insert("notes".to_owned(), json!("speaker notes"));

    let v = slide.to_value();
    assert_eq!(v["layout"], json!("bullets"));
    assert_eq!(v["template_layout"], json!("Title and Content"));
    assert_eq!(v["notes"], json!("speaker notes"));
    assert_eq!(v["bullets"], json!(["one", "two"]));
}

#[test]
fn presentation_to_value_respects_wrapping() {
    let spec = PresentationSpec::new(vec![SlideSpec::title("Hello", None)]);
    assert!(spec.to_value(true)["presentation"]["slides"].is_array());
    assert!(spec.to_value(false)["slides"].is_array());
}

#[test]
fn orientation_parse_is_lenient() {
    assert_eq!(Orientation::parse("V"), Orientation::Vertical);
    assert_eq!(Orientation::parse(" vertical "), Orientation::Vertical);
    assert_eq!(Orientation::parse("sideways"), Orientation::Horizontal);
}

#[test]
fn chart_tags_parse() {
    assert_eq!(ChartKind::from_tag("bar-stacked"), Some(ChartKind::BarStacked));
    assert_eq!(ChartKind::from_tag("radar"), None);
    assert_eq!(LegendPosition::from_tag("Bottom"), Some(LegendPosition::Bottom));
}
