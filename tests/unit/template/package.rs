use super::*;
use crate::template::capability::Position;
use std::io::Write;

const NS: &str = r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main""#;

fn sp(ph: &str, xfrm: Option<(i64, i64, i64, i64)>) -> String {
    let xfrm = xfrm
        .map(|(x, y, cx, cy)| {
            format!(r#"<a:xfrm><a:off x="{x}" y="{y}"/><a:ext cx="{cx}" cy="{cy}"/></a:xfrm>"#)
        })
        .unwrap_or_default();
    format!(
        r#"<p:sp><p:nvSpPr><p:cNvPr id="2" name="ph"/><p:cNvSpPr/><p:nvPr>{ph}</p:nvPr></p:nvSpPr><p:spPr>{xfrm}</p:spPr><p:extLst><p:ext uri="{{x}}"/></p:extLst></p:sp>"#
    )
}

fn layout(name: &str, shapes: &[String]) -> String {
    format!(
        r#"<?xml version="1.0"?><p:sldLayout {NS}><p:cSld name="{name}"><p:spTree>{}</p:spTree></p:cSld></p:sldLayout>"#,
        shapes.concat()
    )
}

/// 10in x 5.625in package whose master lists layout 2 before layout 1.
fn write_package(path: &std::path::Path) {
    let emu = |inches: f64| (inches * EMU_PER_INCH) as i64;
    let presentation = format!(
        r#"<?xml version="1.0"?><p:presentation {NS}><p:sldSz cx="9144000" cy="5143500"/></p:presentation>"#
    );
    let master = format!(
        r#"<?xml version="1.0"?><p:sldMaster {NS}><p:cSld><p:spTree>{}{}</p:spTree></p:cSld><p:sldLayoutIdLst><p:sldLayoutId id="2147483649" r:id="rId2"/><p:sldLayoutId id="2147483650" r:id="rId1"/></p:sldLayoutIdLst></p:sldMaster>"#,
        sp(r#"<p:ph type="title"/>"#, Some((emu(0.5), emu(0.3), emu(9.0), emu(0.9)))),
        sp(r#"<p:ph type="body" idx="1"/>"#, Some((emu(0.5), emu(1.4), emu(9.0), emu(3.6)))),
    );
    let rels = r#"<?xml version="1.0"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="slideLayout" Target="../slideLayouts/slideLayout1.xml"/><Relationship Id="rId2" Type="slideLayout" Target="../slideLayouts/slideLayout2.xml"/></Relationships>"#;
    let title_layout = layout(
        "Title Slide",
        &[
            sp(r#"<p:ph type="ctrTitle"/>"#, Some((emu(1.0), emu(1.5), emu(8.0), emu(1.2)))),
            sp(r#"<p:ph type="subTitle" idx="1"/>"#, None),
            sp(r#"<p:ph type="dt" idx="10"/>"#, None),
        ],
    );
    let two_layout = layout(
        "Two Content",
        &[
            sp(r#"<p:ph type="title"/>"#, None),
            sp(r#"<p:ph sz="half" idx="1"/>"#, Some((emu(0.5), emu(1.4), emu(4.3), emu(3.6)))),
            sp(r#"<p:ph sz="half" idx="2"/>"#, Some((emu(5.2), emu(1.4), emu(4.3), emu(3.6)))),
            sp(r#"<p:ph type="sldNum" idx="12"/>"#, None),
        ],
    );

    let file = std::fs::File::create(path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    let opts = zip::write::SimpleFileOptions::default();
    for (name, body) in [
        ("ppt/presentation.xml", presentation.as_str()),
        ("ppt/slideMasters/slideMaster1.xml", master.as_str()),
        ("ppt/slideMasters/_rels/slideMaster1.xml.rels", rels),
        ("ppt/slideLayouts/slideLayout1.xml", title_layout.as_str()),
        ("ppt/slideLayouts/slideLayout2.xml", two_layout.as_str()),
    ] {
        zip.start_file(name, opts).unwrap();
        zip.write_all(body.as_bytes()).unwrap();
    }
    zip.finish().unwrap();
}

#[test]
fn package_layouts_follow_master_order_and_inherit_geometry() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("corp.pptx");
    write_package(&path);

    let template = load_package(&path).unwrap();
    assert!((template.slide_size.width - 10.0).abs() < 1e-9);
    assert!((template.slide_size.height - 5.625).abs() < 1e-9);
    assert!(template.theme.is_empty());

    let names: Vec<&str> = template.layouts.iter().map(|l| l.name.as_str()).collect();
    assert_eq!(names, ["Two Content", "Title Slide"]);

    let two = &template.layouts[0].capabilities;
    assert_eq!(two.count(PlaceholderRole::Title), 1);
    assert_eq!(two.count(PlaceholderRole::Body), 2);
    assert_eq!(two.len(), 3, "slide number slot is not a capability");
    let title = two.first(PlaceholderRole::Title).unwrap();
    assert!((title.bounds.y - 0.3).abs() < 1e-6, "title inherits master geometry");
    assert!(two.left_right_bodies().is_some());

    let cover = &template.layouts[1].capabilities;
    let subtitle = cover.first(PlaceholderRole::Subtitle).unwrap();
    assert!((subtitle.bounds.y - 1.4).abs() < 1e-6, "subtitle inherits master idx 1");
    assert_eq!(subtitle.position, Position::Center);
}

#[test]
fn relationship_targets_resolve_against_the_part_directory() {
    assert_eq!(
        resolve_target("ppt/slideMasters", "../slideLayouts/slideLayout3.xml"),
        "ppt/slideLayouts/slideLayout3.xml"
    );
    assert_eq!(
        resolve_target("ppt/slideMasters", "/ppt/slideLayouts/x.xml"),
        "ppt/slideLayouts/x.xml"
    );
}

#[test]
fn non_packages_are_template_errors() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fake.pptx");
    std::fs::write(&path, b"not a zip").unwrap();
    let err = load_package(&path).unwrap_err();
    assert!(err.to_string().starts_with("template error:"));

    let err = load_package(&dir.path().join("missing.pptx")).unwrap_err();
    assert!(err.to_string().contains("failed to open template"));
}
