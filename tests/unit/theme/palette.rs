use super::*;
use serde_json::json;

fn override_of(v: Value) -> PaletteOverride {
    PaletteOverride(v.as_object().cloned().unwrap())
}

#[test]
fn color_forms_normalize_to_the_same_value() {
    let expected = Some(ColorValue::Rgb(Rgb::new(0x11, 0x22, 0x33)));
    assert_eq!(ColorValue::parse("112233"), expected);
    assert_eq!(ColorValue::parse("#112233"), expected);
    assert_eq!(ColorValue::parse("rgb(17, 34, 51)"), expected);
    assert_eq!(
        ColorValue::parse("RGB(300,-0,12)"),
        None,
        "negative channels are not numbers"
    );
    assert_eq!(
        ColorValue::parse("rgb(300, 0, 12)"),
        Some(ColorValue::Rgb(Rgb::new(255, 0, 12)))
    );
    assert_eq!(
        ColorValue::parse("accent_2"),
        Some(ColorValue::Theme(ColorRole::Accent2))
    );
    assert_eq!(ColorValue::parse("rgb(1,2)"), None);
    assert_eq!(ColorValue::parse("chartreuse"), None);
}

#[test]
fn slide_beats_presentation_beats_theme_default() {
    let resolver = ThemeResolver::new(ThemeName::Light, ThemeColors::default());
    let pres = override_of(json!({"diagram": {"fill": "#000001", "line": "#000002"}}));
    let slide = override_of(json!({"fill": "#0000FF"}));
    let scopes = PaletteScopes {
        slide: Some(&slide),
        presentation: Some(&pres),
    };

    let p = resolver.diagram_palette(scopes);
    assert_eq!(p.fill.rgb, Rgb::new(0, 0, 255));
    assert_eq!(p.line.rgb, Rgb::new(0, 0, 2));
    assert_eq!(p.arrow.rgb, Rgb::new(2, 132, 199));
    assert_eq!(p.text_primary.rgb, Rgb::new(15, 23, 42));
}

#[test]
fn unparseable_override_falls_through() {
    let resolver = ThemeResolver::new(ThemeName::Dark, ThemeColors::default());
    let pres = override_of(json!({"footer": {"text": "#ABCDEF"}}));
    let slide = override_of(json!({"footer": {"text": "nonsense"}}));
    let scopes = PaletteScopes {
        slide: Some(&slide),
        presentation: Some(&pres),
    };
    assert_eq!(
        resolver.footer_palette(scopes).text.rgb,
        Rgb::new(0xAB, 0xCD, 0xEF)
    );
}

#[test]
fn template_theme_uses_extracted_roles_with_fallbacks() {
    let colors = ThemeColors::from_entries([
        (ColorRole::Accent1, Rgb::new(1, 2, 3)),
        (ColorRole::Light1, Rgb::new(250, 250, 250)),
    ]);
    let resolver = ThemeResolver::new(ThemeName::Template, colors);
    let p = resolver.diagram_palette(PaletteScopes::default());

    assert_eq!(p.line, ResolvedColor {
        rgb: Rgb::new(1, 2, 3),
        role: Some(ColorRole::Accent1)
    });
    assert_eq!(p.fill.rgb, Rgb::new(250, 250, 250));
    // Text1 is absent from the scheme entirely.
    assert_eq!(p.text_primary.rgb, Rgb::new(15, 23, 42));
}

#[test]
fn theme_role_overrides_resolve_through_the_scheme() {
    let colors = ThemeColors::from_entries([(ColorRole::Accent3, Rgb::new(9, 9, 9))]);
    let resolver = ThemeResolver::new(ThemeName::Dark, colors);
    let slide = override_of(json!({"diagram": {"arrow": "ACCENT_3"}}));
    let scopes = PaletteScopes {
        slide: Some(&slide),
        presentation: None,
    };
    assert_eq!(
        resolver.resolve_palette(scopes, PaletteSection::Diagram, "arrow"),
        Some(ResolvedColor {
            rgb: Rgb::new(9, 9, 9),
            role: Some(ColorRole::Accent3)
        })
    );
    assert_eq!(
        resolver.resolve_palette(scopes, PaletteSection::Diagram, "glow"),
        None
    );
}

#[test]
fn builtin_dark_theme_colors() {
    let resolver = ThemeResolver::new(ThemeName::Dark, ThemeColors::default());
    let colors = resolver.slide_colors();
    assert_eq!(colors.background.rgb, Rgb::new(15, 23, 42));
    assert_eq!(
        resolver.diagram_palette(PaletteScopes::default()).fill.rgb,
        Rgb::new(30, 41, 59)
    );
    assert_eq!(ThemeName::parse("LIGHT"), Some(ThemeName::Light));
}
