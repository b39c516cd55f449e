use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        DeckError::template("x")
            .to_string()
            .contains("template error:")
    );
    assert!(
        DeckError::assembly("x")
            .to_string()
            .contains("assembly error:")
    );
    assert!(DeckError::render("x").to_string().contains("render error:"));
    assert!(
        DeckError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = DeckError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn config_errors_convert_and_keep_every_issue() {
    let cfg = ConfigValidationError::new(vec![
        crate::spec::validate::ConfigIssue::at("slides[0].title", "is required"),
        crate::spec::validate::ConfigIssue::at("slides[2].bullets", "must be a list"),
    ]);
    let err: DeckError = cfg.into();
    let text = err.to_string();
    assert!(text.contains("slides[0].title"));
    assert!(text.contains("slides[2].bullets"));
}
