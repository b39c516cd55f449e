use serde_json::{Map, Value, json};

/// Map legacy layout names onto the supported tags; empty names become `blank`.
pub fn normalize_legacy_layout(layout: &str) -> String {
    let normalized = layout.trim().to_ascii_lowercase();
    match normalized.as_str() {
        "title_and_body" | "title-and-body" | "title-body" | "content" => "bullets".to_owned(),
        "kpi_cards" | "kpi" => "kpi-cards".to_owned(),
        "two_column" | "two-columns" | "two columns" => "two-column".to_owned(),
        "" => "blank".to_owned(),
        _ => normalized,
    }
}

/// Convert a legacy `{slides: [...]}` payload into a wrapped presentation document.
///
/// Only title, bullets, blank and two-column slides carry over; anything else becomes a
/// titled blank slide. The result always starts with a title slide.
pub fn adapt_legacy_spec(legacy: &Value, document_title: &str, confidentiality: &str) -> Value {
    let slides_in = legacy
        .get("slides")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    let mut slides: Vec<Value> = slides_in
        .iter()
        .filter_map(Value::as_object)
        .map(|slide| adapt_slide(slide, document_title))
        .collect();

    let starts_with_title = slides
        .first()
        .and_then(|s| s.get("layout"))
        .and_then(Value::as_str)
        == Some("title");
    if !starts_with_title {
        slides.insert(
            0,
            json!({"layout": "title", "title": document_title, "subtitle": ""}),
        );
    }

    json!({
        "presentation": {
            "title": document_title,
            "confidentiality": confidentiality,
            "slides": slides,
        }
    })
}

fn adapt_slide(slide: &Map<String, Value>, document_title: &str) -> Value {
    let layout = normalize_legacy_layout(&text(slide.get("layout")));
    let title = text(slide.get("title")).trim().to_owned();
    let or = |fallback: &str| {
        if title.is_empty() {
            fallback.to_owned()
        } else {
            title.clone()
        }
    };

    match layout.as_str() {
        "title" => json!({
            "layout": "title",
            "title": or(document_title),
            "subtitle": text(slide.get("subtitle")).trim(),
        }),
        "blank" => json!({"layout": "blank", "title": title}),
        "bullets" => {
            let mut bullets: Vec<String> = slide
                .get("bullets")
                .and_then(Value::as_array)
                .map(|items| {
                    items
                        .iter()
                        .map(|v| text(Some(v)).trim().to_owned())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default();
            if bullets.is_empty() {
                bullets.push("Key point".to_owned());
            }
            json!({"layout": "bullets", "title": or("Slide"), "bullets": bullets})
        }
        "two-column" => json!({
            "layout": "two-column",
            "title": or("Comparison"),
            "left": text(slide.get("left")),
            "right": text(slide.get("right")),
        }),
        _ => json!({"layout": "blank", "title": or("Slide")}),
    }
}

/// Loose string coercion: strings as-is, numbers and bools as text, everything else empty.
fn text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/spec/legacy.rs"]
mod tests;
