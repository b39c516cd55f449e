use crate::spec::model::{
    AgendaSetting, CardNode, CardsKey, ChartKind, ChartSeries, FooterSetting, LegendPosition,
    Orientation, PaletteOverride, PresentationSpec, SlideCommon, SlideContent, SlideKind,
    SlideSpec, StepNode,
};
use serde_json::{Map, Value};
use std::fmt;
use std::path::Path;

/// Palette sections that must be objects when present.
pub(crate) const PALETTE_SECTIONS: [&str; 3] = ["diagram", "footer", "image"];

/// One defect found while validating a spec.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfigIssue {
    /// Dotted location of the defect (`slides[2].bullets`); empty for document-level defects.
    pub path: String,
    /// What is wrong at that location.
    pub message: String,
}

impl ConfigIssue {
    /// Build an issue at `path`.
    pub fn at(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            return write!(f, "{}", self.message);
        }
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Every defect collected from one spec document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfigValidationError {
    issues: Vec<ConfigIssue>,
}

impl ConfigValidationError {
    /// Wrap collected issues; an empty list becomes a single generic issue.
    pub fn new(issues: Vec<ConfigIssue>) -> Self {
        if issues.is_empty() {
            return Self {
                issues: vec![ConfigIssue::at("", "invalid configuration")],
            };
        }
        Self { issues }
    }

    /// The collected issues, in discovery order.
    pub fn issues(&self) -> &[ConfigIssue] {
        &self.issues
    }

    /// `true` when some issue is reported at exactly `path`.
    pub fn has_issue_at(&self, path: &str) -> bool {
        self.issues.iter().any(|i| i.path == path)
    }
}

impl fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Configuration validation failed:")?;
        for issue in &self.issues {
            write!(f, "\n- {issue}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ConfigValidationError {}

/// Validate a raw spec document.
///
/// Returns the typed spec and whether the document was wrapped under `presentation`.
/// All defects are collected before failing.
pub fn validate(raw: &Value) -> Result<(PresentationSpec, bool), ConfigValidationError> {
    let Some(root) = raw.as_object() else {
        return Err(ConfigValidationError::new(vec![ConfigIssue::at(
            "",
            "root JSON value must be an object",
        )]));
    };

    let wrapped = root.contains_key("presentation");
    let presentation = if wrapped {
        match root.get("presentation") {
            Some(Value::Object(map)) => map,
            _ => {
                return Err(ConfigValidationError::new(vec![ConfigIssue::at(
                    "presentation",
                    "must be an object",
                )]));
            }
        }
    } else {
        root
    };

    let mut checker = Checker::default();
    let spec = checker.presentation(presentation, if wrapped { "presentation." } else { "" });
    match spec {
        Some(spec) if checker.issues.is_empty() => Ok((spec, wrapped)),
        _ => Err(ConfigValidationError::new(checker.issues)),
    }
}

/// Read and validate a JSON spec file.
pub fn validate_file(path: &Path) -> Result<(PresentationSpec, bool), ConfigValidationError> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
        let msg = if e.kind() == std::io::ErrorKind::NotFound {
            format!("config file not found: {}", path.display())
        } else {
            format!("failed to read config file {}: {e}", path.display())
        };
        ConfigValidationError::new(vec![ConfigIssue::at("", msg)])
    })?;
    let value: Value = serde_json::from_str(&raw).map_err(|e| {
        ConfigValidationError::new(vec![ConfigIssue::at(
            "",
            format!(
                "invalid JSON at line {}, column {}: {e}",
                e.line(),
                e.column()
            ),
        )])
    })?;
    validate(&value)
}

#[derive(Default)]
struct Checker {
    issues: Vec<ConfigIssue>,
}

impl Checker {
    fn push(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.issues.push(ConfigIssue::at(path, message));
    }

    fn presentation(&mut self, map: &Map<String, Value>, prefix: &str) -> Option<PresentationSpec> {
        let mut rest = map.clone();

        let title = self.opt_str(&mut rest, "title", prefix);
        let author = self.opt_str(&mut rest, "author", prefix);
        let confidentiality = self.opt_str(&mut rest, "confidentiality", prefix);
        let palette = self.palette(&mut rest, prefix);

        let footer = match rest.remove("footer") {
            None | Some(Value::Null) => None,
            Some(v @ (Value::Bool(_) | Value::Object(_))) => {
                match serde_json::from_value::<FooterSetting>(v) {
                    Ok(f) => Some(f),
                    Err(e) => {
                        self.push(format!("{prefix}footer"), e.to_string());
                        None
                    }
                }
            }
            Some(_) => {
                self.push(
                    format!("{prefix}footer"),
                    "must be a boolean or object when provided",
                );
                None
            }
        };

        let agenda = match rest.remove("agenda") {
            None | Some(Value::Null) => None,
            Some(v @ (Value::Bool(_) | Value::Object(_))) => {
                match serde_json::from_value::<AgendaSetting>(v) {
                    Ok(a) => Some(a),
                    Err(e) => {
                        self.push(format!("{prefix}agenda"), e.to_string());
                        None
                    }
                }
            }
            Some(_) => {
                self.push(
                    format!("{prefix}agenda"),
                    "must be a boolean or object when provided",
                );
                None
            }
        };

        let slides_path = format!("{prefix}slides");
        let raw_slides = match rest.remove("slides") {
            Some(Value::Array(items)) => items,
            _ => {
                self.push(&slides_path, "is required and must be a list");
                return None;
            }
        };
        if raw_slides.is_empty() {
            self.push(&slides_path, "must contain at least one slide");
            return None;
        }

        let mut slides = Vec::with_capacity(raw_slides.len());
        for (idx, raw) in raw_slides.iter().enumerate() {
            let path = format!("{slides_path}[{idx}]");
            match raw {
                Value::Object(slide) => {
                    if let Some(s) = self.slide(slide, &path) {
                        slides.push(s);
                    }
                }
                _ => self.push(path, "must be an object"),
            }
        }

        Some(PresentationSpec {
            title,
            author,
            confidentiality,
            palette,
            footer,
            agenda,
            slides,
            extra: rest,
        })
    }

    fn slide(&mut self, map: &Map<String, Value>, path: &str) -> Option<SlideSpec> {
        let mut rest = map.clone();
        let tag = match rest.remove("layout") {
            None | Some(Value::Null) => "blank".to_owned(),
            Some(Value::String(s)) if !s.trim().is_empty() => s,
            Some(_) => {
                self.push(format!("{path}.layout"), "must be a non-empty string");
                return None;
            }
        };
        let kind = match tag.as_str() {
            "infographic" => SlideKind::KpiCards,
            other => match SlideKind::from_tag(other) {
                Some(k) => k,
                None => {
                    let allowed: Vec<&str> = SlideKind::ALL.iter().map(|k| k.as_str()).collect();
                    self.push(
                        format!("{path}.layout"),
                        format!(
                            "'{tag}' is unsupported (supported: {})",
                            allowed.join(", ")
                        ),
                    );
                    return None;
                }
            },
        };

        let prefix = format!("{path}.");
        let mut common = SlideCommon {
            id: rest.remove("id"),
            ..SlideCommon::default()
        };
        common.template_layout = self.opt_str(&mut rest, "template_layout", &prefix);
        common.template_layout_index = self.opt_int(&mut rest, "template_layout_index", &prefix);
        common.palette = self.palette(&mut rest, &prefix);
        common.footer_exclude = self.opt_bool(&mut rest, "footer_exclude", &prefix);
        common.agenda_exclude = self.opt_bool(&mut rest, "agenda_exclude", &prefix);
        common.agenda_title = self.opt_str(&mut rest, "agenda_title", &prefix);

        let before = self.issues.len();
        let content = self.content(kind, &mut rest, path);
        common.extra = rest;

        match content {
            Some(content) if self.issues.len() == before => Some(SlideSpec { common, content }),
            _ => None,
        }
    }

    fn content(
        &mut self,
        kind: SlideKind,
        rest: &mut Map<String, Value>,
        path: &str,
    ) -> Option<SlideContent> {
        let prefix = format!("{path}.");
        let layout = kind.as_str();
        match kind {
            SlideKind::Title => {
                let title = self.req_str(rest, "title", path, layout);
                let subtitle = self.opt_str(rest, "subtitle", &prefix);
                Some(SlideContent::Title {
                    title: title?,
                    subtitle,
                })
            }
            SlideKind::Bullets => {
                let title = self.req_str(rest, "title", path, layout);
                let bullets = match rest.remove("bullets") {
                    Some(Value::Array(items)) if items.is_empty() => {
                        self.push(format!("{path}.bullets"), "must contain at least one bullet");
                        None
                    }
                    Some(Value::Array(items)) => {
                        let strings: Option<Vec<String>> = items
                            .iter()
                            .map(|v| v.as_str().map(str::to_owned))
                            .collect();
                        if strings.is_none() {
                            self.push(format!("{path}.bullets"), "must contain only strings");
                        }
                        strings
                    }
                    _ => {
                        self.push(format!("{path}.bullets"), "must be a list of strings");
                        None
                    }
                };
                Some(SlideContent::Bullets {
                    title: title?,
                    bullets: bullets?,
                })
            }
            SlideKind::TwoColumn => {
                let mut column = |checker: &mut Self, key: &str| match rest.remove(key) {
                    Some(Value::String(s)) => Some(s),
                    _ => {
                        checker.push(
                            format!("{path}.{key}"),
                            "is required for layout='two-column' and must be a string",
                        );
                        None
                    }
                };
                let left = column(self, "left");
                let right = column(self, "right");
                let title = self.opt_str(rest, "title", &prefix);
                Some(SlideContent::TwoColumn {
                    title,
                    left: left?,
                    right: right?,
                })
            }
            SlideKind::Chart => {
                let title = self.opt_str(rest, "title", &prefix);
                let categories = match rest.remove("categories") {
                    None | Some(Value::Null) => None,
                    Some(Value::Array(items))
                        if items.iter().all(|v| v.is_string()) =>
                    {
                        Some(
                            items
                                .iter()
                                .filter_map(|v| v.as_str().map(str::to_owned))
                                .collect(),
                        )
                    }
                    Some(_) => {
                        self.push(
                            format!("{path}.categories"),
                            "must be a list of strings when provided",
                        );
                        None
                    }
                };
                let series = self.series(rest, path);
                let chart_type = match self.opt_str(rest, "chart_type", &prefix) {
                    Some(tag) => {
                        let parsed = ChartKind::from_tag(&tag);
                        if parsed.is_none() {
                            self.push(
                                format!("{path}.chart_type"),
                                format!("'{tag}' is not a known chart type"),
                            );
                        }
                        parsed
                    }
                    None => None,
                };
                let legend = match self.opt_str(rest, "legend", &prefix) {
                    Some(tag) => {
                        let parsed = LegendPosition::from_tag(&tag);
                        if parsed.is_none() {
                            self.push(
                                format!("{path}.legend"),
                                format!("'{tag}' is not a known legend position"),
                            );
                        }
                        parsed
                    }
                    None => None,
                };
                Some(SlideContent::Chart {
                    title,
                    chart_type,
                    categories,
                    series,
                    legend,
                })
            }
            SlideKind::Image => {
                let image_path = match rest.get("image_path") {
                    Some(Value::String(s)) if !s.trim().is_empty() => {
                        let s = s.clone();
                        rest.remove("image_path");
                        Some(s)
                    }
                    _ => None,
                };
                let image_gen = match rest.get("image_gen") {
                    Some(Value::Object(g)) => {
                        let g = g.clone();
                        rest.remove("image_gen");
                        Some(g)
                    }
                    _ => None,
                };
                if image_path.is_none() && image_gen.is_none() {
                    self.push(
                        path,
                        "requires either image_path (string) or image_gen (object)",
                    );
                }
                let title = self.opt_str(rest, "title", &prefix);
                let caption = self.opt_str(rest, "caption", &prefix);
                Some(SlideContent::Image {
                    title,
                    image_path,
                    image_gen,
                    caption,
                })
            }
            SlideKind::Workflow => {
                let steps = match rest.remove("steps") {
                    Some(Value::Array(items)) if !items.is_empty() => {
                        self.nodes(&items, &format!("{path}.steps"))
                    }
                    _ => {
                        self.push(
                            format!("{path}.steps"),
                            "is required for layout='workflow' and must be a non-empty list",
                        );
                        None
                    }
                };
                let title = self.opt_str(rest, "title", &prefix);
                let orientation = self
                    .opt_str(rest, "orientation", &prefix)
                    .map(|o| Orientation::parse(&o));
                let show_numbers = self.opt_bool(rest, "show_numbers", &prefix);
                Some(SlideContent::Workflow {
                    title,
                    steps: steps?,
                    orientation,
                    show_numbers,
                })
            }
            SlideKind::KpiCards => {
                let (cards_key, raw) = if matches!(rest.get("cards"), Some(Value::Array(_))) {
                    (CardsKey::Cards, rest.remove("cards"))
                } else if matches!(rest.get("items"), Some(Value::Array(_))) {
                    (CardsKey::Items, rest.remove("items"))
                } else {
                    (CardsKey::Cards, None)
                };
                let cards = match raw {
                    Some(Value::Array(items)) if !items.is_empty() => {
                        self.cards(&items, &format!("{path}.{}", cards_key.as_str()))
                    }
                    _ => {
                        self.push(path, "requires cards (or items) as a non-empty list");
                        None
                    }
                };
                let title = self.opt_str(rest, "title", &prefix);
                let columns = self.opt_int(rest, "columns", &prefix);
                Some(SlideContent::KpiCards {
                    title,
                    cards: cards?,
                    cards_key,
                    columns,
                })
            }
            SlideKind::Architecture => {
                let title = self.opt_str(rest, "title", &prefix);
                let top_row = self.row(rest, &["top_row", "top"], path);
                let middle_row = self.row(rest, &["middle_row", "middle"], path);
                let bottom = self.row(rest, &["bottom"], path);
                Some(SlideContent::Architecture {
                    title,
                    top_row,
                    middle_row,
                    bottom,
                })
            }
            SlideKind::Blank => {
                let title = self.opt_str(rest, "title", &prefix);
                Some(SlideContent::Blank { title })
            }
        }
    }

    fn series(&mut self, rest: &mut Map<String, Value>, path: &str) -> Option<Vec<ChartSeries>> {
        let items = match rest.remove("series") {
            None | Some(Value::Null) => return None,
            Some(Value::Array(items)) => items,
            Some(_) => {
                self.push(format!("{path}.series"), "must be a list when provided");
                return None;
            }
        };

        let mut out = Vec::with_capacity(items.len());
        for (idx, item) in items.iter().enumerate() {
            let sp = format!("{path}.series[{idx}]");
            let Some(obj) = item.as_object() else {
                self.push(sp, "must be an object with name + values");
                continue;
            };
            let name = match obj.get("name") {
                None | Some(Value::Null) => None,
                Some(Value::String(s)) => Some(s.clone()),
                Some(_) => {
                    self.push(format!("{sp}.name"), "must be a string when provided");
                    None
                }
            };
            match obj.get("values") {
                None | Some(Value::Null) => self.push(format!("{sp}.values"), "is required"),
                Some(Value::Array(vals)) => {
                    let nums: Option<Vec<f64>> = vals.iter().map(Value::as_f64).collect();
                    match nums {
                        Some(values) => out.push(ChartSeries { name, values }),
                        None => self.push(format!("{sp}.values"), "must be a list of numbers"),
                    }
                }
                Some(_) => self.push(format!("{sp}.values"), "must be a list of numbers"),
            }
        }
        Some(out)
    }

    fn row(
        &mut self,
        rest: &mut Map<String, Value>,
        keys: &[&str],
        path: &str,
    ) -> Option<Vec<StepNode>> {
        let key = keys.iter().find(|k| rest.contains_key(**k))?;
        let value = rest.remove(*key)?;
        let row_path = format!("{path}.{key}");
        match value {
            Value::Null => None,
            Value::Array(items) => self.nodes(&items, &row_path),
            single @ (Value::String(_) | Value::Object(_)) => {
                self.nodes(std::slice::from_ref(&single), &row_path)
            }
            _ => {
                self.push(row_path, "must be a list of strings or objects when provided");
                None
            }
        }
    }

    fn nodes(&mut self, items: &[Value], path: &str) -> Option<Vec<StepNode>> {
        let mut out = Vec::with_capacity(items.len());
        let mut ok = true;
        for (idx, item) in items.iter().enumerate() {
            let ip = format!("{path}[{idx}]");
            match item {
                Value::String(s) => out.push(StepNode::new(s.clone())),
                Value::Object(obj) => {
                    let mut extra = obj.clone();
                    let title = self.alias_str(&mut extra, &["title", "text", "label"], &ip);
                    let subtitle = self.alias_str(&mut extra, &["subtitle", "note"], &ip);
                    out.push(StepNode {
                        title: title.unwrap_or_default(),
                        subtitle,
                        extra,
                    });
                }
                _ => {
                    self.push(ip, "must be a string or an object");
                    ok = false;
                }
            }
        }
        ok.then_some(out)
    }

    fn cards(&mut self, items: &[Value], path: &str) -> Option<Vec<CardNode>> {
        let mut out = Vec::with_capacity(items.len());
        let mut ok = true;
        for (idx, item) in items.iter().enumerate() {
            let ip = format!("{path}[{idx}]");
            match item {
                Value::String(s) => out.push(CardNode::label(s.clone())),
                Value::Object(obj) => {
                    let mut extra = obj.clone();
                    let label = self.alias_str(&mut extra, &["label", "title"], &ip);
                    let value = self.alias_str(&mut extra, &["value", "metric", "number"], &ip);
                    let note = self.alias_str(&mut extra, &["note", "subtitle"], &ip);
                    let icon_path = self.alias_str(&mut extra, &["icon_path", "image_path"], &ip);
                    out.push(CardNode {
                        label,
                        value,
                        note,
                        icon_path,
                        extra,
                    });
                }
                _ => {
                    self.push(ip, "must be a string or an object");
                    ok = false;
                }
            }
        }
        ok.then_some(out)
    }

    /// First present alias wins; numbers are accepted and kept as their decimal text.
    fn alias_str(
        &mut self,
        map: &mut Map<String, Value>,
        keys: &[&str],
        path: &str,
    ) -> Option<String> {
        let key = keys.iter().find(|k| map.contains_key(**k))?;
        match map.remove(*key)? {
            Value::Null => None,
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            _ => {
                self.push(format!("{path}.{key}"), "must be a string when provided");
                None
            }
        }
    }

    fn palette(&mut self, rest: &mut Map<String, Value>, prefix: &str) -> Option<PaletteOverride> {
        match rest.remove("palette") {
            None | Some(Value::Null) => None,
            Some(Value::Object(map)) => {
                for section in PALETTE_SECTIONS {
                    match map.get(section) {
                        None | Some(Value::Null) | Some(Value::Object(_)) => {}
                        Some(_) => self.push(
                            format!("{prefix}palette.{section}"),
                            "must be an object when provided",
                        ),
                    }
                }
                Some(PaletteOverride(map))
            }
            Some(_) => {
                self.push(format!("{prefix}palette"), "must be an object when provided");
                None
            }
        }
    }

    fn req_str(
        &mut self,
        rest: &mut Map<String, Value>,
        key: &str,
        path: &str,
        layout: &str,
    ) -> Option<String> {
        match rest.remove(key) {
            Some(Value::String(s)) if !s.trim().is_empty() => Some(s),
            _ => {
                self.push(
                    format!("{path}.{key}"),
                    format!("is required for layout='{layout}' and must be a non-empty string"),
                );
                None
            }
        }
    }

    fn opt_str(
        &mut self,
        rest: &mut Map<String, Value>,
        key: &str,
        prefix: &str,
    ) -> Option<String> {
        match rest.remove(key) {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s),
            Some(_) => {
                self.push(format!("{prefix}{key}"), "must be a string when provided");
                None
            }
        }
    }

    fn opt_int(&mut self, rest: &mut Map<String, Value>, key: &str, prefix: &str) -> Option<i64> {
        match rest.remove(key) {
            None | Some(Value::Null) => None,
            Some(v) => match v.as_i64() {
                Some(i) => Some(i),
                None => {
                    self.push(format!("{prefix}{key}"), "must be an integer when provided");
                    None
                }
            },
        }
    }

    fn opt_bool(&mut self, rest: &mut Map<String, Value>, key: &str, prefix: &str) -> Option<bool> {
        match rest.remove(key) {
            None | Some(Value::Null) => None,
            Some(Value::Bool(b)) => Some(b),
            Some(_) => {
                self.push(format!("{prefix}{key}"), "must be a boolean when provided");
                None
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/spec/validate.rs"]
mod tests;
