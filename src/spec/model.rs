use serde::ser::{Serialize, Serializer};
use serde_json::{Map, Value};

/// A validated presentation: ordered slides plus deck-wide settings.
///
/// Built by [`crate::validate`]; serialized back with [`PresentationSpec::to_value`] in the same
/// wrapped or flat shape the author used.
#[derive(Clone, Debug, PartialEq)]
pub struct PresentationSpec {
    /// Deck title, also used by the footer.
    pub title: Option<String>,
    /// Deck author.
    pub author: Option<String>,
    /// Confidentiality marker shown in the footer.
    pub confidentiality: Option<String>,
    /// Presentation-scope color overrides.
    pub palette: Option<PaletteOverride>,
    /// Footer toggle or settings.
    pub footer: Option<FooterSetting>,
    /// Agenda toggle or settings.
    pub agenda: Option<AgendaSetting>,
    /// Ordered slides; never empty after validation.
    pub slides: Vec<SlideSpec>,
    /// Unrecognized presentation keys, kept verbatim.
    pub extra: Map<String, Value>,
}

impl PresentationSpec {
    /// A deck with the given slides and no other settings.
    pub fn new(slides: Vec<SlideSpec>) -> Self {
        Self {
            title: None,
            author: None,
            confidentiality: None,
            palette: None,
            footer: None,
            agenda: None,
            slides,
            extra: Map::new(),
        }
    }

    /// Serialize to JSON, wrapping under `presentation` when `wrapped` is set.
    pub fn to_value(&self, wrapped: bool) -> Value {
        let mut map = self.extra.clone();
        put_opt_str(&mut map, "title", &self.title);
        put_opt_str(&mut map, "author", &self.author);
        put_opt_str(&mut map, "confidentiality", &self.confidentiality);
        if let Some(p) = &self.palette {
            map.insert("palette".to_owned(), Value::Object(p.0.clone()));
        }
        if let Some(f) = &self.footer {
            map.insert("footer".to_owned(), to_json(f));
        }
        if let Some(a) = &self.agenda {
            map.insert("agenda".to_owned(), to_json(a));
        }
        map.insert(
            "slides".to_owned(),
            Value::Array(self.slides.iter().map(SlideSpec::to_value).collect()),
        );

        if wrapped {
            let mut root = Map::new();
            root.insert("presentation".to_owned(), Value::Object(map));
            Value::Object(root)
        } else {
            Value::Object(map)
        }
    }
}

/// The slide variants the engine knows how to lay out.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SlideKind {
    /// Cover or section title.
    Title,
    /// Title plus a bullet list.
    Bullets,
    /// Two text columns.
    TwoColumn,
    /// Data chart.
    Chart,
    /// Single picture.
    Image,
    /// Step chain diagram.
    Workflow,
    /// Fixed three-row architecture diagram.
    Architecture,
    /// KPI card grid.
    KpiCards,
    /// Empty slide with an optional title.
    Blank,
}

impl SlideKind {
    /// Every kind, in tag order.
    pub const ALL: [SlideKind; 9] = [
        SlideKind::Title,
        SlideKind::Bullets,
        SlideKind::TwoColumn,
        SlideKind::Chart,
        SlideKind::Image,
        SlideKind::Workflow,
        SlideKind::Architecture,
        SlideKind::KpiCards,
        SlideKind::Blank,
    ];

    /// The `layout` tag used in spec documents.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Bullets => "bullets",
            Self::TwoColumn => "two-column",
            Self::Chart => "chart",
            Self::Image => "image",
            Self::Workflow => "workflow",
            Self::Architecture => "architecture",
            Self::KpiCards => "kpi-cards",
            Self::Blank => "blank",
        }
    }

    /// Parse a `layout` tag.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == tag)
    }
}

impl std::fmt::Display for SlideKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One slide: fields shared by every variant plus the variant payload.
#[derive(Clone, Debug, PartialEq)]
pub struct SlideSpec {
    /// Shared fields.
    pub common: SlideCommon,
    /// Variant payload.
    pub content: SlideContent,
}

/// Fields any slide may carry regardless of its variant.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SlideCommon {
    /// Author-provided identifier; dropped on slides created by splitting.
    pub id: Option<Value>,
    /// Layout pin by template layout name.
    pub template_layout: Option<String>,
    /// Layout pin by template layout index.
    pub template_layout_index: Option<i64>,
    /// Slide-scope color overrides.
    pub palette: Option<PaletteOverride>,
    /// Suppress the footer on this slide.
    pub footer_exclude: Option<bool>,
    /// Leave this slide out of the agenda.
    pub agenda_exclude: Option<bool>,
    /// Agenda entry text, when it should differ from the title.
    pub agenda_title: Option<String>,
    /// Unrecognized keys, kept verbatim.
    pub extra: Map<String, Value>,
}

/// Variant payloads, one per [`SlideKind`].
#[derive(Clone, Debug, PartialEq)]
pub enum SlideContent {
    /// `title`
    Title {
        /// Required title.
        title: String,
        /// Optional subtitle.
        subtitle: Option<String>,
    },
    /// `bullets`
    Bullets {
        /// Required title.
        title: String,
        /// At least one bullet.
        bullets: Vec<String>,
    },
    /// `two-column`
    TwoColumn {
        /// Optional title.
        title: Option<String>,
        /// Left column text; newline separated, first line is the heading.
        left: String,
        /// Right column text.
        right: String,
    },
    /// `chart`
    Chart {
        /// Optional title.
        title: Option<String>,
        /// Chart type.
        chart_type: Option<ChartKind>,
        /// Category labels.
        categories: Option<Vec<String>>,
        /// Data series.
        series: Option<Vec<ChartSeries>>,
        /// Legend placement.
        legend: Option<LegendPosition>,
    },
    /// `image`
    Image {
        /// Optional title.
        title: Option<String>,
        /// Path to an existing image.
        image_path: Option<String>,
        /// Parameters for generated imagery, handed to the asset provider.
        image_gen: Option<Map<String, Value>>,
        /// Optional caption.
        caption: Option<String>,
    },
    /// `workflow`
    Workflow {
        /// Optional title.
        title: Option<String>,
        /// At least one step.
        steps: Vec<StepNode>,
        /// Flow orientation.
        orientation: Option<Orientation>,
        /// Prefix step headers with their ordinal.
        show_numbers: Option<bool>,
    },
    /// `architecture`
    Architecture {
        /// Optional title.
        title: Option<String>,
        /// Top row nodes (three used).
        top_row: Option<Vec<StepNode>>,
        /// Middle row nodes (three used).
        middle_row: Option<Vec<StepNode>>,
        /// Bottom node (first used).
        bottom: Option<Vec<StepNode>>,
    },
    /// `kpi-cards`
    KpiCards {
        /// Optional title.
        title: Option<String>,
        /// At least one card.
        cards: Vec<CardNode>,
        /// Which key the cards were read from.
        cards_key: CardsKey,
        /// Explicit column count.
        columns: Option<i64>,
    },
    /// `blank`
    Blank {
        /// Optional title.
        title: Option<String>,
    },
}

/// Where KPI cards were declared, so serialization writes them back under the same key.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CardsKey {
    /// `cards`
    #[default]
    Cards,
    /// `items`
    Items,
}

impl CardsKey {
    /// JSON key.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cards => "cards",
            Self::Items => "items",
        }
    }
}

/// Workflow flow direction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Rows of boxes, left to right first.
    #[default]
    Horizontal,
    /// Columns of boxes, top to bottom first.
    Vertical,
}

impl Orientation {
    /// Lenient parse; `v`, `vert` and `vertical` select vertical, everything else horizontal.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "v" | "vert" | "vertical" => Self::Vertical,
            _ => Self::Horizontal,
        }
    }
}

/// Chart types understood by the assembler.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChartKind {
    /// Clustered columns.
    #[default]
    Column,
    /// Clustered columns (explicit).
    ColumnClustered,
    /// Stacked columns.
    ColumnStacked,
    /// Clustered bars.
    Bar,
    /// Clustered bars (explicit).
    BarClustered,
    /// Stacked bars.
    BarStacked,
    /// Line chart.
    Line,
    /// Pie chart.
    Pie,
    /// Doughnut chart.
    Donut,
    /// Area chart.
    Area,
}

impl ChartKind {
    /// Parse a `chart_type` tag.
    pub fn from_tag(tag: &str) -> Option<Self> {
        serde_json::from_value(Value::String(tag.trim().to_ascii_lowercase())).ok()
    }
}

/// Chart legend placement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LegendPosition {
    /// Right of the plot.
    Right,
    /// Left of the plot.
    Left,
    /// Above the plot.
    Top,
    /// Below the plot.
    Bottom,
    /// No legend.
    None,
}

impl LegendPosition {
    /// Parse a `legend` tag.
    pub fn from_tag(tag: &str) -> Option<Self> {
        serde_json::from_value(Value::String(tag.trim().to_ascii_lowercase())).ok()
    }
}

/// One chart data series.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ChartSeries {
    /// Series name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Numeric values, one per category.
    pub values: Vec<f64>,
}

/// A workflow step or architecture node.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StepNode {
    /// Headline; may be empty, in which case geometry skips the node.
    pub title: String,
    /// Secondary line.
    pub subtitle: Option<String>,
    /// Unrecognized keys, kept verbatim.
    pub extra: Map<String, Value>,
}

impl StepNode {
    /// A node with a title only.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// A node with a title and subtitle.
    pub fn with_subtitle(title: impl Into<String>, subtitle: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subtitle: Some(subtitle.into()),
            extra: Map::new(),
        }
    }

    /// Plain-string nodes stay strings; anything richer becomes an object.
    pub fn to_value(&self) -> Value {
        if self.subtitle.is_none() && self.extra.is_empty() {
            return Value::String(self.title.clone());
        }
        let mut map = self.extra.clone();
        map.insert("title".to_owned(), Value::String(self.title.clone()));
        put_opt_str(&mut map, "subtitle", &self.subtitle);
        Value::Object(map)
    }

    /// Characters the step contributes to on-slide text.
    pub fn text_len(&self) -> usize {
        self.title.chars().count() + self.subtitle.as_deref().map_or(0, |s| s.chars().count())
    }
}

/// A KPI card.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CardNode {
    /// Card label.
    pub label: Option<String>,
    /// Headline metric.
    pub value: Option<String>,
    /// Supporting note.
    pub note: Option<String>,
    /// Optional icon image.
    pub icon_path: Option<String>,
    /// Unrecognized keys, kept verbatim.
    pub extra: Map<String, Value>,
}

impl CardNode {
    /// A card with a label only.
    pub fn label(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..Self::default()
        }
    }

    /// A card with a label and a value.
    pub fn metric(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            value: Some(value.into()),
            ..Self::default()
        }
    }

    /// True when the card has nothing to show.
    pub fn is_empty(&self) -> bool {
        [&self.label, &self.value, &self.note, &self.icon_path]
            .into_iter()
            .all(|f| f.as_deref().is_none_or(|s| s.trim().is_empty()))
    }

    /// Label-only cards stay strings; anything richer becomes an object.
    pub fn to_value(&self) -> Value {
        if self.value.is_none()
            && self.note.is_none()
            && self.icon_path.is_none()
            && self.extra.is_empty()
            && let Some(label) = &self.label
        {
            return Value::String(label.clone());
        }
        let mut map = self.extra.clone();
        put_opt_str(&mut map, "label", &self.label);
        put_opt_str(&mut map, "value", &self.value);
        put_opt_str(&mut map, "note", &self.note);
        put_opt_str(&mut map, "icon_path", &self.icon_path);
        Value::Object(map)
    }
}

/// Raw palette override object: `{diagram: {...}, footer: {...}, image: {...}}` or
/// section keys at the top level as shorthand.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct PaletteOverride(pub Map<String, Value>);

/// Footer toggle or settings object.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum FooterSetting {
    /// `true` / `false`.
    Enabled(bool),
    /// Settings object.
    Config(FooterConfig),
}

/// Footer settings.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FooterConfig {
    /// Defaults to enabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    /// Overrides the deck title in the footer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Overrides the deck confidentiality marker.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidentiality: Option<String>,
    /// Also place the footer on title slides.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_on_title: Option<bool>,
    /// Show page numbers; defaults to true.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_page_number: Option<bool>,
    /// Render page numbers as `n/total`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_total: Option<bool>,
    /// Unrecognized keys, kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Agenda toggle or settings object.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum AgendaSetting {
    /// `true` / `false`.
    Enabled(bool),
    /// Settings object.
    Config(AgendaConfig),
}

/// Agenda settings.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AgendaConfig {
    /// Defaults to enabled when the object is present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    /// Agenda slide title; defaults to `Agenda`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Layout pin by name for the agenda slide.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_layout: Option<String>,
    /// Layout pin by index for the agenda slide.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_layout_index: Option<i64>,
    /// Unrecognized keys, kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SlideSpec {
    /// A slide with default shared fields.
    pub fn new(content: SlideContent) -> Self {
        Self {
            common: SlideCommon::default(),
            content,
        }
    }

    /// Convenience constructor for a `title` slide.
    pub fn title(title: impl Into<String>, subtitle: Option<&str>) -> Self {
        Self::new(SlideContent::Title {
            title: title.into(),
            subtitle: subtitle.map(str::to_owned),
        })
    }

    /// Convenience constructor for a `bullets` slide.
    pub fn bullets<I, S>(title: impl Into<String>, bullets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(SlideContent::Bullets {
            title: title.into(),
            bullets: bullets.into_iter().map(Into::into).collect(),
        })
    }

    /// Variant tag.
    pub fn kind(&self) -> SlideKind {
        match &self.content {
            SlideContent::Title { .. } => SlideKind::Title,
            SlideContent::Bullets { .. } => SlideKind::Bullets,
            SlideContent::TwoColumn { .. } => SlideKind::TwoColumn,
            SlideContent::Chart { .. } => SlideKind::Chart,
            SlideContent::Image { .. } => SlideKind::Image,
            SlideContent::Workflow { .. } => SlideKind::Workflow,
            SlideContent::Architecture { .. } => SlideKind::Architecture,
            SlideContent::KpiCards { .. } => SlideKind::KpiCards,
            SlideContent::Blank { .. } => SlideKind::Blank,
        }
    }

    /// Title text, when present and non-empty.
    pub fn title_text(&self) -> Option<&str> {
        let t = match &self.content {
            SlideContent::Title { title, .. } | SlideContent::Bullets { title, .. } => {
                Some(title.as_str())
            }
            SlideContent::TwoColumn { title, .. }
            | SlideContent::Chart { title, .. }
            | SlideContent::Image { title, .. }
            | SlideContent::Workflow { title, .. }
            | SlideContent::Architecture { title, .. }
            | SlideContent::KpiCards { title, .. }
            | SlideContent::Blank { title } => title.as_deref(),
        };
        t.filter(|s| !s.trim().is_empty())
    }

    /// Append a suffix to a non-empty title; untitled slides are left alone.
    pub fn append_to_title(&mut self, suffix: &str) {
        let slot = match &mut self.content {
            SlideContent::Title { title, .. } | SlideContent::Bullets { title, .. } => {
                if title.is_empty() {
                    return;
                }
                title
            }
            SlideContent::TwoColumn { title, .. }
            | SlideContent::Chart { title, .. }
            | SlideContent::Image { title, .. }
            | SlideContent::Workflow { title, .. }
            | SlideContent::Architecture { title, .. }
            | SlideContent::KpiCards { title, .. }
            | SlideContent::Blank { title } => match title {
                Some(t) if !t.is_empty() => t,
                _ => return,
            },
        };
        slot.push_str(suffix);
    }

    /// Serialize to the spec document shape.
    pub fn to_value(&self) -> Value {
        let c = &self.common;
        let mut map = c.extra.clone();
        map.insert(
            "layout".to_owned(),
            Value::String(self.kind().as_str().to_owned()),
        );
        if let Some(id) = &c.id {
            map.insert("id".to_owned(), id.clone());
        }
        put_opt_str(&mut map, "template_layout", &c.template_layout);
        if let Some(i) = c.template_layout_index {
            map.insert("template_layout_index".to_owned(), Value::from(i));
        }
        if let Some(p) = &c.palette {
            map.insert("palette".to_owned(), Value::Object(p.0.clone()));
        }
        put_opt_bool(&mut map, "footer_exclude", c.footer_exclude);
        put_opt_bool(&mut map, "agenda_exclude", c.agenda_exclude);
        put_opt_str(&mut map, "agenda_title", &c.agenda_title);

        match &self.content {
            SlideContent::Title { title, subtitle } => {
                map.insert("title".to_owned(), Value::String(title.clone()));
                put_opt_str(&mut map, "subtitle", subtitle);
            }
            SlideContent::Bullets { title, bullets } => {
                map.insert("title".to_owned(), Value::String(title.clone()));
                map.insert(
                    "bullets".to_owned(),
                    Value::Array(bullets.iter().cloned().map(Value::String).collect()),
                );
            }
            SlideContent::TwoColumn { title, left, right } => {
                put_opt_str(&mut map, "title", title);
                map.insert("left".to_owned(), Value::String(left.clone()));
                map.insert("right".to_owned(), Value::String(right.clone()));
            }
            SlideContent::Chart {
                title,
                chart_type,
                categories,
                series,
                legend,
            } => {
                put_opt_str(&mut map, "title", title);
                if let Some(k) = chart_type {
                    map.insert("chart_type".to_owned(), to_json(k));
                }
                if let Some(cats) = categories {
                    map.insert(
                        "categories".to_owned(),
                        Value::Array(cats.iter().cloned().map(Value::String).collect()),
                    );
                }
                if let Some(series) = series {
                    map.insert("series".to_owned(), to_json(series));
                }
                if let Some(l) = legend {
                    map.insert("legend".to_owned(), to_json(l));
                }
            }
            SlideContent::Image {
                title,
                image_path,
                image_gen,
                caption,
            } => {
                put_opt_str(&mut map, "title", title);
                put_opt_str(&mut map, "image_path", image_path);
                if let Some(g) = image_gen {
                    map.insert("image_gen".to_owned(), Value::Object(g.clone()));
                }
                put_opt_str(&mut map, "caption", caption);
            }
            SlideContent::Workflow {
                title,
                steps,
                orientation,
                show_numbers,
            } => {
                put_opt_str(&mut map, "title", title);
                map.insert("steps".to_owned(), nodes_to_value(steps));
                if let Some(o) = orientation {
                    map.insert("orientation".to_owned(), to_json(o));
                }
                put_opt_bool(&mut map, "show_numbers", *show_numbers);
            }
            SlideContent::Architecture {
                title,
                top_row,
                middle_row,
                bottom,
            } => {
                put_opt_str(&mut map, "title", title);
                if let Some(nodes) = top_row {
                    map.insert("top_row".to_owned(), nodes_to_value(nodes));
                }
                if let Some(nodes) = middle_row {
                    map.insert("middle_row".to_owned(), nodes_to_value(nodes));
                }
                if let Some(nodes) = bottom {
                    map.insert("bottom".to_owned(), nodes_to_value(nodes));
                }
            }
            SlideContent::KpiCards {
                title,
                cards,
                cards_key,
                columns,
            } => {
                put_opt_str(&mut map, "title", title);
                map.insert(
                    cards_key.as_str().to_owned(),
                    Value::Array(cards.iter().map(CardNode::to_value).collect()),
                );
                if let Some(c) = columns {
                    map.insert("columns".to_owned(), Value::from(*c));
                }
            }
            SlideContent::Blank { title } => {
                put_opt_str(&mut map, "title", title);
            }
        }
        Value::Object(map)
    }
}

impl Serialize for SlideSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

fn nodes_to_value(nodes: &[StepNode]) -> Value {
    Value::Array(nodes.iter().map(StepNode::to_value).collect())
}

fn put_opt_str(map: &mut Map<String, Value>, key: &str, value: &Option<String>) {
    if let Some(v) = value {
        map.insert(key.to_owned(), Value::String(v.clone()));
    }
}

fn put_opt_bool(map: &mut Map<String, Value>, key: &str, value: Option<bool>) {
    if let Some(v) = value {
        map.insert(key.to_owned(), Value::Bool(v));
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

#[cfg(test)]
#[path = "../../tests/unit/spec/model.rs"]
mod tests;
