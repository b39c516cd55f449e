use crate::foundation::core::Rgb;
use crate::spec::model::PaletteOverride;
use crate::theme::scheme::{ColorRole, ThemeColors};
use serde_json::{Map, Value};

/// Built-in color themes, or `Template` to take colors from the template's scheme.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeName {
    /// Slate background with light text.
    #[default]
    Dark,
    /// White background with dark text.
    Light,
    /// Theme roles resolved through the template's color scheme.
    Template,
}

impl ThemeName {
    /// Parse a theme name (case-insensitive).
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "dark" => Some(Self::Dark),
            "light" => Some(Self::Light),
            "template" => Some(Self::Template),
            _ => None,
        }
    }

    /// Fixed colors of a built-in theme; `None` for [`ThemeName::Template`].
    pub fn base_colors(self) -> Option<BaseColors> {
        match self {
            Self::Dark => Some(BaseColors {
                background: Rgb::new(15, 23, 42),
                text_primary: Rgb::new(241, 245, 249),
                text_secondary: Rgb::new(203, 213, 225),
                accent: Rgb::new(56, 189, 248),
            }),
            Self::Light => Some(BaseColors {
                background: Rgb::new(255, 255, 255),
                text_primary: Rgb::new(15, 23, 42),
                text_secondary: Rgb::new(71, 85, 105),
                accent: Rgb::new(2, 132, 199),
            }),
            Self::Template => None,
        }
    }
}

/// The four colors that define a built-in theme.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BaseColors {
    /// Slide background.
    pub background: Rgb,
    /// Titles and headline text.
    pub text_primary: Rgb,
    /// Body and supporting text.
    pub text_secondary: Rgb,
    /// Lines, arrows and highlights.
    pub accent: Rgb,
}

/// A color as written by an author: a theme role or a literal RGB.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorValue {
    /// Theme role, resolved late against the template scheme.
    Theme(ColorRole),
    /// Literal color.
    Rgb(Rgb),
}

impl ColorValue {
    /// Parse a theme role name, `RRGGBB` / `#RRGGBB`, or `rgb(r, g, b)`.
    pub fn parse(raw: &str) -> Option<Self> {
        if let Some(role) = ColorRole::parse(raw) {
            return Some(Self::Theme(role));
        }
        parse_rgb(raw).map(Self::Rgb)
    }

    /// Parse a JSON palette value; numbers are read as their decimal text.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Self::parse(s),
            Value::Number(n) => Self::parse(&n.to_string()),
            _ => None,
        }
    }
}

/// Parse `RRGGBB` (optional `#`) or `rgb(r, g, b)` with channels clamped to 0..=255.
pub fn parse_rgb(raw: &str) -> Option<Rgb> {
    let raw = raw.trim();
    if let Some(rgb) = Rgb::from_hex(raw) {
        return Some(rgb);
    }

    let lower = raw.to_ascii_lowercase();
    let inner = lower.strip_prefix("rgb(")?.strip_suffix(')')?;
    let mut channels = inner.split(',').map(|c| c.trim().parse::<u32>().ok());
    let mut next = || channels.next().flatten().map(|v| v.min(255) as u8);
    let rgb = Rgb::new(next()?, next()?, next()?);
    if channels.next().is_some() {
        return None;
    }
    Some(rgb)
}

/// A color after resolution, keeping the theme role it came from so writers can emit a
/// scheme reference instead of a literal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ResolvedColor {
    /// Concrete color.
    pub rgb: Rgb,
    /// Originating theme role, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<ColorRole>,
}

impl ResolvedColor {
    /// A literal color with no role.
    pub fn literal(rgb: Rgb) -> Self {
        Self { rgb, role: None }
    }
}

/// Palette override sections.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PaletteSection {
    /// Diagram boxes and arrows.
    Diagram,
    /// Footer text and divider.
    Footer,
    /// Generated imagery.
    Image,
}

impl PaletteSection {
    /// JSON key of the section.
    pub fn key(self) -> &'static str {
        match self {
            Self::Diagram => "diagram",
            Self::Footer => "footer",
            Self::Image => "image",
        }
    }

    /// Keys that may be overridden in this section.
    pub fn color_keys(self) -> &'static [&'static str] {
        match self {
            Self::Diagram => &["fill", "line", "text_primary", "text_secondary", "arrow"],
            Self::Footer => &["text", "line"],
            Self::Image => &["bg", "accent", "text"],
        }
    }
}

/// The entries of one section of an override, honoring the top-level shorthand.
pub fn palette_section(
    palette: &PaletteOverride,
    section: PaletteSection,
) -> Option<&Map<String, Value>> {
    if let Some(Value::Object(map)) = palette.0.get(section.key()) {
        return Some(map);
    }
    // Top-level shorthand: `{"fill": ...}` instead of `{"diagram": {"fill": ...}}`.
    section
        .color_keys()
        .iter()
        .any(|k| palette.0.contains_key(*k))
        .then_some(&palette.0)
}

/// Override scopes, most specific first.
#[derive(Clone, Copy, Debug, Default)]
pub struct PaletteScopes<'a> {
    /// Slide-level override.
    pub slide: Option<&'a PaletteOverride>,
    /// Presentation-level override.
    pub presentation: Option<&'a PaletteOverride>,
}

/// Diagram colors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct DiagramPalette {
    /// Box fill.
    pub fill: ResolvedColor,
    /// Box outline.
    pub line: ResolvedColor,
    /// Box headline text.
    pub text_primary: ResolvedColor,
    /// Box supporting text.
    pub text_secondary: ResolvedColor,
    /// Connector fill.
    pub arrow: ResolvedColor,
}

/// Footer colors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct FooterPalette {
    /// Footer text.
    pub text: ResolvedColor,
    /// Divider line.
    pub line: ResolvedColor,
}

/// Colors handed to the asset provider for generated imagery.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct ImagePalette {
    /// Image background.
    pub background: ResolvedColor,
    /// Accent shapes.
    pub accent: ResolvedColor,
    /// Labels.
    pub text: ResolvedColor,
}

/// Slide-wide colors for backgrounds and text boxes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct SlideColors {
    /// Background fill.
    pub background: ResolvedColor,
    /// Title text.
    pub title: ResolvedColor,
    /// Body text.
    pub body: ResolvedColor,
    /// Accent.
    pub accent: ResolvedColor,
}

/// Resolves colors for one run: the selected theme plus the template's extracted scheme.
///
/// Built once and passed by reference to everything that needs colors.
#[derive(Clone, Debug, Default)]
pub struct ThemeResolver {
    theme: ThemeName,
    colors: ThemeColors,
}

impl ThemeResolver {
    /// Build a resolver.
    pub fn new(theme: ThemeName, colors: ThemeColors) -> Self {
        Self { theme, colors }
    }

    /// Selected theme.
    pub fn theme(&self) -> ThemeName {
        self.theme
    }

    /// Extracted template scheme (possibly empty).
    pub fn colors(&self) -> &ThemeColors {
        &self.colors
    }

    /// Concrete color for a theme role: template scheme first, then a fixed fallback table.
    pub fn role_rgb(&self, role: ColorRole) -> Rgb {
        if let Some(rgb) = self.colors.get(role) {
            return rgb;
        }
        match role {
            ColorRole::Accent2 => Rgb::new(56, 189, 248),
            ColorRole::Text1 => Rgb::new(15, 23, 42),
            ColorRole::Text2 => Rgb::new(71, 85, 105),
            ColorRole::Background1 => Rgb::new(255, 255, 255),
            _ => Rgb::new(2, 132, 199),
        }
    }

    /// Resolve an authored color.
    pub fn resolve(&self, value: ColorValue) -> ResolvedColor {
        match value {
            ColorValue::Theme(role) => ResolvedColor {
                rgb: self.role_rgb(role),
                role: Some(role),
            },
            ColorValue::Rgb(rgb) => ResolvedColor::literal(rgb),
        }
    }

    /// Resolve one palette key with precedence slide > presentation > theme default.
    ///
    /// Unparseable overrides are skipped. Returns `None` only for keys the section does not
    /// define and no scope overrides.
    pub fn resolve_palette(
        &self,
        scopes: PaletteScopes<'_>,
        section: PaletteSection,
        key: &str,
    ) -> Option<ResolvedColor> {
        let overridden = [scopes.slide, scopes.presentation]
            .into_iter()
            .flatten()
            .filter_map(|p| palette_section(p, section))
            .filter_map(|map| map.get(key))
            .find_map(ColorValue::from_json);
        overridden
            .or_else(|| self.section_default(section, key))
            .map(|v| self.resolve(v))
    }

    /// Diagram palette for a slide.
    pub fn diagram_palette(&self, scopes: PaletteScopes<'_>) -> DiagramPalette {
        let get = |key| self.palette_color(scopes, PaletteSection::Diagram, key);
        DiagramPalette {
            fill: get("fill"),
            line: get("line"),
            text_primary: get("text_primary"),
            text_secondary: get("text_secondary"),
            arrow: get("arrow"),
        }
    }

    /// Footer palette for a slide.
    pub fn footer_palette(&self, scopes: PaletteScopes<'_>) -> FooterPalette {
        let get = |key| self.palette_color(scopes, PaletteSection::Footer, key);
        FooterPalette {
            text: get("text"),
            line: get("line"),
        }
    }

    /// Generated-image palette for a slide.
    pub fn image_palette(&self, scopes: PaletteScopes<'_>) -> ImagePalette {
        let get = |key| self.palette_color(scopes, PaletteSection::Image, key);
        ImagePalette {
            background: get("bg"),
            accent: get("accent"),
            text: get("text"),
        }
    }

    /// Background and text colors for plain slide content.
    pub fn slide_colors(&self) -> SlideColors {
        match self.theme.base_colors() {
            Some(base) => SlideColors {
                background: ResolvedColor::literal(base.background),
                title: ResolvedColor::literal(base.text_primary),
                body: ResolvedColor::literal(base.text_secondary),
                accent: ResolvedColor::literal(base.accent),
            },
            None => SlideColors {
                background: self.resolve(ColorValue::Theme(ColorRole::Background1)),
                title: self.resolve(ColorValue::Theme(ColorRole::Text1)),
                body: self.resolve(ColorValue::Theme(ColorRole::Text2)),
                accent: self.resolve(ColorValue::Theme(ColorRole::Accent1)),
            },
        }
    }

    fn palette_color(
        &self,
        scopes: PaletteScopes<'_>,
        section: PaletteSection,
        key: &str,
    ) -> ResolvedColor {
        self.resolve_palette(scopes, section, key)
            .unwrap_or_else(|| self.resolve(ColorValue::Theme(ColorRole::Accent1)))
    }

    fn section_default(&self, section: PaletteSection, key: &str) -> Option<ColorValue> {
        use ColorRole::*;
        let base = self.theme.base_colors();
        let value = match (section, key, base) {
            (PaletteSection::Diagram, "fill", Some(_)) => ColorValue::Rgb(match self.theme {
                ThemeName::Dark => Rgb::new(30, 41, 59),
                _ => Rgb::new(248, 250, 252),
            }),
            (PaletteSection::Diagram, "fill", None) => ColorValue::Theme(Background1),
            (PaletteSection::Diagram, "line" | "arrow", Some(b)) => ColorValue::Rgb(b.accent),
            (PaletteSection::Diagram, "line" | "arrow", None) => ColorValue::Theme(Accent1),
            (PaletteSection::Diagram, "text_primary", Some(b)) => ColorValue::Rgb(b.text_primary),
            (PaletteSection::Diagram, "text_primary", None) => ColorValue::Theme(Text1),
            (PaletteSection::Diagram, "text_secondary", Some(b)) => {
                ColorValue::Rgb(b.text_secondary)
            }
            (PaletteSection::Diagram, "text_secondary", None) => ColorValue::Theme(Text2),
            (PaletteSection::Footer, "text", Some(b)) => ColorValue::Rgb(b.text_secondary),
            (PaletteSection::Footer, "text", None) => ColorValue::Theme(Text2),
            (PaletteSection::Footer, "line", Some(b)) => ColorValue::Rgb(b.accent),
            (PaletteSection::Footer, "line", None) => ColorValue::Theme(Accent1),
            (PaletteSection::Image, "bg", _) => ColorValue::Rgb(Rgb::new(255, 255, 255)),
            (PaletteSection::Image, "accent", _) => ColorValue::Theme(Accent1),
            (PaletteSection::Image, "text", _) => ColorValue::Theme(Text1),
            _ => return None,
        };
        Some(value)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/theme/palette.rs"]
mod tests;
