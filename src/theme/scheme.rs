use crate::foundation::core::Rgb;
use quick_xml::Reader;
use quick_xml::events::Event;
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

/// Canonical color slots of an OOXML theme, plus the background/text aliases.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum ColorRole {
    /// Primary background (`bg1`).
    Background1,
    /// Secondary background (`bg2`).
    Background2,
    /// Primary text (`tx1`).
    Text1,
    /// Secondary text (`tx2`).
    Text2,
    /// `dk1` scheme slot.
    Dark1,
    /// `dk2` scheme slot.
    Dark2,
    /// `lt1` scheme slot.
    Light1,
    /// `lt2` scheme slot.
    Light2,
    /// `accent1`.
    Accent1,
    /// `accent2`.
    Accent2,
    /// `accent3`.
    Accent3,
    /// `accent4`.
    Accent4,
    /// `accent5`.
    Accent5,
    /// `accent6`.
    Accent6,
    /// `hlink`.
    Hyperlink,
    /// `folHlink`.
    FollowedHyperlink,
}

impl ColorRole {
    /// Every role.
    pub const ALL: [ColorRole; 16] = [
        ColorRole::Background1,
        ColorRole::Background2,
        ColorRole::Text1,
        ColorRole::Text2,
        ColorRole::Dark1,
        ColorRole::Dark2,
        ColorRole::Light1,
        ColorRole::Light2,
        ColorRole::Accent1,
        ColorRole::Accent2,
        ColorRole::Accent3,
        ColorRole::Accent4,
        ColorRole::Accent5,
        ColorRole::Accent6,
        ColorRole::Hyperlink,
        ColorRole::FollowedHyperlink,
    ];

    /// Upper snake case name (`ACCENT_1`).
    pub fn name(self) -> &'static str {
        match self {
            Self::Background1 => "BACKGROUND_1",
            Self::Background2 => "BACKGROUND_2",
            Self::Text1 => "TEXT_1",
            Self::Text2 => "TEXT_2",
            Self::Dark1 => "DARK_1",
            Self::Dark2 => "DARK_2",
            Self::Light1 => "LIGHT_1",
            Self::Light2 => "LIGHT_2",
            Self::Accent1 => "ACCENT_1",
            Self::Accent2 => "ACCENT_2",
            Self::Accent3 => "ACCENT_3",
            Self::Accent4 => "ACCENT_4",
            Self::Accent5 => "ACCENT_5",
            Self::Accent6 => "ACCENT_6",
            Self::Hyperlink => "HYPERLINK",
            Self::FollowedHyperlink => "FOLLOWED_HYPERLINK",
        }
    }

    /// Parse a role name.
    ///
    /// Case, `-` and spaces are ignored, and the digit separator is optional, so `accent-1`,
    /// `Accent 1` and `ACCENT1` all name [`ColorRole::Accent1`].
    pub fn parse(raw: &str) -> Option<Self> {
        let mut normalized = String::with_capacity(raw.len());
        for c in raw.trim().chars() {
            let c = match c {
                '-' | ' ' => '_',
                c => c.to_ascii_uppercase(),
            };
            if c == '_' && normalized.ends_with('_') {
                continue;
            }
            normalized.push(c);
        }
        if normalized.is_empty() {
            return None;
        }
        if let Some(role) = Self::ALL.into_iter().find(|r| r.name() == normalized) {
            return Some(role);
        }

        let digit = normalized.chars().last().filter(char::is_ascii_digit)?;
        let stem = normalized[..normalized.len() - 1].trim_end_matches('_');
        let candidate = format!("{stem}_{digit}");
        Self::ALL.into_iter().find(|r| r.name() == candidate)
    }

    /// Map a `clrScheme` child element name (`dk1`, `accent3`, `folHlink`) to its role.
    pub fn from_scheme_tag(tag: &str) -> Option<Self> {
        Some(match tag.to_ascii_lowercase().as_str() {
            "bg1" => Self::Background1,
            "bg2" => Self::Background2,
            "tx1" => Self::Text1,
            "tx2" => Self::Text2,
            "dk1" => Self::Dark1,
            "dk2" => Self::Dark2,
            "lt1" => Self::Light1,
            "lt2" => Self::Light2,
            "accent1" => Self::Accent1,
            "accent2" => Self::Accent2,
            "accent3" => Self::Accent3,
            "accent4" => Self::Accent4,
            "accent5" => Self::Accent5,
            "accent6" => Self::Accent6,
            "hlink" => Self::Hyperlink,
            "folhlink" => Self::FollowedHyperlink,
            _ => return None,
        })
    }

    /// Scheme slot that backs an alias role under the default color map.
    fn mapped_slot(self) -> Option<Self> {
        match self {
            Self::Background1 => Some(Self::Light1),
            Self::Background2 => Some(Self::Light2),
            Self::Text1 => Some(Self::Dark1),
            Self::Text2 => Some(Self::Dark2),
            _ => None,
        }
    }
}

/// RGB values extracted from a template's color scheme.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ThemeColors {
    colors: BTreeMap<ColorRole, Rgb>,
}

impl ThemeColors {
    /// Build from explicit entries.
    pub fn from_entries(entries: impl IntoIterator<Item = (ColorRole, Rgb)>) -> Self {
        Self {
            colors: entries.into_iter().collect(),
        }
    }

    /// `true` when nothing was extracted.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Number of roles with a value.
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Look up a role; background/text aliases fall back to their light/dark slots.
    pub fn get(&self, role: ColorRole) -> Option<Rgb> {
        self.colors
            .get(&role)
            .or_else(|| role.mapped_slot().and_then(|slot| self.colors.get(&slot)))
            .copied()
    }

    /// Iterate over the extracted entries in role order.
    pub fn iter(&self) -> impl Iterator<Item = (ColorRole, Rgb)> + '_ {
        self.colors.iter().map(|(k, v)| (*k, *v))
    }
}

/// Extract the color scheme from theme XML.
///
/// Each slot prefers an `srgbClr@val`, then a `sysClr@lastClr`; slots with neither are absent.
/// Malformed XML yields an empty map.
pub fn extract_scheme(xml: &[u8]) -> ThemeColors {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);

    let mut out = BTreeMap::new();
    let mut in_scheme = false;
    let mut current: Option<ColorRole> = None;
    let mut srgb: Option<Rgb> = None;
    let mut sys: Option<Rgb> = None;

    loop {
        match reader.read_event() {
            // A self-closing slot carries no color.
            Ok(Event::Empty(_)) if in_scheme && current.is_none() => {}
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                let name = e.local_name();
                let tag = std::str::from_utf8(name.as_ref()).unwrap_or_default();
                if tag == "clrScheme" {
                    in_scheme = true;
                } else if in_scheme && current.is_none() {
                    current = ColorRole::from_scheme_tag(tag);
                    srgb = None;
                    sys = None;
                } else if current.is_some() {
                    let wanted: &[u8] = match tag {
                        "srgbClr" => b"val",
                        "sysClr" => b"lastClr",
                        _ => b"",
                    };
                    if wanted.is_empty() {
                        continue;
                    }
                    let value = e
                        .attributes()
                        .flatten()
                        .find(|a| a.key.as_ref() == wanted)
                        .and_then(|a| std::str::from_utf8(&a.value).ok().and_then(Rgb::from_hex));
                    match tag {
                        "srgbClr" if srgb.is_none() => srgb = value,
                        "sysClr" if sys.is_none() => sys = value,
                        _ => {}
                    }
                }
            }
            Ok(Event::End(ref e)) => {
                let name = e.local_name();
                let tag = std::str::from_utf8(name.as_ref()).unwrap_or_default();
                if tag == "clrScheme" {
                    break;
                }
                if let Some(role) = current
                    && ColorRole::from_scheme_tag(tag) == Some(role)
                {
                    if let Some(rgb) = srgb.or(sys) {
                        out.insert(role, rgb);
                    }
                    current = None;
                }
            }
            Ok(Event::Eof) => break,
            Err(err) => {
                tracing::warn!(error = %err, "malformed theme xml; ignoring color scheme");
                return ThemeColors::default();
            }
            _ => {}
        }
    }

    ThemeColors { colors: out }
}

/// Read the first `ppt/theme/theme*.xml` of a `.pptx` package and extract its color scheme.
///
/// Any failure (unreadable archive, missing part, bad XML) yields an empty map.
pub fn resolve_theme(package: &Path) -> ThemeColors {
    match read_theme_part(package) {
        Ok(Some(xml)) => extract_scheme(&xml),
        Ok(None) => {
            tracing::debug!(path = %package.display(), "template has no theme part");
            ThemeColors::default()
        }
        Err(err) => {
            tracing::warn!(
                path = %package.display(),
                error = %err,
                "failed to read template theme"
            );
            ThemeColors::default()
        }
    }
}

fn read_theme_part(package: &Path) -> anyhow::Result<Option<Vec<u8>>> {
    let file = std::fs::File::open(package)?;
    let mut archive = zip::ZipArchive::new(file)?;
    let mut names: Vec<String> = archive
        .file_names()
        .filter(|n| n.starts_with("ppt/theme/theme") && n.ends_with(".xml"))
        .map(str::to_owned)
        .collect();
    names.sort();
    let Some(name) = names.first() else {
        return Ok(None);
    };
    let mut entry = archive.by_name(name)?;
    let mut buf = Vec::new();
    entry.read_to_end(&mut buf)?;
    Ok(Some(buf))
}

#[cfg(test)]
#[path = "../../tests/unit/theme/scheme.rs"]
mod tests;
