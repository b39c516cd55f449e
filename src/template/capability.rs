use crate::foundation::core::{BoxGeometry, SlideSize};

/// Content slot types a template layout can expose.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaceholderRole {
    /// Slide title (including centered titles).
    Title,
    /// Subtitle under a title.
    Subtitle,
    /// Text or object body.
    Body,
    /// Picture slot.
    Picture,
    /// Chart slot.
    Chart,
}

impl PlaceholderRole {
    /// Map an OOXML `p:ph@type` value; `None` for slots the engine never fills
    /// (dates, footers, slide numbers, ...). A missing type means an object slot.
    pub fn from_ooxml(ph_type: Option<&str>) -> Option<Self> {
        match ph_type.unwrap_or("obj") {
            "title" | "ctrTitle" => Some(Self::Title),
            "subTitle" => Some(Self::Subtitle),
            "body" | "obj" => Some(Self::Body),
            "pic" | "clipArt" => Some(Self::Picture),
            "chart" => Some(Self::Chart),
            _ => None,
        }
    }

    /// Lowercase role name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Subtitle => "subtitle",
            Self::Body => "body",
            Self::Picture => "picture",
            Self::Chart => "chart",
        }
    }
}

/// Horizontal position of a placeholder relative to the slide midline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    /// Center lies left of the midline.
    Left,
    /// Center lies right of the midline.
    Right,
    /// Center lies on (or very near) the midline.
    Center,
}

impl Position {
    /// Classify a box by its horizontal center; within 5% of the slide width counts as
    /// centered.
    pub fn classify(bounds: &BoxGeometry, slide: SlideSize) -> Self {
        let mid = slide.width * 0.5;
        let tolerance = slide.width * 0.05;
        let cx = bounds.center_x();
        if cx < mid - tolerance {
            Self::Left
        } else if cx > mid + tolerance {
            Self::Right
        } else {
            Self::Center
        }
    }
}

/// One typed slot of a layout.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Placeholder {
    /// Slot type.
    pub role: PlaceholderRole,
    /// Horizontal position.
    pub position: Position,
    /// Bounding box in slide inches.
    pub bounds: BoxGeometry,
}

impl Placeholder {
    /// Build a placeholder, classifying its position against the slide.
    pub fn new(role: PlaceholderRole, bounds: BoxGeometry, slide: SlideSize) -> Self {
        Self {
            role,
            position: Position::classify(&bounds, slide),
            bounds,
        }
    }
}

/// The multiset of roles a layout exposes, in declaration order.
///
/// Computed once per template so scoring never touches template internals.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PlaceholderCapabilitySet {
    placeholders: Vec<Placeholder>,
}

impl PlaceholderCapabilitySet {
    /// Build from placeholders in declaration order.
    pub fn new(placeholders: Vec<Placeholder>) -> Self {
        Self { placeholders }
    }

    /// All placeholders.
    pub fn placeholders(&self) -> &[Placeholder] {
        &self.placeholders
    }

    /// Number of declared roles.
    pub fn len(&self) -> usize {
        self.placeholders.len()
    }

    /// `true` when the layout declares no roles.
    pub fn is_empty(&self) -> bool {
        self.placeholders.is_empty()
    }

    /// How many placeholders have `role`.
    pub fn count(&self, role: PlaceholderRole) -> usize {
        self.placeholders.iter().filter(|p| p.role == role).count()
    }

    /// `true` when at least one placeholder has `role`.
    pub fn has(&self, role: PlaceholderRole) -> bool {
        self.placeholders.iter().any(|p| p.role == role)
    }

    /// Placeholders with `role`, in declaration order.
    pub fn with_role(&self, role: PlaceholderRole) -> impl Iterator<Item = &Placeholder> + '_ {
        self.placeholders.iter().filter(move |p| p.role == role)
    }

    /// First placeholder with `role`.
    pub fn first(&self, role: PlaceholderRole) -> Option<&Placeholder> {
        self.with_role(role).next()
    }

    /// Largest placeholder with `role` by area; ties keep the earlier one.
    pub fn largest(&self, role: PlaceholderRole) -> Option<&Placeholder> {
        self.with_role(role).fold(None, |best: Option<&Placeholder>, p| match best {
            Some(b) if b.bounds.area() >= p.bounds.area() => Some(b),
            _ => Some(p),
        })
    }

    /// Largest body on each side of the slide, when both sides have one.
    pub fn left_right_bodies(&self) -> Option<(&Placeholder, &Placeholder)> {
        let side = |pos: Position| {
            self.with_role(PlaceholderRole::Body)
                .filter(move |p| p.position == pos)
                .fold(None, |best: Option<&Placeholder>, p| match best {
                    Some(b) if b.bounds.area() >= p.bounds.area() => Some(b),
                    _ => Some(p),
                })
        };
        Some((side(Position::Left)?, side(Position::Right)?))
    }
}

/// A layout offered by a template, described only by its name and capabilities.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TemplateLayout {
    /// Position in the template's layout list.
    pub index: usize,
    /// Human-readable layout name.
    pub name: String,
    /// Declared slots.
    pub capabilities: PlaceholderCapabilitySet,
}

#[cfg(test)]
#[path = "../../tests/unit/template/capability.rs"]
mod tests;
