pub use kurbo::{Point, Rect};

/// English Metric Units per inch, the native unit of OOXML packages.
pub const EMU_PER_INCH: f64 = 914_400.0;

/// Straight 8-bit RGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb {
    /// Build a color from channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `RRGGBB` (an optional leading `#` is accepted).
    pub fn from_hex(s: &str) -> Option<Self> {
        let s = s.trim();
        let s = s.strip_prefix('#').unwrap_or(s);
        if s.len() != 6 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let byte = |i: usize| u8::from_str_radix(&s[i..i + 2], 16).ok();
        Some(Self::new(byte(0)?, byte(2)?, byte(4)?))
    }

    /// Uppercase `RRGGBB` without a leading `#`.
    pub fn to_hex(self) -> String {
        format!("{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Channels as an array, handy for `image::Rgb`.
    pub fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

/// Slide dimensions in inches.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SlideSize {
    /// Slide width in inches.
    pub width: f64,
    /// Slide height in inches.
    pub height: f64,
}

impl SlideSize {
    /// 16:9 widescreen at 10in wide, the size used when no template is given.
    pub const WIDESCREEN: SlideSize = SlideSize {
        width: 10.0,
        height: 5.625,
    };

    /// Build a slide size from EMU dimensions.
    pub fn from_emu(cx: i64, cy: i64) -> Self {
        Self {
            width: cx as f64 / EMU_PER_INCH,
            height: cy as f64 / EMU_PER_INCH,
        }
    }

    /// The whole slide as a box.
    pub fn bounds(self) -> BoxGeometry {
        BoxGeometry::new(0.0, 0.0, self.width, self.height)
    }
}

impl Default for SlideSize {
    fn default() -> Self {
        Self::WIDESCREEN
    }
}

/// Axis-aligned box in slide inches, origin at the top-left corner.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BoxGeometry {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width, never negative.
    pub width: f64,
    /// Height, never negative.
    pub height: f64,
}

impl BoxGeometry {
    /// Build a box; negative extents are clamped to zero.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    /// Right edge.
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge.
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Horizontal center.
    pub fn center_x(&self) -> f64 {
        self.x + self.width * 0.5
    }

    /// Vertical center.
    pub fn center_y(&self) -> f64 {
        self.y + self.height * 0.5
    }

    /// Area in square inches.
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Swap the axes (x<->y, width<->height).
    pub fn transposed(&self) -> Self {
        Self {
            x: self.y,
            y: self.x,
            width: self.height,
            height: self.width,
        }
    }

    /// `true` when `other` lies inside `self`, allowing `eps` of float slack.
    pub fn contains_box(&self, other: &BoxGeometry, eps: f64) -> bool {
        other.x >= self.x - eps
            && other.y >= self.y - eps
            && other.right() <= self.right() + eps
            && other.bottom() <= self.bottom() + eps
    }

    /// Shrink by per-side insets, never producing negative extents.
    pub fn inset(&self, left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self::new(
            self.x + left,
            self.y + top,
            self.width - left - right,
            self.height - top - bottom,
        )
    }

    /// Convert to a kurbo rectangle.
    pub fn to_rect(self) -> Rect {
        Rect::from_origin_size((self.x, self.y), (self.width, self.height))
    }

    /// Build from a kurbo rectangle.
    pub fn from_rect(rect: Rect) -> Self {
        let r = rect.abs();
        Self::new(r.x0, r.y0, r.width(), r.height())
    }
}

/// Flow direction of a diagram connector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArrowDirection {
    /// Points to increasing x.
    Right,
    /// Points to decreasing x.
    Left,
    /// Points to increasing y.
    Down,
    /// Points to decreasing y.
    Up,
}

impl ArrowDirection {
    /// The same arrow after swapping axes.
    pub fn transposed(self) -> Self {
        match self {
            Self::Right => Self::Down,
            Self::Left => Self::Up,
            Self::Down => Self::Right,
            Self::Up => Self::Left,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
