//! Computed property values.

use std::fmt;
use std::sync::Arc;

use crate::geometry::Spacing;

// ---------------------------------------------------------------------------
// Rgba
// ---------------------------------------------------------------------------

/// A color with straight (non-premultiplied) channels in `0.0..=1.0`.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub struct Rgba {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
    pub alpha: f32,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0.0, 0.0, 0.0, 0.0);
    pub const BLACK: Rgba = Rgba::new(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Rgba = Rgba::new(1.0, 1.0, 1.0, 1.0);

    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// From 0-255 channels and a 0-1 alpha.
    pub fn from_rgb8(red: u8, green: u8, blue: u8, alpha: f32) -> Self {
        Self::new(
            f32::from(red) / 255.0,
            f32::from(green) / 255.0,
            f32::from(blue) / 255.0,
            alpha.clamp(0.0, 1.0),
        )
    }

    /// Parse `rgb`, `rgba`, `rrggbb` or `rrggbbaa` hex digits (no leading `#`).
    pub fn parse_hex(hex: &str) -> Option<Rgba> {
        let digit = |i: usize| u8::from_str_radix(hex.get(i..i + 1)?, 16).ok();
        let pair = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        let (r, g, b, a) = match hex.len() {
            3 | 4 => {
                let r = digit(0)? * 17;
                let g = digit(1)? * 17;
                let b = digit(2)? * 17;
                let a = if hex.len() == 4 { digit(3)? * 17 } else { 255 };
                (r, g, b, a)
            }
            6 | 8 => {
                let a = if hex.len() == 8 { pair(6)? } else { 255 };
                (pair(0)?, pair(2)?, pair(4)?, a)
            }
            _ => return None,
        };
        Some(Rgba::from_rgb8(r, g, b, f32::from(a) / 255.0))
    }

    /// The few named colors stylesheets commonly use.
    pub fn named(name: &str) -> Option<Rgba> {
        let color = match name.to_ascii_lowercase().as_str() {
            "transparent" => Rgba::TRANSPARENT,
            "black" => Rgba::BLACK,
            "white" => Rgba::WHITE,
            "red" => Rgba::new(1.0, 0.0, 0.0, 1.0),
            "green" => Rgba::from_rgb8(0, 128, 0, 1.0),
            "blue" => Rgba::new(0.0, 0.0, 1.0, 1.0),
            "yellow" => Rgba::new(1.0, 1.0, 0.0, 1.0),
            "gray" | "grey" => Rgba::from_rgb8(128, 128, 128, 1.0),
            _ => return None,
        };
        Some(color)
    }

    /// Whether painting this color has no visible effect.
    pub fn is_clear(self) -> bool {
        self.alpha <= 0.0
    }

    /// Linear interpolation, `t` in `0.0..=1.0`.
    pub fn lerp(self, to: Rgba, t: f32) -> Rgba {
        Rgba::new(
            lerp(self.red, to.red, t),
            lerp(self.green, to.green, t),
            lerp(self.blue, to.blue, t),
            lerp(self.alpha, to.alpha, t),
        )
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let byte = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        if self.alpha >= 1.0 {
            write!(f, "rgb({},{},{})", byte(self.red), byte(self.green), byte(self.blue))
        } else {
            write!(
                f,
                "rgba({},{},{},{:.2})",
                byte(self.red),
                byte(self.green),
                byte(self.blue),
                self.alpha
            )
        }
    }
}

pub(crate) fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}

// ---------------------------------------------------------------------------
// Keyword values
// ---------------------------------------------------------------------------

/// `border-style` / `outline-style`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum BorderStyle {
    #[default]
    None,
    Hidden,
    Solid,
    Inset,
    Outset,
    Dotted,
    Dashed,
    Double,
    Groove,
    Ridge,
}

impl BorderStyle {
    pub fn from_name(name: &str) -> Option<BorderStyle> {
        let style = match name {
            "none" => BorderStyle::None,
            "hidden" => BorderStyle::Hidden,
            "solid" => BorderStyle::Solid,
            "inset" => BorderStyle::Inset,
            "outset" => BorderStyle::Outset,
            "dotted" => BorderStyle::Dotted,
            "dashed" => BorderStyle::Dashed,
            "double" => BorderStyle::Double,
            "groove" => BorderStyle::Groove,
            "ridge" => BorderStyle::Ridge,
            _ => return None,
        };
        Some(style)
    }

    pub fn name(self) -> &'static str {
        match self {
            BorderStyle::None => "none",
            BorderStyle::Hidden => "hidden",
            BorderStyle::Solid => "solid",
            BorderStyle::Inset => "inset",
            BorderStyle::Outset => "outset",
            BorderStyle::Dotted => "dotted",
            BorderStyle::Dashed => "dashed",
            BorderStyle::Double => "double",
            BorderStyle::Groove => "groove",
            BorderStyle::Ridge => "ridge",
        }
    }

    /// Styles whose border takes no space.
    pub fn is_none(self) -> bool {
        matches!(self, BorderStyle::None | BorderStyle::Hidden)
    }
}

/// `text-decoration-line`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum TextDecorationLine {
    #[default]
    None,
    Underline,
    Overline,
    LineThrough,
}

impl TextDecorationLine {
    pub fn from_name(name: &str) -> Option<TextDecorationLine> {
        match name {
            "none" => Some(TextDecorationLine::None),
            "underline" => Some(TextDecorationLine::Underline),
            "overline" => Some(TextDecorationLine::Overline),
            "line-through" => Some(TextDecorationLine::LineThrough),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Icons
// ---------------------------------------------------------------------------

/// Images a builtin icon gadget knows how to render without an icon theme.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum BuiltinImage {
    #[default]
    None,
    Check,
    CheckInconsistent,
    Option,
    OptionInconsistent,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Expander,
    ExpanderExpanded,
    Handle,
    PaneSeparator,
    Spinner,
}

impl BuiltinImage {
    const NAMES: [(BuiltinImage, &'static str); 14] = [
        (BuiltinImage::None, "none"),
        (BuiltinImage::Check, "check"),
        (BuiltinImage::CheckInconsistent, "check-inconsistent"),
        (BuiltinImage::Option, "option"),
        (BuiltinImage::OptionInconsistent, "option-inconsistent"),
        (BuiltinImage::ArrowUp, "arrow-up"),
        (BuiltinImage::ArrowDown, "arrow-down"),
        (BuiltinImage::ArrowLeft, "arrow-left"),
        (BuiltinImage::ArrowRight, "arrow-right"),
        (BuiltinImage::Expander, "expander"),
        (BuiltinImage::ExpanderExpanded, "expander-expanded"),
        (BuiltinImage::Handle, "handle"),
        (BuiltinImage::PaneSeparator, "pane-separator"),
        (BuiltinImage::Spinner, "spinner"),
    ];

    pub fn from_name(name: &str) -> Option<BuiltinImage> {
        Self::NAMES
            .iter()
            .find(|(_, n)| *n == name)
            .map(|(image, _)| *image)
    }

    pub fn name(self) -> &'static str {
        Self::NAMES
            .iter()
            .find(|(image, _)| *image == self)
            .map_or("none", |(_, n)| n)
    }
}

impl fmt::Display for BuiltinImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// `-ctk-icon-source`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum IconSource {
    /// `builtin`: whatever image the gadget was configured with.
    #[default]
    Builtin,
    /// `builtin(name)`: a specific builtin image.
    Image(BuiltinImage),
    /// `-ctk-icontheme("name")`: an image looked up in the icon theme.
    Theme(Arc<str>),
    /// `none`.
    None,
}

/// `-ctk-icon-transform`: rotation in degrees, then uniform scale.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct IconTransform {
    pub rotate: f32,
    pub scale: f32,
}

impl IconTransform {
    pub const IDENTITY: IconTransform = IconTransform {
        rotate: 0.0,
        scale: 1.0,
    };

    pub fn is_identity(self) -> bool {
        self == Self::IDENTITY
    }

    pub fn lerp(self, to: IconTransform, t: f32) -> IconTransform {
        IconTransform {
            rotate: lerp(self.rotate, to.rotate, t),
            scale: lerp(self.scale, to.scale, t),
        }
    }
}

impl Default for IconTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

// ---------------------------------------------------------------------------
// Shadows
// ---------------------------------------------------------------------------

/// One `box-shadow` layer, lengths in px.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub struct BoxShadow {
    pub offset_x: f32,
    pub offset_y: f32,
    pub blur: f32,
    pub spread: f32,
    pub color: Rgba,
    pub inset: bool,
}

/// How far the outer shadows reach past the border box on each side.
pub fn shadow_extents(shadows: &[BoxShadow]) -> Spacing {
    let mut extents = Spacing::ZERO;
    for shadow in shadows.iter().filter(|s| !s.inset) {
        let reach = shadow.blur.max(0.0) + shadow.spread;
        let side = |v: f32| (v.ceil() as i32).max(0);
        extents.top = extents.top.max(side(reach - shadow.offset_y));
        extents.right = extents.right.max(side(reach + shadow.offset_x));
        extents.bottom = extents.bottom.max(side(reach + shadow.offset_y));
        extents.left = extents.left.max(side(reach - shadow.offset_x));
    }
    extents
}

// ---------------------------------------------------------------------------
// StyleValue
// ---------------------------------------------------------------------------

/// A fully resolved property value.
#[derive(Clone, Debug, PartialEq)]
pub enum StyleValue {
    Color(Rgba),
    /// Length in px.
    Length(f32),
    Number(f32),
    /// Time in milliseconds.
    Duration(f32),
    FontFamily(Arc<str>),
    BorderStyle(BorderStyle),
    TextDecoration(TextDecorationLine),
    IconSource(IconSource),
    Transform(IconTransform),
    Shadows(Arc<[BoxShadow]>),
}

impl StyleValue {
    /// The value `t` of the way from `self` to `to`, for interpolable kinds.
    pub fn interpolate(&self, to: &StyleValue, t: f32) -> Option<StyleValue> {
        let value = match (self, to) {
            (StyleValue::Color(a), StyleValue::Color(b)) => StyleValue::Color(a.lerp(*b, t)),
            (StyleValue::Length(a), StyleValue::Length(b)) => StyleValue::Length(lerp(*a, *b, t)),
            (StyleValue::Number(a), StyleValue::Number(b)) => StyleValue::Number(lerp(*a, *b, t)),
            (StyleValue::Transform(a), StyleValue::Transform(b)) => {
                StyleValue::Transform(a.lerp(*b, t))
            }
            _ => return None,
        };
        Some(value)
    }
}

impl fmt::Display for StyleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StyleValue::Color(c) => write!(f, "{c}"),
            StyleValue::Length(px) => write!(f, "{px}px"),
            StyleValue::Number(n) => write!(f, "{n}"),
            StyleValue::Duration(ms) => write!(f, "{ms}ms"),
            StyleValue::FontFamily(family) => write!(f, "\"{family}\""),
            StyleValue::BorderStyle(style) => write!(f, "{style:?}"),
            StyleValue::TextDecoration(line) => write!(f, "{line:?}"),
            StyleValue::IconSource(IconSource::Builtin) => f.write_str("builtin"),
            StyleValue::IconSource(IconSource::Image(image)) => write!(f, "builtin({image})"),
            StyleValue::IconSource(IconSource::Theme(name)) => {
                write!(f, "-ctk-icontheme(\"{name}\")")
            }
            StyleValue::IconSource(IconSource::None) => f.write_str("none"),
            StyleValue::Transform(t) => write!(f, "rotate({}deg) scale({})", t.rotate, t.scale),
            StyleValue::Shadows(shadows) => write!(f, "{} shadow(s)", shadows.len()),
        }
    }
}
