//! Registry of the style properties the engine computes.
//!
//! The declaration order of [`PropertyId`] is also the computation order:
//! `color` and `font-size` come first so `currentColor` and `em` lengths can
//! refer to them, and each `*-style` precedes the widths it zeroes.

use crate::style::change::ChangeSet;

/// The value grammar a property accepts.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ValueKind {
    Color,
    Length,
    Number,
    Duration,
    FontFamily,
    BorderStyle,
    TextDecoration,
    IconSource,
    Transform,
    Shadows,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PropertyId {
    Color,
    FontFamily,
    FontSize,
    FontWeight,
    LetterSpacing,
    TextDecorationLine,
    BackgroundColor,
    BorderStyle,
    BorderTopWidth,
    BorderRightWidth,
    BorderBottomWidth,
    BorderLeftWidth,
    BorderColor,
    MarginTop,
    MarginRight,
    MarginBottom,
    MarginLeft,
    PaddingTop,
    PaddingRight,
    PaddingBottom,
    PaddingLeft,
    MinWidth,
    MinHeight,
    OutlineStyle,
    OutlineWidth,
    OutlineOffset,
    OutlineColor,
    BoxShadow,
    Opacity,
    IconSource,
    IconTransform,
    TransitionDuration,
    TransitionDelay,
}

struct PropertyInfo {
    name: &'static str,
    inherited: bool,
    kind: ValueKind,
    affects: ChangeSet,
}

const fn info(name: &'static str, inherited: bool, kind: ValueKind, affects: ChangeSet) -> PropertyInfo {
    PropertyInfo {
        name,
        inherited,
        kind,
        affects,
    }
}

const BORDER_SIZE: ChangeSet = ChangeSet::BORDER.union(ChangeSet::SIZE);
const OUTLINE_CLIP: ChangeSet = ChangeSet::OUTLINE.union(ChangeSet::CLIP);

static PROPERTIES: [PropertyInfo; PropertyId::COUNT] = [
    info(
        "color",
        true,
        ValueKind::Color,
        ChangeSet::FOREGROUND
            .union(ChangeSet::TEXT)
            .union(ChangeSet::SYMBOLIC_ICON),
    ),
    info("font-family", true, ValueKind::FontFamily, ChangeSet::FONT),
    info("font-size", true, ValueKind::Length, ChangeSet::FONT),
    info("font-weight", true, ValueKind::Number, ChangeSet::FONT),
    info(
        "letter-spacing",
        true,
        ValueKind::Length,
        ChangeSet::TEXT.union(ChangeSet::TEXT_ATTRS),
    ),
    info("text-decoration-line", false, ValueKind::TextDecoration, ChangeSet::TEXT_ATTRS),
    info("background-color", false, ValueKind::Color, ChangeSet::BACKGROUND),
    info("border-style", false, ValueKind::BorderStyle, BORDER_SIZE),
    info("border-top-width", false, ValueKind::Length, BORDER_SIZE),
    info("border-right-width", false, ValueKind::Length, BORDER_SIZE),
    info("border-bottom-width", false, ValueKind::Length, BORDER_SIZE),
    info("border-left-width", false, ValueKind::Length, BORDER_SIZE),
    info("border-color", false, ValueKind::Color, ChangeSet::BORDER),
    info("margin-top", false, ValueKind::Length, ChangeSet::SIZE),
    info("margin-right", false, ValueKind::Length, ChangeSet::SIZE),
    info("margin-bottom", false, ValueKind::Length, ChangeSet::SIZE),
    info("margin-left", false, ValueKind::Length, ChangeSet::SIZE),
    info("padding-top", false, ValueKind::Length, ChangeSet::SIZE),
    info("padding-right", false, ValueKind::Length, ChangeSet::SIZE),
    info("padding-bottom", false, ValueKind::Length, ChangeSet::SIZE),
    info("padding-left", false, ValueKind::Length, ChangeSet::SIZE),
    info("min-width", false, ValueKind::Length, ChangeSet::SIZE),
    info("min-height", false, ValueKind::Length, ChangeSet::SIZE),
    info("outline-style", false, ValueKind::BorderStyle, OUTLINE_CLIP),
    info("outline-width", false, ValueKind::Length, OUTLINE_CLIP),
    info("outline-offset", false, ValueKind::Length, OUTLINE_CLIP),
    info("outline-color", false, ValueKind::Color, ChangeSet::OUTLINE),
    info(
        "box-shadow",
        false,
        ValueKind::Shadows,
        ChangeSet::BACKGROUND.union(ChangeSet::CLIP),
    ),
    info("opacity", false, ValueKind::Number, ChangeSet::REDRAW),
    info("-ctk-icon-source", false, ValueKind::IconSource, ChangeSet::ICON),
    info("-ctk-icon-transform", false, ValueKind::Transform, ChangeSet::TRANSFORM),
    info("transition-duration", false, ValueKind::Duration, ChangeSet::empty()),
    info("transition-delay", false, ValueKind::Duration, ChangeSet::empty()),
];

impl PropertyId {
    pub const COUNT: usize = 33;

    /// Every property, in computation order.
    pub const ALL: [PropertyId; PropertyId::COUNT] = [
        PropertyId::Color,
        PropertyId::FontFamily,
        PropertyId::FontSize,
        PropertyId::FontWeight,
        PropertyId::LetterSpacing,
        PropertyId::TextDecorationLine,
        PropertyId::BackgroundColor,
        PropertyId::BorderStyle,
        PropertyId::BorderTopWidth,
        PropertyId::BorderRightWidth,
        PropertyId::BorderBottomWidth,
        PropertyId::BorderLeftWidth,
        PropertyId::BorderColor,
        PropertyId::MarginTop,
        PropertyId::MarginRight,
        PropertyId::MarginBottom,
        PropertyId::MarginLeft,
        PropertyId::PaddingTop,
        PropertyId::PaddingRight,
        PropertyId::PaddingBottom,
        PropertyId::PaddingLeft,
        PropertyId::MinWidth,
        PropertyId::MinHeight,
        PropertyId::OutlineStyle,
        PropertyId::OutlineWidth,
        PropertyId::OutlineOffset,
        PropertyId::OutlineColor,
        PropertyId::BoxShadow,
        PropertyId::Opacity,
        PropertyId::IconSource,
        PropertyId::IconTransform,
        PropertyId::TransitionDuration,
        PropertyId::TransitionDelay,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    fn info(self) -> &'static PropertyInfo {
        &PROPERTIES[self.index()]
    }

    /// The CSS name, e.g. `"min-width"`.
    pub fn name(self) -> &'static str {
        self.info().name
    }

    /// Look a longhand property up by its CSS name.
    pub fn from_name(name: &str) -> Option<PropertyId> {
        PropertyId::ALL.into_iter().find(|id| id.name() == name)
    }

    pub fn is_inherited(self) -> bool {
        self.info().inherited
    }

    pub fn kind(self) -> ValueKind {
        self.info().kind
    }

    /// What a change of this property's computed value affects.
    pub fn affects(self) -> ChangeSet {
        self.info().affects
    }

    /// Whether transitions interpolate this property.
    pub fn is_animatable(self) -> bool {
        matches!(
            self.kind(),
            ValueKind::Color | ValueKind::Length | ValueKind::Number | ValueKind::Transform
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_matches_enum_order() {
        for (i, id) in PropertyId::ALL.iter().enumerate() {
            assert_eq!(id.index(), i, "{id:?} out of place");
        }
        assert_eq!(PropertyId::ALL.len(), PROPERTIES.len());
    }

    #[test]
    fn names_round_trip() {
        for id in PropertyId::ALL {
            assert_eq!(PropertyId::from_name(id.name()), Some(id));
        }
        assert_eq!(PropertyId::from_name("margin"), None);
        assert_eq!(
            PropertyId::from_name("-ctk-icon-source"),
            Some(PropertyId::IconSource)
        );
    }

    #[test]
    fn dependencies_computed_first() {
        assert!(PropertyId::Color < PropertyId::BorderColor);
        assert!(PropertyId::FontSize < PropertyId::MarginTop);
        assert!(PropertyId::BorderStyle < PropertyId::BorderTopWidth);
        assert!(PropertyId::OutlineStyle < PropertyId::OutlineWidth);
    }

    #[test]
    fn font_size_only_affects_font() {
        assert_eq!(PropertyId::FontSize.affects(), ChangeSet::FONT);
        assert!(PropertyId::FontSize.is_inherited());
        assert!(!PropertyId::MinWidth.is_inherited());
    }

    #[test]
    fn animatable_kinds() {
        assert!(PropertyId::BackgroundColor.is_animatable());
        assert!(PropertyId::MinWidth.is_animatable());
        assert!(!PropertyId::BorderStyle.is_animatable());
        assert!(!PropertyId::IconSource.is_animatable());
    }
}
