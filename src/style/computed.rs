//! The immutable computed style of a node.

use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::geometry::Spacing;
use crate::style::change::{ChangeSet, CssChange};
use crate::style::property::PropertyId;
use crate::style::value::{
    shadow_extents, BorderStyle, BoxShadow, IconSource, IconTransform, Rgba, StyleValue,
};

/// Fully resolved property values for one node.
///
/// Shared by `Arc` between nodes whose inputs match. Besides the values it
/// records `change`: the node inputs the cascade consulted to produce it, so
/// later mutations that touch none of them can keep the style.
#[derive(Debug, Clone, PartialEq)]
pub struct ComputedStyle {
    values: Box<[StyleValue]>,
    change: CssChange,
    sentinel: bool,
    animated: bool,
}

static SENTINEL: Lazy<Arc<ComputedStyle>> = Lazy::new(|| {
    let values = crate::style::compute::initial_values(&Default::default());
    Arc::new(ComputedStyle {
        values: values.into_boxed_slice(),
        change: CssChange::ANY,
        sentinel: true,
        animated: false,
    })
});

impl ComputedStyle {
    pub(crate) fn new(values: Vec<StyleValue>, change: CssChange) -> Self {
        debug_assert_eq!(values.len(), PropertyId::COUNT);
        Self {
            values: values.into_boxed_slice(),
            change,
            sentinel: false,
            animated: false,
        }
    }

    /// The shared empty style of invisible nodes. It depends on every input,
    /// so any pending change recomputes it.
    pub fn sentinel() -> Arc<ComputedStyle> {
        Arc::clone(&SENTINEL)
    }

    pub(crate) fn with_animated_values(&self, values: Vec<StyleValue>) -> Self {
        Self {
            values: values.into_boxed_slice(),
            change: self.change,
            sentinel: false,
            animated: true,
        }
    }

    /// Whether this is the shared style of invisible nodes.
    pub fn is_sentinel(&self) -> bool {
        self.sentinel
    }

    /// Whether some values are mid-transition.
    pub fn is_animated(&self) -> bool {
        self.animated
    }

    /// Node inputs this style depends on.
    pub fn change(&self) -> CssChange {
        self.change
    }

    pub fn get(&self, id: PropertyId) -> &StyleValue {
        &self.values[id.index()]
    }

    pub(crate) fn values(&self) -> &[StyleValue] {
        &self.values
    }

    /// Whether every computed value equals the other style's.
    pub fn values_equal(&self, other: &ComputedStyle) -> bool {
        self.values == other.values
    }

    /// What differs between `self` and `other`: the union of the affects
    /// bits of every property whose value changed, plus `REDRAW` when any
    /// paint bit is set.
    pub fn diff(&self, other: &ComputedStyle) -> ChangeSet {
        PropertyId::ALL
            .into_iter()
            .filter(|id| self.get(*id) != other.get(*id))
            .fold(ChangeSet::empty(), |acc, id| acc | id.affects())
            .with_redraw()
    }

    /// Names of the properties that differ, for tracing.
    pub fn differing_properties(&self, other: &ComputedStyle) -> Vec<&'static str> {
        PropertyId::ALL
            .into_iter()
            .filter(|id| self.get(*id) != other.get(*id))
            .map(PropertyId::name)
            .collect()
    }

    // ── Typed accessors ──────────────────────────────────────────────

    pub fn color(&self, id: PropertyId) -> Rgba {
        match self.get(id) {
            StyleValue::Color(c) => *c,
            _ => Rgba::TRANSPARENT,
        }
    }

    /// Length in px, 0 for non-length properties.
    pub fn length(&self, id: PropertyId) -> f32 {
        match self.get(id) {
            StyleValue::Length(px) | StyleValue::Number(px) | StyleValue::Duration(px) => *px,
            _ => 0.0,
        }
    }

    fn spacing(&self, ids: [PropertyId; 4]) -> Spacing {
        let side = |id| self.length(id).floor() as i32;
        Spacing::new(side(ids[0]), side(ids[1]), side(ids[2]), side(ids[3]))
    }

    pub fn margin(&self) -> Spacing {
        self.spacing([
            PropertyId::MarginTop,
            PropertyId::MarginRight,
            PropertyId::MarginBottom,
            PropertyId::MarginLeft,
        ])
    }

    pub fn border(&self) -> Spacing {
        self.spacing([
            PropertyId::BorderTopWidth,
            PropertyId::BorderRightWidth,
            PropertyId::BorderBottomWidth,
            PropertyId::BorderLeftWidth,
        ])
    }

    pub fn padding(&self) -> Spacing {
        self.spacing([
            PropertyId::PaddingTop,
            PropertyId::PaddingRight,
            PropertyId::PaddingBottom,
            PropertyId::PaddingLeft,
        ])
    }

    /// `min-width`, rounded up.
    pub fn min_width(&self) -> i32 {
        self.length(PropertyId::MinWidth).ceil() as i32
    }

    /// `min-height`, rounded up.
    pub fn min_height(&self) -> i32 {
        self.length(PropertyId::MinHeight).ceil() as i32
    }

    pub fn font_size(&self) -> f32 {
        self.length(PropertyId::FontSize)
    }

    pub fn font_family(&self) -> &str {
        match self.get(PropertyId::FontFamily) {
            StyleValue::FontFamily(family) => family,
            _ => "",
        }
    }

    pub fn border_style(&self) -> BorderStyle {
        match self.get(PropertyId::BorderStyle) {
            StyleValue::BorderStyle(style) => *style,
            _ => BorderStyle::None,
        }
    }

    pub fn outline_style(&self) -> BorderStyle {
        match self.get(PropertyId::OutlineStyle) {
            StyleValue::BorderStyle(style) => *style,
            _ => BorderStyle::None,
        }
    }

    pub fn icon_source(&self) -> &IconSource {
        static BUILTIN: IconSource = IconSource::Builtin;
        match self.get(PropertyId::IconSource) {
            StyleValue::IconSource(source) => source,
            _ => &BUILTIN,
        }
    }

    pub fn icon_transform(&self) -> IconTransform {
        match self.get(PropertyId::IconTransform) {
            StyleValue::Transform(t) => *t,
            _ => IconTransform::IDENTITY,
        }
    }

    pub fn box_shadows(&self) -> &[BoxShadow] {
        match self.get(PropertyId::BoxShadow) {
            StyleValue::Shadows(shadows) => shadows,
            _ => &[],
        }
    }

    /// How far outer shadows reach past the border box.
    pub fn shadow_extents(&self) -> Spacing {
        shadow_extents(self.box_shadows())
    }

    /// How far the outline reaches past the border box on every side.
    pub fn outline_extent(&self) -> i32 {
        if self.outline_style().is_none() {
            return 0;
        }
        let reach = self.length(PropertyId::OutlineWidth) + self.length(PropertyId::OutlineOffset);
        (reach.ceil() as i32).max(0)
    }

    /// Transition duration and delay in milliseconds.
    pub fn transition_timing(&self) -> (f32, f32) {
        (
            self.length(PropertyId::TransitionDuration),
            self.length(PropertyId::TransitionDelay),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::compute::{initial_values, StyleDefaults};

    fn style_with(changes: &[(PropertyId, StyleValue)]) -> ComputedStyle {
        let mut values = initial_values(&StyleDefaults::default());
        for (id, value) in changes {
            values[id.index()] = value.clone();
        }
        ComputedStyle::new(values, CssChange::NAME)
    }

    #[test]
    fn sentinel_is_shared_and_depends_on_everything() {
        let a = ComputedStyle::sentinel();
        let b = ComputedStyle::sentinel();
        assert!(Arc::ptr_eq(&a, &b));
        assert!(a.is_sentinel());
        assert_eq!(a.change(), CssChange::ANY);
    }

    #[test]
    fn diff_reports_affects_bits() {
        let base = style_with(&[]);
        let bigger_font = style_with(&[(PropertyId::FontSize, StyleValue::Length(20.0))]);
        assert_eq!(base.diff(&bigger_font), ChangeSet::FONT);

        let red = style_with(&[(PropertyId::Color, StyleValue::Color(Rgba::new(1.0, 0.0, 0.0, 1.0)))]);
        assert_eq!(
            base.diff(&red),
            ChangeSet::FOREGROUND | ChangeSet::TEXT | ChangeSet::SYMBOLIC_ICON | ChangeSet::REDRAW
        );

        let padded = style_with(&[(PropertyId::PaddingLeft, StyleValue::Length(4.0))]);
        assert_eq!(base.diff(&padded), ChangeSet::SIZE);
        assert_eq!(base.diff(&base.clone()), ChangeSet::empty());
    }

    #[test]
    fn box_accessors_round() {
        let style = style_with(&[
            (PropertyId::MarginTop, StyleValue::Length(2.7)),
            (PropertyId::PaddingLeft, StyleValue::Length(1.2)),
            (PropertyId::MinWidth, StyleValue::Length(15.2)),
        ]);
        assert_eq!(style.margin(), Spacing::new(2, 0, 0, 0));
        assert_eq!(style.padding(), Spacing::new(0, 0, 0, 1));
        assert_eq!(style.min_width(), 16);
        assert_eq!(style.min_height(), 0);
    }

    #[test]
    fn outline_extent_needs_a_style() {
        let hidden = style_with(&[(PropertyId::OutlineWidth, StyleValue::Length(2.0))]);
        assert_eq!(hidden.outline_extent(), 0);
        let shown = style_with(&[
            (PropertyId::OutlineStyle, StyleValue::BorderStyle(BorderStyle::Solid)),
            (PropertyId::OutlineWidth, StyleValue::Length(2.0)),
            (PropertyId::OutlineOffset, StyleValue::Length(1.0)),
        ]);
        assert_eq!(shown.outline_extent(), 3);
    }

    #[test]
    fn differing_property_names() {
        let a = style_with(&[]);
        let b = style_with(&[(PropertyId::Opacity, StyleValue::Number(0.5))]);
        assert_eq!(a.differing_properties(&b), vec!["opacity"]);
        assert_eq!(a.diff(&b), ChangeSet::REDRAW);
    }
}
