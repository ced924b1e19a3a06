//! Specified → computed value resolution.
//!
//! Picks the winning declaration per property, applies inheritance and
//! `initial`/`inherit`/`unset`, resolves `em`, `pt`, `%` and `currentColor`,
//! and clamps out-of-range numbers.

use std::sync::Arc;

use crate::css::properties::{ColorValue, Length, SpecifiedValue};
use crate::css::provider::MatchedDeclaration;
use crate::style::change::CssChange;
use crate::style::computed::ComputedStyle;
use crate::style::property::{PropertyId, ValueKind};
use crate::style::value::{
    BorderStyle, BoxShadow, IconSource, IconTransform, Rgba, StyleValue, TextDecorationLine,
};

pub(crate) fn pt_to_px(pt: f32) -> f32 {
    pt * 96.0 / 72.0
}

/// Engine-wide initial values that are configurable.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleDefaults {
    pub font_family: Arc<str>,
    /// px
    pub font_size: f32,
}

impl Default for StyleDefaults {
    fn default() -> Self {
        Self {
            font_family: Arc::from("sans-serif"),
            font_size: pt_to_px(10.0),
        }
    }
}

/// The initial value of every property, `currentColor` resolved against the
/// initial `color`.
pub fn initial_values(defaults: &StyleDefaults) -> Vec<StyleValue> {
    PropertyId::ALL
        .into_iter()
        .map(|id| initial_value(id, defaults, Rgba::BLACK))
        .collect()
}

fn initial_value(id: PropertyId, defaults: &StyleDefaults, current_color: Rgba) -> StyleValue {
    match id {
        PropertyId::Color => StyleValue::Color(Rgba::BLACK),
        PropertyId::FontFamily => StyleValue::FontFamily(Arc::clone(&defaults.font_family)),
        PropertyId::FontSize => StyleValue::Length(defaults.font_size),
        PropertyId::FontWeight => StyleValue::Number(400.0),
        PropertyId::TextDecorationLine => StyleValue::TextDecoration(TextDecorationLine::None),
        PropertyId::BackgroundColor => StyleValue::Color(Rgba::TRANSPARENT),
        PropertyId::BorderStyle | PropertyId::OutlineStyle => StyleValue::BorderStyle(BorderStyle::None),
        PropertyId::BorderColor | PropertyId::OutlineColor => StyleValue::Color(current_color),
        PropertyId::BoxShadow => StyleValue::Shadows(Arc::from(Vec::<BoxShadow>::new())),
        PropertyId::Opacity => StyleValue::Number(1.0),
        PropertyId::IconSource => StyleValue::IconSource(IconSource::Builtin),
        PropertyId::IconTransform => StyleValue::Transform(IconTransform::IDENTITY),
        PropertyId::TransitionDuration | PropertyId::TransitionDelay => StyleValue::Duration(0.0),
        _ => StyleValue::Length(0.0),
    }
}

/// Order matched declarations by cascade precedence and keep the winner for
/// each property.
pub fn cascade(matched: &mut [MatchedDeclaration]) -> Vec<Option<&SpecifiedValue>> {
    matched.sort_by_key(|m| m.specificity);
    let mut winners: Vec<Option<&SpecifiedValue>> = vec![None; PropertyId::COUNT];
    for m in matched.iter() {
        winners[m.property.index()] = Some(&m.value);
    }
    winners
}

/// Compute a style from the cascade winners.
pub fn compute_style(
    winners: &[Option<&SpecifiedValue>],
    parent: Option<&ComputedStyle>,
    defaults: &StyleDefaults,
    change: CssChange,
) -> ComputedStyle {
    let mut values: Vec<StyleValue> = Vec::with_capacity(PropertyId::COUNT);

    for id in PropertyId::ALL {
        let current_color = values
            .get(PropertyId::Color.index())
            .and_then(|v| match v {
                StyleValue::Color(c) => Some(*c),
                _ => None,
            })
            .unwrap_or(Rgba::BLACK);
        let inherited = || match parent {
            Some(parent) => parent.get(id).clone(),
            None => initial_value(id, defaults, current_color),
        };
        let initial = || initial_value(id, defaults, current_color);

        let value = match winners.get(id.index()).copied().flatten() {
            None | Some(SpecifiedValue::Unset) if id.is_inherited() => inherited(),
            None | Some(SpecifiedValue::Unset) | Some(SpecifiedValue::Initial) => initial(),
            Some(SpecifiedValue::Inherit) => inherited(),
            Some(specified) => {
                let ctx = Context {
                    id,
                    parent,
                    defaults,
                    values: &values,
                    current_color,
                };
                ctx.compute(specified).unwrap_or_else(|| {
                    log::debug!("{}: {:?} does not fit the property, using initial", id.name(), specified);
                    initial()
                })
            }
        };
        values.push(value);
    }

    zero_unstyled_widths(&mut values);
    ComputedStyle::new(values, change)
}

/// Border and outline widths compute to 0 when their style is none.
fn zero_unstyled_widths(values: &mut [StyleValue]) {
    let is_none = |values: &[StyleValue], id: PropertyId| {
        matches!(&values[id.index()], StyleValue::BorderStyle(style) if style.is_none())
    };
    if is_none(values, PropertyId::BorderStyle) {
        for id in [
            PropertyId::BorderTopWidth,
            PropertyId::BorderRightWidth,
            PropertyId::BorderBottomWidth,
            PropertyId::BorderLeftWidth,
        ] {
            values[id.index()] = StyleValue::Length(0.0);
        }
    }
    if is_none(values, PropertyId::OutlineStyle) {
        values[PropertyId::OutlineWidth.index()] = StyleValue::Length(0.0);
    }
}

struct Context<'a> {
    id: PropertyId,
    parent: Option<&'a ComputedStyle>,
    defaults: &'a StyleDefaults,
    values: &'a [StyleValue],
    current_color: Rgba,
}

impl Context<'_> {
    fn parent_font_size(&self) -> f32 {
        self.parent.map_or(self.defaults.font_size, ComputedStyle::font_size)
    }

    fn own_font_size(&self) -> f32 {
        match self.values.get(PropertyId::FontSize.index()) {
            Some(StyleValue::Length(px)) => *px,
            _ => self.parent_font_size(),
        }
    }

    fn compute(&self, specified: &SpecifiedValue) -> Option<StyleValue> {
        let kind = self.id.kind();
        let value = match (kind, specified) {
            (ValueKind::Color, SpecifiedValue::Color(ColorValue::Rgba(c))) => StyleValue::Color(*c),
            (ValueKind::Color, SpecifiedValue::Color(ColorValue::CurrentColor)) => {
                if self.id == PropertyId::Color {
                    // `color: currentColor` behaves as `inherit`.
                    StyleValue::Color(self.parent.map_or(Rgba::BLACK, |p| p.color(PropertyId::Color)))
                } else {
                    StyleValue::Color(self.current_color)
                }
            }
            (ValueKind::Length, SpecifiedValue::Length(length)) => StyleValue::Length(self.length(*length)),
            (ValueKind::Number, SpecifiedValue::Number(n)) => StyleValue::Number(self.number(*n)),
            (ValueKind::Duration, SpecifiedValue::Duration(ms)) => {
                StyleValue::Duration(self.clamp(*ms, 0.0, f32::MAX))
            }
            (ValueKind::FontFamily, SpecifiedValue::FontFamily(f)) => StyleValue::FontFamily(Arc::clone(f)),
            (ValueKind::BorderStyle, SpecifiedValue::BorderStyle(s)) => StyleValue::BorderStyle(*s),
            (ValueKind::TextDecoration, SpecifiedValue::TextDecoration(d)) => StyleValue::TextDecoration(*d),
            (ValueKind::IconSource, SpecifiedValue::IconSource(s)) => StyleValue::IconSource(s.clone()),
            (ValueKind::Transform, SpecifiedValue::Transform(t)) => StyleValue::Transform(IconTransform {
                rotate: t.rotate,
                scale: self.clamp(t.scale, 0.0, f32::MAX),
            }),
            (ValueKind::Shadows, SpecifiedValue::Shadows(layers)) => {
                let shadows: Vec<BoxShadow> = layers
                    .iter()
                    .map(|layer| BoxShadow {
                        blur: layer.shadow.blur.max(0.0),
                        color: layer.color.unwrap_or(self.current_color),
                        ..layer.shadow
                    })
                    .collect();
                StyleValue::Shadows(Arc::from(shadows))
            }
            _ => return None,
        };
        Some(value)
    }

    fn length(&self, length: Length) -> f32 {
        let px = match length {
            Length::Px(px) => px,
            Length::Pt(pt) => pt_to_px(pt),
            Length::Em(em) if self.id == PropertyId::FontSize => em * self.parent_font_size(),
            Length::Em(em) => em * self.own_font_size(),
            Length::Percent(pct) => pct / 100.0 * self.parent_font_size(),
        };
        match self.id {
            // These may legitimately be negative.
            PropertyId::MarginTop
            | PropertyId::MarginRight
            | PropertyId::MarginBottom
            | PropertyId::MarginLeft
            | PropertyId::OutlineOffset
            | PropertyId::LetterSpacing => self.clamp(px, f32::MIN, f32::MAX),
            _ => self.clamp(px, 0.0, f32::MAX),
        }
    }

    fn number(&self, n: f32) -> f32 {
        match self.id {
            PropertyId::Opacity => self.clamp(n, 0.0, 1.0),
            PropertyId::FontWeight => self.clamp(n, 1.0, 1000.0),
            _ => self.clamp(n, f32::MIN, f32::MAX),
        }
    }

    /// Clamp into `[min, max]`; NaN becomes `max(min, 0)`.
    fn clamp(&self, value: f32, min: f32, max: f32) -> f32 {
        let clamped = if value.is_nan() { min.max(0.0) } else { value.clamp(min, max) };
        if clamped != value {
            log::debug!("{}: clamped {} to {}", self.id.name(), value, clamped);
        }
        clamped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::css::specificity::Specificity;
    use crate::style::change::ChangeSet;

    fn decl(property: PropertyId, value: SpecifiedValue, order: u32) -> MatchedDeclaration {
        MatchedDeclaration {
            specificity: Specificity {
                source_order: order,
                ..Specificity::default()
            },
            property,
            value,
        }
    }

    fn compute(matched: &mut [MatchedDeclaration], parent: Option<&ComputedStyle>) -> ComputedStyle {
        let winners = cascade(matched);
        compute_style(&winners, parent, &StyleDefaults::default(), CssChange::NAME)
    }

    fn px(v: f32) -> SpecifiedValue {
        SpecifiedValue::Length(Length::Px(v))
    }

    #[test]
    fn defaults_without_declarations() {
        let style = compute(&mut [], None);
        assert_eq!(style.font_family(), "sans-serif");
        assert!((style.font_size() - 13.333).abs() < 0.01);
        assert_eq!(style.color(PropertyId::Color), Rgba::BLACK);
        assert_eq!(style.color(PropertyId::BackgroundColor), Rgba::TRANSPARENT);
        assert_eq!(style.change(), CssChange::NAME);
    }

    #[test]
    fn later_declaration_wins() {
        let mut matched = [
            decl(PropertyId::MinWidth, px(20.0), 2),
            decl(PropertyId::MinWidth, px(10.0), 1),
        ];
        assert_eq!(compute(&mut matched, None).min_width(), 20);
    }

    #[test]
    fn inheritance_and_keywords() {
        let mut parent_decls = [
            decl(PropertyId::Color, SpecifiedValue::Color(ColorValue::Rgba(Rgba::WHITE)), 0),
            decl(PropertyId::PaddingTop, px(5.0), 0),
        ];
        let parent = compute(&mut parent_decls, None);

        let child = compute(&mut [], Some(&parent));
        assert_eq!(child.color(PropertyId::Color), Rgba::WHITE);
        assert_eq!(child.padding().top, 0);

        let mut explicit = [
            decl(PropertyId::PaddingTop, SpecifiedValue::Inherit, 0),
            decl(PropertyId::Color, SpecifiedValue::Initial, 0),
        ];
        let child = compute(&mut explicit, Some(&parent));
        assert_eq!(child.padding().top, 5);
        assert_eq!(child.color(PropertyId::Color), Rgba::BLACK);
    }

    #[test]
    fn em_and_pt_lengths() {
        let mut parent_decls = [decl(PropertyId::FontSize, px(10.0), 0)];
        let parent = compute(&mut parent_decls, None);

        let mut matched = [
            decl(PropertyId::FontSize, SpecifiedValue::Length(Length::Em(2.0)), 0),
            decl(PropertyId::MinHeight, SpecifiedValue::Length(Length::Em(1.5)), 0),
            decl(PropertyId::MinWidth, SpecifiedValue::Length(Length::Pt(12.0)), 0),
        ];
        let style = compute(&mut matched, Some(&parent));
        assert_eq!(style.font_size(), 20.0);
        assert_eq!(style.min_height(), 30);
        assert_eq!(style.min_width(), 16);

        let mut pct = [decl(PropertyId::FontSize, SpecifiedValue::Length(Length::Percent(50.0)), 0)];
        assert_eq!(compute(&mut pct, Some(&parent)).font_size(), 5.0);
    }

    #[test]
    fn current_color_resolution() {
        let red = Rgba::new(1.0, 0.0, 0.0, 1.0);
        let mut matched = [
            decl(PropertyId::Color, SpecifiedValue::Color(ColorValue::Rgba(red)), 0),
            decl(PropertyId::BackgroundColor, SpecifiedValue::Color(ColorValue::CurrentColor), 0),
        ];
        let style = compute(&mut matched, None);
        assert_eq!(style.color(PropertyId::BackgroundColor), red);
        // Initial border-color is currentColor too.
        assert_eq!(style.color(PropertyId::BorderColor), red);
    }

    #[test]
    fn border_width_needs_border_style() {
        let mut matched = [decl(PropertyId::BorderTopWidth, px(3.0), 0)];
        assert_eq!(compute(&mut matched, None).border().top, 0);

        let mut matched = [
            decl(PropertyId::BorderTopWidth, px(3.0), 0),
            decl(PropertyId::BorderStyle, SpecifiedValue::BorderStyle(BorderStyle::Solid), 0),
        ];
        assert_eq!(compute(&mut matched, None).border().top, 3);
    }

    #[test]
    fn out_of_range_values_clamp() {
        let mut matched = [
            decl(PropertyId::FontSize, px(-4.0), 0),
            decl(PropertyId::MinWidth, px(f32::NAN), 0),
            decl(PropertyId::Opacity, SpecifiedValue::Number(3.0), 0),
            decl(PropertyId::MarginLeft, px(-2.0), 0),
        ];
        let style = compute(&mut matched, None);
        assert_eq!(style.font_size(), 0.0);
        assert_eq!(style.min_width(), 0);
        assert_eq!(style.length(PropertyId::Opacity), 1.0);
        assert_eq!(style.margin().left, -2);
    }

    #[test]
    fn mismatched_value_kind_falls_back_to_initial() {
        let mut matched = [decl(PropertyId::MinWidth, SpecifiedValue::Number(4.0), 0)];
        let style = compute(&mut matched, None);
        assert_eq!(style.min_width(), 0);
        assert_eq!(style.diff(&compute(&mut [], None)), ChangeSet::empty());
    }
}
