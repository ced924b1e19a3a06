//! Property parsing: declaration tokens → specified values.
//!
//! Shorthands (`margin`, `padding`, `border-width`, `border`, `outline`,
//! `transition`) expand here into their longhands.

use std::sync::Arc;

use crate::css::model::{Declaration, DeclarationValue};
use crate::style::property::{PropertyId, ValueKind};
use crate::style::value::{
    BorderStyle, BoxShadow, BuiltinImage, IconSource, IconTransform, Rgba, TextDecorationLine,
};

/// Errors from property parsing.
#[derive(Debug, thiserror::Error)]
pub enum PropertyError {
    #[error("unknown property: {0}")]
    UnknownProperty(String),
    #[error("invalid value for {property}: {message}")]
    InvalidValue { property: String, message: String },
}

fn invalid(property: &str, message: impl Into<String>) -> PropertyError {
    PropertyError::InvalidValue {
        property: property.into(),
        message: message.into(),
    }
}

/// A length before font-relative units are resolved.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Length {
    Px(f32),
    Pt(f32),
    Em(f32),
    /// Only meaningful for `font-size`, relative to the parent's size.
    Percent(f32),
}

/// A color before `currentColor` is resolved.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ColorValue {
    Rgba(Rgba),
    CurrentColor,
}

/// One `box-shadow` layer; `color: None` stands for `currentColor`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ShadowValue {
    pub shadow: BoxShadow,
    pub color: Option<Rgba>,
}

/// A declared value as the cascade sees it.
#[derive(Clone, Debug, PartialEq)]
pub enum SpecifiedValue {
    Inherit,
    Initial,
    Unset,
    Color(ColorValue),
    Length(Length),
    Number(f32),
    /// Milliseconds.
    Duration(f32),
    FontFamily(Arc<str>),
    BorderStyle(BorderStyle),
    TextDecoration(TextDecorationLine),
    IconSource(IconSource),
    Transform(IconTransform),
    Shadows(Arc<[ShadowValue]>),
}

/// Parse a declaration into `(longhand, value)` pairs.
pub fn parse_declaration(decl: &Declaration) -> Result<Vec<(PropertyId, SpecifiedValue)>, PropertyError> {
    let name = decl.property.to_ascii_lowercase();
    let values = decl.values.as_slice();

    if values.is_empty() {
        return Err(invalid(&name, "missing value"));
    }

    if let [DeclarationValue::Ident(keyword)] = values {
        let global = match keyword.to_ascii_lowercase().as_str() {
            "inherit" => Some(SpecifiedValue::Inherit),
            "initial" => Some(SpecifiedValue::Initial),
            "unset" => Some(SpecifiedValue::Unset),
            _ => None,
        };
        if let Some(global) = global {
            let longhands = longhands_of(&name)?;
            return Ok(longhands.iter().map(|id| (*id, global.clone())).collect());
        }
    }

    match name.as_str() {
        "margin" => parse_four_sides(&name, values, &MARGINS),
        "padding" => parse_four_sides(&name, values, &PADDINGS),
        "border-width" => parse_four_sides(&name, values, &BORDER_WIDTHS),
        "border" => parse_border_shorthand(&name, values, &BORDER_WIDTHS, PropertyId::BorderStyle, PropertyId::BorderColor),
        "outline" => parse_border_shorthand(
            &name,
            values,
            &[PropertyId::OutlineWidth],
            PropertyId::OutlineStyle,
            PropertyId::OutlineColor,
        ),
        "transition" => parse_transition(&name, values),
        _ => {
            let id = PropertyId::from_name(&name)
                .ok_or_else(|| PropertyError::UnknownProperty(decl.property.clone()))?;
            Ok(vec![(id, parse_value(id, values)?)])
        }
    }
}

const MARGINS: [PropertyId; 4] = [
    PropertyId::MarginTop,
    PropertyId::MarginRight,
    PropertyId::MarginBottom,
    PropertyId::MarginLeft,
];
const PADDINGS: [PropertyId; 4] = [
    PropertyId::PaddingTop,
    PropertyId::PaddingRight,
    PropertyId::PaddingBottom,
    PropertyId::PaddingLeft,
];
const BORDER_WIDTHS: [PropertyId; 4] = [
    PropertyId::BorderTopWidth,
    PropertyId::BorderRightWidth,
    PropertyId::BorderBottomWidth,
    PropertyId::BorderLeftWidth,
];

fn longhands_of(name: &str) -> Result<Vec<PropertyId>, PropertyError> {
    let ids = match name {
        "margin" => MARGINS.to_vec(),
        "padding" => PADDINGS.to_vec(),
        "border-width" => BORDER_WIDTHS.to_vec(),
        "border" => {
            let mut ids = BORDER_WIDTHS.to_vec();
            ids.extend([PropertyId::BorderStyle, PropertyId::BorderColor]);
            ids
        }
        "outline" => vec![
            PropertyId::OutlineWidth,
            PropertyId::OutlineStyle,
            PropertyId::OutlineColor,
        ],
        "transition" => vec![PropertyId::TransitionDuration, PropertyId::TransitionDelay],
        _ => vec![PropertyId::from_name(name).ok_or_else(|| PropertyError::UnknownProperty(name.into()))?],
    };
    Ok(ids)
}

/// Parse the value of a longhand.
pub fn parse_value(id: PropertyId, values: &[DeclarationValue]) -> Result<SpecifiedValue, PropertyError> {
    let name = id.name();
    match id.kind() {
        ValueKind::FontFamily => return parse_font_family(name, values),
        ValueKind::Shadows => return parse_shadows(name, values),
        ValueKind::Transform => return parse_transform(name, values),
        _ => {}
    }

    let value = match values {
        [single] => single,
        _ => return Err(invalid(name, format!("expected 1 value, got {}", values.len()))),
    };

    match id.kind() {
        ValueKind::Color => parse_color(name, value).map(SpecifiedValue::Color),
        ValueKind::Length => parse_length(name, value).map(SpecifiedValue::Length),
        ValueKind::Number if id == PropertyId::FontWeight => parse_font_weight(name, value),
        ValueKind::Number => match value {
            DeclarationValue::Number(n) => Ok(SpecifiedValue::Number(*n)),
            DeclarationValue::Dimension(n, unit) if unit == "%" => Ok(SpecifiedValue::Number(n / 100.0)),
            other => Err(invalid(name, format!("expected number, got {other:?}"))),
        },
        ValueKind::Duration => parse_duration(name, value).map(SpecifiedValue::Duration),
        ValueKind::BorderStyle => match value {
            DeclarationValue::Ident(ident) => BorderStyle::from_name(&ident.to_ascii_lowercase())
                .map(SpecifiedValue::BorderStyle)
                .ok_or_else(|| invalid(name, format!("unknown border style '{ident}'"))),
            other => Err(invalid(name, format!("expected border style, got {other:?}"))),
        },
        ValueKind::TextDecoration => match value {
            DeclarationValue::Ident(ident) => TextDecorationLine::from_name(&ident.to_ascii_lowercase())
                .map(SpecifiedValue::TextDecoration)
                .ok_or_else(|| invalid(name, format!("unknown decoration '{ident}'"))),
            other => Err(invalid(name, format!("expected decoration, got {other:?}"))),
        },
        ValueKind::IconSource => parse_icon_source(name, value).map(SpecifiedValue::IconSource),
        ValueKind::FontFamily | ValueKind::Shadows | ValueKind::Transform => {
            Err(invalid(name, "list value parsed as single value"))
        }
    }
}

/// Parse a color: named, hex, `rgb()`, `rgba()` or `currentColor`.
pub fn parse_color(property: &str, value: &DeclarationValue) -> Result<ColorValue, PropertyError> {
    match value {
        DeclarationValue::Ident(ident) if ident.eq_ignore_ascii_case("currentcolor") => {
            Ok(ColorValue::CurrentColor)
        }
        DeclarationValue::Ident(ident) => Rgba::named(ident)
            .map(ColorValue::Rgba)
            .ok_or_else(|| invalid(property, format!("unknown color '{ident}'"))),
        DeclarationValue::Color(hex) => Rgba::parse_hex(hex)
            .map(ColorValue::Rgba)
            .ok_or_else(|| invalid(property, format!("invalid hex color '#{hex}'"))),
        DeclarationValue::Function(func, args) if func == "rgb" || func == "rgba" => {
            let channel = |v: &DeclarationValue| match v {
                DeclarationValue::Number(n) => Some((n / 255.0).clamp(0.0, 1.0)),
                DeclarationValue::Dimension(n, unit) if unit == "%" => Some((n / 100.0).clamp(0.0, 1.0)),
                _ => None,
            };
            let channels: Option<Vec<f32>> = args.iter().take(3).map(channel).collect();
            let alpha = match args.get(3) {
                None => Some(1.0),
                Some(DeclarationValue::Number(a)) => Some(a.clamp(0.0, 1.0)),
                Some(DeclarationValue::Dimension(a, unit)) if unit == "%" => Some((a / 100.0).clamp(0.0, 1.0)),
                Some(_) => None,
            };
            match (channels, alpha) {
                (Some(c), Some(a)) if c.len() == 3 && args.len() <= 4 => {
                    Ok(ColorValue::Rgba(Rgba::new(c[0], c[1], c[2], a)))
                }
                _ => Err(invalid(property, format!("malformed {func}() color"))),
            }
        }
        other => Err(invalid(property, format!("expected color, got {other:?}"))),
    }
}

/// Parse a length. Unitless numbers are accepted as px.
pub fn parse_length(property: &str, value: &DeclarationValue) -> Result<Length, PropertyError> {
    match value {
        DeclarationValue::Number(n) => Ok(Length::Px(*n)),
        DeclarationValue::Dimension(n, unit) => match unit.as_str() {
            "px" => Ok(Length::Px(*n)),
            "pt" => Ok(Length::Pt(*n)),
            "em" => Ok(Length::Em(*n)),
            "%" if property == "font-size" => Ok(Length::Percent(*n)),
            other => Err(invalid(property, format!("unsupported unit '{other}'"))),
        },
        other => Err(invalid(property, format!("expected length, got {other:?}"))),
    }
}

fn parse_duration(property: &str, value: &DeclarationValue) -> Result<f32, PropertyError> {
    match value {
        DeclarationValue::Dimension(n, unit) if unit == "ms" => Ok(*n),
        DeclarationValue::Dimension(n, unit) if unit == "s" => Ok(n * 1000.0),
        DeclarationValue::Number(n) if *n == 0.0 => Ok(0.0),
        other => Err(invalid(property, format!("expected time, got {other:?}"))),
    }
}

fn parse_font_weight(property: &str, value: &DeclarationValue) -> Result<SpecifiedValue, PropertyError> {
    match value {
        DeclarationValue::Number(n) => Ok(SpecifiedValue::Number(*n)),
        DeclarationValue::Ident(ident) => match ident.to_ascii_lowercase().as_str() {
            "normal" => Ok(SpecifiedValue::Number(400.0)),
            "bold" => Ok(SpecifiedValue::Number(700.0)),
            _ => Err(invalid(property, format!("unknown weight '{ident}'"))),
        },
        other => Err(invalid(property, format!("expected weight, got {other:?}"))),
    }
}

fn parse_font_family(property: &str, values: &[DeclarationValue]) -> Result<SpecifiedValue, PropertyError> {
    // First family of the list; the core does no font fallback.
    let mut words = Vec::new();
    for value in values {
        match value {
            DeclarationValue::Comma => break,
            DeclarationValue::String(s) if words.is_empty() => {
                words.push(s.clone());
                break;
            }
            DeclarationValue::Ident(ident) => words.push(ident.clone()),
            other => return Err(invalid(property, format!("expected family name, got {other:?}"))),
        }
    }
    if words.is_empty() {
        return Err(invalid(property, "missing family name"));
    }
    Ok(SpecifiedValue::FontFamily(Arc::from(words.join(" "))))
}

fn parse_icon_source(property: &str, value: &DeclarationValue) -> Result<IconSource, PropertyError> {
    match value {
        DeclarationValue::Ident(ident) if ident.eq_ignore_ascii_case("builtin") => Ok(IconSource::Builtin),
        DeclarationValue::Ident(ident) if ident.eq_ignore_ascii_case("none") => Ok(IconSource::None),
        DeclarationValue::Function(func, args) if func == "builtin" => match args.as_slice() {
            [DeclarationValue::Ident(image)] => BuiltinImage::from_name(image)
                .map(IconSource::Image)
                .ok_or_else(|| invalid(property, format!("unknown builtin image '{image}'"))),
            _ => Err(invalid(property, "builtin() takes one image name")),
        },
        DeclarationValue::Function(func, args) if func == "-ctk-icontheme" => match args.as_slice() {
            [DeclarationValue::String(icon) | DeclarationValue::Ident(icon)] => {
                Ok(IconSource::Theme(Arc::from(icon.as_str())))
            }
            _ => Err(invalid(property, "-ctk-icontheme() takes one icon name")),
        },
        other => Err(invalid(property, format!("expected icon source, got {other:?}"))),
    }
}

fn parse_transform(property: &str, values: &[DeclarationValue]) -> Result<SpecifiedValue, PropertyError> {
    let mut transform = IconTransform::IDENTITY;
    if let [DeclarationValue::Ident(ident)] = values {
        if ident.eq_ignore_ascii_case("none") {
            return Ok(SpecifiedValue::Transform(transform));
        }
    }
    for value in values {
        match value {
            DeclarationValue::Function(func, args) if func == "rotate" => match args.as_slice() {
                [DeclarationValue::Dimension(deg, unit)] if unit == "deg" => transform.rotate += deg,
                [DeclarationValue::Number(n)] if *n == 0.0 => {}
                _ => return Err(invalid(property, "rotate() takes an angle in deg")),
            },
            DeclarationValue::Function(func, args) if func == "scale" => match args.as_slice() {
                [DeclarationValue::Number(s)] => transform.scale *= s,
                _ => return Err(invalid(property, "scale() takes one number")),
            },
            other => return Err(invalid(property, format!("expected transform function, got {other:?}"))),
        }
    }
    Ok(SpecifiedValue::Transform(transform))
}

fn parse_shadows(property: &str, values: &[DeclarationValue]) -> Result<SpecifiedValue, PropertyError> {
    if let [DeclarationValue::Ident(ident)] = values {
        if ident.eq_ignore_ascii_case("none") {
            return Ok(SpecifiedValue::Shadows(Arc::from(Vec::new())));
        }
    }

    let mut layers = Vec::new();
    for layer in values.split(|v| *v == DeclarationValue::Comma) {
        let mut lengths = Vec::new();
        let mut shadow = ShadowValue {
            shadow: BoxShadow::default(),
            color: None,
        };
        for value in layer {
            match value {
                DeclarationValue::Ident(ident) if ident.eq_ignore_ascii_case("inset") => {
                    shadow.shadow.inset = true
                }
                DeclarationValue::Number(_) | DeclarationValue::Dimension(..) => {
                    lengths.push(match parse_length(property, value)? {
                        Length::Px(px) => px,
                        Length::Pt(pt) => pt * 96.0 / 72.0,
                        _ => return Err(invalid(property, "shadow lengths must be absolute")),
                    })
                }
                other => match parse_color(property, other)? {
                    ColorValue::Rgba(rgba) => shadow.color = Some(rgba),
                    ColorValue::CurrentColor => shadow.color = None,
                },
            }
        }
        match lengths.as_slice() {
            [x, y, rest @ ..] if rest.len() <= 2 => {
                shadow.shadow.offset_x = *x;
                shadow.shadow.offset_y = *y;
                shadow.shadow.blur = rest.first().copied().unwrap_or(0.0);
                shadow.shadow.spread = rest.get(1).copied().unwrap_or(0.0);
            }
            _ => return Err(invalid(property, "expected 2 to 4 lengths per shadow")),
        }
        layers.push(shadow);
    }
    Ok(SpecifiedValue::Shadows(Arc::from(layers)))
}

/// 1-4 values: all, vertical/horizontal, top/horizontal/bottom, top/right/bottom/left.
fn parse_four_sides(
    property: &str,
    values: &[DeclarationValue],
    sides: &[PropertyId; 4],
) -> Result<Vec<(PropertyId, SpecifiedValue)>, PropertyError> {
    let lengths = values
        .iter()
        .map(|v| parse_length(property, v))
        .collect::<Result<Vec<_>, _>>()?;
    let [top, right, bottom, left] = match lengths.as_slice() {
        [all] => [*all; 4],
        [v, h] => [*v, *h, *v, *h],
        [t, h, b] => [*t, *h, *b, *h],
        [t, r, b, l] => [*t, *r, *b, *l],
        _ => return Err(invalid(property, format!("expected 1-4 values, got {}", values.len()))),
    };
    Ok(sides
        .iter()
        .zip([top, right, bottom, left])
        .map(|(id, len)| (*id, SpecifiedValue::Length(len)))
        .collect())
}

/// `<width> || <style> || <color>`, each optional, in any order. Omitted parts
/// reset to their initial values.
fn parse_border_shorthand(
    property: &str,
    values: &[DeclarationValue],
    widths: &[PropertyId],
    style_id: PropertyId,
    color_id: PropertyId,
) -> Result<Vec<(PropertyId, SpecifiedValue)>, PropertyError> {
    let mut width = None;
    let mut style = None;
    let mut color = None;

    for value in values {
        match value {
            DeclarationValue::Number(_) | DeclarationValue::Dimension(..) if width.is_none() => {
                width = Some(parse_length(property, value)?);
            }
            DeclarationValue::Ident(ident) if style.is_none() && BorderStyle::from_name(ident).is_some() => {
                style = BorderStyle::from_name(ident);
            }
            other if color.is_none() => color = Some(parse_color(property, other)?),
            other => return Err(invalid(property, format!("unexpected {other:?}"))),
        }
    }

    let mut out: Vec<(PropertyId, SpecifiedValue)> = widths
        .iter()
        .map(|id| (*id, width.map_or(SpecifiedValue::Initial, SpecifiedValue::Length)))
        .collect();
    out.push((style_id, style.map_or(SpecifiedValue::Initial, SpecifiedValue::BorderStyle)));
    out.push((color_id, color.map_or(SpecifiedValue::Initial, SpecifiedValue::Color)));
    Ok(out)
}

/// `transition: <duration> [<delay>]`; property lists and easing are ignored.
fn parse_transition(property: &str, values: &[DeclarationValue]) -> Result<Vec<(PropertyId, SpecifiedValue)>, PropertyError> {
    let times = values
        .iter()
        .take_while(|v| **v != DeclarationValue::Comma)
        .filter(|v| matches!(v, DeclarationValue::Dimension(..) | DeclarationValue::Number(_)))
        .map(|v| parse_duration(property, v))
        .collect::<Result<Vec<_>, _>>()?;
    let (duration, delay) = match times.as_slice() {
        [d] => (*d, 0.0),
        [d, delay, ..] => (*d, *delay),
        [] => return Err(invalid(property, "missing duration")),
    };
    Ok(vec![
        (PropertyId::TransitionDuration, SpecifiedValue::Duration(duration)),
        (PropertyId::TransitionDelay, SpecifiedValue::Duration(delay)),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::css::parser::parse_css;

    fn parse(decl: &str) -> Result<Vec<(PropertyId, SpecifiedValue)>, PropertyError> {
        let sheet = parse_css(&format!("x {{ {decl} }}")).unwrap();
        parse_declaration(&sheet.rules[0].declarations[0])
    }

    fn single(decl: &str) -> SpecifiedValue {
        let mut out = parse(decl).unwrap();
        assert_eq!(out.len(), 1);
        out.remove(0).1
    }

    // ── Colors ───────────────────────────────────────────────────────

    #[test]
    fn colors() {
        assert_eq!(
            single("color: red"),
            SpecifiedValue::Color(ColorValue::Rgba(Rgba::new(1.0, 0.0, 0.0, 1.0)))
        );
        assert_eq!(
            single("border-color: currentColor"),
            SpecifiedValue::Color(ColorValue::CurrentColor)
        );
        assert_eq!(
            single("background-color: rgba(255, 0, 0, 0.5)"),
            SpecifiedValue::Color(ColorValue::Rgba(Rgba::new(1.0, 0.0, 0.0, 0.5)))
        );
        assert!(parse("color: 12px").is_err());
        assert!(parse("color: rgb(1, 2)").is_err());
    }

    // ── Lengths ──────────────────────────────────────────────────────

    #[test]
    fn lengths_and_units() {
        assert_eq!(single("min-width: 16px"), SpecifiedValue::Length(Length::Px(16.0)));
        assert_eq!(single("min-width: 16"), SpecifiedValue::Length(Length::Px(16.0)));
        assert_eq!(single("font-size: 1.5em"), SpecifiedValue::Length(Length::Em(1.5)));
        assert_eq!(single("font-size: 150%"), SpecifiedValue::Length(Length::Percent(150.0)));
        assert!(parse("min-width: 50%").is_err());
    }

    #[test]
    fn four_side_shorthand() {
        let out = parse("margin: 1px 2px 3px").unwrap();
        assert_eq!(
            out,
            vec![
                (PropertyId::MarginTop, SpecifiedValue::Length(Length::Px(1.0))),
                (PropertyId::MarginRight, SpecifiedValue::Length(Length::Px(2.0))),
                (PropertyId::MarginBottom, SpecifiedValue::Length(Length::Px(3.0))),
                (PropertyId::MarginLeft, SpecifiedValue::Length(Length::Px(2.0))),
            ]
        );
        assert!(parse("padding: 1px 2px 3px 4px 5px").is_err());
    }

    #[test]
    fn border_shorthand_any_order() {
        let out = parse("border: solid #000 2px").unwrap();
        assert_eq!(out.len(), 6);
        assert_eq!(out[0], (PropertyId::BorderTopWidth, SpecifiedValue::Length(Length::Px(2.0))));
        assert_eq!(out[4], (PropertyId::BorderStyle, SpecifiedValue::BorderStyle(BorderStyle::Solid)));
        assert_eq!(
            out[5],
            (PropertyId::BorderColor, SpecifiedValue::Color(ColorValue::Rgba(Rgba::BLACK)))
        );

        let out = parse("outline: dashed").unwrap();
        assert_eq!(out[0], (PropertyId::OutlineWidth, SpecifiedValue::Initial));
        assert_eq!(out[2], (PropertyId::OutlineColor, SpecifiedValue::Initial));
    }

    // ── Keywords ─────────────────────────────────────────────────────

    #[test]
    fn global_keywords_expand_shorthands() {
        let out = parse("padding: inherit").unwrap();
        assert_eq!(out.len(), 4);
        assert!(out.iter().all(|(_, v)| *v == SpecifiedValue::Inherit));
        assert_eq!(single("color: unset"), SpecifiedValue::Unset);
    }

    #[test]
    fn unknown_property() {
        assert!(matches!(parse("colour: red"), Err(PropertyError::UnknownProperty(_))));
    }

    // ── Icons and transforms ─────────────────────────────────────────

    #[test]
    fn icon_sources() {
        assert_eq!(
            single("-ctk-icon-source: builtin(check-inconsistent)"),
            SpecifiedValue::IconSource(IconSource::Image(BuiltinImage::CheckInconsistent))
        );
        assert_eq!(
            single("-ctk-icon-source: -ctk-icontheme(\"pan-down\")"),
            SpecifiedValue::IconSource(IconSource::Theme(Arc::from("pan-down")))
        );
        assert_eq!(single("-ctk-icon-source: none"), SpecifiedValue::IconSource(IconSource::None));
        assert!(parse("-ctk-icon-source: builtin(teapot)").is_err());
    }

    #[test]
    fn icon_transform() {
        assert_eq!(
            single("-ctk-icon-transform: rotate(90deg) scale(2)"),
            SpecifiedValue::Transform(IconTransform {
                rotate: 90.0,
                scale: 2.0
            })
        );
        assert_eq!(
            single("-ctk-icon-transform: none"),
            SpecifiedValue::Transform(IconTransform::IDENTITY)
        );
    }

    // ── Misc ─────────────────────────────────────────────────────────

    #[test]
    fn shadows() {
        let value = single("box-shadow: 1px 2px 3px black, inset 0 0 1px 1px");
        let SpecifiedValue::Shadows(layers) = value else {
            panic!("expected shadows");
        };
        assert_eq!(layers.len(), 2);
        assert_eq!(layers[0].shadow.blur, 3.0);
        assert_eq!(layers[0].color, Some(Rgba::BLACK));
        assert!(layers[1].shadow.inset);
        assert_eq!(layers[1].shadow.spread, 1.0);
        assert_eq!(layers[1].color, None);
    }

    #[test]
    fn transitions_and_weights() {
        let out = parse("transition: 200ms 1s").unwrap();
        assert_eq!(out[0].1, SpecifiedValue::Duration(200.0));
        assert_eq!(out[1].1, SpecifiedValue::Duration(1000.0));
        assert_eq!(single("font-weight: bold"), SpecifiedValue::Number(700.0));
        assert_eq!(
            single("font-family: 'DejaVu Sans', sans-serif"),
            SpecifiedValue::FontFamily(Arc::from("DejaVu Sans"))
        );
        assert_eq!(
            single("font-family: Noto Sans"),
            SpecifiedValue::FontFamily(Arc::from("Noto Sans"))
        );
    }
}
