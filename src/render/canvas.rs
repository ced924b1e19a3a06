//! Canvas: the display list gadgets draw into.
//!
//! Drawing does not rasterize. Each gadget appends [`RenderOp`]s describing
//! the CSS layers it paints; a host backend replays them, and tests compare
//! the text produced by [`Canvas::dump`].

use std::fmt;
use std::fmt::Write as _;
use std::sync::Arc;

use crate::geometry::{Region, Spacing};
use crate::style::computed::ComputedStyle;
use crate::style::property::PropertyId;
use crate::style::value::{BorderStyle, BoxShadow, BuiltinImage, IconTransform, Rgba};

// ---------------------------------------------------------------------------
// IconImage
// ---------------------------------------------------------------------------

/// What an icon op shows: a builtin symbol or an icon-theme name.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum IconImage {
    Builtin(BuiltinImage),
    Named(Arc<str>),
}

impl IconImage {
    /// Whether there is nothing to draw.
    pub fn is_none(&self) -> bool {
        matches!(self, IconImage::Builtin(BuiltinImage::None))
    }
}

impl fmt::Display for IconImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IconImage::Builtin(image) => write!(f, "builtin({image})"),
            IconImage::Named(name) => write!(f, "\"{name}\""),
        }
    }
}

// ---------------------------------------------------------------------------
// RenderOp
// ---------------------------------------------------------------------------

/// One recorded drawing operation.
#[derive(Clone, Debug, PartialEq)]
pub enum RenderOp {
    PushClip(Region),
    PopClip,
    /// Background color and outer shadows of a border box.
    Background {
        rect: Region,
        color: Rgba,
        shadows: Vec<BoxShadow>,
    },
    Border {
        rect: Region,
        widths: Spacing,
        style: BorderStyle,
        color: Rgba,
    },
    Icon {
        rect: Region,
        image: IconImage,
        color: Rgba,
        transform: IconTransform,
    },
    Outline {
        rect: Region,
        width: i32,
        offset: i32,
        color: Rgba,
    },
}

fn region(r: Region) -> String {
    format!("{},{} {}x{}", r.x, r.y, r.width, r.height)
}

impl fmt::Display for RenderOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderOp::PushClip(clip) => write!(f, "push-clip {}", region(*clip)),
            RenderOp::PopClip => f.write_str("pop-clip"),
            RenderOp::Background { rect, color, shadows } => {
                write!(f, "background {} {color}", region(*rect))?;
                if !shadows.is_empty() {
                    write!(f, " shadows {}", shadows.len())?;
                }
                Ok(())
            }
            RenderOp::Border { rect, widths, style, color } => write!(
                f,
                "border {} [{} {} {} {}] {} {color}",
                region(*rect),
                widths.top,
                widths.right,
                widths.bottom,
                widths.left,
                style.name()
            ),
            RenderOp::Icon { rect, image, color, transform } => {
                write!(f, "icon {} {image} {color}", region(*rect))?;
                if !transform.is_identity() {
                    write!(f, " rotate {} scale {}", transform.rotate, transform.scale)?;
                }
                Ok(())
            }
            RenderOp::Outline { rect, width, offset, color } => write!(
                f,
                "outline {} width {width} offset {offset} {color}",
                region(*rect)
            ),
        }
    }
}

// ---------------------------------------------------------------------------
// Canvas
// ---------------------------------------------------------------------------

/// A display list with a clip stack.
#[derive(Debug, Default, Clone)]
pub struct Canvas {
    ops: Vec<RenderOp>,
    clip_depth: usize,
}

impl Canvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> &[RenderOp] {
        &self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn clear(&mut self) {
        self.ops.clear();
        self.clip_depth = 0;
    }

    /// Depth of the clip stack.
    pub fn clip_depth(&self) -> usize {
        self.clip_depth
    }

    pub fn push_clip(&mut self, clip: Region) {
        self.clip_depth += 1;
        self.ops.push(RenderOp::PushClip(clip));
    }

    pub fn pop_clip(&mut self) {
        if self.clip_depth == 0 {
            log::debug!("pop_clip without a matching push_clip ignored");
            return;
        }
        self.clip_depth -= 1;
        self.ops.push(RenderOp::PopClip);
    }

    /// Paint the background layer of `rect`, skipped when fully transparent
    /// without shadows.
    pub fn draw_background(&mut self, rect: Region, style: &ComputedStyle) {
        let color = style.color(PropertyId::BackgroundColor);
        let shadows = style.box_shadows();
        if color.is_clear() && shadows.is_empty() {
            return;
        }
        self.ops.push(RenderOp::Background {
            rect,
            color,
            shadows: shadows.to_vec(),
        });
    }

    pub fn draw_border(&mut self, rect: Region, style: &ComputedStyle) {
        let widths = style.border();
        let border_style = style.border_style();
        if widths == Spacing::ZERO || border_style.is_none() {
            return;
        }
        self.ops.push(RenderOp::Border {
            rect,
            widths,
            style: border_style,
            color: style.color(PropertyId::BorderColor),
        });
    }

    /// Focus ring around `rect`.
    pub fn draw_outline(&mut self, rect: Region, style: &ComputedStyle) {
        if style.outline_extent() == 0 {
            return;
        }
        self.ops.push(RenderOp::Outline {
            rect,
            width: style.length(PropertyId::OutlineWidth).ceil() as i32,
            offset: style.length(PropertyId::OutlineOffset).round() as i32,
            color: style.color(PropertyId::OutlineColor),
        });
    }

    /// An icon in `rect`, recolored with the foreground color.
    pub fn draw_icon(&mut self, rect: Region, image: IconImage, style: &ComputedStyle) {
        if image.is_none() {
            return;
        }
        self.ops.push(RenderOp::Icon {
            rect,
            image,
            color: style.color(PropertyId::Color),
            transform: style.icon_transform(),
        });
    }

    /// One line per op, nested clips indented.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        let mut depth = 0usize;
        for op in &self.ops {
            if matches!(op, RenderOp::PopClip) {
                depth = depth.saturating_sub(1);
            }
            let _ = writeln!(out, "{:indent$}{op}", "", indent = depth * 2);
            if matches!(op, RenderOp::PushClip(_)) {
                depth += 1;
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn unbalanced_pop_is_ignored() {
        let mut canvas = Canvas::new();
        canvas.pop_clip();
        assert!(canvas.is_empty());
        canvas.push_clip(Region::new(0, 0, 4, 4));
        canvas.push_clip(Region::new(1, 1, 2, 2));
        canvas.pop_clip();
        assert_eq!(canvas.clip_depth(), 1);
        assert_eq!(canvas.len(), 3);
        canvas.clear();
        assert_eq!(canvas.clip_depth(), 0);
    }

    #[test]
    fn dump_indents_nested_clips() {
        let mut canvas = Canvas::new();
        canvas.push_clip(Region::new(0, 0, 10, 10));
        canvas.push_clip(Region::new(2, 2, 4, 4));
        canvas.ops.push(RenderOp::Icon {
            rect: Region::new(2, 2, 4, 4),
            image: IconImage::Builtin(BuiltinImage::Check),
            color: Rgba::BLACK,
            transform: IconTransform { rotate: 90.0, scale: 1.0 },
        });
        canvas.pop_clip();
        canvas.pop_clip();
        insta::assert_snapshot!(canvas.dump().trim_end(), @r"
        push-clip 0,0 10x10
          push-clip 2,2 4x4
            icon 2,2 4x4 builtin(check) rgb(0,0,0) rotate 90 scale 1
          pop-clip
        pop-clip
        ");
    }

    #[test]
    fn named_images_display_quoted() {
        assert_eq!(IconImage::Named(Arc::from("pan-down-symbolic")).to_string(), "\"pan-down-symbolic\"");
        assert!(IconImage::Builtin(BuiltinImage::None).is_none());
    }
}
