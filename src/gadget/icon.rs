//! Builtin icon gadget: checks, radios, arrows and expanders.
//!
//! The image comes from the gadget unless `-ctk-icon-source` overrides it.
//! Size comes from CSS `min-width`/`min-height` when set, otherwise from the
//! default size or a legacy integer property of the owning widget.

use std::sync::Arc;

use crate::config::MISSING_ICON;
use crate::engine::StyleEngine;
use crate::error::{Result, StyleError};
use crate::geometry::{Orientation, Region};
use crate::node::state::StateFlags;
use crate::node::NodeId;
use crate::render::{Canvas, IconImage};
use crate::style::value::{BuiltinImage, IconSource};

use super::{GadgetId, GadgetKind, Measurement, OwnerId};

/// Icon size in px when nothing else decides it.
pub const DEFAULT_ICON_SIZE: i32 = 16;

/// Which indicator a toggle widget draws.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum IndicatorKind {
    Check,
    Radio,
}

/// The image an indicator shows in `state`. Inconsistent wins over checked.
pub fn indicator_image(kind: IndicatorKind, state: StateFlags) -> BuiltinImage {
    let inconsistent = state.contains(StateFlags::INCONSISTENT);
    let checked = state.contains(StateFlags::CHECKED);
    match kind {
        IndicatorKind::Check if inconsistent => BuiltinImage::CheckInconsistent,
        IndicatorKind::Check if checked => BuiltinImage::Check,
        IndicatorKind::Radio if inconsistent => BuiltinImage::OptionInconsistent,
        IndicatorKind::Radio if checked => BuiltinImage::Option,
        _ => BuiltinImage::None,
    }
}

#[derive(Debug)]
pub struct BuiltinIcon {
    image: BuiltinImage,
    default_size: i32,
    default_size_property: Option<String>,
    /// Strikethrough offset of the node's font, until the font changes.
    strikethrough: Option<i32>,
}

impl BuiltinIcon {
    fn new() -> Self {
        Self {
            image: BuiltinImage::None,
            default_size: DEFAULT_ICON_SIZE,
            default_size_property: None,
            strikethrough: None,
        }
    }

    pub fn image(&self) -> BuiltinImage {
        self.image
    }

    pub fn default_size(&self) -> i32 {
        self.default_size
    }

    pub fn default_size_property(&self) -> Option<&str> {
        self.default_size_property.as_deref()
    }

    pub(crate) fn drop_font_metrics(&mut self) {
        self.strikethrough = None;
    }
}

impl StyleEngine {
    /// An icon on a new node named `name`, placed under `parent`'s node
    /// before `next_sibling`'s node.
    pub fn new_builtin_icon(
        &mut self,
        name: &str,
        owner: Option<OwnerId>,
        parent: Option<GadgetId>,
        next_sibling: Option<GadgetId>,
    ) -> Result<GadgetId> {
        let node = self.create_gadget_node(name, parent, next_sibling)?;
        self.new_builtin_icon_for_node(node, owner)
    }

    pub fn new_builtin_icon_for_node(&mut self, node: NodeId, owner: Option<OwnerId>) -> Result<GadgetId> {
        self.attach_gadget(node, owner, GadgetKind::BuiltinIcon(BuiltinIcon::new()))
    }

    pub fn builtin_icon(&self, id: GadgetId) -> Result<&BuiltinIcon> {
        match &self.gadget_ref(id)?.kind {
            GadgetKind::BuiltinIcon(icon) => Ok(icon),
            _ => Err(StyleError::InvalidArgument(format!("gadget {id:?} is not a builtin icon"))),
        }
    }

    fn icon_mut(&mut self, id: GadgetId) -> Result<&mut BuiltinIcon> {
        match &mut self.gadget_mut(id)?.kind {
            GadgetKind::BuiltinIcon(icon) => Ok(icon),
            _ => Err(StyleError::InvalidArgument(format!("gadget {id:?} is not a builtin icon"))),
        }
    }

    pub fn set_icon_image(&mut self, id: GadgetId, image: BuiltinImage) -> Result<()> {
        let icon = self.icon_mut(id)?;
        if std::mem::replace(&mut icon.image, image) != image {
            self.queue_draw(id);
        }
        Ok(())
    }

    pub fn icon_image(&self, id: GadgetId) -> Result<BuiltinImage> {
        Ok(self.builtin_icon(id)?.image)
    }

    /// Size used when CSS sets no minimum size. Negative sizes are clamped.
    pub fn set_icon_default_size(&mut self, id: GadgetId, size: i32) -> Result<()> {
        if size < 0 {
            log::debug!("icon size {size} clamped to 0");
        }
        let size = size.max(0);
        let icon = self.icon_mut(id)?;
        if std::mem::replace(&mut icon.default_size, size) != size {
            self.queue_resize(id);
        }
        Ok(())
    }

    pub fn icon_default_size(&self, id: GadgetId) -> Result<i32> {
        Ok(self.builtin_icon(id)?.default_size)
    }

    /// Read the size from the owner's integer property `name` instead of
    /// the default size, when the owner has it.
    pub fn set_icon_default_size_property(&mut self, id: GadgetId, name: Option<&str>) -> Result<()> {
        let icon = self.icon_mut(id)?;
        if icon.default_size_property.as_deref() != name {
            icon.default_size_property = name.map(str::to_string);
            self.queue_resize(id);
        }
        Ok(())
    }

    /// The image drawing will show after applying `-ctk-icon-source`.
    pub fn effective_image(&mut self, id: GadgetId) -> Result<IconImage> {
        let node = self.gadget_node(id)?;
        let image = self.builtin_icon(id)?.image;
        let style = self.computed_style(node)?;
        Ok(match style.icon_source() {
            IconSource::Builtin => IconImage::Builtin(image),
            IconSource::Image(image) => IconImage::Builtin(*image),
            IconSource::Theme(name) => IconImage::Named(Arc::clone(name)),
            IconSource::None => IconImage::Builtin(BuiltinImage::None),
        })
    }

    fn icon_size(&self, id: GadgetId) -> Result<i32> {
        let gadget = self.gadget_ref(id)?;
        let icon = self.builtin_icon(id)?;
        let from_owner = icon
            .default_size_property
            .as_deref()
            .zip(gadget.owner())
            .and_then(|(name, owner)| self.owner_property(owner, name));
        Ok(from_owner.unwrap_or(icon.default_size).max(0))
    }

    fn strikethrough(&mut self, id: GadgetId, node: NodeId) -> Result<i32> {
        if let Some(cached) = self.builtin_icon(id)?.strikethrough {
            return Ok(cached);
        }
        let style = self.computed_style(node)?;
        let metrics = self
            .config
            .font_metrics
            .metrics(style.font_family(), style.font_size());
        let offset = metrics.strikethrough_position.round() as i32;
        self.icon_mut(id)?.strikethrough = Some(offset);
        Ok(offset)
    }

    pub(crate) fn measure_icon(&mut self, id: GadgetId, orientation: Orientation) -> Result<Measurement> {
        let node = self.gadget_node(id)?;
        let style = self.computed_style(node)?;
        let css_min = match orientation {
            Orientation::Horizontal => style.min_width(),
            Orientation::Vertical => style.min_height(),
        };
        let size = if css_min > 0 { 0 } else { self.icon_size(id)? };
        let measured = Measurement::new(size, size);
        if orientation == Orientation::Horizontal {
            return Ok(measured);
        }
        let baseline = (size / 2 + self.strikethrough(id, node)?).clamp(0, size);
        Ok(measured.with_baselines(baseline, baseline))
    }

    pub(crate) fn draw_icon(&mut self, id: GadgetId, canvas: &mut Canvas, content: Region) -> Result<bool> {
        let node = self.gadget_node(id)?;
        let image = match self.effective_image(id)? {
            IconImage::Named(name) if !self.config.icon_theme.has_icon(&name) => {
                if self.warned_icons.insert(name.to_string()) {
                    log::warn!("icon '{name}' not found in the icon theme, using '{MISSING_ICON}'");
                }
                IconImage::Named(Arc::from(MISSING_ICON))
            }
            image => image,
        };
        let style = self.computed_style(node)?;
        canvas.draw_icon(content, image, &style);
        Ok(false)
    }

    /// Font configuration changed: forget metrics and remeasure every icon.
    pub(crate) fn fonts_changed(&mut self) {
        let icons: Vec<GadgetId> = self
            .gadgets
            .iter_mut()
            .filter_map(|(id, gadget)| match &mut gadget.kind {
                GadgetKind::BuiltinIcon(icon) => {
                    icon.drop_font_metrics();
                    Some(id)
                }
                _ => None,
            })
            .collect();
        log::debug!("fonts changed, resizing {} icons", icons.len());
        for id in icons {
            self.queue_resize(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BuiltinIconTheme, EngineConfig, FontMetrics, FontMetricsSource};
    use crate::engine::Notification;
    use crate::gadget::OwnerRequest;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn engine(css: &str) -> StyleEngine {
        StyleEngine::new(EngineConfig::new().with_css(css)).unwrap()
    }

    #[derive(Debug, Default)]
    struct CountingMetrics {
        calls: AtomicUsize,
    }

    impl FontMetricsSource for CountingMetrics {
        fn metrics(&self, _family: &str, size_px: f32) -> FontMetrics {
            self.calls.fetch_add(1, Ordering::SeqCst);
            FontMetrics {
                strikethrough_position: size_px / 4.0,
                ..FontMetrics::default()
            }
        }
    }

    #[test]
    fn indicator_images() {
        let both = StateFlags::CHECKED | StateFlags::INCONSISTENT;
        assert_eq!(indicator_image(IndicatorKind::Check, StateFlags::empty()), BuiltinImage::None);
        assert_eq!(indicator_image(IndicatorKind::Check, StateFlags::CHECKED), BuiltinImage::Check);
        assert_eq!(indicator_image(IndicatorKind::Check, both), BuiltinImage::CheckInconsistent);
        assert_eq!(indicator_image(IndicatorKind::Radio, StateFlags::CHECKED), BuiltinImage::Option);
        assert_eq!(
            indicator_image(IndicatorKind::Radio, StateFlags::INCONSISTENT),
            BuiltinImage::OptionInconsistent
        );
    }

    #[test]
    fn size_policy() {
        let mut engine = engine(".sized { min-width: 20px; min-height: 20px; }");
        let icon = engine.new_builtin_icon("arrow", Some(OwnerId(4)), None, None).unwrap();
        let m = engine.preferred_size(icon, Orientation::Horizontal, -1).unwrap();
        assert_eq!((m.minimum, m.natural), (16, 16));

        engine.set_icon_default_size_property(icon, Some("arrow-size")).unwrap();
        let m = engine.preferred_size(icon, Orientation::Horizontal, -1).unwrap();
        assert_eq!(m.minimum, 16);
        engine.set_owner_property(OwnerId(4), "arrow-size", 12);
        engine.queue_resize(icon);
        let m = engine.preferred_size(icon, Orientation::Horizontal, -1).unwrap();
        assert_eq!(m.minimum, 12);

        let node = engine.gadget_node(icon).unwrap();
        engine.add_class(node, "sized").unwrap();
        let m = engine.preferred_size(icon, Orientation::Horizontal, -1).unwrap();
        assert_eq!((m.minimum, m.natural), (20, 20));
    }

    #[test]
    fn baseline_uses_cached_strikethrough() {
        let metrics = Arc::new(CountingMetrics::default());
        let mut engine = StyleEngine::new(
            EngineConfig::new()
                .with_font_metrics(metrics.clone())
                .with_default_font("sans", 16.0)
                .with_css(".big { font-size: 40px; }"),
        )
        .unwrap();
        let icon = engine.new_builtin_icon("check", Some(OwnerId(1)), None, None).unwrap();
        let m = engine.preferred_size(icon, Orientation::Vertical, -1).unwrap();
        // 16 / 2 + 16 / 4
        assert_eq!(m.minimum_baseline, Some(12));
        engine.queue_resize(icon);
        engine.preferred_size(icon, Orientation::Vertical, -1).unwrap();
        assert_eq!(metrics.calls.load(Ordering::SeqCst), 1);

        // 8 + 10 overflows the icon and is clamped
        let node = engine.gadget_node(icon).unwrap();
        engine.add_class(node, "big").unwrap();
        engine.tick(0);
        let m = engine.preferred_size(icon, Orientation::Vertical, -1).unwrap();
        assert_eq!(m.minimum_baseline, Some(16));
        assert_eq!(metrics.calls.load(Ordering::SeqCst), 2);

        let requests = engine.take_owner_requests();
        assert!(requests.contains(&(OwnerId(1), OwnerRequest::Resize)));
        engine.notifier().notify(Notification::FontsChanged);
        engine.tick(1);
        assert_eq!(engine.take_owner_requests(), vec![(OwnerId(1), OwnerRequest::Resize), (OwnerId(1), OwnerRequest::Redraw)]);
        engine.preferred_size(icon, Orientation::Vertical, -1).unwrap();
        assert_eq!(metrics.calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn css_overrides_the_image() {
        let mut engine = engine(
            ".themed { -ctk-icon-source: -ctk-icontheme(\"pan-down-symbolic\"); } .hidden-image { -ctk-icon-source: none; }",
        );
        let icon = engine.new_builtin_icon("arrow", None, None, None).unwrap();
        engine.set_icon_image(icon, BuiltinImage::ArrowDown).unwrap();
        assert_eq!(engine.icon_image(icon).unwrap(), BuiltinImage::ArrowDown);
        assert_eq!(engine.effective_image(icon).unwrap(), IconImage::Builtin(BuiltinImage::ArrowDown));

        let node = engine.gadget_node(icon).unwrap();
        engine.add_class(node, "themed").unwrap();
        assert_eq!(
            engine.effective_image(icon).unwrap(),
            IconImage::Named(Arc::from("pan-down-symbolic"))
        );
        engine.remove_class(node, "themed").unwrap();
        engine.add_class(node, "hidden-image").unwrap();
        assert!(engine.effective_image(icon).unwrap().is_none());
    }

    #[test]
    fn missing_theme_icons_fall_back() {
        let mut engine = StyleEngine::new(
            EngineConfig::new()
                .with_icon_theme(Arc::new(BuiltinIconTheme::with_icons(["go-next"])))
                .with_css("arrow { -ctk-icon-source: -ctk-icontheme(\"go-previous\"); color: black; }"),
        )
        .unwrap();
        let icon = engine.new_builtin_icon("arrow", None, None, None).unwrap();
        engine.allocate(icon, Region::new(0, 0, 16, 16), None).unwrap();
        let mut canvas = Canvas::new();
        engine.draw(icon, &mut canvas).unwrap();
        engine.draw(icon, &mut canvas).unwrap();
        assert!(canvas.dump().contains("icon 0,0 16x16 \"image-missing\" rgb(0,0,0)"));
        assert_eq!(engine.warned_icons.len(), 1);
    }
}
