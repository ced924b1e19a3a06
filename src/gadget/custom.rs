//! Custom gadget: content measured, allocated and drawn by closures.

use std::fmt;

use crate::engine::{StyleChange, StyleEngine};
use crate::error::Result;
use crate::geometry::{Orientation, Region};
use crate::node::NodeId;
use crate::render::Canvas;

use super::{GadgetId, GadgetKind, Measurement, OwnerId};

/// Content measurement: `(engine, gadget, orientation, for_size)`.
pub type MeasureFn = Box<dyn FnMut(&mut StyleEngine, GadgetId, Orientation, i32) -> Result<Measurement>>;
/// Content allocation: `(engine, gadget, content box, baseline)`, returns the content clip.
pub type AllocateFn = Box<dyn FnMut(&mut StyleEngine, GadgetId, Region, Option<i32>) -> Result<Region>>;
/// Content drawing: `(engine, gadget, canvas, content box)`, returns whether focus should be drawn.
pub type DrawFn = Box<dyn FnMut(&mut StyleEngine, GadgetId, &mut Canvas, Region) -> Result<bool>>;
/// Replaces the default reaction to style changes.
pub type StyleChangedFn = Box<dyn FnMut(&mut StyleEngine, GadgetId, &StyleChange)>;

/// Closures a custom gadget delegates to. Missing closures measure 0,
/// allocate the whole content box and draw nothing.
#[derive(Default)]
pub struct CustomHooks {
    pub measure: Option<MeasureFn>,
    pub allocate: Option<AllocateFn>,
    pub draw: Option<DrawFn>,
    pub style_changed: Option<StyleChangedFn>,
}

impl CustomHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_measure(
        mut self,
        f: impl FnMut(&mut StyleEngine, GadgetId, Orientation, i32) -> Result<Measurement> + 'static,
    ) -> Self {
        self.measure = Some(Box::new(f));
        self
    }

    pub fn with_allocate(
        mut self,
        f: impl FnMut(&mut StyleEngine, GadgetId, Region, Option<i32>) -> Result<Region> + 'static,
    ) -> Self {
        self.allocate = Some(Box::new(f));
        self
    }

    pub fn with_draw(
        mut self,
        f: impl FnMut(&mut StyleEngine, GadgetId, &mut Canvas, Region) -> Result<bool> + 'static,
    ) -> Self {
        self.draw = Some(Box::new(f));
        self
    }

    pub fn with_style_changed(
        mut self,
        f: impl FnMut(&mut StyleEngine, GadgetId, &StyleChange) + 'static,
    ) -> Self {
        self.style_changed = Some(Box::new(f));
        self
    }
}

impl fmt::Debug for CustomHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomHooks")
            .field("measure", &self.measure.is_some())
            .field("allocate", &self.allocate.is_some())
            .field("draw", &self.draw.is_some())
            .field("style_changed", &self.style_changed.is_some())
            .finish()
    }
}

#[derive(Debug)]
pub struct CustomGadget {
    hooks: CustomHooks,
}

impl CustomGadget {
    pub(crate) fn has_style_changed(&self) -> bool {
        self.hooks.style_changed.is_some()
    }
}

/// Take a hook out of its gadget, run it, and put it back if the gadget is
/// still alive.
macro_rules! with_hook {
    ($engine:expr, $id:expr, $field:ident, |$hook:ident| $call:expr, $fallback:expr) => {{
        let taken = match $engine.gadgets.get_mut($id).map(|g| &mut g.kind) {
            Some(GadgetKind::Custom(custom)) => custom.hooks.$field.take(),
            _ => None,
        };
        match taken {
            Some(mut $hook) => {
                let result = $call;
                if let Some(GadgetKind::Custom(custom)) = $engine.gadgets.get_mut($id).map(|g| &mut g.kind) {
                    custom.hooks.$field = Some($hook);
                }
                result
            }
            None => $fallback,
        }
    }};
}

impl StyleEngine {
    /// A custom gadget on a new node named `name`, placed under `parent`'s
    /// node before `next_sibling`'s node.
    pub fn new_custom(
        &mut self,
        name: &str,
        owner: Option<OwnerId>,
        parent: Option<GadgetId>,
        next_sibling: Option<GadgetId>,
        hooks: CustomHooks,
    ) -> Result<GadgetId> {
        let node = self.create_gadget_node(name, parent, next_sibling)?;
        self.new_custom_for_node(node, owner, hooks)
    }

    pub fn new_custom_for_node(
        &mut self,
        node: NodeId,
        owner: Option<OwnerId>,
        hooks: CustomHooks,
    ) -> Result<GadgetId> {
        self.attach_gadget(node, owner, GadgetKind::Custom(CustomGadget { hooks }))
    }

    pub(crate) fn measure_custom(
        &mut self,
        id: GadgetId,
        orientation: Orientation,
        for_size: i32,
    ) -> Result<Measurement> {
        with_hook!(self, id, measure, |hook| hook(self, id, orientation, for_size), Ok(Measurement::ZERO))
    }

    pub(crate) fn allocate_custom(&mut self, id: GadgetId, content: Region, baseline: Option<i32>) -> Result<Region> {
        with_hook!(self, id, allocate, |hook| hook(self, id, content, baseline), Ok(content))
    }

    pub(crate) fn draw_custom(&mut self, id: GadgetId, canvas: &mut Canvas, content: Region) -> Result<bool> {
        with_hook!(self, id, draw, |hook| hook(self, id, canvas, content), Ok(false))
    }

    pub(crate) fn custom_style_changed(&mut self, id: GadgetId, change: &StyleChange) {
        with_hook!(self, id, style_changed, |hook| hook(self, id, change), ())
    }
}
