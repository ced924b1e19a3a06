//! Widgets packed into box gadgets.

use std::cell::RefCell;
use std::rc::Rc;

use crate::engine::StyleEngine;
use crate::error::Result;
use crate::geometry::{Orientation, Region};
use crate::node::NodeId;
use crate::render::Canvas;

use super::{Align, GadgetId, Measurement};

/// A widget as seen by the box that holds it.
///
/// Boxes ask widgets for their own expand and align flags, measure them,
/// hand them a slot and let them draw. Each call gets the engine so widgets
/// can drive their own gadgets.
pub trait Widget {
    /// The widget's style node.
    fn node(&self) -> NodeId;

    fn is_visible(&self, engine: &StyleEngine) -> bool {
        engine.tree().is_visible(self.node())
    }

    /// Whether the widget takes extra space along `orientation`.
    fn expand(&self, _orientation: Orientation) -> bool {
        false
    }

    /// Placement along `orientation` when the slot is larger than needed.
    fn align(&self, _orientation: Orientation) -> Align {
        Align::Fill
    }

    fn measure(&mut self, engine: &mut StyleEngine, orientation: Orientation, for_size: i32) -> Result<Measurement>;

    fn allocate(&mut self, engine: &mut StyleEngine, allocation: Region, baseline: Option<i32>) -> Result<Region>;

    fn draw(&mut self, engine: &mut StyleEngine, canvas: &mut Canvas) -> Result<bool>;
}

/// Shared handle to a widget held by a box.
pub type WidgetRef = Rc<RefCell<dyn Widget>>;

/// A widget whose whole content is a single gadget.
#[derive(Debug, Clone)]
pub struct GadgetWidget {
    gadget: GadgetId,
    node: NodeId,
    expand: [bool; 2],
    align: [Align; 2],
}

impl GadgetWidget {
    pub fn new(engine: &StyleEngine, gadget: GadgetId) -> Result<Self> {
        Ok(Self {
            gadget,
            node: engine.gadget_node(gadget)?,
            expand: [false; 2],
            align: [Align::Fill; 2],
        })
    }

    pub fn with_expand(mut self, orientation: Orientation, expand: bool) -> Self {
        self.expand[orientation.index()] = expand;
        self
    }

    pub fn with_align(mut self, orientation: Orientation, align: Align) -> Self {
        self.align[orientation.index()] = align;
        self
    }

    pub fn gadget(&self) -> GadgetId {
        self.gadget
    }

    pub fn into_ref(self) -> WidgetRef {
        Rc::new(RefCell::new(self))
    }
}

impl Widget for GadgetWidget {
    fn node(&self) -> NodeId {
        self.node
    }

    fn expand(&self, orientation: Orientation) -> bool {
        self.expand[orientation.index()]
    }

    fn align(&self, orientation: Orientation) -> Align {
        self.align[orientation.index()]
    }

    fn measure(&mut self, engine: &mut StyleEngine, orientation: Orientation, for_size: i32) -> Result<Measurement> {
        engine.preferred_size(self.gadget, orientation, for_size)
    }

    fn allocate(&mut self, engine: &mut StyleEngine, allocation: Region, baseline: Option<i32>) -> Result<Region> {
        engine.allocate(self.gadget, allocation, baseline)
    }

    fn draw(&mut self, engine: &mut StyleEngine, canvas: &mut Canvas) -> Result<bool> {
        engine.draw(self.gadget, canvas)
    }
}
