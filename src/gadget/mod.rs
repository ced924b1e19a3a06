//! Gadgets: the layout and paint objects attached to style nodes.
//!
//! A gadget reads its node's computed style and implements the CSS box model
//! around a content area: `measure` reports minimum and natural sizes,
//! `allocate` assigns a rectangle and returns the clip to redraw, `draw`
//! records paint operations into a [`Canvas`]. What fills the content area
//! depends on the [`GadgetKind`]:
//!
//! - [`BoxGadget`]: a linear layout of child gadgets and widgets
//! - [`BuiltinIcon`]: a symbolic image sized by CSS or a default size
//! - [`CustomGadget`]: caller-provided closures
//!
//! Gadgets live in the [`StyleEngine`] and are addressed by [`GadgetId`];
//! every operation is an engine method so gadgets can restyle, measure and
//! notify each other without shared ownership.

pub mod boxed;
pub mod custom;
pub mod icon;
pub mod widget;

use std::collections::HashMap;

use slotmap::new_key_type;

use crate::engine::{StyleChange, StyleEngine};
use crate::error::{Result, StyleError};
use crate::geometry::{Orientation, Region, Spacing};
use crate::node::state::StateFlags;
use crate::node::NodeId;
use crate::render::Canvas;
use crate::style::change::ChangeSet;

pub use boxed::{Align, BoxChild, BoxGadget};
pub use custom::{CustomGadget, CustomHooks};
pub use icon::{indicator_image, BuiltinIcon, IndicatorKind};
pub use widget::{GadgetWidget, Widget, WidgetRef};

new_key_type! {
    /// Handle to a gadget.
    pub struct GadgetId;
}

/// Identifies the widget a gadget belongs to. Requests raised by a gadget
/// are queued under this id for the host to act on.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OwnerId(pub u64);

/// Work a gadget asks its owner to schedule.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum OwnerRequest {
    /// Sizes changed; measure again. Always followed by a redraw.
    Resize,
    /// Sizes are fine but the clip must be recomputed.
    Allocate,
    Redraw,
}

/// Result of a size query.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Measurement {
    pub minimum: i32,
    pub natural: i32,
    pub minimum_baseline: Option<i32>,
    pub natural_baseline: Option<i32>,
}

impl Measurement {
    pub const ZERO: Measurement = Measurement {
        minimum: 0,
        natural: 0,
        minimum_baseline: None,
        natural_baseline: None,
    };

    pub const fn new(minimum: i32, natural: i32) -> Self {
        Self {
            minimum,
            natural,
            minimum_baseline: None,
            natural_baseline: None,
        }
    }

    pub const fn with_baselines(mut self, minimum: i32, natural: i32) -> Self {
        self.minimum_baseline = Some(minimum);
        self.natural_baseline = Some(natural);
        self
    }

    /// Clamp negative sizes to 0 and keep `minimum <= natural`.
    fn normalized(mut self) -> Self {
        if self.minimum < 0 || self.natural < 0 {
            log::debug!("negative size {}/{} clamped", self.minimum, self.natural);
            self.minimum = self.minimum.max(0);
            self.natural = self.natural.max(0);
        }
        if self.natural < self.minimum {
            log::debug!("natural size {} below minimum {}", self.natural, self.minimum);
            self.natural = self.minimum;
        }
        self
    }
}

/// The variant-specific half of a gadget.
#[derive(Debug)]
pub enum GadgetKind {
    Box(BoxGadget),
    BuiltinIcon(BuiltinIcon),
    Custom(CustomGadget),
}

/// A gadget: node binding, owner, last allocation and the variant data.
#[derive(Debug)]
pub struct Gadget {
    node: NodeId,
    owner: Option<OwnerId>,
    /// The box this gadget is packed into.
    parent: Option<GadgetId>,
    allocation: Region,
    baseline: Option<i32>,
    clip: Region,
    measure_cache: HashMap<(Orientation, i32), Measurement>,
    pub(crate) kind: GadgetKind,
}

impl Gadget {
    fn new(node: NodeId, owner: Option<OwnerId>, kind: GadgetKind) -> Self {
        Self {
            node,
            owner,
            parent: None,
            allocation: Region::EMPTY,
            baseline: None,
            clip: Region::EMPTY,
            measure_cache: HashMap::new(),
            kind,
        }
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn owner(&self) -> Option<OwnerId> {
        self.owner
    }

    /// The box gadget this one is packed into, if any.
    pub fn parent(&self) -> Option<GadgetId> {
        self.parent
    }

    /// The margin box assigned by the last `allocate`.
    pub fn allocation(&self) -> Region {
        self.allocation
    }

    pub fn baseline(&self) -> Option<i32> {
        self.baseline
    }

    /// The clip returned by the last `allocate`.
    pub fn clip(&self) -> Region {
        self.clip
    }

    pub fn kind(&self) -> &GadgetKind {
        &self.kind
    }

    pub fn as_box(&self) -> Option<&BoxGadget> {
        match &self.kind {
            GadgetKind::Box(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_icon(&self) -> Option<&BuiltinIcon> {
        match &self.kind {
            GadgetKind::BuiltinIcon(icon) => Some(icon),
            _ => None,
        }
    }

    pub(crate) fn set_parent(&mut self, parent: Option<GadgetId>) {
        self.parent = parent;
    }
}

/// Union of two clips, ignoring empty ones.
fn union_clip(a: Region, b: Region) -> Region {
    match (a.is_empty(), b.is_empty()) {
        (true, _) => b,
        (_, true) => a,
        _ => a.union(b),
    }
}

impl StyleEngine {
    // -----------------------------------------------------------------------
    // Construction
    // -----------------------------------------------------------------------

    /// Bind a new gadget to `node`. A node carries at most one gadget.
    pub(crate) fn attach_gadget(
        &mut self,
        node: NodeId,
        owner: Option<OwnerId>,
        kind: GadgetKind,
    ) -> Result<GadgetId> {
        self.check_node(node)?;
        if let Some(existing) = self.node_gadgets.get(node) {
            return Err(StyleError::InvalidArgument(format!(
                "node {node:?} already carries gadget {existing:?}"
            )));
        }
        let id = self.gadgets.insert(Gadget::new(node, owner, kind));
        self.node_gadgets.insert(node, id);
        log::trace!("gadget {id:?} attached to node {node:?}");
        Ok(id)
    }

    /// Create the node a new gadget lives on, named `name` and placed under
    /// `parent`'s node before `next_sibling`'s node.
    pub(crate) fn create_gadget_node(
        &mut self,
        name: &str,
        parent: Option<GadgetId>,
        next_sibling: Option<GadgetId>,
    ) -> Result<NodeId> {
        let parent_node = parent.map(|p| self.gadget_node(p)).transpose()?;
        let sibling_node = next_sibling.map(|s| self.gadget_node(s)).transpose()?;
        let node = self.create_node(name);
        if let Some(parent_node) = parent_node {
            if let Err(err) = self.insert_before(parent_node, node, sibling_node) {
                if let Err(cleanup) = self.destroy_node(node) {
                    log::debug!("dropping unplaced gadget node {node:?} failed: {cleanup}");
                }
                return Err(err);
            }
        }
        Ok(node)
    }

    /// Remove a gadget. Its node stays; box children are released, and the
    /// gadget leaves the box it was packed into.
    pub fn destroy_gadget(&mut self, id: GadgetId) -> Result<()> {
        let parent = self.gadget_ref(id)?.parent;
        if let Some(parent) = parent {
            self.remove_gadget(parent, id)?;
        }
        let Some(gadget) = self.gadgets.remove(id) else {
            return Ok(());
        };
        self.node_gadgets.remove(gadget.node);
        if let GadgetKind::Box(b) = &gadget.kind {
            for child in b.child_gadgets() {
                if let Some(child) = self.gadgets.get_mut(child) {
                    child.parent = None;
                }
            }
        }
        log::trace!("gadget {id:?} destroyed");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn gadget(&self, id: GadgetId) -> Option<&Gadget> {
        self.gadgets.get(id)
    }

    pub(crate) fn gadget_mut(&mut self, id: GadgetId) -> Result<&mut Gadget> {
        self.gadgets
            .get_mut(id)
            .ok_or_else(|| StyleError::InvalidArgument(format!("unknown gadget {id:?}")))
    }

    pub(crate) fn gadget_ref(&self, id: GadgetId) -> Result<&Gadget> {
        self.gadgets
            .get(id)
            .ok_or_else(|| StyleError::InvalidArgument(format!("unknown gadget {id:?}")))
    }

    /// The gadget attached to `node`.
    pub fn gadget_for_node(&self, node: NodeId) -> Option<GadgetId> {
        self.node_gadgets.get(node).copied()
    }

    pub fn gadget_node(&self, id: GadgetId) -> Result<NodeId> {
        Ok(self.gadget_ref(id)?.node)
    }

    pub fn gadget_owner(&self, id: GadgetId) -> Result<Option<OwnerId>> {
        Ok(self.gadget_ref(id)?.owner)
    }

    pub fn gadget_is_visible(&self, id: GadgetId) -> bool {
        self.gadgets
            .get(id)
            .is_some_and(|g| self.tree.is_visible(g.node))
    }

    pub fn gadget_set_visible(&mut self, id: GadgetId, visible: bool) -> Result<()> {
        let node = self.gadget_node(id)?;
        self.set_visible(node, visible)
    }

    /// Set the state of the gadget's node. The node owns the state.
    pub fn gadget_set_state(&mut self, id: GadgetId, state: StateFlags) -> Result<()> {
        let node = self.gadget_node(id)?;
        self.set_state(node, state)
    }

    pub fn gadget_state(&self, id: GadgetId) -> Result<StateFlags> {
        Ok(self.state(self.gadget_node(id)?))
    }

    pub fn gadget_add_class(&mut self, id: GadgetId, class: &str) -> Result<()> {
        let node = self.gadget_node(id)?;
        self.add_class(node, class)
    }

    pub fn gadget_remove_class(&mut self, id: GadgetId, class: &str) -> Result<()> {
        let node = self.gadget_node(id)?;
        self.remove_class(node, class)
    }

    /// The allocated rectangle including margins.
    pub fn margin_box(&self, id: GadgetId) -> Result<Region> {
        Ok(self.gadget_ref(id)?.allocation)
    }

    /// The allocation minus margins, using the node's current style.
    pub fn border_box(&self, id: GadgetId) -> Result<Region> {
        let (allocation, extents) = self.allocation_and_extents(id, |m, _, _| m)?;
        Ok(allocation.shrink(extents))
    }

    /// The allocation minus margin, border and padding.
    pub fn content_box(&self, id: GadgetId) -> Result<Region> {
        let (allocation, extents) = self.allocation_and_extents(id, |m, b, p| m + b + p)?;
        Ok(allocation.shrink(extents))
    }

    fn allocation_and_extents(
        &self,
        id: GadgetId,
        pick: impl Fn(Spacing, Spacing, Spacing) -> Spacing,
    ) -> Result<(Region, Spacing)> {
        let gadget = self.gadget_ref(id)?;
        let style = self
            .tree
            .get(gadget.node)
            .map(|n| n.style())
            .ok_or_else(|| StyleError::InvalidTree(format!("gadget {id:?} lost its node")))?;
        Ok((
            gadget.allocation,
            pick(style.margin(), style.border(), style.padding()),
        ))
    }

    // -----------------------------------------------------------------------
    // Measure
    // -----------------------------------------------------------------------

    /// Minimum and natural size along `orientation`, including margin,
    /// border and padding. `for_size` is the size in the other axis, or -1.
    pub fn preferred_size(
        &mut self,
        id: GadgetId,
        orientation: Orientation,
        for_size: i32,
    ) -> Result<Measurement> {
        let node = self.gadget_node(id)?;
        if !self.tree.is_visible(node) {
            return Ok(Measurement::ZERO);
        }
        let for_size = for_size.max(-1);
        let style = self.computed_style(node)?;
        if let Some(hit) = self
            .gadgets
            .get(id)
            .and_then(|g| g.measure_cache.get(&(orientation, for_size)))
        {
            return Ok(*hit);
        }

        let extents = style.margin() + style.border() + style.padding();
        let extra = extents.along(orientation);
        let extra_opposite = extents.along(orientation.opposite());
        let extra_baseline = extents.leading(orientation);
        let min_size = match orientation {
            Orientation::Horizontal => style.min_width(),
            Orientation::Vertical => style.min_height(),
        }
        .max(0);

        let content_for_size = if for_size >= 0 {
            (for_size - extra_opposite).max(0)
        } else {
            -1
        };
        let content = self
            .measure_content(id, orientation, content_for_size)?
            .normalized();

        let minimum = content.minimum.max(min_size);
        let natural = content.natural.max(min_size);
        let shift = |baseline: Option<i32>, growth: i32| {
            baseline.map(|b| (b + growth / 2 + extra_baseline).max(0))
        };
        let measured = Measurement {
            minimum: minimum + extra,
            natural: natural + extra,
            minimum_baseline: shift(content.minimum_baseline, minimum - content.minimum),
            natural_baseline: shift(content.natural_baseline, natural - content.natural),
        };

        if let Some(gadget) = self.gadgets.get_mut(id) {
            gadget.measure_cache.insert((orientation, for_size), measured);
        }
        Ok(measured)
    }

    fn measure_content(
        &mut self,
        id: GadgetId,
        orientation: Orientation,
        for_size: i32,
    ) -> Result<Measurement> {
        match &self.gadget_ref(id)?.kind {
            GadgetKind::Box(_) => self.measure_box(id, orientation, for_size),
            GadgetKind::BuiltinIcon(_) => self.measure_icon(id, orientation),
            GadgetKind::Custom(_) => self.measure_custom(id, orientation, for_size),
        }
    }

    // -----------------------------------------------------------------------
    // Allocate
    // -----------------------------------------------------------------------

    /// Assign `allocation` (margin box) and an optional baseline, lay out the
    /// content and return the area drawing may touch.
    pub fn allocate(&mut self, id: GadgetId, allocation: Region, baseline: Option<i32>) -> Result<Region> {
        let gadget = self.gadget_mut(id)?;
        gadget.allocation = allocation;
        gadget.baseline = baseline;
        let node = gadget.node;

        if !self.tree.is_visible(node) {
            self.gadget_mut(id)?.clip = Region::EMPTY;
            return Ok(Region::EMPTY);
        }

        let style = self.computed_style(node)?;
        let margin = style.margin();
        let extents = margin + style.border() + style.padding();

        let mut content = Region::new(
            allocation.x + extents.left,
            allocation.y + extents.top,
            allocation.width - extents.width(),
            allocation.height - extents.height(),
        );
        if content.width < 0 || content.height < 0 {
            log::warn!(
                "gadget {id:?} allocated {}x{}, smaller than its {}x{} extents",
                allocation.width,
                allocation.height,
                extents.width(),
                extents.height()
            );
            content.width = content.width.max(0);
            content.height = content.height.max(0);
        }
        let content_baseline = baseline.map(|b| b - extents.top);

        let content_clip = self.allocate_content(id, content, content_baseline)?;

        let border_box = allocation.shrink(margin);
        let mut clip = union_clip(border_box.grow(style.shadow_extents()), content_clip);
        let outline = style.outline_extent();
        if outline > 0 {
            clip = union_clip(clip, border_box.grow(Spacing::all(outline)));
        }

        self.gadget_mut(id)?.clip = clip;
        Ok(clip)
    }

    fn allocate_content(&mut self, id: GadgetId, content: Region, baseline: Option<i32>) -> Result<Region> {
        match &self.gadget_ref(id)?.kind {
            GadgetKind::Box(_) => self.allocate_box(id, content, baseline),
            GadgetKind::BuiltinIcon(_) => Ok(content),
            GadgetKind::Custom(_) => self.allocate_custom(id, content, baseline),
        }
    }

    // -----------------------------------------------------------------------
    // Draw
    // -----------------------------------------------------------------------

    /// Record background, border, content and focus outline into `canvas`,
    /// clipped to the last allocation's clip. Returns whether focus was
    /// drawn.
    pub fn draw(&mut self, id: GadgetId, canvas: &mut Canvas) -> Result<bool> {
        let gadget = self.gadget_ref(id)?;
        let (node, allocation, clip) = (gadget.node, gadget.allocation, gadget.clip);
        if !self.tree.is_visible(node) {
            return Ok(false);
        }
        let style = self.computed_style(node)?;
        let margin = style.margin();
        if allocation.width < margin.width() || allocation.height < margin.height() {
            log::warn!("gadget {id:?} drawn without room for its margins");
            return Ok(false);
        }
        let border_box = allocation.shrink(margin);

        canvas.push_clip(clip);
        canvas.draw_background(border_box, &style);
        canvas.draw_border(border_box, &style);

        let content = border_box.shrink(style.border() + style.padding());
        let result = if content.is_empty() {
            Ok(false)
        } else {
            self.draw_content(id, canvas, content)
        };
        if matches!(result, Ok(true)) {
            canvas.draw_outline(border_box, &style);
        }
        canvas.pop_clip();
        result
    }

    fn draw_content(&mut self, id: GadgetId, canvas: &mut Canvas, content: Region) -> Result<bool> {
        match &self.gadget_ref(id)?.kind {
            GadgetKind::Box(_) => self.draw_box(id, canvas),
            GadgetKind::BuiltinIcon(_) => self.draw_icon(id, canvas, content),
            GadgetKind::Custom(_) => self.draw_custom(id, canvas, content),
        }
    }

    // -----------------------------------------------------------------------
    // Style changes and owner requests
    // -----------------------------------------------------------------------

    pub(crate) fn gadget_style_changed(&mut self, id: GadgetId, change: &StyleChange) {
        let Some(gadget) = self.gadgets.get_mut(id) else {
            log::trace!("style change for destroyed gadget {id:?} dropped");
            return;
        };
        if change.affects(ChangeSet::SIZE | ChangeSet::FONT) {
            gadget.measure_cache.clear();
        }
        let custom_hook = match &mut gadget.kind {
            GadgetKind::Custom(custom) => custom.has_style_changed(),
            GadgetKind::BuiltinIcon(icon) => {
                if change.affects(ChangeSet::FONT) {
                    icon.drop_font_metrics();
                }
                false
            }
            GadgetKind::Box(_) => false,
        };
        if custom_hook {
            self.custom_style_changed(id, change);
        } else {
            self.default_style_changed(id, change);
        }
    }

    /// Map a style change onto the owner request it needs.
    pub fn default_style_changed(&mut self, id: GadgetId, change: &StyleChange) {
        if change.affects(ChangeSet::FONT | ChangeSet::SIZE) {
            self.queue_resize(id);
        } else if change.affects(ChangeSet::CLIP) {
            self.queue_allocate(id);
        } else if change.affects(ChangeSet::REDRAW) {
            self.queue_draw(id);
        }
    }

    /// Drop cached measurements of the gadget and the boxes above it and ask
    /// the owner for a resize.
    pub fn queue_resize(&mut self, id: GadgetId) {
        let mut next = Some(id);
        let mut owner = None;
        while let Some(current) = next {
            let Some(gadget) = self.gadgets.get_mut(current) else {
                break;
            };
            gadget.measure_cache.clear();
            owner = owner.or(gadget.owner);
            next = gadget.parent;
        }
        if let Some(owner) = owner {
            self.push_request(owner, OwnerRequest::Resize);
            self.push_request(owner, OwnerRequest::Redraw);
        }
    }

    pub fn queue_allocate(&mut self, id: GadgetId) {
        if let Some(owner) = self.effective_owner(id) {
            self.push_request(owner, OwnerRequest::Allocate);
        }
    }

    pub fn queue_draw(&mut self, id: GadgetId) {
        if let Some(owner) = self.effective_owner(id) {
            self.push_request(owner, OwnerRequest::Redraw);
        }
    }

    /// The gadget's owner, or the owner of the nearest box above it.
    fn effective_owner(&self, id: GadgetId) -> Option<OwnerId> {
        let mut next = Some(id);
        while let Some(current) = next {
            let gadget = self.gadgets.get(current)?;
            if gadget.owner.is_some() {
                return gadget.owner;
            }
            next = gadget.parent;
        }
        None
    }

    fn push_request(&mut self, owner: OwnerId, request: OwnerRequest) {
        if !self.owner_requests.contains(&(owner, request)) {
            log::trace!("{owner:?} requests {request:?}");
            self.owner_requests.push((owner, request));
        }
    }

    /// Requests raised since the last call, oldest first, one per owner and
    /// kind.
    pub fn take_owner_requests(&mut self) -> Vec<(OwnerId, OwnerRequest)> {
        std::mem::take(&mut self.owner_requests)
    }

    /// Set an integer property of a widget, read by gadgets configured with
    /// a property name.
    pub fn set_owner_property(&mut self, owner: OwnerId, name: &str, value: i32) {
        self.owner_properties.insert((owner, name.to_string()), value);
    }

    pub fn owner_property(&self, owner: OwnerId, name: &str) -> Option<i32> {
        self.owner_properties.get(&(owner, name.to_string())).copied()
    }
}
