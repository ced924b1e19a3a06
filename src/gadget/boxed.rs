//! Box gadget: a row or column of child gadgets and widgets.
//!
//! Along the box orientation children get their minimum size plus a share
//! of the leftover space: first up to their natural size, smallest gap
//! first, then split evenly between visible expanding children. Across the
//! orientation each child is aligned inside the box's content height (or
//! width), optionally on a shared baseline.

use std::fmt;
use std::rc::Rc;

use crate::engine::StyleEngine;
use crate::error::{Result, StyleError};
use crate::geometry::{Orientation, Region};
use crate::node::state::StateFlags;
use crate::node::NodeId;
use crate::render::Canvas;

use super::widget::WidgetRef;
use super::{union_clip, GadgetId, GadgetKind, Measurement, OwnerId};

/// Placement of a child across the box orientation.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Align {
    #[default]
    Fill,
    Start,
    End,
    Center,
    Baseline,
}

impl Align {
    /// Start and end swapped when `reverse` is set.
    pub fn reversed_if(self, reverse: bool) -> Align {
        match self {
            Align::Start if reverse => Align::End,
            Align::End if reverse => Align::Start,
            other => other,
        }
    }
}

/// A child of a box.
#[derive(Clone)]
pub enum BoxChild {
    Gadget(GadgetId),
    Widget(WidgetRef),
}

impl BoxChild {
    pub fn as_gadget(&self) -> Option<GadgetId> {
        match self {
            BoxChild::Gadget(id) => Some(*id),
            BoxChild::Widget(_) => None,
        }
    }

    fn is_widget(&self, widget: &WidgetRef) -> bool {
        matches!(self, BoxChild::Widget(w) if Rc::ptr_eq(w, widget))
    }
}

impl fmt::Debug for BoxChild {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoxChild::Gadget(id) => f.debug_tuple("Gadget").field(id).finish(),
            BoxChild::Widget(w) => match w.try_borrow() {
                Ok(w) => f.debug_tuple("Widget").field(&w.node()).finish(),
                Err(_) => f.write_str("Widget(<borrowed>)"),
            },
        }
    }
}

#[derive(Clone, Debug)]
struct ChildEntry {
    child: BoxChild,
    expand: bool,
    align: Align,
}

/// Configuration and children of a box gadget.
#[derive(Debug)]
pub struct BoxGadget {
    orientation: Orientation,
    spacing: i32,
    draw_focus: bool,
    draw_reverse: bool,
    allocate_reverse: bool,
    align_reverse: bool,
    children: Vec<ChildEntry>,
}

impl BoxGadget {
    fn new(orientation: Orientation) -> Self {
        Self {
            orientation,
            spacing: 0,
            draw_focus: false,
            draw_reverse: false,
            allocate_reverse: false,
            align_reverse: false,
            children: Vec::new(),
        }
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn spacing(&self) -> i32 {
        self.spacing
    }

    pub fn draws_focus(&self) -> bool {
        self.draw_focus
    }

    pub fn draw_reverse(&self) -> bool {
        self.draw_reverse
    }

    pub fn allocate_reverse(&self) -> bool {
        self.allocate_reverse
    }

    pub fn align_reverse(&self) -> bool {
        self.align_reverse
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn children(&self) -> impl Iterator<Item = &BoxChild> + '_ {
        self.children.iter().map(|e| &e.child)
    }

    pub(crate) fn child_gadgets(&self) -> Vec<GadgetId> {
        self.children.iter().filter_map(|e| e.child.as_gadget()).collect()
    }

    fn position(&self, gadget: GadgetId) -> Option<usize> {
        self.children
            .iter()
            .position(|e| e.child.as_gadget() == Some(gadget))
    }
}

/// Minimum and natural size of one child during distribution.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RequestedSize {
    pub minimum: i32,
    pub natural: i32,
}

/// Grow `sizes` from their minimum toward their natural size using at most
/// `extra` pixels. Children with the smallest gap are served first so the
/// space ends up spread as evenly as possible. Returns the pixels left.
pub fn distribute_natural_allocation(mut extra: i32, sizes: &mut [RequestedSize]) -> i32 {
    if extra < 0 {
        log::debug!("negative extra space {extra} clamped");
        return 0;
    }
    let gap = |s: &RequestedSize| (s.natural - s.minimum).max(0);
    let mut spreading: Vec<usize> = (0..sizes.len()).collect();
    // largest gap first, later children first on ties
    spreading.sort_by(|a, b| gap(&sizes[*b]).cmp(&gap(&sizes[*a])).then(b.cmp(a)));

    for (i, &index) in spreading.iter().enumerate().rev() {
        if extra <= 0 {
            break;
        }
        let remaining = i as i32 + 1;
        let glue = (extra + remaining - 1) / remaining;
        let grow = glue.min(gap(&sizes[index]));
        sizes[index].minimum += grow;
        extra -= grow;
    }
    extra
}

impl StyleEngine {
    // -----------------------------------------------------------------------
    // Construction and configuration
    // -----------------------------------------------------------------------

    /// A box on a new node named `name`, placed under `parent`'s node before
    /// `next_sibling`'s node.
    pub fn new_box(
        &mut self,
        name: &str,
        owner: Option<OwnerId>,
        parent: Option<GadgetId>,
        next_sibling: Option<GadgetId>,
        orientation: Orientation,
    ) -> Result<GadgetId> {
        let node = self.create_gadget_node(name, parent, next_sibling)?;
        self.new_box_for_node(node, owner, orientation)
    }

    pub fn new_box_for_node(
        &mut self,
        node: NodeId,
        owner: Option<OwnerId>,
        orientation: Orientation,
    ) -> Result<GadgetId> {
        self.attach_gadget(node, owner, GadgetKind::Box(BoxGadget::new(orientation)))
    }

    pub fn box_gadget(&self, id: GadgetId) -> Result<&BoxGadget> {
        match &self.gadget_ref(id)?.kind {
            GadgetKind::Box(b) => Ok(b),
            _ => Err(StyleError::InvalidArgument(format!("gadget {id:?} is not a box"))),
        }
    }

    fn box_mut(&mut self, id: GadgetId) -> Result<&mut BoxGadget> {
        match &mut self.gadget_mut(id)?.kind {
            GadgetKind::Box(b) => Ok(b),
            _ => Err(StyleError::InvalidArgument(format!("gadget {id:?} is not a box"))),
        }
    }

    /// Apply `update` and queue a resize when it reports a change.
    fn configure_box(&mut self, id: GadgetId, update: impl FnOnce(&mut BoxGadget) -> bool) -> Result<()> {
        if update(self.box_mut(id)?) {
            self.queue_resize(id);
        }
        Ok(())
    }

    pub fn set_box_orientation(&mut self, id: GadgetId, orientation: Orientation) -> Result<()> {
        self.configure_box(id, |b| {
            let changed = b.orientation != orientation;
            b.orientation = orientation;
            changed
        })
    }

    /// Space between visible children. Negative values are clamped to 0.
    pub fn set_box_spacing(&mut self, id: GadgetId, spacing: i32) -> Result<()> {
        if spacing < 0 {
            log::debug!("box spacing {spacing} clamped to 0");
        }
        let spacing = spacing.max(0);
        self.configure_box(id, |b| {
            let changed = b.spacing != spacing;
            b.spacing = spacing;
            changed
        })
    }

    /// Report focus from `draw` while the box's node is focused.
    pub fn set_draw_focus(&mut self, id: GadgetId, draw_focus: bool) -> Result<()> {
        self.configure_box(id, |b| std::mem::replace(&mut b.draw_focus, draw_focus) != draw_focus)
    }

    /// Draw children last to first.
    pub fn set_draw_reverse(&mut self, id: GadgetId, reverse: bool) -> Result<()> {
        self.configure_box(id, |b| std::mem::replace(&mut b.draw_reverse, reverse) != reverse)
    }

    /// Place children from the end of the box, as right-to-left text does.
    pub fn set_allocate_reverse(&mut self, id: GadgetId, reverse: bool) -> Result<()> {
        self.configure_box(id, |b| std::mem::replace(&mut b.allocate_reverse, reverse) != reverse)
    }

    /// Swap start and end alignment of children.
    pub fn set_align_reverse(&mut self, id: GadgetId, reverse: bool) -> Result<()> {
        self.configure_box(id, |b| std::mem::replace(&mut b.align_reverse, reverse) != reverse)
    }

    pub fn box_children(&self, id: GadgetId) -> Result<Vec<BoxChild>> {
        Ok(self.box_gadget(id)?.children().cloned().collect())
    }

    // -----------------------------------------------------------------------
    // Children
    // -----------------------------------------------------------------------

    /// Pack `child` at `position` (the end for `None`). The child's node
    /// moves under the box's node, in the same order as the children.
    pub fn insert_gadget(
        &mut self,
        id: GadgetId,
        position: Option<usize>,
        child: GadgetId,
        expand: bool,
        align: Align,
    ) -> Result<()> {
        let box_node = self.gadget_node(id)?;
        let len = self.box_gadget(id)?.len();
        let child_gadget = self.gadget_ref(child)?;
        if let Some(parent) = child_gadget.parent {
            return Err(StyleError::InvalidArgument(format!(
                "gadget {child:?} is already packed into {parent:?}"
            )));
        }
        let child_node = child_gadget.node;
        let mut ancestor = Some(id);
        while let Some(current) = ancestor {
            if current == child {
                return Err(StyleError::InvalidArgument(format!(
                    "gadget {child:?} contains box {id:?}"
                )));
            }
            ancestor = self.gadgets.get(current).and_then(|g| g.parent);
        }

        let index = position.map_or(len, |p| p.min(len));
        let next_node = self.box_gadget(id)?.children[index..]
            .iter()
            .filter_map(|e| self.box_child_node(&e.child))
            .find(|n| self.tree.parent(*n) == Some(box_node));
        self.insert_before(box_node, child_node, next_node)?;

        self.box_mut(id)?.children.insert(
            index,
            ChildEntry {
                child: BoxChild::Gadget(child),
                expand,
                align,
            },
        );
        self.gadget_mut(child)?.set_parent(Some(id));
        self.queue_resize(id);
        Ok(())
    }

    /// Pack `child` before `sibling`, or at the end without one.
    pub fn insert_gadget_before(
        &mut self,
        id: GadgetId,
        sibling: Option<GadgetId>,
        child: GadgetId,
        expand: bool,
        align: Align,
    ) -> Result<()> {
        let position = match sibling {
            Some(sibling) => Some(self.child_position(id, sibling)?),
            None => None,
        };
        self.insert_gadget(id, position, child, expand, align)
    }

    /// Pack `child` after `sibling`, or at the start without one.
    pub fn insert_gadget_after(
        &mut self,
        id: GadgetId,
        sibling: Option<GadgetId>,
        child: GadgetId,
        expand: bool,
        align: Align,
    ) -> Result<()> {
        let position = match sibling {
            Some(sibling) => self.child_position(id, sibling)? + 1,
            None => 0,
        };
        self.insert_gadget(id, Some(position), child, expand, align)
    }

    /// Pack a widget at `position` (the end for `None`). Widgets report
    /// their own expand and align; their nodes are left where they are.
    pub fn insert_widget(&mut self, id: GadgetId, position: Option<usize>, widget: WidgetRef) -> Result<()> {
        let b = self.box_mut(id)?;
        if b.children.iter().any(|e| e.child.is_widget(&widget)) {
            return Err(StyleError::InvalidArgument(format!("widget already packed into {id:?}")));
        }
        let index = position.map_or(b.children.len(), |p| p.min(b.children.len()));
        b.children.insert(
            index,
            ChildEntry {
                child: BoxChild::Widget(widget),
                expand: false,
                align: Align::Fill,
            },
        );
        self.queue_resize(id);
        Ok(())
    }

    /// Unpack `child` and detach its node from the box's node.
    pub fn remove_gadget(&mut self, id: GadgetId, child: GadgetId) -> Result<()> {
        let index = self.child_position(id, child)?;
        let box_node = self.gadget_node(id)?;
        self.box_mut(id)?.children.remove(index);
        let child_gadget = self.gadget_mut(child)?;
        child_gadget.set_parent(None);
        let child_node = child_gadget.node;
        if self.tree.parent(child_node) == Some(box_node) {
            self.set_parent(child_node, None)?;
        }
        self.queue_resize(id);
        Ok(())
    }

    pub fn remove_widget(&mut self, id: GadgetId, widget: &WidgetRef) -> Result<()> {
        let b = self.box_mut(id)?;
        let index = b
            .children
            .iter()
            .position(|e| e.child.is_widget(widget))
            .ok_or_else(|| StyleError::InvalidArgument(format!("widget is not packed into {id:?}")))?;
        b.children.remove(index);
        self.queue_resize(id);
        Ok(())
    }

    /// Reverse the children and the child nodes of the box's node.
    pub fn box_reverse_children(&mut self, id: GadgetId) -> Result<()> {
        let node = self.gadget_node(id)?;
        self.box_mut(id)?.children.reverse();
        self.reverse_children(node)?;
        self.queue_resize(id);
        Ok(())
    }

    pub fn set_gadget_expand(&mut self, id: GadgetId, child: GadgetId, expand: bool) -> Result<()> {
        let index = self.child_position(id, child)?;
        self.configure_box(id, |b| std::mem::replace(&mut b.children[index].expand, expand) != expand)
    }

    pub fn set_gadget_align(&mut self, id: GadgetId, child: GadgetId, align: Align) -> Result<()> {
        let index = self.child_position(id, child)?;
        self.configure_box(id, |b| std::mem::replace(&mut b.children[index].align, align) != align)
    }

    pub fn set_child_packing(&mut self, id: GadgetId, child: GadgetId, expand: bool, align: Align) -> Result<()> {
        self.set_gadget_expand(id, child, expand)?;
        self.set_gadget_align(id, child, align)
    }

    /// `(expand, align)` of a packed gadget.
    pub fn child_packing(&self, id: GadgetId, child: GadgetId) -> Result<(bool, Align)> {
        let index = self.child_position(id, child)?;
        let entry = &self.box_gadget(id)?.children[index];
        Ok((entry.expand, entry.align))
    }

    fn child_position(&self, id: GadgetId, child: GadgetId) -> Result<usize> {
        self.box_gadget(id)?
            .position(child)
            .ok_or_else(|| StyleError::InvalidArgument(format!("gadget {child:?} is not packed into {id:?}")))
    }

    // -----------------------------------------------------------------------
    // Child queries
    // -----------------------------------------------------------------------

    fn box_child_node(&self, child: &BoxChild) -> Option<NodeId> {
        match child {
            BoxChild::Gadget(g) => self.gadgets.get(*g).map(|g| g.node()),
            BoxChild::Widget(w) => w.try_borrow().ok().map(|w| w.node()),
        }
    }

    fn box_child_visible(&self, child: &BoxChild) -> bool {
        match child {
            BoxChild::Gadget(g) => self.gadget_is_visible(*g),
            BoxChild::Widget(w) => w.try_borrow().is_ok_and(|w| w.is_visible(self)),
        }
    }

    fn box_child_expand(&self, entry: &ChildEntry, orientation: Orientation) -> bool {
        match &entry.child {
            BoxChild::Gadget(_) => entry.expand,
            BoxChild::Widget(w) => w.try_borrow().is_ok_and(|w| w.expand(orientation)),
        }
    }

    fn box_child_align(&self, entry: &ChildEntry, orientation: Orientation) -> Align {
        match &entry.child {
            BoxChild::Gadget(_) => entry.align,
            BoxChild::Widget(w) => w.try_borrow().map_or(Align::Fill, |w| w.align(orientation)),
        }
    }

    fn measure_box_child(&mut self, child: &BoxChild, orientation: Orientation, for_size: i32) -> Result<Measurement> {
        match child {
            BoxChild::Gadget(g) => self.preferred_size(*g, orientation, for_size),
            BoxChild::Widget(w) => {
                if !self.box_child_visible(child) {
                    return Ok(Measurement::ZERO);
                }
                let mut widget = w
                    .try_borrow_mut()
                    .map_err(|_| StyleError::InvalidTree("widget measured while in use".into()))?;
                widget.measure(self, orientation, for_size)
            }
        }
    }

    // -----------------------------------------------------------------------
    // Measure
    // -----------------------------------------------------------------------

    pub(crate) fn measure_box(&mut self, id: GadgetId, orientation: Orientation, for_size: i32) -> Result<Measurement> {
        let b = self.box_gadget(id)?;
        let (box_orientation, spacing, children) = (b.orientation, b.spacing, b.children.clone());
        if orientation == box_orientation {
            self.measure_box_along(&children, orientation, spacing, for_size)
        } else {
            self.measure_box_across(&children, box_orientation, spacing, for_size)
        }
    }

    /// Sum of the children plus spacing between the visible ones.
    fn measure_box_along(
        &mut self,
        children: &[ChildEntry],
        orientation: Orientation,
        spacing: i32,
        for_size: i32,
    ) -> Result<Measurement> {
        let mut total = Measurement::ZERO;
        let mut visible = 0;
        for entry in children {
            let m = self.measure_box_child(&entry.child, orientation, for_size)?;
            if self.box_child_visible(&entry.child) {
                visible += 1;
            }
            total.minimum += m.minimum;
            total.natural += m.natural;
        }
        let gaps = spacing * (visible - 1).max(0);
        Ok(Measurement::new(total.minimum + gaps, total.natural + gaps))
    }

    /// Largest child, with baselined children stacked on a shared baseline
    /// that is centered in the result.
    fn measure_box_across(
        &mut self,
        children: &[ChildEntry],
        box_orientation: Orientation,
        spacing: i32,
        for_size: i32,
    ) -> Result<Measurement> {
        let orientation = box_orientation.opposite();
        let sizes = if for_size >= 0 {
            Some(self.distribute(children, box_orientation, spacing, -1, for_size)?)
        } else {
            None
        };

        let (mut minimum, mut natural) = (0, 0);
        let mut above: Option<(i32, i32)> = None;
        let mut below = (0, 0);
        for (i, entry) in children.iter().enumerate() {
            let child_for_size = sizes.as_ref().map_or(-1, |s| s[i]);
            let m = self.measure_box_child(&entry.child, orientation, child_for_size)?;
            match (m.minimum_baseline, m.natural_baseline) {
                (Some(min_baseline), Some(nat_baseline)) => {
                    let (above_min, above_nat) = above.unwrap_or((0, 0));
                    above = Some((above_min.max(min_baseline), above_nat.max(nat_baseline)));
                    below = (
                        below.0.max(m.minimum - min_baseline),
                        below.1.max(m.natural - nat_baseline),
                    );
                }
                _ => {
                    minimum = minimum.max(m.minimum);
                    natural = natural.max(m.natural);
                }
            }
        }

        let Some((above_min, above_nat)) = above else {
            return Ok(Measurement::new(minimum, natural));
        };
        minimum = minimum.max(above_min + below.0);
        natural = natural.max(above_nat + below.1);
        Ok(Measurement::new(minimum, natural).with_baselines(
            above_min + (minimum - (above_min + below.0)) / 2,
            above_nat + (natural - (above_nat + below.1)) / 2,
        ))
    }

    /// Sizes along the box orientation for a box of `size` pixels.
    fn distribute(
        &mut self,
        children: &[ChildEntry],
        orientation: Orientation,
        spacing: i32,
        for_size: i32,
        mut size: i32,
    ) -> Result<Vec<i32>> {
        let mut sizes = Vec::with_capacity(children.len());
        let mut visible = 0;
        let mut expanding = Vec::new();
        for (i, entry) in children.iter().enumerate() {
            let m = self.measure_box_child(&entry.child, orientation, for_size)?;
            if self.box_child_visible(&entry.child) {
                visible += 1;
                if self.box_child_expand(entry, orientation) {
                    expanding.push(i);
                }
            }
            sizes.push(RequestedSize {
                minimum: m.minimum,
                natural: m.natural,
            });
            size -= m.minimum;
        }
        size -= spacing * (visible - 1).max(0);

        if size < 0 {
            log::warn!("box allocated {} px below its minimum size", -size);
            return Ok(sizes.into_iter().map(|s| s.minimum).collect());
        }

        size = distribute_natural_allocation(size, &mut sizes);

        let mut remaining = expanding.len() as i32;
        for index in expanding {
            if size <= 0 {
                break;
            }
            let share = size / remaining;
            sizes[index].minimum += share;
            size -= share;
            remaining -= 1;
        }
        Ok(sizes.into_iter().map(|s| s.minimum).collect())
    }

    // -----------------------------------------------------------------------
    // Allocate
    // -----------------------------------------------------------------------

    pub(crate) fn allocate_box(&mut self, id: GadgetId, content: Region, baseline: Option<i32>) -> Result<Region> {
        let b = self.box_gadget(id)?;
        let (orientation, spacing, reverse, align_reverse) =
            (b.orientation, b.spacing, b.allocate_reverse, b.align_reverse);
        let children = b.children.clone();

        let main_start = match orientation {
            Orientation::Horizontal => content.x,
            Orientation::Vertical => content.y,
        };
        let main_extent = content.extent(orientation);
        let cross_extent = content.extent(orientation.opposite());
        let sizes = self.distribute(&children, orientation, spacing, cross_extent, main_extent)?;

        let mut position = if reverse { main_start + main_extent } else { main_start };
        let mut clip = Region::EMPTY;
        for (entry, size) in children.iter().zip(sizes) {
            let start = if reverse { position - size } else { position };
            let slot = match orientation {
                Orientation::Horizontal => Region::new(start, content.y, size, content.height),
                Orientation::Vertical => Region::new(content.x, start, content.width, size),
            };
            let child_clip = self.allocate_box_child(entry, orientation, align_reverse, slot, baseline)?;
            clip = union_clip(clip, child_clip);

            let advance = if self.box_child_visible(&entry.child) { size + spacing } else { size };
            position += if reverse { -advance } else { advance };
        }
        Ok(clip)
    }

    /// Align a child inside its slot across the box orientation.
    fn allocate_box_child(
        &mut self,
        entry: &ChildEntry,
        orientation: Orientation,
        align_reverse: bool,
        slot: Region,
        baseline: Option<i32>,
    ) -> Result<Region> {
        let cross = orientation.opposite();
        let baseline = baseline.filter(|_| orientation == Orientation::Horizontal);
        let mut align = self.box_child_align(entry, cross).reversed_if(align_reverse);
        if align == Align::Baseline && baseline.is_none() {
            align = Align::Center;
        }

        let (main_extent, cross_extent) = (slot.extent(orientation), slot.extent(cross));
        let (offset, extent) = if align == Align::Fill {
            (0, cross_extent)
        } else {
            let m = self.measure_box_child(&entry.child, cross, main_extent)?;
            let extent = m.natural.min(cross_extent);
            let offset = match align {
                Align::End => cross_extent - extent,
                Align::Center => (cross_extent - extent) / 2,
                // child baseline on the box baseline, kept inside the slot
                Align::Baseline => match (baseline, m.natural_baseline) {
                    (Some(line), Some(own)) => (line - own).clamp(0, (cross_extent - extent).max(0)),
                    _ => 0,
                },
                Align::Start | Align::Fill => 0,
            };
            (offset, extent)
        };
        let allocation = match orientation {
            Orientation::Horizontal => Region::new(slot.x, slot.y + offset, slot.width, extent),
            Orientation::Vertical => Region::new(slot.x + offset, slot.y, extent, slot.height),
        };
        let child_baseline = baseline
            .filter(|_| align == Align::Baseline)
            .map(|line| line - offset);

        match &entry.child {
            BoxChild::Gadget(g) => self.allocate(*g, allocation, child_baseline),
            BoxChild::Widget(w) => {
                let mut widget = w
                    .try_borrow_mut()
                    .map_err(|_| StyleError::InvalidTree("widget allocated while in use".into()))?;
                widget.allocate(self, allocation, child_baseline)
            }
        }
    }

    // -----------------------------------------------------------------------
    // Draw
    // -----------------------------------------------------------------------

    pub(crate) fn draw_box(&mut self, id: GadgetId, canvas: &mut Canvas) -> Result<bool> {
        let node = self.gadget_node(id)?;
        let b = self.box_gadget(id)?;
        let draw_focus = b.draw_focus;
        let mut children = b.children.clone();
        if b.draw_reverse {
            children.reverse();
        }
        for entry in &children {
            match &entry.child {
                BoxChild::Gadget(g) => {
                    self.draw(*g, canvas)?;
                }
                BoxChild::Widget(w) => {
                    if !self.box_child_visible(&entry.child) {
                        continue;
                    }
                    let mut widget = w
                        .try_borrow_mut()
                        .map_err(|_| StyleError::InvalidTree("widget drawn while in use".into()))?;
                    widget.draw(self, canvas)?;
                }
            }
        }
        Ok(draw_focus && self.state(node).contains(StateFlags::FOCUSED))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::gadget::custom::CustomHooks;
    use crate::gadget::widget::GadgetWidget;
    use crate::gadget::OwnerRequest;
    use pretty_assertions::assert_eq;

    fn engine() -> StyleEngine {
        StyleEngine::new(EngineConfig::new().with_builtin_theme(false)).unwrap()
    }

    /// A leaf measuring `min`/`nat` on both axes.
    fn leaf(engine: &mut StyleEngine, name: &str, min: i32, nat: i32) -> GadgetId {
        let hooks = CustomHooks::new().with_measure(move |_, _, _, _| Ok(Measurement::new(min, nat)));
        engine.new_custom(name, None, None, None, hooks).unwrap()
    }

    fn baselined(engine: &mut StyleEngine, height: i32, baseline: i32) -> GadgetId {
        let hooks = CustomHooks::new().with_measure(move |_, _, orientation, _| {
            Ok(match orientation {
                Orientation::Horizontal => Measurement::new(10, 10),
                Orientation::Vertical => Measurement::new(height, height).with_baselines(baseline, baseline),
            })
        });
        engine.new_custom("text", None, None, None, hooks).unwrap()
    }

    fn row(engine: &mut StyleEngine) -> GadgetId {
        engine
            .new_box("row", Some(OwnerId(1)), None, None, Orientation::Horizontal)
            .unwrap()
    }

    fn allocation(engine: &StyleEngine, id: GadgetId) -> Region {
        engine.gadget(id).unwrap().allocation()
    }

    #[test]
    fn natural_space_goes_to_the_smallest_gaps_first() {
        let mut sizes = [
            RequestedSize { minimum: 10, natural: 40 },
            RequestedSize { minimum: 10, natural: 15 },
            RequestedSize { minimum: 10, natural: 30 },
        ];
        let left = distribute_natural_allocation(30, &mut sizes);
        assert_eq!(left, 0);
        assert_eq!(sizes.map(|s| s.minimum), [22, 15, 23]);

        let mut sizes = [RequestedSize { minimum: 5, natural: 8 }];
        assert_eq!(distribute_natural_allocation(10, &mut sizes), 7);
        assert_eq!(sizes[0].minimum, 8);
    }

    #[test]
    fn measures_sum_along_and_max_across() {
        let mut engine = engine();
        let b = row(&mut engine);
        engine.set_box_spacing(b, 4).unwrap();
        for (min, nat) in [(10, 20), (5, 30), (7, 7)] {
            let child = leaf(&mut engine, "item", min, nat);
            engine.insert_gadget(b, None, child, false, Align::Fill).unwrap();
        }
        let m = engine.preferred_size(b, Orientation::Horizontal, -1).unwrap();
        assert_eq!((m.minimum, m.natural), (22 + 8, 57 + 8));
        let m = engine.preferred_size(b, Orientation::Vertical, -1).unwrap();
        assert_eq!((m.minimum, m.natural), (10, 30));
    }

    #[test]
    fn hidden_children_take_no_spacing() {
        let mut engine = engine();
        let b = row(&mut engine);
        engine.set_box_spacing(b, 4).unwrap();
        let first = leaf(&mut engine, "item", 10, 10);
        let hidden = leaf(&mut engine, "item", 10, 10);
        let last = leaf(&mut engine, "item", 10, 10);
        for child in [first, hidden, last] {
            engine.insert_gadget(b, None, child, false, Align::Fill).unwrap();
        }
        engine.gadget_set_visible(hidden, false).unwrap();
        let m = engine.preferred_size(b, Orientation::Horizontal, -1).unwrap();
        assert_eq!(m.minimum, 24);

        engine.allocate(b, Region::new(0, 0, 24, 10), None).unwrap();
        assert_eq!(allocation(&engine, first), Region::new(0, 0, 10, 10));
        assert_eq!(allocation(&engine, last), Region::new(14, 0, 10, 10));
    }

    #[test]
    fn hiding_a_child_remeasures_the_box() {
        let mut engine = engine();
        let b = row(&mut engine);
        let kids: Vec<_> = (0..3).map(|_| leaf(&mut engine, "item", 10, 10)).collect();
        for child in &kids {
            engine.insert_gadget(b, None, *child, false, Align::Fill).unwrap();
        }
        engine.tick(0);
        assert_eq!(engine.preferred_size(b, Orientation::Horizontal, -1).unwrap().natural, 30);

        engine.gadget_set_visible(kids[1], false).unwrap();
        engine.tick(1);
        assert_eq!(engine.preferred_size(b, Orientation::Horizontal, -1).unwrap().natural, 20);

        engine.gadget_set_visible(kids[1], true).unwrap();
        engine.tick(2);
        assert_eq!(engine.preferred_size(b, Orientation::Horizontal, -1).unwrap().natural, 30);
    }

    #[test]
    fn expanding_children_share_the_remainder() {
        let mut engine = engine();
        let b = row(&mut engine);
        let children: Vec<_> = (0..3).map(|_| leaf(&mut engine, "item", 0, 0)).collect();
        for child in &children {
            engine.insert_gadget(b, None, *child, true, Align::Fill).unwrap();
        }
        engine.allocate(b, Region::new(0, 0, 10, 5), None).unwrap();
        let widths: Vec<_> = children.iter().map(|c| allocation(&engine, *c).width).collect();
        assert_eq!(widths, vec![3, 3, 4]);
        assert_eq!(allocation(&engine, children[2]).x, 6);
    }

    #[test]
    fn cross_axis_alignment() {
        let mut engine = engine();
        let b = row(&mut engine);
        let start = leaf(&mut engine, "item", 10, 10);
        let center = leaf(&mut engine, "item", 10, 10);
        let end = leaf(&mut engine, "item", 10, 10);
        let fill = leaf(&mut engine, "item", 10, 10);
        for (child, align) in [(start, Align::Start), (center, Align::Center), (end, Align::End), (fill, Align::Fill)] {
            engine.insert_gadget(b, None, child, false, align).unwrap();
        }
        engine.allocate(b, Region::new(0, 0, 40, 30), None).unwrap();
        assert_eq!(allocation(&engine, start), Region::new(0, 0, 10, 10));
        assert_eq!(allocation(&engine, center), Region::new(10, 10, 10, 10));
        assert_eq!(allocation(&engine, end), Region::new(20, 20, 10, 10));
        assert_eq!(allocation(&engine, fill), Region::new(30, 0, 10, 30));

        engine.set_align_reverse(b, true).unwrap();
        engine.allocate(b, Region::new(0, 0, 40, 30), None).unwrap();
        assert_eq!(allocation(&engine, start).y, 20);
        assert_eq!(allocation(&engine, end).y, 0);
    }

    #[test]
    fn baseline_children_share_a_centered_baseline() {
        let mut engine = engine();
        let b = row(&mut engine);
        let small = baselined(&mut engine, 10, 8);
        let deep = baselined(&mut engine, 20, 5);
        for child in [small, deep] {
            engine.insert_gadget(b, None, child, false, Align::Baseline).unwrap();
        }
        let m = engine.preferred_size(b, Orientation::Vertical, -1).unwrap();
        assert_eq!((m.minimum, m.minimum_baseline), (23, Some(8)));

        let tall = leaf(&mut engine, "item", 30, 30);
        engine.insert_gadget(b, None, tall, false, Align::Fill).unwrap();
        let m = engine.preferred_size(b, Orientation::Vertical, -1).unwrap();
        assert_eq!((m.minimum, m.minimum_baseline), (30, Some(11)));

        engine.allocate(b, Region::new(0, 0, 60, 30), Some(11)).unwrap();
        assert_eq!(allocation(&engine, small), Region::new(0, 3, 10, 10));
        assert_eq!(engine.gadget(small).unwrap().baseline(), Some(8));
        assert_eq!(allocation(&engine, deep), Region::new(10, 6, 10, 20));
        assert_eq!(engine.gadget(deep).unwrap().baseline(), Some(5));
        engine.allocate(b, Region::new(0, 0, 60, 30), None).unwrap();
        assert_eq!(engine.gadget(small).unwrap().baseline(), None);
        assert_eq!(allocation(&engine, small).y, 10);
    }

    #[test]
    fn height_for_width_reaches_children() {
        let mut engine = engine();
        let b = engine
            .new_box("column", None, None, None, Orientation::Vertical)
            .unwrap();
        let hooks = CustomHooks::new().with_measure(|_, _, orientation, for_size| {
            Ok(match orientation {
                Orientation::Horizontal => Measurement::new(10, 40),
                // narrower means taller
                Orientation::Vertical if for_size > 0 => {
                    let lines = (40 + for_size - 1) / for_size;
                    Measurement::new(lines * 10, lines * 10)
                }
                Orientation::Vertical => Measurement::new(10, 10),
            })
        });
        let text = engine.new_custom("text", None, None, None, hooks).unwrap();
        engine.insert_gadget(b, None, text, false, Align::Fill).unwrap();
        let heights: Vec<_> = [10, 20, 40]
            .iter()
            .map(|w| engine.preferred_size(b, Orientation::Vertical, *w).unwrap().minimum)
            .collect();
        assert_eq!(heights, vec![40, 20, 10]);
    }

    #[test]
    fn main_axis_size_is_monotonic_in_cross_size() {
        let mut engine = engine();
        let b = row(&mut engine);
        for _ in 0..2 {
            let hooks = CustomHooks::new().with_measure(|_, _, orientation, for_size| {
                let grow = for_size.max(0) / 10;
                Ok(match orientation {
                    Orientation::Horizontal => Measurement::new(10 + grow, 20 + grow),
                    Orientation::Vertical => Measurement::new(10, 10),
                })
            });
            let child = engine.new_custom("item", None, None, None, hooks).unwrap();
            engine.insert_gadget(b, None, child, false, Align::Fill).unwrap();
        }
        let sizes: Vec<_> = [0, 10, 50, 100]
            .iter()
            .map(|h| engine.preferred_size(b, Orientation::Horizontal, *h).unwrap())
            .collect();
        assert!(sizes
            .windows(2)
            .all(|w| w[0].minimum <= w[1].minimum && w[0].natural <= w[1].natural));
        assert_eq!(sizes[3].minimum, 40);
    }

    #[test]
    fn children_keep_node_order() {
        let mut engine = engine();
        let b = row(&mut engine);
        let a = leaf(&mut engine, "a", 1, 1);
        let c = leaf(&mut engine, "c", 1, 1);
        let bb = leaf(&mut engine, "b", 1, 1);
        engine.insert_gadget(b, None, a, false, Align::Fill).unwrap();
        engine.insert_gadget(b, None, c, false, Align::Fill).unwrap();
        engine.insert_gadget_before(b, Some(c), bb, false, Align::Fill).unwrap();

        let names = |engine: &StyleEngine| {
            let node = engine.gadget_node(b).unwrap();
            engine
                .tree()
                .children(node)
                .map(|n| engine.declaration(n).unwrap().name().as_str().to_string())
                .collect::<Vec<_>>()
        };
        assert_eq!(names(&engine), vec!["a", "b", "c"]);
        assert_eq!(
            engine.box_children(b).unwrap().iter().map(|c| c.as_gadget()).collect::<Vec<_>>(),
            vec![Some(a), Some(bb), Some(c)]
        );

        engine.box_reverse_children(b).unwrap();
        assert_eq!(names(&engine), vec!["c", "b", "a"]);
        assert_eq!(engine.box_children(b).unwrap()[0].as_gadget(), Some(c));

        engine.remove_gadget(b, bb).unwrap();
        assert_eq!(names(&engine), vec!["c", "a"]);
        assert_eq!(engine.gadget(bb).unwrap().parent(), None);
        assert_eq!(engine.tree().parent(engine.gadget_node(bb).unwrap()), None);

        engine.insert_gadget_after(b, None, bb, true, Align::End).unwrap();
        assert_eq!(names(&engine), vec!["b", "c", "a"]);
        assert_eq!(engine.child_packing(b, bb).unwrap(), (true, Align::End));
    }

    #[test]
    fn packing_errors() {
        let mut engine = engine();
        let outer = row(&mut engine);
        let inner = row(&mut engine);
        let stray = leaf(&mut engine, "item", 1, 1);
        engine.insert_gadget(outer, None, inner, false, Align::Fill).unwrap();
        assert!(matches!(
            engine.insert_gadget(inner, None, outer, false, Align::Fill),
            Err(StyleError::InvalidArgument(_))
        ));
        assert!(matches!(
            engine.insert_gadget(outer, None, inner, false, Align::Fill),
            Err(StyleError::InvalidArgument(_))
        ));
        assert!(matches!(engine.remove_gadget(outer, stray), Err(StyleError::InvalidArgument(_))));
        assert!(matches!(
            engine.insert_gadget(stray, None, inner, false, Align::Fill),
            Err(StyleError::InvalidArgument(_))
        ));
    }

    #[test]
    fn configuration_queues_a_resize_on_change_only() {
        let mut engine = engine();
        let b = row(&mut engine);
        engine.take_owner_requests();
        engine.set_allocate_reverse(b, false).unwrap();
        assert!(engine.take_owner_requests().is_empty());
        engine.set_allocate_reverse(b, true).unwrap();
        assert_eq!(
            engine.take_owner_requests(),
            vec![(OwnerId(1), OwnerRequest::Resize), (OwnerId(1), OwnerRequest::Redraw)]
        );
        assert!(engine.box_gadget(b).unwrap().allocate_reverse());
    }

    #[test]
    fn widgets_report_their_own_packing() {
        let mut engine = engine();
        let b = row(&mut engine);
        let fixed = leaf(&mut engine, "item", 10, 10);
        let inner = leaf(&mut engine, "item", 10, 10);
        let widget = GadgetWidget::new(&engine, inner)
            .unwrap()
            .with_expand(Orientation::Horizontal, true)
            .into_ref();
        engine.insert_gadget(b, None, fixed, false, Align::Fill).unwrap();
        engine.insert_widget(b, None, widget.clone()).unwrap();
        assert!(matches!(engine.insert_widget(b, None, widget.clone()), Err(StyleError::InvalidArgument(_))));

        engine.allocate(b, Region::new(0, 0, 50, 10), None).unwrap();
        assert_eq!(allocation(&engine, inner), Region::new(10, 0, 40, 10));

        engine.remove_widget(b, &widget).unwrap();
        assert_eq!(engine.box_gadget(b).unwrap().len(), 1);
    }

    #[test]
    fn draw_order_and_focus() {
        let mut engine = StyleEngine::new(
            EngineConfig::new()
                .with_builtin_theme(false)
                .with_css("a { background-color: red; } b { background-color: blue; }"),
        )
        .unwrap();
        let b = row(&mut engine);
        let first = leaf(&mut engine, "a", 5, 5);
        let second = leaf(&mut engine, "b", 5, 5);
        engine.insert_gadget(b, None, first, false, Align::Fill).unwrap();
        engine.insert_gadget(b, None, second, false, Align::Fill).unwrap();
        engine.allocate(b, Region::new(0, 0, 10, 5), None).unwrap();

        engine.set_draw_reverse(b, true).unwrap();
        engine.set_draw_focus(b, true).unwrap();
        let mut canvas = Canvas::new();
        assert!(!engine.draw(b, &mut canvas).unwrap());
        insta::assert_snapshot!(canvas.dump().trim_end(), @r"
        push-clip 0,0 10x5
          push-clip 5,0 5x5
            background 5,0 5x5 rgb(0,0,255)
          pop-clip
          push-clip 0,0 5x5
            background 0,0 5x5 rgb(255,0,0)
          pop-clip
        pop-clip
        ");

        engine.gadget_set_state(b, StateFlags::FOCUSED).unwrap();
        assert!(engine.draw(b, &mut Canvas::new()).unwrap());
    }
}
