//! Invalidation and validation of node styles.
//!
//! Mutations call [`StyleEngine::invalidate_node`] with the inputs that
//! changed. That records the bits in `pending_changes`, marks the node's
//! style invalid together with every later sibling and descendant, and sets
//! `invalid` up the ancestor chain so the validator knows where to descend.
//! Roots with an invalid subtree are scheduled on the frame clock.
//!
//! Validation walks the tree top-down. A node's style is only computed
//! after its parent's and previous siblings' styles, and a style is only
//! recomputed when the pending bits intersect the inputs it depends on.

use std::sync::Arc;

use super::{Anchor, StyleChange, StyleEngine};
use crate::css::matcher::NodeMatcher;
use crate::error::{Result, StyleError};
use crate::node::NodeId;
use crate::style::animation::AnimationState;
use crate::style::cache::may_be_cached;
use crate::style::change::CssChange;
use crate::style::compute::{cascade, compute_style};
use crate::style::computed::ComputedStyle;

/// Same values and same visibility class.
fn same_style(a: &ComputedStyle, b: &ComputedStyle) -> bool {
    a.is_sentinel() == b.is_sentinel() && a.values_equal(b)
}

impl StyleEngine {
    // -----------------------------------------------------------------------
    // Invalidation
    // -----------------------------------------------------------------------

    pub(crate) fn invalidate_node(&mut self, node: NodeId, change: CssChange) {
        let Some(entry) = self.tree.get_mut(node) else {
            return;
        };
        let mut change = change;
        if !entry.invalid {
            change.remove(CssChange::TIMESTAMP);
        }
        if change.is_empty() {
            return;
        }
        entry.pending_changes |= change;
        if let Some(parent) = entry.parent.and_then(|p| self.tree.get_mut(p)) {
            parent.needs_propagation = true;
        }
        self.invalidate_style(node);
    }

    /// Mark the style of `node`, its descendants and its later siblings
    /// invalid.
    pub(crate) fn invalidate_style(&mut self, node: NodeId) {
        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            let Some(entry) = self.tree.get_mut(id) else {
                continue;
            };
            if entry.style_is_invalid {
                continue;
            }
            entry.style_is_invalid = true;
            stack.extend(entry.next_sibling);
            stack.extend(entry.first_child);
            self.set_invalid(id, true);
        }
    }

    /// Set the `invalid` flag. A visible node that becomes invalid makes its
    /// parent invalid; a visible root is (un)scheduled on the clock.
    fn set_invalid(&mut self, node: NodeId, invalid: bool) {
        let mut current = node;
        loop {
            let Some(entry) = self.tree.get_mut(current) else {
                return;
            };
            if entry.invalid == invalid {
                return;
            }
            entry.invalid = invalid;
            if !entry.visible {
                return;
            }
            match entry.parent {
                Some(parent) if invalid => current = parent,
                Some(_) => return,
                None if invalid => {
                    self.clock.schedule(current);
                    return;
                }
                None => {
                    self.clock.unschedule(current);
                    return;
                }
            }
        }
    }

    // -----------------------------------------------------------------------
    // Tree edits
    // -----------------------------------------------------------------------

    /// Move `node` under `new_parent` (or make it a root), invalidating every
    /// node whose structural position changes.
    pub(super) fn reposition(&mut self, node: NodeId, new_parent: Option<NodeId>, anchor: Anchor) {
        let old_parent = self.tree.parent(node);
        let visible = self.tree.is_visible(node);

        if visible {
            let previous = self.tree.previous_sibling(node);
            match self.tree.next_sibling(node) {
                Some(next) => {
                    let mut change = CssChange::ANY_SIBLING | CssChange::NTH_CHILD;
                    if previous.is_none() {
                        change |= CssChange::FIRST_CHILD;
                    }
                    self.invalidate_node(next, change);
                }
                None => {
                    if let Some(previous) = previous {
                        self.invalidate_node(previous, CssChange::LAST_CHILD);
                    }
                }
            }
        }

        self.tree.unlink(node);
        if visible {
            if let Some(first) = old_parent.and_then(|p| self.tree.first_child(p)) {
                self.invalidate_node(first, CssChange::NTH_LAST_CHILD);
            }
        }

        if let Some(parent) = new_parent {
            let previous = match anchor {
                Anchor::After(previous) => previous,
                Anchor::Before(Some(sibling)) => self.tree.previous_sibling(sibling),
                Anchor::Before(None) => self.tree.last_child(parent),
            };
            self.tree.link(node, parent, previous);
        }

        if old_parent != new_parent {
            if old_parent.is_none() {
                self.clock.unschedule(node);
            }
            let invalid = self.tree.get(node).is_some_and(|n| n.invalid);
            if invalid && visible {
                match new_parent {
                    Some(parent) => self.set_invalid(parent, true),
                    None => self.clock.schedule(node),
                }
            }
            self.invalidate_node(
                node,
                CssChange::SOURCE | CssChange::TIMESTAMP | CssChange::ANIMATIONS,
            );
        }

        if let Some(parent) = new_parent {
            if visible {
                if let Some(first) = self.tree.first_child(parent) {
                    self.invalidate_node(first, CssChange::NTH_LAST_CHILD);
                }
            }
        }

        let previous = self.tree.previous_sibling(node);
        let next = self.tree.next_sibling(node);
        if visible {
            match (previous, next) {
                (None, Some(next)) => self.invalidate_node(
                    next,
                    CssChange::ANY_SIBLING | CssChange::NTH_CHILD | CssChange::FIRST_CHILD,
                ),
                (Some(_), Some(next)) => self.invalidate_style(next),
                (Some(previous), None) => self.invalidate_node(previous, CssChange::LAST_CHILD),
                (None, None) => {}
            }
        } else if let Some(next) = next {
            self.invalidate_style(next);
        }

        let mut change = CssChange::ANY_PARENT | CssChange::ANY_SIBLING | CssChange::NTH_CHILD;
        if previous.is_none() {
            change |= CssChange::FIRST_CHILD;
        }
        if next.is_none() {
            change |= CssChange::LAST_CHILD;
        }
        self.invalidate_node(node, change);
    }

    /// Show or hide a node. Invisible nodes get the empty sentinel style
    /// and do not count for structural positions.
    pub fn set_visible(&mut self, node: NodeId, visible: bool) -> Result<()> {
        let entry = self
            .tree
            .get_mut(node)
            .ok_or_else(|| StyleError::InvalidTree(format!("stale node {node:?}")))?;
        if entry.visible == visible {
            return Ok(());
        }
        entry.visible = visible;
        let invalid = entry.invalid;
        let parent = entry.parent;

        self.invalidate_node(node, CssChange::VISIBILITY);
        // Geometry changes even when no style value differs.
        let gadget = self
            .tree
            .ancestors(node)
            .into_iter()
            .find_map(|id| self.node_gadgets.get(id).copied());
        if let Some(gadget) = gadget {
            self.queue_resize(gadget);
        }
        if visible && invalid {
            match parent {
                Some(parent) => self.set_invalid(parent, true),
                None => self.clock.schedule(node),
            }
        }

        let next = self.tree.next_sibling(node);
        if let Some(next) = next {
            self.invalidate_node(next, CssChange::ANY_SIBLING | CssChange::NTH_CHILD);
        }
        if let Some(first) = parent.and_then(|p| self.tree.first_child(p)) {
            self.invalidate_node(first, CssChange::NTH_LAST_CHILD);
        }
        if self.tree.previous_visible_sibling(node).is_none() {
            let mut current = next;
            while let Some(id) = current {
                self.invalidate_node(id, CssChange::FIRST_CHILD);
                if self.tree.is_visible(id) {
                    break;
                }
                current = self.tree.next_sibling(id);
            }
        }
        if self.tree.next_visible_sibling(node).is_none() {
            let mut current = self.tree.previous_sibling(node);
            while let Some(id) = current {
                self.invalidate_node(id, CssChange::LAST_CHILD);
                if self.tree.is_visible(id) {
                    break;
                }
                current = self.tree.previous_sibling(id);
            }
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    /// Validate `node` and its visible descendants, parents before children
    /// and previous siblings before next ones.
    pub(super) fn validate_node(&mut self, node: NodeId) {
        if !self.tree.get(node).is_some_and(|n| n.invalid) {
            return;
        }
        self.ensure_style(node);

        // Dropping and re-setting the flag re-bubbles to the root, which
        // reschedules nodes that must be looked at again next frame.
        self.set_invalid(node, false);
        let again = self.animations.contains_key(node)
            || self.tree.get(node).is_some_and(|n| n.style_is_invalid);
        if again {
            self.set_invalid(node, true);
        }

        let mut child = self.tree.first_child(node);
        while let Some(id) = child {
            let saved_next = self.tree.next_sibling(id);
            if self.tree.is_visible(id) {
                self.validate_node(id);
            }
            child = if self.tree.parent(id) == Some(node) {
                self.tree.next_sibling(id)
            } else {
                saved_next
            };
        }
    }

    /// Bring the style of `node` up to date: the parent first, then every
    /// stale previous sibling, then the node itself.
    pub(super) fn ensure_style(&mut self, node: NodeId) {
        let Some(entry) = self.tree.get(node) else {
            return;
        };
        if !entry.invalid {
            return;
        }
        if let Some(parent) = entry.parent {
            self.ensure_style(parent);
        }

        if self.tree.get(node).is_some_and(|n| n.style_is_invalid) {
            let mut stale = Vec::new();
            let mut current = self.tree.previous_sibling(node);
            while let Some(sibling) = current {
                if !self.tree.get(sibling).is_some_and(|n| n.style_is_invalid) {
                    break;
                }
                stale.push(sibling);
                current = self.tree.previous_sibling(sibling);
            }
            for sibling in stale.into_iter().rev() {
                self.ensure_own_style(sibling);
            }
        }
        self.ensure_own_style(node);
    }

    fn ensure_own_style(&mut self, node: NodeId) {
        let Some(entry) = self.tree.get_mut(node) else {
            return;
        };
        let pending = std::mem::take(&mut entry.pending_changes);
        let style_was_invalid = std::mem::replace(&mut entry.style_is_invalid, false);

        let mut replaced = false;
        let mut notification = None;
        if style_was_invalid {
            entry.child_cache.clear();
            log::trace!("updating style of {node:?} for {pending:?}");
            (replaced, notification) = self.update_style(node, pending);
        }
        self.propagate_pending(node, pending, replaced);
        if let Some(change) = notification {
            self.emit_style_changed(&change);
        }
    }

    /// Hand `pending` down to the children, and each child's own pending
    /// changes on to its later siblings.
    fn propagate_pending(&mut self, node: NodeId, pending: CssChange, replaced: bool) {
        let mut change = pending.for_child();
        if replaced {
            change |= CssChange::PARENT_STYLE;
        }
        let needs_propagation = self.tree.get(node).is_some_and(|n| n.needs_propagation);
        if !needs_propagation && change.is_empty() {
            return;
        }

        let mut child = self.tree.first_child(node);
        while let Some(id) = child {
            let prior = self
                .tree
                .get(id)
                .map_or(CssChange::empty(), |n| n.pending_changes);
            self.invalidate_node(id, change);
            if self.tree.is_visible(id) {
                change |= prior.for_sibling();
            }
            child = self.tree.next_sibling(id);
        }

        if let Some(entry) = self.tree.get_mut(node) {
            entry.needs_propagation = false;
        }
    }

    /// Recompute the static style if `pending` touches its inputs, update
    /// transitions and install what the node shows at the current frame.
    fn update_style(&mut self, node: NodeId, pending: CssChange) -> (bool, Option<StyleChange>) {
        let now = self.clock.frame_time();
        let Some(old) = self.tree.get(node).map(|n| Arc::clone(n.style())) else {
            return (false, None);
        };
        let old_base = self
            .animations
            .get(node)
            .map_or_else(|| Arc::clone(&old), |anim| Arc::clone(anim.base()));

        let recreate = pending.intersects(CssChange::RADICAL) || pending.intersects(old_base.change());
        let new_base = if recreate {
            self.create_style(node)
        } else {
            Arc::clone(&old_base)
        };

        if recreate && !same_style(&new_base, &old_base) {
            let skip = pending.contains(CssChange::ANIMATIONS) || old.is_sentinel() || new_base.is_sentinel();
            let started = if skip {
                None
            } else {
                AnimationState::start(&old, Arc::clone(&new_base), now)
            };
            match started {
                Some(anim) => {
                    self.animations.insert(node, anim);
                }
                None => {
                    self.animations.remove(node);
                }
            }
        } else if let Some(anim) = self.animations.get_mut(node) {
            anim.rebase(Arc::clone(&new_base));
        }

        let displayed = match self.animations.get(node) {
            Some(anim) if anim.is_finished(now) => {
                let base = Arc::clone(anim.base());
                self.animations.remove(node);
                base
            }
            Some(anim) => Arc::new(anim.apply(now)),
            None => new_base,
        };
        self.set_style(node, displayed)
    }

    /// Install `new`. Returns whether the style was replaced (children must
    /// see a new parent style) and the change to notify when values differ.
    fn set_style(&mut self, node: NodeId, new: Arc<ComputedStyle>) -> (bool, Option<StyleChange>) {
        let Some(entry) = self.tree.get_mut(node) else {
            return (false, None);
        };
        if Arc::ptr_eq(&entry.style, &new) {
            return (false, None);
        }
        let old = Arc::clone(&entry.style);
        let values_differ = !old.values_equal(&new);
        let replaced = values_differ || old.is_sentinel() != new.is_sentinel();
        // Equal values with different dependency bits still swap, so later
        // invalidations test against what the cascade actually consulted.
        if replaced || old.is_animated() != new.is_animated() || old.change() != new.change() {
            entry.style = Arc::clone(&new);
        }
        if !values_differ {
            return (replaced, None);
        }
        let changes = old.diff(&new);
        log::trace!(
            "{node:?} changed {changes:?}: {:?}",
            old.differing_properties(&new)
        );
        (replaced, Some(StyleChange { node, changes, old, new }))
    }

    /// Run the cascade for `node`, or reuse a style its parent handed to an
    /// equivalent sibling.
    fn create_style(&mut self, node: NodeId) -> Arc<ComputedStyle> {
        let Some(entry) = self.tree.get(node) else {
            return ComputedStyle::sentinel();
        };
        let parent = entry.parent;
        let parent_style = parent
            .and_then(|p| self.tree.get(p))
            .map(|p| Arc::clone(p.style()));
        if !entry.visible || parent_style.as_ref().is_some_and(|s| s.is_sentinel()) {
            return ComputedStyle::sentinel();
        }

        let is_first = self.tree.is_first_child(node);
        let is_last = self.tree.is_last_child(node);
        let cache_parent = parent.filter(|_| self.config.parent_cache);
        let declaration = entry.declaration.clone();
        if let Some(parent) = cache_parent.and_then(|p| self.tree.get(p)) {
            if let Some(hit) = parent.child_cache.lookup(&declaration, is_first, is_last) {
                log::trace!("cache hit for {node:?}");
                self.stats.cache_hits += 1;
                return hit;
            }
        }

        let matcher = NodeMatcher::new(&self.tree, node);
        let mut matched = Vec::new();
        let mut change = CssChange::empty();
        for provider in self.providers.values() {
            let start = matched.len();
            change |= provider.provider.lookup(&matcher, &mut matched);
            for declaration in &mut matched[start..] {
                declaration.specificity = declaration
                    .specificity
                    .in_provider(provider.priority, provider.order);
            }
        }
        let winners = cascade(&mut matched);
        let style = Arc::new(compute_style(
            &winners,
            parent_style.as_deref(),
            &self.defaults,
            change,
        ));
        self.stats.styles_computed += 1;

        if may_be_cached(&style) {
            if let Some(parent) = cache_parent.and_then(|p| self.tree.get_mut(p)) {
                parent
                    .child_cache
                    .insert(&declaration, is_first, is_last, Arc::clone(&style));
            }
        }
        style
    }
}
