//! The style engine: node tree, providers, listeners and gadgets in one
//! context object.
//!
//! [`StyleEngine`] is what widget code talks to. It owns the [`StyleTree`],
//! the installed [`StyleProvider`]s, the [`FrameClock`] and every gadget.
//! Mutations only record what changed; styles are recomputed lazily, either
//! by [`StyleEngine::tick`] or by the first [`StyleEngine::computed_style`]
//! read of an invalid node.

pub mod clock;
mod invalidate;

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::fmt::Write as _;
use std::sync::Arc;

use slotmap::{new_key_type, SecondaryMap, SlotMap};

use crate::config::EngineConfig;
use crate::css::provider::{CssProvider, StyleProvider, PRIORITY_APPLICATION, PRIORITY_THEME};
use crate::error::{Result, StyleError};
use crate::gadget::{Gadget, GadgetId, OwnerId, OwnerRequest};
use crate::intern::Atom;
use crate::node::declaration::NodeDeclaration;
use crate::node::state::{JunctionSides, RegionFlags, StateFlags};
use crate::node::tree::StyleTree;
use crate::node::NodeId;
use crate::style::animation::AnimationState;
use crate::style::change::{ChangeSet, CssChange};
use crate::style::compute::StyleDefaults;
use crate::style::computed::ComputedStyle;
use crate::style::property::PropertyId;
use crate::style::value::StyleValue;

pub use clock::{FrameClock, FrameStats, Notification, Notifier};

new_key_type! {
    /// Handle to an installed style provider.
    pub struct ProviderId;
    /// Handle to a style listener.
    pub struct ListenerId;
}

/// A style replacement delivered to listeners and gadgets.
#[derive(Debug, Clone)]
pub struct StyleChange {
    pub node: NodeId,
    /// What differs between `old` and `new`.
    pub changes: ChangeSet,
    pub old: Arc<ComputedStyle>,
    pub new: Arc<ComputedStyle>,
}

impl StyleChange {
    pub fn affects(&self, bits: ChangeSet) -> bool {
        self.changes.intersects(bits)
    }
}

/// Callback invoked synchronously during validation when a node's style
/// values change.
pub type StyleListener = Box<dyn FnMut(&mut StyleEngine, &StyleChange)>;

/// Validation state of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeState {
    /// Style and subtree are up to date.
    Clean,
    /// The node's own style must be recomputed.
    SelfDirty,
    /// Only descendants need work.
    SubtreeDirty,
    /// The node is dirty and its root waits for the next frame.
    ScheduledForValidation,
}

struct ProviderEntry {
    provider: Arc<dyn StyleProvider>,
    priority: u32,
    order: u16,
}

struct ListenerEntry {
    node: NodeId,
    callback: Option<StyleListener>,
}

/// Where a repositioned node lands among its new siblings.
#[derive(Debug, Clone, Copy)]
enum Anchor {
    /// After the given sibling, or first when `None`.
    After(Option<NodeId>),
    /// Before the given sibling, or last when `None`.
    Before(Option<NodeId>),
}

pub struct StyleEngine {
    pub(crate) config: EngineConfig,
    defaults: StyleDefaults,
    pub(crate) tree: StyleTree,
    providers: SlotMap<ProviderId, ProviderEntry>,
    next_provider_order: u16,
    pub(crate) clock: FrameClock,
    animations: SecondaryMap<NodeId, AnimationState>,
    listeners: SlotMap<ListenerId, ListenerEntry>,
    pub(crate) gadgets: SlotMap<GadgetId, Gadget>,
    pub(crate) node_gadgets: SecondaryMap<NodeId, GadgetId>,
    pub(crate) owner_properties: HashMap<(OwnerId, String), i32>,
    pub(crate) owner_requests: Vec<(OwnerId, OwnerRequest)>,
    pub(crate) warned_icons: HashSet<String>,
    pub(crate) stats: FrameStats,
}

impl fmt::Debug for StyleEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StyleEngine")
            .field("nodes", &self.tree.len())
            .field("providers", &self.providers.len())
            .field("listeners", &self.listeners.len())
            .field("gadgets", &self.gadgets.len())
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}

impl Default for StyleEngine {
    fn default() -> Self {
        Self::build(EngineConfig::default())
    }
}

impl StyleEngine {
    /// Create an engine, installing the builtin theme and the configured
    /// application stylesheet.
    pub fn new(config: EngineConfig) -> Result<Self> {
        let css = config.css.clone();
        let mut engine = Self::build(config);
        if let Some(css) = css {
            let provider = CssProvider::from_css(&css)?;
            engine.add_provider(Arc::new(provider), PRIORITY_APPLICATION);
        }
        Ok(engine)
    }

    fn build(config: EngineConfig) -> Self {
        let mut engine = Self {
            defaults: config.style_defaults(),
            clock: FrameClock::new(config.frame_interval_us()),
            config,
            tree: StyleTree::new(),
            providers: SlotMap::with_key(),
            next_provider_order: 0,
            animations: SecondaryMap::new(),
            listeners: SlotMap::with_key(),
            gadgets: SlotMap::with_key(),
            node_gadgets: SecondaryMap::new(),
            owner_properties: HashMap::new(),
            owner_requests: Vec::new(),
            warned_icons: HashSet::new(),
            stats: FrameStats::default(),
        };
        if engine.config.builtin_theme {
            engine.add_provider(Arc::new(CssProvider::builtin_theme()), PRIORITY_THEME);
        }
        engine
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Read access to the node arena.
    pub fn tree(&self) -> &StyleTree {
        &self.tree
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    /// A handle other threads use to post [`Notification`]s.
    pub fn notifier(&self) -> Notifier {
        self.clock.notifier()
    }

    /// Counters accumulated since the last tick.
    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    pub(crate) fn check_node(&self, node: NodeId) -> Result<()> {
        if self.tree.contains(node) {
            Ok(())
        } else {
            Err(StyleError::InvalidTree(format!("stale node {node:?}")))
        }
    }

    // -----------------------------------------------------------------------
    // Providers
    // -----------------------------------------------------------------------

    /// Install a provider. Later providers win ties at equal priority.
    pub fn add_provider(&mut self, provider: Arc<dyn StyleProvider>, priority: u32) -> ProviderId {
        let order = self.next_provider_order;
        self.next_provider_order = self.next_provider_order.saturating_add(1);
        let id = self.providers.insert(ProviderEntry {
            provider,
            priority,
            order,
        });
        log::debug!("added provider {id:?} at priority {priority}");
        self.invalidate_all(CssChange::SOURCE);
        id
    }

    /// Uninstall a provider. Returns `false` if it was not installed.
    pub fn remove_provider(&mut self, id: ProviderId) -> bool {
        if self.providers.remove(id).is_none() {
            return false;
        }
        log::debug!("removed provider {id:?}");
        self.invalidate_all(CssChange::SOURCE);
        true
    }

    /// Swap the rules of an installed provider, keeping its priority and
    /// cascade order.
    pub fn replace_provider(&mut self, id: ProviderId, provider: Arc<dyn StyleProvider>) -> Result<()> {
        let entry = self
            .providers
            .get_mut(id)
            .ok_or_else(|| StyleError::InvalidArgument(format!("unknown provider {id:?}")))?;
        entry.provider = provider;
        log::debug!("replaced provider {id:?}");
        self.invalidate_all(CssChange::SOURCE);
        Ok(())
    }

    pub fn provider_count(&self) -> usize {
        self.providers.len()
    }

    /// Every root and every node below it gets `change`.
    pub(crate) fn invalidate_all(&mut self, change: CssChange) {
        let roots: Vec<NodeId> = self.tree.roots().collect();
        for root in roots {
            for node in self.tree.walk_depth_first(root) {
                self.invalidate_node(node, change);
            }
        }
    }

    // -----------------------------------------------------------------------
    // Node lifecycle and tree shape
    // -----------------------------------------------------------------------

    /// Create a detached node. It is a root until attached and is styled as
    /// one.
    pub fn create_node(&mut self, name: &str) -> NodeId {
        let node = self.tree.insert(NodeDeclaration::new(Atom::new(name)));
        self.invalidate_node(node, CssChange::SOURCE);
        node
    }

    /// Detach `node` and free it with its subtree. Pending style work of the
    /// freed nodes is dropped.
    ///
    /// Fails while a gadget still uses a node of the subtree.
    pub fn destroy_node(&mut self, node: NodeId) -> Result<()> {
        self.check_node(node)?;
        let subtree = self.tree.walk_depth_first(node);
        if let Some(used) = subtree.iter().find(|id| self.node_gadgets.contains_key(**id)) {
            return Err(StyleError::InvalidTree(format!(
                "node {used:?} is still used by a gadget"
            )));
        }
        if self.tree.parent(node).is_some() {
            self.reposition(node, None, Anchor::Before(None));
        }
        for id in &subtree {
            if self.tree.get(*id).is_some_and(|n| n.is_invalid()) {
                log::trace!("dropping pending style work of {id:?}");
            }
            self.clock.unschedule(*id);
            self.animations.remove(*id);
        }
        let freed: HashSet<NodeId> = self.tree.remove_subtree(node).into_iter().collect();
        self.listeners.retain(|_, entry| !freed.contains(&entry.node));
        Ok(())
    }

    /// Make `node` the last child of `parent`, or a root when `parent` is
    /// `None`.
    pub fn set_parent(&mut self, node: NodeId, parent: Option<NodeId>) -> Result<()> {
        self.check_node(node)?;
        if let Some(parent) = parent {
            self.check_move(node, parent)?;
        }
        if self.tree.parent(node) == parent {
            return Ok(());
        }
        self.reposition(node, parent, Anchor::Before(None));
        Ok(())
    }

    /// Attach `node` under `parent` right before `sibling`, or last.
    pub fn insert_before(&mut self, parent: NodeId, node: NodeId, sibling: Option<NodeId>) -> Result<()> {
        self.check_move(node, parent)?;
        if let Some(sibling) = sibling {
            self.check_sibling(parent, node, sibling)?;
        }
        self.reposition(node, Some(parent), Anchor::Before(sibling));
        Ok(())
    }

    /// Attach `node` under `parent` right after `sibling`, or first.
    pub fn insert_after(&mut self, parent: NodeId, node: NodeId, sibling: Option<NodeId>) -> Result<()> {
        self.check_move(node, parent)?;
        if let Some(sibling) = sibling {
            self.check_sibling(parent, node, sibling)?;
        }
        self.reposition(node, Some(parent), Anchor::After(sibling));
        Ok(())
    }

    /// Reverse the order of `node`'s children.
    pub fn reverse_children(&mut self, node: NodeId) -> Result<()> {
        self.check_node(node)?;
        let Some(end) = self.tree.last_child(node) else {
            return Ok(());
        };
        while let Some(first) = self.tree.first_child(node) {
            if first == end {
                break;
            }
            self.reposition(first, Some(node), Anchor::After(Some(end)));
        }
        Ok(())
    }

    fn check_move(&self, node: NodeId, parent: NodeId) -> Result<()> {
        self.check_node(node)?;
        self.check_node(parent)?;
        if self.tree.is_ancestor_or_self(node, parent) {
            return Err(StyleError::InvalidTree(format!(
                "cannot attach {node:?} below itself"
            )));
        }
        Ok(())
    }

    fn check_sibling(&self, parent: NodeId, node: NodeId, sibling: NodeId) -> Result<()> {
        if sibling == node {
            return Err(StyleError::InvalidTree(format!(
                "{node:?} cannot be positioned relative to itself"
            )));
        }
        if self.tree.parent(sibling) != Some(parent) {
            return Err(StyleError::InvalidTree(format!(
                "{sibling:?} is not a child of {parent:?}"
            )));
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Declaration setters
    // -----------------------------------------------------------------------

    pub fn declaration(&self, node: NodeId) -> Option<&NodeDeclaration> {
        self.tree.get(node).map(|n| n.declaration())
    }

    pub fn state(&self, node: NodeId) -> StateFlags {
        self.declaration(node)
            .map_or(StateFlags::empty(), NodeDeclaration::state)
    }

    /// Apply `update` to the declaration and invalidate with `change` when
    /// it reports a difference.
    fn update_declaration(
        &mut self,
        node: NodeId,
        change: CssChange,
        update: impl FnOnce(&mut NodeDeclaration) -> bool,
    ) -> Result<bool> {
        let entry = self
            .tree
            .get_mut(node)
            .ok_or_else(|| StyleError::InvalidTree(format!("stale node {node:?}")))?;
        let changed = update(&mut entry.declaration);
        if changed {
            self.invalidate_node(node, change);
        }
        Ok(changed)
    }

    pub fn set_name(&mut self, node: NodeId, name: &str) -> Result<()> {
        self.update_declaration(node, CssChange::NAME, |d| d.set_name(Atom::new(name)))?;
        Ok(())
    }

    pub fn set_id(&mut self, node: NodeId, id: Option<&str>) -> Result<()> {
        self.update_declaration(node, CssChange::ID, |d| d.set_id(id.map(Atom::new)))?;
        Ok(())
    }

    /// Replace the state flags. Inherited flags (direction, backdrop,
    /// insensitivity) that change are mirrored onto every descendant.
    pub fn set_state(&mut self, node: NodeId, state: StateFlags) -> Result<()> {
        let old = self.state(node);
        if !self.update_declaration(node, CssChange::STATE, |d| d.set_state(state))? {
            return Ok(());
        }
        let inherited = (old ^ state) & StateFlags::INHERITED;
        if inherited.is_empty() {
            return Ok(());
        }
        for descendant in self.tree.walk_depth_first(node).into_iter().skip(1) {
            self.update_declaration(descendant, CssChange::STATE, |d| {
                let mirrored = (d.state() - inherited) | (state & inherited);
                d.set_state(mirrored)
            })?;
        }
        Ok(())
    }

    pub fn set_junction_sides(&mut self, node: NodeId, sides: JunctionSides) -> Result<()> {
        self.update_declaration(node, CssChange::FIRST_CHILD | CssChange::LAST_CHILD, |d| {
            d.set_junction_sides(sides)
        })?;
        Ok(())
    }

    pub fn set_widget_type(&mut self, node: NodeId, widget_type: Option<&str>) -> Result<()> {
        self.update_declaration(node, CssChange::NAME, |d| {
            d.set_widget_type(widget_type.map(Atom::new))
        })?;
        Ok(())
    }

    pub fn add_class(&mut self, node: NodeId, class: &str) -> Result<()> {
        self.update_declaration(node, CssChange::CLASS, |d| d.add_class(Atom::new(class)))?;
        Ok(())
    }

    pub fn remove_class(&mut self, node: NodeId, class: &str) -> Result<()> {
        let Some(class) = Atom::try_get(class) else {
            return self.check_node(node);
        };
        self.update_declaration(node, CssChange::CLASS, |d| d.remove_class(&class))?;
        Ok(())
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        Atom::try_get(class).is_some_and(|class| {
            self.declaration(node)
                .is_some_and(|d| d.has_class(&class))
        })
    }

    pub fn add_region(&mut self, node: NodeId, region: &str, flags: RegionFlags) -> Result<()> {
        self.update_declaration(node, CssChange::CLASS, |d| d.add_region(Atom::new(region), flags))?;
        Ok(())
    }

    pub fn remove_region(&mut self, node: NodeId, region: &str) -> Result<()> {
        let Some(region) = Atom::try_get(region) else {
            return self.check_node(node);
        };
        self.update_declaration(node, CssChange::CLASS, |d| d.remove_region(&region))?;
        Ok(())
    }

    pub fn has_region(&self, node: NodeId, region: &str) -> Option<RegionFlags> {
        let region = Atom::try_get(region)?;
        self.declaration(node)?.has_region(&region)
    }

    // -----------------------------------------------------------------------
    // Style read-out
    // -----------------------------------------------------------------------

    /// The current style of `node`, validating its ancestors and previous
    /// siblings first when they are stale.
    pub fn computed_style(&mut self, node: NodeId) -> Result<Arc<ComputedStyle>> {
        self.check_node(node)?;
        self.ensure_style(node);
        self.tree
            .get(node)
            .map(|n| Arc::clone(n.style()))
            .ok_or_else(|| StyleError::InvalidTree(format!("node {node:?} destroyed by a listener")))
    }

    pub fn value(&mut self, node: NodeId, property: PropertyId) -> Result<StyleValue> {
        Ok(self.computed_style(node)?.get(property).clone())
    }

    /// Like [`value`](Self::value), with the property given by its CSS name.
    pub fn value_by_name(&mut self, node: NodeId, name: &str) -> Result<StyleValue> {
        let property = PropertyId::from_name(name)
            .ok_or_else(|| StyleError::InvalidArgument(format!("unknown property '{name}'")))?;
        self.value(node, property)
    }

    /// Record that `change` happened to `node`.
    pub fn invalidate(&mut self, node: NodeId, change: CssChange) -> Result<()> {
        self.check_node(node)?;
        self.invalidate_node(node, change);
        Ok(())
    }

    /// Whether `node`'s own style is current.
    pub fn is_style_valid(&self, node: NodeId) -> bool {
        self.tree.get(node).is_some_and(|n| !n.is_style_invalid())
    }

    pub fn node_state(&self, node: NodeId) -> Option<NodeState> {
        let entry = self.tree.get(node)?;
        if !entry.is_invalid() {
            return Some(NodeState::Clean);
        }
        if self.is_scheduled_for_validation(node) {
            return Some(NodeState::ScheduledForValidation);
        }
        Some(if entry.is_style_invalid() {
            NodeState::SelfDirty
        } else {
            NodeState::SubtreeDirty
        })
    }

    /// Every node from `node` up is invalid, visible below the root, and the
    /// root is scheduled.
    fn is_scheduled_for_validation(&self, node: NodeId) -> bool {
        let chain = self.tree.ancestors(node);
        let Some((&root, below_root)) = chain.split_last() else {
            return false;
        };
        below_root
            .iter()
            .all(|id| self.tree.get(*id).is_some_and(|n| n.is_invalid() && n.is_visible()))
            && self.tree.get(root).is_some_and(|n| n.is_invalid())
            && self.clock.is_scheduled(root)
    }

    /// Running transitions of `node`, if any.
    pub fn animation(&self, node: NodeId) -> Option<&AnimationState> {
        self.animations.get(node)
    }

    // -----------------------------------------------------------------------
    // Listeners
    // -----------------------------------------------------------------------

    /// Call `listener` whenever the computed values of `node` change.
    pub fn connect_style_changed(
        &mut self,
        node: NodeId,
        listener: impl FnMut(&mut StyleEngine, &StyleChange) + 'static,
    ) -> Result<ListenerId> {
        self.check_node(node)?;
        Ok(self.listeners.insert(ListenerEntry {
            node,
            callback: Some(Box::new(listener)),
        }))
    }

    pub fn disconnect(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id).is_some()
    }

    /// Deliver `change` to the node's gadget, then to its listeners.
    ///
    /// Callbacks are taken out of their slot while they run so they can
    /// mutate the engine; a callback that disconnects itself stays gone.
    pub(crate) fn emit_style_changed(&mut self, change: &StyleChange) {
        if let Some(gadget) = self.node_gadgets.get(change.node).copied() {
            self.stats.listeners_notified += 1;
            self.gadget_style_changed(gadget, change);
        }
        let ids: Vec<ListenerId> = self
            .listeners
            .iter()
            .filter(|(_, entry)| entry.node == change.node)
            .map(|(id, _)| id)
            .collect();
        for id in ids {
            let Some(mut callback) = self.listeners.get_mut(id).and_then(|e| e.callback.take()) else {
                continue;
            };
            self.stats.listeners_notified += 1;
            callback(self, change);
            if let Some(entry) = self.listeners.get_mut(id) {
                entry.callback = Some(callback);
            }
        }
    }

    // -----------------------------------------------------------------------
    // Frames
    // -----------------------------------------------------------------------

    /// Run one frame at `frame_time_us`: apply notifications, advance
    /// transitions and validate every scheduled root.
    pub fn tick(&mut self, frame_time_us: i64) -> FrameStats {
        self.stats = FrameStats::default();
        self.clock.advance(frame_time_us);

        for notification in self.clock.drain_notifications() {
            log::debug!("applying {notification:?}");
            match notification {
                Notification::FontsChanged => self.fonts_changed(),
                Notification::ThemeChanged => self.invalidate_all(CssChange::SOURCE),
            }
        }

        let animated: Vec<NodeId> = self.animations.keys().collect();
        for node in animated {
            self.invalidate_node(node, CssChange::TIMESTAMP);
        }

        self.validate();
        self.stats.frame = self.clock.frame_counter();
        self.stats
    }

    /// Validate every scheduled root without advancing the clock.
    pub fn validate(&mut self) {
        for root in self.clock.take_scheduled() {
            if self.tree.contains(root) {
                self.validate_node(root);
            }
        }
    }

    // -----------------------------------------------------------------------
    // Debugging
    // -----------------------------------------------------------------------

    /// Render the subtree of `root` as indented text, one node per line.
    pub fn dump(&self, root: NodeId) -> Result<String> {
        self.check_node(root)?;
        let mut out = String::new();
        self.dump_node(root, 0, &mut out);
        Ok(out)
    }

    fn dump_node(&self, node: NodeId, depth: usize, out: &mut String) {
        let Some(entry) = self.tree.get(node) else {
            return;
        };
        let decl = entry.declaration();
        let _ = write!(out, "{:indent$}{}", "", decl.name(), indent = depth * 2);
        if let Some(id) = decl.id() {
            let _ = write!(out, "#{id}");
        }
        for class in decl.classes() {
            let _ = write!(out, ".{class}");
        }
        for state in decl.state().pseudo_class_names() {
            let _ = write!(out, ":{state}");
        }
        if !entry.is_visible() {
            out.push_str(" [invisible]");
        }
        out.push('\n');
        for child in self.tree.children(node) {
            self.dump_node(child, depth + 1, out);
        }
    }
}
