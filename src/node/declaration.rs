//! The selector-visible inputs of a style node.

use crate::intern::Atom;
use crate::node::state::{JunctionSides, RegionFlags, StateFlags};

/// Everything about a node that selectors can test, except its position.
///
/// Two siblings with equal declarations (and equal first/last status) get the
/// same style, which is what the per-parent cache keys on. Classes and regions
/// are kept sorted so equal sets compare and hash equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeDeclaration {
    name: Atom,
    id: Option<Atom>,
    state: StateFlags,
    classes: Vec<Atom>,
    regions: Vec<(Atom, RegionFlags)>,
    junction_sides: JunctionSides,
    widget_type: Option<Atom>,
}

impl NodeDeclaration {
    pub fn new(name: Atom) -> Self {
        Self {
            name,
            id: None,
            state: StateFlags::empty(),
            classes: Vec::new(),
            regions: Vec::new(),
            junction_sides: JunctionSides::empty(),
            widget_type: None,
        }
    }

    pub fn name(&self) -> &Atom {
        &self.name
    }

    /// Returns whether the name changed.
    pub fn set_name(&mut self, name: Atom) -> bool {
        if self.name == name {
            return false;
        }
        self.name = name;
        true
    }

    pub fn id(&self) -> Option<&Atom> {
        self.id.as_ref()
    }

    pub fn set_id(&mut self, id: Option<Atom>) -> bool {
        if self.id == id {
            return false;
        }
        self.id = id;
        true
    }

    pub fn state(&self) -> StateFlags {
        self.state
    }

    pub fn set_state(&mut self, state: StateFlags) -> bool {
        if self.state == state {
            return false;
        }
        self.state = state;
        true
    }

    pub fn junction_sides(&self) -> JunctionSides {
        self.junction_sides
    }

    pub fn set_junction_sides(&mut self, sides: JunctionSides) -> bool {
        if self.junction_sides == sides {
            return false;
        }
        self.junction_sides = sides;
        true
    }

    pub fn widget_type(&self) -> Option<&Atom> {
        self.widget_type.as_ref()
    }

    pub fn set_widget_type(&mut self, widget_type: Option<Atom>) -> bool {
        if self.widget_type == widget_type {
            return false;
        }
        self.widget_type = widget_type;
        true
    }

    // ── Classes ──────────────────────────────────────────────────────

    pub fn add_class(&mut self, class: Atom) -> bool {
        match self.classes.binary_search(&class) {
            Ok(_) => false,
            Err(pos) => {
                self.classes.insert(pos, class);
                true
            }
        }
    }

    pub fn remove_class(&mut self, class: &Atom) -> bool {
        match self.classes.binary_search(class) {
            Ok(pos) => {
                self.classes.remove(pos);
                true
            }
            Err(_) => false,
        }
    }

    pub fn has_class(&self, class: &Atom) -> bool {
        self.classes.binary_search(class).is_ok()
    }

    /// Classes in sorted order.
    pub fn classes(&self) -> impl Iterator<Item = &Atom> + '_ {
        self.classes.iter()
    }

    // ── Regions ──────────────────────────────────────────────────────

    /// Add or update a region. Returns whether anything changed.
    pub fn add_region(&mut self, region: Atom, flags: RegionFlags) -> bool {
        match self.regions.binary_search_by(|(r, _)| r.cmp(&region)) {
            Ok(pos) if self.regions[pos].1 == flags => false,
            Ok(pos) => {
                self.regions[pos].1 = flags;
                true
            }
            Err(pos) => {
                self.regions.insert(pos, (region, flags));
                true
            }
        }
    }

    pub fn remove_region(&mut self, region: &Atom) -> bool {
        match self.regions.binary_search_by(|(r, _)| r.cmp(region)) {
            Ok(pos) => {
                self.regions.remove(pos);
                true
            }
            Err(_) => false,
        }
    }

    /// The region's flags, if the node has it.
    pub fn has_region(&self, region: &Atom) -> Option<RegionFlags> {
        self.regions
            .binary_search_by(|(r, _)| r.cmp(region))
            .ok()
            .map(|pos| self.regions[pos].1)
    }

    /// Regions in sorted order.
    pub fn regions(&self) -> impl Iterator<Item = (&Atom, RegionFlags)> + '_ {
        self.regions.iter().map(|(r, f)| (r, *f))
    }

    /// Whether a type selector naming `name` applies: the node name, the
    /// widget type, or one of the regions.
    pub fn matches_type(&self, name: &Atom) -> bool {
        self.name == *name
            || self.widget_type.as_ref() == Some(name)
            || self.has_region(name).is_some()
    }
}
