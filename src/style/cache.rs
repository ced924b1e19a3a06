//! Per-parent cache of child styles.
//!
//! A parent keeps the styles it has handed to its children, keyed by the
//! child's declaration and whether it is the first/last visible child. The
//! cache is dropped whenever the parent's own style is re-evaluated.

use std::collections::HashMap;
use std::sync::Arc;

use crate::node::declaration::NodeDeclaration;
use crate::style::change::CssChange;
use crate::style::computed::ComputedStyle;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    declaration: NodeDeclaration,
    is_first: bool,
    is_last: bool,
}

#[derive(Debug, Default)]
pub struct StyleCache {
    entries: HashMap<CacheKey, Arc<ComputedStyle>>,
}

impl StyleCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup(
        &self,
        declaration: &NodeDeclaration,
        is_first: bool,
        is_last: bool,
    ) -> Option<Arc<ComputedStyle>> {
        let key = CacheKey {
            declaration: declaration.clone(),
            is_first,
            is_last,
        };
        self.entries.get(&key).cloned()
    }

    pub fn insert(
        &mut self,
        declaration: &NodeDeclaration,
        is_first: bool,
        is_last: bool,
        style: Arc<ComputedStyle>,
    ) {
        let key = CacheKey {
            declaration: declaration.clone(),
            is_first,
            is_last,
        };
        self.entries.insert(key, style);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Whether `style` may be shared through a parent's cache: it must not
/// depend on anything the key leaves out (sibling identity, nth positions)
/// and must not be the invisible sentinel or mid-transition.
pub fn may_be_cached(style: &ComputedStyle) -> bool {
    let uncached = CssChange::NTH_CHILD | CssChange::NTH_LAST_CHILD | CssChange::ANY_SIBLING;
    !style.is_sentinel() && !style.is_animated() && !style.change().intersects(uncached)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intern::Atom;
    use crate::node::state::StateFlags;
    use crate::style::compute::{initial_values, StyleDefaults};

    fn style(change: CssChange) -> Arc<ComputedStyle> {
        Arc::new(ComputedStyle::new(initial_values(&StyleDefaults::default()), change))
    }

    #[test]
    fn lookup_respects_position_and_state() {
        let mut cache = StyleCache::new();
        let mut decl = NodeDeclaration::new(Atom::new("row"));
        let s = style(CssChange::NAME);
        cache.insert(&decl, true, false, Arc::clone(&s));

        let hit = cache.lookup(&decl, true, false).unwrap();
        assert!(Arc::ptr_eq(&hit, &s));
        assert!(cache.lookup(&decl, false, false).is_none());

        decl.set_state(StateFlags::HOVER);
        assert!(cache.lookup(&decl, true, false).is_none());

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn cacheability() {
        assert!(may_be_cached(&style(CssChange::NAME | CssChange::FIRST_CHILD)));
        assert!(may_be_cached(&style(CssChange::PARENT_STATE)));
        assert!(!may_be_cached(&style(CssChange::NTH_CHILD)));
        assert!(!may_be_cached(&style(CssChange::SIBLING_CLASS)));
        assert!(!may_be_cached(&ComputedStyle::sentinel()));
    }
}
