//! Change bitsets.
//!
//! [`CssChange`] describes *why* a node may need a new style (what about its
//! selector inputs changed). [`ChangeSet`] describes *what* changed between
//! two computed styles, which is what gadgets and widgets react to.

use bitflags::bitflags;

bitflags! {
    /// Categories of computed properties that differ between two styles.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ChangeSet: u32 {
        /// Text color or other foreground paint.
        const FOREGROUND    = 1 << 0;
        const BACKGROUND    = 1 << 1;
        const BORDER        = 1 << 2;
        /// Font description; text measurement caches are stale.
        const FONT          = 1 << 3;
        /// Text layout content (letter spacing, color used in text).
        const TEXT          = 1 << 4;
        /// Text attributes such as decorations.
        const TEXT_ATTRS    = 1 << 5;
        /// Icon source.
        const ICON          = 1 << 6;
        /// Colors used to recolor symbolic icons.
        const SYMBOLIC_ICON = 1 << 7;
        const OUTLINE       = 1 << 8;
        /// The drawn area outside the border box (shadows, outlines).
        const CLIP          = 1 << 9;
        /// Geometry: a resize is required.
        const SIZE          = 1 << 10;
        const TRANSFORM     = 1 << 11;
        /// A repaint is required.
        const REDRAW        = 1 << 12;
    }
}

impl ChangeSet {
    /// Bits that imply a repaint on their own.
    pub const PAINT: ChangeSet = ChangeSet::FOREGROUND
        .union(ChangeSet::BACKGROUND)
        .union(ChangeSet::BORDER)
        .union(ChangeSet::ICON)
        .union(ChangeSet::SYMBOLIC_ICON)
        .union(ChangeSet::OUTLINE)
        .union(ChangeSet::TRANSFORM);

    /// Adds [`ChangeSet::REDRAW`] when any paint bit is present.
    pub fn with_redraw(self) -> ChangeSet {
        if self.intersects(ChangeSet::PAINT) {
            self | ChangeSet::REDRAW
        } else {
            self
        }
    }
}

bitflags! {
    /// Pending reasons for recomputing a node's style, and the matching
    /// dependency bits a computed style records.
    ///
    /// The low byte describes the node itself. The same byte shifted by 8
    /// describes a previous sibling, by 16 the parent (or any ancestor), and
    /// by 24 a sibling of an ancestor.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CssChange: u64 {
        const CLASS          = 1 << 0;
        const NAME           = 1 << 1;
        const ID             = 1 << 2;
        const FIRST_CHILD    = 1 << 3;
        const LAST_CHILD     = 1 << 4;
        const NTH_CHILD      = 1 << 5;
        const NTH_LAST_CHILD = 1 << 6;
        const STATE          = 1 << 7;

        const SIBLING_CLASS          = 1 << 8;
        const SIBLING_NAME           = 1 << 9;
        const SIBLING_ID             = 1 << 10;
        const SIBLING_FIRST_CHILD    = 1 << 11;
        const SIBLING_LAST_CHILD     = 1 << 12;
        const SIBLING_NTH_CHILD      = 1 << 13;
        const SIBLING_NTH_LAST_CHILD = 1 << 14;
        const SIBLING_STATE          = 1 << 15;

        const PARENT_CLASS          = 1 << 16;
        const PARENT_NAME           = 1 << 17;
        const PARENT_ID             = 1 << 18;
        const PARENT_FIRST_CHILD    = 1 << 19;
        const PARENT_LAST_CHILD     = 1 << 20;
        const PARENT_NTH_CHILD      = 1 << 21;
        const PARENT_NTH_LAST_CHILD = 1 << 22;
        const PARENT_STATE          = 1 << 23;

        const PARENT_SIBLING_CLASS          = 1 << 24;
        const PARENT_SIBLING_NAME           = 1 << 25;
        const PARENT_SIBLING_ID             = 1 << 26;
        const PARENT_SIBLING_FIRST_CHILD    = 1 << 27;
        const PARENT_SIBLING_LAST_CHILD     = 1 << 28;
        const PARENT_SIBLING_NTH_CHILD      = 1 << 29;
        const PARENT_SIBLING_NTH_LAST_CHILD = 1 << 30;
        const PARENT_SIBLING_STATE          = 1 << 31;

        /// The set of style providers changed.
        const SOURCE       = 1 << 32;
        /// The parent's computed style changed.
        const PARENT_STYLE = 1 << 33;
        /// Frame time advanced while transitions are running.
        const TIMESTAMP    = 1 << 34;
        /// Transitions must be restarted rather than continued.
        const ANIMATIONS   = 1 << 35;
        /// The node or an ancestor was shown or hidden.
        const VISIBILITY   = 1 << 36;
    }
}

const SIBLING_SHIFT: u32 = 8;
const PARENT_SHIFT: u32 = 16;

impl CssChange {
    /// Structural position bits of the node itself.
    pub const POSITION: CssChange = CssChange::FIRST_CHILD
        .union(CssChange::LAST_CHILD)
        .union(CssChange::NTH_CHILD)
        .union(CssChange::NTH_LAST_CHILD);

    /// Everything about the node itself.
    pub const ANY_SELF: CssChange = CssChange::from_bits_truncate(0xff);

    /// Everything about previous siblings.
    pub const ANY_SIBLING: CssChange = CssChange::from_bits_truncate(0xff << SIBLING_SHIFT);

    /// Everything about ancestors and their siblings.
    pub const ANY_PARENT: CssChange = CssChange::from_bits_truncate(0xffff << PARENT_SHIFT);

    /// Changes that always require recomputing the style from scratch.
    pub const RADICAL: CssChange = CssChange::NAME
        .union(CssChange::ID)
        .union(CssChange::CLASS)
        .union(CssChange::SOURCE)
        .union(CssChange::PARENT_STYLE)
        .union(CssChange::VISIBILITY);

    /// Every bit. The empty sentinel style depends on all of them.
    pub const ANY: CssChange = CssChange::all();

    /// Translate changes of a node into the changes its next siblings see.
    ///
    /// Nth positions are kept as they are: moving one node shifts the index
    /// of every sibling after it.
    pub fn for_sibling(self) -> CssChange {
        let base = self & CssChange::ANY_SELF;
        let keep = self
            & !(CssChange::ANY_SELF
                | CssChange::SOURCE
                | CssChange::PARENT_STYLE
                | CssChange::TIMESTAMP
                | CssChange::ANIMATIONS
                | CssChange::VISIBILITY);
        let nth = self & (CssChange::NTH_CHILD | CssChange::NTH_LAST_CHILD);
        keep | nth | CssChange::from_bits_truncate(base.bits() << SIBLING_SHIFT)
    }

    /// Translate changes of a node into the changes its children see.
    pub fn for_child(self) -> CssChange {
        let shifted = self & (CssChange::ANY_SELF | CssChange::ANY_SIBLING);
        let keep = self & CssChange::ANY_PARENT;
        keep | CssChange::from_bits_truncate(shifted.bits() << PARENT_SHIFT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redraw_added_for_paint_bits() {
        assert_eq!(
            ChangeSet::ICON.with_redraw(),
            ChangeSet::ICON | ChangeSet::REDRAW
        );
        assert_eq!(ChangeSet::FONT.with_redraw(), ChangeSet::FONT);
        assert_eq!(ChangeSet::SIZE.with_redraw(), ChangeSet::SIZE);
    }

    #[test]
    fn for_child_shifts_into_parent_family() {
        assert_eq!(CssChange::STATE.for_child(), CssChange::PARENT_STATE);
        assert_eq!(
            CssChange::SIBLING_CLASS.for_child(),
            CssChange::PARENT_SIBLING_CLASS
        );
        assert_eq!(CssChange::PARENT_STATE.for_child(), CssChange::PARENT_STATE);
        assert_eq!(CssChange::SOURCE.for_child(), CssChange::empty());
    }

    #[test]
    fn for_sibling_shifts_self_bits() {
        assert_eq!(CssChange::CLASS.for_sibling(), CssChange::SIBLING_CLASS);
        assert_eq!(
            (CssChange::NTH_CHILD | CssChange::PARENT_ID).for_sibling(),
            CssChange::NTH_CHILD | CssChange::SIBLING_NTH_CHILD | CssChange::PARENT_ID
        );
        assert_eq!(CssChange::PARENT_STYLE.for_sibling(), CssChange::empty());
    }

    #[test]
    fn family_masks_do_not_overlap() {
        assert!(!CssChange::ANY_SELF.intersects(CssChange::ANY_SIBLING));
        assert!(!CssChange::ANY_SIBLING.intersects(CssChange::ANY_PARENT));
        assert!(CssChange::ANY_PARENT.contains(CssChange::PARENT_SIBLING_STATE));
        assert!(!CssChange::ANY_PARENT.intersects(CssChange::SOURCE));
    }
}
