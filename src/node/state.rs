//! Bitsets carried by a style node: state flags, junction sides, region flags.

use bitflags::bitflags;

bitflags! {
    /// Widget state as seen by selectors. Each bit is one pseudo-class.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct StateFlags: u32 {
        const ACTIVE       = 1 << 0;
        const HOVER        = 1 << 1;
        const SELECTED     = 1 << 2;
        const DISABLED     = 1 << 3;
        const INCONSISTENT = 1 << 4;
        const FOCUSED      = 1 << 5;
        const BACKDROP     = 1 << 6;
        const DIR_LTR      = 1 << 7;
        const DIR_RTL      = 1 << 8;
        const LINK         = 1 << 9;
        const VISITED      = 1 << 10;
        const CHECKED      = 1 << 11;
        const DROP_ACTIVE  = 1 << 12;
    }
}

impl StateFlags {
    /// Bits a widget hands down to its children; changing one of them
    /// invalidates the whole subtree.
    pub const INHERITED: StateFlags = StateFlags::DIR_LTR
        .union(StateFlags::DIR_RTL)
        .union(StateFlags::BACKDROP)
        .union(StateFlags::DISABLED);

    /// The flag selected by a pseudo-class, e.g. `hover` or `dir(rtl)`.
    ///
    /// `argument` is the text between parentheses for functional forms.
    pub fn from_pseudo_class(name: &str, argument: Option<&str>) -> Option<StateFlags> {
        let flag = match (name, argument) {
            ("active", None) => StateFlags::ACTIVE,
            ("hover", None) => StateFlags::HOVER,
            ("selected", None) => StateFlags::SELECTED,
            ("disabled", None) => StateFlags::DISABLED,
            ("indeterminate", None) => StateFlags::INCONSISTENT,
            ("focus", None) => StateFlags::FOCUSED,
            ("backdrop", None) => StateFlags::BACKDROP,
            ("link", None) => StateFlags::LINK,
            ("visited", None) => StateFlags::VISITED,
            ("checked", None) => StateFlags::CHECKED,
            ("dir", Some("ltr")) => StateFlags::DIR_LTR,
            ("dir", Some("rtl")) => StateFlags::DIR_RTL,
            ("drop", Some("active")) => StateFlags::DROP_ACTIVE,
            _ => return None,
        };
        Some(flag)
    }

    /// Pseudo-class spelling of every set bit, in bit order.
    pub fn pseudo_class_names(self) -> Vec<&'static str> {
        const NAMES: [(StateFlags, &str); 13] = [
            (StateFlags::ACTIVE, "active"),
            (StateFlags::HOVER, "hover"),
            (StateFlags::SELECTED, "selected"),
            (StateFlags::DISABLED, "disabled"),
            (StateFlags::INCONSISTENT, "indeterminate"),
            (StateFlags::FOCUSED, "focus"),
            (StateFlags::BACKDROP, "backdrop"),
            (StateFlags::DIR_LTR, "dir(ltr)"),
            (StateFlags::DIR_RTL, "dir(rtl)"),
            (StateFlags::LINK, "link"),
            (StateFlags::VISITED, "visited"),
            (StateFlags::CHECKED, "checked"),
            (StateFlags::DROP_ACTIVE, "drop(active)"),
        ];
        NAMES
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect()
    }
}

bitflags! {
    /// Sides and corners where a node is joined to a neighbour; backgrounds
    /// and borders are not rounded there.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct JunctionSides: u8 {
        const CORNER_TOPLEFT     = 1 << 0;
        const CORNER_TOPRIGHT    = 1 << 1;
        const CORNER_BOTTOMLEFT  = 1 << 2;
        const CORNER_BOTTOMRIGHT = 1 << 3;
        const TOP    = Self::CORNER_TOPLEFT.bits() | Self::CORNER_TOPRIGHT.bits();
        const BOTTOM = Self::CORNER_BOTTOMLEFT.bits() | Self::CORNER_BOTTOMRIGHT.bits();
        const LEFT   = Self::CORNER_TOPLEFT.bits() | Self::CORNER_BOTTOMLEFT.bits();
        const RIGHT  = Self::CORNER_TOPRIGHT.bits() | Self::CORNER_BOTTOMRIGHT.bits();
    }
}

bitflags! {
    /// Sub-flags of a legacy region token (`row`, `column`, `tab`).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct RegionFlags: u8 {
        const EVEN   = 1 << 0;
        const ODD    = 1 << 1;
        const FIRST  = 1 << 2;
        const LAST   = 1 << 3;
        const ONLY   = 1 << 4;
        const SORTED = 1 << 5;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pseudo_class_lookup() {
        assert_eq!(
            StateFlags::from_pseudo_class("checked", None),
            Some(StateFlags::CHECKED)
        );
        assert_eq!(
            StateFlags::from_pseudo_class("indeterminate", None),
            Some(StateFlags::INCONSISTENT)
        );
        assert_eq!(
            StateFlags::from_pseudo_class("dir", Some("rtl")),
            Some(StateFlags::DIR_RTL)
        );
        assert_eq!(StateFlags::from_pseudo_class("dir", None), None);
        assert_eq!(StateFlags::from_pseudo_class("wobble", None), None);
    }

    #[test]
    fn pseudo_class_names_round_trip() {
        let state = StateFlags::CHECKED | StateFlags::HOVER;
        assert_eq!(state.pseudo_class_names(), vec!["hover", "checked"]);
        assert!(StateFlags::empty().pseudo_class_names().is_empty());
    }

    #[test]
    fn inherited_bits() {
        assert!(StateFlags::INHERITED.contains(StateFlags::DIR_RTL));
        assert!(!StateFlags::INHERITED.intersects(StateFlags::HOVER | StateFlags::CHECKED));
    }

    #[test]
    fn junction_composites() {
        assert!(JunctionSides::TOP.contains(JunctionSides::CORNER_TOPRIGHT));
        assert_eq!(
            JunctionSides::LEFT | JunctionSides::RIGHT,
            JunctionSides::TOP | JunctionSides::BOTTOM
        );
    }
}
