//! Cascade ordering key for matched declarations.
//!
//! The key is a tuple compared lexicographically:
//!
//! ```text
//! (provider_priority, provider_order, important, id_count, class_count, type_count, source_order)
//! ```
//!
//! - Providers with a higher priority win outright.
//! - Between providers of equal priority, the one added later wins.
//! - Within a provider, `!important` beats normal declarations.
//! - Then more ids, then more classes/pseudo-classes, then more type selectors.
//! - Later source order breaks the remaining ties.

use crate::css::model::{Selector, SelectorComponent, SelectorPart};

/// CSS selector weight plus the provider placement of the rule that owns it.
///
/// `Ord` is derived: a greater value wins the cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Specificity {
    /// Priority of the provider that supplied the declaration.
    pub provider_priority: u32,
    /// Insertion order of the provider among providers of the engine.
    pub provider_order: u16,
    /// 1 if `!important`, 0 otherwise.
    pub important: u8,
    /// Number of id selectors (`#id`).
    pub id_count: u16,
    /// Number of class, state and structural selectors.
    pub class_count: u16,
    /// Number of type selectors (`button`, `check`).
    pub type_count: u16,
    /// Index of the rule within its provider.
    pub source_order: u32,
}

impl Specificity {
    /// Weight of `selector` alone, with provider placement left at zero.
    pub fn from_selector(selector: &Selector, source_order: u32, important: bool) -> Self {
        let mut spec = Self {
            important: u8::from(important),
            source_order,
            ..Self::default()
        };

        let components = selector.parts.iter().filter_map(|part| match part {
            SelectorPart::Compound(compound) => Some(&compound.components),
            SelectorPart::Combinator(_) => None,
        });
        for component in components.flatten() {
            match component {
                SelectorComponent::Id(_) => spec.id_count += 1,
                SelectorComponent::Class(_)
                | SelectorComponent::State(_)
                | SelectorComponent::Position(_)
                | SelectorComponent::Sorted => spec.class_count += 1,
                SelectorComponent::Type(_) => spec.type_count += 1,
                SelectorComponent::Universal => {}
            }
        }

        spec
    }

    /// The same weight placed in a provider.
    pub fn in_provider(self, priority: u32, order: u16) -> Self {
        Self {
            provider_priority: priority,
            provider_order: order,
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::css::parser::parse_css;

    fn spec_of(selector: &str) -> Specificity {
        let sheet = parse_css(&format!("{selector} {{ color: red; }}")).unwrap();
        Specificity::from_selector(&sheet.rules[0].selectors[0], 0, false)
    }

    #[test]
    fn counts_components() {
        let s = spec_of("checkbutton > check.large:checked#main");
        assert_eq!(s.id_count, 1);
        assert_eq!(s.class_count, 2);
        assert_eq!(s.type_count, 2);
    }

    #[test]
    fn universal_adds_nothing() {
        assert_eq!(spec_of("*"), Specificity::default());
    }

    #[test]
    fn structural_pseudo_classes_count_as_classes() {
        assert_eq!(spec_of("row:nth-child(even)").class_count, 1);
        assert_eq!(spec_of("row:only-child").class_count, 2);
    }

    #[test]
    fn id_beats_classes() {
        assert!(spec_of("#a") > spec_of(".a.b.c.d"));
        assert!(spec_of(".a") > spec_of("a b c"));
    }

    #[test]
    fn important_beats_specificity_within_provider() {
        let sheet = parse_css("a { color: red; }").unwrap();
        let plain_id = spec_of("#x");
        let important = Specificity::from_selector(&sheet.rules[0].selectors[0], 0, true);
        assert!(important > plain_id);
    }

    #[test]
    fn provider_priority_dominates() {
        let theme = spec_of("#x").in_provider(200, 0);
        let app = spec_of("*").in_provider(600, 1);
        assert!(app > theme);
    }

    #[test]
    fn later_provider_of_equal_priority_wins() {
        let first = spec_of("#x.y").in_provider(600, 0);
        let second = spec_of("*").in_provider(600, 1);
        assert!(second > first);
    }

    #[test]
    fn source_order_breaks_ties() {
        let sheet = parse_css("a { color: red; }").unwrap();
        let sel = &sheet.rules[0].selectors[0];
        assert!(
            Specificity::from_selector(sel, 3, false) > Specificity::from_selector(sel, 2, false)
        );
    }
}
