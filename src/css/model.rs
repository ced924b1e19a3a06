//! CSS AST: Selector, RuleSet, Declaration.

use crate::intern::Atom;
use crate::node::state::StateFlags;
use crate::style::change::CssChange;

/// Which end of the sibling list an `an+b` position counts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NthFrom {
    /// `:nth-child`, `:first-child`.
    Start,
    /// `:nth-last-child`, `:last-child`.
    End,
}

/// A structural position test: matches 1-based index `i` when `i = a*n + b`
/// for some `n >= 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NthPosition {
    pub from: NthFrom,
    pub a: i32,
    pub b: i32,
}

impl NthPosition {
    /// `:first-child` / `:last-child`.
    pub const fn edge(from: NthFrom) -> Self {
        Self { from, a: 0, b: 1 }
    }

    /// Whether the 1-based `index` satisfies `an+b`.
    pub fn matches(self, index: i32) -> bool {
        if self.a == 0 {
            return index == self.b;
        }
        let diff = index - self.b;
        diff % self.a == 0 && diff / self.a >= 0
    }

    /// Whether this is a plain first/last test.
    pub fn is_edge(self) -> bool {
        self.a == 0 && self.b == 1
    }

    /// Parse the argument of `:nth-child(...)`: `even`, `odd`, `3`, `2n+1`,
    /// `-n+3`, `n`.
    pub fn parse(from: NthFrom, text: &str) -> Option<Self> {
        let text: String = text.chars().filter(|c| !c.is_whitespace()).collect();
        let text = text.to_ascii_lowercase();
        let (a, b) = match text.as_str() {
            "even" => (2, 0),
            "odd" => (2, 1),
            _ => match text.find('n') {
                None => (0, text.parse().ok()?),
                Some(pos) => {
                    let a = match &text[..pos] {
                        "" | "+" => 1,
                        "-" => -1,
                        other => other.parse().ok()?,
                    };
                    let rest = &text[pos + 1..];
                    let b = if rest.is_empty() {
                        0
                    } else {
                        rest.strip_prefix('+').unwrap_or(rest).parse().ok()?
                    };
                    (a, b)
                }
            },
        };
        Some(Self { from, a, b })
    }
}

/// A single CSS selector component.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectorComponent {
    /// Type selector: matches the node name, its widget type or a region.
    Type(Atom),
    /// Universal selector: `*`.
    Universal,
    /// Class selector: `.classname`.
    Class(Atom),
    /// ID selector: `#id`.
    Id(Atom),
    /// State pseudo-class: `:hover`, `:checked`, `:dir(rtl)`.
    State(StateFlags),
    /// Structural pseudo-class: `:first-child`, `:nth-child(2n+1)`.
    Position(NthPosition),
    /// `:sorted`, set on regions flagged as sorted.
    Sorted,
}

impl SelectorComponent {
    /// Dependency bits a node acquires from this component.
    fn change(&self) -> CssChange {
        match self {
            SelectorComponent::Type(_) => CssChange::NAME,
            SelectorComponent::Universal => CssChange::empty(),
            SelectorComponent::Class(_) | SelectorComponent::Sorted => CssChange::CLASS,
            SelectorComponent::Id(_) => CssChange::ID,
            SelectorComponent::State(_) => CssChange::STATE,
            SelectorComponent::Position(nth) => match (nth.from, nth.is_edge()) {
                (NthFrom::Start, true) => CssChange::FIRST_CHILD,
                (NthFrom::End, true) => CssChange::LAST_CHILD,
                (NthFrom::Start, false) => CssChange::NTH_CHILD,
                (NthFrom::End, false) => CssChange::NTH_LAST_CHILD,
            },
        }
    }
}

/// A combinator between compound selectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// Descendant combinator (whitespace): `A B`.
    Descendant,
    /// Child combinator: `A > B`.
    Child,
    /// Adjacent sibling combinator: `A + B`.
    Adjacent,
    /// General sibling combinator: `A ~ B`.
    Sibling,
}

/// A single compound selector (sequence of components without combinators).
///
/// For example, `check.large:checked` is one `CompoundSelector` with three
/// components: `Type("check")`, `Class("large")`, `State(CHECKED)`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CompoundSelector {
    pub components: Vec<SelectorComponent>,
}

impl CompoundSelector {
    /// Create an empty compound selector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a component to this compound selector.
    pub fn push(&mut self, component: SelectorComponent) {
        self.components.push(component);
    }

    /// The type names this compound requires, if any.
    pub fn type_name(&self) -> Option<&Atom> {
        self.components.iter().find_map(|c| match c {
            SelectorComponent::Type(name) => Some(name),
            _ => None,
        })
    }

    fn change(&self) -> CssChange {
        self.components
            .iter()
            .fold(CssChange::empty(), |acc, c| acc | c.change())
    }
}

/// One element in a selector chain: either a compound selector or a combinator.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectorPart {
    /// A compound selector (one or more simple selectors).
    Compound(CompoundSelector),
    /// A combinator between compound selectors.
    Combinator(Combinator),
}

/// A full CSS selector: chain of compound selectors joined by combinators.
///
/// For example, `checkbutton > check:checked` is a `Selector` with parts:
/// `[Compound(checkbutton), Combinator(Child), Compound(check:checked)]`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Selector {
    /// Alternating compound selectors and combinators.
    /// Always starts and ends with a `SelectorPart::Compound`.
    pub parts: Vec<SelectorPart>,
}

impl Selector {
    /// Create an empty selector.
    pub fn new() -> Self {
        Self::default()
    }

    /// The compound that must match the node itself.
    pub fn rightmost(&self) -> Option<&CompoundSelector> {
        match self.parts.last() {
            Some(SelectorPart::Compound(c)) => Some(c),
            _ => None,
        }
    }

    /// The inputs a node's style depends on when this selector is tested
    /// against it.
    ///
    /// Walks left to right: everything left of a descendant/child combinator
    /// is seen through [`CssChange::for_child`], everything left of a sibling
    /// combinator through [`CssChange::for_sibling`].
    pub fn change(&self) -> CssChange {
        let mut acc = CssChange::empty();
        let mut pending: Option<Combinator> = None;
        for part in &self.parts {
            match part {
                SelectorPart::Combinator(c) => pending = Some(*c),
                SelectorPart::Compound(compound) => {
                    let carried = match pending.take() {
                        None => acc,
                        Some(Combinator::Descendant | Combinator::Child) => acc.for_child(),
                        Some(Combinator::Adjacent | Combinator::Sibling) => acc.for_sibling(),
                    };
                    acc = carried | compound.change();
                }
            }
        }
        acc
    }
}

/// A value token within a CSS declaration.
#[derive(Debug, Clone, PartialEq)]
pub enum DeclarationValue {
    /// An identifier like `red`, `solid`, `none`.
    Ident(String),
    /// A bare number like `10`, `0.5`.
    Number(f32),
    /// A number with a unit suffix like `12px`, `1.5em`, `200ms`.
    Dimension(f32, String),
    /// A hex color string (without the `#` prefix), e.g. `"ff00aa"`.
    Color(String),
    /// A quoted string value.
    String(String),
    /// A function call: `rgba(0, 0, 0, 0.5)`, `builtin(check)`.
    Function(String, Vec<DeclarationValue>),
    /// A top-level `,` separating list items (`box-shadow`).
    Comma,
}

/// A single CSS property declaration, e.g. `color: red` or `margin: 1px 2px`.
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    /// The property name, e.g. `"color"`, `"margin"`.
    pub property: String,
    /// The declaration values.
    pub values: Vec<DeclarationValue>,
    /// Whether `!important` was specified.
    pub important: bool,
}

impl Declaration {
    /// Create a new declaration.
    pub fn new(property: String, values: Vec<DeclarationValue>, important: bool) -> Self {
        Self {
            property,
            values,
            important,
        }
    }
}

/// A CSS rule: one or more selectors paired with declarations.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleSet {
    /// The selectors for this rule (comma-separated in CSS).
    pub selectors: Vec<Selector>,
    /// The property declarations inside the `{ ... }` block.
    pub declarations: Vec<Declaration>,
}

/// A parsed CSS stylesheet: a list of rule sets.
#[derive(Debug, Clone, Default)]
pub struct StyleSheet {
    pub rules: Vec<RuleSet>,
}

impl StyleSheet {
    /// Create an empty stylesheet.
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compound(components: Vec<SelectorComponent>) -> SelectorPart {
        SelectorPart::Compound(CompoundSelector { components })
    }

    // ── an+b ─────────────────────────────────────────────────────────

    #[test]
    fn nth_parse_keywords_and_formulas() {
        let even = NthPosition::parse(NthFrom::Start, "even").unwrap();
        assert_eq!((even.a, even.b), (2, 0));
        let odd = NthPosition::parse(NthFrom::Start, "odd").unwrap();
        assert_eq!((odd.a, odd.b), (2, 1));
        let three = NthPosition::parse(NthFrom::Start, "3").unwrap();
        assert_eq!((three.a, three.b), (0, 3));
        let f = NthPosition::parse(NthFrom::Start, "2n + 1").unwrap();
        assert_eq!((f.a, f.b), (2, 1));
        let f = NthPosition::parse(NthFrom::End, "-n+3").unwrap();
        assert_eq!((f.a, f.b), (-1, 3));
        let f = NthPosition::parse(NthFrom::Start, "n").unwrap();
        assert_eq!((f.a, f.b), (1, 0));
        assert!(NthPosition::parse(NthFrom::Start, "banana").is_none());
    }

    #[test]
    fn nth_matching() {
        let even = NthPosition::parse(NthFrom::Start, "even").unwrap();
        assert!(!even.matches(1));
        assert!(even.matches(2));
        assert!(even.matches(4));

        let first_three = NthPosition::parse(NthFrom::Start, "-n+3").unwrap();
        assert!(first_three.matches(1));
        assert!(first_three.matches(3));
        assert!(!first_three.matches(4));

        let first = NthPosition::edge(NthFrom::Start);
        assert!(first.matches(1));
        assert!(!first.matches(2));
        assert!(first.is_edge());
    }

    // ── Dependency bits ──────────────────────────────────────────────

    #[test]
    fn change_of_simple_selector() {
        let sel = Selector {
            parts: vec![compound(vec![
                SelectorComponent::Type(Atom::new("check")),
                SelectorComponent::State(StateFlags::CHECKED),
            ])],
        };
        assert_eq!(sel.change(), CssChange::NAME | CssChange::STATE);
    }

    #[test]
    fn change_through_child_combinator() {
        // checkbutton:hover > check
        let sel = Selector {
            parts: vec![
                compound(vec![
                    SelectorComponent::Type(Atom::new("checkbutton")),
                    SelectorComponent::State(StateFlags::HOVER),
                ]),
                SelectorPart::Combinator(Combinator::Child),
                compound(vec![SelectorComponent::Type(Atom::new("check"))]),
            ],
        };
        assert_eq!(
            sel.change(),
            CssChange::NAME | CssChange::PARENT_NAME | CssChange::PARENT_STATE
        );
    }

    #[test]
    fn change_through_sibling_combinator() {
        // .a + row:nth-child(even)
        let sel = Selector {
            parts: vec![
                compound(vec![SelectorComponent::Class(Atom::new("a"))]),
                SelectorPart::Combinator(Combinator::Adjacent),
                compound(vec![
                    SelectorComponent::Type(Atom::new("row")),
                    SelectorComponent::Position(NthPosition::parse(NthFrom::Start, "even").unwrap()),
                ]),
            ],
        };
        assert_eq!(
            sel.change(),
            CssChange::SIBLING_CLASS | CssChange::NAME | CssChange::NTH_CHILD
        );
    }

    #[test]
    fn rightmost_and_type_name() {
        let sel = Selector {
            parts: vec![
                compound(vec![SelectorComponent::Universal]),
                SelectorPart::Combinator(Combinator::Descendant),
                compound(vec![
                    SelectorComponent::Type(Atom::new("arrow")),
                    SelectorComponent::Class(Atom::new("up")),
                ]),
            ],
        };
        let right = sel.rightmost().unwrap();
        assert_eq!(right.type_name().map(Atom::as_str), Some("arrow"));
        assert!(Selector::new().rightmost().is_none());
    }
}
