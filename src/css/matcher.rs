//! Selector matching against nodes of a [`StyleTree`].
//!
//! Selectors are walked right to left. Descendant and general-sibling
//! combinators backtrack, so `a b > c` finds every candidate `b` before
//! giving up. Sibling combinators and structural pseudo-classes only see
//! visible siblings.

use crate::css::model::{
    Combinator, CompoundSelector, NthFrom, Selector, SelectorComponent, SelectorPart,
};
use crate::node::declaration::NodeDeclaration;
use crate::node::state::RegionFlags;
use crate::node::tree::StyleTree;
use crate::node::NodeId;

/// A node seen through the eyes of selectors.
#[derive(Clone, Copy)]
pub struct NodeMatcher<'a> {
    tree: &'a StyleTree,
    node: NodeId,
}

impl<'a> NodeMatcher<'a> {
    pub fn new(tree: &'a StyleTree, node: NodeId) -> Self {
        Self { tree, node }
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn declaration(&self) -> Option<&'a NodeDeclaration> {
        self.tree.get(self.node).map(|n| &n.declaration)
    }

    /// Full match of `selector` against the node.
    pub fn matches(&self, selector: &Selector) -> bool {
        matches_parts(self.tree, &selector.parts, self.node)
    }

    /// Whether the rightmost compound of `selector` could match the node if
    /// its state and position were different. Used to collect the inputs a
    /// style depends on even when the rule does not currently apply.
    pub fn may_match(&self, selector: &Selector) -> bool {
        let (Some(compound), Some(decl)) = (selector.rightmost(), self.declaration()) else {
            return false;
        };
        compound.components.iter().all(|component| match component {
            SelectorComponent::State(_) | SelectorComponent::Position(_) => true,
            other => matches_component(self.tree, self.node, decl, other),
        })
    }
}

fn matches_parts(tree: &StyleTree, parts: &[SelectorPart], node: NodeId) -> bool {
    let Some((SelectorPart::Compound(compound), rest)) = parts.split_last() else {
        return false;
    };
    if !matches_compound(tree, node, compound) {
        return false;
    }
    let Some((SelectorPart::Combinator(combinator), rest)) = rest.split_last() else {
        return rest.is_empty();
    };
    match combinator {
        Combinator::Child => tree
            .parent(node)
            .is_some_and(|parent| matches_parts(tree, rest, parent)),
        Combinator::Descendant => {
            let mut current = tree.parent(node);
            while let Some(ancestor) = current {
                if matches_parts(tree, rest, ancestor) {
                    return true;
                }
                current = tree.parent(ancestor);
            }
            false
        }
        Combinator::Adjacent => tree
            .previous_visible_sibling(node)
            .is_some_and(|sibling| matches_parts(tree, rest, sibling)),
        Combinator::Sibling => {
            let mut current = tree.previous_visible_sibling(node);
            while let Some(sibling) = current {
                if matches_parts(tree, rest, sibling) {
                    return true;
                }
                current = tree.previous_visible_sibling(sibling);
            }
            false
        }
    }
}

fn matches_compound(tree: &StyleTree, node: NodeId, compound: &CompoundSelector) -> bool {
    let Some(decl) = tree.get(node).map(|n| &n.declaration) else {
        return false;
    };
    compound
        .components
        .iter()
        .all(|component| matches_component(tree, node, decl, component))
}

fn matches_component(
    tree: &StyleTree,
    node: NodeId,
    decl: &NodeDeclaration,
    component: &SelectorComponent,
) -> bool {
    match component {
        SelectorComponent::Type(name) => decl.matches_type(name),
        SelectorComponent::Universal => true,
        SelectorComponent::Class(class) => decl.has_class(class),
        SelectorComponent::Id(id) => decl.id() == Some(id),
        SelectorComponent::State(flags) => decl.state().contains(*flags),
        SelectorComponent::Position(nth) => {
            let (from_start, from_end) = tree.visible_position(node);
            match nth.from {
                NthFrom::Start => nth.matches(from_start),
                NthFrom::End => nth.matches(from_end),
            }
        }
        SelectorComponent::Sorted => decl
            .regions()
            .any(|(_, flags)| flags.contains(RegionFlags::SORTED)),
    }
}
