//! Style providers: sources of declarations for the cascade.
//!
//! A provider answers one question per node: which declarations apply, and
//! which node inputs did the answer depend on. [`CssProvider`] answers it
//! from a parsed stylesheet.

use std::sync::Arc;

use crate::css::matcher::NodeMatcher;
use crate::css::model::{Selector, StyleSheet};
use crate::css::parser::{parse_css, ParseError};
use crate::css::properties::{parse_declaration, SpecifiedValue};
use crate::css::specificity::Specificity;
use crate::style::change::CssChange;
use crate::style::property::PropertyId;

pub const PRIORITY_FALLBACK: u32 = 1;
pub const PRIORITY_THEME: u32 = 200;
pub const PRIORITY_SETTINGS: u32 = 400;
pub const PRIORITY_APPLICATION: u32 = 600;
pub const PRIORITY_USER: u32 = 800;

/// One declaration that applies to a node, with its cascade weight.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchedDeclaration {
    pub specificity: Specificity,
    pub property: PropertyId,
    pub value: SpecifiedValue,
}

/// A source of declarations.
///
/// Providers are shared between engines and threads and never change once
/// installed; replacing one is how a theme switch is expressed.
pub trait StyleProvider: Send + Sync {
    /// Append every declaration that applies to the matched node to `out`
    /// and return the node inputs the result depends on.
    ///
    /// The engine fills in the provider placement of each specificity.
    fn lookup(&self, matcher: &NodeMatcher<'_>, out: &mut Vec<MatchedDeclaration>) -> CssChange;
}

#[derive(Debug)]
struct CompiledRule {
    selector: Selector,
    change: CssChange,
    normal: Specificity,
    important: Specificity,
    declarations: Arc<[Longhand]>,
}

#[derive(Debug)]
struct Longhand {
    property: PropertyId,
    value: SpecifiedValue,
    important: bool,
}

/// A provider backed by CSS text.
#[derive(Debug, Default)]
pub struct CssProvider {
    rules: Vec<CompiledRule>,
}

impl CssProvider {
    /// Parse and compile `css`. Declarations with unknown properties or
    /// invalid values are dropped; only syntax errors fail.
    pub fn from_css(css: &str) -> Result<Self, ParseError> {
        Ok(Self::compile(&parse_css(css)?))
    }

    pub fn compile(sheet: &StyleSheet) -> Self {
        let mut rules = Vec::new();
        for (index, rule) in sheet.rules.iter().enumerate() {
            let mut longhands = Vec::new();
            for decl in &rule.declarations {
                match parse_declaration(decl) {
                    Ok(parsed) => longhands.extend(parsed.into_iter().map(|(property, value)| Longhand {
                        property,
                        value,
                        important: decl.important,
                    })),
                    Err(err) => log::debug!("skipping declaration: {err}"),
                }
            }
            if longhands.is_empty() {
                continue;
            }
            let declarations: Arc<[Longhand]> = longhands.into();
            let source_order = index as u32;
            for selector in &rule.selectors {
                rules.push(CompiledRule {
                    change: selector.change(),
                    normal: Specificity::from_selector(selector, source_order, false),
                    important: Specificity::from_selector(selector, source_order, true),
                    selector: selector.clone(),
                    declarations: Arc::clone(&declarations),
                });
            }
        }
        Self { rules }
    }

    /// The stylesheet shipped with the engine: builtin images for check
    /// and radio indicators and expanders.
    pub fn builtin_theme() -> Self {
        Self::from_css(BUILTIN_THEME).unwrap_or_else(|err| {
            log::error!("builtin theme failed to parse: {err}");
            Self::default()
        })
    }

    /// Number of compiled (selector, declarations) pairs.
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }
}

impl StyleProvider for CssProvider {
    fn lookup(&self, matcher: &NodeMatcher<'_>, out: &mut Vec<MatchedDeclaration>) -> CssChange {
        let mut change = CssChange::empty();
        for rule in &self.rules {
            if !matcher.may_match(&rule.selector) {
                continue;
            }
            change |= rule.change;
            if !matcher.matches(&rule.selector) {
                continue;
            }
            out.extend(rule.declarations.iter().map(|longhand| MatchedDeclaration {
                specificity: if longhand.important { rule.important } else { rule.normal },
                property: longhand.property,
                value: longhand.value.clone(),
            }));
        }
        change
    }
}

const BUILTIN_THEME: &str = "
check:checked { -ctk-icon-source: builtin(check); }
check:indeterminate { -ctk-icon-source: builtin(check-inconsistent); }
radio:checked { -ctk-icon-source: builtin(option); }
radio:indeterminate { -ctk-icon-source: builtin(option-inconsistent); }
expander { -ctk-icon-source: builtin(expander); }
expander:checked { -ctk-icon-source: builtin(expander-expanded); }
";
