//! CSS front end: tokenizer, parser, property parsing, selector matching
//! and the providers that feed the cascade.

pub mod tokenizer;
pub mod model;
pub mod parser;
pub mod properties;
pub mod specificity;
pub mod matcher;
pub mod provider;

pub use matcher::NodeMatcher;
pub use parser::{parse_css, ParseError};
pub use provider::{
    CssProvider, MatchedDeclaration, StyleProvider, PRIORITY_APPLICATION, PRIORITY_FALLBACK,
    PRIORITY_SETTINGS, PRIORITY_THEME, PRIORITY_USER,
};
pub use specificity::Specificity;
