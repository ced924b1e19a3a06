//! Error types surfaced to callers of the style engine.
//!
//! Only programmer errors are surfaced. Recoverable conditions (out-of-range
//! numbers, missing icons, work for destroyed nodes) are handled in place and
//! logged.

use crate::css::parser::ParseError;

/// Errors from tree manipulation, gadget construction and stylesheet loading.
#[derive(Debug, thiserror::Error)]
pub enum StyleError {
    /// A structural precondition was violated: cycle, re-parenting to a
    /// descendant, a sibling that is not a child of the given parent, or a
    /// stale node handle.
    #[error("invalid tree operation: {0}")]
    InvalidTree(String),
    /// An argument the engine cannot interpret: unknown property name,
    /// unknown gadget, a node that already carries a gadget.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// A stylesheet failed to parse.
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Shorthand result type for engine operations.
pub type Result<T, E = StyleError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        let err = StyleError::InvalidTree("node is an ancestor of the new parent".into());
        assert_eq!(
            err.to_string(),
            "invalid tree operation: node is an ancestor of the new parent"
        );
        let err = StyleError::InvalidArgument("unknown property 'colour'".into());
        assert_eq!(err.to_string(), "invalid argument: unknown property 'colour'");
    }

    #[test]
    fn parse_errors_convert() {
        let parse = ParseError::UnexpectedEof("expected '}'".into());
        let err: StyleError = parse.into();
        assert!(matches!(err, StyleError::Parse(_)));
    }
}
