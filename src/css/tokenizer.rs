//! logos-based CSS tokenizer.
//!
//! Token priority in logos is determined by:
//! 1. Longest match wins (e.g. `#fff` as HexColor beats `#` as Hash)
//! 2. For equal length matches, earlier-defined variants win
//!
//! Our ordering ensures:
//! - `#ff00aa` matches [`Token::HexColor`], not [`Token::HashIdent`]
//! - `#add-button` matches [`Token::HashIdent`] since it is longer than the
//!   hex prefix `#add`
//! - `12px` matches [`Token::Dimension`], not `Number` + `Ident`
//! - `:hover` matches [`Token::PseudoClass`], not `Colon` + `Ident`
//! - `-ctk-icon-source` matches [`Token::Ident`], not a negative number

use logos::Logos;

/// CSS token produced by the lexer.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\n\r\f]+")]
pub enum Token {
    // ── Compound tokens (longer matches, defined first) ──────────────

    /// `!important` flag.
    #[token("!important")]
    Important,

    /// CSS hex color: `#fff`, `#ff00aa`, `#ff00aa80` (3-8 hex digits).
    #[regex(r"#[0-9a-fA-F]{3,8}")]
    HexColor,

    /// `#name`: an id selector whose name is not a plain hex run.
    #[regex(r"#[a-zA-Z_-][a-zA-Z0-9_-]*")]
    HashIdent,

    /// Dimension: number with a unit suffix like `12px`, `1.5em`, `50%`, `200ms`.
    #[regex(r"-?([0-9]+(\.[0-9]+)?|\.[0-9]+)(px|pt|em|%|ms|s|deg)")]
    Dimension,

    /// Pseudo-class: `:hover`, `:nth-child`, `:dir`, etc.
    #[regex(r":[a-zA-Z][a-zA-Z0-9_-]*")]
    PseudoClass,

    /// Double-quoted string literal.
    #[regex(r#""[^"]*""#)]
    StringLiteral,

    /// Single-quoted string literal.
    #[regex(r"'[^']*'")]
    StringLiteralSingle,

    /// Number: integer or float, possibly negative.
    #[regex(r"-?([0-9]+(\.[0-9]+)?|\.[0-9]+)")]
    Number,

    /// Identifier: property names (including vendor `-ctk-` names),
    /// node names, keywords, function names.
    #[regex(r"-?[a-zA-Z_][a-zA-Z0-9_-]*")]
    Ident,

    // ── Single-character punctuation ─────────────────────────────────

    /// `{`
    #[token("{")]
    BraceOpen,

    /// `}`
    #[token("}")]
    BraceClose,

    /// `(`
    #[token("(")]
    ParenOpen,

    /// `)`
    #[token(")")]
    ParenClose,

    /// `:`
    #[token(":")]
    Colon,

    /// `;`
    #[token(";")]
    Semicolon,

    /// `,`
    #[token(",")]
    Comma,

    /// `.`
    #[token(".")]
    Dot,

    /// `#`
    #[token("#")]
    Hash,

    /// `*`
    #[token("*")]
    Star,

    /// `>`
    #[token(">")]
    GreaterThan,

    /// `+`
    #[token("+")]
    Plus,

    /// `~`
    #[token("~")]
    Tilde,
}

/// A token with its text and byte span in the source.
#[derive(Debug, Clone, PartialEq)]
pub struct SpannedToken {
    pub token: Token,
    pub text: String,
    /// Index in the token stream, for error positions.
    pub pos: usize,
    pub byte_start: usize,
    pub byte_end: usize,
}

/// Tokenize a CSS string, keeping byte spans so callers can tell adjacent
/// tokens from whitespace-separated ones and slice arguments verbatim.
///
/// Characters that fail to lex are skipped.
pub fn tokenize(input: &str) -> Vec<SpannedToken> {
    let mut tokens = Vec::new();
    for (result, span) in Token::lexer(input).spanned() {
        if let Ok(token) = result {
            tokens.push(SpannedToken {
                text: input[span.clone()].to_string(),
                token,
                pos: tokens.len(),
                byte_start: span.start,
                byte_end: span.end,
            });
        }
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<Token> {
        tokenize(input).into_iter().map(|t| t.token).collect()
    }

    // ── Punctuation ──────────────────────────────────────────────────

    #[test]
    fn test_punctuation() {
        assert_eq!(
            tokens("{ } ( ) : ; , . # * > + ~"),
            vec![
                Token::BraceOpen,
                Token::BraceClose,
                Token::ParenOpen,
                Token::ParenClose,
                Token::Colon,
                Token::Semicolon,
                Token::Comma,
                Token::Dot,
                Token::Hash,
                Token::Star,
                Token::GreaterThan,
                Token::Plus,
                Token::Tilde,
            ]
        );
    }

    // ── Identifiers ──────────────────────────────────────────────────

    #[test]
    fn test_vendor_ident() {
        let result = tokenize("-ctk-icon-source check-inconsistent");
        assert_eq!((&result[0].token, result[0].text.as_str()), (&Token::Ident, "-ctk-icon-source"));
        assert_eq!((&result[1].token, result[1].text.as_str()), (&Token::Ident, "check-inconsistent"));
    }

    // ── Colors and ids ───────────────────────────────────────────────

    #[test]
    fn test_hex_color_vs_hash_ident() {
        assert_eq!(tokens("#ff00aa"), vec![Token::HexColor]);
        assert_eq!(tokens("#fff"), vec![Token::HexColor]);
        assert_eq!(tokens("#main-box"), vec![Token::HashIdent]);
        assert_eq!(tokens("#00ff00"), vec![Token::HexColor]);
    }

    // ── Numbers and dimensions ───────────────────────────────────────

    #[test]
    fn test_dimensions() {
        let result = tokenize("12px 1.5em 50% 200ms 2s 90deg 10pt");
        assert!(result.iter().all(|t| t.token == Token::Dimension));
        assert_eq!(result[1].text, "1.5em");
        assert_eq!(result[3].text, "200ms");
    }

    #[test]
    fn test_numbers() {
        assert_eq!(tokens("0 -3 0.5 .25"), vec![Token::Number; 4]);
    }

    // ── Pseudo-classes and functions ─────────────────────────────────

    #[test]
    fn test_pseudo_class_with_arguments() {
        assert_eq!(
            tokens(":nth-child(even)"),
            vec![
                Token::PseudoClass,
                Token::ParenOpen,
                Token::Ident,
                Token::ParenClose
            ]
        );
    }

    #[test]
    fn test_important_and_strings() {
        assert_eq!(
            tokens("\"a b\" 'c' !important"),
            vec![
                Token::StringLiteral,
                Token::StringLiteralSingle,
                Token::Important
            ]
        );
    }

    // ── Spans ────────────────────────────────────────────────────────

    #[test]
    fn test_spans_skip_whitespace_and_bad_input() {
        let result = tokenize("a  ^b");
        assert_eq!(result.len(), 2);
        assert_eq!((result[0].byte_start, result[0].byte_end), (0, 1));
        assert_eq!((result[1].byte_start, result[1].byte_end), (4, 5));
        assert_eq!(result[1].pos, 1);
    }
}
