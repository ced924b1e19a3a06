//! Recursive descent CSS parser.
//!
//! Parses CSS text into a [`StyleSheet`] (a vector of [`RuleSet`]s). Uses the
//! logos-based tokenizer from [`crate::css::tokenizer`].

use crate::css::model::*;
use crate::css::tokenizer::{tokenize, SpannedToken, Token};
use crate::intern::Atom;
use crate::node::state::StateFlags;

/// Errors from CSS parsing.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("unexpected token at position {position}: {message}")]
    UnexpectedToken { position: usize, message: String },
    #[error("unexpected end of input: {0}")]
    UnexpectedEof(String),
}

/// Strip CSS block comments (`/* ... */`) from the input, replacing each
/// comment with a single space.
fn strip_comments(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("/*") {
        result.push_str(&rest[..start]);
        result.push(' ');
        rest = match rest[start + 2..].find("*/") {
            Some(end) => &rest[start + 2 + end + 2..],
            // Unterminated: the comment runs to the end of the input.
            None => "",
        };
    }
    result.push_str(rest);

    result
}

/// Parse a CSS string into a [`StyleSheet`].
pub fn parse_css(input: &str) -> Result<StyleSheet, ParseError> {
    let source = strip_comments(input);
    let tokens = tokenize(&source);

    let mut parser = Parser {
        tokens,
        cursor: 0,
        source: &source,
    };

    let mut rules = Vec::new();
    while !parser.is_eof() {
        rules.push(parser.parse_rule()?);
    }

    Ok(StyleSheet { rules })
}

/// Recursive descent parser state.
struct Parser<'s> {
    tokens: Vec<SpannedToken>,
    cursor: usize,
    /// Comment-free source, for arguments that are read verbatim.
    source: &'s str,
}

impl Parser<'_> {
    fn is_eof(&self) -> bool {
        self.cursor >= self.tokens.len()
    }

    fn peek(&self) -> Option<&SpannedToken> {
        self.tokens.get(self.cursor)
    }

    fn peek_is(&self, expected: &Token) -> bool {
        self.peek().is_some_and(|t| &t.token == expected)
    }

    fn advance(&mut self) -> Option<&SpannedToken> {
        if self.cursor < self.tokens.len() {
            let tok = &self.tokens[self.cursor];
            self.cursor += 1;
            Some(tok)
        } else {
            None
        }
    }

    fn expect(&mut self, expected: &Token) -> Result<SpannedToken, ParseError> {
        match self.advance() {
            Some(tok) if &tok.token == expected => Ok(tok.clone()),
            Some(tok) => Err(ParseError::UnexpectedToken {
                position: tok.pos,
                message: format!("expected {:?}, got {:?} '{}'", expected, tok.token, tok.text),
            }),
            None => Err(ParseError::UnexpectedEof(format!("expected {:?}", expected))),
        }
    }

    fn current_pos(&self) -> usize {
        self.peek().map(|t| t.pos).unwrap_or(self.tokens.len())
    }

    /// Returns `true` if the current token is immediately adjacent (no whitespace)
    /// to the previous token.
    fn is_adjacent(&self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        let prev = &self.tokens[self.cursor - 1];
        match self.peek() {
            Some(curr) => curr.byte_start == prev.byte_end,
            None => false,
        }
    }

    fn error_here(&self, message: impl Into<String>) -> ParseError {
        if self.is_eof() {
            ParseError::UnexpectedEof(message.into())
        } else {
            ParseError::UnexpectedToken {
                position: self.current_pos(),
                message: message.into(),
            }
        }
    }

    /// Parse a single CSS rule: selector(s) `{` declarations `}`.
    fn parse_rule(&mut self) -> Result<RuleSet, ParseError> {
        let selectors = self.parse_selector_list()?;
        self.expect(&Token::BraceOpen)?;
        let declarations = self.parse_declarations()?;
        self.expect(&Token::BraceClose)?;

        Ok(RuleSet {
            selectors,
            declarations,
        })
    }

    /// Parse a comma-separated list of selectors (before `{`).
    fn parse_selector_list(&mut self) -> Result<Vec<Selector>, ParseError> {
        let mut selectors = vec![self.parse_selector()?];

        while self.peek_is(&Token::Comma) {
            self.advance();
            selectors.push(self.parse_selector()?);
        }

        Ok(selectors)
    }

    /// Parse a single selector: a sequence of compound selectors with combinators.
    ///
    /// `checkbutton > check:checked` becomes
    /// `[Compound(checkbutton), Combinator(Child), Compound(check:checked)]`.
    fn parse_selector(&mut self) -> Result<Selector, ParseError> {
        let mut parts = vec![SelectorPart::Compound(self.parse_compound_selector()?)];

        loop {
            let combinator = match self.peek().map(|t| &t.token) {
                Some(Token::GreaterThan) => Combinator::Child,
                Some(Token::Plus) => Combinator::Adjacent,
                Some(Token::Tilde) => Combinator::Sibling,
                // A selector-starting token after whitespace is a descendant
                // combinator; adjacent ones were consumed by the compound.
                Some(
                    Token::Ident
                    | Token::Hash
                    | Token::HashIdent
                    | Token::HexColor
                    | Token::Dot
                    | Token::Star
                    | Token::PseudoClass,
                ) => {
                    parts.push(SelectorPart::Combinator(Combinator::Descendant));
                    parts.push(SelectorPart::Compound(self.parse_compound_selector()?));
                    continue;
                }
                _ => break,
            };
            self.advance();
            parts.push(SelectorPart::Combinator(combinator));
            parts.push(SelectorPart::Compound(self.parse_compound_selector()?));
        }

        Ok(Selector { parts })
    }

    /// Parse a compound selector: a sequence of simple selector components with
    /// no whitespace between them, e.g. `check.large:checked`.
    fn parse_compound_selector(&mut self) -> Result<CompoundSelector, ParseError> {
        let mut compound = CompoundSelector::new();

        match self.peek().map(|t| &t.token) {
            Some(Token::Ident) => {
                let name = self.advance().map(|t| Atom::new(&t.text));
                compound.components.extend(name.map(SelectorComponent::Type));
            }
            Some(Token::Star) => {
                self.advance();
                compound.push(SelectorComponent::Universal);
            }
            Some(Token::Dot | Token::Hash | Token::HashIdent | Token::HexColor | Token::PseudoClass) => {
                self.parse_subclass_selector(&mut compound)?;
            }
            _ => return Err(self.error_here("expected selector part")),
        }

        // Continue appending only while the next token touches the previous one.
        while self.is_adjacent()
            && matches!(
                self.peek().map(|t| &t.token),
                Some(Token::Dot | Token::Hash | Token::HashIdent | Token::HexColor | Token::PseudoClass)
            )
        {
            self.parse_subclass_selector(&mut compound)?;
        }

        Ok(compound)
    }

    /// Parse one `.class`, `#id` or `:pseudo` and append it to `compound`.
    fn parse_subclass_selector(&mut self, compound: &mut CompoundSelector) -> Result<(), ParseError> {
        let tok = self
            .advance()
            .cloned()
            .ok_or_else(|| ParseError::UnexpectedEof("expected selector part".into()))?;

        match tok.token {
            Token::Dot => {
                let name = self.expect_name("class name after '.'")?;
                compound.push(SelectorComponent::Class(Atom::new(&name)));
            }
            Token::Hash => {
                let name = self.expect_name("id after '#'")?;
                compound.push(SelectorComponent::Id(Atom::new(&name)));
            }
            // `#ff0` in selector position is an id that happens to look like a color.
            Token::HashIdent | Token::HexColor => {
                compound.push(SelectorComponent::Id(Atom::new(&tok.text[1..])));
            }
            Token::PseudoClass => {
                let name = tok.text[1..].to_ascii_lowercase();
                let argument = if self.is_adjacent() && self.peek_is(&Token::ParenOpen) {
                    Some(self.parse_raw_arguments()?)
                } else {
                    None
                };
                self.push_pseudo_class(compound, &name, argument.as_deref(), tok.pos)?;
            }
            other => {
                return Err(ParseError::UnexpectedToken {
                    position: tok.pos,
                    message: format!("expected selector part, got {:?} '{}'", other, tok.text),
                })
            }
        }
        Ok(())
    }

    fn expect_name(&mut self, what: &str) -> Result<String, ParseError> {
        let name_tok = self
            .advance()
            .ok_or_else(|| ParseError::UnexpectedEof(format!("expected {what}")))?;
        if name_tok.token != Token::Ident {
            return Err(ParseError::UnexpectedToken {
                position: name_tok.pos,
                message: format!("expected {what}, got {:?} '{}'", name_tok.token, name_tok.text),
            });
        }
        Ok(name_tok.text.clone())
    }

    /// Consume `( ... )` and return the trimmed source text between the parens.
    fn parse_raw_arguments(&mut self) -> Result<String, ParseError> {
        let open = self.expect(&Token::ParenOpen)?;
        loop {
            match self.advance() {
                Some(tok) if tok.token == Token::ParenClose => {
                    let end = tok.byte_start;
                    let text = self.source[open.byte_end..end].trim();
                    return Ok(text.to_string());
                }
                Some(_) => {}
                None => return Err(ParseError::UnexpectedEof("expected ')'".into())),
            }
        }
    }

    fn push_pseudo_class(
        &self,
        compound: &mut CompoundSelector,
        name: &str,
        argument: Option<&str>,
        position: usize,
    ) -> Result<(), ParseError> {
        let unknown = || ParseError::UnexpectedToken {
            position,
            message: match argument {
                Some(arg) => format!("unknown pseudo-class ':{name}({arg})'"),
                None => format!("unknown pseudo-class ':{name}'"),
            },
        };

        match (name, argument) {
            ("first-child", None) => {
                compound.push(SelectorComponent::Position(NthPosition::edge(NthFrom::Start)))
            }
            ("last-child", None) => {
                compound.push(SelectorComponent::Position(NthPosition::edge(NthFrom::End)))
            }
            ("only-child", None) => {
                compound.push(SelectorComponent::Position(NthPosition::edge(NthFrom::Start)));
                compound.push(SelectorComponent::Position(NthPosition::edge(NthFrom::End)));
            }
            ("nth-child", Some(arg)) => {
                let nth = NthPosition::parse(NthFrom::Start, arg).ok_or_else(unknown)?;
                compound.push(SelectorComponent::Position(nth));
            }
            ("nth-last-child", Some(arg)) => {
                let nth = NthPosition::parse(NthFrom::End, arg).ok_or_else(unknown)?;
                compound.push(SelectorComponent::Position(nth));
            }
            ("sorted", None) => compound.push(SelectorComponent::Sorted),
            _ => {
                let state = StateFlags::from_pseudo_class(name, argument).ok_or_else(unknown)?;
                compound.push(SelectorComponent::State(state));
            }
        }
        Ok(())
    }

    /// Parse declarations between `{` and `}`.
    fn parse_declarations(&mut self) -> Result<Vec<Declaration>, ParseError> {
        let mut declarations = Vec::new();

        while self.peek().is_some_and(|t| t.token != Token::BraceClose) {
            if self.peek_is(&Token::Semicolon) {
                self.advance();
                continue;
            }
            declarations.push(self.parse_declaration()?);
        }

        Ok(declarations)
    }

    /// Parse a single declaration: `property: value1 value2 [!important];`
    fn parse_declaration(&mut self) -> Result<Declaration, ParseError> {
        let property = self.expect_name("property name")?;

        // `color:red` lexes as `color` + `:red`; split the pseudo-class token
        // back into a colon and the value identifier.
        match self.tokens.get_mut(self.cursor) {
            Some(tok) if tok.token == Token::PseudoClass => {
                tok.token = Token::Ident;
                tok.text.remove(0);
                tok.byte_start += 1;
            }
            _ => {
                self.expect(&Token::Colon)?;
            }
        }

        let mut values = Vec::new();
        let mut important = false;

        loop {
            match self.peek().map(|t| &t.token) {
                None | Some(Token::Semicolon | Token::BraceClose) => break,
                Some(Token::Important) => {
                    self.advance();
                    important = true;
                    break;
                }
                Some(Token::Comma) => {
                    self.advance();
                    values.push(DeclarationValue::Comma);
                }
                Some(_) => values.push(self.parse_declaration_value()?),
            }
        }

        if self.peek_is(&Token::Semicolon) {
            self.advance();
        }

        Ok(Declaration::new(property, values, important))
    }

    /// Parse a single declaration value into a [`DeclarationValue`].
    fn parse_declaration_value(&mut self) -> Result<DeclarationValue, ParseError> {
        let tok = self
            .advance()
            .cloned()
            .ok_or_else(|| ParseError::UnexpectedEof("expected declaration value".into()))?;

        match &tok.token {
            Token::Number => {
                let n: f32 = tok.text.parse().map_err(|_| ParseError::UnexpectedToken {
                    position: tok.pos,
                    message: format!("invalid number: {}", tok.text),
                })?;
                Ok(DeclarationValue::Number(n))
            }
            Token::Dimension => {
                let (num_str, unit_str) =
                    split_dimension(&tok.text).ok_or_else(|| ParseError::UnexpectedToken {
                        position: tok.pos,
                        message: format!("invalid dimension: {}", tok.text),
                    })?;
                let n: f32 = num_str.parse().map_err(|_| ParseError::UnexpectedToken {
                    position: tok.pos,
                    message: format!("invalid number in dimension: {num_str}"),
                })?;
                Ok(DeclarationValue::Dimension(n, unit_str.to_string()))
            }
            Token::Ident if self.is_adjacent() && self.peek_is(&Token::ParenOpen) => {
                self.advance();
                let mut args = Vec::new();
                loop {
                    match self.peek().map(|t| &t.token) {
                        Some(Token::ParenClose) => {
                            self.advance();
                            break;
                        }
                        Some(Token::Comma) => {
                            self.advance();
                        }
                        Some(_) => args.push(self.parse_declaration_value()?),
                        None => {
                            return Err(ParseError::UnexpectedEof(format!(
                                "expected ')' to close {}(",
                                tok.text
                            )))
                        }
                    }
                }
                Ok(DeclarationValue::Function(tok.text.to_ascii_lowercase(), args))
            }
            Token::Ident => Ok(DeclarationValue::Ident(tok.text.clone())),
            Token::HexColor => Ok(DeclarationValue::Color(tok.text[1..].to_string())),
            Token::StringLiteral | Token::StringLiteralSingle => {
                let inner = &tok.text[1..tok.text.len() - 1];
                Ok(DeclarationValue::String(inner.to_string()))
            }
            other => Err(ParseError::UnexpectedToken {
                position: tok.pos,
                message: format!("unexpected token in declaration value: {:?} '{}'", other, tok.text),
            }),
        }
    }
}

/// Split a dimension string like "50%" or "1.5em" into (number_part, unit_part).
fn split_dimension(s: &str) -> Option<(&str, &str)> {
    let unit_start = s
        .char_indices()
        .find(|(i, c)| !c.is_ascii_digit() && *c != '.' && !(*c == '-' && *i == 0))
        .map(|(i, _)| i)?;

    if unit_start == 0 || unit_start >= s.len() {
        return None;
    }

    Some((&s[..unit_start], &s[unit_start..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Helper ───────────────────────────────────────────────────────

    fn parse(input: &str) -> StyleSheet {
        parse_css(input).unwrap_or_else(|e| panic!("parse failed: {e}"))
    }

    fn first_rule(input: &str) -> RuleSet {
        let sheet = parse(input);
        assert!(!sheet.rules.is_empty(), "expected at least one rule");
        sheet.rules.into_iter().next().unwrap()
    }

    /// Extract the first compound selector's components from a selector.
    fn first_compound(sel: &Selector) -> &[SelectorComponent] {
        match &sel.parts[0] {
            SelectorPart::Compound(c) => &c.components,
            _ => panic!("expected compound selector at index 0"),
        }
    }

    fn ty(name: &str) -> SelectorComponent {
        SelectorComponent::Type(Atom::new(name))
    }

    // ── Simple rule ──────────────────────────────────────────────────

    #[test]
    fn parse_simple_rule() {
        let rule = first_rule("button { color: red; }");
        assert_eq!(rule.selectors.len(), 1);
        assert_eq!(rule.declarations.len(), 1);

        let comps = first_compound(&rule.selectors[0]);
        assert_eq!(comps, &[ty("button")]);

        let decl = &rule.declarations[0];
        assert_eq!(decl.property, "color");
        assert!(!decl.important);
        assert_eq!(decl.values, vec![DeclarationValue::Ident("red".into())]);
    }

    #[test]
    fn parse_declaration_without_space_after_colon() {
        let rule = first_rule("label{color:red;background-color:rgba(0,0,0,0.5)}");
        assert_eq!(rule.declarations[0].values, vec![DeclarationValue::Ident("red".into())]);
        assert_eq!(
            rule.declarations[1].values,
            vec![DeclarationValue::Function(
                "rgba".into(),
                vec![
                    DeclarationValue::Number(0.0),
                    DeclarationValue::Number(0.0),
                    DeclarationValue::Number(0.0),
                    DeclarationValue::Number(0.5),
                ]
            )]
        );
    }

    // ── Compound selector (no whitespace between parts) ──────────────

    #[test]
    fn parse_compound_selector() {
        let rule = first_rule("check.large:checked { color: blue; }");
        let comps = first_compound(&rule.selectors[0]);
        assert_eq!(
            comps,
            &[
                ty("check"),
                SelectorComponent::Class(Atom::new("large")),
                SelectorComponent::State(StateFlags::CHECKED),
            ]
        );
    }

    #[test]
    fn parse_functional_pseudo_classes() {
        let rule = first_rule("row:nth-child(2n + 1):dir(rtl) { color: blue; }");
        let comps = first_compound(&rule.selectors[0]);
        assert_eq!(
            comps[1],
            SelectorComponent::Position(NthPosition {
                from: NthFrom::Start,
                a: 2,
                b: 1
            })
        );
        assert_eq!(comps[2], SelectorComponent::State(StateFlags::DIR_RTL));
    }

    #[test]
    fn parse_pseudo_class_arguments_verbatim() {
        let rule = first_rule("row:nth-last-child( /* last three */ -n + 3 ) { color: blue; }");
        let comps = first_compound(&rule.selectors[0]);
        assert_eq!(
            comps[1],
            SelectorComponent::Position(NthPosition {
                from: NthFrom::End,
                a: -1,
                b: 3
            })
        );
        assert!(matches!(
            parse_css("row:nth-child(2n"),
            Err(ParseError::UnexpectedEof(_))
        ));
    }

    #[test]
    fn parse_only_child_expands_to_both_edges() {
        let rule = first_rule("tab:only-child { color: blue; }");
        let comps = first_compound(&rule.selectors[0]);
        assert_eq!(comps.len(), 3);
        assert_eq!(comps[1], SelectorComponent::Position(NthPosition::edge(NthFrom::Start)));
        assert_eq!(comps[2], SelectorComponent::Position(NthPosition::edge(NthFrom::End)));
    }

    #[test]
    fn parse_unknown_pseudo_class_fails() {
        assert!(parse_css("button:wiggle { color: red; }").is_err());
        assert!(parse_css("row:nth-child(banana) { color: red; }").is_err());
    }

    // ── Combinators ──────────────────────────────────────────────────

    #[test]
    fn parse_descendant_combinator() {
        let rule = first_rule("box label { margin: 1px; }");
        let sel = &rule.selectors[0];
        assert_eq!(sel.parts.len(), 3);
        assert_eq!(sel.parts[1], SelectorPart::Combinator(Combinator::Descendant));
    }

    #[test]
    fn parse_all_combinators() {
        let rule = first_rule("a > b + c ~ d e { color: red; }");
        let combinators: Vec<Combinator> = rule.selectors[0]
            .parts
            .iter()
            .filter_map(|p| match p {
                SelectorPart::Combinator(c) => Some(*c),
                _ => None,
            })
            .collect();
        assert_eq!(
            combinators,
            vec![
                Combinator::Child,
                Combinator::Adjacent,
                Combinator::Sibling,
                Combinator::Descendant
            ]
        );
    }

    // ── Multiple selectors ───────────────────────────────────────────

    #[test]
    fn parse_multiple_selectors() {
        let rule = first_rule("check, radio { color: green; }");
        assert_eq!(rule.selectors.len(), 2);
        assert_eq!(first_compound(&rule.selectors[0])[0], ty("check"));
        assert_eq!(first_compound(&rule.selectors[1])[0], ty("radio"));
    }

    // ── Ids ──────────────────────────────────────────────────────────

    #[test]
    fn parse_id_selectors() {
        let rule = first_rule("#sidebar, button#add { color: gray; }");
        assert_eq!(
            first_compound(&rule.selectors[0])[0],
            SelectorComponent::Id(Atom::new("sidebar"))
        );
        assert_eq!(
            first_compound(&rule.selectors[1])[1],
            SelectorComponent::Id(Atom::new("add"))
        );
    }

    // ── Values ───────────────────────────────────────────────────────

    #[test]
    fn parse_dimensions() {
        let rule = first_rule("box { min-width: 50px; font-size: 1.5em; transition: 200ms; }");
        assert_eq!(
            rule.declarations[0].values[0],
            DeclarationValue::Dimension(50.0, "px".into())
        );
        assert_eq!(
            rule.declarations[1].values[0],
            DeclarationValue::Dimension(1.5, "em".into())
        );
        assert_eq!(
            rule.declarations[2].values[0],
            DeclarationValue::Dimension(200.0, "ms".into())
        );
    }

    #[test]
    fn parse_important() {
        let rule = first_rule("button { color: red !important; }");
        assert!(rule.declarations[0].important);
        assert_eq!(rule.declarations[0].values[0], DeclarationValue::Ident("red".into()));
    }

    #[test]
    fn parse_hex_colors() {
        let rule = first_rule("label { color: #ff0000; background-color: #fff; }");
        assert_eq!(rule.declarations[0].values[0], DeclarationValue::Color("ff0000".into()));
        assert_eq!(rule.declarations[1].values[0], DeclarationValue::Color("fff".into()));
    }

    #[test]
    fn parse_icon_source_functions() {
        let rule = first_rule(
            "check:checked { -ctk-icon-source: builtin(check); }
             image { -ctk-icon-source: -ctk-icontheme('open-menu'); }",
        );
        assert_eq!(
            rule.declarations[0].values[0],
            DeclarationValue::Function(
                "builtin".into(),
                vec![DeclarationValue::Ident("check".into())]
            )
        );
        let sheet = parse("image { -ctk-icon-source: -ctk-icontheme('open-menu'); }");
        assert_eq!(
            sheet.rules[0].declarations[0].values[0],
            DeclarationValue::Function(
                "-ctk-icontheme".into(),
                vec![DeclarationValue::String("open-menu".into())]
            )
        );
    }

    #[test]
    fn parse_comma_separated_values() {
        let rule = first_rule("box { box-shadow: 1px 1px black, 0 0 2px red; }");
        let values = &rule.declarations[0].values;
        assert_eq!(values.len(), 8);
        assert_eq!(values[3], DeclarationValue::Comma);
    }

    // ── Comments and structure ───────────────────────────────────────

    #[test]
    fn parse_with_comments() {
        let input = "/* comment */ button { color: red; /* inline */ background-color: blue; }";
        let rule = first_rule(input);
        assert_eq!(rule.declarations.len(), 2);
        assert_eq!(rule.declarations[1].property, "background-color");
    }

    #[test]
    fn parse_stray_semicolons() {
        let rule = first_rule("button { ; color: red;; }");
        assert_eq!(rule.declarations.len(), 1);
    }

    #[test]
    fn parse_unclosed_brace() {
        assert!(parse_css("button { color: red;").is_err());
    }

    #[test]
    fn parse_empty_input() {
        assert!(parse("").rules.is_empty());
        assert!(parse("/* only a comment */").rules.is_empty());
    }

    #[test]
    fn parse_universal_selector() {
        let rule = first_rule("* { color: white; }");
        assert_eq!(first_compound(&rule.selectors[0])[0], SelectorComponent::Universal);
    }

    /// `row.item` (no space) is one compound; `row .item` is two.
    #[test]
    fn whitespace_distinguishes_compound_from_descendant() {
        let rule = first_rule("row.item { color: red; }");
        assert_eq!(rule.selectors[0].parts.len(), 1);

        let rule = first_rule("row .item { color: red; }");
        assert_eq!(rule.selectors[0].parts.len(), 3);
        assert_eq!(
            rule.selectors[0].parts[1],
            SelectorPart::Combinator(Combinator::Descendant)
        );
    }

    // ── strip_comments ───────────────────────────────────────────────

    #[test]
    fn strip_comments_basic() {
        assert_eq!(strip_comments("a /* comment */ b"), "a   b");
        assert_eq!(strip_comments("/* c1 */ a /* c2 */ b /* c3 */"), "  a   b  ");
        assert_eq!(strip_comments("hello world"), "hello world");
    }

    #[test]
    fn strip_comments_unterminated() {
        assert_eq!(strip_comments("a /* unterminated"), "a  ");
    }

    // ── split_dimension ──────────────────────────────────────────────

    #[test]
    fn split_dimension_units() {
        assert_eq!(split_dimension("50%"), Some(("50", "%")));
        assert_eq!(split_dimension("-10px"), Some(("-10", "px")));
        assert_eq!(split_dimension("1.5em"), Some(("1.5", "em")));
        assert_eq!(split_dimension("12"), None);
    }
}
