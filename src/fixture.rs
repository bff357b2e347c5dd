//! Fixture notation: the terse parenthesised form expected trees are written in.
//!
//! ```text
//! program(expression(call(identifier(foo) `(` `)`) ;))
//! ```
//!
//! A bare word directly followed by `(` names the group it opens. A `(`
//! preceded by whitespace opens an unnamed group, so `function ()` is the
//! word `function` followed by an empty group. Backticks quote a leaf that
//! would otherwise be read as grouping.

use std::fmt;

use crate::ast::MiniNode;
use crate::error::FixtureError;

/// Lexical unit of fixture notation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit<'a> {
    /// `(`. `merge_name` is false when whitespace directly precedes it.
    Open { merge_name: bool },
    Close,
    /// Inner text of a backtick-quoted leaf
    Literal(&'a str),
    /// A backtick with no closing backtick on the same line
    UnterminatedLiteral,
    Word(&'a str),
}

impl fmt::Display for Unit<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unit::Open { .. } => f.write_str("("),
            Unit::Close => f.write_str(")"),
            Unit::Literal(text) => write!(f, "`{text}`"),
            Unit::UnterminatedLiteral => f.write_str("`"),
            Unit::Word(word) => f.write_str(word),
        }
    }
}

/// Splits fixture notation into [`Unit`]s
pub struct FixtureLexer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> FixtureLexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn literal(&mut self, body: &'a str) -> Unit<'a> {
        match body.find(['`', '\n', '\r', '\u{2028}', '\u{2029}']) {
            Some(end) if body[end..].starts_with('`') => {
                self.pos += end + 2;
                Unit::Literal(&body[..end])
            }
            _ => {
                self.pos += 1;
                Unit::UnterminatedLiteral
            }
        }
    }

    fn word(&mut self, rest: &'a str) -> Unit<'a> {
        let end = rest
            .find(|c: char| c.is_whitespace() || matches!(c, '(' | ')' | '`'))
            .unwrap_or(rest.len());
        self.pos += end;
        Unit::Word(&rest[..end])
    }
}

impl<'a> Iterator for FixtureLexer<'a> {
    type Item = Unit<'a>;

    fn next(&mut self) -> Option<Unit<'a>> {
        loop {
            let rest = &self.input[self.pos..];
            let mut chars = rest.chars();
            match chars.next()? {
                '(' => {
                    self.pos += 1;
                    return Some(Unit::Open { merge_name: true });
                }
                ')' => {
                    self.pos += 1;
                    return Some(Unit::Close);
                }
                '`' => return Some(self.literal(&rest[1..])),
                c if c.is_whitespace() => {
                    self.pos += c.len_utf8();
                    if chars.next() == Some('(') {
                        self.pos += 1;
                        return Some(Unit::Open { merge_name: false });
                    }
                }
                _ => return Some(self.word(rest)),
            }
        }
    }
}

/// Stack machine turning [`Unit`]s into a [`MiniNode`] tree.
///
/// `frames[0]` holds the top-level elements; every open group owns one
/// further frame until its `)` folds it into the frame below.
pub struct TreeBuilder<'a> {
    fixture: &'a str,
    frames: Vec<Vec<MiniNode<'a>>>,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(fixture: &'a str) -> Self {
        Self {
            fixture,
            frames: vec![Vec::new()],
        }
    }

    fn current(&mut self) -> &mut Vec<MiniNode<'a>> {
        let top = self.frames.len() - 1;
        &mut self.frames[top]
    }

    fn mismatched_parens(&self) -> FixtureError {
        FixtureError::MismatchedParens {
            fixture: self.fixture.to_string(),
        }
    }

    pub fn feed(&mut self, unit: Unit<'a>) -> Result<(), FixtureError> {
        match unit {
            Unit::Open { merge_name } => self.open(merge_name),
            Unit::Close => self.close()?,
            Unit::Literal(text) | Unit::Word(text) => self.current().push(MiniNode::Leaf(text)),
            Unit::UnterminatedLiteral => {
                return Err(FixtureError::UnterminatedLiteral {
                    fixture: self.fixture.to_string(),
                });
            }
        }

        if self.frames[0].len() > 1 {
            return Err(FixtureError::UnexpectedTopLevel {
                unit: unit.to_string(),
                fixture: self.fixture.to_string(),
            });
        }
        Ok(())
    }

    fn open(&mut self, merge_name: bool) {
        let current = self.current();
        let frame = if merge_name && matches!(current.last(), Some(MiniNode::Leaf(_))) {
            current.pop().into_iter().collect()
        } else {
            Vec::new()
        };
        self.frames.push(frame);
    }

    fn close(&mut self) -> Result<(), FixtureError> {
        if self.frames.len() < 2 {
            return Err(self.mismatched_parens());
        }
        if let Some(frame) = self.frames.pop() {
            self.current().push(MiniNode::Interior(frame));
        }
        Ok(())
    }

    pub fn finish(mut self) -> Result<MiniNode<'a>, FixtureError> {
        if self.frames.len() != 1 {
            return Err(self.mismatched_parens());
        }
        self.frames
            .pop()
            .and_then(|mut root| root.pop())
            .ok_or(FixtureError::Empty)
    }
}

/// Parse fixture notation into the expected tree
pub fn parse_fixture(fixture: &str) -> Result<MiniNode<'_>, FixtureError> {
    let mut builder = TreeBuilder::new(fixture);
    for unit in FixtureLexer::new(fixture) {
        builder.feed(unit)?;
    }
    builder.finish()
}

/// Canonical fixture notation for `node`
pub fn stringify(node: &MiniNode<'_>) -> String {
    node.to_string()
}

impl fmt::Display for MiniNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MiniNode::Leaf(text) if text.starts_with(['(', ')']) => write!(f, "`{text}`"),
            MiniNode::Leaf(text) => f.write_str(text),
            MiniNode::Interior(parts) => match parts.split_first() {
                None => f.write_str("()"),
                Some((name, children)) => {
                    write!(f, "{name}(")?;
                    for (i, child) in children.iter().enumerate() {
                        if i > 0 {
                            f.write_str(" ")?;
                        }
                        write!(f, "{child}")?;
                    }
                    f.write_str(")")
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    use crate::ast::MiniNode::Leaf;

    fn units(input: &str) -> Vec<Unit<'_>> {
        FixtureLexer::new(input).collect()
    }

    #[test]
    fn test_lex_name_and_group() {
        assert_eq!(
            units("number(1)"),
            vec![
                Unit::Word("number"),
                Unit::Open { merge_name: true },
                Unit::Word("1"),
                Unit::Close,
            ]
        );
    }

    #[test]
    fn test_lex_whitespace_before_open() {
        assert_eq!(
            units("function  () x"),
            vec![
                Unit::Word("function"),
                Unit::Open { merge_name: false },
                Unit::Close,
                Unit::Word("x"),
            ]
        );
    }

    #[test]
    fn test_lex_literals() {
        assert_eq!(
            units("`(` `)``` `a b`"),
            vec![
                Unit::Literal("("),
                Unit::Literal(")"),
                Unit::Literal(""),
                Unit::Literal("a b"),
            ]
        );
    }

    #[test]
    fn test_lex_literal_stops_at_line_break() {
        assert_eq!(
            units("`a\nb`"),
            vec![
                Unit::UnterminatedLiteral,
                Unit::Word("a"),
                Unit::Word("b"),
                Unit::UnterminatedLiteral,
            ]
        );
    }

    #[test]
    fn test_parse_number_statement() {
        let tree = parse_fixture("program(expression(number(1) ;()))").unwrap();
        assert_eq!(
            tree,
            MiniNode::node(
                "program",
                vec![MiniNode::node(
                    "expression",
                    vec![
                        MiniNode::node("number", vec![Leaf("1")]),
                        MiniNode::node(";", vec![]),
                    ]
                )]
            )
        );
    }

    #[test]
    fn test_parse_escaped_parens() {
        let tree = parse_fixture("call(identifier(foo) `(` `)`)").unwrap();
        assert_eq!(
            tree,
            MiniNode::node(
                "call",
                vec![
                    MiniNode::node("identifier", vec![Leaf("foo")]),
                    Leaf("("),
                    Leaf(")"),
                ]
            )
        );
    }

    #[test]
    fn test_parse_unnamed_group() {
        let tree = parse_fixture("functionExpr(function () body)").unwrap();
        assert_eq!(
            tree,
            MiniNode::node(
                "functionExpr",
                vec![Leaf("function"), MiniNode::empty(), Leaf("body")]
            )
        );
    }

    #[test]
    fn test_whitespace_open_starts_unnamed_group() {
        let tree = parse_fixture("a(b() (c))").unwrap();
        assert_eq!(
            tree,
            MiniNode::node(
                "a",
                vec![
                    MiniNode::node("b", vec![]),
                    MiniNode::Interior(vec![Leaf("c")]),
                ]
            )
        );
    }

    #[test]
    fn test_single_word_fixture() {
        assert_eq!(parse_fixture("  lonely ").unwrap(), Leaf("lonely"));
    }

    #[test]
    fn test_unterminated_literal() {
        assert_eq!(
            parse_fixture("a ` b"),
            Err(FixtureError::UnterminatedLiteral {
                fixture: "a ` b".to_string()
            })
        );
    }

    #[test]
    fn test_unclosed_group() {
        assert_eq!(
            parse_fixture("program(expression("),
            Err(FixtureError::MismatchedParens {
                fixture: "program(expression(".to_string()
            })
        );
    }

    #[test]
    fn test_stray_close() {
        assert!(matches!(
            parse_fixture("a)"),
            Err(FixtureError::MismatchedParens { .. })
        ));
    }

    #[test]
    fn test_multiple_top_level() {
        assert_eq!(
            parse_fixture("a(b) c"),
            Err(FixtureError::UnexpectedTopLevel {
                unit: "c".to_string(),
                fixture: "a(b) c".to_string()
            })
        );
    }

    #[test]
    fn test_empty_fixture() {
        assert_eq!(parse_fixture("   "), Err(FixtureError::Empty));
    }

    #[test]
    fn test_stringify_escapes_paren_leaves() {
        let tree = MiniNode::node(
            "call",
            vec![
                MiniNode::node("identifier", vec![Leaf("foo")]),
                Leaf("("),
                Leaf(")x"),
                MiniNode::empty(),
            ],
        );
        assert_eq!(stringify(&tree), "call(identifier(foo) `(` `)x` ())");
    }

    #[test]
    fn test_round_trip() {
        let fixtures = [
            "program()",
            "program(expression(number(1) ;()))",
            "program(expression(binary(number(1) + number(1)) ;) empty(;))",
            "program(expression(call(identifier(foo) `(` `)`) ;))",
            "program(var(var varDecl(x = functionExpr(function () `(` `)` { return(return number(123) ;) })) ;))",
        ];
        for fixture in fixtures {
            let tree = parse_fixture(fixture).unwrap();
            assert_eq!(stringify(&tree), fixture);
            assert_eq!(parse_fixture(&stringify(&tree)).unwrap(), tree);
        }
    }

    #[test]
    fn test_canonical_form_ignores_spacing() {
        let tree = parse_fixture("  binary(\n  number(1)   +\tnumber(2) )").unwrap();
        assert_eq!(stringify(&tree), "binary(number(1) + number(2))");
    }
}
