use crate::error::{Failure, FixtureError};
use crate::fixture::{parse_fixture, stringify};
use crate::reconcile::Reconciler;
use crate::recorder::record_tokens;
use crate::report::Reporter;
use crate::subject::Grammar;

/// Runs fixture cases against a [`Grammar`], reporting to a [`Reporter`].
///
/// A malformed fixture is returned as an error; everything that points at
/// the code under test is reported as a soft failure instead.
pub struct Tester<'r, G, R> {
    grammar: G,
    reporter: &'r mut R,
}

impl<'r, G: Grammar, R: Reporter> Tester<'r, G, R> {
    pub fn new(grammar: G, reporter: &'r mut R) -> Self {
        Self { grammar, reporter }
    }

    /// Check that `code` parses to the tree written as `expected`, with every
    /// terminal matching the lexer's token stream in order
    pub fn good_parse(&mut self, code: &str, expected: &str) -> Result<(), FixtureError> {
        let expected = parse_fixture(expected)?;

        let recorded = match record_tokens(self.grammar.scanner(code)) {
            Ok(tokens) => tokens,
            Err(failure) => {
                self.reporter.fail(failure);
                return Ok(());
            }
        };

        let ast = match self.grammar.parse(self.grammar.scanner(code)) {
            Ok(ast) => ast,
            Err(err) => {
                self.reporter.fail(Failure::ParseError {
                    message: err.to_string(),
                });
                return Ok(());
            }
        };

        let mut reconciler = Reconciler::new(code, &recorded, &mut *self.reporter);
        let actual = reconciler.reconcile(&ast);
        let consumed = reconciler.consumed();
        reconciler.finish();

        let (actual, expected) = (stringify(&actual), stringify(&expected));
        log::debug!("{code:?}: {actual} ({consumed} of {} tokens)", recorded.len());
        self.reporter.equal(actual.as_str(), expected.as_str());
        Ok(())
    }

    /// Check that the parser rejects `code`
    pub fn bad_parse(&mut self, code: &str) {
        match self.grammar.parse(self.grammar.scanner(code)) {
            Ok(_) => self.reporter.fail(Failure::UnexpectedSuccess {
                code: code.to_string(),
            }),
            Err(err) => {
                log::debug!("{code:?} rejected: {err}");
                self.reporter.pass();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{AstNode, LexemeKind};
    use crate::parser::JsGrammar;
    use crate::report::Report;
    use crate::subject::Scanner;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_good_parse_passes() {
        let mut report = Report::new();
        let mut tester = Tester::new(JsGrammar, &mut report);
        tester
            .good_parse("1", "program(expression(number(1) ;()))")
            .unwrap();
        report.assert_ok();
    }

    #[test]
    fn test_shape_mismatch_is_soft() {
        let mut report = Report::new();
        let mut tester = Tester::new(JsGrammar, &mut report);
        tester
            .good_parse("1;", "program(expression(number(1) ;()))")
            .unwrap();
        assert_eq!(
            report.failures(),
            &[Failure::NotEqual {
                actual: "\"program(expression(number(1) ;))\"".to_string(),
                expected: "\"program(expression(number(1) ;()))\"".to_string(),
            }]
        );
    }

    #[test]
    fn test_malformed_fixture_is_hard() {
        let mut report = Report::new();
        let mut tester = Tester::new(JsGrammar, &mut report);
        let err = tester.good_parse("1", "a ` b").unwrap_err();
        assert_eq!(
            err,
            FixtureError::UnterminatedLiteral {
                fixture: "a ` b".to_string()
            }
        );
        assert_eq!(report.passed(), 0);
        assert!(report.is_ok());
    }

    #[test]
    fn test_lexer_error_ends_case() {
        let mut report = Report::new();
        let mut tester = Tester::new(JsGrammar, &mut report);
        tester.good_parse("1 @", "program()").unwrap();
        assert_eq!(report.failures(), &[Failure::LexerError { pos: 2 }]);
    }

    #[test]
    fn test_parse_error_ends_case() {
        let mut report = Report::new();
        let mut tester = Tester::new(JsGrammar, &mut report);
        tester.good_parse("1 2", "program()").unwrap();
        assert_eq!(
            report.failures(),
            &[Failure::ParseError {
                message: "Expected \";\", found \"2\" at 2".to_string()
            }]
        );
    }

    #[test]
    fn test_bad_parse() {
        let mut report = Report::new();
        let mut tester = Tester::new(JsGrammar, &mut report);
        tester.bad_parse("var = 1");
        tester.bad_parse("var x = 1");
        assert_eq!(report.passed(), 1);
        assert_eq!(
            report.failures(),
            &[Failure::UnexpectedSuccess {
                code: "var x = 1".to_string()
            }]
        );
    }

    /// Scanner yielding a fixed list of lexemes
    struct Scripted<'a> {
        lexemes: Vec<(LexemeKind, &'a str, usize)>,
        index: Option<usize>,
    }

    impl<'a> Scripted<'a> {
        fn current(&self) -> (LexemeKind, &'a str, usize) {
            self.index
                .and_then(|i| self.lexemes.get(i).copied())
                .unwrap_or((LexemeKind::Eof, "", 0))
        }
    }

    impl<'a> Scanner<'a> for Scripted<'a> {
        fn next(&mut self) -> LexemeKind {
            self.index = Some(self.index.map_or(0, |i| i + 1));
            self.kind()
        }

        fn kind(&self) -> LexemeKind {
            self.current().0
        }

        fn text(&self) -> &'a str {
            self.current().1
        }

        fn last_pos(&self) -> usize {
            self.current().2
        }
    }

    /// Grammar whose parser ignores its input and returns a canned tree
    struct Canned(fn() -> AstNode<'static>);

    impl Grammar for Canned {
        type Lexer<'a> = Scripted<'a>;
        type Error = String;

        fn scanner<'a>(&self, source: &'a str) -> Scripted<'a> {
            let lexemes = source
                .char_indices()
                .filter(|(_, c)| !c.is_whitespace())
                .map(|(pos, _)| (LexemeKind::Identifier, &source[pos..pos + 1], pos))
                .collect();
            Scripted {
                lexemes,
                index: None,
            }
        }

        fn parse<'a>(&self, _scanner: Self::Lexer<'a>) -> Result<AstNode<'a>, String> {
            Ok((self.0)())
        }
    }

    #[test]
    fn test_duplicated_token_is_reported() {
        let mut report = Report::new();
        let mut tester = Tester::new(
            Canned(|| AstNode::node("x", vec![AstNode::token("a", 0), AstNode::token("a", 0)])),
            &mut report,
        );
        tester.good_parse("a", "x(a a)").unwrap();
        assert_eq!(report.failures(), &[Failure::TooManyTokens { count: 2 }]);
    }

    #[test]
    fn test_skipped_token_is_reported() {
        let mut report = Report::new();
        let mut tester = Tester::new(
            Canned(|| AstNode::node("x", vec![AstNode::token("b", 2)])),
            &mut report,
        );
        tester.good_parse("a b", "x(b)").unwrap();
        assert_eq!(
            report.failures(),
            &[
                Failure::NotEqual {
                    actual: "\"b\"".to_string(),
                    expected: "\"a\"".to_string(),
                },
                Failure::NotEqual {
                    actual: "2".to_string(),
                    expected: "0".to_string(),
                },
                Failure::TooFewTokens { count: 1 },
            ]
        );
    }
}
