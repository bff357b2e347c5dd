//! Fixture-based conformance checks for a JavaScript lexer and parser.
//!
//! Expected trees are written in a terse notation and compared against what
//! the parser under test builds. Every terminal in the parsed tree must line
//! up, in order, with a token from an independent pass of the lexer.
//!
//! ```
//! use jsparse_harness::{JsGrammar, Report, Tester};
//!
//! let mut report = Report::new();
//! let mut tester = Tester::new(JsGrammar, &mut report);
//! tester
//!     .good_parse("foo();", "program(expression(call(identifier(foo) `(` `)`) ;))")
//!     .unwrap();
//! report.assert_ok();
//! ```

pub mod ast;
pub mod error;
pub mod fixture;
pub mod harness;
pub mod lexer;
pub mod parser;
pub mod reconcile;
pub mod recorder;
pub mod report;
pub mod subject;

pub use ast::{AstNode, LexemeKind, MiniNode, Token};
pub use error::{Failure, FixtureError, ParseError};
pub use fixture::{parse_fixture, stringify};
pub use harness::Tester;
pub use lexer::JsLexer;
pub use parser::{JsGrammar, JsParser, parse};
pub use report::{Report, Reporter};
pub use subject::{Grammar, Scanner};
