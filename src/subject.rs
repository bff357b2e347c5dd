//! The lexer and parser under test, seen through the narrow interface the
//! harness drives them with.

use std::fmt;

use crate::ast::{AstNode, LexemeKind};

/// A stateful lexer positioned on one lexeme at a time
pub trait Scanner<'a> {
    /// Advance to the next lexeme and return its kind. Returns
    /// [`LexemeKind::Eof`] once the input is exhausted, and keeps doing so.
    fn next(&mut self) -> LexemeKind;

    fn kind(&self) -> LexemeKind;

    fn text(&self) -> &'a str;

    /// Byte offset where the current lexeme starts
    fn last_pos(&self) -> usize;
}

/// A lexer and parser pair under test
pub trait Grammar {
    type Lexer<'a>: Scanner<'a>;
    type Error: fmt::Display;

    /// A fresh scanner over `source`
    fn scanner<'a>(&self, source: &'a str) -> Self::Lexer<'a>;

    /// Parse everything `scanner` yields
    fn parse<'a>(&self, scanner: Self::Lexer<'a>) -> Result<AstNode<'a>, Self::Error>;
}
