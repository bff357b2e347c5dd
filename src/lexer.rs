use pest::Parser;
use pest_derive::Parser;

use crate::ast::LexemeKind;
use crate::subject::Scanner;

#[derive(Parser)]
#[grammar = "src/js.pest"]
struct LexemeParser;

/// Lexer for the JavaScript subset. Each call to [`Scanner::next`] matches
/// one lexeme at the current offset; unmatched characters become single
/// character error lexemes.
#[derive(Debug, Clone)]
pub struct JsLexer<'a> {
    source: &'a str,
    /// Offset just past the current lexeme
    pos: usize,
    kind: LexemeKind,
    text: &'a str,
    last_pos: usize,
}

impl<'a> JsLexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            pos: 0,
            kind: LexemeKind::Eof,
            text: "",
            last_pos: 0,
        }
    }

    fn scan(rest: &str) -> (LexemeKind, usize) {
        let matched = LexemeParser::parse(Rule::lexeme, rest)
            .ok()
            .and_then(|mut pairs| pairs.next())
            .and_then(|lexeme| lexeme.into_inner().next());

        match matched {
            Some(pair) => (Self::kind_of(pair.as_rule()), pair.as_str().len()),
            None => (
                LexemeKind::Error,
                rest.chars().next().map_or(0, char::len_utf8),
            ),
        }
    }

    fn kind_of(rule: Rule) -> LexemeKind {
        match rule {
            Rule::whitespace => LexemeKind::Whitespace,
            Rule::newline => LexemeKind::Newline,
            Rule::comment => LexemeKind::Comment,
            Rule::number => LexemeKind::Number,
            Rule::string => LexemeKind::String,
            Rule::keyword => LexemeKind::Keyword,
            Rule::identifier => LexemeKind::Identifier,
            Rule::punctuation => LexemeKind::Punctuation,
            _ => LexemeKind::Error,
        }
    }
}

impl<'a> Scanner<'a> for JsLexer<'a> {
    fn next(&mut self) -> LexemeKind {
        self.last_pos = self.pos;
        let rest = &self.source[self.pos..];
        let (kind, len) = if rest.is_empty() {
            (LexemeKind::Eof, 0)
        } else {
            Self::scan(rest)
        };

        self.kind = kind;
        self.text = &rest[..len];
        self.pos += len;
        kind
    }

    fn kind(&self) -> LexemeKind {
        self.kind
    }

    fn text(&self) -> &'a str {
        self.text
    }

    fn last_pos(&self) -> usize {
        self.last_pos
    }
}
