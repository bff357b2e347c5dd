/// Expected tree shape, built from fixture notation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MiniNode<'a> {
    /// A name or a terminal's text. Text starting with `(` or `)` is a
    /// literal character, never grouping.
    Leaf(&'a str),
    /// Node name followed by its children. Empty means an elided optional.
    Interior(Vec<MiniNode<'a>>),
}

impl<'a> MiniNode<'a> {
    pub fn node(name: &'a str, children: Vec<MiniNode<'a>>) -> Self {
        let mut parts = Vec::with_capacity(children.len() + 1);
        parts.push(MiniNode::Leaf(name));
        parts.extend(children);
        MiniNode::Interior(parts)
    }

    pub fn empty() -> Self {
        MiniNode::Interior(Vec::new())
    }
}

/// A terminal as recorded from the lexer or carried by the parser
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub text: &'a str,
    /// Byte offset of `text` in the source
    pub pos: usize,
}

/// Tree produced by the parser under test
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AstNode<'a> {
    /// Non-terminal
    Node {
        name: &'a str,
        children: Vec<AstNode<'a>>,
    },
    /// Elided optional clause, e.g. a missing semicolon
    Empty,
    /// Terminal consumed from the token stream
    Token(Token<'a>),
}

impl<'a> AstNode<'a> {
    pub fn node(name: &'a str, children: Vec<AstNode<'a>>) -> Self {
        AstNode::Node { name, children }
    }

    pub fn token(text: &'a str, pos: usize) -> Self {
        AstNode::Token(Token { text, pos })
    }
}

impl<'a> From<Token<'a>> for AstNode<'a> {
    fn from(token: Token<'a>) -> Self {
        AstNode::Token(token)
    }
}

/// Classification of the lexeme a scanner is positioned on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexemeKind {
    Whitespace,
    Newline,
    Comment,
    Number,
    Identifier,
    Keyword,
    Punctuation,
    String,
    Error,
    Eof,
}

impl LexemeKind {
    /// Whether the lexeme is a terminal a parser consumes
    pub fn is_token(self) -> bool {
        matches!(
            self,
            LexemeKind::Number
                | LexemeKind::Identifier
                | LexemeKind::Keyword
                | LexemeKind::Punctuation
                | LexemeKind::String
        )
    }
}
