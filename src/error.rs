use thiserror::Error;

/// A broken fixture string. Aborts the test case.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FixtureError {
    #[error("Mismatched ` in {fixture}")]
    UnterminatedLiteral { fixture: String },
    #[error("Mismatched parentheses in {fixture}")]
    MismatchedParens { fixture: String },
    #[error("Not expecting {unit} in {fixture}")]
    UnexpectedTopLevel { unit: String, fixture: String },
    #[error("Empty fixture")]
    Empty,
}

/// A soft failure delivered to a [`Reporter`](crate::report::Reporter)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Failure {
    #[error("Lexer error at {pos}")]
    LexerError { pos: usize },
    #[error("Parse error: {message}")]
    ParseError { message: String },
    #[error("Expected parse failure for {code:?}")]
    UnexpectedSuccess { code: String },
    #[error("Not a node name: {name:?}")]
    NotANodeName { name: String },
    #[error("Too many tokens: {count}")]
    TooManyTokens { count: usize },
    #[error("Too few tokens: {count}")]
    TooFewTokens { count: usize },
    #[error("Unknown AST part: {part}")]
    UnknownPart { part: String },
    #[error("expected {expected}, got {actual}")]
    NotEqual { actual: String, expected: String },
}

/// Rejection from the reference JavaScript parser
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at {pos}")]
pub struct ParseError {
    pub message: String,
    pub pos: usize,
}
