use crate::ast::{LexemeKind, Token};
use crate::error::Failure;
use crate::subject::Scanner;

/// Drive `scanner` to the end of input and collect its terminals in order.
///
/// Whitespace, newlines and comments are skipped. The first error lexeme
/// stops the recording.
pub fn record_tokens<'a, S: Scanner<'a>>(mut scanner: S) -> Result<Vec<Token<'a>>, Failure> {
    let mut tokens = Vec::new();
    loop {
        match scanner.next() {
            LexemeKind::Eof => break,
            LexemeKind::Error => {
                return Err(Failure::LexerError {
                    pos: scanner.last_pos(),
                });
            }
            kind if kind.is_token() => tokens.push(Token {
                text: scanner.text(),
                pos: scanner.last_pos(),
            }),
            _ => {}
        }
    }
    log::debug!("recorded {} tokens", tokens.len());
    Ok(tokens)
}
