//! Recursive-descent parser for the JavaScript subset.
//!
//! Nodes are name-first: `binary(left op right)`, `call(callee ( args ))`.
//! Every terminal is kept as a token, and a semicolon left out by automatic
//! insertion becomes an empty `;` node.

use crate::ast::{AstNode, LexemeKind, Token};
use crate::error::ParseError;
use crate::lexer::JsLexer;
use crate::subject::{Grammar, Scanner};

/// The significant token the parser is looking at
#[derive(Debug, Clone, Copy)]
struct Lookahead<'a> {
    kind: LexemeKind,
    token: Token<'a>,
    /// A line break separates this token from the previous one
    newline_before: bool,
}

pub struct JsParser<'a, S> {
    scanner: S,
    current: Lookahead<'a>,
}

impl<'a, S: Scanner<'a>> JsParser<'a, S> {
    pub fn new(scanner: S) -> Result<Self, ParseError> {
        let mut parser = Self {
            scanner,
            current: Lookahead {
                kind: LexemeKind::Eof,
                token: Token { text: "", pos: 0 },
                newline_before: false,
            },
        };
        parser.current = parser.advance()?;
        Ok(parser)
    }

    /// Skip trivia up to the next token
    fn advance(&mut self) -> Result<Lookahead<'a>, ParseError> {
        let mut newline_before = false;
        loop {
            let kind = self.scanner.next();
            let token = Token {
                text: self.scanner.text(),
                pos: self.scanner.last_pos(),
            };
            match kind {
                LexemeKind::Error => {
                    return Err(ParseError {
                        message: format!("Unexpected character {:?}", token.text),
                        pos: token.pos,
                    });
                }
                LexemeKind::Newline => newline_before = true,
                LexemeKind::Comment => {
                    newline_before |=
                        token.text.contains(['\n', '\r', '\u{2028}', '\u{2029}']);
                }
                LexemeKind::Whitespace => {}
                _ => {
                    return Ok(Lookahead {
                        kind,
                        token,
                        newline_before,
                    });
                }
            }
        }
    }

    fn error<T>(&self, expected: &str) -> Result<T, ParseError> {
        let found = match self.current.kind {
            LexemeKind::Eof => "end of input".to_string(),
            _ => format!("{:?}", self.current.token.text),
        };
        Err(ParseError {
            message: format!("Expected {expected}, found {found}"),
            pos: self.current.token.pos,
        })
    }

    fn at_eof(&self) -> bool {
        self.current.kind == LexemeKind::Eof
    }

    /// Current token is the punctuator or keyword `text`
    fn at(&self, text: &str) -> bool {
        matches!(
            self.current.kind,
            LexemeKind::Punctuation | LexemeKind::Keyword
        ) && self.current.token.text == text
    }

    fn at_any(&self, texts: &[&str]) -> bool {
        texts.iter().any(|text| self.at(text))
    }

    fn bump(&mut self) -> Result<AstNode<'a>, ParseError> {
        let token = self.current.token;
        self.current = self.advance()?;
        Ok(token.into())
    }

    fn expect(&mut self, text: &str) -> Result<AstNode<'a>, ParseError> {
        if self.at(text) {
            self.bump()
        } else {
            self.error(&format!("{text:?}"))
        }
    }

    fn identifier(&mut self) -> Result<AstNode<'a>, ParseError> {
        if self.current.kind == LexemeKind::Identifier {
            self.bump()
        } else {
            self.error("identifier")
        }
    }

    pub fn parse_program(mut self) -> Result<AstNode<'a>, ParseError> {
        let mut statements = Vec::new();
        while !self.at_eof() {
            statements.push(self.statement()?);
        }
        Ok(AstNode::node("program", statements))
    }

    fn statement(&mut self) -> Result<AstNode<'a>, ParseError> {
        if self.at(";") {
            return Ok(AstNode::node("empty", vec![self.bump()?]));
        }
        if self.at("{") {
            return self.block();
        }
        if self.at("var") {
            return self.var_statement();
        }
        if self.at("if") {
            return self.if_statement();
        }
        if self.at("return") {
            let keyword = self.bump()?;
            let value = if self.can_insert_semicolon() || self.at(";") {
                AstNode::Empty
            } else {
                self.expression()?
            };
            return Ok(AstNode::node("return", vec![keyword, value, self.semicolon()?]));
        }
        if self.at("throw") {
            let keyword = self.bump()?;
            let value = self.expression()?;
            return Ok(AstNode::node("throw", vec![keyword, value, self.semicolon()?]));
        }

        let value = self.expression()?;
        Ok(AstNode::node("expression", vec![value, self.semicolon()?]))
    }

    fn can_insert_semicolon(&self) -> bool {
        self.at_eof() || self.at("}") || self.current.newline_before
    }

    fn semicolon(&mut self) -> Result<AstNode<'a>, ParseError> {
        if self.at(";") {
            self.bump()
        } else if self.can_insert_semicolon() {
            Ok(AstNode::node(";", vec![]))
        } else {
            self.error("\";\"")
        }
    }

    fn block(&mut self) -> Result<AstNode<'a>, ParseError> {
        let mut parts = vec![self.expect("{")?];
        self.statements_until_close(&mut parts)?;
        Ok(AstNode::node("block", parts))
    }

    fn statements_until_close(&mut self, parts: &mut Vec<AstNode<'a>>) -> Result<(), ParseError> {
        while !self.at("}") {
            if self.at_eof() {
                return self.error("\"}\"");
            }
            parts.push(self.statement()?);
        }
        parts.push(self.bump()?);
        Ok(())
    }

    fn var_statement(&mut self) -> Result<AstNode<'a>, ParseError> {
        let mut parts = vec![self.expect("var")?, self.var_declaration()?];
        while self.at(",") {
            parts.push(self.bump()?);
            parts.push(self.var_declaration()?);
        }
        parts.push(self.semicolon()?);
        Ok(AstNode::node("var", parts))
    }

    fn var_declaration(&mut self) -> Result<AstNode<'a>, ParseError> {
        let mut parts = vec![self.identifier()?];
        if self.at("=") {
            parts.push(self.bump()?);
            parts.push(self.assignment()?);
        }
        Ok(AstNode::node("varDecl", parts))
    }

    fn if_statement(&mut self) -> Result<AstNode<'a>, ParseError> {
        let mut parts = vec![
            self.expect("if")?,
            self.expect("(")?,
            self.expression()?,
            self.expect(")")?,
            self.statement()?,
        ];
        if self.at("else") {
            parts.push(self.bump()?);
            parts.push(self.statement()?);
        }
        Ok(AstNode::node("if", parts))
    }

    fn expression(&mut self) -> Result<AstNode<'a>, ParseError> {
        let mut expr = self.assignment()?;
        while self.at(",") {
            let comma = self.bump()?;
            let right = self.assignment()?;
            expr = AstNode::node("comma", vec![expr, comma, right]);
        }
        Ok(expr)
    }

    fn assignment(&mut self) -> Result<AstNode<'a>, ParseError> {
        let target = self.conditional()?;
        if self.at_any(&[
            "=", "+=", "-=", "*=", "/=", "%=", "<<=", ">>=", ">>>=", "&=", "|=", "^=",
        ]) {
            let op = self.bump()?;
            let value = self.assignment()?;
            return Ok(AstNode::node("assign", vec![target, op, value]));
        }
        Ok(target)
    }

    fn conditional(&mut self) -> Result<AstNode<'a>, ParseError> {
        let test = self.binary(0)?;
        if !self.at("?") {
            return Ok(test);
        }
        let question = self.bump()?;
        let then = self.assignment()?;
        let colon = self.expect(":")?;
        let otherwise = self.assignment()?;
        Ok(AstNode::node(
            "ternary",
            vec![test, question, then, colon, otherwise],
        ))
    }

    fn binary_precedence(&self) -> Option<u8> {
        if !matches!(
            self.current.kind,
            LexemeKind::Punctuation | LexemeKind::Keyword
        ) {
            return None;
        }
        let precedence = match self.current.token.text {
            "||" => 1,
            "&&" => 2,
            "|" => 3,
            "^" => 4,
            "&" => 5,
            "==" | "!=" | "===" | "!==" => 6,
            "<" | ">" | "<=" | ">=" | "instanceof" | "in" => 7,
            "<<" | ">>" | ">>>" => 8,
            "+" | "-" => 9,
            "*" | "/" | "%" => 10,
            _ => return None,
        };
        Some(precedence)
    }

    /// Left-associative operators binding at least as tight as `min`
    fn binary(&mut self, min: u8) -> Result<AstNode<'a>, ParseError> {
        let mut left = self.unary()?;
        while let Some(precedence) = self.binary_precedence() {
            if precedence < min {
                break;
            }
            let op = self.bump()?;
            let right = self.binary(precedence + 1)?;
            left = AstNode::node("binary", vec![left, op, right]);
        }
        Ok(left)
    }

    fn unary(&mut self) -> Result<AstNode<'a>, ParseError> {
        if self.at_any(&["++", "--", "+", "-", "!", "~", "typeof", "delete", "void"]) {
            let op = self.bump()?;
            let operand = self.unary()?;
            return Ok(AstNode::node("unary", vec![op, operand]));
        }

        let operand = self.left_hand_side()?;
        if self.at_any(&["++", "--"]) && !self.current.newline_before {
            let op = self.bump()?;
            return Ok(AstNode::node("postfix", vec![operand, op]));
        }
        Ok(operand)
    }

    fn left_hand_side(&mut self) -> Result<AstNode<'a>, ParseError> {
        let head = if self.at("new") {
            self.new_expression()?
        } else {
            self.primary()?
        };
        self.suffixes(head, true)
    }

    /// `new callee`, with an argument list when one follows
    fn new_expression(&mut self) -> Result<AstNode<'a>, ParseError> {
        let mut parts = vec![self.expect("new")?];
        let callee = if self.at("new") {
            self.new_expression()?
        } else {
            self.primary()?
        };
        parts.push(self.suffixes(callee, false)?);
        if self.at("(") {
            self.arguments(&mut parts)?;
        }
        Ok(AstNode::node("new", parts))
    }

    fn suffixes(&mut self, mut expr: AstNode<'a>, calls: bool) -> Result<AstNode<'a>, ParseError> {
        loop {
            if self.at(".") {
                let dot = self.bump()?;
                let property = self.identifier()?;
                expr = AstNode::node("dot", vec![expr, dot, property]);
            } else if self.at("[") {
                let parts = vec![
                    expr,
                    self.bump()?,
                    self.expression()?,
                    self.expect("]")?,
                ];
                expr = AstNode::node("bracket", parts);
            } else if calls && self.at("(") {
                let mut parts = vec![expr];
                self.arguments(&mut parts)?;
                expr = AstNode::node("call", parts);
            } else {
                return Ok(expr);
            }
        }
    }

    fn arguments(&mut self, parts: &mut Vec<AstNode<'a>>) -> Result<(), ParseError> {
        parts.push(self.expect("(")?);
        if !self.at(")") {
            parts.push(self.assignment()?);
            while self.at(",") {
                parts.push(self.bump()?);
                parts.push(self.assignment()?);
            }
        }
        parts.push(self.expect(")")?);
        Ok(())
    }

    fn primary(&mut self) -> Result<AstNode<'a>, ParseError> {
        let name = match (self.current.kind, self.current.token.text) {
            (LexemeKind::Number, _) => "number",
            (LexemeKind::String, _) => "string",
            (LexemeKind::Identifier, _) => "identifier",
            (LexemeKind::Keyword, "this") => "this",
            (LexemeKind::Keyword, "null") => "null",
            (LexemeKind::Keyword, "true" | "false") => "boolean",
            (LexemeKind::Keyword, "function") => return self.function_expression(),
            (LexemeKind::Punctuation, "(") => {
                let parts = vec![self.bump()?, self.expression()?, self.expect(")")?];
                return Ok(AstNode::node("parens", parts));
            }
            _ => return self.error("expression"),
        };
        Ok(AstNode::node(name, vec![self.bump()?]))
    }

    /// `function name? ( params ) { body }`; a missing name is an empty node
    fn function_expression(&mut self) -> Result<AstNode<'a>, ParseError> {
        let mut parts = vec![self.expect("function")?];
        parts.push(if self.current.kind == LexemeKind::Identifier {
            self.bump()?
        } else {
            AstNode::Empty
        });

        parts.push(self.expect("(")?);
        if !self.at(")") {
            parts.push(self.identifier()?);
            while self.at(",") {
                parts.push(self.bump()?);
                parts.push(self.identifier()?);
            }
        }
        parts.push(self.expect(")")?);

        parts.push(self.expect("{")?);
        self.statements_until_close(&mut parts)?;
        Ok(AstNode::node("functionExpr", parts))
    }
}

/// Parse a whole program from `scanner`
pub fn parse<'a, S: Scanner<'a>>(scanner: S) -> Result<AstNode<'a>, ParseError> {
    JsParser::new(scanner)?.parse_program()
}

/// The reference lexer and parser as a [`Grammar`]
#[derive(Debug, Default, Clone, Copy)]
pub struct JsGrammar;

impl Grammar for JsGrammar {
    type Lexer<'a> = JsLexer<'a>;
    type Error = ParseError;

    fn scanner<'a>(&self, source: &'a str) -> JsLexer<'a> {
        JsLexer::new(source)
    }

    fn parse<'a>(&self, scanner: Self::Lexer<'a>) -> Result<AstNode<'a>, ParseError> {
        parse(scanner)
    }
}
