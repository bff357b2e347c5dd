use crate::ast::{AstNode, MiniNode, Token};
use crate::error::Failure;
use crate::report::Reporter;

/// Walks an actual AST, checking each terminal against the recorded token
/// stream, and flattens it into a [`MiniNode`] tree.
///
/// Every terminal must match the next recorded token exactly once and in
/// order; [`Reconciler::finish`] checks nothing was left over.
pub struct Reconciler<'s, 'a, R> {
    source: &'a str,
    recorded: &'s [Token<'a>],
    next: usize,
    reporter: &'s mut R,
}

impl<'s, 'a, R: Reporter> Reconciler<'s, 'a, R> {
    pub fn new(source: &'a str, recorded: &'s [Token<'a>], reporter: &'s mut R) -> Self {
        Self {
            source,
            recorded,
            next: 0,
            reporter,
        }
    }

    /// Number of terminals visited so far
    pub fn consumed(&self) -> usize {
        self.next
    }

    pub fn reconcile(&mut self, part: &AstNode<'a>) -> MiniNode<'a> {
        match part {
            AstNode::Empty => MiniNode::empty(),
            AstNode::Node { name, children } => {
                if name.is_empty() {
                    self.reporter.fail(Failure::NotANodeName {
                        name: name.to_string(),
                    });
                }
                let mut parts = Vec::with_capacity(children.len() + 1);
                parts.push(MiniNode::Leaf(*name));
                parts.extend(children.iter().map(|child| self.reconcile(child)));
                MiniNode::Interior(parts)
            }
            AstNode::Token(token) if token.text.is_empty() => {
                self.reporter.fail(Failure::UnknownPart {
                    part: format!("{token:?}"),
                });
                MiniNode::empty()
            }
            AstNode::Token(token) => self.terminal(token),
        }
    }

    fn terminal(&mut self, token: &Token<'a>) -> MiniNode<'a> {
        let index = self.next;
        self.next += 1;

        let Some(reference) = self.recorded.get(index) else {
            self.reporter
                .fail(Failure::TooManyTokens { count: index + 1 });
            return MiniNode::Leaf(token.text);
        };
        log::trace!("token {index}: {:?} at {}", token.text, token.pos);

        self.reporter.equal(token.text, reference.text);
        self.reporter.equal(&token.pos, &reference.pos);
        let in_source = token
            .pos
            .checked_add(token.text.len())
            .and_then(|end| self.source.get(token.pos..end))
            .unwrap_or_default();
        self.reporter.equal(in_source, token.text);

        MiniNode::Leaf(token.text)
    }

    /// Report a shortfall if any recorded token was never visited
    pub fn finish(self) {
        if self.next < self.recorded.len() {
            self.reporter
                .fail(Failure::TooFewTokens { count: self.next });
        }
    }
}
