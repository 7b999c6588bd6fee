use std::{fmt, ops::Range};

use crate::node::Node;

/// What a rule produced for one match.
///
/// A terminal spec is final. A nonterminal spec also names a span, relative
/// to the input the rule matched against, that the parser will parse next
/// and attach under `root`, handing it `state`.
pub struct ParseSpec<R, T, S> {
    pub root: Node<R, T>,
    pub state: S,
    span: Option<Range<usize>>,
}

impl<R, T, S> ParseSpec<R, T, S> {
    pub fn terminal(root: Node<R, T>, state: S) -> Self {
        Self {
            root,
            state,
            span: None,
        }
    }

    pub fn nonterminal(root: Node<R, T>, state: S, span: Range<usize>) -> Self {
        Self {
            root,
            state,
            span: Some(span),
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.span.is_none()
    }

    /// The span still to be parsed, for nonterminal specs.
    pub fn span(&self) -> Option<Range<usize>> {
        self.span.clone()
    }

    pub fn into_parts(self) -> (Node<R, T>, S, Option<Range<usize>>) {
        (self.root, self.state, self.span)
    }
}

impl<R, T: fmt::Debug, S: fmt::Debug> fmt::Debug for ParseSpec<R, T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParseSpec")
            .field("root", &self.root)
            .field("state", &self.state)
            .field("span", &self.span)
            .finish()
    }
}
