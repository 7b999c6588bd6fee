//! Rules: a pattern plus the code that turns its match into a [`ParseSpec`].

use std::sync::Arc;

use super::{ParseError, Parser, pattern::Captures, pattern::Pattern, spec::ParseSpec};

/// One alternative the parser may try at the current position.
///
/// Rules are shared between parsers and threads, so they must not keep
/// mutable state of their own; anything that changes while parsing belongs
/// in `S`.
pub trait Rule<R, T, S>: Send + Sync {
    fn pattern(&self) -> &Pattern;

    /// Decides whether this rule applies to the start of `source`.
    ///
    /// `last_capture` is the text consumed by the previous successful match
    /// anywhere in the parse (not only among siblings), or `None` before the
    /// first match.
    fn try_match<'s>(
        &self,
        source: &'s str,
        _last_capture: Option<&str>,
        _state: &S,
    ) -> Option<Captures<'s>> {
        self.pattern().match_start(source)
    }

    /// Builds the node for a successful match.
    ///
    /// `parser` is available for rules that parse part of their match eagerly
    /// with a different rule set.
    fn parse(
        &self,
        captures: &Captures<'_>,
        parser: &Parser<R, T, S>,
        state: &S,
    ) -> Result<ParseSpec<R, T, S>, ParseError>;
}

pub type RuleRef<R, T, S> = Arc<dyn Rule<R, T, S>>;

/// True when the previous capture ended a line, or nothing was captured yet.
pub fn starts_line(last_capture: Option<&str>) -> bool {
    last_capture.is_none_or(|capture| capture.ends_with('\n'))
}

/// Restricts a rule to the start of a line.
#[derive(Debug, Clone)]
pub struct BlockRule<X>(X);

impl<X> BlockRule<X> {
    pub fn new(inner: X) -> Self {
        Self(inner)
    }

    pub fn inner(&self) -> &X {
        &self.0
    }
}

impl<R, T, S, X: Rule<R, T, S>> Rule<R, T, S> for BlockRule<X> {
    fn pattern(&self) -> &Pattern {
        self.0.pattern()
    }

    fn try_match<'s>(
        &self,
        source: &'s str,
        last_capture: Option<&str>,
        state: &S,
    ) -> Option<Captures<'s>> {
        if !starts_line(last_capture) {
            return None;
        }
        self.0.try_match(source, last_capture, state)
    }

    fn parse(
        &self,
        captures: &Captures<'_>,
        parser: &Parser<R, T, S>,
        state: &S,
    ) -> Result<ParseSpec<R, T, S>, ParseError> {
        self.0.parse(captures, parser, state)
    }
}
