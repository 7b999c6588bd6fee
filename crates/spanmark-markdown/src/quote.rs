//! Block quotes: `> one line` or `>>> everything that follows`.

use std::{fmt, sync::Arc, sync::LazyLock};

use spanmark_core::{
    Captures, Node, ParseError, ParseSpec, Parser, Pattern, Rule, parser::rule::starts_line,
};

/// Parse state that knows whether it is inside a block quote.
///
/// Quote rules never change the state they are given; they derive a new one
/// for the quoted content.
pub trait BlockQuoteState: Clone {
    fn is_in_quote(&self) -> bool;

    #[must_use]
    fn with_in_quote(&self, in_quote: bool) -> Self;
}

impl BlockQuoteState for bool {
    fn is_in_quote(&self) -> bool {
        *self
    }

    fn with_in_quote(&self, in_quote: bool) -> Self {
        in_quote
    }
}

/// `>>>` quotes the rest of the input (group 1); `>` quotes one line (group 2).
///
/// A single `>` must not be followed by `>>`; [`BlockQuoteRule`] checks that
/// after matching.
pub static PATTERN_BLOCK_QUOTE: LazyLock<Pattern> = LazyLock::new(|| {
    Pattern::new(r"(?s) *>>> ?(.+)| *> ?([^\n]+\n?)").expect("Invalid block quote pattern")
});

pub struct BlockQuoteRule<T> {
    styles: Arc<dyn Fn() -> Vec<T> + Send + Sync>,
}

impl<T> BlockQuoteRule<T> {
    pub fn new(styles: impl Fn() -> Vec<T> + Send + Sync + 'static) -> Self {
        Self {
            styles: Arc::new(styles),
        }
    }
}

impl<T> fmt::Debug for BlockQuoteRule<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockQuoteRule").finish_non_exhaustive()
    }
}

/// True when a single-line quote marker is really the start of `>>>`.
fn is_partial_multiline_marker(source: &str) -> bool {
    let marker = source.trim_start_matches(' ');
    marker.strip_prefix('>').is_some_and(|rest| rest.starts_with(">>"))
}

impl<R, T, S: BlockQuoteState> Rule<R, T, S> for BlockQuoteRule<T> {
    fn pattern(&self) -> &Pattern {
        &PATTERN_BLOCK_QUOTE
    }

    fn try_match<'s>(
        &self,
        source: &'s str,
        last_capture: Option<&str>,
        state: &S,
    ) -> Option<Captures<'s>> {
        if state.is_in_quote() || !starts_line(last_capture) {
            return None;
        }
        let captures = PATTERN_BLOCK_QUOTE.match_start(source)?;
        if captures.range(1).is_none() && is_partial_multiline_marker(source) {
            return None;
        }
        Some(captures)
    }

    fn parse(
        &self,
        captures: &Captures<'_>,
        _parser: &Parser<R, T, S>,
        state: &S,
    ) -> Result<ParseSpec<R, T, S>, ParseError> {
        let span = match captures.range(1) {
            Some(multiline) => multiline,
            None => captures.span(2)?,
        };
        Ok(ParseSpec::nonterminal(
            Node::style((self.styles)(), Vec::new()),
            state.with_in_quote(true),
            span,
        ))
    }
}
