//! # Simple Markdown Rules
//!
//! Inline rules for the usual text styles. Style nodes carry a payload built
//! from [`TextStyle`], so any style type that can be made from one works.
//!
//! The order returned by [`simple_markdown_rules`] matters: escapes first so
//! `\*` never opens a style, bold before italics so `**` is not read as two
//! italic markers, and the catch-all text rule last.

use std::{fmt, sync::Arc, sync::LazyLock};

use crate::{
    node::Node,
    parser::{
        ParseError, Parser,
        pattern::{Captures, Pattern},
        rule::{BlockRule, Rule, RuleRef},
        spec::ParseSpec,
    },
};

/// The built-in inline styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextStyle {
    Bold,
    Italic,
    Underline,
    Strikethrough,
}

pub static PATTERN_BOLD: LazyLock<Pattern> = LazyLock::new(|| {
    Pattern::new(r"\*\*([\s\S]+?)\*\*(?P<ahead>[^*]|$)").expect("Invalid bold pattern")
});

pub static PATTERN_UNDERLINE: LazyLock<Pattern> = LazyLock::new(|| {
    Pattern::new(r"__([\s\S]+?)__(?P<ahead>[^_]|$)").expect("Invalid underline pattern")
});

pub static PATTERN_STRIKETHRU: LazyLock<Pattern> = LazyLock::new(|| {
    Pattern::new(r"~~(\S(?:[\s\S]*?\S)??)~~").expect("Invalid strikethrough pattern")
});

pub static PATTERN_NEWLINE: LazyLock<Pattern> =
    LazyLock::new(|| Pattern::new(r"(?:\n *)*\n").expect("Invalid newline pattern"));

/// Stops before anything another rule might want: punctuation, a newline,
/// a hard break, or something that looks like a URL scheme.
pub static PATTERN_TEXT: LazyLock<Pattern> = LazyLock::new(|| {
    Pattern::new(r"[\s\S]+?(?P<ahead>[^0-9A-Za-z\s\x{00c0}-\x{10ffff}]|\n| {2,}\n|\w+:\S|$)")
        .expect("Invalid text pattern")
});

pub static PATTERN_ESCAPE: LazyLock<Pattern> =
    LazyLock::new(|| Pattern::new(r"\\([^0-9A-Za-z\s])").expect("Invalid escape pattern"));

/// `_italic_` (group 1) or `*italic*` (group 2).
pub static PATTERN_ITALICS: LazyLock<Pattern> = LazyLock::new(|| {
    Pattern::new(concat!(
        r"\b_((?:__|\\[\s\S]|[^\\_])+?)_\b",
        "|",
        r"\*((?:\*\*|[^\s*])(?:\*\*|\s+(?:[^*\s]|\*\*)|[^\s*])*?)\*(?P<ahead>[^*]|$)",
    ))
    .expect("Invalid italics pattern")
});

/// Emits the matched text as a text leaf.
#[derive(Debug, Clone)]
pub struct TextRule {
    pattern: Pattern,
}

impl TextRule {
    pub fn new(pattern: Pattern) -> Self {
        Self { pattern }
    }
}

impl<R, T, S: Clone> Rule<R, T, S> for TextRule {
    fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    fn parse(
        &self,
        captures: &Captures<'_>,
        _parser: &Parser<R, T, S>,
        state: &S,
    ) -> Result<ParseSpec<R, T, S>, ParseError> {
        Ok(ParseSpec::terminal(
            Node::text(captures.as_str()),
            state.clone(),
        ))
    }
}

/// Emits the escaped character without its backslash.
#[derive(Debug, Clone)]
pub struct EscapeRule;

impl<R, T, S: Clone> Rule<R, T, S> for EscapeRule {
    fn pattern(&self) -> &Pattern {
        &PATTERN_ESCAPE
    }

    fn parse(
        &self,
        captures: &Captures<'_>,
        _parser: &Parser<R, T, S>,
        state: &S,
    ) -> Result<ParseSpec<R, T, S>, ParseError> {
        Ok(ParseSpec::terminal(
            Node::text(captures.group(1)?),
            state.clone(),
        ))
    }
}

/// Collapses a run of blank lines into a single `"\n"` leaf.
#[derive(Debug, Clone)]
pub struct NewlineRule;

impl<R, T, S: Clone> Rule<R, T, S> for NewlineRule {
    fn pattern(&self) -> &Pattern {
        &PATTERN_NEWLINE
    }

    fn parse(
        &self,
        _captures: &Captures<'_>,
        _parser: &Parser<R, T, S>,
        state: &S,
    ) -> Result<ParseSpec<R, T, S>, ParseError> {
        Ok(ParseSpec::terminal(Node::text("\n"), state.clone()))
    }
}

type StyleFactory<T> = Arc<dyn Fn() -> Vec<T> + Send + Sync>;

/// Wraps the pattern's first group in a style node and parses it further.
pub struct StyleRule<T> {
    pattern: Pattern,
    styles: StyleFactory<T>,
}

impl<T> StyleRule<T> {
    pub fn new(pattern: Pattern, styles: impl Fn() -> Vec<T> + Send + Sync + 'static) -> Self {
        Self {
            pattern,
            styles: Arc::new(styles),
        }
    }
}

impl<T> fmt::Debug for StyleRule<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StyleRule")
            .field("pattern", &self.pattern.as_str())
            .finish_non_exhaustive()
    }
}

impl<R, T, S: Clone> Rule<R, T, S> for StyleRule<T> {
    fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    fn parse(
        &self,
        captures: &Captures<'_>,
        _parser: &Parser<R, T, S>,
        state: &S,
    ) -> Result<ParseSpec<R, T, S>, ParseError> {
        Ok(ParseSpec::nonterminal(
            Node::style((self.styles)(), Vec::new()),
            state.clone(),
            captures.span(1)?,
        ))
    }
}

/// Italics, where the content sits in whichever alternative matched.
#[derive(Debug, Clone)]
pub struct ItalicsRule;

impl<R, T: From<TextStyle>, S: Clone> Rule<R, T, S> for ItalicsRule {
    fn pattern(&self) -> &Pattern {
        &PATTERN_ITALICS
    }

    fn parse(
        &self,
        captures: &Captures<'_>,
        _parser: &Parser<R, T, S>,
        state: &S,
    ) -> Result<ParseSpec<R, T, S>, ParseError> {
        let span = match captures.range(2) {
            Some(asterisk) if !asterisk.is_empty() => asterisk,
            _ => captures.span(1)?,
        };
        Ok(ParseSpec::nonterminal(
            Node::style(vec![T::from(TextStyle::Italic)], Vec::new()),
            state.clone(),
            span,
        ))
    }
}

/// A rule styling the first group of `pattern` with whatever `styles` returns.
pub fn style_rule<R, T, S>(
    pattern: Pattern,
    styles: impl Fn() -> Vec<T> + Send + Sync + 'static,
) -> RuleRef<R, T, S>
where
    T: 'static,
    S: Clone,
{
    Arc::new(StyleRule::new(pattern, styles))
}

fn text_style_rule<R, T, S>(pattern: &Pattern, style: TextStyle) -> RuleRef<R, T, S>
where
    T: From<TextStyle> + 'static,
    S: Clone,
{
    style_rule(pattern.clone(), move || vec![T::from(style)])
}

pub fn escape_rule<R, T, S: Clone>() -> RuleRef<R, T, S> {
    Arc::new(EscapeRule)
}

pub fn newline_rule<R, T, S: Clone>() -> RuleRef<R, T, S> {
    Arc::new(BlockRule::new(NewlineRule))
}

pub fn bold_rule<R, T: From<TextStyle> + 'static, S: Clone>() -> RuleRef<R, T, S> {
    text_style_rule(&PATTERN_BOLD, TextStyle::Bold)
}

pub fn underline_rule<R, T: From<TextStyle> + 'static, S: Clone>() -> RuleRef<R, T, S> {
    text_style_rule(&PATTERN_UNDERLINE, TextStyle::Underline)
}

pub fn italics_rule<R, T: From<TextStyle>, S: Clone>() -> RuleRef<R, T, S> {
    Arc::new(ItalicsRule)
}

pub fn strikethrough_rule<R, T: From<TextStyle> + 'static, S: Clone>() -> RuleRef<R, T, S> {
    text_style_rule(&PATTERN_STRIKETHRU, TextStyle::Strikethrough)
}

pub fn text_rule<R, T, S: Clone>() -> RuleRef<R, T, S> {
    Arc::new(TextRule::new(PATTERN_TEXT.clone()))
}

/// Escape, newline, bold, underline, italics, strikethrough and, if asked, text.
pub fn simple_markdown_rules<R, T, S>(include_text_rule: bool) -> Vec<RuleRef<R, T, S>>
where
    T: From<TextStyle> + 'static,
    S: Clone,
{
    let mut rules = vec![
        escape_rule(),
        newline_rule(),
        bold_rule(),
        underline_rule(),
        italics_rule(),
        strikethrough_rule(),
    ];
    if include_text_rule {
        rules.push(text_rule());
    }
    rules
}
