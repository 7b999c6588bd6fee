//! Headers: `# Title` and underlined titles.
//!
//! Header styles are chosen by level. `#` headers use the number of `#`
//! characters; underlined headers are level 1 for `===` and level 2 for `---`.

use std::{fmt, sync::Arc, sync::LazyLock};

use spanmark_core::{
    Captures, Node, ParseError, ParseSpec, Parser, Pattern, Rule, RuleRef,
    parser::rule::starts_line,
    simple::{self, TextStyle},
};

/// `#`s, a space or tab, then the title up to the end of the line.
pub static PATTERN_HEADER_ITEM: LazyLock<Pattern> = LazyLock::new(|| {
    Pattern::new(r" *(#+)[ \t](.*) *(?P<ahead>\n|$)").expect("Invalid header pattern")
});

/// A title line followed by a line of three or more `=` or `-`.
pub static PATTERN_HEADER_ITEM_ALT: LazyLock<Pattern> = LazyLock::new(|| {
    Pattern::new(r"(?: \t)*(.+)\n *(=|-){3,} *(?P<ahead>\n|$)")
        .expect("Invalid underlined header pattern")
});

/// `Some title {class names}`
pub static PATTERN_HEADING_CLASS: LazyLock<Pattern> = LazyLock::new(|| {
    Pattern::new(r"(.*) \{([\w ]+)\}\s*$").expect("Invalid heading class pattern")
});

/// Maps a header level to its style.
pub type HeaderStyles<T> = Arc<dyn Fn(usize) -> T + Send + Sync>;

/// Maps a class name to its style, or `None` for unknown classes.
pub type ClassStyles<T> = Arc<dyn Fn(&str) -> Option<T> + Send + Sync>;

pub struct HeaderRule<T> {
    styles: HeaderStyles<T>,
}

impl<T> HeaderRule<T> {
    pub fn new(styles: impl Fn(usize) -> T + Send + Sync + 'static) -> Self {
        Self {
            styles: Arc::new(styles),
        }
    }
}

impl<T> fmt::Debug for HeaderRule<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeaderRule").finish_non_exhaustive()
    }
}

impl<R, T, S: Clone> Rule<R, T, S> for HeaderRule<T> {
    fn pattern(&self) -> &Pattern {
        &PATTERN_HEADER_ITEM
    }

    fn try_match<'s>(
        &self,
        source: &'s str,
        last_capture: Option<&str>,
        _state: &S,
    ) -> Option<Captures<'s>> {
        if !starts_line(last_capture) {
            return None;
        }
        PATTERN_HEADER_ITEM.match_start(source)
    }

    fn parse(
        &self,
        captures: &Captures<'_>,
        _parser: &Parser<R, T, S>,
        state: &S,
    ) -> Result<ParseSpec<R, T, S>, ParseError> {
        let level = captures.group(1)?.len();
        Ok(ParseSpec::nonterminal(
            Node::style(vec![(self.styles)(level)], Vec::new()),
            state.clone(),
            captures.span(2)?,
        ))
    }
}

fn underline_level(captures: &Captures<'_>) -> Result<usize, ParseError> {
    Ok(match captures.group(2)? {
        "=" => 1,
        _ => 2,
    })
}

/// A title underlined with `===` or `---`. Only the title is parsed further.
pub struct HeaderLineRule<T> {
    styles: HeaderStyles<T>,
}

impl<T> HeaderLineRule<T> {
    pub fn new(styles: impl Fn(usize) -> T + Send + Sync + 'static) -> Self {
        Self {
            styles: Arc::new(styles),
        }
    }
}

impl<T> fmt::Debug for HeaderLineRule<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeaderLineRule").finish_non_exhaustive()
    }
}

impl<R, T, S: Clone> Rule<R, T, S> for HeaderLineRule<T> {
    fn pattern(&self) -> &Pattern {
        &PATTERN_HEADER_ITEM_ALT
    }

    fn try_match<'s>(
        &self,
        source: &'s str,
        last_capture: Option<&str>,
        _state: &S,
    ) -> Option<Captures<'s>> {
        if !starts_line(last_capture) {
            return None;
        }
        PATTERN_HEADER_ITEM_ALT.match_start(source)
    }

    fn parse(
        &self,
        captures: &Captures<'_>,
        _parser: &Parser<R, T, S>,
        state: &S,
    ) -> Result<ParseSpec<R, T, S>, ParseError> {
        Ok(ParseSpec::nonterminal(
            Node::style(vec![(self.styles)(underline_level(captures)?)], Vec::new()),
            state.clone(),
            captures.span(1)?,
        ))
    }
}

/// An underlined header whose title may end in `{class names}`.
///
/// The title is parsed eagerly with its own rule list. When the suffix names
/// at least one known class, the header node is wrapped in a style node
/// carrying the class styles; the suffix itself is not rendered.
///
/// ```text
/// My Line Header in Red {red}
/// ==========
/// ```
pub struct HeaderLineClassedRule<R, T, S> {
    styles: HeaderStyles<T>,
    class_styles: ClassStyles<T>,
    inner_rules: Vec<RuleRef<R, T, S>>,
}

impl<R, T, S> HeaderLineClassedRule<R, T, S>
where
    T: From<TextStyle> + 'static,
    S: Clone,
{
    /// Titles are parsed with the simple inline rules plus text.
    pub fn new(
        styles: impl Fn(usize) -> T + Send + Sync + 'static,
        class_styles: impl Fn(&str) -> Option<T> + Send + Sync + 'static,
    ) -> Self {
        Self::with_inner_rules(styles, class_styles, simple::simple_markdown_rules(true))
    }
}

impl<R, T, S> HeaderLineClassedRule<R, T, S> {
    pub fn with_inner_rules(
        styles: impl Fn(usize) -> T + Send + Sync + 'static,
        class_styles: impl Fn(&str) -> Option<T> + Send + Sync + 'static,
        inner_rules: Vec<RuleRef<R, T, S>>,
    ) -> Self {
        Self {
            styles: Arc::new(styles),
            class_styles: Arc::new(class_styles),
            inner_rules,
        }
    }

    pub fn inner_rules(&self) -> &[RuleRef<R, T, S>] {
        &self.inner_rules
    }
}

impl<R, T, S: Clone> Rule<R, T, S> for HeaderLineClassedRule<R, T, S> {
    fn pattern(&self) -> &Pattern {
        &PATTERN_HEADER_ITEM_ALT
    }

    fn try_match<'s>(
        &self,
        source: &'s str,
        last_capture: Option<&str>,
        _state: &S,
    ) -> Option<Captures<'s>> {
        if !starts_line(last_capture) {
            return None;
        }
        PATTERN_HEADER_ITEM_ALT.match_start(source)
    }

    fn parse(
        &self,
        captures: &Captures<'_>,
        parser: &Parser<R, T, S>,
        state: &S,
    ) -> Result<ParseSpec<R, T, S>, ParseError> {
        let title = captures.group(1)?;
        let level = underline_level(captures)?;

        let (text, classes) = match PATTERN_HEADING_CLASS.match_start(title) {
            Some(suffixed) => (suffixed.group(1)?, suffixed.get(2)),
            None => (title, None),
        };

        log::debug!("parsing header title {text:?} with {} rule(s)", self.inner_rules.len());
        let children = parser.parse_with_rules(text, state.clone(), &self.inner_rules)?;
        let header = Node::style(vec![(self.styles)(level)], children);

        let class_styles: Vec<T> = classes
            .into_iter()
            .flat_map(|names| names.split(' '))
            .filter_map(|name| (self.class_styles)(name))
            .collect();

        let root = if class_styles.is_empty() {
            header
        } else {
            Node::style(class_styles, vec![header])
        };
        Ok(ParseSpec::terminal(root, state.clone()))
    }
}

/// `#` headers and underlined headers.
pub fn header_rules<R, T, S>(styles: impl Fn(usize) -> T + Send + Sync + 'static) -> Vec<RuleRef<R, T, S>>
where
    T: 'static,
    S: Clone,
{
    let styles: HeaderStyles<T> = Arc::new(styles);
    let header: RuleRef<R, T, S> = Arc::new(HeaderRule {
        styles: Arc::clone(&styles),
    });
    let header_line: RuleRef<R, T, S> = Arc::new(HeaderLineRule { styles });
    vec![header, header_line]
}

/// Like [`header_rules`], but underlined headers accept a class suffix.
pub fn classed_header_rules<R, T, S>(
    styles: impl Fn(usize) -> T + Send + Sync + 'static,
    class_styles: impl Fn(&str) -> Option<T> + Send + Sync + 'static,
) -> Vec<RuleRef<R, T, S>>
where
    R: 'static,
    T: From<TextStyle> + 'static,
    S: Clone + 'static,
{
    let styles: HeaderStyles<T> = Arc::new(styles);
    let header: RuleRef<R, T, S> = Arc::new(HeaderRule {
        styles: Arc::clone(&styles),
    });
    let header_line: RuleRef<R, T, S> = Arc::new(HeaderLineClassedRule {
        styles,
        class_styles: Arc::new(class_styles),
        inner_rules: simple::simple_markdown_rules(true),
    });
    vec![header, header_line]
}
