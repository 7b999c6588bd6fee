//! Rules shared by every code language, and the code block rules themselves.

use std::{collections::HashMap, fmt, sync::Arc, sync::LazyLock};

use spanmark_core::{
    Captures, Node, ParseError, ParseSpec, Parser, Pattern, Rule, RuleRef, StyleProvider,
    StyledTextNode,
};

use crate::{
    node::{CodeNode, DefinitionNode, InlineCodeNode},
    providers::CodeStyleProviders,
};

/// Rule tables keyed by language tag.
pub type LanguageMap<R, T, S> = HashMap<String, Vec<RuleRef<R, T, S>>>;

/// Decorates a finished code node. Receives whether the body started on a new
/// line after the fence.
pub type CodeWrapper<R, T, S> = Arc<dyn Fn(Node<R, T>, bool, &S) -> Node<R, T> + Send + Sync>;

const CODE_BLOCK_LANGUAGE_GROUP: usize = 1;
const CODE_BLOCK_LANGUAGE_WS_GROUP: usize = 2;
const CODE_BLOCK_WS_GROUP: usize = 3;
const CODE_BLOCK_BODY_GROUP: usize = 4;

/// ```` ```lang\nbody``` ```` or ```` ```body``` ````.
///
/// A language tag must be followed by whitespace; trailing newlines before
/// the closing fence are not part of the body.
pub static PATTERN_CODE_BLOCK: LazyLock<Pattern> = LazyLock::new(|| {
    Pattern::new(r"(?s)```(?:([A-Za-z0-9_+\-.]+)(\s+)|(\s*))([^\n].*?)\n*```")
        .expect("Invalid code block pattern")
});

pub static PATTERN_CODE_INLINE: LazyLock<Pattern> = LazyLock::new(|| {
    Pattern::new(r"(?s)`(?:\s*)([^\n].*?)\n*`").expect("Invalid inline code pattern")
});

/// Newlines plus the indentation that follows them.
pub static PATTERN_LEADING_WS_CONSUMER: LazyLock<Pattern> = LazyLock::new(|| {
    Pattern::new(r"(?:\n\s*)+").expect("Invalid leading whitespace pattern")
});

/// Like the markdown text rule, but also stops at word boundaries so that
/// keywords get their own window.
pub static PATTERN_TEXT: LazyLock<Pattern> = LazyLock::new(|| {
    Pattern::new(
        r"[\s\S]+?(?P<ahead>\b|[^0-9A-Za-z\s\x{00c0}-\x{10ffff}]|\n| {2,}\n|\w+:\S|$)",
    )
    .expect("Invalid code text pattern")
});

pub static PATTERN_NUMBERS: LazyLock<Pattern> =
    LazyLock::new(|| Pattern::new(r"\b\d+?\b").expect("Invalid numbers pattern"));

/// A double quoted string. An escaped quote does not end it, and neither does
/// a quote followed by a word character.
pub static PATTERN_STRINGS: LazyLock<Pattern> = LazyLock::new(|| {
    Pattern::new(r#""(?:\\[\s\S]|[^\\])*?"(?P<ahead>\W|$)"#).expect("Invalid string pattern")
});

/// `\b(word|word...)\b`. Each entry may itself be an alternation.
pub fn word_pattern(words: &[&str]) -> Result<Pattern, regex::Error> {
    Pattern::new(&format!(r"\b(?:{})\b", words.join("|")))
}

/// A definition keyword (group 1) followed by the defined name (group 2).
pub fn definition_pattern(identifiers: &[&str]) -> Result<Pattern, regex::Error> {
    Pattern::new(&format!(r"\b({})(\s+\w+)", identifiers.join("|")))
}

/// `prefix` up to the end of the line.
pub fn single_line_comment_pattern(prefix: &str) -> Result<Pattern, regex::Error> {
    Pattern::new(&format!(r"{}.*?(?P<ahead>\n|$)", regex::escape(prefix)))
}

/// Emits one group of the match as a leaf, styled when a provider is given.
pub struct MatchGroupRule<R, T> {
    pattern: Pattern,
    group: usize,
    styles: Option<StyleProvider<R, T>>,
}

impl<R, T> MatchGroupRule<R, T> {
    pub fn new(pattern: Pattern, group: usize, styles: Option<StyleProvider<R, T>>) -> Self {
        Self {
            pattern,
            group,
            styles,
        }
    }
}

impl<R, T> fmt::Debug for MatchGroupRule<R, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MatchGroupRule")
            .field("pattern", &self.pattern.as_str())
            .field("group", &self.group)
            .finish_non_exhaustive()
    }
}

impl<R: 'static, T: Clone + 'static, S: Clone> Rule<R, T, S> for MatchGroupRule<R, T> {
    fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    fn parse(
        &self,
        captures: &Captures<'_>,
        _parser: &Parser<R, T, S>,
        state: &S,
    ) -> Result<ParseSpec<R, T, S>, ParseError> {
        let content = captures.get(self.group).unwrap_or_default();
        let node = match &self.styles {
            Some(styles) => StyledTextNode::node(content, styles.clone()),
            None => Node::text(content),
        };
        Ok(ParseSpec::terminal(node, state.clone()))
    }
}

/// Shorthand for a shared [`MatchGroupRule`].
pub fn to_match_group_rule<R, T, S>(
    pattern: &Pattern,
    group: usize,
    styles: Option<StyleProvider<R, T>>,
) -> RuleRef<R, T, S>
where
    R: 'static,
    T: Clone + 'static,
    S: Clone,
{
    Arc::new(MatchGroupRule::new(pattern.clone(), group, styles))
}

/// Matches a [`definition_pattern`] and emits a [`DefinitionNode`].
pub struct DefinitionRule<R, T> {
    pattern: Pattern,
    providers: CodeStyleProviders<R, T>,
}

impl<R, T> DefinitionRule<R, T> {
    pub fn new(pattern: Pattern, providers: CodeStyleProviders<R, T>) -> Self {
        Self { pattern, providers }
    }
}

impl<R: 'static, T: Clone + 'static, S: Clone> Rule<R, T, S> for DefinitionRule<R, T> {
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
            DefinitionNode::node(captures.group(1)?, captures.group(2)?, &self.providers),
            state.clone(),
        ))
    }
}

/// The word lists that make up most of a language's highlighting.
#[derive(Debug, Clone)]
pub struct Lexicon {
    definitions: Pattern,
    built_ins: Pattern,
    keywords: Pattern,
}

impl Lexicon {
    pub fn new(
        definitions: &[&str],
        built_ins: &[&str],
        keywords: &[&str],
    ) -> Result<Self, regex::Error> {
        Ok(Self {
            definitions: definition_pattern(definitions)?,
            built_ins: word_pattern(built_ins)?,
            keywords: word_pattern(keywords)?,
        })
    }
}

/// `extras` first, then definitions, built-ins, keywords, numbers, and the
/// whitespace and text rules that make sure every input is consumed.
pub fn generic_code_rules<R, T, S>(
    providers: &CodeStyleProviders<R, T>,
    extras: Vec<RuleRef<R, T, S>>,
    lexicon: &Lexicon,
) -> Vec<RuleRef<R, T, S>>
where
    R: 'static,
    T: Clone + 'static,
    S: Clone,
{
    let definition: RuleRef<R, T, S> = Arc::new(DefinitionRule::new(
        lexicon.definitions.clone(),
        providers.clone(),
    ));
    let mut rules = extras;
    rules.extend([
        definition,
        to_match_group_rule(&lexicon.built_ins, 0, Some(providers.generics.clone())),
        to_match_group_rule(&lexicon.keywords, 0, Some(providers.keyword.clone())),
        to_match_group_rule(&PATTERN_NUMBERS, 0, Some(providers.literal.clone())),
        to_match_group_rule(&PATTERN_LEADING_WS_CONSUMER, 0, None),
        to_match_group_rule(&PATTERN_TEXT, 0, None),
    ]);
    rules
}

/// Fenced code blocks, highlighted with the table for their language tag.
///
/// A tag with no table is kept as the block's language when the body starts
/// on the next line. On a one-line block it is just the first word of the
/// body.
pub struct CodeBlockRule<R, T, S> {
    text_styles: StyleProvider<R, T>,
    languages: LanguageMap<R, T, S>,
    wrapper: Option<CodeWrapper<R, T, S>>,
}

impl<R, T, S> CodeBlockRule<R, T, S> {
    pub fn new(text_styles: StyleProvider<R, T>, languages: LanguageMap<R, T, S>) -> Self {
        Self {
            text_styles,
            languages,
            wrapper: None,
        }
    }

    #[must_use]
    pub fn with_wrapper(
        mut self,
        wrapper: impl Fn(Node<R, T>, bool, &S) -> Node<R, T> + Send + Sync + 'static,
    ) -> Self {
        self.wrapper = Some(Arc::new(wrapper));
        self
    }

    pub fn languages(&self) -> &LanguageMap<R, T, S> {
        &self.languages
    }
}

impl<R, T, S> fmt::Debug for CodeBlockRule<R, T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut languages: Vec<_> = self.languages.keys().collect();
        languages.sort();
        f.debug_struct("CodeBlockRule")
            .field("languages", &languages)
            .finish_non_exhaustive()
    }
}

impl<R: 'static, T: Clone + 'static, S: Clone> Rule<R, T, S> for CodeBlockRule<R, T, S> {
    fn pattern(&self) -> &Pattern {
        &PATTERN_CODE_BLOCK
    }

    fn parse(
        &self,
        captures: &Captures<'_>,
        parser: &Parser<R, T, S>,
        state: &S,
    ) -> Result<ParseSpec<R, T, S>, ParseError> {
        let body = captures.group(CODE_BLOCK_BODY_GROUP)?;
        let language = captures.get(CODE_BLOCK_LANGUAGE_GROUP);
        let whitespace = captures
            .get(CODE_BLOCK_LANGUAGE_WS_GROUP)
            .or_else(|| captures.get(CODE_BLOCK_WS_GROUP))
            .unwrap_or_default();
        let starts_with_newline = whitespace.contains('\n');

        let code = match (language, language.and_then(|tag| self.languages.get(tag))) {
            (Some(language), Some(rules)) => {
                log::debug!("highlighting {} byte(s) as {language}", body.len());
                let children = parser.parse_with_rules(body, state.clone(), rules)?;
                Node::custom(CodeNode::new(
                    body,
                    Some(language.to_string()),
                    self.text_styles.clone(),
                ))
                .with_children(children)
            }
            (Some(_), None) if !starts_with_newline => {
                let start = captures.span(CODE_BLOCK_LANGUAGE_GROUP)?.start;
                let end = captures.span(CODE_BLOCK_BODY_GROUP)?.end;
                Node::custom(CodeNode::new(
                    &captures.input()[start..end],
                    None,
                    self.text_styles.clone(),
                ))
            }
            (language, _) => Node::custom(CodeNode::new(
                body,
                language.map(str::to_string),
                self.text_styles.clone(),
            )),
        };

        let root = match &self.wrapper {
            Some(wrapper) => wrapper(code, starts_with_newline, state),
            None => code,
        };
        Ok(ParseSpec::terminal(root, state.clone()))
    }
}

/// `` `code` ``, rendered as an [`InlineCodeNode`] around a raw [`CodeNode`].
pub struct InlineCodeRule<R, T> {
    text_styles: StyleProvider<R, T>,
    background: StyleProvider<R, T>,
}

impl<R, T> InlineCodeRule<R, T> {
    pub fn new(text_styles: StyleProvider<R, T>, background: StyleProvider<R, T>) -> Self {
        Self {
            text_styles,
            background,
        }
    }
}

impl<R: 'static, T: Clone + 'static, S: Clone> Rule<R, T, S> for InlineCodeRule<R, T> {
    fn pattern(&self) -> &Pattern {
        &PATTERN_CODE_INLINE
    }

    fn parse(
        &self,
        captures: &Captures<'_>,
        _parser: &Parser<R, T, S>,
        state: &S,
    ) -> Result<ParseSpec<R, T, S>, ParseError> {
        let code = CodeNode::new(captures.group(1)?, None, self.text_styles.clone());
        let root = Node::custom(InlineCodeNode::new(self.background.clone()))
            .with_children([Node::custom(code)]);
        Ok(ParseSpec::terminal(root, state.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn consumed<'s>(pattern: &Pattern, source: &'s str) -> Option<&'s str> {
        pattern.match_start(source).map(|caps| caps.as_str())
    }

    #[rstest]
    #[case("```code```", None, "code")]
    #[case("```kt fun x()```", Some("kt"), "fun x()")]
    #[case("```rs\nlet x;\n\n```", Some("rs"), "let x;")]
    #[case("```\n**block**\n```", None, "**block**")]
    #[case("```spaces  ```", Some("spaces"), " ")]
    fn code_block_groups(
        #[case] source: &str,
        #[case] language: Option<&str>,
        #[case] body: &str,
    ) {
        let caps = PATTERN_CODE_BLOCK.match_start(source).unwrap();
        assert_eq!(caps.get(CODE_BLOCK_LANGUAGE_GROUP), language);
        assert_eq!(caps.get(CODE_BLOCK_BODY_GROUP), Some(body));
    }

    #[rstest]
    #[case("``````")]
    #[case("```\n```")]
    #[case("``` unterminated")]
    fn code_block_rejects(#[case] source: &str) {
        assert!(PATTERN_CODE_BLOCK.match_start(source).is_none());
    }

    #[rstest]
    #[case("`code` rest", Some("`code`"))]
    #[case("` padded\n\n` rest", Some("` padded\n\n`"))]
    #[case("``", None)]
    fn inline_code(#[case] source: &str, #[case] expected: Option<&str>) {
        assert_eq!(consumed(&PATTERN_CODE_INLINE, source), expected);
    }

    #[rstest]
    #[case("fun test()", "fun")]
    #[case(" test", " ")]
    #[case("(x)", "(")]
    #[case("x2 = 3", "x2")]
    #[case("élan vital", "élan")]
    #[case("😀😀 x", "😀😀 ")]
    fn code_text_splits_tokens(#[case] source: &str, #[case] expected: &str) {
        assert_eq!(consumed(&PATTERN_TEXT, source), Some(expected));
    }

    #[rstest]
    #[case(r#""hello")"#, Some(r#""hello""#))]
    #[case(r#""say \"hi\"" x"#, Some(r#""say \"hi\"""#))]
    #[case(r#""a"b" c"#, Some(r#""a"b""#))]
    #[case(r#""open"#, None)]
    fn strings(#[case] source: &str, #[case] expected: Option<&str>) {
        assert_eq!(consumed(&PATTERN_STRINGS, source), expected);
    }

    #[rstest]
    #[case("123,456", Some("123"))]
    #[case("0\n", Some("0"))]
    #[case("12ab", None)]
    fn numbers(#[case] source: &str, #[case] expected: Option<&str>) {
        assert_eq!(consumed(&PATTERN_NUMBERS, source), expected);
    }

    #[test]
    fn word_pattern_needs_whole_words() {
        let pattern = word_pattern(&["in|is", "as"]).unwrap();
        assert_eq!(consumed(&pattern, "in x"), Some("in"));
        assert_eq!(consumed(&pattern, "as"), Some("as"));
        assert_eq!(consumed(&pattern, "interests"), None);
    }

    #[test]
    fn comment_prefix_is_literal() {
        let pattern = single_line_comment_pattern("//").unwrap();
        assert_eq!(consumed(&pattern, "// note\nnext"), Some("// note"));
        let pattern = single_line_comment_pattern("#").unwrap();
        assert_eq!(consumed(&pattern, "# end"), Some("# end"));
    }

    #[test]
    fn leading_whitespace_takes_indentation() {
        assert_eq!(
            consumed(&PATTERN_LEADING_WS_CONSUMER, "\n\n    x"),
            Some("\n\n    ")
        );
        assert_eq!(consumed(&PATTERN_LEADING_WS_CONSUMER, "  x"), None);
    }
}
