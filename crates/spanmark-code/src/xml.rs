//! XML (and HTTP-ish) highlighting: comments and tags.

use std::{fmt, sync::Arc, sync::LazyLock};

use spanmark_core::{
    Captures, CustomNode, Node, ParseError, ParseSpec, Parser, Pattern, Rule, RuleRef,
    StyledText, node::render_children,
};

use crate::{
    providers::CodeStyleProviders,
    rules::{PATTERN_LEADING_WS_CONSUMER, PATTERN_TEXT, to_match_group_rule},
};

pub static PATTERN_XML_COMMENT: LazyLock<Pattern> =
    LazyLock::new(|| Pattern::new(r"(?s)<!--.*?-->").expect("Invalid XML comment pattern"));

/// `<opening>content</closing>` or a lone `<opening>`.
pub static PATTERN_XML_TAG: LazyLock<Pattern> = LazyLock::new(|| {
    Pattern::new(r"(?s)<([\s\S]+?)(?:>(.*?)</([\s\S]+?))?>").expect("Invalid XML tag pattern")
});

const PATTERN_XML_TAG_OPENING_GROUP: usize = 1;
const PATTERN_XML_TAG_CONTENT_GROUP: usize = 2;
const PATTERN_XML_TAG_CLOSING_GROUP: usize = 3;

/// A tag with its content as children.
///
/// The tag name and brackets get the generics styles; attributes get the
/// params styles.
pub struct TagNode<R, T> {
    opening: String,
    closing: Option<String>,
    providers: CodeStyleProviders<R, T>,
}

impl<R, T> TagNode<R, T> {
    pub fn new(
        opening: impl Into<String>,
        closing: Option<String>,
        providers: CodeStyleProviders<R, T>,
    ) -> Self {
        Self {
            opening: opening.into(),
            closing,
            providers,
        }
    }

    /// Everything between `<` and `>` of the opening tag.
    pub fn opening(&self) -> &str {
        &self.opening
    }

    pub fn closing(&self) -> Option<&str> {
        self.closing.as_deref()
    }

    /// Splits the opening tag into its name and the attributes after it.
    fn name_and_remainder(&self) -> (&str, &str) {
        match self
            .opening
            .find(|c: char| c.is_whitespace() || c == '/')
        {
            Some(index) => self.opening.split_at(index),
            None => (self.opening.as_str(), ""),
        }
    }
}

impl<R, T> PartialEq for TagNode<R, T> {
    fn eq(&self, other: &Self) -> bool {
        self.opening == other.opening && self.closing == other.closing
    }
}

impl<R, T> fmt::Debug for TagNode<R, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TagNode")
            .field("opening", &self.opening)
            .field("closing", &self.closing)
            .finish()
    }
}

impl<R: 'static, T: Clone + 'static> CustomNode<R, T> for TagNode<R, T> {
    fn render(&self, children: &[Node<R, T>], builder: &mut StyledText<T>, ctx: &R) {
        let (name, remainder) = self.name_and_remainder();
        let tag_styles = self.providers.generics.styles(ctx);

        let start = builder.len();
        builder.push('<');
        builder.push_str(name);
        for style in &tag_styles {
            builder.set_style(style.clone(), start..builder.len());
        }

        let start = builder.len();
        builder.push_str(remainder);
        let bracket = builder.len();
        builder.push('>');
        for style in self.providers.params.styles(ctx) {
            builder.set_style(style, start..bracket);
        }
        for style in &tag_styles {
            builder.set_style(style.clone(), bracket..builder.len());
        }

        render_children(children, builder, ctx);

        if let Some(closing) = self.closing.as_deref().filter(|closing| !closing.is_empty()) {
            let start = builder.len();
            builder.push_str("</");
            builder.push_str(closing);
            builder.push('>');
            for style in tag_styles {
                builder.set_style(style, start + 1..builder.len());
            }
        }
    }
}

pub struct TagRule<R, T> {
    providers: CodeStyleProviders<R, T>,
}

impl<R, T> TagRule<R, T> {
    pub fn new(providers: CodeStyleProviders<R, T>) -> Self {
        Self { providers }
    }
}

impl<R, T> fmt::Debug for TagRule<R, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TagRule")
    }
}

impl<R: 'static, T: Clone + 'static, S: Clone> Rule<R, T, S> for TagRule<R, T> {
    fn pattern(&self) -> &Pattern {
        &PATTERN_XML_TAG
    }

    fn parse(
        &self,
        captures: &Captures<'_>,
        _parser: &Parser<R, T, S>,
        state: &S,
    ) -> Result<ParseSpec<R, T, S>, ParseError> {
        let node = Node::custom(TagNode::new(
            captures.group(PATTERN_XML_TAG_OPENING_GROUP)?,
            captures
                .get(PATTERN_XML_TAG_CLOSING_GROUP)
                .map(str::to_string),
            self.providers.clone(),
        ));

        // Empty content would be an empty span, which ends the whole parse.
        Ok(match captures.range(PATTERN_XML_TAG_CONTENT_GROUP) {
            Some(content) if !content.is_empty() => {
                ParseSpec::nonterminal(node, state.clone(), content)
            }
            _ => ParseSpec::terminal(node, state.clone()),
        })
    }
}

/// Comments, tags, and plain text.
pub fn rules<R, T, S>(providers: &CodeStyleProviders<R, T>) -> Vec<RuleRef<R, T, S>>
where
    R: 'static,
    T: Clone + 'static,
    S: Clone,
{
    let tag: RuleRef<R, T, S> = Arc::new(TagRule::new(providers.clone()));
    vec![
        to_match_group_rule(&PATTERN_XML_COMMENT, 0, Some(providers.comment.clone())),
        tag,
        to_match_group_rule(&PATTERN_LEADING_WS_CONSUMER, 0, None),
        to_match_group_rule(&PATTERN_TEXT, 0, None),
    ]
}
