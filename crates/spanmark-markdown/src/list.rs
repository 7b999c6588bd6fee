//! `* item` list entries.

use std::{fmt, sync::LazyLock};

use spanmark_core::{
    Captures, CustomNode, Node, ParseError, ParseSpec, Parser, Pattern, Rule, StyleProvider,
    StyledText, node::render_children, parser::rule::starts_line,
};

/// A `*` followed by a space or tab; the item runs to the end of the line.
pub static PATTERN_LIST_ITEM: LazyLock<Pattern> = LazyLock::new(|| {
    Pattern::new(r"\*[ \t](.*)(?P<ahead>\n|$)").expect("Invalid list item pattern")
});

/// A list entry. The bullet styles cover the first rendered character only.
pub struct ListItemNode<R, T> {
    bullet: StyleProvider<R, T>,
}

impl<R, T> ListItemNode<R, T> {
    pub fn new(bullet: StyleProvider<R, T>) -> Self {
        Self { bullet }
    }
}

impl<R, T> PartialEq for ListItemNode<R, T> {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl<R, T> fmt::Debug for ListItemNode<R, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ListItemNode")
    }
}

impl<R: 'static, T: Clone + 'static> CustomNode<R, T> for ListItemNode<R, T> {
    fn render(&self, children: &[Node<R, T>], builder: &mut StyledText<T>, ctx: &R) {
        let start = builder.len();
        render_children(children, builder, ctx);

        let first_char_end = builder.as_str()[start..]
            .chars()
            .next()
            .map_or(start, |c| start + c.len_utf8());
        for style in self.bullet.styles(ctx) {
            builder.set_style(style, start..first_char_end);
        }
    }
}

/// Matches list items at the start of a line.
pub struct ListItemRule<R, T> {
    bullet: StyleProvider<R, T>,
}

impl<R, T> ListItemRule<R, T> {
    pub fn new(bullet: StyleProvider<R, T>) -> Self {
        Self { bullet }
    }
}

impl<R: 'static, T: Clone + 'static, S: Clone> Rule<R, T, S> for ListItemRule<R, T> {
    fn pattern(&self) -> &Pattern {
        &PATTERN_LIST_ITEM
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
        PATTERN_LIST_ITEM.match_start(source)
    }

    fn parse(
        &self,
        captures: &Captures<'_>,
        _parser: &Parser<R, T, S>,
        state: &S,
    ) -> Result<ParseSpec<R, T, S>, ParseError> {
        Ok(ParseSpec::nonterminal(
            Node::custom(ListItemNode::new(self.bullet.clone())),
            state.clone(),
            captures.span(1)?,
        ))
    }
}
