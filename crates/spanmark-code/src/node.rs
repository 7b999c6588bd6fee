//! Nodes produced by the code rules.

use std::fmt;

use spanmark_core::{CustomNode, Node, StyleProvider, StyledText, StyledTextNode, node::render_children};

use crate::providers::CodeStyleProviders;

/// A block or inline piece of code.
///
/// When the language is known the children hold the highlighted tokens;
/// otherwise there are no children and the body renders as is. Either way
/// the text styles cover everything the node writes.
pub struct CodeNode<R, T> {
    body: String,
    language: Option<String>,
    styles: StyleProvider<R, T>,
}

impl<R, T> CodeNode<R, T> {
    pub fn new(
        body: impl Into<String>,
        language: Option<String>,
        styles: StyleProvider<R, T>,
    ) -> Self {
        Self {
            body: body.into(),
            language,
            styles,
        }
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }
}

impl<R, T> PartialEq for CodeNode<R, T> {
    fn eq(&self, other: &Self) -> bool {
        self.language == other.language && self.body == other.body
    }
}

impl<R, T> fmt::Debug for CodeNode<R, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CodeNode")
            .field("language", &self.language)
            .field("body", &self.body)
            .finish()
    }
}

impl<R: 'static, T: Clone + 'static> CustomNode<R, T> for CodeNode<R, T> {
    fn render(&self, children: &[Node<R, T>], builder: &mut StyledText<T>, ctx: &R) {
        let start = builder.len();
        if children.is_empty() {
            builder.push_str(&self.body);
        } else {
            render_children(children, builder, ctx);
        }
        let end = builder.len();
        for style in self.styles.styles(ctx) {
            builder.set_style(style, start..end);
        }
    }

    fn content(&self) -> Option<&str> {
        Some(&self.body)
    }
}

/// Inline code: a background over a single [`CodeNode`] child.
///
/// A plain style node can't be used here because the background has to be
/// resolved from the render context.
pub struct InlineCodeNode<R, T> {
    background: StyleProvider<R, T>,
}

impl<R, T> InlineCodeNode<R, T> {
    pub fn new(background: StyleProvider<R, T>) -> Self {
        Self { background }
    }
}

impl<R, T> PartialEq for InlineCodeNode<R, T> {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl<R, T> fmt::Debug for InlineCodeNode<R, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("InlineCodeNode")
    }
}

impl<R: 'static, T: Clone + 'static> CustomNode<R, T> for InlineCodeNode<R, T> {
    fn render(&self, children: &[Node<R, T>], builder: &mut StyledText<T>, ctx: &R) {
        let start = builder.len();
        render_children(children, builder, ctx);
        let end = builder.len();
        for style in self.background.styles(ctx) {
            builder.set_style(style, start..end);
        }
    }
}

/// `class Foo`, `struct Bar`: the defining keyword followed by the new name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefinitionNode;

impl DefinitionNode {
    pub fn node<R: 'static, T: Clone + 'static>(
        definition: &str,
        name: &str,
        providers: &CodeStyleProviders<R, T>,
    ) -> Node<R, T> {
        Node::custom(DefinitionNode).with_children([
            StyledTextNode::node(definition, providers.keyword.clone()),
            StyledTextNode::node(name, providers.types.clone()),
        ])
    }
}

impl<R, T: Clone> CustomNode<R, T> for DefinitionNode {
    fn render(&self, children: &[Node<R, T>], builder: &mut StyledText<T>, ctx: &R) {
        render_children(children, builder, ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use spanmark_core::render_to_text;

    #[test]
    fn raw_code_renders_body() {
        let code: Node<(), &str> = Node::custom(CodeNode::new(
            "let x = 1;",
            None,
            StyleProvider::fixed(vec!["mono"]),
        ));
        let text = render_to_text(&[Node::text("> "), code], &());
        assert_eq!(text.as_str(), "> let x = 1;");
        assert_eq!(text.spans()[0].range, 2..12);
    }

    #[test]
    fn parsed_code_renders_children_instead_of_body() {
        let code: Node<(), &str> = Node::custom(CodeNode::new(
            "ignored",
            Some("kt".into()),
            StyleProvider::fixed(vec!["mono"]),
        ))
        .with_children([Node::text("val"), Node::text(" x")]);
        let text = render_to_text(&[code], &());
        assert_eq!(text.as_str(), "val x");
        assert_eq!(text.spans()[0].range, 0..5);
    }

    #[test]
    fn code_equality_ignores_styles() {
        let a: CodeNode<(), &str> = CodeNode::new("x", Some("rs".into()), StyleProvider::empty());
        let b = CodeNode::new("x", Some("rs".into()), StyleProvider::fixed(vec!["mono"]));
        let c = CodeNode::new("x", None, StyleProvider::empty());
        assert_eq!(a, b);
        assert!(a != c);
    }

    #[test]
    fn inline_code_background_covers_code() {
        let node: Node<(), &str> = Node::custom(InlineCodeNode::new(StyleProvider::fixed(vec![
            "bg",
        ])))
        .with_children([Node::custom(CodeNode::new(
            "code",
            None,
            StyleProvider::fixed(vec!["mono"]),
        ))]);
        let text = render_to_text(&[Node::text("a "), node], &());
        assert_eq!(text.as_str(), "a code");
        let styles: Vec<_> = text.styles_at(2).copied().collect();
        assert_eq!(styles, vec!["mono", "bg"]);
    }

    #[test]
    fn definition_styles_keyword_and_name() {
        let providers: CodeStyleProviders<(), &str> = CodeStyleProviders {
            keyword: StyleProvider::fixed(vec!["keyword"]),
            types: StyleProvider::fixed(vec!["type"]),
            ..Default::default()
        };
        let node = DefinitionNode::node("class", " Foo", &providers);
        assert_eq!(node.text_content(), "class Foo");

        let text = render_to_text(&[node], &());
        let spans: Vec<_> = text
            .spans()
            .iter()
            .map(|span| (span.style, span.range.clone()))
            .collect();
        assert_eq!(spans, vec![("keyword", 0..5), ("type", 5..9)]);
    }
}
