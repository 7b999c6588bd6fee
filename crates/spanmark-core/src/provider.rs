//! Style providers: styles decided at render time from the render context.

use std::{fmt, sync::Arc};

use crate::{
    node::{CustomNode, Node, render_children},
    render::StyledText,
};

/// Computes the styles for a node from the render context.
///
/// Cheap to clone; every clone shares the same function.
pub struct StyleProvider<R, T>(Arc<dyn Fn(&R) -> Vec<T> + Send + Sync>);

impl<R: 'static, T: 'static> StyleProvider<R, T> {
    pub fn new(provider: impl Fn(&R) -> Vec<T> + Send + Sync + 'static) -> Self {
        Self(Arc::new(provider))
    }

    /// A provider that never styles anything.
    pub fn empty() -> Self {
        Self::new(|_| Vec::new())
    }

    /// A provider that ignores the context and always returns `styles`.
    pub fn fixed(styles: Vec<T>) -> Self
    where
        T: Clone + Send + Sync,
    {
        Self::new(move |_| styles.clone())
    }
}

impl<R, T> StyleProvider<R, T> {
    pub fn styles(&self, ctx: &R) -> Vec<T> {
        (self.0)(ctx)
    }
}

impl<R, T> Clone for StyleProvider<R, T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<R: 'static, T: 'static> Default for StyleProvider<R, T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<R, T> fmt::Debug for StyleProvider<R, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("StyleProvider(..)")
    }
}

/// Literal text whose styles come from a [`StyleProvider`].
///
/// Two nodes are equal when their text is equal; providers are not compared.
pub struct StyledTextNode<R, T> {
    content: String,
    provider: StyleProvider<R, T>,
}

impl<R, T> StyledTextNode<R, T> {
    pub fn new(content: impl Into<String>, provider: StyleProvider<R, T>) -> Self {
        Self {
            content: content.into(),
            provider,
        }
    }

    pub fn provider(&self) -> &StyleProvider<R, T> {
        &self.provider
    }
}

impl<R: 'static, T: Clone + 'static> StyledTextNode<R, T> {
    /// Shorthand for wrapping the node in [`Node::custom`].
    pub fn node(content: impl Into<String>, provider: StyleProvider<R, T>) -> Node<R, T> {
        Node::custom(Self::new(content, provider))
    }
}

impl<R, T> PartialEq for StyledTextNode<R, T> {
    fn eq(&self, other: &Self) -> bool {
        self.content == other.content
    }
}

impl<R, T> fmt::Debug for StyledTextNode<R, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("StyledTextNode").field(&self.content).finish()
    }
}

impl<R: 'static, T: Clone + 'static> CustomNode<R, T> for StyledTextNode<R, T> {
    fn render(&self, children: &[Node<R, T>], builder: &mut StyledText<T>, ctx: &R) {
        let start = builder.len();
        builder.push_str(&self.content);
        render_children(children, builder, ctx);
        let end = builder.len();
        for style in self.provider.styles(ctx) {
            builder.set_style(style, start..end);
        }
    }

    fn content(&self) -> Option<&str> {
        Some(&self.content)
    }
}
