//! # Nodes
//!
//! A [`Node`] is one element of the parsed tree. The tree shape (an ordered,
//! append-only list of children) is the same for every node; what differs is
//! the [`NodeKind`], which decides how the node renders.
//!
//! Children are stored in document order. Rendering never reorders them.

use std::{any::Any, fmt};

use crate::render::StyledText;

/// A tree element with an ordered list of owned children.
pub struct Node<R, T> {
    kind: NodeKind<R, T>,
    children: Vec<Node<R, T>>,
}

/// What a node is, and therefore how it renders.
pub enum NodeKind<R, T> {
    /// Renders its children in order and nothing else.
    Parent,
    /// A literal piece of text.
    Text(String),
    /// Applies every style over the full range its children render into.
    Style(Vec<T>),
    /// Structural nodes defined outside the core (list items, code blocks...).
    Custom(Box<dyn CustomNode<R, T>>),
}

/// Object-safe equality and downcasting for custom nodes.
///
/// Implemented for every `'static` type with `PartialEq`, so custom node types
/// only need to derive (or hand-write) `PartialEq`. Only the concrete node
/// type must be `'static`; `R` and `T` may borrow.
pub trait AnyNode {
    fn as_any(&self) -> &dyn Any;
    fn dyn_eq(&self, other: &dyn Any) -> bool;
}

impl<N: Any + PartialEq> AnyNode for N {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn dyn_eq(&self, other: &dyn Any) -> bool {
        other.downcast_ref::<N>().is_some_and(|other| self == other)
    }
}

/// Render behaviour for a node kind the core does not know about.
pub trait CustomNode<R, T>: AnyNode + fmt::Debug {
    /// Writes this node (and usually its `children`) into `builder`.
    fn render(&self, children: &[Node<R, T>], builder: &mut StyledText<T>, ctx: &R);

    /// Literal text carried by the node itself, if any.
    ///
    /// When present it stands in for the children in [`Node::text_content`].
    fn content(&self) -> Option<&str> {
        None
    }
}

impl<R, T> Node<R, T> {
    pub fn new(kind: NodeKind<R, T>) -> Self {
        Self {
            kind,
            children: Vec::new(),
        }
    }

    pub fn parent(children: Vec<Node<R, T>>) -> Self {
        Self {
            kind: NodeKind::Parent,
            children,
        }
    }

    pub fn text(content: impl Into<String>) -> Self {
        Self::new(NodeKind::Text(content.into()))
    }

    pub fn style(styles: Vec<T>, children: Vec<Node<R, T>>) -> Self {
        Self {
            kind: NodeKind::Style(styles),
            children,
        }
    }

    /// A style node wrapping a single text child.
    pub fn styled_text(content: impl Into<String>, styles: Vec<T>) -> Self {
        Self::style(styles, vec![Self::text(content)])
    }

    pub fn custom(node: impl CustomNode<R, T> + 'static) -> Self {
        Self::new(NodeKind::Custom(Box::new(node)))
    }

    /// Builder-style variant of [`Node::add_child`] for several children.
    #[must_use]
    pub fn with_children(mut self, children: impl IntoIterator<Item = Node<R, T>>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn kind(&self) -> &NodeKind<R, T> {
        &self.kind
    }

    pub fn children(&self) -> &[Node<R, T>] {
        &self.children
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Appends a child. Children are never removed or reordered.
    pub fn add_child(&mut self, child: Node<R, T>) {
        self.children.push(child);
    }

    /// The literal text owned by this node (text leaves and custom nodes with content).
    pub fn content(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Text(content) => Some(content),
            NodeKind::Custom(custom) => custom.content(),
            NodeKind::Parent | NodeKind::Style(_) => None,
        }
    }

    /// Concatenated literal text of this subtree.
    ///
    /// Nodes with their own [`content`](Node::content) report it instead of
    /// descending into their children.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            match node.content() {
                Some(content) => out.push_str(content),
                None => stack.extend(node.children.iter().rev()),
            }
        }
        out
    }

    /// Returns the custom node payload if it is of type `N`.
    pub fn downcast_ref<N: Any>(&self) -> Option<&N> {
        match &self.kind {
            NodeKind::Custom(custom) => (**custom).as_any().downcast_ref::<N>(),
            _ => None,
        }
    }

    pub fn is<N: Any>(&self) -> bool {
        self.downcast_ref::<N>().is_some()
    }
}

impl<R, T: Clone> Node<R, T> {
    pub fn render(&self, builder: &mut StyledText<T>, ctx: &R) {
        match &self.kind {
            NodeKind::Parent => render_children(&self.children, builder, ctx),
            NodeKind::Text(content) => {
                builder.push_str(content);
                render_children(&self.children, builder, ctx);
            }
            NodeKind::Style(styles) => {
                // The span is only known once the children have rendered.
                let start = builder.len();
                render_children(&self.children, builder, ctx);
                let end = builder.len();
                for style in styles {
                    builder.set_style(style.clone(), start..end);
                }
            }
            NodeKind::Custom(custom) => custom.render(&self.children, builder, ctx),
        }
    }
}

/// Renders `children` in order. The default body for most custom nodes.
pub fn render_children<R, T: Clone>(children: &[Node<R, T>], builder: &mut StyledText<T>, ctx: &R) {
    for child in children {
        child.render(builder, ctx);
    }
}

/// Walks both trees with a heap stack, so deep trees compare without deep
/// recursion.
impl<R, T: PartialEq> PartialEq for Node<R, T> {
    fn eq(&self, other: &Self) -> bool {
        let mut pairs = vec![(self, other)];
        while let Some((a, b)) = pairs.pop() {
            if a.kind != b.kind || a.children.len() != b.children.len() {
                return false;
            }
            pairs.extend(a.children.iter().zip(&b.children));
        }
        true
    }
}

/// Children are moved onto a heap stack before they are freed, so dropping a
/// deeply nested tree never recurses.
impl<R, T> Drop for Node<R, T> {
    fn drop(&mut self) {
        let mut stack = std::mem::take(&mut self.children);
        while let Some(mut node) = stack.pop() {
            stack.append(&mut node.children);
        }
    }
}

impl<R, T: PartialEq> PartialEq for NodeKind<R, T> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (NodeKind::Parent, NodeKind::Parent) => true,
            (NodeKind::Text(a), NodeKind::Text(b)) => a == b,
            (NodeKind::Style(a), NodeKind::Style(b)) => a == b,
            (NodeKind::Custom(a), NodeKind::Custom(b)) => (**a).dyn_eq((**b).as_any()),
            _ => false,
        }
    }
}

impl<R, T: fmt::Debug> fmt::Debug for Node<R, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.children.is_empty() {
            return fmt::Debug::fmt(&self.kind, f);
        }
        f.debug_struct("Node")
            .field("kind", &self.kind)
            .field("children", &self.children)
            .finish()
    }
}

impl<R, T: fmt::Debug> fmt::Debug for NodeKind<R, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Parent => f.write_str("Parent"),
            NodeKind::Text(content) => f.debug_tuple("Text").field(content).finish(),
            NodeKind::Style(styles) => f.debug_tuple("Style").field(styles).finish(),
            NodeKind::Custom(custom) => fmt::Debug::fmt(&**custom, f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[derive(Debug, PartialEq)]
    struct Mention(u32);

    impl CustomNode<Vec<&'static str>, ()> for Mention {
        fn render(
            &self,
            _children: &[Node<Vec<&'static str>, ()>],
            builder: &mut StyledText<()>,
            ctx: &Vec<&'static str>,
        ) {
            builder.push_str(ctx.get(self.0 as usize).copied().unwrap_or("Invalid User"));
        }
    }

    #[test]
    fn add_child_appends_in_order() {
        let mut node: Node<(), ()> = Node::parent(vec![]);
        node.add_child(Node::text("a"));
        node.add_child(Node::text("b"));
        assert!(node.has_children());
        assert_eq!(node.children(), &[Node::text("a"), Node::text("b")]);
    }

    #[test]
    fn style_node_spans_children() {
        let node: Node<(), &str> = Node::style(
            vec!["bold"],
            vec![Node::text("ab"), Node::styled_text("cd", vec!["italic"])],
        );
        let mut out = StyledText::new();
        out.push_str(">");
        node.render(&mut out, &());

        assert_eq!(out.as_str(), ">abcd");
        // Inner styles are attached before the outer ones.
        let spans: Vec<_> = out.spans().iter().map(|s| (s.style, s.range.clone())).collect();
        assert_eq!(spans, vec![("italic", 3..5), ("bold", 1..5)]);
    }

    #[test]
    fn childless_style_node_has_zero_width_span() {
        let node: Node<(), &str> = Node::style(vec!["bold"], vec![]);
        let mut out = StyledText::new();
        out.push_str("xy");
        node.render(&mut out, &());
        assert_eq!(out.spans()[0].range, 2..2);
    }

    #[test]
    fn custom_node_reads_render_context() {
        let node = Node::parent(vec![Node::custom(Mention(1)), Node::custom(Mention(9))]);
        let mut out = StyledText::new();
        node.render(&mut out, &vec!["zero", "User1"]);
        assert_eq!(out.as_str(), "User1Invalid User");
    }

    #[test]
    fn custom_nodes_compare_and_downcast() {
        let a: Node<Vec<&'static str>, ()> = Node::custom(Mention(1));
        assert_eq!(a, Node::custom(Mention(1)));
        assert_ne!(a, Node::custom(Mention(2)));
        assert_ne!(a, Node::text("1"));
        assert_eq!(a.downcast_ref::<Mention>(), Some(&Mention(1)));
        assert!(!Node::<Vec<&'static str>, ()>::text("x").is::<Mention>());
    }

    #[test]
    fn trees_accept_borrowed_render_context() {
        let names = vec!["zero".to_string()];
        let ctx: &[String] = &names;
        let node: Node<&[String], ()> = Node::parent(vec![Node::text("x")]);

        let mut out = StyledText::new();
        node.render(&mut out, &ctx);
        assert_eq!(out.as_str(), "x");
        assert_eq!(node, Node::parent(vec![Node::text("x")]));
        assert_eq!(node.downcast_ref::<Mention>(), None);
    }

    #[test]
    fn equality_checks_shape() {
        let a: Node<(), ()> = Node::parent(vec![Node::parent(vec![Node::text("a")])]);
        let b: Node<(), ()> = Node::parent(vec![Node::parent(vec![])]);
        let c: Node<(), ()> = Node::parent(vec![Node::parent(vec![]), Node::text("a")]);
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_ne!(b, c);
    }

    #[test]
    fn text_content_concatenates_leaves() {
        let node: Node<(), ()> = Node::style(
            vec![],
            vec![Node::text("bold "), Node::styled_text("and", vec![]), Node::text(" end")],
        );
        assert_eq!(node.text_content(), "bold and end");
    }
}
