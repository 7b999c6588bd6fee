//! Helpers for walking and inspecting a parsed forest.

use std::fmt::{self, Write};

use crate::node::Node;

// Every walk keeps its own stack, so nesting depth never reaches the call
// stack.

/// Visits every node, parents before their children.
pub fn traverse_pre_order<R, T>(ast: &[Node<R, T>], visit: &mut impl FnMut(&Node<R, T>)) {
    let mut stack: Vec<&Node<R, T>> = ast.iter().rev().collect();
    while let Some(node) = stack.pop() {
        visit(node);
        stack.extend(node.children().iter().rev());
    }
}

/// Visits every node, children before their parents.
pub fn traverse_post_order<R, T>(ast: &[Node<R, T>], visit: &mut impl FnMut(&Node<R, T>)) {
    let mut stack: Vec<(&Node<R, T>, bool)> = ast.iter().rev().map(|node| (node, false)).collect();
    while let Some((node, expanded)) = stack.pop() {
        if expanded {
            visit(node);
        } else {
            stack.push((node, true));
            stack.extend(node.children().iter().rev().map(|child| (child, false)));
        }
    }
}

/// Concatenated literal text of the whole forest.
pub fn text_content<R, T>(ast: &[Node<R, T>]) -> String {
    ast.iter().map(Node::text_content).collect()
}

/// An indented, one-node-per-line outline of the forest.
pub fn dump<R, T: fmt::Debug>(ast: &[Node<R, T>]) -> String {
    let mut out = String::new();
    let mut stack: Vec<(&Node<R, T>, usize)> = ast.iter().rev().map(|node| (node, 0)).collect();
    while let Some((node, depth)) = stack.pop() {
        // Writing to a String cannot fail.
        let _ = writeln!(out, "{}{:?}", "  ".repeat(depth), node.kind());
        stack.extend(node.children().iter().rev().map(|child| (child, depth + 1)));
    }
    out
}
