//! # spanmark-core
//!
//! A small rule-driven parser that turns markup text into an ordered tree of
//! [`Node`]s, plus the pieces needed to render that tree into styled text.
//!
//! ## Architecture Overview
//!
//! ```text
//! Source Text → Parser (ordered Rules) → Vec<Node> → render() → StyledText
//!               (work stack of ParseSpecs)
//! ```
//!
//! - **Rules** ([`parser::rule`]) test an anchored [`Pattern`] against the
//!   leading edge of the remaining input. The first rule in the list that
//!   matches wins; there is no longest-match and no backtracking.
//! - **ParseSpecs** ([`parser::spec`]) describe what a rule produced: a node
//!   and, for nonterminal results, the span of the input that should be parsed
//!   further and attached under that node.
//! - **The Parser** ([`parser`]) drives an explicit LIFO stack of pending
//!   spans instead of recursing, so nesting depth never touches the call stack.
//! - **Rendering** ([`render`]) walks the forest and writes text plus style
//!   spans into a [`StyledText`] buffer.
//!
//! ## Type Parameters
//!
//! Most types carry the same three parameters:
//!
//! | Param | Meaning |
//! |-------|---------|
//! | `R` | Render context handed to nodes while rendering (lookup tables, theme) |
//! | `T` | Opaque style payload attached to rendered ranges |
//! | `S` | Parse state threaded from parent to child spans, never sideways |
//!
//! ## Quick Start
//!
//! ```
//! use spanmark_core::{Node, Parser, simple::{self, TextStyle}};
//!
//! let mut parser: Parser<(), TextStyle, ()> = Parser::new();
//! parser.add_rules(simple::simple_markdown_rules(true));
//!
//! let ast = parser.parse("A**B**C", ()).unwrap();
//! assert_eq!(
//!     ast,
//!     vec![
//!         Node::text("A"),
//!         Node::style(vec![TextStyle::Bold], vec![Node::text("B")]),
//!         Node::text("C"),
//!     ]
//! );
//! ```

pub mod ast;
pub mod node;
pub mod parser;
pub mod provider;
pub mod render;
pub mod simple;

pub use node::{AnyNode, CustomNode, Node, NodeKind};
pub use parser::{
    ParseError, Parser,
    pattern::{Captures, Pattern},
    rule::{BlockRule, Rule, RuleRef},
    spec::ParseSpec,
};
pub use provider::{StyleProvider, StyledTextNode};
pub use render::{StyleSpan, StyledText, render, render_to_text};
