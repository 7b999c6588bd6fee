//! # Parser
//!
//! The parser keeps a LIFO stack of pending spans. Each step pops a span,
//! finds the first rule that matches at its start, and attaches the rule's
//! node to the span's parent. If the match stopped short of the span's end,
//! the remainder goes back on the stack under the same parent. If the rule
//! asked for an inner span to be parsed, that goes on top, so it is handled
//! before the remainder. Children therefore come out in document order.
//!
//! ## Modules
//!
//! - [`pattern`] - Anchored regex patterns and captures
//! - [`rule`] - The [`Rule`](rule::Rule) trait and line-start gating
//! - [`spec`] - [`ParseSpec`](spec::ParseSpec), a rule's result
//! - `error` - [`ParseError`]

mod error;
pub mod pattern;
pub mod rule;
pub mod spec;

pub use error::ParseError;

use std::sync::Arc;

use crate::node::Node;
use rule::{Rule, RuleRef};

/// An ordered rule list. Earlier rules win.
pub struct Parser<R, T, S> {
    rules: Vec<RuleRef<R, T, S>>,
}

/// A span of the source waiting to be parsed.
struct PendingParse<S> {
    parent: usize,
    state: S,
    start: usize,
    end: usize,
}

impl<R, T, S> Parser<R, T, S> {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn add_rule(&mut self, rule: impl Rule<R, T, S> + 'static) -> &mut Self {
        self.rules.push(Arc::new(rule));
        self
    }

    pub fn add_rules(&mut self, rules: impl IntoIterator<Item = RuleRef<R, T, S>>) -> &mut Self {
        self.rules.extend(rules);
        self
    }

    pub fn rules(&self) -> &[RuleRef<R, T, S>] {
        &self.rules
    }

    /// Parses `source` with this parser's rules.
    pub fn parse(&self, source: &str, initial_state: S) -> Result<Vec<Node<R, T>>, ParseError> {
        self.parse_with_rules(source, initial_state, &self.rules)
    }

    /// Parses `source` with `rules` instead of the parser's own list.
    ///
    /// An empty span on the stack ends the whole parse: whatever is still
    /// pending is dropped and the tree built so far is returned.
    pub fn parse_with_rules(
        &self,
        source: &str,
        initial_state: S,
        rules: &[RuleRef<R, T, S>],
    ) -> Result<Vec<Node<R, T>>, ParseError> {
        let mut tree = TreeBuilder::new();
        let mut remaining_parses = Vec::new();
        let mut last_capture: Option<&str> = None;

        if !source.is_empty() {
            remaining_parses.push(PendingParse {
                parent: TreeBuilder::<R, T>::ROOT,
                state: initial_state,
                start: 0,
                end: source.len(),
            });
        }

        while let Some(pending) = remaining_parses.pop() {
            if pending.start >= pending.end {
                if !remaining_parses.is_empty() {
                    log::warn!(
                        "empty span at byte {}, dropping {} pending span(s)",
                        pending.start,
                        remaining_parses.len()
                    );
                }
                break;
            }

            let offset = pending.start;
            let inspection_source =
                source
                    .get(pending.start..pending.end)
                    .ok_or(ParseError::InvalidSpan {
                        start: pending.start,
                        end: pending.end,
                    })?;

            let (rule, captures) = rules
                .iter()
                .find_map(|rule| {
                    match rule.try_match(inspection_source, last_capture, &pending.state) {
                        Some(captures) => {
                            log::trace!(
                                "MATCH: with rule with pattern {:?} to source {:?}",
                                rule.pattern().as_str(),
                                inspection_source
                            );
                            Some((rule, captures))
                        }
                        None => {
                            log::trace!(
                                "MISS: with rule with pattern {:?} to source {:?}",
                                rule.pattern().as_str(),
                                inspection_source
                            );
                            None
                        }
                    }
                })
                .ok_or_else(|| ParseError::NoMatchingRule {
                    offset,
                    snippet: inspection_source.to_string(),
                    input: source.to_string(),
                })?;

            let consumed = captures.end();
            if consumed == 0 {
                return Err(ParseError::EmptyMatch {
                    offset,
                    pattern: rule.pattern().as_str().to_string(),
                });
            }
            let matcher_source_end = offset + consumed;

            let (root, child_state, span) = rule
                .parse(&captures, self, &pending.state)?
                .into_parts();
            let node_id = tree.attach(pending.parent, root);

            if matcher_source_end != pending.end {
                remaining_parses.push(PendingParse {
                    parent: pending.parent,
                    state: pending.state,
                    start: matcher_source_end,
                    end: pending.end,
                });
            }

            // Rule spans are relative to the inspected window.
            if let Some(span) = span {
                if span.start > span.end || span.end > inspection_source.len() {
                    return Err(ParseError::InvalidSpan {
                        start: span.start + offset,
                        end: span.end + offset,
                    });
                }
                remaining_parses.push(PendingParse {
                    parent: node_id,
                    state: child_state,
                    start: span.start + offset,
                    end: span.end + offset,
                });
            }

            last_capture = Some(captures.as_str());
        }

        let ast = tree.finish();
        log::debug!(
            "parsed {} byte(s) into {} top-level node(s)",
            source.len(),
            ast.len()
        );
        Ok(ast)
    }
}

impl<R, T, S> Default for Parser<R, T, S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R, T, S> Clone for Parser<R, T, S> {
    fn clone(&self) -> Self {
        Self {
            rules: self.rules.clone(),
        }
    }
}

/// Flat storage for the tree while it is being built.
///
/// Nodes are attached by id as rules produce them. A node always gets a
/// larger id than its parent, so folding from the highest id down completes
/// every child before its parent is taken.
struct TreeBuilder<R, T> {
    nodes: Vec<Option<Node<R, T>>>,
    children: Vec<Vec<usize>>,
}

impl<R, T> TreeBuilder<R, T> {
    const ROOT: usize = 0;

    fn new() -> Self {
        Self {
            nodes: vec![None],
            children: vec![Vec::new()],
        }
    }

    fn attach(&mut self, parent: usize, node: Node<R, T>) -> usize {
        let id = self.nodes.len();
        self.nodes.push(Some(node));
        self.children.push(Vec::new());
        self.children[parent].push(id);
        id
    }

    fn finish(self) -> Vec<Node<R, T>> {
        let Self {
            mut nodes,
            children,
        } = self;

        for id in (1..nodes.len()).rev() {
            let attached: Vec<_> = children[id]
                .iter()
                .filter_map(|&child| nodes[child].take())
                .collect();
            if let Some(node) = nodes[id].as_mut() {
                for child in attached {
                    node.add_child(child);
                }
            }
        }

        children[Self::ROOT]
            .iter()
            .filter_map(|&child| nodes[child].take())
            .collect()
    }
}
