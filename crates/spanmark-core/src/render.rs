//! # Rendering
//!
//! [`StyledText`] is an append-only string plus a list of style spans over
//! byte ranges of that string. Nodes write into it in document order; a
//! style node learns its range only after its children have been written.

use std::{fmt, ops::Range};

use crate::node::Node;

/// One style applied over a byte range of the rendered text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleSpan<T> {
    pub style: T,
    pub range: Range<usize>,
}

/// Rendered text with style spans, in the order they were attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledText<T> {
    text: String,
    spans: Vec<StyleSpan<T>>,
}

impl<T> StyledText<T> {
    pub fn new() -> Self {
        Self {
            text: String::new(),
            spans: Vec::new(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Current length in bytes.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn push_str(&mut self, text: &str) {
        self.text.push_str(text);
    }

    pub fn push(&mut self, c: char) {
        self.text.push(c);
    }

    /// Attaches `style` to `range`. The end is clamped to the current length.
    ///
    /// Empty ranges are kept: a style node without children still records
    /// where it would have applied.
    pub fn set_style(&mut self, style: T, range: Range<usize>) {
        let end = range.end.min(self.text.len());
        let start = range.start.min(end);
        self.spans.push(StyleSpan {
            style,
            range: start..end,
        });
    }

    pub fn spans(&self) -> &[StyleSpan<T>] {
        &self.spans
    }

    /// Styles whose range covers the byte at `index`.
    pub fn styles_at(&self, index: usize) -> impl Iterator<Item = &T> {
        self.spans
            .iter()
            .filter(move |span| span.range.contains(&index))
            .map(|span| &span.style)
    }

    pub fn into_parts(self) -> (String, Vec<StyleSpan<T>>) {
        (self.text, self.spans)
    }
}

impl<T> Default for StyledText<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Display for StyledText<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Renders each node of `ast` into `builder`, in order.
pub fn render<R, T: Clone>(builder: &mut StyledText<T>, ast: &[Node<R, T>], ctx: &R) {
    for node in ast {
        node.render(builder, ctx);
    }
}

/// Renders `ast` into a fresh [`StyledText`].
pub fn render_to_text<R, T: Clone>(ast: &[Node<R, T>], ctx: &R) -> StyledText<T> {
    let mut builder = StyledText::new();
    render(&mut builder, ast, ctx);
    builder
}
