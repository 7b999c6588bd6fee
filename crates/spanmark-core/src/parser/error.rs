use thiserror::Error;

/// Errors raised while parsing. Every variant aborts the whole parse.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("failed to find rule to match source at byte {offset}: {snippet:?}")]
    NoMatchingRule {
        /// Byte offset of the unmatched span within `input`.
        offset: usize,
        /// The span no rule accepted.
        snippet: String,
        /// The full source handed to the parser.
        input: String,
    },

    #[error("rule pattern {pattern:?} matched zero bytes at byte {offset}")]
    EmptyMatch { offset: usize, pattern: String },

    #[error("rule produced span {start}..{end} outside the source or off a char boundary")]
    InvalidSpan { start: usize, end: usize },

    #[error("capture group {group} did not participate in match {matched:?}")]
    MissingGroup { group: usize, matched: String },

    #[error("rule failed on {matched:?}")]
    Rule {
        matched: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}
