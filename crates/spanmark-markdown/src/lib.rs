//! # spanmark-markdown
//!
//! Block-level markdown rules for the spanmark parser. All rules here only
//! match at the start of a line and are meant to sit in front of the simple
//! inline rules from [`spanmark_core::simple`].
//!
//! ## Modules
//!
//! - [`list`] - `* item` entries rendered with a bullet style
//! - [`header`] - `#` headers, underlined headers, class suffixes
//! - [`quote`] - `>` and `>>>` block quotes, driven by parse state
//!
//! ## Typical Rule Order
//!
//! ```
//! use spanmark_core::{Parser, StyleProvider, simple::{self, TextStyle}};
//! use spanmark_markdown::markdown_rules;
//!
//! let mut parser: Parser<(), TextStyle, ()> = Parser::new();
//! parser
//!     .add_rules(markdown_rules(|_level| TextStyle::Bold, StyleProvider::empty()))
//!     .add_rules(simple::simple_markdown_rules(true));
//!
//! let ast = parser.parse("# Title\n* item", ()).unwrap();
//! assert_eq!(ast.len(), 3);
//! ```

pub mod header;
pub mod list;
pub mod quote;

use std::sync::Arc;

use spanmark_core::{RuleRef, StyleProvider};

pub use header::{
    HeaderLineClassedRule, HeaderLineRule, HeaderRule, classed_header_rules, header_rules,
};
pub use list::{ListItemNode, ListItemRule};
pub use quote::{BlockQuoteRule, BlockQuoteState};

/// Header rules followed by the list item rule.
pub fn markdown_rules<R, T, S>(
    header_styles: impl Fn(usize) -> T + Send + Sync + 'static,
    bullet: StyleProvider<R, T>,
) -> Vec<RuleRef<R, T, S>>
where
    R: 'static,
    T: Clone + 'static,
    S: Clone,
{
    let mut rules = header_rules(header_styles);
    rules.push(Arc::new(ListItemRule::new(bullet)));
    rules
}
