//! # spanmark-code
//!
//! Code rules for the spanmark parser: fenced code blocks, inline code, and
//! per-language highlighting tables.
//!
//! A code block is matched as a whole by [`CodeBlockRule`]. If its language
//! tag has a table in the [`LanguageMap`], the body is parsed again with that
//! table and the tokens become the [`CodeNode`]'s children. Otherwise the
//! body is kept as raw text.
//!
//! ## Modules
//!
//! - [`providers`] - [`CodeStyleProviders`], one provider per token kind
//! - [`node`] - code, inline code and definition nodes
//! - [`rules`] - code block rules and the pieces language tables are made of
//! - [`kotlin`] - functions, fields, annotations
//! - [`xml`] - comments and tags
//! - [`languages`] - Protobuf, Python, Rust and the language map
//!
//! ## Example
//!
//! ```
//! use spanmark_code::{CodeBlockRule, CodeNode, CodeStyleProviders, create_code_language_map};
//! use spanmark_core::{Parser, StyleProvider};
//!
//! let providers: CodeStyleProviders<(), &str> = CodeStyleProviders {
//!     keyword: StyleProvider::fixed(vec!["keyword"]),
//!     ..Default::default()
//! };
//!
//! let mut parser: Parser<(), &str, ()> = Parser::new();
//! parser.add_rule(CodeBlockRule::new(
//!     providers.default.clone(),
//!     create_code_language_map(&providers),
//! ));
//!
//! let ast = parser.parse("```rs\nlet x = 1;```", ()).unwrap();
//! let code = ast[0].downcast_ref::<CodeNode<(), &str>>().unwrap();
//! assert_eq!(code.language(), Some("rs"));
//! assert_eq!(ast[0].children()[0].text_content(), "let");
//! ```

pub mod kotlin;
pub mod languages;
pub mod node;
pub mod providers;
pub mod rules;
pub mod xml;

pub use languages::create_code_language_map;
pub use node::{CodeNode, DefinitionNode, InlineCodeNode};
pub use providers::CodeStyleProviders;
pub use rules::{
    CodeBlockRule, CodeWrapper, DefinitionRule, InlineCodeRule, LanguageMap, MatchGroupRule,
    to_match_group_rule,
};
