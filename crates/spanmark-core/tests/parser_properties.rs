use pretty_assertions::assert_eq;
use rstest::rstest;
use spanmark_core::{
    BlockRule, Captures, Node, ParseError, ParseSpec, Parser, Pattern, Rule, RuleRef, ast,
    simple::{self, StyleRule, TextRule, TextStyle},
};
use std::sync::Arc;

type Md = Node<(), TextStyle>;

fn markdown_parser() -> Parser<(), TextStyle, ()> {
    let mut parser = Parser::new();
    parser.add_rules(simple::simple_markdown_rules(true));
    parser
}

fn bold(children: Vec<Md>) -> Md {
    Node::style(vec![TextStyle::Bold], children)
}

fn italic(children: Vec<Md>) -> Md {
    Node::style(vec![TextStyle::Italic], children)
}

#[test]
fn repeated_parses_are_identical() {
    let parser = markdown_parser();
    let source = "a **b** _c_ ~~d~~\n\n* e";
    let first = parser.parse(source, ()).unwrap();
    let second = parser.parse(source, ()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn output_follows_source_order() {
    let ast = markdown_parser().parse("A**B**C", ()).unwrap();
    assert_eq!(
        ast,
        vec![Node::text("A"), bold(vec![Node::text("B")]), Node::text("C")]
    );
}

#[test]
fn nested_styles() {
    let ast = markdown_parser()
        .parse("**bold *and italics* end**", ())
        .unwrap();
    assert_eq!(
        ast,
        vec![bold(vec![
            Node::text("bold "),
            italic(vec![Node::text("and italics")]),
            Node::text(" end"),
        ])]
    );
}

#[rstest]
#[case::ascii("plain text")]
#[case::symbols("a*b_c~d\\e")]
#[case::newlines("line one\n\n\nline two\n")]
#[case::multibyte("naïve café, 日本語 ✓")]
fn catch_all_rule_round_trips(#[case] source: &str) {
    let mut parser: Parser<(), TextStyle, ()> = Parser::new();
    parser.add_rule(TextRule::new(Pattern::new(r"[\s\S]").unwrap()));

    let ast = parser.parse(source, ()).unwrap();
    assert_eq!(ast.len(), source.chars().count());
    assert_eq!(ast::text_content(&ast), source);
}

#[test]
fn missing_catch_all_is_fatal() {
    let mut parser: Parser<(), TextStyle, ()> = Parser::new();
    parser.add_rules([simple::bold_rule()]);

    match parser.parse("plain text", ()) {
        Err(ParseError::NoMatchingRule {
            offset,
            snippet,
            input,
        }) => {
            assert_eq!(offset, 0);
            assert_eq!(snippet, "plain text");
            assert_eq!(input, "plain text");
        }
        other => panic!("expected NoMatchingRule, got {other:?}"),
    }
}

#[test]
fn failure_inside_nested_span_yields_no_tree() {
    let mut parser: Parser<(), TextStyle, ()> = Parser::new();
    parser.add_rules([simple::bold_rule()]);
    match parser.parse("**ok** then not", ()) {
        Err(ParseError::NoMatchingRule {
            offset, snippet, ..
        }) => {
            assert_eq!(offset, 2);
            assert_eq!(snippet, "ok");
        }
        other => panic!("expected NoMatchingRule, got {other:?}"),
    }
}

#[test]
fn empty_input_is_empty_forest() {
    assert!(markdown_parser().parse("", ()).unwrap().is_empty());
}

#[test]
fn blank_lines_collapse_to_single_newline() {
    let ast = markdown_parser()
        .parse("Some text\n\n\n  \n\n\nnewline above", ())
        .unwrap();
    assert_eq!(
        ast,
        vec![
            Node::text("Some text"),
            Node::text("\n"),
            Node::text("\n"),
            Node::text("newline above"),
        ]
    );
}

fn list_parser() -> Parser<(), &'static str, ()> {
    let mut parser = Parser::new();
    parser.add_rule(BlockRule::new(StyleRule::new(
        Pattern::new(r"\* ([^\n]*)").unwrap(),
        || vec!["bullet"],
    )));
    parser.add_rule(TextRule::new(simple::PATTERN_TEXT.clone()));
    parser
}

#[test]
fn block_rule_matches_at_start_of_input() {
    assert_eq!(
        list_parser().parse("* item", ()).unwrap(),
        vec![Node::style(vec!["bullet"], vec![Node::text("item")])]
    );
}

#[test]
fn block_rule_matches_after_newline() {
    assert_eq!(
        list_parser().parse("a\n* item", ()).unwrap(),
        vec![
            Node::text("a"),
            Node::text("\n"),
            Node::style(vec!["bullet"], vec![Node::text("item")]),
        ]
    );
}

#[test]
fn block_rule_ignored_mid_line() {
    assert_eq!(
        list_parser().parse("x * item", ()).unwrap(),
        vec![Node::text("x "), Node::text("* item")]
    );
}

#[test]
fn empty_child_span_stops_the_parse() {
    // "* " has an empty item, so the pending "\nrest" is dropped along with it.
    assert_eq!(
        list_parser().parse("* \nrest", ()).unwrap(),
        vec![Node::style(vec!["bullet"], vec![])]
    );
}

/// Quotes a line and parses its content with the flag set.
struct QuoteRule(Pattern);

impl Rule<(), &'static str, bool> for QuoteRule {
    fn pattern(&self) -> &Pattern {
        &self.0
    }

    fn try_match<'s>(
        &self,
        source: &'s str,
        _last_capture: Option<&str>,
        in_quote: &bool,
    ) -> Option<Captures<'s>> {
        if *in_quote {
            return None;
        }
        self.0.match_start(source)
    }

    fn parse(
        &self,
        captures: &Captures<'_>,
        _parser: &Parser<(), &'static str, bool>,
        _in_quote: &bool,
    ) -> Result<ParseSpec<(), &'static str, bool>, ParseError> {
        Ok(ParseSpec::nonterminal(
            Node::style(vec!["quote"], vec![]),
            true,
            captures.span(1)?,
        ))
    }
}

/// Text that records whether it was parsed inside a quote.
struct QuoteAwareText(Pattern);

impl Rule<(), &'static str, bool> for QuoteAwareText {
    fn pattern(&self) -> &Pattern {
        &self.0
    }

    fn parse(
        &self,
        captures: &Captures<'_>,
        _parser: &Parser<(), &'static str, bool>,
        in_quote: &bool,
    ) -> Result<ParseSpec<(), &'static str, bool>, ParseError> {
        let text = if *in_quote {
            format!("q:{}", captures.as_str())
        } else {
            captures.as_str().to_string()
        };
        Ok(ParseSpec::terminal(Node::text(text), *in_quote))
    }
}

#[test]
fn state_flows_down_not_sideways() {
    let mut parser = Parser::new();
    parser
        .add_rule(BlockRule::new(QuoteRule(
            Pattern::new(r"> ([^\n]*\n?)").unwrap(),
        )))
        .add_rule(QuoteAwareText(Pattern::new(r"[^\n]+|\n").unwrap()));

    let ast = parser.parse("> quoted\nafter", false).unwrap();
    assert_eq!(
        ast,
        vec![
            Node::style(
                vec!["quote"],
                vec![Node::text("q:quoted"), Node::text("q:\n")]
            ),
            Node::text("after"),
        ]
    );
}

/// Parses the inside of `<...>` eagerly, one node per character.
struct Angle {
    pattern: Pattern,
    inner: Vec<RuleRef<(), TextStyle, ()>>,
}

impl Rule<(), TextStyle, ()> for Angle {
    fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    fn parse(
        &self,
        captures: &Captures<'_>,
        parser: &Parser<(), TextStyle, ()>,
        _state: &(),
    ) -> Result<ParseSpec<(), TextStyle, ()>, ParseError> {
        let children = parser.parse_with_rules(captures.group(1)?, (), &self.inner)?;
        Ok(ParseSpec::terminal(Node::parent(children), ()))
    }
}

#[test]
fn nested_sub_parse_uses_its_own_rules() {
    let mut parser: Parser<(), TextStyle, ()> = Parser::new();
    parser.add_rule(Angle {
        pattern: Pattern::new(r"<([^>]*)>").unwrap(),
        inner: vec![Arc::new(TextRule::new(Pattern::new(".").unwrap()))],
    });
    parser.add_rules(simple::simple_markdown_rules(true));

    let ast = parser.parse("x<ab>", ()).unwrap();
    assert_eq!(
        ast,
        vec![
            Node::text("x"),
            Node::parent(vec![Node::text("a"), Node::text("b")]),
        ]
    );
}

#[derive(Debug)]
struct Rejected;

impl std::fmt::Display for Rejected {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("rejected")
    }
}

impl std::error::Error for Rejected {}

struct Failing(Pattern);

impl Rule<(), TextStyle, ()> for Failing {
    fn pattern(&self) -> &Pattern {
        &self.0
    }

    fn parse(
        &self,
        captures: &Captures<'_>,
        _parser: &Parser<(), TextStyle, ()>,
        _state: &(),
    ) -> Result<ParseSpec<(), TextStyle, ()>, ParseError> {
        Err(ParseError::Rule {
            matched: captures.as_str().to_string(),
            source: Box::new(Rejected),
        })
    }
}

#[test]
fn rule_errors_abort_with_cause() {
    let mut parser: Parser<(), TextStyle, ()> = Parser::new();
    parser.add_rule(Failing(Pattern::new("!").unwrap()));
    parser.add_rules(simple::simple_markdown_rules(true));

    let err = parser.parse("fine until !", ()).unwrap_err();
    assert_eq!(err.to_string(), r#"rule failed on "!""#);
    let cause = std::error::Error::source(&err).map(ToString::to_string);
    assert_eq!(cause.as_deref(), Some("rejected"));
}

#[test]
fn dump_outlines_tree() {
    let ast = markdown_parser()
        .parse("**bold *and italics* end**", ())
        .unwrap();
    insta::assert_snapshot!(ast::dump(&ast), @r#"
    Style([Bold])
      Text("bold ")
      Style([Italic])
        Text("and italics")
      Text(" end")
    "#);
}

/// `(...)` around the rest of its window, matched without a regex so that
/// very deep inputs stay linear.
struct Parens(Pattern);

impl Rule<(), TextStyle, ()> for Parens {
    fn pattern(&self) -> &Pattern {
        &self.0
    }

    fn try_match<'s>(
        &self,
        source: &'s str,
        _last_capture: Option<&str>,
        _state: &(),
    ) -> Option<Captures<'s>> {
        if source.len() < 3 || !source.starts_with('(') || !source.ends_with(')') {
            return None;
        }
        Captures::new(source, vec![Some(0..source.len()), Some(1..source.len() - 1)])
    }

    fn parse(
        &self,
        captures: &Captures<'_>,
        _parser: &Parser<(), TextStyle, ()>,
        _state: &(),
    ) -> Result<ParseSpec<(), TextStyle, ()>, ParseError> {
        Ok(ParseSpec::nonterminal(
            Node::parent(vec![]),
            (),
            captures.span(1)?,
        ))
    }
}

#[test]
fn deep_nesting_does_not_use_the_call_stack() {
    const DEPTH: usize = 100_000;
    let mut parser: Parser<(), TextStyle, ()> = Parser::new();
    parser
        .add_rule(Parens(Pattern::new(r"\(").unwrap()))
        .add_rule(TextRule::new(Pattern::new("x").unwrap()));
    let source = format!("{}x{}", "(".repeat(DEPTH), ")".repeat(DEPTH));

    let ast = parser.parse(&source, ()).unwrap();
    assert_eq!(ast.len(), 1);
    assert_eq!(ast::text_content(&ast), "x");

    let mut visited = 0;
    ast::traverse_pre_order(&ast, &mut |_| visited += 1);
    assert_eq!(visited, DEPTH + 1);
    let mut visited = 0;
    ast::traverse_post_order(&ast, &mut |_| visited += 1);
    assert_eq!(visited, DEPTH + 1);

    let copy = parser.parse(&source, ()).unwrap();
    assert!(ast == copy);

    drop(copy);
    drop(ast);
}
