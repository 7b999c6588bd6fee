//! Kotlin highlighting: functions, fields, comments, strings, annotations.

use std::{fmt, sync::Arc, sync::LazyLock};

use spanmark_core::{
    Captures, CustomNode, Node, ParseError, ParseSpec, Parser, Pattern, Rule, RuleRef,
    StyledText, StyledTextNode, node::render_children,
};

use crate::{
    providers::CodeStyleProviders,
    rules::{Lexicon, PATTERN_STRINGS, generic_code_rules, to_match_group_rule},
};

pub const KEYWORDS: &[&str] = &[
    "public|private|internal|inline|lateinit|abstract|open|reified",
    "import|package",
    "class|interface|data|enum|sealed|object|typealias",
    "fun|override|this|super|where|constructor|init|param|delegate",
    "const|val|var|get|final|vararg|it",
    "return|break|continue|suspend",
    "for|while|do|if|else|when|try|catch|finally|throw",
    "in|out|is|as|typeof",
    "shr|ushr|shl|ushl",
    "true|false|null",
];

pub const BUILT_INS: &[&str] = &[
    "true|false|Boolean|String|Char",
    "Int|UInt|Long|ULong|Float|Double|Byte|UByte|Short|UShort",
    "Self|Set|Map|MutableMap|List|MutableList|Array|Runnable|Unit",
    "arrayOf|listOf|mapOf|setOf|let|also|apply|run",
];

pub const DEFINITIONS: &[&str] = &["object", "class", "interface"];

static LEXICON: LazyLock<Lexicon> = LazyLock::new(|| {
    Lexicon::new(DEFINITIONS, BUILT_INS, KEYWORDS).expect("Invalid Kotlin lexicon")
});

/// `// line` or `/* block */`.
pub static PATTERN_KOTLIN_COMMENTS: LazyLock<Pattern> = LazyLock::new(|| {
    Pattern::new(r"(?s)//.*?(?P<ahead>\n|$)|/\*.*?\*/").expect("Invalid Kotlin comment pattern")
});

pub static PATTERN_KOTLIN_ANNOTATION: LazyLock<Pattern> =
    LazyLock::new(|| Pattern::new(r"@(\w+)").expect("Invalid Kotlin annotation pattern"));

/// `fun <T> foo(x: T)`: keyword, optional generics, name, parameters.
pub static PATTERN_KOTLIN_FUNC: LazyLock<Pattern> = LazyLock::new(|| {
    Pattern::new(r"(?s)(fun)( *<.*>)?( \w+)( *\(.*?\))").expect("Invalid Kotlin function pattern")
});

/// `val x` or `var y`.
pub static PATTERN_KOTLIN_FIELD: LazyLock<Pattern> = LazyLock::new(|| {
    Pattern::new(r"(?s)(val|var)(\s+\w+)").expect("Invalid Kotlin field pattern")
});

/// A function declaration up to the end of its parameter list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FunctionNode;

impl FunctionNode {
    pub fn node<R: 'static, T: Clone + 'static>(
        keyword: &str,
        generics: Option<&str>,
        name: &str,
        params: &str,
        providers: &CodeStyleProviders<R, T>,
    ) -> Node<R, T> {
        let mut node = Node::custom(FunctionNode);
        node.add_child(StyledTextNode::node(keyword, providers.keyword.clone()));
        if let Some(generics) = generics {
            node.add_child(StyledTextNode::node(generics, providers.generics.clone()));
        }
        node.add_child(StyledTextNode::node(name, providers.identifier.clone()));
        node.add_child(StyledTextNode::node(params, providers.params.clone()));
        node
    }
}

impl<R, T: Clone> CustomNode<R, T> for FunctionNode {
    fn render(&self, children: &[Node<R, T>], builder: &mut StyledText<T>, ctx: &R) {
        render_children(children, builder, ctx);
    }
}

/// A `val` or `var` and the name it declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldNode;

impl FieldNode {
    pub fn node<R: 'static, T: Clone + 'static>(
        keyword: &str,
        name: &str,
        providers: &CodeStyleProviders<R, T>,
    ) -> Node<R, T> {
        Node::custom(FieldNode).with_children([
            StyledTextNode::node(keyword, providers.keyword.clone()),
            StyledTextNode::node(name, providers.identifier.clone()),
        ])
    }
}

impl<R, T: Clone> CustomNode<R, T> for FieldNode {
    fn render(&self, children: &[Node<R, T>], builder: &mut StyledText<T>, ctx: &R) {
        render_children(children, builder, ctx);
    }
}

pub struct FunctionRule<R, T> {
    providers: CodeStyleProviders<R, T>,
}

impl<R, T> FunctionRule<R, T> {
    pub fn new(providers: CodeStyleProviders<R, T>) -> Self {
        Self { providers }
    }
}

impl<R, T> fmt::Debug for FunctionRule<R, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FunctionRule")
    }
}

impl<R: 'static, T: Clone + 'static, S: Clone> Rule<R, T, S> for FunctionRule<R, T> {
    fn pattern(&self) -> &Pattern {
        &PATTERN_KOTLIN_FUNC
    }

    fn parse(
        &self,
        captures: &Captures<'_>,
        _parser: &Parser<R, T, S>,
        state: &S,
    ) -> Result<ParseSpec<R, T, S>, ParseError> {
        let node = FunctionNode::node(
            captures.group(1)?,
            captures.get(2),
            captures.group(3)?,
            captures.group(4)?,
            &self.providers,
        );
        Ok(ParseSpec::terminal(node, state.clone()))
    }
}

pub struct FieldRule<R, T> {
    providers: CodeStyleProviders<R, T>,
}

impl<R, T> FieldRule<R, T> {
    pub fn new(providers: CodeStyleProviders<R, T>) -> Self {
        Self { providers }
    }
}

impl<R, T> fmt::Debug for FieldRule<R, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FieldRule")
    }
}

impl<R: 'static, T: Clone + 'static, S: Clone> Rule<R, T, S> for FieldRule<R, T> {
    fn pattern(&self) -> &Pattern {
        &PATTERN_KOTLIN_FIELD
    }

    fn parse(
        &self,
        captures: &Captures<'_>,
        _parser: &Parser<R, T, S>,
        state: &S,
    ) -> Result<ParseSpec<R, T, S>, ParseError> {
        let node = FieldNode::node(captures.group(1)?, captures.group(2)?, &self.providers);
        Ok(ParseSpec::terminal(node, state.clone()))
    }
}

/// Comments, strings, annotations, fields and functions.
pub fn extra_rules<R, T, S>(providers: &CodeStyleProviders<R, T>) -> Vec<RuleRef<R, T, S>>
where
    R: 'static,
    T: Clone + 'static,
    S: Clone,
{
    let field: RuleRef<R, T, S> = Arc::new(FieldRule::new(providers.clone()));
    let function: RuleRef<R, T, S> = Arc::new(FunctionRule::new(providers.clone()));
    vec![
        to_match_group_rule(&PATTERN_KOTLIN_COMMENTS, 0, Some(providers.comment.clone())),
        to_match_group_rule(&PATTERN_STRINGS, 0, Some(providers.literal.clone())),
        to_match_group_rule(&PATTERN_KOTLIN_ANNOTATION, 0, Some(providers.generics.clone())),
        field,
        function,
    ]
}

/// The full Kotlin table.
pub fn rules<R, T, S>(providers: &CodeStyleProviders<R, T>) -> Vec<RuleRef<R, T, S>>
where
    R: 'static,
    T: Clone + 'static,
    S: Clone,
{
    generic_code_rules(providers, extra_rules(providers), &LEXICON)
}
