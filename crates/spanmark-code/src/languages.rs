//! Rule tables for Protobuf, Python and Rust, and the map from language tags
//! to tables.

use std::sync::LazyLock;

use spanmark_core::{Pattern, RuleRef};

use crate::{
    kotlin,
    providers::CodeStyleProviders,
    rules::{
        LanguageMap, Lexicon, PATTERN_STRINGS, generic_code_rules, single_line_comment_pattern,
        to_match_group_rule,
    },
    xml,
};

static PATTERN_SLASH_COMMENT: LazyLock<Pattern> = LazyLock::new(|| {
    single_line_comment_pattern("//").expect("Invalid line comment pattern")
});

static PATTERN_HASH_COMMENT: LazyLock<Pattern> = LazyLock::new(|| {
    single_line_comment_pattern("#").expect("Invalid line comment pattern")
});

static PATTERN_PYTHON_SINGLE_QUOTED: LazyLock<Pattern> = LazyLock::new(|| {
    Pattern::new(r"'(?:\\[\s\S]|[^\\])*?'(?P<ahead>\W|$)")
        .expect("Invalid single quoted string pattern")
});

static PATTERN_PYTHON_DECORATOR: LazyLock<Pattern> =
    LazyLock::new(|| Pattern::new(r"@(\w+)").expect("Invalid decorator pattern"));

/// `#[attr]` or `#![attr]` on a line of its own.
static PATTERN_RUST_ATTRIBUTE: LazyLock<Pattern> =
    LazyLock::new(|| Pattern::new(r"#!?\[.*?\]\n").expect("Invalid attribute pattern"));

static PROTOBUF: LazyLock<Lexicon> = LazyLock::new(|| {
    Lexicon::new(
        &["message|enum|extend|service"],
        &[
            "true|false",
            "string|bool|double|float|bytes",
            "int32|uint32|sint32|int64|unit64|sint64",
            "map",
        ],
        &[
            "required|repeated|optional|option|oneof|default|reserved",
            "package|import",
            "rpc|returns",
        ],
    )
    .expect("Invalid Protobuf lexicon")
});

static PYTHON: LazyLock<Lexicon> = LazyLock::new(|| {
    Lexicon::new(
        &["class", "def", "lambda"],
        &["True|False|None"],
        &[
            "from|import|global|nonlocal",
            "async|await|class|self|cls|def|lambda",
            "for|while|if|else|elif|break|continue|return",
            "try|except|finally|raise|pass|yield",
            "in|as|is|del",
            "and|or|not|assert",
        ],
    )
    .expect("Invalid Python lexicon")
});

static RUST: LazyLock<Lexicon> = LazyLock::new(|| {
    Lexicon::new(
        &["struct", "trait", "mod"],
        &[
            "Self|Result|Ok|Err|Option|None|Some",
            "Copy|Clone|Eq|Hash|Send|Sync|Sized|Debug|Display",
            "Arc|Rc|Box|Pin|Future",
            "true|false|bool|usize|i64|u64|u32|i32|str|String",
        ],
        &[
            "let|mut|static|const|unsafe",
            "crate|mod|extern|pub|use",
            "struct|enum|trait|type|where|impl|dyn|async|await|move|self|fn",
            "for|while|loop|if|else|match|break|continue|return|try",
            "in|as|ref",
        ],
    )
    .expect("Invalid Rust lexicon")
});

pub fn protobuf_rules<R, T, S>(providers: &CodeStyleProviders<R, T>) -> Vec<RuleRef<R, T, S>>
where
    R: 'static,
    T: Clone + 'static,
    S: Clone,
{
    let extras = vec![
        to_match_group_rule(&PATTERN_SLASH_COMMENT, 0, Some(providers.comment.clone())),
        to_match_group_rule(&PATTERN_STRINGS, 0, Some(providers.literal.clone())),
    ];
    generic_code_rules(providers, extras, &PROTOBUF)
}

pub fn python_rules<R, T, S>(providers: &CodeStyleProviders<R, T>) -> Vec<RuleRef<R, T, S>>
where
    R: 'static,
    T: Clone + 'static,
    S: Clone,
{
    let extras = vec![
        to_match_group_rule(&PATTERN_HASH_COMMENT, 0, Some(providers.comment.clone())),
        to_match_group_rule(&PATTERN_STRINGS, 0, Some(providers.literal.clone())),
        to_match_group_rule(&PATTERN_PYTHON_SINGLE_QUOTED, 0, Some(providers.literal.clone())),
        to_match_group_rule(&PATTERN_PYTHON_DECORATOR, 0, Some(providers.generics.clone())),
    ];
    generic_code_rules(providers, extras, &PYTHON)
}

pub fn rust_rules<R, T, S>(providers: &CodeStyleProviders<R, T>) -> Vec<RuleRef<R, T, S>>
where
    R: 'static,
    T: Clone + 'static,
    S: Clone,
{
    let extras = vec![
        to_match_group_rule(&PATTERN_SLASH_COMMENT, 0, Some(providers.comment.clone())),
        to_match_group_rule(&PATTERN_STRINGS, 0, Some(providers.literal.clone())),
        to_match_group_rule(&PATTERN_RUST_ATTRIBUTE, 0, Some(providers.generics.clone())),
    ];
    generic_code_rules(providers, extras, &RUST)
}

/// Every supported language, under each of its tags.
///
/// Aliases share one table.
pub fn create_code_language_map<R, T, S>(providers: &CodeStyleProviders<R, T>) -> LanguageMap<R, T, S>
where
    R: 'static,
    T: Clone + 'static,
    S: Clone,
{
    let tables = [
        (&["kt", "kotlin"][..], kotlin::rules(providers)),
        (&["protobuf", "proto", "pb"][..], protobuf_rules(providers)),
        (&["py", "python"][..], python_rules(providers)),
        (&["rs", "rust"][..], rust_rules(providers)),
        (&["xml", "http"][..], xml::rules(providers)),
    ];

    let mut languages = LanguageMap::new();
    for (tags, rules) in tables {
        for tag in tags {
            languages.insert((*tag).to_string(), rules.clone());
        }
    }
    languages
}
