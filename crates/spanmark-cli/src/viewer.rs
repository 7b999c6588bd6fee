//! Everything between the file contents and the lines the pager shows: the
//! rule set, the theme-driven styles, and the conversion to ratatui lines.

use std::{cmp::Reverse, collections::BTreeSet};

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};
use spanmark_code::{CodeBlockRule, CodeStyleProviders, InlineCodeRule, create_code_language_map};
use spanmark_config::Theme;
use spanmark_core::{
    Node, Parser, StyleProvider, StyledText,
    simple::{self, EscapeRule, TextStyle},
};
use spanmark_markdown::{BlockQuoteRule, BlockQuoteState, markdown_rules};

/// Parse state threaded through the viewer's rules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewerState {
    in_quote: bool,
}

impl BlockQuoteState for ViewerState {
    fn is_in_quote(&self) -> bool {
        self.in_quote
    }

    fn with_in_quote(&self, in_quote: bool) -> Self {
        Self { in_quote }
    }
}

/// A style span payload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Attr {
    Style(Style),
    /// Marks the first character of a list item; rendered as a `• ` prefix.
    Bullet(Style),
}

impl From<TextStyle> for Attr {
    fn from(style: TextStyle) -> Self {
        let modifier = match style {
            TextStyle::Bold => Modifier::BOLD,
            TextStyle::Italic => Modifier::ITALIC,
            TextStyle::Underline => Modifier::UNDERLINED,
            TextStyle::Strikethrough => Modifier::CROSSED_OUT,
        };
        Attr::Style(Style::default().add_modifier(modifier))
    }
}

/// Parses a theme color, falling back to the terminal default.
pub fn color(name: &str) -> Color {
    name.parse().unwrap_or_else(|_| {
        log::warn!("unknown color {name:?}, using the terminal default");
        Color::Reset
    })
}

fn fg(name: &str) -> Vec<Attr> {
    vec![Attr::Style(Style::default().fg(color(name)))]
}

/// Code token styles, looked up in the theme at render time.
pub fn code_providers() -> CodeStyleProviders<Theme, Attr> {
    CodeStyleProviders {
        default: StyleProvider::new(|theme: &Theme| fg(&theme.code.default)),
        comment: StyleProvider::new(|theme: &Theme| {
            vec![Attr::Style(
                Style::default()
                    .fg(color(&theme.code.comment))
                    .add_modifier(Modifier::ITALIC),
            )]
        }),
        literal: StyleProvider::new(|theme: &Theme| fg(&theme.code.literal)),
        keyword: StyleProvider::new(|theme: &Theme| {
            vec![Attr::Style(
                Style::default()
                    .fg(color(&theme.code.keyword))
                    .add_modifier(Modifier::BOLD),
            )]
        }),
        identifier: StyleProvider::new(|theme: &Theme| fg(&theme.code.identifier)),
        types: StyleProvider::new(|theme: &Theme| fg(&theme.code.types)),
        generics: StyleProvider::new(|theme: &Theme| fg(&theme.code.generics)),
        params: StyleProvider::new(|theme: &Theme| fg(&theme.code.params)),
    }
}

/// Escapes, code, quotes, headers and lists, then inline markdown.
///
/// Header and quote styles are fixed when the parser is built; code and
/// bullet styles come from the theme passed to the renderer.
pub fn build_parser(theme: &Theme) -> Parser<Theme, Attr, ViewerState> {
    let providers = code_providers();

    let header_theme = theme.clone();
    let header_style = move |level: usize| {
        let style = Style::default().add_modifier(Modifier::BOLD);
        Attr::Style(match header_theme.header_color(level) {
            Some(name) => style.fg(color(name)),
            None => style,
        })
    };
    let quote = Attr::Style(
        Style::default()
            .fg(color(&theme.quote))
            .add_modifier(Modifier::ITALIC),
    );
    let block_background = Attr::Style(Style::default().bg(color(&theme.inline_code_background)));

    let code_block = CodeBlockRule::new(
        providers.default.clone(),
        create_code_language_map(&providers),
    )
    .with_wrapper(move |code, starts_with_newline, _state| {
        if starts_with_newline {
            Node::style(vec![block_background], vec![code])
        } else {
            code
        }
    });
    let inline_code = InlineCodeRule::new(
        providers.default.clone(),
        StyleProvider::new(|theme: &Theme| {
            vec![Attr::Style(
                Style::default().bg(color(&theme.inline_code_background)),
            )]
        }),
    );
    let bullet = StyleProvider::new(|theme: &Theme| {
        vec![Attr::Bullet(Style::default().fg(color(&theme.bullet)))]
    });

    let mut parser = Parser::new();
    parser
        .add_rule(EscapeRule)
        .add_rule(code_block)
        .add_rule(inline_code)
        .add_rule(BlockQuoteRule::new(move || vec![quote]))
        .add_rules(markdown_rules(header_style, bullet))
        .add_rules(simple::simple_markdown_rules(true));
    parser
}

/// Splits rendered text into terminal lines.
///
/// Overlapping styles are patched widest first, so the narrowest span wins
/// where they disagree.
pub fn to_lines(text: &StyledText<Attr>) -> Vec<Line<'static>> {
    let source = text.as_str();
    let mut spans: Vec<_> = text.spans().iter().collect();
    spans.sort_by_key(|span| Reverse(span.range.len()));

    let mut cuts = BTreeSet::from([0, source.len()]);
    for span in &spans {
        cuts.insert(span.range.start);
        cuts.insert(span.range.end);
    }
    for (index, _) in source.match_indices('\n') {
        cuts.insert(index);
        cuts.insert(index + 1);
    }
    let cuts: Vec<usize> = cuts.into_iter().collect();

    let bullets_at = |index: usize| {
        spans.iter().filter_map(move |span| match span.style {
            Attr::Bullet(style) if span.range.start == index => {
                Some(Span::styled("• ", style))
            }
            _ => None,
        })
    };

    let mut lines = Vec::new();
    let mut current: Vec<Span<'static>> = Vec::new();
    for window in cuts.windows(2) {
        let (start, end) = (window[0], window[1]);
        current.extend(bullets_at(start));

        let segment = &source[start..end];
        if segment == "\n" {
            lines.push(Line::from(std::mem::take(&mut current)));
            continue;
        }

        let style = spans
            .iter()
            .filter(|span| span.range.start <= start && end <= span.range.end)
            .fold(Style::default(), |style, span| match span.style {
                Attr::Style(patch) => style.patch(patch),
                Attr::Bullet(_) => style,
            });
        current.push(Span::styled(segment.to_string(), style));
    }
    current.extend(bullets_at(source.len()));
    lines.push(Line::from(current));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use spanmark_core::{ast, render_to_text};

    fn view(source: &str) -> Vec<Line<'static>> {
        let theme = Theme::default();
        let ast = build_parser(&theme)
            .parse(source, ViewerState::default())
            .unwrap();
        to_lines(&render_to_text(&ast, &theme))
    }

    fn plain(lines: &[Line<'_>]) -> Vec<String> {
        lines.iter().map(|line| line.to_string()).collect()
    }

    #[test]
    fn markup_is_removed_and_bullets_added() {
        let lines = view("# Title\nSome **bold** text\n* one\n* two");
        assert_eq!(plain(&lines), vec!["Title", "Some bold text", "• one", "• two"]);
    }

    #[test]
    fn bold_span_is_bold() {
        let lines = view("a **b** c");
        let bold: Vec<_> = lines[0]
            .spans
            .iter()
            .filter(|span| span.style.add_modifier.contains(Modifier::BOLD))
            .map(|span| span.content.to_string())
            .collect();
        assert_eq!(bold, vec!["b"]);
    }

    #[test]
    fn narrower_styles_win() {
        let mut text = StyledText::new();
        text.push_str("abc");
        text.set_style(Attr::Style(Style::default().fg(Color::Red)), 0..3);
        text.set_style(Attr::Style(Style::default().fg(Color::Blue)), 1..2);

        let lines = to_lines(&text);
        let colors: Vec<_> = lines[0].spans.iter().map(|span| span.style.fg).collect();
        assert_eq!(colors, vec![Some(Color::Red), Some(Color::Blue), Some(Color::Red)]);
    }

    #[test]
    fn keywords_take_theme_color_inside_code() {
        let theme = Theme::default();
        let lines = view("```kt\nval x = 1\n```");
        let keyword = lines[0]
            .spans
            .iter()
            .find(|span| span.content == "val")
            .unwrap();
        assert_eq!(keyword.style.fg, Some(color(&theme.code.keyword)));
        assert_eq!(keyword.style.bg, Some(color(&theme.inline_code_background)));
    }

    #[test]
    fn quotes_use_state() {
        let theme = Theme::default();
        let ast = build_parser(&theme)
            .parse("> quoted\n> again", ViewerState::default())
            .unwrap();
        assert_eq!(ast::dump(&ast).lines().count(), 5);
        assert_eq!(plain(&to_lines(&render_to_text(&ast, &theme))), vec!["quoted", "again"]);
    }

    #[test]
    fn unknown_colors_fall_back() {
        assert_eq!(color("not-a-color"), Color::Reset);
        assert_eq!(color("red"), Color::Red);
    }
}
