mod viewer;

use anyhow::{Context, Result, bail};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use spanmark_config::Theme;
use spanmark_core::{ast, render_to_text};
use std::{
    env,
    io::{Stdout, stdout},
    path::PathBuf,
    process,
};
use viewer::{ViewerState, build_parser, to_lines};

const USAGE: &str = "[--tree] [--theme <path>] <file>";

#[derive(Debug, PartialEq)]
struct Args {
    tree: bool,
    theme: Option<PathBuf>,
    file: PathBuf,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Args> {
    let mut tree = false;
    let mut theme = None;
    let mut file = None;

    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--tree" => tree = true,
            "--theme" => match args.next() {
                Some(path) => theme = Some(PathBuf::from(path)),
                None => bail!("--theme needs a path"),
            },
            flag if flag.starts_with("--") => bail!("unknown option {flag}"),
            _ if file.is_some() => bail!("only one file can be viewed at a time"),
            path => file = Some(PathBuf::from(path)),
        }
    }

    match file {
        Some(file) => Ok(Args { tree, theme, file }),
        None => bail!("no file given"),
    }
}

fn load_theme(path: Option<&PathBuf>) -> Result<Theme> {
    match path {
        Some(path) => Theme::load_from_path(path)?
            .with_context(|| format!("theme file '{}' does not exist", path.display())),
        None => {
            log::info!("Theme path: {}", Theme::config_path().display());
            Ok(Theme::load()?.unwrap_or_default())
        }
    }
}

struct Pager {
    title: String,
    lines: Vec<Line<'static>>,
    scroll: u16,
}

impl Pager {
    fn scroll_down(&mut self, by: u16) {
        let last = u16::try_from(self.lines.len().saturating_sub(1)).unwrap_or(u16::MAX);
        self.scroll = self.scroll.saturating_add(by).min(last);
    }

    fn scroll_up(&mut self, by: u16) {
        self.scroll = self.scroll.saturating_sub(by);
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let program = env::args().next().unwrap_or_else(|| "spanmark-cli".to_string());
    let args = match parse_args(env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("Usage: {program} {USAGE}");
            process::exit(1);
        }
    };

    let theme = load_theme(args.theme.as_ref())?;
    let source = std::fs::read_to_string(&args.file)
        .with_context(|| format!("failed to read '{}'", args.file.display()))?;

    let ast = build_parser(&theme)
        .parse(&source, ViewerState::default())
        .with_context(|| format!("failed to parse '{}'", args.file.display()))?;

    if args.tree {
        print!("{}", ast::dump(&ast));
        return Ok(());
    }

    let mut pager = Pager {
        title: args.file.display().to_string(),
        lines: to_lines(&render_to_text(&ast, &theme)),
        scroll: 0,
    };

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut pager);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, pager: &mut Pager) -> Result<()> {
    loop {
        terminal.draw(|f| ui(f, pager))?;

        if let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            match key.code {
                KeyCode::Char('q') => return Ok(()),
                KeyCode::Down | KeyCode::Char('j') => pager.scroll_down(1),
                KeyCode::Up | KeyCode::Char('k') => pager.scroll_up(1),
                KeyCode::PageDown | KeyCode::Char(' ') => pager.scroll_down(20),
                KeyCode::PageUp => pager.scroll_up(20),
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, pager: &Pager) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(f.area());

    let content = Paragraph::new(pager.lines.clone())
        .block(Block::default().borders(Borders::ALL).title(pager.title.as_str()))
        .scroll((pager.scroll, 0));
    f.render_widget(content, chunks[0]);

    let help = Line::from(vec![
        Span::raw("q: Quit | "),
        Span::raw("↑/k: Up | "),
        Span::raw("↓/j: Down | "),
        Span::raw("PgUp/PgDn/Space: Page"),
    ]);
    f.render_widget(Paragraph::new(help), chunks[1]);
}
