mod app;
mod config;
mod engine;
mod event;
mod repository;
mod session;
mod store;
mod ui;

use std::collections::BTreeMap;
use std::io;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Wrap};

use app::{App, Focus, LoadState};
use config::Config;
use event::{AppEvent, EventHandler};
use repository::QuestionSource;
use repository::loader::load_with_report;
use session::Mode;
use ui::components::category_bar::CategoryBar;
use ui::components::progress_bar::ScoreBar;
use ui::components::question_card::QuestionCard;
use ui::components::question_list::QuestionList;
use ui::layout::{AppLayout, pack_hint_lines};
use ui::theme::Theme;

#[derive(Parser)]
#[command(
    name = "quizdr",
    version,
    about = "Terminal multiple-choice practice quiz with test mode and review queue"
)]
struct Cli {
    #[arg(short, long, help = "Question source: bundled, a JSON file, or an http(s) URL")]
    questions: Option<String>,

    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(short = 'n', long, help = "Number of questions per test")]
    test_size: Option<usize>,

    #[arg(long, help = "Directory for saved mode, filters and review list")]
    data_dir: Option<String>,

    #[arg(long, help = "Load and validate the question source, print a report, then exit")]
    check: bool,

    #[arg(long, help = "Write the effective configuration to the config file, then exit")]
    init_config: bool,

    #[arg(long, help = "List bundled themes, then exit")]
    list_themes: bool,
}

fn main() -> Result<()> {
    // Logging goes to stderr, which would draw over the UI; opt-in only.
    if std::env::var_os("RUST_LOG").is_some() {
        pretty_env_logger::init();
    }

    let cli = Cli::parse();

    let mut config = Config::load().unwrap_or_else(|err| {
        log::warn!("ignoring unreadable config {}: {err}", Config::config_path().display());
        Config::default()
    });
    if let Some(questions) = cli.questions {
        config.questions = questions;
    }
    if let Some(theme) = cli.theme {
        config.theme = theme;
    }
    if let Some(test_size) = cli.test_size {
        config.test_size = test_size;
    }
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    config.validate();

    if cli.list_themes {
        for name in Theme::available_themes() {
            println!("{name}");
        }
        return Ok(());
    }
    if cli.init_config {
        config.save()?;
        println!("wrote {}", Config::config_path().display());
        return Ok(());
    }
    if cli.check {
        return run_check(&QuestionSource::parse(&config.questions));
    }

    let mut app = App::new(config);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(Duration::from_millis(250));
    app.start_loading(events.sender());

    let result = run_app(&mut terminal, &mut app, &events);
    app.shutdown();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

/// `--check`: load synchronously and report what normalization did.
fn run_check(source: &QuestionSource) -> Result<()> {
    let report = load_with_report(source)
        .with_context(|| format!("could not load questions from {source}"))?;

    let mut per_category: BTreeMap<&str, usize> = BTreeMap::new();
    for q in &report.questions {
        *per_category.entry(q.category.as_str()).or_default() += 1;
    }

    println!("source: {source}");
    println!(
        "{} questions in {} categories",
        report.questions.len(),
        per_category.len()
    );
    for (category, count) in &per_category {
        println!("  {category:<24} {count:>4}");
    }

    if report.coercions.is_empty() {
        println!("no fields needed coercion");
    } else {
        println!("{} fields coerced:", report.coercions.len());
        for c in &report.coercions {
            println!("  #{:<4} {:<12} {}", c.position, c.field, c.detail);
        }
    }
    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key),
            AppEvent::QuestionsLoaded { generation, result } => {
                app.on_questions_loaded(generation, result)
            }
            AppEvent::Tick | AppEvent::Resize(_, _) => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.shutdown();
        return;
    }

    match app.focus {
        Focus::Search => app.handle_search_input(key),
        Focus::Categories => handle_category_key(app, key),
        Focus::Questions => handle_question_key(app, key),
    }
}

fn handle_category_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Enter | KeyCode::Char('c') => app.focus = Focus::Questions,
        KeyCode::Left | KeyCode::Char('h') | KeyCode::Up | KeyCode::Char('k') => {
            app.move_category_cursor(-1)
        }
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Down | KeyCode::Char('j') => {
            app.move_category_cursor(1)
        }
        KeyCode::Char(' ') => app.toggle_category_at_cursor(),
        KeyCode::Char('x') => app.clear_filters(),
        _ => {}
    }
}

fn handle_question_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.shutdown(),
        KeyCode::Char('p') => app.set_mode(Mode::Practice),
        KeyCode::Char('t') => app.set_mode(Mode::Test),
        KeyCode::Char('/') => app.focus_search(),
        KeyCode::Char('c') => app.focus_categories(),
        KeyCode::Char('x') => app.clear_filters(),
        KeyCode::Char('n') => app.new_test(),
        KeyCode::Char('s') => app.submit(),
        KeyCode::Char('r') => app.save_current_to_review(),
        KeyCode::Char('X') => app.clear_review(),
        KeyCode::Char(ch @ '1'..='9') => {
            let option = ch as usize - '1' as usize;
            app.pick(option);
        }
        KeyCode::Left | KeyCode::Char('h') | KeyCode::BackTab => app.move_cursor(-1),
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Tab => app.move_cursor(1),
        KeyCode::PageUp => app.move_cursor(-10),
        KeyCode::PageDown => app.move_cursor(10),
        KeyCode::Up | KeyCode::Char('k') => app.move_option_cursor(-1),
        KeyCode::Down | KeyCode::Char('j') => app.move_option_cursor(1),
        KeyCode::Enter | KeyCode::Char(' ') => app.pick_at_cursor(),
        _ => {}
    }
}

fn footer_hints(app: &App) -> Vec<&'static str> {
    match app.focus {
        Focus::Search => vec!["[Enter/Esc] Done", "[Ctrl+U] Clear", "[Ctrl+W] Delete word"],
        Focus::Categories => vec![
            "[←→] Move",
            "[Space] Toggle",
            "[x] Clear filters",
            "[Esc] Done",
        ],
        Focus::Questions => {
            let mut hints = vec![
                "[←→] Question",
                "[↑↓] Option",
                "[1-9/Enter] Answer",
                "[/] Search",
                "[c] Categories",
                "[x] Clear filters",
            ];
            match app.quiz.mode() {
                Mode::Practice => hints.extend(["[t] Test mode", "[r] Save to review"]),
                Mode::Test => hints.extend(["[p] Practice mode", "[n] New test", "[s] Submit"]),
            }
            hints.extend(["[X] Clear review", "[q] Quit"]);
            hints
        }
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    let hint_lines = pack_hint_lines(&footer_hints(app), area.width as usize);
    let layout = AppLayout::new(area, hint_lines.len() as u16);

    render_header(frame, app, &layout);
    render_search(frame, app, &layout);

    let cursor = (app.focus == Focus::Categories).then_some(app.category_cursor);
    frame.render_widget(
        CategoryBar::new(&app.quiz, cursor, app.theme).compact(layout.tier.compact_categories()),
        layout.categories,
    );

    render_status(frame, app, &layout);
    render_questions(frame, app, &layout);

    if let Some(bar_area) = layout.score_bar {
        let label = match app.quiz.mode() {
            Mode::Practice => "Practice score",
            Mode::Test => "Test score",
        };
        frame.render_widget(ScoreBar::new(label, app.quiz.score(), app.theme), bar_area);
    }

    let footer_lines: Vec<Line> = hint_lines
        .into_iter()
        .map(|line| Line::from(Span::styled(line, Style::default().fg(colors.text_dim()))))
        .collect();
    frame.render_widget(Paragraph::new(footer_lines), layout.footer);
}

fn render_header(frame: &mut ratatui::Frame, app: &App, layout: &AppLayout) {
    let colors = &app.theme.colors;
    let quiz = &app.quiz;

    let tab = |mode: Mode| {
        let style = if quiz.mode() == mode {
            Style::default()
                .fg(colors.bg())
                .bg(colors.accent())
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(colors.text_dim()).bg(colors.header_bg())
        };
        Span::styled(format!(" {} ", mode.label()), style)
    };

    let score = quiz.score();
    let mut info = format!(
        "  {} questions | Score {}/{} ({}%)",
        quiz.active_questions().len(),
        score.correct,
        score.total,
        score.percent
    );
    if let Some(result) = quiz.test_result() {
        info.push_str(&format!(" | Result {}/{}", result.correct, result.total));
    }
    if app.is_loading() {
        info.push_str(" | loading…");
    }

    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " quizdr ",
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        tab(Mode::Practice),
        tab(Mode::Test),
        Span::styled(
            info,
            Style::default().fg(colors.header_fg()).bg(colors.header_bg()),
        ),
    ]))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, layout.header);
}

fn render_search(frame: &mut ratatui::Frame, app: &App, layout: &AppLayout) {
    let colors = &app.theme.colors;
    let focused = app.focus == Focus::Search;

    let block = Block::bordered()
        .title(" Search ")
        .border_style(Style::default().fg(if focused {
            colors.border_focused()
        } else {
            colors.border()
        }))
        .style(Style::default().bg(colors.bg()));

    let line = if focused {
        let (before, at, after) = app.search.render_parts();
        let cursor_style = Style::default().fg(colors.bg()).bg(colors.fg());
        Line::from(vec![
            Span::styled(before.to_string(), Style::default().fg(colors.fg())),
            Span::styled(at.map(String::from).unwrap_or_else(|| " ".to_string()), cursor_style),
            Span::styled(after.to_string(), Style::default().fg(colors.fg())),
        ])
    } else if app.search.value().is_empty() {
        Line::from(Span::styled(
            "press / to search prompts, options and categories",
            Style::default().fg(colors.text_dim()),
        ))
    } else {
        Line::from(Span::styled(
            app.search.value().to_string(),
            Style::default().fg(colors.fg()),
        ))
    };

    frame.render_widget(Paragraph::new(line).block(block), layout.search);
}

fn render_status(frame: &mut ratatui::Frame, app: &App, layout: &AppLayout) {
    let colors = &app.theme.colors;
    let quiz = &app.quiz;
    let mut spans = Vec::new();

    if quiz.mode() == Mode::Test {
        let total = quiz.test_questions().len();
        let text = match quiz.test_result() {
            Some(result) => format!(
                " Submitted: {}/{} correct ({}%) ",
                result.correct,
                result.total,
                engine::scoring::percent(result.correct, result.total)
            ),
            None => format!(
                " Test: {}/{total} answered ",
                quiz.state().answers.answered_count()
            ),
        };
        let style = if quiz.submitted() {
            Style::default().fg(colors.success()).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(colors.accent())
        };
        spans.push(Span::styled(text, style));
    }

    spans.push(Span::styled(
        format!(" Review: {} saved ", quiz.review().len()),
        Style::default().fg(colors.warning()),
    ));

    if let Some(notice) = &app.notice {
        spans.push(Span::styled(
            format!(" {notice}"),
            Style::default().fg(colors.fg()),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), layout.status);
}

fn render_questions(frame: &mut ratatui::Frame, app: &App, layout: &AppLayout) {
    let colors = &app.theme.colors;

    let message = match &app.load_state {
        LoadState::Loading => Some((
            " Loading ".to_string(),
            format!("Loading questions from {}…", app.source),
            colors.text_dim(),
        )),
        LoadState::Failed(err) => Some((
            " Could not load questions ".to_string(),
            format!(
                "{err}\n\nSource: {}\nSet another source with --questions or in {}.",
                app.source,
                Config::config_path().display()
            ),
            colors.error(),
        )),
        LoadState::Ready if app.quiz.active_questions().is_empty() => Some((
            " No questions ".to_string(),
            if app.quiz.questions().is_empty() {
                "The question source is empty.".to_string()
            } else {
                "No questions match the current search and categories. Press x to clear filters."
                    .to_string()
            },
            colors.text_dim(),
        )),
        LoadState::Ready => None,
    };

    if let Some((title, body, color)) = message {
        let area = match layout.list {
            Some(list) => list.union(layout.card),
            None => layout.card,
        };
        let block = Block::bordered()
            .title(title)
            .border_style(Style::default().fg(color))
            .style(Style::default().bg(colors.bg()));
        let paragraph = Paragraph::new(body)
            .style(Style::default().fg(color))
            .wrap(Wrap { trim: false })
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let total = app.quiz.active_questions().len();
    if let Some(list_area) = layout.list {
        frame.render_widget(
            QuestionList::new(&app.quiz, app.cursor, app.focus == Focus::Questions, app.theme),
            list_area,
        );
    }
    if let Some(question) = app.current_question() {
        let card = QuestionCard::new(question, &app.quiz, app.theme)
            .position(app.cursor, total)
            .option_cursor(Some(app.option_cursor))
            .focused(app.focus == Focus::Questions);
        frame.render_widget(card, layout.card);
    }
}
