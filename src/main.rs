use std::io::{self, Write};
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use mathkids::app::{App, AppScreen, QUIZ_SETUP_ROWS, SETTINGS_ROWS};
use mathkids::config::Config;
use mathkids::engine::operation::Operation;
use mathkids::event::{AppEvent, EventHandler};
use mathkids::session::plan::{StepKind, StepSpec, lesson_title};
use mathkids::ui;
use mathkids::ui::components::dashboard::Dashboard;
use mathkids::ui::components::lesson_panel::LessonPanel;
use mathkids::ui::components::progress_bar::ProgressBar;
use mathkids::ui::components::table_grid::{TableGrid, TableReference};
use mathkids::ui::layout::{AppLayout, pack_hint_lines};
use mathkids::ui::line_input::InputResult;

#[derive(Parser)]
#[command(name = "mathkids", version, about = "Terminal arithmetic tutor for kids")]
struct Cli {
    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(short, long, help = "Questions per quiz (5, 10, 15 or 20)")]
    questions: Option<u32>,

    #[arg(short, long, help = "Digits per number in quizzes (1-3)")]
    level: Option<u8>,

    #[arg(short, long, help = "Start with sound turned off")]
    mute: bool,
}

fn main() -> Result<()> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let mut config = Config::load().unwrap_or_else(|e| {
        log::warn!("could not load config, using defaults: {e}");
        Config::default()
    });
    if let Some(questions) = cli.questions {
        config.question_count = questions;
    }
    if let Some(level) = cli.level {
        config.digit_level = level;
    }
    if cli.mute {
        config.sound = false;
    }
    if let Some(theme_name) = cli.theme {
        config.theme = theme_name;
    }
    config.normalize();

    let mut app = App::new(config);
    app.persist_config = true;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(Duration::from_millis(100));

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {err:?}");
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
        ring_bells(app.feedback.take_bells())?;

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key),
            AppEvent::Tick => app.on_tick(Instant::now()),
            AppEvent::Resize(_, _) => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

/// A burst of sounds rings at most three times.
fn ring_bells(count: u32) -> io::Result<()> {
    if count == 0 {
        return Ok(());
    }
    let mut out = io::stdout();
    for _ in 0..count.min(3) {
        out.write_all(b"\x07")?;
    }
    out.flush()
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match app.screen {
        AppScreen::Menu => handle_menu_key(app, key),
        AppScreen::QuizSetup => handle_quiz_setup_key(app, key),
        AppScreen::Quiz => handle_quiz_key(app, key),
        AppScreen::QuizResult => handle_quiz_result_key(app, key),
        AppScreen::LearnMenu => handle_learn_menu_key(app, key),
        AppScreen::Lesson => handle_lesson_key(app, key),
        AppScreen::TablesMenu => handle_tables_menu_key(app, key),
        AppScreen::TableView => handle_table_view_key(app, key),
        AppScreen::TableQuiz => handle_table_quiz_key(app, key),
        AppScreen::TableResult => handle_table_result_key(app, key),
        AppScreen::Settings => handle_settings_key(app, key),
    }
}

fn handle_menu_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Up | KeyCode::Char('k') => app.menu.prev(),
        KeyCode::Down | KeyCode::Char('j') => app.menu.next(),
        KeyCode::Enter => app.open(app.menu.selected_action()),
        KeyCode::Char(ch) => {
            if let Some(action) = app.menu.action_for_key(ch) {
                app.open(action);
            }
        }
        _ => {}
    }
}

fn move_row(selected: &mut usize, rows: usize, down: bool) {
    if down {
        *selected = (*selected + 1).min(rows - 1);
    } else {
        *selected = selected.saturating_sub(1);
    }
}

fn handle_quiz_setup_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.go_to_menu(),
        KeyCode::Up | KeyCode::Char('k') => {
            move_row(&mut app.quiz_setup_selected, QUIZ_SETUP_ROWS, false)
        }
        KeyCode::Down | KeyCode::Char('j') => {
            move_row(&mut app.quiz_setup_selected, QUIZ_SETUP_ROWS, true)
        }
        KeyCode::Right | KeyCode::Char('l') => app.cycle_setting(app.quiz_setup_selected, true),
        KeyCode::Left | KeyCode::Char('h') => app.cycle_setting(app.quiz_setup_selected, false),
        KeyCode::Enter => app.start_quiz(),
        _ => {}
    }
}

fn handle_quiz_key(app: &mut App, key: KeyEvent) {
    match app.input.handle(key) {
        InputResult::Submit => app.quiz_enter(),
        InputResult::Cancel => app.go_to_menu(),
        InputResult::Continue | InputResult::Ignored => {}
    }
}

fn handle_quiz_result_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('r') => app.start_quiz(),
        KeyCode::Char('q') | KeyCode::Esc | KeyCode::Enter => app.go_to_menu(),
        _ => {}
    }
}

fn handle_learn_menu_key(app: &mut App, key: KeyEvent) {
    let count = Operation::ALL.len();
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.go_to_menu(),
        KeyCode::Up | KeyCode::Char('k') => move_row(&mut app.learn_selected, count, false),
        KeyCode::Down | KeyCode::Char('j') => move_row(&mut app.learn_selected, count, true),
        KeyCode::Enter => app.start_lesson(Operation::ALL[app.learn_selected]),
        KeyCode::Char(ch @ '1'..='4') => {
            let idx = (ch as u8 - b'1') as usize;
            app.learn_selected = idx;
            app.start_lesson(Operation::ALL[idx]);
        }
        _ => {}
    }
}

fn handle_lesson_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Left => app.lesson_prev(),
        KeyCode::Right => app.lesson_next(),
        KeyCode::Char(' ') => app.lesson_tap(),
        KeyCode::Char('b') => app.lesson_borrow(),
        _ => match app.input.handle(key) {
            InputResult::Submit => app.lesson_enter(),
            InputResult::Cancel => app.go_to_learn_menu(),
            InputResult::Continue | InputResult::Ignored => {}
        },
    }
}

fn handle_tables_menu_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.go_to_menu(),
        KeyCode::Left | KeyCode::Char('h') => app.tables_move(-1, 0),
        KeyCode::Right | KeyCode::Char('l') => app.tables_move(1, 0),
        KeyCode::Up | KeyCode::Char('k') => app.tables_move(0, -1),
        KeyCode::Down | KeyCode::Char('j') => app.tables_move(0, 1),
        KeyCode::Enter => app.open_table(),
        KeyCode::Char('t') => app.start_table_quiz(),
        _ => {}
    }
}

fn handle_table_view_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.screen = AppScreen::TablesMenu,
        KeyCode::Char('t') | KeyCode::Enter => app.start_table_quiz(),
        _ => {}
    }
}

fn handle_table_quiz_key(app: &mut App, key: KeyEvent) {
    if key.code == KeyCode::Esc {
        app.leave_table_quiz();
        return;
    }
    let waiting = app.table_quiz.as_ref().is_some_and(|q| q.is_resolved());
    if waiting {
        return;
    }
    if app.input.handle(key) == InputResult::Submit {
        app.table_submit();
    }
}

fn handle_table_result_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('r') => app.start_table_quiz(),
        KeyCode::Char('q') | KeyCode::Esc | KeyCode::Enter => {
            app.leave_table_quiz();
            app.screen = AppScreen::TablesMenu;
        }
        _ => {}
    }
}

fn handle_settings_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.go_to_menu(),
        KeyCode::Up | KeyCode::Char('k') => {
            move_row(&mut app.settings_selected, SETTINGS_ROWS.len(), false)
        }
        KeyCode::Down | KeyCode::Char('j') => {
            move_row(&mut app.settings_selected, SETTINGS_ROWS.len(), true)
        }
        KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => {
            app.cycle_setting(app.settings_selected, true)
        }
        KeyCode::Left | KeyCode::Char('h') => app.cycle_setting(app.settings_selected, false),
        _ => {}
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    match app.screen {
        AppScreen::Menu => render_menu(frame, app),
        AppScreen::QuizSetup => render_quiz_setup(frame, app),
        AppScreen::Quiz => render_quiz(frame, app),
        AppScreen::QuizResult => render_quiz_result(frame, app),
        AppScreen::LearnMenu => render_learn_menu(frame, app),
        AppScreen::Lesson => render_lesson(frame, app),
        AppScreen::TablesMenu => render_tables_menu(frame, app),
        AppScreen::TableView => render_table_view(frame, app),
        AppScreen::TableQuiz => render_table_quiz(frame, app),
        AppScreen::TableResult => render_table_result(frame, app),
        AppScreen::Settings => render_settings(frame, app),
    }

    render_celebration(frame, app);
}

fn render_header(frame: &mut ratatui::Frame, app: &App, area: Rect, title: &str, info: &str) {
    let colors = &app.theme.colors;
    let mut spans = vec![
        Span::styled(
            format!(" {title} "),
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" {info}"),
            Style::default().fg(colors.header_fg()).bg(colors.header_bg()),
        ),
    ];
    if let Some(emoji) = app.feedback.emoji() {
        spans.push(Span::styled(
            format!("   {emoji}"),
            Style::default().bg(colors.header_bg()),
        ));
    }
    let header = Paragraph::new(vec![Line::from(""), Line::from(spans)])
        .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, area);
}

fn render_footer(frame: &mut ratatui::Frame, app: &App, area: Rect, hints: &[&str]) {
    let colors = &app.theme.colors;
    let mut lines = Vec::new();

    let mut status_spans = Vec::new();
    if let Some(notice) = &app.status {
        status_spans.push(Span::styled(
            format!("  {}", notice.text),
            Style::default().fg(colors.tone(notice.tone)),
        ));
    }
    if let Some(sound) = app.feedback.last_sound() {
        status_spans.push(Span::styled(
            format!("  \u{266a} {}", sound.as_str()),
            Style::default().fg(colors.muted()),
        ));
    }
    lines.push(Line::from(status_spans));

    for hint_line in pack_hint_lines(hints, area.width as usize) {
        lines.push(Line::from(Span::styled(
            hint_line,
            Style::default().fg(colors.muted()),
        )));
    }
    frame.render_widget(Paragraph::new(lines), area);
}

/// Sparkle rows across the top and bottom while a celebration is running.
fn render_celebration(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    if area.height < 4 {
        return;
    }
    let colors = &app.theme.colors;
    let width = area.width as usize;
    let rows = [area.y + 3, area.y + area.height - 4];
    for (i, y) in rows.into_iter().enumerate() {
        if let Some(line) = app.feedback.sparkle_row(width, i) {
            let row = Rect::new(area.x, y, area.width, 1);
            frame.render_widget(
                Paragraph::new(Span::styled(
                    line,
                    Style::default()
                        .fg(colors.warning())
                        .add_modifier(Modifier::BOLD),
                )),
                row,
            );
        }
    }
}

fn quiz_summary_line(app: &App) -> String {
    format!(
        "{} {} \u{00b7} {} \u{00b7} {} questions",
        app.config.operation.symbol(),
        app.config.operation.label(),
        app.config.level().label(),
        app.config.question_count
    )
}

/// Full-width band between the header and the footer.
fn body_area(layout: &AppLayout, area: Rect) -> Rect {
    Rect::new(
        area.x,
        layout.header.bottom(),
        area.width,
        layout.footer.y.saturating_sub(layout.header.bottom()),
    )
}

fn render_menu(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let layout = AppLayout::new(area);

    render_header(frame, app, layout.header, "Math Kids", &quiz_summary_line(app));

    let menu_area = ui::layout::centered_rect(50, 80, body_area(&layout, area));
    frame.render_widget(&app.menu, menu_area);

    render_footer(
        frame,
        app,
        layout.footer,
        &["[1-3] Start", "[s] Settings", "[\u{2191}\u{2193}] Move", "[q] Quit"],
    );
}

/// Two-line label/value rows in a bordered box, shared by quiz setup and
/// settings.
fn render_fields(
    frame: &mut ratatui::Frame,
    app: &App,
    area: Rect,
    title: &str,
    rows: &[&str],
    selected: usize,
    help: &str,
) {
    let colors = &app.theme.colors;
    let block = Block::bordered()
        .title(format!(" {title} "))
        .border_style(Style::default().fg(colors.accent()))
        .style(Style::default().bg(colors.bg()));
    let inner = block.inner(area);
    block.render(area, frame.buffer_mut());

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(rows.len() as u16 * 3),
            Constraint::Min(0),
            Constraint::Length(2),
        ])
        .split(inner);

    Paragraph::new(Line::from(Span::styled(
        "  \u{2191}\u{2193} choose a row, \u{2190}\u{2192} change it",
        Style::default().fg(colors.muted()),
    )))
    .render(layout[0], frame.buffer_mut());

    let field_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(rows.iter().map(|_| Constraint::Length(3)).collect::<Vec<_>>())
        .split(layout[1]);

    for (i, label) in rows.iter().enumerate() {
        let is_selected = i == selected;
        let indicator = if is_selected { " > " } else { "   " };
        let label_style = if is_selected {
            Style::default()
                .fg(colors.accent())
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(colors.fg())
        };
        let value_style = Style::default().fg(if is_selected {
            colors.answer()
        } else {
            colors.muted()
        });

        let lines = vec![
            Line::from(Span::styled(format!("{indicator}{label}:"), label_style)),
            Line::from(Span::styled(
                format!("  < {} >", app.setting_value(i)),
                value_style,
            )),
        ];
        Paragraph::new(lines).render(field_layout[i], frame.buffer_mut());
    }

    Paragraph::new(Line::from(Span::styled(
        format!("  {help}"),
        Style::default().fg(colors.accent()),
    )))
    .render(layout[3], frame.buffer_mut());
}

fn render_quiz_setup(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let centered = ui::layout::centered_rect(50, 60, area);
    render_fields(
        frame,
        app,
        centered,
        "New Quiz",
        &SETTINGS_ROWS[..QUIZ_SETUP_ROWS],
        app.quiz_setup_selected,
        "[Enter] Start!  [Esc] Back",
    );
    if let Some(notice) = &app.status {
        let row = Rect::new(centered.x, centered.bottom().min(area.bottom() - 1), centered.width, 1);
        frame.render_widget(
            Paragraph::new(Span::styled(
                notice.text.as_str(),
                Style::default().fg(app.theme.colors.tone(notice.tone)),
            ))
            .alignment(Alignment::Center),
            row,
        );
    }
}

fn render_quiz(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;
    let Some(view) = app.quiz.as_ref().and_then(|q| q.view()) else {
        return;
    };
    let layout = AppLayout::new(area);

    let title = format!("{} Quiz", view.operation.label());
    let mut info = format!("{}  \u{2b50} {}", view.progress_label, view.score);
    if layout.sidebar.is_none() {
        if let Some(badge) = &view.streak_badge {
            info.push_str(&format!("  {badge}"));
        }
    }
    render_header(frame, app, layout.header, &title, &info);

    let main = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(6),
        ])
        .split(layout.main);

    let progress = ProgressBar::new("Progress", &view.progress_label, view.progress, app.theme)
        .fill(colors.operation(view.operation));
    frame.render_widget(progress, main[0]);

    let block = Block::bordered()
        .border_style(Style::default().fg(colors.border_focused()))
        .style(Style::default().bg(colors.bg()));
    let inner = block.inner(main[1]);
    frame.render_widget(block, main[1]);

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("{} {} {} = ?", view.a, view.symbol, view.b),
            Style::default()
                .fg(colors.operation(view.operation))
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    if let Some(notice) = &view.feedback {
        lines.push(Line::from(Span::styled(
            notice.text.as_str(),
            Style::default()
                .fg(colors.tone(notice.tone))
                .add_modifier(Modifier::BOLD),
        )));
    }
    if let Some(hint) = &view.hint {
        lines.push(Line::from(Span::styled(
            hint.as_str(),
            Style::default().fg(colors.warning()),
        )));
    }
    lines.push(Line::from(""));
    if view.input_enabled {
        lines.push(Line::from(vec![
            Span::styled("Your answer: ", Style::default().fg(colors.fg())),
            Span::styled(
                format!("{}_", app.input.value()),
                Style::default()
                    .fg(colors.answer())
                    .add_modifier(Modifier::BOLD),
            ),
        ]));
    } else {
        lines.push(Line::from(Span::styled(
            "[Enter] Next \u{2192}",
            Style::default().fg(colors.success()),
        )));
    }
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        inner,
    );

    if let Some(sidebar) = layout.sidebar {
        let block = Block::bordered()
            .title(" Score ")
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(sidebar);
        frame.render_widget(block, sidebar);

        let mut lines = vec![
            Line::from(Span::styled(
                format!("\u{2b50} {} correct", view.score),
                Style::default().fg(colors.fg()),
            )),
            Line::from(""),
        ];
        if let Some(left) = view.attempts_left {
            lines.push(Line::from(Span::styled(
                format!("Tries left: {left}"),
                Style::default().fg(colors.muted()),
            )));
        }
        if let Some(badge) = &view.streak_badge {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                badge.as_str(),
                Style::default()
                    .fg(colors.warning())
                    .add_modifier(Modifier::BOLD),
            )));
        }
        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);
    }

    render_footer(
        frame,
        app,
        layout.footer,
        &["[0-9] Type", "[Enter] Check / Next", "[Backspace] Delete", "[Esc] Menu"],
    );
}

fn render_quiz_result(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    if let Some(summary) = app.quiz.as_ref().and_then(|q| q.summary()) {
        let centered = ui::layout::centered_rect(60, 60, area);
        frame.render_widget(Dashboard::quiz(summary, app.theme), centered);
    }
}

fn render_learn_menu(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;
    let layout = AppLayout::new(area);

    render_header(frame, app, layout.header, "Learn", "Pick a lesson");

    let centered = ui::layout::centered_rect(50, 60, body_area(&layout, area));
    let block = Block::bordered()
        .title(" Lessons ")
        .border_style(Style::default().fg(colors.accent()))
        .style(Style::default().bg(colors.bg()));
    let inner = block.inner(centered);
    frame.render_widget(block, centered);

    let mut lines = vec![Line::from("")];
    for (i, op) in Operation::ALL.iter().enumerate() {
        let is_selected = i == app.learn_selected;
        let indicator = if is_selected { ">" } else { " " };
        let style = if is_selected {
            Style::default()
                .fg(colors.operation(*op))
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(colors.fg())
        };
        lines.push(Line::from(Span::styled(
            format!(" {indicator} [{}] {}  {}", i + 1, op.symbol(), lesson_title(*op)),
            style,
        )));
        lines.push(Line::from(""));
    }
    frame.render_widget(Paragraph::new(lines), inner);

    render_footer(
        frame,
        app,
        layout.footer,
        &["[1-4] Start lesson", "[\u{2191}\u{2193}] Move", "[Esc] Menu"],
    );
}

fn step_label(spec: &StepSpec) -> String {
    match spec {
        StepSpec::Intro(_) => "Introduction".to_string(),
        StepSpec::ColumnDemo { operation, a, b } => {
            format!("Watch {}", operation.expression(*a, *b))
        }
        StepSpec::GroupsDemo { groups, per_group } => {
            format!("Watch {}", Operation::Multiply.expression(*groups, *per_group))
        }
        StepSpec::BreakApartDemo { a, b } => {
            format!("Watch {}", Operation::Multiply.expression(*a, *b))
        }
        StepSpec::SharingDemo { total, plates } => {
            format!("Share {}", Operation::Divide.expression(*total, *plates))
        }
        StepSpec::GroupingDemo { total, per_group } => {
            format!("Group {}", Operation::Divide.expression(*total, *per_group))
        }
        StepSpec::Connection => "Times and sharing".to_string(),
        StepSpec::TryIt(_) => "Your turn".to_string(),
        StepSpec::Summary(_) => "Summary".to_string(),
    }
}

fn render_lesson(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;
    let Some(lesson) = app.lesson.as_ref() else {
        return;
    };
    let view = lesson.view();
    let layout = AppLayout::new(area);

    render_header(frame, app, layout.header, view.title, &view.progress_label);

    let main = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(8)])
        .split(layout.main);

    let progress = ProgressBar::new("Lesson", &view.progress_label, view.progress, app.theme)
        .fill(colors.operation(view.operation));
    frame.render_widget(progress, main[0]);
    frame.render_widget(LessonPanel::new(view.step, app.input.value(), app.theme), main[1]);

    if let Some(sidebar) = layout.sidebar {
        let block = Block::bordered()
            .title(" Steps ")
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(sidebar);
        frame.render_widget(block, sidebar);

        let lines: Vec<Line> = lesson
            .plan
            .iter()
            .enumerate()
            .map(|(i, spec)| {
                let (marker, style) = if i == lesson.index {
                    (
                        "\u{25b6}",
                        Style::default()
                            .fg(colors.accent())
                            .add_modifier(Modifier::BOLD),
                    )
                } else if i < lesson.index {
                    ("\u{2714}", Style::default().fg(colors.success()))
                } else {
                    (" ", Style::default().fg(colors.muted()))
                };
                Line::from(Span::styled(format!(" {marker} {}", step_label(spec)), style))
            })
            .collect();
        frame.render_widget(Paragraph::new(lines), inner);
    }

    let next_hint = if view.next_enabled {
        format!("[\u{2192}] {}", view.next_label)
    } else {
        "[\u{2192}] Next (finish this step first)".to_string()
    };
    let mut hints: Vec<&str> = Vec::new();
    if view.prev_visible {
        hints.push("[\u{2190}] Back");
    }
    hints.push(&next_hint);
    match lesson.plan.get(lesson.index).map(|spec| spec.kind()) {
        Some(StepKind::Demo) => hints.push("[Space] Show me"),
        Some(StepKind::TryIt) => {
            hints.push("[Enter] Check");
            if lesson.operation == Operation::Subtract {
                hints.push("[b] Borrow");
            }
        }
        Some(StepKind::Static) | None => {}
    }
    hints.push("[Esc] Lessons");
    render_footer(frame, app, layout.footer, &hints);
}

fn render_tables_menu(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let layout = AppLayout::new(area);
    render_header(
        frame,
        app,
        layout.header,
        "Times Tables",
        &format!("{} times table selected", app.table_base),
    );

    let centered = ui::layout::centered_rect(50, 50, body_area(&layout, area));
    frame.render_widget(
        TableGrid {
            selected: app.table_base,
            theme: app.theme,
        },
        centered,
    );

    render_footer(
        frame,
        app,
        layout.footer,
        &["[Arrows] Pick", "[Enter] Show table", "[t] Test yourself", "[Esc] Menu"],
    );
}

fn render_table_view(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let layout = AppLayout::new(area);
    render_header(
        frame,
        app,
        layout.header,
        "Times Tables",
        &format!("Learn the {} times table", app.table_base),
    );

    let centered = ui::layout::centered_rect(40, 70, body_area(&layout, area));
    frame.render_widget(
        TableReference {
            rows: &app.table_rows,
            theme: app.theme,
        },
        centered,
    );

    render_footer(
        frame,
        app,
        layout.footer,
        &["[t/Enter] Test yourself", "[Esc] Back"],
    );
}

fn render_table_quiz(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;
    let Some(view) = app.table_quiz.as_ref().and_then(|q| q.view()) else {
        return;
    };
    let layout = AppLayout::new(area);

    render_header(
        frame,
        app,
        layout.header,
        &format!("{} Times Table Quiz", view.base),
        &format!("{}  \u{2b50} {}", view.progress_label, view.score),
    );

    let main = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(6)])
        .split(layout.main);

    let progress = ProgressBar::new("Progress", &view.progress_label, view.progress, app.theme)
        .fill(colors.operation(Operation::Multiply));
    frame.render_widget(progress, main[0]);

    let block = Block::bordered()
        .border_style(Style::default().fg(colors.border_focused()))
        .style(Style::default().bg(colors.bg()));
    let inner = block.inner(main[1]);
    frame.render_widget(block, main[1]);

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("{} \u{00d7} {} = ?", view.base, view.multiplier),
            Style::default()
                .fg(colors.operation(Operation::Multiply))
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    if let Some(notice) = &view.feedback {
        lines.push(Line::from(Span::styled(
            notice.text.as_str(),
            Style::default()
                .fg(colors.tone(notice.tone))
                .add_modifier(Modifier::BOLD),
        )));
    }
    lines.push(Line::from(""));
    if view.input_enabled {
        lines.push(Line::from(vec![
            Span::styled("Your answer: ", Style::default().fg(colors.fg())),
            Span::styled(
                format!("{}_", app.input.value()),
                Style::default()
                    .fg(colors.answer())
                    .add_modifier(Modifier::BOLD),
            ),
        ]));
    }
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);

    render_footer(
        frame,
        app,
        layout.footer,
        &["[0-9] Type", "[Enter] Check", "[Esc] Stop"],
    );
}

fn render_table_result(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    if let Some(summary) = app.table_quiz.as_ref().and_then(|q| q.summary()) {
        let centered = ui::layout::centered_rect(60, 60, area);
        frame.render_widget(Dashboard::table(summary, app.theme), centered);
    }
}

fn render_settings(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let centered = ui::layout::centered_rect(60, 80, area);
    render_fields(
        frame,
        app,
        centered,
        "Settings",
        &SETTINGS_ROWS,
        app.settings_selected,
        "[Esc] Back (changes save automatically)",
    );
}
