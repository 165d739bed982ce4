use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use vocab_quest::app::{self, App, AppScreen, MenuEntry};
use vocab_quest::audio::AudioService;
use vocab_quest::config::Config;
use vocab_quest::event::{AppEvent, EventHandler};
use vocab_quest::logging;
use vocab_quest::remark::{CannedRemarks, RemarkProvider};
use vocab_quest::session::{GameMode, InputKind};
use vocab_quest::store::JsonStore;
use vocab_quest::ui::components::achievement_list::AchievementList;
use vocab_quest::ui::components::dashboard::Dashboard;
use vocab_quest::ui::components::fireworks::FireworksOverlay;
use vocab_quest::ui::components::galaxy_map::GalaxyMap;
use vocab_quest::ui::components::hud::Hud;
use vocab_quest::ui::components::matching_grid::{self, MatchingGrid};
use vocab_quest::ui::components::menu::Menu;
use vocab_quest::ui::components::progress_bar::ProgressBar;
use vocab_quest::ui::components::quiz_area::QuizArea;
use vocab_quest::ui::layout::{self, AppLayout};
use vocab_quest::ui::theme::Theme;
use vocab_quest::words::BundledWords;

const SETTINGS_FIELDS: usize = 3;

#[derive(Parser)]
#[command(name = "vocab-quest", version, about = "Terminal vocabulary quest across the galaxy")]
struct Cli {
    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(short, long, help = "Start straight into a game mode (e.g. survival, matching)")]
    mode: Option<GameMode>,

    #[arg(short, long, help = "Fixed seed for reproducible word order")]
    seed: Option<u64>,

    #[arg(short, long, help = "Path to a custom word bank (JSON)")]
    words: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load()?;
    if let Err(err) = logging::init(&config, &logging::log_dir()) {
        eprintln!("Logging disabled: {err}");
    }
    if let Some(theme_name) = cli.theme {
        config.theme = theme_name;
    }
    let mut theme = Theme::load(&config.theme).unwrap_or_default();

    let words_path = cli.words.or_else(|| config.word_bank_path.clone());
    let words = BundledWords::load_or_bundled(words_path.as_deref());
    let store = JsonStore::new()?;
    let audio = AudioService::new(
        true,
        config.speech_program.clone(),
        config.source_locale.clone(),
        config.target_locale.clone(),
    );
    let provider = remark_provider(&config);

    let mut app = App::new(config, words, Box::new(store), audio, provider, cli.seed);
    tracing::info!(words = app.word_count(), "Starting");

    if let Some(mode) = cli.mode {
        app.start(mode, Instant::now());
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(app.frame_interval());

    let result = run_app(&mut terminal, &mut app, &mut theme, &events);

    app.shutdown();
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        tracing::error!(%err, "Exited with error");
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn remark_provider(config: &Config) -> Option<Arc<dyn RemarkProvider>> {
    if !config.remarks_enabled {
        return None;
    }
    #[cfg(feature = "network")]
    {
        use vocab_quest::remark::gemini::GeminiRemarks;
        if let Some(gemini) =
            GeminiRemarks::from_env(&config.remark_api_key_env, &config.remark_model)
        {
            tracing::info!(model = %config.remark_model, "Using Gemini remarks");
            return Some(Arc::new(gemini));
        }
    }
    Some(Arc::new(CannedRemarks))
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    theme: &mut Theme,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app, theme))?;

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, theme, key),
            AppEvent::Tick | AppEvent::Resize => {}
        }
        app.tick(Instant::now());
        events.set_tick_rate(app.frame_interval());

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, theme: &mut Theme, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.quit();
        return;
    }

    match app.screen() {
        AppScreen::Menu => handle_menu_key(app, key),
        AppScreen::Playing => handle_playing_key(app, key),
        AppScreen::Result => handle_result_key(app, key),
        AppScreen::GalaxyMap => handle_galaxy_key(app, key),
        AppScreen::Settings => handle_settings_key(app, theme, key),
    }
}

fn activate(app: &mut App, entry: MenuEntry) {
    let now = Instant::now();
    match entry {
        MenuEntry::Play(mode) => {
            app.start(mode, now);
        }
        MenuEntry::GalaxyMap => {
            app.open_galaxy_map(now);
        }
        MenuEntry::Settings => app.open_settings(),
        MenuEntry::Quit => app.quit(),
    }
}

fn handle_menu_key(app: &mut App, key: KeyEvent) {
    let entries = app::menu_entries();
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.quit(),
        KeyCode::Char('g') => activate(app, MenuEntry::GalaxyMap),
        KeyCode::Char('c') => activate(app, MenuEntry::Settings),
        KeyCode::Char(ch @ '1'..='9') => {
            let index = ch as usize - '1' as usize;
            if let Some(entry @ MenuEntry::Play(_)) = entries.get(index).copied() {
                activate(app, entry);
            }
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.menu_selected = app.menu_selected.checked_sub(1).unwrap_or(entries.len() - 1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.menu_selected = (app.menu_selected + 1) % entries.len();
        }
        KeyCode::Enter => {
            if let Some(entry) = entries.get(app.menu_selected).copied() {
                activate(app, entry);
            }
        }
        _ => {}
    }
}

fn handle_playing_key(app: &mut App, key: KeyEvent) {
    let now = Instant::now();
    if key.code == KeyCode::Esc {
        app.leave(now);
        return;
    }
    let Some(kind) = app.session().map(|s| s.mode.input()) else {
        return;
    };

    match kind {
        InputKind::FreeText => match key.code {
            KeyCode::Enter => {
                app.submit(now);
            }
            KeyCode::Backspace => app.backspace(),
            KeyCode::Char(ch) => app.type_char(ch),
            _ => {}
        },
        InputKind::MultipleChoice => match key.code {
            KeyCode::Char(ch @ '1'..='9') => {
                app.select_option(ch as usize - '1' as usize, now);
            }
            KeyCode::Up | KeyCode::Char('k') => app.move_option(-1),
            KeyCode::Down | KeyCode::Char('j') => app.move_option(1),
            KeyCode::Enter => {
                app.submit(now);
            }
            _ => {}
        },
        InputKind::Cards => {
            let count = app
                .session()
                .and_then(|s| s.matching.as_ref())
                .map_or(0, |b| b.cards.len());
            match key.code {
                KeyCode::Left | KeyCode::Char('h') => app.move_card(-1),
                KeyCode::Right | KeyCode::Char('l') => app.move_card(1),
                KeyCode::Up | KeyCode::Char('k') => {
                    app.card_selected = matching_grid::row_step(app.card_selected, -1, count);
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    app.card_selected = matching_grid::row_step(app.card_selected, 1, count);
                }
                KeyCode::Enter | KeyCode::Char(' ') => {
                    app.submit(now);
                }
                _ => {}
            }
        }
    }
}

fn handle_result_key(app: &mut App, key: KeyEvent) {
    let now = Instant::now();
    match key.code {
        KeyCode::Char('r') => {
            let mode = app.session().map(|s| s.mode);
            app.leave(now);
            if let Some(mode) = mode {
                app.start(mode, now);
            }
        }
        KeyCode::Char('g') => {
            app.leave(now);
            app.open_galaxy_map(now);
        }
        KeyCode::Enter | KeyCode::Esc | KeyCode::Char('q') => {
            app.leave(now);
        }
        _ => {}
    }
}

fn handle_galaxy_key(app: &mut App, key: KeyEvent) {
    if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q')) {
        app.leave(Instant::now());
    }
}

fn handle_settings_key(app: &mut App, theme: &mut Theme, key: KeyEvent) {
    if app.confirm_reset {
        match key.code {
            KeyCode::Char('y') => {
                app.reset_progress();
            }
            _ => app.confirm_reset = false,
        }
        return;
    }

    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => {
            if let Err(err) = app.config.save() {
                tracing::warn!(%err, "Could not save config");
            }
            app.close_settings();
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.settings_selected = app.settings_selected.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.settings_selected = (app.settings_selected + 1).min(SETTINGS_FIELDS - 1);
        }
        KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => match app.settings_selected {
            0 => {
                app.toggle_sound();
            }
            1 => cycle_theme(app, theme, 1),
            _ => {
                app.reset_progress();
            }
        },
        KeyCode::Left | KeyCode::Char('h') => match app.settings_selected {
            0 => {
                app.toggle_sound();
            }
            1 => cycle_theme(app, theme, -1),
            _ => {}
        },
        _ => {}
    }
}

fn cycle_theme(app: &mut App, theme: &mut Theme, delta: isize) {
    let mut names = Theme::available_themes();
    names.sort();
    if names.is_empty() {
        return;
    }
    let current = names
        .iter()
        .position(|n| *n == app.config.theme)
        .unwrap_or(0) as isize;
    let next = (current + delta).rem_euclid(names.len() as isize) as usize;
    if let Some(loaded) = Theme::load(&names[next]) {
        app.config.theme = names[next].clone();
        *theme = loaded;
    }
}

fn render(frame: &mut ratatui::Frame, app: &App, theme: &Theme) {
    let area = frame.area();
    let colors = &theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    match app.screen() {
        AppScreen::Menu => render_menu(frame, app, theme),
        AppScreen::Playing => render_playing(frame, app, theme),
        AppScreen::Result => render_result(frame, app, theme),
        AppScreen::GalaxyMap => render_galaxy(frame, app, theme),
        AppScreen::Settings => render_settings(frame, app, theme),
    }

    if !app.fireworks.is_idle() {
        frame.render_widget(FireworksOverlay::new(&app.fireworks, theme), area);
    }
}

fn render_header(frame: &mut ratatui::Frame, area: Rect, app: &App, theme: &Theme) {
    let colors = &theme.colors;
    let progress = app.progress.progress();
    let header_info = format!(
        " Score {} | Best streak {} | {} words learned | {} games",
        progress.total_score,
        progress.best_streak_ever,
        progress.learned_count(),
        progress.games_played,
    );
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " vocab-quest ",
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            header_info,
            Style::default().fg(colors.muted()).bg(colors.header_bg()),
        ),
    ]))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, area);
}

fn render_footer(frame: &mut ratatui::Frame, area: Rect, hints: &[&str], theme: &Theme) {
    let lines: Vec<Line> = layout::pack_hint_lines(hints, area.width as usize)
        .into_iter()
        .map(|l| Line::from(Span::styled(l, Style::default().fg(theme.colors.muted()))))
        .collect();
    frame.render_widget(Paragraph::new(lines), area);
}

fn render_menu(frame: &mut ratatui::Frame, app: &App, theme: &Theme) {
    let area = frame.area();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    render_header(frame, layout[0], app, theme);

    let menu = Menu::new(&app::menu_entries(), app.menu_selected, theme);
    let menu_area = layout::centered_rect(60, 90, layout[1]);
    frame.render_widget(&menu, menu_area);

    render_footer(
        frame,
        layout[2],
        &["[1-8] Play", "[g] Galaxy", "[c] Settings", "[q] Quit"],
        theme,
    );
}

fn render_playing(frame: &mut ratatui::Frame, app: &App, theme: &Theme) {
    let Some(session) = app.session() else {
        return;
    };
    let area = frame.area();
    let app_layout = AppLayout::new(area);

    frame.render_widget(Hud::new(session, theme), app_layout.header);

    let show_bar = app_layout.tier.show_timer_bar(area.height);
    let boss_bar = show_bar && session.boss_health.is_some();
    let timer_bar = show_bar && session.time_left.is_some() && session.mode.time_limit_secs().is_some();

    let mut constraints = vec![Constraint::Min(6)];
    if boss_bar {
        constraints.push(Constraint::Length(3));
    }
    if timer_bar {
        constraints.push(Constraint::Length(3));
    }
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(app_layout.main);

    match &session.matching {
        Some(board) => {
            frame.render_widget(MatchingGrid::new(board, app.card_selected, theme), main_layout[0]);
        }
        None => {
            let quiz = QuizArea::new(
                session,
                &app.input,
                app.option_selected,
                app.remark.as_ref(),
                theme,
            );
            frame.render_widget(quiz, main_layout[0]);
        }
    }

    let mut idx = 1;
    if boss_bar {
        if let Some(health) = session.boss_health {
            let max = vocab_quest::session::mode::BOSS_MAX_HEALTH;
            let bar = ProgressBar::new("👾 Boss", health as f64 / max as f64, theme)
                .caption(format!("{health}/{max}"))
                .fill(theme.colors.error());
            frame.render_widget(bar, main_layout[idx]);
        }
        idx += 1;
    }
    if timer_bar {
        if let (Some(left), Some(limit)) = (session.time_left, session.mode.time_limit_secs()) {
            let bar = ProgressBar::new("Time", left as f64 / limit as f64, theme)
                .caption(format!("{left}s"))
                .fill(if left <= 5 {
                    theme.colors.warning()
                } else {
                    theme.colors.bar_filled()
                });
            frame.render_widget(bar, main_layout[idx]);
        }
    }

    if let Some(sidebar) = app_layout.sidebar {
        render_answer_log(frame, sidebar, app, theme);
    }

    let hints: &[&str] = match session.mode.input() {
        InputKind::FreeText => &["[Enter] Submit", "[Backspace] Delete", "[Esc] Leave"],
        InputKind::MultipleChoice => &["[1-4] Pick", "[↑↓] Move", "[Enter] Choose", "[Esc] Leave"],
        InputKind::Cards => &["[←↑↓→] Move", "[Enter] Flip", "[Esc] Leave"],
    };
    render_footer(frame, app_layout.footer, hints, theme);
}

fn render_answer_log(frame: &mut ratatui::Frame, area: Rect, app: &App, theme: &Theme) {
    let colors = &theme.colors;
    let block = Block::bordered()
        .title(" Log ")
        .border_style(Style::default().fg(colors.border()));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(session) = app.session() else {
        return;
    };
    let lines: Vec<Line> = session
        .history
        .iter()
        .rev()
        .take(inner.height as usize)
        .map(|entry| {
            let (mark, color) = if entry.was_correct {
                ("✓", colors.success())
            } else {
                ("✗", colors.error())
            };
            Line::from(vec![
                Span::styled(format!("{mark} "), Style::default().fg(color)),
                Span::styled(entry.word.target.clone(), Style::default().fg(colors.fg())),
            ])
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_result(frame: &mut ratatui::Frame, app: &App, theme: &Theme) {
    let area = frame.area();
    let Some(session) = app.session() else {
        return;
    };
    let Some(outcome) = &session.outcome else {
        return;
    };

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    let centered = layout::centered_rect(60, 80, layout[0]);
    let dashboard = Dashboard::new(outcome, &session.history, &app.unlocked, theme);
    frame.render_widget(dashboard, centered);

    render_footer(
        frame,
        layout[1],
        &["[r] Play again", "[g] Galaxy", "[Enter] Menu"],
        theme,
    );
}

fn render_galaxy(frame: &mut ratatui::Frame, app: &App, theme: &Theme) {
    let area = frame.area();
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    render_header(frame, layout[0], app, theme);
    let learned = app.progress.progress().learned_count();
    frame.render_widget(GalaxyMap::new(learned, theme), layout[1]);
    render_footer(frame, layout[2], &["[Esc] Back"], theme);
}

fn render_settings(frame: &mut ratatui::Frame, app: &App, theme: &Theme) {
    let area = frame.area();
    let colors = &theme.colors;

    let centered = layout::centered_rect(60, 85, area);

    let block = Block::bordered()
        .title(" Settings ")
        .border_style(Style::default().fg(colors.accent()))
        .style(Style::default().bg(colors.bg()));
    let inner = block.inner(centered);
    block.render(centered, frame.buffer_mut());

    let sound = if app.progress.progress().sound_enabled {
        "On"
    } else {
        "Off"
    };
    let reset_value = if app.confirm_reset {
        "Press [y] to erase all progress, any other key cancels".to_string()
    } else {
        format!("{} words learned", app.progress.progress().learned_count())
    };
    let fields: Vec<(&str, String)> = vec![
        ("Sound", format!("< {sound} >")),
        ("Theme", format!("< {} >", app.config.theme)),
        ("Reset progress", reset_value),
    ];

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(fields.len() as u16 * 3),
            Constraint::Min(0),
            Constraint::Length(2),
        ])
        .split(inner);

    Paragraph::new(Line::from(Span::styled(
        "  Use arrows to navigate, Enter/Right to change, ESC to save & exit",
        Style::default().fg(colors.muted()),
    )))
    .render(layout[0], frame.buffer_mut());

    let field_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(fields.iter().map(|_| Constraint::Length(3)).collect::<Vec<_>>())
        .split(layout[1]);

    for (i, (label, value)) in fields.iter().enumerate() {
        let is_selected = i == app.settings_selected;
        let indicator = if is_selected { " > " } else { "   " };

        let label_style = Style::default()
            .fg(if is_selected { colors.accent() } else { colors.fg() })
            .add_modifier(if is_selected {
                Modifier::BOLD
            } else {
                Modifier::empty()
            });
        let value_color = if i == 2 && app.confirm_reset {
            colors.error()
        } else if is_selected {
            colors.warning()
        } else {
            colors.muted()
        };

        let lines = vec![
            Line::from(Span::styled(format!("{indicator}{label}:"), label_style)),
            Line::from(Span::styled(
                format!("    {value}"),
                Style::default().fg(value_color),
            )),
        ];
        Paragraph::new(lines).render(field_layout[i], frame.buffer_mut());
    }

    AchievementList::new(app.progress.progress(), theme).render(layout[2], frame.buffer_mut());

    Paragraph::new(Line::from(Span::styled(
        "  [ESC] Save & back  [Enter/arrows] Change value",
        Style::default().fg(colors.accent()),
    )))
    .render(layout[3], frame.buffer_mut());
}
