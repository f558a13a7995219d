use std::io;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols;
use ratatui::widgets::{
    Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Clear, Dataset, GraphType, Paragraph,
};

use fpl_terminal::enrich::enrich_players;
use fpl_terminal::fetch::{self, FetchCache};
use fpl_terminal::rankings::{
    RankedEntry, captain_picks, differential_players, form_fixture_scatter, set_piece_takers,
    value_picks,
};
use fpl_terminal::state::{AppState, Position, Tab};
use fpl_terminal::team_rating::TeamRatingRow;

struct App {
    state: AppState,
    should_quit: bool,
}

impl App {
    fn new(state: AppState) -> Self {
        Self {
            state,
            should_quit: false,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        if self.state.picker_open {
            self.on_picker_key(key);
            return;
        }
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('1') => self.state.tab = Tab::CaptainPicks,
            KeyCode::Char('2') => self.state.tab = Tab::Differentials,
            KeyCode::Char('3') => self.state.tab = Tab::SetPieceTakers,
            KeyCode::Char('4') => self.state.tab = Tab::ValuePicks,
            KeyCode::Char('5') => self.state.tab = Tab::FormFixture,
            KeyCode::Char('6') => self.state.tab = Tab::TeamRating,
            KeyCode::Tab => self.state.next_tab(),
            KeyCode::BackTab => self.state.prev_tab(),
            KeyCode::Char('g') => self.state.toggle_position(Position::Goalkeeper),
            KeyCode::Char('d') => self.state.toggle_position(Position::Defender),
            KeyCode::Char('m') => self.state.toggle_position(Position::Midfielder),
            KeyCode::Char('f') => self.state.toggle_position(Position::Forward),
            KeyCode::Char('t') | KeyCode::Char('T') => self.state.picker_open = true,
            KeyCode::Char('[') => self.state.step_max_price(-0.5),
            KeyCode::Char(']') => self.state.step_max_price(0.5),
            KeyCode::Char('j') | KeyCode::Down => self.state.scroll_down(),
            KeyCode::Char('k') | KeyCode::Up => self.state.scroll_up(),
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            _ => {}
        }
    }

    fn on_picker_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('t') | KeyCode::Char('T') | KeyCode::Char('q') => {
                self.state.picker_open = false;
            }
            KeyCode::Char('j') | KeyCode::Down => self.state.picker_next(),
            KeyCode::Char('k') | KeyCode::Up => self.state.picker_prev(),
            KeyCode::Char(' ') | KeyCode::Enter => self.state.toggle_selected_team(),
            KeyCode::Char('a') => self.state.toggle_all_teams(),
            _ => {}
        }
    }
}

fn main() -> Result<()> {
    // One fetch per endpoint per process; any transport or decode failure is
    // fatal to the render and lands here before the terminal is touched.
    let cache = FetchCache::new();
    let (players, teams) = fetch::fetch_players_and_teams(&cache).context("data unavailable")?;
    let fixtures = fetch::fetch_fixtures(&cache).context("data unavailable")?;
    let enriched = enrich_players(&players, &teams);

    let mut state = AppState::new();
    let counts = (enriched.len(), teams.len(), fixtures.len());
    state.load_data(enriched, teams, fixtures);
    state.push_log(format!(
        "[INFO] Loaded {} players, {} teams, {} fixtures",
        counts.0, counts.1, counts.2
    ));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let mut app = App::new(state);
    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);

    loop {
        terminal.draw(|f| ui(f, app))?;

        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header =
        Paragraph::new(header_text(&app.state)).block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    match app.state.tab {
        Tab::CaptainPicks => render_top_view(
            frame,
            chunks[1],
            &captain_picks(&app.state.filtered),
            "Top 10 Captain Picks",
        ),
        Tab::Differentials => render_top_view(
            frame,
            chunks[1],
            &differential_players(&app.state.filtered),
            "Top 10 Differential Players",
        ),
        Tab::SetPieceTakers => render_top_view(
            frame,
            chunks[1],
            &set_piece_takers(&app.state.filtered),
            "Top 10 Set-Piece Takers (ICT Index)",
        ),
        Tab::ValuePicks => render_top_view(
            frame,
            chunks[1],
            &value_picks(&app.state.filtered),
            "Top 10 Value Picks (Points per Million)",
        ),
        Tab::FormFixture => render_scatter(frame, chunks[1], &app.state),
        Tab::TeamRating => render_team_table(frame, chunks[1], &app.state),
    }

    let console = Paragraph::new(console_text(&app.state))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, chunks[2]);

    let footer = Paragraph::new(footer_text(&app.state));
    frame.render_widget(footer, chunks[3]);

    if app.state.picker_open {
        render_team_picker(frame, frame.size(), &app.state);
    }
    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &AppState) -> String {
    let fetched = state
        .fetched_at
        .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "never".to_string());
    let line1 = format!("FPL INSIGHTS | {}", state.tab.label());
    let line2 = format!("{} | fetched {}", state.filter_summary(), fetched);
    format!("{line1}\n{line2}")
}

fn footer_text(state: &AppState) -> String {
    if state.picker_open {
        return "j/k Move | Space Toggle | a All/None | Esc Close".to_string();
    }
    match state.tab {
        Tab::TeamRating => {
            "1-6 Tabs | j/k Scroll | g/d/m/f Positions | t Teams | [/] Price | ? Help | q Quit"
                .to_string()
        }
        _ => "1-6 Tabs | Tab Next | g/d/m/f Positions | t Teams | [/] Price | ? Help | q Quit"
            .to_string(),
    }
}

fn console_text(state: &AppState) -> String {
    if state.logs.is_empty() {
        return "No messages yet".to_string();
    }
    state
        .logs
        .iter()
        .rev()
        .take(1)
        .cloned()
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_top_view(frame: &mut Frame, area: Rect, entries: &[RankedEntry], title: &str) {
    let block = Block::default().title(title.to_string()).borders(Borders::ALL);
    if entries.is_empty() {
        let empty = Paragraph::new("No players to rank")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let bars: Vec<Bar> = entries
        .iter()
        .map(|entry| {
            let label = match &entry.team_name {
                Some(team) => format!("{} ({team})", entry.web_name),
                None => entry.web_name.clone(),
            };
            Bar::default()
                .value(bar_value(entry.score))
                .label(Line::from(label))
                .text_value(format!("{:.1}", entry.score))
                .style(Style::default().fg(Color::Cyan))
        })
        .collect();

    let chart = BarChart::default()
        .block(block)
        .data(BarGroup::default().bars(&bars))
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(1);
    frame.render_widget(chart, area);
}

// Scores are fractional; scale them up so short bars stay visible.
fn bar_value(score: f64) -> u64 {
    (score * 10.0).round().max(0.0) as u64
}

fn render_scatter(frame: &mut Frame, area: Rect, state: &AppState) {
    let points = form_fixture_scatter(&state.filtered);
    if points.is_empty() {
        let empty = Paragraph::new("No players to plot")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().title("Form vs Fixture Difficulty").borders(Borders::ALL));
        frame.render_widget(empty, area);
        return;
    }

    // Larger plot sizes (points per million) get the brighter dataset.
    let median_size = median(points.iter().map(|p| p.size));
    let mut high: Vec<(f64, f64)> = Vec::new();
    let mut low: Vec<(f64, f64)> = Vec::new();
    for point in &points {
        let xy = (point.fixture_difficulty, point.form);
        if point.size >= median_size {
            high.push(xy);
        } else {
            low.push(xy);
        }
    }

    let max_x = points
        .iter()
        .map(|p| p.fixture_difficulty)
        .fold(1.0_f64, f64::max);
    let max_y = points.iter().map(|p| p.form).fold(1.0_f64, f64::max);
    let x_hi = max_x * 1.05;
    let y_hi = max_y * 1.1;

    let datasets = vec![
        Dataset::default()
            .name("low value")
            .marker(symbols::Marker::Dot)
            .graph_type(GraphType::Scatter)
            .style(Style::default().fg(Color::DarkGray))
            .data(&low),
        Dataset::default()
            .name("high value")
            .marker(symbols::Marker::Dot)
            .graph_type(GraphType::Scatter)
            .style(Style::default().fg(Color::Cyan))
            .data(&high),
    ];

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .title("Form vs Fixture Difficulty")
                .borders(Borders::ALL),
        )
        .x_axis(
            Axis::default()
                .title("Fixture Difficulty")
                .bounds([0.0, x_hi])
                .labels(axis_labels(0.0, x_hi)),
        )
        .y_axis(
            Axis::default()
                .title("Form")
                .bounds([0.0, y_hi])
                .labels(axis_labels(0.0, y_hi)),
        );
    frame.render_widget(chart, area);
}

fn axis_labels(lo: f64, hi: f64) -> Vec<Span<'static>> {
    vec![
        Span::raw(format!("{lo:.0}")),
        Span::raw(format!("{:.0}", (lo + hi) / 2.0)),
        Span::raw(format!("{hi:.0}")),
    ]
}

fn median(values: impl Iterator<Item = f64>) -> f64 {
    let mut sorted: Vec<f64> = values.collect();
    if sorted.is_empty() {
        return 0.0;
    }
    sorted.sort_by(f64::total_cmp);
    sorted[sorted.len() / 2]
}

fn render_team_table(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default().title("Team Rating").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.height < 2 {
        return;
    }
    if state.team_rating.is_empty() {
        let empty =
            Paragraph::new("No team data").style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, inner);
        return;
    }

    let widths = team_columns();
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(inner);
    render_team_header(frame, sections[0], &widths);

    let list_area = sections[1];
    let visible = list_area.height as usize;
    let total = state.team_rating.len();
    let max_start = total.saturating_sub(visible);
    let start = state.table_scroll.min(max_start);
    let end = (start + visible).min(total);

    for (i, idx) in (start..end).enumerate() {
        let row_area = Rect {
            x: list_area.x,
            y: list_area.y + i as u16,
            width: list_area.width,
            height: 1,
        };
        render_team_row(frame, row_area, &widths, &state.team_rating[idx]);
    }
}

fn team_columns() -> [Constraint; 8] {
    [
        Constraint::Length(5),
        Constraint::Min(14),
        Constraint::Length(5),
        Constraint::Length(5),
        Constraint::Length(5),
        Constraint::Length(5),
        Constraint::Length(5),
        Constraint::Length(5),
    ]
}

fn render_team_header(frame: &mut Frame, area: Rect, widths: &[Constraint]) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(widths)
        .split(area);
    let style = Style::default().add_modifier(Modifier::BOLD);

    render_cell_text(frame, cols[0], "#", style);
    render_cell_text(frame, cols[1], "Team", style);
    render_cell_text(frame, cols[2], "Att", style);
    render_cell_text(frame, cols[3], "Def", style);
    render_cell_text(frame, cols[4], "Ovr", style);
    render_cell_text(frame, cols[5], "GF", style);
    render_cell_text(frame, cols[6], "GA", style);
    render_cell_text(frame, cols[7], "GD", style);
}

fn render_team_row(frame: &mut Frame, area: Rect, widths: &[Constraint], row: &TeamRatingRow) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(widths)
        .split(area);
    let style = Style::default();

    render_cell_text(frame, cols[0], &row.rank.to_string(), style);
    render_cell_text(frame, cols[1], &row.name, style);
    render_cell_text(frame, cols[2], &row.attack.to_string(), style);
    render_cell_text(frame, cols[3], &row.defence.to_string(), style);
    render_cell_text(frame, cols[4], &row.overall.to_string(), style);
    render_cell_text(frame, cols[5], &opt_stat(row.goals_scored), style);
    render_cell_text(frame, cols[6], &opt_stat(row.goals_conceded), style);
    render_cell_text(frame, cols[7], &opt_stat(row.goal_difference), style);
}

fn opt_stat(value: Option<i64>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "-".to_string(),
    }
}

fn render_cell_text(frame: &mut Frame, area: Rect, text: &str, style: Style) {
    let paragraph = Paragraph::new(text.to_string()).style(style);
    frame.render_widget(paragraph, area);
}

fn render_team_picker(frame: &mut Frame, area: Rect, state: &AppState) {
    let popup_area = centered_rect(40, 70, area);
    frame.render_widget(Clear, popup_area);

    let block = Block::default().title("Teams").borders(Borders::ALL);
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    if inner.height == 0 {
        return;
    }
    let visible = inner.height as usize;
    let total = state.team_names.len();
    let (start, end) = visible_range(state.picker_selected, total, visible);

    for (i, idx) in (start..end).enumerate() {
        let name = &state.team_names[idx];
        let mark = if state.criteria.teams.contains(name) {
            "[x]"
        } else {
            "[ ]"
        };
        let style = if idx == state.picker_selected {
            Style::default().fg(Color::White).bg(Color::DarkGray)
        } else {
            Style::default()
        };
        let row_area = Rect {
            x: inner.x,
            y: inner.y + i as u16,
            width: inner.width,
            height: 1,
        };
        let line = Paragraph::new(format!("{mark} {name}")).style(style);
        frame.render_widget(line, row_area);
    }
}

fn visible_range(selected: usize, total: usize, visible: usize) -> (usize, usize) {
    if total == 0 {
        return (0, 0);
    }
    if total <= visible {
        return (0, total);
    }

    let mut start = selected.saturating_sub(visible / 2);
    if start + visible > total {
        start = total - visible;
    }
    (start, start + visible)
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "FPL Insights - Help",
        "",
        "Tabs:",
        "  1            Captain Picks",
        "  2            Differential Players",
        "  3            Set-Piece Takers",
        "  4            Value Picks",
        "  5            Form vs Fixture Difficulty",
        "  6            Team Rating",
        "  Tab/S-Tab    Cycle tabs",
        "",
        "Filters:",
        "  g/d/m/f      Toggle GK/DEF/MID/FWD",
        "  t            Team picker",
        "  [ / ]        Max price -/+ 0.5",
        "",
        "  j/k or up/down  Scroll (Team Rating)",
        "  ?            Toggle help",
        "  q            Quit",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
