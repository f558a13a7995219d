use std::collections::VecDeque;

use chrono::{DateTime, Local};

use crate::filter::{FilterCriteria, ViewRow, apply_filters, ranking_rows};
use crate::team_rating::{TeamRatingRow, compute_team_ratings};

/// Player position derived from the API's `element_type` code.
/// Codes outside 1..=4 have no position and stay unmapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Position {
    Goalkeeper,
    Defender,
    Midfielder,
    Forward,
}

impl Position {
    pub const ALL: [Position; 4] = [
        Position::Goalkeeper,
        Position::Defender,
        Position::Midfielder,
        Position::Forward,
    ];

    pub fn from_element_type(code: u8) -> Option<Self> {
        match code {
            1 => Some(Position::Goalkeeper),
            2 => Some(Position::Defender),
            3 => Some(Position::Midfielder),
            4 => Some(Position::Forward),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Position::Goalkeeper => "Goalkeeper",
            Position::Defender => "Defender",
            Position::Midfielder => "Midfielder",
            Position::Forward => "Forward",
        }
    }

    pub fn short_label(self) -> &'static str {
        match self {
            Position::Goalkeeper => "GK",
            Position::Defender => "DEF",
            Position::Midfielder => "MID",
            Position::Forward => "FWD",
        }
    }
}

/// Raw player row as decoded from the bootstrap endpoint. The string-typed
/// numeric fields are carried verbatim; coercion happens during enrichment.
#[derive(Debug, Clone)]
pub struct Player {
    pub id: u32,
    pub web_name: String,
    pub team: u32,
    pub element_type: u8,
    pub now_cost: i32,
    pub total_points: i32,
    pub selected_by_percent: Option<String>,
    pub points_per_game: Option<String>,
    pub form: Option<String>,
    pub ict_index: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Team {
    pub id: u32,
    pub name: String,
    pub strength_attack_home: u32,
    pub strength_attack_away: u32,
    pub strength_defence_home: u32,
    pub strength_defence_away: u32,
}

/// One scheduled or played match. Scores are meaningful only when `finished`.
#[derive(Debug, Clone)]
pub struct Fixture {
    pub team_h: u32,
    pub team_a: u32,
    pub team_h_score: Option<i32>,
    pub team_a_score: Option<i32>,
    pub finished: bool,
    pub difficulty_h: Option<u8>,
    pub difficulty_a: Option<u8>,
}

/// Player row after the derivation pipeline: coerced numerics, price metrics
/// and the team-side columns pulled in by the id join. Column-complete for
/// every input row; anything that failed to coerce or join is `None`.
#[derive(Debug, Clone)]
pub struct EnrichedPlayer {
    pub id: u32,
    pub web_name: String,
    pub team: u32,
    pub element_type: u8,
    pub position: Option<Position>,
    pub team_name: Option<String>,
    pub now_cost: i32,
    pub total_points: i32,
    pub price_m: f64,
    pub points_per_million: Option<f64>,
    pub selected_by_percent: Option<f64>,
    pub points_per_game: Option<f64>,
    pub form: Option<f64>,
    pub ict_index: Option<f64>,
    pub strength_attack_home: Option<u32>,
    pub strength_defence_away: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    CaptainPicks,
    Differentials,
    SetPieceTakers,
    ValuePicks,
    FormFixture,
    TeamRating,
}

impl Tab {
    pub const ALL: [Tab; 6] = [
        Tab::CaptainPicks,
        Tab::Differentials,
        Tab::SetPieceTakers,
        Tab::ValuePicks,
        Tab::FormFixture,
        Tab::TeamRating,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Tab::CaptainPicks => "Captain Picks",
            Tab::Differentials => "Differential Players",
            Tab::SetPieceTakers => "Set-Piece Takers",
            Tab::ValuePicks => "Value Picks",
            Tab::FormFixture => "Form vs Fixture Difficulty",
            Tab::TeamRating => "Team Rating",
        }
    }
}

pub struct AppState {
    pub tab: Tab,
    pub players: Vec<EnrichedPlayer>,
    pub teams: Vec<Team>,
    pub fixtures: Vec<Fixture>,
    pub team_rating: Vec<TeamRatingRow>,
    pub criteria: FilterCriteria,
    pub filtered: Vec<ViewRow>,
    pub filter_fell_back: bool,
    pub price_min: f64,
    pub price_max: f64,
    pub team_names: Vec<String>,
    pub picker_open: bool,
    pub picker_selected: usize,
    pub table_scroll: usize,
    pub help_overlay: bool,
    pub logs: VecDeque<String>,
    pub fetched_at: Option<DateTime<Local>>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            tab: Tab::CaptainPicks,
            players: Vec::new(),
            teams: Vec::new(),
            fixtures: Vec::new(),
            team_rating: Vec::new(),
            criteria: FilterCriteria::default(),
            filtered: Vec::new(),
            filter_fell_back: false,
            price_min: 0.0,
            price_max: 0.0,
            team_names: Vec::new(),
            picker_open: false,
            picker_selected: 0,
            table_scroll: 0,
            help_overlay: false,
            logs: VecDeque::with_capacity(200),
            fetched_at: None,
        }
    }

    /// Install a freshly fetched dataset and reset the filters to their
    /// everything-selected defaults. The team rating table does not depend on
    /// the filters, so it is computed once here.
    pub fn load_data(
        &mut self,
        players: Vec<EnrichedPlayer>,
        teams: Vec<Team>,
        fixtures: Vec<Fixture>,
    ) {
        let (price_min, price_max) = price_bounds(&players);
        self.price_min = price_min;
        self.price_max = price_max;

        let mut names: Vec<String> = teams.iter().map(|t| t.name.clone()).collect();
        names.sort();
        self.team_names = names;

        self.criteria = FilterCriteria {
            positions: Position::ALL.into_iter().collect(),
            teams: self.team_names.iter().cloned().collect(),
            max_price: price_max,
        };

        self.team_rating = compute_team_ratings(&fixtures, &teams);
        self.players = players;
        self.teams = teams;
        self.fixtures = fixtures;
        self.fetched_at = Some(Local::now());
        self.picker_selected = 0;
        self.table_scroll = 0;
        self.refilter();
    }

    /// Re-run the filter stage against the current criteria. Surfaces the
    /// empty-result fallback as a console warning.
    pub fn refilter(&mut self) {
        let outcome = apply_filters(&self.players, &self.criteria);
        self.filter_fell_back = outcome.fell_back;
        if outcome.fell_back {
            self.push_log("[WARN] No players match the current filters; showing all players");
        }
        self.filtered = ranking_rows(&outcome.rows);
    }

    pub fn next_tab(&mut self) {
        let idx = Tab::ALL.iter().position(|t| *t == self.tab).unwrap_or(0);
        self.tab = Tab::ALL[(idx + 1) % Tab::ALL.len()];
    }

    pub fn prev_tab(&mut self) {
        let idx = Tab::ALL.iter().position(|t| *t == self.tab).unwrap_or(0);
        self.tab = Tab::ALL[(idx + Tab::ALL.len() - 1) % Tab::ALL.len()];
    }

    pub fn toggle_position(&mut self, position: Position) {
        if !self.criteria.positions.remove(&position) {
            self.criteria.positions.insert(position);
        }
        self.refilter();
    }

    pub fn toggle_selected_team(&mut self) {
        let Some(name) = self.team_names.get(self.picker_selected).cloned() else {
            return;
        };
        if !self.criteria.teams.remove(&name) {
            self.criteria.teams.insert(name);
        }
        self.refilter();
    }

    /// Select every team, or none if every team is already selected.
    pub fn toggle_all_teams(&mut self) {
        if self.criteria.teams.len() == self.team_names.len() {
            self.criteria.teams.clear();
        } else {
            self.criteria.teams = self.team_names.iter().cloned().collect();
        }
        self.refilter();
    }

    pub fn step_max_price(&mut self, delta: f64) {
        let next = (self.criteria.max_price + delta).clamp(self.price_min, self.price_max);
        if (next - self.criteria.max_price).abs() > f64::EPSILON {
            self.criteria.max_price = next;
            self.refilter();
        }
    }

    pub fn picker_next(&mut self) {
        if !self.team_names.is_empty() && self.picker_selected + 1 < self.team_names.len() {
            self.picker_selected += 1;
        }
    }

    pub fn picker_prev(&mut self) {
        self.picker_selected = self.picker_selected.saturating_sub(1);
    }

    pub fn scroll_down(&mut self) {
        if self.tab == Tab::TeamRating
            && self.table_scroll + 1 < self.team_rating.len()
        {
            self.table_scroll += 1;
        }
    }

    pub fn scroll_up(&mut self) {
        if self.tab == Tab::TeamRating {
            self.table_scroll = self.table_scroll.saturating_sub(1);
        }
    }

    pub fn filter_summary(&self) -> String {
        let mut positions: Vec<&str> = Position::ALL
            .into_iter()
            .filter(|p| self.criteria.positions.contains(p))
            .map(Position::short_label)
            .collect();
        if positions.is_empty() {
            positions.push("none");
        }
        format!(
            "Pos {} | Teams {}/{} | Price <= {:.1}m",
            positions.join("+"),
            self.criteria.teams.len(),
            self.team_names.len(),
            self.criteria.max_price
        )
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        const MAX_LOGS: usize = 200;
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

fn price_bounds(players: &[EnrichedPlayer]) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for player in players {
        min = min.min(player.price_m);
        max = max.max(player.price_m);
    }
    if players.is_empty() {
        (0.0, 0.0)
    } else {
        (min, max)
    }
}
