use std::collections::HashSet;

use crate::state::{EnrichedPlayer, Position};

#[derive(Debug, Clone, Default)]
pub struct FilterCriteria {
    pub positions: HashSet<Position>,
    pub teams: HashSet<String>,
    pub max_price: f64,
}

/// A filtered player row ready for the ranking views: the four ranking
/// columns are guaranteed numeric, with missing values filled as zero.
#[derive(Debug, Clone)]
pub struct ViewRow {
    pub id: u32,
    pub web_name: String,
    pub team_name: Option<String>,
    pub position: Option<Position>,
    pub price_m: f64,
    pub ict_index: f64,
    pub points_per_game: f64,
    pub form: f64,
    pub points_per_million: f64,
    pub selected_by_percent: Option<f64>,
    pub strength_attack_home: Option<u32>,
    pub strength_defence_away: Option<u32>,
}

#[derive(Debug, Clone)]
pub struct FilterOutcome {
    pub rows: Vec<EnrichedPlayer>,
    pub fell_back: bool,
}

/// Keep rows matching every constraint. When nothing matches, fall back to
/// the full table and flag it so the caller can surface a warning instead of
/// rendering an empty dashboard.
pub fn apply_filters(players: &[EnrichedPlayer], criteria: &FilterCriteria) -> FilterOutcome {
    let rows: Vec<EnrichedPlayer> = players
        .iter()
        .filter(|p| matches_criteria(p, criteria))
        .cloned()
        .collect();

    if rows.is_empty() && !players.is_empty() {
        return FilterOutcome {
            rows: players.to_vec(),
            fell_back: true,
        };
    }
    FilterOutcome {
        rows,
        fell_back: false,
    }
}

fn matches_criteria(player: &EnrichedPlayer, criteria: &FilterCriteria) -> bool {
    // A row with no mapped position or no joined team can never satisfy a
    // membership constraint.
    let Some(position) = player.position else {
        return false;
    };
    if !criteria.positions.contains(&position) {
        return false;
    }
    let Some(team_name) = player.team_name.as_ref() else {
        return false;
    };
    if !criteria.teams.contains(team_name) {
        return false;
    }
    player.price_m <= criteria.max_price
}

/// Project filtered players into ranking-ready rows, zero-filling the four
/// columns the views sort and plot on. Only these four get the zero
/// treatment; everything else keeps its missing state.
pub fn ranking_rows(players: &[EnrichedPlayer]) -> Vec<ViewRow> {
    players
        .iter()
        .map(|p| ViewRow {
            id: p.id,
            web_name: p.web_name.clone(),
            team_name: p.team_name.clone(),
            position: p.position,
            price_m: p.price_m,
            ict_index: p.ict_index.unwrap_or(0.0),
            points_per_game: p.points_per_game.unwrap_or(0.0),
            form: p.form.unwrap_or(0.0),
            points_per_million: p.points_per_million.unwrap_or(0.0),
            selected_by_percent: p.selected_by_percent,
            strength_attack_home: p.strength_attack_home,
            strength_defence_away: p.strength_defence_away,
        })
        .collect()
}
