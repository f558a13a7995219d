use std::collections::HashMap;

use crate::state::{EnrichedPlayer, Player, Position, Team};

/// Run the derivation pipeline over the raw tables: coerce the string-typed
/// numerics, compute the price metrics, join each player to its team by id and
/// map `element_type` to a position. Every input row comes out the other side;
/// anything that fails to coerce or join stays missing.
pub fn enrich_players(players: &[Player], teams: &[Team]) -> Vec<EnrichedPlayer> {
    let by_id: HashMap<u32, &Team> = teams.iter().map(|t| (t.id, t)).collect();
    players.iter().map(|p| enrich_player(p, &by_id)).collect()
}

fn enrich_player(p: &Player, teams: &HashMap<u32, &Team>) -> EnrichedPlayer {
    let price_m = f64::from(p.now_cost) / 10.0;
    // A zero-cost player has no defined points-per-million; leaving it missing
    // keeps infinities out of the sort and plot paths.
    let points_per_million = if price_m > 0.0 {
        Some(f64::from(p.total_points) / price_m)
    } else {
        None
    };
    let joined = teams.get(&p.team);

    EnrichedPlayer {
        id: p.id,
        web_name: p.web_name.clone(),
        team: p.team,
        element_type: p.element_type,
        position: Position::from_element_type(p.element_type),
        team_name: joined.map(|t| t.name.clone()),
        now_cost: p.now_cost,
        total_points: p.total_points,
        price_m,
        points_per_million,
        selected_by_percent: coerce_numeric(p.selected_by_percent.as_deref()),
        points_per_game: coerce_numeric(p.points_per_game.as_deref()),
        form: coerce_numeric(p.form.as_deref()),
        ict_index: coerce_numeric(p.ict_index.as_deref()),
        strength_attack_home: joined.map(|t| t.strength_attack_home),
        strength_defence_away: joined.map(|t| t.strength_defence_away),
    }
}

/// Coerce a raw field to a number; malformed or absent values become missing,
/// never zero.
pub fn coerce_numeric(raw: Option<&str>) -> Option<f64> {
    parse_number(raw?)
}

pub fn parse_number(raw: &str) -> Option<f64> {
    let s = raw.trim();
    if s.is_empty() || s == "-" {
        return None;
    }
    let numericish: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-' || *c == ',')
        .collect();
    // Anything beyond digits, sign, decimal point and thousands separators is
    // malformed, not a decoration to strip.
    if numericish.len() != s.len() {
        return None;
    }
    let cleaned = numericish.replace(',', "");
    if cleaned.is_empty() || cleaned == "-" {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}
