use crate::filter::ViewRow;

pub const TOP_K: usize = 10;

/// One bar in a top-K view.
#[derive(Debug, Clone)]
pub struct RankedEntry {
    pub id: u32,
    pub web_name: String,
    pub team_name: Option<String>,
    pub score: f64,
}

/// One point in the form-vs-fixture-difficulty scatter.
#[derive(Debug, Clone)]
pub struct ScatterPoint {
    pub id: u32,
    pub web_name: String,
    pub fixture_difficulty: f64,
    pub form: f64,
    pub size: f64,
}

/// Captaincy heuristic: form plus ICT index.
pub fn captain_picks(rows: &[ViewRow]) -> Vec<RankedEntry> {
    top_k(rows, TOP_K, |r| Some(r.form + r.ict_index))
}

/// High-output, low-ownership players. A row whose ownership never coerced
/// has no differential score and stays out of this ranking.
pub fn differential_players(rows: &[ViewRow]) -> Vec<RankedEntry> {
    top_k(rows, TOP_K, |r| {
        let owned = r.selected_by_percent?;
        Some(r.points_per_game * (1.0 - owned / 100.0))
    })
}

/// ICT index doubles as a set-piece involvement proxy.
pub fn set_piece_takers(rows: &[ViewRow]) -> Vec<RankedEntry> {
    top_k(rows, TOP_K, |r| Some(r.ict_index))
}

pub fn value_picks(rows: &[ViewRow]) -> Vec<RankedEntry> {
    top_k(rows, TOP_K, |r| Some(r.points_per_million))
}

/// Full row set, no top-K. Points-per-million is clamped to zero so it can
/// serve as a plot size.
pub fn form_fixture_scatter(rows: &[ViewRow]) -> Vec<ScatterPoint> {
    rows.iter()
        .map(|r| ScatterPoint {
            id: r.id,
            web_name: r.web_name.clone(),
            fixture_difficulty: fixture_difficulty(r),
            form: r.form,
            size: r.points_per_million.max(0.0),
        })
        .collect()
}

/// Average of the joined team's home-attack and away-defence strength; rows
/// that never joined a team sit at zero.
pub fn fixture_difficulty(row: &ViewRow) -> f64 {
    match (row.strength_attack_home, row.strength_defence_away) {
        (Some(attack), Some(defence)) => f64::from(attack + defence) / 2.0,
        _ => 0.0,
    }
}

fn top_k<F>(rows: &[ViewRow], k: usize, score: F) -> Vec<RankedEntry>
where
    F: Fn(&ViewRow) -> Option<f64>,
{
    let mut scored: Vec<RankedEntry> = rows
        .iter()
        .filter_map(|row| {
            let score = score(row)?;
            Some(RankedEntry {
                id: row.id,
                web_name: row.web_name.clone(),
                team_name: row.team_name.clone(),
                score,
            })
        })
        .collect();
    // Stable sort: equal scores keep their original table order.
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored.truncate(k);
    scored
}
