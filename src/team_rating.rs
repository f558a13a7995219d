use std::collections::HashMap;

use crate::state::{Fixture, Team};

/// One row of the ranked team table. Goal columns stay missing for teams
/// with no finished fixtures.
#[derive(Debug, Clone)]
pub struct TeamRatingRow {
    pub rank: usize,
    pub name: String,
    pub attack: i32,
    pub defence: i32,
    pub overall: i32,
    pub goals_scored: Option<i64>,
    pub goals_conceded: Option<i64>,
    pub goal_difference: Option<i64>,
}

/// Aggregate finished fixtures into per-team goals scored/conceded, derive
/// integer attack/defence/overall ratings from the strength fields, and rank
/// the teams by goal difference.
pub fn compute_team_ratings(fixtures: &[Fixture], teams: &[Team]) -> Vec<TeamRatingRow> {
    // Each finished fixture contributes one home-perspective and one
    // away-perspective tally, keyed by team id.
    let mut goals: HashMap<u32, (i64, i64)> = HashMap::new();
    for fixture in fixtures.iter().filter(|f| f.finished) {
        let (Some(home_goals), Some(away_goals)) = (fixture.team_h_score, fixture.team_a_score)
        else {
            continue;
        };
        let home = goals.entry(fixture.team_h).or_insert((0, 0));
        home.0 += i64::from(home_goals);
        home.1 += i64::from(away_goals);
        let away = goals.entry(fixture.team_a).or_insert((0, 0));
        away.0 += i64::from(away_goals);
        away.1 += i64::from(home_goals);
    }

    // The aggregation is joined back onto the rating rows by team name, via
    // the id -> name mapping from the team table.
    let mut by_name: HashMap<&str, (i64, i64)> = HashMap::new();
    for team in teams {
        if let Some(tally) = goals.get(&team.id) {
            by_name.insert(team.name.as_str(), *tally);
        }
    }

    let mut rows: Vec<TeamRatingRow> = teams
        .iter()
        .map(|team| {
            let attack = strength_rating(team.strength_attack_home, team.strength_attack_away);
            let defence = strength_rating(team.strength_defence_home, team.strength_defence_away);
            let tally = by_name.get(team.name.as_str()).copied();
            TeamRatingRow {
                rank: 0,
                name: team.name.clone(),
                attack,
                defence,
                overall: attack - defence,
                goals_scored: tally.map(|(scored, _)| scored),
                goals_conceded: tally.map(|(_, conceded)| conceded),
                goal_difference: tally.map(|(scored, conceded)| scored - conceded),
            }
        })
        .collect();

    // Descending goal difference; teams without one sort after every team
    // that has one.
    rows.sort_by(|a, b| match (a.goal_difference, b.goal_difference) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
    for (idx, row) in rows.iter_mut().enumerate() {
        row.rank = idx + 1;
    }
    rows
}

fn strength_rating(home: u32, away: u32) -> i32 {
    (f64::from(home + away) / 200.0).round() as i32
}
