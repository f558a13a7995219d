use std::sync::Mutex;

use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::Value;

use crate::state::{Fixture, Player, Team};

const BOOTSTRAP_URL: &str = "https://fantasy.premierleague.com/api/bootstrap-static/";
const FIXTURES_URL: &str = "https://fantasy.premierleague.com/api/fixtures/";

static CLIENT: OnceCell<Client> = OnceCell::new();

fn http_client() -> Result<&'static Client> {
    CLIENT.get_or_try_init(|| {
        Client::builder()
            .user_agent("Mozilla/5.0")
            .build()
            .context("failed to build http client")
    })
}

/// One cached value per endpoint, held for the process lifetime and passed to
/// the fetch functions explicitly. Invalidated only by restarting the process.
#[derive(Debug, Default)]
pub struct FetchCache {
    bootstrap: Mutex<Option<(Vec<Player>, Vec<Team>)>>,
    fixtures: Mutex<Option<Vec<Fixture>>>,
}

impl FetchCache {
    pub fn new() -> Self {
        Self::default()
    }
}

/// GET the bootstrap endpoint and decode `elements` / `teams` into rows.
/// Repeated calls against the same cache reuse the first result without
/// re-issuing the request.
pub fn fetch_players_and_teams(cache: &FetchCache) -> Result<(Vec<Player>, Vec<Team>)> {
    let mut slot = cache.bootstrap.lock().expect("bootstrap cache lock poisoned");
    if let Some(cached) = slot.as_ref() {
        return Ok(cached.clone());
    }
    let body = fetch_body(BOOTSTRAP_URL).context("bootstrap request failed")?;
    let parsed = parse_bootstrap_json(&body)?;
    *slot = Some(parsed.clone());
    Ok(parsed)
}

/// GET the fixtures endpoint and decode the top-level array into rows.
pub fn fetch_fixtures(cache: &FetchCache) -> Result<Vec<Fixture>> {
    let mut slot = cache.fixtures.lock().expect("fixtures cache lock poisoned");
    if let Some(cached) = slot.as_ref() {
        return Ok(cached.clone());
    }
    let body = fetch_body(FIXTURES_URL).context("fixtures request failed")?;
    let parsed = parse_fixtures_json(&body)?;
    *slot = Some(parsed.clone());
    Ok(parsed)
}

fn fetch_body(url: &str) -> Result<String> {
    let client = http_client()?;
    let resp = client.get(url).send().context("request failed")?;
    let status = resp.status();
    let body = resp.text().context("failed reading body")?;
    if !status.is_success() {
        return Err(anyhow::anyhow!("http {}: {}", status, body));
    }
    Ok(body)
}

#[derive(Debug, Deserialize)]
struct BootstrapResponse {
    #[serde(default)]
    elements: Vec<ApiPlayer>,
    #[serde(default)]
    teams: Vec<ApiTeam>,
}

#[derive(Debug, Deserialize)]
struct ApiPlayer {
    id: u32,
    web_name: String,
    team: u32,
    element_type: u8,
    now_cost: i32,
    total_points: i32,
    // The API serves these as strings ("5.3"); keep whatever shape arrives
    // and let enrichment coerce or drop it.
    #[serde(default)]
    selected_by_percent: Option<Value>,
    #[serde(default)]
    points_per_game: Option<Value>,
    #[serde(default)]
    form: Option<Value>,
    #[serde(default)]
    ict_index: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct ApiTeam {
    id: u32,
    name: String,
    strength_attack_home: u32,
    strength_attack_away: u32,
    strength_defence_home: u32,
    strength_defence_away: u32,
}

#[derive(Debug, Deserialize)]
struct ApiFixture {
    team_h: u32,
    team_a: u32,
    #[serde(default)]
    team_h_score: Option<i32>,
    #[serde(default)]
    team_a_score: Option<i32>,
    #[serde(default)]
    finished: bool,
    #[serde(default)]
    team_h_difficulty: Option<u8>,
    #[serde(default)]
    team_a_difficulty: Option<u8>,
}

pub fn parse_bootstrap_json(raw: &str) -> Result<(Vec<Player>, Vec<Team>)> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Err(anyhow::anyhow!("empty bootstrap response"));
    }
    let data: BootstrapResponse =
        serde_json::from_str(trimmed).context("invalid bootstrap json")?;

    let players = data.elements.into_iter().map(player_row).collect();
    let teams = data
        .teams
        .into_iter()
        .map(|t| Team {
            id: t.id,
            name: t.name,
            strength_attack_home: t.strength_attack_home,
            strength_attack_away: t.strength_attack_away,
            strength_defence_home: t.strength_defence_home,
            strength_defence_away: t.strength_defence_away,
        })
        .collect();
    Ok((players, teams))
}

pub fn parse_fixtures_json(raw: &str) -> Result<Vec<Fixture>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Err(anyhow::anyhow!("empty fixtures response"));
    }
    let rows: Vec<ApiFixture> =
        serde_json::from_str(trimmed).context("invalid fixtures json")?;
    Ok(rows
        .into_iter()
        .map(|f| Fixture {
            team_h: f.team_h,
            team_a: f.team_a,
            team_h_score: f.team_h_score,
            team_a_score: f.team_a_score,
            finished: f.finished,
            difficulty_h: f.team_h_difficulty,
            difficulty_a: f.team_a_difficulty,
        })
        .collect())
}

fn player_row(p: ApiPlayer) -> Player {
    Player {
        id: p.id,
        web_name: p.web_name,
        team: p.team,
        element_type: p.element_type,
        now_cost: p.now_cost,
        total_points: p.total_points,
        selected_by_percent: raw_numeric(p.selected_by_percent),
        points_per_game: raw_numeric(p.points_per_game),
        form: raw_numeric(p.form),
        ict_index: raw_numeric(p.ict_index),
    }
}

fn raw_numeric(value: Option<Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) => Some(s.trim().to_string()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}
