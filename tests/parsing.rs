use std::fs;
use std::path::PathBuf;

use fpl_terminal::fetch::{parse_bootstrap_json, parse_fixtures_json};

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

#[test]
fn parses_bootstrap_fixture() {
    let raw = read_fixture("bootstrap_static.json");
    let (players, teams) = parse_bootstrap_json(&raw).expect("fixture should parse");

    assert_eq!(players.len(), 5);
    assert_eq!(teams.len(), 4);

    let saka = &players[0];
    assert_eq!(saka.id, 101);
    assert_eq!(saka.web_name, "Saka");
    assert_eq!(saka.team, 1);
    assert_eq!(saka.element_type, 3);
    assert_eq!(saka.now_cost, 100);
    assert_eq!(saka.total_points, 120);

    let arsenal = &teams[0];
    assert_eq!(arsenal.id, 1);
    assert_eq!(arsenal.name, "Arsenal");
    assert_eq!(arsenal.strength_attack_home, 1300);
    assert_eq!(arsenal.strength_defence_away, 1310);
}

#[test]
fn bootstrap_keeps_raw_numeric_fields_verbatim() {
    let raw = read_fixture("bootstrap_static.json");
    let (players, _) = parse_bootstrap_json(&raw).expect("fixture should parse");

    let saka = &players[0];
    assert_eq!(saka.selected_by_percent.as_deref(), Some("45.3"));
    assert_eq!(saka.points_per_game.as_deref(), Some("6.2"));

    // Malformed strings survive to the coercion step; nulls do not.
    let novak = &players[3];
    assert_eq!(novak.points_per_game.as_deref(), Some("abc"));
    assert_eq!(novak.form, None);
    // A numeric-typed field is stringified rather than rejected.
    assert_eq!(novak.ict_index.as_deref(), Some("3.0"));
}

#[test]
fn empty_bootstrap_body_is_an_error() {
    assert!(parse_bootstrap_json("").is_err());
    assert!(parse_bootstrap_json("null").is_err());
    assert!(parse_bootstrap_json("{not json").is_err());
}

#[test]
fn parses_fixtures_fixture() {
    let raw = read_fixture("fixtures.json");
    let fixtures = parse_fixtures_json(&raw).expect("fixture should parse");

    assert_eq!(fixtures.len(), 5);
    assert_eq!(fixtures[0].team_h, 1);
    assert_eq!(fixtures[0].team_a, 3);
    assert_eq!(fixtures[0].team_h_score, Some(3));
    assert_eq!(fixtures[0].team_a_score, Some(1));
    assert!(fixtures[0].finished);
    assert_eq!(fixtures[0].difficulty_h, Some(2));
    assert_eq!(fixtures[0].difficulty_a, Some(4));

    let upcoming = &fixtures[3];
    assert!(!upcoming.finished);
    assert_eq!(upcoming.team_h_score, None);
    assert_eq!(upcoming.team_a_score, None);
}

#[test]
fn empty_fixtures_body_is_an_error() {
    assert!(parse_fixtures_json("").is_err());
    assert!(parse_fixtures_json("null").is_err());
}
