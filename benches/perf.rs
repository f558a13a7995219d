use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use fpl_terminal::enrich::enrich_players;
use fpl_terminal::fetch::{parse_bootstrap_json, parse_fixtures_json};
use fpl_terminal::filter::ranking_rows;
use fpl_terminal::rankings::{captain_picks, differential_players, value_picks};
use fpl_terminal::state::Player;
use fpl_terminal::team_rating::compute_team_ratings;

static BOOTSTRAP_JSON: &str = include_str!("../tests/fixtures/bootstrap_static.json");
static FIXTURES_JSON: &str = include_str!("../tests/fixtures/fixtures.json");

// A league-sized player table, cycled out of the fixture rows.
fn sample_players(count: u32) -> Vec<Player> {
    let (base, _) = parse_bootstrap_json(BOOTSTRAP_JSON).expect("valid fixture json");
    (0..count)
        .map(|idx| {
            let template = &base[(idx as usize) % base.len()];
            let mut player = template.clone();
            player.id = idx + 1;
            player.team = (idx % 4) + 1;
            player
        })
        .collect()
}

fn bench_bootstrap_parse(c: &mut Criterion) {
    c.bench_function("bootstrap_parse", |b| {
        b.iter(|| {
            let (players, teams) = parse_bootstrap_json(black_box(BOOTSTRAP_JSON)).unwrap();
            black_box((players.len(), teams.len()));
        })
    });
}

fn bench_fixtures_parse(c: &mut Criterion) {
    c.bench_function("fixtures_parse", |b| {
        b.iter(|| {
            let fixtures = parse_fixtures_json(black_box(FIXTURES_JSON)).unwrap();
            black_box(fixtures.len());
        })
    });
}

fn bench_enrich(c: &mut Criterion) {
    let (_, teams) = parse_bootstrap_json(BOOTSTRAP_JSON).expect("valid fixture json");
    let players = sample_players(600);

    c.bench_function("enrich_players", |b| {
        b.iter(|| {
            let enriched = enrich_players(black_box(&players), black_box(&teams));
            black_box(enriched.len());
        })
    });
}

fn bench_rankings(c: &mut Criterion) {
    let (_, teams) = parse_bootstrap_json(BOOTSTRAP_JSON).expect("valid fixture json");
    let players = sample_players(600);
    let rows = ranking_rows(&enrich_players(&players, &teams));

    c.bench_function("rankings_compute", |b| {
        b.iter(|| {
            let captains = captain_picks(black_box(&rows));
            let differentials = differential_players(black_box(&rows));
            let value = value_picks(black_box(&rows));
            black_box((captains.len(), differentials.len(), value.len()));
        })
    });
}

fn bench_team_ratings(c: &mut Criterion) {
    let (_, teams) = parse_bootstrap_json(BOOTSTRAP_JSON).expect("valid fixture json");
    let fixtures = parse_fixtures_json(FIXTURES_JSON).expect("valid fixture json");

    c.bench_function("team_ratings_compute", |b| {
        b.iter(|| {
            let rows = compute_team_ratings(black_box(&fixtures), black_box(&teams));
            black_box(rows.len());
        })
    });
}

criterion_group!(
    perf,
    bench_bootstrap_parse,
    bench_fixtures_parse,
    bench_enrich,
    bench_rankings,
    bench_team_ratings
);
criterion_main!(perf);
