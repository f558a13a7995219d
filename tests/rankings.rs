use fpl_terminal::filter::ViewRow;
use fpl_terminal::rankings::{
    captain_picks, differential_players, form_fixture_scatter, set_piece_takers, value_picks,
};
use fpl_terminal::state::Position;

fn row(id: u32, name: &str, ict: f64, ppg: f64, form: f64, ppm: f64) -> ViewRow {
    ViewRow {
        id,
        web_name: name.to_string(),
        team_name: Some("Testham".to_string()),
        position: Some(Position::Midfielder),
        price_m: 5.0,
        ict_index: ict,
        points_per_game: ppg,
        form,
        points_per_million: ppm,
        selected_by_percent: Some(10.0),
        strength_attack_home: Some(1300),
        strength_defence_away: Some(1310),
    }
}

#[test]
fn captaincy_score_is_form_plus_ict() {
    let rows = vec![row(1, "A", 10.0, 5.0, 6.0, 8.0), row(2, "B", 2.0, 5.0, 3.0, 8.0)];
    let ranked = captain_picks(&rows);
    assert_eq!(ranked.len(), 2);
    assert_eq!(ranked[0].id, 1);
    assert_eq!(ranked[0].score, 16.0);
    assert_eq!(ranked[1].score, 5.0);
}

#[test]
fn top_views_cap_at_ten_and_sort_descending() {
    let rows: Vec<ViewRow> = (0..12)
        .map(|i| row(i, &format!("P{i}"), f64::from(i), 1.0, 1.0, 1.0))
        .collect();

    let ranked = set_piece_takers(&rows);
    assert_eq!(ranked.len(), 10);
    assert_eq!(ranked[0].id, 11);
    for pair in ranked.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }

    // Fewer input rows than K yields fewer output rows.
    let few = vec![row(1, "A", 4.0, 1.0, 1.0, 1.0)];
    assert_eq!(set_piece_takers(&few).len(), 1);
}

#[test]
fn equal_scores_keep_original_order() {
    let rows = vec![
        row(7, "First", 9.0, 1.0, 1.0, 1.0),
        row(3, "Second", 9.0, 1.0, 1.0, 1.0),
        row(5, "Third", 9.0, 1.0, 1.0, 1.0),
    ];
    let ranked = set_piece_takers(&rows);
    let ids: Vec<u32> = ranked.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![7, 3, 5]);
}

#[test]
fn differential_favors_low_ownership_and_skips_missing() {
    let mut popular = row(1, "Popular", 1.0, 6.0, 1.0, 1.0);
    popular.selected_by_percent = Some(80.0);
    let mut niche = row(2, "Niche", 1.0, 6.0, 1.0, 1.0);
    niche.selected_by_percent = Some(5.0);
    let mut unknown = row(3, "Unknown", 1.0, 9.9, 1.0, 1.0);
    unknown.selected_by_percent = None;

    let ranked = differential_players(&[popular, niche, unknown]);
    assert_eq!(ranked.len(), 2);
    assert_eq!(ranked[0].id, 2);
    assert!((ranked[0].score - 6.0 * 0.95).abs() < 1e-9);
    assert!((ranked[1].score - 6.0 * 0.20).abs() < 1e-9);
}

#[test]
fn value_picks_rank_by_points_per_million() {
    let rows = vec![
        row(1, "A", 1.0, 1.0, 1.0, 4.5),
        row(2, "B", 1.0, 1.0, 1.0, 9.0),
        row(3, "C", 1.0, 1.0, 1.0, 7.2),
    ];
    let ranked = value_picks(&rows);
    let ids: Vec<u32> = ranked.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![2, 3, 1]);
}

#[test]
fn scatter_keeps_all_rows_and_clamps_plot_size() {
    let joined = row(1, "Joined", 1.0, 1.0, 4.2, -2.5);
    let mut unjoined = row(2, "Unjoined", 1.0, 1.0, 3.0, 6.0);
    unjoined.strength_attack_home = None;
    unjoined.strength_defence_away = None;

    let points = form_fixture_scatter(&[joined, unjoined]);
    assert_eq!(points.len(), 2);

    assert_eq!(points[0].fixture_difficulty, (1300.0 + 1310.0) / 2.0);
    assert_eq!(points[0].form, 4.2);
    // Negative points-per-million is clamped for use as a size.
    assert_eq!(points[0].size, 0.0);

    assert_eq!(points[1].fixture_difficulty, 0.0);
    assert_eq!(points[1].size, 6.0);
}
