mod support;

use rust_decimal_macros::dec;

use scoreline::domain::{LeagueCode, MatchStatus, Season};
use scoreline::error::PipelineError;
use scoreline::pipeline::{Pipeline, Reconciler};
use scoreline::store::Store;

use support::db::TempDb;
use support::records::{bookmaker, bookmaker_without_h2h, match_record, odds_event, standing};
use support::sources::{FailingOddsSource, ScriptedOddsSource};

fn season() -> Season {
    "2023-24".parse().expect("valid season")
}

/// Seed the league, two teams and one scheduled match; returns the match id.
fn seed_fixture(store: &Store, home: &str, away: &str, external_id: &str) -> i32 {
    let reconciler = Reconciler::new(store);
    let (league, _) = reconciler
        .ensure_league(LeagueCode::Epl, &season())
        .expect("league ensured");
    let teams = reconciler
        .reconcile_teams(&league, &[standing(1, home), standing(2, away)])
        .expect("teams reconciled");
    let home_team = teams.teams.iter().find(|t| t.name == home).unwrap();
    let away_team = teams.teams.iter().find(|t| t.name == away).unwrap();

    let record = match_record(
        Some(external_id),
        home,
        away,
        "2024-03-02T15:00:00Z",
        MatchStatus::Scheduled,
    );
    let outcome = reconciler
        .reconcile_match_record(&league, home_team, away_team, &record)
        .expect("match reconciled");
    outcome.as_match().id
}

#[tokio::test]
async fn one_event_fans_out_into_one_row_per_bookmaker() {
    let db = TempDb::create();
    let match_id = seed_fixture(&db.store(), "Liverpool", "Everton", "m-1");

    let mut pipeline = Pipeline::new(db.store());
    pipeline.set_odds_source(Box::new(ScriptedOddsSource::new(vec![odds_event(
        "Liverpool",
        "Everton",
        vec![
            bookmaker("bet365", "Liverpool", "Everton", (dec!(1.44), dec!(4.75), dec!(7.0))),
            bookmaker("pinnacle", "Liverpool", "Everton", (dec!(1.47), dec!(4.60), dec!(6.8))),
        ],
    )])));

    let summary = pipeline
        .fetch_and_store_odds(LeagueCode::Epl, None)
        .await
        .expect("odds ingestion succeeds");

    assert_eq!(summary.odds_fetched, 1);
    assert_eq!(summary.odds_stored, 2);
    assert!(summary.errors.is_empty());

    let rows = pipeline.store().odds_for_match(match_id).unwrap();
    assert_eq!(rows.len(), 2);
    let bet365 = rows.iter().find(|o| o.bookmaker == "bet365").unwrap();
    assert_eq!(bet365.home_win_odds, dec!(1.44));
    assert_eq!(bet365.draw_odds, dec!(4.75));
    assert_eq!(bet365.away_win_odds, dec!(7.0));
}

#[tokio::test]
async fn bookmaker_without_h2h_is_skipped_and_recorded() {
    let db = TempDb::create();
    let match_id = seed_fixture(&db.store(), "Liverpool", "Everton", "m-1");

    let mut pipeline = Pipeline::new(db.store());
    pipeline.set_odds_source(Box::new(ScriptedOddsSource::new(vec![odds_event(
        "Liverpool",
        "Everton",
        vec![
            bookmaker("bet365", "Liverpool", "Everton", (dec!(1.44), dec!(4.75), dec!(7.0))),
            bookmaker_without_h2h("spreads-only"),
        ],
    )])));

    let summary = pipeline
        .fetch_and_store_odds(LeagueCode::Epl, None)
        .await
        .expect("odds ingestion succeeds");

    assert_eq!(summary.odds_stored, 1);
    assert_eq!(summary.errors.len(), 1);
    assert!(summary.errors[0].contains("spreads-only"));
    assert_eq!(pipeline.store().odds_for_match(match_id).unwrap().len(), 1);
}

#[tokio::test]
async fn unknown_fixture_is_a_soft_skip() {
    let db = TempDb::create();
    // No matches seeded at all.
    let mut pipeline = Pipeline::new(db.store());
    pipeline.set_odds_source(Box::new(ScriptedOddsSource::new(vec![odds_event(
        "Liverpool",
        "Everton",
        vec![bookmaker("bet365", "Liverpool", "Everton", (dec!(1.44), dec!(4.75), dec!(7.0)))],
    )])));

    let summary = pipeline
        .fetch_and_store_odds(LeagueCode::Epl, None)
        .await
        .expect("odds ingestion succeeds");

    assert_eq!(summary.odds_fetched, 1);
    assert_eq!(summary.odds_stored, 0);
    assert!(summary.errors.is_empty(), "a miss is not an error");
}

#[tokio::test]
async fn match_id_filter_restricts_storage_to_one_match() {
    let db = TempDb::create();
    let store = db.store();
    let first = seed_fixture(&store, "Liverpool", "Everton", "m-1");
    // Second fixture in the same league.
    let reconciler = Reconciler::new(&store);
    let (league, _) = reconciler.ensure_league(LeagueCode::Epl, &season()).unwrap();
    let teams = reconciler
        .reconcile_teams(&league, &[standing(3, "Arsenal"), standing(4, "Chelsea")])
        .unwrap();
    let home = teams.teams.iter().find(|t| t.name == "Arsenal").unwrap();
    let away = teams.teams.iter().find(|t| t.name == "Chelsea").unwrap();
    let second = reconciler
        .reconcile_match_record(
            &league,
            home,
            away,
            &match_record(
                Some("m-2"),
                "Arsenal",
                "Chelsea",
                "2024-03-02T17:30:00Z",
                MatchStatus::Scheduled,
            ),
        )
        .unwrap()
        .as_match()
        .id;

    let mut pipeline = Pipeline::new(db.store());
    pipeline.set_odds_source(Box::new(ScriptedOddsSource::new(vec![
        odds_event(
            "Liverpool",
            "Everton",
            vec![bookmaker("bet365", "Liverpool", "Everton", (dec!(1.4), dec!(4.7), dec!(7.0)))],
        ),
        odds_event(
            "Arsenal",
            "Chelsea",
            vec![bookmaker("bet365", "Arsenal", "Chelsea", (dec!(1.9), dec!(3.8), dec!(3.9)))],
        ),
    ])));

    let summary = pipeline
        .fetch_and_store_odds(LeagueCode::Epl, Some(first))
        .await
        .expect("odds ingestion succeeds");

    assert_eq!(summary.odds_fetched, 2);
    assert_eq!(summary.odds_stored, 1);
    assert_eq!(pipeline.store().odds_for_match(first).unwrap().len(), 1);
    assert_eq!(pipeline.store().odds_for_match(second).unwrap().len(), 0);
}

#[tokio::test]
async fn missing_odds_source_is_a_pipeline_error() {
    let db = TempDb::create();
    let pipeline = Pipeline::new(db.store());

    let err = pipeline
        .fetch_and_store_odds(LeagueCode::Epl, None)
        .await
        .unwrap_err();
    assert!(matches!(err, PipelineError::OddsSourceNotConfigured));
}

#[tokio::test]
async fn failed_odds_fetch_is_reported_not_raised() {
    let db = TempDb::create();
    let mut pipeline = Pipeline::new(db.store());
    pipeline.set_odds_source(Box::new(FailingOddsSource));

    let summary = pipeline
        .fetch_and_store_odds(LeagueCode::Epl, None)
        .await
        .expect("failure folds into the summary");

    assert_eq!(summary.odds_fetched, 0);
    assert_eq!(summary.odds_stored, 0);
    assert_eq!(summary.errors.len(), 1);
    assert!(summary.errors[0].contains("rate limit"));
}

#[tokio::test]
async fn repeated_fetches_append_and_reads_pick_latest_and_best() {
    let db = TempDb::create();
    let match_id = seed_fixture(&db.store(), "Liverpool", "Everton", "m-1");

    let mut pipeline = Pipeline::new(db.store());
    pipeline.set_odds_source(Box::new(ScriptedOddsSource::new(vec![odds_event(
        "Liverpool",
        "Everton",
        vec![
            bookmaker("bet365", "Liverpool", "Everton", (dec!(2.0), dec!(3.5), dec!(4.0))),
            bookmaker("pinnacle", "Liverpool", "Everton", (dec!(2.1), dec!(3.4), dec!(3.9))),
        ],
    )])));

    pipeline
        .fetch_and_store_odds(LeagueCode::Epl, None)
        .await
        .expect("first fetch");
    pipeline
        .fetch_and_store_odds(LeagueCode::Epl, None)
        .await
        .expect("second fetch");

    let store = pipeline.store();
    // Odds rows are append-only: two fetches, two bookmakers each.
    assert_eq!(store.odds_for_match(match_id).unwrap().len(), 4);

    let latest = store.latest_odds_for_match(match_id).unwrap();
    assert_eq!(latest.len(), 2);

    let best = store
        .best_odds_for_match(match_id)
        .unwrap()
        .expect("odds exist");
    assert_eq!(best.home_win.price, dec!(2.1));
    assert_eq!(best.home_win.bookmaker, "pinnacle");
    assert_eq!(best.draw.price, dec!(3.5));
    assert_eq!(best.draw.bookmaker, "bet365");
    assert_eq!(best.away_win.price, dec!(4.0));
    assert_eq!(best.away_win.bookmaker, "bet365");
}
