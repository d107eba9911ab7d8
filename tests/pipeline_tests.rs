mod support;

use scoreline::domain::{LeagueCode, Season};
use scoreline::error::PipelineError;
use scoreline::pipeline::Pipeline;

use support::db::TempDb;
use support::records::{fixture, standing};
use support::sources::{FailingSource, ScriptedSource};

fn season() -> Season {
    "2023-24".parse().expect("valid season")
}

fn epl_source(name: &'static str) -> ScriptedSource {
    ScriptedSource::new(name)
        .with_standings(vec![standing(57, "Arsenal"), standing(61, "Chelsea")])
        .with_matches(vec![fixture(
            419,
            (57, "Arsenal"),
            (61, "Chelsea"),
            "2024-02-03T15:00:00Z",
            "SCHEDULED",
            None,
        )])
}

#[tokio::test]
async fn full_run_creates_league_teams_and_matches() {
    let db = TempDb::create();
    let mut pipeline = Pipeline::new(db.store());
    pipeline.add_source(Box::new(epl_source("scripted")));

    let summary = pipeline
        .run_full_pipeline(LeagueCode::Epl, &season(), true)
        .await
        .expect("run succeeds");

    assert!(summary.league_created);
    assert_eq!(summary.teams_created, 2);
    assert_eq!(summary.teams_existing, 0);
    assert_eq!(summary.matches_created, 1);
    assert_eq!(summary.matches_updated, 0);
    assert!(summary.errors.is_empty());

    let store = pipeline.store();
    let league = store
        .find_league("EPL", "2023-24")
        .unwrap()
        .expect("league persisted");
    assert_eq!(league.name, "Premier League");
    assert_eq!(league.country, "England");
    assert_eq!(store.teams_in_league(league.id).unwrap().len(), 2);

    let m = store
        .find_match_by_external_id("419")
        .unwrap()
        .expect("match persisted");
    assert_eq!(m.league_id, league.id);
}

#[tokio::test]
async fn second_run_with_identical_data_creates_nothing() {
    let db = TempDb::create();
    let mut pipeline = Pipeline::new(db.store());
    pipeline.add_source(Box::new(epl_source("scripted")));

    pipeline
        .run_full_pipeline(LeagueCode::Epl, &season(), true)
        .await
        .expect("first run succeeds");
    let second = pipeline
        .run_full_pipeline(LeagueCode::Epl, &season(), true)
        .await
        .expect("second run succeeds");

    assert!(!second.league_created);
    assert_eq!(second.teams_created, 0);
    assert_eq!(second.teams_existing, 2);
    assert_eq!(second.matches_created, 0);
    assert_eq!(second.matches_updated, 0);

    let store = pipeline.store();
    let league = store.find_league("EPL", "2023-24").unwrap().unwrap();
    assert_eq!(store.teams_in_league(league.id).unwrap().len(), 2);
}

#[tokio::test]
async fn one_surviving_source_carries_the_stage() {
    let db = TempDb::create();
    let mut pipeline = Pipeline::new(db.store());
    pipeline.add_source(Box::new(FailingSource::timeout("slow-source")));
    pipeline.add_source(Box::new(FailingSource::bad_request("broken-source")));
    pipeline.add_source(Box::new(
        ScriptedSource::new("good-source").with_standings(vec![standing(57, "Arsenal")]),
    ));

    let data = pipeline
        .fetch_league_data(LeagueCode::Epl, &season())
        .await
        .expect("stage survives with one source");

    assert_eq!(data.standings.len(), 1);
    assert_eq!(data.failures.len(), 2);
    let sources: Vec<&str> = data.failures.iter().map(|f| f.source.as_str()).collect();
    assert!(sources.contains(&"slow-source"));
    assert!(sources.contains(&"broken-source"));
}

#[tokio::test]
async fn failures_end_up_in_the_run_summary() {
    let db = TempDb::create();
    let mut pipeline = Pipeline::new(db.store());
    pipeline.add_source(Box::new(FailingSource::timeout("slow-source")));
    pipeline.add_source(Box::new(epl_source("scripted")));

    let summary = pipeline
        .run_full_pipeline(LeagueCode::Epl, &season(), true)
        .await
        .expect("run succeeds");

    assert_eq!(summary.teams_created, 2);
    // One failure per stage the source participated in.
    assert_eq!(summary.errors.len(), 2);
    assert!(summary.errors.iter().all(|f| f.source == "slow-source"));
}

#[tokio::test]
async fn all_sources_failing_aborts_the_run() {
    let db = TempDb::create();
    let mut pipeline = Pipeline::new(db.store());
    pipeline.add_source(Box::new(FailingSource::timeout("one")));
    pipeline.add_source(Box::new(FailingSource::bad_request("two")));

    let err = pipeline
        .fetch_league_data(LeagueCode::Epl, &season())
        .await
        .unwrap_err();

    match err {
        PipelineError::AllSourcesFailed {
            league,
            stage,
            failures,
        } => {
            assert_eq!(league, LeagueCode::Epl);
            assert_eq!(stage, "standings");
            assert_eq!(failures.len(), 2);
        }
        other => panic!("expected AllSourcesFailed, got {other}"),
    }
}

#[tokio::test]
async fn no_configured_sources_aborts_the_run() {
    let db = TempDb::create();
    let pipeline = Pipeline::new(db.store());

    let err = pipeline
        .fetch_league_data(LeagueCode::Epl, &season())
        .await
        .unwrap_err();
    assert!(matches!(err, PipelineError::AllSourcesFailed { .. }));
}

#[tokio::test]
async fn match_stage_failure_aborts_when_requested() {
    let db = TempDb::create();
    let mut pipeline = Pipeline::new(db.store());
    // Standings succeed, match fetches all fail.
    struct StandingsOnly;
    #[async_trait::async_trait]
    impl scoreline::source::MatchDataSource for StandingsOnly {
        fn name(&self) -> &'static str {
            "standings-only"
        }
        async fn fetch_standings(
            &self,
            _league: LeagueCode,
            _season: &Season,
        ) -> Result<Vec<scoreline::domain::RawTeamRecord>, scoreline::error::SourceError> {
            Ok(vec![standing(57, "Arsenal")])
        }
        async fn fetch_matches(
            &self,
            _league: LeagueCode,
            _season: &Season,
            _status: Option<scoreline::domain::MatchStatus>,
        ) -> Result<Vec<scoreline::domain::RawMatchRecord>, scoreline::error::SourceError> {
            Err(scoreline::error::SourceError::Transport("reset".into()))
        }
    }
    pipeline.add_source(Box::new(StandingsOnly));

    let err = pipeline
        .run_full_pipeline(LeagueCode::Epl, &season(), true)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        PipelineError::AllSourcesFailed {
            stage: "matches",
            ..
        }
    ));

    // The standings half of the run still persisted.
    let store = pipeline.store();
    let league = store.find_league("EPL", "2023-24").unwrap().unwrap();
    assert_eq!(store.teams_in_league(league.id).unwrap().len(), 1);
}

#[tokio::test]
async fn skipping_matches_leaves_match_counts_at_zero() {
    let db = TempDb::create();
    let mut pipeline = Pipeline::new(db.store());
    pipeline.add_source(Box::new(epl_source("scripted")));

    let summary = pipeline
        .run_full_pipeline(LeagueCode::Epl, &season(), false)
        .await
        .expect("run succeeds");

    assert_eq!(summary.teams_created, 2);
    assert_eq!(summary.matches_created, 0);
    assert!(pipeline
        .store()
        .find_match_by_external_id("419")
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn raw_match_payloads_land_in_the_audit_channel() {
    let db = TempDb::create();
    let mut pipeline = Pipeline::new(db.store());
    pipeline.add_source(Box::new(epl_source("scripted")));

    pipeline
        .run_full_pipeline(LeagueCode::Epl, &season(), true)
        .await
        .expect("run succeeds");

    let store = pipeline.store();
    let m = store.find_match_by_external_id("419").unwrap().unwrap();
    let audit = store.match_stats_for_match(m.id).unwrap();
    assert_eq!(audit.len(), 1);
    assert_eq!(audit[0].source, "football-data.org");
    assert!(audit[0].payload.as_deref().unwrap_or("").contains("Arsenal"));
}
