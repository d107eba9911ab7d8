//! Pipeline orchestration.
//!
//! Sequences fetch → reconcile → persist across the configured sources and
//! entity types, folding per-source failures into a run summary instead of
//! propagating them. A stage aborts only when every configured source
//! failed; completeness is best effort across sources, not all or nothing.
//!
//! Everything runs on one task with strictly sequential awaits: external
//! rate limits make parallel fetching of little benefit, and sequential
//! execution keeps the partial-failure accounting simple.

mod odds;
mod reconcile;

pub use odds::{OddsEventOutcome, OddsIngest};
pub use reconcile::{
    merge_match, MatchOutcome, MatchReconciliation, Reconciler, TeamReconciliation,
};

use chrono::Utc;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::domain::{LeagueCode, LeagueData, MatchData, MatchStatus, OddsSummary, RunSummary, Season};
use crate::error::{ConfigError, PipelineError, SourceFailure};
use crate::source::{
    ApiFootballClient, FbrefScraper, FootballDataClient, MatchDataSource, OddsApiClient,
    OddsSource,
};
use crate::store::Store;

/// Orchestrates one pipeline run over the configured sources and a
/// caller-provided store.
pub struct Pipeline {
    store: Store,
    sources: Vec<Box<dyn MatchDataSource>>,
    odds_source: Option<Box<dyn OddsSource>>,
}

impl Pipeline {
    #[must_use]
    pub fn new(store: Store) -> Self {
        Self {
            store,
            sources: Vec::new(),
            odds_source: None,
        }
    }

    /// Build a pipeline with every source the config enables and has
    /// credentials for. A missing key skips that source with a warning; an
    /// empty key is a hard configuration error.
    pub fn from_config(config: &Config, store: Store) -> Result<Self, ConfigError> {
        let mut pipeline = Pipeline::new(store);

        if config.sources.fbref.enabled {
            pipeline.add_source(Box::new(FbrefScraper::new(config.sources.fbref.delay())?));
        }

        if config.sources.football_data.enabled {
            match &config.sources.football_data.api_key {
                Some(key) => pipeline.add_source(Box::new(FootballDataClient::new(
                    key,
                    config.sources.football_data.delay(),
                )?)),
                None => warn!("FOOTBALL_DATA_API_KEY not set, skipping football-data.org"),
            }
        }

        if config.sources.api_football.enabled {
            match &config.sources.api_football.api_key {
                Some(key) => pipeline.add_source(Box::new(ApiFootballClient::new(
                    key,
                    config.sources.api_football.delay(),
                )?)),
                None => warn!("API_FOOTBALL_KEY not set, skipping api-football"),
            }
        }

        if config.sources.odds_api.enabled {
            match &config.sources.odds_api.api_key {
                Some(key) => pipeline.set_odds_source(Box::new(OddsApiClient::new(
                    key,
                    config.sources.odds_api.delay(),
                )?)),
                None => warn!("ODDS_API_KEY not set, odds ingestion disabled"),
            }
        }

        Ok(pipeline)
    }

    pub fn add_source(&mut self, source: Box<dyn MatchDataSource>) {
        self.sources.push(source);
    }

    pub fn set_odds_source(&mut self, source: Box<dyn OddsSource>) {
        self.odds_source = Some(source);
    }

    #[must_use]
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Fetch standings from every configured source, aggregating records
    /// and per-source failures.
    ///
    /// # Errors
    /// `PipelineError::AllSourcesFailed` when no source succeeded.
    pub async fn fetch_league_data(
        &self,
        league: LeagueCode,
        season: &Season,
    ) -> Result<LeagueData, PipelineError> {
        let mut data = LeagueData {
            standings: Vec::new(),
            failures: Vec::new(),
        };
        let mut succeeded = 0usize;

        for source in &self.sources {
            info!(source = source.name(), league = %league, "fetching standings");
            match source.fetch_standings(league, season).await {
                Ok(records) => {
                    succeeded += 1;
                    data.standings.extend(records);
                }
                Err(e) => {
                    error!(source = source.name(), error = %e, "standings fetch failed");
                    data.failures.push(SourceFailure::new(source.name(), e));
                }
            }
        }

        if succeeded == 0 {
            return Err(PipelineError::AllSourcesFailed {
                league,
                stage: "standings",
                failures: data.failures,
            });
        }
        info!(
            entries = data.standings.len(),
            failures = data.failures.len(),
            "standings stage complete"
        );
        Ok(data)
    }

    /// Fetch matches from every configured source, aggregating records and
    /// per-source failures.
    ///
    /// # Errors
    /// `PipelineError::AllSourcesFailed` when no source succeeded.
    pub async fn fetch_match_data(
        &self,
        league: LeagueCode,
        season: &Season,
        status: Option<MatchStatus>,
    ) -> Result<MatchData, PipelineError> {
        let mut data = MatchData {
            matches: Vec::new(),
            failures: Vec::new(),
        };
        let mut succeeded = 0usize;

        for source in &self.sources {
            info!(source = source.name(), league = %league, "fetching matches");
            match source.fetch_matches(league, season, status).await {
                Ok(records) => {
                    succeeded += 1;
                    data.matches.extend(records);
                }
                Err(e) => {
                    error!(source = source.name(), error = %e, "match fetch failed");
                    data.failures.push(SourceFailure::new(source.name(), e));
                }
            }
        }

        if succeeded == 0 {
            return Err(PipelineError::AllSourcesFailed {
                league,
                stage: "matches",
                failures: data.failures,
            });
        }
        info!(
            matches = data.matches.len(),
            failures = data.failures.len(),
            "match stage complete"
        );
        Ok(data)
    }

    /// Run the complete pipeline for one league and season.
    ///
    /// Stages: ensure league → fetch standings → reconcile teams →
    /// (optionally) fetch matches → reconcile matches. Per-source failures
    /// accumulate in the returned summary.
    ///
    /// # Errors
    /// `PipelineError` when a required stage had no surviving source or a
    /// persistence step failed outright.
    pub async fn run_full_pipeline(
        &self,
        league: LeagueCode,
        season: &Season,
        fetch_matches: bool,
    ) -> Result<RunSummary, PipelineError> {
        info!(league = %league, season = %season, "starting pipeline run");
        let reconciler = Reconciler::new(&self.store);
        let mut summary = RunSummary::new(league, season.clone());

        let (league_row, created) = reconciler.ensure_league(league, season)?;
        summary.league_created = created;

        let league_data = self.fetch_league_data(league, season).await?;
        summary.errors.extend(league_data.failures);

        let teams = reconciler.reconcile_teams(&league_row, &league_data.standings)?;
        summary.teams_created = teams.created;
        summary.teams_existing = teams.existing;

        if fetch_matches {
            let match_data = self.fetch_match_data(league, season, None).await?;
            summary.errors.extend(match_data.failures);

            let matches =
                reconciler.reconcile_matches(&league_row, &teams.teams, &match_data.matches)?;
            summary.matches_created = matches.created;
            summary.matches_updated = matches.updated;
            if matches.skipped > 0 {
                warn!(skipped = matches.skipped, "match records skipped");
            }
        }

        info!(%summary, "pipeline run complete");
        Ok(summary)
    }

    /// Fetch league-wide odds and persist one row per (bookmaker × match).
    ///
    /// `only_match_id` restricts storage to a single match even though the
    /// underlying fetch is always league-wide.
    ///
    /// # Errors
    /// `PipelineError::OddsSourceNotConfigured` when no odds-capable
    /// adapter is configured; a failed fetch is recorded in the summary
    /// instead of raised.
    pub async fn fetch_and_store_odds(
        &self,
        league: LeagueCode,
        only_match_id: Option<i32>,
    ) -> Result<OddsSummary, PipelineError> {
        let source = self
            .odds_source
            .as_ref()
            .ok_or(PipelineError::OddsSourceNotConfigured)?;

        let mut summary = OddsSummary::new(league);

        info!(source = source.name(), league = %league, "fetching odds");
        let events = match source.fetch_odds(league).await {
            Ok(events) => events,
            Err(e) => {
                error!(source = source.name(), error = %e, "odds fetch failed");
                summary
                    .errors
                    .push(SourceFailure::new(source.name(), e).to_string());
                return Ok(summary);
            }
        };

        summary.odds_fetched = events.len();
        if events.is_empty() {
            warn!(league = %league, "no odds data available");
            return Ok(summary);
        }

        let retrieved_at = Utc::now();
        let ingest = OddsIngest::new(&self.store);
        for event in &events {
            let outcome = ingest.reconcile_event(league, event, only_match_id, retrieved_at)?;
            summary.odds_stored += outcome.stored;
            summary.errors.extend(outcome.errors);
        }

        info!(%summary, "odds ingestion complete");
        Ok(summary)
    }
}
