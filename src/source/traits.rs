//! Source trait definitions.
//!
//! These traits define the uniform fetch interface every source
//! implementation must provide, enabling multi-source aggregation with a
//! common orchestration path.

use async_trait::async_trait;

use crate::domain::{LeagueCode, MatchStatus, RawMatchRecord, RawOddsEvent, RawTeamRecord, Season};
use crate::error::SourceError;

/// A source of standings and match data for a league.
#[async_trait]
pub trait MatchDataSource: Send + Sync {
    /// Source name used in run summaries and logs.
    fn name(&self) -> &'static str;

    /// Fetch the current standings table for a league and season.
    async fn fetch_standings(
        &self,
        league: LeagueCode,
        season: &Season,
    ) -> Result<Vec<RawTeamRecord>, SourceError>;

    /// Fetch matches for a league and season, optionally filtered by status.
    async fn fetch_matches(
        &self,
        league: LeagueCode,
        season: &Season,
        status: Option<MatchStatus>,
    ) -> Result<Vec<RawMatchRecord>, SourceError>;
}

/// A source of bookmaker odds for a league.
///
/// Odds fetches are always league-wide; the upstream API has no
/// single-match query.
#[async_trait]
pub trait OddsSource: Send + Sync {
    /// Source name used in run summaries and logs.
    fn name(&self) -> &'static str;

    /// Fetch odds events for every upcoming match in a league.
    async fn fetch_odds(&self, league: LeagueCode) -> Result<Vec<RawOddsEvent>, SourceError>;
}
