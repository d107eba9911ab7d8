//! Run summaries returned by the pipeline entry points.
//!
//! Partial failure is first-class data here: a summary always distinguishes
//! "succeeded with N errors" from "failed entirely" (the latter surfaces as
//! a `PipelineError` instead of a summary).

use std::fmt;

use crate::domain::league::{LeagueCode, Season};
use crate::domain::records::{RawMatchRecord, RawTeamRecord};
use crate::error::SourceFailure;

/// Outcome of a full pipeline run for one league + season.
#[derive(Debug)]
pub struct RunSummary {
    pub league_code: LeagueCode,
    pub season: Season,
    /// True when this run inserted the league row (false = reused).
    pub league_created: bool,
    pub teams_created: usize,
    pub teams_existing: usize,
    pub matches_created: usize,
    pub matches_updated: usize,
    /// Per-source failures that did not abort the run.
    pub errors: Vec<SourceFailure>,
}

impl RunSummary {
    pub(crate) fn new(league_code: LeagueCode, season: Season) -> Self {
        Self {
            league_code,
            season,
            league_created: false,
            teams_created: 0,
            teams_existing: 0,
            matches_created: 0,
            matches_updated: 0,
            errors: Vec::new(),
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}: teams {} created / {} existing, matches {} created / {} updated, {} error(s)",
            self.league_code,
            self.season,
            self.teams_created,
            self.teams_existing,
            self.matches_created,
            self.matches_updated,
            self.errors.len()
        )
    }
}

/// Aggregated standings stage output across all configured sources.
#[derive(Debug)]
pub struct LeagueData {
    pub standings: Vec<RawTeamRecord>,
    pub failures: Vec<SourceFailure>,
}

/// Aggregated match stage output across all configured sources.
#[derive(Debug)]
pub struct MatchData {
    pub matches: Vec<RawMatchRecord>,
    pub failures: Vec<SourceFailure>,
}

/// Outcome of the odds ingestion path.
#[derive(Debug)]
pub struct OddsSummary {
    pub league_code: LeagueCode,
    /// Events (matches) the odds source returned.
    pub odds_fetched: usize,
    /// Odds rows persisted, one per usable bookmaker payload.
    pub odds_stored: usize,
    pub errors: Vec<String>,
}

impl OddsSummary {
    pub(crate) fn new(league_code: LeagueCode) -> Self {
        Self {
            league_code,
            odds_fetched: 0,
            odds_stored: 0,
            errors: Vec::new(),
        }
    }
}

impl fmt::Display for OddsSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} event(s) fetched, {} odds row(s) stored, {} error(s)",
            self.league_code,
            self.odds_fetched,
            self.odds_stored,
            self.errors.len()
        )
    }
}
