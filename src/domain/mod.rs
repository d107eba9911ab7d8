//! Source-agnostic domain types.
//!
//! Canonical entities mirror the persisted schema; raw records carry each
//! source's native shape and converge into canonical records at the
//! reconciliation boundary.

mod entities;
mod league;
mod records;
mod summary;

pub use entities::{
    BestOdds, League, Match, MatchStatLine, MatchStatus, MatchStats, NewLeague, NewMatch, NewOdds,
    NewTeam, Odds, OutcomeOdds, Team,
};
pub use league::{LeagueCode, LeagueType, Season, SeasonParseError};
pub use records::{
    ApiFootballFixture, ApiFootballFixtureGoals, ApiFootballFixtureMeta, ApiFootballFixtureStatus,
    ApiFootballFixtureTeams, ApiFootballGoals, ApiFootballRecordTotals, ApiFootballStanding,
    ApiFootballTeam, FootballDataMatch, FootballDataScore, FootballDataScorePair,
    FootballDataStanding, FootballDataTeam, MatchRecord, RawBookmaker, RawMarket, RawMatchRecord,
    RawOddsEvent, RawOutcome, RawTeamRecord, ScrapedMatch, ScrapedStanding, TeamRecord,
};
pub use summary::{LeagueData, MatchData, OddsSummary, RunSummary};
