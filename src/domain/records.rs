//! Raw source records and their canonical forms.
//!
//! Each adapter returns records in its own native shape; the variants here
//! are tagged per source so nothing downstream has to sniff field names.
//! `canonical()` is the single convergence point into the source-agnostic
//! record the reconciler works with.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::entities::{MatchStatLine, MatchStatus};

/// One standings entry as returned by a source adapter.
#[derive(Debug, Clone, Serialize)]
pub enum RawTeamRecord {
    Scraped(ScrapedStanding),
    FootballData(FootballDataStanding),
    ApiFootball(ApiFootballStanding),
}

/// Standings row scraped from an fbref league table.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScrapedStanding {
    pub name: String,
    pub matches_played: i32,
    pub wins: i32,
    pub draws: i32,
    pub losses: i32,
    pub goals_for: i32,
    pub goals_against: i32,
    pub goal_difference: i32,
    pub points: i32,
}

/// football-data.org standings table entry (native field names).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FootballDataStanding {
    pub position: i32,
    pub team: FootballDataTeam,
    pub played_games: i32,
    pub won: i32,
    pub draw: i32,
    pub lost: i32,
    pub points: i32,
    pub goals_for: i32,
    pub goals_against: i32,
    pub goal_difference: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FootballDataTeam {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub founded: Option<i32>,
}

/// api-football standings entry (native field names).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiFootballStanding {
    pub rank: i32,
    pub team: ApiFootballTeam,
    pub points: i32,
    #[serde(rename = "goalsDiff")]
    pub goals_diff: i32,
    pub all: ApiFootballRecordTotals,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiFootballTeam {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiFootballRecordTotals {
    pub played: i32,
    pub win: i32,
    pub draw: i32,
    pub lose: i32,
    pub goals: ApiFootballGoals,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiFootballGoals {
    #[serde(rename = "for")]
    pub goals_for: i32,
    pub against: i32,
}

/// Canonical team record the reconciler merges against persisted state.
#[derive(Debug, Clone, PartialEq)]
pub struct TeamRecord {
    pub name: String,
    pub external_id: Option<String>,
    pub founded_year: Option<i32>,
}

impl RawTeamRecord {
    /// Converge the native shape into the canonical record.
    #[must_use]
    pub fn canonical(&self) -> TeamRecord {
        match self {
            RawTeamRecord::Scraped(row) => TeamRecord {
                name: row.name.clone(),
                external_id: None,
                founded_year: None,
            },
            RawTeamRecord::FootballData(entry) => TeamRecord {
                name: entry.team.name.clone(),
                external_id: Some(entry.team.id.to_string()),
                founded_year: entry.team.founded,
            },
            RawTeamRecord::ApiFootball(entry) => TeamRecord {
                name: entry.team.name.clone(),
                external_id: Some(entry.team.id.to_string()),
                founded_year: None,
            },
        }
    }
}

/// One match/fixture as returned by a source adapter.
#[derive(Debug, Clone, Serialize)]
pub enum RawMatchRecord {
    Scraped(ScrapedMatch),
    FootballData(FootballDataMatch),
    ApiFootball(ApiFootballFixture),
}

/// Fixture row scraped from an fbref schedule table.
#[derive(Debug, Clone, Serialize)]
pub struct ScrapedMatch {
    pub kickoff: DateTime<Utc>,
    pub home_team: String,
    pub away_team: String,
    pub home_goals: Option<i32>,
    pub away_goals: Option<i32>,
}

/// football-data.org match payload (native field names).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FootballDataMatch {
    pub id: i64,
    pub utc_date: DateTime<Utc>,
    pub status: String,
    pub home_team: FootballDataTeam,
    pub away_team: FootballDataTeam,
    #[serde(default)]
    pub score: FootballDataScore,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FootballDataScore {
    #[serde(default)]
    pub full_time: FootballDataScorePair,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FootballDataScorePair {
    #[serde(default)]
    pub home: Option<i32>,
    #[serde(default)]
    pub away: Option<i32>,
}

/// api-football fixture payload (native field names).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiFootballFixture {
    pub fixture: ApiFootballFixtureMeta,
    pub teams: ApiFootballFixtureTeams,
    #[serde(default)]
    pub goals: ApiFootballFixtureGoals,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiFootballFixtureMeta {
    pub id: i64,
    pub date: DateTime<Utc>,
    pub status: ApiFootballFixtureStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiFootballFixtureStatus {
    pub short: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiFootballFixtureTeams {
    pub home: ApiFootballTeam,
    pub away: ApiFootballTeam,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiFootballFixtureGoals {
    #[serde(default)]
    pub home: Option<i32>,
    #[serde(default)]
    pub away: Option<i32>,
}

/// Canonical match record the reconciler merges against persisted state.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchRecord {
    pub external_id: Option<String>,
    pub home_team: String,
    pub away_team: String,
    pub kickoff: DateTime<Utc>,
    pub status: MatchStatus,
    pub home_goals: Option<i32>,
    pub away_goals: Option<i32>,
    pub stats: MatchStatLine,
}

impl RawMatchRecord {
    /// Name of the source this record came from, for the audit side channel.
    #[must_use]
    pub fn source_name(&self) -> &'static str {
        match self {
            RawMatchRecord::Scraped(_) => "fbref",
            RawMatchRecord::FootballData(_) => "football-data.org",
            RawMatchRecord::ApiFootball(_) => "api-football",
        }
    }

    /// Converge the native shape into the canonical record.
    #[must_use]
    pub fn canonical(&self) -> MatchRecord {
        match self {
            RawMatchRecord::Scraped(row) => {
                let finished = row.home_goals.is_some() && row.away_goals.is_some();
                MatchRecord {
                    external_id: None,
                    home_team: row.home_team.clone(),
                    away_team: row.away_team.clone(),
                    kickoff: row.kickoff,
                    status: if finished {
                        MatchStatus::Finished
                    } else {
                        MatchStatus::Scheduled
                    },
                    home_goals: row.home_goals,
                    away_goals: row.away_goals,
                    stats: MatchStatLine::default(),
                }
            }
            RawMatchRecord::FootballData(m) => MatchRecord {
                external_id: Some(m.id.to_string()),
                home_team: m.home_team.name.clone(),
                away_team: m.away_team.name.clone(),
                kickoff: m.utc_date,
                status: status_from_football_data(&m.status),
                home_goals: m.score.full_time.home,
                away_goals: m.score.full_time.away,
                stats: MatchStatLine::default(),
            },
            RawMatchRecord::ApiFootball(f) => MatchRecord {
                external_id: Some(f.fixture.id.to_string()),
                home_team: f.teams.home.name.clone(),
                away_team: f.teams.away.name.clone(),
                kickoff: f.fixture.date,
                status: status_from_api_football(&f.fixture.status.short),
                home_goals: f.goals.home,
                away_goals: f.goals.away,
                stats: MatchStatLine::default(),
            },
        }
    }
}

/// football-data.org match statuses, defaulting unknowns to scheduled.
fn status_from_football_data(status: &str) -> MatchStatus {
    match status {
        "SCHEDULED" | "TIMED" => MatchStatus::Scheduled,
        "LIVE" | "IN_PLAY" | "PAUSED" => MatchStatus::Live,
        "FINISHED" => MatchStatus::Finished,
        "POSTPONED" | "SUSPENDED" => MatchStatus::Postponed,
        "CANCELLED" => MatchStatus::Cancelled,
        _ => MatchStatus::Scheduled,
    }
}

/// api-football short status codes, defaulting unknowns to scheduled.
fn status_from_api_football(short: &str) -> MatchStatus {
    match short {
        "NS" | "TBD" => MatchStatus::Scheduled,
        "1H" | "HT" | "2H" | "ET" | "BT" | "P" | "LIVE" => MatchStatus::Live,
        "FT" | "AET" | "PEN" => MatchStatus::Finished,
        "PST" | "SUSP" | "INT" => MatchStatus::Postponed,
        "CANC" | "ABD" | "AWD" | "WO" => MatchStatus::Cancelled,
        _ => MatchStatus::Scheduled,
    }
}

/// One match's odds across bookmakers, as returned by the odds source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawOddsEvent {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub sport_key: Option<String>,
    #[serde(default)]
    pub commence_time: Option<DateTime<Utc>>,
    pub home_team: String,
    pub away_team: String,
    #[serde(default)]
    pub bookmakers: Vec<RawBookmaker>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawBookmaker {
    pub key: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub last_update: Option<DateTime<Utc>>,
    #[serde(default)]
    pub markets: Vec<RawMarket>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawMarket {
    pub key: String,
    #[serde(default)]
    pub outcomes: Vec<RawOutcome>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawOutcome {
    pub name: String,
    pub price: Decimal,
    #[serde(default)]
    pub point: Option<Decimal>,
}
