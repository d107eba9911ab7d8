//! Diesel row types and their conversions to domain entities.
//!
//! Rows store dates as RFC 3339 TEXT and odds prices as decimal TEXT;
//! anything that fails to convert back surfaces as `StoreError::Corrupt`
//! rather than panicking mid-run.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;

use crate::domain::{
    League, LeagueType, Match, MatchStatLine, MatchStats, MatchStatus, NewLeague, NewMatch,
    NewOdds, NewTeam, Odds, Team,
};
use crate::error::StoreError;
use crate::store::schema::{leagues, match_stats, matches, odds, teams};

pub(crate) fn parse_datetime(text: &str, column: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(text)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StoreError::Corrupt(format!("{column}: {e}")))
}

pub(crate) fn parse_decimal(text: &str, column: &str) -> Result<Decimal, StoreError> {
    text.parse()
        .map_err(|e| StoreError::Corrupt(format!("{column}: {e}")))
}

fn parse_opt_decimal(text: Option<&str>, column: &str) -> Result<Option<Decimal>, StoreError> {
    text.map(|t| parse_decimal(t, column)).transpose()
}

#[derive(Queryable)]
pub struct LeagueRow {
    pub id: i32,
    pub name: String,
    pub country: String,
    pub season: String,
    pub league_type: String,
    pub external_id: String,
    pub created_at: String,
    pub updated_at: String,
}

impl LeagueRow {
    pub fn into_domain(self) -> Result<League, StoreError> {
        Ok(League {
            id: self.id,
            name: self.name,
            country: self.country,
            season: self.season,
            league_type: self
                .league_type
                .parse::<LeagueType>()
                .map_err(StoreError::Corrupt)?,
            external_id: self.external_id,
            created_at: parse_datetime(&self.created_at, "leagues.created_at")?,
            updated_at: parse_datetime(&self.updated_at, "leagues.updated_at")?,
        })
    }
}

#[derive(Insertable)]
#[diesel(table_name = leagues)]
pub struct NewLeagueRow {
    pub name: String,
    pub country: String,
    pub season: String,
    pub league_type: String,
    pub external_id: String,
    pub created_at: String,
    pub updated_at: String,
}

impl NewLeagueRow {
    pub fn from_domain(new: &NewLeague, now: DateTime<Utc>) -> Self {
        Self {
            name: new.name.clone(),
            country: new.country.clone(),
            season: new.season.clone(),
            league_type: new.league_type.as_str().to_string(),
            external_id: new.external_id.clone(),
            created_at: now.to_rfc3339(),
            updated_at: now.to_rfc3339(),
        }
    }
}

#[derive(Queryable)]
pub struct TeamRow {
    pub id: i32,
    pub name: String,
    pub country: String,
    pub league_id: i32,
    pub founded_year: Option<i32>,
    pub external_id: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl TeamRow {
    pub fn into_domain(self) -> Result<Team, StoreError> {
        Ok(Team {
            id: self.id,
            name: self.name,
            country: self.country,
            league_id: self.league_id,
            founded_year: self.founded_year,
            external_id: self.external_id,
            created_at: parse_datetime(&self.created_at, "teams.created_at")?,
            updated_at: parse_datetime(&self.updated_at, "teams.updated_at")?,
        })
    }
}

#[derive(Insertable)]
#[diesel(table_name = teams)]
pub struct NewTeamRow {
    pub name: String,
    pub country: String,
    pub league_id: i32,
    pub founded_year: Option<i32>,
    pub external_id: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl NewTeamRow {
    pub fn from_domain(new: &NewTeam, now: DateTime<Utc>) -> Self {
        Self {
            name: new.name.clone(),
            country: new.country.clone(),
            league_id: new.league_id,
            founded_year: new.founded_year,
            external_id: new.external_id.clone(),
            created_at: now.to_rfc3339(),
            updated_at: now.to_rfc3339(),
        }
    }
}

#[derive(Queryable)]
pub struct MatchRow {
    pub id: i32,
    pub league_id: i32,
    pub home_team_id: i32,
    pub away_team_id: i32,
    pub match_date: String,
    pub status: String,
    pub home_goals: Option<i32>,
    pub away_goals: Option<i32>,
    pub home_shots: Option<i32>,
    pub away_shots: Option<i32>,
    pub home_shots_on_target: Option<i32>,
    pub away_shots_on_target: Option<i32>,
    pub home_possession: Option<f64>,
    pub away_possession: Option<f64>,
    pub home_passes: Option<i32>,
    pub away_passes: Option<i32>,
    pub home_pass_accuracy: Option<f64>,
    pub away_pass_accuracy: Option<f64>,
    pub home_fouls: Option<i32>,
    pub away_fouls: Option<i32>,
    pub home_yellow_cards: Option<i32>,
    pub away_yellow_cards: Option<i32>,
    pub home_red_cards: Option<i32>,
    pub away_red_cards: Option<i32>,
    pub external_id: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl MatchRow {
    pub fn into_domain(self) -> Result<Match, StoreError> {
        Ok(Match {
            id: self.id,
            league_id: self.league_id,
            home_team_id: self.home_team_id,
            away_team_id: self.away_team_id,
            match_date: parse_datetime(&self.match_date, "matches.match_date")?,
            status: self
                .status
                .parse::<MatchStatus>()
                .map_err(StoreError::Corrupt)?,
            home_goals: self.home_goals,
            away_goals: self.away_goals,
            stats: MatchStatLine {
                home_shots: self.home_shots,
                away_shots: self.away_shots,
                home_shots_on_target: self.home_shots_on_target,
                away_shots_on_target: self.away_shots_on_target,
                home_possession: self.home_possession,
                away_possession: self.away_possession,
                home_passes: self.home_passes,
                away_passes: self.away_passes,
                home_pass_accuracy: self.home_pass_accuracy,
                away_pass_accuracy: self.away_pass_accuracy,
                home_fouls: self.home_fouls,
                away_fouls: self.away_fouls,
                home_yellow_cards: self.home_yellow_cards,
                away_yellow_cards: self.away_yellow_cards,
                home_red_cards: self.home_red_cards,
                away_red_cards: self.away_red_cards,
            },
            external_id: self.external_id,
            created_at: parse_datetime(&self.created_at, "matches.created_at")?,
            updated_at: parse_datetime(&self.updated_at, "matches.updated_at")?,
        })
    }
}

#[derive(Insertable)]
#[diesel(table_name = matches)]
pub struct NewMatchRow {
    pub league_id: i32,
    pub home_team_id: i32,
    pub away_team_id: i32,
    pub match_date: String,
    pub status: String,
    pub home_goals: Option<i32>,
    pub away_goals: Option<i32>,
    pub home_shots: Option<i32>,
    pub away_shots: Option<i32>,
    pub home_shots_on_target: Option<i32>,
    pub away_shots_on_target: Option<i32>,
    pub home_possession: Option<f64>,
    pub away_possession: Option<f64>,
    pub home_passes: Option<i32>,
    pub away_passes: Option<i32>,
    pub home_pass_accuracy: Option<f64>,
    pub away_pass_accuracy: Option<f64>,
    pub home_fouls: Option<i32>,
    pub away_fouls: Option<i32>,
    pub home_yellow_cards: Option<i32>,
    pub away_yellow_cards: Option<i32>,
    pub home_red_cards: Option<i32>,
    pub away_red_cards: Option<i32>,
    pub external_id: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl NewMatchRow {
    pub fn from_domain(new: &NewMatch, now: DateTime<Utc>) -> Self {
        Self {
            league_id: new.league_id,
            home_team_id: new.home_team_id,
            away_team_id: new.away_team_id,
            match_date: new.match_date.to_rfc3339(),
            status: new.status.as_str().to_string(),
            home_goals: new.home_goals,
            away_goals: new.away_goals,
            home_shots: new.stats.home_shots,
            away_shots: new.stats.away_shots,
            home_shots_on_target: new.stats.home_shots_on_target,
            away_shots_on_target: new.stats.away_shots_on_target,
            home_possession: new.stats.home_possession,
            away_possession: new.stats.away_possession,
            home_passes: new.stats.home_passes,
            away_passes: new.stats.away_passes,
            home_pass_accuracy: new.stats.home_pass_accuracy,
            away_pass_accuracy: new.stats.away_pass_accuracy,
            home_fouls: new.stats.home_fouls,
            away_fouls: new.stats.away_fouls,
            home_yellow_cards: new.stats.home_yellow_cards,
            away_yellow_cards: new.stats.away_yellow_cards,
            home_red_cards: new.stats.home_red_cards,
            away_red_cards: new.stats.away_red_cards,
            external_id: new.external_id.clone(),
            created_at: now.to_rfc3339(),
            updated_at: now.to_rfc3339(),
        }
    }
}

/// Changeset applied when the reconciler merges new data into a match.
///
/// `treat_none_as_null`: the merge policy has already decided what every
/// field should hold, so the row must end up exactly equal to the domain
/// value, including fields that are still NULL.
#[derive(AsChangeset)]
#[diesel(table_name = matches, treat_none_as_null = true)]
pub struct MatchUpdateRow {
    pub match_date: String,
    pub status: String,
    pub home_goals: Option<i32>,
    pub away_goals: Option<i32>,
    pub home_shots: Option<i32>,
    pub away_shots: Option<i32>,
    pub home_shots_on_target: Option<i32>,
    pub away_shots_on_target: Option<i32>,
    pub home_possession: Option<f64>,
    pub away_possession: Option<f64>,
    pub home_passes: Option<i32>,
    pub away_passes: Option<i32>,
    pub home_pass_accuracy: Option<f64>,
    pub away_pass_accuracy: Option<f64>,
    pub home_fouls: Option<i32>,
    pub away_fouls: Option<i32>,
    pub home_yellow_cards: Option<i32>,
    pub away_yellow_cards: Option<i32>,
    pub home_red_cards: Option<i32>,
    pub away_red_cards: Option<i32>,
    pub external_id: Option<String>,
    pub updated_at: String,
}

impl MatchUpdateRow {
    /// Build a changeset writing the merged state of `m` back to its row.
    pub fn from_domain(m: &Match, now: DateTime<Utc>) -> Self {
        Self {
            match_date: m.match_date.to_rfc3339(),
            status: m.status.as_str().to_string(),
            home_goals: m.home_goals,
            away_goals: m.away_goals,
            home_shots: m.stats.home_shots,
            away_shots: m.stats.away_shots,
            home_shots_on_target: m.stats.home_shots_on_target,
            away_shots_on_target: m.stats.away_shots_on_target,
            home_possession: m.stats.home_possession,
            away_possession: m.stats.away_possession,
            home_passes: m.stats.home_passes,
            away_passes: m.stats.away_passes,
            home_pass_accuracy: m.stats.home_pass_accuracy,
            away_pass_accuracy: m.stats.away_pass_accuracy,
            home_fouls: m.stats.home_fouls,
            away_fouls: m.stats.away_fouls,
            home_yellow_cards: m.stats.home_yellow_cards,
            away_yellow_cards: m.stats.away_yellow_cards,
            home_red_cards: m.stats.home_red_cards,
            away_red_cards: m.stats.away_red_cards,
            external_id: m.external_id.clone(),
            updated_at: now.to_rfc3339(),
        }
    }
}

#[derive(Queryable)]
pub struct OddsRow {
    pub id: i32,
    pub match_id: i32,
    pub bookmaker: String,
    pub home_win_odds: String,
    pub draw_odds: String,
    pub away_win_odds: String,
    pub over_2_5_odds: Option<String>,
    pub under_2_5_odds: Option<String>,
    pub retrieved_at: String,
    pub created_at: String,
}

impl OddsRow {
    pub fn into_domain(self) -> Result<Odds, StoreError> {
        Ok(Odds {
            id: self.id,
            match_id: self.match_id,
            bookmaker: self.bookmaker,
            home_win_odds: parse_decimal(&self.home_win_odds, "odds.home_win_odds")?,
            draw_odds: parse_decimal(&self.draw_odds, "odds.draw_odds")?,
            away_win_odds: parse_decimal(&self.away_win_odds, "odds.away_win_odds")?,
            over_2_5_odds: parse_opt_decimal(self.over_2_5_odds.as_deref(), "odds.over_2_5_odds")?,
            under_2_5_odds: parse_opt_decimal(
                self.under_2_5_odds.as_deref(),
                "odds.under_2_5_odds",
            )?,
            retrieved_at: parse_datetime(&self.retrieved_at, "odds.retrieved_at")?,
            created_at: parse_datetime(&self.created_at, "odds.created_at")?,
        })
    }
}

#[derive(Insertable)]
#[diesel(table_name = odds)]
pub struct NewOddsRow {
    pub match_id: i32,
    pub bookmaker: String,
    pub home_win_odds: String,
    pub draw_odds: String,
    pub away_win_odds: String,
    pub over_2_5_odds: Option<String>,
    pub under_2_5_odds: Option<String>,
    pub retrieved_at: String,
    pub created_at: String,
}

impl NewOddsRow {
    pub fn from_domain(new: &NewOdds, now: DateTime<Utc>) -> Self {
        Self {
            match_id: new.match_id,
            bookmaker: new.bookmaker.clone(),
            home_win_odds: new.home_win_odds.to_string(),
            draw_odds: new.draw_odds.to_string(),
            away_win_odds: new.away_win_odds.to_string(),
            over_2_5_odds: new.over_2_5_odds.map(|d| d.to_string()),
            under_2_5_odds: new.under_2_5_odds.map(|d| d.to_string()),
            retrieved_at: new.retrieved_at.to_rfc3339(),
            created_at: now.to_rfc3339(),
        }
    }
}

#[derive(Queryable)]
pub struct MatchStatsRow {
    pub id: i32,
    pub match_id: i32,
    pub source: String,
    pub payload: Option<String>,
    pub created_at: String,
}

impl MatchStatsRow {
    pub fn into_domain(self) -> Result<MatchStats, StoreError> {
        Ok(MatchStats {
            id: self.id,
            match_id: self.match_id,
            source: self.source,
            payload: self.payload,
            created_at: parse_datetime(&self.created_at, "match_stats.created_at")?,
        })
    }
}

#[derive(Insertable)]
#[diesel(table_name = match_stats)]
pub struct NewMatchStatsRow {
    pub match_id: i32,
    pub source: String,
    pub payload: Option<String>,
    pub created_at: String,
}
