//! Canonical persisted entities.
//!
//! These mirror the SQLite schema one-to-one; the store layer converts
//! between these and raw rows. `New*` structs describe rows to insert,
//! without the store-assigned id and timestamps.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::domain::league::LeagueType;

/// Status of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchStatus {
    Scheduled,
    Live,
    Finished,
    Postponed,
    Cancelled,
}

impl MatchStatus {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStatus::Scheduled => "scheduled",
            MatchStatus::Live => "live",
            MatchStatus::Finished => "finished",
            MatchStatus::Postponed => "postponed",
            MatchStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scheduled" => Ok(MatchStatus::Scheduled),
            "live" => Ok(MatchStatus::Live),
            "finished" => Ok(MatchStatus::Finished),
            "postponed" => Ok(MatchStatus::Postponed),
            "cancelled" => Ok(MatchStatus::Cancelled),
            other => Err(format!("unknown match status '{other}'")),
        }
    }
}

/// Football league row.
#[derive(Debug, Clone, PartialEq)]
pub struct League {
    pub id: i32,
    pub name: String,
    pub country: String,
    pub season: String,
    pub league_type: LeagueType,
    /// Domain league code the row was created under.
    pub external_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewLeague {
    pub name: String,
    pub country: String,
    pub season: String,
    pub league_type: LeagueType,
    pub external_id: String,
}

/// Football team row. Unique by (name, league).
#[derive(Debug, Clone, PartialEq)]
pub struct Team {
    pub id: i32,
    pub name: String,
    pub country: String,
    pub league_id: i32,
    pub founded_year: Option<i32>,
    pub external_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewTeam {
    pub name: String,
    pub country: String,
    pub league_id: i32,
    pub founded_year: Option<i32>,
    pub external_id: Option<String>,
}

/// Extended per-side match statistics, populated opportunistically by
/// whichever source provides them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchStatLine {
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
}

macro_rules! merge_stat_fields {
    ($existing:expr, $incoming:expr, $($field:ident),+ $(,)?) => {
        MatchStatLine {
            $($field: $incoming.$field.or($existing.$field),)+
        }
    };
}

impl MatchStatLine {
    /// Merge an incoming line over this one. Incoming non-null values win;
    /// null incoming values never erase existing ones.
    #[must_use]
    pub fn merged_with(&self, incoming: &MatchStatLine) -> MatchStatLine {
        merge_stat_fields!(
            self,
            incoming,
            home_shots,
            away_shots,
            home_shots_on_target,
            away_shots_on_target,
            home_possession,
            away_possession,
            home_passes,
            away_passes,
            home_pass_accuracy,
            away_pass_accuracy,
            home_fouls,
            away_fouls,
            home_yellow_cards,
            away_yellow_cards,
            home_red_cards,
            away_red_cards,
        )
    }
}

/// Football match row.
#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    pub id: i32,
    pub league_id: i32,
    pub home_team_id: i32,
    pub away_team_id: i32,
    pub match_date: DateTime<Utc>,
    pub status: MatchStatus,
    pub home_goals: Option<i32>,
    pub away_goals: Option<i32>,
    pub stats: MatchStatLine,
    pub external_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewMatch {
    pub league_id: i32,
    pub home_team_id: i32,
    pub away_team_id: i32,
    pub match_date: DateTime<Utc>,
    pub status: MatchStatus,
    pub home_goals: Option<i32>,
    pub away_goals: Option<i32>,
    pub stats: MatchStatLine,
    pub external_id: Option<String>,
}

/// One bookmaker's odds for a match at one fetch. Append-only.
#[derive(Debug, Clone, PartialEq)]
pub struct Odds {
    pub id: i32,
    pub match_id: i32,
    pub bookmaker: String,
    pub home_win_odds: Decimal,
    pub draw_odds: Decimal,
    pub away_win_odds: Decimal,
    pub over_2_5_odds: Option<Decimal>,
    pub under_2_5_odds: Option<Decimal>,
    pub retrieved_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewOdds {
    pub match_id: i32,
    pub bookmaker: String,
    pub home_win_odds: Decimal,
    pub draw_odds: Decimal,
    pub away_win_odds: Decimal,
    pub over_2_5_odds: Option<Decimal>,
    pub under_2_5_odds: Option<Decimal>,
    pub retrieved_at: DateTime<Utc>,
}

/// Best available price for one outcome, with the bookmaker offering it.
#[derive(Debug, Clone, PartialEq)]
pub struct OutcomeOdds {
    pub price: Decimal,
    pub bookmaker: String,
}

/// Best price per outcome across all bookmakers and fetches for a match.
#[derive(Debug, Clone, PartialEq)]
pub struct BestOdds {
    pub home_win: OutcomeOdds,
    pub draw: OutcomeOdds,
    pub away_win: OutcomeOdds,
}

/// Raw per-source payload kept for audit, keyed by (match, source).
#[derive(Debug, Clone, PartialEq)]
pub struct MatchStats {
    pub id: i32,
    pub match_id: i32,
    pub source: String,
    pub payload: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_str() {
        for status in [
            MatchStatus::Scheduled,
            MatchStatus::Live,
            MatchStatus::Finished,
            MatchStatus::Postponed,
            MatchStatus::Cancelled,
        ] {
            assert_eq!(status.as_str().parse::<MatchStatus>().unwrap(), status);
        }
        assert!("abandoned".parse::<MatchStatus>().is_err());
    }

    #[test]
    fn stat_merge_prefers_incoming_non_null() {
        let existing = MatchStatLine {
            home_possession: Some(55.0),
            home_shots: Some(12),
            ..Default::default()
        };
        let incoming = MatchStatLine {
            home_possession: Some(60.0),
            away_shots: Some(7),
            ..Default::default()
        };

        let merged = existing.merged_with(&incoming);
        assert_eq!(merged.home_possession, Some(60.0));
        assert_eq!(merged.home_shots, Some(12));
        assert_eq!(merged.away_shots, Some(7));
    }

    #[test]
    fn stat_merge_never_erases_with_null() {
        let existing = MatchStatLine {
            home_possession: Some(55.0),
            ..Default::default()
        };
        let merged = existing.merged_with(&MatchStatLine::default());
        assert_eq!(merged.home_possession, Some(55.0));
    }
}
