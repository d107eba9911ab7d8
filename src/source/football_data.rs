//! football-data.org REST adapter (API v4).
//!
//! Authenticates with an `X-Auth-Token` header. Standings arrive as a list
//! of tables (total/home/away); all entries are flattened since the
//! reconciler only cares about the teams.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::Deserialize;
use tracing::info;

use crate::domain::{
    FootballDataMatch, FootballDataStanding, LeagueCode, MatchStatus, RawMatchRecord,
    RawTeamRecord, Season,
};
use crate::error::{ConfigError, SourceError};
use crate::source::http::SourceHttp;
use crate::source::traits::MatchDataSource;

pub const SOURCE_NAME: &str = "football-data.org";
pub const DEFAULT_REQUEST_DELAY: Duration = Duration::from_millis(500);

const BASE_URL: &str = "https://api.football-data.org/v4";
const AUTH_HEADER: &str = "x-auth-token";
const KEY_ENV: &str = "FOOTBALL_DATA_API_KEY";

/// REST client for api.football-data.org.
#[derive(Debug)]
pub struct FootballDataClient {
    http: SourceHttp,
    base_url: String,
}

#[derive(Deserialize)]
struct StandingsEnvelope {
    #[serde(default)]
    standings: Vec<StandingsTable>,
}

#[derive(Deserialize)]
struct StandingsTable {
    #[serde(default)]
    table: Vec<FootballDataStanding>,
}

#[derive(Deserialize)]
struct MatchesEnvelope {
    #[serde(default)]
    matches: Vec<FootballDataMatch>,
}

impl FootballDataClient {
    pub fn new(api_key: &str, request_delay: Duration) -> Result<Self, ConfigError> {
        if api_key.is_empty() {
            return Err(ConfigError::MissingApiKey {
                source_name: SOURCE_NAME,
                env: KEY_ENV,
            });
        }

        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static(AUTH_HEADER),
            HeaderValue::from_str(api_key).map_err(|_| ConfigError::InvalidValue {
                field: "api_key",
                reason: "contains non-printable characters".into(),
            })?,
        );

        Ok(Self {
            http: SourceHttp::new(request_delay, headers)?,
            base_url: BASE_URL.to_string(),
        })
    }

    /// Point the client at a different host. Intended for tests.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// football-data.org competition code for the leagues this adapter covers.
    fn competition_code(league: LeagueCode) -> Option<&'static str> {
        match league {
            LeagueCode::Epl => Some("PL"),
            LeagueCode::LaLiga => Some("PD"),
            LeagueCode::SerieA => Some("SA"),
            LeagueCode::Bundesliga => Some("BL1"),
            LeagueCode::Ligue1 => Some("FL1"),
            LeagueCode::Eredivisie => Some("DED"),
            LeagueCode::LigaNos => Some("PPL"),
            LeagueCode::ChampionsLeague => None,
        }
    }

    fn resolve(league: LeagueCode) -> Result<&'static str, SourceError> {
        Self::competition_code(league).ok_or(SourceError::UnknownLeague {
            source_name: SOURCE_NAME,
            code: league,
        })
    }

    fn status_param(status: MatchStatus) -> &'static str {
        match status {
            MatchStatus::Scheduled => "SCHEDULED",
            MatchStatus::Live => "LIVE",
            MatchStatus::Finished => "FINISHED",
            MatchStatus::Postponed => "POSTPONED",
            MatchStatus::Cancelled => "CANCELLED",
        }
    }
}

#[async_trait]
impl MatchDataSource for FootballDataClient {
    fn name(&self) -> &'static str {
        SOURCE_NAME
    }

    async fn fetch_standings(
        &self,
        league: LeagueCode,
        season: &Season,
    ) -> Result<Vec<RawTeamRecord>, SourceError> {
        let code = Self::resolve(league)?;
        let url = format!("{}/competitions/{code}/standings", self.base_url);
        let query = [("season", season.start_year().to_string())];

        let envelope: StandingsEnvelope = self.http.get_json(&url, &query).await?;
        let standings: Vec<RawTeamRecord> = envelope
            .standings
            .into_iter()
            .flat_map(|table| table.table)
            .map(RawTeamRecord::FootballData)
            .collect();

        info!(league = %league, entries = standings.len(), "retrieved standings");
        Ok(standings)
    }

    async fn fetch_matches(
        &self,
        league: LeagueCode,
        season: &Season,
        status: Option<MatchStatus>,
    ) -> Result<Vec<RawMatchRecord>, SourceError> {
        let code = Self::resolve(league)?;
        let url = format!("{}/competitions/{code}/matches", self.base_url);

        let mut query = vec![("season", season.start_year().to_string())];
        if let Some(status) = status {
            query.push(("status", Self::status_param(status).to_string()));
        }

        let envelope: MatchesEnvelope = self.http.get_json(&url, &query).await?;
        let matches: Vec<RawMatchRecord> = envelope
            .matches
            .into_iter()
            .map(RawMatchRecord::FootballData)
            .collect();

        info!(league = %league, matches = matches.len(), "retrieved matches");
        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_api_key_is_a_config_error() {
        let err = FootballDataClient::new("", DEFAULT_REQUEST_DELAY).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingApiKey {
                source_name: SOURCE_NAME,
                env: KEY_ENV,
            }
        ));
    }

    #[tokio::test]
    async fn unknown_league_fails_before_any_request() {
        let client = FootballDataClient::new("test-key", Duration::from_millis(1)).unwrap();
        let season: Season = "2023-24".parse().unwrap();

        let err = client
            .fetch_standings(LeagueCode::ChampionsLeague, &season)
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::UnknownLeague { .. }));
    }

    #[test]
    fn standings_envelope_flattens_all_tables() {
        let payload = r#"{
            "standings": [
                {"type": "TOTAL", "table": [{
                    "position": 1,
                    "team": {"id": 57, "name": "Arsenal"},
                    "playedGames": 10, "won": 8, "draw": 1, "lost": 1,
                    "points": 25, "goalsFor": 22, "goalsAgainst": 8,
                    "goalDifference": 14
                }]},
                {"type": "HOME", "table": [{
                    "position": 1,
                    "team": {"id": 57, "name": "Arsenal"},
                    "playedGames": 5, "won": 5, "draw": 0, "lost": 0,
                    "points": 15, "goalsFor": 14, "goalsAgainst": 2,
                    "goalDifference": 12
                }]}
            ]
        }"#;
        let envelope: StandingsEnvelope = serde_json::from_str(payload).unwrap();
        let entries: Vec<_> = envelope
            .standings
            .into_iter()
            .flat_map(|t| t.table)
            .collect();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].team.name, "Arsenal");
    }
}
