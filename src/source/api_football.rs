//! api-football (RapidAPI) REST adapter.
//!
//! Authenticates with RapidAPI headers. The API wraps every payload in an
//! envelope whose `errors` member may be populated on an otherwise-2xx
//! response; quota exhaustion is reported that way rather than with a 429,
//! so an error-shaped success body is translated to `RateLimited`.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::domain::{
    ApiFootballFixture, ApiFootballStanding, LeagueCode, MatchStatus, RawMatchRecord,
    RawTeamRecord, Season,
};
use crate::error::{ConfigError, SourceError};
use crate::source::http::SourceHttp;
use crate::source::traits::MatchDataSource;

pub const SOURCE_NAME: &str = "api-football";
pub const DEFAULT_REQUEST_DELAY: Duration = Duration::from_millis(250);

const BASE_URL: &str = "https://api-football-v1.p.rapidapi.com/v3";
const RAPIDAPI_HOST: &str = "api-football-v1.p.rapidapi.com";
const KEY_ENV: &str = "API_FOOTBALL_KEY";

/// REST client for api-football.com (via RapidAPI).
#[derive(Debug)]
pub struct ApiFootballClient {
    http: SourceHttp,
    base_url: String,
}

#[derive(Deserialize)]
#[serde(bound(deserialize = "T: serde::de::DeserializeOwned"))]
struct Envelope<T> {
    #[serde(default)]
    errors: Value,
    #[serde(default)]
    response: Vec<T>,
}

#[derive(Deserialize)]
struct StandingsResponse {
    league: StandingsLeague,
}

#[derive(Deserialize)]
struct StandingsLeague {
    #[serde(default)]
    standings: Vec<Vec<ApiFootballStanding>>,
}

/// True when the envelope's `errors` member carries anything.
fn error_shaped(errors: &Value) -> bool {
    match errors {
        Value::Null => false,
        Value::Object(map) => !map.is_empty(),
        Value::Array(items) => !items.is_empty(),
        _ => true,
    }
}

impl ApiFootballClient {
    pub fn new(api_key: &str, request_delay: Duration) -> Result<Self, ConfigError> {
        if api_key.is_empty() {
            return Err(ConfigError::MissingApiKey {
                source_name: SOURCE_NAME,
                env: KEY_ENV,
            });
        }

        Ok(Self {
            http: SourceHttp::new(request_delay, super::rapidapi_headers(api_key, RAPIDAPI_HOST)?)?,
            base_url: BASE_URL.to_string(),
        })
    }

    /// Point the client at a different host. Intended for tests.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// api-football league id for the leagues this adapter covers.
    fn league_id(league: LeagueCode) -> Option<u32> {
        match league {
            LeagueCode::Epl => Some(39),
            LeagueCode::LaLiga => Some(140),
            LeagueCode::SerieA => Some(135),
            LeagueCode::Bundesliga => Some(78),
            LeagueCode::Ligue1 => Some(61),
            LeagueCode::Eredivisie => Some(88),
            LeagueCode::LigaNos => Some(94),
            LeagueCode::ChampionsLeague => None,
        }
    }

    fn resolve(league: LeagueCode) -> Result<u32, SourceError> {
        Self::league_id(league).ok_or(SourceError::UnknownLeague {
            source_name: SOURCE_NAME,
            code: league,
        })
    }

    fn status_param(status: MatchStatus) -> &'static str {
        match status {
            MatchStatus::Scheduled => "NS",
            MatchStatus::Live => "LIVE",
            MatchStatus::Finished => "FT",
            MatchStatus::Postponed => "PST",
            MatchStatus::Cancelled => "CANC",
        }
    }

    async fn get_envelope<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>, SourceError> {
        let envelope: Envelope<T> = self.http.get_json(url, query).await?;
        if error_shaped(&envelope.errors) {
            warn!(errors = %envelope.errors, "api-football returned an error body");
            return Err(SourceError::RateLimited { retry_after: None });
        }
        Ok(envelope.response)
    }
}

#[async_trait]
impl MatchDataSource for ApiFootballClient {
    fn name(&self) -> &'static str {
        SOURCE_NAME
    }

    async fn fetch_standings(
        &self,
        league: LeagueCode,
        season: &Season,
    ) -> Result<Vec<RawTeamRecord>, SourceError> {
        let id = Self::resolve(league)?;
        let url = format!("{}/standings", self.base_url);
        let query = [
            ("league", id.to_string()),
            ("season", season.start_year().to_string()),
        ];

        let response: Vec<StandingsResponse> = self.get_envelope(&url, &query).await?;
        let standings: Vec<RawTeamRecord> = response
            .into_iter()
            .flat_map(|r| r.league.standings)
            .flatten()
            .map(RawTeamRecord::ApiFootball)
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
        let id = Self::resolve(league)?;
        let url = format!("{}/fixtures", self.base_url);

        let mut query = vec![
            ("league", id.to_string()),
            ("season", season.start_year().to_string()),
        ];
        if let Some(status) = status {
            query.push(("status", Self::status_param(status).to_string()));
        }

        let fixtures: Vec<ApiFootballFixture> = self.get_envelope(&url, &query).await?;
        let matches: Vec<RawMatchRecord> = fixtures
            .into_iter()
            .map(RawMatchRecord::ApiFootball)
            .collect();

        info!(league = %league, fixtures = matches.len(), "retrieved fixtures");
        Ok(matches)
    }
}
