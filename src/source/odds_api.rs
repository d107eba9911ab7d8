//! the-odds-api (RapidAPI) adapter.
//!
//! The only odds-capable source. Responses are league-wide lists of events;
//! a successful body may instead be an object carrying `errors` when the
//! monthly quota runs out, so the shape is checked before deserializing.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{info, warn};

use crate::domain::{LeagueCode, RawOddsEvent};
use crate::error::{ConfigError, SourceError};
use crate::source::http::SourceHttp;
use crate::source::traits::OddsSource;

pub const SOURCE_NAME: &str = "the-odds-api";
pub const DEFAULT_REQUEST_DELAY: Duration = Duration::from_millis(500);

const BASE_URL: &str = "https://api-odds.p.rapidapi.com";
const RAPIDAPI_HOST: &str = "api-odds.p.rapidapi.com";
const KEY_ENV: &str = "ODDS_API_KEY";

/// Markets requested on every fetch: match winner plus over/under totals.
const MARKETS: &str = "h2h,totals";

/// REST client for the-odds-api.com (via RapidAPI).
#[derive(Debug)]
pub struct OddsApiClient {
    http: SourceHttp,
    base_url: String,
    bookmakers: Option<String>,
}

impl OddsApiClient {
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
            bookmakers: None,
        })
    }

    /// Point the client at a different host. Intended for tests.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Restrict fetches to the given bookmakers instead of all of them.
    #[must_use]
    pub fn with_bookmakers(mut self, bookmakers: &[&str]) -> Self {
        self.bookmakers = Some(bookmakers.join(","));
        self
    }

    /// the-odds-api sport key for the leagues this adapter covers.
    fn sport_key(league: LeagueCode) -> Option<&'static str> {
        match league {
            LeagueCode::Epl => Some("soccer_epl"),
            LeagueCode::LaLiga => Some("soccer_spain_la_liga"),
            LeagueCode::SerieA => Some("soccer_italy_serie_a"),
            LeagueCode::Bundesliga => Some("soccer_germany_bundesliga"),
            LeagueCode::Ligue1 => Some("soccer_france_ligue_one"),
            LeagueCode::Eredivisie => Some("soccer_netherlands_eredivisie"),
            LeagueCode::LigaNos => Some("soccer_portugal_liga_nos"),
            LeagueCode::ChampionsLeague => Some("soccer_uefa_champs_league"),
        }
    }
}

#[async_trait]
impl OddsSource for OddsApiClient {
    fn name(&self) -> &'static str {
        SOURCE_NAME
    }

    async fn fetch_odds(&self, league: LeagueCode) -> Result<Vec<RawOddsEvent>, SourceError> {
        let sport = Self::sport_key(league).ok_or(SourceError::UnknownLeague {
            source_name: SOURCE_NAME,
            code: league,
        })?;

        let url = format!("{}/odds", self.base_url);
        let mut query = vec![
            ("sport", sport.to_string()),
            ("markets", MARKETS.to_string()),
        ];
        if let Some(bookmakers) = &self.bookmakers {
            query.push(("bookmakers", bookmakers.clone()));
        }

        let body: Value = self.http.get_json(&url, &query).await?;
        let events = parse_events(body)?;
        info!(league = %league, events = events.len(), "retrieved odds");
        Ok(events)
    }
}

/// The API returns either a bare event array or an object wrapping one in
/// `data`; an object with a populated `errors` member is an error-shaped
/// success.
fn parse_events(body: Value) -> Result<Vec<RawOddsEvent>, SourceError> {
    let items = match body {
        Value::Array(items) => items,
        Value::Object(mut map) => {
            let populated = match map.get("errors") {
                None | Some(Value::Null) => false,
                Some(Value::Object(errors)) => !errors.is_empty(),
                Some(Value::Array(errors)) => !errors.is_empty(),
                Some(_) => true,
            };
            if populated {
                warn!(errors = %map["errors"], "odds api returned an error body");
                return Err(SourceError::RateLimited { retry_after: None });
            }
            match map.remove("data") {
                Some(Value::Array(items)) => items,
                _ => Vec::new(),
            }
        }
        other => {
            return Err(SourceError::Format(format!(
                "expected array of events, got {other}"
            )))
        }
    };

    items
        .into_iter()
        .map(|item| {
            serde_json::from_value(item).map_err(|e| SourceError::Format(e.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_event() -> Value {
        json!({
            "id": "e1",
            "sport_key": "soccer_epl",
            "commence_time": "2024-03-02T15:00:00Z",
            "home_team": "Liverpool",
            "away_team": "Everton",
            "bookmakers": []
        })
    }

    #[test]
    fn empty_api_key_is_a_config_error() {
        let err = OddsApiClient::new("", DEFAULT_REQUEST_DELAY).unwrap_err();
        assert!(matches!(err, ConfigError::MissingApiKey { .. }));
    }

    #[test]
    fn every_league_code_has_a_sport_key() {
        for code in LeagueCode::ALL {
            assert!(OddsApiClient::sport_key(code).is_some(), "{code}");
        }
    }

    #[test]
    fn parse_accepts_bare_array() {
        let events = parse_events(json!([sample_event()])).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].home_team, "Liverpool");
    }

    #[test]
    fn parse_accepts_data_wrapper() {
        let events = parse_events(json!({"data": [sample_event()]})).unwrap();
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn empty_errors_member_is_not_an_error() {
        let events = parse_events(json!({"errors": {}, "data": [sample_event()]})).unwrap();
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn error_shaped_body_is_rate_limited() {
        let err = parse_events(json!({
            "errors": {"requests": "Monthly quota exceeded"}
        }))
        .unwrap_err();
        assert!(matches!(err, SourceError::RateLimited { .. }));
    }

    #[test]
    fn scalar_body_is_a_format_error() {
        assert!(matches!(
            parse_events(json!("nope")).unwrap_err(),
            SourceError::Format(_)
        ));
    }
}
