//! Source adapter layer.
//!
//! One adapter per external system, each owning its own league mapping,
//! rate limiting, and error translation. Adapters return records in their
//! native shape; normalization happens in the reconciler, so adding a new
//! source means writing an adapter that speaks its own field names.

mod api_football;
mod fbref;
mod football_data;
mod http;
mod limiter;
mod odds_api;
mod traits;

pub use api_football::ApiFootballClient;
pub use fbref::FbrefScraper;
pub use football_data::FootballDataClient;
pub use limiter::RequestPacer;
pub use odds_api::OddsApiClient;
pub use traits::{MatchDataSource, OddsSource};

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use crate::error::ConfigError;

/// Default header set for the two RapidAPI-hosted sources.
fn rapidapi_headers(api_key: &str, host: &'static str) -> Result<HeaderMap, ConfigError> {
    let mut headers = HeaderMap::new();
    headers.insert(
        HeaderName::from_static("x-rapidapi-key"),
        HeaderValue::from_str(api_key).map_err(|_| ConfigError::InvalidValue {
            field: "api_key",
            reason: "contains non-printable characters".into(),
        })?,
    );
    headers.insert(
        HeaderName::from_static("x-rapidapi-host"),
        HeaderValue::from_static(host),
    );
    Ok(headers)
}
