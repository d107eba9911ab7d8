use async_trait::async_trait;

use scoreline::domain::{
    LeagueCode, MatchStatus, RawMatchRecord, RawOddsEvent, RawTeamRecord, Season,
};
use scoreline::error::SourceError;
use scoreline::source::{MatchDataSource, OddsSource};

/// A match-data source that returns fixed records.
pub struct ScriptedSource {
    name: &'static str,
    standings: Vec<RawTeamRecord>,
    matches: Vec<RawMatchRecord>,
}

impl ScriptedSource {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            standings: Vec::new(),
            matches: Vec::new(),
        }
    }

    pub fn with_standings(mut self, standings: Vec<RawTeamRecord>) -> Self {
        self.standings = standings;
        self
    }

    pub fn with_matches(mut self, matches: Vec<RawMatchRecord>) -> Self {
        self.matches = matches;
        self
    }
}

#[async_trait]
impl MatchDataSource for ScriptedSource {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn fetch_standings(
        &self,
        _league: LeagueCode,
        _season: &Season,
    ) -> Result<Vec<RawTeamRecord>, SourceError> {
        Ok(self.standings.clone())
    }

    async fn fetch_matches(
        &self,
        _league: LeagueCode,
        _season: &Season,
        _status: Option<MatchStatus>,
    ) -> Result<Vec<RawMatchRecord>, SourceError> {
        Ok(self.matches.clone())
    }
}

/// A match-data source that fails every call with a fixed error.
pub struct FailingSource {
    name: &'static str,
    error: SourceError,
}

impl FailingSource {
    pub fn new(name: &'static str, error: SourceError) -> Self {
        Self { name, error }
    }

    pub fn timeout(name: &'static str) -> Self {
        Self::new(
            name,
            SourceError::Timeout {
                url: "https://example.test".to_string(),
            },
        )
    }

    pub fn bad_request(name: &'static str) -> Self {
        Self::new(
            name,
            SourceError::BadRequest {
                status: 400,
                message: "bad filter".to_string(),
            },
        )
    }
}

#[async_trait]
impl MatchDataSource for FailingSource {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn fetch_standings(
        &self,
        _league: LeagueCode,
        _season: &Season,
    ) -> Result<Vec<RawTeamRecord>, SourceError> {
        Err(self.error.clone())
    }

    async fn fetch_matches(
        &self,
        _league: LeagueCode,
        _season: &Season,
        _status: Option<MatchStatus>,
    ) -> Result<Vec<RawMatchRecord>, SourceError> {
        Err(self.error.clone())
    }
}

/// An odds source that returns fixed events.
pub struct ScriptedOddsSource {
    events: Vec<RawOddsEvent>,
}

impl ScriptedOddsSource {
    pub fn new(events: Vec<RawOddsEvent>) -> Self {
        Self { events }
    }
}

#[async_trait]
impl OddsSource for ScriptedOddsSource {
    fn name(&self) -> &'static str {
        "scripted-odds"
    }

    async fn fetch_odds(&self, _league: LeagueCode) -> Result<Vec<RawOddsEvent>, SourceError> {
        Ok(self.events.clone())
    }
}

/// An odds source that fails every call.
pub struct FailingOddsSource;

#[async_trait]
impl OddsSource for FailingOddsSource {
    fn name(&self) -> &'static str {
        "failing-odds"
    }

    async fn fetch_odds(&self, _league: LeagueCode) -> Result<Vec<RawOddsEvent>, SourceError> {
        Err(SourceError::RateLimited {
            retry_after: Some(60),
        })
    }
}
