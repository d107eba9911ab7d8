//! fbref.com scrape adapter.
//!
//! No authentication; fbref tolerates polite scraping, so this adapter
//! defaults to the longest inter-request interval of the three sources.
//! Tables are located by id prefix and cells by their `data-stat`
//! attribute, which is stable across fbref page layouts.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
use reqwest::header::HeaderMap;
use scraper::{ElementRef, Html, Selector};
use tracing::info;

use crate::domain::{
    LeagueCode, MatchStatus, RawMatchRecord, RawTeamRecord, ScrapedMatch, ScrapedStanding, Season,
};
use crate::error::{ConfigError, SourceError};
use crate::source::http::SourceHttp;
use crate::source::traits::MatchDataSource;

pub const SOURCE_NAME: &str = "fbref";
pub const DEFAULT_REQUEST_DELAY: Duration = Duration::from_secs(2);

const BASE_URL: &str = "https://fbref.com/en";

/// Scraper for fbref.com league tables and schedules.
pub struct FbrefScraper {
    http: SourceHttp,
    base_url: String,
}

impl FbrefScraper {
    pub fn new(request_delay: Duration) -> Result<Self, ConfigError> {
        Ok(Self {
            http: SourceHttp::new(request_delay, HeaderMap::new())?,
            base_url: BASE_URL.to_string(),
        })
    }

    /// Point the scraper at a different host. Intended for tests.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// fbref competition number for the leagues this adapter covers.
    fn competition_id(league: LeagueCode) -> Option<u32> {
        match league {
            LeagueCode::Epl => Some(9),
            LeagueCode::LaLiga => Some(12),
            LeagueCode::SerieA => Some(11),
            LeagueCode::Bundesliga => Some(20),
            LeagueCode::Ligue1 => Some(13),
            _ => None,
        }
    }

    fn schedule_url(&self, league: LeagueCode, season: &Season) -> Result<String, SourceError> {
        let comp = Self::competition_id(league).ok_or(SourceError::UnknownLeague {
            source_name: SOURCE_NAME,
            code: league,
        })?;
        Ok(format!(
            "{}/comps/{comp}/{}/schedule/",
            self.base_url,
            season.full_span()
        ))
    }
}

#[async_trait]
impl MatchDataSource for FbrefScraper {
    fn name(&self) -> &'static str {
        SOURCE_NAME
    }

    async fn fetch_standings(
        &self,
        league: LeagueCode,
        season: &Season,
    ) -> Result<Vec<RawTeamRecord>, SourceError> {
        let url = self.schedule_url(league, season)?;
        let body = self.http.get_text(&url, &[]).await?;
        let standings = parse_standings(&body)?;
        info!(league = %league, teams = standings.len(), "scraped standings");
        Ok(standings.into_iter().map(RawTeamRecord::Scraped).collect())
    }

    async fn fetch_matches(
        &self,
        league: LeagueCode,
        season: &Season,
        status: Option<MatchStatus>,
    ) -> Result<Vec<RawMatchRecord>, SourceError> {
        let url = self.schedule_url(league, season)?;
        let body = self.http.get_text(&url, &[]).await?;
        let mut matches = parse_schedule(&body)?;
        // fbref has no status query; filter after the fact.
        if let Some(status) = status {
            matches.retain(|m| RawMatchRecord::Scraped(m.clone()).canonical().status == status);
        }
        info!(league = %league, matches = matches.len(), "scraped schedule");
        Ok(matches.into_iter().map(RawMatchRecord::Scraped).collect())
    }
}

fn selector(css: &str) -> Result<Selector, SourceError> {
    Selector::parse(css).map_err(|e| SourceError::Format(format!("bad selector '{css}': {e}")))
}

fn stat_text(row: ElementRef<'_>, cells: &Selector, stat: &str) -> Option<String> {
    row.select(cells)
        .find(|cell| cell.value().attr("data-stat") == Some(stat))
        .map(|cell| cell.text().collect::<String>().trim().to_string())
}

fn stat_int(row: ElementRef<'_>, cells: &Selector, stat: &str) -> i32 {
    stat_text(row, cells, stat)
        .and_then(|text| text.parse().ok())
        .unwrap_or(0)
}

/// Extract standings rows from a league-table page.
///
/// Rows without a team cell (spacers, header repeats) are skipped.
fn parse_standings(html: &str) -> Result<Vec<ScrapedStanding>, SourceError> {
    let table_selector = selector("table[id^=results] tbody tr")?;
    let cells = selector("td[data-stat], th[data-stat]")?;

    let document = Html::parse_document(html);
    let mut standings = Vec::new();
    for row in document.select(&table_selector) {
        let Some(name) = stat_text(row, &cells, "team").filter(|n| !n.is_empty()) else {
            continue;
        };
        standings.push(ScrapedStanding {
            name,
            matches_played: stat_int(row, &cells, "games"),
            wins: stat_int(row, &cells, "wins"),
            draws: stat_int(row, &cells, "ties"),
            losses: stat_int(row, &cells, "losses"),
            goals_for: stat_int(row, &cells, "goals_for"),
            goals_against: stat_int(row, &cells, "goals_against"),
            goal_difference: stat_int(row, &cells, "goal_diff"),
            points: stat_int(row, &cells, "points"),
        });
    }
    Ok(standings)
}

/// Extract fixture rows from a schedule page.
///
/// Rows missing a date or either team name are skipped; a present score
/// cell marks the fixture as played.
fn parse_schedule(html: &str) -> Result<Vec<ScrapedMatch>, SourceError> {
    let table_selector = selector("table[id^=sched] tbody tr")?;
    let cells = selector("td[data-stat], th[data-stat]")?;

    let document = Html::parse_document(html);
    let mut matches = Vec::new();
    for row in document.select(&table_selector) {
        let Some(date) = stat_text(row, &cells, "date")
            .and_then(|text| NaiveDate::parse_from_str(&text, "%Y-%m-%d").ok())
        else {
            continue;
        };
        let Some(home_team) = stat_text(row, &cells, "home_team").filter(|n| !n.is_empty())
        else {
            continue;
        };
        let Some(away_team) = stat_text(row, &cells, "away_team").filter(|n| !n.is_empty())
        else {
            continue;
        };

        let time = stat_text(row, &cells, "start_time")
            .and_then(|text| NaiveTime::parse_from_str(&text, "%H:%M").ok())
            .unwrap_or(NaiveTime::MIN);
        let kickoff = Utc.from_utc_datetime(&date.and_time(time));

        let (home_goals, away_goals) = stat_text(row, &cells, "score")
            .and_then(|text| parse_score(&text))
            .map_or((None, None), |(h, a)| (Some(h), Some(a)));

        matches.push(ScrapedMatch {
            kickoff,
            home_team,
            away_team,
            home_goals,
            away_goals,
        });
    }
    Ok(matches)
}

/// fbref renders scores as `2–1` (en dash); accept a plain hyphen too.
fn parse_score(text: &str) -> Option<(i32, i32)> {
    let (home, away) = text.split_once('–').or_else(|| text.split_once('-'))?;
    Some((home.trim().parse().ok()?, away.trim().parse().ok()?))
}
