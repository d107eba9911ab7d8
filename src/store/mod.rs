//! SQLite persistence for canonical entities.
//!
//! A thin repository over Diesel keyed by the natural-key lookups the
//! reconciler needs. The store is handed to the pipeline by the caller and
//! is single-owner for the duration of one run; each insert or update
//! commits individually so a mid-run crash leaves a consistent (if
//! incomplete) dataset.

pub mod connection;
pub mod model;
pub mod schema;

use std::collections::HashMap;

use chrono::Utc;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, PooledConnection};
use tracing::debug;

use crate::domain::{
    BestOdds, League, Match, MatchStats, NewLeague, NewMatch, NewOdds, NewTeam, Odds, OutcomeOdds,
    Team,
};
use crate::error::StoreError;
use crate::store::connection::{create_pool, run_migrations, DbPool};
use crate::store::model::{
    LeagueRow, MatchRow, MatchStatsRow, MatchUpdateRow, NewLeagueRow, NewMatchRow,
    NewMatchStatsRow, NewOddsRow, NewTeamRow, OddsRow, TeamRow,
};
use crate::store::schema::{leagues, match_stats, matches, odds, teams};

type Conn = PooledConnection<ConnectionManager<SqliteConnection>>;

/// Repository over the canonical SQLite dataset.
pub struct Store {
    pool: DbPool,
}

impl Store {
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Open (creating if necessary) and migrate the database at `url`.
    pub fn open(database_url: &str) -> Result<Self, StoreError> {
        let pool = create_pool(database_url)?;
        run_migrations(&pool)?;
        Ok(Self::new(pool))
    }

    fn conn(&self) -> Result<Conn, StoreError> {
        self.pool
            .get()
            .map_err(|e| StoreError::Connection(e.to_string()))
    }

    // Leagues

    pub fn find_league(&self, external_id: &str, season: &str) -> Result<Option<League>, StoreError> {
        let mut conn = self.conn()?;
        let row: Option<LeagueRow> = leagues::table
            .filter(leagues::external_id.eq(external_id))
            .filter(leagues::season.eq(season))
            .first(&mut conn)
            .optional()?;
        row.map(LeagueRow::into_domain).transpose()
    }

    pub fn insert_league(&self, new: &NewLeague) -> Result<League, StoreError> {
        let mut conn = self.conn()?;
        diesel::insert_into(leagues::table)
            .values(NewLeagueRow::from_domain(new, Utc::now()))
            .execute(&mut conn)?;
        drop(conn);

        debug!(code = %new.external_id, season = %new.season, "created league");
        self.find_league(&new.external_id, &new.season)?
            .ok_or_else(|| StoreError::Corrupt("league missing after insert".into()))
    }

    // Teams

    pub fn find_team(&self, league_id: i32, name: &str) -> Result<Option<Team>, StoreError> {
        let mut conn = self.conn()?;
        let row: Option<TeamRow> = teams::table
            .filter(teams::league_id.eq(league_id))
            .filter(teams::name.eq(name))
            .first(&mut conn)
            .optional()?;
        row.map(TeamRow::into_domain).transpose()
    }

    pub fn insert_team(&self, new: &NewTeam) -> Result<Team, StoreError> {
        let mut conn = self.conn()?;
        diesel::insert_into(teams::table)
            .values(NewTeamRow::from_domain(new, Utc::now()))
            .execute(&mut conn)?;
        drop(conn);

        debug!(team = %new.name, league_id = new.league_id, "created team");
        self.find_team(new.league_id, &new.name)?
            .ok_or_else(|| StoreError::Corrupt("team missing after insert".into()))
    }

    pub fn teams_in_league(&self, league_id: i32) -> Result<Vec<Team>, StoreError> {
        let mut conn = self.conn()?;
        let rows: Vec<TeamRow> = teams::table
            .filter(teams::league_id.eq(league_id))
            .order(teams::name.asc())
            .load(&mut conn)?;
        rows.into_iter().map(TeamRow::into_domain).collect()
    }

    // Matches

    pub fn find_match_by_id(&self, id: i32) -> Result<Option<Match>, StoreError> {
        let mut conn = self.conn()?;
        let row: Option<MatchRow> = matches::table.find(id).first(&mut conn).optional()?;
        row.map(MatchRow::into_domain).transpose()
    }

    pub fn find_match_by_external_id(
        &self,
        external_id: &str,
    ) -> Result<Option<Match>, StoreError> {
        let mut conn = self.conn()?;
        let row: Option<MatchRow> = matches::table
            .filter(matches::external_id.eq(external_id))
            .first(&mut conn)
            .optional()?;
        row.map(MatchRow::into_domain).transpose()
    }

    /// Fallback identity for sources that carry no external id.
    ///
    /// Ambiguous for doubleheaders and re-scheduled fixtures; accepted as a
    /// known limitation rather than papered over with heuristics.
    pub fn find_match_by_identity(
        &self,
        league_id: i32,
        home_team_id: i32,
        away_team_id: i32,
        match_date: &chrono::DateTime<Utc>,
    ) -> Result<Option<Match>, StoreError> {
        let mut conn = self.conn()?;
        let row: Option<MatchRow> = matches::table
            .filter(matches::league_id.eq(league_id))
            .filter(matches::home_team_id.eq(home_team_id))
            .filter(matches::away_team_id.eq(away_team_id))
            .filter(matches::match_date.eq(match_date.to_rfc3339()))
            .first(&mut conn)
            .optional()?;
        row.map(MatchRow::into_domain).transpose()
    }

    /// Resolve a match from the team names an odds source reports, scoped
    /// to the leagues created under `league_code`. Ties break to the most
    /// recent kickoff.
    pub fn find_match_by_team_names(
        &self,
        league_code: &str,
        home_team: &str,
        away_team: &str,
    ) -> Result<Option<Match>, StoreError> {
        let mut conn = self.conn()?;

        let league_ids: Vec<i32> = leagues::table
            .filter(leagues::external_id.eq(league_code))
            .select(leagues::id)
            .load(&mut conn)?;
        if league_ids.is_empty() {
            return Ok(None);
        }

        let home_ids: Vec<i32> = teams::table
            .filter(teams::league_id.eq_any(&league_ids))
            .filter(teams::name.eq(home_team))
            .select(teams::id)
            .load(&mut conn)?;
        let away_ids: Vec<i32> = teams::table
            .filter(teams::league_id.eq_any(&league_ids))
            .filter(teams::name.eq(away_team))
            .select(teams::id)
            .load(&mut conn)?;
        if home_ids.is_empty() || away_ids.is_empty() {
            return Ok(None);
        }

        // RFC 3339 UTC strings sort chronologically.
        let row: Option<MatchRow> = matches::table
            .filter(matches::home_team_id.eq_any(&home_ids))
            .filter(matches::away_team_id.eq_any(&away_ids))
            .order(matches::match_date.desc())
            .first(&mut conn)
            .optional()?;
        row.map(MatchRow::into_domain).transpose()
    }

    pub fn insert_match(&self, new: &NewMatch) -> Result<Match, StoreError> {
        let mut conn = self.conn()?;
        diesel::insert_into(matches::table)
            .values(NewMatchRow::from_domain(new, Utc::now()))
            .execute(&mut conn)?;
        drop(conn);

        let inserted = match &new.external_id {
            Some(external_id) => self.find_match_by_external_id(external_id)?,
            None => self.find_match_by_identity(
                new.league_id,
                new.home_team_id,
                new.away_team_id,
                &new.match_date,
            )?,
        };
        inserted.ok_or_else(|| StoreError::Corrupt("match missing after insert".into()))
    }

    /// Write the merged state of `m` back to its row.
    pub fn update_match(&self, m: &Match) -> Result<(), StoreError> {
        let mut conn = self.conn()?;
        diesel::update(matches::table.find(m.id))
            .set(MatchUpdateRow::from_domain(m, Utc::now()))
            .execute(&mut conn)?;
        Ok(())
    }

    // Odds (append-only)

    pub fn insert_odds(&self, new: &NewOdds) -> Result<(), StoreError> {
        let mut conn = self.conn()?;
        diesel::insert_into(odds::table)
            .values(NewOddsRow::from_domain(new, Utc::now()))
            .execute(&mut conn)?;
        Ok(())
    }

    pub fn odds_for_match(&self, match_id: i32) -> Result<Vec<Odds>, StoreError> {
        let mut conn = self.conn()?;
        let rows: Vec<OddsRow> = odds::table
            .filter(odds::match_id.eq(match_id))
            .order(odds::retrieved_at.desc())
            .load(&mut conn)?;
        rows.into_iter().map(OddsRow::into_domain).collect()
    }

    /// Most recent odds row per bookmaker for a match.
    pub fn latest_odds_for_match(&self, match_id: i32) -> Result<Vec<Odds>, StoreError> {
        let all = self.odds_for_match(match_id)?;
        let mut latest: HashMap<String, Odds> = HashMap::new();
        for row in all {
            latest
                .entry(row.bookmaker.clone())
                .and_modify(|kept| {
                    if row.retrieved_at > kept.retrieved_at {
                        *kept = row.clone();
                    }
                })
                .or_insert(row);
        }
        let mut rows: Vec<Odds> = latest.into_values().collect();
        rows.sort_by(|a, b| a.bookmaker.cmp(&b.bookmaker));
        Ok(rows)
    }

    /// Best price per outcome across every bookmaker and fetch.
    pub fn best_odds_for_match(&self, match_id: i32) -> Result<Option<BestOdds>, StoreError> {
        let rows = self.odds_for_match(match_id)?;
        let mut rows = rows.into_iter();
        let first = match rows.next() {
            Some(first) => first,
            None => return Ok(None),
        };

        let mut best = BestOdds {
            home_win: OutcomeOdds {
                price: first.home_win_odds,
                bookmaker: first.bookmaker.clone(),
            },
            draw: OutcomeOdds {
                price: first.draw_odds,
                bookmaker: first.bookmaker.clone(),
            },
            away_win: OutcomeOdds {
                price: first.away_win_odds,
                bookmaker: first.bookmaker,
            },
        };
        for row in rows {
            if row.home_win_odds > best.home_win.price {
                best.home_win = OutcomeOdds {
                    price: row.home_win_odds,
                    bookmaker: row.bookmaker.clone(),
                };
            }
            if row.draw_odds > best.draw.price {
                best.draw = OutcomeOdds {
                    price: row.draw_odds,
                    bookmaker: row.bookmaker.clone(),
                };
            }
            if row.away_win_odds > best.away_win.price {
                best.away_win = OutcomeOdds {
                    price: row.away_win_odds,
                    bookmaker: row.bookmaker.clone(),
                };
            }
        }
        Ok(Some(best))
    }

    // Raw per-source payloads (audit side channel)

    /// Insert or replace the audit payload for (match, source).
    pub fn upsert_match_stats(
        &self,
        match_id: i32,
        source: &str,
        payload: Option<String>,
    ) -> Result<(), StoreError> {
        let mut conn = self.conn()?;
        let inserted = diesel::insert_into(match_stats::table)
            .values(NewMatchStatsRow {
                match_id,
                source: source.to_string(),
                payload: payload.clone(),
                created_at: Utc::now().to_rfc3339(),
            })
            .execute(&mut conn);

        match inserted {
            Ok(_) => Ok(()),
            Err(diesel::result::Error::DatabaseError(
                diesel::result::DatabaseErrorKind::UniqueViolation,
                _,
            )) => {
                diesel::update(
                    match_stats::table
                        .filter(match_stats::match_id.eq(match_id))
                        .filter(match_stats::source.eq(source)),
                )
                .set(match_stats::payload.eq(payload))
                .execute(&mut conn)?;
                Ok(())
            }
            Err(e) => Err(StoreError::Query(e)),
        }
    }

    pub fn match_stats_for_match(&self, match_id: i32) -> Result<Vec<MatchStats>, StoreError> {
        let mut conn = self.conn()?;
        let rows: Vec<MatchStatsRow> = match_stats::table
            .filter(match_stats::match_id.eq(match_id))
            .order(match_stats::source.asc())
            .load(&mut conn)?;
        rows.into_iter().map(MatchStatsRow::into_domain).collect()
    }
}
