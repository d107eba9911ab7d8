//! Reconciliation engine.
//!
//! Transforms raw per-source records into canonical entities and merges
//! them against persisted state without duplication. Matching is by
//! natural key only: exact case-sensitive team names within a league, and
//! source external ids (with a best-effort identity fallback) for matches.
//! Two sources spelling a team differently therefore produce two rows;
//! that is a documented limitation, not something heuristics try to fix.

use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use crate::domain::{
    League, LeagueCode, Match, MatchRecord, MatchStatus, NewLeague, NewMatch, NewTeam,
    RawMatchRecord, RawTeamRecord, Season, Team,
};
use crate::error::StoreError;
use crate::store::Store;

/// Outcome of reconciling one batch of standings records.
#[derive(Debug)]
pub struct TeamReconciliation {
    /// All teams referenced by the batch, created and reused alike.
    pub teams: Vec<Team>,
    pub created: usize,
    pub existing: usize,
}

/// Outcome of reconciling one batch of match records.
#[derive(Debug)]
pub struct MatchReconciliation {
    pub created: usize,
    pub updated: usize,
    /// Records dropped because their team names did not resolve.
    pub skipped: usize,
}

/// What happened to a single match record.
#[derive(Debug)]
pub enum MatchOutcome {
    Created(Match),
    Updated(Match),
    Unchanged(Match),
}

impl MatchOutcome {
    #[must_use]
    pub fn as_match(&self) -> &Match {
        match self {
            MatchOutcome::Created(m) | MatchOutcome::Updated(m) | MatchOutcome::Unchanged(m) => m,
        }
    }
}

/// Merges incoming records into the persisted canonical dataset.
pub struct Reconciler<'a> {
    store: &'a Store,
}

impl<'a> Reconciler<'a> {
    #[must_use]
    pub fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// Look up the league for (code, season), creating it on first sight.
    ///
    /// A uniqueness violation at insert means a concurrent run won the
    /// creation race; the row is re-read and treated as existing.
    pub fn ensure_league(
        &self,
        code: LeagueCode,
        season: &Season,
    ) -> Result<(League, bool), StoreError> {
        if let Some(existing) = self.store.find_league(code.as_str(), season.as_str())? {
            debug!(league = %code, season = %season, "league already exists");
            return Ok((existing, false));
        }

        let new = NewLeague {
            name: code.full_name().to_string(),
            country: code.country().to_string(),
            season: season.as_str().to_string(),
            league_type: code.league_type(),
            external_id: code.as_str().to_string(),
        };
        match self.store.insert_league(&new) {
            Ok(league) => Ok((league, true)),
            Err(e) if e.is_unique_violation() => self
                .store
                .find_league(code.as_str(), season.as_str())?
                .map(|league| (league, false))
                .ok_or(e),
            Err(e) => Err(e),
        }
    }

    /// Merge a batch of standings records into the league's teams.
    ///
    /// Names are deduplicated within the batch (the same club arrives from
    /// every configured source) and matched exactly against persisted rows.
    pub fn reconcile_teams(
        &self,
        league: &League,
        records: &[RawTeamRecord],
    ) -> Result<TeamReconciliation, StoreError> {
        let mut outcome = TeamReconciliation {
            teams: Vec::new(),
            created: 0,
            existing: 0,
        };
        let mut seen: HashSet<String> = HashSet::new();

        for record in records {
            let canonical = record.canonical();
            if canonical.name.is_empty() {
                warn!("standings record without a team name, skipping");
                continue;
            }
            if !seen.insert(canonical.name.clone()) {
                continue;
            }

            if let Some(existing) = self.store.find_team(league.id, &canonical.name)? {
                outcome.existing += 1;
                outcome.teams.push(existing);
                continue;
            }

            let new = NewTeam {
                name: canonical.name.clone(),
                country: league.country.clone(),
                league_id: league.id,
                founded_year: canonical.founded_year,
                external_id: canonical.external_id.clone(),
            };
            match self.store.insert_team(&new) {
                Ok(team) => {
                    outcome.created += 1;
                    outcome.teams.push(team);
                }
                Err(e) if e.is_unique_violation() => {
                    // Lost a creation race; the row exists now.
                    let team = self
                        .store
                        .find_team(league.id, &canonical.name)?
                        .ok_or(e)?;
                    outcome.existing += 1;
                    outcome.teams.push(team);
                }
                Err(e) => return Err(e),
            }
        }

        Ok(outcome)
    }

    /// Merge a batch of match records against persisted state.
    ///
    /// Each record's raw payload is also written to the audit side channel
    /// keyed by (match, source).
    pub fn reconcile_matches(
        &self,
        league: &League,
        teams: &[Team],
        records: &[RawMatchRecord],
    ) -> Result<MatchReconciliation, StoreError> {
        let by_name: HashMap<&str, &Team> = teams.iter().map(|t| (t.name.as_str(), t)).collect();
        let mut outcome = MatchReconciliation {
            created: 0,
            updated: 0,
            skipped: 0,
        };

        for record in records {
            let canonical = record.canonical();
            let (Some(home), Some(away)) = (
                by_name.get(canonical.home_team.as_str()),
                by_name.get(canonical.away_team.as_str()),
            ) else {
                warn!(
                    home = %canonical.home_team,
                    away = %canonical.away_team,
                    "could not resolve teams for match, skipping"
                );
                outcome.skipped += 1;
                continue;
            };

            let result = self.reconcile_match_record(league, home, away, &canonical)?;
            match &result {
                MatchOutcome::Created(_) => outcome.created += 1,
                MatchOutcome::Updated(_) => outcome.updated += 1,
                MatchOutcome::Unchanged(_) => {}
            }

            let payload = serde_json::to_string(record).ok();
            self.store
                .upsert_match_stats(result.as_match().id, record.source_name(), payload)?;
        }

        Ok(outcome)
    }

    /// Merge one canonical match record.
    ///
    /// Identity is the source external id when present, falling back to
    /// (league, home, away, kickoff). A row found under the fallback adopts
    /// the incoming external id so later runs match it directly.
    pub fn reconcile_match_record(
        &self,
        league: &League,
        home: &Team,
        away: &Team,
        record: &MatchRecord,
    ) -> Result<MatchOutcome, StoreError> {
        let mut found = match &record.external_id {
            Some(external_id) => self.store.find_match_by_external_id(external_id)?,
            None => None,
        };
        if found.is_none() {
            if let Some(candidate) =
                self.store
                    .find_match_by_identity(league.id, home.id, away.id, &record.kickoff)?
            {
                // Merge into the candidate only when ids cannot conflict:
                // two distinct external ids mean two distinct fixtures.
                if record.external_id.is_none() || candidate.external_id.is_none() {
                    found = Some(candidate);
                }
            }
        }

        if let Some(existing) = found {
            let (merged, changed) = merge_match(&existing, record);
            if !changed {
                return Ok(MatchOutcome::Unchanged(existing));
            }
            self.store.update_match(&merged)?;
            debug!(match_id = merged.id, "updated match");
            return Ok(MatchOutcome::Updated(merged));
        }

        let new = NewMatch {
            league_id: league.id,
            home_team_id: home.id,
            away_team_id: away.id,
            match_date: record.kickoff,
            status: record.status,
            // Goals are only meaningful once a match has finished.
            home_goals: record.home_goals.filter(|_| record.status == MatchStatus::Finished),
            away_goals: record.away_goals.filter(|_| record.status == MatchStatus::Finished),
            stats: record.stats.clone(),
            external_id: record.external_id.clone(),
        };
        match self.store.insert_match(&new) {
            Ok(created) => {
                debug!(match_id = created.id, "created match");
                Ok(MatchOutcome::Created(created))
            }
            Err(e) if e.is_unique_violation() => {
                // External-id race with a concurrent run.
                let existing = match &record.external_id {
                    Some(external_id) => self.store.find_match_by_external_id(external_id)?,
                    None => self
                        .store
                        .find_match_by_identity(league.id, home.id, away.id, &record.kickoff)?,
                };
                existing.map(MatchOutcome::Unchanged).ok_or(e)
            }
            Err(e) => Err(e),
        }
    }
}

/// Compute the merged state of a persisted match and an incoming record.
///
/// Policy:
/// - status never reverts once finished (stale sources keep reporting the
///   old schedule after full time);
/// - goals are written only while the merged status is finished, and an
///   incoming null never erases a persisted value;
/// - extended stats merge field-wise, incoming non-null values winning;
/// - the kickoff follows the incoming record until the match finishes.
pub fn merge_match(existing: &Match, incoming: &MatchRecord) -> (Match, bool) {
    let mut merged = existing.clone();

    if existing.status != MatchStatus::Finished {
        merged.status = incoming.status;
        merged.match_date = incoming.kickoff;
    }

    if merged.status == MatchStatus::Finished {
        merged.home_goals = incoming.home_goals.or(existing.home_goals);
        merged.away_goals = incoming.away_goals.or(existing.away_goals);
    }

    merged.stats = existing.stats.merged_with(&incoming.stats);
    merged.external_id = existing
        .external_id
        .clone()
        .or_else(|| incoming.external_id.clone());

    let changed = merged != *existing;
    (merged, changed)
}
