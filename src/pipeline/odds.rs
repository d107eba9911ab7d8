//! Odds ingestion path.
//!
//! Structurally distinct from standings/match ingestion: one source event
//! fans out into one odds row per bookmaker per fetch, and matches are
//! resolved by the team names the odds source reports rather than by the
//! pipeline's own identifiers.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::debug;

use crate::domain::{LeagueCode, NewOdds, RawBookmaker, RawOddsEvent};
use crate::error::StoreError;
use crate::store::Store;

/// Market keys in the odds source's response.
const H2H_MARKET: &str = "h2h";
const TOTALS_MARKET: &str = "totals";

/// The totals line the canonical model keeps.
const TOTALS_POINT: Decimal = Decimal::from_parts(25, 0, 0, false, 1);

/// Audit side-channel source name for raw odds payloads.
const AUDIT_SOURCE: &str = "the-odds-api";

/// Prices extracted from one bookmaker's payload.
#[derive(Debug, PartialEq)]
pub(crate) struct BookmakerPrices {
    pub home: Decimal,
    pub draw: Decimal,
    pub away: Decimal,
    pub over_2_5: Option<Decimal>,
    pub under_2_5: Option<Decimal>,
}

/// Outcome of reconciling one odds event.
#[derive(Debug, Default)]
pub struct OddsEventOutcome {
    pub stored: usize,
    pub errors: Vec<String>,
    /// True when the event did not resolve to a persisted match (a fixture
    /// the pipeline has not ingested yet) or was filtered out.
    pub skipped: bool,
}

/// Fans odds events out into persisted rows.
pub struct OddsIngest<'a> {
    store: &'a Store,
}

impl<'a> OddsIngest<'a> {
    #[must_use]
    pub fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// Reconcile one event: resolve the match, then store one odds row per
    /// bookmaker with a usable head-to-head market.
    ///
    /// An unresolvable event is a soft skip, not an error; the odds source
    /// routinely lists fixtures before the pipeline ingests them. Bookmaker
    /// payloads without a usable h2h market are recorded in `errors`.
    pub fn reconcile_event(
        &self,
        league: LeagueCode,
        event: &RawOddsEvent,
        only_match_id: Option<i32>,
        retrieved_at: DateTime<Utc>,
    ) -> Result<OddsEventOutcome, StoreError> {
        let mut outcome = OddsEventOutcome::default();

        let Some(db_match) = self.store.find_match_by_team_names(
            league.as_str(),
            &event.home_team,
            &event.away_team,
        )?
        else {
            debug!(
                home = %event.home_team,
                away = %event.away_team,
                "no persisted match for odds event, skipping"
            );
            outcome.skipped = true;
            return Ok(outcome);
        };

        if only_match_id.is_some_and(|id| id != db_match.id) {
            outcome.skipped = true;
            return Ok(outcome);
        }

        for bookmaker in &event.bookmakers {
            match extract_prices(event, bookmaker) {
                Ok(prices) => {
                    self.store.insert_odds(&NewOdds {
                        match_id: db_match.id,
                        bookmaker: bookmaker.key.clone(),
                        home_win_odds: prices.home,
                        draw_odds: prices.draw,
                        away_win_odds: prices.away,
                        over_2_5_odds: prices.over_2_5,
                        under_2_5_odds: prices.under_2_5,
                        retrieved_at,
                    })?;
                    outcome.stored += 1;
                }
                Err(reason) => {
                    outcome.errors.push(format!("{}: {reason}", bookmaker.key));
                }
            }
        }

        let payload = serde_json::to_string(event).ok();
        self.store
            .upsert_match_stats(db_match.id, AUDIT_SOURCE, payload)?;

        Ok(outcome)
    }
}

/// Extract the three h2h prices (and the 2.5-goal totals pair when
/// offered) from one bookmaker's markets.
///
/// Outcomes are matched against the event's own team names; the literal
/// "Draw" identifies the draw outcome case-insensitively. A payload
/// missing any of the three required prices is rejected whole rather than
/// stored with nulls.
pub(crate) fn extract_prices(
    event: &RawOddsEvent,
    bookmaker: &RawBookmaker,
) -> Result<BookmakerPrices, String> {
    let h2h = bookmaker
        .markets
        .iter()
        .find(|market| market.key == H2H_MARKET)
        .ok_or("no h2h market")?;

    let mut home = None;
    let mut draw = None;
    let mut away = None;
    for outcome in &h2h.outcomes {
        if outcome.name == event.home_team {
            home = Some(outcome.price);
        } else if outcome.name == event.away_team {
            away = Some(outcome.price);
        } else if outcome.name.eq_ignore_ascii_case("draw") {
            draw = Some(outcome.price);
        }
    }

    let (Some(home), Some(draw), Some(away)) = (home, draw, away) else {
        return Err("h2h market is missing an outcome".into());
    };
    if home <= Decimal::ZERO || draw <= Decimal::ZERO || away <= Decimal::ZERO {
        return Err("h2h market has a non-positive price".into());
    }

    let mut over_2_5 = None;
    let mut under_2_5 = None;
    if let Some(totals) = bookmaker
        .markets
        .iter()
        .find(|market| market.key == TOTALS_MARKET)
    {
        for outcome in &totals.outcomes {
            if outcome.point != Some(TOTALS_POINT) {
                continue;
            }
            if outcome.name == "Over" {
                over_2_5 = Some(outcome.price);
            } else if outcome.name == "Under" {
                under_2_5 = Some(outcome.price);
            }
        }
    }

    Ok(BookmakerPrices {
        home,
        draw,
        away,
        over_2_5,
        under_2_5,
    })
}
