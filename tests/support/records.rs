use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use scoreline::domain::{
    FootballDataMatch, FootballDataScore, FootballDataScorePair, FootballDataStanding,
    FootballDataTeam, MatchRecord, MatchStatLine, MatchStatus, RawBookmaker, RawMarket,
    RawMatchRecord, RawOddsEvent, RawOutcome, RawTeamRecord,
};

pub fn kickoff(date: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(date)
        .expect("valid test date")
        .with_timezone(&Utc)
}

/// A football-data.org standings entry for a team.
pub fn standing(team_id: i64, name: &str) -> RawTeamRecord {
    RawTeamRecord::FootballData(FootballDataStanding {
        position: 1,
        team: FootballDataTeam {
            id: team_id,
            name: name.to_string(),
            founded: None,
        },
        played_games: 0,
        won: 0,
        draw: 0,
        lost: 0,
        points: 0,
        goals_for: 0,
        goals_against: 0,
        goal_difference: 0,
    })
}

/// A football-data.org match payload.
pub fn fixture(
    match_id: i64,
    home: (i64, &str),
    away: (i64, &str),
    date: &str,
    status: &str,
    score: Option<(i32, i32)>,
) -> RawMatchRecord {
    RawMatchRecord::FootballData(FootballDataMatch {
        id: match_id,
        utc_date: kickoff(date),
        status: status.to_string(),
        home_team: FootballDataTeam {
            id: home.0,
            name: home.1.to_string(),
            founded: None,
        },
        away_team: FootballDataTeam {
            id: away.0,
            name: away.1.to_string(),
            founded: None,
        },
        score: FootballDataScore {
            full_time: FootballDataScorePair {
                home: score.map(|(h, _)| h),
                away: score.map(|(_, a)| a),
            },
        },
    })
}

/// A canonical match record for driving the reconciler directly.
pub fn match_record(
    external_id: Option<&str>,
    home: &str,
    away: &str,
    date: &str,
    status: MatchStatus,
) -> MatchRecord {
    MatchRecord {
        external_id: external_id.map(str::to_string),
        home_team: home.to_string(),
        away_team: away.to_string(),
        kickoff: kickoff(date),
        status,
        home_goals: None,
        away_goals: None,
        stats: MatchStatLine::default(),
    }
}

/// An odds event for one match across the given bookmakers.
pub fn odds_event(home: &str, away: &str, bookmakers: Vec<RawBookmaker>) -> RawOddsEvent {
    RawOddsEvent {
        id: Some(format!("{home}-{away}")),
        sport_key: Some("soccer_epl".to_string()),
        commence_time: Some(kickoff("2024-03-02T15:00:00Z")),
        home_team: home.to_string(),
        away_team: away.to_string(),
        bookmakers,
    }
}

/// A bookmaker payload with a complete h2h market.
pub fn bookmaker(key: &str, home: &str, away: &str, prices: (Decimal, Decimal, Decimal)) -> RawBookmaker {
    RawBookmaker {
        key: key.to_string(),
        title: None,
        last_update: None,
        markets: vec![RawMarket {
            key: "h2h".to_string(),
            outcomes: vec![
                RawOutcome {
                    name: home.to_string(),
                    price: prices.0,
                    point: None,
                },
                RawOutcome {
                    name: "Draw".to_string(),
                    price: prices.1,
                    point: None,
                },
                RawOutcome {
                    name: away.to_string(),
                    price: prices.2,
                    point: None,
                },
            ],
        }],
    }
}

/// A bookmaker payload with no h2h market at all.
pub fn bookmaker_without_h2h(key: &str) -> RawBookmaker {
    RawBookmaker {
        key: key.to_string(),
        title: None,
        last_update: None,
        markets: vec![RawMarket {
            key: "spreads".to_string(),
            outcomes: Vec::new(),
        }],
    }
}
