//! League identifiers and season handling.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Domain league codes understood by the pipeline.
///
/// Each source adapter owns its own mapping from these codes to its native
/// identifiers and may support only a subset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum LeagueCode {
    Epl,
    LaLiga,
    SerieA,
    Bundesliga,
    Ligue1,
    Eredivisie,
    LigaNos,
    ChampionsLeague,
}

impl LeagueCode {
    pub const ALL: [LeagueCode; 8] = [
        LeagueCode::Epl,
        LeagueCode::LaLiga,
        LeagueCode::SerieA,
        LeagueCode::Bundesliga,
        LeagueCode::Ligue1,
        LeagueCode::Eredivisie,
        LeagueCode::LigaNos,
        LeagueCode::ChampionsLeague,
    ];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            LeagueCode::Epl => "EPL",
            LeagueCode::LaLiga => "LA_LIGA",
            LeagueCode::SerieA => "SERIE_A",
            LeagueCode::Bundesliga => "BUNDESLIGA",
            LeagueCode::Ligue1 => "LIGUE_1",
            LeagueCode::Eredivisie => "EREDIVISIE",
            LeagueCode::LigaNos => "LIGA_NOS",
            LeagueCode::ChampionsLeague => "CHAMPIONS_LEAGUE",
        }
    }

    /// Human-readable league name used when creating the canonical row.
    #[must_use]
    pub fn full_name(&self) -> &'static str {
        match self {
            LeagueCode::Epl => "Premier League",
            LeagueCode::LaLiga => "La Liga",
            LeagueCode::SerieA => "Serie A",
            LeagueCode::Bundesliga => "Bundesliga",
            LeagueCode::Ligue1 => "Ligue 1",
            LeagueCode::Eredivisie => "Eredivisie",
            LeagueCode::LigaNos => "Primeira Liga",
            LeagueCode::ChampionsLeague => "Champions League",
        }
    }

    #[must_use]
    pub fn country(&self) -> &'static str {
        match self {
            LeagueCode::Epl => "England",
            LeagueCode::LaLiga => "Spain",
            LeagueCode::SerieA => "Italy",
            LeagueCode::Bundesliga => "Germany",
            LeagueCode::Ligue1 => "France",
            LeagueCode::Eredivisie => "Netherlands",
            LeagueCode::LigaNos => "Portugal",
            LeagueCode::ChampionsLeague => "Europe",
        }
    }

    #[must_use]
    pub fn league_type(&self) -> LeagueType {
        match self {
            LeagueCode::ChampionsLeague => LeagueType::International,
            _ => LeagueType::Domestic,
        }
    }
}

impl fmt::Display for LeagueCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone)]
#[error("unknown league code '{0}'")]
pub struct UnknownLeagueCode(String);

impl FromStr for LeagueCode {
    type Err = UnknownLeagueCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LeagueCode::ALL
            .iter()
            .copied()
            .find(|code| code.as_str() == s)
            .ok_or_else(|| UnknownLeagueCode(s.to_string()))
    }
}

impl TryFrom<String> for LeagueCode {
    type Error = UnknownLeagueCode;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<LeagueCode> for String {
    fn from(code: LeagueCode) -> Self {
        code.as_str().to_string()
    }
}

/// Type of football league.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeagueType {
    Domestic,
    International,
    Cup,
}

impl LeagueType {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            LeagueType::Domestic => "domestic",
            LeagueType::International => "international",
            LeagueType::Cup => "cup",
        }
    }
}

impl fmt::Display for LeagueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LeagueType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "domestic" => Ok(LeagueType::Domestic),
            "international" => Ok(LeagueType::International),
            "cup" => Ok(LeagueType::Cup),
            other => Err(format!("unknown league type '{other}'")),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid season '{0}': expected YYYY-YY (e.g. 2023-24)")]
pub struct SeasonParseError(String);

/// A season in `YYYY-YY` form, e.g. `2023-24`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Season(String);

impl Season {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Calendar year the season starts in.
    #[must_use]
    pub fn start_year(&self) -> i32 {
        // Format validated at construction.
        self.0[..4].parse().unwrap_or(0)
    }

    /// Full `YYYY-YYYY` span, the form fbref uses in schedule URLs.
    #[must_use]
    pub fn full_span(&self) -> String {
        let start = self.start_year();
        format!("{start}-{}", start + 1)
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Season {
    type Err = SeasonParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        let well_formed = bytes.len() == 7
            && bytes[4] == b'-'
            && s[..4].chars().all(|c| c.is_ascii_digit())
            && s[5..].chars().all(|c| c.is_ascii_digit());
        if !well_formed {
            return Err(SeasonParseError(s.to_string()));
        }
        Ok(Season(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn league_code_round_trips_through_str() {
        for code in LeagueCode::ALL {
            assert_eq!(code.as_str().parse::<LeagueCode>().unwrap(), code);
        }
    }

    #[test]
    fn league_code_rejects_unknown() {
        assert!("MLS".parse::<LeagueCode>().is_err());
    }

    #[test]
    fn champions_league_is_international() {
        assert_eq!(
            LeagueCode::ChampionsLeague.league_type(),
            LeagueType::International
        );
        assert_eq!(LeagueCode::Epl.league_type(), LeagueType::Domestic);
    }

    #[test]
    fn season_parses_and_exposes_years() {
        let season: Season = "2023-24".parse().unwrap();
        assert_eq!(season.start_year(), 2023);
        assert_eq!(season.full_span(), "2023-2024");
        assert_eq!(season.as_str(), "2023-24");
    }

    #[test]
    fn season_rejects_malformed_input() {
        for bad in ["2023", "23-24", "2023/24", "2023-2024", "abcd-ef"] {
            assert!(bad.parse::<Season>().is_err(), "{bad} should be rejected");
        }
    }
}
