use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::RatingError;

const TEAM_KEY_PREFIX: &str = "frc";

static TEAM_INPUT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:frc)?(\d{1,5})$").expect("team input pattern is valid"));

/// Opaque team identifier, stable across a season (`frc3218` on TBA)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamKey(String);

impl TeamKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn from_number(number: u32) -> Self {
        Self(format!("{}{}", TEAM_KEY_PREFIX, number))
    }

    /// Accepts either a bare team number (`3218`) or a full key (`frc3218`)
    pub fn parse(input: &str) -> Option<Self> {
        let number = TEAM_INPUT.captures(input.trim())?.get(1)?.as_str().parse().ok()?;
        Some(Self::from_number(number))
    }

    pub fn number(&self) -> Option<u32> {
        self.0.strip_prefix(TEAM_KEY_PREFIX)?.parse().ok()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TeamKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Competition level of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompLevel {
    #[serde(rename = "qm")]
    Qualification,
    #[serde(rename = "ef")]
    EighthFinal,
    #[serde(rename = "qf")]
    QuarterFinal,
    #[serde(rename = "sf")]
    SemiFinal,
    #[serde(rename = "f")]
    Final,
    #[serde(other)]
    Other,
}

/// One side of a match: three teams and the score they produced together
#[derive(Debug, Clone, PartialEq)]
pub struct Alliance {
    pub teams: [TeamKey; 3],
    pub score: u32,
}

impl Alliance {
    pub fn new(teams: [TeamKey; 3], score: u32) -> Self {
        Self { teams, score }
    }
}

/// A played match with its two alliances
#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    pub number: u32,
    pub level: CompLevel,
    pub side_a: Alliance,
    pub side_b: Alliance,
}

impl Match {
    pub fn qualification(number: u32, side_a: Alliance, side_b: Alliance) -> Self {
        Self {
            number,
            level: CompLevel::Qualification,
            side_a,
            side_b,
        }
    }

    pub fn is_qualification(&self) -> bool {
        self.level == CompLevel::Qualification
    }

    /// Side A's teams followed by side B's, in the order given
    pub fn teams(&self) -> impl Iterator<Item = &TeamKey> {
        self.side_a.teams.iter().chain(self.side_b.teams.iter())
    }
}

// --- API Response Structures ---

/// Event summary from `/events/{year}/simple` and `/event/{key}/simple`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EventResponse {
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub event_code: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state_prov: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    pub year: i32,
}

impl EventResponse {
    pub fn location(&self) -> String {
        [&self.city, &self.state_prov, &self.country]
            .iter()
            .filter_map(|part| part.as_deref())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AllianceResponse {
    pub score: i32,
    pub team_keys: Vec<TeamKey>,
    #[serde(default)]
    pub surrogate_team_keys: Vec<TeamKey>,
    #[serde(default)]
    pub dq_team_keys: Vec<TeamKey>,
}

impl AllianceResponse {
    fn to_alliance(&self, match_key: &str) -> Result<Alliance, RatingError> {
        let teams: [TeamKey; 3] = self.team_keys.clone().try_into().map_err(|keys: Vec<TeamKey>| {
            RatingError::DataIntegrity {
                reason: format!(
                    "match {} has an alliance of {} teams, expected 3",
                    match_key,
                    keys.len()
                ),
            }
        })?;
        if let Some(repeated) = teams.iter().enumerate().find_map(|(i, t)| teams[..i].contains(t).then_some(t)) {
            return Err(RatingError::DataIntegrity {
                reason: format!("match {} lists {} twice on one alliance", match_key, repeated),
            });
        }
        let score = u32::try_from(self.score).map_err(|_| RatingError::DataIntegrity {
            reason: format!("match {} has negative score {}", match_key, self.score),
        })?;
        Ok(Alliance::new(teams, score))
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AlliancesResponse {
    pub red: AllianceResponse,
    pub blue: AllianceResponse,
}

/// Raw match from `/event/{key}/matches/simple`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MatchResponse {
    pub key: String,
    pub comp_level: CompLevel,
    #[serde(default)]
    pub set_number: u32,
    pub match_number: u32,
    pub alliances: AlliancesResponse,
    #[serde(default)]
    pub winning_alliance: Option<String>,
    #[serde(default)]
    pub event_key: Option<String>,
    #[serde(default)]
    pub actual_time: Option<i64>,
}

impl MatchResponse {
    /// TBA reports `-1` for both scores until a match has been played
    pub fn is_played(&self) -> bool {
        self.alliances.red.score >= 0 && self.alliances.blue.score >= 0
    }

    /// Blue becomes side A and red side B
    pub fn to_match(&self) -> Result<Match, RatingError> {
        Ok(Match {
            number: self.match_number,
            level: self.comp_level,
            side_a: self.alliances.blue.to_alliance(&self.key)?,
            side_b: self.alliances.red.to_alliance(&self.key)?,
        })
    }
}

/// Official OPR/DPR/CCWM statistics from `/event/{key}/oprs`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct EventStatistics {
    #[serde(default)]
    pub oprs: HashMap<TeamKey, f64>,
    #[serde(default)]
    pub dprs: HashMap<TeamKey, f64>,
    #[serde(default)]
    pub ccwms: HashMap<TeamKey, f64>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct WltRecord {
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
}

impl fmt::Display for WltRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.wins, self.losses, self.ties)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RankingData {
    #[serde(default)]
    pub rank: Option<u32>,
    #[serde(default)]
    pub matches_played: Option<u32>,
    #[serde(default)]
    pub qual_average: Option<f64>,
    #[serde(default)]
    pub dq: Option<u32>,
    #[serde(default)]
    pub record: Option<WltRecord>,
    pub team_key: TeamKey,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QualificationStatus {
    #[serde(default)]
    pub num_teams: Option<u32>,
    #[serde(default)]
    pub ranking: Option<RankingData>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AllianceStatus {
    #[serde(default)]
    pub name: Option<String>,
    pub number: u32,
    #[serde(default)]
    pub pick: i32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlayoffStatus {
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub record: Option<WltRecord>,
    #[serde(default)]
    pub current_level_record: Option<WltRecord>,
    #[serde(default)]
    pub playoff_average: Option<f64>,
}

/// Team status at an event from `/team/{team}/event/{event}/status`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TeamEventStatus {
    #[serde(default)]
    pub qual: Option<QualificationStatus>,
    #[serde(default)]
    pub alliance: Option<AllianceStatus>,
    #[serde(default)]
    pub playoff: Option<PlayoffStatus>,
    #[serde(default)]
    pub alliance_status_str: Option<String>,
    #[serde(default)]
    pub playoff_status_str: Option<String>,
    #[serde(default)]
    pub overall_status_str: Option<String>,
    #[serde(default)]
    pub next_match_key: Option<String>,
    #[serde(default)]
    pub last_match_key: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_team_key_parse() {
        assert_eq!(TeamKey::parse("3218"), Some(TeamKey::new("frc3218")));
        assert_eq!(TeamKey::parse(" frc254 "), Some(TeamKey::new("frc254")));
        assert_eq!(TeamKey::parse("quit"), None);
        assert_eq!(TeamKey::parse("frc"), None);
        assert_eq!(TeamKey::new("frc1678").number(), Some(1678));
        assert_eq!(TeamKey::new("T1").number(), None);
    }

    #[test]
    fn test_match_response_maps_blue_to_side_a() {
        let json = r#"{
            "key": "2018wasno_qm4",
            "comp_level": "qm",
            "set_number": 1,
            "match_number": 4,
            "alliances": {
                "red": { "score": 40, "team_keys": ["frc4", "frc5", "frc6"] },
                "blue": { "score": 50, "team_keys": ["frc1", "frc2", "frc3"] }
            },
            "winning_alliance": "blue"
        }"#;

        let response: MatchResponse = serde_json::from_str(json).unwrap();
        assert!(response.is_played());

        let m = response.to_match().unwrap();
        assert_eq!(m.number, 4);
        assert!(m.is_qualification());
        assert_eq!(m.side_a.score, 50);
        assert_eq!(m.side_a.teams[0], TeamKey::new("frc1"));
        assert_eq!(m.side_b.score, 40);
    }

    #[test]
    fn test_unplayed_match_and_unknown_level() {
        let json = r#"{
            "key": "2018wasno_xx1",
            "comp_level": "xx",
            "match_number": 1,
            "alliances": {
                "red": { "score": -1, "team_keys": ["frc4", "frc5", "frc6"] },
                "blue": { "score": -1, "team_keys": ["frc1", "frc2", "frc3"] }
            }
        }"#;

        let response: MatchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.comp_level, CompLevel::Other);
        assert!(!response.is_played());
        assert!(response.to_match().is_err());
    }

    #[test]
    fn test_short_alliance_is_integrity_error() {
        let alliance = AllianceResponse {
            score: 10,
            team_keys: vec![TeamKey::new("frc1"), TeamKey::new("frc2")],
            surrogate_team_keys: vec![],
            dq_team_keys: vec![],
        };

        let err = alliance.to_alliance("2018wasno_qm1").unwrap_err();
        assert!(matches!(err, RatingError::DataIntegrity { .. }));
    }

    #[test]
    fn test_repeated_team_is_integrity_error() {
        let alliance = AllianceResponse {
            score: 10,
            team_keys: vec![TeamKey::new("frc1"), TeamKey::new("frc1"), TeamKey::new("frc2")],
            surrogate_team_keys: vec![],
            dq_team_keys: vec![],
        };

        let err = alliance.to_alliance("2018wasno_qm1").unwrap_err();
        assert!(matches!(err, RatingError::DataIntegrity { ref reason } if reason.contains("frc1 twice")));
    }
}
