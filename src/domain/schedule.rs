use log::{debug, warn};

use crate::domain::models::{CompLevel, Match, MatchResponse};
use crate::errors::RatingError;

/// Turns an event's raw match list into the ordered qualification schedule
/// the rating engine consumes.
///
/// Unplayed matches are dropped, the rest are stable-sorted by match
/// number and must then be strictly ascending.
pub fn qualification_schedule(responses: &[MatchResponse]) -> Result<Vec<Match>, RatingError> {
    let mut matches = Vec::with_capacity(responses.len());
    let mut unplayed = 0;

    for response in responses {
        if !is_qualification(response) {
            continue;
        }
        if !response.is_played() {
            unplayed += 1;
            continue;
        }
        matches.push(response.to_match()?);
    }

    if unplayed > 0 {
        warn!("Skipped {} unplayed qualification matches", unplayed);
    }

    sort_matches(&mut matches);
    ensure_ascending(&matches)?;

    debug!("Qualification schedule has {} matches", matches.len());
    Ok(matches)
}

fn is_qualification(response: &MatchResponse) -> bool {
    response.comp_level == CompLevel::Qualification
}

/// Stable sort: equal match numbers keep their retrieval order
pub fn sort_matches(matches: &mut [Match]) {
    matches.sort_by_key(|m| m.number);
}

/// Rejects any list whose match numbers are not strictly increasing
pub fn ensure_ascending(matches: &[Match]) -> Result<(), RatingError> {
    for pair in matches.windows(2) {
        let (previous, current) = (&pair[0], &pair[1]);
        if current.number <= previous.number {
            return Err(RatingError::DataIntegrity {
                reason: format!(
                    "match {} follows match {}; qualification numbers must be strictly ascending",
                    current.number, previous.number
                ),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AllianceResponse, AlliancesResponse, TeamKey};

    fn alliance(score: i32, teams: [&str; 3]) -> AllianceResponse {
        AllianceResponse {
            score,
            team_keys: teams.iter().map(|t| TeamKey::new(*t)).collect(),
            surrogate_team_keys: vec![],
            dq_team_keys: vec![],
        }
    }

    fn response(level: CompLevel, number: u32, blue_score: i32) -> MatchResponse {
        MatchResponse {
            key: format!("2018test_{}", number),
            comp_level: level,
            set_number: 1,
            match_number: number,
            alliances: AlliancesResponse {
                red: alliance(if blue_score < 0 { -1 } else { 30 }, ["frc4", "frc5", "frc6"]),
                blue: alliance(blue_score, ["frc1", "frc2", "frc3"]),
            },
            winning_alliance: None,
            event_key: None,
            actual_time: None,
        }
    }

    #[test]
    fn test_schedule_filters_and_sorts() {
        let responses = vec![
            response(CompLevel::Qualification, 3, 30),
            response(CompLevel::Final, 1, 90),
            response(CompLevel::Qualification, 1, 10),
            response(CompLevel::Qualification, 4, -1),
            response(CompLevel::Qualification, 2, 20),
        ];

        let schedule = qualification_schedule(&responses).unwrap();
        let numbers: Vec<u32> = schedule.iter().map(|m| m.number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert!(schedule.iter().all(|m| m.is_qualification()));
        assert_eq!(schedule[0].side_a.score, 10);
    }

    #[test]
    fn test_duplicate_match_number_is_integrity_error() {
        let responses = vec![
            response(CompLevel::Qualification, 2, 10),
            response(CompLevel::Qualification, 1, 20),
            response(CompLevel::Qualification, 2, 30),
        ];

        let err = qualification_schedule(&responses).unwrap_err();
        assert!(matches!(err, RatingError::DataIntegrity { .. }));
    }
}
