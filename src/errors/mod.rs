use thiserror::Error;

use crate::domain::TeamKey;

/// Failures of the rating engine that abort the current computation.
///
/// A singular least-squares solve is not one of them: it is routine for
/// early prefixes and travels as data (`Solution::Unsolvable`).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RatingError {
    #[error("team {team} in match {match_number} has no column in the team index")]
    Indexing { team: TeamKey, match_number: u32 },

    #[error("match data integrity violated: {reason}")]
    DataIntegrity { reason: String },
}

/// Add context to fetch errors
pub fn fetch_context(url: &str) -> String {
    format!("Failed to fetch from: {}", url)
}

/// Add context to parse errors
pub fn parse_context(data_type: &str) -> String {
    format!("Failed to parse {}", data_type)
}
