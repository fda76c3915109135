use std::collections::HashMap;

use log::{debug, info};

use super::solver::solve_with;
use super::system::build_system;
use super::team_index::TeamIndex;
use super::types::Rating;
use crate::config::settings::RatingSettings;
use crate::domain::schedule::ensure_ascending;
use crate::domain::{Match, TeamKey};
use crate::errors::RatingError;

/// Per-team rating history, one entry per match played since the team's
/// first appearance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RatingSeries {
    match_count: usize,
    teams: Vec<TeamKey>,
    entries: HashMap<TeamKey, Vec<Rating>>,
}

impl RatingSeries {
    fn push(&mut self, team: &TeamKey, rating: Rating) {
        if !self.entries.contains_key(team) {
            self.teams.push(team.clone());
        }
        self.entries.entry(team.clone()).or_default().push(rating);
    }

    /// Number of qualification matches the series covers
    pub fn match_count(&self) -> usize {
        self.match_count
    }

    /// Number of teams with a series
    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    pub fn contains(&self, team: &TeamKey) -> bool {
        self.entries.contains_key(team)
    }

    pub fn get(&self, team: &TeamKey) -> Option<&[Rating]> {
        self.entries.get(team).map(Vec::as_slice)
    }

    /// Matches played before the team's first appearance
    pub fn match_offset(&self, team: &TeamKey) -> Option<usize> {
        self.get(team).map(|ratings| self.match_count - ratings.len())
    }

    /// Rating after the last processed match
    pub fn latest(&self, team: &TeamKey) -> Option<Rating> {
        self.get(team).and_then(|ratings| ratings.last().copied())
    }

    /// Teams in order of first appearance
    pub fn teams(&self) -> impl Iterator<Item = &TeamKey> {
        self.teams.iter()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TeamKey, &[Rating])> {
        self.teams
            .iter()
            .filter_map(|team| self.get(team).map(|ratings| (team, ratings)))
    }
}

/// Solves every prefix of the qualification schedule from scratch.
///
/// The schedule must be in strictly ascending match-number order. Prefixes
/// whose system is rank-deficient contribute `Rating::Unavailable`.
pub fn build_series(matches: &[Match]) -> Result<RatingSeries, RatingError> {
    build_series_with(matches, &RatingSettings::default())
}

pub fn build_series_with(
    matches: &[Match],
    config: &RatingSettings,
) -> Result<RatingSeries, RatingError> {
    ensure_ascending(matches)?;

    let mut series = RatingSeries {
        match_count: matches.len(),
        ..RatingSeries::default()
    };
    let mut unsolvable = 0;

    for played in 1..=matches.len() {
        let prefix = &matches[..played];
        let index = TeamIndex::build(prefix);
        let system = build_system(prefix, &index)?;
        let solution = solve_with(&system, config);

        if !solution.is_solved() {
            unsolvable += 1;
        }
        debug!(
            "Prefix {}: {} teams, solved: {}",
            played,
            index.len(),
            solution.is_solved()
        );

        for (column, team) in index.columns() {
            series.push(team, solution.rating(column));
        }
    }

    info!(
        "Built OPR series over {} matches for {} teams ({} prefixes unsolvable)",
        matches.len(),
        series.len(),
        unsolvable
    );
    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rating::test_support::{full_rank_schedule, qm, random_schedule, two_match_scenario};
    use proptest::prelude::*;

    #[test]
    fn test_two_match_scenario_is_all_unavailable() {
        let series = build_series(&two_match_scenario()).unwrap();

        assert_eq!(series.match_count(), 2);
        assert_eq!(series.len(), 6);
        for (team, ratings) in series.iter() {
            assert!(ratings.iter().all(|r| !r.is_available()), "{}", team);
        }
        assert_eq!(series.get(&TeamKey::new("T1")).unwrap().len(), 2);
    }

    #[test]
    fn test_late_team_has_shorter_series() {
        let mut matches = two_match_scenario();
        matches.push(qm(3, ["T7", "T1", "T2"], 70, ["T3", "T4", "T5"], 65));

        let series = build_series(&matches).unwrap();
        let late = TeamKey::new("T7");

        assert_eq!(series.get(&late).unwrap().len(), 1);
        assert_eq!(series.match_offset(&late), Some(2));
        assert_eq!(series.match_offset(&TeamKey::new("T1")), Some(0));
        assert_eq!(series.teams().last(), Some(&late));
    }

    #[test]
    fn test_series_recovers_once_full_rank() {
        let matches = full_rank_schedule();
        let series = build_series(&matches).unwrap();
        let team = TeamKey::new("T1");

        let ratings = series.get(&team).unwrap();
        assert_eq!(ratings.len(), matches.len());
        assert!(ratings[..5].iter().all(|r| *r == Rating::Unavailable));
        assert!(ratings[5..].iter().all(Rating::is_available));

        let latest = series.latest(&team).and_then(|r| r.value()).unwrap();
        assert!((latest - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_out_of_order_schedule_is_rejected() {
        let mut matches = two_match_scenario();
        matches.swap(0, 1);

        let err = build_series(&matches).unwrap_err();
        assert!(matches!(err, RatingError::DataIntegrity { .. }));
    }

    #[test]
    fn test_empty_schedule() {
        let series = build_series(&[]).unwrap();
        assert!(series.is_empty());
        assert_eq!(series.match_count(), 0);
    }

    proptest! {
        #[test]
        fn prop_series_lengths_match_first_appearance(matches in random_schedule(10, 10)) {
            let series = build_series(&matches).unwrap();

            for team in series.teams() {
                let first = matches
                    .iter()
                    .position(|m| m.teams().any(|t| t == team))
                    .unwrap();
                prop_assert_eq!(series.get(team).unwrap().len(), matches.len() - first);
                prop_assert_eq!(series.match_offset(team), Some(first));
            }
        }

        #[test]
        fn prop_known_teams_grow_monotonically(matches in random_schedule(10, 10)) {
            let mut previous = TeamIndex::default();
            for played in 1..=matches.len() {
                let current = TeamIndex::build(&matches[..played]);
                prop_assert!(previous.teams().all(|t| current.contains(t)));
                previous = current;
            }
        }
    }
}
