use std::collections::HashMap;

use crate::domain::{Match, TeamKey};

/// Bijection between teams and design-matrix columns.
///
/// Columns are handed out in first-seen order: matches in the order given,
/// side A before side B, and each alliance in its listed team order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeamIndex {
    team_to_column: HashMap<TeamKey, usize>,
    column_to_team: Vec<TeamKey>,
}

impl TeamIndex {
    pub fn build(matches: &[Match]) -> Self {
        let mut index = Self::default();
        for team in matches.iter().flat_map(Match::teams) {
            index.observe(team);
        }
        index
    }

    fn observe(&mut self, team: &TeamKey) {
        if self.team_to_column.contains_key(team) {
            return;
        }
        self.team_to_column.insert(team.clone(), self.column_to_team.len());
        self.column_to_team.push(team.clone());
    }

    pub fn column(&self, team: &TeamKey) -> Option<usize> {
        self.team_to_column.get(team).copied()
    }

    pub fn team(&self, column: usize) -> Option<&TeamKey> {
        self.column_to_team.get(column)
    }

    pub fn contains(&self, team: &TeamKey) -> bool {
        self.team_to_column.contains_key(team)
    }

    pub fn len(&self) -> usize {
        self.column_to_team.len()
    }

    pub fn is_empty(&self) -> bool {
        self.column_to_team.is_empty()
    }

    /// Teams in column order
    pub fn teams(&self) -> impl Iterator<Item = &TeamKey> {
        self.column_to_team.iter()
    }

    /// (column, team) pairs in column order
    pub fn columns(&self) -> impl Iterator<Item = (usize, &TeamKey)> {
        self.column_to_team.iter().enumerate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rating::test_support::{qm, two_match_scenario};
    use proptest::prelude::*;

    #[test]
    fn test_columns_follow_first_appearance() {
        let index = TeamIndex::build(&two_match_scenario());

        let order: Vec<&str> = index.teams().map(TeamKey::as_str).collect();
        assert_eq!(order, vec!["T1", "T2", "T3", "T4", "T5", "T6"]);
        assert_eq!(index.column(&TeamKey::new("T1")), Some(0));
        assert_eq!(index.column(&TeamKey::new("T6")), Some(5));
        assert_eq!(index.team(3), Some(&TeamKey::new("T4")));
        assert_eq!(index.column(&TeamKey::new("T7")), None);
    }

    #[test]
    fn test_side_a_scanned_before_side_b() {
        let matches = vec![qm(1, ["C", "B", "A"], 10, ["F", "E", "D"], 20)];
        let index = TeamIndex::build(&matches);

        let order: Vec<&str> = index.teams().map(TeamKey::as_str).collect();
        assert_eq!(order, vec!["C", "B", "A", "F", "E", "D"]);
    }

    #[test]
    fn test_empty_match_list() {
        let index = TeamIndex::build(&[]);
        assert!(index.is_empty());
        assert_eq!(index.len(), 0);
        assert_eq!(index.team(0), None);
    }

    proptest! {
        #[test]
        fn prop_columns_are_dense_and_unique(
            schedule in prop::collection::vec(prop::sample::subsequence((0..12u32).collect::<Vec<_>>(), 6), 0..10)
        ) {
            let matches: Vec<Match> = schedule
                .iter()
                .enumerate()
                .map(|(i, teams)| {
                    let names: Vec<String> = teams.iter().map(|n| format!("frc{}", n)).collect();
                    qm(
                        i as u32 + 1,
                        [names[0].as_str(), names[1].as_str(), names[2].as_str()],
                        10,
                        [names[3].as_str(), names[4].as_str(), names[5].as_str()],
                        20,
                    )
                })
                .collect();

            let index = TeamIndex::build(&matches);
            let distinct: std::collections::HashSet<&TeamKey> = matches.iter().flat_map(Match::teams).collect();

            prop_assert_eq!(index.len(), distinct.len());
            for (column, team) in index.columns() {
                prop_assert_eq!(index.column(team), Some(column));
            }
            for team in distinct {
                prop_assert!(index.column(team).unwrap() < index.len());
            }
        }
    }
}
