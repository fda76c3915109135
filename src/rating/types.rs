use std::fmt;

use nalgebra::DVector;
use serde::{Deserialize, Serialize};

pub type RatingValue = f64;

/// One solved rating per team column, indexed like the design matrix
pub type RatingVector = DVector<RatingValue>;

/// A team's rating after some prefix of the schedule
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Rating {
    Value(RatingValue),
    /// The prefix's system was rank-deficient
    Unavailable,
}

impl Rating {
    pub fn value(&self) -> Option<RatingValue> {
        match self {
            Rating::Value(v) => Some(*v),
            Rating::Unavailable => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Rating::Value(_))
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rating::Value(v) => write!(f, "{:.2}", v),
            Rating::Unavailable => f.write_str("rating unavailable yet"),
        }
    }
}

/// Outcome of a least-squares solve
#[derive(Debug, Clone, PartialEq)]
pub enum Solution {
    Solved(RatingVector),
    Unsolvable,
}

impl Solution {
    pub fn is_solved(&self) -> bool {
        matches!(self, Solution::Solved(_))
    }

    /// Rating for a column, `Unavailable` when unsolved or out of range
    pub fn rating(&self, column: usize) -> Rating {
        match self {
            Solution::Solved(ratings) => ratings
                .get(column)
                .copied()
                .map_or(Rating::Unavailable, Rating::Value),
            Solution::Unsolvable => Rating::Unavailable,
        }
    }
}
