pub mod series;
pub mod solver;
pub mod system;
pub mod team_index;
pub mod types;

pub use series::{build_series, build_series_with, RatingSeries};
pub use solver::{solve, solve_with};
pub use system::{build_system, LinearSystem};
pub use team_index::TeamIndex;
pub use types::{Rating, RatingValue, RatingVector, Solution};
