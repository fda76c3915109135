use log::debug;

use super::system::LinearSystem;
use super::types::Solution;
use crate::config::settings::RatingSettings;

/// Least-squares solve of `design · ratings ≈ scores` by SVD.
///
/// Column-rank-deficient systems are reported as `Unsolvable` instead of
/// returning the minimum-norm pseudo-inverse answer.
pub fn solve(system: &LinearSystem) -> Solution {
    solve_with(system, &RatingSettings::default())
}

pub fn solve_with(system: &LinearSystem, config: &RatingSettings) -> Solution {
    let (rows, columns) = (system.rows(), system.columns());
    if rows == 0 || columns == 0 {
        return Solution::Unsolvable;
    }

    let svd = system.design().clone().svd(true, true);
    let sigma_max = svd.singular_values.iter().copied().fold(0.0_f64, f64::max);
    let tolerance = config
        .rank_tolerance
        .unwrap_or_else(|| default_tolerance(rows, columns, sigma_max));

    let rank = svd.rank(tolerance);
    if rank < columns {
        debug!("Design matrix {}x{} has rank {}, unsolvable", rows, columns, rank);
        return Solution::Unsolvable;
    }

    match svd.solve(system.scores(), tolerance) {
        Ok(ratings) if ratings.iter().all(|v| v.is_finite()) => Solution::Solved(ratings),
        Ok(_) => Solution::Unsolvable,
        Err(e) => {
            debug!("SVD solve failed: {}", e);
            Solution::Unsolvable
        }
    }
}

/// Singular values at or below this count as zero
fn default_tolerance(rows: usize, columns: usize, sigma_max: f64) -> f64 {
    rows.max(columns) as f64 * sigma_max * f64::EPSILON
}
