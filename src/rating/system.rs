use nalgebra::{DMatrix, DVector};

use super::team_index::TeamIndex;
use crate::domain::{Alliance, Match};
use crate::errors::RatingError;

/// `design · ratings ≈ scores`, two observation rows per match
#[derive(Debug, Clone, PartialEq)]
pub struct LinearSystem {
    design: DMatrix<f64>,
    scores: DVector<f64>,
}

impl LinearSystem {
    pub fn design(&self) -> &DMatrix<f64> {
        &self.design
    }

    pub fn scores(&self) -> &DVector<f64> {
        &self.scores
    }

    pub fn rows(&self) -> usize {
        self.design.nrows()
    }

    pub fn columns(&self) -> usize {
        self.design.ncols()
    }
}

/// Row 2i encodes side A of match i, row 2i+1 side B.
///
/// Every team in `matches` must have a column in `index`.
pub fn build_system(matches: &[Match], index: &TeamIndex) -> Result<LinearSystem, RatingError> {
    let rows = 2 * matches.len();
    let mut design = DMatrix::<f64>::zeros(rows, index.len());
    let mut scores = DVector::<f64>::zeros(rows);

    for (i, m) in matches.iter().enumerate() {
        fill_row(&mut design, &mut scores, 2 * i, &m.side_a, m.number, index)?;
        fill_row(&mut design, &mut scores, 2 * i + 1, &m.side_b, m.number, index)?;
    }

    Ok(LinearSystem { design, scores })
}

fn fill_row(
    design: &mut DMatrix<f64>,
    scores: &mut DVector<f64>,
    row: usize,
    alliance: &Alliance,
    match_number: u32,
    index: &TeamIndex,
) -> Result<(), RatingError> {
    for team in &alliance.teams {
        let column = index.column(team).ok_or_else(|| RatingError::Indexing {
            team: team.clone(),
            match_number,
        })?;
        if design[(row, column)] != 0.0 {
            return Err(RatingError::DataIntegrity {
                reason: format!("match {} lists {} twice on one alliance", match_number, team),
            });
        }
        design[(row, column)] = 1.0;
    }
    scores[row] = f64::from(alliance.score);
    Ok(())
}
