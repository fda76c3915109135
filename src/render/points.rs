use serde::Serialize;

use crate::rating::Rating;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Plot-ready points for one team's rating history.
///
/// Unavailable ratings emit no point but still occupy their x slot, so
/// every point sits at its real qualification match number.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StatLine {
    points: Vec<Point>,
    y_min: Option<f64>,
    y_max: Option<f64>,
    x_max: usize,
}

impl StatLine {
    pub fn from_series(series: &[Rating], match_offset: usize) -> Self {
        let mut line = Self {
            x_max: series.len() + match_offset,
            ..Self::default()
        };

        for (slot, rating) in series.iter().enumerate() {
            if let Some(y) = rating.value() {
                line.add((slot + match_offset) as f64, y);
            }
        }
        line
    }

    fn add(&mut self, x: f64, y: f64) {
        self.y_min = Some(self.y_min.map_or(y, |min| min.min(y)));
        self.y_max = Some(self.y_max.map_or(y, |max| max.max(y)));
        self.points.push(Point { x, y });
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn y_min(&self) -> Option<f64> {
        self.y_min
    }

    pub fn y_max(&self) -> Option<f64> {
        self.y_max
    }

    /// Extent of the match axis: matches covered by the series
    pub fn x_max(&self) -> usize {
        self.x_max
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
