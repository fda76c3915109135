use anyhow::{Context, Result};
use log::info;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use super::points::{Point, StatLine};
use crate::domain::TeamKey;

const X_LABEL: &str = "Qualification Match #";
const Y_LABEL: &str = "OPR";

/// Chart data handed to whatever draws the plot
#[derive(Debug, Serialize)]
pub struct ChartDocument<'a> {
    pub event: &'a str,
    pub team: &'a TeamKey,
    pub x_label: &'static str,
    pub y_label: &'static str,
    pub x_max: usize,
    pub y_min: Option<f64>,
    pub y_max: Option<f64>,
    pub points: &'a [Point],
}

impl<'a> ChartDocument<'a> {
    pub fn new(event: &'a str, team: &'a TeamKey, line: &'a StatLine) -> Self {
        Self {
            event,
            team,
            x_label: X_LABEL,
            y_label: Y_LABEL,
            x_max: line.x_max(),
            y_min: line.y_min(),
            y_max: line.y_max(),
            points: line.points(),
        }
    }
}

/// Writes `<dir>/<event> <team number>.json` and returns its path
pub fn write_chart(dir: &Path, event: &str, team: &TeamKey, line: &StatLine) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;

    let path = dir.join(chart_file_name(event, team));
    let document = ChartDocument::new(event, team, line);
    let json = serde_json::to_string_pretty(&document).context("Failed to serialize chart")?;
    fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))?;

    info!("Saved chart for {} to {}", team, path.display());
    Ok(path)
}

fn chart_file_name(event: &str, team: &TeamKey) -> String {
    let label = team
        .number()
        .map(|n| n.to_string())
        .unwrap_or_else(|| team.to_string());
    format!("{} {}.json", event.replace(['/', '\\'], "-"), label)
}
