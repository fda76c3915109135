use anyhow::Result;
use colored::Colorize;
use log::info;
use std::io::Write;

use crate::api::TbaClient;
use crate::cache::Cache;
use crate::config::settings::AppConfig;
use crate::domain::{EventResponse, EventStatistics, TeamEventStatus, TeamKey};
use crate::rating::{self, RatingSeries};

/// Read-only views of events, official statistics and team status
pub struct LookupService {
    config: AppConfig,
    client: TbaClient,
}

impl LookupService {
    pub fn new(config: AppConfig, refresh: bool) -> Result<Self> {
        let cache = Cache::new(&config.output.cache_dir)?;
        let client = TbaClient::new(&config.api, cache, !refresh)?;
        Ok(Self { config, client })
    }

    pub async fn list_events(&mut self, year: i32, filter: Option<&str>, out: &mut impl Write) -> Result<()> {
        let events = self.client.fetch_events(year).await?;
        let matching = filter_events(&events, filter);
        info!("{} of {} events match", matching.len(), events.len());

        for event in matching {
            let dates = match (event.start_date, event.end_date) {
                (Some(start), Some(end)) => format!("{} to {}", start, end),
                (Some(start), None) => start.to_string(),
                _ => String::new(),
            };
            writeln!(
                out,
                "{:<14} {}  {}  {}",
                event.key.bold().to_string(),
                event.name,
                event.location().dimmed(),
                dates
            )?;
        }
        Ok(())
    }

    /// Official statistics next to the locally computed final OPR
    pub async fn show_statistics(&mut self, event_key: &str, top: usize, out: &mut impl Write) -> Result<()> {
        let stats = self.client.fetch_event_statistics(event_key).await?;
        if stats.oprs.is_empty() {
            writeln!(out, "No official statistics published for {} yet", event_key)?;
        }

        let schedule = self.client.fetch_qualification_matches(event_key).await?;
        let series = rating::build_series_with(&schedule, &self.config.rating)?;

        writeln!(
            out,
            "{}",
            format!(
                "{:<10} {:>10} {:>10} {:>10} {:>10}",
                "Team", "TBA OPR", "Local OPR", "DPR", "CCWM"
            )
            .underline()
        )?;
        for row in statistics_rows(&stats, &series).into_iter().take(top) {
            writeln!(out, "{}", row)?;
        }
        Ok(())
    }

    pub async fn show_status(&mut self, team: &TeamKey, event_key: &str, out: &mut impl Write) -> Result<()> {
        match self.client.fetch_team_status(team, event_key).await? {
            Some(status) => write_status(team, &status, out),
            None => {
                writeln!(out, "{} has no status at {}", team, event_key)?;
                Ok(())
            }
        }
    }
}

/// Case-insensitive substring match on key, name and city
fn filter_events<'a>(events: &'a [EventResponse], filter: Option<&str>) -> Vec<&'a EventResponse> {
    let needle = filter.map(str::to_lowercase);
    let mut matching: Vec<&EventResponse> = events
        .iter()
        .filter(|event| match &needle {
            Some(needle) => [Some(&event.key), Some(&event.name), event.city.as_ref()]
                .into_iter()
                .flatten()
                .any(|field| field.to_lowercase().contains(needle.as_str())),
            None => true,
        })
        .collect();
    matching.sort_by(|a, b| a.start_date.cmp(&b.start_date).then_with(|| a.key.cmp(&b.key)));
    matching
}

/// Rows sorted by official OPR, teams without one fall back to local order
fn statistics_rows(stats: &EventStatistics, series: &RatingSeries) -> Vec<String> {
    let mut teams: Vec<&TeamKey> = series.teams().collect();
    for team in stats.oprs.keys() {
        if !series.contains(team) {
            teams.push(team);
        }
    }
    teams.sort_by(|a, b| {
        let official = |t: &TeamKey| stats.oprs.get(t).copied().unwrap_or(f64::NEG_INFINITY);
        official(*b).total_cmp(&official(*a))
    });

    let cell = |value: Option<f64>| value.map_or_else(|| "-".to_string(), |v| format!("{:.2}", v));
    teams
        .into_iter()
        .map(|team| {
            let local = series.latest(team).and_then(|r| r.value());
            format!(
                "{:<10} {:>10} {:>10} {:>10} {:>10}",
                team.to_string(),
                cell(stats.oprs.get(team).copied()),
                cell(local),
                cell(stats.dprs.get(team).copied()),
                cell(stats.ccwms.get(team).copied()),
            )
        })
        .collect()
}

fn write_status(team: &TeamKey, status: &TeamEventStatus, out: &mut impl Write) -> Result<()> {
    writeln!(out, "{}", team.to_string().bold())?;

    if let Some(ranking) = status.qual.as_ref().and_then(|q| q.ranking.as_ref()) {
        let of_teams = status
            .qual
            .as_ref()
            .and_then(|q| q.num_teams)
            .map(|n| format!(" of {}", n))
            .unwrap_or_default();
        let rank = ranking.rank.map(|r| r.to_string()).unwrap_or_else(|| "-".to_string());
        writeln!(out, "  Qualification rank: {}{}", rank, of_teams)?;
        if let Some(record) = &ranking.record {
            writeln!(out, "  Record: {}", record)?;
        }
        if let Some(average) = ranking.qual_average {
            writeln!(out, "  Qualification average: {:.2}", average)?;
        }
    }
    if let Some(alliance) = &status.alliance {
        let name = alliance
            .name
            .clone()
            .unwrap_or_else(|| format!("Alliance {}", alliance.number));
        writeln!(out, "  Alliance: {} (pick {})", name, alliance.pick)?;
    }
    if let Some(overall) = &status.overall_status_str {
        writeln!(out, "  {}", strip_markup(overall))?;
    }
    Ok(())
}

/// TBA status strings carry `<b>` tags
fn strip_markup(text: &str) -> String {
    text.replace("<b>", "").replace("</b>", "")
}
