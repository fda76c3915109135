use anyhow::Result;
use colored::Colorize;
use log::info;
use std::io::{BufRead, Write};
use std::path::PathBuf;

use crate::api::TbaClient;
use crate::cache::Cache;
use crate::config::settings::AppConfig;
use crate::domain::{EventResponse, Match, TeamKey};
use crate::rating::{self, Rating, RatingSeries};
use crate::render::{self, StatLine};

const QUIT: &str = "quit";

/// An event's qualification schedule with its OPR history
pub struct TrackedEvent {
    pub event: EventResponse,
    pub schedule: Vec<Match>,
    pub series: RatingSeries,
}

impl TrackedEvent {
    /// Final OPR per team, best first; unavailable ratings last
    pub fn standings(&self) -> Vec<(&TeamKey, Rating)> {
        let mut standings: Vec<(&TeamKey, Rating)> = self
            .series
            .teams()
            .filter_map(|team| self.series.latest(team).map(|rating| (team, rating)))
            .collect();
        standings.sort_by(|a, b| {
            let key = |r: &Rating| r.value().unwrap_or(f64::NEG_INFINITY);
            key(&b.1).total_cmp(&key(&a.1))
        });
        standings
    }

    pub fn stat_line(&self, team: &TeamKey) -> Option<StatLine> {
        let ratings = self.series.get(team)?;
        let offset = self.series.match_offset(team)?;
        Some(StatLine::from_series(ratings, offset))
    }
}

pub struct TrackingService {
    config: AppConfig,
    client: TbaClient,
}

impl TrackingService {
    pub fn new(config: AppConfig, refresh: bool) -> Result<Self> {
        let cache = Cache::new(&config.output.cache_dir)?;
        let client = TbaClient::new(&config.api, cache, !refresh)?;
        Ok(Self { config, client })
    }

    pub async fn load(&mut self, event_key: &str) -> Result<TrackedEvent> {
        info!("=== Tracking OPR for {} ===", event_key);

        let event = self.client.fetch_event(event_key).await?;
        let schedule = self.client.fetch_qualification_matches(event_key).await?;
        info!("  → {} qualification matches", schedule.len());

        let series = rating::build_series_with(&schedule, &self.config.rating)?;
        info!("  → OPR series for {} teams", series.len());

        Ok(TrackedEvent {
            event,
            schedule,
            series,
        })
    }

    pub fn print_standings(&self, tracked: &TrackedEvent, out: &mut impl Write) -> Result<()> {
        writeln!(
            out,
            "{} ({} qualification matches)",
            tracked.event.name.bold(),
            tracked.schedule.len()
        )?;
        writeln!(out, "{}", format!("{:>4}  {:<10} {:>10}", "#", "Team", "OPR").underline())?;
        for (rank, (team, rating)) in tracked.standings().into_iter().enumerate() {
            writeln!(out, "{:>4}  {:<10} {:>10}", rank + 1, team.to_string(), rating.to_string())?;
        }
        Ok(())
    }

    /// Writes one chart document per team, failing on teams not at the event
    pub fn export_charts(&self, tracked: &TrackedEvent, teams: &[TeamKey]) -> Result<Vec<PathBuf>> {
        teams
            .iter()
            .map(|team| {
                self.export_chart(tracked, team).ok_or_else(|| {
                    anyhow::anyhow!("Team {} was not present in {}", team, tracked.event.name)
                })?
            })
            .collect()
    }

    fn export_chart(&self, tracked: &TrackedEvent, team: &TeamKey) -> Option<Result<PathBuf>> {
        let line = tracked.stat_line(team)?;
        Some(render::write_chart(
            &self.config.output.chart_dir,
            &tracked.event.name,
            team,
            &line,
        ))
    }

    /// Asks for team numbers until `quit`, writing a chart for each known team
    pub fn prompt_loop(
        &self,
        tracked: &TrackedEvent,
        input: impl BufRead,
        out: &mut impl Write,
    ) -> Result<()> {
        let mut lines = input.lines();
        loop {
            writeln!(
                out,
                "What team would you like to see graphed? Example: 3218\nType '{}' to end the program.",
                QUIT
            )?;
            out.flush()?;

            let Some(line) = lines.next() else {
                break;
            };
            let line = line?;
            let answer = line.trim();
            if answer.is_empty() {
                continue;
            }
            if answer == QUIT {
                break;
            }

            match TeamKey::parse(answer).filter(|team| tracked.series.contains(team)) {
                Some(team) => self.answer_team(tracked, &team, &mut *out)?,
                None => writeln!(
                    out,
                    "{} Was the team present in this competition: {}\nPlease try again",
                    "Input or team number not recognized.".yellow(),
                    tracked.event.name
                )?,
            }
        }
        Ok(())
    }

    fn answer_team(&self, tracked: &TrackedEvent, team: &TeamKey, out: &mut impl Write) -> Result<()> {
        if let Some(rating) = tracked.series.latest(team) {
            writeln!(out, "{} current OPR: {}", team, rating)?;
        }
        if let Some(path) = self.export_chart(tracked, team).transpose()? {
            writeln!(out, "Saved as: {}", path.display().to_string().green())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Alliance;

    fn qm(number: u32, a: [u32; 3], score_a: u32, b: [u32; 3], score_b: u32) -> Match {
        Match::qualification(
            number,
            Alliance::new(a.map(TeamKey::from_number), score_a),
            Alliance::new(b.map(TeamKey::from_number), score_b),
        )
    }

    fn tracked(dir: &str) -> (TrackingService, TrackedEvent) {
        let mut config = AppConfig::default();
        config.output.chart_dir = std::env::temp_dir().join(dir).join("out");
        config.output.cache_dir = std::env::temp_dir().join(dir).join("cache");

        let sides = [
            [1, 2, 3],
            [1, 4, 5],
            [1, 2, 4],
            [2, 4, 6],
            [1, 3, 6],
            [3, 4, 5],
        ];
        let schedule: Vec<Match> = sides
            .iter()
            .enumerate()
            .map(|(i, a)| {
                let b: Vec<u32> = (1..=6).filter(|t| !a.contains(t)).collect();
                let sum = |teams: &[u32]| -> u32 { teams.iter().map(|t| 10 * t).sum() };
                qm(i as u32 + 1, *a, sum(&a[..]), [b[0], b[1], b[2]], sum(&b[..]))
            })
            .collect();
        let series = rating::build_series(&schedule).unwrap();

        let event = EventResponse {
            key: "2018test".to_string(),
            name: "Test Regional".to_string(),
            event_code: None,
            city: None,
            state_prov: None,
            country: None,
            start_date: None,
            end_date: None,
            year: 2018,
        };
        let service = TrackingService::new(config, false).unwrap();
        (service, TrackedEvent { event, schedule, series })
    }

    #[test]
    fn test_standings_are_sorted_by_final_opr() {
        let dir = "opr_tracker_test_standings";
        let (_, tracked) = tracked(dir);

        let order: Vec<u32> = tracked
            .standings()
            .iter()
            .filter_map(|(team, _)| team.number())
            .collect();
        assert_eq!(order, vec![6, 5, 4, 3, 2, 1]);

        std::fs::remove_dir_all(std::env::temp_dir().join(dir)).unwrap();
    }

    #[test]
    fn test_prompt_loop_exports_known_team() {
        let dir = "opr_tracker_test_prompt";
        let (service, tracked) = tracked(dir);
        let input = std::io::Cursor::new("9999\n\n4\nquit\n");
        let mut out = Vec::new();

        service.prompt_loop(&tracked, input, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Was the team present in this competition: Test Regional"));
        assert!(text.contains("frc4 current OPR: 40.00"));
        assert!(text.contains("Test Regional 4.json"));

        std::fs::remove_dir_all(std::env::temp_dir().join(dir)).unwrap();
    }

    #[test]
    fn test_export_unknown_team_fails() {
        let dir = "opr_tracker_test_export";
        let (service, tracked) = tracked(dir);

        let err = service
            .export_charts(&tracked, &[TeamKey::from_number(42)])
            .unwrap_err();
        assert!(err.to_string().contains("frc42"));

        std::fs::remove_dir_all(std::env::temp_dir().join(dir)).unwrap();
    }
}
