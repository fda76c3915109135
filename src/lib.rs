pub mod api;
pub mod cache;
pub mod cli;
pub mod config;
pub mod domain;
pub mod errors;
pub mod http;
pub mod rate_limiter;
pub mod rating;
pub mod render;
pub mod services;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use std::io;

use crate::cli::Command;
use crate::config::settings::AppConfig;
use crate::domain::TeamKey;
use crate::services::lookup::LookupService;
use crate::services::tracking::TrackingService;

pub fn interpret() -> Command {
    let cli = Cli::parse();
    cli.command
}

pub fn handle_events(year: i32, filter: Option<&str>, refresh: bool) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let mut service = LookupService::new(AppConfig::new(), refresh)?;
        service.list_events(year, filter, &mut io::stdout()).await
    })
}

pub fn handle_track(event_key: &str, teams: &[String], refresh: bool) -> Result<()> {
    let teams = parse_teams(teams)?;
    let mut service = TrackingService::new(AppConfig::new(), refresh)?;

    let runtime = tokio::runtime::Runtime::new()?;
    let tracked = runtime.block_on(service.load(event_key))?;

    let mut out = io::stdout();
    service.print_standings(&tracked, &mut out)?;

    if teams.is_empty() {
        service.prompt_loop(&tracked, io::stdin().lock(), &mut out)
    } else {
        for path in service.export_charts(&tracked, &teams)? {
            println!("Saved as: {}", path.display());
        }
        Ok(())
    }
}

pub fn handle_stats(event_key: &str, top: usize, refresh: bool) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let mut service = LookupService::new(AppConfig::new(), refresh)?;
        service.show_statistics(event_key, top, &mut io::stdout()).await
    })
}

pub fn handle_status(event_key: &str, team: &str, refresh: bool) -> Result<()> {
    let team = parse_team(team)?;
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let mut service = LookupService::new(AppConfig::new(), refresh)?;
        service.show_status(&team, event_key, &mut io::stdout()).await
    })
}

fn parse_team(input: &str) -> Result<TeamKey> {
    TeamKey::parse(input).with_context(|| format!("Not a team number: {}", input))
}

fn parse_teams(inputs: &[String]) -> Result<Vec<TeamKey>> {
    inputs.iter().map(|input| parse_team(input)).collect()
}
