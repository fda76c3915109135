use anyhow::Result;

use opr_tracker::cli::Command;
use opr_tracker::{handle_events, handle_stats, handle_status, handle_track, interpret};

fn main() {
    setup_logging();
    parse_and_execute().unwrap_or_else(|e| {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    });
}

fn setup_logging() {
    sensible_env_logger::init!();
}

fn parse_and_execute() -> Result<()> {
    let command = interpret();
    execute_command(&command)
}

fn execute_command(command: &Command) -> Result<()> {
    match command {
        Command::Events {
            year,
            filter,
            refresh,
        } => handle_events(*year, filter.as_deref(), *refresh),
        Command::Track {
            event,
            team,
            refresh,
        } => handle_track(event, team, *refresh),
        Command::Stats {
            event,
            top,
            refresh,
        } => handle_stats(event, *top, *refresh),
        Command::Status {
            event,
            team,
            refresh,
        } => handle_status(event, team, *refresh),
    }
}
