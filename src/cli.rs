use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about = "Qualification-by-qualification OPR tracker for FRC events")]
pub struct Cli {
    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "lower_case")]
pub enum Command {
    /// List a season's events to find an event key
    Events {
        /// Season year
        #[arg(short, long)]
        year: i32,
        /// Only events whose key, name or city contains this text
        #[arg(short, long)]
        filter: Option<String>,
        /// Ignore cached responses
        #[arg(long)]
        refresh: bool,
    },
    /// Compute the OPR history of an event and graph teams
    Track {
        /// Event key, e.g. 2018wasno
        #[arg(short, long)]
        event: String,
        /// Export these teams' charts instead of prompting
        #[arg(short, long)]
        team: Vec<String>,
        /// Ignore cached responses
        #[arg(long)]
        refresh: bool,
    },
    /// Compare official OPR/DPR/CCWM with the locally computed OPR
    Stats {
        /// Event key, e.g. 2018wasno
        #[arg(short, long)]
        event: String,
        /// Number of rows to print
        #[arg(long, default_value_t = 10)]
        top: usize,
        /// Ignore cached responses
        #[arg(long)]
        refresh: bool,
    },
    /// Show a team's ranking and playoff status at an event
    Status {
        /// Event key, e.g. 2018wasno
        #[arg(short, long)]
        event: String,
        /// Team number, e.g. 3218
        #[arg(short, long)]
        team: String,
        /// Ignore cached responses
        #[arg(long)]
        refresh: bool,
    },
}
