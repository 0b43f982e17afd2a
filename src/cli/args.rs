use clap::{Parser, Subcommand};
use std::path::PathBuf;

use taqwim::models::CalendarSystem;

#[derive(Parser, Debug)]
#[command(name = "taqwim", version, author, about = "Hijri and Gregorian prayer-time calendar for the terminal")]
pub struct Cli {
    /// Display language (ar, en, fr, zh, bn, tr); overrides the config
    #[arg(long, global = true)]
    pub lang: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Cache a month response saved from the backend ("-" reads stdin)
    Import {
        /// JSON file with the month's day records
        file: PathBuf,
        /// Calendar system the month was queried in
        #[arg(long, default_value = "gregorian")]
        system: CalendarSystem,
    },
    /// Print a month grid (Saturday first)
    Calendar {
        #[command(flatten)]
        month: MonthArgs,
    },
    /// Print every day's prayer times for a month
    Month {
        #[command(flatten)]
        month: MonthArgs,
    },
    /// Show a day's prayer times and the countdown to the next one
    Times {
        /// Day to show (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<chrono::NaiveDate>,
    },
    /// Format a clock time in 12-hour form
    Format {
        /// Time as HH:MM
        time: String,
    },
    /// List cached months for the configured location
    Months,
    /// Drop every cached month
    Clear,
}

#[derive(clap::Args, Debug)]
pub struct MonthArgs {
    /// Calendar system (hijri or gregorian); defaults to the config
    #[arg(long)]
    pub system: Option<CalendarSystem>,
    /// Year in the chosen system
    #[arg(long, requires = "month")]
    pub year: Option<i32>,
    /// Month number (1-12) in the chosen system
    #[arg(long, requires = "year", value_parser = clap::value_parser!(u32).range(1..=12))]
    pub month: Option<u32>,
}
