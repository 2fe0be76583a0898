use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "quranpulse",
    version,
    author,
    about = "Which prayer window you are in, and how long until the next one"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the current prayer window and time until the next prayer
    Status {
        /// Resolve for this clock time (HH:MM) instead of now
        #[arg(long)]
        at: Option<String>,
        /// Print the status record as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the five prayer times for a day
    Times {
        /// Date to show (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,
        /// Only show this prayer (fajr, dhuhr, asr, maghrib, isha)
        #[arg(long)]
        prayer: Option<String>,
    },
    /// Keep the status up to date, re-checking on every tick
    Watch {
        /// Seconds between checks (defaults to display.poll_interval_secs)
        #[arg(long)]
        interval: Option<u64>,
        /// Stop after this many updates
        #[arg(long)]
        count: Option<u64>,
    },
    /// Manage the local prayer-time cache
    Cache {
        #[command(subcommand)]
        action: CacheCommands,
    },
    /// Inspect or create the config file
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum CacheCommands {
    /// Drop every cached day
    Clear,
    /// Pre-fill today and the following days
    Fill {
        /// Number of days after today to fill
        #[arg(long, default_value = "7")]
        days: u32,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the effective configuration
    Show,
    /// Print the config file location
    Path,
    /// Write a config file with default values
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}
