use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::config::REQUIREMENT_RANGE;

/// Track physical presence and project citizenship eligibility.
#[derive(Parser)]
#[command(name = "presence", version, about = "Physical-presence eligibility calculator")]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to TOML configuration file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show accrued credit and the projected eligibility date.
    Status(StatusArgs),
    /// Check a date range the way the entry form does.
    Duration(DurationArgs),
    /// Find records whose stored day count disagrees with their dates.
    Audit(AuditArgs),
    /// Print a month grid.
    Calendar(CalendarArgs),
}

#[derive(clap::Args)]
pub struct StatusArgs {
    /// Ledger JSON file (overrides config).
    #[arg(short, long)]
    pub ledger: Option<PathBuf>,

    /// Reference date as YYYY-MM-DD (default: today).
    #[arg(long)]
    pub today: Option<String>,

    /// Credited days required (overrides config).
    #[arg(short, long, value_parser = clap::value_parser!(i64).range(REQUIREMENT_RANGE))]
    pub requirement: Option<i64>,

    /// Skip days inside planned trips when projecting.
    #[arg(long)]
    pub future_travel: bool,

    /// IANA timezone used to decide what "today" is (overrides config).
    #[arg(long)]
    pub timezone: Option<String>,
}

#[derive(clap::Args)]
pub struct DurationArgs {
    /// First day, YYYY-MM-DD.
    pub start: String,
    /// Last day, YYYY-MM-DD.
    pub end: String,
}

#[derive(clap::Args)]
pub struct AuditArgs {
    /// Ledger JSON file (overrides config).
    #[arg(short, long)]
    pub ledger: Option<PathBuf>,

    /// Rewrite the ledger with corrected day counts.
    #[arg(long)]
    pub fix: bool,
}

#[derive(clap::Args)]
pub struct CalendarArgs {
    pub year: i32,
    /// Month number, 1-12.
    pub month: u32,

    #[arg(long, value_enum, default_value_t = WeekStart::Sunday)]
    pub week_start: WeekStart,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum WeekStart {
    Sunday,
    Monday,
}
