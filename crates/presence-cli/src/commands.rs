use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate, Utc};
use presence_engine::{
    compute_duration, days_in_month, leading_blank_days, parse_iso_date, today_in,
    PresenceLedger, ProjectionOptions, WeekStartDay,
};
use serde::Serialize;

use crate::cli::{AuditArgs, CalendarArgs, DurationArgs, StatusArgs, WeekStart};
use crate::config::PresenceConfig;

pub fn status(args: StatusArgs, config: &PresenceConfig) -> Result<()> {
    let path = args.ledger.unwrap_or_else(|| config.ledger.clone());
    let timezone = args.timezone.as_deref().or(config.timezone.as_deref());
    let ledger = read_ledger(&path, timezone)?;
    let today = resolve_today(args.today.as_deref(), timezone)?;
    let options = ProjectionOptions {
        requirement: args.requirement.unwrap_or(config.requirement),
        include_future_travel: args.future_travel || config.include_future_travel,
    };
    tracing::info!(%today, ?options, "computing status");

    print_json(&ledger.report(today, &options))
}

pub fn duration(args: DurationArgs) -> Result<()> {
    let start = parse_iso_date(&args.start).context("bad start date")?;
    let end = parse_iso_date(&args.end).context("bad end date")?;
    print_json(&compute_duration(start, end))
}

pub fn audit(args: AuditArgs, config: &PresenceConfig) -> Result<()> {
    let path = args.ledger.unwrap_or_else(|| config.ledger.clone());
    let mut ledger = read_ledger(&path, config.timezone.as_deref())?;

    let drifts = if args.fix {
        let drifts = ledger.repair_cached_days();
        if !drifts.is_empty() {
            write_ledger(&path, &ledger)?;
            tracing::info!(count = drifts.len(), path = %path.display(), "repaired day counts");
        }
        drifts
    } else {
        ledger.audit_cached_days()
    };
    print_json(&drifts)
}

pub fn calendar(args: CalendarArgs) -> Result<()> {
    let week_start = match args.week_start {
        WeekStart::Sunday => WeekStartDay::Sunday,
        WeekStart::Monday => WeekStartDay::Monday,
    };
    print!("{}", render_month(args.year, args.month, week_start)?);
    Ok(())
}

/// Month grid in the layout the date picker uses.
fn render_month(year: i32, month: u32, week_start: WeekStartDay) -> Result<String> {
    let blanks = leading_blank_days(year, month, week_start)?;
    let days = days_in_month(year, month)?;
    let title = NaiveDate::from_ymd_opt(year, month, 1)
        .context("month out of range")?
        .format("%B %Y");

    let mut out = format!("{title}\n");
    out.push_str(match week_start {
        WeekStartDay::Sunday => "Su Mo Tu We Th Fr Sa\n",
        WeekStartDay::Monday => "Mo Tu We Th Fr Sa Su\n",
    });
    let mut cells: Vec<String> = (0..blanks).map(|_| "  ".to_string()).collect();
    cells.extend((1..=days).map(|d| format!("{d:>2}")));
    for row in cells.chunks(7) {
        writeln!(out, "{}", row.join(" ").trim_end())?;
    }
    Ok(out)
}

fn resolve_today(explicit: Option<&str>, timezone: Option<&str>) -> Result<NaiveDate> {
    match (explicit, timezone) {
        (Some(date), _) => Ok(parse_iso_date(date).context("bad --today")?),
        (None, Some(tz)) => Ok(today_in(Utc::now(), tz)?),
        (None, None) => Ok(Local::now().date_naive()),
    }
}

/// Timestamped PR dates are read in `timezone`, or the system zone when unset.
fn read_ledger(path: &Path, timezone: Option<&str>) -> Result<PresenceLedger> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read ledger {}", path.display()))?;
    match timezone {
        Some(tz) => PresenceLedger::from_json_in(&text, tz),
        None => PresenceLedger::from_json(&text),
    }
    .with_context(|| format!("failed to parse ledger {}", path.display()))
}

fn write_ledger(path: &Path, ledger: &PresenceLedger) -> Result<()> {
    let json = ledger.to_json_pretty()?;
    std::fs::write(path, json + "\n")
        .with_context(|| format!("failed to write ledger {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
