use anyhow::{anyhow, bail, Context, Result};
use chrono::{NaiveDate, NaiveTime};
use rusqlite::Connection;
use std::str::FromStr;
use std::time::Duration;

use crate::cli::args::{CacheCommands, ConfigCommands};
use crate::cli::ticker::{now_in, ClockTick, Ticker};
use crate::config::{AppConfig, ScheduleSource};
use crate::db::repository::CacheRepo;
use crate::models::{PrayerStatus, PrayerType};
use crate::prayer_times::resolver::format_duration;
use crate::prayer_times::schedule::parse_clock_time;
use crate::prayer_times::{resolve_status, PrayerSchedule, ScheduleProvider};
use crate::utils::format::{format_time, format_tz_offset};
use crate::utils::hijri::hijri_string;

// ─── ANSI helpers ────────────────────────────────────────────────────────────

macro_rules! println_colored {
    ($color:expr, $($arg:tt)*) => {{
        print!("{}", $color);
        print!($($arg)*);
        println!("\x1b[0m");
    }};
}

const GREEN: &str = "\x1b[32m";
const AMBER: &str = "\x1b[33m";
const DIM: &str = "\x1b[2m";
const BOLD: &str = "\x1b[1m";
const GOLD: &str = "\x1b[38;2;196;160;68m";

// ─── Status ──────────────────────────────────────────────────────────────────

pub fn handle_status(
    conn: &Connection,
    config: &AppConfig,
    at: Option<&str>,
    json: bool,
) -> Result<()> {
    let provider = ScheduleProvider::from_config(config)?;
    let now = now_in(config.clock_offset());
    let now_time = match at {
        Some(s) => parse_clock_time(s)
            .ok_or_else(|| anyhow!("Invalid time '{}'. Use 24-hour HH:MM, e.g. 06:00", s))?,
        None => now.time(),
    };

    let schedule = provider.schedule_for(conn, now.date())?;
    let status = resolve_status(&schedule, now_time);

    if json {
        println!("{}", serde_json::to_string(&status)?);
        return Ok(());
    }

    println!();
    println_colored!(
        GOLD,
        "  Current:    {} (since {})",
        status.current.display_name(),
        format_time(schedule.time_of(status.current))
    );
    println_colored!(
        BOLD,
        "  Next:       {} at {}",
        status.next.display_name(),
        format_time(schedule.time_of(status.next))
    );
    println_colored!(AMBER, "  Remaining:  {}", status.time_remaining);
    println!();
    Ok(())
}

// ─── Times ───────────────────────────────────────────────────────────────────

pub fn handle_times(
    conn: &Connection,
    config: &AppConfig,
    date: Option<&str>,
    prayer: Option<&str>,
) -> Result<()> {
    let now = now_in(config.clock_offset());
    let today = now.date();
    let date = match date {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .with_context(|| format!("Invalid date '{}'. Use YYYY-MM-DD", s))?,
        None => today,
    };
    let only = prayer
        .map(PrayerType::from_str)
        .transpose()
        .context("Use one of: fajr, dhuhr, asr, maghrib, isha")?;

    let provider = ScheduleProvider::from_config(config)?;
    let schedule = provider.schedule_for(conn, date)?;

    println!();
    match config.schedule.source {
        ScheduleSource::Fixed => {
            println_colored!(GOLD, "  Prayer Times — fixed schedule ({})", date);
        }
        ScheduleSource::Calculated => {
            println_colored!(
                GOLD,
                "  Prayer Times — {} ({}, {})",
                config.location.name,
                date,
                format_tz_offset(config.location.timezone_offset)
            );
        }
    }
    match hijri_string(date, config.location.hijri_offset) {
        Ok(hijri) => println_colored!(DIM, "  {}", hijri),
        Err(e) => log::warn!("Skipping Hijri date: {}", e),
    }
    println!();

    if date == today {
        print_today(&schedule, now.time(), only);
    } else {
        for (prayer, time) in visible_entries(&schedule, only) {
            println_colored!(BOLD, "    {:<10}  {}", prayer.display_name(), format_time(time));
        }
    }
    println!();
    Ok(())
}

/// The schedule's rows, narrowed to one prayer when `only` is set.
fn visible_entries(
    schedule: &PrayerSchedule,
    only: Option<PrayerType>,
) -> Vec<(PrayerType, NaiveTime)> {
    schedule
        .entries()
        .filter(|(prayer, _)| only.is_none_or(|wanted| wanted == *prayer))
        .collect()
}

fn print_today(schedule: &PrayerSchedule, now_time: NaiveTime, only: Option<PrayerType>) {
    let status = resolve_status(schedule, now_time);

    for (prayer, time) in visible_entries(schedule, only) {
        let time_str = format_time(time);
        if prayer == status.current {
            println_colored!(GREEN, "  ▸ {:<10}  {}  now", prayer.display_name(), time_str);
        } else if time < now_time {
            println_colored!(DIM, "    {:<10}  {}", prayer.display_name(), time_str);
        } else {
            println_colored!(BOLD, "    {:<10}  {}", prayer.display_name(), time_str);
        }
    }

    println!();
    match only {
        Some(prayer) => println_colored!(
            AMBER,
            "  {} in {}",
            prayer.display_name(),
            format_duration(schedule.time_of(prayer), now_time)
        ),
        None => println_colored!(
            AMBER,
            "  Next: {} in {}",
            status.next.display_name(),
            status.time_remaining
        ),
    }
}

// ─── Watch ───────────────────────────────────────────────────────────────────

pub fn handle_watch(
    conn: &Connection,
    config: &AppConfig,
    interval: Option<u64>,
    count: Option<u64>,
) -> Result<()> {
    let provider = ScheduleProvider::from_config(config)?;
    let secs = interval.unwrap_or(config.display.poll_interval_secs);
    if secs == 0 {
        bail!("Poll interval must be at least 1 second");
    }

    println_colored!(DIM, "  Checking every {}s. Ctrl-C to stop.", secs);
    println!();

    let ticker = Ticker::new(Duration::from_secs(secs), config.clock_offset());
    watch_loop(&provider, conn, ticker, count, |tick, status| {
        print!("{}  {}", DIM, tick.at.format("%H:%M"));
        print!("\x1b[0m  ");
        println_colored!(
            AMBER,
            "{} → {} in {}",
            status.current.display_name(),
            status.next.display_name(),
            status.time_remaining
        );
    })?;
    Ok(())
}

/// Resolve a status for every tick, handing each to `emit`. Stops after
/// `count` updates when set. Returns the number of updates emitted.
fn watch_loop<I, F>(
    provider: &ScheduleProvider,
    conn: &Connection,
    ticks: I,
    count: Option<u64>,
    mut emit: F,
) -> Result<u64>
where
    I: IntoIterator<Item = ClockTick>,
    F: FnMut(&ClockTick, &PrayerStatus),
{
    let mut day: Option<(NaiveDate, PrayerSchedule)> = None;
    let mut updates = 0u64;

    for tick in ticks {
        let loaded = day_schedule(provider, conn, day, tick.at.date())?;
        day = Some(loaded);

        let status = resolve_status(&loaded.1, tick.at.time());
        emit(&tick, &status);

        updates += 1;
        if count.is_some_and(|limit| updates >= limit) {
            break;
        }
    }
    Ok(updates)
}

/// Schedule for `date`, reusing `loaded` when it is already that day's.
fn day_schedule(
    provider: &ScheduleProvider,
    conn: &Connection,
    loaded: Option<(NaiveDate, PrayerSchedule)>,
    date: NaiveDate,
) -> Result<(NaiveDate, PrayerSchedule)> {
    if let Some(day) = loaded.filter(|(loaded_date, _)| *loaded_date == date) {
        return Ok(day);
    }
    let schedule = provider.schedule_for(conn, date)?;
    log::info!("Loaded prayer times for {}", date);
    Ok((date, schedule))
}

// ─── Cache ───────────────────────────────────────────────────────────────────

pub fn handle_cache(conn: &Connection, config: &AppConfig, action: &CacheCommands) -> Result<()> {
    match action {
        CacheCommands::Clear => {
            let removed = CacheRepo::clear_all(conn)?;
            println_colored!(GREEN, "  ✓ Cleared {} cached day(s)", removed);
        }
        CacheCommands::Fill { days } => {
            let provider = ScheduleProvider::from_config(config)?;
            let today = now_in(config.clock_offset()).date();
            provider.ensure_cached_from(conn, today, *days)?;
            let total = CacheRepo::count(conn)?;
            println_colored!(
                GREEN,
                "  ✓ Cached today + {} day(s) ({} day(s) stored)",
                days,
                total
            );
        }
    }
    Ok(())
}

// ─── Config ──────────────────────────────────────────────────────────────────

pub fn handle_config(config: &AppConfig, action: &ConfigCommands) -> Result<()> {
    match action {
        ConfigCommands::Show => {
            let path = AppConfig::config_path()?;
            if path.exists() {
                println_colored!(DIM, "# {}", path.display());
            } else {
                println_colored!(DIM, "# {} (not created, showing defaults)", path.display());
            }
            print!("{}", config.to_toml()?);
        }
        ConfigCommands::Path => {
            println!("{}", AppConfig::config_path()?.display());
        }
        ConfigCommands::Init { force } => {
            let path = AppConfig::config_path()?;
            if path.exists() && !force {
                println!(
                    "Config already exists at {}. Use --force to overwrite.",
                    path.display()
                );
                return Ok(());
            }
            let written = AppConfig::default().save()?;
            println_colored!(GREEN, "  ✓ Wrote default config to {}", written.display());
        }
    }
    Ok(())
}
