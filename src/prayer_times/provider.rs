use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate};
use rusqlite::Connection;

use crate::config::{AppConfig, ScheduleSource};
use crate::db::repository::CacheRepo;
use crate::prayer_times::calculator::PrayerCalculator;
use crate::prayer_times::schedule::PrayerSchedule;

/// Supplies the day's prayer times, either straight from config or from the
/// calculator, and keeps a per-day copy in the local cache.
#[derive(Debug, Clone)]
pub enum ScheduleProvider {
    Fixed(PrayerSchedule),
    Calculated(PrayerCalculator),
}

impl ScheduleProvider {
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        match config.schedule.source {
            ScheduleSource::Fixed => {
                let f = &config.schedule.fixed;
                let schedule = PrayerSchedule::parse(&f.fajr, &f.dhuhr, &f.asr, &f.maghrib, &f.isha)
                    .context("Invalid [schedule.fixed] times in config")?;
                Ok(Self::Fixed(schedule))
            }
            ScheduleSource::Calculated => {
                let calc = PrayerCalculator::from_location(&config.location)
                    .context("Invalid [location] settings in config")?;
                Ok(Self::Calculated(calc))
            }
        }
    }

    pub fn fingerprint(&self) -> String {
        match self {
            Self::Fixed(schedule) => format!("fixed:{}", schedule.to_strings().join(",")),
            Self::Calculated(calc) => calc.fingerprint(),
        }
    }

    fn compute(&self, date: NaiveDate) -> Result<PrayerSchedule> {
        match self {
            Self::Fixed(schedule) => Ok(*schedule),
            Self::Calculated(calc) => calc.times_for_date(date),
        }
    }

    /// Cached schedule for `date`, computing and storing it on a miss.
    ///
    /// Rows written under different settings are treated as misses.
    pub fn schedule_for(&self, conn: &Connection, date: NaiveDate) -> Result<PrayerSchedule> {
        let date_str = date.format("%Y-%m-%d").to_string();
        let fingerprint = self.fingerprint();

        if let Some(cached) = CacheRepo::get_day(conn, &date_str)? {
            if cached.fingerprint == fingerprint {
                log::debug!("Prayer times for {} served from cache", date_str);
                return cached
                    .to_schedule()
                    .with_context(|| format!("Cached prayer times for {} are invalid", date_str));
            }
            log::warn!(
                "Ignoring cached prayer times for {} written under different settings ({})",
                date_str,
                cached.fingerprint
            );
        }

        let schedule = self.compute(date)?;
        CacheRepo::store_day(conn, &date_str, &fingerprint, &schedule)?;
        log::info!("Cached prayer times for {}", date_str);
        Ok(schedule)
    }

    /// Ensure the cache holds `start` through `days_ahead` days after it.
    pub fn ensure_cached_from(
        &self,
        conn: &Connection,
        start: NaiveDate,
        days_ahead: u32,
    ) -> Result<()> {
        for i in 0..=(days_ahead as i64) {
            self.schedule_for(conn, start + Duration::days(i))?;
        }
        Ok(())
    }
}
