use anyhow::{anyhow, bail, Context, Result};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, Utc};
use salah::prelude::{
    Configuration, Coordinates, Madhab, Method, Prayer, PrayerSchedule as SalahSchedule,
};
use std::panic::{self, AssertUnwindSafe};

use crate::config::settings::LocationConfig;
use crate::prayer_times::schedule::PrayerSchedule;

/// Offline astronomical calculation for one location.
#[derive(Debug, Clone)]
pub struct PrayerCalculator {
    pub lat: f64,
    pub lng: f64,
    pub method_str: String,
    pub madhab_str: String,
    pub tz_offset_minutes: i32,
}

impl PrayerCalculator {
    pub fn new(
        lat: f64,
        lng: f64,
        method: &str,
        madhab: &str,
        tz_offset_minutes: i32,
    ) -> Result<Self> {
        if !(-90.0..=90.0).contains(&lat) {
            bail!("Latitude {} is out of range (-90 to 90)", lat);
        }
        if !(-180.0..=180.0).contains(&lng) {
            bail!("Longitude {} is out of range (-180 to 180)", lng);
        }
        // Validate method + madhab early
        parse_method(method)?;
        parse_madhab(madhab)?;
        FixedOffset::east_opt(tz_offset_minutes * 60)
            .ok_or_else(|| anyhow!("Invalid timezone offset: {}", tz_offset_minutes))?;
        Ok(Self {
            lat,
            lng,
            method_str: method.to_string(),
            madhab_str: madhab.to_string(),
            tz_offset_minutes,
        })
    }

    pub fn from_location(location: &LocationConfig) -> Result<Self> {
        Self::new(
            location.latitude,
            location.longitude,
            &location.calc_method,
            &location.madhab,
            location.timezone_offset,
        )
    }

    /// Identifies the settings that produced a cached day.
    pub fn fingerprint(&self) -> String {
        format!(
            "calculated:{:.4},{:.4}:{}:{}:{}",
            self.lat, self.lng, self.method_str, self.madhab_str, self.tz_offset_minutes
        )
    }

    pub fn times_for_date(&self, date: NaiveDate) -> Result<PrayerSchedule> {
        let coords = Coordinates::new(self.lat, self.lng);
        let method = parse_method(&self.method_str)?;
        let madhab = parse_madhab(&self.madhab_str)?;
        let params = Configuration::with(method, madhab);

        // salah unwraps internally when twilight never reaches the method's
        // angle (high latitudes around the summer solstice).
        let previous_hook = panic::take_hook();
        panic::set_hook(Box::new(|_| {}));
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            SalahSchedule::new()
                .on(date)
                .for_location(coords)
                .with_configuration(params)
                .calculate()
        }));
        panic::set_hook(previous_hook);

        let times = match outcome {
            Ok(result) => result.map_err(|e| anyhow!("Prayer calculation failed: {}", e))?,
            Err(_) => bail!(
                "Prayer times cannot be calculated for ({}, {}) on {} with {}: \
                 twilight does not reach the method's angle at this latitude. \
                 Use a lower-latitude method or a fixed schedule",
                self.lat,
                self.lng,
                date,
                self.method_str
            ),
        };

        let offset = FixedOffset::east_opt(self.tz_offset_minutes * 60)
            .ok_or_else(|| anyhow!("Invalid timezone offset: {}", self.tz_offset_minutes))?;

        let to_local = |utc: DateTime<Utc>| -> NaiveTime { utc.with_timezone(&offset).time() };

        log::debug!("Calculated prayer times for {} ({})", date, self.fingerprint());

        PrayerSchedule::new([
            to_local(times.time(Prayer::Fajr)),
            to_local(times.time(Prayer::Dhuhr)),
            to_local(times.time(Prayer::Asr)),
            to_local(times.time(Prayer::Maghrib)),
            to_local(times.time(Prayer::Isha)),
        ])
        .with_context(|| {
            format!(
                "Calculated times for {} at ({}, {}) do not form a valid day; \
                 check the timezone offset",
                date, self.lat, self.lng
            )
        })
    }
}

fn parse_method(s: &str) -> Result<Method> {
    match s {
        "MuslimWorldLeague" => Ok(Method::MuslimWorldLeague),
        "Egyptian" => Ok(Method::Egyptian),
        "Karachi" => Ok(Method::Karachi),
        "UmmAlQura" => Ok(Method::UmmAlQura),
        "Dubai" => Ok(Method::Dubai),
        "MoonsightingCommittee" => Ok(Method::MoonsightingCommittee),
        "NorthAmerica" => Ok(Method::NorthAmerica),
        "Kuwait" => Ok(Method::Kuwait),
        "Qatar" => Ok(Method::Qatar),
        "Singapore" => Ok(Method::Singapore),
        "Tehran" => Ok(Method::Tehran),
        "Turkey" => Ok(Method::Turkey),
        "Other" => Ok(Method::Other),
        _ => Err(anyhow!(
            "Unknown calculation method: '{}'. Expected one of: {}",
            s,
            CALC_METHODS.join(", ")
        )),
    }
}

fn parse_madhab(s: &str) -> Result<Madhab> {
    match s {
        "Hanafi" => Ok(Madhab::Hanafi),
        "Shafi" | "Shafi'i" => Ok(Madhab::Shafi),
        _ => Err(anyhow!("Unknown madhab: '{}'", s)),
    }
}

pub const CALC_METHODS: &[&str] = &[
    "MuslimWorldLeague",
    "Egyptian",
    "Karachi",
    "UmmAlQura",
    "Dubai",
    "MoonsightingCommittee",
    "NorthAmerica",
    "Kuwait",
    "Qatar",
    "Singapore",
    "Tehran",
    "Turkey",
    "Other",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_unknown_method_and_madhab() {
        assert!(PrayerCalculator::new(3.1, 101.7, "Lunar", "Shafi", 480).is_err());
        assert!(PrayerCalculator::new(3.1, 101.7, "Singapore", "Maliki", 480).is_err());
    }

    #[test]
    fn test_rejects_impossible_offset() {
        assert!(PrayerCalculator::new(3.1, 101.7, "Singapore", "Shafi", 24 * 60).is_err());
    }

    #[test]
    fn test_rejects_out_of_range_coordinates() {
        assert!(PrayerCalculator::new(91.0, 0.0, "Singapore", "Shafi", 0).is_err());
        assert!(PrayerCalculator::new(-90.5, 0.0, "Singapore", "Shafi", 0).is_err());
        assert!(PrayerCalculator::new(0.0, 180.5, "Singapore", "Shafi", 0).is_err());
        assert!(PrayerCalculator::new(0.0, -181.0, "Singapore", "Shafi", 0).is_err());
        assert!(PrayerCalculator::new(90.0, -180.0, "Singapore", "Shafi", 0).is_ok());
    }

    #[test]
    fn test_summer_solstice_in_london_is_an_error() {
        let calc = PrayerCalculator::new(51.5, -0.12, "MuslimWorldLeague", "Shafi", 60).unwrap();
        let date = NaiveDate::from_ymd_opt(2026, 6, 21).unwrap();
        let err = calc.times_for_date(date).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("2026-06-21"), "{msg}");
        assert!(msg.contains("latitude"), "{msg}");
    }

    #[test]
    fn test_polar_summer_is_an_error() {
        let calc = PrayerCalculator::new(69.65, 18.96, "MuslimWorldLeague", "Shafi", 120).unwrap();
        let date = NaiveDate::from_ymd_opt(2026, 6, 21).unwrap();
        assert!(calc.times_for_date(date).is_err());
    }

    #[test]
    fn test_every_listed_method_parses() {
        for method in CALC_METHODS {
            assert!(parse_method(method).is_ok(), "{method}");
        }
    }

    #[test]
    fn test_calculated_day_is_ordered() {
        let calc = PrayerCalculator::new(3.139, 101.6869, "Singapore", "Shafi", 480).unwrap();
        let date = NaiveDate::from_ymd_opt(2026, 3, 20).unwrap();
        // Building the schedule already enforces the ordering.
        let schedule = calc.times_for_date(date).unwrap();
        let fajr = schedule.time_of(crate::models::PrayerType::Fajr);
        let isha = schedule.time_of(crate::models::PrayerType::Isha);
        assert!(fajr < NaiveTime::from_hms_opt(7, 0, 0).unwrap());
        assert!(isha > NaiveTime::from_hms_opt(19, 0, 0).unwrap());
    }

    #[test]
    fn test_fingerprint_tracks_settings() {
        let a = PrayerCalculator::new(3.139, 101.6869, "Singapore", "Shafi", 480).unwrap();
        let b = PrayerCalculator::new(3.139, 101.6869, "Singapore", "Hanafi", 480).unwrap();
        assert_ne!(a.fingerprint(), b.fingerprint());
    }
}
