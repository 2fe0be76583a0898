use chrono::{NaiveTime, Timelike};
use thiserror::Error;

use crate::models::PrayerType;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("invalid time '{value}' for {prayer}: expected zero-padded 24-hour HH:MM")]
    MalformedTime { prayer: PrayerType, value: String },

    #[error("{later} ({later_time}) must come after {earlier} ({earlier_time})")]
    OutOfOrder {
        earlier: PrayerType,
        earlier_time: String,
        later: PrayerType,
        later_time: String,
    },
}

/// The five prayer times for one calendar day.
///
/// Times carry hour and minute only and are strictly increasing from Fajr to
/// Isha. The constructors are the only way in, so anything holding a
/// `PrayerSchedule` can rely on the ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrayerSchedule {
    times: [NaiveTime; 5],
}

impl PrayerSchedule {
    /// Build from already-parsed times, indexed in `PrayerType::ALL` order.
    /// Seconds are dropped.
    pub fn new(times: [NaiveTime; 5]) -> Result<Self, ScheduleError> {
        let times = times.map(truncate_to_minute);
        for (i, pair) in times.windows(2).enumerate() {
            if pair[1] <= pair[0] {
                return Err(ScheduleError::OutOfOrder {
                    earlier: PrayerType::ALL[i],
                    earlier_time: pair[0].format("%H:%M").to_string(),
                    later: PrayerType::ALL[i + 1],
                    later_time: pair[1].format("%H:%M").to_string(),
                });
            }
        }
        Ok(Self { times })
    }

    /// Parse the upstream `HH:MM` form, one string per prayer.
    pub fn parse(
        fajr: &str,
        dhuhr: &str,
        asr: &str,
        maghrib: &str,
        isha: &str,
    ) -> Result<Self, ScheduleError> {
        let raw = [fajr, dhuhr, asr, maghrib, isha];
        let mut times = [NaiveTime::MIN; 5];
        for (slot, (prayer, value)) in times.iter_mut().zip(PrayerType::ALL.iter().zip(raw)) {
            *slot = parse_hhmm(*prayer, value)?;
        }
        Self::new(times)
    }

    pub fn time_of(&self, prayer: PrayerType) -> NaiveTime {
        self.times[prayer.index()]
    }

    /// `(prayer, time)` pairs in cyclic order starting at Fajr.
    pub fn entries(&self) -> impl Iterator<Item = (PrayerType, NaiveTime)> + '_ {
        PrayerType::ALL.into_iter().zip(self.times.iter().copied())
    }

    pub fn to_strings(&self) -> [String; 5] {
        self.times.map(|t| t.format("%H:%M").to_string())
    }
}

fn truncate_to_minute(t: NaiveTime) -> NaiveTime {
    NaiveTime::from_hms_opt(t.hour(), t.minute(), 0).unwrap_or(t)
}

fn parse_hhmm(prayer: PrayerType, value: &str) -> Result<NaiveTime, ScheduleError> {
    parse_clock_time(value).ok_or_else(|| ScheduleError::MalformedTime {
        prayer,
        value: value.to_string(),
    })
}

/// Strict "HH:MM": two digits, colon, two digits, 24-hour clock.
pub fn parse_clock_time(value: &str) -> Option<NaiveTime> {
    let bytes = value.as_bytes();
    let shape_ok = bytes.len() == 5
        && bytes[2] == b':'
        && [0, 1, 3, 4].iter().all(|&i| bytes[i].is_ascii_digit());
    if !shape_ok {
        return None;
    }

    let hour: u32 = value[0..2].parse().ok()?;
    let minute: u32 = value[3..5].parse().ok()?;
    NaiveTime::from_hms_opt(hour, minute, 0)
}
