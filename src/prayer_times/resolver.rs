use chrono::{Duration, NaiveTime, Timelike};

use crate::models::{PrayerStatus, PrayerType};
use crate::prayer_times::schedule::PrayerSchedule;

fn minutes_since_midnight(t: NaiveTime) -> u32 {
    t.hour() * 60 + t.minute()
}

/// Work out which prayer window `now` falls in, which prayer comes next, and
/// how long until it starts.
///
/// Windows are half-open: a prayer's own start minute belongs to it. Anything
/// before Fajr is still last night's Isha.
pub fn resolve_status(schedule: &PrayerSchedule, now: NaiveTime) -> PrayerStatus {
    let now_min = minutes_since_midnight(now);

    let current = schedule
        .entries()
        .take_while(|(_, start)| minutes_since_midnight(*start) <= now_min)
        .last()
        .map(|(prayer, _)| prayer)
        .unwrap_or(PrayerType::Isha);
    let next = current.next();

    PrayerStatus {
        current,
        next,
        time_remaining: format_duration(schedule.time_of(next), now),
    }
}

/// Time from `now` until the next occurrence of the clock time `target`.
/// A target at or before `now` is taken to be tomorrow's.
pub fn time_until(target: NaiveTime, now: NaiveTime) -> Duration {
    let diff = target.signed_duration_since(now);
    if target <= now {
        diff + Duration::days(1)
    } else {
        diff
    }
}

/// Render the gap until `target` as "{h}h {m}m", dropping seconds.
pub fn format_duration(target: NaiveTime, now: NaiveTime) -> String {
    let total_minutes = time_until(target, now).num_minutes();
    format!("{}h {}m", total_minutes / 60, total_minutes % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn demo_schedule() -> PrayerSchedule {
        PrayerSchedule::parse("05:30", "13:00", "16:30", "18:45", "20:15").unwrap()
    }

    fn check(now: NaiveTime, current: PrayerType, next: PrayerType, remaining: &str) {
        let status = resolve_status(&demo_schedule(), now);
        assert_eq!(status.current, current, "current at {now}");
        assert_eq!(status.next, next, "next at {now}");
        assert_eq!(status.time_remaining, remaining, "remaining at {now}");
    }

    #[test]
    fn test_morning_is_fajr_window() {
        check(hm(6, 0), PrayerType::Fajr, PrayerType::Dhuhr, "7h 0m");
    }

    #[test]
    fn test_boundary_belongs_to_starting_prayer() {
        check(hm(13, 0), PrayerType::Dhuhr, PrayerType::Asr, "3h 30m");
        check(hm(5, 30), PrayerType::Fajr, PrayerType::Dhuhr, "7h 30m");
        check(hm(20, 15), PrayerType::Isha, PrayerType::Fajr, "9h 15m");
    }

    #[test]
    fn test_minute_before_boundary_is_previous_window() {
        check(hm(16, 29), PrayerType::Dhuhr, PrayerType::Asr, "0h 1m");
        check(hm(5, 29), PrayerType::Isha, PrayerType::Fajr, "0h 1m");
    }

    #[test]
    fn test_late_evening_wraps_to_tomorrows_fajr() {
        check(hm(23, 50), PrayerType::Isha, PrayerType::Fajr, "5h 40m");
    }

    #[test]
    fn test_after_midnight_is_still_isha() {
        check(hm(4, 0), PrayerType::Isha, PrayerType::Fajr, "1h 30m");
        check(hm(0, 0), PrayerType::Isha, PrayerType::Fajr, "5h 30m");
    }

    #[test]
    fn test_seconds_round_remaining_down() {
        let now = NaiveTime::from_hms_opt(6, 0, 30).unwrap();
        check(now, PrayerType::Fajr, PrayerType::Dhuhr, "6h 59m");
    }

    #[test]
    fn test_next_is_successor_for_every_minute() {
        let schedule = demo_schedule();
        for minute in 0..24 * 60 {
            let now = hm(minute / 60, minute % 60);
            let status = resolve_status(&schedule, now);
            assert_eq!(status.next, status.current.next(), "at {now}");

            let until = time_until(schedule.time_of(status.next), now);
            assert!(until > Duration::zero(), "at {now}");
            assert!(until <= Duration::days(1), "at {now}");
        }
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let schedule = demo_schedule();
        let now = hm(17, 42);
        assert_eq!(resolve_status(&schedule, now), resolve_status(&schedule, now));
    }

    #[test]
    fn test_schedule_touching_midnight() {
        let schedule = PrayerSchedule::parse("00:00", "06:00", "12:00", "18:00", "23:59").unwrap();
        let at_midnight = resolve_status(&schedule, hm(0, 0));
        assert_eq!(at_midnight.current, PrayerType::Fajr);

        let late = resolve_status(&schedule, hm(23, 59));
        assert_eq!(late.current, PrayerType::Isha);
        assert_eq!(late.next, PrayerType::Fajr);
        assert_eq!(late.time_remaining, "0h 1m");
    }

    #[test]
    fn test_format_duration_rolls_over_to_next_day() {
        assert_eq!(format_duration(hm(5, 30), hm(5, 30)), "24h 0m");
        assert_eq!(format_duration(hm(5, 30), hm(5, 31)), "23h 59m");
        assert_eq!(format_duration(hm(13, 5), hm(13, 0)), "0h 5m");
    }
}
