use anyhow::Result;
use rusqlite::{params, Connection, OptionalExtension};

use crate::prayer_times::PrayerSchedule;

// ─── Cached prayer times ────────────────────────────────────────────────────

/// One cached day, still in the raw "HH:MM" form it was stored in.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedDay {
    pub fingerprint: String,
    pub fajr: String,
    pub dhuhr: String,
    pub asr: String,
    pub maghrib: String,
    pub isha: String,
}

impl CachedDay {
    pub fn to_schedule(&self) -> Result<PrayerSchedule> {
        Ok(PrayerSchedule::parse(
            &self.fajr,
            &self.dhuhr,
            &self.asr,
            &self.maghrib,
            &self.isha,
        )?)
    }
}

pub struct CacheRepo;

impl CacheRepo {
    pub fn get_day(conn: &Connection, date: &str) -> Result<Option<CachedDay>> {
        let row = conn
            .query_row(
                "SELECT fingerprint, fajr, dhuhr, asr, maghrib, isha
                 FROM prayer_times_cache WHERE date = ?1",
                params![date],
                |row| {
                    Ok(CachedDay {
                        fingerprint: row.get(0)?,
                        fajr: row.get(1)?,
                        dhuhr: row.get(2)?,
                        asr: row.get(3)?,
                        maghrib: row.get(4)?,
                        isha: row.get(5)?,
                    })
                },
            )
            .optional()?;
        Ok(row)
    }

    pub fn store_day(
        conn: &Connection,
        date: &str,
        fingerprint: &str,
        schedule: &PrayerSchedule,
    ) -> Result<()> {
        let [fajr, dhuhr, asr, maghrib, isha] = schedule.to_strings();
        conn.execute(
            "INSERT OR REPLACE INTO prayer_times_cache
                 (date, fingerprint, fajr, dhuhr, asr, maghrib, isha)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![date, fingerprint, fajr, dhuhr, asr, maghrib, isha],
        )?;
        Ok(())
    }

    /// Returns the number of rows removed.
    pub fn clear_all(conn: &Connection) -> Result<usize> {
        let removed = conn.execute("DELETE FROM prayer_times_cache", [])?;
        Ok(removed)
    }

    pub fn count(conn: &Connection) -> Result<i64> {
        let n = conn.query_row("SELECT COUNT(*) FROM prayer_times_cache", [], |row| row.get(0))?;
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;

    fn open() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    #[test]
    fn test_store_and_read_back() {
        let conn = open();
        let schedule = PrayerSchedule::parse("05:30", "13:00", "16:30", "18:45", "20:15").unwrap();
        CacheRepo::store_day(&conn, "2026-10-19", "fixed", &schedule).unwrap();

        let day = CacheRepo::get_day(&conn, "2026-10-19").unwrap().unwrap();
        assert_eq!(day.fingerprint, "fixed");
        assert_eq!(day.maghrib, "18:45");
        assert_eq!(day.to_schedule().unwrap(), schedule);

        assert!(CacheRepo::get_day(&conn, "2026-10-20").unwrap().is_none());
    }

    #[test]
    fn test_store_replaces_existing_day() {
        let conn = open();
        let first = PrayerSchedule::parse("05:30", "13:00", "16:30", "18:45", "20:15").unwrap();
        let second = PrayerSchedule::parse("05:10", "12:40", "16:00", "18:20", "19:35").unwrap();
        CacheRepo::store_day(&conn, "2026-10-19", "a", &first).unwrap();
        CacheRepo::store_day(&conn, "2026-10-19", "b", &second).unwrap();

        assert_eq!(CacheRepo::count(&conn).unwrap(), 1);
        let day = CacheRepo::get_day(&conn, "2026-10-19").unwrap().unwrap();
        assert_eq!(day.fingerprint, "b");
        assert_eq!(day.to_schedule().unwrap(), second);
    }

    #[test]
    fn test_corrupt_row_fails_to_parse() {
        let conn = open();
        conn.execute(
            "INSERT INTO prayer_times_cache (date, fingerprint, fajr, dhuhr, asr, maghrib, isha)
             VALUES ('2026-10-19', 'fixed', '5:30', '13:00', '16:30', '18:45', '20:15')",
            [],
        )
        .unwrap();
        let day = CacheRepo::get_day(&conn, "2026-10-19").unwrap().unwrap();
        assert!(day.to_schedule().is_err());
    }

    #[test]
    fn test_clear_all() {
        let conn = open();
        let schedule = PrayerSchedule::parse("05:30", "13:00", "16:30", "18:45", "20:15").unwrap();
        CacheRepo::store_day(&conn, "2026-10-19", "fixed", &schedule).unwrap();
        CacheRepo::store_day(&conn, "2026-10-20", "fixed", &schedule).unwrap();
        assert_eq!(CacheRepo::clear_all(&conn).unwrap(), 2);
        assert_eq!(CacheRepo::count(&conn).unwrap(), 0);
    }
}
