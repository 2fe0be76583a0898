use anyhow::Result;
use rusqlite::Connection;

pub fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute_batch("
        CREATE TABLE IF NOT EXISTS prayer_times_cache (
            date         TEXT PRIMARY KEY,
            fingerprint  TEXT NOT NULL,
            fajr         TEXT NOT NULL,
            dhuhr        TEXT NOT NULL,
            asr          TEXT NOT NULL,
            maghrib      TEXT NOT NULL,
            isha         TEXT NOT NULL,
            cached_at    TEXT DEFAULT (datetime('now'))
        );
    ")?;
    Ok(())
}
