use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use chrono::{FixedOffset, Local, NaiveDateTime, Utc};

/// A wall-clock sample taken when the tick fired.
#[derive(Debug, Clone, Copy)]
pub struct ClockTick {
    pub at: NaiveDateTime,
}

/// Wall-clock time in `offset`, or in the system zone when there is none.
pub fn now_in(offset: Option<FixedOffset>) -> NaiveDateTime {
    match offset {
        Some(offset) => Utc::now().with_timezone(&offset).naive_local(),
        None => Local::now().naive_local(),
    }
}

/// Emits a `ClockTick` immediately and then once per `interval`.
///
/// The sampling thread exits once the receiving side is dropped.
pub struct Ticker {
    rx: mpsc::Receiver<ClockTick>,
}

impl Ticker {
    pub fn new(interval: Duration, offset: Option<FixedOffset>) -> Self {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || loop {
            let tick = ClockTick {
                at: now_in(offset),
            };
            if tx.send(tick).is_err() {
                log::debug!("Ticker receiver dropped, stopping");
                break;
            }
            thread::sleep(interval);
        });

        Self { rx }
    }
}

impl Iterator for Ticker {
    type Item = ClockTick;

    fn next(&mut self) -> Option<ClockTick> {
        self.rx.recv().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticks_arrive_in_order() {
        let mut ticker = Ticker::new(Duration::from_millis(5), None);
        let first = ticker.next().unwrap();
        let second = ticker.next().unwrap();
        assert!(second.at >= first.at);
    }

    #[test]
    fn test_now_in_uses_given_offset() {
        let offset = FixedOffset::east_opt(5 * 3600 + 30 * 60).unwrap();
        let expected = Utc::now().naive_utc() + chrono::Duration::minutes(330);
        let sampled = now_in(Some(offset));
        let drift = (sampled - expected).num_seconds().abs();
        assert!(drift < 5, "drift {drift}s");
    }
}
