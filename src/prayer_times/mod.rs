pub mod calculator;
pub mod provider;
pub mod resolver;
pub mod schedule;

pub use provider::ScheduleProvider;
pub use resolver::resolve_status;
pub use schedule::PrayerSchedule;
