pub mod prayer;

pub use prayer::{PrayerStatus, PrayerType};
