use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrayerType {
    Fajr,
    Dhuhr,
    Asr,
    Maghrib,
    Isha,
}

impl PrayerType {
    /// All five prayers in cyclic order, starting at Fajr.
    pub const ALL: [PrayerType; 5] = [
        PrayerType::Fajr,
        PrayerType::Dhuhr,
        PrayerType::Asr,
        PrayerType::Maghrib,
        PrayerType::Isha,
    ];

    pub fn index(self) -> usize {
        match self {
            PrayerType::Fajr => 0,
            PrayerType::Dhuhr => 1,
            PrayerType::Asr => 2,
            PrayerType::Maghrib => 3,
            PrayerType::Isha => 4,
        }
    }

    /// Cyclic successor: Isha is followed by the next day's Fajr.
    pub fn next(self) -> PrayerType {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PrayerType::Fajr => "Fajr",
            PrayerType::Dhuhr => "Dhuhr",
            PrayerType::Asr => "Asr",
            PrayerType::Maghrib => "Maghrib",
            PrayerType::Isha => "Isha",
        }
    }
}

impl std::fmt::Display for PrayerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for PrayerType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fajr" => Ok(PrayerType::Fajr),
            "dhuhr" | "zuhr" | "dhuhur" => Ok(PrayerType::Dhuhr),
            "asr" => Ok(PrayerType::Asr),
            "maghrib" => Ok(PrayerType::Maghrib),
            "isha" => Ok(PrayerType::Isha),
            _ => Err(anyhow::anyhow!("Unknown prayer type: {}", s)),
        }
    }
}

/// Where the clock currently sits in the day's prayer cycle.
///
/// Derived on every poll and handed to the display layer as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrayerStatus {
    pub current: PrayerType,
    pub next: PrayerType,
    pub time_remaining: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_is_cyclic() {
        assert_eq!(PrayerType::Fajr.next(), PrayerType::Dhuhr);
        assert_eq!(PrayerType::Maghrib.next(), PrayerType::Isha);
        assert_eq!(PrayerType::Isha.next(), PrayerType::Fajr);
    }

    #[test]
    fn test_from_str_accepts_aliases() {
        assert_eq!("Zuhr".parse::<PrayerType>().unwrap(), PrayerType::Dhuhr);
        assert_eq!("dhuhur".parse::<PrayerType>().unwrap(), PrayerType::Dhuhr);
        assert_eq!("ISHA".parse::<PrayerType>().unwrap(), PrayerType::Isha);
        assert!("tahajjud".parse::<PrayerType>().is_err());
    }

    #[test]
    fn test_status_serializes_with_camel_case_keys() {
        let status = PrayerStatus {
            current: PrayerType::Isha,
            next: PrayerType::Fajr,
            time_remaining: "5h 40m".to_string(),
        };
        let json = serde_json::to_string(&status).unwrap();
        assert_eq!(
            json,
            r#"{"current":"isha","next":"fajr","timeRemaining":"5h 40m"}"#
        );
    }
}
