use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The six daily events in their fixed order. Sunrise is a boundary marker,
/// not a prayer, but it takes part in the same sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrayerKey {
    Fajr,
    Sunrise,
    Dhuhr,
    Asr,
    Maghrib,
    Isha,
}

impl PrayerKey {
    pub fn all() -> [PrayerKey; 6] {
        [
            PrayerKey::Fajr,
            PrayerKey::Sunrise,
            PrayerKey::Dhuhr,
            PrayerKey::Asr,
            PrayerKey::Maghrib,
            PrayerKey::Isha,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PrayerKey::Fajr => "fajr",
            PrayerKey::Sunrise => "sunrise",
            PrayerKey::Dhuhr => "dhuhr",
            PrayerKey::Asr => "asr",
            PrayerKey::Maghrib => "maghrib",
            PrayerKey::Isha => "isha",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PrayerKey::Fajr => "Fajr",
            PrayerKey::Sunrise => "Sunrise",
            PrayerKey::Dhuhr => "Dhuhr",
            PrayerKey::Asr => "Asr",
            PrayerKey::Maghrib => "Maghrib",
            PrayerKey::Isha => "Isha",
        }
    }

    pub fn is_prayer(&self) -> bool {
        *self != PrayerKey::Sunrise
    }
}

impl std::fmt::Display for PrayerKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for PrayerKey {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fajr" => Ok(PrayerKey::Fajr),
            "sunrise" | "shuruq" => Ok(PrayerKey::Sunrise),
            "dhuhr" | "zuhr" | "dhuhur" => Ok(PrayerKey::Dhuhr),
            "asr" => Ok(PrayerKey::Asr),
            "maghrib" => Ok(PrayerKey::Maghrib),
            "isha" => Ok(PrayerKey::Isha),
            _ => Err(anyhow::anyhow!("Unknown prayer: {}", s)),
        }
    }
}

/// A named event pinned to a concrete local date-time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrayerWindow {
    pub key: PrayerKey,
    pub instant: NaiveDateTime,
}

/// Snapshot produced by the resolver for one evaluation instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedWindowState {
    /// `None` before the first window of the day, or when there is no data.
    pub current: Option<PrayerWindow>,
    /// `None` only when no prayer field could be used at all.
    pub next: Option<PrayerWindow>,
    pub remaining_seconds: u64,
    pub progress_fraction: f64,
}

impl ResolvedWindowState {
    pub fn empty() -> Self {
        Self {
            current: None,
            next: None,
            remaining_seconds: 0,
            progress_fraction: 0.0,
        }
    }

    pub fn has_data(&self) -> bool {
        self.next.is_some()
    }

    /// Remaining time as "HH:MM:SS", or "--:--:--" when there is no data.
    pub fn countdown(&self) -> String {
        if !self.has_data() {
            return crate::utils::format::NO_COUNTDOWN.to_string();
        }
        crate::utils::format::format_hms(self.remaining_seconds)
    }
}
