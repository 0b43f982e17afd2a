use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{CalendarSystem, PrayerKey};

/// One side (Hijri or Gregorian) of a day record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateParts {
    pub day: u32,
    pub month: u32,
    pub year: i32,
    #[serde(default)]
    pub month_name: String,
    #[serde(default)]
    pub day_name: String,
}

impl DateParts {
    pub fn ymd(&self) -> (i32, u32, u32) {
        (self.year, self.month, self.day)
    }
}

/// Raw "HH:MM" strings as the backend sends them. Any field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrayerTimes {
    #[serde(default)]
    pub fajr: Option<String>,
    #[serde(default)]
    pub sunrise: Option<String>,
    #[serde(default, alias = "zuhr")]
    pub dhuhr: Option<String>,
    #[serde(default)]
    pub asr: Option<String>,
    #[serde(default)]
    pub maghrib: Option<String>,
    #[serde(default)]
    pub isha: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sunset: Option<String>,
}

impl PrayerTimes {
    pub fn get(&self, key: PrayerKey) -> Option<&str> {
        let field = match key {
            PrayerKey::Fajr => &self.fajr,
            PrayerKey::Sunrise => &self.sunrise,
            PrayerKey::Dhuhr => &self.dhuhr,
            PrayerKey::Asr => &self.asr,
            PrayerKey::Maghrib => &self.maghrib,
            PrayerKey::Isha => &self.isha,
        };
        field.as_deref()
    }

    /// (key, raw string) pairs in the fixed daily order.
    pub fn entries(&self) -> Vec<(PrayerKey, Option<&str>)> {
        PrayerKey::all()
            .into_iter()
            .map(|k| (k, self.get(k)))
            .collect()
    }
}

/// One calendar day as returned by the backend for a month query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayRecord {
    pub hijri: DateParts,
    pub gregorian: DateParts,
    #[serde(default)]
    pub prayer_times: PrayerTimes,
}

impl DayRecord {
    pub fn parts(&self, system: CalendarSystem) -> &DateParts {
        match system {
            CalendarSystem::Hijri => &self.hijri,
            CalendarSystem::Gregorian => &self.gregorian,
        }
    }

    pub fn parts_mut(&mut self, system: CalendarSystem) -> &mut DateParts {
        match system {
            CalendarSystem::Hijri => &mut self.hijri,
            CalendarSystem::Gregorian => &mut self.gregorian,
        }
    }

    pub fn gregorian_date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.gregorian.year, self.gregorian.month, self.gregorian.day)
    }
}
