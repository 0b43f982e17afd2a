//! Decoding of backend month responses into day records.
//!
//! Transport is not handled here: callers hand in the response body, however
//! it was obtained (saved file, stdin, another client).

use serde::Deserialize;

use crate::error::SourceError;
use crate::models::{CalendarSystem, DayRecord, MonthKey};

#[derive(Deserialize)]
#[serde(untagged)]
enum MonthResponse {
    Wrapped { data: Vec<DayRecord> },
    Bare(Vec<DayRecord>),
}

/// Parse a month response: either a bare array or `{ "data": [...] }`.
pub fn parse_month(json: &str) -> Result<Vec<DayRecord>, SourceError> {
    let records = match serde_json::from_str::<MonthResponse>(json) {
        Ok(MonthResponse::Wrapped { data }) => data,
        Ok(MonthResponse::Bare(data)) => data,
        // Untagged errors are opaque; retry strictly for a useful message.
        Err(_) => serde_json::from_str::<Vec<DayRecord>>(json)?,
    };
    if records.is_empty() {
        return Err(SourceError::Empty);
    }
    Ok(records)
}

/// The month a response describes in `system`, checking every record agrees.
pub fn month_of(records: &[DayRecord], system: CalendarSystem) -> Result<MonthKey, SourceError> {
    let first = records.first().ok_or(SourceError::Empty)?;
    let key = MonthKey::of_record(first, system);
    for (index, record) in records.iter().enumerate() {
        let found = MonthKey::of_record(record, system);
        if found != key {
            return Err(SourceError::MixedMonths {
                index,
                expected: key.to_string(),
                found: found.to_string(),
            });
        }
    }
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PrayerKey;

    const DAY: &str = r#"{
        "hijri": {"day": 1, "month": 9, "year": 1447, "monthName": "Ramadan", "dayName": "Al Arba'a"},
        "gregorian": {"day": 18, "month": 2, "year": 2026, "monthName": "February", "dayName": "Wednesday"},
        "prayerTimes": {"fajr": "05:12", "sunrise": "06:30", "dhuhr": "12:23", "asr": "15:39",
                        "maghrib": "18:14", "isha": "19:44", "sunset": "18:14"}
    }"#;

    #[test]
    fn parses_bare_and_wrapped_responses() {
        let bare = parse_month(&format!("[{}]", DAY)).unwrap();
        let wrapped = parse_month(&format!(r#"{{"code": 200, "data": [{}]}}"#, DAY)).unwrap();
        assert_eq!(bare, wrapped);
        assert_eq!(bare[0].hijri.month_name, "Ramadan");
        assert_eq!(bare[0].prayer_times.get(PrayerKey::Asr), Some("15:39"));
        assert_eq!(bare[0].prayer_times.sunset.as_deref(), Some("18:14"));
    }

    #[test]
    fn missing_prayer_fields_are_tolerated() {
        let json = r#"[{
            "hijri": {"day": 1, "month": 9, "year": 1447},
            "gregorian": {"day": 18, "month": 2, "year": 2026},
            "prayerTimes": {"fajr": "05:12", "zuhr": "12:23"}
        }]"#;
        let records = parse_month(json).unwrap();
        let times = &records[0].prayer_times;
        assert_eq!(times.dhuhr.as_deref(), Some("12:23"));
        assert!(times.isha.is_none());
        assert_eq!(records[0].hijri.day_name, "");
    }

    #[test]
    fn empty_and_invalid_responses_are_errors() {
        assert!(matches!(parse_month("[]"), Err(SourceError::Empty)));
        assert!(matches!(parse_month(r#"{"data": []}"#), Err(SourceError::Empty)));
        assert!(matches!(parse_month("{oops"), Err(SourceError::Json(_))));
    }

    #[test]
    fn month_of_rejects_mixed_months() {
        let mut records = parse_month(&format!("[{}, {}]", DAY, DAY)).unwrap();
        assert_eq!(
            month_of(&records, CalendarSystem::Hijri).unwrap(),
            MonthKey::new(CalendarSystem::Hijri, 1447, 9)
        );
        records[1].hijri.month = 10;
        assert!(matches!(
            month_of(&records, CalendarSystem::Hijri),
            Err(SourceError::MixedMonths { index: 1, .. })
        ));
        // Still one Gregorian month.
        assert!(month_of(&records, CalendarSystem::Gregorian).is_ok());
    }
}
