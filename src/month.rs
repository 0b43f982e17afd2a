//! Glue between the month cache and the grid builder, shared by the CLI and
//! the dashboard.

use anyhow::Result;
use chrono::{Datelike, NaiveDate};
use rusqlite::Connection;

use crate::calendar::{CorrectionTable, GridBuilder, fallback_grid};
use crate::db::repository::DayRepo;
use crate::models::{CalendarGrid, CalendarSystem, DateRef, DayRecord, MonthKey};
use crate::utils::hijri::hijri_month_name;

/// One month ready for display.
#[derive(Debug, Clone)]
pub struct MonthData {
    /// `None` when nothing is cached for the requested calendar system.
    pub key: Option<MonthKey>,
    pub records: Vec<DayRecord>,
    pub grid: CalendarGrid,
}

impl MonthData {
    /// "Ramadan 1447", preferring the backend's month name.
    pub fn title(&self, lang: &str) -> String {
        let Some(key) = self.key else {
            return "No cached month".to_string();
        };
        let backend_name = self
            .records
            .first()
            .map(|r| r.parts(key.system).month_name.clone())
            .filter(|n| !n.is_empty());
        let name = match (backend_name, key.system) {
            (Some(n), _) => n,
            (None, CalendarSystem::Hijri) => hijri_month_name(key.month, lang).to_string(),
            (None, CalendarSystem::Gregorian) => NaiveDate::from_ymd_opt(key.year, key.month, 1)
                .map(|d| d.format("%B").to_string())
                .unwrap_or_default(),
        };
        format!("{} {}", name, key.year)
    }
}

/// Today's reference date plus its cached record, if any.
/// The Hijri side of "today" comes only from a cached backend record.
pub fn today_ref(
    conn: &Connection,
    location: &str,
    date: NaiveDate,
) -> Result<(DateRef, Option<DayRecord>)> {
    let record = DayRepo::find_by_gregorian(conn, location, date)?;
    let today = record
        .as_ref()
        .and_then(DateRef::from_record)
        .unwrap_or_else(|| DateRef::gregorian(date));
    Ok((today, record))
}

/// The month containing today in `system`. For Hijri this needs today's
/// cached record; without one, the most recently cached Hijri month is used.
pub fn default_month(
    conn: &Connection,
    location: &str,
    system: CalendarSystem,
    today_record: Option<&DayRecord>,
    today: NaiveDate,
) -> Result<Option<MonthKey>> {
    match (system, today_record) {
        (CalendarSystem::Gregorian, _) => Ok(Some(MonthKey::new(
            system,
            today.year(),
            today.month(),
        ))),
        (CalendarSystem::Hijri, Some(record)) => Ok(Some(MonthKey::of_record(record, system))),
        (CalendarSystem::Hijri, None) => {
            let latest = DayRepo::list_months(conn, location)?
                .into_iter()
                .map(|(key, _)| key)
                .filter(|key| key.system == system)
                .max_by_key(|key| (key.year, key.month));
            Ok(latest)
        }
    }
}

/// Load `key` from the cache and lay it out. Missing months give the
/// placeholder grid.
pub fn load_month(
    conn: &Connection,
    location: &str,
    corrections: &CorrectionTable,
    key: Option<MonthKey>,
    system: CalendarSystem,
    today: &DateRef,
) -> Result<MonthData> {
    let Some(key) = key else {
        return Ok(MonthData {
            key: None,
            records: Vec::new(),
            grid: fallback_grid(system),
        });
    };

    let records = DayRepo::load_month(conn, location, &key)?;
    if records.is_empty() {
        log::info!("{} is not cached for {}", key, location);
    }
    // Gregorian lengths come from the calendar, not the cache
    let previous_len = match key.system {
        CalendarSystem::Hijri => DayRepo::month_len(conn, location, &key.prev())?,
        CalendarSystem::Gregorian => None,
    };
    let grid = GridBuilder::new(key.system)
        .previous_month_len(previous_len)
        .corrections(corrections)
        .build(&records, today);

    Ok(MonthData {
        key: Some(key),
        records,
        grid,
    })
}
