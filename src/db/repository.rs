use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};
use std::str::FromStr;

use crate::models::{CalendarSystem, DayRecord, MonthKey};

// ─── Cached day records ─────────────────────────────────────────────────────

fn decode(payload: &str) -> Result<DayRecord> {
    serde_json::from_str(payload).context("Decoding cached day record")
}

pub struct DayRepo;

impl DayRepo {
    /// Replace everything cached for `key` at `location` with `records`.
    pub fn store_month(
        conn: &Connection,
        location: &str,
        key: &MonthKey,
        records: &[DayRecord],
    ) -> Result<()> {
        let tx = conn.unchecked_transaction()?;
        tx.execute(
            "DELETE FROM day_records WHERE location = ?1 AND system = ?2 AND year = ?3 AND month = ?4",
            params![location, key.system.as_str(), key.year, key.month],
        )?;
        for (seq, record) in records.iter().enumerate() {
            let g_date = record
                .gregorian_date()
                .with_context(|| format!("Record {} has an invalid Gregorian date", seq + 1))?;
            tx.execute(
                "INSERT INTO day_records
                    (location, system, year, month, seq, g_date, h_year, h_month, h_day, payload)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                params![
                    location,
                    key.system.as_str(),
                    key.year,
                    key.month,
                    seq as i64,
                    g_date.format("%Y-%m-%d").to_string(),
                    record.hijri.year,
                    record.hijri.month,
                    record.hijri.day,
                    serde_json::to_string(record)?,
                ],
            )?;
        }
        tx.commit()?;
        log::info!("Cached {} days for {} at {}", records.len(), key, location);
        Ok(())
    }

    /// Records of a cached month in day order; empty when not cached.
    pub fn load_month(conn: &Connection, location: &str, key: &MonthKey) -> Result<Vec<DayRecord>> {
        let mut stmt = conn.prepare(
            "SELECT payload FROM day_records
             WHERE location = ?1 AND system = ?2 AND year = ?3 AND month = ?4
             ORDER BY seq",
        )?;
        let rows = stmt.query_map(
            params![location, key.system.as_str(), key.year, key.month],
            |row| row.get::<_, String>(0),
        )?;

        let mut result = Vec::new();
        for payload in rows {
            result.push(decode(&payload?)?);
        }
        Ok(result)
    }

    /// Any cached record for a Gregorian date, whichever month query stored it.
    /// The most recent import wins, including two within the same second.
    pub fn find_by_gregorian(
        conn: &Connection,
        location: &str,
        date: NaiveDate,
    ) -> Result<Option<DayRecord>> {
        let payload: Option<String> = conn
            .query_row(
                "SELECT payload FROM day_records
                 WHERE location = ?1 AND g_date = ?2
                 ORDER BY stored_at DESC, rowid DESC LIMIT 1",
                params![location, date.format("%Y-%m-%d").to_string()],
                |row| row.get(0),
            )
            .optional()?;
        payload.as_deref().map(decode).transpose()
    }

    pub fn month_len(conn: &Connection, location: &str, key: &MonthKey) -> Result<Option<u32>> {
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM day_records
             WHERE location = ?1 AND system = ?2 AND year = ?3 AND month = ?4",
            params![location, key.system.as_str(), key.year, key.month],
            |row| row.get(0),
        )?;
        Ok((count > 0).then_some(count as u32))
    }

    /// Cached months at `location` with their day counts, oldest first.
    pub fn list_months(conn: &Connection, location: &str) -> Result<Vec<(MonthKey, u32)>> {
        let mut stmt = conn.prepare(
            "SELECT system, year, month, COUNT(*) FROM day_records
             WHERE location = ?1
             GROUP BY system, year, month
             ORDER BY system, year, month",
        )?;
        let rows = stmt.query_map(params![location], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, i32>(1)?,
                row.get::<_, u32>(2)?,
                row.get::<_, u32>(3)?,
            ))
        })?;

        let mut result = Vec::new();
        for row in rows {
            let (system, year, month, days) = row?;
            let system = CalendarSystem::from_str(&system)?;
            result.push((MonthKey::new(system, year, month), days));
        }
        Ok(result)
    }

    pub fn clear_all(conn: &Connection) -> Result<()> {
        conn.execute("DELETE FROM day_records", [])?;
        Ok(())
    }
}

// ─── Meta ────────────────────────────────────────────────────────────────────

pub struct MetaRepo;

impl MetaRepo {
    pub fn get(conn: &Connection, key: &str) -> Result<Option<String>> {
        conn.query_row(
            "SELECT value FROM app_meta WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )
        .optional()
        .map_err(anyhow::Error::from)
    }

    pub fn set(conn: &Connection, key: &str, value: &str) -> Result<()> {
        conn.execute(
            "INSERT INTO app_meta (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = ?2",
            params![key, value],
        )?;
        Ok(())
    }
}
