use anyhow::{anyhow, Context, Result};
use chrono::{Local, NaiveDate};
use rusqlite::Connection;
use std::io::Read;
use std::path::Path;

use taqwim::calendar::weekday_headers;
use taqwim::config::AppConfig;
use taqwim::db::repository::{DayRepo, MetaRepo};
use taqwim::models::{CalendarGrid, CalendarSystem, DayRecord, MonthKey, PrayerKey};
use taqwim::month::{self, MonthData};
use taqwim::prayer_times::resolve;
use taqwim::source;
use taqwim::utils::format::{format_12_hour, format_duration_secs, pad, progress_bar};
use taqwim::utils::locale::is_rtl;

use crate::cli::args::MonthArgs;

// ─── ANSI helpers ────────────────────────────────────────────────────────────

macro_rules! println_colored {
    ($color:expr, $($arg:tt)*) => {{
        print!("{}", $color);
        print!($($arg)*);
        println!("\x1b[0m");
    }};
}

const GREEN: &str = "\x1b[32m";
const AMBER: &str = "\x1b[33m";
const DIM: &str = "\x1b[2m";
const BOLD: &str = "\x1b[1m";
const GOLD: &str = "\x1b[38;2;196;160;68m";
const RESET: &str = "\x1b[0m";

// ─── Import ──────────────────────────────────────────────────────────────────

pub fn handle_import(
    conn: &Connection,
    config: &AppConfig,
    file: &Path,
    system: CalendarSystem,
) -> Result<()> {
    let body = if file == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Reading month response from stdin")?;
        buf
    } else {
        std::fs::read_to_string(file).with_context(|| format!("Reading {:?}", file))?
    };

    let records = source::parse_month(&body)?;
    let key = source::month_of(&records, system)?;
    DayRepo::store_month(conn, &config.location.name, &key, &records)?;
    MetaRepo::set(conn, "last_import", &key.to_string())?;

    println_colored!(
        GREEN,
        "  ✓ Cached {} days for {} at {}",
        records.len(),
        key,
        config.location.name
    );
    Ok(())
}

// ─── Calendar ────────────────────────────────────────────────────────────────

fn resolve_month(conn: &Connection, config: &AppConfig, args: &MonthArgs) -> Result<MonthData> {
    let location = &config.location.name;
    let system = args.system.unwrap_or(config.display.calendar);
    let date = Local::now().date_naive();
    let (today, today_record) = month::today_ref(conn, location, date)?;

    let key = match (args.year, args.month) {
        (Some(year), Some(m)) => Some(MonthKey::new(system, year, m)),
        _ => month::default_month(conn, location, system, today_record.as_ref(), date)?,
    };
    month::load_month(conn, location, &config.corrections, key, system, &today)
}

/// Grid rows as text, columns mirrored for right-to-left languages.
pub fn render_grid(grid: &CalendarGrid, lang: &str) -> Vec<String> {
    let rtl = is_rtl(lang);
    let mut headers: Vec<String> = weekday_headers(lang)
        .iter()
        .map(|h| pad(h, 7, rtl))
        .collect();
    if rtl {
        headers.reverse();
    }

    let mut lines = vec![headers.join("")];
    for row in grid.rows() {
        let mut cols: Vec<String> = row
            .iter()
            .map(|cell| {
                let label = if cell.day_number == 0 {
                    String::new()
                } else {
                    cell.day_number.to_string()
                };
                let text = pad(&label, 5, true);
                if cell.is_today {
                    let bracketed = pad(&format!("[{}]", label), 6, true);
                    format!("{}{}{}{} ", BOLD, AMBER, bracketed, RESET)
                } else if !cell.is_current_month {
                    format!("{}{}{}  ", DIM, text, RESET)
                } else {
                    format!("{}  ", text)
                }
            })
            .collect();
        if rtl {
            cols.reverse();
        }
        lines.push(cols.join(""));
    }
    lines
}

pub fn handle_calendar(conn: &Connection, config: &AppConfig, lang: &str, args: &MonthArgs) -> Result<()> {
    let data = resolve_month(conn, config, args)?;

    println!();
    println_colored!(GOLD, "  {} — {}", data.title(lang), config.location.name);
    if data.grid.is_fallback {
        println_colored!(DIM, "  (no usable data cached; showing placeholder grid)");
    }
    println!();
    for line in render_grid(&data.grid, lang) {
        println!("  {}", line);
    }
    println!();
    Ok(())
}

// ─── Month table ─────────────────────────────────────────────────────────────

pub fn handle_month(conn: &Connection, config: &AppConfig, lang: &str, args: &MonthArgs) -> Result<()> {
    let data = resolve_month(conn, config, args)?;
    if data.records.is_empty() {
        return Err(anyhow!(
            "No cached records for {}. Import the month first with `taqwim import`.",
            data.key.map(|k| k.to_string()).unwrap_or_else(|| "this month".into())
        ));
    }
    let system = data.key.map(|k| k.system).unwrap_or(config.display.calendar);

    println!();
    println_colored!(GOLD, "  {} — {}", data.title(lang), config.location.name);
    println!();

    let mut header = format!("  {:<4}{:<12}", "", "");
    for key in PrayerKey::all() {
        header.push_str(&pad(key.display_name(), 11, false));
    }
    println_colored!(DIM, "{}", header);

    for record in &data.records {
        let other = match system {
            CalendarSystem::Hijri => &record.gregorian,
            CalendarSystem::Gregorian => &record.hijri,
        };
        let mut line = format!(
            "  {:<4}{:<12}",
            record.parts(system).day,
            format!("{}/{}/{}", other.day, other.month, other.year)
        );
        for key in PrayerKey::all() {
            line.push_str(&pad(&format_12_hour(record.prayer_times.get(key), lang), 11, false));
        }
        let is_today = record.gregorian_date() == Some(Local::now().date_naive());
        if is_today {
            println_colored!(BOLD, "{}", line);
        } else {
            println!("{}", line);
        }
    }
    println!();
    Ok(())
}

// ─── Times ───────────────────────────────────────────────────────────────────

pub fn handle_times(
    conn: &Connection,
    config: &AppConfig,
    lang: &str,
    date: Option<NaiveDate>,
) -> Result<()> {
    let now = Local::now().naive_local();
    let day = date.unwrap_or(now.date());

    let record = DayRepo::find_by_gregorian(conn, &config.location.name, day)?
        .ok_or_else(|| {
            anyhow!(
                "No cached prayer times for {} at {}. Import the month first with `taqwim import`.",
                day,
                config.location.name
            )
        })?;

    println!();
    println_colored!(
        GOLD,
        "  Prayer Times — {} ({})",
        config.location.name,
        day.format("%Y-%m-%d")
    );
    println_colored!(DIM, "  {}", describe_day(&record));
    println!();

    // Countdown only makes sense for today
    let state = (day == now.date()).then(|| resolve(&record.prayer_times, day, now));

    for key in PrayerKey::all() {
        let time_str = format_12_hour(record.prayer_times.get(key), lang);
        let is_current = state.and_then(|s| s.current).map(|w| w.key) == Some(key);
        let marker = if is_current { "▶" } else { " " };
        let line = format!(" {} {}  {}", marker, pad(key.display_name(), 10, false), time_str);
        if is_current {
            println_colored!(AMBER, "{}", line);
        } else if key.is_prayer() {
            println_colored!(BOLD, "{}", line);
        } else {
            println_colored!(DIM, "{}", line);
        }
    }

    if let Some(state) = state {
        println!();
        match state.next {
            Some(next) => {
                println_colored!(
                    AMBER,
                    "  Next: {} in {} ({})",
                    next.key.display_name(),
                    format_duration_secs(state.remaining_seconds as i64),
                    state.countdown()
                );
                if state.current.is_some() {
                    println_colored!(
                        DIM,
                        "  {} {:>3.0}%",
                        progress_bar(state.progress_fraction, 24),
                        state.progress_fraction * 100.0
                    );
                }
            }
            None => println_colored!(DIM, "  Next: {}", state.countdown()),
        }
    }
    println!();
    Ok(())
}

fn describe_day(record: &DayRecord) -> String {
    let h = &record.hijri;
    let g = &record.gregorian;
    let weekday = if g.day_name.is_empty() { &h.day_name } else { &g.day_name };
    format!(
        "{} · {} {} {} · {} {} {}",
        weekday, h.day, h.month_name, h.year, g.day, g.month_name, g.year
    )
}

// ─── Format ──────────────────────────────────────────────────────────────────

pub fn handle_format(time: &str, lang: &str) -> Result<()> {
    println!("{}", format_12_hour(Some(time), lang));
    Ok(())
}

// ─── Cache management ────────────────────────────────────────────────────────

pub fn handle_months(conn: &Connection, config: &AppConfig) -> Result<()> {
    let months = DayRepo::list_months(conn, &config.location.name)?;
    println!();
    if months.is_empty() {
        println_colored!(DIM, "  No months cached for {}", config.location.name);
    } else {
        println_colored!(GOLD, "  Cached months — {}", config.location.name);
        println!();
        for (key, days) in &months {
            println!("  {:<24} {} days", key.to_string(), days);
        }
    }
    if let Some(last) = MetaRepo::get(conn, "last_import")? {
        println!();
        println_colored!(DIM, "  Last import: {}", last);
    }
    println!();
    Ok(())
}

pub fn handle_clear(conn: &Connection) -> Result<()> {
    DayRepo::clear_all(conn)?;
    println_colored!(GREEN, "  ✓ Month cache cleared");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use taqwim::calendar::{build_grid, fallback_grid};
    use taqwim::models::{DateParts, DateRef, PrayerTimes};

    fn strip_ansi(s: &str) -> String {
        let mut out = String::new();
        let mut in_escape = false;
        for c in s.chars() {
            match (in_escape, c) {
                (false, '\x1b') => in_escape = true,
                (true, 'm') => in_escape = false,
                (true, _) => {}
                (false, c) => out.push(c),
            }
        }
        out
    }

    #[test]
    fn grid_renders_header_and_six_weeks() {
        let lines = render_grid(&fallback_grid(CalendarSystem::Gregorian), "en");
        assert_eq!(lines.len(), 7);
        assert!(lines[0].starts_with("Sat"));
        assert!(strip_ansi(&lines[1]).trim_start().starts_with('1'));
    }

    #[test]
    fn rtl_grid_mirrors_columns() {
        let lines = render_grid(&fallback_grid(CalendarSystem::Hijri), "ar");
        assert!(lines[0].trim_end().ends_with("سبت"));
        assert!(strip_ansi(&lines[1]).trim_end().ends_with('1'));
    }

    #[test]
    fn today_is_bracketed() {
        let date = NaiveDate::from_ymd_opt(2026, 2, 18).unwrap();
        let record = DayRecord {
            hijri: DateParts {
                day: 1,
                month: 9,
                year: 1447,
                month_name: "Ramadan".into(),
                day_name: String::new(),
            },
            gregorian: DateParts {
                day: 18,
                month: 2,
                year: 2026,
                month_name: "February".into(),
                day_name: "Wednesday".into(),
            },
            prayer_times: PrayerTimes::default(),
        };
        let mut records = vec![record];
        for d in 2..=29 {
            let mut r = records[0].clone();
            r.hijri.day = d;
            r.gregorian.day = 17 + d;
            if r.gregorian.day > 28 {
                r.gregorian.day -= 28;
                r.gregorian.month = 3;
            }
            records.push(r);
        }
        let grid = build_grid(&records, CalendarSystem::Hijri, &DateRef::gregorian(date));
        let text: String = render_grid(&grid, "en").iter().map(|l| strip_ansi(l)).collect();
        assert!(text.contains("[1]"));
        assert_eq!(describe_day(&records[0]), "Wednesday · 1 Ramadan 1447 · 18 February 2026");
    }
}
