use chrono::{Datelike, NaiveDate};

use crate::calendar::corrections::CorrectionTable;
use crate::error::MalformedMonth;
use crate::models::{
    CalendarCell, CalendarGrid, CalendarSystem, DateRef, DayRecord, MonthKey, GRID_CELLS,
};
use crate::utils::hijri::tabular_month_len;

/// Days shown by the placeholder grid when the backend gave us nothing usable.
const FALLBACK_DAYS: u32 = 30;

/// Lays out one month of day records as a 6x7, Saturday-first grid.
#[derive(Debug, Clone, Copy)]
pub struct GridBuilder<'a> {
    system: CalendarSystem,
    previous_month_len: Option<u32>,
    corrections: Option<&'a CorrectionTable>,
}

impl<'a> GridBuilder<'a> {
    pub fn new(system: CalendarSystem) -> Self {
        Self {
            system,
            previous_month_len: None,
            corrections: None,
        }
    }

    /// Known length of the preceding Hijri month, used to number leading
    /// cells. Ignored for Gregorian months and outside 29..=30.
    pub fn previous_month_len(mut self, len: Option<u32>) -> Self {
        self.previous_month_len = len;
        self
    }

    pub fn corrections(mut self, table: &'a CorrectionTable) -> Self {
        self.corrections = Some(table);
        self
    }

    /// Never fails: malformed input produces the placeholder grid.
    pub fn build(&self, records: &[DayRecord], today: &DateRef) -> CalendarGrid {
        match self.try_build(records, today) {
            Ok(grid) => grid,
            Err(e) => {
                log::warn!("Falling back to placeholder {} grid: {}", self.system, e);
                fallback_grid(self.system)
            }
        }
    }

    pub fn try_build(
        &self,
        records: &[DayRecord],
        today: &DateRef,
    ) -> Result<CalendarGrid, MalformedMonth> {
        let system = self.system;
        let key = validate(records, system)?;

        let patched = match self.corrections {
            Some(table) => table.apply(records),
            None => std::borrow::Cow::Borrowed(records),
        };

        let days_in_month = match system {
            CalendarSystem::Hijri => self
                .corrections
                .and_then(|t| t.month_length(key.year, key.month))
                .filter(|forced| {
                    let ok = (29..=30).contains(forced);
                    if !ok {
                        log::warn!("Ignoring forced length {} for {}", forced, key);
                    }
                    ok
                })
                .unwrap_or(records.len() as u32),
            CalendarSystem::Gregorian => records.len() as u32,
        };

        let leading = first_column(&records[0], system)?;
        let prev_len = match system {
            CalendarSystem::Gregorian => estimate_month_len(&key.prev()),
            // A partially cached month reports fewer rows than it has days
            CalendarSystem::Hijri => self
                .previous_month_len
                .filter(|len| (29..=30).contains(len))
                .unwrap_or_else(|| estimate_month_len(&key.prev())),
        };

        let mut cells = Vec::with_capacity(GRID_CELLS);
        for i in 0..leading {
            let day = (prev_len + 1 + i as u32).saturating_sub(leading as u32);
            cells.push(CalendarCell::padding(day));
        }
        for day in 1..=days_in_month {
            let source = patched.get(day as usize - 1).cloned();
            let is_today = source
                .as_ref()
                .map(|r| today.matches(r, system))
                .unwrap_or(false);
            cells.push(CalendarCell {
                day_number: day,
                is_current_month: true,
                is_today,
                is_selected: false,
                source,
            });
        }
        let mut next_day = 1;
        while cells.len() < GRID_CELLS {
            cells.push(CalendarCell::padding(next_day));
            next_day += 1;
        }

        Ok(CalendarGrid {
            system,
            cells,
            days_in_month,
            leading,
            is_fallback: false,
        })
    }
}

/// Build a grid with no previous-month hint and no corrections.
pub fn build_grid(records: &[DayRecord], system: CalendarSystem, today: &DateRef) -> CalendarGrid {
    GridBuilder::new(system).build(records, today)
}

/// Static placeholder: days 1..30 from the first column, nothing flagged.
pub fn fallback_grid(system: CalendarSystem) -> CalendarGrid {
    let mut cells: Vec<CalendarCell> = (1..=FALLBACK_DAYS)
        .map(|day| CalendarCell {
            day_number: day,
            is_current_month: true,
            is_today: false,
            is_selected: false,
            source: None,
        })
        .collect();
    let trailing = GRID_CELLS - cells.len();
    cells.extend((1..=trailing as u32).map(CalendarCell::padding));

    CalendarGrid {
        system,
        cells,
        days_in_month: FALLBACK_DAYS,
        leading: 0,
        is_fallback: true,
    }
}

/// Saturday = 0 ... Friday = 6.
pub fn saturday_first_index(date: NaiveDate) -> usize {
    (date.weekday().num_days_from_sunday() as usize + 1) % 7
}

/// Column of day 1. Hijri months take the weekday from the Gregorian date
/// each record carries; there is no local Hijri weekday arithmetic.
fn first_column(first: &DayRecord, system: CalendarSystem) -> Result<usize, MalformedMonth> {
    let date = match system {
        CalendarSystem::Gregorian => {
            NaiveDate::from_ymd_opt(first.gregorian.year, first.gregorian.month, 1)
        }
        CalendarSystem::Hijri => first.gregorian_date(),
    }
    .ok_or(MalformedMonth::InvalidDate)?;
    Ok(saturday_first_index(date))
}

pub fn gregorian_month_len(year: i32, month: u32) -> Option<u32> {
    let (ny, nm) = if month == 12 {
        (year.checked_add(1)?, 1)
    } else {
        (year, month + 1)
    };
    let start = NaiveDate::from_ymd_opt(year, month, 1)?;
    let end = NaiveDate::from_ymd_opt(ny, nm, 1)?;
    Some((end - start).num_days() as u32)
}

fn estimate_month_len(key: &MonthKey) -> u32 {
    match key.system {
        CalendarSystem::Gregorian => gregorian_month_len(key.year, key.month).unwrap_or(30),
        CalendarSystem::Hijri => tabular_month_len(key.month),
    }
}

fn validate(records: &[DayRecord], system: CalendarSystem) -> Result<MonthKey, MalformedMonth> {
    let first = records.first().ok_or(MalformedMonth::Empty)?;
    let key = MonthKey::of_record(first, system);

    for (index, record) in records.iter().enumerate() {
        let parts = record.parts(system);
        let expected = index as u32 + 1;
        if parts.day != expected {
            return Err(MalformedMonth::NonConsecutive {
                index,
                found: parts.day,
                expected,
            });
        }
        if (parts.year, parts.month) != (key.year, key.month) {
            return Err(MalformedMonth::MixedMonths { index });
        }
    }

    let found = records.len() as u32;
    match system {
        CalendarSystem::Gregorian => {
            let expected =
                gregorian_month_len(key.year, key.month).ok_or(MalformedMonth::InvalidDate)?;
            if found != expected {
                return Err(MalformedMonth::LengthMismatch { expected, found });
            }
        }
        CalendarSystem::Hijri => {
            if !(29..=30).contains(&found) {
                return Err(MalformedMonth::LengthOutOfRange(found));
            }
        }
    }
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::corrections::Correction;
    use crate::models::{DateParts, HijriYmd, PrayerTimes};
    use chrono::Duration;

    fn parts(year: i32, month: u32, day: u32, day_name: &str) -> DateParts {
        DateParts {
            day,
            month,
            year,
            month_name: String::new(),
            day_name: day_name.to_string(),
        }
    }

    /// A full Gregorian month; the Hijri side is filler.
    fn gregorian_month(year: i32, month: u32) -> Vec<DayRecord> {
        let len = gregorian_month_len(year, month).unwrap();
        (1..=len)
            .map(|d| {
                let date = NaiveDate::from_ymd_opt(year, month, d).unwrap();
                DayRecord {
                    hijri: parts(1447, 1, d, ""),
                    gregorian: parts(year, month, d, &date.format("%A").to_string()),
                    prayer_times: PrayerTimes::default(),
                }
            })
            .collect()
    }

    /// A Hijri month of `len` days starting on Gregorian `start`.
    fn hijri_month(year: i32, month: u32, len: u32, start: NaiveDate) -> Vec<DayRecord> {
        (1..=len)
            .map(|d| {
                let g = start + Duration::days(d as i64 - 1);
                DayRecord {
                    hijri: parts(year, month, d, ""),
                    gregorian: parts(g.year(), g.month(), g.day(), ""),
                    prayer_times: PrayerTimes::default(),
                }
            })
            .collect()
    }

    fn ramadan_1447() -> Vec<DayRecord> {
        // 1 Ramadan 1447 = Wednesday 18 February 2026
        hijri_month(1447, 9, 29, NaiveDate::from_ymd_opt(2026, 2, 18).unwrap())
    }

    fn today(y: i32, m: u32, d: u32) -> DateRef {
        DateRef::gregorian(NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    #[test]
    fn every_grid_has_42_cells() {
        for (y, m) in [(2026, 2), (2024, 2), (2026, 4), (2026, 8), (2027, 5)] {
            let grid = build_grid(&gregorian_month(y, m), CalendarSystem::Gregorian, &today(2026, 1, 1));
            assert_eq!(grid.cells.len(), GRID_CELLS, "{}-{}", y, m);
            assert!(!grid.is_fallback);
        }
        let grid = build_grid(&ramadan_1447(), CalendarSystem::Hijri, &today(2026, 1, 1));
        assert_eq!(grid.cells.len(), GRID_CELLS);
    }

    #[test]
    fn gregorian_month_starts_on_saturday_first_column() {
        // 1 August 2026 is a Saturday, 1 May 2026 a Friday.
        let aug = build_grid(&gregorian_month(2026, 8), CalendarSystem::Gregorian, &today(2026, 1, 1));
        assert_eq!(aug.leading, 0);
        assert_eq!(aug.cells[0].day_number, 1);

        let may = build_grid(&gregorian_month(2026, 5), CalendarSystem::Gregorian, &today(2026, 1, 1));
        assert_eq!(may.leading, 6);
        // April has 30 days: leading cells are 25..30
        let lead: Vec<u32> = may.cells[..6].iter().map(|c| c.day_number).collect();
        assert_eq!(lead, vec![25, 26, 27, 28, 29, 30]);
        assert!(may.cells[..6].iter().all(|c| !c.is_current_month));
    }

    #[test]
    fn hijri_month_uses_attached_gregorian_weekday() {
        let grid = build_grid(&ramadan_1447(), CalendarSystem::Hijri, &today(2026, 1, 1));
        // Wednesday -> column 4 in a Saturday-first week
        assert_eq!(grid.leading, 4);
        // Sha'ban (month 8) estimated at 29 days
        let lead: Vec<u32> = grid.cells[..4].iter().map(|c| c.day_number).collect();
        assert_eq!(lead, vec![26, 27, 28, 29]);
    }

    #[test]
    fn known_previous_length_overrides_estimate() {
        let grid = GridBuilder::new(CalendarSystem::Hijri)
            .previous_month_len(Some(30))
            .build(&ramadan_1447(), &today(2026, 1, 1));
        let lead: Vec<u32> = grid.cells[..4].iter().map(|c| c.day_number).collect();
        assert_eq!(lead, vec![27, 28, 29, 30]);
    }

    #[test]
    fn current_month_days_are_consecutive() {
        let records = gregorian_month(2026, 3);
        let grid = build_grid(&records, CalendarSystem::Gregorian, &today(2026, 3, 3));
        let days: Vec<u32> = grid
            .cells
            .iter()
            .filter(|c| c.is_current_month)
            .map(|c| c.day_number)
            .collect();
        assert_eq!(days, (1..=records.len() as u32).collect::<Vec<_>>());
    }

    #[test]
    fn trailing_cells_count_from_one() {
        let grid = build_grid(&gregorian_month(2026, 5), CalendarSystem::Gregorian, &today(2026, 1, 1));
        // 6 leading + 31 days = 37, five trailing cells
        let tail: Vec<u32> = grid.cells[37..].iter().map(|c| c.day_number).collect();
        assert_eq!(tail, vec![1, 2, 3, 4, 5]);
        assert!(grid.cells[37..].iter().all(|c| !c.is_current_month && c.source.is_none()));
    }

    #[test]
    fn today_is_flagged_once_inside_the_month() {
        let grid = build_grid(&gregorian_month(2026, 3), CalendarSystem::Gregorian, &today(2026, 3, 15));
        let flagged: Vec<&CalendarCell> = grid.cells.iter().filter(|c| c.is_today).collect();
        assert_eq!(flagged.len(), 1);
        assert_eq!(flagged[0].day_number, 15);
    }

    #[test]
    fn today_outside_the_month_flags_nothing() {
        // 1 April would be a trailing cell of March; padding is never today.
        for t in [today(2026, 4, 1), today(2026, 2, 28), today(2025, 3, 15)] {
            let grid = build_grid(&gregorian_month(2026, 3), CalendarSystem::Gregorian, &t);
            assert_eq!(grid.cells.iter().filter(|c| c.is_today).count(), 0);
        }
    }

    #[test]
    fn hijri_today_prefers_hijri_date() {
        let records = ramadan_1447();
        let by_hijri = DateRef {
            gregorian: NaiveDate::from_ymd_opt(2030, 1, 1).unwrap(),
            hijri: Some(HijriYmd {
                year: 1447,
                month: 9,
                day: 10,
            }),
        };
        let grid = build_grid(&records, CalendarSystem::Hijri, &by_hijri);
        assert_eq!(grid.cells[grid.today_index().unwrap()].day_number, 10);

        // Without a Hijri date the attached Gregorian date decides.
        let by_gregorian = today(2026, 2, 20);
        let grid = build_grid(&records, CalendarSystem::Hijri, &by_gregorian);
        assert_eq!(grid.cells[grid.today_index().unwrap()].day_number, 3);
    }

    #[test]
    fn empty_input_yields_placeholder_grid() {
        let grid = build_grid(&[], CalendarSystem::Gregorian, &today(2026, 3, 1));
        assert!(grid.is_fallback);
        assert_eq!(grid.cells.len(), GRID_CELLS);
        assert!(grid.cells.iter().all(|c| !c.is_today));
    }

    #[test]
    fn malformed_input_is_rejected() {
        let mut records = gregorian_month(2026, 3);
        records.remove(10);
        let builder = GridBuilder::new(CalendarSystem::Gregorian);
        assert_eq!(
            builder.try_build(&records, &today(2026, 3, 1)),
            Err(MalformedMonth::NonConsecutive {
                index: 10,
                found: 12,
                expected: 11
            })
        );

        let mut short = gregorian_month(2026, 3);
        short.truncate(30);
        assert_eq!(
            builder.try_build(&short, &today(2026, 3, 1)),
            Err(MalformedMonth::LengthMismatch {
                expected: 31,
                found: 30
            })
        );
        assert!(builder.build(&short, &today(2026, 3, 1)).is_fallback);

        let long = hijri_month(1447, 9, 31, NaiveDate::from_ymd_opt(2026, 2, 18).unwrap());
        assert_eq!(
            GridBuilder::new(CalendarSystem::Hijri).try_build(&long, &today(2026, 3, 1)),
            Err(MalformedMonth::LengthOutOfRange(31))
        );
    }

    #[test]
    fn forced_month_length_adds_recordless_day() {
        let table = CorrectionTable::new(vec![Correction::MonthLength {
            year: Some(1447),
            month: 9,
            days: 30,
        }]);
        let grid = GridBuilder::new(CalendarSystem::Hijri)
            .corrections(&table)
            .build(&ramadan_1447(), &today(2026, 1, 1));
        assert_eq!(grid.days_in_month, 30);
        assert_eq!(grid.cells.len(), GRID_CELLS);
        let last = &grid.cells[grid.leading + 29];
        assert_eq!(last.day_number, 30);
        assert!(last.is_current_month);
        assert!(last.source.is_none());
    }

    #[test]
    fn implausible_forced_length_is_ignored() {
        let table = CorrectionTable::new(vec![Correction::MonthLength {
            year: None,
            month: 9,
            days: 35,
        }]);
        let grid = GridBuilder::new(CalendarSystem::Hijri)
            .corrections(&table)
            .build(&ramadan_1447(), &today(2026, 1, 1));
        assert_eq!(grid.days_in_month, 29);
    }

    #[test]
    fn selection_is_exclusive() {
        let mut grid = build_grid(&gregorian_month(2026, 5), CalendarSystem::Gregorian, &today(2026, 1, 1));
        assert!(grid.select_day(3));
        assert!(grid.select_day(20));
        assert_eq!(grid.cells.iter().filter(|c| c.is_selected).count(), 1);
        assert_eq!(grid.selected().unwrap().day_number, 20);
        // Padding cells cannot be selected and leave the selection alone.
        assert!(!grid.select(0));
        assert_eq!(grid.selected().unwrap().day_number, 20);
        grid.clear_selection();
        assert!(grid.selected().is_none());
    }

    #[test]
    fn extreme_years_degrade_without_overflow() {
        let record = DayRecord {
            hijri: parts(1447, 1, 1, ""),
            gregorian: parts(i32::MAX, 12, 1, ""),
            prayer_times: PrayerTimes::default(),
        };
        let grid = build_grid(&[record], CalendarSystem::Gregorian, &today(2026, 1, 1));
        assert!(grid.is_fallback);
        assert_eq!(grid.cells.len(), GRID_CELLS);
        assert_eq!(gregorian_month_len(i32::MAX, 12), None);

        // The Hijri year only feeds the previous-month estimate
        let start = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let grid = build_grid(
            &hijri_month(i32::MIN, 1, 30, start),
            CalendarSystem::Hijri,
            &today(2026, 1, 1),
        );
        assert!(!grid.is_fallback);
        assert_eq!(grid.cells.len(), GRID_CELLS);

        let first = MonthKey::new(CalendarSystem::Hijri, i32::MIN, 1);
        assert_eq!(first.prev(), first);
        let last = MonthKey::new(CalendarSystem::Gregorian, i32::MAX, 12);
        assert_eq!(last.next(), last);
    }

    #[test]
    fn gregorian_leading_cells_ignore_supplied_length() {
        // May 2026 starts on a Friday; April has 30 days whatever is cached
        let grid = GridBuilder::new(CalendarSystem::Gregorian)
            .previous_month_len(Some(10))
            .build(&gregorian_month(2026, 5), &today(2026, 1, 1));
        let lead: Vec<u32> = grid.cells[..grid.leading].iter().map(|c| c.day_number).collect();
        assert_eq!(lead, vec![25, 26, 27, 28, 29, 30]);
    }

    #[test]
    fn implausible_hijri_previous_length_uses_estimate() {
        let grid = GridBuilder::new(CalendarSystem::Hijri)
            .previous_month_len(Some(12))
            .build(&ramadan_1447(), &today(2026, 1, 1));
        let lead: Vec<u32> = grid.cells[..4].iter().map(|c| c.day_number).collect();
        assert_eq!(lead, vec![26, 27, 28, 29]);
    }
}
