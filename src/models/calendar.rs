use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::models::DayRecord;

/// Number of cells in a month grid: six weeks of seven days.
pub const GRID_CELLS: usize = 42;
pub const WEEK_LEN: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarSystem {
    Hijri,
    Gregorian,
}

impl CalendarSystem {
    pub fn as_str(&self) -> &'static str {
        match self {
            CalendarSystem::Hijri => "hijri",
            CalendarSystem::Gregorian => "gregorian",
        }
    }

    pub fn toggle(&self) -> CalendarSystem {
        match self {
            CalendarSystem::Hijri => CalendarSystem::Gregorian,
            CalendarSystem::Gregorian => CalendarSystem::Hijri,
        }
    }
}

impl std::fmt::Display for CalendarSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CalendarSystem {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "hijri" | "islamic" | "h" => Ok(CalendarSystem::Hijri),
            "gregorian" | "g" => Ok(CalendarSystem::Gregorian),
            _ => Err(anyhow::anyhow!("Unknown calendar system: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HijriYmd {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

/// The evaluation "today", expressed in both systems when known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRef {
    pub gregorian: NaiveDate,
    /// Taken from the backend record for `gregorian`; never computed locally.
    pub hijri: Option<HijriYmd>,
}

impl DateRef {
    pub fn gregorian(date: NaiveDate) -> Self {
        Self {
            gregorian: date,
            hijri: None,
        }
    }

    pub fn from_record(record: &DayRecord) -> Option<Self> {
        Some(Self {
            gregorian: record.gregorian_date()?,
            hijri: Some(HijriYmd {
                year: record.hijri.year,
                month: record.hijri.month,
                day: record.hijri.day,
            }),
        })
    }

    /// Whether `record` is this day in `system`.
    pub fn matches(&self, record: &DayRecord, system: CalendarSystem) -> bool {
        let by_gregorian = || {
            record.gregorian.ymd()
                == (self.gregorian.year(), self.gregorian.month(), self.gregorian.day())
        };
        match system {
            CalendarSystem::Gregorian => by_gregorian(),
            CalendarSystem::Hijri => match self.hijri {
                Some(h) => record.hijri.ymd() == (h.year, h.month, h.day),
                None => by_gregorian(),
            },
        }
    }
}

/// A year/month in one calendar system. Both systems have twelve months.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MonthKey {
    pub system: CalendarSystem,
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    pub fn new(system: CalendarSystem, year: i32, month: u32) -> Self {
        Self {
            system,
            year,
            month,
        }
    }

    pub fn of_record(record: &DayRecord, system: CalendarSystem) -> Self {
        let parts = record.parts(system);
        Self::new(system, parts.year, parts.month)
    }

    /// The following month. Stays put at the end of the `i32` year range.
    pub fn next(&self) -> Self {
        if self.month < 12 {
            return Self::new(self.system, self.year, self.month + 1);
        }
        match self.year.checked_add(1) {
            Some(year) => Self::new(self.system, year, 1),
            None => *self,
        }
    }

    /// The preceding month. Stays put at the start of the `i32` year range.
    pub fn prev(&self) -> Self {
        if self.month > 1 {
            return Self::new(self.system, self.year, self.month - 1);
        }
        match self.year.checked_sub(1) {
            Some(year) => Self::new(self.system, year, 12),
            None => *self,
        }
    }
}

impl std::fmt::Display for MonthKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{:02} ({})", self.year, self.month, self.system)
    }
}

/// One rendered grid position.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarCell {
    /// 0 marks an empty placeholder cell.
    pub day_number: u32,
    pub is_current_month: bool,
    pub is_today: bool,
    pub is_selected: bool,
    pub source: Option<DayRecord>,
}

impl CalendarCell {
    pub fn padding(day_number: u32) -> Self {
        Self {
            day_number,
            is_current_month: false,
            is_today: false,
            is_selected: false,
            source: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CalendarGrid {
    pub system: CalendarSystem,
    pub cells: Vec<CalendarCell>,
    pub days_in_month: u32,
    /// Leading padding cells, i.e. the Saturday-first column of day 1.
    pub leading: usize,
    pub is_fallback: bool,
}

impl CalendarGrid {
    /// Select the cell at `index`, clearing any previous selection.
    /// Only current-month cells can be selected.
    pub fn select(&mut self, index: usize) -> bool {
        let selectable = self
            .cells
            .get(index)
            .map(|c| c.is_current_month && c.day_number > 0)
            .unwrap_or(false);
        if !selectable {
            return false;
        }
        for (i, cell) in self.cells.iter_mut().enumerate() {
            cell.is_selected = i == index;
        }
        true
    }

    pub fn select_day(&mut self, day_number: u32) -> bool {
        match self
            .cells
            .iter()
            .position(|c| c.is_current_month && c.day_number == day_number)
        {
            Some(idx) => self.select(idx),
            None => false,
        }
    }

    pub fn clear_selection(&mut self) {
        for cell in &mut self.cells {
            cell.is_selected = false;
        }
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.cells.iter().position(|c| c.is_selected)
    }

    pub fn selected(&self) -> Option<&CalendarCell> {
        self.cells.iter().find(|c| c.is_selected)
    }

    pub fn today_index(&self) -> Option<usize> {
        self.cells.iter().position(|c| c.is_today)
    }

    /// Index range of current-month cells.
    pub fn month_range(&self) -> std::ops::Range<usize> {
        self.leading..self.leading + self.days_in_month as usize
    }

    pub fn rows(&self) -> impl Iterator<Item = &[CalendarCell]> {
        self.cells.chunks(WEEK_LEN)
    }
}
