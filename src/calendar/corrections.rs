//! Hand-maintained patches for known backend data quirks.
//!
//! Entries are keyed by Hijri month (and optionally year). Whether they reflect
//! a real intercalation rule or a backend bug is unconfirmed, so they live here
//! as data and can be dropped once the backend is fixed.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;

use crate::models::{CalendarSystem, DayRecord};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Correction {
    /// Force a Hijri month to `days` days.
    MonthLength {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        year: Option<i32>,
        month: u32,
        days: u32,
    },
    /// Replace the day name of one Hijri day.
    DayName {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        year: Option<i32>,
        month: u32,
        day: u32,
        name: String,
    },
}

impl Correction {
    fn applies_to(&self, year: i32, month: u32) -> bool {
        let (y, m) = match self {
            Correction::MonthLength { year, month, .. } => (year, month),
            Correction::DayName { year, month, .. } => (year, month),
        };
        *m == month && y.is_none_or(|y| y == year)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CorrectionTable {
    entries: Vec<Correction>,
}

impl CorrectionTable {
    pub fn new(entries: Vec<Correction>) -> Self {
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Correction] {
        &self.entries
    }

    /// Forced length for a Hijri month. Later entries win.
    pub fn month_length(&self, year: i32, month: u32) -> Option<u32> {
        self.entries
            .iter()
            .rev()
            .filter(|c| c.applies_to(year, month))
            .find_map(|c| match c {
                Correction::MonthLength { days, .. } => Some(*days),
                _ => None,
            })
    }

    /// Apply day-name overrides. Borrows the input untouched when nothing matches.
    pub fn apply<'r>(&self, records: &'r [DayRecord]) -> Cow<'r, [DayRecord]> {
        let overrides: Vec<(usize, &str)> = records
            .iter()
            .enumerate()
            .filter_map(|(i, r)| {
                self.day_name(r.hijri.year, r.hijri.month, r.hijri.day)
                    .map(|name| (i, name))
            })
            .collect();

        if overrides.is_empty() {
            return Cow::Borrowed(records);
        }

        let mut patched = records.to_vec();
        for (i, name) in overrides {
            log::debug!(
                "Correcting day name of {}/{}/{}",
                patched[i].hijri.year,
                patched[i].hijri.month,
                patched[i].hijri.day
            );
            patched[i].parts_mut(CalendarSystem::Hijri).day_name = name.to_string();
        }
        Cow::Owned(patched)
    }

    fn day_name(&self, year: i32, month: u32, day: u32) -> Option<&str> {
        self.entries
            .iter()
            .rev()
            .filter(|c| c.applies_to(year, month))
            .find_map(|c| match c {
                Correction::DayName { day: d, name, .. } if *d == day => Some(name.as_str()),
                _ => None,
            })
    }
}
