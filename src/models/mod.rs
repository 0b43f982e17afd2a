pub mod calendar;
pub mod day_record;
pub mod prayer;

pub use calendar::{
    CalendarCell, CalendarGrid, CalendarSystem, DateRef, HijriYmd, MonthKey, GRID_CELLS, WEEK_LEN,
};
pub use day_record::{DateParts, DayRecord, PrayerTimes};
pub use prayer::{PrayerKey, PrayerWindow, ResolvedWindowState};
