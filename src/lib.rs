//! Hijri and Gregorian prayer-time calendar.
//!
//! Day records come from a remote backend; this crate lays them out as month
//! grids, tracks the current and next prayer windows, and formats times for
//! display. Nothing here computes prayer times or converts between calendars.

pub mod calendar;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod month;
pub mod prayer_times;
pub mod source;
pub mod utils;

pub use calendar::{build_grid, GridBuilder};
pub use prayer_times::resolve;
pub use utils::format::format_12_hour;
