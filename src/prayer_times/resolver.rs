use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::models::{PrayerKey, PrayerTimes, PrayerWindow, ResolvedWindowState};
use crate::utils::format::parse_clock;

/// Pin each usable time string to `day`, ascending by instant.
/// Missing or unparseable fields are left out of the sequence.
pub fn windows_for_day(times: &PrayerTimes, day: NaiveDate) -> Vec<PrayerWindow> {
    let mut windows: Vec<PrayerWindow> = times
        .entries()
        .into_iter()
        .filter_map(|(key, raw)| {
            let parsed = raw.and_then(parse_clock);
            if parsed.is_none() {
                log::debug!("Skipping {} window: {:?}", key, raw);
            }
            parsed.map(|t| PrayerWindow {
                key,
                instant: day.and_time(t),
            })
        })
        .collect();

    if !windows.is_sorted_by_key(|w| w.instant) {
        log::warn!("Prayer times for {} are out of order, sorting", day);
        windows.sort_by_key(|w| w.instant);
    }
    windows
}

/// Resolve the active and upcoming prayer windows at `now`.
///
/// `current` is the last window already reached on `reference_day`; `next`
/// is the first one still ahead, rolling over to tomorrow's Fajr (same time
/// string) once Isha has passed. Pure: the clock is always a parameter.
pub fn resolve(
    times: &PrayerTimes,
    reference_day: NaiveDate,
    now: NaiveDateTime,
) -> ResolvedWindowState {
    let windows = windows_for_day(times, reference_day);
    if windows.is_empty() {
        return ResolvedWindowState::empty();
    }

    let current = windows.iter().rev().find(|w| w.instant <= now).copied();
    let next = windows
        .iter()
        .find(|w| w.instant > now)
        .copied()
        .or_else(|| tomorrow_first(&windows));

    let Some(next) = next else {
        return ResolvedWindowState::empty();
    };

    let remaining = next.instant - now;
    let remaining_seconds = remaining.num_seconds().max(0) as u64;

    ResolvedWindowState {
        current,
        next: Some(next),
        remaining_seconds,
        progress_fraction: progress(current.as_ref(), &next, now),
    }
}

/// Tomorrow's Fajr, or tomorrow's earliest known window when Fajr is missing.
fn tomorrow_first(windows: &[PrayerWindow]) -> Option<PrayerWindow> {
    let first = windows
        .iter()
        .find(|w| w.key == PrayerKey::Fajr)
        .or_else(|| windows.first())?;
    Some(PrayerWindow {
        key: first.key,
        instant: first.instant + Duration::days(1),
    })
}

fn progress(current: Option<&PrayerWindow>, next: &PrayerWindow, now: NaiveDateTime) -> f64 {
    let Some(current) = current else {
        return 0.0;
    };
    let total = (next.instant - current.instant).num_milliseconds();
    if total <= 0 {
        // Two equal timestamps: treat the transition as instantaneous.
        return 1.0;
    }
    let elapsed = (now - current.instant).num_milliseconds();
    (elapsed as f64 / total as f64).clamp(0.0, 1.0)
}
