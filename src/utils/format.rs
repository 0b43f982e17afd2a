use chrono::{NaiveTime, Timelike};
use unicode_width::UnicodeWidthStr;

use crate::utils::locale::locale;

/// Placeholder for an absent time value.
pub const NO_TIME: &str = "--";
/// Placeholder for an absent countdown.
pub const NO_COUNTDOWN: &str = "--:--:--";

/// Parse "H:MM", "HH:MM" or "HH:MM:SS". Anything after the first whitespace
/// (e.g. the backend's " (+03)" zone annotation) is ignored.
pub fn parse_clock(s: &str) -> Option<NaiveTime> {
    let token = s.split_whitespace().next()?;
    let parts: Vec<&str> = token.split(':').collect();
    if parts.len() < 2 || parts.len() > 3 {
        return None;
    }
    let digits = |p: &str| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit());
    if !parts.iter().all(|p| digits(p)) || parts[0].len() > 2 || parts[1].len() != 2 {
        return None;
    }
    let hour: u32 = parts[0].parse().ok()?;
    let minute: u32 = parts[1].parse().ok()?;
    let second: u32 = match parts.get(2) {
        Some(s) if s.len() == 2 => s.parse().ok()?,
        Some(_) => return None,
        None => 0,
    };
    NaiveTime::from_hms_opt(hour, minute, second)
}

/// Render a clock string in 12-hour form with the language's AM/PM glyphs.
/// Missing or unparseable input (including "--") yields "--". Seconds are dropped.
pub fn format_12_hour(hhmm: Option<&str>, lang: &str) -> String {
    let time = match hhmm.map(str::trim) {
        None | Some("") | Some(NO_TIME) => return NO_TIME.to_string(),
        Some(s) => match parse_clock(s) {
            Some(t) => t,
            None => {
                log::debug!("Unparseable clock value '{}'", s);
                return NO_TIME.to_string();
            }
        },
    };
    format_time_12(time, lang)
}

pub fn format_time_12(time: NaiveTime, lang: &str) -> String {
    let row = locale(lang);
    let (is_pm, hour) = time.hour12();
    let suffix = if is_pm { row.pm } else { row.am };
    format!("{}:{:02} {}", hour, time.minute(), suffix)
}

/// Format a duration in seconds to "Xh Ym" or "Ym" string
pub fn format_duration_secs(secs: i64) -> String {
    if secs <= 0 {
        return "now".to_string();
    }
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}

/// "HH:MM:SS" for a countdown.
pub fn format_hms(secs: u64) -> String {
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}

/// Create a simple ASCII progress bar
pub fn progress_bar(fraction: f64, width: usize) -> String {
    let ratio = if fraction.is_finite() {
        fraction.clamp(0.0, 1.0)
    } else {
        0.0
    };
    let filled_count = (ratio * width as f64).round() as usize;
    let empty_count = width.saturating_sub(filled_count);
    format!("{}{}", "█".repeat(filled_count), "░".repeat(empty_count))
}

/// Pad to `width` terminal columns, on the left when `right_align` is set.
pub fn pad(s: &str, width: usize, right_align: bool) -> String {
    let fill = " ".repeat(width.saturating_sub(s.width()));
    if right_align {
        format!("{}{}", fill, s)
    } else {
        format!("{}{}", s, fill)
    }
}
