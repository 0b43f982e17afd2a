pub mod corrections;
pub mod grid;

pub use corrections::{Correction, CorrectionTable};
pub use grid::{build_grid, fallback_grid, gregorian_month_len, saturday_first_index, GridBuilder};

/// Column headers for a Saturday-first week.
pub fn weekday_headers(lang: &str) -> [&'static str; 7] {
    if crate::utils::locale::locale(lang).code == "ar" {
        ["سبت", "أحد", "إثنين", "ثلاثاء", "أربعاء", "خميس", "جمعة"]
    } else {
        ["Sat", "Sun", "Mon", "Tue", "Wed", "Thu", "Fri"]
    }
}
