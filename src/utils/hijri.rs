/// Islamic month names in English (index 0 = Muharram = month 1)
const HIJRI_MONTH_NAMES: &[&str] = &[
    "Muharram",
    "Safar",
    "Rabi' al-Awwal",
    "Rabi' al-Thani",
    "Jumada al-Awwal",
    "Jumada al-Thani",
    "Rajab",
    "Sha'ban",
    "Ramadan",
    "Shawwal",
    "Dhu al-Qi'dah",
    "Dhu al-Hijjah",
];

const HIJRI_MONTH_NAMES_AR: &[&str] = &[
    "محرم",
    "صفر",
    "ربيع الأول",
    "ربيع الآخر",
    "جمادى الأولى",
    "جمادى الآخرة",
    "رجب",
    "شعبان",
    "رمضان",
    "شوال",
    "ذو القعدة",
    "ذو الحجة",
];

/// Month name used when a backend record carries none.
pub fn hijri_month_name(month: u32, lang: &str) -> &'static str {
    let table = if crate::utils::locale::locale(lang).code == "ar" {
        HIJRI_MONTH_NAMES_AR
    } else {
        HIJRI_MONTH_NAMES
    };
    match month {
        1..=12 => table[(month - 1) as usize],
        _ => "Unknown",
    }
}

/// Tabular estimate of a Hijri month's length: odd months 30 days, even 29.
/// Only used for padding cells when the real length is not cached; the
/// backend stays authoritative for every current-month day.
pub fn tabular_month_len(month: u32) -> u32 {
    if month % 2 == 1 { 30 } else { 29 }
}
