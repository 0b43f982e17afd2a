/// Per-language display conventions. Adding a language means adding a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocaleRow {
    pub code: &'static str,
    pub am: &'static str,
    pub pm: &'static str,
    pub rtl: bool,
}

const ENGLISH: LocaleRow = LocaleRow {
    code: "en",
    am: "AM",
    pm: "PM",
    rtl: false,
};

pub const LOCALES: &[LocaleRow] = &[
    LocaleRow {
        code: "ar",
        am: "ص",
        pm: "م",
        rtl: true,
    },
    ENGLISH,
    LocaleRow {
        code: "fr",
        am: "AM",
        pm: "PM",
        rtl: false,
    },
    LocaleRow {
        code: "zh",
        am: "上午",
        pm: "下午",
        rtl: false,
    },
    LocaleRow {
        code: "bn",
        am: "পূর্বাহ্ন",
        pm: "অপরাহ্ন",
        rtl: false,
    },
    LocaleRow {
        code: "tr",
        am: "AM",
        pm: "PM",
        rtl: false,
    },
];

/// Primary subtag, lowercased: "ar-SA" and "AR_sa" both become "ar".
fn primary_subtag(lang: &str) -> String {
    lang.trim()
        .split(['-', '_'])
        .next()
        .unwrap_or("")
        .to_lowercase()
}

/// Look up a language, falling back to English for unknown codes.
pub fn locale(lang: &str) -> &'static LocaleRow {
    let code = primary_subtag(lang);
    LOCALES
        .iter()
        .find(|row| row.code == code)
        .unwrap_or_else(|| {
            log::debug!("No locale row for '{}', using English", lang);
            &ENGLISH
        })
}

pub fn is_supported(lang: &str) -> bool {
    let code = primary_subtag(lang);
    LOCALES.iter().any(|row| row.code == code)
}

pub fn is_rtl(lang: &str) -> bool {
    locale(lang).rtl
}

/// Language after `lang` in table order, wrapping around.
pub fn next_language(lang: &str) -> &'static str {
    let code = locale(lang).code;
    let idx = LOCALES.iter().position(|row| row.code == code).unwrap_or(0);
    LOCALES[(idx + 1) % LOCALES.len()].code
}
