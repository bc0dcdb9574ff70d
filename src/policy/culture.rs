//! Culture tables used for locale-aware parsing and rendering.
//!
//! Only the handful of facts the converters need are carried: separators,
//! signs, month/day names and the order of date components.

/// Order of day, month and year in an all-numeric date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateOrder {
    /// 03/15/2024
    MonthDayYear,
    /// 15/03/2024
    DayMonthYear,
    /// 2024-03-15
    YearMonthDay,
}

#[derive(Debug, PartialEq, Eq)]
pub struct Culture {
    pub id: &'static str,
    pub decimal_separator: char,
    pub group_separator: char,
    pub currency_symbol: &'static str,
    pub negative_sign: char,
    pub positive_sign: char,
    pub nan_symbol: &'static str,
    pub positive_infinity_symbol: &'static str,
    pub negative_infinity_symbol: &'static str,
    pub date_order: DateOrder,
    pub date_separator: char,
    pub am_designator: &'static str,
    pub pm_designator: &'static str,
    pub month_names: [&'static str; 12],
    pub abbreviated_month_names: [&'static str; 12],
    /// Sunday first
    pub day_names: [&'static str; 7],
    pub abbreviated_day_names: [&'static str; 7],
    /// chrono pattern for the general date/time text form
    pub datetime_pattern: &'static str,
}

const ENGLISH_MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];
const ENGLISH_MONTHS_ABBR: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];
const ENGLISH_DAYS: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];
const ENGLISH_DAYS_ABBR: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

const GERMAN_MONTHS: [&str; 12] = [
    "Januar",
    "Februar",
    "März",
    "April",
    "Mai",
    "Juni",
    "Juli",
    "August",
    "September",
    "Oktober",
    "November",
    "Dezember",
];
const GERMAN_MONTHS_ABBR: [&str; 12] = [
    "Jan", "Feb", "Mär", "Apr", "Mai", "Jun", "Jul", "Aug", "Sep", "Okt", "Nov", "Dez",
];
const GERMAN_DAYS: [&str; 7] = [
    "Sonntag",
    "Montag",
    "Dienstag",
    "Mittwoch",
    "Donnerstag",
    "Freitag",
    "Samstag",
];
const GERMAN_DAYS_ABBR: [&str; 7] = ["So", "Mo", "Di", "Mi", "Do", "Fr", "Sa"];

pub const INVARIANT: Culture = Culture {
    id: "",
    decimal_separator: '.',
    group_separator: ',',
    currency_symbol: "¤",
    negative_sign: '-',
    positive_sign: '+',
    nan_symbol: "NaN",
    positive_infinity_symbol: "Infinity",
    negative_infinity_symbol: "-Infinity",
    date_order: DateOrder::MonthDayYear,
    date_separator: '/',
    am_designator: "AM",
    pm_designator: "PM",
    month_names: ENGLISH_MONTHS,
    abbreviated_month_names: ENGLISH_MONTHS_ABBR,
    day_names: ENGLISH_DAYS,
    abbreviated_day_names: ENGLISH_DAYS_ABBR,
    datetime_pattern: "%m/%d/%Y %H:%M:%S",
};

pub const EN_US: Culture = Culture {
    id: "en-US",
    currency_symbol: "$",
    datetime_pattern: "%-m/%-d/%Y %-I:%M:%S %p",
    ..INVARIANT
};

pub const EN_GB: Culture = Culture {
    id: "en-GB",
    currency_symbol: "£",
    date_order: DateOrder::DayMonthYear,
    am_designator: "am",
    pm_designator: "pm",
    datetime_pattern: "%d/%m/%Y %H:%M:%S",
    ..INVARIANT
};

pub const DE_DE: Culture = Culture {
    id: "de-DE",
    decimal_separator: ',',
    group_separator: '.',
    currency_symbol: "€",
    date_order: DateOrder::DayMonthYear,
    date_separator: '.',
    am_designator: "",
    pm_designator: "",
    month_names: GERMAN_MONTHS,
    abbreviated_month_names: GERMAN_MONTHS_ABBR,
    day_names: GERMAN_DAYS,
    abbreviated_day_names: GERMAN_DAYS_ABBR,
    datetime_pattern: "%d.%m.%Y %H:%M:%S",
    ..INVARIANT
};

/// Swiss German uses `'` grouping and `.` decimals.
pub const DE_CH: Culture = Culture {
    id: "de-CH",
    decimal_separator: '.',
    group_separator: '\'',
    currency_symbol: "CHF",
    ..DE_DE
};

/// French (France). Grouping uses U+00A0 NO-BREAK SPACE.
pub const FR_FR: Culture = Culture {
    id: "fr-FR",
    decimal_separator: ',',
    group_separator: '\u{a0}',
    currency_symbol: "€",
    date_order: DateOrder::DayMonthYear,
    date_separator: '/',
    am_designator: "",
    pm_designator: "",
    month_names: [
        "janvier",
        "février",
        "mars",
        "avril",
        "mai",
        "juin",
        "juillet",
        "août",
        "septembre",
        "octobre",
        "novembre",
        "décembre",
    ],
    abbreviated_month_names: [
        "janv", "févr", "mars", "avr", "mai", "juin", "juil", "août", "sept", "oct", "nov", "déc",
    ],
    day_names: [
        "dimanche", "lundi", "mardi", "mercredi", "jeudi", "vendredi", "samedi",
    ],
    abbreviated_day_names: ["dim", "lun", "mar", "mer", "jeu", "ven", "sam"],
    datetime_pattern: "%d/%m/%Y %H:%M:%S",
    ..INVARIANT
};

pub const ES_ES: Culture = Culture {
    id: "es-ES",
    decimal_separator: ',',
    group_separator: '.',
    currency_symbol: "€",
    date_order: DateOrder::DayMonthYear,
    date_separator: '/',
    am_designator: "a. m.",
    pm_designator: "p. m.",
    month_names: [
        "enero",
        "febrero",
        "marzo",
        "abril",
        "mayo",
        "junio",
        "julio",
        "agosto",
        "septiembre",
        "octubre",
        "noviembre",
        "diciembre",
    ],
    abbreviated_month_names: [
        "ene", "feb", "mar", "abr", "may", "jun", "jul", "ago", "sept", "oct", "nov", "dic",
    ],
    day_names: [
        "domingo",
        "lunes",
        "martes",
        "miércoles",
        "jueves",
        "viernes",
        "sábado",
    ],
    abbreviated_day_names: ["dom", "lun", "mar", "mié", "jue", "vie", "sáb"],
    datetime_pattern: "%d/%m/%Y %H:%M:%S",
    ..INVARIANT
};

pub const IT_IT: Culture = Culture {
    id: "it-IT",
    decimal_separator: ',',
    group_separator: '.',
    currency_symbol: "€",
    date_order: DateOrder::DayMonthYear,
    date_separator: '/',
    am_designator: "",
    pm_designator: "",
    month_names: [
        "gennaio",
        "febbraio",
        "marzo",
        "aprile",
        "maggio",
        "giugno",
        "luglio",
        "agosto",
        "settembre",
        "ottobre",
        "novembre",
        "dicembre",
    ],
    abbreviated_month_names: [
        "gen", "feb", "mar", "apr", "mag", "giu", "lug", "ago", "set", "ott", "nov", "dic",
    ],
    day_names: [
        "domenica",
        "lunedì",
        "martedì",
        "mercoledì",
        "giovedì",
        "venerdì",
        "sabato",
    ],
    abbreviated_day_names: ["dom", "lun", "mar", "mer", "gio", "ven", "sab"],
    datetime_pattern: "%d/%m/%Y %H:%M:%S",
    ..INVARIANT
};

/// Swedish writes dates year first.
pub const SV_SE: Culture = Culture {
    id: "sv-SE",
    decimal_separator: ',',
    group_separator: '\u{a0}',
    currency_symbol: "kr",
    negative_sign: '-',
    date_order: DateOrder::YearMonthDay,
    date_separator: '-',
    am_designator: "fm",
    pm_designator: "em",
    month_names: [
        "januari",
        "februari",
        "mars",
        "april",
        "maj",
        "juni",
        "juli",
        "augusti",
        "september",
        "oktober",
        "november",
        "december",
    ],
    abbreviated_month_names: [
        "jan", "feb", "mars", "apr", "maj", "juni", "juli", "aug", "sep", "okt", "nov", "dec",
    ],
    day_names: [
        "söndag", "måndag", "tisdag", "onsdag", "torsdag", "fredag", "lördag",
    ],
    abbreviated_day_names: ["sön", "mån", "tis", "ons", "tors", "fre", "lör"],
    datetime_pattern: "%Y-%m-%d %H:%M:%S",
    ..INVARIANT
};

static ALL: [&Culture; 9] = [
    &INVARIANT, &EN_US, &EN_GB, &DE_DE, &DE_CH, &FR_FR, &ES_ES, &IT_IT, &SV_SE,
];

impl Culture {
    pub fn invariant() -> &'static Culture {
        &INVARIANT
    }

    /// Every built-in culture, invariant first.
    pub fn all() -> &'static [&'static Culture] {
        &ALL
    }

    /// Look a culture up by locale tag.
    ///
    /// `""`, `"invariant"` and `"iv"` name the invariant culture. Tags match
    /// case-insensitively, `_` is treated as `-`, POSIX suffixes such as
    /// `.UTF-8` or `@euro` are dropped, and unknown regions fall back to the
    /// language (`fr-CA` → `fr-FR`).
    pub fn get(id: &str) -> Option<&'static Culture> {
        let key = normalize_locale_id(id);
        match key.as_str() {
            "" | "invariant" | "iv" => return Some(&INVARIANT),
            _ => {}
        }

        if let Some(culture) = ALL.iter().find(|c| c.id.to_ascii_lowercase() == key) {
            return Some(culture);
        }

        let lang = key.split('-').next().unwrap_or("");
        let fallback = match lang {
            "en" => &EN_US,
            "de" => &DE_DE,
            "fr" => &FR_FR,
            "es" => &ES_ES,
            "it" => &IT_IT,
            "sv" => &SV_SE,
            _ => return None,
        };
        Some(fallback)
    }

    pub fn is_invariant(&self) -> bool {
        self.id.is_empty()
    }

    /// Display name, `"invariant"` for the invariant culture.
    pub fn name(&self) -> &'static str {
        if self.is_invariant() {
            "invariant"
        } else {
            self.id
        }
    }

    /// Group separators that are whitespace also accept a plain space.
    pub fn is_group_separator(&self, c: char) -> bool {
        c == self.group_separator
            || (self.group_separator.is_whitespace() && (c == ' ' || c.is_whitespace()))
    }

    /// 1-based month for a full or abbreviated month name.
    ///
    /// Matches case-insensitively, ignores a trailing `.`, and falls back to
    /// English names for non-English cultures.
    pub fn month_from_name(&self, token: &str) -> Option<u32> {
        let token = token.trim_end_matches('.').to_lowercase();
        if token.is_empty() {
            return None;
        }
        let find = |names: &[&str; 12]| {
            names
                .iter()
                .position(|name| name.to_lowercase() == token)
                .map(|idx| idx as u32 + 1)
        };
        find(&self.month_names)
            .or_else(|| find(&self.abbreviated_month_names))
            .or_else(|| find(&ENGLISH_MONTHS))
            .or_else(|| find(&ENGLISH_MONTHS_ABBR))
    }

    /// True for a full or abbreviated weekday name.
    pub fn is_day_name(&self, token: &str) -> bool {
        let token = token.trim_end_matches('.').to_lowercase();
        self.day_names
            .iter()
            .chain(self.abbreviated_day_names.iter())
            .chain(ENGLISH_DAYS.iter())
            .chain(ENGLISH_DAYS_ABBR.iter())
            .any(|name| name.to_lowercase() == token)
    }

    /// AM/PM designators paired with "is PM", culture first, then the
    /// invariant spellings.
    pub fn meridiem_designators(&self) -> Vec<(&'static str, bool)> {
        [
            (self.pm_designator, true),
            (self.am_designator, false),
            ("p. m.", true),
            ("a. m.", false),
            ("p.m.", true),
            ("a.m.", false),
            ("PM", true),
            ("AM", false),
        ]
        .into_iter()
        .filter(|(designator, _)| !designator.is_empty())
        .collect()
    }
}

fn normalize_locale_id(id: &str) -> String {
    let mut key: String = id
        .trim()
        .chars()
        .map(|c| if c == '_' { '-' } else { c.to_ascii_lowercase() })
        .collect();

    if let Some(idx) = key.find('.') {
        key.truncate(idx);
    }
    if let Some(idx) = key.find('@') {
        key.truncate(idx);
    }
    if let Some(idx) = key.find("-u-") {
        key.truncate(idx);
    }
    if let Some(idx) = key.find("-x-") {
        key.truncate(idx);
    }
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_normalizes_tags() {
        assert_eq!(Culture::get("de_DE.UTF-8").unwrap().id, "de-DE");
        assert_eq!(Culture::get("EN-gb").unwrap().id, "en-GB");
        assert_eq!(Culture::get("fr-CA").unwrap().id, "fr-FR");
        assert_eq!(Culture::get("de-AT@euro").unwrap().id, "de-DE");
        assert!(Culture::get("").unwrap().is_invariant());
        assert!(Culture::get("invariant").unwrap().is_invariant());
        assert!(Culture::get("xx-YY").is_none());
    }

    #[test]
    fn test_month_names() {
        assert_eq!(DE_DE.month_from_name("März"), Some(3));
        assert_eq!(DE_DE.month_from_name("okt."), Some(10));
        assert_eq!(DE_DE.month_from_name("March"), Some(3));
        assert_eq!(FR_FR.month_from_name("Août"), Some(8));
        assert_eq!(EN_US.month_from_name("sept"), None);
        assert_eq!(EN_US.month_from_name("sep"), Some(9));
    }

    #[test]
    fn test_meridiem_designators_prefer_culture() {
        assert_eq!(SV_SE.meridiem_designators()[0], ("em", true));
        assert_eq!(DE_DE.meridiem_designators()[0], ("p. m.", true));
        assert!(EN_US.meridiem_designators().contains(&("AM", false)));
    }

    #[test]
    fn test_whitespace_group_separator_accepts_space() {
        assert!(FR_FR.is_group_separator(' '));
        assert!(FR_FR.is_group_separator('\u{a0}'));
        assert!(!DE_DE.is_group_separator(' '));
    }

    #[test]
    fn test_day_names() {
        assert!(DE_DE.is_day_name("Montag"));
        assert!(EN_US.is_day_name("tue"));
        assert!(!EN_US.is_day_name("March"));
    }
}
