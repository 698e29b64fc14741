//! Calendar expansion for the report's day columns.

use std::fmt;

use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// Longest span a report may cover, in days (inclusive of both ends).
pub const MAX_RANGE_DAYS: u64 = 31;

/// Spanish month names as printed in day headers and sheet titles.
const MONTH_NAMES: [&str; 12] = [
    "ENERO",
    "FEBRERO",
    "MARZO",
    "ABRIL",
    "MAYO",
    "JUNIO",
    "JULIO",
    "AGOSTO",
    "SEPTIEMBRE",
    "OCTUBRE",
    "NOVIEMBRE",
    "DICIEMBRE",
];

/// Days shown when no usable range is requested: 03..14 February 2025.
const DEFAULT_DAYS: [(u32, WeekdayCode); 12] = [
    (3, WeekdayCode::Lun),
    (4, WeekdayCode::Mar),
    (5, WeekdayCode::Mie),
    (6, WeekdayCode::Jue),
    (7, WeekdayCode::Vie),
    (8, WeekdayCode::Sab),
    (9, WeekdayCode::Dom),
    (10, WeekdayCode::Lun),
    (11, WeekdayCode::Mar),
    (12, WeekdayCode::Mie),
    (13, WeekdayCode::Jue),
    (14, WeekdayCode::Vie),
];
const DEFAULT_YEAR: i32 = 2025;
const DEFAULT_MONTH: u32 = 2;

/// Short weekday code used by remote-work configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekdayCode {
    Lun,
    Mar,
    Mie,
    Jue,
    Vie,
    Sab,
    Dom,
}

impl WeekdayCode {
    pub const ALL: [WeekdayCode; 7] = [
        Self::Lun,
        Self::Mar,
        Self::Mie,
        Self::Jue,
        Self::Vie,
        Self::Sab,
        Self::Dom,
    ];

    pub fn from_weekday(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Mon => Self::Lun,
            Weekday::Tue => Self::Mar,
            Weekday::Wed => Self::Mie,
            Weekday::Thu => Self::Jue,
            Weekday::Fri => Self::Vie,
            Weekday::Sat => Self::Sab,
            Weekday::Sun => Self::Dom,
        }
    }

    /// Parse a configured code.
    ///
    /// Case-insensitive; accepts Spanish codes (`lun`, `vier`), Spanish names
    /// with or without accents, and English short or full names.
    pub fn parse(input: &str) -> Option<Self> {
        let code = input.trim().to_lowercase();
        let code = code
            .replace('á', "a")
            .replace('é', "e")
            .replace('í', "i")
            .replace('ó', "o")
            .replace('ú', "u");

        match code.as_str() {
            "lun" | "lu" | "lunes" | "mon" | "monday" => Some(Self::Lun),
            "mar" | "ma" | "martes" | "tue" | "tues" | "tuesday" => Some(Self::Mar),
            "mie" | "mi" | "miercoles" | "wed" | "wednesday" => Some(Self::Mie),
            "jue" | "ju" | "jueves" | "thu" | "thur" | "thurs" | "thursday" => Some(Self::Jue),
            "vie" | "vi" | "vier" | "viernes" | "fri" | "friday" => Some(Self::Vie),
            "sab" | "sa" | "sabado" | "sat" | "saturday" => Some(Self::Sab),
            "dom" | "do" | "domingo" | "sun" | "sunday" => Some(Self::Dom),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lun => "lun",
            Self::Mar => "mar",
            Self::Mie => "mie",
            Self::Jue => "jue",
            Self::Vie => "vie",
            Self::Sab => "sab",
            Self::Dom => "dom",
        }
    }

    /// Upper-case abbreviation used in the remote-day summary column.
    pub fn abbreviation(self) -> &'static str {
        match self {
            Self::Lun => "LUN",
            Self::Mar => "MAR",
            Self::Mie => "MIE",
            Self::Jue => "JUE",
            Self::Vie => "VIE",
            Self::Sab => "SAB",
            Self::Dom => "DOM",
        }
    }

    /// Localized weekday name for display.
    pub fn day_name(self) -> &'static str {
        match self {
            Self::Lun => "LUNES",
            Self::Mar => "MARTES",
            Self::Mie => "MIÉRCOLES",
            Self::Jue => "JUEVES",
            Self::Vie => "VIERNES",
            Self::Sab => "SÁBADO",
            Self::Dom => "DOMINGO",
        }
    }
}

impl fmt::Display for WeekdayCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inclusive date range, always ordered and at most [`MAX_RANGE_DAYS`] long.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Build a normalized range: reversed bounds are swapped and the end is
    /// clamped to `start + 30` days.
    pub fn new(a: NaiveDate, b: NaiveDate) -> Self {
        let (start, end) = if b < a { (b, a) } else { (a, b) };
        let cap = MAX_RANGE_DAYS - 1;
        let end = match start.checked_add_days(Days::new(cap)) {
            Some(limit) if end > limit => limit,
            _ => end,
        };
        Self { start, end }
    }

    /// Resolve a requested range from two `YYYY-MM-DD` strings.
    ///
    /// Returns `None` when either bound is absent or unparseable.
    pub fn from_request(start: Option<&str>, end: Option<&str>) -> Option<Self> {
        let start = parse_request_date(start?)?;
        let end = parse_request_date(end?)?;
        Some(Self::new(start, end))
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of calendar days covered, both ends included.
    pub fn len_days(&self) -> u64 {
        (self.end - self.start).num_days().unsigned_abs() + 1
    }
}

/// Parse a strict `YYYY-MM-DD` request date.
pub fn parse_request_date(input: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").ok()
}

/// One report column group: a date with its display and matching metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub weekday_name: &'static str,
    pub code: WeekdayCode,
}

impl CalendarDay {
    pub fn new(date: NaiveDate) -> Self {
        let code = WeekdayCode::from_weekday(date.weekday());
        Self {
            date,
            weekday_name: code.day_name(),
            code,
        }
    }

    /// Header label, e.g. `03 FEBRERO 2025`.
    pub fn header_label(&self) -> String {
        format!(
            "{day:02} {month} {year}",
            day = self.date.day(),
            month = month_name(self.date.month()),
            year = self.date.year()
        )
    }

    /// ISO date used to match attendance records.
    pub fn iso(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}

/// Spanish month name for a 1-based month number.
pub fn month_name(month: u32) -> &'static str {
    MONTH_NAMES
        .get(month.saturating_sub(1) as usize)
        .copied()
        .unwrap_or("")
}

/// Expand a range into one [`CalendarDay`] per date, in order.
pub fn expand(range: &DateRange) -> Vec<CalendarDay> {
    range
        .start
        .iter_days()
        .take_while(|date| *date <= range.end)
        .map(CalendarDay::new)
        .collect()
}

/// The fixed 12-day calendar used when no range was resolved.
pub fn default_days() -> Vec<CalendarDay> {
    DEFAULT_DAYS
        .iter()
        .filter_map(|&(day, code)| {
            NaiveDate::from_ymd_opt(DEFAULT_YEAR, DEFAULT_MONTH, day).map(|date| CalendarDay {
                date,
                weekday_name: code.day_name(),
                code,
            })
        })
        .collect()
}

/// Day columns for a report: the expanded range, or the default calendar.
pub fn resolve_days(range: Option<&DateRange>) -> Vec<CalendarDay> {
    match range {
        Some(range) => expand(range),
        None => default_days(),
    }
}
