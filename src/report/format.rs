//! Display formatting for the demographic columns and report metadata.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use super::calendar::{CalendarDay, WeekdayCode, month_name, parse_request_date};
use super::cell::PLACEHOLDER;
use crate::models::Employee;

/// Derived employment status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EmploymentStatus {
    Active,
    Inactive,
    Terminated,
}

impl EmploymentStatus {
    /// Termination outranks the inactive flag.
    pub fn of(employee: &Employee) -> Self {
        if employee.termination_date.is_some() {
            Self::Terminated
        } else if employee.inactive {
            Self::Inactive
        } else {
            Self::Active
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Active => "Activo",
            Self::Inactive => "Inactivo",
            Self::Terminated => "Cesado",
        }
    }
}

/// First and last name parts trimmed and joined.
pub fn full_name(first: Option<&str>, last: Option<&str>) -> String {
    let name = [first, last]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    if name.is_empty() { PLACEHOLDER.to_string() } else { name }
}

/// `dd/mm/yyyy`, or the placeholder.
pub fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%d/%m/%Y").to_string())
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}

/// Normalize a work-day category.
pub fn work_days_label(category: Option<&str>) -> String {
    category_label(category, &[("lun-vier", "LUNES A VIERNES"), ("lun-sab", "LUNES A SABADO")])
}

/// Normalize a rest-day category.
pub fn rest_days_label(category: Option<&str>) -> String {
    category_label(category, &[("sab-dom", "S Y D"), ("dom", "D")])
}

fn category_label(category: Option<&str>, vocabulary: &[(&str, &str)]) -> String {
    let Some(category) = category.map(str::trim).filter(|c| !c.is_empty()) else {
        return PLACEHOLDER.to_string();
    };
    let key = category.to_lowercase();

    vocabulary
        .iter()
        .find(|(raw, _)| *raw == key)
        .map(|(_, label)| label.to_string())
        .unwrap_or_else(|| category.to_uppercase())
}

/// Official schedule, e.g. `08:30 - 18:30`.
pub fn schedule_label(check_in: Option<&str>, check_out: Option<&str>) -> String {
    match (
        check_in.map(str::trim).filter(|s| !s.is_empty()),
        check_out.map(str::trim).filter(|s| !s.is_empty()),
    ) {
        (Some(start), Some(end)) => format!("{start} - {end}"),
        _ => PLACEHOLDER.to_string(),
    }
}

/// Remote-day summary: `NO TT`, `LUN Y VIE`, or `LUN, MIE, VIE`.
pub fn remote_days_label<S: AsRef<str>>(codes: &[S]) -> String {
    let labels: Vec<String> = codes
        .iter()
        .map(AsRef::as_ref)
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .map(|code| match WeekdayCode::parse(code) {
            Some(parsed) => parsed.abbreviation().to_string(),
            None => code.to_uppercase(),
        })
        .collect();

    match labels.len() {
        0 => "NO TT".to_string(),
        1 | 2 => labels.join(" Y "),
        _ => labels.join(", "),
    }
}

/// Human duration: `0`, `45m`, `2h`, `1h 5m`. Sign is preserved.
pub fn format_minutes(minutes: i64) -> String {
    if minutes == 0 {
        return "0".to_string();
    }
    let sign = if minutes < 0 { "-" } else { "" };
    let abs = minutes.unsigned_abs();

    if abs < 60 {
        return format!("{sign}{abs}m");
    }
    let (hours, rest) = (abs / 60, abs % 60);
    if rest == 0 {
        format!("{sign}{hours}h")
    } else {
        format!("{sign}{hours}h {rest}m")
    }
}

/// Suggested download name for a requested range.
///
/// Bounds that were supplied and parse are included; with neither, the
/// configured default name is used.
pub fn output_file_name(start: Option<&str>, end: Option<&str>, default_name: &str) -> String {
    let start = start.and_then(parse_request_date);
    let end = end.and_then(parse_request_date);

    if start.is_none() && end.is_none() {
        return default_name.to_string();
    }

    let mut name = String::from("marcaciones");
    if let Some(start) = start {
        name.push_str(&format!("_desde_{start}"));
    }
    if let Some(end) = end {
        name.push_str(&format!("_hasta_{end}"));
    }
    name.push_str(".xlsx");
    name
}

/// Sheet title from the first day shown, e.g. `FEBRERO 2025`.
pub fn sheet_title(days: &[CalendarDay]) -> String {
    match days.first() {
        Some(day) => format!("{} {}", month_name(day.date.month()), day.date.year()),
        None => "MARCACIONES".to_string(),
    }
}

/// Period line for the report header, e.g. `Del 01/02/2025 al 28/02/2025`.
pub fn period_label(days: &[CalendarDay]) -> Option<String> {
    let (first, last) = (days.first()?, days.last()?);
    Some(format!(
        "Del {} al {}",
        first.date.format("%d/%m/%Y"),
        last.date.format("%d/%m/%Y")
    ))
}
