//! Attendance punch records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::lenient;

/// One day of punches for one employee.
///
/// Deltas are minutes relative to the employee's official schedule. A positive
/// check-in delta means a late arrival; a negative check-out delta means the
/// employee left early. The boolean flags come from upstream and are kept for
/// reference only: classification trusts the deltas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttendanceRecord {
    pub date: NaiveDate,
    pub check_in: Option<String>,
    pub check_out: Option<String>,
    pub check_in_delta: i64,
    pub check_out_delta: i64,
    pub marked_in: Option<bool>,
    pub marked_out: Option<bool>,
    pub arrived_late: bool,
    pub left_early: bool,
}

/// Wire shape of a punch record, decoded without failing on bad fields.
#[derive(Debug, Default, Deserialize)]
struct RecordWire {
    #[serde(default, rename = "fecha", alias = "date", deserialize_with = "lenient::date")]
    date: Option<NaiveDate>,
    #[serde(default, rename = "hora_ingreso", alias = "check_in", deserialize_with = "lenient::string")]
    check_in: Option<String>,
    #[serde(default, rename = "hora_salida", alias = "check_out", deserialize_with = "lenient::string")]
    check_out: Option<String>,
    #[serde(
        default,
        rename = "diferencia_ingreso",
        alias = "check_in_delta",
        deserialize_with = "lenient::integer"
    )]
    check_in_delta: Option<i64>,
    #[serde(
        default,
        rename = "diferencia_salida",
        alias = "check_out_delta",
        deserialize_with = "lenient::integer"
    )]
    check_out_delta: Option<i64>,
    #[serde(default, rename = "marco_ingreso", alias = "marked_in", deserialize_with = "lenient::optional_flag")]
    marked_in: Option<bool>,
    #[serde(default, rename = "marco_salida", alias = "marked_out", deserialize_with = "lenient::optional_flag")]
    marked_out: Option<bool>,
    #[serde(default, rename = "ingreso_tarde", alias = "arrived_late", deserialize_with = "lenient::flag")]
    arrived_late: bool,
    #[serde(default, rename = "salida_temprano", alias = "left_early", deserialize_with = "lenient::flag")]
    left_early: bool,
}

impl AttendanceRecord {
    /// Create a record with both punches present and the given deltas.
    pub fn new(date: NaiveDate, check_in: &str, check_out: &str, check_in_delta: i64, check_out_delta: i64) -> Self {
        Self {
            date,
            check_in: Some(check_in.to_string()),
            check_out: Some(check_out.to_string()),
            check_in_delta,
            check_out_delta,
            marked_in: Some(true),
            marked_out: Some(true),
            arrived_late: check_in_delta > 0,
            left_early: check_out_delta < 0,
        }
    }

    /// Parse one upstream record.
    ///
    /// Returns `None` for values that are not objects or that lack a parseable
    /// date; such records are skipped by the caller.
    pub fn from_value(value: &Value) -> Option<Self> {
        if !value.is_object() {
            return None;
        }
        let wire: RecordWire = match serde_json::from_value(value.clone()) {
            Ok(wire) => wire,
            Err(e) => {
                tracing::warn!("Undecodable attendance record: {e}");
                return None;
            }
        };
        let date = wire.date?;

        Some(Self {
            date,
            check_in: wire.check_in,
            check_out: wire.check_out,
            check_in_delta: wire.check_in_delta.unwrap_or(0),
            check_out_delta: wire.check_out_delta.unwrap_or(0),
            marked_in: wire.marked_in,
            marked_out: wire.marked_out,
            arrived_late: wire.arrived_late,
            left_early: wire.left_early,
        })
    }
}

/// Decode a record list, dropping malformed entries.
pub(crate) fn records<'de, D>(deserializer: D) -> Result<Vec<AttendanceRecord>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = lenient::raw_list(deserializer)?;
    let total = raw.len();
    let parsed: Vec<AttendanceRecord> = raw.iter().filter_map(AttendanceRecord::from_value).collect();

    if parsed.len() < total {
        tracing::debug!("Skipped {} malformed attendance records", total - parsed.len());
    }

    Ok(parsed)
}
