//! Employee records as supplied by the attendance batch.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::attendance::{self, AttendanceRecord};
use super::lenient;

/// Summary totals computed upstream, if the source system supplies them.
///
/// Unparseable values decode to `None` and are recomputed locally.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalTotals {
    #[serde(default, rename = "tardanzas", alias = "late_count", deserialize_with = "lenient::integer")]
    pub late_count: Option<i64>,
    #[serde(default, rename = "tolerancias", alias = "tolerance_count", deserialize_with = "lenient::integer")]
    pub tolerance_count: Option<i64>,
    #[serde(default, rename = "faltas", alias = "absence_count", deserialize_with = "lenient::integer")]
    pub absence_count: Option<i64>,
    #[serde(
        default,
        rename = "minutos_tardanza",
        alias = "total_late_minutes",
        deserialize_with = "lenient::integer"
    )]
    pub total_late_minutes: Option<i64>,
    #[serde(
        default,
        rename = "minutos_salida_temprana",
        alias = "total_early_minutes",
        deserialize_with = "lenient::integer"
    )]
    pub total_early_minutes: Option<i64>,
}

/// An employee with their attendance for the requested period.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// Identity key (national ID in the source system). Empty means invalid.
    #[serde(
        default,
        rename = "emp_code",
        alias = "code",
        alias = "employee_code",
        deserialize_with = "lenient::string_or_empty"
    )]
    pub code: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::date")]
    pub hire_date: Option<NaiveDate>,
    #[serde(default, rename = "fecha_cese", alias = "termination_date", deserialize_with = "lenient::date")]
    pub termination_date: Option<NaiveDate>,
    #[serde(default, rename = "is_unactive", alias = "inactive", deserialize_with = "lenient::flag")]
    pub inactive: bool,
    #[serde(default, rename = "position_name", alias = "position", deserialize_with = "lenient::string")]
    pub position: Option<String>,
    #[serde(default, rename = "dept_name", alias = "department", deserialize_with = "lenient::string")]
    pub department: Option<String>,
    #[serde(default, rename = "gerencia", alias = "management", deserialize_with = "lenient::string")]
    pub management: Option<String>,
    #[serde(default, rename = "registro", alias = "registry", deserialize_with = "lenient::string")]
    pub registry: Option<String>,
    /// Official check-in hour, e.g. `08:30`.
    #[serde(default, rename = "hora_ingreso", alias = "schedule_in", deserialize_with = "lenient::string")]
    pub schedule_in: Option<String>,
    /// Official check-out hour, e.g. `18:30`.
    #[serde(default, rename = "hora_salida", alias = "schedule_out", deserialize_with = "lenient::string")]
    pub schedule_out: Option<String>,
    /// Work-day category such as `lun-vier`.
    #[serde(default, rename = "dias_labores", alias = "work_days", deserialize_with = "lenient::string")]
    pub work_days: Option<String>,
    /// Rest-day category such as `sab-dom`.
    #[serde(default, rename = "dias_descanso", alias = "rest_days", deserialize_with = "lenient::string")]
    pub rest_days: Option<String>,
    /// Recurring remote weekday codes (`lun`, `mar`, ..., `vier`).
    #[serde(default, rename = "dias_remoto", alias = "remote_days", deserialize_with = "lenient::string_list")]
    pub remote_days: Vec<String>,
    #[serde(default, rename = "marcaciones", alias = "records", deserialize_with = "attendance::records")]
    pub records: Vec<AttendanceRecord>,
    #[serde(flatten)]
    pub totals: ExternalTotals,
}

impl Employee {
    /// Create an employee with only an identity code.
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            ..Default::default()
        }
    }

    /// Parse one employee from the batch.
    ///
    /// Returns `None` when the value is not an object or has no identity code.
    pub fn from_value(value: &Value) -> Option<Self> {
        if !value.is_object() {
            return None;
        }
        let employee: Employee = match serde_json::from_value(value.clone()) {
            Ok(employee) => employee,
            Err(e) => {
                tracing::warn!("Undecodable employee entry: {e}");
                return None;
            }
        };
        employee.has_identity().then_some(employee)
    }

    /// Whether the employee carries a usable identity code.
    pub fn has_identity(&self) -> bool {
        !self.code.trim().is_empty()
    }
}
