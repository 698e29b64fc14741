//! Per-employee summary counters.

use serde::Serialize;

use super::cell::{Cell, Status};
use super::classify::DayCounters;
use crate::models::{AttendanceRecord, Employee};

/// Resolve a minute total: a non-zero external value wins, otherwise the
/// locally computed one.
pub fn resolve_total(external: Option<i64>, computed: i64) -> i64 {
    match external {
        Some(value) if value != 0 => value,
        _ => computed,
    }
}

/// Resolve a counter: any external value wins, zero included.
pub fn resolve_count(external: Option<i64>, counted: i64) -> i64 {
    external.unwrap_or(counted)
}

/// Minute sums recomputed from punch records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ComputedMinutes {
    /// Sum of positive check-in deltas.
    pub late: i64,
    /// Sum of negative check-out deltas (zero or negative).
    pub early: i64,
}

impl ComputedMinutes {
    pub fn from_records(records: &[AttendanceRecord]) -> Self {
        records.iter().fold(Self::default(), |acc, record| Self {
            late: acc.late.saturating_add(record.check_in_delta.max(0)),
            early: acc.early.saturating_add(record.check_out_delta.min(0)),
        })
    }
}

/// The five trailing summary values of a row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EmployeeSummary {
    pub late_count: i64,
    pub tolerance_count: i64,
    pub absence_count: i64,
    pub total_late_minutes: i64,
    pub total_early_minutes: i64,
}

impl EmployeeSummary {
    /// Fold an employee's records and classification counters into a summary.
    pub fn aggregate(employee: &Employee, counters: &DayCounters) -> Self {
        let computed = ComputedMinutes::from_records(&employee.records);
        let totals = &employee.totals;

        Self {
            late_count: resolve_count(totals.late_count, counters.late),
            tolerance_count: resolve_count(totals.tolerance_count, counters.tolerated),
            absence_count: resolve_count(totals.absence_count, counters.missing_check_in),
            total_late_minutes: resolve_total(totals.total_late_minutes, computed.late),
            total_early_minutes: resolve_total(totals.total_early_minutes, computed.early),
        }
    }

    pub fn late_minutes_status(&self) -> Status {
        if self.total_late_minutes > 0 {
            Status::Attention
        } else {
            Status::Ok
        }
    }

    pub fn early_minutes_status(&self) -> Status {
        if self.total_early_minutes < 0 {
            Status::Attention
        } else {
            Status::Ok
        }
    }

    /// Cells in summary column order.
    pub fn cells(&self) -> [Cell; 5] {
        [
            Cell::number(self.late_count),
            Cell::number(self.tolerance_count),
            Cell::number(self.absence_count),
            Cell::number(self.total_late_minutes).with_status(self.late_minutes_status()),
            Cell::number(self.total_early_minutes).with_status(self.early_minutes_status()),
        ]
    }
}
