//! Report grid assembly.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::aggregate::EmployeeSummary;
use super::calendar::{self, CalendarDay, DateRange};
use super::cell::Cell;
use super::classify::{DayCounters, PunchClassifier};
use super::format::{self, EmploymentStatus};
use super::remote::RemoteSchedule;
use crate::error::{AppError, Result};
use crate::models::{AttendanceRecord, Employee};

/// Identity and demographic columns, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FixedColumn {
    Number,
    Code,
    Name,
    HireDate,
    TerminationDate,
    Position,
    Department,
    Management,
    Status,
    Registry,
    WorkDays,
    RestDays,
    Schedule,
    RemoteDays,
}

impl FixedColumn {
    pub const ALL: [FixedColumn; 14] = [
        Self::Number,
        Self::Code,
        Self::Name,
        Self::HireDate,
        Self::TerminationDate,
        Self::Position,
        Self::Department,
        Self::Management,
        Self::Status,
        Self::Registry,
        Self::WorkDays,
        Self::RestDays,
        Self::Schedule,
        Self::RemoteDays,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Number => "N.",
            Self::Code => "DNI",
            Self::Name => "TRABAJADOR",
            Self::HireDate => "FECHA INGRESO",
            Self::TerminationDate => "FECHA DE CESE",
            Self::Position => "CARGO",
            Self::Department => "AREA",
            Self::Management => "GERENCIA",
            Self::Status => "ESTADO",
            Self::Registry => "REGISTRO",
            Self::WorkDays => "DIAS DE LABORES",
            Self::RestDays => "DSO",
            Self::Schedule => "HORARIO OFICIAL",
            Self::RemoteDays => "DÍAS DE TELETRABAJO",
        }
    }
}

/// The four sub-columns of a day group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DayPart {
    CheckIn,
    Lateness,
    CheckOut,
    Earliness,
}

impl DayPart {
    pub const ALL: [DayPart; 4] = [Self::CheckIn, Self::Lateness, Self::CheckOut, Self::Earliness];

    pub fn label(self) -> &'static str {
        match self {
            Self::CheckIn => "ING",
            Self::Lateness => "TAR",
            Self::CheckOut => "SALIDA",
            Self::Earliness => "EXT",
        }
    }

    /// Delta columns carry minute offsets rather than punch times.
    pub fn is_delta(self) -> bool {
        matches!(self, Self::Lateness | Self::Earliness)
    }
}

/// Trailing summary columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryColumn {
    LateCount,
    ToleranceCount,
    AbsenceCount,
    LateMinutes,
    EarlyMinutes,
}

impl SummaryColumn {
    pub const ALL: [SummaryColumn; 5] = [
        Self::LateCount,
        Self::ToleranceCount,
        Self::AbsenceCount,
        Self::LateMinutes,
        Self::EarlyMinutes,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::LateCount => "TARDANZAS",
            Self::ToleranceCount => "TOLERANCIAS",
            Self::AbsenceCount => "FALTAS",
            Self::LateMinutes => "MIN. TARDANZA",
            Self::EarlyMinutes => "MIN. SALIDA",
        }
    }
}

/// Identifies a grid column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKey {
    Fixed(FixedColumn),
    Day { date: NaiveDate, part: DayPart },
    Summary(SummaryColumn),
}

/// Column definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    pub key: ColumnKey,
    pub label: &'static str,
}

/// One employee row; `cells[i]` belongs to `columns[i]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    /// 1-based position in the report.
    pub number: usize,
    pub code: String,
    pub cells: Vec<Cell>,
}

/// Renderer-agnostic report table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportGrid {
    pub days: Vec<CalendarDay>,
    pub columns: Vec<Column>,
    pub rows: Vec<ReportRow>,
}

impl ReportGrid {
    pub fn column_index(&self, key: &ColumnKey) -> Option<usize> {
        self.columns.iter().position(|column| column.key == *key)
    }

    /// Cell at a row index and column.
    pub fn cell(&self, row: usize, key: &ColumnKey) -> Option<&Cell> {
        let col = self.column_index(key)?;
        self.rows.get(row)?.cells.get(col)
    }

    /// Row for an employee code.
    pub fn row_by_code(&self, code: &str) -> Option<&ReportRow> {
        self.rows.iter().find(|row| row.code == code)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Column layout for a set of calendar days.
pub fn build_columns(days: &[CalendarDay]) -> Vec<Column> {
    let fixed = FixedColumn::ALL.iter().map(|&col| Column {
        key: ColumnKey::Fixed(col),
        label: col.label(),
    });
    let per_day = days.iter().flat_map(|day| {
        DayPart::ALL.iter().map(move |&part| Column {
            key: ColumnKey::Day { date: day.date, part },
            label: part.label(),
        })
    });
    let summary = SummaryColumn::ALL.iter().map(|&col| Column {
        key: ColumnKey::Summary(col),
        label: col.label(),
    });

    fixed.chain(per_day).chain(summary).collect()
}

/// Orchestrates calendar, remote days, classification and aggregation.
#[derive(Debug, Clone, Copy)]
pub struct ReportGridBuilder {
    classifier: PunchClassifier,
}

impl ReportGridBuilder {
    pub fn new(classifier: PunchClassifier) -> Self {
        Self { classifier }
    }

    /// Build the grid for `employees` over `range` (default calendar when `None`).
    ///
    /// Employees without an identity code are skipped. Rows keep input order
    /// and are numbered from 1.
    pub fn build(&self, employees: &[Employee], range: Option<&DateRange>) -> Result<ReportGrid> {
        let days = calendar::resolve_days(range);
        let columns = build_columns(&days);

        if range.is_none() {
            info!("No valid date range requested, using default calendar");
        }

        let mut rows = Vec::with_capacity(employees.len());
        for employee in employees.iter().filter(|e| e.has_identity()) {
            let number = rows.len() + 1;
            let cells = self.build_cells(number, employee, &days);

            if cells.len() != columns.len() {
                return Err(AppError::build(format!(
                    "row {number} for employee {code} has {got} cells, expected {want}",
                    code = employee.code,
                    got = cells.len(),
                    want = columns.len()
                )));
            }

            rows.push(ReportRow {
                number,
                code: employee.code.trim().to_string(),
                cells,
            });
        }

        let skipped = employees.len() - rows.len();
        if skipped > 0 {
            warn!("Skipped {skipped} employees without an identity code");
        }
        info!(
            "Report grid built: {} rows, {} days, {} columns",
            rows.len(),
            days.len(),
            columns.len()
        );

        Ok(ReportGrid { days, columns, rows })
    }

    fn build_cells(&self, number: usize, employee: &Employee, days: &[CalendarDay]) -> Vec<Cell> {
        let remote_dates = RemoteSchedule::from_codes(employee.remote_days.as_slice()).resolve(days);

        // Later records for the same date overwrite earlier ones.
        let by_date: HashMap<NaiveDate, &AttendanceRecord> =
            employee.records.iter().map(|record| (record.date, record)).collect();

        let mut cells = demographic_cells(number, employee);
        cells.reserve(days.len() * DayPart::ALL.len() + SummaryColumn::ALL.len());

        let mut counters = DayCounters::default();
        for day in days {
            let remote = remote_dates.contains(&day.date);
            let day_cells = self
                .classifier
                .classify_day(day, remote, by_date.get(&day.date).copied());
            counters.tally(&day_cells);
            cells.extend(day_cells.into_array());
        }

        let summary = EmployeeSummary::aggregate(employee, &counters);
        debug!("Employee {}: {:?}", employee.code, summary);
        cells.extend(summary.cells());

        cells
    }
}

fn demographic_cells(number: usize, employee: &Employee) -> Vec<Cell> {
    FixedColumn::ALL
        .iter()
        .map(|column| match column {
            FixedColumn::Number => Cell::number(number as i64),
            FixedColumn::Code => Cell::text(employee.code.trim()),
            FixedColumn::Name => Cell::text(format::full_name(
                employee.first_name.as_deref(),
                employee.last_name.as_deref(),
            )),
            FixedColumn::HireDate => Cell::text(format::format_date(employee.hire_date)),
            FixedColumn::TerminationDate => Cell::text(format::format_date(employee.termination_date)),
            FixedColumn::Position => Cell::text_or_placeholder(employee.position.as_deref()),
            FixedColumn::Department => Cell::text_or_placeholder(employee.department.as_deref()),
            FixedColumn::Management => Cell::text_or_placeholder(employee.management.as_deref()),
            FixedColumn::Status => Cell::text(EmploymentStatus::of(employee).label()),
            FixedColumn::Registry => Cell::text_or_placeholder(employee.registry.as_deref()),
            FixedColumn::WorkDays => Cell::text(format::work_days_label(employee.work_days.as_deref())),
            FixedColumn::RestDays => Cell::text(format::rest_days_label(employee.rest_days.as_deref())),
            FixedColumn::Schedule => Cell::text(format::schedule_label(
                employee.schedule_in.as_deref(),
                employee.schedule_out.as_deref(),
            )),
            FixedColumn::RemoteDays => Cell::text(format::remote_days_label(employee.remote_days.as_slice())),
        })
        .collect()
}
