//! Attendance grid computation engine.
//!
//! Turns a batch of employees with punch records and a requested date range
//! into a [`ReportGrid`]: calendar expansion, remote-day overlay, per-day punch
//! classification and per-employee summaries. The engine is pure and
//! synchronous; fetching input and writing output happen elsewhere.

pub mod aggregate;
pub mod calendar;
pub mod cell;
pub mod classify;
pub mod format;
pub mod grid;
pub mod remote;

#[cfg(test)]
mod tests;

pub use aggregate::{EmployeeSummary, resolve_count, resolve_total};
pub use calendar::{CalendarDay, DateRange, MAX_RANGE_DAYS, WeekdayCode};
pub use cell::{Cell, CellValue, NO_MARK, PLACEHOLDER, Status};
pub use classify::{CheckoutPolicy, DayCells, DayCounters, PunchClassifier};
pub use format::EmploymentStatus;
pub use grid::{Column, ColumnKey, DayPart, FixedColumn, ReportGrid, ReportGridBuilder, ReportRow, SummaryColumn};
pub use remote::RemoteSchedule;
