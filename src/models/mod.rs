//! Data models for employees and their attendance records.

pub mod attendance;
pub mod employee;
pub mod lenient;

pub use attendance::AttendanceRecord;
pub use employee::{Employee, ExternalTotals};
pub use lenient::parse_date;
