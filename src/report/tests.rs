//! End-to-end grid scenarios.

use chrono::NaiveDate;
use serde_json::json;

use super::*;
use crate::models::{AttendanceRecord, Employee};
use crate::source::{ReportRequest, parse_batch};

const SAMPLE_BATCH: &str = include_str!("../../fixtures/sample_batch.json");

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn day_key(date: NaiveDate, part: DayPart) -> ColumnKey {
    ColumnKey::Day { date, part }
}

fn builder(margin: i64) -> ReportGridBuilder {
    ReportGridBuilder::new(PunchClassifier::new(margin))
}

fn employee_with_record(code: &str, record: AttendanceRecord) -> Employee {
    let mut employee = Employee::new(code);
    employee.records.push(record);
    employee
}

fn sample_grid() -> ReportGrid {
    let value: serde_json::Value = serde_json::from_str(SAMPLE_BATCH).unwrap();
    let request = ReportRequest::from_value(value).unwrap();
    let employees = parse_batch(&request.employees).unwrap();
    builder(5).build(&employees, request.range().as_ref()).unwrap()
}

#[test]
fn test_tolerated_at_margin() {
    let monday = date(2025, 2, 10);
    let employee = employee_with_record("1", AttendanceRecord::new(monday, "08:35", "18:30", 5, 0));
    let grid = builder(5).build(&[employee], None).unwrap();

    let cell = grid.cell(0, &day_key(monday, DayPart::Lateness)).unwrap();
    assert_eq!(cell.status, Some(Status::Tolerated));
    assert_eq!(cell.value.to_string(), "5");
}

#[test]
fn test_late_past_margin() {
    let monday = date(2025, 2, 10);
    let employee = employee_with_record("1", AttendanceRecord::new(monday, "08:36", "18:30", 6, 0));
    let grid = builder(5).build(&[employee], None).unwrap();

    let cell = grid.cell(0, &day_key(monday, DayPart::Lateness)).unwrap();
    assert_eq!(cell.status, Some(Status::Late));
    assert_eq!(cell.value.to_string(), "6");

    let late_count = grid.cell(0, &ColumnKey::Summary(SummaryColumn::LateCount)).unwrap();
    assert_eq!(late_count.value.to_string(), "1");
}

#[test]
fn test_remote_monday_without_record() {
    let mut employee = Employee::new("1");
    employee.remote_days = vec!["mon".to_string()];
    let grid = builder(5).build(&[employee], None).unwrap();

    let monday = date(2025, 2, 3);
    for part in DayPart::ALL {
        let cell = grid.cell(0, &day_key(monday, part)).unwrap();
        assert_eq!(cell.status, Some(Status::Remote));
        assert!(cell.is_empty());
    }

    let tuesday = date(2025, 2, 4);
    for part in DayPart::ALL {
        let cell = grid.cell(0, &day_key(tuesday, part)).unwrap();
        assert_eq!(cell.status, None);
        assert!(cell.is_empty());
    }
}

#[test]
fn test_zero_external_late_total_uses_computed() {
    let mut employee = Employee::new("1");
    employee.records = vec![
        AttendanceRecord::new(date(2025, 2, 4), "09:00", "18:30", 30, 0),
        AttendanceRecord::new(date(2025, 2, 5), "08:42", "18:30", 12, 0),
        AttendanceRecord::new(date(2025, 2, 6), "08:20", "18:30", -10, 0),
    ];
    employee.totals.total_late_minutes = Some(0);

    let grid = builder(5).build(&[employee], None).unwrap();
    let cell = grid.cell(0, &ColumnKey::Summary(SummaryColumn::LateMinutes)).unwrap();
    assert_eq!(cell.value.to_string(), "42");
    assert_eq!(cell.status, Some(Status::Attention));
}

#[test]
fn test_employee_without_code_is_filtered() {
    let grid = builder(5).build(&[Employee::new(""), Employee::new("45678912")], None).unwrap();

    assert_eq!(grid.rows.len(), 1);
    assert_eq!(grid.rows[0].number, 1);
    assert_eq!(grid.rows[0].code, "45678912");
    let number = grid.cell(0, &ColumnKey::Fixed(FixedColumn::Number)).unwrap();
    assert_eq!(number.value.to_string(), "1");
}

#[test]
fn test_lateness_outranks_remote() {
    // Regression pin: tolerated and late keep their colour on remote days.
    let monday = date(2025, 2, 10);
    let mut employee = Employee::new("1");
    employee.remote_days = vec!["lun".to_string()];
    employee.records = vec![
        AttendanceRecord::new(monday, "08:33", "18:30", 3, 0),
        AttendanceRecord::new(date(2025, 2, 3), "09:30", "18:30", 60, -1),
    ];

    let grid = builder(5).build(&[employee], None).unwrap();

    let tolerated = grid.cell(0, &day_key(monday, DayPart::Lateness)).unwrap();
    assert_eq!(tolerated.status, Some(Status::Tolerated));
    let on_time_out = grid.cell(0, &day_key(monday, DayPart::Earliness)).unwrap();
    assert_eq!(on_time_out.status, Some(Status::Remote));

    let late = grid.cell(0, &day_key(date(2025, 2, 3), DayPart::Lateness)).unwrap();
    assert_eq!(late.status, Some(Status::Late));
    let early = grid.cell(0, &day_key(date(2025, 2, 3), DayPart::Earliness)).unwrap();
    assert_eq!(early.status, Some(Status::EarlyDeparture));
    let punch = grid.cell(0, &day_key(date(2025, 2, 3), DayPart::CheckIn)).unwrap();
    assert_eq!(punch.status, Some(Status::Remote));
}

#[test]
fn test_tolerance_band_checkout_variant() {
    let monday = date(2025, 2, 10);
    let employee = employee_with_record("1", AttendanceRecord::new(monday, "08:30", "18:27", 0, -3));

    let sign_only = builder(5).build(std::slice::from_ref(&employee), None).unwrap();
    let cell = sign_only.cell(0, &day_key(monday, DayPart::Earliness)).unwrap();
    assert_eq!(cell.status, Some(Status::EarlyDeparture));

    let banded = ReportGridBuilder::new(PunchClassifier::new(5).with_checkout_policy(CheckoutPolicy::ToleranceBand))
        .build(&[employee], None)
        .unwrap();
    let cell = banded.cell(0, &day_key(monday, DayPart::Earliness)).unwrap();
    assert_eq!(cell.status, Some(Status::Tolerated));
}

#[test]
fn test_duplicate_dates_last_record_wins() {
    let monday = date(2025, 2, 10);
    let mut employee = Employee::new("1");
    employee.records = vec![
        AttendanceRecord::new(monday, "08:31", "18:30", 1, 0),
        AttendanceRecord::new(monday, "09:00", "18:30", 30, 0),
    ];

    let grid = builder(5).build(&[employee], None).unwrap();
    let check_in = grid.cell(0, &day_key(monday, DayPart::CheckIn)).unwrap();
    assert_eq!(check_in.value.to_string(), "09:00");
    let lateness = grid.cell(0, &day_key(monday, DayPart::Lateness)).unwrap();
    assert_eq!(lateness.status, Some(Status::Late));
}

#[test]
fn test_records_outside_range_not_rendered() {
    let mut employee = Employee::new("1");
    employee.records = vec![AttendanceRecord::new(date(2025, 3, 10), "09:00", "18:30", 30, 0)];

    let grid = builder(5).build(&[employee], None).unwrap();
    let late_count = grid.cell(0, &ColumnKey::Summary(SummaryColumn::LateCount)).unwrap();
    assert_eq!(late_count.value.to_string(), "0");
    // Minute totals fold every record, in range or not.
    let late_minutes = grid.cell(0, &ColumnKey::Summary(SummaryColumn::LateMinutes)).unwrap();
    assert_eq!(late_minutes.value.to_string(), "30");
}

#[test]
fn test_requested_range_drives_columns() {
    let range = DateRange::from_request(Some("2025-03-31"), Some("2025-03-01")).unwrap();
    let grid = builder(5).build(&[Employee::new("1")], Some(&range)).unwrap();

    assert_eq!(grid.days.len(), 31);
    assert_eq!(grid.days[0].date, date(2025, 3, 1));
    assert_eq!(grid.columns.len(), FixedColumn::ALL.len() + 31 * 4 + SummaryColumn::ALL.len());
}

#[test]
fn test_build_is_idempotent() {
    let value: serde_json::Value = serde_json::from_str(SAMPLE_BATCH).unwrap();
    let request = ReportRequest::from_value(value).unwrap();
    let employees = parse_batch(&request.employees).unwrap();
    let range = request.range();

    let first = builder(5).build(&employees, range.as_ref()).unwrap();
    let second = builder(5).build(&employees, range.as_ref()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_sample_batch_rows() {
    let grid = sample_grid();

    assert_eq!(grid.rows.len(), 3);
    assert_eq!(grid.days.len(), 28);
    let numbers: Vec<usize> = grid.rows.iter().map(|row| row.number).collect();
    assert_eq!(numbers, vec![1, 2, 3]);
    let codes: Vec<&str> = grid.rows.iter().map(|row| row.code.as_str()).collect();
    assert_eq!(codes, vec!["41142212", "45678912", "70123456"]);
}

#[test]
fn test_sample_batch_demographics() {
    let grid = sample_grid();
    let fixed = |row: usize, col: FixedColumn| grid.cell(row, &ColumnKey::Fixed(col)).unwrap().value.to_string();

    assert_eq!(fixed(0, FixedColumn::Name), "Percy Alejandro Levano Durand");
    assert_eq!(fixed(0, FixedColumn::HireDate), "01/10/2011");
    assert_eq!(fixed(0, FixedColumn::TerminationDate), "-");
    assert_eq!(fixed(0, FixedColumn::Status), "Activo");
    assert_eq!(fixed(0, FixedColumn::WorkDays), "LUNES A VIERNES");
    assert_eq!(fixed(0, FixedColumn::RestDays), "S Y D");
    assert_eq!(fixed(0, FixedColumn::Schedule), "08:30 - 18:30");
    assert_eq!(fixed(0, FixedColumn::RemoteDays), "LUN Y VIE");
    assert_eq!(fixed(0, FixedColumn::Management), "-");

    assert_eq!(fixed(2, FixedColumn::Status), "Cesado");
    assert_eq!(fixed(2, FixedColumn::TerminationDate), "20/02/2025");
    assert_eq!(fixed(2, FixedColumn::Management), "Comercial");
    assert_eq!(fixed(2, FixedColumn::RemoteDays), "NO TT");
    assert_eq!(fixed(2, FixedColumn::WorkDays), "LUNES A SABADO");
    assert_eq!(fixed(2, FixedColumn::RestDays), "D");
}

#[test]
fn test_sample_batch_day_cells() {
    let grid = sample_grid();
    let cell = |row: usize, d: u32, part: DayPart| grid.cell(row, &day_key(date(2025, 2, d), part)).unwrap();

    // Monday 10th is a remote day for the first employee.
    assert_eq!(cell(0, 10, DayPart::CheckIn).status, Some(Status::Remote));
    assert_eq!(cell(0, 10, DayPart::Lateness).status, Some(Status::Remote));
    assert_eq!(cell(0, 10, DayPart::Earliness).value.to_string(), "-677");
    assert_eq!(cell(0, 10, DayPart::Earliness).status, Some(Status::EarlyDeparture));
    // Tuesday 11th is an office day.
    assert_eq!(cell(0, 11, DayPart::CheckIn).status, Some(Status::Worked));
    assert_eq!(cell(0, 11, DayPart::Lateness).status, Some(Status::OnTime));
    // Friday 14th: remote, no record.
    assert_eq!(cell(0, 14, DayPart::CheckOut).status, Some(Status::Remote));
    assert!(cell(0, 14, DayPart::CheckOut).is_empty());

    // Tuesday 11th is remote for the second employee, but 35 minutes late.
    assert_eq!(cell(1, 11, DayPart::CheckIn).status, Some(Status::Remote));
    assert_eq!(cell(1, 11, DayPart::Lateness).status, Some(Status::Late));

    // Missing check-in on the 12th, tolerated string delta on the 13th.
    assert_eq!(cell(2, 12, DayPart::CheckIn).value.to_string(), NO_MARK);
    assert_eq!(cell(2, 12, DayPart::CheckIn).status, Some(Status::Missing));
    assert_eq!(cell(2, 12, DayPart::Lateness).value.to_string(), "0");
    assert_eq!(cell(2, 13, DayPart::Lateness).status, Some(Status::Tolerated));
}

#[test]
fn test_sample_batch_summaries() {
    let grid = sample_grid();
    let summary = |row: usize, col: SummaryColumn| grid.cell(row, &ColumnKey::Summary(col)).unwrap().clone();

    assert_eq!(summary(0, SummaryColumn::LateMinutes).value.to_string(), "0");
    assert_eq!(summary(0, SummaryColumn::LateMinutes).status, Some(Status::Ok));
    assert_eq!(summary(0, SummaryColumn::EarlyMinutes).value.to_string(), "-1356");
    assert_eq!(summary(0, SummaryColumn::EarlyMinutes).status, Some(Status::Attention));

    assert_eq!(summary(1, SummaryColumn::LateCount).value.to_string(), "1");
    assert_eq!(summary(1, SummaryColumn::LateMinutes).value.to_string(), "35");
    assert_eq!(summary(1, SummaryColumn::EarlyMinutes).value.to_string(), "-15");

    // External late count wins; zero and unparseable minute totals fall back.
    assert_eq!(summary(2, SummaryColumn::LateCount).value.to_string(), "2");
    assert_eq!(summary(2, SummaryColumn::ToleranceCount).value.to_string(), "1");
    assert_eq!(summary(2, SummaryColumn::AbsenceCount).value.to_string(), "1");
    assert_eq!(summary(2, SummaryColumn::LateMinutes).value.to_string(), "5");
    assert_eq!(summary(2, SummaryColumn::EarlyMinutes).value.to_string(), "-90");
}

#[test]
fn test_grid_serializes_to_json() {
    let grid = builder(5)
        .build(&[Employee::from_value(&json!({"emp_code": "1"})).unwrap()], None)
        .unwrap();
    let value = serde_json::to_value(&grid).unwrap();

    assert_eq!(value["rows"][0]["number"], json!(1));
    assert_eq!(value["columns"][0]["key"], json!({"fixed": "number"}));
    assert_eq!(value["days"][0]["weekday_name"], json!("LUNES"));
}

#[test]
fn test_upstream_response_builds_all_rows() {
    let value = json!({
        "empleados": [{"emp_code": "41142212"}, {"emp_code": "45678912"}]
    });
    let request = ReportRequest::from_value(value).unwrap();
    let employees = parse_batch(&request.employees).unwrap();
    let grid = builder(5).build(&employees, request.range().as_ref()).unwrap();

    assert_eq!(grid.rows.len(), 2);
    assert!(grid.row_by_code("45678912").is_some());
}
