//! Per-day punch classification.
//!
//! Each calendar day renders as four cells: check-in time, lateness delta,
//! check-out time and earliness delta. Deltas are the source of truth; the
//! upstream "late"/"early" flags are never consulted.
//!
//! Precedence on the delta cells: `Late`, `Tolerated` and `EarlyDeparture`
//! always win. `Remote` only replaces what would otherwise be `OnTime`.

use serde::{Deserialize, Serialize};

use super::calendar::CalendarDay;
use super::cell::{Cell, NO_MARK, Status};
use crate::models::AttendanceRecord;

/// How check-out deltas are banded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CheckoutPolicy {
    /// Any negative delta is an early departure.
    #[default]
    SignOnly,
    /// Leaving up to the tolerance margin early is tolerated.
    ToleranceBand,
}

/// The four cells rendered for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayCells {
    pub check_in: Cell,
    pub lateness: Cell,
    pub check_out: Cell,
    pub earliness: Cell,
}

impl DayCells {
    fn uniform(cell: Cell) -> Self {
        Self {
            check_in: cell.clone(),
            lateness: cell.clone(),
            check_out: cell.clone(),
            earliness: cell,
        }
    }

    pub fn into_array(self) -> [Cell; 4] {
        [self.check_in, self.lateness, self.check_out, self.earliness]
    }
}

/// Running tallies produced while classifying an employee's days.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DayCounters {
    pub late: i64,
    pub tolerated: i64,
    /// Days with a record but no check-in punch.
    pub missing_check_in: i64,
}

impl DayCounters {
    /// Count one classified day.
    pub fn tally(&mut self, cells: &DayCells) {
        match cells.lateness.status {
            Some(Status::Late) => self.late += 1,
            Some(Status::Tolerated) => self.tolerated += 1,
            _ => {}
        }
        if cells.check_in.status == Some(Status::Missing) {
            self.missing_check_in += 1;
        }
    }
}

/// Classifies punches against a tolerance margin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PunchClassifier {
    tolerance_minutes: i64,
    checkout_policy: CheckoutPolicy,
}

impl PunchClassifier {
    /// Create a classifier. Negative margins are treated as zero.
    pub fn new(tolerance_minutes: i64) -> Self {
        Self {
            tolerance_minutes: tolerance_minutes.max(0),
            checkout_policy: CheckoutPolicy::default(),
        }
    }

    pub fn with_checkout_policy(mut self, policy: CheckoutPolicy) -> Self {
        self.checkout_policy = policy;
        self
    }

    pub fn tolerance_minutes(&self) -> i64 {
        self.tolerance_minutes
    }

    pub fn checkout_policy(&self) -> CheckoutPolicy {
        self.checkout_policy
    }

    /// Status of a check-in delta (positive = minutes late).
    pub fn check_in_status(&self, delta: i64, remote: bool) -> Status {
        if delta > self.tolerance_minutes {
            Status::Late
        } else if delta > 0 {
            Status::Tolerated
        } else if remote {
            Status::Remote
        } else {
            Status::OnTime
        }
    }

    /// Status of a check-out delta (negative = minutes left early).
    pub fn check_out_status(&self, delta: i64, remote: bool) -> Status {
        let early = match self.checkout_policy {
            CheckoutPolicy::SignOnly => (delta < 0).then_some(Status::EarlyDeparture),
            CheckoutPolicy::ToleranceBand => {
                if delta < -self.tolerance_minutes {
                    Some(Status::EarlyDeparture)
                } else if delta < 0 {
                    Some(Status::Tolerated)
                } else {
                    None
                }
            }
        };

        match early {
            Some(status) => status,
            None if remote => Status::Remote,
            None => Status::OnTime,
        }
    }

    /// Render one day for one employee.
    pub fn classify_day(&self, day: &CalendarDay, remote: bool, record: Option<&AttendanceRecord>) -> DayCells {
        let Some(record) = record else {
            let cell = if remote {
                Cell::empty().with_status(Status::Remote)
            } else {
                Cell::empty()
            };
            return DayCells::uniform(cell);
        };
        debug_assert_eq!(record.date, day.date);

        DayCells {
            check_in: punch_cell(record.check_in.as_deref(), remote),
            lateness: Cell::number(record.check_in_delta)
                .with_status(self.check_in_status(record.check_in_delta, remote)),
            check_out: punch_cell(record.check_out.as_deref(), remote),
            earliness: Cell::number(record.check_out_delta)
                .with_status(self.check_out_status(record.check_out_delta, remote)),
        }
    }
}

fn punch_cell(time: Option<&str>, remote: bool) -> Cell {
    match time.map(str::trim).filter(|t| !t.is_empty()) {
        Some(time) if remote => Cell::text(time).with_status(Status::Remote),
        Some(time) => Cell::text(time).with_status(Status::Worked),
        None => Cell::text(NO_MARK).with_status(Status::Missing),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::calendar::CalendarDay;
    use chrono::NaiveDate;

    fn monday() -> CalendarDay {
        CalendarDay::new(NaiveDate::from_ymd_opt(2025, 2, 10).unwrap())
    }

    fn record(check_in_delta: i64, check_out_delta: i64) -> AttendanceRecord {
        AttendanceRecord::new(monday().date, "08:35", "18:30", check_in_delta, check_out_delta)
    }

    #[test]
    fn test_check_in_boundaries() {
        let classifier = PunchClassifier::new(5);

        assert_eq!(classifier.check_in_status(-10, false), Status::OnTime);
        assert_eq!(classifier.check_in_status(0, false), Status::OnTime);
        assert_eq!(classifier.check_in_status(1, false), Status::Tolerated);
        assert_eq!(classifier.check_in_status(5, false), Status::Tolerated);
        assert_eq!(classifier.check_in_status(6, false), Status::Late);
    }

    #[test]
    fn test_check_in_margin_boundary_for_several_margins() {
        for margin in [0, 1, 5, 10, 30] {
            let classifier = PunchClassifier::new(margin);
            if margin > 0 {
                assert_eq!(classifier.check_in_status(margin, false), Status::Tolerated);
            }
            assert_eq!(classifier.check_in_status(margin + 1, false), Status::Late);
        }
    }

    #[test]
    fn test_remote_replaces_on_time_only() {
        let classifier = PunchClassifier::new(5);

        assert_eq!(classifier.check_in_status(-3, true), Status::Remote);
        assert_eq!(classifier.check_in_status(0, true), Status::Remote);
        assert_eq!(classifier.check_in_status(3, true), Status::Tolerated);
        assert_eq!(classifier.check_in_status(30, true), Status::Late);

        assert_eq!(classifier.check_out_status(0, true), Status::Remote);
        assert_eq!(classifier.check_out_status(-1, true), Status::EarlyDeparture);
    }

    #[test]
    fn test_check_out_sign_only() {
        let classifier = PunchClassifier::new(5);

        assert_eq!(classifier.check_out_status(-1, false), Status::EarlyDeparture);
        assert_eq!(classifier.check_out_status(-5, false), Status::EarlyDeparture);
        assert_eq!(classifier.check_out_status(0, false), Status::OnTime);
        assert_eq!(classifier.check_out_status(45, false), Status::OnTime);
    }

    #[test]
    fn test_check_out_tolerance_band() {
        let classifier = PunchClassifier::new(5).with_checkout_policy(CheckoutPolicy::ToleranceBand);

        assert_eq!(classifier.check_out_status(-1, false), Status::Tolerated);
        assert_eq!(classifier.check_out_status(-5, false), Status::Tolerated);
        assert_eq!(classifier.check_out_status(-6, false), Status::EarlyDeparture);
        assert_eq!(classifier.check_out_status(0, false), Status::OnTime);
        assert_eq!(classifier.check_out_status(-3, true), Status::Tolerated);
        assert_eq!(classifier.check_out_status(2, true), Status::Remote);
    }

    #[test]
    fn test_no_record_plain_day() {
        let cells = PunchClassifier::new(5).classify_day(&monday(), false, None);
        for cell in cells.into_array() {
            assert!(cell.is_empty());
            assert_eq!(cell.status, None);
        }
    }

    #[test]
    fn test_no_record_remote_day() {
        let cells = PunchClassifier::new(5).classify_day(&monday(), true, None);
        for cell in cells.into_array() {
            assert!(cell.is_empty());
            assert_eq!(cell.status, Some(Status::Remote));
        }
    }

    #[test]
    fn test_record_cells() {
        let cells = PunchClassifier::new(5).classify_day(&monday(), false, Some(&record(35, -15)));

        assert_eq!(cells.check_in.value.to_string(), "08:35");
        assert_eq!(cells.check_in.status, Some(Status::Worked));
        assert_eq!(cells.lateness.value.to_string(), "35");
        assert_eq!(cells.lateness.status, Some(Status::Late));
        assert_eq!(cells.check_out.status, Some(Status::Worked));
        assert_eq!(cells.earliness.value.to_string(), "-15");
        assert_eq!(cells.earliness.status, Some(Status::EarlyDeparture));
    }

    #[test]
    fn test_remote_record_keeps_remote_on_times() {
        let cells = PunchClassifier::new(5).classify_day(&monday(), true, Some(&record(-2, 0)));

        assert_eq!(cells.check_in.status, Some(Status::Remote));
        assert_eq!(cells.lateness.status, Some(Status::Remote));
        assert_eq!(cells.check_out.status, Some(Status::Remote));
        assert_eq!(cells.earliness.status, Some(Status::Remote));
    }

    #[test]
    fn test_missing_punches_show_no_mark() {
        let mut rec = record(0, 0);
        rec.check_in = None;
        rec.check_out = Some("  ".to_string());

        let cells = PunchClassifier::new(5).classify_day(&monday(), true, Some(&rec));
        assert_eq!(cells.check_in.value.to_string(), NO_MARK);
        assert_eq!(cells.check_in.status, Some(Status::Missing));
        assert_eq!(cells.check_out.status, Some(Status::Missing));
        assert_eq!(cells.lateness.value.to_string(), "0");
    }

    #[test]
    fn test_flags_do_not_drive_classification() {
        let mut rec = record(-10, 10);
        rec.arrived_late = true;
        rec.left_early = true;

        let cells = PunchClassifier::new(5).classify_day(&monday(), false, Some(&rec));
        assert_eq!(cells.lateness.status, Some(Status::OnTime));
        assert_eq!(cells.earliness.status, Some(Status::OnTime));
    }

    #[test]
    fn test_counters_tally() {
        let classifier = PunchClassifier::new(5);
        let mut counters = DayCounters::default();

        for delta in [6, 30, 3, 5, 0, -4] {
            counters.tally(&classifier.classify_day(&monday(), false, Some(&record(delta, 0))));
        }
        let mut missing = record(0, 0);
        missing.check_in = None;
        counters.tally(&classifier.classify_day(&monday(), false, Some(&missing)));
        counters.tally(&classifier.classify_day(&monday(), true, None));

        assert_eq!(counters.late, 2);
        assert_eq!(counters.tolerated, 2);
        assert_eq!(counters.missing_check_in, 1);
    }
}
