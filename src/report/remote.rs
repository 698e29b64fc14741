//! Remote-work day resolution.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use tracing::debug;

use super::calendar::{CalendarDay, WeekdayCode};

/// An employee's recurring remote weekdays.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteSchedule {
    codes: BTreeSet<WeekdayCode>,
}

impl RemoteSchedule {
    /// Build from configured codes. Unrecognized codes are ignored.
    pub fn from_codes<S: AsRef<str>>(raw: &[S]) -> Self {
        let codes = raw
            .iter()
            .filter_map(|code| {
                let parsed = WeekdayCode::parse(code.as_ref());
                if parsed.is_none() {
                    debug!("Ignoring unknown remote weekday code: {}", code.as_ref());
                }
                parsed
            })
            .collect();
        Self { codes }
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn contains(&self, code: WeekdayCode) -> bool {
        self.codes.contains(&code)
    }

    /// Dates in `days` that fall on a remote weekday.
    ///
    /// Punch data plays no part: a remote date qualifies whether or not the
    /// employee has a record for it.
    pub fn resolve(&self, days: &[CalendarDay]) -> BTreeSet<NaiveDate> {
        days.iter()
            .filter(|day| self.contains(day.code))
            .map(|day| day.date)
            .collect()
    }
}
