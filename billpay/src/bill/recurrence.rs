//! Successor due dates of recurring bills
//!
//! Periods are fixed day counts: a month is 30 days and a year 365, so a bill
//! due on January 31st comes back on March 1st, not on the last day of
//! February.

use crate::bill::Frequency;

use chrono::{DateTime, Days, Utc};

pub fn period(frequency: &Frequency) -> Option<Days> {
    match frequency {
        Frequency::Weekly => Some(Days::new(7)),
        Frequency::Monthly => Some(Days::new(30)),
        Frequency::Yearly => Some(Days::new(365)),
        Frequency::None | Frequency::Other(_) => None,
    }
}

/// Due date of the next occurrence, keeping the time of day
pub fn next_due_date(frequency: &Frequency, due_date: DateTime<Utc>) -> Option<DateTime<Utc>> {
    due_date.checked_add_days(period(frequency)?)
}
