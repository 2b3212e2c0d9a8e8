//! Classification of bills relative to the current instant
//!
//! Everything here is pure: callers pass `now` explicitly, in UTC. Overdue is
//! decided on calendar days, a bill due today is never overdue, while due soon
//! is an instant window of three days starting at `now`.

use crate::bill::Status;

use chrono::{DateTime, Duration, Utc};

pub const DUE_SOON_DAYS: i64 = 3;

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueState {
    Paid,
    Overdue,
    DueSoon,
    OnTrack,
}

impl DueState {
    pub fn of(status: Status, due_date: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        if status.is_paid() {
            DueState::Paid
        } else if is_overdue(status, due_date, now) {
            DueState::Overdue
        } else if is_due_soon(status, due_date, now) {
            DueState::DueSoon
        } else {
            DueState::OnTrack
        }
    }
}

impl std::fmt::Display for DueState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            DueState::Paid => "paid",
            DueState::Overdue => "overdue",
            DueState::DueSoon => "due soon",
            DueState::OnTrack => "on track",
        })
    }
}

pub fn is_overdue(status: Status, due_date: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    status.is_pending() && due_date.date_naive() < now.date_naive()
}

pub fn is_due_soon(status: Status, due_date: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    status.is_pending() && now <= due_date && due_date <= now + Duration::days(DUE_SOON_DAYS)
}

/// Whole days from `now` until `due_date`, rounded down
///
/// Negative once the due date has passed, with any part of a day counting as
/// a full day.
pub fn days_until_due(due_date: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (due_date - now).num_seconds().div_euclid(SECONDS_PER_DAY)
}
