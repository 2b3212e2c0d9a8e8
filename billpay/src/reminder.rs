//! Daily reminder emails about upcoming bills
//!
//! Meant to run once a day. A bill is reminded about at most once per UTC
//! calendar day: `last_reminder_date` records the last successful send, and
//! the `reminder_log` table lets overlapping runs claim a (bill, day) slot
//! before sending so they don't both mail the same bill.

use crate::{
    bill::{Bill, Status},
    essentials::*,
    mail::Mailer,
    notification::{NewNotification, NotificationType},
    preference::UserPreference,
    schema::{bills, reminder_log, users},
    user::User,
};

use std::fmt::{Display, Formatter};

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;

pub mod email;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Sent,
    /// Dry run, nothing was sent nor recorded
    WouldSend,
    Failed(String),
    /// Another run already holds today's slot for this bill
    Claimed,
}

#[derive(Debug, Clone)]
pub struct Entry {
    pub bill_id: i64,
    pub bill_name: String,
    pub email: String,
    pub days_until_due: i64,
    pub outcome: Outcome,
}

impl Display for Entry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.outcome {
            Outcome::Sent => write!(f, "Sent reminder to {} for '{}'", self.email, self.bill_name),
            Outcome::WouldSend => write!(
                f,
                "[DRY RUN] Would send reminder to {} for '{}' due in {} days",
                self.email, self.bill_name, self.days_until_due
            ),
            Outcome::Failed(error) => {
                write!(f, "Failed to send email to {}: {}", self.email, error)
            }
            Outcome::Claimed => write!(
                f,
                "Skipped '{}', its reminder is already being sent today",
                self.bill_name
            ),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Report {
    pub started_at: DateTime<Utc>,
    pub dry_run: bool,
    pub entries: Vec<Entry>,
}

impl Report {
    fn count(&self, outcome: fn(&Outcome) -> bool) -> usize {
        self.entries.iter().filter(|e| outcome(&e.outcome)).count()
    }

    pub fn sent(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Sent))
    }

    pub fn would_send(&self) -> usize {
        self.count(|o| matches!(o, Outcome::WouldSend))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Failed(_)))
    }

    pub fn header(&self) -> String {
        format!("Checking for bills that need reminders at {}", self.started_at)
    }

    pub fn footer(&self) -> String {
        format!("Done! Sent {} reminder(s).", self.sent())
    }
}

pub struct Dispatcher<'a> {
    pub mailer: &'a dyn Mailer,
    pub dry_run: bool,
}

impl<'a> Dispatcher<'a> {
    pub fn new(mailer: &'a dyn Mailer) -> Self {
        Self {
            mailer,
            dry_run: false,
        }
    }

    /// Remind the owners of pending bills due within their reminder window
    ///
    /// A failed send only affects its own bill and is retried on the next
    /// run; database errors abort the run.
    pub fn run(&self, conn: &mut Conn, now: DateTime<Utc>) -> Result<Report> {
        let today = now.date_naive();
        let candidates = bills::table
            .inner_join(users::table)
            .filter(bills::status.eq(Status::Pending))
            .filter(bills::due_date.ge(now))
            .order((bills::due_date.asc(), bills::id.asc()))
            .select((Bill::as_select(), User::as_select()))
            .load::<(Bill, User)>(conn)?;
        log::debug!("{} pending bills ahead", candidates.len());

        let mut report = Report {
            started_at: now,
            dry_run: self.dry_run,
            entries: Vec::new(),
        };
        for (mut bill, user) in candidates {
            let preference = if self.dry_run {
                UserPreference::find_or_default(conn, user.id)?
            } else {
                UserPreference::find_or_create(conn, user.id)?
            };
            if !preference.email_reminders_enabled {
                continue;
            }

            let days_until_due = bill.days_until_due(now);
            if days_until_due > i64::from(preference.remind_days_before) || bill.reminded_on(today)
            {
                continue;
            }

            let outcome = if self.dry_run {
                Outcome::WouldSend
            } else {
                self.remind(conn, &mut bill, &user, days_until_due, now)?
            };
            report.entries.push(Entry {
                bill_id: bill.id,
                bill_name: bill.name.clone(),
                email: user.email.clone(),
                days_until_due,
                outcome,
            });
        }

        Ok(report)
    }

    fn remind(
        &self,
        conn: &mut Conn,
        bill: &mut Bill,
        user: &User,
        days_until_due: i64,
        now: DateTime<Utc>,
    ) -> Result<Outcome> {
        let today = now.date_naive();
        if !claim(conn, bill.id, today)? {
            log::warn!("Reminder for \"{}\" already claimed for {}", bill.name, today);
            return Ok(Outcome::Claimed);
        }

        let message = email::reminder(bill, user, days_until_due);
        if let Err(e) = self.mailer.send(&message) {
            log::error!("Failed to send email to {}: {}", user.email, e);
            release(conn, bill.id, today)?;
            return Ok(Outcome::Failed(e.to_string()));
        }

        conn.transaction::<_, Error, _>(|conn| {
            bill.mark_reminded(conn, now)?;
            NewNotification {
                bill_id: Some(bill.id),
                created_at: now,
                ..NewNotification::new(
                    user,
                    NotificationType::Reminder,
                    "Reminder Email Sent",
                    format!(
                        "Reminder sent for \"{}\" due in {} days.",
                        bill.name, days_until_due
                    ),
                )
            }
            .save(conn)?;
            Ok(())
        })?;
        log::info!("Sent reminder to {} for \"{}\"", user.email, bill.name);

        Ok(Outcome::Sent)
    }
}

/// Take the (bill, day) slot, false when someone else holds it
fn claim(conn: &mut Conn, bill_id: i64, day: NaiveDate) -> Result<bool> {
    let inserted = diesel::insert_into(reminder_log::table)
        .values((reminder_log::bill_id.eq(bill_id), reminder_log::sent_on.eq(day)))
        .on_conflict_do_nothing()
        .execute(conn)?;
    Ok(inserted == 1)
}

fn release(conn: &mut Conn, bill_id: i64, day: NaiveDate) -> Result<()> {
    diesel::delete(reminder_log::table)
        .filter(reminder_log::bill_id.eq(bill_id))
        .filter(reminder_log::sent_on.eq(day))
        .execute(conn)?;
    Ok(())
}
