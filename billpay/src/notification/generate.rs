use crate::{
    bill::{Bill, QueryBill, Status},
    due::DueState,
    essentials::*,
    notification::{NewNotification, Notification, NotificationType},
    schema::notifications,
    user::User,
};

use chrono::{DateTime, Utc};
use diesel::prelude::*;

pub const DATE_FORMAT: &str = "%B %d, %Y";

/// Create the overdue and due soon notifications `user` is missing
///
/// A bill gets at most one notification of each kind, so running this again
/// creates nothing new until bills change state.
pub fn generate(conn: &mut Conn, user: &User, now: DateTime<Utc>) -> Result<Vec<Notification>> {
    conn.transaction::<_, Error, _>(|conn| {
        let bills = QueryBill {
            user: Some(user),
            status: Some(Status::Pending),
            ..Default::default()
        }
        .run(conn)?;

        let mut created = Vec::new();
        for bill in &bills {
            let notification_type = match bill.due_state(now) {
                DueState::Overdue => NotificationType::Overdue,
                DueState::DueSoon => NotificationType::DueSoon,
                DueState::OnTrack | DueState::Paid => continue,
            };
            if exists(conn, bill, notification_type)? {
                continue;
            }

            if let Some(notification) = alert(user, bill, notification_type, now)
                .save_unless_open(conn)?
            {
                log::debug!("Created {} notification for \"{}\"", notification_type, bill.name);
                created.push(notification);
            }
        }
        Ok(created)
    })
}

fn exists(conn: &mut Conn, bill: &Bill, notification_type: NotificationType) -> Result<bool> {
    Ok(diesel::select(diesel::dsl::exists(
        notifications::table
            .filter(notifications::user_id.eq(bill.user_id))
            .filter(notifications::bill_id.eq(bill.id))
            .filter(notifications::notification_type.eq(notification_type)),
    ))
    .get_result(conn)?)
}

fn alert<'a>(
    user: &'a User,
    bill: &Bill,
    notification_type: NotificationType,
    now: DateTime<Utc>,
) -> NewNotification<'a> {
    let due_date = bill.due_date.format(DATE_FORMAT);
    let (title, message) = match notification_type {
        NotificationType::Overdue => (
            "Bill Overdue",
            format!(
                "\"{}\" was due on {} ({}).",
                bill.name,
                due_date,
                bill.display_amount()
            ),
        ),
        _ => (
            "Bill Due Soon",
            format!(
                "\"{}\" is due on {} ({}).",
                bill.name,
                due_date,
                bill.display_amount()
            ),
        ),
    };

    NewNotification {
        bill_id: Some(bill.id),
        created_at: now,
        ..NewNotification::new(user, notification_type, title, message)
    }
}
