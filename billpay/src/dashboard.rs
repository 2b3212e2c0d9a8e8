use crate::{
    bill::{Bill, QueryBill, Status},
    date::Month,
    due::DueState,
    essentials::*,
    notification::Notification,
    user::User,
};

use chrono::{DateTime, Duration, Utc};

pub const UPCOMING_DAYS: i64 = 7;

/// Overview of the bills of a user at a given instant
#[derive(Debug)]
pub struct Dashboard {
    pub total: usize,
    pub pending: usize,
    pub paid: usize,
    pub overdue: Vec<Bill>,
    pub due_soon: Vec<Bill>,
    /// Pending bills due within the next week, soonest first
    pub upcoming: Vec<Bill>,
    pub paid_this_month: usize,
    pub unread_notifications: i64,
}

impl Dashboard {
    pub fn build(conn: &mut Conn, user: &User, now: DateTime<Utc>) -> Result<Self> {
        let bills = QueryBill {
            user: Some(user),
            ..Default::default()
        }
        .run(conn)?;
        let month = Month::of(now).as_datetime_range()?;
        let horizon = now + Duration::days(UPCOMING_DAYS);

        let mut dashboard = Dashboard {
            total: bills.len(),
            pending: 0,
            paid: 0,
            overdue: Vec::new(),
            due_soon: Vec::new(),
            upcoming: Vec::new(),
            paid_this_month: 0,
            unread_notifications: Notification::count_unread(conn, user)?,
        };

        for bill in bills {
            match bill.status {
                Status::Paid => {
                    dashboard.paid += 1;
                    if bill.payment_date.is_some_and(|date| month.contains(&date)) {
                        dashboard.paid_this_month += 1;
                    }
                    continue;
                }
                Status::Pending => dashboard.pending += 1,
            }

            match bill.due_state(now) {
                DueState::Overdue => dashboard.overdue.push(bill.clone()),
                DueState::DueSoon => dashboard.due_soon.push(bill.clone()),
                DueState::OnTrack | DueState::Paid => {}
            }
            if now <= bill.due_date && bill.due_date <= horizon {
                dashboard.upcoming.push(bill);
            }
        }

        Ok(dashboard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bill::PayBill;
    use crate::test::prelude::{assert_eq, Result, *};

    #[test]
    fn build() -> Result<()> {
        let conn = &mut test::db()?;
        let user = test::user!(conn, "alice");
        let other = test::user!(conn, "bob");
        let now = test::at(2024, 5, 10, 12, 0);

        let overdue = test::bill!(conn, &user, "Rent", due_date: test::at(2024, 5, 1, 0, 0));
        let soon = test::bill!(conn, &user, "Power", due_date: test::at(2024, 5, 12, 0, 0));
        let week = test::bill!(conn, &user, "Water", due_date: test::at(2024, 5, 16, 0, 0));
        test::bill!(conn, &user, "Far", due_date: test::at(2024, 6, 30, 0, 0));
        let paid = test::bill!(conn, &user, "Phone", due_date: test::at(2024, 5, 2, 0, 0));
        PayBill::new(&user, &paid, test::at(2024, 5, 3, 0, 0)).save(conn)?;
        let old = test::bill!(conn, &user, "Gas", due_date: test::at(2024, 4, 2, 0, 0));
        PayBill::new(&user, &old, test::at(2024, 4, 3, 0, 0)).save(conn)?;
        test::bill!(conn, &other, "Rent", due_date: test::at(2024, 5, 1, 0, 0));

        let dashboard = Dashboard::build(conn, &user, now)?;
        assert_eq!(6, dashboard.total);
        assert_eq!(4, dashboard.pending);
        assert_eq!(2, dashboard.paid);
        assert_eq!(1, dashboard.paid_this_month);
        assert_eq!(vec![overdue.id], dashboard.overdue.iter().map(|b| b.id).collect::<Vec<_>>());
        assert_eq!(vec![soon.id], dashboard.due_soon.iter().map(|b| b.id).collect::<Vec<_>>());
        assert_eq!(
            vec![soon.id, week.id],
            dashboard.upcoming.iter().map(|b| b.id).collect::<Vec<_>>()
        );
        assert_eq!(2, dashboard.unread_notifications);

        Ok(())
    }
}
