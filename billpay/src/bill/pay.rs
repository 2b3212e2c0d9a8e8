use crate::{
    bill::{change::BillChangeset, new::InsertableBill, Bill, Status},
    budget,
    essentials::*,
    notification::{self, NewNotification, Notification},
    payment_method::PaymentMethod,
    schema::bills,
    user::User,
};

use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Mark a bill as paid
///
/// Recurring bills get their next occurrence created, open overdue and due
/// soon alerts of the bill are dropped, and a payment notification is added.
pub struct PayBill<'a> {
    pub user: &'a User,
    pub bill: &'a Bill,
    pub payment_method: Option<&'a PaymentMethod>,
    pub now: DateTime<Utc>,
}

#[derive(Debug)]
pub struct Payment {
    pub bill: Bill,
    /// Next occurrence of a recurring bill
    pub next: Option<Bill>,
    pub notifications: Vec<Notification>,
}

impl<'a> PayBill<'a> {
    pub fn new(user: &'a User, bill: &'a Bill, now: DateTime<Utc>) -> Self {
        Self {
            user,
            bill,
            payment_method: None,
            now,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.bill.user_id != self.user.id {
            return Err(Error::ModelNotFound("Bill"));
        }
        if self.bill.status.is_paid() {
            return Err(Error::Invalid(format!(
                "Bill \"{}\" is already paid",
                self.bill.name
            )));
        }
        if let Some(method) = self.payment_method {
            if method.user_id != self.user.id {
                return Err(Error::Forbidden(
                    "Payment method belongs to another user",
                ));
            }
        }
        Ok(())
    }

    pub fn save(self, conn: &mut Conn) -> Result<Payment> {
        self.validate()?;

        conn.transaction::<_, Error, _>(|conn| {
            // Guarded on the status so a concurrent payment can't go through twice
            let bill = diesel::update(bills::table)
                .filter(bills::id.eq(self.bill.id))
                .filter(bills::status.eq(Status::Pending))
                .set(BillChangeset {
                    status: Some(Status::Paid),
                    payment_date: Some(Some(self.now)),
                    payment_method_id: self.payment_method.map(|m| Some(m.id)),
                    updated_at: Some(self.now),
                    ..Default::default()
                })
                .returning(Bill::as_returning())
                .get_result(conn)
                .optional()?
                .ok_or_else(|| {
                    Error::Invalid(format!("Bill \"{}\" is already paid", self.bill.name))
                })?;

            let next = match bill.next_due_date() {
                Some(due_date) => {
                    log::info!("Next \"{}\" is due on {}", bill.name, due_date);
                    Some(InsertableBill::successor(&bill, due_date, self.now).save(conn)?)
                }
                None => None,
            };

            notification::clear_alerts(conn, bill.id)?;

            let mut notifications = vec![NewNotification {
                bill_id: Some(bill.id),
                created_at: self.now,
                ..NewNotification::new(
                    self.user,
                    notification::NotificationType::Payment,
                    "Payment Recorded",
                    format!("\"{}\" ({}) marked as paid.", bill.name, bill.display_amount()),
                )
            }
            .save(conn)?];

            if let Some(alert) = budget::check_after_payment(conn, self.user, &bill, self.now)? {
                notifications.push(alert);
            }

            Ok(Payment {
                bill,
                next,
                notifications,
            })
        })
    }
}
