use crate::{
    due::{self, DueState},
    essentials::*,
    schema::bills,
    storage::FileStorage,
    user::User,
};

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;

pub mod category;
pub use category::Category;

pub mod frequency;
pub use frequency::Frequency;

pub mod status;
pub use status::Status;

pub mod new;
pub use new::NewBill;

pub mod change;
pub use change::ChangeBill;

pub mod query;
pub use query::QueryBill;

pub mod pay;
pub use pay::{PayBill, Payment};

pub mod recurrence;

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = bills)]
#[diesel(belongs_to(User, foreign_key = user_id))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Bill {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    #[diesel(deserialize_as = crate::db::Decimal)]
    pub amount: Decimal,
    #[diesel(deserialize_as = crate::db::Currency)]
    pub currency: Currency,
    pub due_date: DateTime<Utc>,
    pub status: Status,
    pub category: Category,
    pub notes: Option<String>,
    pub recurring: bool,
    pub recurrence_frequency: Frequency,
    pub payment_method_id: Option<i64>,
    pub receipt_image: Option<String>,
    pub payment_date: Option<DateTime<Utc>>,
    pub reminder_sent: bool,
    pub last_reminder_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Bill {
    pub fn amount(&self) -> Amount {
        Amount(self.amount, self.currency)
    }

    /// Amount prefixed by its currency code, as shown in messages
    pub fn display_amount(&self) -> String {
        format!("{} {}", self.currency.code(), self.amount)
    }

    pub fn find(conn: &mut Conn, id: i64) -> Result<Self> {
        bills::table
            .find(id)
            .select(Bill::as_select())
            .first(conn)
            .map_err(|e| Error::from_diesel_error(e, "Bill", None))
    }

    /// Find a bill owned by `user`
    ///
    /// Bills of other users are reported as missing, so their existence is
    /// not disclosed.
    pub fn find_for(conn: &mut Conn, user: &User, id: i64) -> Result<Self> {
        bills::table
            .find(id)
            .filter(bills::user_id.eq(user.id))
            .select(Bill::as_select())
            .first(conn)
            .map_err(|e| Error::from_diesel_error(e, "Bill", None))
    }

    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        due::is_overdue(self.status, self.due_date, now)
    }

    pub fn is_due_soon(&self, now: DateTime<Utc>) -> bool {
        due::is_due_soon(self.status, self.due_date, now)
    }

    pub fn due_state(&self, now: DateTime<Utc>) -> DueState {
        DueState::of(self.status, self.due_date, now)
    }

    pub fn days_until_due(&self, now: DateTime<Utc>) -> i64 {
        due::days_until_due(self.due_date, now)
    }

    pub fn next_due_date(&self) -> Option<DateTime<Utc>> {
        if self.recurring {
            recurrence::next_due_date(&self.recurrence_frequency, self.due_date)
        } else {
            None
        }
    }

    /// Whether a reminder already went out on `day`
    pub fn reminded_on(&self, day: NaiveDate) -> bool {
        self.last_reminder_date
            .is_some_and(|date| date.date_naive() == day)
    }

    pub(crate) fn mark_reminded(&mut self, conn: &mut Conn, now: DateTime<Utc>) -> Result<()> {
        diesel::update(&*self)
            .set((
                bills::reminder_sent.eq(true),
                bills::last_reminder_date.eq(Some(now)),
            ))
            .execute(conn)?;

        self.reminder_sent = true;
        self.last_reminder_date = Some(now);
        Ok(())
    }

    /// Store a receipt image and keep its location on the bill
    pub fn attach_receipt(
        &mut self,
        conn: &mut Conn,
        storage: &dyn FileStorage,
        filename: &str,
        bytes: &[u8],
    ) -> Result<()> {
        let location = storage.store("receipts", filename, bytes)?;

        diesel::update(&*self)
            .set((
                bills::receipt_image.eq(Some(&location)),
                bills::updated_at.eq(Utc::now()),
            ))
            .execute(conn)?;

        self.receipt_image = Some(location);
        Ok(())
    }

    /// Delete the bill, its notifications go with it
    pub fn delete(&mut self, conn: &mut Conn) -> Result<()> {
        diesel::delete(&*self).execute(conn)?;

        Ok(())
    }
}
