use crate::{
    bill::{new::validate_amount, Bill, Category, Frequency, Status},
    essentials::*,
    payment_method::PaymentMethod,
    schema::bills,
};

use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Edit of an existing bill, `None` fields are left untouched
///
/// Changing the status keeps the payment date in line with it, but never
/// triggers recurrence or notifications, use `PayBill` for that.
#[derive(Default, Clone)]
pub struct ChangeBill<'a> {
    pub name: Option<&'a str>,
    pub amount: Option<Decimal>,
    pub due_date: Option<DateTime<Utc>>,
    pub status: Option<Status>,
    pub category: Option<Category>,
    pub notes: Option<Option<&'a str>>,
    pub recurring: Option<bool>,
    pub recurrence_frequency: Option<Frequency>,
    pub payment_method: Option<Option<&'a PaymentMethod>>,
}

impl<'a> ChangeBill<'a> {
    pub fn save(self, conn: &mut Conn, bill: &Bill) -> Result<()> {
        self.validate(bill)?.save(conn)
    }

    pub fn apply(self, conn: &mut Conn, bill: &mut Bill) -> Result<()> {
        let changeset = self.validate(bill)?.1;

        let updated = diesel::update(&*bill)
            .set(changeset)
            .returning(Bill::as_returning())
            .get_result(conn)?;
        *bill = updated;
        Ok(())
    }

    pub fn validate<'b>(self, bill: &'b Bill) -> Result<ValidatedChangeBill<'b>>
    where
        'a: 'b,
    {
        let name = match self.name.map(str::trim) {
            Some("") => return Err(Error::Invalid("A bill needs a name".to_owned())),
            name => name,
        };
        if let Some(amount) = self.amount {
            validate_amount(amount)?;
        }
        if let Some(Some(method)) = self.payment_method {
            if method.user_id != bill.user_id {
                return Err(Error::Forbidden(
                    "Payment method belongs to another user",
                ));
            }
        }

        let now = Utc::now();
        let payment_date = match self.status {
            Some(Status::Paid) if bill.status.is_pending() => Some(Some(now)),
            Some(Status::Pending) => Some(None),
            _ => None,
        };

        Ok(ValidatedChangeBill(
            bill,
            BillChangeset {
                name,
                amount: self.amount,
                due_date: self.due_date,
                status: self.status,
                category: self.category,
                notes: self.notes,
                recurring: self.recurring,
                recurrence_frequency: self.recurrence_frequency,
                payment_method_id: self.payment_method.map(|m| m.map(|m| m.id)),
                payment_date,
                updated_at: Some(now),
            },
        ))
    }
}

pub struct ValidatedChangeBill<'a>(&'a Bill, BillChangeset<'a>);

impl ValidatedChangeBill<'_> {
    pub fn save(self, conn: &mut Conn) -> Result<()> {
        diesel::update(self.0).set(self.1).execute(conn)?;
        Ok(())
    }
}

#[derive(Default, Clone, AsChangeset)]
#[diesel(table_name = bills)]
pub struct BillChangeset<'a> {
    pub name: Option<&'a str>,
    #[diesel(serialize_as = crate::db::Decimal)]
    pub amount: Option<Decimal>,
    pub due_date: Option<DateTime<Utc>>,
    pub status: Option<Status>,
    pub category: Option<Category>,
    pub notes: Option<Option<&'a str>>,
    pub recurring: Option<bool>,
    pub recurrence_frequency: Option<Frequency>,
    pub payment_method_id: Option<Option<i64>>,
    pub payment_date: Option<Option<DateTime<Utc>>>,
    pub updated_at: Option<DateTime<Utc>>,
}
