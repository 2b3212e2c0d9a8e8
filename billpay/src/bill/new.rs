use crate::{
    bill::{Bill, Category, Frequency, Status},
    essentials::*,
    payment_method::PaymentMethod,
    schema::bills,
    user::User,
};

use chrono::{DateTime, Utc};
use diesel::prelude::*;

pub struct NewBill<'a> {
    pub user: &'a User,
    pub name: &'a str,
    pub amount: Decimal,
    pub due_date: DateTime<Utc>,
    pub status: Status,
    pub category: Category,
    pub notes: Option<&'a str>,
    pub recurring: bool,
    pub recurrence_frequency: Frequency,
    pub payment_method: Option<&'a PaymentMethod>,
}

impl<'a> NewBill<'a> {
    pub fn new(user: &'a User, name: &'a str, amount: Decimal) -> Self {
        Self {
            user,
            name,
            amount,
            due_date: Utc::now(),
            status: Status::default(),
            category: Category::default(),
            notes: None,
            recurring: false,
            recurrence_frequency: Frequency::default(),
            payment_method: None,
        }
    }

    pub fn save(self, conn: &mut Conn) -> Result<Bill> {
        self.validate()?.save(conn)
    }

    pub fn validate(self) -> Result<ValidatedNewBill> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(Error::Invalid("A bill needs a name".to_owned()));
        }
        validate_amount(self.amount)?;

        if let Some(method) = self.payment_method {
            if method.user_id != self.user.id {
                return Err(Error::Forbidden(
                    "Payment method belongs to another user",
                ));
            }
        }

        let now = Utc::now();
        Ok(ValidatedNewBill(InsertableBill {
            user_id: self.user.id,
            name: name.to_owned(),
            amount: self.amount,
            currency: self.user.currency,
            due_date: self.due_date,
            status: self.status,
            category: self.category,
            notes: self.notes.map(str::to_owned),
            recurring: self.recurring,
            recurrence_frequency: self.recurrence_frequency,
            payment_method_id: self.payment_method.map(|m| m.id),
            payment_date: self.status.is_paid().then_some(now),
            created_at: now,
            updated_at: now,
        }))
    }
}

pub(crate) fn validate_amount(amount: Decimal) -> Result<()> {
    if amount <= Decimal::ZERO {
        return Err(Error::Invalid("Amount must be greater than zero".to_owned()));
    }
    if amount.normalize().scale() > db::SCALE {
        return Err(Error::Invalid(format!(
            "Amount can't have more than {} decimal places",
            db::SCALE
        )));
    }
    Ok(())
}

pub struct ValidatedNewBill(InsertableBill);

impl ValidatedNewBill {
    pub fn save(self, conn: &mut Conn) -> Result<Bill> {
        self.0.save(conn)
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = bills)]
pub struct InsertableBill {
    pub user_id: i64,
    pub name: String,
    #[diesel(serialize_as = crate::db::Decimal)]
    pub amount: Decimal,
    #[diesel(serialize_as = crate::db::Currency)]
    pub currency: Currency,
    pub due_date: DateTime<Utc>,
    pub status: Status,
    pub category: Category,
    pub notes: Option<String>,
    pub recurring: bool,
    pub recurrence_frequency: Frequency,
    pub payment_method_id: Option<i64>,
    pub payment_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl InsertableBill {
    /// Pending copy of `bill`, due on `due_date`
    pub(crate) fn successor(bill: &Bill, due_date: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        Self {
            user_id: bill.user_id,
            name: bill.name.clone(),
            amount: bill.amount,
            currency: bill.currency,
            due_date,
            status: Status::Pending,
            category: bill.category,
            notes: bill.notes.clone(),
            recurring: true,
            recurrence_frequency: bill.recurrence_frequency.clone(),
            payment_method_id: bill.payment_method_id,
            payment_date: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub(crate) fn save(self, conn: &mut Conn) -> Result<Bill> {
        Ok(diesel::insert_into(bills::table)
            .values(self)
            .returning(Bill::as_returning())
            .get_result(conn)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::prelude::{assert_eq, Result, *};

    #[test]
    fn create() -> Result<()> {
        let conn = &mut test::db()?;
        let user = test::user!(conn, "alice", currency: Currency::USD);

        let bill = NewBill {
            due_date: test::at(2024, 6, 1, 0, 0),
            category: Category::Electricity,
            notes: Some("meter 42"),
            ..NewBill::new(&user, "  Power  ", Decimal::new(8450, 2))
        }
        .save(conn)?;

        assert_eq!("Power", bill.name);
        assert_eq!(Decimal::new(8450, 2), bill.amount);
        assert_eq!(Currency::USD, bill.currency);
        assert_eq!(Status::Pending, bill.status);
        assert_eq!(None, bill.payment_date);
        assert_eq!(Some("meter 42".to_owned()), bill.notes);
        assert!(!bill.reminder_sent);

        Ok(())
    }

    #[test]
    fn created_paid_gets_payment_date() -> Result<()> {
        let conn = &mut test::db()?;
        let user = test::user!(conn, "alice");

        let bill = test::bill!(conn, &user, "Rent", status: Status::Paid);
        assert!(bill.payment_date.is_some());

        Ok(())
    }

    #[test]
    fn invalid_input() -> Result<()> {
        let conn = &mut test::db()?;
        let user = test::user!(conn, "alice");

        let empty = NewBill::new(&user, "   ", Decimal::ONE).save(conn);
        assert!(matches!(empty, Err(Error::Invalid(_))));

        let zero = NewBill::new(&user, "Rent", Decimal::ZERO).save(conn);
        assert!(matches!(zero, Err(Error::Invalid(_))));

        let negative = NewBill::new(&user, "Rent", Decimal::new(-5, 0)).save(conn);
        assert!(matches!(negative, Err(Error::Invalid(_))));

        let precise = NewBill::new(&user, "Rent", Decimal::new(1001, 3)).save(conn);
        assert!(matches!(precise, Err(Error::Invalid(_))));

        // Trailing zeros are not extra precision
        NewBill::new(&user, "Rent", Decimal::new(1000, 3)).save(conn)?;

        Ok(())
    }

    #[test]
    fn foreign_payment_method() -> Result<()> {
        let conn = &mut test::db()?;
        let alice = test::user!(conn, "alice");
        let bob = test::user!(conn, "bob");
        let card = test::payment_method!(conn, &bob, "Bob's card");

        let result = NewBill {
            payment_method: Some(&card),
            ..NewBill::new(&alice, "Rent", Decimal::ONE)
        }
        .save(conn);

        let error = result.unwrap_err();
        assert_eq!(ErrorKind::Forbidden, error.kind());

        Ok(())
    }
}
