use crate::{
    bill::{Bill, Category, Status},
    date::Month,
    essentials::*,
    notification::{NewNotification, Notification, NotificationType},
    schema::{bills, budgets},
    user::User,
};

use std::ops::Range;

use chrono::{DateTime, Utc};
use diesel::prelude::*;

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = budgets)]
#[diesel(belongs_to(User, foreign_key = user_id))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Budget {
    pub id: i64,
    pub user_id: i64,
    pub category: Category,
    #[diesel(deserialize_as = crate::db::Decimal)]
    pub monthly_limit: Decimal,
}

/// Spending against a budget over one calendar month
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetStatus {
    pub spent: Decimal,
    pub percentage_used: Decimal,
    pub remaining: Decimal,
    pub is_over_budget: bool,
}

impl BudgetStatus {
    pub fn new(monthly_limit: Decimal, spent: Decimal) -> Self {
        let percentage_used = (spent / monthly_limit * Decimal::ONE_HUNDRED)
            .clamp(Decimal::ZERO, Decimal::ONE_HUNDRED)
            .round_dp(2);

        Self {
            spent,
            percentage_used,
            remaining: (monthly_limit - spent).max(Decimal::ZERO),
            is_over_budget: spent > monthly_limit,
        }
    }
}

impl Budget {
    pub fn find(conn: &mut Conn, id: i64) -> Result<Self> {
        budgets::table
            .find(id)
            .select(Budget::as_select())
            .first(conn)
            .map_err(|e| Error::from_diesel_error(e, "Budget", None))
    }

    pub fn find_for(conn: &mut Conn, user: &User, category: Category) -> Result<Self> {
        budgets::table
            .filter(budgets::user_id.eq(user.id))
            .filter(budgets::category.eq(category))
            .select(Budget::as_select())
            .first(conn)
            .map_err(|e| Error::from_diesel_error(e, "Budget", Some("category")))
    }

    pub fn for_user(conn: &mut Conn, user: &User) -> Result<Vec<Self>> {
        Ok(budgets::table
            .filter(budgets::user_id.eq(user.id))
            .order(budgets::category.asc())
            .select(Budget::as_select())
            .load(conn)?)
    }

    pub fn monthly_limit(&self, currency: Currency) -> Amount {
        Amount(self.monthly_limit, currency)
    }

    /// Sum of the paid bills of this category within `range` of payment dates
    ///
    /// The limit has no currency of its own, only bills in `currency` count.
    pub fn spent(
        &self,
        conn: &mut Conn,
        currency: Currency,
        range: Range<DateTime<Utc>>,
    ) -> Result<Decimal> {
        Ok(bills::table
            .filter(bills::user_id.eq(self.user_id))
            .filter(bills::status.eq(Status::Paid))
            .filter(bills::category.eq(self.category))
            .filter(bills::currency.eq(currency.code()))
            .filter(bills::payment_date.ge(range.start))
            .filter(bills::payment_date.lt(range.end))
            .select(db::total(bills::amount))
            .get_result::<db::Decimal>(conn)?
            .into())
    }

    /// Spending in `currency` in the calendar month containing `now`
    pub fn status(
        &self,
        conn: &mut Conn,
        currency: Currency,
        now: DateTime<Utc>,
    ) -> Result<BudgetStatus> {
        let spent = self.spent(conn, currency, Month::of(now).as_datetime_range()?)?;
        Ok(BudgetStatus::new(self.monthly_limit, spent))
    }

    pub fn delete(&mut self, conn: &mut Conn) -> Result<()> {
        diesel::delete(&*self).execute(conn)?;

        Ok(())
    }
}

/// Create the budget of a category, or replace its limit
pub struct SetBudget<'a> {
    pub user: &'a User,
    pub category: Category,
    pub monthly_limit: Decimal,
}

impl SetBudget<'_> {
    pub fn save(self, conn: &mut Conn) -> Result<Budget> {
        if self.monthly_limit <= Decimal::ZERO {
            return Err(Error::Invalid(
                "Monthly limit must be greater than zero".to_owned(),
            ));
        }

        let limit = db::Decimal::from(self.monthly_limit);
        Ok(diesel::insert_into(budgets::table)
            .values((
                budgets::user_id.eq(self.user.id),
                budgets::category.eq(self.category),
                budgets::monthly_limit.eq(limit),
            ))
            .on_conflict((budgets::user_id, budgets::category))
            .do_update()
            .set(budgets::monthly_limit.eq(limit))
            .returning(Budget::as_returning())
            .get_result(conn)?)
    }
}

/// Budget notification when paying `bill` takes its category over the limit
pub(crate) fn check_after_payment(
    conn: &mut Conn,
    user: &User,
    bill: &Bill,
    now: DateTime<Utc>,
) -> Result<Option<Notification>> {
    if bill.currency != user.currency {
        return Ok(None);
    }
    let Some(budget) = Budget::find_for(conn, user, bill.category).optional()? else {
        return Ok(None);
    };

    let spent = budget.spent(conn, user.currency, Month::of(now).as_datetime_range()?)?;
    let before = spent - bill.amount;
    if before > budget.monthly_limit || spent <= budget.monthly_limit {
        return Ok(None);
    }

    log::info!("{} budget exceeded", bill.category.label());
    Ok(Some(
        NewNotification {
            bill_id: Some(bill.id),
            created_at: now,
            ..NewNotification::new(
                user,
                NotificationType::Budget,
                "Budget Exceeded",
                format!(
                    "You have spent {} {} on {} this month, over your limit of {} {}.",
                    bill.currency.code(),
                    spent,
                    bill.category.label(),
                    bill.currency.code(),
                    budget.monthly_limit
                ),
            )
        }
        .save(conn)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bill::PayBill;
    use crate::user::ChangeUser;
    use crate::test::prelude::{assert_eq, Result, *};

    #[test]
    fn figures() {
        let limit = Decimal::new(100, 0);

        let status = BudgetStatus::new(limit, Decimal::new(80, 0));
        assert_eq!(Decimal::new(80, 0), status.percentage_used);
        assert_eq!(Decimal::new(20, 0), status.remaining);
        assert!(!status.is_over_budget);

        let status = BudgetStatus::new(limit, Decimal::new(150, 0));
        assert_eq!(Decimal::ONE_HUNDRED, status.percentage_used);
        assert_eq!(Decimal::ZERO, status.remaining);
        assert!(status.is_over_budget);

        let status = BudgetStatus::new(Decimal::new(300, 0), Decimal::new(100, 0));
        assert_eq!(Decimal::new(3333, 2), status.percentage_used);
    }

    #[test]
    fn set_is_an_upsert() -> Result<()> {
        let conn = &mut test::db()?;
        let user = test::user!(conn, "alice");

        let first = SetBudget {
            user: &user,
            category: Category::Utilities,
            monthly_limit: Decimal::new(100, 0),
        }
        .save(conn)?;
        let second = SetBudget {
            user: &user,
            category: Category::Utilities,
            monthly_limit: Decimal::new(250, 0),
        }
        .save(conn)?;

        assert_eq!(first.id, second.id);
        assert_eq!(Decimal::new(250, 0), second.monthly_limit);
        assert_eq!(1, Budget::for_user(conn, &user)?.len());

        let result = SetBudget {
            user: &user,
            category: Category::Rent,
            monthly_limit: Decimal::ZERO,
        }
        .save(conn);
        assert!(matches!(result, Err(Error::Invalid(_))));

        Ok(())
    }

    #[test]
    fn spent_this_month() -> Result<()> {
        let conn = &mut test::db()?;
        let user = test::user!(conn, "alice");
        let now = test::at(2024, 5, 20, 12, 0);
        let budget = SetBudget {
            user: &user,
            category: Category::Utilities,
            monthly_limit: Decimal::new(100, 0),
        }
        .save(conn)?;

        let pay = |conn: &mut Conn,
                   amount: Decimal,
                   category: Category,
                   at: DateTime<Utc>|
         -> Result<()> {
            let bill = test::bill!(conn, &user, "Bill", amount: amount, category: category);
            PayBill::new(&user, &bill, at).save(conn)?;
            Ok(())
        };
        pay(conn, Decimal::new(30, 0), Category::Utilities, test::at(2024, 5, 2, 0, 0))?;
        pay(conn, Decimal::new(50, 0), Category::Utilities, test::at(2024, 5, 19, 0, 0))?;
        pay(conn, Decimal::new(99, 0), Category::Utilities, test::at(2024, 4, 30, 23, 0))?;
        pay(conn, Decimal::new(99, 0), Category::Rent, test::at(2024, 5, 3, 0, 0))?;
        // Pending bills don't count
        test::bill!(conn, &user, "Pending", amount: Decimal::new(99, 0), category: Category::Utilities);

        let status = budget.status(conn, user.currency, now)?;
        assert_eq!(Decimal::new(80, 0), status.spent);
        assert_eq!(Decimal::new(80, 0), status.percentage_used);
        assert_eq!(Decimal::new(20, 0), status.remaining);

        Ok(())
    }

    #[test]
    fn notifies_when_crossing_the_limit() -> Result<()> {
        let conn = &mut test::db()?;
        let user = test::user!(conn, "alice");
        SetBudget {
            user: &user,
            category: Category::Phone,
            monthly_limit: Decimal::new(100, 0),
        }
        .save(conn)?;

        let mut pay = |amount: Decimal| -> Result<Vec<NotificationType>> {
            let bill = test::bill!(conn, &user, "Phone", amount: amount, category: Category::Phone);
            let payment = PayBill::new(&user, &bill, test::at(2024, 5, 10, 0, 0)).save(conn)?;
            Ok(payment
                .notifications
                .iter()
                .map(|n| n.notification_type)
                .collect())
        };

        assert_eq!(vec![NotificationType::Payment], pay(Decimal::new(60, 0))?);
        assert_eq!(vec![NotificationType::Payment], pay(Decimal::new(40, 0))?);
        assert_eq!(
            vec![NotificationType::Payment, NotificationType::Budget],
            pay(Decimal::new(1, 0))?
        );
        assert_eq!(vec![NotificationType::Payment], pay(Decimal::new(10, 0))?);

        Ok(())
    }

    #[test]
    fn spent_in_user_currency() -> Result<()> {
        let conn = &mut test::db()?;
        let mut user = test::user!(conn, "alice");
        let now = test::at(2024, 5, 20, 12, 0);
        let budget = SetBudget {
            user: &user,
            category: Category::Utilities,
            monthly_limit: Decimal::new(100, 0),
        }
        .save(conn)?;

        let bill = test::bill!(
            conn,
            &user,
            "Power",
            amount: Decimal::new(70, 0),
            category: Category::Utilities
        );
        PayBill::new(&user, &bill, test::at(2024, 5, 2, 0, 0)).save(conn)?;

        ChangeUser {
            currency: Some(Currency::USD),
            ..Default::default()
        }
        .apply(conn, &mut user)?;

        let bill = test::bill!(
            conn,
            &user,
            "Water",
            amount: Decimal::new(50, 0),
            category: Category::Utilities
        );
        let payment = PayBill::new(&user, &bill, test::at(2024, 5, 3, 0, 0)).save(conn)?;
        assert_eq!(1, payment.notifications.len());

        let status = budget.status(conn, user.currency, now)?;
        assert_eq!(Decimal::new(50, 0), status.spent);
        assert!(!status.is_over_budget);

        let status = budget.status(conn, Currency::EUR, now)?;
        assert_eq!(Decimal::new(70, 0), status.spent);

        Ok(())
    }
}
