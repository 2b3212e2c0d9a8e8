use crate::{
    bill::{Bill, Category, Status},
    essentials::*,
    schema::bills,
    user::User,
};

use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Bills of a user, ordered by due date
#[derive(Default)]
pub struct QueryBill<'a> {
    pub user: Option<&'a User>,
    pub status: Option<Status>,
    pub category: Option<Category>,
    pub due_after: Option<DateTime<Utc>>,
    pub due_before: Option<DateTime<Utc>>,
    pub paid_after: Option<DateTime<Utc>>,
    pub count: Option<i64>,
}

impl QueryBill<'_> {
    pub fn run(&self, conn: &mut Conn) -> Result<Vec<Bill>> {
        let Some(user) = self.user else {
            return Err(Error::Invalid("Listing bills requires a user".to_owned()));
        };
        let mut query = bills::table
            .filter(bills::user_id.eq(user.id))
            .into_boxed();

        if let Some(status) = self.status {
            query = query.filter(bills::status.eq(status));
        }
        if let Some(category) = self.category {
            query = query.filter(bills::category.eq(category));
        }
        if let Some(after) = self.due_after {
            query = query.filter(bills::due_date.ge(after));
        }
        if let Some(before) = self.due_before {
            query = query.filter(bills::due_date.le(before));
        }
        if let Some(after) = self.paid_after {
            query = query.filter(bills::payment_date.ge(after));
        }
        if let Some(count) = self.count {
            query = query.limit(count);
        }

        Ok(query
            .order((bills::due_date.asc(), bills::id.asc()))
            .select(Bill::as_select())
            .load(conn)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::prelude::{assert_eq, Result, *};

    #[test]
    fn filters_and_order() -> Result<()> {
        let conn = &mut test::db()?;
        let alice = test::user!(conn, "alice");
        let bob = test::user!(conn, "bob");

        let late = test::bill!(conn, &alice, "Late", due_date: test::at(2024, 3, 20, 0, 0));
        let early = test::bill!(conn, &alice, "Early", due_date: test::at(2024, 3, 1, 0, 0));
        let paid = test::bill!(
            conn,
            &alice,
            "Paid",
            due_date: test::at(2024, 3, 10, 0, 0),
            status: Status::Paid,
            category: Category::Water
        );
        test::bill!(conn, &bob, "Bob's", due_date: test::at(2024, 3, 5, 0, 0));

        let ids = |bills: Vec<Bill>| bills.into_iter().map(|b| b.id).collect::<Vec<_>>();

        let all = QueryBill {
            user: Some(&alice),
            ..Default::default()
        }
        .run(conn)?;
        assert_eq!(vec![early.id, paid.id, late.id], ids(all));

        let pending = QueryBill {
            user: Some(&alice),
            status: Some(Status::Pending),
            ..Default::default()
        }
        .run(conn)?;
        assert_eq!(vec![early.id, late.id], ids(pending));

        let water = QueryBill {
            user: Some(&alice),
            category: Some(Category::Water),
            ..Default::default()
        }
        .run(conn)?;
        assert_eq!(vec![paid.id], ids(water));

        let window = QueryBill {
            user: Some(&alice),
            due_after: Some(test::at(2024, 3, 5, 0, 0)),
            due_before: Some(test::at(2024, 3, 20, 0, 0)),
            count: Some(1),
            ..Default::default()
        }
        .run(conn)?;
        assert_eq!(vec![paid.id], ids(window));

        Ok(())
    }

    #[test]
    fn user_is_mandatory() -> Result<()> {
        let conn = &mut test::db()?;

        assert!(QueryBill::default().run(conn).is_err());

        Ok(())
    }
}
