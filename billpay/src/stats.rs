use crate::{
    bill::{Category, Status},
    date::Month,
    essentials::*,
    schema::bills,
    user::User,
};

use std::ops::Range;

use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Paid bills of each category over a period, in the user's currency
#[derive(Debug)]
pub struct CategoriesStats {
    pub stats: Vec<CategoryStats>,
    pub amount: Decimal,
}

impl CategoriesStats {
    pub fn from_range(
        conn: &mut Conn,
        user: &User,
        range: Range<DateTime<Utc>>,
    ) -> Result<Self> {
        let mut stats = bills::table
            .filter(bills::user_id.eq(user.id))
            .filter(bills::currency.eq(user.currency.code()))
            .filter(bills::status.eq(Status::Paid))
            .filter(bills::payment_date.ge(range.start))
            .filter(bills::payment_date.lt(range.end))
            .group_by(bills::category)
            .select(CategoryStats::as_select())
            .load::<CategoryStats>(conn)?;
        stats.sort_by(|a, b| b.amount.cmp(&a.amount).then(a.category.code().cmp(b.category.code())));

        Ok(stats.into())
    }

    pub fn for_month(conn: &mut Conn, user: &User, month: Month) -> Result<Self> {
        Self::from_range(conn, user, month.as_datetime_range()?)
    }
}

impl From<Vec<CategoryStats>> for CategoriesStats {
    fn from(vec: Vec<CategoryStats>) -> Self {
        let total = vec.iter().fold(Decimal::ZERO, |acc, e| acc + e.amount);

        Self {
            stats: vec,
            amount: total,
        }
    }
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct CategoryStats {
    #[diesel(select_expression = bills::category)]
    pub category: Category,
    #[diesel(
        select_expression = db::total(bills::amount),
        deserialize_as = db::Decimal
    )]
    pub amount: Decimal,
    #[diesel(select_expression = diesel::dsl::count_star())]
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonthlySpend {
    pub month: Month,
    pub amount: Decimal,
}

/// Paid amount of each of the `count` months ending with `until`, oldest first
pub fn monthly_spend(
    conn: &mut Conn,
    user: &User,
    until: Month,
    count: u32,
) -> Result<Vec<MonthlySpend>> {
    until
        .last(count)
        .into_iter()
        .map(|month| {
            let range = month.as_datetime_range()?;
            let amount: Decimal = bills::table
                .filter(bills::user_id.eq(user.id))
                .filter(bills::currency.eq(user.currency.code()))
                .filter(bills::status.eq(Status::Paid))
                .filter(bills::payment_date.ge(range.start))
                .filter(bills::payment_date.lt(range.end))
                .select(db::total(bills::amount))
                .get_result::<db::Decimal>(conn)?
                .into();

            Ok(MonthlySpend { month, amount })
        })
        .collect()
}
