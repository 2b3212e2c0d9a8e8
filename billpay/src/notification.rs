use crate::{
    bill::Bill,
    essentials::*,
    schema::notifications,
    user::User,
};

use chrono::{DateTime, Utc};
use diesel::prelude::*;

pub mod kind;
pub use kind::NotificationType;

pub mod generate;
pub use generate::generate;

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = notifications)]
#[diesel(belongs_to(User, foreign_key = user_id))]
#[diesel(belongs_to(Bill, foreign_key = bill_id))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Notification {
    pub id: i64,
    pub user_id: i64,
    pub bill_id: Option<i64>,
    pub title: String,
    pub message: String,
    pub notification_type: NotificationType,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn find(conn: &mut Conn, id: i64) -> Result<Self> {
        notifications::table
            .find(id)
            .select(Notification::as_select())
            .first(conn)
            .map_err(|e| Error::from_diesel_error(e, "Notification", None))
    }

    /// Find a notification of `user`, others are reported as missing
    pub fn find_for(conn: &mut Conn, user: &User, id: i64) -> Result<Self> {
        notifications::table
            .find(id)
            .filter(notifications::user_id.eq(user.id))
            .select(Notification::as_select())
            .first(conn)
            .map_err(|e| Error::from_diesel_error(e, "Notification", None))
    }

    pub fn count_unread(conn: &mut Conn, user: &User) -> Result<i64> {
        Ok(notifications::table
            .filter(notifications::user_id.eq(user.id))
            .filter(notifications::is_read.eq(false))
            .count()
            .get_result(conn)?)
    }

    pub fn mark_read(&mut self, conn: &mut Conn) -> Result<()> {
        diesel::update(&*self)
            .set(notifications::is_read.eq(true))
            .execute(conn)?;

        self.is_read = true;
        Ok(())
    }

    /// Mark every unread notification of `user` as read, returning how many
    pub fn mark_all_read(conn: &mut Conn, user: &User) -> Result<usize> {
        Ok(diesel::update(notifications::table)
            .filter(notifications::user_id.eq(user.id))
            .filter(notifications::is_read.eq(false))
            .set(notifications::is_read.eq(true))
            .execute(conn)?)
    }

    pub fn delete(&mut self, conn: &mut Conn) -> Result<()> {
        diesel::delete(&*self).execute(conn)?;

        Ok(())
    }
}

/// Drop the overdue and due soon alerts of a bill, read or not
pub(crate) fn clear_alerts(conn: &mut Conn, bill_id: i64) -> Result<usize> {
    Ok(diesel::delete(notifications::table)
        .filter(notifications::bill_id.eq(bill_id))
        .filter(
            notifications::notification_type
                .eq_any([NotificationType::Overdue, NotificationType::DueSoon]),
        )
        .execute(conn)?)
}

pub struct NewNotification<'a> {
    pub user: &'a User,
    pub bill_id: Option<i64>,
    pub notification_type: NotificationType,
    pub title: &'a str,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl<'a> NewNotification<'a> {
    pub fn new(
        user: &'a User,
        notification_type: NotificationType,
        title: &'a str,
        message: String,
    ) -> Self {
        Self {
            user,
            bill_id: None,
            notification_type,
            title,
            message,
            created_at: Utc::now(),
        }
    }

    fn as_insertable(&self) -> InsertableNotification<'_> {
        InsertableNotification {
            user_id: self.user.id,
            bill_id: self.bill_id,
            title: self.title,
            message: &self.message,
            notification_type: self.notification_type,
            is_read: false,
            created_at: self.created_at,
        }
    }

    pub fn save(self, conn: &mut Conn) -> Result<Notification> {
        Ok(diesel::insert_into(notifications::table)
            .values(self.as_insertable())
            .returning(Notification::as_returning())
            .get_result(conn)?)
    }

    /// Insert unless an identical unread alert already exists
    pub fn save_unless_open(self, conn: &mut Conn) -> Result<Option<Notification>> {
        Ok(diesel::insert_into(notifications::table)
            .values(self.as_insertable())
            .on_conflict_do_nothing()
            .returning(Notification::as_returning())
            .get_result(conn)
            .optional()?)
    }
}

#[derive(Insertable)]
#[diesel(table_name = notifications)]
struct InsertableNotification<'a> {
    user_id: i64,
    bill_id: Option<i64>,
    title: &'a str,
    message: &'a str,
    notification_type: NotificationType,
    is_read: bool,
    created_at: DateTime<Utc>,
}

/// Notifications of a user, newest first
#[derive(Default)]
pub struct QueryNotification<'a> {
    pub user: Option<&'a User>,
    pub unread_only: bool,
    pub bill_id: Option<i64>,
    pub notification_type: Option<NotificationType>,
    pub count: Option<i64>,
}

impl QueryNotification<'_> {
    pub fn run(&self, conn: &mut Conn) -> Result<Vec<Notification>> {
        let Some(user) = self.user else {
            return Err(Error::Invalid(
                "Listing notifications requires a user".to_owned(),
            ));
        };
        let mut query = notifications::table
            .filter(notifications::user_id.eq(user.id))
            .into_boxed();

        if self.unread_only {
            query = query.filter(notifications::is_read.eq(false));
        }
        if let Some(bill_id) = self.bill_id {
            query = query.filter(notifications::bill_id.eq(bill_id));
        }
        if let Some(notification_type) = self.notification_type {
            query = query.filter(notifications::notification_type.eq(notification_type));
        }
        if let Some(count) = self.count {
            query = query.limit(count);
        }

        Ok(query
            .order((notifications::created_at.desc(), notifications::id.desc()))
            .select(Notification::as_select())
            .load(conn)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::prelude::{assert_eq, Result, *};

    #[test]
    fn list_newest_first() -> Result<()> {
        let conn = &mut test::db()?;
        let alice = test::user!(conn, "alice");
        let bob = test::user!(conn, "bob");

        let old = test::notification!(conn, &alice, created_at: test::at(2024, 1, 1, 0, 0));
        let mut new = test::notification!(conn, &alice, created_at: test::at(2024, 2, 1, 0, 0));
        test::notification!(conn, &bob);

        let all = QueryNotification {
            user: Some(&alice),
            ..Default::default()
        }
        .run(conn)?;
        assert_eq!(vec![new.id, old.id], all.iter().map(|n| n.id).collect::<Vec<_>>());

        new.mark_read(conn)?;
        let unread = QueryNotification {
            user: Some(&alice),
            unread_only: true,
            ..Default::default()
        }
        .run(conn)?;
        assert_eq!(vec![old.id], unread.iter().map(|n| n.id).collect::<Vec<_>>());
        assert_eq!(1, Notification::count_unread(conn, &alice)?);

        Ok(())
    }

    #[test]
    fn mark_all_read() -> Result<()> {
        let conn = &mut test::db()?;
        let alice = test::user!(conn, "alice");
        let bob = test::user!(conn, "bob");
        test::notification!(conn, &alice);
        test::notification!(conn, &alice);
        test::notification!(conn, &bob);

        assert_eq!(2, Notification::mark_all_read(conn, &alice)?);
        assert_eq!(0, Notification::count_unread(conn, &alice)?);
        assert_eq!(1, Notification::count_unread(conn, &bob)?);
        assert_eq!(0, Notification::mark_all_read(conn, &alice)?);

        Ok(())
    }

    #[test]
    fn find_for_other_user() -> Result<()> {
        let conn = &mut test::db()?;
        let alice = test::user!(conn, "alice");
        let bob = test::user!(conn, "bob");
        let notification = test::notification!(conn, &alice);

        assert!(Notification::find_for(conn, &alice, notification.id).is_ok());
        let error = Notification::find_for(conn, &bob, notification.id).unwrap_err();
        assert!(error.is_not_found());

        Ok(())
    }

    #[test]
    fn single_open_alert() -> Result<()> {
        let conn = &mut test::db()?;
        let user = test::user!(conn, "alice");
        let bill = test::bill!(conn, &user, "Rent");
        let alert = || NewNotification {
            bill_id: Some(bill.id),
            ..NewNotification::new(&user, NotificationType::Overdue, "Bill Overdue", String::new())
        };

        let mut first = alert().save_unless_open(conn)?.unwrap();
        assert!(alert().save_unless_open(conn)?.is_none());
        assert!(alert().save(conn).is_err());

        // Other kinds are not limited
        let info = || NewNotification {
            bill_id: Some(bill.id),
            ..NewNotification::new(&user, NotificationType::Info, "Info", String::new())
        };
        info().save_unless_open(conn)?.unwrap();
        info().save_unless_open(conn)?.unwrap();

        first.mark_read(conn)?;
        assert!(alert().save_unless_open(conn)?.is_some());

        assert_eq!(2, clear_alerts(conn, bill.id)?);

        Ok(())
    }
}
