use crate::{essentials::*, schema::user_preferences, user::User};

use std::ops::RangeInclusive;

use diesel::prelude::*;

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = user_preferences)]
#[diesel(belongs_to(User, foreign_key = user_id))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct UserPreference {
    pub id: i64,
    pub user_id: i64,
    pub email_reminders_enabled: bool,
    pub remind_days_before: i32,
    /// Stored only, no digest is ever sent
    pub daily_digest_enabled: bool,
    pub dark_mode: bool,
}

impl UserPreference {
    pub const DEFAULT_REMIND_DAYS_BEFORE: i32 = 3;
    pub const REMIND_DAYS_BEFORE: RangeInclusive<i32> = 1..=30;

    pub fn find(conn: &mut Conn, id: i64) -> Result<Self> {
        user_preferences::table
            .find(id)
            .select(UserPreference::as_select())
            .first(conn)
            .map_err(|e| Error::from_diesel_error(e, "UserPreference", None))
    }

    pub fn find_for(conn: &mut Conn, user_id: i64) -> Result<Self> {
        user_preferences::table
            .filter(user_preferences::user_id.eq(user_id))
            .select(UserPreference::as_select())
            .first(conn)
            .map_err(|e| Error::from_diesel_error(e, "UserPreference", Some("user")))
    }

    /// Preferences of a user, created with the defaults on first access
    pub fn find_or_create(conn: &mut Conn, user_id: i64) -> Result<Self> {
        diesel::insert_into(user_preferences::table)
            .values(user_preferences::user_id.eq(user_id))
            .on_conflict(user_preferences::user_id)
            .do_nothing()
            .execute(conn)?;

        Self::find_for(conn, user_id)
    }

    /// Stored preferences, or the defaults without storing them
    pub fn find_or_default(conn: &mut Conn, user_id: i64) -> Result<Self> {
        Ok(Self::find_for(conn, user_id)
            .optional()?
            .unwrap_or_else(|| Self::defaults(user_id)))
    }

    fn defaults(user_id: i64) -> Self {
        Self {
            id: 0,
            user_id,
            email_reminders_enabled: true,
            remind_days_before: Self::DEFAULT_REMIND_DAYS_BEFORE,
            daily_digest_enabled: false,
            dark_mode: false,
        }
    }
}

#[derive(Default, Clone, AsChangeset)]
#[diesel(table_name = user_preferences)]
pub struct ChangeUserPreference {
    pub email_reminders_enabled: Option<bool>,
    pub remind_days_before: Option<i32>,
    pub daily_digest_enabled: Option<bool>,
    pub dark_mode: Option<bool>,
}

impl ChangeUserPreference {
    pub fn validate(&self) -> Result<()> {
        match self.remind_days_before {
            Some(days) if !UserPreference::REMIND_DAYS_BEFORE.contains(&days) => {
                Err(Error::Invalid(format!(
                    "Reminders can be sent between {} and {} days before the due date, not {days}",
                    UserPreference::REMIND_DAYS_BEFORE.start(),
                    UserPreference::REMIND_DAYS_BEFORE.end(),
                )))
            }
            _ => Ok(()),
        }
    }

    pub fn save(self, conn: &mut Conn, preference: &UserPreference) -> Result<()> {
        self.validate()?;
        diesel::update(preference)
            .set(self)
            .execute(conn)
            .map_err(Error::from)
            .optional_empty_changeset()?;
        Ok(())
    }

    pub fn apply(self, conn: &mut Conn, preference: &mut UserPreference) -> Result<()> {
        self.clone().save(conn, preference)?;

        if let Some(value) = self.email_reminders_enabled {
            preference.email_reminders_enabled = value;
        }
        if let Some(value) = self.remind_days_before {
            preference.remind_days_before = value;
        }
        if let Some(value) = self.daily_digest_enabled {
            preference.daily_digest_enabled = value;
        }
        if let Some(value) = self.dark_mode {
            preference.dark_mode = value;
        }

        Ok(())
    }
}
