use crate::{essentials::*, schema::users, storage::FileStorage};

use chrono::{DateTime, Utc};
use diesel::prelude::*;

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub first_name: String,
    #[diesel(deserialize_as = crate::db::Currency)]
    pub currency: Currency,
    pub profile_picture: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// First name when known, username otherwise
    pub fn display_name(&self) -> &str {
        if self.first_name.trim().is_empty() {
            &self.username
        } else {
            &self.first_name
        }
    }

    pub fn find(conn: &mut Conn, id: i64) -> Result<Self> {
        users::table
            .find(id)
            .select(User::as_select())
            .first(conn)
            .map_err(|e| Error::from_diesel_error(e, "User", None))
    }

    pub fn find_by_username(conn: &mut Conn, username: &str) -> Result<Self> {
        users::table
            .filter(users::username.eq(username))
            .select(User::as_select())
            .first(conn)
            .map_err(|e| Error::from_diesel_error(e, "User", Some("username")))
    }

    pub fn find_by_email(conn: &mut Conn, email: &str) -> Result<Self> {
        users::table
            .filter(users::email.eq(normalize_email(email)))
            .select(User::as_select())
            .first(conn)
            .map_err(|e| Error::from_diesel_error(e, "User", Some("email")))
    }

    pub fn all(conn: &mut Conn) -> Result<Vec<Self>> {
        Ok(users::table
            .order(users::username.asc())
            .select(User::as_select())
            .load(conn)?)
    }

    pub fn set_profile_picture(
        &mut self,
        conn: &mut Conn,
        storage: &dyn FileStorage,
        filename: &str,
        bytes: &[u8],
    ) -> Result<()> {
        let location = storage.store("profile_pictures", filename, bytes)?;

        diesel::update(&*self)
            .set(users::profile_picture.eq(Some(&location)))
            .execute(conn)?;

        self.profile_picture = Some(location);
        Ok(())
    }

    /// Delete the user along with their bills, payment methods, budgets,
    /// preferences and notifications
    pub fn delete(&mut self, conn: &mut Conn) -> Result<()> {
        diesel::delete(&*self).execute(conn)?;

        Ok(())
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn validate_email(email: &str) -> Result<()> {
    let invalid = || Error::Invalid(format!("\"{email}\" is not a valid email address"));

    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty()
        || domain.contains('@')
        || email.chars().any(char::is_whitespace)
        || !domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
    {
        return Err(invalid());
    }
    Ok(())
}

pub struct NewUser<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub first_name: &'a str,
    pub currency: Currency,
}

impl<'a> NewUser<'a> {
    pub fn new(username: &'a str, email: &'a str) -> Self {
        Self {
            username,
            email,
            first_name: "",
            currency: Currency::EUR,
        }
    }

    pub fn save(self, conn: &mut Conn) -> Result<User> {
        let username = self.username.trim();
        if username.is_empty() {
            return Err(Error::Invalid("A user needs a username".to_owned()));
        }
        let email = normalize_email(self.email);
        validate_email(&email)?;

        if User::find_by_username(conn, username).optional()?.is_some() {
            return Err(Error::NonUnique(format!(
                "Username \"{username}\" is already taken"
            )));
        }
        if User::find_by_email(conn, &email).optional()?.is_some() {
            return Err(Error::NonUnique(
                "This email is already registered".to_owned(),
            ));
        }

        Ok(diesel::insert_into(users::table)
            .values(InsertableUser {
                username,
                email: &email,
                first_name: self.first_name.trim(),
                currency: self.currency,
                created_at: Utc::now(),
            })
            .returning(User::as_returning())
            .get_result(conn)?)
    }
}

#[derive(Insertable)]
#[diesel(table_name = users)]
struct InsertableUser<'a> {
    username: &'a str,
    email: &'a str,
    first_name: &'a str,
    #[diesel(serialize_as = crate::db::Currency)]
    currency: Currency,
    created_at: DateTime<Utc>,
}

#[derive(Default, Clone)]
pub struct ChangeUser<'a> {
    pub email: Option<&'a str>,
    pub first_name: Option<&'a str>,
    pub currency: Option<Currency>,
}

impl ChangeUser<'_> {
    pub fn save(self, conn: &mut Conn, user: &User) -> Result<()> {
        let email = match self.email {
            Some(email) => {
                let email = normalize_email(email);
                validate_email(&email)?;
                if User::find_by_email(conn, &email)
                    .optional()?
                    .is_some_and(|other| other.id != user.id)
                {
                    return Err(Error::NonUnique(
                        "This email is already registered".to_owned(),
                    ));
                }
                Some(email)
            }
            None => None,
        };

        diesel::update(user)
            .set(UserChangeset {
                email: email.as_deref(),
                first_name: self.first_name.map(str::trim),
                currency: self.currency,
            })
            .execute(conn)
            .map_err(Error::from)
            .optional_empty_changeset()?;
        Ok(())
    }

    pub fn apply(self, conn: &mut Conn, user: &mut User) -> Result<()> {
        self.clone().save(conn, user)?;

        if let Some(value) = self.email {
            user.email = normalize_email(value);
        }
        if let Some(value) = self.first_name {
            user.first_name = value.trim().to_owned();
        }
        if let Some(value) = self.currency {
            user.currency = value;
        }

        Ok(())
    }
}

#[derive(AsChangeset)]
#[diesel(table_name = users)]
struct UserChangeset<'a> {
    email: Option<&'a str>,
    first_name: Option<&'a str>,
    #[diesel(serialize_as = crate::db::Currency)]
    currency: Option<Currency>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::prelude::{assert_eq, Result, *};

    #[test]
    fn create_then_find() -> Result<()> {
        let conn = &mut test::db()?;

        let user = NewUser {
            first_name: "Alice",
            ..NewUser::new("alice", " Alice@Example.COM ")
        }
        .save(conn)?;

        assert_eq!("alice@example.com", user.email);
        assert_eq!(Currency::EUR, user.currency);
        assert_eq!(user.id, User::find_by_username(conn, "alice")?.id);
        assert_eq!(user.id, User::find_by_email(conn, "ALICE@example.com")?.id);
        assert_eq!("alice", User::find(conn, user.id)?.username);
        assert!(matches!(
            User::find_by_username(conn, "bob"),
            Err(Error::ModelNotFoundBy("User", "username"))
        ));

        Ok(())
    }

    #[test]
    fn display_name() -> Result<()> {
        let conn = &mut test::db()?;

        let alice = test::user!(conn, "alice", first_name: "Alice");
        let bob = test::user!(conn, "bob");
        assert_eq!("Alice", alice.display_name());
        assert_eq!("bob", bob.display_name());

        Ok(())
    }

    #[test]
    fn unique_email_and_username() -> Result<()> {
        let conn = &mut test::db()?;
        test::user!(conn, "alice");

        let result = NewUser::new("alice2", "ALICE@example.com").save(conn);
        assert!(matches!(result, Err(Error::NonUnique(_))));

        let result = NewUser::new("alice", "other@example.com").save(conn);
        assert!(matches!(result, Err(Error::NonUnique(_))));

        Ok(())
    }

    #[test]
    fn invalid_email() -> Result<()> {
        let conn = &mut test::db()?;

        for email in ["", "alice", "@example.com", "alice@", "alice@example", "a b@c.d"] {
            let result = NewUser::new("alice", email).save(conn);
            assert!(matches!(result, Err(Error::Invalid(_))), "{email}");
        }

        Ok(())
    }

    #[test]
    fn change() -> Result<()> {
        let conn = &mut test::db()?;
        let mut alice = test::user!(conn, "alice");
        let bob = test::user!(conn, "bob");

        ChangeUser {
            email: Some("Alice@Home.org"),
            first_name: Some("Alice"),
            currency: Some(Currency::USD),
        }
        .apply(conn, &mut alice)?;
        assert_eq!("alice@home.org", alice.email);

        let reloaded = User::find(conn, alice.id)?;
        assert_eq!("alice@home.org", reloaded.email);
        assert_eq!("Alice", reloaded.first_name);
        assert_eq!(Currency::USD, reloaded.currency);

        let result = ChangeUser {
            email: Some(&bob.email),
            ..Default::default()
        }
        .save(conn, &alice);
        assert!(matches!(result, Err(Error::NonUnique(_))));

        Ok(())
    }

    #[test]
    fn delete_cascades() -> Result<()> {
        let conn = &mut test::db()?;
        let mut alice = test::user!(conn, "alice");
        let bob = test::user!(conn, "bob");
        let mut bill = test::bill!(conn, &alice, "Rent");
        let mut method = test::payment_method!(conn, &alice, "Visa");
        let mut other = test::bill!(conn, &bob, "Rent");

        alice.delete(conn)?;

        assert!(bill.reload(conn).is_err());
        assert!(method.reload(conn).is_err());
        assert!(other.reload(conn).is_ok());

        Ok(())
    }
}
