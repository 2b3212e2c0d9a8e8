use crate::{essentials::*, schema::payment_methods, user::User};

use diesel::prelude::*;

pub mod method_type;
pub use method_type::MethodType;

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = payment_methods)]
#[diesel(belongs_to(User, foreign_key = user_id))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PaymentMethod {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub method_type: MethodType,
    pub last_four: Option<String>,
    pub is_default: bool,
}

impl PaymentMethod {
    pub fn find(conn: &mut Conn, id: i64) -> Result<Self> {
        payment_methods::table
            .find(id)
            .select(PaymentMethod::as_select())
            .first(conn)
            .map_err(|e| Error::from_diesel_error(e, "PaymentMethod", None))
    }

    /// Find a payment method, refusing those of other users
    pub fn find_for(conn: &mut Conn, user: &User, id: i64) -> Result<Self> {
        let method = Self::find(conn, id)?;
        if method.user_id != user.id {
            return Err(Error::Forbidden("Payment method belongs to another user"));
        }
        Ok(method)
    }

    pub fn find_by_name(conn: &mut Conn, user: &User, name: &str) -> Result<Self> {
        payment_methods::table
            .filter(payment_methods::user_id.eq(user.id))
            .filter(payment_methods::name.eq(name))
            .select(PaymentMethod::as_select())
            .first(conn)
            .map_err(|e| Error::from_diesel_error(e, "PaymentMethod", Some("name")))
    }

    /// Payment methods of a user, default first
    pub fn for_user(conn: &mut Conn, user: &User) -> Result<Vec<Self>> {
        Ok(payment_methods::table
            .filter(payment_methods::user_id.eq(user.id))
            .order((payment_methods::is_default.desc(), payment_methods::name.asc()))
            .select(PaymentMethod::as_select())
            .load(conn)?)
    }

    pub fn default_for(conn: &mut Conn, user: &User) -> Result<Option<Self>> {
        payment_methods::table
            .filter(payment_methods::user_id.eq(user.id))
            .filter(payment_methods::is_default.eq(true))
            .select(PaymentMethod::as_select())
            .first(conn)
            .map_err(|e| Error::from_diesel_error(e, "PaymentMethod", None))
            .optional()
    }

    /// Make this the only default payment method of its owner
    pub fn set_default(&mut self, conn: &mut Conn) -> Result<()> {
        conn.immediate_transaction::<_, Error, _>(|conn| make_default(conn, self.user_id, self.id))?;
        self.is_default = true;
        Ok(())
    }

    /// Delete the payment method, bills using it keep no payment method
    pub fn delete(&mut self, conn: &mut Conn) -> Result<()> {
        diesel::delete(&*self).execute(conn)?;

        Ok(())
    }
}

/// Clear the other defaults first, the unique index is checked row by row
fn make_default(conn: &mut Conn, user_id: i64, id: i64) -> Result<()> {
    diesel::update(payment_methods::table)
        .filter(payment_methods::user_id.eq(user_id))
        .filter(payment_methods::id.ne(id))
        .filter(payment_methods::is_default.eq(true))
        .set(payment_methods::is_default.eq(false))
        .execute(conn)?;

    let updated = diesel::update(payment_methods::table)
        .filter(payment_methods::user_id.eq(user_id))
        .filter(payment_methods::id.eq(id))
        .set(payment_methods::is_default.eq(true))
        .execute(conn)?;
    if updated == 0 {
        return Err(Error::ModelNotFound("PaymentMethod"));
    }
    Ok(())
}

fn validate_last_four(last_four: &str) -> Result<()> {
    if last_four.len() != 4 || !last_four.chars().all(|c| c.is_ascii_digit()) {
        return Err(Error::Invalid(format!(
            "Last four digits must be exactly 4 digits, got \"{last_four}\""
        )));
    }
    Ok(())
}

pub struct NewPaymentMethod<'a> {
    pub user: &'a User,
    pub name: &'a str,
    pub method_type: MethodType,
    pub last_four: Option<&'a str>,
    pub is_default: bool,
}

impl<'a> NewPaymentMethod<'a> {
    pub fn new(user: &'a User, name: &'a str) -> Self {
        Self {
            user,
            name,
            method_type: MethodType::default(),
            last_four: None,
            is_default: false,
        }
    }

    pub fn save(self, conn: &mut Conn) -> Result<PaymentMethod> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(Error::Invalid("A payment method needs a name".to_owned()));
        }
        if let Some(last_four) = self.last_four {
            validate_last_four(last_four)?;
        }

        conn.immediate_transaction::<_, Error, _>(|conn| {
            let method = diesel::insert_into(payment_methods::table)
                .values(InsertablePaymentMethod {
                    user_id: self.user.id,
                    name,
                    method_type: self.method_type,
                    last_four: self.last_four,
                    is_default: false,
                })
                .returning(PaymentMethod::as_returning())
                .get_result::<PaymentMethod>(conn)?;

            if self.is_default {
                make_default(conn, method.user_id, method.id)?;
                return PaymentMethod::find(conn, method.id);
            }
            Ok(method)
        })
    }
}

#[derive(Insertable)]
#[diesel(table_name = payment_methods)]
struct InsertablePaymentMethod<'a> {
    user_id: i64,
    name: &'a str,
    method_type: MethodType,
    last_four: Option<&'a str>,
    is_default: bool,
}

#[derive(Default, Clone, AsChangeset)]
#[diesel(table_name = payment_methods)]
pub struct ChangePaymentMethod<'a> {
    pub name: Option<&'a str>,
    pub method_type: Option<MethodType>,
    pub last_four: Option<Option<&'a str>>,
}

impl ChangePaymentMethod<'_> {
    pub fn save(self, conn: &mut Conn, method: &PaymentMethod) -> Result<()> {
        if let Some(name) = self.name {
            if name.trim().is_empty() {
                return Err(Error::Invalid("A payment method needs a name".to_owned()));
            }
        }
        if let Some(Some(last_four)) = self.last_four {
            validate_last_four(last_four)?;
        }

        diesel::update(method)
            .set(self)
            .execute(conn)
            .map_err(Error::from)
            .optional_empty_changeset()?;
        Ok(())
    }
}
