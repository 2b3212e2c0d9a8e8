use std::path::Path;

use oxydized_money::CurrencyError;

use diesel::{
    backend::Backend,
    connection::SimpleConnection,
    deserialize::{self, FromSql, FromSqlRow},
    expression::AsExpression,
    prelude::*,
    serialize::{self, IsNull, Output, ToSql},
    sql_types::{BigInt, Text},
    sqlite::Sqlite,
};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

use crate::{Conn, Result};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Number of fraction digits kept for amounts
pub const SCALE: u32 = 2;

define_sql_function! {
    /// Like sum, but returns 0 instead of NULL
    ///
    /// Additionally, the type constraint makes sum (and total) return an integer instead of a
    /// double
    #[aggregate]
    #[sql_name = "TOTAL"]
    fn total(x: BigInt) -> BigInt;
}

pub trait DatabaseTrait: Sized {
    fn open<P: AsRef<Path>>(path: P) -> Result<Self>;
    fn memory() -> Result<Self>;
    fn setup(&mut self) -> Result<()>;
}

impl DatabaseTrait for Conn {
    fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let url = path.as_ref().to_string_lossy();
        let mut conn = Conn::establish(&url)?;
        configure(&mut conn)?;
        Ok(conn)
    }

    fn memory() -> Result<Self> {
        let mut conn = Conn::establish(":memory:")?;
        configure(&mut conn)?;
        Ok(conn)
    }

    /// Bring the schema up to date
    fn setup(&mut self) -> Result<()> {
        for version in self.run_pending_migrations(MIGRATIONS)? {
            log::debug!("Applied migration {}", version);
        }
        Ok(())
    }
}

fn configure(conn: &mut Conn) -> Result<()> {
    // Cascades and SET NULL only apply with foreign keys enabled, per connection
    conn.batch_execute(
        "PRAGMA foreign_keys = ON;
        PRAGMA busy_timeout = 5000;",
    )?;
    Ok(())
}

#[derive(Copy, Clone, Debug, derive_more::From, derive_more::Into, FromSqlRow, AsExpression)]
#[diesel(sql_type = BigInt)]
pub struct Decimal(pub oxydized_money::Decimal);

impl ToSql<BigInt, Sqlite> for Decimal {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Sqlite>) -> serialize::Result {
        let mut value = self.0;
        value.rescale(SCALE);

        match TryInto::<i64>::try_into(value.mantissa()) {
            Ok(value) => {
                out.set_value(value);
                Ok(IsNull::No)
            }
            Err(e) => Err(Box::new(e)),
        }
    }
}

impl FromSql<BigInt, Sqlite> for Decimal {
    fn from_sql(bytes: <Sqlite as Backend>::RawValue<'_>) -> deserialize::Result<Self> {
        Ok(oxydized_money::Decimal::new(i64::from_sql(bytes)?, SCALE).into())
    }
}

#[derive(Copy, Clone, Debug, derive_more::From, derive_more::Into, FromSqlRow, AsExpression)]
#[diesel(sql_type = Text)]
pub struct Currency(pub oxydized_money::Currency);

impl ToSql<Text, Sqlite> for Currency {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Sqlite>) -> serialize::Result {
        <str as ToSql<Text, Sqlite>>::to_sql(self.0.code(), out)
    }
}

impl FromSql<Text, Sqlite> for Currency {
    fn from_sql(bytes: <Sqlite as Backend>::RawValue<'_>) -> deserialize::Result<Self> {
        match oxydized_money::Currency::from_code(
            <String as FromSql<Text, Sqlite>>::from_sql(bytes)?.as_str(),
        ) {
            Some(cur) => Ok(Currency(cur)),
            None => Err(Box::new(CurrencyError::Unknown)),
        }
    }
}
