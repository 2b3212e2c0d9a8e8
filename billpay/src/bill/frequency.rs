use std::fmt::{Display, Error, Formatter};
use std::str::FromStr;

use crate::result::ParseTypeError;

use diesel::{
    backend::Backend,
    deserialize::{self, FromSql, FromSqlRow},
    expression::AsExpression,
    serialize::{self, IsNull, Output, ToSql},
    sql_types::Text,
    sqlite::Sqlite,
};

/// How often a recurring bill comes back
///
/// Values written by other tools are kept as `Other` and never recur.
#[derive(Default, Debug, Clone, PartialEq, Eq, FromSqlRow, AsExpression)]
#[diesel(sql_type = Text)]
pub enum Frequency {
    #[default]
    None,
    Weekly,
    Monthly,
    Yearly,
    Other(String),
}

impl Frequency {
    pub fn is_none(&self) -> bool {
        self == &Frequency::None
    }

    fn from_stored(value: String) -> Self {
        value.parse().unwrap_or(Frequency::Other(value))
    }
}

impl Display for Frequency {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        match self {
            Frequency::None => f.write_str("none"),
            Frequency::Weekly => f.write_str("weekly"),
            Frequency::Monthly => f.write_str("monthly"),
            Frequency::Yearly => f.write_str("yearly"),
            Frequency::Other(value) => f.write_str(value),
        }
    }
}

impl FromStr for Frequency {
    type Err = ParseTypeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "none" => Ok(Frequency::None),
            "weekly" => Ok(Frequency::Weekly),
            "monthly" => Ok(Frequency::Monthly),
            "yearly" => Ok(Frequency::Yearly),
            _ => Err(ParseTypeError("Frequency", value.to_string())),
        }
    }
}

impl ToSql<Text, Sqlite> for Frequency {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Sqlite>) -> serialize::Result {
        out.set_value(self.to_string());
        Ok(IsNull::No)
    }
}

impl FromSql<Text, Sqlite> for Frequency {
    fn from_sql(bytes: <Sqlite as Backend>::RawValue<'_>) -> deserialize::Result<Self> {
        Ok(Self::from_stored(<String as FromSql<Text, Sqlite>>::from_sql(bytes)?))
    }
}
