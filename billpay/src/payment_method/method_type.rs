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

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, FromSqlRow, AsExpression)]
#[diesel(sql_type = Text)]
pub enum MethodType {
    Cash,
    #[default]
    Card,
    BankTransfer,
    EWallet,
    Other,
}

impl MethodType {
    pub fn label(&self) -> &'static str {
        match self {
            MethodType::Cash => "Cash",
            MethodType::Card => "Credit/Debit Card",
            MethodType::BankTransfer => "Bank Transfer",
            MethodType::EWallet => "E-Wallet",
            MethodType::Other => "Other",
        }
    }
}

impl Display for MethodType {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        match self {
            MethodType::Cash => f.write_str("cash"),
            MethodType::Card => f.write_str("card"),
            MethodType::BankTransfer => f.write_str("bank_transfer"),
            MethodType::EWallet => f.write_str("e_wallet"),
            MethodType::Other => f.write_str("other"),
        }
    }
}

impl FromStr for MethodType {
    type Err = ParseTypeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().replace([' ', '-'], "_").as_str() {
            "cash" => Ok(MethodType::Cash),
            "card" => Ok(MethodType::Card),
            "bank_transfer" => Ok(MethodType::BankTransfer),
            "e_wallet" | "ewallet" => Ok(MethodType::EWallet),
            "other" => Ok(MethodType::Other),
            _ => Err(ParseTypeError("MethodType", value.to_string())),
        }
    }
}

impl ToSql<Text, Sqlite> for MethodType {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Sqlite>) -> serialize::Result {
        out.set_value(self.to_string());
        Ok(IsNull::No)
    }
}

impl FromSql<Text, Sqlite> for MethodType {
    fn from_sql(bytes: <Sqlite as Backend>::RawValue<'_>) -> deserialize::Result<Self> {
        Ok(<String as FromSql<Text, Sqlite>>::from_sql(bytes)?.parse()?)
    }
}
