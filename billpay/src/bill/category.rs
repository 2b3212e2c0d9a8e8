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

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash, FromSqlRow, AsExpression)]
#[diesel(sql_type = Text)]
pub enum Category {
    Utilities,
    Rent,
    Electricity,
    Water,
    Internet,
    Phone,
    Insurance,
    Subscription,
    Loan,
    CreditCard,
    Transportation,
    Healthcare,
    Education,
    #[default]
    Other,
}

use Category::*;

impl Category {
    pub const ALL: [Category; 14] = [
        Utilities,
        Rent,
        Electricity,
        Water,
        Internet,
        Phone,
        Insurance,
        Subscription,
        Loan,
        CreditCard,
        Transportation,
        Healthcare,
        Education,
        Other,
    ];

    /// Value stored in the database and accepted on the command line
    pub fn code(&self) -> &'static str {
        match self {
            Utilities => "utilities",
            Rent => "rent",
            Electricity => "electricity",
            Water => "water",
            Internet => "internet",
            Phone => "phone",
            Insurance => "insurance",
            Subscription => "subscription",
            Loan => "loan",
            CreditCard => "credit_card",
            Transportation => "transportation",
            Healthcare => "healthcare",
            Education => "education",
            Other => "other",
        }
    }

    /// Human readable name
    pub fn label(&self) -> &'static str {
        match self {
            Utilities => "Utilities",
            Rent => "Rent",
            Electricity => "Electricity",
            Water => "Water",
            Internet => "Internet",
            Phone => "Phone",
            Insurance => "Insurance",
            Subscription => "Subscription",
            Loan => "Loan",
            CreditCard => "Credit Card",
            Transportation => "Transportation",
            Healthcare => "Healthcare",
            Education => "Education",
            Other => "Other",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        f.write_str(self.code())
    }
}

impl FromStr for Category {
    type Err = ParseTypeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_lowercase().replace([' ', '-'], "_");

        Category::ALL
            .into_iter()
            .find(|category| category.code() == normalized)
            .ok_or_else(|| ParseTypeError("Category", value.to_string()))
    }
}

impl ToSql<Text, Sqlite> for Category {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Sqlite>) -> serialize::Result {
        <str as ToSql<Text, Sqlite>>::to_sql(self.code(), out)
    }
}

impl FromSql<Text, Sqlite> for Category {
    fn from_sql(bytes: <Sqlite as Backend>::RawValue<'_>) -> deserialize::Result<Self> {
        Ok(<String as FromSql<Text, Sqlite>>::from_sql(bytes)?.parse()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse() {
        assert_eq!(Ok(CreditCard), "credit card".parse());
        assert_eq!(Ok(CreditCard), "Credit-Card".parse());
        assert_eq!(Ok(Rent), "RENT".parse());
        assert!("groceries".parse::<Category>().is_err());

        for category in Category::ALL {
            assert_eq!(Ok(category), category.to_string().parse());
        }
    }
}
