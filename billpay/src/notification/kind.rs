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
pub enum NotificationType {
    Overdue,
    DueSoon,
    Payment,
    Reminder,
    Budget,
    #[default]
    Info,
}

impl NotificationType {
    /// Alerts about the due state of a bill, at most one unread per bill
    pub fn is_alert(&self) -> bool {
        matches!(self, NotificationType::Overdue | NotificationType::DueSoon)
    }
}

impl Display for NotificationType {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        match self {
            NotificationType::Overdue => f.write_str("overdue"),
            NotificationType::DueSoon => f.write_str("due_soon"),
            NotificationType::Payment => f.write_str("payment"),
            NotificationType::Reminder => f.write_str("reminder"),
            NotificationType::Budget => f.write_str("budget"),
            NotificationType::Info => f.write_str("info"),
        }
    }
}

impl FromStr for NotificationType {
    type Err = ParseTypeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().replace([' ', '-'], "_").as_str() {
            "overdue" => Ok(NotificationType::Overdue),
            "due_soon" => Ok(NotificationType::DueSoon),
            "payment" => Ok(NotificationType::Payment),
            "reminder" => Ok(NotificationType::Reminder),
            "budget" => Ok(NotificationType::Budget),
            "info" => Ok(NotificationType::Info),
            _ => Err(ParseTypeError("NotificationType", value.to_string())),
        }
    }
}

impl ToSql<Text, Sqlite> for NotificationType {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Sqlite>) -> serialize::Result {
        out.set_value(self.to_string());
        Ok(IsNull::No)
    }
}

impl FromSql<Text, Sqlite> for NotificationType {
    fn from_sql(bytes: <Sqlite as Backend>::RawValue<'_>) -> deserialize::Result<Self> {
        Ok(<String as FromSql<Text, Sqlite>>::from_sql(bytes)?.parse()?)
    }
}
