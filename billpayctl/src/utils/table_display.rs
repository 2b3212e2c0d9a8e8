use billpay::prelude::*;

use chrono::{DateTime, Utc};

macro_rules! push_record {
    ( $builder:ident, $($col:expr),* $(,)? ) => {
        {
            use crate::utils::table_display::ColumnDisplay;
            $builder.push_record([$(ColumnDisplay::to_column(&$col),)*])
        }
    }
}

pub trait ColumnDisplay {
    fn to_column(&self) -> String;
}

impl<T: ColumnDisplay> ColumnDisplay for Option<T> {
    fn to_column(&self) -> String {
        self.as_ref().map(T::to_column).unwrap_or_default()
    }
}

impl ColumnDisplay for String {
    fn to_column(&self) -> String {
        self.clone()
    }
}

impl ColumnDisplay for &str {
    fn to_column(&self) -> String {
        self.to_string()
    }
}

impl ColumnDisplay for i64 {
    fn to_column(&self) -> String {
        self.to_string()
    }
}

impl ColumnDisplay for usize {
    fn to_column(&self) -> String {
        self.to_string()
    }
}

impl ColumnDisplay for bool {
    fn to_column(&self) -> String {
        let value = if *self { "yes" } else { "no" };
        value.to_owned()
    }
}

impl ColumnDisplay for Decimal {
    fn to_column(&self) -> String {
        format!("{:.2}", self)
    }
}

impl ColumnDisplay for Amount {
    fn to_column(&self) -> String {
        format!("{} {:.2}", self.1.code(), self.0)
    }
}

impl ColumnDisplay for DateTime<Utc> {
    fn to_column(&self) -> String {
        self.date_naive().to_string()
    }
}

impl ColumnDisplay for BillCategory {
    fn to_column(&self) -> String {
        self.label().to_owned()
    }
}
