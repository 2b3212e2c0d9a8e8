use crate::{essentials::*, result::ParseTypeError};

use std::ops::Range;

use chrono::{DateTime, Datelike, Months, NaiveDate, NaiveTime, Utc};

/// A calendar month, in UTC
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Month {
    pub year: i32,
    pub month: i32,
}

impl Month {
    pub fn calendar(year: i32, month: i32) -> Self {
        Self { year, month }
    }

    /// Month containing `instant`
    pub fn of(instant: DateTime<Utc>) -> Self {
        Self {
            year: instant.year(),
            month: instant.month() as i32,
        }
    }

    pub fn first_day(&self) -> Result<NaiveDate> {
        u32::try_from(self.month)
            .ok()
            .and_then(|month| NaiveDate::from_ymd_opt(self.year, month, 1))
            .ok_or(Error::InvalidMonth(self.year, self.month))
    }

    pub fn as_date_range(&self) -> Result<Range<NaiveDate>> {
        let from = self.first_day()?;
        let to = from + Months::new(1);

        Ok(from..to)
    }

    pub fn as_datetime_range(&self) -> Result<Range<DateTime<Utc>>> {
        let range = self.as_date_range()?;

        Ok(range.start.and_time(NaiveTime::MIN).and_utc()..range.end.and_time(NaiveTime::MIN).and_utc())
    }

    pub fn previous(&self) -> Self {
        if self.month <= 1 {
            Self::calendar(self.year - 1, 12)
        } else {
            Self::calendar(self.year, self.month - 1)
        }
    }

    /// The `count` months ending with this one, oldest first
    pub fn last(&self, count: u32) -> Vec<Self> {
        let mut months = Vec::new();
        let mut month = *self;
        for _ in 0..count {
            months.push(month);
            month = month.previous();
        }
        months.reverse();
        months
    }
}

impl std::fmt::Display for Month {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl std::str::FromStr for Month {
    type Err = ParseTypeError;

    /// Parses `YYYY-MM`
    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        let error = || ParseTypeError("Month", value.to_owned());
        let (year, month) = value.trim().split_once('-').ok_or_else(error)?;
        let year = year.parse::<i32>().map_err(|_| error())?;
        let month = month.parse::<i32>().map_err(|_| error())?;

        if !(1..=12).contains(&month) {
            return Err(error());
        }
        Ok(Self::calendar(year, month))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::prelude::{assert_eq, Result, *};

    #[test]
    fn month_calendar() -> Result<()> {
        let month = Month::calendar(12, -6);
        let result = month.as_date_range();

        assert!(matches!(result, Err(Error::InvalidMonth(12, -6))));
        assert!(Month::calendar(2024, 13).as_date_range().is_err());

        let month = Month::calendar(2024, 2);
        let range = month.as_date_range()?;

        assert_eq!(NaiveDate::from_ymd_opt(2024, 2, 1), Some(range.start));
        assert_eq!(NaiveDate::from_ymd_opt(2024, 3, 1), Some(range.end));

        Ok(())
    }

    #[test]
    fn month_of_instant() -> Result<()> {
        let month = Month::of(test::at(2024, 12, 31, 23, 59));
        assert_eq!(Month::calendar(2024, 12), month);
        assert_eq!("2024-12", month.to_string());

        let range = month.as_datetime_range()?;
        assert_eq!(test::at(2024, 12, 1, 0, 0), range.start);
        assert_eq!(test::at(2025, 1, 1, 0, 0), range.end);

        Ok(())
    }

    #[test]
    fn last_months() {
        assert_eq!(
            vec![
                Month::calendar(2023, 11),
                Month::calendar(2023, 12),
                Month::calendar(2024, 1),
            ],
            Month::calendar(2024, 1).last(3)
        );
        assert!(Month::calendar(2024, 1).last(0).is_empty());
    }

    #[test]
    fn parse() {
        assert_eq!(Ok(Month::calendar(2024, 2)), "2024-02".parse());
        assert_eq!(Ok(Month::calendar(2024, 11)), " 2024-11 ".parse());
        assert!("2024-13".parse::<Month>().is_err());
        assert!("2024".parse::<Month>().is_err());
        assert!("feb-2024".parse::<Month>().is_err());
    }
}
