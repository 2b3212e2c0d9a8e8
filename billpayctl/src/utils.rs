#[macro_use]
pub mod table_display;

use anyhow::Result;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use billpay::Currency;

/// Bills are due at the start of the day, in UTC
pub fn naive_date_to_utc(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

pub fn parse_currency(code: &str) -> Result<Currency, String> {
    Currency::from_code(&code.trim().to_uppercase())
        .ok_or_else(|| format!("unknown currency code: {code}"))
}

pub fn confirm() -> Result<bool> {
    println!("Do you really want to do that?");

    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;

    Ok(input.trim() == "yes")
}

pub fn read_file(path: &std::path::Path) -> Result<(String, Vec<u8>)> {
    use anyhow::Context;

    let bytes =
        std::fs::read(path).with_context(|| format!("Reading {}", path.display()))?;
    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .context("File has no usable name")?
        .to_owned();

    Ok((filename, bytes))
}
