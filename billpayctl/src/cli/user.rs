use std::path::PathBuf;

use billpay::Currency;
use clap::{Args, Subcommand};

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List registered users
    List(List),
    /// Create a new user
    Create(Create),
    /// Show details about the current user
    Show(Show),
    /// Update the current user
    Update(Update),
    /// Delete the current user and everything they own
    Delete(Delete),
    /// Check or set the default user
    Default(Default),
    /// Upload a profile picture for the current user
    Picture(Picture),
    /// Show or change the reminder and display preferences
    Preferences(Preferences),
}

#[derive(Args, Clone, Debug)]
pub struct List {}

#[derive(Args, Clone, Debug)]
pub struct Create {
    /// Unique username of the new user
    pub username: String,

    /// Unique email address, where reminders are sent
    pub email: String,

    /// First name, used to greet the user
    #[arg(long)]
    pub first_name: Option<String>,

    /// Currency of the bills of the user, as an ISO 4217 code
    #[arg(long, default_value = "EUR", value_parser = crate::utils::parse_currency)]
    pub currency: Currency,
}

#[derive(Args, Clone, Debug)]
pub struct Show {}

#[derive(Args, Clone, Debug)]
pub struct Update {
    /// New email address
    #[arg(long)]
    pub email: Option<String>,

    /// New first name
    #[arg(long)]
    pub first_name: Option<String>,

    /// New currency, as an ISO 4217 code
    #[arg(long, value_parser = crate::utils::parse_currency)]
    pub currency: Option<Currency>,
}

#[derive(Args, Clone, Debug)]
pub struct Delete {
    /// Confirm deletion
    #[arg(long)]
    pub confirm: bool,
}

#[derive(Args, Clone, Debug)]
pub struct Default {
    /// Reset the default user
    #[arg(short, long)]
    pub reset: bool,
}

#[derive(Args, Clone, Debug)]
pub struct Picture {
    /// Image file to upload
    pub file: PathBuf,
}

#[derive(Args, Clone, Debug)]
pub struct Preferences {
    /// Enable or disable reminder emails
    #[arg(long, value_name = "BOOL")]
    pub email_reminders: Option<bool>,

    /// Number of days before the due date to start reminding
    #[arg(long, value_name = "DAYS")]
    pub remind_days_before: Option<i32>,

    /// Enable or disable the daily digest
    #[arg(long, value_name = "BOOL")]
    pub daily_digest: Option<bool>,

    /// Enable or disable dark mode
    #[arg(long, value_name = "BOOL")]
    pub dark_mode: Option<bool>,
}
