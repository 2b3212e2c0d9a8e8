use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod bill;
pub mod budget;
pub mod notification;
pub mod payment_method;
pub mod remind;
pub mod stats;
pub mod user;

/// Bill tracking and payment reminders
#[derive(Default, Clone, Debug, Parser)]
#[command(version, infer_subcommands = true)]
pub struct Cli {
    #[clap(flatten)]
    pub verbose: clap_verbosity_flag::Verbosity,

    /// Sets a custom config directory
    ///
    /// The default value is $BILLPAY_CONFIG if it is set, or
    /// $XDG_CONFIG_HOME/billpay otherwise
    #[arg(
        short = 'C',
        long,
        value_name = "DIR",
        global = true,
        help_heading = "Global options"
    )]
    pub config: Option<PathBuf>,

    /// Sets a custom data directory
    ///
    /// The default value is $BILLPAY_DATA if it is set, or
    /// $XDG_DATA_HOME/billpay otherwise
    #[arg(
        short = 'D',
        long,
        value_name = "DIR",
        global = true,
        help_heading = "Global options"
    )]
    pub data: Option<PathBuf>,

    /// Sets the user acting in the following command
    ///
    /// A default value can be configured with `user default`
    #[arg(
        short = 'U',
        long,
        value_name = "USERNAME",
        global = true,
        help_heading = "Global options"
    )]
    pub user: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// User related commands
    User {
        #[command(subcommand)]
        command: user::Command,
    },
    /// Bill related commands
    Bill {
        #[command(subcommand)]
        command: bill::Command,
    },
    /// Payment method related commands
    PaymentMethod {
        #[command(subcommand)]
        command: payment_method::Command,
    },
    /// Monthly budgets per category
    Budget {
        #[command(subcommand)]
        command: budget::Command,
    },
    /// Notification related commands
    Notification {
        #[command(subcommand)]
        command: notification::Command,
    },
    /// Overview of the bills, refreshing due alerts first
    Dashboard {},
    /// Spending statistics
    Stats {
        #[command(subcommand)]
        command: stats::Command,
    },
    /// Email reminders about upcoming bills, meant to run daily
    Remind(remind::Remind),
    /// Reset the database
    #[command(hide = true)]
    Reset {
        #[arg(long, required = true)]
        confirm: bool,
    },
}
