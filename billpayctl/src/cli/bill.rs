use std::path::PathBuf;

use billpay::{
    bill::{Category, Frequency, Status},
    Decimal,
};
use chrono::NaiveDate;
use clap::{Args, Subcommand};

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List bills
    List(List),
    /// Add a new bill
    Add(Add),
    /// Show details about a bill
    Show(Show),
    /// Update a bill
    Update(Update),
    /// Mark a bill as paid
    Pay(Pay),
    /// Delete a bill
    Delete(Delete),
    /// Attach a receipt image to a bill
    Receipt(Receipt),
}

#[derive(Args, Clone, Debug)]
pub struct List {
    /// Show only bills with this status
    #[arg(short, long, help_heading = "Filter bills")]
    pub status: Option<Status>,

    /// Show only bills of this category
    #[arg(short = 'g', long, help_heading = "Filter bills")]
    pub category: Option<Category>,

    /// Show only bills due on or after this date
    #[arg(short, long, value_name = "DATE", help_heading = "Filter bills")]
    pub after: Option<NaiveDate>,

    /// Show only bills due before this date
    #[arg(short, long, value_name = "DATE", help_heading = "Filter bills")]
    pub before: Option<NaiveDate>,

    /// Maximum number of bills to show
    #[arg(short, long, help_heading = "Filter bills")]
    pub count: Option<u32>,
}

#[derive(Args, Clone, Debug)]
pub struct Add {
    /// Name of the bill
    pub name: String,

    /// Amount of the bill, in the currency of the user
    pub amount: Decimal,

    /// Due date, today when omitted
    #[arg(short, long, value_name = "DATE")]
    pub due: Option<NaiveDate>,

    /// Category of the bill
    #[arg(short = 'g', long, default_value_t = Category::Other)]
    pub category: Category,

    /// Free-form notes
    #[arg(short, long)]
    pub notes: Option<String>,

    /// Make the bill recur with this frequency when paid
    ///
    /// Possible values are weekly, monthly and yearly
    #[arg(short, long, value_name = "FREQUENCY")]
    pub recurring: Option<Frequency>,

    /// Name of the payment method used for this bill
    #[arg(short, long, value_name = "NAME")]
    pub payment_method: Option<String>,

    /// Record the bill as already paid
    #[arg(long)]
    pub paid: bool,
}

#[derive(Args, Clone, Debug)]
pub struct Show {
    /// Id of the bill
    pub id: i64,
}

#[derive(Args, Clone, Debug)]
pub struct Update {
    /// Id of the bill
    pub id: i64,

    /// New name
    #[arg(long)]
    pub name: Option<String>,

    /// New amount
    #[arg(long)]
    pub amount: Option<Decimal>,

    /// New due date
    #[arg(long, value_name = "DATE")]
    pub due: Option<NaiveDate>,

    /// New status, without recurrence nor notifications
    #[arg(long)]
    pub status: Option<Status>,

    /// New category
    #[arg(long)]
    pub category: Option<Category>,

    /// New notes
    #[arg(long, group = "notes_args")]
    pub notes: Option<String>,

    /// Remove the notes
    #[arg(long, group = "notes_args")]
    pub no_notes: bool,

    /// Make the bill recur with this frequency
    #[arg(long, value_name = "FREQUENCY", group = "recurring_args")]
    pub recurring: Option<Frequency>,

    /// Stop the bill from recurring
    #[arg(long, group = "recurring_args")]
    pub no_recurring: bool,

    /// Name of the new payment method
    #[arg(long, value_name = "NAME", group = "payment_method_args")]
    pub payment_method: Option<String>,

    /// Remove the payment method
    #[arg(long, group = "payment_method_args")]
    pub no_payment_method: bool,
}

#[derive(Args, Clone, Debug)]
pub struct Pay {
    /// Id of the bill
    pub id: i64,

    /// Name of the payment method used
    #[arg(short, long, value_name = "NAME")]
    pub payment_method: Option<String>,
}

#[derive(Args, Clone, Debug)]
pub struct Delete {
    /// Id of the bill
    pub id: i64,

    /// Confirm deletion
    #[arg(long)]
    pub confirm: bool,
}

#[derive(Args, Clone, Debug)]
pub struct Receipt {
    /// Id of the bill
    pub id: i64,

    /// Image file of the receipt
    pub file: PathBuf,
}
