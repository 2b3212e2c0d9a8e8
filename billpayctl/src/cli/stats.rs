use billpay::date::Month;
use clap::{Args, Subcommand};

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Paid bills per category over a month
    Categories(Categories),
    /// Paid amount of each of the last months
    Monthly(Monthly),
}

#[derive(Args, Clone, Debug)]
pub struct Categories {
    /// Month to consider, as YYYY-MM, the current one when omitted
    #[arg(short, long)]
    pub month: Option<Month>,
}

#[derive(Args, Clone, Debug)]
pub struct Monthly {
    /// Number of months to show, ending with the current one
    #[arg(short = 'n', long, default_value_t = 6)]
    pub months: u32,
}
