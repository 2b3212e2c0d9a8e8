use billpay::{bill::Category, Decimal};
use clap::{Args, Subcommand};

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List budgets with this month's spending
    List(List),
    /// Set the monthly limit of a category
    Set(Set),
    /// Delete the budget of a category
    Delete(Delete),
}

#[derive(Args, Clone, Debug)]
pub struct List {}

#[derive(Args, Clone, Debug)]
pub struct Set {
    /// Category of the budget
    pub category: Category,

    /// Monthly limit, in the currency of the user
    pub monthly_limit: Decimal,
}

#[derive(Args, Clone, Debug)]
pub struct Delete {
    /// Category of the budget
    pub category: Category,
}
