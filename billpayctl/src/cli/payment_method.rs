use billpay::payment_method::MethodType;
use clap::{Args, Subcommand};

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List payment methods, the default one first
    List(List),
    /// Add a new payment method
    Add(Add),
    /// Update a payment method
    Update(Update),
    /// Make a payment method the default one
    Default(Default),
    /// Delete a payment method, its bills are kept
    Delete(Delete),
}

#[derive(Args, Clone, Debug)]
pub struct List {}

#[derive(Args, Clone, Debug)]
pub struct Add {
    /// Name of the payment method
    pub name: String,

    /// Type of the payment method
    ///
    /// Possible values are cash, card, bank_transfer, e_wallet and other
    #[arg(short = 't', long = "type", default_value_t = MethodType::Card)]
    pub method_type: MethodType,

    /// Last four digits of the card or account
    #[arg(short, long, value_name = "DIGITS")]
    pub last_four: Option<String>,

    /// Use it as the default payment method
    #[arg(short, long)]
    pub default: bool,
}

#[derive(Args, Clone, Debug)]
pub struct Update {
    /// Name of the payment method
    pub name: String,

    /// New name
    #[arg(long)]
    pub new_name: Option<String>,

    /// New type
    #[arg(long = "type")]
    pub method_type: Option<MethodType>,

    /// New last four digits
    #[arg(long, value_name = "DIGITS", group = "last_four_args")]
    pub last_four: Option<String>,

    /// Remove the last four digits
    #[arg(long, group = "last_four_args")]
    pub no_last_four: bool,
}

#[derive(Args, Clone, Debug)]
pub struct Default {
    /// Name of the payment method
    pub name: String,
}

#[derive(Args, Clone, Debug)]
pub struct Delete {
    /// Name of the payment method
    pub name: String,

    /// Confirm deletion
    #[arg(long)]
    pub confirm: bool,
}
