use billpay::notification::NotificationType;
use clap::{Args, Subcommand};

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List notifications, newest first
    List(List),
    /// Mark notifications as read
    Read(Read),
    /// Delete a notification
    Delete(Delete),
}

#[derive(Args, Clone, Debug)]
pub struct List {
    /// Show only unread notifications
    #[arg(short, long)]
    pub unread: bool,

    /// Show only notifications of this type
    #[arg(short = 't', long = "type")]
    pub notification_type: Option<NotificationType>,

    /// Maximum number of notifications to show
    #[arg(short, long)]
    pub count: Option<u32>,
}

#[derive(Args, Clone, Debug)]
#[group(id = "read_args", required = true, multiple = false)]
pub struct Read {
    /// Id of the notification
    pub id: Option<i64>,

    /// Mark every notification as read
    #[arg(long)]
    pub all: bool,
}

#[derive(Args, Clone, Debug)]
pub struct Delete {
    /// Id of the notification
    pub id: i64,
}
