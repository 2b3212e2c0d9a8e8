use clap::Args;

#[derive(Args, Clone, Debug)]
pub struct Remind {
    /// Show which reminders would be sent, without sending or recording
    /// anything
    #[arg(long)]
    pub dry_run: bool,
}
