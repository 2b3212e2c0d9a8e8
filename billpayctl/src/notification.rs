use anyhow::Result;
use std::borrow::Cow;

use billpay::{notification::QueryNotification, prelude::*};

use crate::cli::notification::*;
use crate::config::Config;

use tabled::{Table, Tabled};

struct CommandContext<'a> {
    conn: &'a mut Database,
    user: User,
}

#[derive(derive_more::From)]
pub struct NotificationToDisplay(Notification);

impl Tabled for NotificationToDisplay {
    const LENGTH: usize = 6;

    fn fields(&self) -> Vec<Cow<'_, str>> {
        let notification = &self.0;
        vec![
            notification.id.to_string().into(),
            if notification.is_read { "" } else { "*" }.into(),
            notification.notification_type.to_string().into(),
            notification.created_at.date_naive().to_string().into(),
            notification.title.as_str().into(),
            notification.message.as_str().into(),
        ]
    }

    fn headers() -> Vec<Cow<'static, str>> {
        vec![
            "id".into(),
            "new".into(),
            "type".into(),
            "date".into(),
            "title".into(),
            "message".into(),
        ]
    }
}

pub fn run(config: &Config, command: &Command) -> Result<()> {
    let conn = &mut config.database()?;
    let user = config.user(conn)?;
    let mut cmd = CommandContext { conn, user };

    match command {
        Command::List(args) => cmd.list(args),
        Command::Read(args) => cmd.read(args),
        Command::Delete(args) => cmd.delete(args),
    }
}

impl CommandContext<'_> {
    fn list(&mut self, args: &List) -> Result<()> {
        let notifications = QueryNotification {
            user: Some(&self.user),
            unread_only: args.unread,
            notification_type: args.notification_type,
            count: args.count.map(i64::from),
            ..Default::default()
        }
        .run(self.conn)?
        .into_iter()
        .map(NotificationToDisplay::from);

        println!("{}", Table::new(notifications));
        Ok(())
    }

    fn read(&mut self, args: &Read) -> Result<()> {
        if args.all {
            let count = Notification::mark_all_read(self.conn, &self.user)?;
            println!("Marked {} notification(s) as read", count);
        } else if let Some(id) = args.id {
            Notification::find_for(self.conn, &self.user, id)?.mark_read(self.conn)?;
        }

        Ok(())
    }

    fn delete(&mut self, args: &Delete) -> Result<()> {
        Notification::find_for(self.conn, &self.user, args.id)?.delete(self.conn)?;

        Ok(())
    }
}
