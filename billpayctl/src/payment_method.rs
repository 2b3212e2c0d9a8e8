use anyhow::Result;

use billpay::{
    payment_method::{ChangePaymentMethod, NewPaymentMethod},
    prelude::*,
};

use crate::cli::payment_method::*;
use crate::config::Config;

use tabled::builder::Builder as TableBuilder;

struct CommandContext<'a> {
    conn: &'a mut Database,
    user: User,
}

pub fn run(config: &Config, command: &Command) -> Result<()> {
    let conn = &mut config.database()?;
    let user = config.user(conn)?;
    let mut cmd = CommandContext { conn, user };

    match command {
        Command::List(_) => cmd.list(),
        Command::Add(args) => cmd.add(args),
        Command::Update(args) => cmd.update(args),
        Command::Default(args) => cmd.default(args),
        Command::Delete(args) => cmd.delete(args),
    }
}

impl CommandContext<'_> {
    fn list(&mut self) -> Result<()> {
        let mut builder = TableBuilder::new();
        push_record!(builder, "id", "name", "type", "last four", "default");

        for method in PaymentMethod::for_user(self.conn, &self.user)? {
            push_record!(
                builder,
                method.id,
                method.name,
                method.method_type.label(),
                method.last_four,
                method.is_default
            );
        }

        println!("{}", builder.build());
        Ok(())
    }

    fn add(&mut self, args: &Add) -> Result<()> {
        NewPaymentMethod {
            method_type: args.method_type,
            last_four: args.last_four.as_deref(),
            is_default: args.default,
            ..NewPaymentMethod::new(&self.user, &args.name)
        }
        .save(self.conn)?;

        Ok(())
    }

    fn update(&mut self, args: &Update) -> Result<()> {
        let method = PaymentMethod::find_by_name(self.conn, &self.user, &args.name)?;

        ChangePaymentMethod {
            name: args.new_name.as_deref(),
            method_type: args.method_type,
            last_four: if args.no_last_four {
                Some(None)
            } else {
                args.last_four.as_deref().map(Some)
            },
        }
        .save(self.conn, &method)?;

        Ok(())
    }

    fn default(&mut self, args: &Default) -> Result<()> {
        PaymentMethod::find_by_name(self.conn, &self.user, &args.name)?.set_default(self.conn)?;

        Ok(())
    }

    fn delete(&mut self, args: &Delete) -> Result<()> {
        let mut method = PaymentMethod::find_by_name(self.conn, &self.user, &args.name)?;

        if args.confirm && crate::utils::confirm()? {
            method.delete(self.conn)?;
        } else {
            anyhow::bail!("operation requires confirmation");
        }

        Ok(())
    }
}
