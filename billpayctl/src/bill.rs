use anyhow::Result;
use std::borrow::Cow;

use chrono::Utc;

use billpay::{
    bill::{ChangeBill, NewBill, PayBill, QueryBill},
    notification::generate::DATE_FORMAT,
    payment_method::PaymentMethod,
    prelude::*,
};

use crate::cli::bill::*;
use crate::config::Config;
use crate::utils::naive_date_to_utc;

use tabled::{Table, Tabled};

struct CommandContext<'a> {
    config: &'a Config,
    conn: &'a mut Database,
    user: User,
}

pub struct BillToDisplay(pub Bill, pub DueState);

impl Tabled for BillToDisplay {
    const LENGTH: usize = 7;

    fn fields(&self) -> Vec<Cow<'_, str>> {
        let bill = &self.0;
        vec![
            bill.id.to_string().into(),
            bill.name.as_str().into(),
            bill.display_amount().into(),
            bill.due_date.date_naive().to_string().into(),
            self.1.to_string().into(),
            bill.category.label().into(),
            if bill.recurring {
                bill.recurrence_frequency.to_string().into()
            } else {
                "".into()
            },
        ]
    }

    fn headers() -> Vec<Cow<'static, str>> {
        vec![
            "id".into(),
            "name".into(),
            "amount".into(),
            "due date".into(),
            "state".into(),
            "category".into(),
            "recurrence".into(),
        ]
    }
}

pub fn table(bills: Vec<Bill>) -> Table {
    let now = Utc::now();
    Table::new(bills.into_iter().map(|bill| {
        let state = bill.due_state(now);
        BillToDisplay(bill, state)
    }))
}

pub fn run(config: &Config, command: &Command) -> Result<()> {
    let conn = &mut config.database()?;
    let user = config.user(conn)?;
    let mut cmd = CommandContext { config, conn, user };

    match command {
        Command::List(args) => cmd.list(args),
        Command::Add(args) => cmd.add(args),
        Command::Show(args) => cmd.show(args),
        Command::Update(args) => cmd.update(args),
        Command::Pay(args) => cmd.pay(args),
        Command::Delete(args) => cmd.delete(args),
        Command::Receipt(args) => cmd.receipt(args),
    }
}

impl CommandContext<'_> {
    fn payment_method(&mut self, name: Option<&str>) -> Result<Option<PaymentMethod>> {
        Ok(name
            .map(|name| PaymentMethod::find_by_name(self.conn, &self.user, name))
            .transpose()?)
    }

    fn list(&mut self, args: &List) -> Result<()> {
        let bills = QueryBill {
            user: Some(&self.user),
            status: args.status,
            category: args.category,
            due_after: args.after.map(naive_date_to_utc),
            due_before: args.before.map(naive_date_to_utc),
            count: args.count.map(i64::from),
            ..Default::default()
        }
        .run(self.conn)?;

        println!("{}", table(bills));
        Ok(())
    }

    fn add(&mut self, args: &Add) -> Result<()> {
        let payment_method = self.payment_method(args.payment_method.as_deref())?;

        let bill = NewBill {
            due_date: args.due.map(naive_date_to_utc).unwrap_or_else(Utc::now),
            status: if args.paid { Status::Paid } else { Status::Pending },
            category: args.category,
            notes: args.notes.as_deref(),
            recurring: args.recurring.is_some(),
            recurrence_frequency: args.recurring.clone().unwrap_or_default(),
            payment_method: payment_method.as_ref(),
            ..NewBill::new(&self.user, &args.name, args.amount)
        }
        .save(self.conn)?;

        println!("{}", bill.id);
        Ok(())
    }

    fn show(&mut self, args: &Show) -> Result<()> {
        let bill = Bill::find_for(self.conn, &self.user, args.id)?;
        let now = Utc::now();

        println!("{} | {}", bill.id, bill.name);
        println!("  Amount: {}", bill.display_amount());
        println!("  Due date: {}", bill.due_date.format(DATE_FORMAT));
        println!("  Status: {} ({})", bill.status, bill.due_state(now));
        println!("  Category: {}", bill.category.label());
        if bill.status.is_pending() {
            println!("  Days until due: {}", bill.days_until_due(now));
        }
        if let Some(date) = bill.payment_date {
            println!("  Paid on: {}", date.format(DATE_FORMAT));
        }
        if bill.recurring {
            println!("  Recurs: {}", bill.recurrence_frequency);
            if let Some(next) = bill.next_due_date() {
                println!("  Next due date: {}", next.format(DATE_FORMAT));
            }
        }
        if let Some(id) = bill.payment_method_id {
            let method = PaymentMethod::find(self.conn, id)?;
            println!("  Payment method: {}", method.name);
        }
        if let Some(notes) = &bill.notes {
            println!("  Notes: {}", notes);
        }
        if let Some(receipt) = &bill.receipt_image {
            println!("  Receipt: {}", receipt);
        }

        Ok(())
    }

    fn update(&mut self, args: &Update) -> Result<()> {
        let bill = Bill::find_for(self.conn, &self.user, args.id)?;
        let payment_method = self.payment_method(args.payment_method.as_deref())?;

        let recurring = if args.no_recurring {
            Some(false)
        } else {
            args.recurring.as_ref().map(|_| true)
        };

        ChangeBill {
            name: args.name.as_deref(),
            amount: args.amount,
            due_date: args.due.map(naive_date_to_utc),
            status: args.status,
            category: args.category,
            notes: if args.no_notes {
                Some(None)
            } else {
                args.notes.as_deref().map(Some)
            },
            recurring,
            recurrence_frequency: if args.no_recurring {
                Some(Frequency::None)
            } else {
                args.recurring.clone()
            },
            payment_method: if args.no_payment_method {
                Some(None)
            } else {
                payment_method.as_ref().map(Some)
            },
        }
        .save(self.conn, &bill)?;

        Ok(())
    }

    fn pay(&mut self, args: &Pay) -> Result<()> {
        let bill = Bill::find_for(self.conn, &self.user, args.id)?;
        let payment_method = match self.payment_method(args.payment_method.as_deref())? {
            Some(method) => Some(method),
            None => PaymentMethod::default_for(self.conn, &self.user)?,
        };

        let payment = PayBill {
            payment_method: payment_method.as_ref(),
            ..PayBill::new(&self.user, &bill, Utc::now())
        }
        .save(self.conn)?;

        for notification in &payment.notifications {
            println!("{}: {}", notification.title, notification.message);
        }
        if let Some(next) = &payment.next {
            println!(
                "Next occurrence {} due on {}",
                next.id,
                next.due_date.format(DATE_FORMAT)
            );
        }

        Ok(())
    }

    fn delete(&mut self, args: &Delete) -> Result<()> {
        let mut bill = Bill::find_for(self.conn, &self.user, args.id)?;

        if args.confirm && crate::utils::confirm()? {
            bill.delete(self.conn)?;
        } else {
            anyhow::bail!("operation requires confirmation");
        }

        Ok(())
    }

    fn receipt(&mut self, args: &Receipt) -> Result<()> {
        let mut bill = Bill::find_for(self.conn, &self.user, args.id)?;
        let (filename, bytes) = crate::utils::read_file(&args.file)?;

        bill.attach_receipt(self.conn, &self.config.storage()?, &filename, &bytes)?;
        if let Some(location) = &bill.receipt_image {
            println!("{}", location);
        }

        Ok(())
    }
}
