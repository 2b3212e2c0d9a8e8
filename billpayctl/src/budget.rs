use anyhow::Result;

use chrono::Utc;

use billpay::{budget::SetBudget, prelude::*};

use crate::cli::budget::*;
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
        Command::Set(args) => cmd.set(args),
        Command::Delete(args) => cmd.delete(args),
    }
}

impl CommandContext<'_> {
    fn list(&mut self) -> Result<()> {
        let now = Utc::now();
        let mut builder = TableBuilder::new();
        push_record!(builder, "category", "limit", "spent", "used", "remaining", "over");

        for budget in Budget::for_user(self.conn, &self.user)? {
            let status = budget.status(self.conn, self.user.currency, now)?;
            push_record!(
                builder,
                budget.category,
                budget.monthly_limit(self.user.currency),
                status.spent,
                format!("{}%", status.percentage_used),
                status.remaining,
                status.is_over_budget
            );
        }

        println!("{}", builder.build());
        Ok(())
    }

    fn set(&mut self, args: &Set) -> Result<()> {
        SetBudget {
            user: &self.user,
            category: args.category,
            monthly_limit: args.monthly_limit,
        }
        .save(self.conn)?;

        Ok(())
    }

    fn delete(&mut self, args: &Delete) -> Result<()> {
        Budget::find_for(self.conn, &self.user, args.category)?.delete(self.conn)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::prelude::{assert_eq, Result, *};

    #[test]
    fn set_twice_then_delete() -> Result<()> {
        with_user(|config, conn, user| {
            for limit in [100, 250] {
                run(
                    config,
                    &Command::Set(Set {
                        category: BillCategory::Utilities,
                        monthly_limit: Decimal::new(limit, 0),
                    }),
                )?;
            }

            let budgets = Budget::for_user(conn, user)?;
            assert_eq!(1, budgets.len());
            assert_eq!(Decimal::new(250, 0), budgets[0].monthly_limit);

            run(
                config,
                &Command::Delete(Delete {
                    category: BillCategory::Utilities,
                }),
            )?;
            assert!(Budget::for_user(conn, user)?.is_empty());

            Ok(())
        })
    }
}
