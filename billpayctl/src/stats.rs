use anyhow::Result;

use chrono::Utc;

use billpay::{
    date::Month,
    stats::{monthly_spend, CategoriesStats},
    Amount,
};

use crate::cli::stats::*;
use crate::config::Config;

use tabled::{builder::Builder as TableBuilder, settings::Panel};

pub fn run(config: &Config, command: &Command) -> Result<()> {
    let conn = &mut config.database()?;
    let user = config.user(conn)?;
    let current = Month::of(Utc::now());

    match command {
        Command::Categories(args) => {
            let month = args.month.unwrap_or(current);
            let stats = CategoriesStats::for_month(conn, &user, month)?;

            let mut builder = TableBuilder::new();
            push_record!(builder, "category", "bills", "amount");
            for stat in &stats.stats {
                push_record!(
                    builder,
                    stat.category,
                    stat.count,
                    Amount(stat.amount, user.currency)
                );
            }
            push_record!(builder, "Total", "", Amount(stats.amount, user.currency));

            println!(
                "{}",
                builder.build().with(Panel::header(format!("Paid in {month}")))
            );
        }
        Command::Monthly(args) => {
            let mut builder = TableBuilder::new();
            push_record!(builder, "month", "paid");
            for spend in monthly_spend(conn, &user, current, args.months)? {
                push_record!(
                    builder,
                    spend.month.to_string(),
                    Amount(spend.amount, user.currency)
                );
            }

            println!("{}", builder.build());
        }
    }

    Ok(())
}
