use anyhow::Result;

use chrono::Utc;
use tabled::settings::Panel;

use billpay::{dashboard::Dashboard, notification};

use crate::config::Config;

pub fn run(config: &Config) -> Result<()> {
    let conn = &mut config.database()?;
    let user = config.user(conn)?;
    let now = Utc::now();

    let created = notification::generate(conn, &user, now)?;
    log::debug!("Generated {} notification(s)", created.len());

    let dashboard = Dashboard::build(conn, &user, now)?;

    println!(
        "{} bill(s): {} pending, {} paid ({} this month)",
        dashboard.total, dashboard.pending, dashboard.paid, dashboard.paid_this_month
    );
    println!("{} unread notification(s)", dashboard.unread_notifications);

    for (title, bills) in [
        ("Overdue", dashboard.overdue),
        ("Due soon", dashboard.due_soon),
        ("Upcoming", dashboard.upcoming),
    ] {
        if bills.is_empty() {
            continue;
        }
        let count = bills.len();
        println!();
        println!(
            "{}",
            crate::bill::table(bills).with(Panel::header(format!("{title} ({count})")))
        );
    }

    Ok(())
}
