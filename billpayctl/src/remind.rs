use anyhow::Result;
use std::process::ExitCode;

use chrono::{DateTime, Utc};

use billpay::{
    mail::Mailer,
    reminder::{Dispatcher, Report},
    Conn, ErrorKind,
};

use crate::cli::remind::Remind;
use crate::config::Config;
use crate::mailer::LettreMailer;

pub fn run(config: &Config, args: &Remind) -> Result<ExitCode> {
    let conn = &mut config.database()?;
    let mailer = LettreMailer::new(&config.mail()?)?;

    let report = dispatch(conn, &mailer, args.dry_run, Utc::now())?;
    print(&report);

    Ok(ExitCode::from(exit_code(&report)))
}

fn dispatch(
    conn: &mut Conn,
    mailer: &dyn Mailer,
    dry_run: bool,
    now: DateTime<Utc>,
) -> Result<Report> {
    let dispatcher = Dispatcher {
        dry_run,
        ..Dispatcher::new(mailer)
    };

    Ok(dispatcher.run(conn, now)?)
}

fn print(report: &Report) {
    println!("{}", report.header());
    for entry in &report.entries {
        println!("{}", entry);
    }
    println!("{}", report.footer());
}

/// Failed sends are retried on the next run, so they are reported as a
/// temporary failure
fn exit_code(report: &Report) -> u8 {
    if report.failed() > 0 {
        log::warn!("{} reminder(s) could not be sent", report.failed());
        ErrorKind::Transient.exit_code()
    } else {
        0
    }
}
