use anyhow::Result;
use std::process::ExitCode;

#[macro_use]
mod utils;

mod bill;
mod budget;
mod cli;
mod config;
mod dashboard;
mod mailer;
mod notification;
mod payment_method;
mod remind;
mod stats;
mod user;


use cli::Commands;
use config::Config;

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(error) => {
            if let Some(error) = error.downcast_ref::<clap::Error>() {
                error.exit();
            }
            eprintln!("Error: {error:?}");
            ExitCode::from(exit_code(&error))
        }
    }
}

/// Exit code of the first library error in the chain, 1 otherwise
fn exit_code(error: &anyhow::Error) -> u8 {
    error
        .chain()
        .find_map(|cause| cause.downcast_ref::<billpay::Error>())
        .map(|error| error.kind().exit_code())
        .unwrap_or(1)
}

fn init_logger(config: &Config) -> Result<()> {
    if systemd_journal_logger::connected_to_journal() {
        systemd_journal_logger::JournalLog::new()?
            .with_syslog_identifier("billpayctl".to_owned())
            .install()?;
        log::set_max_level(config.log_level_filter());
    } else {
        env_logger::Builder::new()
            .filter_level(config.log_level_filter())
            .try_init()?;
    }

    Ok(())
}

fn run() -> Result<ExitCode> {
    let config = Config::try_parse()?;
    init_logger(&config)?;

    let Some(command) = config.command() else {
        anyhow::bail!("No command provided");
    };

    match command {
        Commands::User { command } => user::run(&config, command)?,
        Commands::Bill { command } => bill::run(&config, command)?,
        Commands::PaymentMethod { command } => payment_method::run(&config, command)?,
        Commands::Budget { command } => budget::run(&config, command)?,
        Commands::Notification { command } => notification::run(&config, command)?,
        Commands::Dashboard {} => dashboard::run(&config)?,
        Commands::Stats { command } => stats::run(&config, command)?,
        Commands::Remind(args) => return remind::run(&config, args),
        Commands::Reset { confirm } => {
            if *confirm && utils::confirm()? {
                std::fs::remove_file(config.database_path())?;
            } else {
                anyhow::bail!("operation requires confirmation");
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
