#[macro_use]
mod common;
use common::prelude::*;

use chrono::{Duration, Utc};

fn due_in_two_days() -> String {
    (Utc::now() + Duration::days(2)).date_naive().to_string()
}

#[test]
fn dry_run() -> Result<()> {
    let env = Env::new()?;
    env.user("alice")?;
    env.run(["bill", "add", "Rent", "1200", "--due", &due_in_two_days()])?
        .success();

    env.run(["remind", "--dry-run"])?
        .success()
        .stdout(str::contains("Checking for bills that need reminders at"))
        .stdout(str::contains(
            "[DRY RUN] Would send reminder to alice@example.com for 'Rent'",
        ))
        .stdout(str::contains("Done! Sent 0 reminder(s)."));

    assert!(env.outbox()?.is_empty());

    Ok(())
}

#[test]
fn send_once_a_day() -> Result<()> {
    let env = Env::new()?;
    env.user("alice")?;
    env.run(["bill", "add", "Rent", "1200", "--due", &due_in_two_days()])?
        .success();

    cmd!(env, remind)
        .success()
        .stdout(str::contains("Sent reminder to alice@example.com for 'Rent'"))
        .stdout(str::contains("Done! Sent 1 reminder(s)."));

    let outbox = env.outbox()?;
    assert_eq!(1, outbox.len());
    assert!(outbox[0].contains("Subject: Bill Reminder: Rent due in"));

    cmd!(env, remind)
        .success()
        .stdout(str::contains("Done! Sent 0 reminder(s)."));
    assert_eq!(1, env.outbox()?.len());

    env.run(["notification", "list", "--type", "reminder"])?
        .success()
        .stdout(str::contains("Reminder Email Sent"));

    Ok(())
}

#[test]
fn unreachable_server() -> Result<()> {
    use assert_fs::fixture::{FileWriteStr, PathChild};

    let env = Env::new()?;
    env.conf_dir.child("config.toml").write_str(
        "[mail]
transport = 'smtp'
host = '127.0.0.1'
port = 1
tls = false
",
    )?;
    env.user("alice")?;
    env.run(["bill", "add", "Rent", "1200", "--due", &due_in_two_days()])?
        .success();

    cmd!(env, remind)
        .code(75)
        .stdout(str::contains("Failed to send email to alice@example.com"))
        .stdout(str::contains("Done! Sent 0 reminder(s)."));

    Ok(())
}
