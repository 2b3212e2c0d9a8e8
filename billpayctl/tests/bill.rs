#[macro_use]
mod common;
use common::prelude::*;

#[test]
fn empty() -> Result<()> {
    let env = Env::new()?;

    cmd!(env, bill).failure().stderr(str::contains("Usage:"));

    Ok(())
}

#[test]
fn add_and_list() -> Result<()> {
    let env = Env::new()?;
    env.user("alice")?;

    env.run(["bill", "add", "Rent", "0"])?
        .failure()
        .code(65);

    env.run(["bill", "add", "Rent", "1200", "--due", "2024-05-01", "--category", "rent"])?
        .success()
        .stdout(str::contains("1"));
    env.run([
        "bill",
        "add",
        "Power",
        "80.5",
        "--due",
        "2024-05-20",
        "--category",
        "utilities",
        "--recurring",
        "monthly",
    ])?
    .success();

    cmd!(env, bill list)
        .success()
        .stdout(str::contains("Rent"))
        .stdout(str::contains("EUR 1200.00"))
        .stdout(str::contains("Power"))
        .stdout(str::contains("monthly"));

    env.run(["bill", "list", "--category", "rent"])?
        .success()
        .stdout(str::contains("Rent"))
        .stdout(str::contains("Power").not());

    Ok(())
}

#[test]
fn pay() -> Result<()> {
    let env = Env::new()?;
    env.user("alice")?;

    env.run(["payment-method", "add", "Visa", "--last-four", "4242", "--default"])?
        .success();
    env.run([
        "bill",
        "add",
        "Power",
        "80",
        "--due",
        "2024-05-20",
        "--recurring",
        "monthly",
    ])?
    .success();

    cmd!(env, bill pay 1)
        .success()
        .stdout(str::contains("Payment Recorded"))
        .stdout(str::contains("Next occurrence 2 due on June 19, 2024"));

    cmd!(env, bill pay 1)
        .failure()
        .code(65)
        .stderr(str::contains("already paid"));

    cmd!(env, bill show 1)
        .success()
        .stdout(str::contains("Status: paid"))
        .stdout(str::contains("Payment method: Visa"));

    cmd!(env, notification list)
        .success()
        .stdout(str::contains("Payment Recorded"));

    Ok(())
}

#[test]
fn other_users_bills() -> Result<()> {
    let env = Env::new()?;
    env.user("bob")?;
    env.user("alice")?;

    env.run(["-U", "bob", "bill", "add", "Rent", "900"])?.success();

    cmd!(env, bill show 1)
        .failure()
        .code(66)
        .stderr(str::contains("Bill not found"));

    Ok(())
}

#[test]
fn dashboard() -> Result<()> {
    let env = Env::new()?;
    env.user("alice")?;

    env.run(["bill", "add", "Rent", "1200", "--due", "2020-01-01"])?
        .success();

    cmd!(env, dashboard)
        .success()
        .stdout(str::contains("1 bill(s): 1 pending"))
        .stdout(str::contains("Overdue (1)"));

    env.run(["notification", "list", "--unread"])?
        .success()
        .stdout(str::contains("Bill Overdue"));

    cmd!(env, dashboard).success();
    env.run(["notification", "read", "--all"])?
        .success()
        .stdout(str::contains("Marked 1 notification(s) as read"));

    Ok(())
}
