#[macro_use]
mod common;
use common::prelude::*;

#[test]
fn empty() -> Result<()> {
    let env = Env::new()?;

    env.command()?
        .assert()
        .failure()
        .stderr(str::contains("No command provided"));

    Ok(())
}

#[test]
fn user_required() -> Result<()> {
    let env = Env::new()?;

    cmd!(env, bill list)
        .failure()
        .stderr(str::contains("User not provided"));

    env.run(["-U", "nobody", "bill", "list"])?
        .failure()
        .stderr(str::contains("User not found: nobody"));

    Ok(())
}

#[test]
fn reset() -> Result<()> {
    let env = Env::new()?;
    env.user("alice")?;

    cmd!(env, reset).failure().stderr(str::contains("Usage:"));

    env.run(["reset", "--confirm"])?
        .failure()
        .stdout(str::contains("you really want"))
        .stderr(str::contains("requires confirmation"));

    env.command()?
        .args(["reset", "--confirm"])
        .write_stdin("yes")
        .assert()
        .success()
        .stdout(str::contains("you really want"));

    env.run(["-U", "alice", "user", "show"])?
        .failure()
        .stderr(str::contains("User not found"));

    Ok(())
}
