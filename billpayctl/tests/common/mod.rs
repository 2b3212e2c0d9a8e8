use anyhow::Result;
use assert_cmd::{assert::Assert, Command};
use assert_fs::TempDir;

pub mod prelude {
    pub use super::Env;
    pub use anyhow::Result;
    #[allow(unused_imports)]
    pub use predicates::prelude::*;
    pub use predicates::str;
}

pub struct Env {
    pub conf_dir: TempDir,
    pub data_dir: TempDir,
}

#[allow(unused_macros)]
macro_rules! cmd {
    ($env:ident, $($arg:tt)*) => {
        $env.command()?$(.arg(stringify!($arg)))*.assert()
    };
}

impl Env {
    pub fn new() -> Result<Self> {
        Ok(Self {
            conf_dir: TempDir::new()?,
            data_dir: TempDir::new()?,
        })
    }

    pub fn command(&self) -> Result<Command> {
        let mut cmd = Command::cargo_bin("billpayctl")?;
        cmd.arg("-C")
            .arg(self.conf_dir.path())
            .arg("-D")
            .arg(self.data_dir.path())
            .env_remove("RUST_LOG");
        Ok(cmd)
    }

    /// Runs with arguments that don't tokenize as single identifiers
    pub fn run<const N: usize>(&self, args: [&str; N]) -> Result<Assert> {
        Ok(self.command()?.args(args).assert())
    }

    /// Creates a user named `name` and makes it the default one
    #[allow(dead_code)]
    pub fn user(&self, name: &str) -> Result<()> {
        self.run(["user", "create", name, &format!("{name}@example.com")])?
            .success();
        self.run(["-U", name, "user", "default"])?.success();
        Ok(())
    }

    #[allow(dead_code)]
    pub fn outbox(&self) -> Result<Vec<String>> {
        let dir = self.data_dir.path().join("outbox");
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut messages = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            messages.push(std::fs::read_to_string(entry?.path())?);
        }
        Ok(messages)
    }
}
