use std::fs::create_dir_all;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use toml::{Table, Value};

use billpay::{prelude::*, storage::LocalStorage};

use crate::cli::{Cli, Commands};

#[derive(Debug)]
pub struct Config {
    pub dir: PathBuf,
    pub data_dir: PathBuf,
    cli: Cli,
    table: Table,
}

/// Where outgoing reminders go
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MailTransport {
    Smtp {
        host: String,
        port: Option<u16>,
        user: Option<String>,
        password: Option<String>,
        tls: bool,
    },
    /// Writes each message as an `.eml` file in `dir`
    File { dir: PathBuf },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailSettings {
    pub from: String,
    pub transport: MailTransport,
}

impl Config {
    pub fn try_parse() -> Result<Self> {
        Self::try_parse_from(std::env::args_os())
    }

    pub fn try_parse_from<I, T>(iter: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        use clap::Parser;

        let cli = Cli::try_parse_from(iter)?;

        let dir = match cli.config.clone() {
            Some(dir) => dir,
            None => config_home()?,
        };
        let table = match std::fs::read_to_string(dir.join("config.toml")) {
            Ok(content) => content.parse::<Table>()?,
            Err(_) => Table::new(),
        };

        let data_dir = match cli.data.clone() {
            Some(dir) => dir,
            None => match table.get("data_dir").and_then(Value::as_str) {
                Some(dir) => PathBuf::from(dir),
                None => data_home()?,
            },
        };

        if !data_dir.is_dir() {
            return Err(anyhow!(
                "Data directory is not a dir: {}",
                data_dir.display()
            ));
        }

        Ok(Config {
            dir,
            data_dir,
            cli,
            table,
        })
    }

    pub fn log_level_filter(&self) -> log::LevelFilter {
        self.cli.verbose.log_level_filter()
    }

    pub fn command(&self) -> Option<&Commands> {
        self.cli.command.as_ref()
    }

    pub fn username(&self) -> Option<&str> {
        self.cli.user.as_deref()
    }

    pub fn user_or_default(&self, conn: &mut Conn) -> Result<Option<User>> {
        if let Some(username) = self.username() {
            match User::find_by_username(conn, username) {
                Ok(user) => Ok(Some(user)),
                Err(e) if e.is_not_found() => Err(anyhow!("User not found: {}", username)),
                Err(e) => Err(e.into()),
            }
        } else {
            self.default_user(conn)
        }
    }

    /// The acting user, required by every command about user data
    pub fn user(&self, conn: &mut Conn) -> Result<User> {
        self.user_or_default(conn)?
            .ok_or_else(|| anyhow!("User not provided"))
    }

    pub fn default_user(&self, conn: &mut Conn) -> Result<Option<User>> {
        if let Some(username) = self.get("default_user")? {
            match User::find_by_username(conn, &username) {
                Ok(user) => Ok(Some(user)),
                Err(e) if e.is_not_found() => {
                    self.reset("default_user")?;
                    Ok(None)
                }
                Err(error) => Err(error.into()),
            }
        } else {
            Ok(None)
        }
    }

    fn section(&self, name: &str) -> Option<&Table> {
        self.table.get(name).and_then(Value::as_table)
    }

    fn section_str(&self, section: &str, key: &str) -> Option<&str> {
        self.section(section)
            .and_then(|table| table.get(key))
            .and_then(Value::as_str)
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_dir
            .join(self.section_str("db", "filename").unwrap_or("db.billpay"))
    }

    pub fn database(&self) -> Result<Database> {
        let mut conn = Database::open(self.database_path())?;
        conn.setup()?;
        Ok(conn)
    }

    /// Receipts and profile pictures
    pub fn storage(&self) -> Result<LocalStorage> {
        let dir = match self.section_str("storage", "dir") {
            Some(dir) => PathBuf::from(dir),
            None => self.data_dir.join("files"),
        };
        create_dir_all(&dir)?;

        Ok(LocalStorage::new(dir))
    }

    /// Mail settings, defaulting to `.eml` files in the data directory
    pub fn mail(&self) -> Result<MailSettings> {
        let from = self
            .section_str("mail", "from")
            .unwrap_or("billpay@localhost")
            .to_owned();
        let string = |key: &str| self.section_str("mail", key).map(str::to_owned);

        let transport = match self.section_str("mail", "transport").unwrap_or("file") {
            "smtp" => {
                let section = self.section("mail");
                let port = section
                    .and_then(|table| table.get("port"))
                    .and_then(Value::as_integer)
                    .map(u16::try_from)
                    .transpose()
                    .context("Invalid mail port")?;
                let tls = section
                    .and_then(|table| table.get("tls"))
                    .and_then(Value::as_bool)
                    .unwrap_or(true);

                MailTransport::Smtp {
                    host: string("host").context("Missing mail host")?,
                    port,
                    user: string("user"),
                    password: string("password"),
                    tls,
                }
            }
            "file" => MailTransport::File {
                dir: string("dir")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| self.data_dir.join("outbox")),
            },
            other => anyhow::bail!("Unknown mail transport: {other}"),
        };

        Ok(MailSettings { from, transport })
    }

    pub fn kvdir(&self) -> Result<PathBuf> {
        let dir = self.dir.join("key_value_store");

        if !dir.is_dir() {
            create_dir_all(&dir)?;
        }

        Ok(dir)
    }

    pub fn path(&self, key: &str) -> Result<PathBuf> {
        let kvdir = self.kvdir()?;
        let path = kvdir.join(key);

        if let Some(parent) = path.parent() {
            if !parent.is_dir() {
                create_dir_all(parent)?;
            }
        }

        Ok(path)
    }

    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path(key)?;

        match path.exists() {
            true => Ok(Some(std::fs::read_to_string(path)?)),
            false => Ok(None),
        }
    }

    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        std::fs::write(self.path(key)?, value)?;
        Ok(())
    }

    pub fn reset(&self, key: &str) -> Result<()> {
        let path = self.path(key)?;

        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}

fn xdg_dirs() -> Result<xdg::BaseDirectories> {
    Ok(xdg::BaseDirectories::with_prefix("billpay")?)
}

fn home(var: &str, default: impl FnOnce(&xdg::BaseDirectories) -> PathBuf) -> Result<PathBuf> {
    match std::env::var(var) {
        Ok(val) if !val.is_empty() => Ok(PathBuf::from(val)),
        _ => {
            let path = default(&xdg_dirs()?);
            if !path.exists() {
                create_dir_all(&path)?;
            }
            Ok(path)
        }
    }
}

fn config_home() -> Result<PathBuf> {
    home("BILLPAY_CONFIG", xdg::BaseDirectories::get_config_home)
}

fn data_home() -> Result<PathBuf> {
    home("BILLPAY_DATA", xdg::BaseDirectories::get_data_home)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::prelude::{assert_eq, *};

    #[test]
    fn parse() -> Result<()> {
        with_dirs(|confd, datad| {
            let mut config = Config::try_parse_from(["arg0"])?;

            assert_eq!(config.dir, confd.path());
            assert_eq!(config.data_dir, datad.path());
            assert_eq!(None, config.username());

            confd.child("config.toml").write_str(&format!(
                "data_dir = '{}'",
                datad.child("foo").path().display()
            ))?;

            assert!(Config::try_parse_from(["arg0"]).is_err());
            create_dir_all(datad.child("foo").path())?;
            config = Config::try_parse_from(["arg0"])?;
            assert_eq!(config.data_dir, datad.child("foo").path());

            config = Config::try_parse_from([
                "arg0",
                "--config",
                datad.child("bar").path().to_str().unwrap(),
            ])?;
            assert_eq!(config.dir, datad.child("bar").path());

            create_dir_all(datad.child("bar").path())?;
            config = Config::try_parse_from([
                "arg0",
                "-D",
                datad.child("bar").path().to_str().unwrap(),
                "-U",
                "alice",
            ])?;
            assert_eq!(config.data_dir, datad.child("bar").path());
            assert_eq!(Some("alice"), config.username());

            Ok(())
        })
    }

    #[test]
    fn database_path() -> Result<()> {
        with_dirs(|confd, datad| {
            let config = Config::try_parse_from(["arg0"])?;
            assert_eq!(datad.child("db.billpay").path(), config.database_path());

            confd
                .child("config.toml")
                .write_str("[db]\nfilename = 'bills.sqlite'")?;
            let config = Config::try_parse_from(["arg0"])?;
            assert_eq!(datad.child("bills.sqlite").path(), config.database_path());

            Ok(())
        })
    }

    #[test]
    fn mail_defaults_to_files() -> Result<()> {
        with_config(|config| {
            assert_eq!(
                MailSettings {
                    from: "billpay@localhost".to_owned(),
                    transport: MailTransport::File {
                        dir: config.data_dir.join("outbox")
                    },
                },
                config.mail()?
            );

            Ok(())
        })
    }

    #[test]
    fn mail_smtp() -> Result<()> {
        with_dirs(|confd, _| {
            confd.child("config.toml").write_str(
                "[mail]
transport = 'smtp'
from = 'Bills <bills@example.com>'
host = 'smtp.example.com'
port = 2525
user = 'bills'
password = 'secret'
",
            )?;

            let config = Config::try_parse_from(["arg0"])?;
            assert_eq!(
                MailSettings {
                    from: "Bills <bills@example.com>".to_owned(),
                    transport: MailTransport::Smtp {
                        host: "smtp.example.com".to_owned(),
                        port: Some(2525),
                        user: Some("bills".to_owned()),
                        password: Some("secret".to_owned()),
                        tls: true,
                    },
                },
                config.mail()?
            );

            confd
                .child("config.toml")
                .write_str("[mail]\ntransport = 'pigeon'")?;
            let config = Config::try_parse_from(["arg0"])?;
            assert!(config.mail().is_err());

            Ok(())
        })
    }

    #[test]
    fn default_user() -> Result<()> {
        with_config(|config| {
            let conn = &mut config.database()?;
            assert!(config.user(conn).is_err());

            let user = billpay::user::NewUser::new("alice", "alice@example.com").save(conn)?;
            config.set("default_user", "alice")?;
            assert_eq!(Some(user.id), config.user_or_default(conn)?.map(|u| u.id));

            config.set("default_user", "bob")?;
            assert!(config.default_user(conn)?.is_none());
            assert_eq!(None, config.get("default_user")?);

            Ok(())
        })
    }

    #[test]
    fn config_home_default() -> Result<()> {
        temp_env::with_var("BILLPAY_CONFIG", None::<&str>, || {
            let xdg_dirs = xdg::BaseDirectories::with_prefix("billpay")?;
            assert_eq!(xdg_dirs.get_config_home(), config_home()?);
            Ok(())
        })
    }

    #[test]
    fn config_home_with_var() -> Result<()> {
        temp_env::with_var("BILLPAY_CONFIG", Some("./"), || {
            assert_eq!(PathBuf::from("./"), config_home()?);
            Ok(())
        })
    }

    #[test]
    fn data_home_default() -> Result<()> {
        temp_env::with_var("BILLPAY_DATA", None::<&str>, || {
            let xdg_dirs = xdg::BaseDirectories::with_prefix("billpay")?;
            assert_eq!(xdg_dirs.get_data_home(), data_home()?);
            Ok(())
        })
    }

    #[test]
    fn data_home_with_var() -> Result<()> {
        temp_env::with_var("BILLPAY_DATA", Some("./"), || {
            assert_eq!(PathBuf::from("./"), data_home()?);
            Ok(())
        })
    }
}
