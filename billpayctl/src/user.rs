use anyhow::Result;

use billpay::{
    prelude::*,
    preference::ChangeUserPreference,
    user::{ChangeUser, NewUser},
};

use crate::cli::user::*;
use crate::config::Config;

use tabled::builder::Builder as TableBuilder;

struct CommandContext<'a> {
    config: &'a Config,
    conn: &'a mut Database,
}

pub fn run(config: &Config, command: &Command) -> Result<()> {
    let conn = &mut config.database()?;
    let mut cmd = CommandContext { config, conn };

    match command {
        Command::List(_) => cmd.list(),
        Command::Create(args) => cmd.create(args),
        Command::Show(_) => cmd.show(),
        Command::Update(args) => cmd.update(args),
        Command::Delete(args) => cmd.delete(args),
        Command::Default(args) => cmd.default(args),
        Command::Picture(args) => cmd.picture(args),
        Command::Preferences(args) => cmd.preferences(args),
    }
}

impl CommandContext<'_> {
    fn list(&mut self) -> Result<()> {
        let mut builder = TableBuilder::new();
        push_record!(builder, "id", "username", "email", "name", "currency");

        for user in User::all(self.conn)? {
            push_record!(
                builder,
                user.id,
                user.username,
                user.email,
                user.first_name,
                user.currency.code()
            );
        }

        println!("{}", builder.build());
        Ok(())
    }

    fn create(&mut self, args: &Create) -> Result<()> {
        NewUser {
            first_name: args.first_name.as_deref().unwrap_or_default(),
            currency: args.currency,
            ..NewUser::new(&args.username, &args.email)
        }
        .save(self.conn)?;

        Ok(())
    }

    fn show(&mut self) -> Result<()> {
        let user = self.config.user(self.conn)?;
        let preference = UserPreference::find_or_default(self.conn, user.id)?;

        println!("{} | {}", user.id, user.username);
        println!("  Email: {}", user.email);
        if !user.first_name.is_empty() {
            println!("  First name: {}", user.first_name);
        }
        println!("  Currency: {}", user.currency.code());
        if let Some(picture) = &user.profile_picture {
            println!("  Profile picture: {}", picture);
        }
        println!(
            "  Email reminders: {}, {} day(s) before the due date",
            if preference.email_reminders_enabled { "on" } else { "off" },
            preference.remind_days_before
        );

        Ok(())
    }

    fn update(&mut self, args: &Update) -> Result<()> {
        let user = self.config.user(self.conn)?;

        ChangeUser {
            email: args.email.as_deref(),
            first_name: args.first_name.as_deref(),
            currency: args.currency,
        }
        .save(self.conn, &user)?;

        Ok(())
    }

    fn delete(&mut self, args: &Delete) -> Result<()> {
        let mut user = self.config.user(self.conn)?;

        if args.confirm && crate::utils::confirm()? {
            user.delete(self.conn)?;
            if self.config.get("default_user")?.as_deref() == Some(user.username.as_str()) {
                self.config.reset("default_user")?;
            }
        } else {
            anyhow::bail!("operation requires confirmation");
        }

        Ok(())
    }

    fn default(&mut self, args: &Default) -> Result<()> {
        if args.reset {
            self.config.reset("default_user")?;
        } else if self.config.username().is_some() {
            let user = self.config.user(self.conn)?;
            self.config.set("default_user", &user.username)?;
        } else if let Some(user) = self.config.default_user(self.conn)? {
            println!("{}", user.username);
        } else {
            println!("No default user");
        }

        Ok(())
    }

    fn picture(&mut self, args: &Picture) -> Result<()> {
        let mut user = self.config.user(self.conn)?;
        let (filename, bytes) = crate::utils::read_file(&args.file)?;

        user.set_profile_picture(self.conn, &self.config.storage()?, &filename, &bytes)?;
        if let Some(location) = &user.profile_picture {
            println!("{}", location);
        }

        Ok(())
    }

    fn preferences(&mut self, args: &Preferences) -> Result<()> {
        let user = self.config.user(self.conn)?;
        let mut preference = UserPreference::find_or_create(self.conn, user.id)?;

        ChangeUserPreference {
            email_reminders_enabled: args.email_reminders,
            remind_days_before: args.remind_days_before,
            daily_digest_enabled: args.daily_digest,
            dark_mode: args.dark_mode,
        }
        .apply(self.conn, &mut preference)?;

        println!("Email reminders: {}", preference.email_reminders_enabled);
        println!("Remind days before: {}", preference.remind_days_before);
        println!("Daily digest: {}", preference.daily_digest_enabled);
        println!("Dark mode: {}", preference.dark_mode);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::prelude::{assert_eq, Result, *};

    #[test]
    fn create_and_default() -> Result<()> {
        with_config_args(&["-U", "alice"], |config| {
            run(
                config,
                &Command::Create(Create {
                    username: "alice".to_owned(),
                    email: "Alice@Example.com".to_owned(),
                    first_name: Some("Alice".to_owned()),
                    currency: Currency::USD,
                }),
            )?;
            run(config, &Command::Default(Default { reset: false }))?;

            let conn = &mut config.database()?;
            let user = config.default_user(conn)?.unwrap();
            assert_eq!("alice@example.com", user.email);
            assert_eq!(Currency::USD, user.currency);

            Ok(())
        })
    }

    #[test]
    fn preferences() -> Result<()> {
        with_user(|config, conn, user| {
            run(
                config,
                &Command::Preferences(Preferences {
                    email_reminders: Some(false),
                    remind_days_before: Some(7),
                    daily_digest: None,
                    dark_mode: None,
                }),
            )?;

            let preference = UserPreference::find_for(conn, user.id)?;
            assert!(!preference.email_reminders_enabled);
            assert_eq!(7, preference.remind_days_before);

            assert!(run(
                config,
                &Command::Preferences(Preferences {
                    email_reminders: None,
                    remind_days_before: Some(45),
                    daily_digest: None,
                    dark_mode: None,
                }),
            )
            .is_err());

            Ok(())
        })
    }
}
