use anyhow::{Context, Result};
use lettre::{
    message::{Mailbox, MultiPart},
    transport::smtp::authentication::Credentials,
    FileTransport, Message, SmtpTransport, Transport,
};

use billpay::{mail::Mailer, Email, Error};

use crate::config::{MailSettings, MailTransport};

enum Sender {
    Smtp(SmtpTransport),
    File(FileTransport),
}

/// Sends reminders through lettre, as plain text with an HTML alternative
pub struct LettreMailer {
    from: Mailbox,
    sender: Sender,
}

impl LettreMailer {
    pub fn new(settings: &MailSettings) -> Result<Self> {
        let from = settings
            .from
            .parse::<Mailbox>()
            .with_context(|| format!("Invalid sender address: {}", settings.from))?;

        let sender = match &settings.transport {
            MailTransport::Smtp {
                host,
                port,
                user,
                password,
                tls,
            } => {
                let mut builder = if *tls {
                    SmtpTransport::relay(host)
                        .with_context(|| format!("Invalid SMTP host: {host}"))?
                } else {
                    SmtpTransport::builder_dangerous(host)
                };
                if let Some(port) = port {
                    builder = builder.port(*port);
                }
                if let Some(user) = user {
                    builder = builder.credentials(Credentials::new(
                        user.clone(),
                        password.clone().unwrap_or_default(),
                    ));
                }
                Sender::Smtp(builder.build())
            }
            MailTransport::File { dir } => {
                std::fs::create_dir_all(dir)?;
                Sender::File(FileTransport::new(dir))
            }
        };

        Ok(Self { from, sender })
    }

    fn message(&self, email: &Email) -> billpay::Result<Message> {
        let to = email
            .to
            .parse::<Mailbox>()
            .map_err(|e| Error::Mail(format!("Invalid recipient {}: {e}", email.to)))?;

        Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(email.subject.as_str())
            .multipart(MultiPart::alternative_plain_html(
                email.text.clone(),
                email.html.clone(),
            ))
            .map_err(|e| Error::Mail(e.to_string()))
    }
}

impl Mailer for LettreMailer {
    fn send(&self, email: &Email) -> billpay::Result<()> {
        let message = self.message(email)?;

        match &self.sender {
            Sender::Smtp(transport) => transport
                .send(&message)
                .map(|_| ())
                .map_err(|e| Error::Mail(e.to_string())),
            Sender::File(transport) => transport
                .send(&message)
                .map(|_| ())
                .map_err(|e| Error::Mail(e.to_string())),
        }
    }
}
