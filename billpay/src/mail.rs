use crate::essentials::*;

/// A message with plain text and HTML alternatives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    pub to: String,
    pub subject: String,
    pub text: String,
    pub html: String,
}

/// Outgoing mail transport
///
/// Sending is synchronous, an `Err` means this message was not delivered and
/// nothing else.
pub trait Mailer {
    fn send(&self, email: &Email) -> Result<()>;
}
