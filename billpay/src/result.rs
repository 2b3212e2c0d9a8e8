use oxydized_money::CurrencyError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(derive_more::Error, derive_more::Display, derive_more::From, Debug)]
pub enum Error {
    #[display("Not found")]
    NotFound,
    #[display("{_0} not found")]
    ModelNotFound(#[error(not(source))] &'static str),
    #[display("{_0} not found by {_1}")]
    ModelNotFoundBy(&'static str, &'static str),
    #[display("Conflict with existing data. {_0}")]
    NonUnique(#[error(not(source))] String),
    #[display("Invalid. {_0}")]
    Invalid(#[error(not(source))] String),
    #[display("Forbidden. {_0}")]
    Forbidden(#[error(not(source))] &'static str),
    #[display("Sending mail failed. {_0}")]
    Mail(#[error(not(source))] String),
    #[display("Reading currency. {_0}")]
    #[from]
    CurrencyError(CurrencyError),
    #[display("Parsing value. {_0}")]
    #[from]
    ParseTypeError(ParseTypeError),
    #[display("Storage error. {_0}")]
    #[from]
    Io(std::io::Error),
    #[display("Generic error. {_0}")]
    #[from]
    GenericError(Box<dyn std::error::Error + Send + Sync>),
    #[display("Connection error")]
    #[from]
    ConnectionError(diesel::result::ConnectionError),
    #[display("Diesel error. {_0}")]
    DieselError(diesel::result::Error),
    #[display("Invalid month {_0}/{_1}")]
    InvalidMonth(i32, i32),
}

/// Coarse classification of errors, deciding how callers react to them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad user input, fixed by changing the input
    Validation,
    /// The record does not exist, or not for this user
    NotFound,
    /// The record exists but belongs to someone else
    Forbidden,
    /// Might succeed on a later attempt (mail transport, busy database)
    Transient,
    Fatal,
}

impl ErrorKind {
    /// Process exit code, following sysexits.h
    pub fn exit_code(&self) -> u8 {
        match self {
            ErrorKind::Validation => 65,
            ErrorKind::NotFound => 66,
            ErrorKind::Fatal => 70,
            ErrorKind::Transient => 75,
            ErrorKind::Forbidden => 77,
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorKind::Transient)
    }
}

impl Error {
    pub fn from_diesel_error(
        error: diesel::result::Error,
        model: &'static str,
        by: Option<&'static str>,
    ) -> Self {
        match error {
            diesel::result::Error::NotFound => {
                if let Some(by) = by {
                    Error::ModelNotFoundBy(model, by)
                } else {
                    Error::ModelNotFound(model)
                }
            }
            _ => error.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self.kind(), ErrorKind::NotFound)
    }

    pub fn kind(&self) -> ErrorKind {
        use diesel::result::Error::DatabaseError;

        match self {
            Error::NotFound | Error::ModelNotFound(_) | Error::ModelNotFoundBy(_, _) => {
                ErrorKind::NotFound
            }
            Error::NonUnique(_)
            | Error::Invalid(_)
            | Error::CurrencyError(_)
            | Error::ParseTypeError(_)
            | Error::InvalidMonth(_, _) => ErrorKind::Validation,
            Error::Forbidden(_) => ErrorKind::Forbidden,
            Error::Mail(_) => ErrorKind::Transient,
            Error::DieselError(DatabaseError(_, info)) if is_busy(info.message()) => {
                ErrorKind::Transient
            }
            _ => ErrorKind::Fatal,
        }
    }
}

fn is_busy(message: &str) -> bool {
    message.contains("database is locked") || message.contains("database is busy")
}

impl From<diesel::result::Error> for Error {
    fn from(e: diesel::result::Error) -> Error {
        use diesel::result::{
            DatabaseErrorKind,
            Error::{DatabaseError, NotFound},
        };

        match e {
            NotFound => Error::NotFound,
            DatabaseError(DatabaseErrorKind::UniqueViolation, e) => {
                Error::NonUnique(e.message().to_string())
            }
            DatabaseError(DatabaseErrorKind::CheckViolation, e) => {
                Error::Invalid(e.message().to_string())
            }
            _ => Error::DieselError(e),
        }
    }
}

pub trait OptionalExtension<T> {
    fn optional(self) -> Result<Option<T>>;
    fn optional_empty_changeset(self) -> Result<Option<T>>;
}

impl<T> OptionalExtension<T> for Result<T> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn optional_empty_changeset(self) -> Result<Option<T>> {
        use diesel::result::{EmptyChangeset, Error::QueryBuilderError};

        match self {
            Ok(value) => Ok(Some(value)),
            Err(Error::DieselError(QueryBuilderError(e))) if e.is::<EmptyChangeset>() => Ok(None),
            Err(e) => Err(e),
        }
    }
}

#[derive(Debug, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("Parse Type Error: {_0} {_1}")]
pub struct ParseTypeError(pub &'static str, pub String);
