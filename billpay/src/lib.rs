pub mod db;
pub mod result;
pub mod schema;

pub mod bill;
pub mod budget;
pub mod dashboard;
pub mod date;
pub mod due;
pub mod mail;
pub mod notification;
pub mod payment_method;
pub mod preference;
pub mod reminder;
pub mod stats;
pub mod storage;
pub mod user;


pub use oxydized_money::{Amount, Currency, Decimal};

pub type Conn = diesel::sqlite::SqliteConnection;
pub type Database = Conn;

pub use db::DatabaseTrait;
pub use mail::{Email, Mailer};
pub use result::{Error, ErrorKind, OptionalExtension, Result};

pub(crate) mod essentials {
    pub use crate::{db, Amount, Conn, Currency, Decimal, Error, Result};
    pub use crate::result::OptionalExtension as _;
}

pub mod prelude {
    pub use crate::{
        bill::{Bill, Category as BillCategory, Frequency, Status},
        budget::Budget,
        db,
        due::DueState,
        mail::{Email, Mailer},
        notification::{Notification, NotificationType},
        payment_method::{MethodType, PaymentMethod},
        preference::UserPreference,
        storage::FileStorage,
        user::User,
        Amount, Conn, Currency, Database, DatabaseTrait, Decimal, Error, ErrorKind, Result,
    };
    pub use crate::result::OptionalExtension as _;
}
