use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

pub use self::{book::BookRouter, loan::LoanRouter, user::UserRouter};

mod book;
mod loan;
mod user;

fn rfc3339(time: OffsetDateTime) -> String {
    time.format(&Rfc3339).unwrap_or_else(|_| time.to_string())
}
