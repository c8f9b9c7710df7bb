mod auth;
mod book;
mod history;
mod lending;
mod user;

pub use self::{auth::*, book::*, history::*, lending::*, user::*};
