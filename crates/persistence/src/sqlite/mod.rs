//! SQLite database management

mod connection;
mod sessions;

pub use connection::Database;
pub use sessions::*;
