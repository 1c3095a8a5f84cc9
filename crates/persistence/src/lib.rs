//! CTBridge Persistence - shop session storage and token encryption

pub mod encryption;
pub mod sqlite;
pub mod store;

pub use encryption::TokenEncryptor;
pub use sqlite::Database;
pub use store::{SessionStore, SqliteSessionStore};
