//! Data models for the loyalty API and shop sessions

mod api_error;
mod claim;
mod history;
mod purchase;
mod returns;
mod reward;
mod session;
mod user;

pub use api_error::*;
pub use claim::*;
pub use history::*;
pub use purchase::*;
pub use returns::*;
pub use reward::*;
pub use session::*;
pub use user::*;
