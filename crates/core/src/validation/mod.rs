//! Pre-flight request validation
//!
//! Every request shape sent to the loyalty API implements [`Validate`].
//! Validation is fail-fast: the first violation found is returned as an
//! [`Error::ValidationError`] carrying a human-readable reason, and nothing
//! is sent over the network.

use crate::{Error, Result};

/// Synchronous payload check run before a request leaves the process
pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// Fail with `Missing required field: <field>` if the value is absent
pub(crate) fn require<T>(value: &Option<T>, field: &str) -> Result<()> {
    match value {
        Some(_) => Ok(()),
        None => Err(Error::validation(format!("Missing required field: {}", field))),
    }
}

/// True when the string is present and non-empty
pub(crate) fn is_filled(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.is_empty())
}
