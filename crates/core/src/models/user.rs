//! Loyalty-program user identification shared by purchases, claims and returns

use crate::validation::is_filled;
use serde::{Deserialize, Serialize};

/// Alternate identifiers the loyalty API can use to find a member
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub third_party_id: Option<String>,
}

impl UserAttributes {
    pub fn email(email: &str) -> Self {
        Self {
            email_address: Some(email.to_string()),
            ..Self::default()
        }
    }

    /// True when at least one of email, phone or third-party id is non-empty
    pub fn has_identifier(&self) -> bool {
        is_filled(&self.email_address)
            || is_filled(&self.phone_number)
            || is_filled(&self.third_party_id)
    }
}

/// Why a user could not be identified
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityGap {
    /// Neither a user id nor an attribute block was supplied
    NothingSupplied,
    /// An attribute block was supplied but every identifier in it is empty
    EmptyAttributes,
}

/// Check that a request identifies a member
///
/// A user id of `0` is treated as absent, matching the remote API which
/// never issues it.
pub fn resolve_user_identity(
    user_id: Option<i64>,
    attributes: Option<&UserAttributes>,
) -> Result<(), IdentityGap> {
    if user_id.is_some_and(|id| id != 0) {
        return Ok(());
    }
    match attributes {
        Some(attrs) if attrs.has_identifier() => Ok(()),
        Some(_) => Err(IdentityGap::EmptyAttributes),
        None => Err(IdentityGap::NothingSupplied),
    }
}

/// Standard rejection text for purchases and claims
pub(crate) fn identity_error(gap: IdentityGap) -> crate::Error {
    let reason = match gap {
        IdentityGap::EmptyAttributes => {
            "Either user_id or at least one user attribute (email, phone, third_party_id) must be provided"
        }
        IdentityGap::NothingSupplied => "Either user_id or user_attributes must be provided",
    };
    crate::Error::validation(reason)
}
