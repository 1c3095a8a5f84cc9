//! Purchase-history lookup models for `GET /users/{id}/purchases`

use crate::validation::Validate;
use crate::{Error, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the `user_id` path segment should be interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdType {
    Email,
    Id,
    ThirdPartyId,
    MobilePhoneNumber,
}

impl IdType {
    pub const ALL: [IdType; 4] = [
        IdType::Email,
        IdType::Id,
        IdType::ThirdPartyId,
        IdType::MobilePhoneNumber,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IdType::Email => "email",
            IdType::Id => "id",
            IdType::ThirdPartyId => "third_party_id",
            IdType::MobilePhoneNumber => "mobile_phone_number",
        }
    }
}

impl fmt::Display for IdType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IdType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        IdType::ALL
            .into_iter()
            .find(|id_type| id_type.as_str() == s)
            .ok_or_else(|| {
                let valid: Vec<&str> = IdType::ALL.iter().map(IdType::as_str).collect();
                Error::validation(format!(
                    "Invalid id_type. Must be one of: {}",
                    valid.join(", ")
                ))
            })
    }
}

/// Parameters for a member's purchase history
///
/// `id_type` is kept as free text because history lookups are often
/// built from job payloads; [`Validate`] checks it against [`IdType`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserPurchaseHistoryRequest {
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_end: Option<String>,
}

impl UserPurchaseHistoryRequest {
    pub fn new(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            ..Self::default()
        }
    }

    pub fn with_id_type(mut self, id_type: IdType) -> Self {
        self.id_type = Some(id_type.as_str().to_string());
        self
    }

    /// Query-string pairs for the parameters that were supplied
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();

        if let Some(id_type) = self.id_type.as_deref().filter(|v| !v.is_empty()) {
            params.push(("id_type", id_type.to_string()));
        }
        if let Some(page) = self.page.filter(|p| *p != 0) {
            params.push(("page", page.to_string()));
        }
        if let Some(start) = self.date_start.as_deref().filter(|v| !v.is_empty()) {
            params.push(("date_start", start.to_string()));
        }
        if let Some(end) = self.date_end.as_deref().filter(|v| !v.is_empty()) {
            params.push(("date_end", end.to_string()));
        }

        params
    }
}

impl Validate for UserPurchaseHistoryRequest {
    fn validate(&self) -> Result<()> {
        if self.user_id.is_empty() {
            return Err(Error::validation("user_id is required"));
        }

        if self.page.is_some_and(|page| page < 1) {
            return Err(Error::validation("Page number must be greater than 0"));
        }

        // unreadable dates are left to the API; only a readable inverted range is rejected
        let start = self.date_start.as_deref().and_then(parse_history_date);
        let end = self.date_end.as_deref().and_then(parse_history_date);
        if let (Some(start), Some(end)) = (start, end) {
            if start > end {
                return Err(Error::validation("date_start cannot be after date_end"));
            }
        }

        if let Some(id_type) = self.id_type.as_deref().filter(|v| !v.is_empty()) {
            IdType::from_str(id_type)?;
        }

        Ok(())
    }
}

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// ISO 8601 style timestamps with or without offset, or plain dates
fn parse_history_date(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_utc());
    }
    if let Some(dt) = NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
    {
        return Some(dt);
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPurchase {
    pub last_date_purchased: String,
    pub purchase_id: String,
    pub purchase_id_type: String,
    pub purchase_total: f64,
    pub total_points_awarded: i64,
    pub total_points_earned: i64,
    #[serde(default)]
    pub points_awaiting_fulfillment: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPurchaseHistoryPaging {
    pub total: i64,
    pub pages: i64,
    #[serde(default)]
    pub next_page: Option<String>,
    #[serde(default)]
    pub prev_page: Option<String>,
}

/// Response from `GET /users/{id}/purchases`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPurchaseHistoryResponse {
    #[serde(default)]
    pub purchases: Vec<UserPurchase>,
    pub paging: UserPurchaseHistoryPaging,
}
