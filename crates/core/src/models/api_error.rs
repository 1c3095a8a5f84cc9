//! Error bodies returned by the loyalty API
//!
//! The two endpoint families report failures in different shapes; each
//! shape knows how to condense itself into a one-line summary.

use serde::{Deserialize, Serialize};

/// Catalog API error: `{error, message}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogErrorBody {
    pub error: String,
    pub message: String,
}

impl CatalogErrorBody {
    pub fn summary(&self) -> String {
        format!("CrowdTwist API Error: {} - {}", self.error, self.message)
    }
}

/// POS API error: `{system, reason, description, message}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PosErrorBody {
    #[serde(default)]
    pub system: String,
    pub reason: String,
    #[serde(default)]
    pub description: String,
    pub message: String,
}

impl PosErrorBody {
    pub fn summary(&self) -> String {
        format!("CrowdTwist POS Error: {} - {}", self.reason, self.message)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub reason: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NestedError {
    pub code: i64,
    pub message: String,
    #[serde(default)]
    pub errors: Vec<ErrorDetail>,
}

/// Error shape used by the purchase-history endpoint:
/// `{error: {code, message, errors: [{reason, message}]}}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseHistoryErrorBody {
    pub error: NestedError,
}

impl PurchaseHistoryErrorBody {
    pub fn summary(&self) -> String {
        let reason = self
            .error
            .errors
            .first()
            .map(|detail| detail.reason.clone())
            .unwrap_or_else(|| self.error.code.to_string());
        format!("CrowdTwist POS Error: {} - {}", reason, self.error.message)
    }
}
