//! Receipt-claim models for the `POST /claim` endpoint

use super::user::{identity_error, resolve_user_identity, UserAttributes};
use crate::validation::{is_filled, Validate};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Body of `POST /claim` - a member claiming points for an external receipt
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClaimPointsRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub third_party_receipt_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_attributes: Option<UserAttributes>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_purchased: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimPointsResult {
    #[serde(rename = "type", default)]
    pub result_type: Option<String>,
    #[serde(default)]
    pub third_party_id: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub date_occurred: Option<String>,
    pub points_awarded: i64,
    pub bonus_points_awarded: i64,
}

/// Response from `POST /claim`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimPointsResponse {
    pub receipt_id: String,
    pub order_id: String,
    pub user_id: String,
    #[serde(default)]
    pub results: Vec<ClaimPointsResult>,
}

impl Validate for ClaimPointsRequest {
    fn validate(&self) -> Result<()> {
        if !is_filled(&self.third_party_receipt_id) {
            return Err(Error::validation("third_party_receipt_id is required"));
        }

        resolve_user_identity(self.user_id, self.user_attributes.as_ref())
            .map_err(identity_error)?;

        if self.total.is_some_and(|total| total < 0.0) {
            return Err(Error::validation("Total cannot be negative"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claim() -> ClaimPointsRequest {
        ClaimPointsRequest {
            third_party_receipt_id: Some("EXT-77".to_string()),
            user_attributes: Some(UserAttributes::email("member@example.com")),
            ..ClaimPointsRequest::default()
        }
    }

    #[test]
    fn test_valid_claim_passes() {
        assert!(claim().validate().is_ok());
    }

    #[test]
    fn test_receipt_id_required() {
        let mut request = claim();
        request.third_party_receipt_id = Some(String::new());
        let err = request.validate().unwrap_err();
        assert!(err.to_string().contains("third_party_receipt_id is required"));
    }

    #[test]
    fn test_identity_required() {
        let mut request = claim();
        request.user_attributes = None;
        assert!(matches!(request.validate(), Err(Error::ValidationError(_))));

        request.user_id = Some(5);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_negative_total_rejected() {
        let mut request = claim();
        request.total = Some(-3.5);
        let err = request.validate().unwrap_err();
        assert!(err.to_string().contains("Total cannot be negative"));

        request.total = Some(0.0);
        assert!(request.validate().is_ok());
    }
}
