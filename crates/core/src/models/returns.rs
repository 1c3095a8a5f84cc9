//! Merchandise-return models for the `POST /return` endpoint

use super::user::{resolve_user_identity, IdentityGap, UserAttributes};
use crate::types::ExtraFields;
use crate::validation::{is_filled, require, Validate};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Return type codes for which the member must be identified
pub const RETURN_TYPES_REQUIRING_USER: [i64; 3] = [4, 5, 9];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReturnItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,
}

impl ReturnItem {
    pub fn new(sku: &str, quantity: i64) -> Self {
        Self {
            sku: Some(sku.to_string()),
            quantity: Some(quantity),
        }
    }
}

/// Body of `POST /return`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReturnRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_receipt_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_type: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_returned: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_attributes: Option<UserAttributes>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_data: Option<ExtraFields>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<ReturnItem>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnBreakdown {
    pub sku: String,
    pub points_deducted: i64,
    pub date_points_awarded: String,
    pub points_awarded: i64,
}

/// Response from `POST /return`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnResponse {
    pub receipt_id: String,
    pub is_excluded: bool,
    pub user_id: String,
    pub total_points_deducted: i64,
    #[serde(default)]
    pub breakdown: Vec<ReturnBreakdown>,
}

impl Validate for ReturnRequest {
    fn validate(&self) -> Result<()> {
        require(&self.return_id, "return_id")?;
        require(&self.return_type, "return_type")?;
        require(&self.date_returned, "date_returned")?;
        require(&self.items, "items")?;

        let items = self.items.as_deref().unwrap_or_default();
        if items.is_empty() {
            return Err(Error::validation("At least one item is required"));
        }

        for item in items {
            let Some(quantity) = item.quantity else {
                return Err(missing_item_field());
            };
            if !is_filled(&item.sku) {
                return Err(missing_item_field());
            }
            if quantity <= 0 {
                return Err(Error::validation("Item quantity must be greater than 0"));
            }
        }

        let identity = resolve_user_identity(self.user_id, self.user_attributes.as_ref());

        let requires_user = self
            .return_type
            .is_some_and(|code| RETURN_TYPES_REQUIRING_USER.contains(&code));
        if requires_user {
            match identity {
                Ok(()) => {}
                Err(IdentityGap::EmptyAttributes) => {
                    return Err(Error::validation(
                        "Return types 4, 5, and 9 require either user_id or at least one user attribute (email, phone, third_party_id)",
                    ));
                }
                Err(IdentityGap::NothingSupplied) => {
                    return Err(Error::validation(
                        "Return types 4, 5, and 9 require either user_id or user_attributes",
                    ));
                }
            }
        }

        if !is_filled(&self.original_receipt_id) && identity.is_err() {
            return Err(Error::validation(
                "Either original_receipt_id or user identification (user_id/user_attributes) must be provided",
            ));
        }

        Ok(())
    }
}

fn missing_item_field() -> Error {
    Error::validation("Each item must have sku and quantity fields")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn receipt_return(return_type: i64) -> ReturnRequest {
        ReturnRequest {
            return_id: Some("RET-1".to_string()),
            original_receipt_id: Some("R-1001".to_string()),
            return_type: Some(return_type),
            date_returned: Some("2025-03-05".to_string()),
            items: Some(vec![ReturnItem::new("SKU-1", 1)]),
            ..ReturnRequest::default()
        }
    }

    fn reason(result: Result<()>) -> String {
        match result {
            Err(Error::ValidationError(reason)) => reason,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_receipt_backed_return_passes() {
        assert!(receipt_return(1).validate().is_ok());
    }

    #[test]
    fn test_required_fields_and_items() {
        let mut request = receipt_return(1);
        request.date_returned = None;
        assert_eq!(reason(request.validate()), "Missing required field: date_returned");

        let mut request = receipt_return(1);
        request.items = Some(Vec::new());
        assert_eq!(reason(request.validate()), "At least one item is required");

        let mut request = receipt_return(1);
        request.items = Some(vec![ReturnItem::new("SKU-1", 0)]);
        assert_eq!(
            reason(request.validate()),
            "Item quantity must be greater than 0"
        );

        let mut request = receipt_return(1);
        request.items = Some(vec![ReturnItem {
            sku: None,
            quantity: Some(1),
        }]);
        assert_eq!(
            reason(request.validate()),
            "Each item must have sku and quantity fields"
        );
    }

    #[test]
    fn test_user_required_types_need_identity_even_with_receipt() {
        for code in RETURN_TYPES_REQUIRING_USER {
            let request = receipt_return(code);
            assert_eq!(
                reason(request.validate()),
                "Return types 4, 5, and 9 require either user_id or user_attributes"
            );

            let mut request = receipt_return(code);
            request.user_attributes = Some(UserAttributes::default());
            assert!(request.validate().is_err());

            let mut request = receipt_return(code);
            request.user_id = Some(31);
            assert!(request.validate().is_ok());
        }
    }

    #[test]
    fn test_receipt_or_identity_required() {
        let mut request = receipt_return(2);
        request.original_receipt_id = None;
        assert_eq!(
            reason(request.validate()),
            "Either original_receipt_id or user identification (user_id/user_attributes) must be provided"
        );

        // an attribute block with no identifiers does not count
        request.user_attributes = Some(UserAttributes::default());
        assert!(request.validate().is_err());

        request.user_attributes = Some(UserAttributes::email("member@example.com"));
        assert!(request.validate().is_ok());
    }
}
