//! Point-of-sale purchase models for the `POST /purchase` endpoint

use super::user::{identity_error, resolve_user_identity, UserAttributes};
use crate::types::ExtraFields;
use crate::validation::{is_filled, require, Validate};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Payment method and amount applied to a receipt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseTender {
    #[serde(rename = "type")]
    pub tender_type: i64,
    pub amount: f64,
}

/// A receipt line item
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PurchaseItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_data: Option<ExtraFields>,
}

impl PurchaseItem {
    pub fn new(sku: &str, price: f64, quantity: i64) -> Self {
        Self {
            sku: Some(sku.to_string()),
            price: Some(price),
            quantity: Some(quantity),
            ..Self::default()
        }
    }
}

/// Body of `POST /purchase`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PurchaseRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receipt_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_attributes: Option<UserAttributes>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtotal: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_purchased: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_data: Option<ExtraFields>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenders: Option<Vec<PurchaseTender>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coupons: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receipt_image_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<PurchaseItem>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseCampaign {
    pub title: String,
    pub multiplier: Option<f64>,
    pub point_gift: Option<i64>,
}

/// Transaction or tender rule that contributed to an award
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseRule {
    pub name: String,
    pub proportion: f64,
    pub multiplier: f64,
}

/// Per-SKU point calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseBreakdown {
    pub sku: String,
    #[serde(default)]
    pub is_awaiting_fulfillment: Option<bool>,
    pub quantity: i64,
    pub item_price: f64,
    pub points_to_dollar_conversion_rate: f64,
    #[serde(default)]
    pub points_to_currency_conversion_rate: Option<f64>,
    pub converted_points: f64,
    #[serde(default)]
    pub campaigns: Vec<PurchaseCampaign>,
    #[serde(default)]
    pub transaction: Vec<PurchaseRule>,
    #[serde(default)]
    pub tenders: Vec<PurchaseRule>,
    pub points_awarded: i64,
    pub is_excluded: bool,
}

/// Response from `POST /purchase`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseResponse {
    pub receipt_id: i64,
    pub user_id: i64,
    pub total_points_awarded: i64,
    pub bonus_points_awarded: i64,
    pub points_awaiting_fulfillment: i64,
    #[serde(default)]
    pub breakdown: Vec<PurchaseBreakdown>,
}

impl Validate for PurchaseRequest {
    fn validate(&self) -> Result<()> {
        require(&self.receipt_id, "receipt_id")?;
        require(&self.total, "total")?;
        require(&self.date_purchased, "date_purchased")?;
        require(&self.items, "items")?;

        let items = self.items.as_deref().unwrap_or_default();
        if items.is_empty() {
            return Err(Error::validation("At least one item is required"));
        }

        for item in items {
            let (Some(price), Some(quantity)) = (item.price, item.quantity) else {
                return Err(missing_item_field());
            };
            if !is_filled(&item.sku) {
                return Err(missing_item_field());
            }
            if price < 0.0 {
                return Err(Error::validation("Item price cannot be negative"));
            }
            if quantity <= 0 {
                return Err(Error::validation("Item quantity must be greater than 0"));
            }
        }

        if self.total.is_some_and(|total| total < 0.0) {
            return Err(Error::validation("Total amount cannot be negative"));
        }

        if self.subtotal.is_some_and(|subtotal| subtotal < 0.0) {
            return Err(Error::validation("Subtotal cannot be negative"));
        }

        if let Some(tenders) = &self.tenders {
            if tenders.iter().any(|tender| tender.amount < 0.0) {
                return Err(Error::validation("Tender amount cannot be negative"));
            }
        }

        resolve_user_identity(self.user_id, self.user_attributes.as_ref())
            .map_err(identity_error)
    }
}

fn missing_item_field() -> Error {
    Error::validation("Each item must have sku, price, and quantity fields")
}
