//! Reward catalog models for the `POST /reward` endpoint

use crate::types::ExtraFields;
use crate::validation::{is_filled, require, Validate};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Kind of redeemable item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RewardType {
    Standard,
    Sweepstake,
    Code,
    Download,
}

/// Whether a linked audience segment is allowed in or kept out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentLinkType {
    Include,
    Exclude,
}

/// One color/size variant of a physical reward
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardVariation {
    pub display_order: i64,
    pub quantity: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_id: Option<String>,
    pub color: String,
    pub size: String,
}

/// Location fields plus any additional keys the program defines
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RewardExtraData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

/// Body of `POST /reward`
///
/// Fields the API requires are still `Option` here so that a payload
/// deserialized from job data can be rejected with the name of the
/// missing field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateRewardRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub reward_type: Option<RewardType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points_to_redeem: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_quantity: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_lifetime_redemptions: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_shipping_required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_phone_number_required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_end: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub freq_cap: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub freq_period_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_expiration: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segment_link_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segment_link_type: Option<SegmentLinkType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variations: Option<Vec<RewardVariation>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra_data: Option<RewardExtraData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_until_entries_accepted: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_winners: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_age: Option<i64>,
}

/// Response from `POST /reward`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateRewardResponse {
    pub reward_ids: Vec<i64>,
    pub reward_group_id: i64,
}

impl Validate for CreateRewardRequest {
    fn validate(&self) -> Result<()> {
        require(&self.title, "title")?;
        require(&self.description, "description")?;
        require(&self.reward_type, "type")?;
        require(&self.category_id, "category_id")?;
        require(&self.points_to_redeem, "points_to_redeem")?;
        require(&self.is_shipping_required, "is_shipping_required")?;
        require(&self.is_phone_number_required, "is_phone_number_required")?;
        require(&self.date_start, "date_start")?;

        if self.reward_type == Some(RewardType::Sweepstake) {
            if !is_filled(&self.date_end) {
                return Err(Error::validation(
                    "date_end is required for SWEEPSTAKE rewards",
                ));
            }
            if !is_filled(&self.date_until_entries_accepted) {
                return Err(Error::validation(
                    "date_until_entries_accepted is required for SWEEPSTAKE rewards",
                ));
            }
            if self.num_winners.unwrap_or(0) == 0 {
                return Err(Error::validation(
                    "num_winners is required for SWEEPSTAKE rewards",
                ));
            }
        }

        if self.segment_link_id.unwrap_or(0) != 0 && self.segment_link_type.is_none() {
            return Err(Error::validation(
                "segment_link_type is required when segment_link_id is provided",
            ));
        }

        if let Some(variations) = &self.variations {
            validate_variations(variations)?;
        }

        Ok(())
    }
}

/// Reject a variation list that repeats a (color, size) pair, ignoring case
pub fn validate_variations(variations: &[RewardVariation]) -> Result<()> {
    let mut seen = HashSet::with_capacity(variations.len());

    for variation in variations {
        let key = (variation.color.to_lowercase(), variation.size.to_lowercase());
        if !seen.insert(key) {
            return Err(Error::validation(format!(
                "Duplicate color and size combination: {}, {}",
                variation.color, variation.size
            )));
        }
    }

    Ok(())
}
