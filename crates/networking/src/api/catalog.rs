//! Catalog API operations

use crate::CrowdTwistClient;
use ctbridge_core::{CreateRewardRequest, CreateRewardResponse, Result, Validate};
use reqwest::Method;
use tracing::{info, instrument};

impl CrowdTwistClient {
    /// Create a reward (and one reward per variation) in the catalog
    #[instrument(skip_all, fields(title = request.title.as_deref().unwrap_or_default()))]
    pub async fn create_reward(&self, request: &CreateRewardRequest) -> Result<CreateRewardResponse> {
        request.validate()?;

        let response: CreateRewardResponse = self
            .send(self.catalog(), Method::POST, &["reward"], &[], Some(request))
            .await?;

        info!(
            "Created reward group {} with {} reward(s)",
            response.reward_group_id,
            response.reward_ids.len()
        );
        Ok(response)
    }
}
