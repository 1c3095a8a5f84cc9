//! Job handlers shipped with the worker binary

use async_trait::async_trait;
use ctbridge_core::{Error, PurchaseRequest, Result};
use ctbridge_engine::{HandlerRegistry, Job, JobHandler};
use ctbridge_networking::{AdminClient, CrowdTwistClient};
use tracing::info;

pub const SHOP_PING: &str = "shop/ping";
pub const CROWDTWIST_PURCHASE: &str = "crowdtwist/purchase";

/// Confirms the stored token still works by reading the shop name
pub struct ShopPing;

#[async_trait]
impl JobHandler for ShopPing {
    async fn handle(&self, _job: &Job, admin: &AdminClient) -> Result<()> {
        let data: serde_json::Value = admin.graphql("{ shop { name } }", None).await?;
        let name = data["shop"]["name"].as_str().unwrap_or("<unnamed>");
        info!("Shop {} is reachable as '{}'", admin.shop(), name);
        Ok(())
    }
}

/// Records `data.purchase` with CrowdTwist POS
pub struct RecordPurchase {
    client: CrowdTwistClient,
}

impl RecordPurchase {
    pub fn new(client: CrowdTwistClient) -> Self {
        Self { client }
    }

    fn purchase_from(job: &Job) -> Result<PurchaseRequest> {
        let payload = job
            .data
            .get("purchase")
            .cloned()
            .ok_or_else(|| Error::InvalidData("job data has no purchase".to_string()))?;
        Ok(serde_json::from_value(payload)?)
    }
}

#[async_trait]
impl JobHandler for RecordPurchase {
    async fn handle(&self, job: &Job, admin: &AdminClient) -> Result<()> {
        let purchase = Self::purchase_from(job)?;
        let response = self.client.create_purchase(&purchase).await?;
        info!(
            "Recorded purchase {} for {}: {} points awarded",
            response.receipt_id,
            admin.shop(),
            response.total_points_awarded
        );
        Ok(())
    }
}

/// Registry for the binary; the CrowdTwist handler needs a configured client
pub fn default_registry(crowdtwist: Option<CrowdTwistClient>) -> HandlerRegistry {
    let mut registry = HandlerRegistry::new().with(SHOP_PING, ShopPing);
    if let Some(client) = crowdtwist {
        registry.register(CROWDTWIST_PURCHASE, RecordPurchase::new(client));
    }
    registry
}
