//! Point-of-sale API operations: purchases, claims, returns and history

use crate::CrowdTwistClient;
use ctbridge_core::{
    ClaimPointsRequest, ClaimPointsResponse, PurchaseRequest, PurchaseResponse, Result,
    ReturnRequest, ReturnResponse, UserPurchaseHistoryRequest, UserPurchaseHistoryResponse,
    Validate,
};
use reqwest::Method;
use tracing::{debug, info, instrument};

impl CrowdTwistClient {
    /// Record a purchase and award points for it
    #[instrument(skip_all, fields(receipt_id = request.receipt_id.as_deref().unwrap_or_default()))]
    pub async fn create_purchase(&self, request: &PurchaseRequest) -> Result<PurchaseResponse> {
        request.validate()?;

        let response: PurchaseResponse = self
            .send(self.pos(), Method::POST, &["purchase"], &[], Some(request))
            .await?;

        info!(
            "Purchase recorded: {} points (+{} bonus) for user {}",
            response.total_points_awarded, response.bonus_points_awarded, response.user_id
        );
        Ok(response)
    }

    /// Award points for a receipt the member submits themselves
    #[instrument(skip_all, fields(receipt_id = request.third_party_receipt_id.as_deref().unwrap_or_default()))]
    pub async fn claim_points(&self, request: &ClaimPointsRequest) -> Result<ClaimPointsResponse> {
        request.validate()?;

        let response: ClaimPointsResponse = self
            .send(self.pos(), Method::POST, &["claim"], &[], Some(request))
            .await?;

        debug!("Claim produced {} result(s)", response.results.len());
        Ok(response)
    }

    /// Record a return and deduct the points it earned
    #[instrument(skip_all, fields(return_id = request.return_id.as_deref().unwrap_or_default()))]
    pub async fn create_return(&self, request: &ReturnRequest) -> Result<ReturnResponse> {
        request.validate()?;

        let response: ReturnResponse = self
            .send(self.pos(), Method::POST, &["return"], &[], Some(request))
            .await?;

        info!(
            "Return recorded: {} points deducted from user {}",
            response.total_points_deducted, response.user_id
        );
        Ok(response)
    }

    /// Page through a member's purchases
    #[instrument(skip_all, fields(user_id = %request.user_id))]
    pub async fn get_user_purchase_history(
        &self,
        request: &UserPurchaseHistoryRequest,
    ) -> Result<UserPurchaseHistoryResponse> {
        request.validate()?;

        let response: UserPurchaseHistoryResponse = self
            .send::<_, ()>(
                self.pos(),
                Method::GET,
                &["users", request.user_id.as_str(), "purchases"],
                &request.query_params(),
                None,
            )
            .await?;

        debug!(
            "Fetched {} purchase(s), page count {}",
            response.purchases.len(),
            response.paging.pages
        );
        Ok(response)
    }
}
